//! Force implementations for the layout passes:
//! - `radial`: pulls each blip toward its orbit distance from the center
//! - `confine`: keeps a blip inside its quadrant's angular wedge
//! - `collide`: mutual repulsion between blips and placeholders
//! - `trail`: pins placeholders behind their owning blip

mod collide;
mod confine;
mod radial;
mod trail;

pub use collide::CollideForce;
pub use confine::{QuadrantConfineForce, wedge};
pub use radial::RadialForce;
pub use trail::TrailForce;

/// Substitute for an exactly-zero coordinate so direction vectors from the
/// origin stay well-defined.
pub(crate) fn non_zero(v: f64) -> f64 {
    if v == 0.0 { 1e-6 } else { v }
}
