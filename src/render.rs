//! Bridge traits between the layout core and the drawing surface.
//!
//! The core never touches the rendering surface directly: it creates and
//! positions elements through [`RenderBridge`], and reads rendered sizes
//! back through [`MeasureBridge`]. A surface hands out opaque
//! [`ElementHandle`]s and is free to map them onto SVG nodes, a canvas
//! display list, or a test recording.

use crate::blip::ShapeKind;

/// Opaque id for an element created by a surface. Only meaningful to the
/// surface that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// Measured extent of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Leave,
    Click,
}

/// Callback invoked by the surface when a pointer event fires on the
/// element it was registered against.
pub type PointerHandler = Box<dyn FnMut()>;

/// Supplies the width/height of a rendered shape or text.
///
/// Must reflect actual rendered size (including text metrics) once the
/// element is attached; an unattached or unmeasurable element reports a
/// zero size, which the core treats as "no space to reserve" rather than
/// an error.
pub trait MeasureBridge {
    fn measure_bounds(&self, element: ElementHandle) -> Size;
}

/// Creates and mutates visual elements on behalf of the core.
pub trait RenderBridge {
    fn create_group(&mut self, parent: ElementHandle, class: &str) -> ElementHandle;
    fn create_shape(&mut self, parent: ElementHandle, kind: ShapeKind) -> ElementHandle;
    fn create_text(&mut self, parent: ElementHandle, content: &str) -> ElementHandle;
    fn set_attr(&mut self, element: ElementHandle, name: &str, value: &str);
    fn on_pointer_event(
        &mut self,
        element: ElementHandle,
        kind: PointerEventKind,
        handler: PointerHandler,
    );
}

/// A surface that can both draw and measure. Blanket-implemented so any
/// type with the two bridge impls qualifies.
pub trait Surface: RenderBridge + MeasureBridge {}

impl<T: RenderBridge + MeasureBridge + ?Sized> Surface for T {}
