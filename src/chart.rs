//! Chart orchestrator.
//!
//! Builds the visual tree for a blip collection through the rendering
//! bridge, measures it, derives the simulation arena and drives the
//! layout pipeline, writing positions back to the surface on every tick.

use std::rc::Rc;

use crate::blip::{Blip, InputError, ShapeKind, SimulationBlip, build_simulation_blips};
use crate::layout::{ChartConfig, LayoutPipeline, NodeId, SimNode};
use crate::output::{BlipOutput, ChartOutput, PlaceholderOutput};
use crate::render::{ElementHandle, PointerEventKind, RenderBridge, Size, Surface};

/// Symbol fill per quadrant index.
const QUADRANT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Callbacks surfaced to the embedding component. Invoked synchronously
/// from pointer event handlers.
#[derive(Clone)]
pub struct InteractionHandlers {
    on_hover_quadrant: Rc<dyn Fn(usize)>,
    on_click_blip: Rc<dyn Fn(&str, &str)>,
}

impl InteractionHandlers {
    pub fn new(
        on_hover_quadrant: impl Fn(usize) + 'static,
        on_click_blip: impl Fn(&str, &str) + 'static,
    ) -> Self {
        Self {
            on_hover_quadrant: Rc::new(on_hover_quadrant),
            on_click_blip: Rc::new(on_click_blip),
        }
    }

    /// Handlers that swallow every event.
    pub fn silent() -> Self {
        Self::new(|_| {}, |_, _| {})
    }
}

/// Visual elements belonging to one blip, with their measured boxes.
/// Boxes are measured once per build and reused on every tick.
struct BlipVisual {
    symbol: ElementHandle,
    label: ElementHandle,
    symbol_box: Size,
    label_box: Size,
}

/// How many placeholder circles a label of this size needs: one per
/// label-height-sized square that fits across the label width.
fn placeholder_count(label_box: Size) -> usize {
    if label_box.height <= 0.0 {
        return 0;
    }
    (label_box.width / label_box.height).floor() as usize
}

fn fmt_value(v: f64) -> String {
    format!("{v}")
}

/// A positioned radar chart driving a layout pipeline against a surface.
///
/// Construction creates and measures every element and builds the
/// simulation arena; the embedding component then calls [`tick`] from its
/// animation clock until it returns false. Callers must [`stop`] the
/// chart before tearing down the surface it draws to, otherwise a later
/// tick writes to stale elements.
///
/// [`tick`]: RadarChart::tick
/// [`stop`]: RadarChart::stop
pub struct RadarChart {
    blips: Vec<SimulationBlip>,
    visuals: Vec<BlipVisual>,
    placeholder_circles: Vec<ElementHandle>,
    pipeline: LayoutPipeline,
}

impl RadarChart {
    pub fn new(
        surface: &mut dyn Surface,
        parent: ElementHandle,
        blips: &[Blip],
        handlers: &InteractionHandlers,
        config: ChartConfig,
    ) -> Result<Self, InputError> {
        let sized = build_simulation_blips(config.radius(), config.max_score_orbit, blips)?;

        let blips_group = surface.create_group(parent, "blips");
        let mut visuals: Vec<BlipVisual> = Vec::with_capacity(sized.len());
        for sb in &sized {
            let group = surface.create_group(blips_group, "blip");
            surface.set_attr(group, "quadrant-name", &sb.blip.quadrant);
            surface.set_attr(group, "quadrant-index", &sb.quadrant_index.to_string());
            surface.set_attr(group, "cursor", "pointer");

            let hover = Rc::clone(&handlers.on_hover_quadrant);
            let quadrant_index = sb.quadrant_index;
            surface.on_pointer_event(
                group,
                PointerEventKind::Enter,
                Box::new(move || hover(quadrant_index)),
            );
            let click = Rc::clone(&handlers.on_click_blip);
            let quadrant = sb.blip.quadrant.clone();
            let name = sb.blip.name.clone();
            surface.on_pointer_event(
                group,
                PointerEventKind::Click,
                Box::new(move || click(&quadrant, &name)),
            );

            let symbol = surface.create_shape(group, sb.shape);
            surface.set_attr(symbol, "class", "blip-element blip-symbol");
            surface.set_attr(
                symbol,
                "fill",
                QUADRANT_PALETTE[sb.quadrant_index % QUADRANT_PALETTE.len()],
            );
            match sb.shape {
                ShapeKind::Rect => {
                    surface.set_attr(symbol, "width", &fmt_value(config.symbol_size));
                    surface.set_attr(symbol, "height", &fmt_value(config.symbol_size));
                    surface.set_attr(symbol, "rx", "0.4em");
                    surface.set_attr(symbol, "ry", "0.4em");
                }
                ShapeKind::Circle => {
                    surface.set_attr(symbol, "r", &fmt_value(config.symbol_radius));
                }
            }

            let label = surface.create_text(group, &sb.blip.name);
            surface.set_attr(label, "class", "blip-element blip-text");

            let symbol_box = surface.measure_bounds(symbol);
            let label_box = surface.measure_bounds(label);
            visuals.push(BlipVisual {
                symbol,
                label,
                symbol_box,
                label_box,
            });
        }

        let mut nodes: Vec<SimNode> = sized
            .iter()
            .zip(&visuals)
            .map(|(sb, visual)| {
                let radius = visual.symbol_box.width.max(visual.symbol_box.height) / 2.0
                    + config.collide_margin;
                SimNode::blip(sb.quadrant_index, sb.orbit, radius)
            })
            .collect();
        let blip_count = nodes.len();

        let mut placeholder_circles = Vec::new();
        for (i, (sb, visual)) in sized.iter().zip(&visuals).enumerate() {
            let count = placeholder_count(visual.label_box);
            let radius = visual.label_box.height / 2.0;
            for nth in 0..count {
                nodes.push(SimNode::placeholder(NodeId(i), nth, radius, sb.quadrant_index));
                let holder = surface.create_group(blips_group, "placeholder");
                let circle = surface.create_shape(holder, ShapeKind::Circle);
                surface.set_attr(circle, "r", &fmt_value(radius));
                surface.set_attr(circle, "fill-opacity", "0");
                surface.set_attr(circle, "stroke", "#000000");
                surface.set_attr(circle, "stroke-opacity", "0");
                surface.set_attr(circle, "pointer-events", "none");
                surface.set_attr(circle, "dad-name", &sb.blip.name);
                placeholder_circles.push(circle);
            }
        }

        let pipeline = LayoutPipeline::new(nodes, blip_count, &config);
        Ok(Self {
            blips: sized,
            visuals,
            placeholder_circles,
            pipeline,
        })
    }

    /// Step the pipeline once and write every position to the surface.
    /// Returns false once all three passes have settled.
    pub fn tick(&mut self, surface: &mut dyn RenderBridge) -> bool {
        let active = self.pipeline.tick();
        self.write_positions(surface);
        active
    }

    /// Tick until the layout comes to rest.
    pub fn settle(&mut self, surface: &mut dyn RenderBridge) {
        while self.tick(surface) {}
    }

    /// Halt all three passes. Must be called before the surface this
    /// chart draws to is discarded.
    pub fn stop(&mut self) {
        self.pipeline.stop();
    }

    pub fn restart(&mut self) {
        self.pipeline.restart();
    }

    pub fn is_running(&self) -> bool {
        self.pipeline.is_running()
    }

    fn write_positions(&self, surface: &mut dyn RenderBridge) {
        let nodes = self.pipeline.nodes();
        for (i, visual) in self.visuals.iter().enumerate() {
            let node = &nodes[i];
            match self.blips[i].shape {
                ShapeKind::Rect => {
                    surface.set_attr(
                        visual.symbol,
                        "x",
                        &fmt_value(node.x - visual.symbol_box.width / 2.0),
                    );
                    surface.set_attr(
                        visual.symbol,
                        "y",
                        &fmt_value(node.y - visual.symbol_box.height / 2.0),
                    );
                }
                ShapeKind::Circle => {
                    surface.set_attr(visual.symbol, "cx", &fmt_value(node.x));
                    surface.set_attr(visual.symbol, "cy", &fmt_value(node.y));
                }
            }

            let quadrant_index = self.blips[i].quadrant_index;
            let label_x = if quadrant_index == 0 || quadrant_index == 1 {
                node.x + visual.symbol_box.width / 2.0
            } else {
                node.x - visual.label_box.width - visual.symbol_box.width / 2.0
            };
            let label_y = if quadrant_index == 1 || quadrant_index == 2 {
                node.y + visual.label_box.height / 2.0
            } else {
                node.y
            };
            surface.set_attr(visual.label, "x", &fmt_value(label_x));
            surface.set_attr(visual.label, "y", &fmt_value(label_y));
        }

        for (k, circle) in self.placeholder_circles.iter().enumerate() {
            let node = &nodes[self.pipeline.blip_count() + k];
            surface.set_attr(*circle, "cx", &fmt_value(node.x));
            surface.set_attr(*circle, "cy", &fmt_value(node.y));
        }
    }

    /// Current layout state as serializable output.
    pub fn snapshot(&self) -> ChartOutput {
        let nodes = self.pipeline.nodes();
        let blips = self
            .blips
            .iter()
            .enumerate()
            .map(|(i, sb)| BlipOutput {
                name: sb.blip.name.clone(),
                quadrant: sb.blip.quadrant.clone(),
                quadrant_index: sb.quadrant_index,
                score: sb.blip.score,
                shape: sb.shape.as_str().to_string(),
                x: nodes[i].x,
                y: nodes[i].y,
                orbit: sb.orbit,
                radius: nodes[i].radius,
            })
            .collect();
        let placeholders = nodes[self.pipeline.blip_count()..]
            .iter()
            .map(|node| PlaceholderOutput {
                dad: node
                    .dad
                    .map(|d| self.blips[d.0].blip.name.clone())
                    .unwrap_or_default(),
                nth: node.nth,
                radius: node.radius,
                x: node.x,
                y: node.y,
            })
            .collect();
        ChartOutput {
            blips,
            placeholders,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MeasureBridge, PointerHandler};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordedElement {
        parent: usize,
        tag: String,
        text: Option<String>,
        attrs: HashMap<String, String>,
    }

    /// Surface double: records every element and attribute write, serves
    /// fixed measurements, and lets tests fire pointer events by hand.
    struct RecordingSurface {
        elements: Vec<RecordedElement>,
        handlers: HashMap<(usize, PointerEventKind), PointerHandler>,
        text_size: Size,
        symbol_size: Size,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                elements: vec![RecordedElement {
                    tag: "svg".to_string(),
                    ..Default::default()
                }],
                handlers: HashMap::new(),
                text_size: Size {
                    width: 80.0,
                    height: 16.0,
                },
                symbol_size: Size {
                    width: 22.0,
                    height: 22.0,
                },
            }
        }

        fn root(&self) -> ElementHandle {
            ElementHandle(0)
        }

        fn unmeasurable() -> Self {
            let mut surface = Self::new();
            surface.text_size = Size::default();
            surface.symbol_size = Size::default();
            surface
        }

        fn push(&mut self, parent: ElementHandle, tag: &str, text: Option<String>) -> ElementHandle {
            self.elements.push(RecordedElement {
                parent: parent.0,
                tag: tag.to_string(),
                text,
                attrs: HashMap::new(),
            });
            ElementHandle(self.elements.len() - 1)
        }

        fn fire(&mut self, element: ElementHandle, kind: PointerEventKind) {
            self.handlers
                .get_mut(&(element.0, kind))
                .expect("no handler registered")();
        }

        fn attr(&self, element: ElementHandle, name: &str) -> Option<&str> {
            self.elements[element.0].attrs.get(name).map(String::as_str)
        }

        fn elements_with_class(&self, class: &str) -> Vec<usize> {
            self.elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.attrs.get("class").is_some_and(|c| c == class))
                .map(|(i, _)| i)
                .collect()
        }
    }

    impl RenderBridge for RecordingSurface {
        fn create_group(&mut self, parent: ElementHandle, class: &str) -> ElementHandle {
            let handle = self.push(parent, "g", None);
            self.elements[handle.0]
                .attrs
                .insert("class".to_string(), class.to_string());
            handle
        }

        fn create_shape(&mut self, parent: ElementHandle, kind: ShapeKind) -> ElementHandle {
            self.push(parent, kind.as_str(), None)
        }

        fn create_text(&mut self, parent: ElementHandle, content: &str) -> ElementHandle {
            self.push(parent, "text", Some(content.to_string()))
        }

        fn set_attr(&mut self, element: ElementHandle, name: &str, value: &str) {
            self.elements[element.0]
                .attrs
                .insert(name.to_string(), value.to_string());
        }

        fn on_pointer_event(
            &mut self,
            element: ElementHandle,
            kind: PointerEventKind,
            handler: PointerHandler,
        ) {
            self.handlers.insert((element.0, kind), handler);
        }
    }

    impl MeasureBridge for RecordingSurface {
        fn measure_bounds(&self, element: ElementHandle) -> Size {
            match self.elements[element.0].tag.as_str() {
                "rect" | "circle" => self.symbol_size,
                "text" => self.text_size,
                _ => Size::default(),
            }
        }
    }

    fn blip(quadrant: &str, name: &str, score: f64) -> Blip {
        Blip {
            quadrant: quadrant.to_string(),
            name: name.to_string(),
            score,
            badge: None,
            desc: None,
        }
    }

    fn sample_blips() -> Vec<Blip> {
        vec![
            blip("A", "X", 1.0),
            blip("A", "Y", 5.0),
            blip("B", "Z", 3.0),
        ]
    }

    /// 800x800 makes the chart radius exactly 380.
    fn square_config() -> ChartConfig {
        ChartConfig {
            width: 800.0,
            height: 800.0,
            ..ChartConfig::default()
        }
    }

    #[test]
    fn builds_groups_symbols_labels_and_placeholders() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();

        let groups = surface.elements_with_class("blip");
        assert_eq!(groups.len(), 3);
        let blips_root = surface.elements_with_class("blips")[0];
        assert!(groups.iter().all(|&g| surface.elements[g].parent == blips_root));
        assert_eq!(
            surface.attr(ElementHandle(groups[0]), "quadrant-name"),
            Some("A")
        );
        assert_eq!(
            surface.attr(ElementHandle(groups[2]), "quadrant-index"),
            Some("1")
        );

        let symbols = surface.elements_with_class("blip-element blip-symbol");
        assert_eq!(symbols.len(), 3);
        // Quadrant 0 blips are rects filled with the first palette color.
        assert_eq!(surface.elements[symbols[0]].tag, "rect");
        assert_eq!(
            surface.attr(ElementHandle(symbols[0]), "fill"),
            Some(QUADRANT_PALETTE[0])
        );
        assert_eq!(surface.elements[symbols[2]].tag, "circle");
        assert_eq!(
            surface.attr(ElementHandle(symbols[2]), "fill"),
            Some(QUADRANT_PALETTE[1])
        );

        let labels = surface.elements_with_class("blip-element blip-text");
        let names: Vec<&str> = labels
            .iter()
            .filter_map(|&l| surface.elements[l].text.as_deref())
            .collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);

        // 80x16 labels reserve five placeholders per blip.
        let snapshot = chart.snapshot();
        assert_eq!(snapshot.placeholders.len(), 15);
        assert!(snapshot.placeholders.iter().all(|p| p.radius == 8.0));
        let circles = surface
            .elements
            .iter()
            .filter(|e| e.attrs.get("dad-name").is_some())
            .count();
        assert_eq!(circles, 15);
    }

    #[test]
    fn end_to_end_scenario_assigns_orbits_and_indices() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();

        let snapshot = chart.snapshot();
        let orbits: Vec<f64> = snapshot.blips.iter().map(|b| b.orbit).collect();
        assert_eq!(orbits, vec![380.0, 50.0, 215.0]);
        let indices: Vec<usize> = snapshot.blips.iter().map(|b| b.quadrant_index).collect();
        assert_eq!(indices, vec![0, 0, 1]);
    }

    #[test]
    fn unmeasurable_elements_degenerate_instead_of_failing() {
        let mut surface = RecordingSurface::unmeasurable();
        let root = surface.root();
        let chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();

        let snapshot = chart.snapshot();
        assert!(snapshot.placeholders.is_empty());
        // Collision radius degenerates to the margin alone.
        assert!(snapshot.blips.iter().all(|b| b.radius == 10.0));
    }

    #[test]
    fn empty_collection_is_rejected_before_any_drawing() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let result = RadarChart::new(
            &mut surface,
            root,
            &[],
            &InteractionHandlers::silent(),
            square_config(),
        );

        assert!(result.is_err());
        assert_eq!(surface.elements.len(), 1); // only the root
    }

    #[test]
    fn pointer_events_reach_the_outward_callbacks() {
        let hovered = Rc::new(RefCell::new(Vec::new()));
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let hovered_tap = Rc::clone(&hovered);
        let clicked_tap = Rc::clone(&clicked);
        let handlers = InteractionHandlers::new(
            move |quadrant_index| hovered_tap.borrow_mut().push(quadrant_index),
            move |quadrant, name| {
                clicked_tap
                    .borrow_mut()
                    .push((quadrant.to_string(), name.to_string()))
            },
        );

        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let _chart =
            RadarChart::new(&mut surface, root, &sample_blips(), &handlers, square_config())
                .unwrap();

        let groups = surface.elements_with_class("blip");
        surface.fire(ElementHandle(groups[2]), PointerEventKind::Enter);
        surface.fire(ElementHandle(groups[0]), PointerEventKind::Click);

        assert_eq!(*hovered.borrow(), vec![1]);
        assert_eq!(*clicked.borrow(), vec![("A".to_string(), "X".to_string())]);
    }

    #[test]
    fn ticks_write_positions_for_every_element() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let mut chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();

        assert!(chart.tick(&mut surface));
        chart.tick(&mut surface);

        let symbols = surface.elements_with_class("blip-element blip-symbol");
        // Rect symbols get x/y, circle symbols get cx/cy.
        assert!(surface.attr(ElementHandle(symbols[0]), "x").is_some());
        assert!(surface.attr(ElementHandle(symbols[2]), "cx").is_some());
        let labels = surface.elements_with_class("blip-element blip-text");
        assert!(surface.attr(ElementHandle(labels[0]), "x").is_some());
        let circles: Vec<usize> = surface
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attrs.get("dad-name").is_some())
            .map(|(i, _)| i)
            .collect();
        assert!(surface.attr(ElementHandle(circles[0]), "cy").is_some());
    }

    #[test]
    fn labels_flip_sides_with_the_quadrant_half() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let blips = vec![
            blip("right", "r", 1.0),
            blip("also-right", "ar", 2.0),
            blip("left", "l", 3.0),
            blip("also-left", "al", 4.0),
        ];
        let mut chart = RadarChart::new(
            &mut surface,
            root,
            &blips,
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();
        chart.settle(&mut surface);

        let nodes_snapshot = chart.snapshot();
        let labels = surface.elements_with_class("blip-element blip-text");
        for (i, blip_out) in nodes_snapshot.blips.iter().enumerate() {
            let x: f64 = surface
                .attr(ElementHandle(labels[i]), "x")
                .unwrap()
                .parse()
                .unwrap();
            if blip_out.quadrant_index <= 1 {
                assert_eq!(x, blip_out.x + 11.0);
            } else {
                assert_eq!(x, blip_out.x - 80.0 - 11.0);
            }
        }
    }

    #[test]
    fn stop_is_terminal_until_restart() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let mut chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();

        chart.tick(&mut surface);
        chart.stop();
        assert!(!chart.is_running());
        assert!(!chart.tick(&mut surface));

        chart.restart();
        assert!(chart.tick(&mut surface));
    }

    #[test]
    fn snapshot_serializes_with_expected_shape() {
        let mut surface = RecordingSurface::new();
        let root = surface.root();
        let mut chart = RadarChart::new(
            &mut surface,
            root,
            &sample_blips(),
            &InteractionHandlers::silent(),
            square_config(),
        )
        .unwrap();
        chart.settle(&mut surface);

        let value = serde_json::to_value(chart.snapshot()).unwrap();
        assert_eq!(value["blips"].as_array().unwrap().len(), 3);
        assert_eq!(value["blips"][0]["name"], "X");
        assert_eq!(value["blips"][0]["shape"], "rect");
        assert!(value["placeholders"][0]["dad"].is_string());
        assert!(value.get("error").is_none());
    }
}
