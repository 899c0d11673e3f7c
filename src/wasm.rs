//! WASM bindings for the radar-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here,
//! plus the SVG surface backing both bridge traits in the browser. The
//! embedding page owns the animation clock: it calls `ChartHandle::tick`
//! from requestAnimationFrame until the layout settles.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use serde_json::to_string;

use crate::blip::{Blip, ShapeKind};
use crate::chart::{InteractionHandlers, RadarChart};
use crate::layout::ChartConfig;
use crate::output::ChartOutput;
use crate::render::{
    ElementHandle, MeasureBridge, PointerEventKind, PointerHandler, RenderBridge, Size,
};

#[wasm_bindgen]
extern "C" {
    pub fn alert(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn event_name(kind: PointerEventKind) -> &'static str {
    match kind {
        PointerEventKind::Enter => "mouseover",
        PointerEventKind::Leave => "mouseout",
        PointerEventKind::Click => "click",
    }
}

/// SVG-backed surface. Handles index into the element list; listener
/// closures are parked here so they outlive their registration.
pub struct DomSurface {
    document: web_sys::Document,
    elements: Vec<web_sys::Element>,
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl DomSurface {
    pub fn new(document: web_sys::Document) -> Self {
        Self {
            document,
            elements: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Register an existing DOM element (the host `<svg>`) as a handle.
    pub fn adopt(&mut self, element: web_sys::Element) -> ElementHandle {
        self.elements.push(element);
        ElementHandle(self.elements.len() - 1)
    }

    fn create(&mut self, parent: ElementHandle, name: &str) -> ElementHandle {
        let element = self
            .document
            .create_element_ns(Some(SVG_NS), name)
            .unwrap();
        let _ = self.elements[parent.0].append_child(&element);
        self.adopt(element)
    }
}

impl RenderBridge for DomSurface {
    fn create_group(&mut self, parent: ElementHandle, class: &str) -> ElementHandle {
        let handle = self.create(parent, "g");
        self.set_attr(handle, "class", class);
        handle
    }

    fn create_shape(&mut self, parent: ElementHandle, kind: ShapeKind) -> ElementHandle {
        self.create(parent, kind.as_str())
    }

    fn create_text(&mut self, parent: ElementHandle, content: &str) -> ElementHandle {
        let handle = self.create(parent, "text");
        self.elements[handle.0].set_text_content(Some(content));
        handle
    }

    fn set_attr(&mut self, element: ElementHandle, name: &str, value: &str) {
        let _ = self.elements[element.0].set_attribute(name, value);
    }

    fn on_pointer_event(
        &mut self,
        element: ElementHandle,
        kind: PointerEventKind,
        handler: PointerHandler,
    ) {
        let closure = Closure::wrap(handler);
        let _ = self.elements[element.0]
            .add_event_listener_with_callback(event_name(kind), closure.as_ref().unchecked_ref());
        self.listeners.push(closure);
    }
}

impl MeasureBridge for DomSurface {
    fn measure_bounds(&self, element: ElementHandle) -> Size {
        // An element that is not an attached graphics element measures as
        // zero; the core degenerates gracefully from there.
        self.elements[element.0]
            .dyn_ref::<web_sys::SvgGraphicsElement>()
            .and_then(|el| el.get_b_box().ok())
            .map(|bbox| Size {
                width: bbox.width() as f64,
                height: bbox.height() as f64,
            })
            .unwrap_or_default()
    }
}

/// A mounted chart plus the surface it draws to.
#[wasm_bindgen]
pub struct ChartHandle {
    chart: RadarChart,
    surface: DomSurface,
}

#[wasm_bindgen]
impl ChartHandle {
    /// One simulation step. Returns false once the layout has settled.
    pub fn tick(&mut self) -> bool {
        self.chart.tick(&mut self.surface)
    }

    /// Run the layout to rest synchronously.
    pub fn settle(&mut self) {
        self.chart.settle(&mut self.surface);
    }

    /// Halt every pass. Call before removing the chart's SVG from the
    /// document.
    pub fn stop(&mut self) {
        self.chart.stop();
    }

    pub fn restart(&mut self) {
        self.chart.restart();
    }

    pub fn snapshot(&self) -> String {
        to_string(&self.chart.snapshot()).unwrap()
    }
}

/// Mount a radar chart into the `<svg>` with the given id, from a JSON
/// array of blips: `[{"quadrant": ..., "name": ..., "score": ...}, ...]`.
#[wasm_bindgen]
pub fn mount_chart(svg_id: &str, blips_json: &str) -> Result<ChartHandle, JsValue> {
    let blips: Vec<Blip> = match serde_json::from_str(blips_json) {
        Ok(blips) => blips,
        Err(e) => {
            console_error(&format!("Error parsing blips: {}", e));
            let output = ChartOutput::from_error(format!("Parsing error: {}", e));
            return Err(JsValue::from_str(&to_string(&output).unwrap()));
        }
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let svg = match document.get_element_by_id(svg_id) {
        Some(svg) => svg,
        None => {
            console_error(&format!("No element with id '{}'", svg_id));
            let output = ChartOutput::from_error(format!("No element with id '{}'", svg_id));
            return Err(JsValue::from_str(&to_string(&output).unwrap()));
        }
    };

    let mut surface = DomSurface::new(document);
    let root = surface.adopt(svg);
    let handlers = InteractionHandlers::new(
        |quadrant_index| console_log(&format!("hover quadrant {}", quadrant_index)),
        |quadrant, name| console_log(&format!("click blip {}/{}", quadrant, name)),
    );

    match RadarChart::new(&mut surface, root, &blips, &handlers, ChartConfig::default()) {
        Ok(chart) => Ok(ChartHandle { chart, surface }),
        Err(e) => {
            console_error(&format!("Error building chart: {}", e));
            let output = ChartOutput::from_error(e.msg);
            Err(JsValue::from_str(&to_string(&output).unwrap()))
        }
    }
}
