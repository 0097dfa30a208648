use crate::constants::{data_attribute, CANVAS_STYLE};
use anyhow::anyhow;
use pixelblast_core::{BlastConfig, Container, CssRect};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Host element plus the canvas this component appends to it.
pub struct DomContainer {
    element: web::HtmlElement,
    canvas: web::HtmlCanvasElement,
    window: web::Window,
}

impl DomContainer {
    pub fn new(element: web::HtmlElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;
        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| anyhow!("{:?}", e))?
            .dyn_into()
            .map_err(|e| anyhow!("{:?}", e))?;
        canvas.style().set_css_text(CANVAS_STYLE);
        Ok(Self {
            element,
            canvas,
            window,
        })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.element
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }
}

impl Container for DomContainer {
    fn client_size(&self) -> (f64, f64) {
        (
            self.element.client_width() as f64,
            self.element.client_height() as f64,
        )
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn mount_surface(&mut self) {
        if let Err(e) = self.element.append_child(&self.canvas) {
            log::warn!("[dom] append canvas failed: {:?}", e);
        }
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn unmount_surface(&mut self) {
        let host: &web::Node = self.element.as_ref();
        let attached = self
            .canvas
            .parent_node()
            .is_some_and(|p| p.is_same_node(Some(host)));
        if attached {
            _ = self.element.remove_child(&self.canvas);
        }
    }
}

/// Read the `data-*` configuration of `element`. Invalid values are logged and
/// the defaults are used instead.
pub fn config_from_attributes(element: &web::Element) -> BlastConfig {
    match BlastConfig::from_lookup(|key| element.get_attribute(&data_attribute(key))) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[dom] invalid configuration ({e}); using defaults");
            BlastConfig::default()
        }
    }
}

pub fn css_rect(canvas: &web::HtmlCanvasElement) -> CssRect {
    let rect = canvas.get_bounding_client_rect();
    CssRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}
