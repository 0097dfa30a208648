use crate::dom;
use anyhow::anyhow;
use glam::Vec2;
use pixelblast_core::CssRect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const POINTER_DOWN: &str = "pointerdown";

/// A `pointerdown` listener on the canvas, removable on teardown.
pub struct PointerBinding {
    target: web::HtmlCanvasElement,
    closure: Closure<dyn FnMut(web::PointerEvent)>,
}

impl PointerBinding {
    /// Call `on_down` with the client position of each press and the canvas
    /// rectangle at that moment.
    pub fn listen(
        canvas: &web::HtmlCanvasElement,
        mut on_down: impl FnMut(Vec2, CssRect) + 'static,
    ) -> anyhow::Result<Self> {
        let rect_source = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            on_down(client, dom::css_rect(&rect_source));
        }) as Box<dyn FnMut(web::PointerEvent)>);
        canvas
            .add_event_listener_with_callback(POINTER_DOWN, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(Self {
            target: canvas.clone(),
            closure,
        })
    }

    pub fn remove(self) {
        _ = self.target.remove_event_listener_with_callback(
            POINTER_DOWN,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}
