use pixelblast_core::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` scheduler that always re-arms the same tick closure.
pub struct RafScheduler {
    window: web::Window,
    tick: Closure<dyn FnMut()>,
}

impl RafScheduler {
    pub fn new(window: web::Window, tick: Closure<dyn FnMut()>) -> Self {
        Self { window, tick }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        match self
            .window
            .request_animation_frame(self.tick.as_ref().unchecked_ref())
        {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("[frame] requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        _ = self.window.cancel_animation_frame(handle);
    }
}
