use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `ResizeObserver` on the host element. Entries are ignored; the callback
/// re-measures the container itself.
pub struct ResizeBinding {
    observer: web::ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl ResizeBinding {
    pub fn observe(
        element: &web::Element,
        mut on_resize: impl FnMut() + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(
            Box::new(move |_entries: js_sys::Array| on_resize()) as Box<dyn FnMut(js_sys::Array)>
        );
        let observer = web::ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{:?}", e))?;
        observer.observe(element);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(self) {
        self.observer.disconnect();
    }
}
