#![cfg(target_arch = "wasm32")]
use anyhow::anyhow;
use instant::Instant;
use pixelblast_core::{
    AnimationClock, Backend, BlastSession, FrameControl, FrameLoop, FrameOutcome, GpuRenderer,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod render;

use constants::AUTO_MOUNT_ID;
use dom::DomContainer;
use events::{PointerBinding, ResizeBinding};
use frame::RafScheduler;

type WebSession = BlastSession<DomContainer, GpuRenderer<'static>>;
type WebFrameLoop = FrameLoop<RafScheduler>;

thread_local! {
    static AUTO_MOUNTED: RefCell<Option<PixelBlast>> = const { RefCell::new(None) };
}

/// Animated dithered-noise background mounted into a container element.
///
/// Configuration is read once from the container's `data-*` attributes.
#[wasm_bindgen]
pub struct PixelBlast {
    mount: Mount,
}

#[wasm_bindgen]
impl PixelBlast {
    #[wasm_bindgen(constructor)]
    pub fn new(container: web::HtmlElement) -> Result<PixelBlast, JsValue> {
        Mount::attach(container)
            .map(|mount| PixelBlast { mount })
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    /// Stop the animation, detach every listener, release the GPU and remove
    /// the canvas. Safe to call more than once.
    pub fn dispose(&self) {
        self.mount.dispose();
    }
}

struct Mount {
    session: Rc<RefCell<WebSession>>,
    frame_loop: Rc<RefCell<WebFrameLoop>>,
    resize: RefCell<Option<ResizeBinding>>,
    pointer: RefCell<Option<PointerBinding>>,
}

impl Mount {
    fn attach(element: web::HtmlElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let config = dom::config_from_attributes(&element);
        let container = DomContainer::new(element.clone())?;
        let canvas = container.canvas().clone();
        let session = Rc::new(RefCell::new(BlastSession::attach(
            config,
            container,
            AnimationClock::randomized(Instant::now()),
        )));

        let resize_session = session.clone();
        let resize = ResizeBinding::observe(&element, move || {
            if let Ok(mut s) = resize_session.try_borrow_mut() {
                s.resize();
            }
        })?;

        let pointer_session = session.clone();
        let pointer = PointerBinding::listen(&canvas, move |client, rect| {
            if let Ok(mut s) = pointer_session.try_borrow_mut() {
                s.pointer_down(client, rect);
            }
        })?;

        let frame_loop = build_frame_loop(window, session.clone());
        frame_loop.borrow_mut().start();

        spawn_gpu_init(canvas, Rc::downgrade(&session));

        Ok(Self {
            session,
            frame_loop,
            resize: RefCell::new(Some(resize)),
            pointer: RefCell::new(Some(pointer)),
        })
    }

    fn dispose(&self) {
        if let Ok(mut lp) = self.frame_loop.try_borrow_mut() {
            lp.cancel();
        }
        if let Some(resize) = self.resize.borrow_mut().take() {
            resize.disconnect();
        }
        if let Some(pointer) = self.pointer.borrow_mut().take() {
            pointer.remove();
        }
        if let Ok(mut s) = self.session.try_borrow_mut() {
            s.dispose();
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn build_frame_loop(
    window: web::Window,
    session: Rc<RefCell<WebSession>>,
) -> Rc<RefCell<WebFrameLoop>> {
    Rc::new_cyclic(|weak: &Weak<RefCell<WebFrameLoop>>| {
        let weak = weak.clone();
        let tick = Closure::wrap(Box::new(move || {
            let Some(frame_loop) = weak.upgrade() else {
                return;
            };
            let Ok(mut lp) = frame_loop.try_borrow_mut() else {
                return;
            };
            lp.on_frame(|| match session.try_borrow_mut() {
                Ok(mut s) => match s.frame(Instant::now()) {
                    FrameOutcome::Stopped => FrameControl::Stop,
                    FrameOutcome::Drawn | FrameOutcome::Skipped => FrameControl::Continue,
                },
                Err(_) => FrameControl::Continue,
            });
        }) as Box<dyn FnMut()>);
        RefCell::new(FrameLoop::new(RafScheduler::new(window, tick)))
    })
}

fn spawn_gpu_init(canvas: web::HtmlCanvasElement, session: Weak<RefCell<WebSession>>) {
    spawn_local(async move {
        match render::init_renderer(canvas).await {
            Ok(gpu) => match session.upgrade() {
                Some(s) => {
                    s.borrow_mut().install_backend(gpu);
                }
                None => gpu.release(),
            },
            Err(e) => match session.upgrade() {
                Some(s) => s.borrow_mut().backend_failed(&e),
                None => log::warn!("[blast] gpu init error after dispose: {e}"),
            },
        }
    });
}

fn auto_mount() -> anyhow::Result<()> {
    let Some(document) = dom::window_document() else {
        return Ok(());
    };
    let Some(el) = document.get_element_by_id(AUTO_MOUNT_ID) else {
        log::debug!("no #{} element, skipping auto-mount", AUTO_MOUNT_ID);
        return Ok(());
    };
    let element: web::HtmlElement = el
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow!(format!("{:?}", e)))?;
    let mount = Mount::attach(element)?;
    AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = Some(PixelBlast { mount }));
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pixelblast-web starting");

    if let Err(e) = auto_mount() {
        log::error!("auto-mount error: {:?}", e);
    }
    Ok(())
}
