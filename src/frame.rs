use crate::Shared;
use sonify_core::{DepthField, MeasureRequest, SonifyError, Viewport};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct FrameContext {
    pub shared: Weak<Shared>,
}

impl FrameContext {
    /// Returns false once the session has been dropped.
    pub fn frame(&mut self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let now = shared.now_ms();
        let request = shared.session.borrow_mut().frame_update(now);
        if let Some(req) = request {
            spawn_local(async move {
                measure_and_install(shared, req).await;
            });
        }
        true
    }
}

/// Run one GPU measurement for `req` and hand the field to the session,
/// which drops it if another request superseded this one meanwhile.
async fn measure_and_install(shared: Rc<Shared>, req: MeasureRequest) {
    let Some(gpu) = shared.gpu.clone() else {
        let err = SonifyError::SurfaceUnavailable("no WebGPU device".into());
        shared.session.borrow_mut().measurement_failed(req.epoch, err);
        return;
    };
    let viewport = Viewport::new(shared.canvas.width(), shared.canvas.height());
    let (camera, model) = {
        let scene = shared.scene.borrow();
        let mut camera = scene.camera.clone();
        camera.aspect = viewport.aspect();
        (camera, scene.model)
    };
    if model.is_empty() {
        log::debug!("[measure] no model bounds yet");
    }
    match gpu
        .measure(&camera, &model, viewport.width, viewport.height)
        .await
    {
        Ok(m) => {
            let field = DepthField::new(m.image, m.range, &camera, &model, req.preset);
            let installed = shared.session.borrow_mut().install_field(req.epoch, field);
            if installed {
                log::info!("[measure] epoch {} ready", req.epoch);
            }
        }
        Err(e) => {
            let err = SonifyError::GpuResource(format!("{e:#}"));
            if shared.session.borrow_mut().measurement_failed(req.epoch, err) {
                log::warn!("[measure] epoch {} failed, session stopped", req.epoch);
            }
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if frame_ctx_tick.borrow_mut().frame() {
            request_frame(&tick_clone);
        } else {
            log::info!("[frame] session dropped, loop stopped");
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
