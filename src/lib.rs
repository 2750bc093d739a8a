#![cfg(target_arch = "wasm32")]
use glam::Vec3;
use instant::Instant;
use sonify_core::{
    Aabb, Camera, CameraPreset, Projection, Sonifier, SonifyConfig, SonifyMode,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod input;
mod intro;
mod render;
mod timer;

use audio::WebAudioOutput;
use render::DepthMeasurer;
use timer::IntervalTimer;

pub(crate) type Session = Sonifier<WebAudioOutput, IntervalTimer>;

/// Host scene as last reported through the handle.
pub(crate) struct Scene {
    pub(crate) camera: Camera,
    pub(crate) model: Aabb,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, 5.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect: 1.0,
                projection: Projection::Perspective {
                    fovy_radians: std::f32::consts::FRAC_PI_4,
                },
                znear: 0.1,
                zfar: 100.0,
            },
            model: Aabb::new(Vec3::ZERO, Vec3::ZERO),
        }
    }
}

/// Everything the event callbacks share. Single-threaded: each callback
/// borrows the session for its whole run.
pub(crate) struct Shared {
    pub(crate) session: RefCell<Session>,
    pub(crate) scene: RefCell<Scene>,
    pub(crate) gpu: Option<Rc<DepthMeasurer>>,
    pub(crate) intro: intro::IntroNarration,
    pub(crate) canvas: web::HtmlCanvasElement,
    clock: Instant,
}

impl Shared {
    pub(crate) fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sonify-web starting");
    Ok(())
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Build a sonifier bound to the host's canvas. `intro_url` points at the
/// narration played by `play_intro`.
#[wasm_bindgen]
pub async fn create_sonifier(
    canvas_id: String,
    intro_url: Option<String>,
) -> Result<SonifyHandle, JsValue> {
    init(canvas_id, intro_url)
        .await
        .map_err(|e| JsValue::from_str(&format!("{:?}", e)))
}

async fn init(canvas_id: String, intro_url: Option<String>) -> anyhow::Result<SonifyHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, &canvas_id)?;
    dom::sync_canvas_backing_size(&canvas);

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let gpu = match DepthMeasurer::new().await {
        Ok(g) => Some(Rc::new(g)),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    };

    let config = SonifyConfig {
        intro_url,
        ..SonifyConfig::default()
    };
    let intro = intro::IntroNarration::new(config.intro_url.as_deref());

    let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
        let weak = weak.clone();
        let timer = IntervalTimer::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.session.borrow_mut().scan_tick();
            }
        });
        Shared {
            session: RefCell::new(Sonifier::new(
                WebAudioOutput::new(audio_ctx),
                timer,
                config,
            )),
            scene: RefCell::new(Scene::default()),
            gpu,
            intro,
            canvas,
            clock: Instant::now(),
        }
    });

    events::wire_input_handlers(&shared);
    frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
        shared: Rc::downgrade(&shared),
    })));
    log::info!("[sonify] ready on #{}", canvas_id);
    Ok(SonifyHandle { shared })
}

/// Handle the host viewer drives: toggles, mode, camera preset, model and
/// camera updates, and read-back of the session state.
#[wasm_bindgen]
pub struct SonifyHandle {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl SonifyHandle {
    pub fn set_active(&self, on: bool) -> Result<(), JsValue> {
        self.shared.session.borrow_mut().set_active(on).map_err(js_err)
    }

    pub fn set_scanning(&self, on: bool) -> Result<(), JsValue> {
        self.shared
            .session
            .borrow_mut()
            .set_scanning(on)
            .map_err(js_err)
    }

    /// Panel visibility. Hiding the panel also stops the narration.
    pub fn set_visible(&self, visible: bool) {
        self.shared.session.borrow_mut().set_visible(visible);
        if !visible {
            self.shared.intro.play(false);
        }
    }

    /// 0 = frequency, 1 = beep. Returns false when the mode was already set.
    pub fn set_mode(&self, mode: u8) -> Result<bool, JsValue> {
        let mode = SonifyMode::try_from(mode).map_err(js_err)?;
        Ok(self.shared.session.borrow_mut().set_mode(mode))
    }

    /// 0..=5 = left, right, top, bottom, front, back.
    pub fn set_camera_preset(&self, preset: u8) -> Result<(), JsValue> {
        let preset = CameraPreset::try_from(preset).map_err(js_err)?;
        self.shared.session.borrow_mut().set_camera_preset(preset);
        Ok(())
    }

    pub fn play_intro(&self, on: bool) {
        self.shared.intro.play(on);
    }

    /// Upload the model mesh (flat xyz positions, triangle list) and take its
    /// bounds from the positions.
    pub fn set_model(&self, positions: Vec<f32>, indices: Vec<u32>) -> Result<(), JsValue> {
        let Some(gpu) = &self.shared.gpu else {
            return Err(js_err("WebGPU unavailable"));
        };
        gpu.set_mesh(&positions, &indices);
        if let Some((min, max)) = input::positions_bounds(&positions) {
            self.shared.scene.borrow_mut().model = Aabb::new(min, max);
        }
        self.shared.session.borrow_mut().scene_changed();
        Ok(())
    }

    /// Override the model bounds, e.g. with the host's own bounding box.
    pub fn set_model_bounds(&self, min: Vec<f32>, max: Vec<f32>) -> Result<(), JsValue> {
        let min = input::vec3_arg("min", &min).map_err(js_err)?;
        let max = input::vec3_arg("max", &max).map_err(js_err)?;
        self.shared.scene.borrow_mut().model = Aabb::new(min, max);
        self.shared.session.borrow_mut().scene_changed();
        Ok(())
    }

    /// Perspective host camera. Picked up by the next range recompute.
    pub fn set_camera(
        &self,
        eye: Vec<f32>,
        target: Vec<f32>,
        up: Vec<f32>,
        fovy_degrees: f32,
        near: f32,
        far: f32,
    ) -> Result<(), JsValue> {
        self.update_camera(
            &eye,
            &target,
            &up,
            Projection::Perspective {
                fovy_radians: fovy_degrees.to_radians(),
            },
            near,
            far,
        )
    }

    /// Orthographic host camera with `height` world units visible vertically.
    pub fn set_camera_orthographic(
        &self,
        eye: Vec<f32>,
        target: Vec<f32>,
        up: Vec<f32>,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<(), JsValue> {
        self.update_camera(
            &eye,
            &target,
            &up,
            Projection::Orthographic { height },
            near,
            far,
        )
    }

    /// Ask for a fresh depth range now, e.g. after the host moved the camera.
    pub fn refresh(&self) {
        self.shared.session.borrow_mut().scene_changed();
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.shared.session.borrow().active()
    }

    #[wasm_bindgen(getter)]
    pub fn scanning(&self) -> bool {
        self.shared.session.borrow().scanning()
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> u8 {
        self.shared.session.borrow().mode() as u8
    }

    /// Current scanline position `[x, y]` in canvas pixels.
    pub fn scanline(&self) -> Vec<f32> {
        self.shared.session.borrow().scanline().to_array().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn intro_is_playing(&self) -> bool {
        let visible = self.shared.session.borrow().visible();
        self.shared.intro.is_audible(visible)
    }
}

impl SonifyHandle {
    fn update_camera(
        &self,
        eye: &[f32],
        target: &[f32],
        up: &[f32],
        projection: Projection,
        near: f32,
        far: f32,
    ) -> Result<(), JsValue> {
        let camera = Camera {
            eye: input::vec3_arg("eye", eye).map_err(js_err)?,
            target: input::vec3_arg("target", target).map_err(js_err)?,
            up: input::vec3_arg("up", up).map_err(js_err)?,
            aspect: 1.0,
            projection,
            znear: near,
            zfar: far,
        };
        self.shared.scene.borrow_mut().camera = camera;
        Ok(())
    }
}
