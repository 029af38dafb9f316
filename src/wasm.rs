use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::surface::MountedScene;

/// Canvas-mounted bubble subsystem.
///
/// The JS host owns the `requestAnimationFrame` loop and the three range
/// sliders; each slider's `onSlide` forwards into the matching setter here,
/// and every animation frame calls [`WasmBubble::render`] with the frame
/// timestamp. `destroy` tears the subsystem down and releases the GPU
/// context; calls after that are no-ops.
#[wasm_bindgen]
pub struct WasmBubble {
    inner: Rc<RefCell<Option<MountedScene>>>,
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
impl WasmBubble {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        panic!("Use create_bubble async constructor");
    }

    /// Speed slider sink, value in [1,10] (clamped).
    pub fn set_speed(&self, value: f32) {
        if let Some(mounted) = self.inner.borrow_mut().as_mut() {
            mounted.params_mut().set_speed(value);
        }
    }

    /// Spikes slider sink, value in [1,10] (clamped).
    pub fn set_spikes(&self, value: f32) {
        if let Some(mounted) = self.inner.borrow_mut().as_mut() {
            mounted.params_mut().set_spikes(value);
        }
    }

    /// Processing slider sink, value in [1,10] (clamped).
    pub fn set_processing(&self, value: f32) {
        if let Some(mounted) = self.inner.borrow_mut().as_mut() {
            mounted.params_mut().set_processing(value);
        }
    }

    /// Container-size-change notification, in physical pixels.
    pub fn resize(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(mounted) = self.inner.borrow_mut().as_mut() {
            mounted.resize(width, height);
        }
    }

    /// Run one scheduler tick at the host timestamp (milliseconds).
    pub fn render(&self, now_ms: f64) {
        let mut inner = self.inner.borrow_mut();
        let Some(mounted) = inner.as_mut() else {
            return;
        };
        if mounted.token().is_cancelled() {
            return;
        }
        mounted.render_tick(now_ms);
    }

    /// Cancel the loop and release all GPU resources.
    pub fn destroy(&self) {
        if let Some(mounted) = self.inner.borrow_mut().take() {
            mounted.teardown();
        }
    }
}

/// Mount the subsystem onto a canvas.
///
/// The output buffer is sized to the canvas client size scaled by the device
/// pixel ratio. Initialization failure (no WebGPU/WebGL context, no adapter)
/// rejects the promise; the caller must not start the frame loop.
#[wasm_bindgen]
pub async fn create_bubble(canvas: HtmlCanvasElement) -> Result<WasmBubble, JsValue> {
    init_panic_hook();

    let pixel_ratio = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    let width = (canvas.client_width().max(1) as f64 * pixel_ratio) as u32;
    let height = (canvas.client_height().max(1) as f64 * pixel_ratio) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    let mounted = MountedScene::initialize(target, width, height)
        .await
        .map_err(|e| JsValue::from_str(&format!("Failed to mount bubble scene: {:#}", e)))?;

    Ok(WasmBubble {
        inner: Rc::new(RefCell::new(Some(mounted))),
    })
}
