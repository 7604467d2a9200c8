use std::cell::RefCell;
use wasm_bindgen::prelude::*;

mod animation;
mod canvas;
pub mod config;
pub mod error;
pub mod sky;

pub use animation::AnimationHandle;
use canvas::{find_canvas, CanvasSurface};
use config::SkyConfig;
use error::SkyError;
use sky::{FrameOutcome, Sky};

thread_local! {
    static SKY: RefCell<Option<Sky>> = RefCell::new(None);
}

fn with_sky_mut<R>(f: impl FnOnce(&mut Sky) -> R) -> Result<R, SkyError> {
    SKY.with(|cell| {
        let mut opt = cell.borrow_mut();
        match opt.as_mut() {
            Some(sky) => Ok(f(sky)),
            None => Err(SkyError::NotInitialized),
        }
    })
}

fn install(mut sky: Sky, width: f64, height: f64) {
    sky.initialize(width, height);
    SKY.with(|s| {
        *s.borrow_mut() = Some(sky);
    });
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Already installed when the module is re-instantiated.
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn init_sky(seed: u64, width: f64, height: f64) {
    install(Sky::new(seed), width, height);
}

#[wasm_bindgen]
pub fn init_sky_with_config(
    seed: u64,
    width: f64,
    height: f64,
    config_json: &str,
) -> Result<(), JsValue> {
    let config = SkyConfig::from_json(config_json)?;
    install(Sky::with_config(seed, config)?, width, height);
    Ok(())
}

/// Rebuilds stars and bodies for the new viewport.
#[wasm_bindgen]
pub fn resize(width: f64, height: f64) -> Result<(), JsValue> {
    with_sky_mut(|sky| sky.initialize(width, height))?;
    Ok(())
}

/// Draws one frame on the canvas with id `canvas_id`. Returns `false` when
/// the frame was skipped for lack of a usable viewport.
#[wasm_bindgen]
pub fn render_frame(canvas_id: &str, now_ms: f64) -> Result<bool, JsValue> {
    let canvas = find_canvas(canvas_id)?;
    let mut surface = CanvasSurface::from_canvas(&canvas)?;
    let outcome = with_sky_mut(|sky| sky.tick(now_ms, &mut surface))?;
    Ok(outcome == FrameOutcome::Rendered)
}

/// Renders one frame into a command list and returns it as JSON.
#[wasm_bindgen]
pub fn frame_json(now_ms: f64) -> String {
    match with_sky_mut(|sky| sky.frame(now_ms).1.to_json()) {
        Ok(v) => v,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[wasm_bindgen]
pub fn rotation() -> f64 {
    with_sky_mut(|sky| sky.rotation()).unwrap_or(0.0)
}

/// Starts a self-scheduling loop on `canvas_id` that follows window resizes.
#[wasm_bindgen]
pub fn run_on_canvas(canvas_id: &str, seed: u64) -> Result<AnimationHandle, JsValue> {
    Ok(animation::run(canvas_id, seed, SkyConfig::default())?)
}

#[wasm_bindgen]
pub fn run_on_canvas_with_config(
    canvas_id: &str,
    seed: u64,
    config_json: &str,
) -> Result<AnimationHandle, JsValue> {
    let config = SkyConfig::from_json(config_json)?;
    Ok(animation::run(canvas_id, seed, config)?)
}
