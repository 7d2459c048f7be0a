pub mod runner;

pub use runner::OrreryRunner;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before `orrery_init` succeeded.
fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Build the orrery. Either argument may be omitted to use the built-in
/// catalog or the default config. Invalid input rejects with the message.
#[wasm_bindgen]
pub fn orrery_init(catalog_json: Option<String>, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = OrreryRunner::from_json(catalog_json.as_deref(), config_json.as_deref()).map_err(|e| {
        let message = e.to_string();
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized");
    Ok(())
}

/// Advance by one browser frame of `dt` seconds.
#[wasm_bindgen]
pub fn orrery_tick(dt: f64) {
    with_runner(|r| r.tick(dt));
}

/// Queue a numeric command; see `Command::from_custom` for the codes.
#[wasm_bindgen]
pub fn orrery_command(kind: u32, a: f32, b: f32) -> bool {
    with_runner(|r| r.push_custom(kind, a, b)).unwrap_or(false)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

/// Copy of the output buffer, for hosts without direct memory access.
#[wasm_bindgen]
pub fn get_frame() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.buffer()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_target_name() -> String {
    with_runner(|r| r.target_name().to_string()).unwrap_or_default()
}

/// Per-body texture, color and glow as JSON; see `ShapeRegistry::to_json`.
#[wasm_bindgen]
pub fn get_materials() -> String {
    with_runner(|r| r.materials_json()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn get_mode() -> u32 {
    with_runner(|r| r.orrery().director().mode() as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_mode_count() -> u32 {
    with_runner(|r| r.orrery().director().mode_count() as u32).unwrap_or(0)
}
