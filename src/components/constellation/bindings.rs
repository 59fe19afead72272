//! Process-wide entry points.
//!
//! The page has one constellation, so one [`AnimationController`] lives in a
//! thread-local and every entry point (Rust or JS) goes through it.

use std::cell::RefCell;

use log::warn;
use wasm_bindgen::prelude::*;

use super::controller::{AnimationController, AnimationHandle, ControllerConfig};
use super::error::ConstellationError;
use super::host::WebHost;
use super::settings::Settings;

thread_local! {
	static CONTROLLER: RefCell<Option<AnimationController<WebHost>>> = const { RefCell::new(None) };
}

/// Runs `f` with the page controller, creating it on first use.
/// Returns `None` when there is no browser window.
fn with_controller<R>(f: impl FnOnce(&mut AnimationController<WebHost>) -> R) -> Option<R> {
	CONTROLLER.with(|slot| {
		let mut slot = slot.borrow_mut();
		if slot.is_none() {
			let host = WebHost::new()?;
			*slot = Some(AnimationController::new(host, ControllerConfig::default()));
		}
		slot.as_mut().map(f)
	})
}

/// Starts the constellation, replacing any running instance.
pub fn start(settings: &Settings) -> Result<Option<AnimationHandle<WebHost>>, ConstellationError> {
	with_controller(|c| c.start(settings)).transpose()
}

/// Stops and restarts with new settings.
pub fn restart_with_settings(
	settings: &Settings,
) -> Result<Option<AnimationHandle<WebHost>>, ConstellationError> {
	with_controller(|c| c.restart_with_settings(settings)).transpose()
}

/// Stops the running instance, if any.
pub fn stop() {
	with_controller(|c| c.stop());
}

/// JS-facing handle to a started constellation.
#[wasm_bindgen]
pub struct ConstellationHandle {
	inner: Option<AnimationHandle<WebHost>>,
}

#[wasm_bindgen]
impl ConstellationHandle {
	/// Stops this instance unless a newer one has replaced it.
	pub fn stop(&self) {
		if let Some(handle) = &self.inner {
			handle.stop();
		}
	}

	/// Whether this instance is still the one running.
	#[wasm_bindgen(getter)]
	pub fn active(&self) -> bool {
		self.inner.as_ref().is_some_and(|h| h.is_active())
	}
}

fn parse(settings_json: Option<String>) -> Result<Settings, JsValue> {
	Settings::from_json(settings_json.as_deref().unwrap_or("")).map_err(|e| {
		warn!("constellation: {}", e);
		JsValue::from_str(&e.to_string())
	})
}

/// Starts the constellation from a JSON settings object.
#[wasm_bindgen(js_name = drawConstellation)]
pub fn draw_constellation(settings_json: Option<String>) -> Result<ConstellationHandle, JsValue> {
	let settings = parse(settings_json)?;
	let inner = start(&settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
	Ok(ConstellationHandle { inner })
}

/// Restarts the constellation with new settings.
#[wasm_bindgen(js_name = updateConstellationSettings)]
pub fn update_constellation_settings(
	settings_json: Option<String>,
) -> Result<ConstellationHandle, JsValue> {
	let settings = parse(settings_json)?;
	let inner = restart_with_settings(&settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
	Ok(ConstellationHandle { inner })
}

/// Stops the constellation.
#[wasm_bindgen(js_name = stopConstellation)]
pub fn stop_constellation() {
	stop();
}
