//! constellation-bg: animated particle-network background for a canvas.
//!
//! This crate provides a WASM canvas effect that draws drifting points and
//! links nearby ones with fading lines. It can be mounted as a Leptos
//! component or driven from plain JavaScript through the exported
//! `drawConstellation` / `updateConstellationSettings` / `stopConstellation`
//! functions.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

#[cfg(target_arch = "wasm32")]
use getrandom as _;
#[cfg(test)]
use proptest as _;

pub mod components;

pub use components::constellation::{ConstellationCanvas, Settings};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("constellation: logging initialized");
}

/// Load settings from a script element with id="constellation-settings".
/// Expected format: JSON with any of { color1, multiplier, distance, size, speed }.
fn load_settings() -> Option<Settings> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("constellation-settings")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match Settings::from_json(&json_text) {
		Ok(settings) => {
			info!("constellation: loaded settings {:?}", settings);
			Some(settings)
		}
		Err(e) => {
			warn!("constellation: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads settings from the DOM and renders the full-page background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let settings = load_settings().unwrap_or_default();
	let settings_signal = Signal::derive(move || settings.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Constellation" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-constellation">
			<ConstellationCanvas settings=settings_signal />
		</div>
	}
}
