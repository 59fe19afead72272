//! Leptos component mounting the constellation canvas.
//!
//! The component renders the canvas inside a container element and restarts
//! the page-wide controller whenever the settings signal changes. The
//! controller resolves the canvas by id, so the element must be mounted
//! before the effect runs, which Leptos guarantees.

use leptos::prelude::*;
use log::warn;

use super::bindings;
use super::controller::{DEFAULT_CANVAS_ID, RESERVED_CONTAINER_ID};
use super::settings::Settings;

/// Renders the animated background.
///
/// With `fixed = true` the canvas sits in the reserved container and is
/// pinned to 600×600; otherwise it fills its container and follows window
/// resizes.
#[component]
pub fn ConstellationCanvas(
	#[prop(into)] settings: Signal<Settings>,
	#[prop(default = false)] fixed: bool,
) -> impl IntoView {
	Effect::new(move |_| {
		let settings = settings.get();
		if let Err(e) = bindings::restart_with_settings(&settings) {
			warn!("constellation: not started: {}", e);
		}
	});

	on_cleanup(bindings::stop);

	let container_id = if fixed {
		RESERVED_CONTAINER_ID
	} else {
		"constellation"
	};

	view! {
		<div id=container_id class="constellation-container" style="position: relative; width: 100%; height: 100%;">
			<canvas id=DEFAULT_CANVAS_ID class="constellation-canvas" style="display: block;" />
		</div>
	}
}
