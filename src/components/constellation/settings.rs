//! Settings accepted from the host page and their resolved form.

use serde::Deserialize;

use super::color::{Rgb, parse_hex};
use super::error::ConstellationError;
use super::scale::SizingStrategy;

/// Colour used when `color1` is missing or null.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// What happens to existing points when the canvas is reconfigured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReseedPolicy {
	/// Re-randomize every point's position and velocity.
	#[default]
	Always,
	/// Keep points, scaling positions proportionally into the new bounds.
	Preserve,
}

/// Effect settings as supplied by the page. Every field is optional;
/// missing or `null` values fall back to defaults on [`Settings::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Hex colour for points and connections (e.g. `"#ffffff"`).
	pub color1: Option<String>,
	/// Scale factor for the point count.
	pub multiplier: Option<f64>,
	/// Scale factor for the connection distance.
	pub distance: Option<f64>,
	/// Point radius and line width.
	pub size: Option<f64>,
	/// Scale factor for velocity magnitude.
	pub speed: Option<f64>,
	/// Which canvas-size formula to use.
	pub sizing: Option<SizingStrategy>,
	/// Resize behaviour for existing points.
	pub reseed: Option<ReseedPolicy>,
}

impl Settings {
	/// Parses settings JSON. Empty input yields all defaults.
	pub fn from_json(json: &str) -> Result<Self, ConstellationError> {
		if json.trim().is_empty() {
			return Ok(Self::default());
		}
		Ok(serde_json::from_str(json)?)
	}

	/// Applies defaults and parses the colour.
	pub fn resolve(&self) -> Result<Params, ConstellationError> {
		let color = parse_hex(self.color1.as_deref().unwrap_or(DEFAULT_COLOR))?;
		Ok(Params {
			color,
			multiplier: self.multiplier.unwrap_or(1.0),
			distance: self.distance.unwrap_or(1.0),
			size: self.size.unwrap_or(1.0),
			speed: self.speed.unwrap_or(1.0),
			sizing: self.sizing.unwrap_or_default(),
			reseed: self.reseed.unwrap_or_default(),
		})
	}
}

/// Immutable parameters for one animation instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
	/// Colour of points and connections.
	pub color: Rgb,
	/// Point count factor.
	pub multiplier: f64,
	/// Connection distance factor.
	pub distance: f64,
	/// Point radius and line width.
	pub size: f64,
	/// Velocity factor.
	pub speed: f64,
	/// Canvas-size formula.
	pub sizing: SizingStrategy,
	/// Resize behaviour for existing points.
	pub reseed: ReseedPolicy,
}

impl Default for Params {
	fn default() -> Self {
		Self {
			color: Rgb::WHITE,
			multiplier: 1.0,
			distance: 1.0,
			size: 1.0,
			speed: 1.0,
			sizing: SizingStrategy::default(),
			reseed: ReseedPolicy::default(),
		}
	}
}
