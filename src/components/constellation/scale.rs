//! Canvas-size dependent scaling of point count and connection distance.
//!
//! Two formulas are supported:
//!
//! - [`SizingStrategy::DensityArea`]: normalizes against a 600×600 reference
//!   canvas so visual density stays roughly constant. Degrades well on very
//!   large or non-square canvases.
//! - [`SizingStrategy::WidthOnly`]: derives both values from the canvas width
//!   alone.

use serde::Deserialize;

/// Edge length of the reference canvas the density formula is tuned for.
pub const REFERENCE_EDGE: f64 = 600.0;
/// Point count on the reference canvas at `multiplier = 1`.
pub const BASE_POINT_COUNT: f64 = 72.0;
/// Connection distance on the reference canvas at `distance = 1`.
pub const BASE_DISTANCE: f64 = 120.0;
/// Pixels of width per point in the width-only formula.
pub const WIDTH_DIVISOR: f64 = 5.0;

/// Selects how point count and connection distance follow canvas size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingStrategy {
	/// Count and distance scale with the square root of the canvas area.
	#[default]
	DensityArea,
	/// Count and distance scale with the canvas width only.
	WidthOnly,
}

/// Point count and connection threshold for one canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Targets {
	/// Number of points to keep.
	pub point_count: usize,
	/// Connection threshold in pixels.
	pub max_distance: f64,
}

/// `sqrt(area / reference_area)`; 1.0 for a 600×600 canvas.
pub fn density_scale(width: f64, height: f64) -> f64 {
	((width * height) / (REFERENCE_EDGE * REFERENCE_EDGE)).sqrt()
}

impl SizingStrategy {
	/// Computes targets for a canvas. Negative or NaN counts saturate to 0.
	pub fn targets(self, width: f64, height: f64, multiplier: f64, distance: f64) -> Targets {
		match self {
			SizingStrategy::DensityArea => {
				let scale = density_scale(width, height);
				Targets {
					point_count: (BASE_POINT_COUNT * scale * multiplier).floor() as usize,
					max_distance: BASE_DISTANCE * scale * distance,
				}
			}
			SizingStrategy::WidthOnly => {
				let base = (width / WIDTH_DIVISOR).floor();
				Targets {
					point_count: (base * multiplier).floor() as usize,
					max_distance: base * distance,
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reference_canvas_gives_base_values() {
		let t = SizingStrategy::DensityArea.targets(600.0, 600.0, 1.0, 1.0);
		assert_eq!(t.point_count, 72);
		assert_eq!(t.max_distance, 120.0);
	}

	#[test]
	fn density_scales_with_linear_size() {
		let t = SizingStrategy::DensityArea.targets(1200.0, 1200.0, 1.0, 0.5);
		assert_eq!(t.point_count, 144);
		assert_eq!(t.max_distance, 120.0);

		// 800x450: scale = sqrt(360000/360000) = 1
		let wide = SizingStrategy::DensityArea.targets(800.0, 450.0, 1.5, 1.0);
		assert_eq!(wide.point_count, 108);
	}

	#[test]
	fn width_only_ignores_height() {
		let a = SizingStrategy::WidthOnly.targets(503.0, 10.0, 2.0, 1.5);
		let b = SizingStrategy::WidthOnly.targets(503.0, 9000.0, 2.0, 1.5);
		assert_eq!(a, b);
		assert_eq!(a.point_count, 200);
		assert_eq!(a.max_distance, 150.0);
	}

	#[test]
	fn degenerate_inputs_saturate_to_zero_points() {
		assert_eq!(SizingStrategy::DensityArea.targets(0.0, 0.0, 1.0, 1.0).point_count, 0);
		assert_eq!(SizingStrategy::DensityArea.targets(600.0, 600.0, -3.0, 1.0).point_count, 0);
		assert_eq!(SizingStrategy::WidthOnly.targets(4.0, 600.0, 1.0, 1.0).max_distance, 0.0);
	}

	#[test]
	fn strategy_deserializes_kebab_case() {
		let s: SizingStrategy = serde_json::from_str("\"width-only\"").unwrap();
		assert_eq!(s, SizingStrategy::WidthOnly);
	}
}
