//! Per-frame drawing for the constellation.
//!
//! A frame runs in a fixed order:
//! 1. Clear the surface
//! 2. Advance the particle system
//! 3. Rebuild the spatial grid
//! 4. Collect connections from 3×3 neighbourhoods
//! 5. Stroke connections, fading linearly with distance
//! 6. Fill every point

use std::collections::HashSet;

use super::color::Rgb;
use super::error::SurfaceError;
use super::grid::SpatialGrid;
use super::particles::{ParticleSystem, Point};
use super::settings::Params;
use super::surface::Surface;

/// A pair of points to join with a line, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
	/// Index of the first point.
	pub a: usize,
	/// Index of the second point, always greater than `a`.
	pub b: usize,
	/// 1.0 at zero distance, approaching 0.0 at the threshold.
	pub alpha: f64,
}

/// Stroke and fill settings derived from [`Params`].
#[derive(Clone, Debug, PartialEq)]
pub struct PaintStyle {
	/// Base colour for strokes.
	pub color: Rgb,
	/// Pre-rendered `#rrggbb` for point fills.
	pub fill: String,
	/// Stroke width in pixels.
	pub line_width: f64,
	/// Circle radius in pixels.
	pub point_radius: f64,
}

impl PaintStyle {
	/// Derives a style from resolved parameters.
	pub fn new(params: &Params) -> Self {
		Self {
			color: params.color,
			fill: params.color.to_css(),
			line_width: params.size,
			point_radius: params.size,
		}
	}
}

/// Counts from one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	/// Points drawn.
	pub points: usize,
	/// Connections drawn.
	pub connections: usize,
}

/// Finds every pair closer than `max_distance`, each pair once.
pub fn collect_connections(
	points: &[Point],
	grid: &SpatialGrid,
	max_distance: f64,
) -> Vec<Connection> {
	let max_distance_sq = max_distance * max_distance;
	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	let mut connections = Vec::new();

	for (i, p) in points.iter().enumerate() {
		for j in grid.nearby(i) {
			if j <= i || j >= points.len() {
				continue;
			}
			if !seen.insert((i, j)) {
				continue;
			}

			let q = &points[j];
			let (dx, dy) = (p.x - q.x, p.y - q.y);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq < max_distance_sq {
				connections.push(Connection {
					a: i,
					b: j,
					alpha: 1.0 - dist_sq.sqrt() / max_distance,
				});
			}
		}
	}

	connections
}

/// Advances the simulation one step and draws it.
pub fn render_frame<S: Surface>(
	system: &mut ParticleSystem,
	grid: &mut SpatialGrid,
	style: &PaintStyle,
	surface: &mut S,
) -> Result<FrameStats, SurfaceError> {
	surface.clear(system.width(), system.height());

	system.step();
	grid.rebuild(system.points());

	let points = system.points();
	let connections = collect_connections(points, grid, system.max_distance());

	surface.set_line_width(style.line_width);
	for c in &connections {
		let (from, to) = (&points[c.a], &points[c.b]);
		surface.set_stroke_color(&style.color.to_css_rgba(c.alpha));
		surface.stroke_line((from.x, from.y), (to.x, to.y))?;
	}

	surface.set_fill_color(&style.fill);
	for p in points {
		surface.fill_circle(p.x, p.y, style.point_radius)?;
	}

	Ok(FrameStats {
		points: points.len(),
		connections: connections.len(),
	})
}
