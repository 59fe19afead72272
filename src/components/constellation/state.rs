//! Simulation state for one animation instance.
//!
//! A [`Scene`] bundles the particle system, its spatial grid, the paint
//! style and the drawing surface. It is created on start, resized by the
//! debounced resize handler and rendered once per frame.

use rand::rngs::SmallRng;

use super::error::SurfaceError;
use super::grid::SpatialGrid;
use super::particles::ParticleSystem;
use super::render::{self, FrameStats, PaintStyle};
use super::settings::Params;
use super::surface::Surface;

/// Everything one running instance draws with.
pub struct Scene<S: Surface> {
	/// Point positions and velocities.
	pub system: ParticleSystem,
	/// Neighbour index, rebuilt each frame.
	pub grid: SpatialGrid,
	/// Stroke and fill settings.
	pub style: PaintStyle,
	surface: S,
	frames: u64,
}

impl<S: Surface> Scene<S> {
	/// Seeds points for a `width`×`height` canvas and sizes the grid.
	pub fn new(params: &Params, surface: S, width: f64, height: f64, rng: SmallRng) -> Self {
		let system = ParticleSystem::new(*params, width, height, rng);
		let mut grid = SpatialGrid::new();
		grid.configure(width, height, system.max_distance());
		Self {
			system,
			grid,
			style: PaintStyle::new(params),
			surface,
			frames: 0,
		}
	}

	/// Reconfigures points and grid for a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.system.reconfigure(width, height);
		self.grid
			.configure(width, height, self.system.max_distance());
	}

	/// Steps the simulation and draws one frame.
	pub fn render_frame(&mut self) -> Result<FrameStats, SurfaceError> {
		let stats = render::render_frame(
			&mut self.system,
			&mut self.grid,
			&self.style,
			&mut self.surface,
		)?;
		self.frames += 1;
		Ok(stats)
	}

	/// Frames rendered successfully so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}
}
