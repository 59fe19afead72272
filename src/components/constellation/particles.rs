//! Point state and motion for the constellation.

use rand::Rng;
use rand::distributions::Standard;
use rand::rngs::SmallRng;

use super::settings::{Params, ReseedPolicy};

/// Velocity magnitude per axis at `speed = 1` is at most half of this.
const VELOCITY_SPREAD: f64 = 1.5;

/// A single moving point, in canvas pixels and pixels per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
}

/// Owns the points and the size-derived connection threshold.
pub struct ParticleSystem {
	points: Vec<Point>,
	width: f64,
	height: f64,
	max_distance: f64,
	params: Params,
	rng: SmallRng,
}

impl ParticleSystem {
	/// Creates a system populated for a `width`×`height` canvas.
	pub fn new(params: Params, width: f64, height: f64, rng: SmallRng) -> Self {
		let mut system = Self {
			points: Vec::new(),
			width,
			height,
			max_distance: 0.0,
			params,
			rng,
		};
		system.reconfigure(width, height);
		system
	}

	/// Current points, in creation order.
	pub fn points(&self) -> &[Point] {
		&self.points
	}

	/// Number of points.
	pub fn point_count(&self) -> usize {
		self.points.len()
	}

	/// Current connection threshold (MAX_DISTANCE).
	pub fn max_distance(&self) -> f64 {
		self.max_distance
	}

	/// Canvas width the points were laid out for.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Canvas height the points were laid out for.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Recomputes targets for a new canvas size and reconciles the point set.
	///
	/// Existing points are re-randomized or rescaled depending on
	/// [`ReseedPolicy`]; the tail is then padded with fresh points or
	/// truncated. Calling this twice with the same size never changes the
	/// point count.
	pub fn reconfigure(&mut self, width: f64, height: f64) {
		let targets = self.params.sizing.targets(
			width,
			height,
			self.params.multiplier,
			self.params.distance,
		);

		let (old_width, old_height) = (self.width, self.height);
		self.width = width;
		self.height = height;

		let rescale = self.params.reseed == ReseedPolicy::Preserve
			&& old_width > 0.0
			&& old_height > 0.0;
		if rescale {
			let (sx, sy) = (width / old_width, height / old_height);
			for p in &mut self.points {
				p.x *= sx;
				p.y *= sy;
			}
		} else {
			for i in 0..self.points.len() {
				self.points[i] = self.random_point();
			}
		}

		while self.points.len() < targets.point_count {
			let p = self.random_point();
			self.points.push(p);
		}
		self.points.truncate(targets.point_count);

		self.max_distance = targets.max_distance;
	}

	/// Advances every point by its velocity, flipping velocity components
	/// for points outside the canvas. Positions are never clamped.
	pub fn step(&mut self) {
		for p in &mut self.points {
			p.x += p.vx;
			p.y += p.vy;

			if p.x < 0.0 || p.x > self.width {
				p.vx = -p.vx;
			}
			if p.y < 0.0 || p.y > self.height {
				p.vy = -p.vy;
			}
		}
	}

	fn random_point(&mut self) -> Point {
		let speed = self.params.speed;
		let x = self.unit() * self.width;
		let y = self.unit() * self.height;
		let vx = (self.unit() - 0.5) * VELOCITY_SPREAD * speed;
		let vy = (self.unit() - 0.5) * VELOCITY_SPREAD * speed;
		Point { x, y, vx, vy }
	}

	/// Uniform sample in `[0, 1)`.
	fn unit(&mut self) -> f64 {
		self.rng.sample(Standard)
	}
}
