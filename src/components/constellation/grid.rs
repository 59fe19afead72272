//! Uniform spatial grid for neighbour queries.
//!
//! Cells are square with side equal to the connection threshold, so any two
//! points closer than the threshold sit in the same or adjacent cells. A
//! 3×3 neighbourhood lookup therefore never misses a connection.

use super::particles::Point;

/// Upper bound on bucket count. Finer grids fall back to a full scan.
const MAX_CELLS: usize = 1 << 20;

/// Buckets point indices by cell, rebuilt every frame.
#[derive(Debug, Default)]
pub struct SpatialGrid {
	cell_size: f64,
	cols: usize,
	rows: usize,
	cells: Vec<Vec<usize>>,
	/// Cell coordinates of every point at the last rebuild, in range or not.
	point_cells: Vec<(i64, i64)>,
	available: bool,
}

impl SpatialGrid {
	/// An unconfigured, unavailable grid.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sizes the grid for a canvas. Degenerate geometry leaves the grid
	/// unavailable, and [`nearby`](Self::nearby) falls back to a full scan.
	pub fn configure(&mut self, width: f64, height: f64, cell_size: f64) {
		self.cell_size = cell_size;
		self.cells.clear();
		self.point_cells.clear();

		if !(cell_size > 0.0 && cell_size.is_finite()) {
			self.cols = 0;
			self.rows = 0;
			self.available = false;
			return;
		}

		let cols = (width / cell_size).ceil();
		let rows = (height / cell_size).ceil();
		self.cols = if cols > 0.0 { cols as usize } else { 0 };
		self.rows = if rows > 0.0 { rows as usize } else { 0 };

		let cell_count = self
			.cols
			.checked_mul(self.rows)
			.filter(|&n| n > 0 && n <= MAX_CELLS);
		match cell_count {
			Some(n) => {
				self.available = true;
				self.cells.resize_with(n, Vec::new);
			}
			None => {
				self.cols = 0;
				self.rows = 0;
				self.available = false;
			}
		}
	}

	/// Whether neighbour lookups use buckets rather than a full scan.
	pub fn is_available(&self) -> bool {
		self.available
	}

	/// `(cols, rows)` after the last configure.
	pub fn dimensions(&self) -> (usize, usize) {
		(self.cols, self.rows)
	}

	/// Side length of a cell.
	pub fn cell_size(&self) -> f64 {
		self.cell_size
	}

	/// Re-buckets all points. Points outside the canvas are left out of the
	/// buckets for this frame but still get neighbourhood lookups.
	pub fn rebuild(&mut self, points: &[Point]) {
		self.point_cells.clear();
		if !self.available {
			self.point_cells.resize(points.len(), (0, 0));
			return;
		}

		for cell in &mut self.cells {
			cell.clear();
		}

		for (i, p) in points.iter().enumerate() {
			let cell = self.cell_of(p);
			self.point_cells.push(cell);
			if let Some(slot) = self.slot(cell.0, cell.1) {
				self.cells[slot].push(i);
			}
		}
	}

	/// Candidate neighbours of point `index` from the last rebuild.
	///
	/// Returns the 3×3 neighbourhood around the point's cell, which may
	/// include `index` itself. Without a usable grid, returns every other
	/// index.
	pub fn nearby(&self, index: usize) -> Vec<usize> {
		if !self.available {
			return (0..self.point_cells.len()).filter(|&i| i != index).collect();
		}

		let Some(&(cx, cy)) = self.point_cells.get(index) else {
			return Vec::new();
		};

		let mut out = Vec::new();
		for dy in -1..=1 {
			for dx in -1..=1 {
				if let Some(slot) = self.slot(cx.saturating_add(dx), cy.saturating_add(dy)) {
					out.extend_from_slice(&self.cells[slot]);
				}
			}
		}
		out
	}

	fn cell_of(&self, p: &Point) -> (i64, i64) {
		(
			(p.x / self.cell_size).floor() as i64,
			(p.y / self.cell_size).floor() as i64,
		)
	}

	fn slot(&self, col: i64, row: i64) -> Option<usize> {
		let in_range =
			col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows;
		in_range.then(|| row as usize * self.cols + col as usize)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(x: f64, y: f64) -> Point {
		Point {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	#[test]
	fn configure_rounds_dimensions_up() {
		let mut grid = SpatialGrid::new();
		grid.configure(250.0, 100.0, 120.0);
		assert!(grid.is_available());
		assert_eq!(grid.dimensions(), (3, 1));
	}

	#[test]
	fn degenerate_cell_size_is_unavailable() {
		let mut grid = SpatialGrid::new();
		for cs in [0.0, -5.0, f64::NAN, f64::INFINITY] {
			grid.configure(100.0, 100.0, cs);
			assert!(!grid.is_available(), "cell size {cs}");
		}
		grid.configure(0.0, 100.0, 10.0);
		assert!(!grid.is_available());
	}

	#[test]
	fn tiny_cell_size_falls_back_to_full_scan() {
		let mut grid = SpatialGrid::new();
		grid.configure(600.0, 600.0, 1e-7);
		assert!(!grid.is_available());
		assert_eq!(grid.dimensions(), (0, 0));

		grid.rebuild(&[at(1.0, 1.0), at(2.0, 2.0)]);
		assert_eq!(grid.nearby(0), vec![1]);

		// 1024 x 1024 is the largest grid kept
		grid.configure(1024.0, 1024.0, 1.0);
		assert!(grid.is_available());
		grid.configure(1025.0, 1024.0, 1.0);
		assert!(!grid.is_available());
	}

	#[test]
	fn far_away_points_do_not_overflow_neighbourhood() {
		let mut grid = SpatialGrid::new();
		grid.configure(200.0, 200.0, 100.0);
		let points = [at(f64::MAX, f64::MAX), at(-f64::MAX, 10.0), at(10.0, 10.0)];
		grid.rebuild(&points);
		assert!(grid.nearby(0).is_empty());
		assert!(grid.nearby(1).is_empty());
		assert_eq!(grid.nearby(2), vec![2]);
	}

	#[test]
	fn unavailable_grid_returns_all_other_points() {
		let mut grid = SpatialGrid::new();
		grid.configure(100.0, 100.0, 0.0);
		grid.rebuild(&[at(1.0, 1.0), at(90.0, 90.0), at(50.0, 50.0)]);
		assert_eq!(grid.nearby(1), vec![0, 2]);
	}

	#[test]
	fn nearby_covers_three_by_three_neighbourhood() {
		let mut grid = SpatialGrid::new();
		grid.configure(300.0, 300.0, 100.0);
		let points = [
			at(150.0, 150.0), // centre cell
			at(50.0, 50.0),   // diagonal neighbour
			at(250.0, 150.0), // right neighbour
			at(10.0, 290.0),  // bottom-left corner, diagonal
		];
		grid.rebuild(&points);

		let mut around_centre = grid.nearby(0);
		around_centre.sort_unstable();
		assert_eq!(around_centre, vec![0, 1, 2, 3]);

		let mut around_corner = grid.nearby(1);
		around_corner.sort_unstable();
		assert_eq!(around_corner, vec![0, 1]);
	}

	#[test]
	fn out_of_range_points_are_not_bucketed_but_still_query() {
		let mut grid = SpatialGrid::new();
		grid.configure(200.0, 200.0, 100.0);
		let points = [at(-0.5, 10.0), at(5.0, 10.0), at(200.5, 10.0)];
		grid.rebuild(&points);

		// Point 0 is outside, so nobody sees it...
		assert_eq!(grid.nearby(1), vec![1]);
		// ...but its own neighbourhood still reaches column 0.
		assert_eq!(grid.nearby(0), vec![1]);
		// Column == cols must not wrap into the next row.
		assert!(grid.nearby(2).is_empty());
	}

	#[test]
	fn rebuild_clears_previous_frame() {
		let mut grid = SpatialGrid::new();
		grid.configure(200.0, 200.0, 100.0);
		grid.rebuild(&[at(10.0, 10.0), at(20.0, 20.0)]);
		grid.rebuild(&[at(10.0, 10.0), at(190.0, 190.0)]);
		assert_eq!(grid.nearby(0), vec![0, 1]);

		grid.rebuild(&[at(10.0, 10.0)]);
		assert_eq!(grid.nearby(0), vec![0]);
	}
}
