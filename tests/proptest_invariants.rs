//! Property tests for neighbour search and point sizing.

#![allow(unused_crate_dependencies)]

use std::collections::HashSet;

use constellation_bg::components::constellation::{
	Params, ParticleSystem, Point, ReseedPolicy, SpatialGrid, collect_connections,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn points_in(width: f64, height: f64) -> impl Strategy<Value = Vec<Point>> {
	proptest::collection::vec((0.0..width, 0.0..height), 0..60).prop_map(|coords| {
		coords
			.into_iter()
			.map(|(x, y)| Point {
				x,
				y,
				vx: 0.0,
				vy: 0.0,
			})
			.collect()
	})
}

fn within(a: &Point, b: &Point, max_distance: f64) -> bool {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	dx * dx + dy * dy < max_distance * max_distance
}

proptest! {
	#[test]
	fn grid_never_misses_a_close_pair(
		points in points_in(500.0, 300.0),
		max_distance in 5.0f64..200.0,
	) {
		let mut grid = SpatialGrid::new();
		grid.configure(500.0, 300.0, max_distance);
		grid.rebuild(&points);

		for (i, p) in points.iter().enumerate() {
			let nearby: HashSet<usize> = grid.nearby(i).into_iter().collect();
			for (j, q) in points.iter().enumerate() {
				if i != j && within(p, q, max_distance) {
					prop_assert!(nearby.contains(&j), "pair ({}, {}) missed", i, j);
				}
			}
		}
	}

	#[test]
	fn connections_are_unique_and_match_brute_force(
		points in points_in(400.0, 400.0),
		max_distance in 1.0f64..150.0,
	) {
		let mut grid = SpatialGrid::new();
		grid.configure(400.0, 400.0, max_distance);
		grid.rebuild(&points);
		let connections = collect_connections(&points, &grid, max_distance);

		let n = points.len();
		prop_assert!(connections.len() <= n * n.saturating_sub(1) / 2);

		let mut pairs = HashSet::new();
		for c in &connections {
			prop_assert!(c.a < c.b);
			prop_assert!(pairs.insert((c.a, c.b)));
			prop_assert!((0.0..=1.0).contains(&c.alpha));
		}

		let mut expected = 0;
		for i in 0..n {
			for j in (i + 1)..n {
				if within(&points[i], &points[j], max_distance) {
					expected += 1;
				}
			}
		}
		prop_assert_eq!(connections.len(), expected);
	}

	#[test]
	fn point_count_tracks_canvas_size(
		width in 1.0f64..2500.0,
		height in 1.0f64..1500.0,
		multiplier in 0.0f64..3.0,
		preserve in any::<bool>(),
		seed in any::<u64>(),
	) {
		let params = Params {
			multiplier,
			reseed: if preserve { ReseedPolicy::Preserve } else { ReseedPolicy::Always },
			..Params::default()
		};
		let mut system = ParticleSystem::new(params, 600.0, 600.0, SmallRng::seed_from_u64(seed));
		system.reconfigure(width, height);

		let scale = ((width * height) / 360_000.0).sqrt();
		let expected_count = (72.0 * scale * multiplier).floor() as usize;
		prop_assert_eq!(system.point_count(), expected_count);
		prop_assert!((system.max_distance() - 120.0 * scale).abs() < 1e-9);

		system.reconfigure(width, height);
		prop_assert_eq!(system.point_count(), expected_count);
	}
}
