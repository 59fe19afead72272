//! Lifecycle tests driven through the headless host.

#![allow(unused_crate_dependencies)]

use std::time::Duration;

use constellation_bg::components::constellation::{
	AnimationController, AnimationState, ContainerInfo, ControllerConfig, DEFAULT_CANVAS_ID,
	DrawCommand, ManualCanvas, ManualHost, Settings, SizingStrategy,
};

fn container(id: &str, width: f64, height: f64) -> Option<ContainerInfo> {
	Some(ContainerInfo {
		id: id.into(),
		width,
		height,
	})
}

fn setup(container_info: Option<ContainerInfo>) -> (ManualHost, ManualCanvas, AnimationController<ManualHost>) {
	let host = ManualHost::new(1280.0, 720.0);
	let canvas = host.add_canvas(DEFAULT_CANVAS_ID, container_info);
	let controller = AnimationController::new(
		host.clone(),
		ControllerConfig {
			rng_seed: Some(7),
			..ControllerConfig::default()
		},
	);
	(host, canvas, controller)
}

fn circles(commands: &[DrawCommand]) -> Vec<(f64, f64)> {
	commands
		.iter()
		.filter_map(|c| match c {
			DrawCommand::Circle { x, y, .. } => Some((*x, *y)),
			_ => None,
		})
		.collect()
}

#[test]
fn reserved_container_end_to_end() {
	let (host, canvas, mut controller) = setup(container("group", 10.0, 10.0));
	let settings = Settings {
		color1: Some("#ff0000".into()),
		multiplier: Some(1.0),
		distance: Some(1.0),
		size: Some(1.0),
		speed: Some(0.0),
		..Settings::default()
	};
	controller.start(&settings).unwrap();

	assert_eq!(canvas.size(), (600, 600));
	let (count, max_distance) = controller
		.with_scene(|s| (s.system.point_count(), s.system.max_distance()))
		.unwrap();
	assert_eq!(count, 72);
	assert_eq!(max_distance, 120.0);

	host.run_frame();
	let first = circles(&canvas.surface_log().last_frame());
	assert_eq!(first.len(), 72);

	host.run_frames(4);
	let later = canvas.surface_log().last_frame();
	assert_eq!(canvas.surface_log().frames(), 5);
	assert_eq!(circles(&later), first);
	assert!(later.contains(&DrawCommand::FillColor("#ff0000".into())));
	assert!(later.contains(&DrawCommand::LineWidth(1.0)));
}

#[test]
fn starting_twice_leaves_one_loop_and_one_listener() {
	let (host, _canvas, mut controller) = setup(None);
	controller.start(&Settings::default()).unwrap();
	controller.start(&Settings::default()).unwrap();

	assert_eq!(host.pending_frames(), 1);
	assert_eq!(host.resize_listeners(), 1);
	assert_eq!(host.frame_counters(), (2, 1));
	assert_eq!(controller.generation(), 2);
}

#[test]
fn detached_canvas_follows_viewport() {
	let (host, canvas, mut controller) = setup(None);
	controller.start(&Settings::default()).unwrap();
	assert_eq!(canvas.size(), (1280, 720));

	host.set_viewport(1024.0, 768.0);
	host.dispatch_resize();
	host.advance(Duration::from_millis(100));
	assert_eq!(canvas.size(), (1024, 768));
}

#[test]
fn resize_is_debounced_and_remeasures_the_container() {
	let (host, canvas, mut controller) = setup(container("hero", 800.0, 600.0));
	controller.start(&Settings::default()).unwrap();
	assert_eq!(canvas.size(), (800, 600));

	canvas.set_container(container("hero", 1200.0, 900.0));
	for _ in 0..3 {
		host.dispatch_resize();
		host.advance(Duration::from_millis(60));
	}
	assert!(controller.resize_pending());
	assert_eq!(host.pending_timers(), 1);
	assert_eq!(canvas.size(), (800, 600));

	host.advance(Duration::from_millis(40));
	assert!(!controller.resize_pending());
	assert_eq!(canvas.size(), (1200, 900));

	let expected = SizingStrategy::DensityArea.targets(1200.0, 900.0, 1.0, 1.0);
	let (count, max_distance, cell) = controller
		.with_scene(|s| {
			(
				s.system.point_count(),
				s.system.max_distance(),
				s.grid.cell_size(),
			)
		})
		.unwrap();
	assert_eq!(count, expected.point_count);
	assert_eq!(max_distance, expected.max_distance);
	assert_eq!(cell, expected.max_distance);

	host.run_frame();
	assert_eq!(
		canvas.surface_log().last_frame().first(),
		Some(&DrawCommand::Clear {
			width: 1200.0,
			height: 900.0
		})
	);
}

#[test]
fn reserved_container_ignores_resizes() {
	let (host, canvas, mut controller) = setup(container("group", 300.0, 300.0));
	controller.start(&Settings::default()).unwrap();

	host.set_viewport(400.0, 300.0);
	host.dispatch_resize();
	host.advance(Duration::from_millis(100));
	assert_eq!(canvas.size(), (600, 600));
	assert_eq!(controller.with_scene(|s| s.system.point_count()), Some(72));
}

#[test]
fn restart_drops_a_pending_resize() {
	let (host, canvas, mut controller) = setup(container("hero", 800.0, 600.0));
	controller.start(&Settings::default()).unwrap();

	canvas.set_container(container("hero", 400.0, 300.0));
	host.dispatch_resize();
	assert_eq!(host.pending_timers(), 1);

	controller.restart_with_settings(&Settings::default()).unwrap();
	assert_eq!(host.pending_timers(), 0);
	// the restart measured the container again
	assert_eq!(canvas.size(), (400, 300));
}

#[test]
fn late_callbacks_from_a_stopped_instance_are_ignored() {
	let (host, canvas, mut controller) = setup(container("hero", 800.0, 600.0));
	host.set_ignore_cancellation(true);
	controller.start(&Settings::default()).unwrap();

	host.dispatch_resize();
	controller.start(&Settings::default()).unwrap();
	assert_eq!(host.pending_frames(), 2);
	assert_eq!(host.pending_timers(), 1);

	assert_eq!(host.run_frame(), 2);
	assert_eq!(canvas.surface_log().frames(), 1);
	assert_eq!(host.pending_frames(), 1);

	canvas.set_container(container("hero", 200.0, 200.0));
	host.advance(Duration::from_millis(100));
	assert_eq!(canvas.size(), (800, 600));
}

#[test]
fn drawing_failure_stops_the_loop() {
	let (host, canvas, mut controller) = setup(None);
	let handle = controller.start(&Settings::default()).unwrap();
	host.run_frame();

	canvas.surface_log().set_failing(true);
	host.run_frame();

	assert_eq!(controller.state(), AnimationState::Stopped);
	assert!(!handle.is_active());
	assert_eq!(host.pending_frames(), 0);
	assert_eq!(host.resize_listeners(), 0);
}

#[test]
fn restart_with_settings_matches_stop_then_start() {
	let (host, canvas, mut controller) = setup(container("group", 0.0, 0.0));
	controller.start(&Settings::default()).unwrap();
	host.run_frame();

	let denser = Settings {
		multiplier: Some(2.0),
		color1: Some("#0af".into()),
		..Settings::default()
	};
	let handle = controller.restart_with_settings(&denser).unwrap();

	assert!(handle.is_active());
	assert_eq!(host.pending_frames(), 1);
	assert_eq!(host.resize_listeners(), 1);
	assert_eq!(controller.with_scene(|s| s.system.point_count()), Some(144));

	host.run_frame();
	assert!(
		canvas
			.surface_log()
			.last_frame()
			.contains(&DrawCommand::FillColor("#00aaff".into()))
	);
}

#[test]
fn handle_stop_tears_everything_down() {
	let (host, _canvas, mut controller) = setup(None);
	let handle = controller.start(&Settings::default()).unwrap();
	host.dispatch_resize();

	handle.stop();
	assert_eq!(controller.state(), AnimationState::Stopped);
	assert_eq!(host.pending_frames(), 0);
	assert_eq!(host.pending_timers(), 0);
	assert_eq!(host.resize_listeners(), 0);
}

#[test]
fn tiny_distance_runs_with_exhaustive_search() {
	let (host, canvas, mut controller) = setup(container("group", 0.0, 0.0));
	let settings = Settings {
		distance: Some(1e-8),
		..Settings::default()
	};
	controller.start(&settings).unwrap();

	let grid_available = controller.with_scene(|s| s.grid.is_available());
	assert_eq!(grid_available, Some(false));

	host.run_frames(3);
	assert_eq!(controller.state(), AnimationState::Running);
	assert_eq!(canvas.surface_log().frames(), 3);
}
