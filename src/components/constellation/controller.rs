//! Animation lifecycle: start, stop, restart and debounced resize.
//!
//! The controller owns at most one running instance. Every instance gets a
//! fresh generation number; frame, timer and resize callbacks carry the
//! generation they were created for and do nothing once it is no longer
//! the running one. Starting always tears down the previous instance first,
//! so there is never more than one frame loop or resize listener.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::error::ConstellationError;
use super::host::{Callback, Canvas, ContainerInfo, FrameId, Host, ListenerId, TimerId};
use super::settings::Settings;
use super::state::Scene;

/// Element id the controller draws into.
pub const DEFAULT_CANVAS_ID: &str = "noiseCanvas";
/// Container id that pins the canvas to a fixed square.
pub const RESERVED_CONTAINER_ID: &str = "group";

/// Controller configuration. Defaults match the page markup.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
	/// Id of the canvas element to draw into.
	pub canvas_id: String,
	/// Container id that pins the canvas to `reserved_size`.
	pub reserved_container_id: String,
	/// Edge length used when the canvas sits in the reserved container.
	pub reserved_size: f64,
	/// Quiet period before a resize is applied.
	pub resize_debounce: Duration,
	/// Fixed RNG seed for reproducible runs; entropy when `None`.
	pub rng_seed: Option<u64>,
}

impl Default for ControllerConfig {
	fn default() -> Self {
		Self {
			canvas_id: DEFAULT_CANVAS_ID.to_string(),
			reserved_container_id: RESERVED_CONTAINER_ID.to_string(),
			reserved_size: 600.0,
			resize_debounce: Duration::from_millis(100),
			rng_seed: None,
		}
	}
}

impl ControllerConfig {
	/// Canvas dimensions for a container: the reserved container forces
	/// the fixed square, any other container lends its content box, and a
	/// detached canvas follows the viewport.
	pub fn canvas_dimensions(
		&self,
		container: Option<&ContainerInfo>,
		viewport: (f64, f64),
	) -> (f64, f64) {
		match container {
			Some(c) if c.id == self.reserved_container_id => {
				(self.reserved_size, self.reserved_size)
			}
			Some(c) => (c.width, c.height),
			None => viewport,
		}
	}
}

/// Lifecycle state of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
	/// No instance is running.
	Stopped,
	/// A frame loop is scheduled.
	Running,
}

/// Single-slot delayed task. Scheduling replaces any pending task.
#[derive(Debug, Default)]
pub struct Debouncer {
	pending: Option<TimerId>,
}

impl Debouncer {
	/// Cancels the pending task, if any, and schedules `task` after `delay`.
	pub fn schedule<H: Host + ?Sized>(&mut self, host: &H, delay: Duration, task: Callback) {
		self.cancel(host);
		self.pending = host.set_timeout(delay, task);
	}

	/// Cancels the pending task, if any.
	pub fn cancel<H: Host + ?Sized>(&mut self, host: &H) {
		if let Some(id) = self.pending.take() {
			host.clear_timeout(id);
		}
	}

	/// Marks the pending task as having run.
	pub fn complete(&mut self) {
		self.pending = None;
	}

	/// Whether a task is waiting to run.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

struct Instance<H: Host> {
	generation: u64,
	canvas: H::Canvas,
	scene: Scene<<H::Canvas as Canvas>::Surface>,
	frame: Option<FrameId>,
	resize_listener: Option<ListenerId>,
	debounce: Debouncer,
}

struct Shared<H: Host> {
	host: H,
	config: ControllerConfig,
	generation: Cell<u64>,
	active: RefCell<Option<Instance<H>>>,
}

impl<H: Host + 'static> Shared<H> {
	fn is_current(&self, generation: u64) -> bool {
		self.active
			.borrow()
			.as_ref()
			.is_some_and(|i| i.generation == generation)
	}

	fn dimensions_of(&self, canvas: &H::Canvas) -> (f64, f64) {
		self.config
			.canvas_dimensions(canvas.container().as_ref(), self.host.viewport_size())
	}

	/// Cancels the frame, removes the listener and clears the debounce
	/// timer of the running instance. Returns whether one was running.
	fn teardown(&self) -> bool {
		let Some(mut instance) = self.active.borrow_mut().take() else {
			return false;
		};
		if let Some(frame) = instance.frame.take() {
			self.host.cancel_frame(frame);
		}
		if let Some(listener) = instance.resize_listener.take() {
			self.host.remove_resize_listener(listener);
		}
		instance.debounce.cancel(&self.host);
		info!(
			"constellation: stopped instance {} after {} frames",
			instance.generation,
			instance.scene.frames()
		);
		true
	}
}

fn schedule_frame<H: Host + 'static>(shared: &Rc<Shared<H>>, generation: u64) -> Option<FrameId> {
	let weak = Rc::downgrade(shared);
	shared.host.request_frame(Box::new(move || {
		if let Some(shared) = weak.upgrade() {
			run_frame(&shared, generation);
		}
	}))
}

fn run_frame<H: Host + 'static>(shared: &Rc<Shared<H>>, generation: u64) {
	let outcome = {
		let mut active = shared.active.borrow_mut();
		let Some(instance) = active.as_mut().filter(|i| i.generation == generation) else {
			trace!("constellation: dropping stale frame for instance {}", generation);
			return;
		};
		instance.frame = None;
		instance.scene.render_frame()
	};

	match outcome {
		Ok(stats) => trace!(
			"constellation: frame {} points {} connections",
			stats.points,
			stats.connections
		),
		Err(e) => {
			warn!("constellation: {}, stopping instance {}", e, generation);
			shared.teardown();
			return;
		}
	}

	if !shared.is_current(generation) {
		return;
	}
	let next = schedule_frame(shared, generation);
	if next.is_none() {
		warn!("constellation: could not schedule frame, stopping instance {}", generation);
		shared.teardown();
		return;
	}
	if let Some(instance) = shared.active.borrow_mut().as_mut() {
		instance.frame = next;
	}
}

fn on_resize<H: Host + 'static>(shared: &Rc<Shared<H>>, generation: u64) {
	let mut active = shared.active.borrow_mut();
	let Some(instance) = active.as_mut().filter(|i| i.generation == generation) else {
		trace!("constellation: ignoring resize for stale instance {}", generation);
		return;
	};
	let weak = Rc::downgrade(shared);
	instance.debounce.schedule(
		&shared.host,
		shared.config.resize_debounce,
		Box::new(move || {
			if let Some(shared) = weak.upgrade() {
				apply_resize(&shared, generation);
			}
		}),
	);
}

fn apply_resize<H: Host + 'static>(shared: &Rc<Shared<H>>, generation: u64) {
	let mut active = shared.active.borrow_mut();
	let Some(instance) = active.as_mut().filter(|i| i.generation == generation) else {
		trace!("constellation: ignoring debounced resize for stale instance {}", generation);
		return;
	};
	instance.debounce.complete();

	let (width, height) = shared.dimensions_of(&instance.canvas);
	instance.canvas.set_size(width as u32, height as u32);
	instance.scene.resize(width, height);

	let (cols, rows) = instance.scene.grid.dimensions();
	debug!(
		"constellation: resized to {}x{}, {} points, grid {}x{} cell {}",
		width,
		height,
		instance.scene.system.point_count(),
		cols,
		rows,
		instance.scene.grid.cell_size()
	);
}

/// Handle to one started instance.
///
/// Stopping through a handle only affects the instance it was returned
/// for; once a newer instance has started the handle is inert.
pub struct AnimationHandle<H: Host> {
	generation: u64,
	shared: Weak<Shared<H>>,
}

impl<H: Host> Clone for AnimationHandle<H> {
	fn clone(&self) -> Self {
		Self {
			generation: self.generation,
			shared: self.shared.clone(),
		}
	}
}

impl<H: Host + 'static> AnimationHandle<H> {
	/// Generation number of the instance this handle controls.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether this handle's instance is the one currently running.
	pub fn is_active(&self) -> bool {
		self.shared
			.upgrade()
			.is_some_and(|s| s.is_current(self.generation))
	}

	/// Stops the instance if it is still the running one.
	pub fn stop(&self) {
		if let Some(shared) = self.shared.upgrade() {
			if shared.is_current(self.generation) {
				shared.teardown();
			}
		}
	}
}

/// Starts, stops and restarts the constellation on a [`Host`].
pub struct AnimationController<H: Host + 'static> {
	shared: Rc<Shared<H>>,
}

impl<H: Host + 'static> AnimationController<H> {
	/// Creates a stopped controller on `host`.
	pub fn new(host: H, config: ControllerConfig) -> Self {
		Self {
			shared: Rc::new(Shared {
				host,
				config,
				generation: Cell::new(0),
				active: RefCell::new(None),
			}),
		}
	}

	/// The host the controller schedules on.
	pub fn host(&self) -> &H {
		&self.shared.host
	}

	/// Configuration the controller was built with.
	pub fn config(&self) -> &ControllerConfig {
		&self.shared.config
	}

	/// Whether an instance is currently running.
	pub fn state(&self) -> AnimationState {
		if self.shared.active.borrow().is_some() {
			AnimationState::Running
		} else {
			AnimationState::Stopped
		}
	}

	/// Generation of the most recent `start`, running or not.
	pub fn generation(&self) -> u64 {
		self.shared.generation.get()
	}

	/// Starts a new instance, tearing down any running one first.
	///
	/// A missing canvas or 2D context is not an error: the returned handle
	/// is inert and the controller stays stopped. An unparsable colour is.
	pub fn start(&mut self, settings: &Settings) -> Result<AnimationHandle<H>, ConstellationError> {
		let shared = &self.shared;
		shared.teardown();

		let generation = shared.generation.get() + 1;
		shared.generation.set(generation);
		let handle = AnimationHandle {
			generation,
			shared: Rc::downgrade(shared),
		};

		let params = settings.resolve()?;

		let Some(canvas) = shared.host.find_canvas(&shared.config.canvas_id) else {
			debug!(
				"constellation: no element #{}, not starting",
				shared.config.canvas_id
			);
			return Ok(handle);
		};

		let (width, height) = shared.dimensions_of(&canvas);
		canvas.set_size(width as u32, height as u32);

		let surface = match canvas.surface() {
			Ok(surface) => surface,
			Err(e) => {
				debug!("constellation: {}, not starting", e);
				return Ok(handle);
			}
		};

		let rng = match shared.config.rng_seed {
			Some(seed) => SmallRng::seed_from_u64(seed),
			None => SmallRng::from_entropy(),
		};
		let scene = Scene::new(&params, surface, width, height, rng);

		let weak = Rc::downgrade(shared);
		let resize_listener = shared.host.add_resize_listener(Rc::new(move || {
			if let Some(shared) = weak.upgrade() {
				on_resize(&shared, generation);
			}
		}));

		*shared.active.borrow_mut() = Some(Instance {
			generation,
			canvas,
			scene,
			frame: None,
			resize_listener,
			debounce: Debouncer::default(),
		});

		let frame = schedule_frame(shared, generation);
		if frame.is_none() {
			warn!("constellation: could not schedule first frame");
			shared.teardown();
			return Ok(handle);
		}
		if let Some(instance) = shared.active.borrow_mut().as_mut() {
			instance.frame = frame;
		}

		info!(
			"constellation: started instance {} at {}x{} ({:?})",
			generation, width, height, params
		);
		Ok(handle)
	}

	/// Stops the running instance. Safe to call when already stopped.
	pub fn stop(&mut self) {
		self.shared.teardown();
	}

	/// Stops and starts again with new settings. There is no in-place
	/// update: points are always regenerated.
	pub fn restart_with_settings(
		&mut self,
		settings: &Settings,
	) -> Result<AnimationHandle<H>, ConstellationError> {
		self.stop();
		self.start(settings)
	}

	/// Runs `f` against the running scene, if any.
	pub fn with_scene<R>(
		&self,
		f: impl FnOnce(&Scene<<H::Canvas as Canvas>::Surface>) -> R,
	) -> Option<R> {
		self.shared.active.borrow().as_ref().map(|i| f(&i.scene))
	}

	/// Whether a debounced resize is waiting to be applied.
	pub fn resize_pending(&self) -> bool {
		self.shared
			.active
			.borrow()
			.as_ref()
			.is_some_and(|i| i.debounce.is_pending())
	}
}

impl<H: Host + 'static> Drop for AnimationController<H> {
	fn drop(&mut self) {
		self.shared.teardown();
	}
}
