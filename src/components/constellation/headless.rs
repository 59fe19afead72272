//! Headless host for driving the constellation without a browser.
//!
//! [`ManualHost`] implements [`Host`] with an explicit clock: frames run
//! only when [`ManualHost::run_frame`] is called and timeouts fire only
//! when [`ManualHost::advance`] moves time past their deadline. Every draw
//! call lands in a [`RecordingSurface`] for inspection.
//!
//! # Example
//!
//! ```
//! use constellation_bg::components::constellation::{
//!     AnimationController, ContainerInfo, ControllerConfig, ManualHost, Settings,
//! };
//!
//! let host = ManualHost::new(1024.0, 768.0);
//! let canvas = host.add_canvas("noiseCanvas", Some(ContainerInfo {
//!     id: "group".into(),
//!     width: 0.0,
//!     height: 0.0,
//! }));
//! let mut controller = AnimationController::new(host.clone(), ControllerConfig::default());
//! controller.start(&Settings::default()).unwrap();
//!
//! host.run_frame();
//! assert_eq!(canvas.size(), (600, 600));
//! assert_eq!(canvas.surface_log().frames(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use super::error::SurfaceError;
use super::host::{Callback, Canvas, ContainerInfo, FrameId, Host, ListenerId, TimerId};
use super::surface::Surface;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// Cleared area.
	Clear {
		/// Cleared width.
		width: f64,
		/// Cleared height.
		height: f64,
	},
	/// CSS stroke colour.
	StrokeColor(String),
	/// Stroke width.
	LineWidth(f64),
	/// Stroked segment.
	Line {
		/// Start point.
		from: (f64, f64),
		/// End point.
		to: (f64, f64),
	},
	/// CSS fill colour.
	FillColor(String),
	/// Filled circle.
	Circle {
		/// Centre x.
		x: f64,
		/// Centre y.
		y: f64,
		/// Radius.
		radius: f64,
	},
}

/// A [`Surface`] that records calls into a shared log.
///
/// Clones share the same log, so a test can keep one while the controller
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	log: Rc<RefCell<Vec<DrawCommand>>>,
	failing: Rc<Cell<bool>>,
}

impl RecordingSurface {
	/// Creates an empty log.
	pub fn new() -> Self {
		Self::default()
	}

	/// Every command recorded so far.
	pub fn commands(&self) -> Vec<DrawCommand> {
		self.log.borrow().clone()
	}

	/// Drains the log.
	pub fn take_commands(&self) -> Vec<DrawCommand> {
		std::mem::take(&mut *self.log.borrow_mut())
	}

	/// Number of frames drawn, counted by clears.
	pub fn frames(&self) -> usize {
		self.log
			.borrow()
			.iter()
			.filter(|c| matches!(c, DrawCommand::Clear { .. }))
			.count()
	}

	/// Commands issued since the most recent clear, clear included.
	pub fn last_frame(&self) -> Vec<DrawCommand> {
		let log = self.log.borrow();
		let start = log
			.iter()
			.rposition(|c| matches!(c, DrawCommand::Clear { .. }))
			.unwrap_or(0);
		log[start..].to_vec()
	}

	/// Makes line and circle calls fail, as a detached canvas would.
	pub fn set_failing(&self, failing: bool) {
		self.failing.set(failing);
	}

	fn check(&self) -> Result<(), SurfaceError> {
		if self.failing.get() {
			Err(SurfaceError::Draw("surface detached".into()))
		} else {
			Ok(())
		}
	}

	fn push(&self, command: DrawCommand) {
		self.log.borrow_mut().push(command);
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.push(DrawCommand::Clear { width, height });
	}

	fn set_stroke_color(&mut self, css: &str) {
		self.push(DrawCommand::StrokeColor(css.to_string()));
	}

	fn set_line_width(&mut self, width: f64) {
		self.push(DrawCommand::LineWidth(width));
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) -> Result<(), SurfaceError> {
		self.check()?;
		self.push(DrawCommand::Line { from, to });
		Ok(())
	}

	fn set_fill_color(&mut self, css: &str) {
		self.push(DrawCommand::FillColor(css.to_string()));
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), SurfaceError> {
		self.check()?;
		self.push(DrawCommand::Circle { x, y, radius });
		Ok(())
	}
}

#[derive(Debug)]
struct CanvasState {
	container: Option<ContainerInfo>,
	size: (u32, u32),
	context_available: bool,
	surface: RecordingSurface,
}

/// In-memory canvas element. Clones share state.
#[derive(Clone, Debug)]
pub struct ManualCanvas {
	state: Rc<RefCell<CanvasState>>,
}

impl ManualCanvas {
	/// Backing-store size last set by the controller.
	pub fn size(&self) -> (u32, u32) {
		self.state.borrow().size
	}

	/// Moves the canvas into another container, or detaches it.
	pub fn set_container(&self, container: Option<ContainerInfo>) {
		self.state.borrow_mut().container = container;
	}

	/// When false, acquiring a 2D context fails.
	pub fn set_context_available(&self, available: bool) {
		self.state.borrow_mut().context_available = available;
	}

	/// The log every surface handed out by this canvas writes to.
	pub fn surface_log(&self) -> RecordingSurface {
		self.state.borrow().surface.clone()
	}
}

impl Canvas for ManualCanvas {
	type Surface = RecordingSurface;

	fn container(&self) -> Option<ContainerInfo> {
		self.state.borrow().container.clone()
	}

	fn set_size(&self, width: u32, height: u32) {
		self.state.borrow_mut().size = (width, height);
	}

	fn surface(&self) -> Result<RecordingSurface, SurfaceError> {
		let state = self.state.borrow();
		if state.context_available {
			Ok(state.surface.clone())
		} else {
			Err(SurfaceError::ContextUnavailable)
		}
	}
}

#[derive(Default)]
struct HostState {
	viewport: (f64, f64),
	canvases: HashMap<String, ManualCanvas>,
	now: Duration,
	next_id: i32,
	frames: Vec<(FrameId, Callback)>,
	timers: Vec<(TimerId, Duration, Callback)>,
	listeners: Vec<(ListenerId, Rc<dyn Fn()>)>,
	frames_requested: usize,
	frames_cancelled: usize,
	ignore_cancellation: bool,
}

impl HostState {
	fn next_id(&mut self) -> i32 {
		self.next_id += 1;
		self.next_id
	}
}

/// Deterministic [`Host`] with an explicit clock. Clones share state.
#[derive(Clone, Default)]
pub struct ManualHost {
	state: Rc<RefCell<HostState>>,
}

impl ManualHost {
	/// Creates a host with the given viewport size.
	pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
		let host = Self::default();
		host.set_viewport(viewport_width, viewport_height);
		host
	}

	/// Sets the size reported by `viewport_size`.
	pub fn set_viewport(&self, width: f64, height: f64) {
		self.state.borrow_mut().viewport = (width, height);
	}

	/// Registers a canvas under `id`, replacing any previous one.
	pub fn add_canvas(&self, id: &str, container: Option<ContainerInfo>) -> ManualCanvas {
		let canvas = ManualCanvas {
			state: Rc::new(RefCell::new(CanvasState {
				container,
				size: (0, 0),
				context_available: true,
				surface: RecordingSurface::new(),
			})),
		};
		self.state
			.borrow_mut()
			.canvases
			.insert(id.to_string(), canvas.clone());
		canvas
	}

	/// Removes the canvas, as if the element left the page.
	pub fn remove_canvas(&self, id: &str) {
		self.state.borrow_mut().canvases.remove(id);
	}

	/// Frame callbacks waiting for [`run_frame`](Self::run_frame).
	pub fn pending_frames(&self) -> usize {
		self.state.borrow().frames.len()
	}

	/// Timeouts not yet fired or cleared.
	pub fn pending_timers(&self) -> usize {
		self.state.borrow().timers.len()
	}

	/// Registered resize listeners.
	pub fn resize_listeners(&self) -> usize {
		self.state.borrow().listeners.len()
	}

	/// When set, cancelled frames and cleared timers still fire, the way a
	/// callback already queued by the browser would.
	pub fn set_ignore_cancellation(&self, ignore: bool) {
		self.state.borrow_mut().ignore_cancellation = ignore;
	}

	/// Total frame requests and cancellations seen so far.
	pub fn frame_counters(&self) -> (usize, usize) {
		let state = self.state.borrow();
		(state.frames_requested, state.frames_cancelled)
	}

	/// Current clock reading.
	pub fn now(&self) -> Duration {
		self.state.borrow().now
	}

	/// Runs every frame callback pending at the time of the call.
	/// Frames requested by those callbacks wait for the next call.
	/// Returns how many callbacks ran.
	pub fn run_frame(&self) -> usize {
		let frames = std::mem::take(&mut self.state.borrow_mut().frames);
		let count = frames.len();
		for (_, callback) in frames {
			callback();
		}
		count
	}

	/// Runs `n` frames.
	pub fn run_frames(&self, n: usize) {
		for _ in 0..n {
			self.run_frame();
		}
	}

	/// Advances the clock, firing due timeouts in deadline order.
	pub fn advance(&self, by: Duration) {
		let target = self.state.borrow().now + by;
		loop {
			let due = {
				let mut state = self.state.borrow_mut();
				let next = state
					.timers
					.iter()
					.enumerate()
					.filter(|(_, (_, deadline, _))| *deadline <= target)
					.min_by_key(|(_, (_, deadline, _))| *deadline)
					.map(|(i, _)| i);
				match next {
					Some(i) => {
						let (_, deadline, callback) = state.timers.remove(i);
						state.now = deadline;
						Some(callback)
					}
					None => {
						state.now = target;
						None
					}
				}
			};
			match due {
				Some(callback) => callback(),
				None => break,
			}
		}
	}

	/// Notifies every resize listener, as a window resize would.
	pub fn dispatch_resize(&self) {
		let listeners: Vec<Rc<dyn Fn()>> = self
			.state
			.borrow()
			.listeners
			.iter()
			.map(|(_, l)| l.clone())
			.collect();
		for listener in listeners {
			listener();
		}
	}
}

impl Host for ManualHost {
	type Canvas = ManualCanvas;

	fn find_canvas(&self, id: &str) -> Option<ManualCanvas> {
		self.state.borrow().canvases.get(id).cloned()
	}

	fn viewport_size(&self) -> (f64, f64) {
		self.state.borrow().viewport
	}

	fn request_frame(&self, callback: Callback) -> Option<FrameId> {
		let mut state = self.state.borrow_mut();
		let id = FrameId(state.next_id());
		state.frames.push((id, callback));
		state.frames_requested += 1;
		Some(id)
	}

	fn cancel_frame(&self, id: FrameId) {
		let mut state = self.state.borrow_mut();
		if state.ignore_cancellation {
			state.frames_cancelled += 1;
			return;
		}
		let before = state.frames.len();
		state.frames.retain(|(fid, _)| *fid != id);
		if state.frames.len() != before {
			state.frames_cancelled += 1;
		}
	}

	fn set_timeout(&self, delay: Duration, callback: Callback) -> Option<TimerId> {
		let mut state = self.state.borrow_mut();
		let id = TimerId(state.next_id());
		let deadline = state.now + delay;
		state.timers.push((id, deadline, callback));
		Some(id)
	}

	fn clear_timeout(&self, id: TimerId) {
		let mut state = self.state.borrow_mut();
		if !state.ignore_cancellation {
			state.timers.retain(|(tid, _, _)| *tid != id);
		}
	}

	fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> Option<ListenerId> {
		let mut state = self.state.borrow_mut();
		let id = ListenerId(state.next_id() as u32);
		state.listeners.push((id, listener));
		Some(id)
	}

	fn remove_resize_listener(&self, id: ListenerId) {
		self.state.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
	}
}
