//! The page-level services the animation controller depends on.
//!
//! [`Host`] abstracts element lookup, viewport geometry, animation frames,
//! timeouts and resize notifications. [`WebHost`] implements it on top of
//! `web_sys`; [`ManualHost`](super::headless::ManualHost) drives it
//! deterministically in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::error::SurfaceError;
use super::surface::Surface;

/// One-shot callback for frames and timeouts.
pub type Callback = Box<dyn FnOnce()>;

/// Identifies a pending animation frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

/// Identifies a pending timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Identifies a registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// The element a canvas is mounted in.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerInfo {
	/// Element id, empty when it has none.
	pub id: String,
	/// Content-box width in pixels.
	pub width: f64,
	/// Content-box height in pixels.
	pub height: f64,
}

/// A canvas element that can be sized and drawn on.
pub trait Canvas {
	/// Drawing surface handed out by the canvas.
	type Surface: Surface;

	/// Parent element geometry, if the canvas is attached to one.
	fn container(&self) -> Option<ContainerInfo>;
	/// Sets the backing-store size in pixels.
	fn set_size(&self, width: u32, height: u32);
	/// Acquires the 2D drawing surface.
	fn surface(&self) -> Result<Self::Surface, SurfaceError>;
}

/// Scheduling and lookup services provided by the page.
pub trait Host {
	/// Canvas element type.
	type Canvas: Canvas;

	/// Looks up a canvas element by id.
	fn find_canvas(&self, id: &str) -> Option<Self::Canvas>;
	/// Viewport size in pixels.
	fn viewport_size(&self) -> (f64, f64);
	/// Requests an animation frame.
	fn request_frame(&self, callback: Callback) -> Option<FrameId>;
	/// Cancels a pending frame request.
	fn cancel_frame(&self, id: FrameId);
	/// Runs `callback` once after `delay`.
	fn set_timeout(&self, delay: Duration, callback: Callback) -> Option<TimerId>;
	/// Cancels a pending timeout.
	fn clear_timeout(&self, id: TimerId);
	/// Calls `listener` on every viewport resize.
	fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> Option<ListenerId>;
	/// Unregisters a resize listener.
	fn remove_resize_listener(&self, id: ListenerId);
}

/// Keeps one-shot JS closures alive until they have fired or been cancelled.
///
/// A closure that has fired is dropped on the next registration rather than
/// from inside its own call.
#[derive(Default)]
struct OnceClosures {
	entries: RefCell<Vec<OnceEntry>>,
}

struct OnceEntry {
	handle: i32,
	fired: Rc<Cell<bool>>,
	_closure: Closure<dyn FnMut()>,
}

impl OnceClosures {
	/// Wraps `callback` and hands the JS function to `schedule`, which
	/// returns the browser's handle.
	fn register(
		&self,
		callback: Callback,
		schedule: impl FnOnce(&js_sys::Function) -> Result<i32, JsValue>,
	) -> Option<i32> {
		self.entries.borrow_mut().retain(|e| !e.fired.get());

		let fired = Rc::new(Cell::new(false));
		let fired_inner = fired.clone();
		let closure = Closure::once(move || {
			callback();
			fired_inner.set(true);
		});

		match schedule(closure.as_ref().unchecked_ref()) {
			Ok(handle) => {
				self.entries.borrow_mut().push(OnceEntry {
					handle,
					fired,
					_closure: closure,
				});
				Some(handle)
			}
			Err(e) => {
				warn!("constellation: scheduling failed: {:?}", e);
				None
			}
		}
	}

	fn remove(&self, handle: i32) {
		self.entries.borrow_mut().retain(|e| e.handle != handle);
	}
}

/// [`Host`] backed by the browser window.
pub struct WebHost {
	window: Window,
	frames: OnceClosures,
	timers: OnceClosures,
	listeners: RefCell<Vec<(ListenerId, Closure<dyn Fn()>)>>,
	next_listener: Cell<u32>,
}

impl WebHost {
	/// Returns `None` outside a browser window context.
	pub fn new() -> Option<Self> {
		Some(Self {
			window: web_sys::window()?,
			frames: OnceClosures::default(),
			timers: OnceClosures::default(),
			listeners: RefCell::new(Vec::new()),
			next_listener: Cell::new(0),
		})
	}
}

impl Host for WebHost {
	type Canvas = HtmlCanvasElement;

	fn find_canvas(&self, id: &str) -> Option<HtmlCanvasElement> {
		self.window
			.document()?
			.get_element_by_id(id)?
			.dyn_into::<HtmlCanvasElement>()
			.ok()
	}

	fn viewport_size(&self) -> (f64, f64) {
		let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(dim(self.window.inner_width()), dim(self.window.inner_height()))
	}

	fn request_frame(&self, callback: Callback) -> Option<FrameId> {
		self.frames
			.register(callback, |f| self.window.request_animation_frame(f))
			.map(FrameId)
	}

	fn cancel_frame(&self, id: FrameId) {
		let _ = self.window.cancel_animation_frame(id.0);
		self.frames.remove(id.0);
	}

	fn set_timeout(&self, delay: Duration, callback: Callback) -> Option<TimerId> {
		let ms = delay.as_millis().min(i32::MAX as u128) as i32;
		self.timers
			.register(callback, |f| {
				self.window
					.set_timeout_with_callback_and_timeout_and_arguments_0(f, ms)
			})
			.map(TimerId)
	}

	fn clear_timeout(&self, id: TimerId) {
		self.window.clear_timeout_with_handle(id.0);
		self.timers.remove(id.0);
	}

	fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> Option<ListenerId> {
		let closure = Closure::<dyn Fn()>::new(move || listener());
		if let Err(e) = self
			.window
			.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
		{
			warn!("constellation: could not add resize listener: {:?}", e);
			return None;
		}
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0.wrapping_add(1));
		self.listeners.borrow_mut().push((id, closure));
		Some(id)
	}

	fn remove_resize_listener(&self, id: ListenerId) {
		let mut listeners = self.listeners.borrow_mut();
		if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
			let (_, closure) = listeners.remove(pos);
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
		}
	}
}

impl Canvas for HtmlCanvasElement {
	type Surface = CanvasRenderingContext2d;

	fn container(&self) -> Option<ContainerInfo> {
		let parent = self.parent_element()?;
		Some(ContainerInfo {
			id: parent.id(),
			width: parent.client_width() as f64,
			height: parent.client_height() as f64,
		})
	}

	fn set_size(&self, width: u32, height: u32) {
		self.set_width(width);
		self.set_height(height);
	}

	fn surface(&self) -> Result<CanvasRenderingContext2d, SurfaceError> {
		self.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
			.ok_or(SurfaceError::ContextUnavailable)
	}
}
