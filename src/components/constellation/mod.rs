//! Constellation background effect.
//!
//! Renders moving points on an HTML canvas and joins every pair closer than
//! a size-dependent threshold with a line that fades with distance:
//! - Density-normalized point count and connection distance
//! - Uniform spatial grid for near-linear neighbour search
//! - Generation-checked frame loop with debounced resize handling
//! - Headless host for deterministic tests
//!
//! # Example
//!
//! ```ignore
//! use constellation_bg::{ConstellationCanvas, Settings};
//!
//! let settings = Settings {
//!     color1: Some("#8ab4f8".into()),
//!     multiplier: Some(1.5),
//!     ..Default::default()
//! };
//!
//! view! { <ConstellationCanvas settings=Signal::derive(move || settings.clone()) /> }
//! ```

pub mod bindings;
mod color;
mod component;
mod controller;
mod error;
mod grid;
mod headless;
mod host;
mod particles;
mod render;
pub mod scale;
mod settings;
mod state;
mod surface;

pub use color::{Rgb, parse_hex};
pub use component::ConstellationCanvas;
pub use controller::{
	AnimationController, AnimationHandle, AnimationState, ControllerConfig, DEFAULT_CANVAS_ID,
	Debouncer, RESERVED_CONTAINER_ID,
};
pub use error::{ConstellationError, SurfaceError};
pub use grid::SpatialGrid;
pub use headless::{DrawCommand, ManualCanvas, ManualHost, RecordingSurface};
pub use host::{Callback, Canvas, ContainerInfo, FrameId, Host, ListenerId, TimerId, WebHost};
pub use particles::{ParticleSystem, Point};
pub use render::{Connection, FrameStats, PaintStyle, collect_connections, render_frame};
pub use scale::SizingStrategy;
pub use settings::{DEFAULT_COLOR, Params, ReseedPolicy, Settings};
pub use state::Scene;
pub use surface::Surface;
