//! Error types for the constellation effect.
//!
//! Nothing here is fatal to the host page: the controller turns every
//! error into "stop animating" and logs it.

use std::fmt;

/// Errors surfaced by [`AnimationController::start`](super::AnimationController::start)
/// and the settings loaders.
#[derive(Debug)]
pub enum ConstellationError {
	/// The colour setting is not a 3- or 6-digit hex string.
	InvalidColor(String),
	/// Settings JSON could not be deserialized.
	Settings(serde_json::Error),
}

impl fmt::Display for ConstellationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConstellationError::InvalidColor(input) => {
				write!(f, "invalid color {:?}: expected #rgb or #rrggbb", input)
			}
			ConstellationError::Settings(e) => write!(f, "invalid constellation settings: {}", e),
		}
	}
}

impl std::error::Error for ConstellationError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConstellationError::Settings(e) => Some(e),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for ConstellationError {
	fn from(e: serde_json::Error) -> Self {
		ConstellationError::Settings(e)
	}
}

/// Failures reported by a drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
	/// The canvas has no usable 2D context.
	ContextUnavailable,
	/// A drawing call was rejected by the surface.
	Draw(String),
}

impl fmt::Display for SurfaceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SurfaceError::ContextUnavailable => write!(f, "canvas 2d context unavailable"),
			SurfaceError::Draw(msg) => write!(f, "draw call failed: {}", msg),
		}
	}
}

impl std::error::Error for SurfaceError {}
