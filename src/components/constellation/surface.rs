//! The drawing primitives the render pass needs from a canvas.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::error::SurfaceError;

/// A 2D drawing target: clear, stroked lines and filled circles.
pub trait Surface {
	/// Clears the `width`×`height` area.
	fn clear(&mut self, width: f64, height: f64);
	/// Sets the stroke colour from a CSS string.
	fn set_stroke_color(&mut self, css: &str);
	/// Sets the stroke width.
	fn set_line_width(&mut self, width: f64);
	/// Strokes a straight line.
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) -> Result<(), SurfaceError>;
	/// Sets the fill colour from a CSS string.
	fn set_fill_color(&mut self, css: &str);
	/// Fills a circle.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), SurfaceError>;
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn set_stroke_color(&mut self, css: &str) {
		self.set_stroke_style_str(css);
	}

	fn set_line_width(&mut self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) -> Result<(), SurfaceError> {
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
		Ok(())
	}

	fn set_fill_color(&mut self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), SurfaceError> {
		self.begin_path();
		self.arc(x, y, radius, 0.0, PI * 2.0)
			.map_err(|e| SurfaceError::Draw(format!("{:?}", e)))?;
		self.fill();
		Ok(())
	}
}
