//! Hex colour parsing for the constellation stroke and fill styles.

use std::str::FromStr;

use super::error::ConstellationError;

/// RGB colour with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Rgb {
	/// Default point colour.
	pub const WHITE: Rgb = Rgb::new(255, 255, 255);

	/// Builds a colour from its channels.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Opaque CSS form, `#rrggbb`.
	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// Translucent CSS form used for connection strokes.
	pub fn to_css_rgba(self, alpha: f64) -> String {
		format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
	}
}

impl FromStr for Rgb {
	type Err = ConstellationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_hex(s)
	}
}

/// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
///
/// Three-digit input doubles each digit (`#f80` is `#ff8800`). Anything
/// else is rejected rather than producing garbage channels.
pub fn parse_hex(input: &str) -> Result<Rgb, ConstellationError> {
	let hex = input.strip_prefix('#').unwrap_or(input);
	let invalid = || ConstellationError::InvalidColor(input.to_string());

	if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(invalid());
	}

	let digits: Vec<u8> = match hex.len() {
		3 => hex.bytes().flat_map(|b| [b, b]).collect(),
		6 => hex.bytes().collect(),
		_ => return Err(invalid()),
	};

	let channel = |i: usize| -> Result<u8, ConstellationError> {
		let pair = std::str::from_utf8(&digits[i..i + 2]).map_err(|_| invalid())?;
		u8::from_str_radix(pair, 16).map_err(|_| invalid())
	};

	Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}
