//! Visual theming for the workflow canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Dot grid color.
	pub grid_color: Color,
}

/// Node card style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub border: Color,
	/// Border of the card under the pointer.
	pub border_hover: Color,
	pub border_width: f64,
	pub title: Color,
	pub subtitle: Color,
	/// Ports and the delete glyph.
	pub accent: Color,
}

/// Edge style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Color of the rubber-band line while drawing a connection.
	pub preview_color: Color,
	pub delete_fill: Color,
	pub delete_glyph: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Dark editor theme with a coral accent (default).
	pub fn dark() -> Self {
		let accent = Color::rgb(255, 109, 90);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(26, 26, 26),
				grid_color: Color::rgb(51, 51, 51),
			},
			node: NodeStyle {
				fill: Color::rgb(42, 42, 42),
				border: Color::rgb(68, 68, 68),
				border_hover: accent,
				border_width: 1.0,
				title: Color::rgb(255, 255, 255),
				subtitle: Color::rgb(187, 187, 187),
				accent,
			},
			edge: EdgeStyle {
				color: Color::rgba(177, 177, 183, 0.9),
				preview_color: accent.with_alpha(0.8),
				delete_fill: Color::rgb(42, 42, 42),
				delete_glyph: accent.lighten(0.2),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
