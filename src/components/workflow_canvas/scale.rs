//! Zoom-dependent sizing for canvas elements.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: canvas coordinates stored on nodes. Values in world-space
//!   scale with zoom.
//! - **Screen-space**: pixels on the canvas element, unaffected by zoom.
//!
//! Node cards live in world-space so they grow and shrink with the view.
//! Interaction targets (ports, delete controls) are clamped to a minimum
//! screen size so they stay clickable when zoomed far out.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Alpha that is full at `full_alpha_k` and fades to zero at `zero_alpha_k`.
#[derive(Clone, Debug)]
pub struct AlphaFade {
	pub zero_alpha_k: f64,
	pub full_alpha_k: f64,
}

impl AlphaFade {
	/// Alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Node card dimensions, all in world units.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	pub width: f64,
	pub height: f64,
	pub corner_radius: f64,
	/// Label font size.
	pub title_size: f64,
	/// "Type: ..." font size.
	pub subtitle_size: f64,
	/// Side of the square delete control in the top-right corner.
	pub delete_size: f64,
	/// Distance of the delete control from the card's top and right edges.
	pub delete_inset: f64,
}

/// Connection ports on the left (input) and right (output) card edges.
#[derive(Clone, Debug)]
pub struct PortScaleConfig {
	pub radius: f64,
	pub radius_behavior: ScaleBehavior,
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
}

/// Edge strokes and the delete control at each edge's label point.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	pub line_width: f64,
	pub line_behavior: ScaleBehavior,
	/// Dash pattern (dash, gap) in world units for animated edges.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed (world units per second).
	pub flow_speed: f64,
	/// Dashes fade to solid lines when zoomed out.
	pub dash_fade: AlphaFade,
	pub delete_radius: f64,
	pub delete_behavior: ScaleBehavior,
	/// Corner radius of smooth-step routes.
	pub corner_radius: f64,
}

/// Dotted background grid.
#[derive(Clone, Debug)]
pub struct GridScaleConfig {
	/// Distance between dots in world units.
	pub gap: f64,
	pub dot_radius: f64,
	pub dot_behavior: ScaleBehavior,
	pub fade: AlphaFade,
}

/// Complete scale configuration for all canvas elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub port: PortScaleConfig,
	pub edge: EdgeScaleConfig,
	pub grid: GridScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				width: 200.0,
				height: 72.0,
				corner_radius: 8.0,
				title_size: 15.0,
				subtitle_size: 12.0,
				delete_size: 18.0,
				delete_inset: 10.0,
			},
			port: PortScaleConfig {
				radius: 5.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 10.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 8.0,
					max_screen: f64::INFINITY,
				},
			},
			edge: EdgeScaleConfig {
				line_width: 2.0,
				line_behavior: ScaleBehavior::Screen,
				dash_pattern: (6.0, 4.0),
				flow_speed: 24.0,
				dash_fade: AlphaFade {
					zero_alpha_k: 0.3,
					full_alpha_k: 0.6,
				},
				delete_radius: 9.0,
				delete_behavior: ScaleBehavior::Clamped {
					min_screen: 7.0,
					max_screen: 20.0,
				},
				corner_radius: 8.0,
			},
			grid: GridScaleConfig {
				gap: 20.0,
				dot_radius: 1.0,
				dot_behavior: ScaleBehavior::Screen,
				fade: AlphaFade {
					zero_alpha_k: 0.25,
					full_alpha_k: 0.6,
				},
			},
		}
	}
}

/// Pre-computed values for one zoom level, in world-space.
///
/// Create this once per frame (or per hit test) and pass it around.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_width: f64,
	pub node_height: f64,
	pub corner_radius: f64,
	pub title_font: String,
	pub subtitle_font: String,
	pub delete_size: f64,
	pub delete_inset: f64,
	pub port_radius: f64,
	pub port_hit_radius: f64,
	pub edge_line_width: f64,
	pub dash_pattern: (f64, f64),
	/// Dash visibility [0, 1]. At 0, animated edges draw solid.
	pub dash_alpha: f64,
	pub edge_delete_radius: f64,
	pub edge_corner_radius: f64,
	pub grid_gap: f64,
	pub grid_dot_radius: f64,
	pub grid_alpha: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			node_width: config.node.width,
			node_height: config.node.height,
			corner_radius: config.node.corner_radius,
			title_font: format!("600 {}px sans-serif", config.node.title_size),
			subtitle_font: format!("{}px sans-serif", config.node.subtitle_size),
			delete_size: config.node.delete_size,
			delete_inset: config.node.delete_inset,
			port_radius: config.port.radius_behavior.apply(config.port.radius, k),
			port_hit_radius: config.port.hit_behavior.apply(config.port.hit_radius, k),
			edge_line_width: config.edge.line_behavior.apply(config.edge.line_width, k),
			dash_pattern: config.edge.dash_pattern,
			dash_alpha: config.edge.dash_fade.apply(k),
			edge_delete_radius: config
				.edge
				.delete_behavior
				.apply(config.edge.delete_radius, k),
			edge_corner_radius: config.edge.corner_radius,
			grid_gap: config.grid.gap,
			grid_dot_radius: config.grid.dot_behavior.apply(config.grid.dot_radius, k),
			grid_alpha: config.grid.fade.apply(k),
		}
	}

	/// Dash offset for the flow animation.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_targets_keep_minimum_screen_size() {
		let config = ScaleConfig::default();
		let near = ScaledValues::new(&config, 1.0);
		let far = ScaledValues::new(&config, 0.2);
		assert_eq!(near.port_hit_radius, 10.0);
		// 8px on screen at k = 0.2 is 40 world units.
		assert!((far.port_hit_radius - 40.0).abs() < 1e-9);
	}

	#[test]
	fn strokes_keep_constant_screen_width() {
		let config = ScaleConfig::default();
		for k in [0.25, 1.0, 4.0] {
			let scaled = ScaledValues::new(&config, k);
			assert!((scaled.edge_line_width * k - 2.0).abs() < 1e-9);
			assert!((scaled.grid_dot_radius * k - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn dashes_fade_out_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 1.0).dash_alpha, 1.0);
		assert_eq!(ScaledValues::new(&config, 0.2).dash_alpha, 0.0);
	}
}
