//! Runtime settings, embedded at build time from `assets/settings.json`.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::layout::{CircularLayoutOptions, HierarchicalLayoutOptions};
use crate::visibility::PathGating;

const EMBEDDED_SETTINGS: &str = include_str!("../assets/settings.json");

/// Every field has a default, so a partial file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapSettings {
	/// Ring placement of regions on the GM overview.
	pub region_layout: CircularLayoutOptions,
	/// Ring placement of regions on the player map.
	pub player_layout: CircularLayoutOptions,
	/// Layered placement used by the "arrange" action.
	pub layered_layout: HierarchicalLayoutOptions,
	/// Quiet period after the last drag before positions are saved.
	pub position_save_debounce_ms: u32,
	pub click_suppression_ms: u32,
	pub path_gating: PathGating,
	/// How long the position save notice stays up.
	pub notice_ms: u32,
}

impl Default for MapSettings {
	fn default() -> Self {
		let region_layout = CircularLayoutOptions::regions()
			.with_radius(1300.0)
			.with_center(1400.0, 1100.0)
			.with_spacing(1.1);
		Self {
			region_layout,
			player_layout: region_layout,
			layered_layout: HierarchicalLayoutOptions::region_level(),
			position_save_debounce_ms: 300,
			click_suppression_ms: 200,
			path_gating: PathGating::default(),
			notice_ms: 2000,
		}
	}
}

impl MapSettings {
	pub fn from_json(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}

	/// Embedded settings, or defaults when they do not parse.
	pub fn load() -> Self {
		match Self::from_json(EMBEDDED_SETTINGS) {
			Ok(settings) => {
				info!("Loaded map settings");
				settings
			}
			Err(err) => {
				warn!("Invalid settings file, using defaults: {err}");
				Self::default()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::RankDirection;

	#[test]
	fn partial_file_keeps_defaults() {
		let settings = MapSettings::from_json(
			r#"{"positionSaveDebounceMs":500,"pathGating":"endpoints_and_flag",
			"regionLayout":{"radius":900}}"#,
		)
		.unwrap();
		assert_eq!(settings.position_save_debounce_ms, 500);
		assert_eq!(settings.path_gating, PathGating::EndpointsAndFlag);
		assert_eq!(settings.region_layout.radius, Some(900.0));
		// unspecified layout fields fall back to the ring defaults
		assert_eq!(settings.region_layout.spacing_factor, 0.85);
		assert_eq!(settings.click_suppression_ms, 200);
	}

	#[test]
	fn embedded_settings_parse() {
		let settings = MapSettings::from_json(EMBEDDED_SETTINGS).unwrap();
		assert_eq!(settings.region_layout.radius, Some(1300.0));
		assert_eq!(settings.layered_layout.direction, RankDirection::LeftRight);
	}

	#[test]
	fn defaults() {
		let settings = MapSettings::default();
		assert_eq!(settings.region_layout.center.x, 1400.0);
		assert_eq!(settings.region_layout.spacing_factor, 1.1);
		assert_eq!(settings.position_save_debounce_ms, 300);
		assert_eq!(settings.path_gating, PathGating::Endpoints);
	}
}
