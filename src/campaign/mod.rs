//! Static campaign data: regions, their points of interest and the routes between them.
//!
//! The data is loaded once per session and never mutated.

mod connectivity;
mod lookup;
mod types;

use std::collections::BTreeMap;

pub use connectivity::{ConnectivityReport, LocationRef, RegionStats};
pub use types::{
	Area, AreasDocument, Encounter, Location, Modifier, PathType, Route, RoutesDocument,
};

use crate::error::CampaignDataError;

/// Region palette, assigned by region index.
pub const REGION_COLORS: [&str; 8] = [
	"rgba(255, 105, 135, 1)",
	"rgba(50, 205, 50, 1)",
	"rgba(30, 144, 255, 1)",
	"rgba(255, 140, 0, 1)",
	"rgba(186, 85, 211, 1)",
	"rgba(255, 215, 0, 1)",
	"rgba(135, 206, 235, 1)",
	"rgba(255, 165, 0, 1)",
];

/// Color for a location whose region is unknown.
pub const FALLBACK_COLOR: &str = "#1890ff";

pub fn region_color(index: usize) -> &'static str {
	REGION_COLORS[index % REGION_COLORS.len()]
}

/// Both input documents of a campaign.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CampaignData {
	pub areas: Vec<Area>,
	pub routes: Vec<Route>,
	/// Display names keyed by path type (`main_road` -> "Main roads").
	pub path_types: BTreeMap<String, String>,
}

impl CampaignData {
	pub fn new(areas: AreasDocument, routes: RoutesDocument) -> Self {
		Self {
			areas: areas.areas,
			routes: routes.routes,
			path_types: routes.path_types,
		}
	}

	/// Parse the Areas and Routes JSON documents.
	pub fn from_json(areas_json: &str, routes_json: &str) -> Result<Self, CampaignDataError> {
		let areas: AreasDocument =
			serde_json::from_str(areas_json).map_err(|source| CampaignDataError::Parse {
				document: "areas",
				source,
			})?;
		let routes: RoutesDocument =
			serde_json::from_str(routes_json).map_err(|source| CampaignDataError::Parse {
				document: "routes",
				source,
			})?;
		Ok(Self::new(areas, routes))
	}

	/// Ids of every location, in area order.
	pub fn location_ids(&self) -> Vec<String> {
		self.areas
			.iter()
			.flat_map(|area| area.locations.iter().map(|l| l.id.clone()))
			.collect()
	}

	pub fn region_names(&self) -> Vec<String> {
		self.areas.iter().map(|area| area.name.clone()).collect()
	}

	pub fn route_ids(&self) -> Vec<String> {
		self.routes.iter().map(|route| route.id.clone()).collect()
	}
}
