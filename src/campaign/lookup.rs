use std::collections::HashMap;

use super::{Area, CampaignData, FALLBACK_COLOR, Location, PathType, region_color};

impl CampaignData {
	pub fn location(&self, id: &str) -> Option<&Location> {
		self.areas
			.iter()
			.flat_map(|area| area.locations.iter())
			.find(|location| location.id == id)
	}

	/// The area a location belongs to.
	pub fn area_of(&self, location_id: &str) -> Option<&Area> {
		self.areas
			.iter()
			.find(|area| area.locations.iter().any(|l| l.id == location_id))
	}

	pub fn area_by_name(&self, name: &str) -> Option<&Area> {
		self.areas.iter().find(|area| area.name == name)
	}

	pub fn area_index(&self, name: &str) -> Option<usize> {
		self.areas.iter().position(|area| area.name == name)
	}

	/// Display name of a location, or the id itself when unknown.
	pub fn location_name<'a>(&'a self, id: &'a str) -> &'a str {
		self.location(id).map(|l| l.name.as_str()).unwrap_or(id)
	}

	/// Every location keyed by id, with its owning area.
	pub fn location_index(&self) -> HashMap<&str, (&Location, &Area)> {
		let mut index = HashMap::new();
		for area in &self.areas {
			for location in &area.locations {
				index.insert(location.id.as_str(), (location, area));
			}
		}
		index
	}

	pub fn region_color(&self, area_name: &str) -> &'static str {
		self.area_index(area_name)
			.map(region_color)
			.unwrap_or(FALLBACK_COLOR)
	}

	/// Known path types with their display names, in legend order. Types the
	/// Routes document does not name fall back to the raw key.
	pub fn path_legend(&self) -> Vec<(PathType, &str)> {
		PathType::KNOWN
			.iter()
			.map(|&kind| {
				let name = self
					.path_types
					.get(kind.as_str())
					.map(String::as_str)
					.unwrap_or(kind.as_str());
				(kind, name)
			})
			.collect()
	}
}
