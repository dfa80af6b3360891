use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an optional field, falling back to its default when the value is
/// `null` or of the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	if value.is_null() {
		return Ok(T::default());
	}
	Ok(T::deserialize(value).unwrap_or_else(|err| {
		warn!("Ignoring malformed campaign field: {err}");
		T::default()
	}))
}

/// Effect that strengthens or weakens something at a location.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
	#[serde(default, deserialize_with = "lenient")]
	pub effect: String,
	#[serde(default, deserialize_with = "lenient")]
	pub mechanics: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
	#[serde(default, deserialize_with = "lenient")]
	pub name: String,
	#[serde(default, deserialize_with = "lenient")]
	pub count: String,
	#[serde(default, deserialize_with = "lenient")]
	pub level: String,
	#[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// A point of interest. Belongs to exactly one [`Area`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
	pub id: String,
	pub name: String,
	#[serde(default, deserialize_with = "lenient")]
	pub tags: Vec<String>,
	#[serde(default, deserialize_with = "lenient")]
	pub amplifiers: Vec<Modifier>,
	#[serde(default, deserialize_with = "lenient")]
	pub dampeners: Vec<Modifier>,
	#[serde(default, deserialize_with = "lenient")]
	pub encounters: Vec<Encounter>,
	#[serde(default, deserialize_with = "lenient")]
	pub loot: Vec<String>,
	#[serde(default, deserialize_with = "lenient")]
	pub clues: Vec<String>,
}

/// A region. The name is the unique key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
	#[serde(rename = "area")]
	pub name: String,
	#[serde(rename = "pointsOfInterest", default)]
	pub locations: Vec<Location>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreasDocument {
	#[serde(default)]
	pub schema_version: u32,
	#[serde(default)]
	pub notes: String,
	#[serde(default)]
	pub areas: Vec<Area>,
}

/// Kind of route between two locations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
	MainRoad,
	NarrowRoad,
	ObstructedRoad,
	HiddenPath,
	#[default]
	#[serde(other)]
	Other,
}

impl PathType {
	/// All known path types, in legend order.
	pub const KNOWN: [PathType; 4] = [
		PathType::MainRoad,
		PathType::NarrowRoad,
		PathType::ObstructedRoad,
		PathType::HiddenPath,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			PathType::MainRoad => "main_road",
			PathType::NarrowRoad => "narrow_road",
			PathType::ObstructedRoad => "obstructed_road",
			PathType::HiddenPath => "hidden_path",
			PathType::Other => "other",
		}
	}

	/// Color of the travel-time label drawn on an edge.
	pub fn label_color(self) -> &'static str {
		match self {
			PathType::MainRoad => "#1890ff",
			PathType::HiddenPath => "#fa8c16",
			PathType::ObstructedRoad => "#f5222d",
			_ => "#666666",
		}
	}

	/// Stroke color used for the edge itself and in the legend.
	pub fn stroke_color(self) -> &'static str {
		match self {
			PathType::MainRoad => "#1890ff",
			PathType::NarrowRoad => "#52c41a",
			PathType::ObstructedRoad => "#f5222d",
			PathType::HiddenPath => "#fa8c16",
			PathType::Other => "#8c8c8c",
		}
	}

	pub fn stroke_width(self) -> f64 {
		match self {
			PathType::MainRoad => 3.0,
			_ => 2.0,
		}
	}

	/// Dash pattern as `(dash, gap)`; `None` draws a solid line.
	pub fn dash(self) -> Option<(f64, f64)> {
		match self {
			PathType::HiddenPath => Some((5.0, 5.0)),
			PathType::ObstructedRoad => Some((10.0, 5.0)),
			_ => None,
		}
	}
}

/// A route between two locations. Undirected in effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	pub id: String,
	pub from: String,
	pub to: String,
	#[serde(default, deserialize_with = "lenient")]
	pub path_type: PathType,
	#[serde(default, deserialize_with = "lenient")]
	pub description: String,
	#[serde(default, deserialize_with = "lenient")]
	pub travel_time: String,
	#[serde(default, deserialize_with = "lenient")]
	pub obstacles: Vec<String>,
	#[serde(default, deserialize_with = "lenient")]
	pub requirements: Vec<String>,
	#[serde(default, deserialize_with = "lenient")]
	pub notes: String,
}

impl Route {
	/// Whether this route touches `location_id` on either end.
	pub fn touches(&self, location_id: &str) -> bool {
		self.from == location_id || self.to == location_id
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesDocument {
	#[serde(default)]
	pub schema_version: u32,
	#[serde(default)]
	pub notes: String,
	#[serde(default)]
	pub path_types: BTreeMap<String, String>,
	#[serde(default)]
	pub routes: Vec<Route>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn null_optional_fields_load_as_empty() {
		let location: Location =
			serde_json::from_str(r#"{"id":"a","name":"A","tags":null,"loot":null}"#).unwrap();
		assert!(location.tags.is_empty());
		assert!(location.loot.is_empty());

		let doc: AreasDocument = serde_json::from_str(
			r#"{"areas":[{"area":"North","pointsOfInterest":[{"id":"a","name":"A","tags":null}]}]}"#,
		)
		.unwrap();
		assert_eq!(doc.areas[0].locations[0].id, "a");
	}

	#[test]
	fn wrong_typed_fields_fall_back() {
		let location: Location = serde_json::from_str(
			r#"{"id":"a","name":"A","tags":"ruin","clues":["x"],"encounters":[{"name":"Wolves","count":3}]}"#,
		)
		.unwrap();
		assert!(location.tags.is_empty());
		assert_eq!(location.clues, ["x"]);
		assert_eq!(location.encounters[0].name, "Wolves");
		assert_eq!(location.encounters[0].count, "");

		let route: Route = serde_json::from_str(
			r#"{"id":"r","from":"a","to":"b","pathType":null,"travelTime":2,"obstacles":{"x":1}}"#,
		)
		.unwrap();
		assert_eq!(route.path_type, PathType::Other);
		assert_eq!(route.travel_time, "");
		assert!(route.obstacles.is_empty());
	}

	#[test]
	fn required_fields_still_required() {
		assert!(serde_json::from_str::<Location>(r#"{"id":"a","tags":[]}"#).is_err());
		assert!(serde_json::from_str::<Route>(r#"{"id":"r","from":"a"}"#).is_err());
	}
}
