//! Persisted record shapes, one per visibility store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the three visibility stores a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityKind {
	Location,
	Region,
	Path,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationRecord {
	visible_locations: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionRecord {
	visible_regions: Vec<String>,
}

/// Older or hand-edited data may hold a flag map where a list is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listed<R> {
	Record(R),
	Flags(BTreeMap<String, bool>),
}

fn all_visible(ids: Vec<String>) -> BTreeMap<String, bool> {
	ids.into_iter().map(|id| (id, true)).collect()
}

fn visible_list(flags: &BTreeMap<String, bool>) -> Vec<String> {
	flags
		.iter()
		.filter(|&(_, &visible)| visible)
		.map(|(id, _)| id.clone())
		.collect()
}

impl VisibilityKind {
	pub const ALL: [VisibilityKind; 3] = [Self::Location, Self::Region, Self::Path];

	/// Storage key of the store's record.
	pub fn key(self) -> &'static str {
		match self {
			Self::Location => "location-visibility",
			Self::Region => "region-visibility",
			Self::Path => "path-visibility",
		}
	}

	/// Serialize `flags` into this kind's record. List kinds keep only the
	/// visible ids; the path record keeps explicit `false` entries.
	pub fn encode(self, flags: &BTreeMap<String, bool>) -> serde_json::Result<String> {
		match self {
			Self::Location => serde_json::to_string(&LocationRecord {
				visible_locations: visible_list(flags),
			}),
			Self::Region => serde_json::to_string(&RegionRecord {
				visible_regions: visible_list(flags),
			}),
			Self::Path => serde_json::to_string(flags),
		}
	}

	pub fn decode(self, raw: &str) -> serde_json::Result<BTreeMap<String, bool>> {
		Ok(match self {
			Self::Location => match serde_json::from_str(raw)? {
				Listed::Record(LocationRecord { visible_locations }) => all_visible(visible_locations),
				Listed::Flags(flags) => flags,
			},
			Self::Region => match serde_json::from_str(raw)? {
				Listed::Record(RegionRecord { visible_regions }) => all_visible(visible_regions),
				Listed::Flags(flags) => flags,
			},
			Self::Path => serde_json::from_str(raw)?,
		})
	}
}

impl fmt::Display for VisibilityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Location => "location",
			Self::Region => "region",
			Self::Path => "path",
		})
	}
}
