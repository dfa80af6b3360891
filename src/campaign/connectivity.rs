use std::collections::{BTreeSet, HashMap};

use super::CampaignData;

/// How many of the least connected locations a report lists.
const LEAST_CONNECTED: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationRef {
	pub id: String,
	pub name: String,
	pub area: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionStats {
	pub area: String,
	pub total: usize,
	pub connected: usize,
	pub isolated: usize,
}

/// Route coverage of the campaign: which locations nobody can travel to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
	pub location_count: usize,
	pub route_count: usize,
	pub isolated: Vec<LocationRef>,
	/// One entry per area, in area order.
	pub regions: Vec<RegionStats>,
	/// Connected locations with their distinct neighbor count, fewest first.
	pub least_connected: Vec<(LocationRef, usize)>,
}

impl ConnectivityReport {
	/// Routes referencing unknown locations are ignored.
	pub fn analyze(data: &CampaignData) -> Self {
		let mut neighbors: HashMap<&str, BTreeSet<&str>> = data
			.areas
			.iter()
			.flat_map(|area| area.locations.iter())
			.map(|location| (location.id.as_str(), BTreeSet::new()))
			.collect();

		for route in &data.routes {
			let (from, to) = (route.from.as_str(), route.to.as_str());
			if !neighbors.contains_key(from) || !neighbors.contains_key(to) {
				continue;
			}
			if let Some(set) = neighbors.get_mut(from) {
				set.insert(to);
			}
			if let Some(set) = neighbors.get_mut(to) {
				set.insert(from);
			}
		}

		let mut report = ConnectivityReport {
			location_count: neighbors.len(),
			route_count: data.routes.len(),
			..Default::default()
		};
		let mut connected = Vec::new();

		for area in &data.areas {
			let mut stats = RegionStats {
				area: area.name.clone(),
				..Default::default()
			};
			for location in &area.locations {
				let degree = neighbors.get(location.id.as_str()).map_or(0, BTreeSet::len);
				let entry = LocationRef {
					id: location.id.clone(),
					name: location.name.clone(),
					area: area.name.clone(),
				};
				stats.total += 1;
				if degree == 0 {
					stats.isolated += 1;
					report.isolated.push(entry);
				} else {
					stats.connected += 1;
					connected.push((entry, degree));
				}
			}
			report.regions.push(stats);
		}

		// stable: ties keep area order
		connected.sort_by_key(|(_, degree)| *degree);
		connected.truncate(LEAST_CONNECTED);
		report.least_connected = connected;
		report
	}

	pub fn is_fully_connected(&self) -> bool {
		self.isolated.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_isolated_locations_per_region() {
		let data = CampaignData::from_json(
			r#"{"areas":[
				{"area":"North","pointsOfInterest":[{"id":"a","name":"A"},{"id":"b","name":"B"}]},
				{"area":"South","pointsOfInterest":[{"id":"c","name":"C"},{"id":"d","name":"D"}]}
			]}"#,
			r#"{"routes":[
				{"id":"r1","from":"a","to":"c"},
				{"id":"r2","from":"c","to":"a"},
				{"id":"r3","from":"a","to":"ghost"}
			]}"#,
		)
		.unwrap();

		let report = ConnectivityReport::analyze(&data);
		assert_eq!(report.location_count, 4);
		assert_eq!(report.route_count, 3);
		assert!(!report.is_fully_connected());

		let isolated: Vec<_> = report.isolated.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(isolated, ["b", "d"]);

		assert_eq!(
			report.regions[0],
			RegionStats {
				area: "North".into(),
				total: 2,
				connected: 1,
				isolated: 1,
			}
		);

		// duplicate routes count one neighbor
		assert_eq!(report.least_connected[0].1, 1);
		assert_eq!(report.least_connected.len(), 2);
	}
}
