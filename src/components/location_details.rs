use leptos::prelude::*;

use crate::app_state::use_app_state;
use crate::campaign::CampaignData;

/// One route out of a location, as listed in the details panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteLine {
	pub destination: String,
	pub kind: String,
	pub travel_time: String,
}

/// Routes touching `id`, named from its side.
pub fn routes_from(data: &CampaignData, id: &str) -> Vec<RouteLine> {
	let legend = data.path_legend();
	data.routes
		.iter()
		.filter(|route| route.touches(id))
		.map(|route| {
			let other = if route.from == id { &route.to } else { &route.from };
			let kind = legend
				.iter()
				.find(|(kind, _)| *kind == route.path_type)
				.map_or(route.path_type.as_str(), |(_, name)| *name);
			RouteLine {
				destination: data.location_name(other).to_owned(),
				kind: kind.to_owned(),
				travel_time: route.travel_time.clone(),
			}
		})
		.collect()
}

fn bullet_list(title: &'static str, items: Vec<String>) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<h4>{title}</h4>
			<ul>{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
		}
	})
}

/// Side panel for the selected location.
#[component]
pub fn LocationDetails(#[prop(into)] selected: Signal<Option<String>>) -> impl IntoView {
	let app = use_app_state();
	move || {
		let id = selected.get()?;
		let (location, area, routes) = app.peek(|s| {
			let location = s.data.location(&id)?.clone();
			let area = s.data.area_of(&id).map(|a| a.name.clone()).unwrap_or_default();
			Some((location, area, routes_from(&s.data, &id)))
		})??;
		let encounters = location
			.encounters
			.iter()
			.map(|e| format!("{} x{} ({})", e.name, e.count, e.level))
			.collect();
		let routes = routes
			.into_iter()
			.map(|r| {
				if r.travel_time.is_empty() {
					format!("{}: {}", r.destination, r.kind)
				} else {
					format!("{}: {}, {}", r.destination, r.kind, r.travel_time)
				}
			})
			.collect();
		Some(view! {
			<aside class="location-details">
				<h3>{location.name}</h3>
				<p class="region">{area}</p>
				<p class="tags">{location.tags.join(", ")}</p>
				{bullet_list("Routes", routes)}
				{bullet_list("Encounters", encounters)}
				{bullet_list("Clues", location.clues)}
				{bullet_list("Loot", location.loot)}
			</aside>
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn routes_are_named_from_the_selected_end() {
		let data = CampaignData::from_json(
			r#"{"areas":[{"area":"North","pointsOfInterest":[{"id":"a","name":"Alpha"},{"id":"b","name":"Beta"}]}]}"#,
			r#"{"routes":[
				{"id":"r1","from":"a","to":"b","pathType":"main_road","travelTime":"2 hours"},
				{"id":"r2","from":"b","to":"a","pathType":"hidden_path"}
			],"pathTypes":{"main_road":"Main Road"}}"#,
		)
		.unwrap();
		let lines = routes_from(&data, "a");
		assert_eq!(lines, [
			RouteLine {
				destination: "Beta".into(),
				kind: "Main Road".into(),
				travel_time: "2 hours".into(),
			},
			RouteLine {
				destination: "Beta".into(),
				kind: "hidden_path".into(),
				travel_time: String::new(),
			},
		]);
		assert!(routes_from(&data, "zz").is_empty());
	}
}
