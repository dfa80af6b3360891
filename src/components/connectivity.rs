use leptos::prelude::*;

use crate::app_state::use_app_state;

/// Which locations have no routes, per region and overall.
#[component]
pub fn ConnectivitySummary() -> impl IntoView {
	let app = use_app_state();
	let Some(report) = app.peek(|s| s.connectivity()) else {
		return ().into_any();
	};
	let headline = if report.is_fully_connected() {
		format!(
			"All {} locations are reachable over {} routes",
			report.location_count, report.route_count
		)
	} else {
		format!(
			"{} of {} locations have no routes",
			report.isolated.len(),
			report.location_count
		)
	};

	view! {
		<details class="connectivity">
			<summary>{headline}</summary>
			<table>
				<tr>
					<th>"Region"</th>
					<th>"Locations"</th>
					<th>"Connected"</th>
					<th>"Isolated"</th>
				</tr>
				{report
					.regions
					.into_iter()
					.map(|r| {
						view! {
							<tr>
								<td>{r.area}</td>
								<td>{r.total}</td>
								<td>{r.connected}</td>
								<td>{r.isolated}</td>
							</tr>
						}
					})
					.collect_view()}
			</table>
			<h4>"Isolated"</h4>
			<ul>
				{report
					.isolated
					.into_iter()
					.map(|l| view! { <li>{format!("{} ({})", l.name, l.area)}</li> })
					.collect_view()}
			</ul>
			<h4>"Least connected"</h4>
			<ol>
				{report
					.least_connected
					.into_iter()
					.map(|(l, n)| view! { <li>{format!("{}: {n}", l.name)}</li> })
					.collect_view()}
			</ol>
		</details>
	}
	.into_any()
}
