use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};

use super::gm_map::region_path;
use crate::app_state::use_app_state;
use crate::components::campaign_graph::{CampaignGraphCanvas, GraphView};
use crate::components::{LocationDetails, PathLegend};
use crate::graph::GraphData;

fn decode(raw: &str) -> String {
	js_sys::decode_uri_component(raw)
		.map(String::from)
		.unwrap_or_else(|_| raw.to_owned())
}

/// One region around its busiest location, with the locations it borders.
#[component]
pub fn RegionFocus() -> impl IntoView {
	let app = use_app_state();
	let params = use_params_map();
	let area = Memo::new(move |_| {
		params
			.read()
			.get("name")
			.map(|raw| decode(&raw))
			.unwrap_or_default()
	});
	let selected = RwSignal::new(None::<String>);
	let open_region = RwSignal::new(None::<String>);

	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(area) = open_region.get() {
			navigate(&region_path(&area), Default::default());
		}
	});
	Effect::new(move |_| {
		area.track();
		selected.set(None);
	});

	let data = Signal::derive(move || {
		let area = area.get();
		app.read(|s| {
			let focused = s.region_focus(&area);
			let graph = GraphData {
				nodes: focused.nodes,
				edges: focused.edges,
			};
			GraphView {
				hidden: s.hidden_ids(&graph),
				graph,
				faded: focused.neighbor_ids.into_iter().collect(),
			}
		})
		.unwrap_or_default()
	});
	let known = move || !data.with(|view| view.graph.nodes.is_empty());

	// neighbors open their own region
	let on_node_click = Callback::new(move |id: String| {
		let here = area.get_untracked();
		let owner = app
			.peek(|s| s.data.area_of(&id).map(|a| a.name.clone()))
			.flatten();
		match owner {
			Some(owner) if owner != here => open_region.set(Some(owner)),
			_ => selected.set(Some(id)),
		}
	});

	view! {
		<div class="map-page">
			<div class="map-canvas">
				<CampaignGraphCanvas data=data fullscreen=true on_node_click=on_node_click />
				<div class="graph-overlay">
					<h1>{move || area.get()}</h1>
					<Show
						when=known
						fallback=|| view! { <p class="subtitle">"No region by that name."</p> }
					>
						<p class="subtitle">"Faded locations belong to neighboring regions."</p>
					</Show>
				</div>
			</div>
			<aside class="sidebar">
				<nav>
					<A href="/">"Back to overview"</A>
				</nav>
				<LocationDetails selected=selected />
				<PathLegend />
			</aside>
		</div>
	}
}
