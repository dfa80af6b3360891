use std::collections::HashSet;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app_state::use_app_state;
use crate::components::PathLegend;
use crate::components::campaign_graph::{CampaignGraphCanvas, GraphView};

/// What the players have discovered so far. Read only.
#[component]
pub fn PlayerMap() -> impl IntoView {
	let app = use_app_state();
	let data = Signal::derive(move || {
		app.read(|s| GraphView {
			graph: s.player_graph(),
			hidden: HashSet::new(),
			faded: HashSet::new(),
		})
		.unwrap_or_default()
	});
	let empty = move || data.with(|view| view.graph.nodes.is_empty());

	view! {
		<div class="map-page">
			<div class="map-canvas">
				<CampaignGraphCanvas data=data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Explored lands"</h1>
					<Show when=empty>
						<p class="subtitle">"Nothing has been discovered yet."</p>
					</Show>
				</div>
			</div>
			<aside class="sidebar">
				<nav>
					<A href="/">"GM overview"</A>
				</nav>
				<PathLegend />
			</aside>
		</div>
	}
}
