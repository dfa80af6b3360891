use std::collections::HashSet;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::{debug, info};

use crate::app_state::{NoticeKind, now_ms, use_app_state};
use crate::components::campaign_graph::{CampaignGraphCanvas, GraphView};
use crate::components::{
	ConnectivitySummary, LocationDetails, NoticeBanner, PathLegend, VisibilityPanel,
};
use crate::events::MapEvent;
use crate::graph::{NodeKind, Position};
use crate::positions::LayoutMetadata;
use crate::visibility::VisibilityKind;

/// Path of the focused map for `area`.
pub fn region_path(area: &str) -> String {
	let encoded: String = js_sys::encode_uri_component(area).into();
	format!("/region/{encoded}")
}

/// GM overview: every region and location, draggable, with reveal controls.
#[component]
pub fn GmMap() -> impl IntoView {
	let app = use_app_state();
	let hovered = RwSignal::new(None::<String>);
	let selected = RwSignal::new(None::<String>);
	let open_region = RwSignal::new(None::<String>);
	let export_text = RwSignal::new(String::new());
	let import_text = RwSignal::new(String::new());

	// hover reaches the page through the event bus
	let subscription = app.peek(|s| {
		s.events.subscribe(move |event| {
			if let MapEvent::NodeHover { node_id } = event {
				hovered.set(node_id.clone());
			}
		})
	});
	let _subscription = StoredValue::new_local(subscription);

	on_cleanup(move || app.cancel_pending_save());

	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(area) = open_region.get() {
			info!("Opening region {area}");
			navigate(&region_path(&area), Default::default());
		}
	});

	let data = Signal::derive(move || {
		app.read(|s| {
			let graph = s.gm_graph();
			GraphView {
				hidden: s.hidden_ids(&graph),
				graph,
				faded: HashSet::new(),
			}
		})
		.unwrap_or_default()
	});

	let on_node_click = Callback::new(move |id: String| {
		if app.peek(|s| s.is_click_blocked(&id, now_ms())).unwrap_or(false) {
			debug!("Click on {id} suppressed");
			return;
		}
		let Some((kind, area)) = app.peek(|s| s.node(&id).map(|n| (n.kind, n.area.clone()))).flatten() else {
			return;
		};
		match kind {
			NodeKind::Region => open_region.set(Some(area)),
			NodeKind::Location => selected.set(Some(id)),
		}
	});
	let on_drag_stop = Callback::new(move |(id, position): (String, Position)| {
		app.drag_stopped(&id, position);
	});
	let on_hover = Callback::new(move |node_id: Option<String>| {
		app.peek(|s| s.events.emit(&MapEvent::NodeHover { node_id }));
	});
	let on_toggle = Callback::new(move |id: String| {
		app.update(|s| {
			s.suppress_click(&id, now_ms());
			s.toggle_location(&id);
		});
	});

	let save = move |_| {
		app.cancel_pending_save();
		app.report_save("Layout", app.update(|s| s.save_positions()));
	};
	let pin = move |_| {
		app.cancel_pending_save();
		app.report_save("Current layout", app.update(|s| s.save_current_layout()));
	};
	let arrange = move |_| {
		app.cancel_pending_save();
		app.report_save("Arranged layout", app.update(|s| s.arrange_regions()));
	};
	let reset = move |_| {
		app.cancel_pending_save();
		match app.update(|s| s.reset_layout()) {
			Some(Ok(())) => app.notify(NoticeKind::Success, "Layout reset"),
			Some(Err(err)) => app.notify(NoticeKind::Error, format!("Reset failed: {err}")),
			None => {}
		}
	};
	let export = move |_| {
		let json = app.peek(|s| {
			let metadata = LayoutMetadata {
				description: Some("GM overview".to_owned()),
				..LayoutMetadata::default()
			};
			s.export_layout(metadata, now_ms()).to_json()
		});
		match json {
			Some(Ok(json)) => export_text.set(json),
			Some(Err(err)) => app.notify(NoticeKind::Error, format!("Export failed: {err}")),
			None => {}
		}
	};
	let import = move |_| {
		let text = import_text.get_untracked();
		app.cancel_pending_save();
		match app.update(|s| s.import_layout(&text)) {
			Some(Ok(moved)) => {
				app.notify(NoticeKind::Success, format!("Imported positions for {moved} regions"));
				import_text.set(String::new());
			}
			Some(Err(err)) => app.notify(NoticeKind::Error, format!("Import failed: {err}")),
			None => {}
		}
	};

	let hovered_label = move || {
		hovered
			.get()
			.and_then(|id| app.peek(|s| s.node(&id).map(|n| n.label.clone())).flatten())
	};

	view! {
		<div class="map-page">
			<div class="map-canvas">
				<CampaignGraphCanvas
					data=data
					editable=true
					fullscreen=true
					on_node_click=on_node_click
					on_drag_stop=on_drag_stop
					on_hover=on_hover
					on_toggle=on_toggle
				/>
				<div class="graph-overlay">
					<h1>"Campaign map"</h1>
					<p class="subtitle">
						"Drag regions and locations to arrange them. Click a region to focus it. "
						"The dot on a location reveals it to players."
					</p>
					<p class="hovered">{hovered_label}</p>
				</div>
			</div>
			<aside class="sidebar">
				<nav>
					<A href="/player">"Player view"</A>
				</nav>
				<NoticeBanner />
				<div class="toolbar">
					<button on:click=save>"Save layout"</button>
					<button on:click=pin>"Pin current layout"</button>
					<button on:click=arrange>"Arrange regions"</button>
					<button on:click=reset>"Reset layout"</button>
				</div>
				<LocationDetails selected=selected />
				<VisibilityPanel kind=VisibilityKind::Region />
				<VisibilityPanel kind=VisibilityKind::Location />
				<VisibilityPanel kind=VisibilityKind::Path />
				<PathLegend />
				<ConnectivitySummary />
				<details class="layout-file">
					<summary>"Layout file"</summary>
					<button on:click=export>"Export"</button>
					<textarea readonly=true prop:value=move || export_text.get()></textarea>
					<textarea
						placeholder="Paste a layout file"
						prop:value=move || import_text.get()
						on:input=move |ev| import_text.set(event_target_value(&ev))
					></textarea>
					<button on:click=import>"Import"</button>
				</details>
			</aside>
		</div>
	}
}
