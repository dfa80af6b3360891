use leptos::prelude::*;

use crate::app_state::use_app_state;
use crate::session::CampaignSession;
use crate::storage::KeyValueStore;
use crate::visibility::VisibilityKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityItem {
	pub id: String,
	pub label: String,
	pub visible: bool,
}

/// Rows for one store, in document order.
pub fn visibility_items<S: KeyValueStore>(
	session: &CampaignSession<S>,
	kind: VisibilityKind,
) -> Vec<VisibilityItem> {
	let data = &session.data;
	let item = |id: &str, label: String, visible: bool| VisibilityItem {
		id: id.to_owned(),
		label,
		visible,
	};
	match kind {
		VisibilityKind::Location => data
			.areas
			.iter()
			.flat_map(|area| {
				area.locations.iter().map(|l| {
					item(
						&l.id,
						format!("{} ({})", l.name, area.name),
						session.locations.is_visible(&l.id),
					)
				})
			})
			.collect(),
		VisibilityKind::Region => data
			.areas
			.iter()
			.map(|area| item(&area.name, area.name.clone(), session.regions.is_visible(&area.name)))
			.collect(),
		VisibilityKind::Path => data
			.routes
			.iter()
			.map(|route| {
				let label = format!(
					"{} \u{2192} {}",
					data.location_name(&route.from),
					data.location_name(&route.to)
				);
				item(&route.id, label, session.paths.is_visible(&route.id))
			})
			.collect(),
	}
}

fn title(kind: VisibilityKind) -> &'static str {
	match kind {
		VisibilityKind::Location => "Locations",
		VisibilityKind::Region => "Regions",
		VisibilityKind::Path => "Paths",
	}
}

/// Checklist for one visibility store with bulk actions.
#[component]
pub fn VisibilityPanel(kind: VisibilityKind) -> impl IntoView {
	let app = use_app_state();
	let items = move || {
		app.read(|s| visibility_items(s, kind))
			.unwrap_or_default()
	};
	let shown = move || items().iter().filter(|i| i.visible).count();

	view! {
		<details class="visibility-panel">
			<summary>
				{title(kind)} " " <span class="count">{move || format!("{}/{}", shown(), items().len())}</span>
			</summary>
			<div class="panel-actions">
				<button on:click=move |_| {
					app.update(|s| s.show_all(kind));
				}>"Show all"</button>
				<button on:click=move |_| {
					app.update(|s| s.hide_all(kind));
				}>"Hide all"</button>
				<button on:click=move |_| {
					app.update(|s| s.reset_visibility(kind));
				}>"Reset"</button>
			</div>
			<ul>
				<For
					each=items
					key=|item| (item.id.clone(), item.visible)
					children=move |item: VisibilityItem| {
						let id = item.id.clone();
						view! {
							<li>
								<label>
									<input
										type="checkbox"
										prop:checked=item.visible
										on:change=move |_| {
											app.update(|s| s.toggle(kind, &id));
										}
									/>
									{item.label}
								</label>
							</li>
						}
					}
				/>
			</ul>
		</details>
	}
}
