use leptos::prelude::*;

use crate::app_state::use_app_state;
use crate::campaign::PathType;

/// Inline CSS drawing a short sample of the stroke for `kind`.
pub fn swatch_style(kind: PathType) -> String {
	let line = if kind.dash().is_some() { "dashed" } else { "solid" };
	format!(
		"display: inline-block; width: 32px; vertical-align: middle; border-top: {}px {line} {};",
		kind.stroke_width(),
		kind.stroke_color()
	)
}

#[component]
pub fn PathLegend() -> impl IntoView {
	let app = use_app_state();
	let entries = app
		.peek(|s| {
			s.data
				.path_legend()
				.into_iter()
				.map(|(kind, name)| (kind, name.to_owned()))
				.collect::<Vec<_>>()
		})
		.unwrap_or_default();

	view! {
		<ul class="path-legend">
			{entries
				.into_iter()
				.map(|(kind, name)| {
					view! {
						<li>
							<span class="swatch" style=swatch_style(kind)></span>
							" "
							{name}
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}
