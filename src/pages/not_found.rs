use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Uh oh! Nothing here."</h1>
		<A href="/">"Back to the map"</A>
	}
}
