//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};

// Modules
pub mod app_state;
pub mod campaign;
mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod layout;
mod pages;
pub mod positions;
pub mod session;
pub mod storage;
pub mod visibility;

// Top-Level pages
use crate::pages::gm_map::GmMap;
use crate::pages::not_found::NotFound;
use crate::pages::player_map::PlayerMap;
use crate::pages::region_focus::RegionFocus;

use crate::app_state::AppState;
use crate::campaign::CampaignData;
use crate::config::MapSettings;
use crate::session::{CampaignSession, embedded_campaign};
use crate::storage::AnyStorage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

fn open_session() -> AppState {
	let data = embedded_campaign().unwrap_or_else(|err| {
		error!("Bundled campaign data is invalid: {err}");
		CampaignData::default()
	});
	AppState::new(CampaignSession::new(
		data,
		MapSettings::load(),
		AnyStorage::detect(),
	))
}

/// An app router for the GM overview, region maps and the player map
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(open_session());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Campaign map" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=GmMap />
				<Route path=path!("/region/:name") view=RegionFocus />
				<Route path=path!("/player") view=PlayerMap />
			</Routes>
		</Router>
	}
}
