//! Derived visibility: what players see of a route.

use serde::{Deserialize, Serialize};

use crate::campaign::Route;

/// How the per-path flag combines with the endpoint rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathGating {
	/// A route shows when both of its locations do.
	#[default]
	Endpoints,
	/// As `Endpoints`, and the route's own flag must be set too.
	EndpointsAndFlag,
}

/// True iff both endpoints of `route` are visible.
pub fn should_path_be_visible(route: &Route, is_location_visible: impl Fn(&str) -> bool) -> bool {
	is_location_visible(&route.from) && is_location_visible(&route.to)
}

/// Player-facing visibility of `route` under `gating`.
pub fn is_path_shown(
	route: &Route,
	gating: PathGating,
	is_location_visible: impl Fn(&str) -> bool,
	is_path_flagged: impl Fn(&str) -> bool,
) -> bool {
	should_path_be_visible(route, is_location_visible)
		&& match gating {
			PathGating::Endpoints => true,
			PathGating::EndpointsAndFlag => is_path_flagged(&route.id),
		}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn route() -> Route {
		serde_json::from_str(r#"{"id":"r1","from":"a","to":"b"}"#).unwrap()
	}

	#[test]
	fn both_endpoints_required() {
		let route = route();
		for (a, b, want) in [
			(false, false, false),
			(true, false, false),
			(false, true, false),
			(true, true, true),
		] {
			let visible = |id: &str| if id == "a" { a } else { b };
			assert_eq!(should_path_be_visible(&route, visible), want, "a={a} b={b}");
		}
	}

	#[test]
	fn gating_adds_the_path_flag() {
		let route = route();
		let all = |_: &str| true;
		let none = |_: &str| false;
		assert!(is_path_shown(&route, PathGating::Endpoints, all, none));
		assert!(!is_path_shown(&route, PathGating::EndpointsAndFlag, all, none));
		assert!(is_path_shown(&route, PathGating::EndpointsAndFlag, all, all));
		assert!(!is_path_shown(&route, PathGating::EndpointsAndFlag, none, all));
	}
}
