use leptos::prelude::*;

use crate::app_state::{NoticeKind, use_app_state};

/// Transient banner for save results.
#[component]
pub fn NoticeBanner() -> impl IntoView {
	let app = use_app_state();
	move || {
		app.notice().map(|notice| {
			let class = match notice.kind {
				NoticeKind::Success => "notice notice-success",
				NoticeKind::Error => "notice notice-error",
			};
			view! { <div class=class role="status">{notice.text}</div> }
		})
	}
}
