//! The reactive handle pages use to reach the campaign session.

use std::time::Duration;

use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout, set_timeout_with_handle};
use leptos::prelude::*;
use log::{debug, error};

use crate::graph::Position;
use crate::session::CampaignSession;
use crate::storage::AnyStorage;

pub type Session = CampaignSession<AnyStorage>;

pub fn now_ms() -> f64 {
	js_sys::Date::now()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
	Success,
	Error,
}

/// A short-lived status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	id: u64,
	pub kind: NoticeKind,
	pub text: String,
}

/// Shared through context. The session itself is not reactive; every
/// mutation bumps `revision`, which readers track.
#[derive(Clone, Copy)]
pub struct AppState {
	session: StoredValue<Session, LocalStorage>,
	revision: RwSignal<u64>,
	notice: RwSignal<Option<Notice>>,
	pending_save: StoredValue<Option<TimeoutHandle>>,
}

impl AppState {
	pub fn new(session: Session) -> Self {
		Self {
			session: StoredValue::new_local(session),
			revision: RwSignal::new(0),
			notice: RwSignal::new(None),
			pending_save: StoredValue::new(None),
		}
	}

	/// Read the session, subscribing the caller to later changes.
	pub fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
		self.revision.track();
		self.session.try_with_value(f)
	}

	/// Read without subscribing.
	pub fn peek<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
		self.session.try_with_value(f)
	}

	pub fn update<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
		let out = self.session.try_update_value(f);
		self.revision.update(|r| *r += 1);
		out
	}

	pub fn notice(&self) -> Option<Notice> {
		self.notice.get()
	}

	/// Show `text` for the configured time.
	pub fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
		let id = self.notice.with_untracked(|n| n.as_ref().map_or(0, |n| n.id + 1));
		self.notice.set(Some(Notice {
			id,
			kind,
			text: text.into(),
		}));
		let ms = self.peek(|s| s.settings.notice_ms).unwrap_or(2000);
		let notice = self.notice;
		set_timeout(
			move || {
				// a newer notice keeps its own timer
				if notice.with_untracked(|n| n.as_ref().is_some_and(|n| n.id == id)) {
					notice.set(None);
				}
			},
			Duration::from_millis(ms.into()),
		);
	}

	/// A node drag ended. Restarts the save timer when the node moved.
	pub fn drag_stopped(&self, id: &str, position: Position) {
		let Some(ticket) = self
			.update(|s| s.record_drag_stop(id, position))
			.flatten()
		else {
			return;
		};
		self.clear_timer();
		let delay = self
			.peek(|s| s.positions.debounce_ms())
			.unwrap_or_default();
		let state = *self;
		match set_timeout_with_handle(
			move || {
				state.pending_save.set_value(None);
				match state.update(|s| s.run_scheduled_save(ticket)).flatten() {
					Some(Ok(())) => state.notify(NoticeKind::Success, "Layout saved"),
					Some(Err(err)) => state.notify(NoticeKind::Error, format!("Could not save layout: {err}")),
					None => debug!("Save superseded by a later drag"),
				}
			},
			Duration::from_millis(delay.into()),
		) {
			Ok(handle) => self.pending_save.set_value(Some(handle)),
			Err(err) => error!("Could not schedule position save: {err:?}"),
		}
	}

	fn clear_timer(&self) {
		if let Some(handle) = self.pending_save.try_update_value(Option::take).flatten() {
			handle.clear();
		}
	}

	/// Drop any save still waiting on the timer.
	pub fn cancel_pending_save(&self) {
		self.clear_timer();
		self.session.try_update_value(|s| s.positions.cancel_pending());
	}

	/// Report a layout action's outcome the way position saves are reported.
	pub fn report_save<E: std::fmt::Display>(&self, what: &str, result: Option<Result<(), E>>) {
		match result {
			Some(Ok(())) => self.notify(NoticeKind::Success, format!("{what} saved")),
			Some(Err(err)) => {
				error!("{what} failed: {err}");
				self.notify(NoticeKind::Error, format!("{what} failed: {err}"));
			}
			None => {}
		}
	}
}

pub fn use_app_state() -> AppState {
	expect_context::<AppState>()
}
