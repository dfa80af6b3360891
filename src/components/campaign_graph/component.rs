use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CampaignGraphState, GraphView};
use crate::graph::Position;

type SharedState = Rc<RefCell<Option<CampaignGraphState>>>;
type ListenerSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Put `next` in `slot`, handing the listener it replaces to `detach`.
fn swap_listener<T>(slot: &RefCell<Option<T>>, next: Option<T>, detach: impl FnOnce(&T)) {
	if let Some(previous) = slot.replace(next) {
		detach(&previous);
	}
}

fn remove_resize_listener(window: &Window, cb: &Closure<dyn FnMut()>) {
	if let Err(err) = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref()) {
		log::warn!("Could not remove resize listener: {err:?}");
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Releases the drag, reporting a move or a click. Callbacks run after the
/// state borrow ends.
fn finish_pointer(
	state: &SharedState,
	on_node_click: Option<Callback<String>>,
	on_drag_stop: Option<Callback<(String, Position)>>,
) {
	let (clicked, moved) = {
		let mut guard = state.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		let clicked = s
			.drag
			.node_idx
			.filter(|_| s.drag.active && !s.drag.moved)
			.map(|idx| s.nodes[idx].id.clone());
		(clicked, s.end_drag())
	};
	if let (Some(moved), Some(cb)) = (moved, on_drag_stop) {
		cb.run(moved);
	}
	if let (Some(id), Some(cb)) = (clicked, on_node_click) {
		cb.run(id);
	}
}

/// Canvas view of a campaign graph: regions as containers, locations as
/// boxes, routes as curved, typed edges.
#[component]
pub fn CampaignGraphCanvas(
	#[prop(into)] data: Signal<GraphView>,
	/// Nodes can be dragged and locations show a reveal toggle.
	#[prop(default = false)]
	editable: bool,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] on_node_click: Option<Callback<String>>,
	#[prop(optional)] on_drag_stop: Option<Callback<(String, Position)>>,
	#[prop(optional)] on_hover: Option<Callback<Option<String>>>,
	#[prop(optional)] on_toggle: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: ListenerSlot = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas;
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(w, h)| w > 0.0 && h > 0.0)
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				log::error!("Canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(CampaignGraphState::new(
			&data.get_untracked(),
			w,
			h,
			editable,
		));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let listener: Closure<dyn FnMut()> = Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			// a re-run replaces the old listener
			swap_listener(&resize_cb_init, Some(listener), |old| {
				remove_resize_listener(&window, old)
			});
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// unmounted; stop scheduling frames
			if !canvas_anim.is_connected() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let resize_slot = StoredValue::new_local(resize_cb);
	on_cleanup(move || {
		resize_slot.try_with_value(|slot| {
			if let Some(window) = web_sys::window() {
				swap_listener(slot, None, |cb| remove_resize_listener(&window, cb));
			}
		});
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let view = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_view(&view);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let toggled = {
			let mut guard = state_md.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			match s.node_at_position(x, y) {
				Some(idx) => {
					let toggled = (s.editable && s.badge_hit(idx, x, y)).then(|| s.nodes[idx].id.clone());
					s.begin_drag(idx, x, y);
					if !s.editable {
						s.begin_pan(x, y);
					}
					toggled
				}
				None => {
					s.begin_pan(x, y);
					None
				}
			}
		};
		if let (Some(id), Some(cb)) = (toggled, on_toggle) {
			cb.run(id);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let hover_changed = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.drag.active {
				s.drag_to(x, y);
			}
			if s.pan.active {
				s.pan_to(x, y);
			}
			if s.drag.active || s.pan.active {
				None
			} else {
				let hovered = s.hover_id_at(x, y);
				s.set_hover(hovered.clone()).then_some(hovered)
			}
		};
		if let (Some(hovered), Some(cb)) = (hover_changed, on_hover) {
			cb.run(hovered);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		finish_pointer(&state_mu, on_node_click, on_drag_stop);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		// a drag that leaves the canvas still lands; it is not a click
		let left = state_ml.borrow_mut().as_mut().map(|s| {
			s.drag.moved = true;
			s.set_hover(None)
		});
		finish_pointer(&state_ml, None, on_drag_stop);
		if let (Some(true), Some(cb)) = (left, on_hover) {
			cb.run(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y() < 0.0);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="campaign-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn swapping_a_listener_detaches_the_old_one() {
		let slot = RefCell::new(None);
		let mut detached = Vec::new();

		swap_listener(&slot, Some("first"), |old| detached.push(*old));
		assert!(detached.is_empty());
		swap_listener(&slot, Some("second"), |old| detached.push(*old));
		assert_eq!(detached, ["first"]);
		assert_eq!(*slot.borrow(), Some("second"));
	}

	#[test]
	fn clearing_the_slot_detaches_once() {
		let slot = RefCell::new(Some(1));
		let mut detached = 0;

		swap_listener(&slot, None, |_| detached += 1);
		swap_listener(&slot, None, |_| detached += 1);
		assert_eq!(detached, 1);
		assert!(slot.borrow().is_none());
	}
}
