use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;
use crate::config::ForceParams;

const FRAME_DT: f32 = 0.016;
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type JsCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

/// Canvas size: the window when fullscreen, otherwise the explicit size or
/// whatever the parent element gives us.
fn canvas_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		return window_size(window).unwrap_or(FALLBACK_SIZE);
	}
	let parent = canvas.parent_element();
	let w = width.or_else(|| parent.as_ref().map(|p| p.client_width() as f64));
	let h = height.or_else(|| parent.as_ref().map(|p| p.client_height() as f64));
	(w.unwrap_or(FALLBACK_SIZE.0), h.unwrap_or(FALLBACK_SIZE.1))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn request_frame(callback: &JsCallback) {
	if let (Some(cb), Some(window)) = (&*callback.borrow(), web_sys::window()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Keep the canvas and the simulation bounds in step with the window.
fn install_resize(
	state: SharedState,
	canvas: HtmlCanvasElement,
	window: &Window,
	slot: &JsCallback,
) {
	let callback = Closure::<dyn FnMut()>::new(move || {
		let Some((w, h)) = web_sys::window().as_ref().and_then(window_size) else {
			return;
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		if let Some(s) = state.borrow_mut().as_mut() {
			s.resize(w, h);
		}
	});
	let _ = window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
	*slot.borrow_mut() = Some(callback);
}

/// Start the frame loop. It outlives simulation rebuilds and always draws
/// whatever state is current.
fn start_animation(state: SharedState, ctx: CanvasRenderingContext2d, slot: &JsCallback) {
	let next = slot.clone();
	*slot.borrow_mut() = Some(Closure::new(move || {
		if let Some(s) = state.borrow_mut().as_mut() {
			if s.animation_running {
				s.tick(FRAME_DT);
			}
			render::render(s, &ctx);
		}
		request_frame(&next);
	}));
	request_frame(slot);
}

/// Event position relative to the canvas.
fn canvas_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

/// Mouse handler that forwards the canvas-relative point to `action`.
fn pointer_handler(
	state: SharedState,
	canvas_ref: NodeRef<Canvas>,
	action: fn(&mut ForceGraphState, f64, f64),
) -> impl Fn(MouseEvent) + 'static {
	move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state.borrow_mut().as_mut() {
			action(s, x, y);
		}
	}
}

/// Interactive canvas for a laid-out graph. The simulation is rebuilt from
/// scratch whenever `data` changes; the animation loop is started once.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] params: ForceParams,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animation: JsCallback = Rc::new(RefCell::new(None));
	let on_resize: JsCallback = Rc::new(RefCell::new(None));

	let effect_state = state.clone();
	Effect::new(move |_| {
		let (Some(canvas), Some(window)) = (canvas_ref.get(), web_sys::window()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas_size(&canvas, &window, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let graph = data.get();
		debug!("canvas rebuilt with {} nodes", graph.nodes.len());
		*effect_state.borrow_mut() = Some(ForceGraphState::new(&graph, &params, w, h));

		if fullscreen && on_resize.borrow().is_none() {
			install_resize(effect_state.clone(), canvas.clone(), &window, &on_resize);
		}
		if animation.borrow().is_some() {
			return;
		}
		match context_2d(&canvas) {
			Some(ctx) => start_animation(effect_state.clone(), ctx, &animation),
			None => warn!("canvas has no 2d context"),
		}
	});

	let handler = |action: fn(&mut ForceGraphState, f64, f64)| {
		pointer_handler(state.clone(), canvas_ref, action)
	};
	let on_mousedown = handler(ForceGraphState::pointer_down);
	let on_mousemove = handler(ForceGraphState::pointer_move);
	let on_mouseup = handler(|s, _, _| s.pointer_up());
	let on_mouseleave = handler(|s, _, _| s.pointer_leave());

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state.borrow_mut().as_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
