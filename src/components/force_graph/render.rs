use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

const BACKGROUND: &str = "#ffffff";
const INK: (u8, u8, u8) = (30, 30, 30);

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn ink(alpha: f64) -> String {
	format!("rgba({}, {}, {}, {alpha})", INK.0, INK.1, INK.2)
}

/// Paint one frame: edges, then dimmed nodes, then the lit set on top, then
/// community labels.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.view.x, state.view.y);
	let _ = ctx.scale(state.view.k, state.view.k);

	let t = ease_out_cubic(state.highlight.strength);
	draw_edges(state, ctx, t);
	draw_nodes(state, ctx, t, false);
	if state.highlight.active() {
		draw_nodes(state, ctx, t, true);
	}
	draw_community_labels(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, t: f64) {
	let k = state.view.k;
	state.graph.visit_edges(|n1, n2, edge| {
		let lit = state.highlight.is_lit(n1.index()) && state.highlight.is_lit(n2.index());
		// lit edges brighten and thicken, the rest fade
		let (alpha, grow) = if lit { (0.5 + 0.4 * t, 1.0 + 0.5 * t) } else { (0.5 - 0.4 * t, 1.0) };

		ctx.set_stroke_style_str(&format!("rgba(120, 120, 120, {alpha})"));
		ctx.set_line_width(edge.user_data.max(0.5) * grow / k);
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

/// One pass over the nodes: either everything outside the lit set, faded by
/// `t`, or only the lit set, enlarged by `t`.
fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, t: f64, lit_pass: bool) {
	let k = state.view.k;
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if state.highlight.is_lit(idx) != lit_pass {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let focus = lit_pass && state.highlight.is_focus(idx);
		let (alpha, radius) = match (lit_pass, focus) {
			(false, _) => (1.0 - 0.7 * t, info.radius),
			(true, true) => (1.0, info.radius * (1.0 + 0.35 * t)),
			(true, false) => (1.0, info.radius * (1.0 + 0.15 * t)),
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if focus && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ink(0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&ink(alpha * 0.8));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
	});
}

fn draw_community_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.view.k;
	ctx.set_font(&format!("bold {}px sans-serif", 14.0 / k.max(0.5)));
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&ink(0.55));
	for (id, (x, y)) in state.community_anchors() {
		let _ = ctx.fill_text(&format!("Community {}", id + 1), x, y);
	}
	ctx.set_text_align("start");
}
