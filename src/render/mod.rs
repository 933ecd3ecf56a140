//! Canvas 2D frame painter
//!
//! Fully repaints the surface every frame in back-to-front order:
//! background gradient, bubbles (radial fill, rim highlight, label),
//! particles, floating texts - so labels stay legible above effects.

use web_sys::{CanvasRenderingContext2d, CanvasGradient};

use crate::sim::{Bubble, FloatingText, GamePhase, GameState, Particle, ParticleKind};

const BG_TOP: &str = "#0f172a";
const BG_BOTTOM: &str = "#1e293b";
const BUBBLE_FONT: &str = "bold 26px \"Segoe UI\", sans-serif";
const TEXT_FONT: &str = "900 36px \"Segoe UI\", sans-serif";

/// Paint one frame of the current state
pub fn draw_frame(ctx: &CanvasRenderingContext2d, state: &GameState, width: f64, height: f64) {
    draw_background(ctx, width, height);

    if state.phase == GamePhase::Playing {
        for bubble in state.bubbles.iter().filter(|b| !b.popped) {
            draw_bubble(ctx, bubble);
        }
    }

    for particle in &state.particles {
        draw_particle(ctx, particle);
    }

    for text in &state.floating_texts {
        draw_floating_text(ctx, text);
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    let gradient: CanvasGradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    let _ = gradient.add_color_stop(0.0, BG_TOP);
    let _ = gradient.add_color_stop(1.0, BG_BOTTOM);
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_bubble(ctx: &CanvasRenderingContext2d, bubble: &Bubble) {
    let x = bubble.pos.x as f64;
    let y = bubble.pos.y as f64;
    let r = bubble.radius as f64;

    // Body: radial gradient from an off-center highlight
    ctx.begin_path();
    let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
    if let Ok(gradient) = ctx.create_radial_gradient(x - r * 0.3, y - r * 0.3, 5.0, x, y, r) {
        let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.4)");
        let _ = gradient.add_color_stop(0.3, &bubble.color.css());
        let _ = gradient.add_color_stop(1.0, &bubble.color.with_alpha(0.85).css());
        ctx.set_fill_style_canvas_gradient(&gradient);
    } else {
        ctx.set_fill_style_str(&bubble.color.css());
    }
    ctx.fill();

    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
    ctx.stroke();

    // Rim highlight arc on the upper left
    ctx.begin_path();
    let _ = ctx.arc(x - r * 0.35, y - r * 0.35, r * 0.6, 4.0, 5.5);
    ctx.set_line_width(4.0);
    ctx.set_line_cap("round");
    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
    ctx.stroke();

    // Centered word label
    ctx.set_fill_style_str("white");
    ctx.set_font(BUBBLE_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_shadow_color("rgba(0, 0, 0, 0.9)");
    ctx.set_shadow_blur(6.0);
    let _ = ctx.fill_text(&bubble.text, x, y);
    ctx.set_shadow_blur(0.0);
}

fn draw_particle(ctx: &CanvasRenderingContext2d, particle: &Particle) {
    let x = particle.pos.x as f64;
    let y = particle.pos.y as f64;
    let size = particle.size as f64;
    let color = particle.color.css();

    ctx.save();
    ctx.set_global_alpha(particle.life.max(0.0) as f64);

    match particle.kind {
        ParticleKind::Ring => {
            ctx.set_stroke_style_str(&color);
            ctx.set_line_width((4.0 * particle.life) as f64);
            ctx.begin_path();
            let _ = ctx.arc(x, y, size, 0.0, std::f64::consts::TAU);
            ctx.stroke();
        }
        ParticleKind::Shard => {
            let _ = ctx.translate(x, y);
            let _ = ctx.rotate(particle.rotation as f64);
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.move_to(0.0, -size);
            ctx.line_to(size, size);
            ctx.line_to(-size, size);
            ctx.close_path();
            ctx.fill();
        }
        ParticleKind::Droplet => {
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            let _ = ctx.arc(x, y, size, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    ctx.restore();
}

fn draw_floating_text(ctx: &CanvasRenderingContext2d, text: &FloatingText) {
    ctx.save();
    ctx.set_global_alpha(text.life.min(1.0).max(0.0) as f64);
    ctx.set_shadow_color("rgba(0, 0, 0, 0.8)");
    ctx.set_shadow_blur(4.0);
    ctx.set_fill_style_str(text.color);
    ctx.set_font(TEXT_FONT);
    ctx.set_text_align("center");
    let _ = ctx.fill_text(&text.text, text.pos.x as f64, text.pos.y as f64);
    ctx.restore();
}
