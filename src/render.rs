//! Canvas drawing. Reads the simulation, never mutates it.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::entities::{Actor, FallingEntity, Particle, ParticleShape, Pickup, Variant};
use crate::sim::{Simulation, Status};

const RAINBOW: [&str; 7] =
    ["#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3"];
const HUD_FONT: &str = "bold 24px 'Bubblegum Sans', cursive";

pub fn render(
    ctx: &CanvasRenderingContext2d,
    sim: &Simulation,
    best: u32,
    muted: bool,
) -> Result<(), JsValue> {
    let (w, h) = sim.area();
    ctx.set_fill_style_str("#FFE5F1");
    ctx.fill_rect(0.0, 0.0, w, h);
    clouds(ctx, w)?;

    for p in sim.power_ups() {
        rainbow(ctx, p);
    }
    for life in sim.bonus_lives() {
        heart(ctx, life.x, life.y, life.width);
    }
    for e in sim.falling() {
        falling(ctx, e)?;
    }
    for p in sim.particles() {
        particle(ctx, p)?;
    }
    if sim.multiplier_active() {
        trail(ctx, sim.actor());
    }
    actor(ctx, sim.actor())?;
    hud(ctx, sim, best, muted)
}

fn clouds(ctx: &CanvasRenderingContext2d, w: f64) -> Result<(), JsValue> {
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    for (cx, cy, r) in [(100.0, 100.0, 40.0), (140.0, 100.0, 50.0), (180.0, 100.0, 40.0)] {
        ctx.begin_path();
        ctx.arc(cx, cy, r, 0.0, TAU)?;
        ctx.fill();
    }
    for (dx, r) in [(150.0, 35.0), (110.0, 45.0), (70.0, 35.0)] {
        ctx.begin_path();
        ctx.arc(w - dx, 150.0, r, 0.0, TAU)?;
        ctx.fill();
    }
    Ok(())
}

fn falling(ctx: &CanvasRenderingContext2d, e: &FallingEntity) -> Result<(), JsValue> {
    let half = e.size / 2.0;
    let (body, ears) = match e.variant {
        Variant::Normal => ("#A6886B", "#8B7355"),
        Variant::Golden => ("#FFD700", "#FFA000"),
        Variant::Hazard => ("#3B3144", "#1E1824"),
    };
    ctx.save();
    ctx.translate(e.x + half, e.y + half)?;
    ctx.rotate(e.rotation)?;
    if e.variant == Variant::Golden {
        ctx.set_shadow_color("#FFD700");
        ctx.set_shadow_blur(25.0);
    }
    ctx.set_fill_style_str(ears);
    ctx.begin_path();
    ctx.ellipse(-half * 0.6, -half * 0.7, half * 0.45, half * 0.6, -0.3, 0.0, TAU)?;
    ctx.ellipse(half * 0.6, -half * 0.7, half * 0.45, half * 0.6, 0.3, 0.0, TAU)?;
    ctx.fill();
    ctx.set_fill_style_str(body);
    ctx.begin_path();
    ctx.ellipse(0.0, 0.0, half - 2.0, half - 2.0, 0.0, 0.0, TAU)?;
    ctx.fill();
    ctx.set_shadow_blur(0.0);

    // Face: eyes, plus a cross for hazards so they read at a glance.
    let eyes = if e.variant == Variant::Hazard {
        "#FF3B3B"
    } else {
        "#000"
    };
    ctx.set_fill_style_str(eyes);
    ctx.begin_path();
    ctx.arc(-half * 0.4, -half * 0.15, half * 0.16, 0.0, TAU)?;
    ctx.arc(half * 0.4, -half * 0.15, half * 0.16, 0.0, TAU)?;
    ctx.fill();
    if e.variant == Variant::Hazard {
        ctx.set_stroke_style_str("#FF3B3B");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(-half * 0.3, half * 0.2);
        ctx.line_to(half * 0.3, half * 0.5);
        ctx.move_to(half * 0.3, half * 0.2);
        ctx.line_to(-half * 0.3, half * 0.5);
        ctx.stroke();
    } else {
        ctx.set_stroke_style_str("#000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(0.0, half * 0.2, half * 0.33, 0.1 * PI, 0.9 * PI)?;
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

fn rainbow(ctx: &CanvasRenderingContext2d, p: &Pickup) {
    let stripe = p.height / RAINBOW.len() as f64;
    for (i, color) in RAINBOW.iter().enumerate() {
        ctx.set_fill_style_str(color);
        ctx.fill_rect(p.x, p.y + i as f64 * stripe, p.width, stripe);
    }
}

/// Heart fitted into a `size` square at (x, y).
fn heart(ctx: &CanvasRenderingContext2d, x: f64, y: f64, size: f64) {
    let s = size / 40.0;
    ctx.set_fill_style_str("#FF1493");
    ctx.begin_path();
    ctx.move_to(x + 20.0 * s, y + 10.0 * s);
    ctx.bezier_curve_to(x + 20.0 * s, y, x, y, x, y + 15.0 * s);
    ctx.bezier_curve_to(x, y + 25.0 * s, x + 20.0 * s, y + 35.0 * s, x + 20.0 * s, y + 40.0 * s);
    ctx.bezier_curve_to(
        x + 20.0 * s,
        y + 35.0 * s,
        x + 40.0 * s,
        y + 25.0 * s,
        x + 40.0 * s,
        y + 15.0 * s,
    );
    ctx.bezier_curve_to(x + 40.0 * s, y, x + 20.0 * s, y, x + 20.0 * s, y + 10.0 * s);
    ctx.fill();
}

fn particle(ctx: &CanvasRenderingContext2d, p: &Particle) -> Result<(), JsValue> {
    ctx.set_global_alpha(p.alpha());
    ctx.set_fill_style_str(p.tint.css());
    ctx.begin_path();
    match p.shape {
        ParticleShape::Circle => ctx.arc(p.x, p.y, p.size, 0.0, TAU)?,
        ParticleShape::Star => {
            let spin = f64::from(p.life) * 0.1;
            for i in 0..5 {
                let angle = f64::from(i) * TAU / 5.0 - PI / 2.0 + spin;
                let r = if i % 2 == 0 { p.size } else { p.size * 0.5 };
                ctx.line_to(p.x + angle.cos() * r, p.y + angle.sin() * r);
            }
            ctx.close_path();
        }
    }
    ctx.fill();
    ctx.set_global_alpha(1.0);
    Ok(())
}

fn trail(ctx: &CanvasRenderingContext2d, a: &Actor) {
    for (i, color) in RAINBOW.iter().enumerate() {
        let i = i as f64;
        ctx.set_fill_style_str(color);
        ctx.set_global_alpha(0.2);
        ctx.fill_rect(a.x - i * 5.0, a.y + 70.0 + i * 2.0, a.width + i * 10.0, 5.0);
    }
    ctx.set_global_alpha(1.0);
}

fn actor(ctx: &CanvasRenderingContext2d, a: &Actor) -> Result<(), JsValue> {
    let half_w = a.width / 2.0;
    let half_h = a.height / 2.0;
    let pop = if a.catch_animation > 0 {
        1.1 - f64::from(a.catch_animation) * 0.005
    } else {
        1.0
    };
    ctx.save();
    ctx.translate(a.x + half_w, a.y + half_h + a.bounce)?;
    ctx.scale(pop, pop)?;

    // Wings flap around their root.
    let flap = (a.wing_flap * 0.1).sin() * 0.2;
    ctx.set_fill_style_str("rgba(255, 182, 193, 0.9)");
    for side in [-1.0, 1.0] {
        ctx.begin_path();
        ctx.ellipse(
            side * half_w * 0.55,
            -half_h * 0.1,
            half_w * 0.35,
            half_h * 0.2,
            side * (0.3 - flap),
            0.0,
            TAU,
        )?;
        ctx.fill();
    }

    ctx.set_fill_style_str("#FFF5F5");
    ctx.set_stroke_style_str("#E2B6C6");
    ctx.set_line_width(1.25);
    ctx.begin_path();
    ctx.ellipse(0.0, half_h * 0.1, half_w * 0.6, half_h * 0.4, 0.0, 0.0, TAU)?;
    ctx.fill();
    ctx.stroke();
    ctx.begin_path();
    ctx.arc(half_w * 0.1, -half_h * 0.45, half_w * 0.3, 0.0, TAU)?;
    ctx.fill();
    ctx.stroke();

    // Horn
    ctx.set_fill_style_str("#FFD700");
    ctx.begin_path();
    ctx.move_to(half_w * 0.05, -half_h * 0.7);
    ctx.line_to(half_w * 0.15, -half_h * 1.1);
    ctx.line_to(half_w * 0.25, -half_h * 0.7);
    ctx.close_path();
    ctx.fill();

    ctx.set_fill_style_str("#000");
    ctx.begin_path();
    ctx.arc(half_w * 0.2, -half_h * 0.5, 3.0, 0.0, TAU)?;
    ctx.fill();
    ctx.restore();
    Ok(())
}

fn hud(
    ctx: &CanvasRenderingContext2d,
    sim: &Simulation,
    best: u32,
    muted: bool,
) -> Result<(), JsValue> {
    let (w, h) = sim.area();
    ctx.set_text_align("left");
    ctx.set_font(HUD_FONT);
    ctx.set_fill_style_str("#B83280");
    ctx.fill_text(&format!("Score: {}", sim.score()), 20.0, 40.0)?;
    ctx.set_fill_style_str("#C27803");
    ctx.fill_text(&format!("Best: {}", best.max(sim.score())), 20.0, 80.0)?;
    ctx.set_fill_style_str("#6B7280");
    ctx.fill_text(&sim.difficulty().to_string(), 20.0, 120.0)?;

    // Filled hearts for lives left, faint ones for slots a pickup could refill.
    for i in 0..sim.config().max_lives {
        ctx.set_global_alpha(if i < sim.lives() { 1.0 } else { 0.25 });
        heart(ctx, w - 60.0 - f64::from(i) * 50.0, 20.0, 40.0);
    }
    ctx.set_global_alpha(1.0);
    if muted {
        ctx.set_text_align("right");
        ctx.set_fill_style_str("#6B7280");
        ctx.fill_text("Muted", w - 20.0, 90.0)?;
    }

    ctx.set_text_align("center");
    if sim.combo() > 1 {
        ctx.set_fill_style_str("#FF1493");
        ctx.set_font("bold 32px 'Bubblegum Sans', cursive");
        ctx.fill_text(&format!("{}x Combo!", sim.combo()), w / 2.0, 100.0)?;
    }
    if sim.multiplier_active() {
        ctx.set_fill_style_str("#FFD700");
        ctx.set_font("bold 28px 'Bubblegum Sans', cursive");
        let secs = sim.multiplier_frames().div_ceil(60);
        ctx.fill_text(&format!("RAINBOW POWER! {secs}s"), w / 2.0, 150.0)?;
    }
    match sim.status() {
        Status::Paused => banner(ctx, w, h, "Paused", "Press SPACE or tap to continue")?,
        Status::GameOver => banner(
            ctx,
            w,
            h,
            "Game Over",
            &format!("Final score {} · best combo {}", sim.score(), sim.best_combo()),
        )?,
        Status::Playing => {}
    }
    Ok(())
}

fn banner(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    title: &str,
    sub: &str,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.35)");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_text_align("center");
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font("bold 48px 'Bubblegum Sans', cursive");
    ctx.fill_text(title, w / 2.0, h / 2.0)?;
    ctx.set_font(HUD_FONT);
    ctx.fill_text(sub, w / 2.0, h / 2.0 + 40.0)?;
    Ok(())
}
