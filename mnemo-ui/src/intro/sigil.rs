//! The rotating sigil at the center of the intro scene

use std::f64::consts::{FRAC_PI_2, TAU};

use super::render::{Paint, Renderer, Rgba};

const TICKS: usize = 40;
const RUNES: usize = 24;
const PETALS: usize = 6;

fn segment(r: &mut dyn Renderer, x0: f64, y0: f64, x1: f64, y1: f64) {
    r.begin_path();
    r.move_to(x0, y0);
    r.line_to(x1, y1);
    r.stroke();
}

/// Radial segment at angle `a` from radius `r0` to `r1`
fn spoke(r: &mut dyn Renderer, a: f64, r0: f64, r1: f64) {
    let (sin, cos) = a.sin_cos();
    segment(r, cos * r0, sin * r0, cos * r1, sin * r1);
}

/// Draw the sigil for frame time `time`, faded by scene `progress`
pub fn draw_sigil(r: &mut dyn Renderer, width: f64, height: f64, time: f64, progress: f64) {
    if progress <= 0.0 {
        return;
    }

    let size = width.min(height) * 0.22;
    let ring = size * 1.85;
    let pulse = 0.74 + 0.26 * (time * 0.0014).sin();
    let spin_a = time * 0.00016;
    let spin_b = -time * 0.00009;

    r.save();
    r.translate(width * 0.5, height * 0.44);
    r.set_alpha(0.96 * progress);

    // aura
    r.set_fill(
        Paint::radial_at(0.0, 0.0, ring * 1.1)
            .stop(0.0, Rgba::new(176, 227, 238, 0.24))
            .stop(0.45, Rgba::new(98, 166, 181, 0.19))
            .stop(1.0, Rgba::new(52, 94, 108, 0.0)),
    );
    r.circle(0.0, 0.0, ring * 1.08);
    r.fill();

    draw_halo(r, ring, spin_a);

    // inner ring
    r.save();
    r.rotate(spin_b);
    r.set_stroke(Paint::Solid(Rgba::new(168, 204, 214, 0.58)), 2.0);
    r.circle(0.0, 0.0, size * 1.05);
    r.stroke();
    r.restore();

    for i in 0..PETALS {
        draw_petal(r, i, size, time, spin_a, pulse);
    }

    // cardinal spikes
    r.save();
    r.set_stroke(Paint::Solid(Rgba::new(222, 236, 240, 0.72)), 2.3);
    for i in 0..4 {
        let a = i as f64 * FRAC_PI_2 + spin_b * 0.6;
        spoke(r, a, size * 0.45, size * 1.18);
    }
    r.restore();

    // core
    r.save();
    r.set_fill(
        Paint::radial_at(0.0, 0.0, size * 0.5)
            .stop(0.0, Rgba::new(255, 255, 255, 0.95))
            .stop(0.35, Rgba::new(210, 233, 238, 0.95))
            .stop(0.7, Rgba::new(76, 125, 144, 0.92))
            .stop(1.0, Rgba::new(30, 61, 73, 0.3)),
    );
    r.circle(0.0, 0.0, size * 0.5);
    r.fill();
    r.set_fill(
        Paint::radial_at(0.0, 0.0, size * 0.16)
            .stop(0.0, Rgba::new(255, 255, 255, 1.0))
            .stop(1.0, Rgba::new(178, 224, 232, 0.22)),
    );
    r.circle(0.0, 0.0, size * 0.16);
    r.fill();
    r.restore();

    // sparkle
    r.save();
    r.rotate(spin_a * 1.4);
    r.set_stroke(Paint::Solid(Rgba::new(244, 248, 249, 0.78)), 1.6);
    for i in 0..4 {
        spoke(r, i as f64 * FRAC_PI_2, size * 0.03, size * 0.26);
    }
    r.restore();

    r.restore();
}

/// Outer ring with its ticks and runes, rotating with `spin`
fn draw_halo(r: &mut dyn Renderer, ring: f64, spin: f64) {
    r.save();
    r.rotate(spin);
    r.set_shadow(34.0, Rgba::new(103, 174, 186, 0.7));
    r.set_stroke(Paint::Solid(Rgba::new(214, 229, 234, 0.93)), 4.0);
    r.circle(0.0, 0.0, ring);
    r.stroke();

    r.set_stroke(Paint::Solid(Rgba::new(220, 233, 236, 0.72)), 1.25);
    for i in 0..TICKS {
        let a = i as f64 / TICKS as f64 * TAU;
        spoke(r, a, ring - 10.0, ring + 7.0);
    }

    r.set_stroke(Paint::Solid(Rgba::new(214, 226, 232, 0.78)), 1.05);
    for i in 0..RUNES {
        let a = i as f64 / RUNES as f64 * TAU;
        let (sin, cos) = a.sin_cos();
        r.save();
        r.translate(cos * (ring - 22.0), sin * (ring - 22.0));
        r.rotate(a + FRAC_PI_2);
        segment(r, 0.0, -8.0, 0.0, 8.0);
        segment(r, -4.0, -3.0, 4.0, -3.0);
        if i % 2 == 0 {
            segment(r, -3.0, 4.0, 3.0, 7.0);
        } else {
            segment(r, -3.0, 7.0, 3.0, 4.0);
        }
        r.restore();
    }
    r.restore();
}

fn draw_petal(r: &mut dyn Renderer, i: usize, size: f64, time: f64, spin: f64, pulse: f64) {
    let a = i as f64 / PETALS as f64 * TAU + spin * 0.35;
    let width = size * 0.24;
    let length = size * (1.22 + 0.06 * (time * 0.001 + i as f64).sin());

    r.save();
    r.rotate(a);
    r.set_fill(
        Paint::linear(0.0, -length, 0.0, size * 0.12)
            .stop(0.0, Rgba::new(245, 249, 250, 0.96 * pulse))
            .stop(0.35, Rgba::new(212, 228, 232, 0.8 * pulse))
            .stop(1.0, Rgba::new(136, 177, 184, 0.08)),
    );
    r.begin_path();
    r.move_to(0.0, -length);
    r.quadratic_to(width, -length * 0.25, 0.0, size * 0.12);
    r.quadratic_to(-width, -length * 0.25, 0.0, -length);
    r.close_path();
    r.fill();

    // vein
    r.set_stroke(Paint::Solid(Rgba::new(235, 243, 245, 0.52 * pulse)), 1.0);
    segment(r, 0.0, -length * 0.95, 0.0, size * 0.08);
    r.restore();
}
