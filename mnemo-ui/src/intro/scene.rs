//! Procedural intro scene
//!
//! Owns the random pools (intro particles, scene particles, fog blobs, cloud
//! bands) and the pointer effects, and draws them in a fixed order. Random
//! initial values are only assigned in [`Scene::reseed`] and when a footprint
//! is created.

use rand::Rng;
use std::f64::consts::TAU;

use super::render::{Composite, Paint, Renderer, Rgba};
use super::sigil::draw_sigil;
use super::timing::{ease_in_out, IntroTiming};

const FOG_BLOBS: usize = 12;
const CLOUD_BANDS: usize = 6;
const MAX_SCENE_PARTICLES: usize = 80;
const LIGHT_COLUMNS: usize = 6;

const INTRO_GLOW: (u8, u8, u8) = (200, 180, 255);

#[derive(Debug, Clone, PartialEq)]
pub struct IntroParticle {
    pub angle: f64,
    pub radius: f64,
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Silver,
    Purple,
}

impl Tone {
    fn color(self, alpha: f64) -> Rgba {
        match self {
            Tone::Silver => Rgba::new(218, 228, 232, alpha),
            Tone::Purple => Rgba::new(126, 186, 198, alpha),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneParticle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub opacity: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FogBlob {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudBand {
    pub y: f64,
    pub speed: f64,
    pub amplitude: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    pub x: f64,
    pub y: f64,
    pub created: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub created: f64,
    pub size: f64,
}

fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.gen::<f64>() > 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Glow dot: radial gradient from `color` to transparent, filled as a circle
fn glow(r: &mut dyn Renderer, x: f64, y: f64, color: Rgba, gradient_radius: f64, radius: f64) {
    r.set_fill(
        Paint::radial_at(x, y, gradient_radius)
            .stop(0.0, color)
            .stop(1.0, Rgba::TRANSPARENT),
    );
    r.circle(x, y, radius);
    r.fill();
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    width: f64,
    height: f64,
    pub intro_particles: Vec<IntroParticle>,
    pub scene_particles: Vec<SceneParticle>,
    pub fog_blobs: Vec<FogBlob>,
    pub cloud_bands: Vec<CloudBand>,
    pub trails: Vec<Trail>,
    pub footprints: Vec<Footprint>,
}

impl Scene {
    pub fn new<R: Rng>(width: f64, height: f64, rng: &mut R) -> Self {
        let mut scene = Self {
            width,
            height,
            ..Self::default()
        };
        scene.reseed(rng);
        scene
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.width = width;
        self.height = height;
        self.reseed(rng);
    }

    /// Replace every procedural pool with fresh random parameters
    pub fn reseed<R: Rng>(&mut self, rng: &mut R) {
        let (w, h) = (self.width, self.height);

        let intro_count = 3 + rng.gen_range(0..3);
        self.intro_particles = (0..intro_count)
            .map(|_| IntroParticle {
                angle: rng.gen::<f64>() * TAU,
                radius: rng.gen::<f64>() * 40.0 + 20.0,
                size: rng.gen::<f64>() * 2.0 + 2.0,
                speed: (rng.gen::<f64>() * 0.6 + 0.2) * random_sign(rng),
                opacity: rng.gen::<f64>() * 0.35 + 0.15,
            })
            .collect();

        let scene_count = ((w * 0.06).floor().max(0.0) as usize).min(MAX_SCENE_PARTICLES);
        self.scene_particles = (0..scene_count)
            .map(|_| SceneParticle {
                x: rng.gen::<f64>() * w,
                y: rng.gen::<f64>() * h,
                size: rng.gen::<f64>() * 1.5 + 0.5,
                speed_x: (rng.gen::<f64>() - 0.5) * 0.15,
                speed_y: (rng.gen::<f64>() - 0.5) * 0.08,
                opacity: rng.gen::<f64>() * 0.4 + 0.2,
                tone: if rng.gen::<f64>() > 0.5 {
                    Tone::Purple
                } else {
                    Tone::Silver
                },
            })
            .collect();

        self.fog_blobs = (0..FOG_BLOBS)
            .map(|_| FogBlob {
                x: rng.gen::<f64>() * w,
                y: rng.gen::<f64>() * h,
                radius: rng.gen::<f64>() * 200.0 + 180.0,
                speed_x: (rng.gen::<f64>() - 0.5) * 0.2,
                speed_y: (rng.gen::<f64>() - 0.5) * 0.12,
                opacity: rng.gen::<f64>() * 0.08 + 0.05,
            })
            .collect();

        self.cloud_bands = (0..CLOUD_BANDS)
            .map(|i| CloudBand {
                y: h * (0.18 + i as f64 * 0.12),
                speed: (rng.gen::<f64>() * 0.12 + 0.04) * random_sign(rng),
                amplitude: rng.gen::<f64>() * 30.0 + 20.0,
                opacity: rng.gen::<f64>() * 0.25 + 0.2,
            })
            .collect();
    }

    pub fn clear_pointer_effects(&mut self) {
        self.trails.clear();
        self.footprints.clear();
    }

    pub fn push_trail(&mut self, x: f64, y: f64, now: f64) {
        self.trails.push(Trail { x, y, created: now });
    }

    pub fn push_footprint<R: Rng>(&mut self, x: f64, y: f64, now: f64, rng: &mut R) {
        self.footprints.push(Footprint {
            x,
            y,
            created: now,
            size: 16.0 + rng.gen::<f64>() * 10.0,
        });
    }

    /// Draw the scene layers and advance the drifting pools by one step
    pub fn draw(&mut self, r: &mut dyn Renderer, timing: &IntroTiming, elapsed: f64, time: f64) {
        let progress = timing.scene_progress(elapsed);
        self.draw_background(r, progress);
        self.draw_clouds(r, time, progress);
        draw_sigil(r, self.width, self.height, time, progress);
        self.draw_fog(r, progress);
        self.draw_scene_particles(r, progress);
        self.draw_intro_particles(r, timing, elapsed);
    }

    /// Age out and draw trails and footprints
    pub fn draw_pointer_effects(&mut self, r: &mut dyn Renderer, timing: &IntroTiming, time: f64) {
        let trail_life = timing.trail_life;
        self.trails.retain(|t| time - t.created < trail_life);
        for trail in &self.trails {
            let age = (time - trail.created) / trail_life;
            let size = 10.0 + 8.0 * (1.0 - age);
            let (cr, cg, cb) = INTRO_GLOW;
            let color = Rgba::new(cr, cg, cb, (1.0 - age) * 0.25);
            glow(r, trail.x, trail.y, color, size, size);
        }

        let footprint_life = timing.footprint_life;
        self.footprints.retain(|f| time - f.created < footprint_life);
        for footprint in &self.footprints {
            let age = (time - footprint.created) / footprint_life;
            let size = footprint.size * (1.0 - 0.3 * age);
            let (cr, cg, cb) = INTRO_GLOW;
            let color = Rgba::new(cr, cg, cb, (1.0 - age) * 0.35);
            glow(r, footprint.x, footprint.y, color, size * 2.0, size);
        }
    }

    fn draw_background(&self, r: &mut dyn Renderer, progress: f64) {
        let (w, h) = (self.width, self.height);
        r.set_fill(Paint::Solid(Rgba::BLACK));
        r.fill_rect(0.0, 0.0, w, h);

        if progress <= 0.0 {
            return;
        }

        r.save();
        r.set_alpha(ease_in_out(progress));
        r.set_fill(
            Paint::linear(0.0, 0.0, 0.0, h)
                .stop(0.0, Rgba::opaque(0x0b, 0x15, 0x18))
                .stop(0.38, Rgba::opaque(0x0d, 0x1d, 0x23))
                .stop(0.75, Rgba::opaque(0x11, 0x2a, 0x31))
                .stop(1.0, Rgba::opaque(0x1a, 0x32, 0x38)),
        );
        r.fill_rect(0.0, 0.0, w, h);

        // vignette
        r.set_fill(
            Paint::radial((w * 0.5, h * 0.45, w * 0.15), (w * 0.5, h * 0.45, w * 0.85))
                .stop(0.0, Rgba::TRANSPARENT)
                .stop(1.0, Rgba::new(3, 8, 10, 0.82)),
        );
        r.fill_rect(0.0, 0.0, w, h);

        r.set_composite(Composite::Screen);
        for i in 0..LIGHT_COLUMNS {
            let x = i as f64 / (LIGHT_COLUMNS - 1) as f64 * w;
            r.set_fill(
                Paint::linear(x - 100.0, 0.0, x + 100.0, 0.0)
                    .stop(0.0, Rgba::new(120, 190, 200, 0.0))
                    .stop(0.5, Rgba::new(145, 210, 220, 0.065))
                    .stop(1.0, Rgba::new(120, 190, 200, 0.0)),
            );
            r.fill_rect(x - 120.0, 0.0, 240.0, h);
        }
        r.restore();
    }

    fn draw_clouds(&self, r: &mut dyn Renderer, time: f64, progress: f64) {
        if progress <= 0.0 {
            return;
        }
        let (w, h) = (self.width, self.height);

        r.save();
        r.set_alpha(0.56 * progress);
        r.set_blur(28.0);

        for (i, band) in self.cloud_bands.iter().enumerate() {
            let index = i as f64;
            let offset = time * 0.00009 * band.speed * w;
            let base_y = band.y + (time * 0.0005 + index * 0.7).sin() * 14.0;
            let depth = 95.0 + index * 18.0;

            r.set_fill(
                Paint::linear(0.0, base_y - depth, 0.0, base_y + depth)
                    .stop(0.0, Rgba::new(95, 118, 126, 0.0))
                    .stop(0.5, Rgba::new(122, 150, 162, band.opacity * 0.95))
                    .stop(1.0, Rgba::new(95, 118, 126, 0.0)),
            );
            r.begin_path();
            r.move_to(-w, base_y);
            let mut x = -w;
            while x <= w * 2.0 {
                let wave_a = ((x + offset) * 0.0033 + index * 0.6).sin() * band.amplitude;
                let wave_b = ((x + offset) * 0.0018 + index).cos() * band.amplitude * 0.45;
                r.line_to(x, base_y + wave_a + wave_b);
                x += 90.0;
            }
            r.line_to(w * 2.0, base_y + depth);
            r.line_to(-w, base_y + depth);
            r.close_path();
            r.fill();
        }

        // floor fog
        r.set_blur(22.0);
        r.set_fill(
            Paint::linear(0.0, h * 0.5, 0.0, h)
                .stop(0.0, Rgba::new(88, 108, 118, 0.0))
                .stop(0.55, Rgba::new(103, 129, 140, 0.42))
                .stop(1.0, Rgba::new(118, 146, 154, 0.66)),
        );
        r.fill_rect(0.0, h * 0.48, w, h * 0.55);

        r.set_blur(0.0);
        r.restore();
    }

    fn draw_fog(&mut self, r: &mut dyn Renderer, progress: f64) {
        if progress <= 0.0 {
            return;
        }
        let (w, h) = (self.width, self.height);
        let reveal = ease_in_out(progress);

        r.save();
        r.circle(w * 0.5, h * 0.45, w.max(h) * 0.82 * reveal);
        r.clip();

        for fog in &mut self.fog_blobs {
            r.set_fill(
                Paint::radial_at(fog.x, fog.y, fog.radius)
                    .stop(0.0, Rgba::new(150, 188, 197, fog.opacity * 0.7 * reveal))
                    .stop(0.6, Rgba::new(78, 108, 122, fog.opacity * 0.52 * reveal))
                    .stop(1.0, Rgba::TRANSPARENT),
            );
            r.circle(fog.x, fog.y, fog.radius);
            r.fill();

            fog.x += fog.speed_x;
            fog.y += fog.speed_y;
            if fog.x < -fog.radius {
                fog.x = w + fog.radius;
            }
            if fog.x > w + fog.radius {
                fog.x = -fog.radius;
            }
            if fog.y < -fog.radius {
                fog.y = h + fog.radius;
            }
            if fog.y > h + fog.radius {
                fog.y = -fog.radius;
            }
        }
        r.restore();
    }

    fn draw_scene_particles(&mut self, r: &mut dyn Renderer, progress: f64) {
        if progress <= 0.0 {
            return;
        }
        let (w, h) = (self.width, self.height);

        for particle in &mut self.scene_particles {
            let color = particle.tone.color(particle.opacity * progress);
            glow(r, particle.x, particle.y, color, particle.size * 3.0, particle.size * 2.2);

            particle.x += particle.speed_x;
            particle.y += particle.speed_y;
            if particle.x < 0.0 {
                particle.x = w;
            }
            if particle.x > w {
                particle.x = 0.0;
            }
            if particle.y < 0.0 {
                particle.y = h;
            }
            if particle.y > h {
                particle.y = 0.0;
            }
        }
    }

    fn draw_intro_particles(&mut self, r: &mut dyn Renderer, timing: &IntroTiming, elapsed: f64) {
        if elapsed > timing.title_fade {
            return;
        }
        let (expand, collapse) = timing.intro_particle_phase(elapsed);
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let (cr, cg, cb) = INTRO_GLOW;

        for particle in &mut self.intro_particles {
            particle.angle += particle.speed * 0.01;
            let radius = particle.radius * (0.6 + 0.6 * expand) * (1.0 - 0.8 * collapse);
            let (sin, cos) = particle.angle.sin_cos();
            let (x, y) = (cx + cos * radius, cy + sin * radius);
            let color = Rgba::new(cr, cg, cb, particle.opacity * (1.0 - 0.85 * collapse));
            glow(r, x, y, color, particle.size * 4.0, particle.size * (1.1 - 0.3 * collapse));
        }
    }
}
