//! Intro sequencer
//!
//! Frame-driven state machine for the intro: title, scene fade-in, prompt,
//! prompt shake, interaction and the post-click teardown. The host calls
//! [`IntroSequencer::frame`] once per display frame and forwards pointer
//! input; everything else is derived from frame timestamps.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::render::Renderer;
use super::scene::Scene;
use super::state::{IntroState, Pointer};
use super::timers::TimerQueue;
use super::timing::IntroTiming;
use super::view::{IntroView, ViewEffect};

/// Deferred work owned by the sequencer's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroTask {
    TitleGlowOn,
    ShakeEnd,
    IdleShake,
    DialogShow,
    TitleGlowOff,
    OverlayFadeOut,
    OverlayRemove,
}

impl IntroTask {
    /// Tasks that belong to the waiting phase and must stay silent once the
    /// intro is completed
    fn before_click(self) -> bool {
        matches!(
            self,
            IntroTask::TitleGlowOn | IntroTask::ShakeEnd | IntroTask::IdleShake
        )
    }
}

pub struct IntroSequencer<V> {
    timing: IntroTiming,
    state: IntroState,
    pointer: Pointer,
    timers: TimerQueue<IntroTask>,
    scene: Scene,
    rng: StdRng,
    view: V,
    last_trail: Option<f64>,
    last_footprint: Option<f64>,
}

impl<V: IntroView> IntroSequencer<V> {
    pub fn new(view: V, width: f64, height: f64) -> Self {
        Self::with_rng(view, width, height, StdRng::from_entropy())
    }

    /// Deterministic procedural pools
    pub fn with_seed(view: V, width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(view, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(view: V, width: f64, height: f64, mut rng: StdRng) -> Self {
        let scene = Scene::new(width, height, &mut rng);
        Self {
            timing: IntroTiming::default(),
            state: IntroState::default(),
            pointer: Pointer {
                x: width / 2.0,
                y: height / 2.0,
                inside: false,
            },
            timers: TimerQueue::new(),
            scene,
            rng,
            view,
            last_trail: None,
            last_footprint: None,
        }
    }

    pub fn with_timing(mut self, timing: IntroTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> &IntroTiming {
        &self.timing
    }

    pub fn state(&self) -> &IntroState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Whether the idle shake timer is live
    pub fn idle_shake_active(&self) -> bool {
        self.state
            .idle_shake_timer
            .is_some_and(|id| self.timers.is_scheduled(id))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start a fresh run at `now`
    ///
    /// Pending timers from the previous run, including post-click teardown,
    /// are dropped.
    pub fn init(&mut self, now: f64) {
        self.timers.invalidate();
        self.state = IntroState::started_at(now);
        self.last_trail = None;
        self.last_footprint = None;
        self.scene.clear_pointer_effects();
        self.scene.reseed(&mut self.rng);
        self.view.apply(ViewEffect::Reset);
        debug!("Intro initialized at {:.0}", now);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.scene.resize(width, height, &mut self.rng);
    }

    /// Advance to frame time `now` and draw
    pub fn frame(&mut self, now: f64, renderer: &mut dyn Renderer) {
        let start = *self.state.start.get_or_insert(now);
        self.run_due_timers(now);

        let elapsed = now - start;
        self.update_state(elapsed);
        self.scene.draw(renderer, &self.timing, elapsed, now);
        self.scene.draw_pointer_effects(renderer, &self.timing, now);
    }

    /// Fire every threshold crossed by `elapsed`, in threshold order
    pub fn update_state(&mut self, elapsed: f64) {
        if self.state.completed {
            return;
        }
        let now = self.state.start.unwrap_or(0.0) + elapsed;
        let timing = &self.timing;

        if elapsed >= timing.title && !self.state.title_shown {
            self.state.title_shown = true;
            self.view.apply(ViewEffect::TitleVisible);
            self.timers
                .schedule(now, timing.title_glow_delay, IntroTask::TitleGlowOn);
            debug!("Title shown at {:.0} ms", elapsed);
        }

        if elapsed >= timing.scene_ready && !self.state.scene_ready {
            self.state.scene_ready = true;
            debug!("Scene ready at {:.0} ms", elapsed);
        }

        if elapsed >= timing.scene_ready && !self.state.cursor_enabled {
            self.state.cursor_enabled = true;
            if self.pointer.inside {
                self.view.apply(ViewEffect::CustomCursor { on: true });
            }
        }

        if elapsed >= self.timing.prompt && !self.state.prompt_shown {
            self.state.prompt_shown = true;
            self.view.apply(ViewEffect::PromptVisible { on: true });
            debug!("Prompt shown at {:.0} ms", elapsed);
        }

        if elapsed >= self.timing.prompt_shake && !self.state.prompt_shaken {
            self.state.prompt_shaken = true;
            self.trigger_prompt_shake(now);
        }

        if elapsed >= self.timing.interactive && !self.state.interactive {
            self.enable_interactive(now);
            debug!("Interactive at {:.0} ms", elapsed);
        }
    }

    fn trigger_prompt_shake(&mut self, now: f64) {
        self.view.apply(ViewEffect::PromptShake { on: true });
        self.timers
            .schedule(now, self.timing.shake_duration, IntroTask::ShakeEnd);
        self.view.apply(ViewEffect::Chime);
    }

    fn enable_interactive(&mut self, now: f64) {
        self.state.interactive = true;
        if self.state.idle_shake_timer.is_none() {
            let id = self.timers.schedule_repeating(
                now,
                self.timing.idle_shake_interval,
                IntroTask::IdleShake,
            );
            self.state.idle_shake_timer = Some(id);
        }
    }

    fn run_due_timers(&mut self, now: f64) {
        while let Some((_, task, due)) = self.timers.pop_due(now) {
            if self.state.completed && task.before_click() {
                continue;
            }
            debug!("Intro timer {:?} at {:.0}", task, due);
            match task {
                IntroTask::TitleGlowOn => self.view.apply(ViewEffect::TitleGlow { on: true }),
                IntroTask::ShakeEnd => self.view.apply(ViewEffect::PromptShake { on: false }),
                IntroTask::IdleShake => self.trigger_prompt_shake(due),
                IntroTask::DialogShow => self.view.apply(ViewEffect::DialogShow),
                IntroTask::TitleGlowOff => self.view.apply(ViewEffect::TitleGlow { on: false }),
                IntroTask::OverlayFadeOut => self.view.apply(ViewEffect::OverlayFadeOut),
                IntroTask::OverlayRemove => {
                    self.view.apply(ViewEffect::OverlayRemoved);
                    self.view.apply(ViewEffect::DialogAwakenCleared);
                }
            }
        }
    }

    /// The interaction point was activated
    ///
    /// Returns true only for the call that completed the intro; later calls
    /// change nothing.
    pub fn click(&mut self, now: f64) -> bool {
        if self.state.completed {
            return false;
        }
        self.state.completed = true;
        self.state.interactive = true;
        self.state.cursor_enabled = true;

        if let Some(id) = self.state.idle_shake_timer.take() {
            self.timers.cancel(id);
        }

        let timing = &self.timing;
        self.view.apply(ViewEffect::PromptShake { on: false });
        self.view.apply(ViewEffect::PromptVisible { on: false });

        self.view.apply(ViewEffect::DialogVisible);
        self.timers
            .schedule(now, timing.dialog_show_delay, IntroTask::DialogShow);
        self.view.apply(ViewEffect::OverlayAwakening);

        self.view.apply(ViewEffect::TitleFade);
        self.timers
            .schedule(now, timing.title_glow_off_delay, IntroTask::TitleGlowOff);

        self.view.apply(ViewEffect::MainContentVisible);

        self.timers
            .schedule(now, timing.overlay_fade_out, IntroTask::OverlayFadeOut);
        self.timers
            .schedule(now, timing.overlay_remove, IntroTask::OverlayRemove);

        info!(
            "Intro completed after {:.0} ms",
            self.state.elapsed(now)
        );
        true
    }

    pub fn pointer_enter(&mut self) {
        self.pointer.inside = true;
        if self.state.cursor_enabled {
            self.view.apply(ViewEffect::CustomCursor { on: true });
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.inside = false;
        self.view.apply(ViewEffect::CustomCursor { on: false });
    }

    /// Pointer moved to `(x, y)` at time `now`; may leave a trail and a
    /// footprint
    pub fn pointer_move(&mut self, x: f64, y: f64, now: f64) {
        self.pointer.x = x;
        self.pointer.y = y;
        if !self.pointer.inside {
            self.pointer_enter();
        }
        self.view.apply(ViewEffect::CursorMoved { x, y });

        let elapsed = self.state.elapsed(now);
        let trail_due = self
            .last_trail
            .map_or(true, |last| now - last > self.timing.trail_throttle);
        if self.state.cursor_enabled && elapsed >= self.timing.scene_ready && trail_due {
            self.scene.push_trail(x, y, now);
            self.last_trail = Some(now);
        }

        let footprint_due = self
            .last_footprint
            .map_or(true, |last| now - last > self.timing.footprint_throttle);
        if self.state.interactive && footprint_due {
            self.scene.push_footprint(x, y, now, &mut self.rng);
            self.last_footprint = Some(now);
        }
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }
}
