//! Presentation side effects of the intro
//!
//! The sequencer never touches a UI directly; it emits [`ViewEffect`]s to an
//! [`IntroView`] in the order they happen.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEffect {
    /// Overlay shown; title, prompt and dialog hidden; custom cursor off;
    /// main content hidden
    Reset,
    TitleVisible,
    /// Title "show" + glow (on), or glow removed (off)
    TitleGlow { on: bool },
    TitleFade,
    /// Prompt and its caption
    PromptVisible { on: bool },
    PromptShake { on: bool },
    /// Dialog visible in its awakening style
    DialogVisible,
    DialogShow,
    DialogAwakenCleared,
    OverlayAwakening,
    OverlayFadeOut,
    /// Overlay gone for good; awakening style cleared
    OverlayRemoved,
    MainContentVisible,
    CustomCursor { on: bool },
    CursorMoved { x: f64, y: f64 },
    /// Play the one-shot prompt chime
    Chime,
}

pub trait IntroView {
    fn apply(&mut self, effect: ViewEffect);
}

impl<F: FnMut(ViewEffect)> IntroView for F {
    fn apply(&mut self, effect: ViewEffect) {
        self(effect)
    }
}

/// Keeps every effect, for tests and replay
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub effects: Vec<ViewEffect>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, effect: &ViewEffect) -> usize {
        self.effects.iter().filter(|e| *e == effect).count()
    }

    pub fn contains(&self, effect: &ViewEffect) -> bool {
        self.effects.contains(effect)
    }

    /// Effects recorded since the last call
    pub fn take(&mut self) -> Vec<ViewEffect> {
        std::mem::take(&mut self.effects)
    }
}

impl IntroView for RecordingView {
    fn apply(&mut self, effect: ViewEffect) {
        self.effects.push(effect);
    }
}
