//! Canvas-style drawing surface
//!
//! [`Renderer`] is the capability set the scene needs: rects, paths with
//! arcs and quadratic curves, gradient paints, clipping, a transform and
//! state stack, alpha, composite mode, blur and shadow. [`DisplayList`]
//! records calls for headless hosts and tests.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: (f64, f64),
        to: (f64, f64),
        stops: Vec<ColorStop>,
    },
    /// Between circle (x0, y0, r0) and circle (x1, y1, r1)
    Radial {
        inner: (f64, f64, f64),
        outer: (f64, f64, f64),
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Paint::Linear {
            from: (x0, y0),
            to: (x1, y1),
            stops: Vec::new(),
        }
    }

    pub fn radial(inner: (f64, f64, f64), outer: (f64, f64, f64)) -> Self {
        Paint::Radial {
            inner,
            outer,
            stops: Vec::new(),
        }
    }

    /// Radial gradient from the center point out to `radius`
    pub fn radial_at(x: f64, y: f64, radius: f64) -> Self {
        Self::radial((x, y, 0.0), (x, y, radius))
    }

    /// Add a color stop; ignored on solid paints
    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        match &mut self {
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
                stops.push(ColorStop { offset, color })
            }
            Paint::Solid(_) => {}
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    Screen,
}

pub trait Renderer {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn set_composite(&mut self, mode: Composite);
    /// Gaussian blur filter radius in pixels; 0 disables
    fn set_blur(&mut self, radius: f64);
    fn set_shadow(&mut self, blur: f64, color: Rgba);
    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint, width: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn clip(&mut self);

    /// Full circle as a new path
    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.begin_path();
        self.arc(x, y, radius, 0.0, std::f64::consts::TAU);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Alpha(f64),
    Composite(Composite),
    Blur(f64),
    Shadow(f64, Rgba),
    Fill(Paint),
    Stroke(Paint, f64),
    FillRect(f64, f64, f64, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadraticTo(f64, f64, f64, f64),
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    ClosePath,
    FillPath,
    StrokePath,
    Clip,
}

/// Recording renderer
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Save/restore pairs are balanced and never underflow
    pub fn is_balanced(&self) -> bool {
        let mut depth: i64 = 0;
        for command in &self.commands {
            match command {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Renderer for DisplayList {
    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }
    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate(x, y));
    }
    fn rotate(&mut self, radians: f64) {
        self.push(DrawCommand::Rotate(radians));
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::Alpha(alpha));
    }
    fn set_composite(&mut self, mode: Composite) {
        self.push(DrawCommand::Composite(mode));
    }
    fn set_blur(&mut self, radius: f64) {
        self.push(DrawCommand::Blur(radius));
    }
    fn set_shadow(&mut self, blur: f64, color: Rgba) {
        self.push(DrawCommand::Shadow(blur, color));
    }
    fn set_fill(&mut self, paint: Paint) {
        self.push(DrawCommand::Fill(paint));
    }
    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.push(DrawCommand::Stroke(paint, width));
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCommand::FillRect(x, y, w, h));
    }
    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo(x, y));
    }
    fn quadratic_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.push(DrawCommand::QuadraticTo(cx, cy, x, y));
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }
    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }
    fn fill(&mut self) {
        self.push(DrawCommand::FillPath);
    }
    fn stroke(&mut self) {
        self.push(DrawCommand::StrokePath);
    }
    fn clip(&mut self) {
        self.push(DrawCommand::Clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_builder_collects_stops() {
        let paint = Paint::linear(0.0, 0.0, 0.0, 100.0)
            .stop(0.0, Rgba::BLACK)
            .stop(1.0, Rgba::TRANSPARENT);
        match paint {
            Paint::Linear { stops, .. } => assert_eq!(stops.len(), 2),
            other => panic!("unexpected paint {:?}", other),
        }
        assert_eq!(Paint::Solid(Rgba::BLACK).stop(0.5, Rgba::BLACK), Paint::Solid(Rgba::BLACK));
    }

    #[test]
    fn test_display_list_balance() {
        let mut list = DisplayList::new();
        list.save();
        list.circle(1.0, 2.0, 3.0);
        list.fill();
        list.restore();
        assert!(list.is_balanced());
        assert_eq!(list.count(|c| matches!(c, DrawCommand::Arc { .. })), 1);

        list.restore();
        assert!(!list.is_balanced());
    }
}
