/// Drawing abstraction and depth-sorted rendering
///
/// Scenes never talk to SDL directly. They draw through the [`Painter`] trait,
/// which the SDL front end implements over a canvas and which
/// [`RecordingPainter`] implements for headless runs and tests.
///
/// # Architecture
///
/// - `Color` / `ScreenRect`: screen-space value types
/// - `Painter`: the small set of primitives scenes need
/// - `DepthSortable` + `render_with_depth_sorting()`: painter's algorithm for
///   top-down sprites, entities with a smaller base Y are drawn first
///
/// # Usage Example
///
/// ```ignore
/// let mut items: Vec<&dyn DepthSortable> = vec![&player, &rat];
/// render_with_depth_sorting(painter, &camera, &mut items)?;
/// ```
use crate::camera::Camera;
use crate::resources::ImageHandle;

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(220, 40, 40);
    pub const GREEN: Color = Color::rgb(0, 200, 0);
    pub const YELLOW: Color = Color::rgb(255, 220, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

/// Integer rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        ScreenRect { x, y, w, h }
    }

    /// Rectangle centred on `(cx, cy)`
    pub fn centered(cx: i32, cy: i32, w: u32, h: u32) -> Self {
        ScreenRect::new(cx - w as i32 / 2, cy - h as i32 / 2, w, h)
    }
}

/// Drawing primitives used by every scene.
///
/// All methods return `Result<(), String>` so SDL errors propagate with `?`.
pub trait Painter {
    /// Logical drawing area in pixels
    fn screen_size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String>;

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String>;

    /// Copies `src` of the image (or the whole image when `None`) into `dest`.
    fn draw_image(
        &mut self,
        image: &ImageHandle,
        src: Option<ScreenRect>,
        dest: ScreenRect,
    ) -> Result<(), String>;

    /// Fills the whole screen, used for overlays and clears
    fn fill_screen(&mut self, color: Color) -> Result<(), String> {
        let (w, h) = self.screen_size();
        self.fill_rect(ScreenRect::new(0, 0, w, h), color)
    }

    /// Filled circle built from horizontal spans
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) -> Result<(), String> {
        for dy in -radius..=radius {
            let half = (((radius * radius - dy * dy) as f32).sqrt()) as i32;
            self.fill_rect(ScreenRect::new(cx - half, cy + dy, (half * 2 + 1) as u32, 1), color)?;
        }
        Ok(())
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill(ScreenRect, Color),
    Outline(ScreenRect, Color),
    Image(String, ScreenRect),
}

/// Painter that records calls instead of drawing.
///
/// Used when running without a window and by tests that assert on what a scene drew.
pub struct RecordingPainter {
    size: (u32, u32),
    pub calls: Vec<DrawCall>,
}

impl RecordingPainter {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingPainter {
            size: (width, height),
            calls: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Names of the images drawn, in draw order
    pub fn images(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image(name, _) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_fills(&self, color: Color) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Fill(_, col) if *col == color))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn screen_size(&self) -> (u32, u32) {
        self.size
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String> {
        self.calls.push(DrawCall::Fill(rect, color));
        Ok(())
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String> {
        self.calls.push(DrawCall::Outline(rect, color));
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageHandle,
        _src: Option<ScreenRect>,
        dest: ScreenRect,
    ) -> Result<(), String> {
        self.calls.push(DrawCall::Image(image.name().to_string(), dest));
        Ok(())
    }
}

/// Trait for entities that participate in depth-sorted rendering.
///
/// The depth is the Y-coordinate of the entity's base (where it touches the
/// ground). Entities with smaller values are drawn first.
pub trait DepthSortable {
    fn get_depth_y(&self) -> f32;

    fn render(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String>;
}

/// Renders entities back to front (painter's algorithm).
///
/// The sort is stable, so entities at equal depth keep their insertion order.
pub fn render_with_depth_sorting(
    painter: &mut dyn Painter,
    camera: &Camera,
    renderables: &mut [&dyn DepthSortable],
) -> Result<(), String> {
    renderables.sort_by(|a, b| a.get_depth_y().total_cmp(&b.get_depth_y()));

    for renderable in renderables.iter() {
        renderable.render(painter, camera)?;
    }

    Ok(())
}
