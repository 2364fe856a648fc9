//! SDL2 front end: window, painter and the frame loop
//!
//! Only compiled with the `sdl` feature. Everything above this layer talks to
//! [`Painter`] and [`InputEvent`]s, so the game runs the same headless.

use log::{info, warn};
use sdl2::image::{InitFlag, LoadTexture};
use sdl2::pixels::Color as SdlColor;
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{FullscreenType, Window, WindowContext};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::config::Resolution;
use crate::director::Director;
use crate::input_system::sdl::poll_events;
use crate::render::{Color, Painter, ScreenRect};
use crate::resources::ImageHandle;

const WINDOW_TITLE: &str = "Nhembi Survivor";
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);
/// Longest step fed to the simulation after a stall (window drag, breakpoint)
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);
const PLACEHOLDER_COLOR: Color = Color::rgb(40, 40, 50);

fn sdl_color(color: Color) -> SdlColor {
    SdlColor::RGBA(color.r, color.g, color.b, color.a)
}

fn sdl_rect(rect: ScreenRect) -> SdlRect {
    SdlRect::new(rect.x, rect.y, rect.w.max(1), rect.h.max(1))
}

/// [`Painter`] over an SDL canvas with a lazily filled texture cache
pub struct SdlPainter<'a> {
    canvas: Canvas<Window>,
    texture_creator: &'a TextureCreator<WindowContext>,
    textures: HashMap<String, Texture<'a>>,
    failed: HashSet<String>,
    size: (u32, u32),
}

impl<'a> SdlPainter<'a> {
    pub fn new(
        canvas: Canvas<Window>,
        texture_creator: &'a TextureCreator<WindowContext>,
        size: (u32, u32),
    ) -> Result<Self, String> {
        let mut painter = SdlPainter {
            canvas,
            texture_creator,
            textures: HashMap::new(),
            failed: HashSet::new(),
            size,
        };
        painter.set_logical_size(size)?;
        Ok(painter)
    }

    fn set_logical_size(&mut self, size: (u32, u32)) -> Result<(), String> {
        self.canvas
            .set_logical_size(size.0, size.1)
            .map_err(|e| e.to_string())?;
        self.size = size;
        Ok(())
    }

    /// Resizes the window (or goes fullscreen) and the drawing area
    pub fn apply_resolution(&mut self, resolution: Resolution, size: (u32, u32)) -> Result<(), String> {
        let window = self.canvas.window_mut();
        match resolution {
            Resolution::Fullscreen => window.set_fullscreen(FullscreenType::Desktop)?,
            Resolution::Windowed(w, h) => {
                window.set_fullscreen(FullscreenType::Off)?;
                window.set_size(w, h).map_err(|e| e.to_string())?;
            }
        }
        self.set_logical_size(size)?;
        info!("window now {} ({}x{})", resolution, size.0, size.1);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.canvas.set_draw_color(SdlColor::RGB(0, 0, 0));
        self.canvas.clear();
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    /// Loads the texture on first use; `false` once loading has failed
    fn ensure_texture(&mut self, image: &ImageHandle) -> bool {
        if image.is_placeholder() || self.failed.contains(image.name()) {
            return false;
        }
        if self.textures.contains_key(image.name()) {
            return true;
        }
        match self.texture_creator.load_texture(image.path()) {
            Ok(texture) => {
                self.textures.insert(image.name().to_string(), texture);
                true
            }
            Err(e) => {
                warn!("failed to load {}: {}", image.path().display(), e);
                self.failed.insert(image.name().to_string());
                false
            }
        }
    }

    fn with_blend<F>(&mut self, color: Color, draw: F) -> Result<(), String>
    where
        F: FnOnce(&mut Canvas<Window>) -> Result<(), String>,
    {
        let translucent = color.a < 255;
        if translucent {
            self.canvas.set_blend_mode(BlendMode::Blend);
        }
        self.canvas.set_draw_color(sdl_color(color));
        let result = draw(&mut self.canvas);
        if translucent {
            self.canvas.set_blend_mode(BlendMode::None);
        }
        result
    }
}

impl Painter for SdlPainter<'_> {
    fn screen_size(&self) -> (u32, u32) {
        self.size
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String> {
        if rect.w == 0 || rect.h == 0 {
            return Ok(());
        }
        self.with_blend(color, |canvas| canvas.fill_rect(sdl_rect(rect)))
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> Result<(), String> {
        if rect.w == 0 || rect.h == 0 {
            return Ok(());
        }
        self.with_blend(color, |canvas| canvas.draw_rect(sdl_rect(rect)))
    }

    fn draw_image(
        &mut self,
        image: &ImageHandle,
        src: Option<ScreenRect>,
        dest: ScreenRect,
    ) -> Result<(), String> {
        if !self.ensure_texture(image) {
            return self.fill_rect(dest, PLACEHOLDER_COLOR);
        }
        match self.textures.get(image.name()) {
            Some(texture) => self
                .canvas
                .copy(texture, src.map(sdl_rect), sdl_rect(dest)),
            None => Ok(()),
        }
    }
}

/// Opens the window and runs the director until it stops
pub fn run(mut director: Director) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(InitFlag::PNG | InitFlag::JPG)?;

    let desktop = match video_subsystem.desktop_display_mode(0) {
        Ok(mode) => (mode.w as u32, mode.h as u32),
        Err(e) => {
            warn!("could not detect monitor size ({}), assuming 1280x720", e);
            (1280, 720)
        }
    };
    director.set_desktop_size(desktop);

    let resolution = director.settings().resolution;
    let size = resolution.size(desktop);
    director.set_resolution(size);

    let window = video_subsystem
        .window(WINDOW_TITLE, size.0, size.1)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut painter = SdlPainter::new(canvas, &texture_creator, size)?;
    if resolution == Resolution::Fullscreen {
        painter.apply_resolution(resolution, size)?;
    }

    let mut event_pump = sdl_context.event_pump()?;
    director.start().map_err(|e| e.to_string())?;
    info!("window {}x{}, entering frame loop", size.0, size.1);

    let mut last_frame = Instant::now();
    while director.is_running() {
        let events = poll_events(&mut event_pump);

        let now = Instant::now();
        let dt = (now - last_frame).min(MAX_FRAME_TIME);
        last_frame = now;

        director.tick(&events, dt);
        if !director.is_running() {
            break;
        }
        if let Some(resolution) = director.take_window_request() {
            painter.apply_resolution(resolution, director.screen_size())?;
        }

        painter.clear();
        director.render(&mut painter)?;
        painter.present();

        // Cap framerate to ~60 FPS
        std::thread::sleep(FRAME_TIME.saturating_sub(last_frame.elapsed()));
    }

    info!("frame loop finished");
    Ok(())
}
