//! Sprite animation
//!
//! Each [`AnimationState`] owns its own clip: sheet image, frame count, frame
//! duration and whether it loops. Only the clip of the current state advances,
//! driven by the frame's elapsed time, so animations run at the same speed
//! whatever the frame rate.
//!
//! Sheets follow the usual top-down layout of one row per direction
//! (up, left, down, right) and one column per frame. Non-directional clips
//! (hurt, death) use a single row.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::config::read_json;
use crate::error::{ConfigError, ResourceError};
use crate::geometry::Vec2;
use crate::render::ScreenRect;
use crate::resources::{ImageHandle, ResourceManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Attacking,
    Hurt,
    Dead,
}

/// Facing / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Idle,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dominant-axis direction of `v`; the zero vector is `Idle`.
    ///
    /// Ties go to the vertical axis.
    pub fn from_vector(v: Vec2) -> Direction {
        if v.is_zero() {
            Direction::Idle
        } else if v.x.abs() > v.y.abs() {
            if v.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Row in a directional sprite sheet
    pub fn sheet_row(&self) -> u32 {
        match self {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down | Direction::Idle => 2,
            Direction::Right => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    Loop,
    Once,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    /// Sheet file name inside the character's sprite directory
    pub image: String,
    pub frames: u32,
    pub frame_ms: u64,
    pub mode: AnimationMode,
    /// One row per direction when true, a single row otherwise
    pub directional: bool,
}

impl AnimationData {
    fn new(image: &str, frames: u32, frame_ms: u64, mode: AnimationMode, directional: bool) -> Self {
        AnimationData {
            image: image.to_string(),
            frames,
            frame_ms,
            mode,
            directional,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms * self.frames as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    pub animations: HashMap<AnimationState, AnimationData>,
}

impl AnimationConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    /// `<sprite dir>/animation.json` when present, otherwise `fallback`
    pub fn load_or(path: impl AsRef<Path>, fallback: AnimationConfig) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(fallback)
        }
    }

    /// Player layout: 8-frame walk, 6-frame slash, 6-frame hurt
    pub fn player_default() -> Self {
        use AnimationMode::{Loop, Once};
        let animations = HashMap::from([
            (AnimationState::Idle, AnimationData::new("walk.png", 1, 200, Loop, true)),
            (AnimationState::Walking, AnimationData::new("walk.png", 8, 100, Loop, true)),
            (AnimationState::Attacking, AnimationData::new("slash.png", 6, 50, Once, true)),
            (AnimationState::Hurt, AnimationData::new("hurt.png", 6, 80, Once, false)),
            (AnimationState::Dead, AnimationData::new("hurt.png", 6, 150, Once, false)),
        ]);
        AnimationConfig {
            frame_width: 64,
            frame_height: 64,
            animations,
        }
    }

    /// Enemy layout: every clip comes from the 3-frame walk sheet
    pub fn enemy_default() -> Self {
        use AnimationMode::{Loop, Once};
        let animations = HashMap::from([
            (AnimationState::Idle, AnimationData::new("walk.png", 1, 200, Loop, true)),
            (AnimationState::Walking, AnimationData::new("walk.png", 3, 200, Loop, true)),
            (AnimationState::Attacking, AnimationData::new("walk.png", 3, 100, Once, true)),
            (AnimationState::Hurt, AnimationData::new("walk.png", 3, 80, Once, true)),
            (AnimationState::Dead, AnimationData::new("walk.png", 3, 150, Once, true)),
        ]);
        AnimationConfig {
            frame_width: 64,
            frame_height: 64,
            animations,
        }
    }

    pub fn data(&self, state: AnimationState) -> Option<&AnimationData> {
        self.animations.get(&state)
    }
}

/// Runs the clip of the current state
#[derive(Debug, Clone)]
pub struct AnimationController {
    config: Rc<AnimationConfig>,
    current: AnimationState,
    elapsed: Duration,
}

impl AnimationController {
    pub fn new(config: Rc<AnimationConfig>) -> Self {
        AnimationController {
            config,
            current: AnimationState::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Switches clip and rewinds it, even for the current state
    pub fn restart(&mut self, state: AnimationState) {
        self.current = state;
        self.elapsed = Duration::ZERO;
    }

    pub fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    pub fn state(&self) -> AnimationState {
        self.current
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// A `Once` clip is finished when its last frame has been shown for a full
    /// frame duration. Looping clips never finish; a missing clip counts as finished.
    pub fn is_finished(&self) -> bool {
        match self.config.data(self.current) {
            Some(data) => data.mode == AnimationMode::Once && self.elapsed >= data.duration(),
            None => true,
        }
    }

    pub fn current_frame(&self) -> u32 {
        let Some(data) = self.config.data(self.current) else {
            return 0;
        };
        if data.frames == 0 || data.frame_ms == 0 {
            return 0;
        }
        let index = (self.elapsed.as_millis() / data.frame_ms as u128) as u32;
        match data.mode {
            AnimationMode::Loop => index % data.frames,
            AnimationMode::Once => index.min(data.frames - 1),
        }
    }

    /// Image name and source rectangle of the frame to draw
    pub fn frame_source(&self, facing: Direction) -> Option<(&str, ScreenRect)> {
        let data = self.config.data(self.current)?;
        let (w, h) = (self.config.frame_width, self.config.frame_height);
        let row = if data.directional { facing.sheet_row() } else { 0 };
        let src = ScreenRect::new((self.current_frame() * w) as i32, (row * h) as i32, w, h);
        Some((data.image.as_str(), src))
    }
}

/// Loaded sheet images of one character kind
#[derive(Debug, Default)]
pub struct SpriteSet {
    images: HashMap<String, Rc<ImageHandle>>,
}

impl SpriteSet {
    /// Loads every sheet `config` refers to from `sprites/<prefix>/`
    pub fn load(
        resources: &mut ResourceManager,
        prefix: &str,
        config: &AnimationConfig,
    ) -> Result<Self, ResourceError> {
        let mut images = HashMap::new();
        for data in config.animations.values() {
            if images.contains_key(&data.image) {
                continue;
            }
            let image = resources.load_image(&format!("{}/{}", prefix, data.image))?;
            images.insert(data.image.clone(), image);
        }
        Ok(SpriteSet { images })
    }

    pub fn get(&self, image: &str) -> Option<&Rc<ImageHandle>> {
        self.images.get(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AnimationController {
        AnimationController::new(Rc::new(AnimationConfig::player_default()))
    }

    #[test]
    fn test_direction_from_vector() {
        assert_eq!(Direction::from_vector(Vec2::ZERO), Direction::Idle);
        assert_eq!(Direction::from_vector(Vec2::new(3.0, 1.0)), Direction::Right);
        assert_eq!(Direction::from_vector(Vec2::new(-3.0, 1.0)), Direction::Left);
        assert_eq!(Direction::from_vector(Vec2::new(1.0, -3.0)), Direction::Up);
        assert_eq!(Direction::from_vector(Vec2::new(2.0, 2.0)), Direction::Down);
    }

    #[test]
    fn test_loop_clip_wraps() {
        let mut anim = controller();
        anim.restart(AnimationState::Walking);
        anim.update(Duration::from_millis(850));

        assert_eq!(anim.current_frame(), 0); // 8 frames x 100ms, wrapped
        assert!(!anim.is_finished());
    }

    #[test]
    fn test_once_clip_finishes_after_last_frame() {
        let mut anim = controller();
        anim.restart(AnimationState::Attacking);
        anim.update(Duration::from_millis(290));
        assert_eq!(anim.current_frame(), 5);
        assert!(!anim.is_finished());

        anim.update(Duration::from_millis(10));
        assert!(anim.is_finished());
        anim.update(Duration::from_millis(500));
        assert_eq!(anim.current_frame(), 5);
    }

    #[test]
    fn test_restart_rewinds_current_clip() {
        let mut anim = controller();
        anim.restart(AnimationState::Walking);
        anim.update(Duration::from_millis(250));
        assert_eq!(anim.current_frame(), 2);

        anim.restart(AnimationState::Walking);
        assert_eq!(anim.current_frame(), 0);
        assert_eq!(anim.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_frame_source_uses_direction_row() {
        let mut anim = controller();
        anim.restart(AnimationState::Walking);
        anim.update(Duration::from_millis(300));

        let (image, src) = anim.frame_source(Direction::Right).unwrap();
        assert_eq!(image, "walk.png");
        assert_eq!(src, ScreenRect::new(192, 192, 64, 64));

        anim.restart(AnimationState::Hurt);
        let (image, src) = anim.frame_source(Direction::Right).unwrap();
        assert_eq!(image, "hurt.png");
        assert_eq!(src.y, 0);
    }

    #[test]
    fn test_sprite_set_loads_each_sheet_once() {
        let mut resources = ResourceManager::unchecked();
        let sprites = SpriteSet::load(&mut resources, "player", &AnimationConfig::player_default()).unwrap();

        assert_eq!(sprites.get("walk.png").unwrap().name(), "player/walk.png");
        assert!(sprites.get("slash.png").is_some());
        assert_eq!(resources.cached_count(), 3);
    }
}
