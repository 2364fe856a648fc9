//! Asset lookup and caching
//!
//! The `ResourceManager` resolves asset names to files under an assets root and
//! hands out shared handles. Decoding happens in the front end (the SDL painter
//! turns an [`ImageHandle`] into a texture on first use); this layer only makes
//! sure a scene fails at construction time if an asset it needs is missing.
//!
//! # Layout
//!
//! ```text
//! assets/
//!   sprites/  images and sprite sheets
//!   sounds/   sound effects
//!   music/    background music
//!   fonts/    TTF fonts
//!   levels/   LDtk level files
//!   config/   levels.json, entities.json
//! ```

use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::ResourceError;

/// A located image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    name: String,
    path: PathBuf,
    placeholder: bool,
}

impl ImageHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the real file was missing and a flat placeholder should be drawn
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A located sound effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundHandle {
    pub name: String,
    pub path: PathBuf,
}

/// A located music track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicHandle {
    pub name: String,
    pub path: PathBuf,
}

/// A located font at a given point size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    pub name: String,
    pub path: PathBuf,
    pub size: u32,
}

impl FontHandle {
    /// Scale factor for the 5x7 bitmap font that matches this point size
    pub fn pixel_scale(&self) -> u32 {
        (self.size / 8).max(1)
    }
}

/// Cached, shared asset handles keyed by name
pub struct ResourceManager {
    root: PathBuf,
    verify: bool,
    images: HashMap<String, Rc<ImageHandle>>,
    sounds: HashMap<String, Rc<SoundHandle>>,
    music: HashMap<String, Rc<MusicHandle>>,
    fonts: HashMap<(String, u32), Rc<FontHandle>>,
}

impl ResourceManager {
    /// Resource manager that checks every asset exists under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        ResourceManager {
            root: root.as_ref().to_path_buf(),
            verify: true,
            images: HashMap::new(),
            sounds: HashMap::new(),
            music: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    /// Resource manager that never touches the filesystem (headless runs, tests)
    pub fn unchecked() -> Self {
        ResourceManager {
            verify: false,
            ..ResourceManager::new("assets")
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file under the assets root
    pub fn path_for(&self, subdir: &str, name: &str) -> PathBuf {
        self.root.join(subdir).join(name)
    }

    fn locate(&self, kind: &'static str, subdir: &str, name: &str) -> Result<PathBuf, ResourceError> {
        let path = self.path_for(subdir, name);
        if self.verify && !path.exists() {
            return Err(ResourceError::NotFound {
                kind,
                name: name.to_string(),
                path,
            });
        }
        Ok(path)
    }

    pub fn load_image(&mut self, name: &str) -> Result<Rc<ImageHandle>, ResourceError> {
        if let Some(image) = self.images.get(name) {
            return Ok(Rc::clone(image));
        }
        let path = self.locate("image", "sprites", name)?;
        debug!("loaded image {}", path.display());
        let handle = Rc::new(ImageHandle {
            name: name.to_string(),
            path,
            placeholder: false,
        });
        self.images.insert(name.to_string(), Rc::clone(&handle));
        Ok(handle)
    }

    /// Like [`load_image`](Self::load_image) but falls back to a placeholder for
    /// cosmetic assets such as menu backgrounds.
    pub fn load_image_or_placeholder(&mut self, name: &str) -> Rc<ImageHandle> {
        match self.load_image(name) {
            Ok(image) => image,
            Err(err) => {
                warn!("{}; drawing a placeholder instead", err);
                let handle = Rc::new(ImageHandle {
                    name: name.to_string(),
                    path: self.path_for("sprites", name),
                    placeholder: true,
                });
                self.images.insert(name.to_string(), Rc::clone(&handle));
                handle
            }
        }
    }

    pub fn load_sound(&mut self, name: &str) -> Result<Rc<SoundHandle>, ResourceError> {
        if let Some(sound) = self.sounds.get(name) {
            return Ok(Rc::clone(sound));
        }
        let path = self.locate("sound", "sounds", name)?;
        let handle = Rc::new(SoundHandle {
            name: name.to_string(),
            path,
        });
        self.sounds.insert(name.to_string(), Rc::clone(&handle));
        Ok(handle)
    }

    pub fn load_music(&mut self, name: &str) -> Result<Rc<MusicHandle>, ResourceError> {
        if let Some(track) = self.music.get(name) {
            return Ok(Rc::clone(track));
        }
        let path = self.locate("music", "music", name)?;
        let handle = Rc::new(MusicHandle {
            name: name.to_string(),
            path,
        });
        self.music.insert(name.to_string(), Rc::clone(&handle));
        Ok(handle)
    }

    pub fn load_font(&mut self, name: &str, size: u32) -> Result<Rc<FontHandle>, ResourceError> {
        let key = (name.to_string(), size);
        if let Some(font) = self.fonts.get(&key) {
            return Ok(Rc::clone(font));
        }
        let path = self.locate("font", "fonts", name)?;
        let handle = Rc::new(FontHandle {
            name: name.to_string(),
            path,
            size,
        });
        self.fonts.insert(key, Rc::clone(&handle));
        Ok(handle)
    }

    /// Number of cached handles of every kind
    pub fn cached_count(&self) -> usize {
        self.images.len() + self.sounds.len() + self.music.len() + self.fonts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_root() -> PathBuf {
        std::env::temp_dir().join("nhembi_survivor_missing_assets")
    }

    #[test]
    fn test_unchecked_manager_caches_handles() {
        let mut resources = ResourceManager::unchecked();
        let a = resources.load_image("coin.png").unwrap();
        let b = resources.load_image("coin.png").unwrap();

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(resources.cached_count(), 1);
        assert_eq!(a.path(), Path::new("assets/sprites/coin.png"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let mut resources = ResourceManager::new(missing_root());
        match resources.load_sound("nope.ogg") {
            Err(ResourceError::NotFound { kind, name, .. }) => {
                assert_eq!(kind, "sound");
                assert_eq!(name, "nope.ogg");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_fallback() {
        let mut resources = ResourceManager::new(missing_root());
        let image = resources.load_image_or_placeholder("menu_background.png");
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_fonts_cached_per_size() {
        let mut resources = ResourceManager::unchecked();
        let small = resources.load_font("title.ttf", 16).unwrap();
        let large = resources.load_font("title.ttf", 48).unwrap();
        assert!(!Rc::ptr_eq(&small, &large));
        assert_eq!(small.pixel_scale(), 2);
        assert_eq!(large.pixel_scale(), 6);
    }
}
