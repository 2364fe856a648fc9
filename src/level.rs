//! Tile level geometry
//!
//! A level is immutable once loaded: floor/wall tiles, decoration tiles and the
//! collision rectangles every collision check of a phase reads. Levels are
//! authored in LDtk; only the three layers the game uses are read:
//!
//! - `Suelo_paredes`: floor and wall tiles
//! - `Muebles`: furniture and other decorations drawn above the floor
//! - `Collisions`: one solid tile per grid cell
//!
//! Phases depend on the [`LevelGeometry`] trait, not on LDtk, so tests build
//! levels straight from rectangles.

use serde::Deserialize;
use std::path::Path;
use std::rc::Rc;

use crate::camera::Camera;
use crate::error::{GameError, LevelError};
use crate::geometry::Rect;
use crate::render::{Color, Painter, ScreenRect};
use crate::resources::{ImageHandle, ResourceManager};

pub const TILE_SIZE: u32 = 16;

const FLOOR_LAYER: &str = "Suelo_paredes";
const DECORATION_LAYER: &str = "Muebles";
const COLLISION_LAYER: &str = "Collisions";

const FLOOR_TILESET: &str = "tilesets/suelos_paredes.png";
const DECORATION_TILESET: &str = "tilesets/muebles.png";

/// What a phase needs from a level
pub trait LevelGeometry {
    /// Level width in pixels
    fn width(&self) -> f32;

    /// Level height in pixels
    fn height(&self) -> f32;

    /// Static solid rectangles
    fn collision_rects(&self) -> &[Rect];

    /// Draws the visible part of the level
    fn draw(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String>;
}

/// One tile stamped into the level: where it goes and where it comes from in the tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub x: i32,
    pub y: i32,
    pub src_x: i32,
    pub src_y: i32,
}

// LDtk project subset

#[derive(Debug, Deserialize)]
struct LdtkProject {
    levels: Vec<LdtkLevel>,
}

#[derive(Debug, Deserialize)]
struct LdtkLevel {
    #[serde(rename = "pxWid")]
    px_wid: u32,
    #[serde(rename = "pxHei")]
    px_hei: u32,
    #[serde(rename = "layerInstances", default)]
    layer_instances: Option<Vec<LdtkLayer>>,
}

#[derive(Debug, Deserialize)]
struct LdtkLayer {
    #[serde(rename = "__identifier")]
    identifier: String,
    #[serde(rename = "gridTiles", default)]
    grid_tiles: Vec<LdtkTile>,
    #[serde(rename = "autoLayerTiles", default)]
    auto_layer_tiles: Vec<LdtkTile>,
}

#[derive(Debug, Deserialize)]
struct LdtkTile {
    px: [i32; 2],
    src: [i32; 2],
}

impl LdtkLayer {
    fn tiles(&self) -> impl Iterator<Item = TilePlacement> + '_ {
        self.grid_tiles
            .iter()
            .chain(&self.auto_layer_tiles)
            .map(|t| TilePlacement {
                x: t.px[0],
                y: t.px[1],
                src_x: t.src[0],
                src_y: t.src[1],
            })
    }
}

/// A level loaded from an LDtk project (or built directly for tests)
pub struct TileLevel {
    width: u32,
    height: u32,
    floor: Vec<TilePlacement>,
    decorations: Vec<TilePlacement>,
    collisions: Vec<Rect>,
    floor_tileset: Option<Rc<ImageHandle>>,
    decoration_tileset: Option<Rc<ImageHandle>>,
}

impl TileLevel {
    /// Loads `assets/levels/<file>` and its two tilesets.
    pub fn load(file: &str, resources: &mut ResourceManager) -> Result<Self, GameError> {
        let path = resources.path_for("levels", file);
        let json = std::fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path.clone(),
            source,
        })?;

        let mut level = TileLevel::from_ldtk_str(&json, &path)?;
        level.floor_tileset = Some(resources.load_image(FLOOR_TILESET)?);
        level.decoration_tileset = Some(resources.load_image(DECORATION_TILESET)?);

        log::info!(
            "level {} loaded: {}x{} px, {} tiles, {} solid",
            file,
            level.width,
            level.height,
            level.floor.len() + level.decorations.len(),
            level.collisions.len()
        );
        Ok(level)
    }

    /// Parses the first level of an LDtk project. Tilesets are left unset.
    pub fn from_ldtk_str(json: &str, origin: &Path) -> Result<Self, LevelError> {
        let project: LdtkProject = serde_json::from_str(json).map_err(|source| LevelError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        let level = project
            .levels
            .into_iter()
            .next()
            .ok_or_else(|| LevelError::Empty(origin.to_path_buf()))?;

        let mut floor = Vec::new();
        let mut decorations = Vec::new();
        let mut collisions = Vec::new();

        for layer in level.layer_instances.iter().flatten() {
            match layer.identifier.as_str() {
                FLOOR_LAYER => floor.extend(layer.tiles()),
                DECORATION_LAYER => decorations.extend(layer.tiles()),
                COLLISION_LAYER => collisions.extend(layer.tiles().map(|t| {
                    Rect::new(t.x as f32, t.y as f32, TILE_SIZE as f32, TILE_SIZE as f32)
                })),
                _ => {}
            }
        }

        Ok(TileLevel {
            width: level.px_wid,
            height: level.px_hei,
            floor,
            decorations,
            collisions,
            floor_tileset: None,
            decoration_tileset: None,
        })
    }

    /// Level with only collision geometry, drawn as flat colours
    pub fn from_rects(width: u32, height: u32, collisions: Vec<Rect>) -> Self {
        TileLevel {
            width,
            height,
            floor: Vec::new(),
            decorations: Vec::new(),
            collisions,
            floor_tileset: None,
            decoration_tileset: None,
        }
    }

    /// Level whose border is a one-tile wall
    pub fn walled(width: u32, height: u32) -> Self {
        let t = TILE_SIZE as f32;
        let (w, h) = (width as f32, height as f32);
        TileLevel::from_rects(
            width,
            height,
            vec![
                Rect::new(0.0, 0.0, w, t),
                Rect::new(0.0, h - t, w, t),
                Rect::new(0.0, 0.0, t, h),
                Rect::new(w - t, 0.0, t, h),
            ],
        )
    }

    pub fn floor_tiles(&self) -> &[TilePlacement] {
        &self.floor
    }

    pub fn decoration_tiles(&self) -> &[TilePlacement] {
        &self.decorations
    }

    fn draw_layer(
        &self,
        painter: &mut dyn Painter,
        camera: &Camera,
        tiles: &[TilePlacement],
        tileset: &ImageHandle,
    ) -> Result<(), String> {
        let view = camera.view();
        let size = TILE_SIZE as f32;

        for tile in tiles {
            let world = Rect::new(tile.x as f32, tile.y as f32, size, size);
            if !world.intersects(&view) {
                continue;
            }
            let src = ScreenRect::new(tile.src_x, tile.src_y, TILE_SIZE, TILE_SIZE);
            painter.draw_image(tileset, Some(src), camera.apply(&world))?;
        }
        Ok(())
    }
}

impl LevelGeometry for TileLevel {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn collision_rects(&self) -> &[Rect] {
        &self.collisions
    }

    fn draw(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String> {
        match (&self.floor_tileset, &self.decoration_tileset) {
            (Some(floor), Some(decorations)) => {
                self.draw_layer(painter, camera, &self.floor, floor)?;
                self.draw_layer(painter, camera, &self.decorations, decorations)?;
            }
            _ => {
                // No tilesets: flat floor with solid tiles on top
                let level = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
                painter.fill_rect(camera.apply(&level), Color::rgb(40, 36, 48))?;
                let view = camera.view();
                for rect in self.collisions.iter().filter(|r| r.intersects(&view)) {
                    painter.fill_rect(camera.apply(rect), Color::rgb(90, 80, 100))?;
                }
            }
        }
        Ok(())
    }
}
