//! Nhembi Survivor
//!
//! A top-down action game built around two pieces:
//!
//! - the [`director::Director`], which owns a stack of scenes (menus, levels,
//!   overlays) and applies the transitions they request between frames
//! - the [`phase::Phase`], one playable level: movement, tile collision,
//!   melee and contact combat, turrets, pickups and the win/lose checks
//!
//! Drawing goes through the [`render::Painter`] trait and input arrives as
//! [`input_system::InputEvent`]s, so everything except the `app` module runs
//! headless. The SDL2 window lives behind the `sdl` feature.

pub mod animation;
pub mod audio;
pub mod camera;
pub mod character;
pub mod collision;
pub mod combat;
pub mod config;
pub mod director;
pub mod enemy;
pub mod error;
pub mod geometry;
pub mod gui;
pub mod input_system;
pub mod items;
pub mod level;
pub mod logging;
pub mod phase;
pub mod player;
pub mod render;
pub mod resources;
pub mod scene;
pub mod stats;
pub mod text;
pub mod turret;
pub mod ui;

#[cfg(feature = "sdl")]
pub mod app;
