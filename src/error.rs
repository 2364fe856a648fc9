//! Error types
//!
//! One enum per concern. Configuration and resource errors are raised while a
//! scene is being built; `DirectorError` covers misuse of the scene stack.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::EnemyKind;
use crate::scene::SceneHandle;

/// Problems with the data files that describe levels, stats and settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("level '{level}': enemies.types has {types} entries but enemies.positions has {positions}")]
    ConfigMismatch {
        level: String,
        types: usize,
        positions: usize,
    },

    #[error("unknown level '{0}'")]
    UnknownLevel(String),

    #[error("unknown enemy type '{kind}' in level '{level}'")]
    UnknownEnemyType { level: String, kind: String },

    #[error("level '{level}' requires {required} coins but only places {placed}")]
    UnreachableThreshold {
        level: String,
        required: u32,
        placed: usize,
    },

    #[error("stat table has no entry for {0:?}")]
    MissingStats(EnemyKind),
}

/// A named asset could not be located
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind} '{name}' not found at {path}")]
    NotFound {
        kind: &'static str,
        name: String,
        path: PathBuf,
    },
}

/// Tile map loading failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("level file {0} contains no levels")]
    Empty(PathBuf),
}

/// Anything that can go wrong while building a scene
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Scene stack contract violations
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("no scene factory registered for kind '{0}'")]
    UnregisteredScene(String),

    #[error("pop on an empty scene stack")]
    EmptyStack,

    #[error("refusing to pop the root scene; use quit instead")]
    RootPop,

    #[error("scene {0} is already on the stack")]
    AlreadyOnStack(SceneHandle),

    #[error("failed to build scene {handle}: {source}")]
    SceneBuild {
        handle: SceneHandle,
        #[source]
        source: GameError,
    },
}
