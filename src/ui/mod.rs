//! In-game overlays
//!
//! Stateless or lightly cached components drawn by the phase after the world:
//!
//! - [`HealthBar`] - player bar and bars above damaged enemies
//! - [`Hud`] - health, coin counter and shield status
//! - [`Minimap`] - scaled level overview in the top-right corner
//!
//! # Example Usage
//!
//! ```ignore
//! let hud = Hud::new();
//! hud.render(painter, &HudState {
//!     health: 4,
//!     max_health: 5,
//!     coins: 2,
//!     coins_required: 5,
//!     shield: player.shield_status(now),
//! })?;
//! ```

pub mod health_bar;
pub mod hud;
pub mod minimap;

pub use health_bar::{HealthBar, HealthBarStyle};
pub use hud::{Hud, HudState};
pub use minimap::Minimap;
