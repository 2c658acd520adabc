//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod anim;
pub mod collision;
pub mod enemy;
pub mod grid;
pub mod level;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod score;
pub mod state;
pub mod tick;
pub mod vacuum;

pub use anim::{AnimSpec, AnimState, Animator};
pub use collision::{Body, CollisionResult, Probe, Rect, resolve_body};
pub use enemy::{Enemy, EnemyAnim, EnemyBehavior, EnemyKind};
pub use grid::{Grid, GridError, RampAngle, Tile};
pub use level::LevelSession;
pub use player::{Character, Player, PlayerAnim};
pub use powerup::{Powerup, PowerupKind};
pub use projectile::{EnemyProjectile, Projectile, ProjectilePhase};
pub use score::ScoreManager;
pub use state::{DamageSource, GameEvent, GamePhase, GameState};
pub use tick::tick;
pub use vacuum::{AimDirection, CaptureStack};
