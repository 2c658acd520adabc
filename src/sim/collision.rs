//! Tile collision for axis-aligned bodies
//!
//! Player and enemies share one resolver: a downward probe over three foot
//! columns snaps bodies onto the surface below, an optional head probe stops
//! upward motion under solid walls, and screen bounds clamp everything else.

use glam::Vec2;

use super::grid::Grid;
use crate::cell_of;
use crate::consts::*;

/// Axis-aligned rectangle (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink by `px` on every side
    pub fn inset(&self, px: f32) -> Rect {
        Rect::new(
            self.x + px,
            self.y + px,
            (self.w - 2.0 * px).max(0.0),
            (self.h - 2.0 * px).max(0.0),
        )
    }
}

/// Physics body shared by the player and enemies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Velocity in pixels per reference frame
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            ..Default::default()
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Row just below the feet
    pub fn foot_row(&self) -> i32 {
        cell_of(self.bottom() + 2.0)
    }

    pub fn center_col(&self) -> i32 {
        cell_of(self.center().x)
    }
}

/// Where a body came to rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub row: i32,
    pub col: i32,
    pub surface_y: f32,
}

/// Probe configuration per entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Inset of the outer foot sample points
    pub foot_margin: f32,
    /// Horizontal lean of the head probe; `None` disables the ceiling check
    pub ceiling_lean: Option<f32>,
}

impl Probe {
    pub fn player(facing_right: bool) -> Self {
        Self {
            foot_margin: PLAYER_FOOT_MARGIN,
            ceiling_lean: Some(if facing_right { 8.0 } else { -8.0 }),
        }
    }

    pub fn enemy() -> Self {
        Self {
            foot_margin: ENEMY_FOOT_MARGIN,
            ceiling_lean: None,
        }
    }
}

/// Result of one collision pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    pub ground: Option<GroundContact>,
    pub hit_ceiling: bool,
    pub hit_floor: bool,
}

/// Accumulate gravity while airborne, capped at terminal velocity
pub fn apply_gravity(body: &mut Body, gravity: f32, frames: f32) {
    if !body.on_ground {
        body.vel.y = (body.vel.y + gravity * frames).min(TERMINAL_VELOCITY);
    }
}

/// Left, center and right foot columns
pub fn foot_columns(body: &Body, margin: f32) -> [i32; 3] {
    [
        cell_of(body.pos.x + margin),
        body.center_col(),
        cell_of(body.pos.x + body.size.x - margin),
    ]
}

/// A row supports a body when its center column is solid, or both sides are
pub fn row_supports(grid: &Grid, row: i32, cols: [i32; 3]) -> bool {
    let [left, center, right] = cols;
    grid.is_solid(row, center) || (grid.is_solid(row, left) && grid.is_solid(row, right))
}

/// Search the foot row, then one below, then one above
pub fn find_support_row(grid: &Grid, body: &Body, margin: f32) -> Option<i32> {
    let cols = foot_columns(body, margin);
    let base = body.foot_row();
    [base, base + 1, base - 1]
        .into_iter()
        .find(|&row| row_supports(grid, row, cols))
}

/// Snap a falling (or embedded) body onto the surface below it
pub fn resolve_ground(grid: &Grid, body: &mut Body, margin: f32) -> Option<GroundContact> {
    body.on_ground = false;
    let row = find_support_row(grid, body, margin)?;
    let col = body.center_col();
    let surface_y = grid.surface_top_y(row, col) as f32;
    let top = surface_y - body.size.y;

    if body.vel.y >= 0.0 || body.pos.y > top {
        body.pos.y = top;
        body.vel.y = 0.0;
        body.on_ground = true;
        Some(GroundContact { row, col, surface_y })
    } else {
        None
    }
}

/// Stop upward motion under flat walls.
///
/// Samples three head points across the body; two or more solid hits place
/// the body just below that row.
pub fn resolve_ceiling(grid: &Grid, body: &mut Body, lean: f32) -> bool {
    if body.vel.y >= 0.0 {
        return false;
    }
    let head_row = cell_of(body.pos.y - 2.0);
    let base_x = body.pos.x + lean;
    let hits = [0.25, 0.5, 0.75]
        .iter()
        .filter(|&&t| grid.is_wall(head_row, cell_of(base_x + body.size.x * t)))
        .count();

    if hits >= 2 {
        body.pos.y = ((head_row + 1) * CELL_SIZE) as f32;
        body.vel.y = 0.0;
        true
    } else {
        false
    }
}

/// Clamp horizontally to the screen and treat the screen bottom as a floor
pub fn clamp_to_screen(body: &mut Body) -> bool {
    body.pos.x = body.pos.x.clamp(0.0, (SCREEN_WIDTH - body.size.x).max(0.0));
    if body.bottom() > SCREEN_HEIGHT {
        body.pos.y = SCREEN_HEIGHT - body.size.y;
        body.vel.y = 0.0;
        body.on_ground = true;
        true
    } else {
        false
    }
}

/// Full collision pass: head probe, ground snap, screen clamp
pub fn resolve_body(grid: &Grid, body: &mut Body, probe: Probe) -> CollisionResult {
    let hit_ceiling = probe
        .ceiling_lean
        .is_some_and(|lean| resolve_ceiling(grid, body, lean));
    let ground = resolve_ground(grid, body, probe.foot_margin);
    let hit_floor = clamp_to_screen(body);
    CollisionResult {
        ground,
        hit_ceiling,
        hit_floor,
    }
}
