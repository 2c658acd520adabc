//! Draw-call composition
//!
//! The renderer performs no layout: everything here turns simulation state
//! into (sheet, source rect, destination, scale, flip) tuples. Sheets are
//! looked up by logical role; a role with no loaded sheet is skipped.

mod instance;
mod sheet;

pub use instance::{SpriteInstance, as_bytes};
pub use sheet::{FrameRange, Sequence, SheetHandle, SpriteSheet, SrcRect};

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{
    AimDirection, AnimSpec, AnimState, Character, Enemy, EnemyAnim, EnemyKind, GamePhase, GameState,
    Player, PlayerAnim, PowerupKind, Tile,
};

/// Logical role a sheet is loaded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKey {
    Background { level: u32 },
    Platform,
    Ramp,
    /// Player strips come in two halves per character
    Player { character: Character, strip: u8 },
    Enemy(EnemyKind),
    /// Faded invisible man while it is teleporting
    InvisibleDim,
    Powerup(PowerupKind),
    Beam(AimDirection),
    EnemyShot,
}

/// Loaded sheets keyed by role
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sheets: Vec<SpriteSheet>,
    by_key: HashMap<SheetKey, usize>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet for `key`, replacing any earlier one.
    ///
    /// The atlas assigns the handle; whatever `sheet.handle` held is overwritten.
    pub fn insert(&mut self, key: SheetKey, mut sheet: SpriteSheet) -> SheetHandle {
        let index = match self.by_key.get(&key) {
            Some(&index) => index,
            None => {
                self.by_key.insert(key, self.sheets.len());
                self.sheets.push(sheet.clone());
                self.sheets.len() - 1
            }
        };
        sheet.handle = SheetHandle(index as u32);
        let handle = sheet.handle;
        self.sheets[index] = sheet;
        handle
    }

    pub fn get(&self, key: SheetKey) -> Option<&SpriteSheet> {
        let sheet = &self.sheets[*self.by_key.get(&key)?];
        (!sheet.is_empty()).then_some(sheet)
    }

    pub fn by_handle(&self, handle: SheetHandle) -> Option<&SpriteSheet> {
        self.sheets.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// One sprite blit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub sheet: SheetHandle,
    pub src: SrcRect,
    /// Top-left in screen pixels
    pub dest: Vec2,
    pub scale: f32,
    /// Mirror horizontally
    pub flip: bool,
}

/// Where the select screen shows each character
const SELECT_SLOTS: [(Character, f32); 2] = [(Character::Yellow, 300.0), (Character::Green, 650.0)];
const SELECT_Y: f32 = 350.0;
/// Player blink rate while invulnerable (toggles per second)
const BLINK_RATE: f32 = 10.0;

/// Compose the frame for `state` back to front
pub fn compose(state: &GameState, atlas: &SpriteAtlas) -> Vec<DrawCall> {
    let mut calls = Vec::new();
    let level = state.session.level;

    if let Some(bg) = atlas.get(SheetKey::Background { level }) {
        fill_screen(&mut calls, bg);
    }

    if state.phase == GamePhase::CharacterSelect {
        for (character, x) in SELECT_SLOTS {
            let idle = PlayerAnim::Idle.spec(());
            let key = SheetKey::Player { character, strip: idle.row };
            if let Some(sheet) = atlas.get(key)
                && let Some(src) = sheet.frame_rect(&idle, 0)
            {
                calls.push(DrawCall {
                    sheet: sheet.handle,
                    src,
                    dest: Vec2::new(x, SELECT_Y),
                    scale: if character == state.selected { PLAYER_SCALE * 1.1 } else { PLAYER_SCALE },
                    flip: false,
                });
            }
        }
        return calls;
    }

    draw_tiles(&mut calls, state, atlas);
    draw_powerups(&mut calls, state, atlas);
    for enemy in state.enemies.iter().filter(|e| e.is_live()) {
        draw_enemy(&mut calls, enemy, atlas);
    }
    draw_projectiles(&mut calls, state, atlas);
    draw_beam(&mut calls, &state.player, atlas);
    draw_player(&mut calls, &state.player, atlas);
    calls
}

fn fill_screen(calls: &mut Vec<DrawCall>, sheet: &SpriteSheet) {
    if let Some(src) = sheet.nth_frame(0) {
        calls.push(DrawCall {
            sheet: sheet.handle,
            src,
            dest: Vec2::ZERO,
            scale: SCREEN_WIDTH / src.w as f32,
            flip: false,
        });
    }
}

fn draw_tiles(calls: &mut Vec<DrawCall>, state: &GameState, atlas: &SpriteAtlas) {
    let grid = &state.grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let tile = grid.tile_at(row, col);
            let key = match tile {
                Tile::Empty => continue,
                Tile::Wall => SheetKey::Platform,
                _ => SheetKey::Ramp,
            };
            let Some(sheet) = atlas.get(key) else { continue };
            let Some(src) = sheet.nth_frame(0) else { continue };
            calls.push(DrawCall {
                sheet: sheet.handle,
                src,
                dest: Vec2::new((col * CELL_SIZE) as f32, grid.row_top_y(row) as f32),
                scale: CELL_SIZE as f32 / src.w as f32,
                flip: tile == Tile::SlopeLeft,
            });
        }
    }
}

fn draw_powerups(calls: &mut Vec<DrawCall>, state: &GameState, atlas: &SpriteAtlas) {
    for powerup in state.powerups.iter().filter(|p| p.active) {
        let Some(sheet) = atlas.get(SheetKey::Powerup(powerup.kind)) else { continue };
        let Some(src) = sheet.nth_frame(0) else { continue };
        calls.push(DrawCall {
            sheet: sheet.handle,
            src,
            dest: powerup.pos + Vec2::new(0.0, powerup.bob_offset()),
            scale: POWERUP_SIZE / src.w as f32,
            flip: false,
        });
    }
}

fn draw_enemy(calls: &mut Vec<DrawCall>, enemy: &Enemy, atlas: &SpriteAtlas) {
    let key = if enemy.kind == EnemyKind::InvisibleMan && !enemy.is_visible() {
        SheetKey::InvisibleDim
    } else {
        SheetKey::Enemy(enemy.kind)
    };
    let Some(sheet) = atlas.get(key) else { return };
    let anim = &enemy.mob.anim;
    let spec = anim.state().spec(enemy.kind);
    let Some(src) = sheet.frame_rect(&spec, anim.frame() as u32) else { return };
    calls.push(DrawCall {
        sheet: sheet.handle,
        src,
        dest: enemy.mob.body.pos,
        scale: ENEMY_SCALE,
        flip: !enemy.mob.facing_right,
    });
}

fn draw_projectiles(calls: &mut Vec<DrawCall>, state: &GameState, atlas: &SpriteAtlas) {
    for projectile in state.projectiles.iter().filter(|p| p.active) {
        let Some(sheet) = atlas.get(SheetKey::Enemy(projectile.kind)) else { continue };
        let spec = EnemyAnim::Idle.spec(projectile.kind);
        let Some(src) = sheet.frame_rect(&spec, 0) else { continue };
        calls.push(DrawCall {
            sheet: sheet.handle,
            src,
            dest: projectile.pos,
            scale: PROJECTILE_SIZE / src.h as f32,
            flip: projectile.vel.x < 0.0,
        });
    }

    let Some(sheet) = atlas.get(SheetKey::EnemyShot) else { return };
    let Some(src) = sheet.nth_frame(0) else { return };
    for shot in state.enemy_projectiles.iter().filter(|p| p.active) {
        calls.push(DrawCall {
            sheet: sheet.handle,
            src,
            dest: shot.pos,
            scale: ENEMY_SHOT_SIZE / src.w as f32,
            flip: shot.vel.x < 0.0,
        });
    }
}

/// Beam sprite anchored at the nozzle and stretched to the vacuum reach
fn draw_beam(calls: &mut Vec<DrawCall>, player: &Player, atlas: &SpriteAtlas) {
    let beam = player.vacuum.beam;
    if !beam.is_visible() || player.is_dead() {
        return;
    }
    let direction = player.vacuum.direction;
    let Some(sheet) = atlas.get(SheetKey::Beam(direction)) else { return };
    let Some(src) = sheet.nth_frame(beam.frame.max(0.0) as u32) else { return };

    let along = (if direction.is_vertical() { src.h } else { src.w }) as f32;
    let scale = player.vacuum_range.value() / along.max(1.0);
    let (w, h) = (src.w as f32 * scale, src.h as f32 * scale);
    let nozzle = player.launch_point(direction);
    let dest = match direction {
        AimDirection::Right => Vec2::new(nozzle.x, nozzle.y - h * 0.5),
        AimDirection::Left => Vec2::new(nozzle.x - w, nozzle.y - h * 0.5),
        AimDirection::Up => Vec2::new(nozzle.x - w * 0.5, nozzle.y - h),
        AimDirection::Down => Vec2::new(nozzle.x - w * 0.5, nozzle.y),
    };
    calls.push(DrawCall {
        sheet: sheet.handle,
        src,
        dest,
        scale,
        flip: false,
    });
}

fn draw_player(calls: &mut Vec<DrawCall>, player: &Player, atlas: &SpriteAtlas) {
    if player.is_invulnerable() && !player.is_dead() && (player.invulnerable * BLINK_RATE) as u32 % 2 == 1 {
        return;
    }
    let spec = player.anim.state().spec(());
    let key = SheetKey::Player {
        character: player.character,
        strip: spec.row,
    };
    let Some(sheet) = atlas.get(key) else { return };
    // Each strip is a single row; the spec row picks the strip
    let strip_spec = AnimSpec { row: 0, ..spec };
    let Some(src) = sheet.frame_rect(&strip_spec, player.anim.frame() as u32) else { return };
    calls.push(DrawCall {
        sheet: sheet.handle,
        src,
        dest: player.sprite_origin(),
        scale: PLAYER_SCALE,
        flip: !player.facing_right,
    });
}

/// GPU instances for `calls`, skipping any whose sheet is unknown
pub fn instances(calls: &[DrawCall], atlas: &SpriteAtlas) -> Vec<SpriteInstance> {
    calls
        .iter()
        .filter_map(|call| SpriteInstance::from_draw(call, atlas.by_handle(call.sheet)?))
        .collect()
}
