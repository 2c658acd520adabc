//! Level layouts, spawn tables and wave progression

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyKind};
use super::grid::Grid;
use super::powerup::PowerupKind;
use crate::consts::*;

/// Highest level; clearing it wins the game
pub const LAST_LEVEL: u32 = 2;

/// Horizontal gap kept between enemies spawned on the same row
const MIN_SPACING: f32 = 96.0;
/// Rows that may receive random ramps on level 2
const RAMP_ROWS: [i32; 4] = [2, 5, 8, 11];

/// Inclusive run of columns on a platform row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub row: i32,
    pub start: i32,
    pub end: i32,
}

impl Segment {
    pub const fn new(row: i32, start: i32, end: i32) -> Self {
        Self { row, start, end }
    }

    pub fn width(&self) -> i32 {
        self.end - self.start + 1
    }

    /// Spawn height: one pixel above the row, so settling lands on it
    fn base_y(&self) -> f32 {
        (self.row * CELL_SIZE) as f32 - ENEMY_HEIGHT - 1.0
    }
}

/// `count` enemies of one kind spread across a segment
#[derive(Debug, Clone, Copy)]
struct SpawnGroup {
    segment: Segment,
    count: usize,
    kind: EnemyKind,
}

const fn group(row: i32, start: i32, end: i32, count: usize, kind: EnemyKind) -> SpawnGroup {
    SpawnGroup {
        segment: Segment::new(row, start, end),
        count,
        kind,
    }
}

const LEVEL_ONE_SPAWNS: [SpawnGroup; 6] = [
    group(5, 5, 13, 3, EnemyKind::Ghost),
    group(8, 1, 6, 2, EnemyKind::Ghost),
    group(8, 12, 16, 2, EnemyKind::Ghost),
    group(11, 2, 7, 1, EnemyKind::Ghost),
    group(13, 1, 16, 2, EnemyKind::Skeleton),
    group(11, 10, 15, 2, EnemyKind::Skeleton),
];

const LEVEL_TWO_OPENING: [SpawnGroup; 2] = [
    group(8, 4, 8, 2, EnemyKind::InvisibleMan),
    group(12, 12, 16, 1, EnemyKind::InvisibleMan),
];

/// Follow-up waves on level 2, spawned once the field is clear
pub const WAVES: [(EnemyKind, usize); 3] = [
    (EnemyKind::Chelnov, 4),
    (EnemyKind::Skeleton, 9),
    (EnemyKind::Ghost, 4),
];

/// Segments waves cycle through, one enemy per segment per pass
const WAVE_SEGMENTS: [Segment; 8] = [
    Segment::new(2, 1, 3),
    Segment::new(2, 14, 16),
    Segment::new(5, 5, 12),
    Segment::new(8, 2, 7),
    Segment::new(8, 10, 15),
    Segment::new(11, 3, 8),
    Segment::new(11, 9, 14),
    Segment::new(13, 1, 16),
];

const LEVEL_ONE_POWERUPS: [(PowerupKind, f32, f32); 2] = [
    (PowerupKind::Speed, 500.0, 4.0 * 64.0 - 16.0),
    (PowerupKind::Life, 300.0, 7.0 * 64.0 - 16.0),
];

const LEVEL_TWO_POWERUPS: [(PowerupKind, f32, f32); 4] = [
    (PowerupKind::Speed, 400.0, 5.0 * 64.0 - 16.0),
    (PowerupKind::Range, 600.0, 8.0 * 64.0 - 16.0),
    (PowerupKind::Power, 350.0, 11.0 * 64.0 - 16.0),
    (PowerupKind::Life, 200.0, 2.0 * 64.0 - 16.0),
];

/// Build a level's tile grid. Level 2 gets one to four random ramps.
pub fn build_grid(level: u32, rng: &mut Pcg32) -> Grid {
    let mut grid = Grid::standard();
    let last = LEVEL_COLS - 1;
    grid.fill_wall(13, 0, last);
    if level <= 1 {
        grid.fill_wall(11, 2, 7);
        grid.fill_wall(11, 10, 15);
        grid.fill_wall(8, 1, 5);
        grid.fill_wall(8, 8, 10);
        grid.fill_wall(8, 12, 16);
        grid.fill_wall(5, 5, 12);
    } else {
        grid.fill_wall(11, 0, 8);
        grid.fill_wall(11, 12, 14);
        grid.fill_wall(8, 3, 8);
        grid.fill_wall(8, 11, 17);
        grid.fill_wall(5, 5, 11);
        grid.fill_wall(2, 1, 3);
        grid.fill_wall(2, 14, 16);
        grid.place_random_ramps(&RAMP_ROWS, rng);
    }
    grid
}

/// Fixed power-up placements (kind and pickup box origin)
pub fn powerup_layout(level: u32) -> Vec<(PowerupKind, Vec2)> {
    let table: &[(PowerupKind, f32, f32)] = if level <= 1 {
        &LEVEL_ONE_POWERUPS
    } else {
        &LEVEL_TWO_POWERUPS
    };
    table
        .iter()
        .map(|&(kind, x, y)| (kind, Vec2::new(x, y)))
        .collect()
}

/// A pending enemy spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

fn column_x(col: i32) -> f32 {
    (col * CELL_SIZE) as f32 + 8.0
}

fn too_close(occupied: &[Vec2], x: f32, y: f32) -> bool {
    occupied
        .iter()
        .any(|p| (p.y - y).abs() < 8.0 && (p.x - x).abs() < MIN_SPACING)
}

/// Shuffle `col` one step at a time until it is clear of `occupied`.
/// Gives up after one attempt per column and takes the last candidate.
fn clear_column(segment: Segment, mut col: i32, occupied: &[Vec2], rng: &mut Pcg32) -> f32 {
    let y = segment.base_y();
    let mut x = column_x(col);
    let mut attempts = 0;
    while attempts < segment.width() && too_close(occupied, x, y) {
        col = (col + rng.random_range(-1..=1)).clamp(segment.start, segment.end);
        x = column_x(col);
        attempts += 1;
    }
    x
}

/// Evenly spread `count` enemies over a segment
pub fn spread_on_segment(
    segment: Segment,
    count: usize,
    kind: EnemyKind,
    occupied: &mut Vec<Vec2>,
    rng: &mut Pcg32,
) -> Vec<Placement> {
    let span = (segment.width() - 1) as f32;
    (0..count)
        .map(|i| {
            let t = (i + 1) as f32 / (count + 1) as f32;
            let col = (segment.start + (t * span).round() as i32).clamp(segment.start, segment.end);
            let pos = Vec2::new(clear_column(segment, col, occupied, rng), segment.base_y());
            occupied.push(pos);
            Placement { kind, pos }
        })
        .collect()
}

/// Wave placement: one enemy per segment in turn, at a random interior column
pub fn wave_placements(
    kind: EnemyKind,
    count: usize,
    occupied: &mut Vec<Vec2>,
    rng: &mut Pcg32,
) -> Vec<Placement> {
    WAVE_SEGMENTS
        .iter()
        .cycle()
        .take(count)
        .map(|&segment| {
            let width = segment.width();
            let t = rng.random_range(1..width) as f32 / width as f32;
            let col = (segment.start + (t * (width - 1) as f32).round() as i32)
                .clamp(segment.start, segment.end);
            let pos = Vec2::new(clear_column(segment, col, occupied, rng), segment.base_y());
            occupied.push(pos);
            Placement { kind, pos }
        })
        .collect()
}

/// Enemies present when a level starts
pub fn opening_placements(level: u32, rng: &mut Pcg32) -> Vec<Placement> {
    let groups: &[SpawnGroup] = if level <= 1 {
        &LEVEL_ONE_SPAWNS
    } else {
        &LEVEL_TWO_OPENING
    };
    let mut occupied = Vec::new();
    groups
        .iter()
        .flat_map(|g| spread_on_segment(g.segment, g.count, g.kind, &mut occupied, rng))
        .collect()
}

/// Platform row in the throw direction holding the most live enemies.
///
/// Rows are scanned outward from `from_row`; the nearest row wins ties.
/// Returns `None` when no live enemy stands on such a row.
pub fn busiest_row(grid: &Grid, enemies: &[Enemy], from_row: i32, up: bool) -> Option<i32> {
    let rows: Vec<i32> = if up {
        (0..from_row).rev().collect()
    } else {
        (from_row + 1..grid.rows()).collect()
    };

    let mut best: Option<(i32, usize)> = None;
    for row in rows.into_iter().filter(|&r| grid.row_has_wall(r)) {
        let count = enemies
            .iter()
            .filter(|e| e.is_live() && e.foot_row() == row)
            .count();
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((row, count));
        }
    }
    best.map(|(row, _)| row)
}

/// Level and wave progress for the running session
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSession {
    pub level: u32,
    /// Follow-up waves spawned so far
    pub wave: usize,
    /// Time the field has been clear while a wave is pending
    clear_timer: f32,
    uses_waves: bool,
}

impl LevelSession {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            wave: 0,
            clear_timer: 0.0,
            uses_waves: level >= 2,
        }
    }

    pub fn uses_waves(&self) -> bool {
        self.uses_waves
    }

    pub fn waves_pending(&self) -> bool {
        self.uses_waves && self.wave < WAVES.len()
    }

    pub fn is_last_level(&self) -> bool {
        self.level >= LAST_LEVEL
    }

    /// Next wave to spawn, once the field has stayed clear for `delay`
    pub fn poll_wave(&mut self, live_enemies: usize, delay: f32, dt: f32) -> Option<(EnemyKind, usize)> {
        if !self.waves_pending() || live_enemies > 0 {
            self.clear_timer = 0.0;
            return None;
        }
        self.clear_timer += dt;
        if self.clear_timer < delay {
            return None;
        }
        self.clear_timer = 0.0;
        let wave = WAVES[self.wave];
        self.wave += 1;
        Some(wave)
    }

    /// Cleared once every wave is out and no enemy is left
    pub fn is_cleared(&self, live_enemies: usize) -> bool {
        live_enemies == 0 && !self.waves_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_level_one_layout() {
        let grid = build_grid(1, &mut Pcg32::seed_from_u64(1));
        assert!((0..LEVEL_COLS).all(|c| grid.is_wall(13, c)));
        assert!(grid.is_wall(11, 2) && grid.is_wall(11, 7) && !grid.is_wall(11, 8));
        assert!(grid.is_wall(8, 9) && !grid.is_wall(8, 11));
        assert!(grid.is_wall(5, 12) && !grid.is_wall(5, 13));
        assert!(!grid.row_has_wall(2));
        assert_eq!(grid.row_top_y(11), 11 * 64 - 44);
    }

    #[test]
    fn test_level_two_has_ramps() {
        for seed in 0..8 {
            let grid = build_grid(2, &mut Pcg32::seed_from_u64(seed));
            let slopes = (0..LEVEL_ROWS)
                .flat_map(|r| (0..LEVEL_COLS).map(move |c| (r, c)))
                .filter(|&(r, c)| grid.tile_at(r, c).is_slope())
                .count();
            assert!(slopes >= 3, "seed {seed} placed {slopes} slope tiles");
            assert!(grid.is_wall(2, 1) && grid.is_wall(2, 16));
        }
    }

    #[test]
    fn test_level_one_opening_spread() {
        let placements = opening_placements(1, &mut Pcg32::seed_from_u64(3));
        assert_eq!(placements.len(), 12);
        let ghosts = placements.iter().filter(|p| p.kind == EnemyKind::Ghost).count();
        assert_eq!(ghosts, 8);
        for (p, g) in placements.iter().zip(
            LEVEL_ONE_SPAWNS
                .iter()
                .flat_map(|g| std::iter::repeat_n(g, g.count)),
        ) {
            let col = (p.pos.x - 8.0) as i32 / CELL_SIZE;
            assert_eq!(p.kind, g.kind);
            assert!((g.segment.start..=g.segment.end).contains(&col));
            assert_eq!(p.pos.y, g.segment.base_y());
        }
    }

    #[test]
    fn test_spacing_check_is_per_row() {
        let occupied = [Vec2::new(200.0, 400.0)];
        assert!(too_close(&occupied, 290.0, 403.0));
        assert!(!too_close(&occupied, 296.0, 400.0));
        assert!(!too_close(&occupied, 200.0, 410.0));
    }

    #[test]
    fn test_spread_columns() {
        let mut occupied = Vec::new();
        let placements = spread_on_segment(
            Segment::new(5, 5, 13),
            3,
            EnemyKind::Ghost,
            &mut occupied,
            &mut Pcg32::seed_from_u64(0),
        );
        let xs: Vec<f32> = placements.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![7.0 * 64.0 + 8.0, 9.0 * 64.0 + 8.0, 11.0 * 64.0 + 8.0]);
        assert_eq!(placements[0].pos.y, 5.0 * 64.0 - ENEMY_HEIGHT - 1.0);
        assert_eq!(occupied.len(), 3);
    }

    #[test]
    fn test_wave_cycles_segments() {
        let mut occupied = Vec::new();
        let placements = wave_placements(EnemyKind::Skeleton, 9, &mut occupied, &mut Pcg32::seed_from_u64(9));
        assert_eq!(placements.len(), 9);
        assert_eq!(placements[0].pos.y, placements[8].pos.y);
        for (p, seg) in placements.iter().zip(WAVE_SEGMENTS.iter().cycle()) {
            let col = (p.pos.x - 8.0) as i32 / CELL_SIZE;
            assert!((seg.start..=seg.end).contains(&col));
        }
    }

    #[test]
    fn test_waves_wait_for_clear_field() {
        let mut session = LevelSession::new(2);
        assert!(session.poll_wave(2, 1.0, 0.5).is_none());
        assert!(session.poll_wave(0, 1.0, 0.5).is_none());
        assert_eq!(session.poll_wave(0, 1.0, 0.5), Some((EnemyKind::Chelnov, 4)));
        assert!(!session.is_cleared(0));
        assert_eq!(session.poll_wave(0, 0.0, 0.1), Some((EnemyKind::Skeleton, 9)));
        assert_eq!(session.poll_wave(0, 0.0, 0.1), Some((EnemyKind::Ghost, 4)));
        assert!(session.poll_wave(0, 0.0, 0.1).is_none());
        assert!(session.is_cleared(0));
        assert!(!session.is_cleared(1));
    }

    #[test]
    fn test_level_one_has_no_waves() {
        let mut session = LevelSession::new(1);
        assert!(session.poll_wave(0, 0.0, 1.0).is_none());
        assert!(session.is_cleared(0));
        assert!(!session.is_last_level());
    }

    #[test]
    fn test_busiest_row_prefers_crowd() {
        let grid = build_grid(1, &mut Pcg32::seed_from_u64(1));
        let mut rng = Pcg32::seed_from_u64(2);
        let mut enemies: Vec<Enemy> = [(5, 400.0), (5, 600.0), (8, 100.0)]
            .iter()
            .enumerate()
            .map(|(i, &(row, x))| {
                let pos = Vec2::new(x, (row * CELL_SIZE) as f32 - ENEMY_HEIGHT - 1.0);
                let mut e = Enemy::spawn(i as u32, EnemyKind::Ghost, pos, &mut rng);
                e.settle(&grid);
                e
            })
            .collect();
        assert_eq!(busiest_row(&grid, &enemies, 13, true), Some(5));
        assert_eq!(busiest_row(&grid, &enemies, 13, false), None);
        enemies[0].mark_captured();
        enemies[1].mark_captured();
        assert_eq!(busiest_row(&grid, &enemies, 13, true), Some(8));
    }

    #[test]
    fn test_powerup_layout() {
        assert_eq!(powerup_layout(1).len(), 2);
        let level_two = powerup_layout(2);
        assert_eq!(level_two.len(), 4);
        assert_eq!(level_two[1], (PowerupKind::Range, Vec2::new(600.0, 496.0)));
    }
}
