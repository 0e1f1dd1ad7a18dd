//! Multi-level arena layout
//!
//! An arena is a set of platforms at different heights, a few obstacles
//! resting on them, and one spawn point per fighter. Layouts are generated
//! fresh for every match and never change while it runs.
//!
//! Coordinates are screen-style: x grows right, y grows down, so a "higher"
//! platform has a smaller y.

use std::convert::Infallible;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{FIGHTER_HALF_WIDTH, FIGHTER_STAND_HEIGHT};

/// Distance of the ground platform's surface from the arena bottom
pub const GROUND_OFFSET: f32 = 60.0;
/// Platform slab thickness
pub const PLATFORM_THICKNESS: f32 = 12.0;
/// Fighters are considered standing on a platform within this vertical tolerance
pub const STAND_TOLERANCE: f32 = 20.0;
/// Spawn points are spread over at most this many platforms
pub const MAX_SPAWN_PLATFORMS: usize = 4;

/// Platform tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlatformKind {
    Ground,
    Low,
    Mid,
    High,
    Floating,
}

impl PlatformKind {
    /// Tiers used by random generation
    pub const ELEVATED: [PlatformKind; 4] = [
        PlatformKind::Low,
        PlatformKind::Mid,
        PlatformKind::High,
        PlatformKind::Floating,
    ];

    /// Height above the ground tier
    pub fn height(&self) -> f32 {
        match self {
            PlatformKind::Ground => 0.0,
            PlatformKind::Low => 25.0,
            PlatformKind::Mid => 50.0,
            PlatformKind::High => 75.0,
            PlatformKind::Floating => 60.0,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PlatformKind::Ground => "#2a3545",
            PlatformKind::Low => "#3a4555",
            PlatformKind::Mid => "#4a5565",
            PlatformKind::High => "#5a6575",
            PlatformKind::Floating => "#6a7585",
        }
    }

    /// Whether fighters can stand on it (every tier today)
    pub fn solid(&self) -> bool {
        true
    }
}

/// A horizontal platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub x: f32,
    /// Top surface
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, kind: PlatformKind) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height: PLATFORM_THICKNESS,
            kind,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y coordinate of a fighter standing on this platform
    #[inline]
    pub fn stand_y(&self) -> f32 {
        self.y - FIGHTER_STAND_HEIGHT
    }

    /// Walkable x range for a fighter (inset by half a sprite)
    pub fn walk_bounds(&self) -> (f32, f32) {
        let min = self.left() + FIGHTER_HALF_WIDTH;
        let max = self.right() - FIGHTER_HALF_WIDTH;
        if min <= max {
            (min, max)
        } else {
            let mid = self.x + self.width / 2.0;
            (mid, mid)
        }
    }

    /// Closest standing point on this platform to `point`
    pub fn closest_stand_point(&self, point: Vec2) -> Vec2 {
        let (min, max) = self.walk_bounds();
        Vec2::new(point.x.clamp(min, max), self.stand_y())
    }

    /// Random standing point on this platform
    pub fn random_stand_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let (min, max) = self.walk_bounds();
        let x = if max > min {
            rng.random_range(min..max)
        } else {
            min
        };
        Vec2::new(x, self.stand_y())
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Wall,
    Barrier,
    Pillar,
    Crate,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Wall,
        ObstacleKind::Barrier,
        ObstacleKind::Pillar,
        ObstacleKind::Crate,
    ];

    /// Footprint (width, height)
    pub fn size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Wall => (40.0, 60.0),
            ObstacleKind::Barrier => (50.0, 40.0),
            ObstacleKind::Pillar => (30.0, 80.0),
            ObstacleKind::Crate => (45.0, 45.0),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ObstacleKind::Wall => "🧱",
            ObstacleKind::Barrier => "🚧",
            ObstacleKind::Pillar => "🏛️",
            ObstacleKind::Crate => "📦",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ObstacleKind::Wall => "#7f8c8d",
            ObstacleKind::Barrier => "#e67e22",
            ObstacleKind::Pillar => "#95a5a6",
            ObstacleKind::Crate => "#d35400",
        }
    }
}

/// A static obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub kind: ObstacleKind,
    /// Platform this obstacle rests on, when placed on one
    #[serde(default)]
    pub platform_id: Option<String>,
}

impl Obstacle {
    pub fn new(id: impl Into<String>, x: f32, y: f32, kind: ObstacleKind) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            kind,
            platform_id: None,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.kind.size().0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.kind.size().1
    }

    /// Point-in-rectangle test (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width()
            && point.y >= self.y
            && point.y <= self.y + self.height()
    }
}

/// Where a fighter starts a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub pos: Vec2,
    pub platform_id: String,
}

/// Layout presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArenaPreset {
    /// Balanced mix of platforms
    Classic,
    /// Stacked platforms at increasing height
    Vertical,
    /// Mirrored left/right pairs
    Symmetrical,
    /// Scattered platforms and obstacles
    Chaotic,
    /// Just a couple of platforms
    Minimal,
    #[default]
    Random,
}

impl ArenaPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaPreset::Classic => "classic",
            ArenaPreset::Vertical => "vertical",
            ArenaPreset::Symmetrical => "symmetrical",
            ArenaPreset::Chaotic => "chaotic",
            ArenaPreset::Minimal => "minimal",
            ArenaPreset::Random => "random",
        }
    }
}

/// Unknown names fall back to `Random`, so parsing never fails
impl FromStr for ArenaPreset {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "classic" => ArenaPreset::Classic,
            "vertical" => ArenaPreset::Vertical,
            "symmetrical" => ArenaPreset::Symmetrical,
            "chaotic" => ArenaPreset::Chaotic,
            "minimal" => ArenaPreset::Minimal,
            _ => ArenaPreset::Random,
        })
    }
}

/// A generated arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub width: f32,
    pub height: f32,
    /// Platform 0 is always the full-width ground
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    /// One per fighter, shuffled
    pub spawn_points: Vec<SpawnPoint>,
}

impl ArenaLayout {
    /// Index of the platform a fighter at `pos` is standing on
    ///
    /// Tiers sit within [`STAND_TOLERANCE`] of each other, so the level
    /// platform with the smallest vertical gap wins; one spanning `pos.x`
    /// wins over one that merely matches vertically.
    pub fn platform_under(&self, pos: Vec2) -> Option<usize> {
        let gap = |p: &Platform| (p.y - (pos.y + FIGHTER_STAND_HEIGHT)).abs();
        let closest = |spanning: bool| {
            let mut best: Option<(usize, f32)> = None;
            for (i, p) in self.platforms.iter().enumerate() {
                let g = gap(p);
                if g >= STAND_TOLERANCE || (spanning && (pos.x < p.left() || pos.x > p.right())) {
                    continue;
                }
                match best {
                    Some((_, b)) if b <= g => {}
                    _ => best = Some((i, g)),
                }
            }
            best.map(|(i, _)| i)
        };
        closest(true).or_else(|| closest(false))
    }

    /// Index of the platform with id `id`
    pub fn platform_index(&self, id: &str) -> Option<usize> {
        self.platforms.iter().position(|p| p.id == id)
    }

    /// Index of the highest platform (smallest y, first wins ties)
    pub fn highest_platform(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, p) in self.platforms.iter().enumerate() {
            match best {
                Some(b) if self.platforms[b].y <= p.y => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the platform whose standing line is closest to `point`
    pub fn nearest_platform(&self, point: Vec2) -> Option<usize> {
        self.platforms
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.closest_stand_point(point).distance(point)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// Obstacle covering `point`, if any
    pub fn obstacle_at(&self, point: Vec2) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.contains(point))
    }

    /// Random standing position on a random platform
    pub fn random_platform_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, Vec2)> {
        if self.platforms.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.platforms.len());
        Some((idx, self.platforms[idx].random_stand_point(rng)))
    }
}

/// Generate an arena for `fighter_count` fighters
pub fn generate_layout<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    fighter_count: usize,
    preset: ArenaPreset,
    rng: &mut R,
) -> ArenaLayout {
    let mut platforms = vec![Platform::new(
        "ground",
        0.0,
        height - GROUND_OFFSET,
        width,
        PlatformKind::Ground,
    )];
    let mut obstacles = Vec::new();

    match preset {
        ArenaPreset::Random => generate_random(width, height, &mut platforms, &mut obstacles, rng),
        _ => generate_preset(height, preset, &mut platforms, &mut obstacles, rng),
    }

    let mut spawn_points = spawn_points_for(&platforms, fighter_count);
    spawn_points.shuffle(rng);

    log::debug!(
        "Arena {}: {} platforms, {} obstacles, {} spawns",
        preset.as_str(),
        platforms.len(),
        obstacles.len(),
        spawn_points.len()
    );

    ArenaLayout {
        width,
        height,
        platforms,
        obstacles,
        spawn_points,
    }
}

/// 3-6 random platforms and 2-4 obstacles resting on platforms
fn generate_random<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    platforms: &mut Vec<Platform>,
    obstacles: &mut Vec<Obstacle>,
    rng: &mut R,
) {
    let num_platforms = rng.random_range(3..=6);
    for i in 0..num_platforms {
        let kind = PlatformKind::ELEVATED[rng.random_range(0..PlatformKind::ELEVATED.len())];
        let p_width = rng.random_range(150..300) as f32;
        let max_x = (width - p_width - 100.0).max(1.0) as u32;
        let x = (rng.random_range(0..max_x) + 50) as f32;
        let y = height - GROUND_OFFSET - kind.height() - 50.0;
        platforms.push(Platform::new(format!("platform-{}", i), x, y, p_width, kind));
    }

    let num_obstacles = rng.random_range(2..=4);
    for i in 0..num_obstacles {
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        let (o_width, o_height) = kind.size();
        let host = &platforms[rng.random_range(0..platforms.len())];
        let slack = (host.width - o_width).max(1.0) as u32;
        let x = host.x + rng.random_range(0..slack) as f32;
        let y = host.y - o_height;
        obstacles.push(Obstacle {
            platform_id: Some(host.id.clone()),
            ..Obstacle::new(format!("obstacle-{}", i), x, y, kind)
        });
    }
}

/// Fixed or semi-random layouts for named presets
fn generate_preset<R: Rng + ?Sized>(
    h: f32,
    preset: ArenaPreset,
    platforms: &mut Vec<Platform>,
    obstacles: &mut Vec<Obstacle>,
    rng: &mut R,
) {
    use ObstacleKind::*;
    use PlatformKind::*;

    let plat = |id: &str, x: f32, above: f32, w: f32, kind| Platform::new(id, x, h - above, w, kind);
    let obs = |id: &str, x: f32, above: f32, kind| Obstacle::new(id, x, h - above, kind);

    match preset {
        ArenaPreset::Classic => {
            platforms.extend([
                plat("p1", 150.0, 220.0, 200.0, Mid),
                plat("p2", 650.0, 220.0, 200.0, Mid),
                plat("p3", 400.0, 340.0, 200.0, High),
            ]);
            obstacles.extend([obs("o1", 450.0, 120.0, Crate), obs("o2", 200.0, 280.0, Wall)]);
        }
        ArenaPreset::Vertical => {
            platforms.extend([
                plat("p1", 100.0, 160.0, 300.0, Low),
                plat("p2", 350.0, 260.0, 300.0, Mid),
                plat("p3", 100.0, 360.0, 300.0, High),
                plat("p4", 600.0, 210.0, 250.0, Mid),
            ]);
            obstacles.push(obs("o1", 500.0, 320.0, Pillar));
        }
        ArenaPreset::Symmetrical => {
            platforms.extend([
                plat("p1", 100.0, 200.0, 180.0, Mid),
                plat("p2", 720.0, 200.0, 180.0, Mid),
                plat("p3", 200.0, 320.0, 150.0, High),
                plat("p4", 650.0, 320.0, 150.0, High),
                plat("p5", 425.0, 400.0, 150.0, High),
            ]);
            obstacles.extend([obs("o1", 150.0, 120.0, Crate), obs("o2", 800.0, 120.0, Crate)]);
        }
        ArenaPreset::Chaotic => {
            for i in 0..6 {
                let kind = PlatformKind::ELEVATED[rng.random_range(0..PlatformKind::ELEVATED.len())];
                let x = rng.random_range(50..750) as f32;
                let above = (100 + rng.random_range(0..350)) as f32;
                let w = rng.random_range(120..220) as f32;
                platforms.push(plat(&format!("p{}", i), x, above, w, kind));
            }
            for i in 0..4 {
                let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
                let x = rng.random_range(50..950) as f32;
                let above = (100 + rng.random_range(0..300)) as f32;
                obstacles.push(obs(&format!("o{}", i), x, above, kind));
            }
        }
        ArenaPreset::Minimal => {
            platforms.extend([
                plat("p1", 200.0, 220.0, 250.0, Mid),
                plat("p2", 550.0, 220.0, 250.0, Mid),
            ]);
            obstacles.push(obs("o1", 450.0, 120.0, Crate));
        }
        ArenaPreset::Random => unreachable!("random layouts are generated separately"),
    }
}

/// Round-robin spawn points over the first few platforms
fn spawn_points_for(platforms: &[Platform], fighter_count: usize) -> Vec<SpawnPoint> {
    let used = platforms.len().min(MAX_SPAWN_PLATFORMS);
    if used == 0 {
        return Vec::new();
    }
    let per_platform = fighter_count.div_ceil(used);

    (0..fighter_count)
        .map(|i| {
            let platform = &platforms[i % used];
            let spacing = platform.width / (per_platform + 1) as f32;
            let local = i / used;
            SpawnPoint {
                pos: Vec2::new(
                    platform.x + spacing * (local + 1) as f32,
                    platform.stand_y(),
                ),
                platform_id: platform.id.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn layout(seed: u64, fighters: usize, preset: ArenaPreset) -> ArenaLayout {
        let mut rng = Pcg32::seed_from_u64(seed);
        generate_layout(ARENA_WIDTH, ARENA_HEIGHT, fighters, preset, &mut rng)
    }

    #[test]
    fn test_ground_always_present() {
        for preset in [
            ArenaPreset::Classic,
            ArenaPreset::Vertical,
            ArenaPreset::Symmetrical,
            ArenaPreset::Chaotic,
            ArenaPreset::Minimal,
            ArenaPreset::Random,
        ] {
            let arena = layout(1, 4, preset);
            let ground = &arena.platforms[0];
            assert_eq!(ground.kind, PlatformKind::Ground);
            assert_eq!(ground.width, ARENA_WIDTH);
            assert_eq!(ground.y, ARENA_HEIGHT - GROUND_OFFSET);
        }
    }

    #[test]
    fn test_random_layout_bounds() {
        for seed in 0..200 {
            let arena = layout(seed, 8, ArenaPreset::Random);
            assert!(
                (4..=7).contains(&arena.platforms.len()),
                "seed {} produced {} platforms",
                seed,
                arena.platforms.len()
            );
            assert!((2..=4).contains(&arena.obstacles.len()));

            for p in arena.platforms.iter().skip(1) {
                assert!(p.width >= 150.0 && p.width < 300.0);
                assert!(p.left() >= 50.0);
                assert!(p.right() <= ARENA_WIDTH);
            }

            for o in &arena.obstacles {
                let host_id = o.platform_id.as_ref().unwrap();
                let host = arena.platforms.iter().find(|p| &p.id == host_id).unwrap();
                assert!(o.x >= host.left(), "obstacle starts before its platform");
                assert!(o.x + o.width() <= host.right(), "obstacle overhangs its platform");
                assert_eq!(o.y + o.height(), host.y);
            }
        }
    }

    #[test]
    fn test_symmetrical_is_mirrored() {
        let arena = layout(9, 2, ArenaPreset::Symmetrical);
        let p1 = &arena.platforms[1];
        let p2 = &arena.platforms[2];
        assert_eq!(p1.y, p2.y);
        assert_eq!(p1.left(), ARENA_WIDTH - p2.right());
    }

    #[test]
    fn test_vertical_has_stacked_tiers() {
        let arena = layout(9, 2, ArenaPreset::Vertical);
        let ys: Vec<f32> = arena.platforms.iter().map(|p| p.y).collect();
        assert!(ys[1] > ys[2] && ys[2] > ys[3]);
    }

    #[test]
    fn test_spawn_points_one_per_fighter() {
        for n in [1, 2, 5, 8, 16] {
            let arena = layout(n as u64, n, ArenaPreset::Random);
            assert_eq!(arena.spawn_points.len(), n);
            for spawn in &arena.spawn_points {
                let host = arena
                    .platforms
                    .iter()
                    .find(|p| p.id == spawn.platform_id)
                    .unwrap();
                assert_eq!(spawn.pos.y, host.stand_y());
                assert!(spawn.pos.x >= host.left() && spawn.pos.x <= host.right());
                assert!(arena.platform_under(spawn.pos).is_some());
            }
        }
    }

    #[test]
    fn test_spawn_round_robin_over_four_platforms() {
        let platforms: Vec<Platform> = (0..6)
            .map(|i| Platform::new(format!("p{}", i), 0.0, 400.0 - i as f32 * 50.0, 300.0, PlatformKind::Mid))
            .collect();
        let spawns = spawn_points_for(&platforms, 8);
        let ids: Vec<&str> = spawns.iter().map(|s| s.platform_id.as_str()).collect();
        assert_eq!(ids, ["p0", "p1", "p2", "p3", "p0", "p1", "p2", "p3"]);
        // Two fighters per platform: spacing = 300 / 3
        assert_eq!(spawns[0].pos.x, 100.0);
        assert_eq!(spawns[4].pos.x, 200.0);
        assert_eq!(spawns[0].pos.y, 400.0 - FIGHTER_STAND_HEIGHT);
    }

    #[test]
    fn test_highest_and_nearest_platform() {
        let arena = layout(3, 2, ArenaPreset::Classic);
        let top = arena.highest_platform().unwrap();
        assert_eq!(arena.platforms[top].id, "p3");

        let near_p1 = Vec2::new(250.0, ARENA_HEIGHT - 220.0 - FIGHTER_STAND_HEIGHT - 5.0);
        let idx = arena.nearest_platform(near_p1).unwrap();
        assert_eq!(arena.platforms[idx].id, "p1");
    }

    #[test]
    fn test_obstacle_at() {
        let arena = layout(3, 2, ArenaPreset::Minimal);
        let crate_box = &arena.obstacles[0];
        let inside = Vec2::new(crate_box.x + 10.0, crate_box.y + 10.0);
        assert_eq!(arena.obstacle_at(inside).map(|o| o.id.as_str()), Some("o1"));
        assert!(arena.obstacle_at(Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_random_platform_position_stands_on_platform() {
        let arena = layout(4, 2, ArenaPreset::Chaotic);
        let mut rng = Pcg32::seed_from_u64(12);
        for _ in 0..50 {
            let (idx, pos) = arena.random_platform_position(&mut rng).unwrap();
            let p = &arena.platforms[idx];
            let (lo, hi) = p.walk_bounds();
            assert_eq!(pos.y, p.stand_y());
            assert!(pos.x >= lo && pos.x <= hi);
        }
        let empty = ArenaLayout {
            platforms: Vec::new(),
            obstacles: Vec::new(),
            spawn_points: Vec::new(),
            ..arena
        };
        assert!(empty.random_platform_position(&mut rng).is_none());
    }

    #[test]
    fn test_preset_parse_fallback() {
        assert_eq!("Vertical".parse::<ArenaPreset>(), Ok(ArenaPreset::Vertical));
        assert_eq!("lava".parse::<ArenaPreset>(), Ok(ArenaPreset::Random));
        for preset in [ArenaPreset::Classic, ArenaPreset::Symmetrical, ArenaPreset::Minimal] {
            assert_eq!(preset.as_str().parse::<ArenaPreset>(), Ok(preset));
        }
    }

    #[test]
    fn test_spawns_distinct_with_few_platforms() {
        // Minimal has the ground and two platforms
        let arena = layout(5, 8, ArenaPreset::Minimal);
        assert_eq!(arena.platforms.len(), 3);
        let spawns = &arena.spawn_points;
        assert_eq!(spawns.len(), 8);
        for (i, a) in spawns.iter().enumerate() {
            for b in &spawns[i + 1..] {
                assert_ne!(a.pos, b.pos);
            }
        }

        // Three per platform: spacing = width / 4
        let platforms: Vec<Platform> = (0..3)
            .map(|i| Platform::new(format!("p{}", i), 0.0, 400.0 - i as f32 * 50.0, 400.0, PlatformKind::Mid))
            .collect();
        let xs: Vec<f32> = spawn_points_for(&platforms, 8).iter().map(|s| s.pos.x).collect();
        assert_eq!(xs, [100.0, 100.0, 100.0, 200.0, 200.0, 200.0, 300.0, 300.0]);
    }

    #[test]
    fn test_platform_under_prefers_closest_tier() {
        // Mid (stand at 240) and a floating platform (stand at 230) overlap
        let arena = ArenaLayout {
            width: 1000.0,
            height: 500.0,
            platforms: vec![
                Platform::new("ground", 0.0, 440.0, 1000.0, PlatformKind::Ground),
                Platform::new("mid", 100.0, 340.0, 200.0, PlatformKind::Mid),
                Platform::new("floating", 250.0, 330.0, 200.0, PlatformKind::Floating),
            ],
            obstacles: vec![],
            spawn_points: vec![],
        };
        let on_floating = Vec2::new(280.0, 330.0 - FIGHTER_STAND_HEIGHT);
        assert_eq!(arena.platform_under(on_floating), Some(2));
        let on_mid = Vec2::new(280.0, 340.0 - FIGHTER_STAND_HEIGHT);
        assert_eq!(arena.platform_under(on_mid), Some(1));
        assert_eq!(arena.platform_under(Vec2::new(280.0, 340.0)), Some(0));
        assert_eq!(arena.platform_index("floating"), Some(2));
        assert_eq!(arena.platform_index("lava"), None);
    }
}
