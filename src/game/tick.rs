//! Authoritative Simulation Tick
//!
//! The per-frame game loop. Given the same level, seed, deltas and key presses
//! it produces the same world, bit for bit.
//!
//! Tick order:
//!
//! 1. latch this frame's key press (skipped once the world is frozen)
//! 2. count down the mode timers and apply any transition
//! 3. Captured: step the capture animation; Begin: nothing moves
//! 4. active play: player, then pursuers in spawn order
//! 5. compact consumed items

use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::clock::clamp_delta;
use crate::core::fixed::{
    Fixed, TILE_SIZE,
    PLAYER_SPEED, APPROACH_SPEED, RETREAT_SPEED, FRIGHTENED_SPEED, DEAD_SPEED,
};
use crate::core::vec2::FixedVec2;
use crate::game::collision::{player_hit, pursuer_hits_player, PlayerHit};
use crate::game::events::{dispatch_event, GameEvent, GameEventData, GameHooks, SoundCue};
use crate::game::input::InputFrame;
use crate::game::level::LevelData;
use crate::game::mode::{Mode, ModeTimings, ModeTransition, Phase};
use crate::game::movement::{step, steer_player};
use crate::game::pursuit::{choose_direction, open_directions, random_tile, target_tile, TargetContext};
use crate::game::state::{Bounds, CaptureSequence, Direction, GameProgress, ItemKind, World};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "MAZE_CHASE_CONFIG";

/// Environment variable overriding the seed (decimal or `0x` hex).
pub const SEED_ENV: &str = "MAZE_CHASE_SEED";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Mover speeds in Q16.16 pixels per tick. Each must divide the tile size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    /// Player
    pub player: Fixed,
    /// Pursuer during Approach
    pub approach: Fixed,
    /// Pursuer during Retreat
    pub retreat: Fixed,
    /// Pursuer during Frightened
    pub frightened: Fixed,
    /// Eaten pursuer heading home
    pub dead: Fixed,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            player: PLAYER_SPEED,
            approach: APPROACH_SPEED,
            retreat: RETREAT_SPEED,
            frightened: FRIGHTENED_SPEED,
            dead: DEAD_SPEED,
        }
    }
}

impl SpeedTable {
    fn entries(&self) -> [(&'static str, Fixed); 5] {
        [
            ("player", self.player),
            ("approach", self.approach),
            ("retreat", self.retreat),
            ("frightened", self.frightened),
            ("dead", self.dead),
        ]
    }
}

/// Points per item category and per eaten pursuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    /// Ordinary item
    pub ordinary: u32,
    /// Bonus A
    pub bonus_a: u32,
    /// Bonus B
    pub bonus_b: u32,
    /// Bonus C
    pub bonus_c: u32,
    /// Frightened trigger
    pub mode_trigger: u32,
    /// Eating a frightened pursuer
    pub pursuer_eaten: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            ordinary: ItemKind::Ordinary.default_score(),
            bonus_a: ItemKind::BonusA.default_score(),
            bonus_b: ItemKind::BonusB.default_score(),
            bonus_c: ItemKind::BonusC.default_score(),
            mode_trigger: ItemKind::ModeTrigger.default_score(),
            pursuer_eaten: 200,
        }
    }
}

impl ScoreTable {
    /// Points for consuming an item.
    pub fn value(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Ordinary => self.ordinary,
            ItemKind::BonusA => self.bonus_a,
            ItemKind::BonusB => self.bonus_b,
            ItemKind::BonusC => self.bonus_c,
            ItemKind::ModeTrigger => self.mode_trigger,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`SimConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Seed override is not a number.
    #[error("invalid seed {0:?}")]
    InvalidSeed(String),

    /// A speed is non-positive or does not divide the tile size.
    #[error("{name} speed {value} must be positive and divide the tile size")]
    InvalidSpeed {
        /// Which speed
        name: &'static str,
        /// Raw Q16.16 value
        value: Fixed,
    },

    /// A game must start with at least one life.
    #[error("starting lives must be at least 1")]
    NoLives,
}

/// Configuration for the simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Mode durations
    pub timings: ModeTimings,
    /// Mover speeds
    pub speeds: SpeedTable,
    /// Point values
    pub scores: ScoreTable,
    /// Lives at the start of a game
    pub starting_lives: u32,
    /// Session seed; each level derives its own RNG stream from it
    pub seed: u64,
    /// Pause between clearing a level and loading the next
    pub level_transition_ms: i64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timings: ModeTimings::default(),
            speeds: SpeedTable::default(),
            scores: ScoreTable::default(),
            starting_lives: 3,
            seed: 0x4D41_5A45,
            level_transition_ms: 1500,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse from JSON text and validate.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by `MAZE_CHASE_CONFIG`, with the seed
    /// optionally replaced by `MAZE_CHASE_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(seed) = std::env::var(SEED_ENV) {
            config.seed = parse_seed(&seed)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.speeds.entries() {
            if value <= 0 || TILE_SIZE % value != 0 {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        Ok(())
    }
}

/// Parse a seed written in decimal or as `0x`-prefixed hex.
pub fn parse_seed(text: &str) -> Result<u64, ConfigError> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| ConfigError::InvalidSeed(text.to_string()))
}

// =============================================================================
// TICK
// =============================================================================

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in order
    pub events: Vec<GameEvent>,
    /// The level is cleared (this tick or earlier)
    pub level_complete: bool,
    /// The game is lost (this tick or earlier)
    pub game_over: bool,
}

impl TickResult {
    /// Feed every event to the hooks in emission order.
    pub fn dispatch<H: GameHooks + ?Sized>(&self, hooks: &mut H) {
        for event in &self.events {
            dispatch_event(event, hooks);
        }
    }
}

/// Run one simulation tick.
///
/// `delta_ms` is the elapsed frame time; negative values count as zero.
/// `pressed` is the direction newly pressed this frame, if any.
///
/// Once the level is complete or the game is over the world is frozen and
/// every further call returns an empty result.
pub fn tick(
    world: &mut World,
    delta_ms: i64,
    pressed: Option<Direction>,
    config: &SimConfig,
) -> TickResult {
    if world.level_complete || world.game_over {
        return finish(world);
    }

    world.input.press(pressed);

    world.tick += 1;
    let delta = clamp_delta(delta_ms);

    // 1. Mode timers
    if let Some(transition) = world.modes.advance(delta) {
        apply_transition(world, transition);
    }

    let mode = world.mode();
    if mode.is_active_play() {
        // 4. Movers
        count_down_respawns(world, delta);
        update_player(world, config);
        update_pursuers(world, config);
    } else if mode == Mode::Captured {
        // 3. Eater closes in on the player; Begin leaves everything still
        animate_capture(world);
    }

    // 5. Compact consumed items
    world.sweep();

    finish(world)
}

fn finish(world: &mut World) -> TickResult {
    TickResult {
        events: world.take_events(),
        level_complete: world.level_complete,
        game_over: world.game_over,
    }
}

/// Side effects of a timer expiry.
fn apply_transition(world: &mut World, transition: ModeTransition) {
    let tick = world.tick;
    match transition {
        ModeTransition::BeginEnded { resumed } => {
            debug!(level = world.progress.level, phase = ?resumed, "begin ended");
            world.push_event(GameEvent::mode_changed(tick, Mode::Begin, resumed.as_mode()));
        }
        ModeTransition::PhaseSwitched { to } => {
            world.flip_all();
            debug!(level = world.progress.level, phase = ?to, "phase switched");
            world.push_event(GameEvent::mode_changed(tick, to.other().as_mode(), to.as_mode()));
        }
        ModeTransition::FrightenedEnded { resumed } => {
            world.flip_living();
            debug!(phase = ?resumed, "frightened ended");
            world.push_event(GameEvent::new(tick, GameEventData::FrightenedEnded));
            world.push_event(GameEvent::mode_changed(tick, Mode::Frightened, resumed.as_mode()));
        }
        ModeTransition::CaptureEnded => finish_capture(world),
    }
}

/// Capture animation done: take a life, then reset or end the game.
fn finish_capture(world: &mut World) {
    let tick = world.tick;
    world.progress.lives = world.progress.lives.saturating_sub(1);
    let lives_left = world.progress.lives;
    info!(lives_left, score = world.progress.score, "life lost");
    world.push_event(GameEvent::new(tick, GameEventData::LifeLost { lives_left }));

    if lives_left == 0 {
        world.game_over = true;
        world.capture = None;
        info!(score = world.progress.score, level = world.progress.level, "game over");
        world.push_event(GameEvent::new(tick, GameEventData::GameOver { score: world.progress.score }));
        world.push_event(GameEvent::sound(tick, SoundCue::GameOver));
        return;
    }

    world.reset_movers();
    world.push_event(GameEvent::mode_changed(tick, Mode::Captured, Mode::Begin));
}

/// Each step moves the eater `1 / (5 - step)` of the remaining way to the player.
fn animate_capture(world: &mut World) {
    let Some(mut capture) = world.capture else {
        return;
    };

    let every = world.modes.timings().capture_step_ticks.max(1);
    if capture.ticks % every == 0 {
        let target = world.player.position;
        if let Some(eater) = world.pursuers.get_mut(capture.eater) {
            let divisor = 5 - capture.step as i32;
            eater.position = eater.position + (target - eater.position).div_int(divisor);
        }
        capture.step = (capture.step + 1) % 5;
    }
    capture.ticks += 1;
    world.capture = Some(capture);
}

fn count_down_respawns(world: &mut World, delta: i64) {
    for pursuer in world.pursuers.iter_mut().filter(|p| !p.alive) {
        pursuer.respawn_ms = (pursuer.respawn_ms - delta).max(0);
    }
}

// =============================================================================
// PLAYER
// =============================================================================

fn update_player(world: &mut World, config: &SimConfig) {
    let speed = config.speeds.player;
    let Some(dir) = steer_player(
        &world.grid,
        world.player.position,
        world.player.facing,
        world.input.intent(),
        speed,
    ) else {
        return;
    };
    world.player.facing = dir;

    let probe = world.player.position + dir.velocity(speed);
    match player_hit(world, probe) {
        None => {}
        Some(PlayerHit::Item(index)) => consume_item(world, index, config),
        Some(PlayerHit::Pursuer(index)) => {
            if world.modes.is_frightened() && !world.pursuers[index].immune {
                eat_pursuer(world, index, config);
            } else {
                begin_capture(world, index);
                return;
            }
        }
    }

    world.player.position = step(&world.grid, world.player.position, Bounds::PLAYER, dir, speed);
}

fn consume_item(world: &mut World, index: usize, config: &SimConfig) {
    let tick = world.tick;
    let item = &mut world.items[index];
    item.active = false;
    let (item_id, kind) = (item.id, item.kind);

    let points = config.scores.value(kind);
    world.progress.add_score(points);
    let cleared = kind == ItemKind::Ordinary && world.progress.consume_ordinary();
    world.push_event(GameEvent::item_consumed(
        tick,
        item_id,
        kind,
        points,
        world.progress.score,
        world.progress.remaining,
    ));

    if kind == ItemKind::ModeTrigger {
        start_frightened(world);
    }

    if cleared {
        world.level_complete = true;
        info!(level = world.progress.level, score = world.progress.score, "level complete");
        world.push_event(GameEvent::new(
            tick,
            GameEventData::LevelComplete { level: world.progress.level, score: world.progress.score },
        ));
    }
}

/// Fresh entry flips living pursuers; a re-arm only restarts the timer.
/// Either way every pursuer becomes edible again.
fn start_frightened(world: &mut World) {
    let tick = world.tick;
    let old_mode = world.mode();
    let fresh = world.modes.enter_frightened();

    for pursuer in &mut world.pursuers {
        pursuer.immune = false;
    }

    if fresh {
        world.flip_living();
        world.push_event(GameEvent::mode_changed(tick, old_mode, Mode::Frightened));
    }
    debug!(rearmed = !fresh, "frightened");
    world.push_event(GameEvent::new(tick, GameEventData::FrightenedStarted { rearmed: !fresh }));
}

fn eat_pursuer(world: &mut World, index: usize, config: &SimConfig) {
    let tick = world.tick;
    let pursuer = &mut world.pursuers[index];
    pursuer.kill(config.timings.respawn_ms);
    let (id, variant) = (pursuer.id, pursuer.variant);

    let points = config.scores.pursuer_eaten;
    world.progress.add_score(points);
    debug!(pursuer = id, ?variant, "pursuer eaten");
    world.push_event(GameEvent::new(tick, GameEventData::PursuerEaten { pursuer: id, variant, points }));
    world.push_event(GameEvent::sound(tick, SoundCue::PursuerEaten));
}

fn begin_capture(world: &mut World, index: usize) {
    let tick = world.tick;
    let old_mode = world.mode();
    world.modes.enter_captured();
    world.capture = Some(CaptureSequence { eater: index, ticks: 0, step: 0 });

    let pursuer = &world.pursuers[index];
    let (id, variant) = (pursuer.id, pursuer.variant);
    info!(pursuer = id, ?variant, lives = world.progress.lives, "player captured");
    world.push_event(GameEvent::new(tick, GameEventData::PlayerCaptured { pursuer: id, variant }));
    world.push_event(GameEvent::sound(tick, SoundCue::PlayerCaught));
    world.push_event(GameEvent::mode_changed(tick, old_mode, Mode::Captured));
}

// =============================================================================
// PURSUERS
// =============================================================================

/// Pursuers move in spawn order. At most one capture resolves per tick; the
/// rest stand still once it happens.
fn update_pursuers(world: &mut World, config: &SimConfig) {
    for index in 0..world.pursuers.len() {
        if world.mode() == Mode::Captured || world.level_complete {
            break;
        }
        update_pursuer(world, index, config);
    }
}

fn update_pursuer(world: &mut World, index: usize, config: &SimConfig) {
    let heading = if world.pursuers[index].position.is_grid_aligned() {
        match plan_at_tile(world, index, config) {
            Some(dir) => dir,
            None => {
                world.pursuers[index].velocity = FixedVec2::ZERO;
                return;
            }
        }
    } else {
        world.pursuers[index].facing
    };

    let pursuer = &mut world.pursuers[index];
    let speed = pursuer.speed;
    pursuer.velocity = heading.velocity(speed);
    let probe = pursuer.position + pursuer.velocity;
    let alive = pursuer.alive;

    if alive && pursuer_hits_player(world, probe) {
        if world.modes.is_frightened() && !world.pursuers[index].immune {
            eat_pursuer(world, index, config);
        } else {
            begin_capture(world, index);
        }
        return;
    }

    let pursuer = &mut world.pursuers[index];
    pursuer.position = step(&world.grid, pursuer.position, Bounds::PURSUER, heading, speed);
    pursuer.facing = heading;
}

/// Decision at a grid-aligned position: speed, target and heading.
///
/// Returns `None` when the pursuer does not move this tick (nothing open, or
/// eaten and waiting at home).
fn plan_at_tile(world: &mut World, index: usize, config: &SimConfig) -> Option<Direction> {
    let pursuer = &world.pursuers[index];
    let (alive, at_home, variant, facing) = (
        pursuer.alive,
        pursuer.position == pursuer.spawn,
        pursuer.variant,
        pursuer.facing,
    );
    let home = pursuer.spawn.tile();

    if !alive && at_home {
        if world.pursuers[index].can_revive() {
            revive_pursuer(world, index);
        }
        return None;
    }

    let ctx = TargetContext {
        phase: world.modes.phase(),
        own_tile: world.pursuers[index].tile(),
        player_tile: world.player.tile(),
        player_facing: world.player.facing,
        pink_tile: world.pink_tile(),
        width: world.grid.width() as i32,
        height: world.grid.height() as i32,
    };

    let (speed, target) = if !alive {
        (config.speeds.dead, home)
    } else if world.modes.is_frightened() {
        (config.speeds.frightened, random_tile(&ctx, &mut world.rng))
    } else {
        let speed = match ctx.phase {
            Phase::Approach => config.speeds.approach,
            Phase::Retreat => config.speeds.retreat,
        };
        (speed, target_tile(variant, &ctx, &mut world.rng))
    };

    let open = open_directions(&world.grid, ctx.own_tile, facing);
    let choice = choose_direction(&open, ctx.own_tile, target);

    #[cfg(feature = "debug-tracing")]
    trace!(pursuer = index, tile = %ctx.own_tile, target = %target, ?choice, "pursuer decision");

    let pursuer = &mut world.pursuers[index];
    pursuer.speed = speed;
    pursuer.target = target;
    pursuer.open = open;
    choice
}

fn revive_pursuer(world: &mut World, index: usize) {
    let tick = world.tick;
    let pursuer = &mut world.pursuers[index];
    pursuer.revive();
    pursuer.velocity = FixedVec2::ZERO;
    let (id, variant) = (pursuer.id, pursuer.variant);
    debug!(pursuer = id, ?variant, "pursuer respawned");
    world.push_event(GameEvent::new(tick, GameEventData::PursuerRespawned { pursuer: id, variant }));
}

// =============================================================================
// REPLAY
// =============================================================================

/// Play one level from recorded frames.
///
/// Stops early once the level is cleared or the game is lost. Returns the
/// final world and every event in order.
pub fn replay_level(
    level_data: &LevelData,
    level: u32,
    progress: GameProgress,
    frames: &[InputFrame],
    config: &SimConfig,
) -> (World, Vec<GameEvent>) {
    let mut world = World::new(level_data, level, progress, config);
    let mut all_events = Vec::new();

    for frame in frames {
        let result = tick(&mut world, frame.delta_ms, frame.pressed, config);
        all_events.extend(result.events);
        if result.level_complete || result.game_over {
            break;
        }
    }

    (world, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::{EmbeddedLevels, LevelSource};
    use crate::game::state::PursuerVariant;

    const FRAME: i64 = 16;

    fn world_from(text: &str, width: u32, height: u32, config: &SimConfig) -> World {
        let level = LevelData::parse_sized(text, width, height).unwrap();
        World::new(&level, 1, GameProgress::new(config.starting_lives), config)
    }

    fn px(x: i32, y: i32) -> FixedVec2 {
        FixedVec2::from_ints(x, y)
    }

    fn has(events: &[GameEvent], wanted: &GameEventData) -> bool {
        events.iter().any(|e| &e.data == wanted)
    }

    // Four ordinary items in a dead-end corridor, no pursuers.
    const CORRIDOR: &str = "1 1
XXXXXXX
X.....X
XXXXXXX";

    // Lone pink pursuer at the far end of an empty corridor.
    const CHASE: &str = "1 1
XXXXXXX
XQQQQPX
XXXXXXX";

    #[test]
    fn test_begin_freezes_movers() {
        let config = SimConfig::default();
        let mut world = world_from(CORRIDOR, 7, 3, &config);

        for _ in 0..10 {
            tick(&mut world, FRAME, Some(Direction::Right), &config);
        }
        assert_eq!(world.mode(), Mode::Begin);
        assert_eq!(world.player.position, px(40, 40));

        // negative deltas never rewind the intro
        tick(&mut world, -500, None, &config);
        assert_eq!(world.modes.interlude_remaining_ms(), 3000 - 10 * FRAME);
    }

    #[test]
    fn test_clearing_corridor_completes_level() {
        let config = SimConfig::default();
        let mut world = world_from(CORRIDOR, 7, 3, &config);
        assert_eq!(world.progress.remaining, 4);

        let result = tick(&mut world, 3000, None, &config);
        assert!(has(&result.events, &GameEventData::ModeChanged {
            old_mode: Mode::Begin,
            new_mode: Mode::Approach,
        }));

        let mut events = Vec::new();
        for _ in 0..60 {
            let result = tick(&mut world, FRAME, Some(Direction::Right), &config);
            events.extend(result.events);
            if result.level_complete {
                break;
            }
        }

        assert!(world.level_complete);
        assert_eq!(world.progress.score, 4);
        assert_eq!(world.progress.remaining, 0);
        assert!(world.items.is_empty());
        assert!(has(&events, &GameEventData::LevelComplete { level: 1, score: 4 }));

        // first item reached on the sixth step: 40 + 6 * 4 = 64
        let first = events.iter().find(|e| matches!(e.data, GameEventData::ItemConsumed { .. })).unwrap();
        assert_eq!(first.tick, 7);

        // frozen afterwards
        let hash = world.compute_hash();
        let result = tick(&mut world, FRAME, Some(Direction::Left), &config);
        assert!(result.events.is_empty());
        assert!(result.level_complete);
        assert_eq!(world.compute_hash(), hash);
    }

    #[test]
    fn test_player_stops_flush_at_wall() {
        let config = SimConfig::default();
        let mut world = world_from(CHASE, 7, 3, &config);
        tick(&mut world, 3000, None, &config);
        for _ in 0..5 {
            tick(&mut world, FRAME, Some(Direction::Left), &config);
        }
        assert_eq!(world.player.position, px(40, 40));
        assert_eq!(world.player.facing, Direction::Left);
    }

    #[test]
    fn test_pursuer_catches_idle_player() {
        let config = SimConfig::default();
        let mut world = world_from(CHASE, 7, 3, &config);

        // BeginEnded tick moves the pursuer once: 200 -> 197.5
        tick(&mut world, 3000, None, &config);
        let mut captured_at = None;
        for t in 1..=60u32 {
            let result = tick(&mut world, FRAME, None, &config);
            if has(&result.events, &GameEventData::PlayerCaptured { pursuer: 0, variant: PursuerVariant::Pink }) {
                assert!(has(&result.events, &GameEventData::Sound(SoundCue::PlayerCaught)));
                captured_at = Some(t);
                break;
            }
        }

        // pursuer probe 200 - 2.5 * 51 = 72.5 first overlaps the player box
        assert_eq!(captured_at, Some(50));
        assert_eq!(world.mode(), Mode::Captured);
        assert_eq!(world.pursuers[0].position, px(75, 40));
        assert_eq!(world.progress.lives, 3);

        // first animation step covers a fifth of the gap
        tick(&mut world, FRAME, None, &config);
        assert_eq!(world.pursuers[0].position, px(68, 40));
        let capture = world.capture.unwrap();
        assert_eq!((capture.ticks, capture.step), (1, 1));

        // no movement for the player during the animation
        tick(&mut world, FRAME, Some(Direction::Right), &config);
        assert_eq!(world.player.position, px(40, 40));

        let result = tick(&mut world, 1500, None, &config);
        assert!(has(&result.events, &GameEventData::LifeLost { lives_left: 2 }));
        assert_eq!(world.mode(), Mode::Begin);
        assert_eq!(world.modes.interlude_remaining_ms(), 1000);
        assert_eq!(world.pursuers[0].position, px(200, 40));
        assert_eq!(world.input.intent(), None);
        assert!(world.capture.is_none());
    }

    #[test]
    fn test_last_life_ends_game() {
        let config = SimConfig { starting_lives: 1, ..SimConfig::default() };
        let mut world = world_from(CHASE, 7, 3, &config);

        tick(&mut world, 3000, None, &config);
        for _ in 0..60 {
            tick(&mut world, FRAME, None, &config);
            if world.mode() == Mode::Captured {
                break;
            }
        }
        let result = tick(&mut world, 1500, None, &config);
        assert!(result.game_over);
        assert!(has(&result.events, &GameEventData::GameOver { score: 0 }));
        assert!(has(&result.events, &GameEventData::Sound(SoundCue::GameOver)));
        assert_eq!(world.progress.lives, 0);

        let result = tick(&mut world, 5000, Some(Direction::Right), &config);
        assert!(result.game_over && result.events.is_empty());
    }

    #[test]
    fn test_phase_switch_flips_pursuers() {
        let config = SimConfig::default();
        let mut world = world_from(CHASE, 7, 3, &config);
        tick(&mut world, 3000, None, &config);
        assert_eq!(world.pursuers[0].facing, Direction::Left);

        let result = tick(&mut world, 10_000, None, &config);
        assert!(has(&result.events, &GameEventData::ModeChanged {
            old_mode: Mode::Approach,
            new_mode: Mode::Retreat,
        }));
        assert_eq!(world.mode(), Mode::Retreat);
        // mid-tile, so it keeps the flipped facing and walks back
        assert_eq!(world.pursuers[0].facing, Direction::Right);
        assert_eq!(world.pursuers[0].position, px(200, 40));
    }

    #[test]
    fn test_mode_trigger_frightens() {
        let config = SimConfig::default();
        let text = "1 1
XXXXXXXX
XQF...PX
XXXXXXXX";
        let mut world = world_from(text, 8, 3, &config);
        tick(&mut world, 3000, None, &config);
        assert_eq!(world.pursuers[0].facing, Direction::Left);

        let mut events = Vec::new();
        for _ in 0..6 {
            events.extend(tick(&mut world, FRAME, Some(Direction::Right), &config).events);
        }

        assert_eq!(world.mode(), Mode::Frightened);
        assert!(has(&events, &GameEventData::FrightenedStarted { rearmed: false }));
        assert!(has(&events, &GameEventData::ModeChanged {
            old_mode: Mode::Approach,
            new_mode: Mode::Frightened,
        }));
        assert_eq!(world.pursuers[0].facing, Direction::Right);
        // trigger is worth nothing
        assert_eq!(world.progress.score, 0);

        let result = tick(&mut world, 5000, None, &config);
        assert!(has(&result.events, &GameEventData::FrightenedEnded));
        assert_eq!(world.mode(), Mode::Approach);
        // exit turns it back; mid-tile, so it keeps walking that way
        assert_eq!(world.pursuers[0].facing, Direction::Left);
        assert_eq!(world.pursuers[0].position, FixedVec2::new(225 << 16, 40 << 16));
    }

    #[test]
    fn test_tick_determinism() {
        let config = SimConfig::default();
        let level = EmbeddedLevels.level(1).unwrap();
        let frames: Vec<InputFrame> = (0..900u32)
            .map(|t| {
                let pressed = match t % 97 {
                    0 => Some(Direction::Right),
                    31 => Some(Direction::Down),
                    55 => Some(Direction::Left),
                    80 => Some(Direction::Up),
                    _ => None,
                };
                InputFrame::new(FRAME + (t % 3) as i64, pressed)
            })
            .collect();

        let (world1, events1) = replay_level(&level, 1, GameProgress::new(3), &frames, &config);
        let (world2, events2) = replay_level(&level, 1, GameProgress::new(3), &frames, &config);

        assert_eq!(world1.tick, world2.tick);
        assert_eq!(world1.compute_hash(), world2.compute_hash());
        assert_eq!(events1, events2);

        let other = SimConfig { seed: config.seed + 1, ..config.clone() };
        let (world3, _) = replay_level(&level, 1, GameProgress::new(3), &frames, &other);
        assert_ne!(world1.compute_hash(), world3.compute_hash());
    }

    #[test]
    fn test_dispatch_reaches_hooks() {
        #[derive(Default)]
        struct Counter {
            lives: Vec<u32>,
            sounds: usize,
        }
        impl GameHooks for Counter {
            fn on_life_lost(&mut self, lives_left: u32) {
                self.lives.push(lives_left);
            }
            fn on_sound(&mut self, _cue: SoundCue) {
                self.sounds += 1;
            }
        }

        let result = TickResult {
            events: vec![
                GameEvent::new(1, GameEventData::LifeLost { lives_left: 1 }),
                GameEvent::sound(1, SoundCue::PlayerCaught),
                GameEvent::new(1, GameEventData::FrightenedEnded),
            ],
            ..TickResult::default()
        };
        let mut counter = Counter::default();
        result.dispatch(&mut counter);
        assert_eq!(counter.lives, vec![1]);
        assert_eq!(counter.sounds, 1);
    }

    #[test]
    fn test_config_partial_json() {
        let config = SimConfig::from_json(r#"{ "seed": 7, "starting_lives": 5, "timings": { "frightened_ms": 8000 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.timings.frightened_ms, 8000);
        assert_eq!(config.timings.captured_ms, 1500);
        assert_eq!(config.speeds, SpeedTable::default());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        // 3 px per tick never lands on a 40 px boundary
        let err = SimConfig::from_json(r#"{ "speeds": { "player": 196608 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSpeed { name: "player", .. }));

        let err = SimConfig::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoLives));

        assert!(matches!(SimConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
        assert!(matches!(SimConfig::load("/nonexistent/maze.json"), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_parse_seed_forms() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 0xff ").unwrap(), 255);
        assert!(matches!(parse_seed("seed"), Err(ConfigError::InvalidSeed(_))));
    }
}
