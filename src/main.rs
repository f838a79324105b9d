//! Maze Chase headless runner
//!
//! Plays the embedded levels with a scripted bot, then replays the recorded
//! input and checks both runs end in the same state hash.

use std::collections::VecDeque;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use maze_chase::{
    Direction, EmbeddedLevels, GameEventData, InputFrame, ManualTimeSource, Session,
    SessionState, SimConfig, TilePos, World, FRAME_MS, TICK_RATE, VERSION,
    core::hash::short_hex,
    game::input::hash_input_script,
};

/// Give up after this many frames (five minutes of play).
const MAX_FRAMES: u32 = TICK_RATE * 300;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Maze Chase v{}", VERSION);

    let config = SimConfig::from_env().context("loading configuration")?;
    info!("Seed: {:#x}", config.seed);
    info!("Frame: {} ms ({} Hz)", FRAME_MS, TICK_RATE);

    let (first, frames) = play(&config)?;
    info!("Recorded {} frames, script {}", frames.len(), short_hex(&hash_input_script(&frames)));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let second = replay(&config, &frames)?;
    info!("Run hash:    {}", hex::encode(first));
    info!("Replay hash: {}", hex::encode(second));

    if first != second {
        bail!("replay diverged from the recorded run");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

fn new_session(config: &SimConfig) -> Result<Session<EmbeddedLevels, ManualTimeSource>> {
    Session::with_clock(EmbeddedLevels, config.clone(), ManualTimeSource::default())
        .context("starting session")
}

/// Play with the bot, recording every frame.
fn play(config: &SimConfig) -> Result<([u8; 32], Vec<InputFrame>)> {
    let mut session = new_session(config)?;
    let mut frames = Vec::new();

    for _ in 0..MAX_FRAMES {
        let pressed = match session.state() {
            SessionState::Playing => bot_press(session.world()),
            _ => None,
        };
        let frame = InputFrame::new(FRAME_MS, pressed);
        frames.push(frame);

        let result = session.advance(frame.delta_ms, frame.pressed)?;
        for event in &result.events {
            report(&event.data);
        }

        if matches!(session.state(), SessionState::Won | SessionState::GameOver) {
            break;
        }
    }

    match session.state() {
        SessionState::Won => info!("Won with {} points", session.score()),
        SessionState::GameOver => info!("Game over on level {} with {} points", session.level(), session.score()),
        state => warn!("Stopped after {} frames in {:?}", MAX_FRAMES, state),
    }

    Ok((session.world().compute_hash(), frames))
}

/// Feed recorded frames into a fresh session.
fn replay(config: &SimConfig, frames: &[InputFrame]) -> Result<[u8; 32]> {
    let mut session = new_session(config)?;
    for frame in frames {
        session.advance(frame.delta_ms, frame.pressed)?;
    }
    Ok(session.world().compute_hash())
}

fn report(data: &GameEventData) {
    match data {
        GameEventData::PursuerEaten { pursuer, variant, .. } => {
            info!("Ate pursuer {} ({:?})", pursuer, variant);
        }
        GameEventData::LifeLost { lives_left } => info!("Life lost, {} left", lives_left),
        GameEventData::LevelComplete { level, score } => info!("Level {} cleared at {}", level, score),
        _ => {}
    }
}

/// Head for the nearest item by breadth-first search over open tiles.
fn bot_press(world: &World) -> Option<Direction> {
    let start = world.player.tile();
    let width = world.grid.width() as i32;
    let height = world.grid.height() as i32;
    if width <= 0 || height <= 0 {
        return None;
    }

    let index = |t: TilePos| (t.row * width + t.col) as usize;
    let mut first_step: Vec<Option<Direction>> = vec![None; (width * height) as usize];
    let mut seen = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();

    if world.grid.is_obstacle(start.col, start.row) {
        return None;
    }
    seen[index(start)] = true;
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        if tile != start && world.items.iter().any(|i| i.active && i.position.tile() == tile) {
            return first_step[index(tile)];
        }
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let next = tile.offset(dx, dy);
            if world.grid.is_obstacle(next.col, next.row) || seen[index(next)] {
                continue;
            }
            seen[index(next)] = true;
            first_step[index(next)] = if tile == start { Some(dir) } else { first_step[index(tile)] };
            queue.push_back(next);
        }
    }
    None
}
