//! End-to-end play scenarios driven through the public API.

use maze_chase::core::fixed::tile_of;
use maze_chase::game::level::LevelData;
use maze_chase::game::state::{Bounds, GameProgress, PursuerVariant};
use maze_chase::game::tick::{replay_level, tick};
use maze_chase::{
    Direction, EmbeddedLevels, FixedVec2, GameEvent, GameEventData, GameHooks, InputFrame,
    LevelSource, Mode, Session, SimConfig, SoundCue, World,
};

const FRAME: i64 = 16;

fn has(events: &[GameEvent], wanted: &GameEventData) -> bool {
    events.iter().any(|e| &e.data == wanted)
}

fn world_from(text: &str, width: u32, height: u32) -> (World, SimConfig) {
    let config = SimConfig::default();
    let level = LevelData::parse_sized(text, width, height).unwrap();
    let world = World::new(&level, 1, GameProgress::new(config.starting_lives), &config);
    (world, config)
}

/// Every corner of the box sits on an open tile.
fn box_is_clear(world: &World, pos: FixedVec2, bounds: Bounds) -> bool {
    let xs = [tile_of(pos.x + bounds.x), tile_of(pos.x + bounds.x + bounds.w)];
    let ys = [tile_of(pos.y + bounds.y), tile_of(pos.y + bounds.y + bounds.h)];
    xs.iter().all(|&col| ys.iter().all(|&row| !world.grid.is_obstacle(col, row)))
}

// Player two tiles from a trigger, pink pursuer at the far end.
const LONG_CORRIDOR: &str = "2 1
XXXXXXXXX
X.QFQQQPX
XXXXXXXXX";

#[test]
fn frightened_pursuer_is_eaten_then_respawns_immune() {
    let (mut world, config) = world_from(LONG_CORRIDOR, 9, 3);
    tick(&mut world, 3000, None, &config);

    let mut events = Vec::new();
    let mut eaten_at = None;
    for t in 2..=40u32 {
        let result = tick(&mut world, FRAME, Some(Direction::Right), &config);
        if has(&result.events, &GameEventData::PursuerEaten { pursuer: 0, variant: PursuerVariant::Pink, points: 200 }) {
            eaten_at = Some(t);
        }
        events.extend(result.events);
        if eaten_at.is_some() {
            break;
        }
    }

    assert!(has(&events, &GameEventData::FrightenedStarted { rearmed: false }));
    assert_eq!(eaten_at, Some(37));
    assert_eq!(world.progress.score, 200);
    assert!(!world.pursuers[0].alive);
    assert_eq!(world.mode(), Mode::Frightened);

    // the eyes run home and wait out the countdown
    let mut respawned = false;
    for _ in 0..200 {
        let result = tick(&mut world, FRAME, None, &config);
        if has(&result.events, &GameEventData::PursuerRespawned { pursuer: 0, variant: PursuerVariant::Pink }) {
            respawned = true;
            break;
        }
    }
    assert!(respawned);
    let pursuer = &world.pursuers[0];
    assert!(pursuer.alive && pursuer.immune);
    assert_eq!(pursuer.position, pursuer.spawn);
    assert_eq!(world.mode(), Mode::Frightened);

    // the player is parked against the wall on the spawn tile; immunity means capture
    let result = tick(&mut world, FRAME, None, &config);
    assert!(has(&result.events, &GameEventData::PlayerCaptured { pursuer: 0, variant: PursuerVariant::Pink }));
    assert_eq!(world.mode(), Mode::Captured);
}

#[test]
fn second_trigger_rearms_without_flipping() {
    let text = "1 1
XXXXXXXXX
XQFFQQQPX
XXXXXXXXX";
    let (mut world, config) = world_from(text, 9, 3);
    tick(&mut world, 3000, None, &config);

    let mut rearm = None;
    for _ in 0..20 {
        let result = tick(&mut world, FRAME, Some(Direction::Right), &config);
        if has(&result.events, &GameEventData::FrightenedStarted { rearmed: true }) {
            rearm = Some(result.events);
            break;
        }
    }

    let events = rearm.expect("second trigger reached");
    // no second Approach -> Frightened change
    assert!(!events.iter().any(|e| matches!(e.data, GameEventData::ModeChanged { .. })));
    assert_eq!(world.modes.interlude_remaining_ms(), 5000);
    // turned right on the first trigger, back left at the corridor end, and not flipped again
    assert_eq!(world.pursuers[0].facing, Direction::Left);
}

// As LONG_CORRIDOR, with a second trigger behind the player.
const TWO_TRIGGERS: &str = "2 1
XXXXXXXXX
XFQFQQQPX
XXXXXXXXX";

#[test]
fn fresh_frightened_clears_respawn_immunity() {
    let (mut world, config) = world_from(TWO_TRIGGERS, 9, 3);
    tick(&mut world, 3000, None, &config);

    for _ in 2..=37 {
        tick(&mut world, FRAME, Some(Direction::Right), &config);
    }
    assert!(!world.pursuers[0].alive);

    // eyes travel home while the player parks against the east wall
    let mut home = false;
    for _ in 0..150 {
        tick(&mut world, FRAME, None, &config);
        let p = &world.pursuers[0];
        if !p.alive && p.position == p.spawn {
            home = true;
            break;
        }
    }
    assert!(home);
    assert_eq!(world.mode(), Mode::Frightened);

    // step off the spawn tile before the pursuer comes back
    for _ in 0..10 {
        tick(&mut world, FRAME, Some(Direction::Left), &config);
    }
    assert!(!world.pursuers[0].alive);

    let result = tick(&mut world, 1000, None, &config);
    assert!(has(&result.events, &GameEventData::PursuerRespawned { pursuer: 0, variant: PursuerVariant::Pink }));
    assert!(world.pursuers[0].immune);
    assert_eq!(world.mode(), Mode::Frightened);

    // a long frame runs Frightened out; exit turns the living pursuer around
    let before_exit = world.pursuers[0].facing;
    let result = tick(&mut world, 5000, None, &config);
    assert!(has(&result.events, &GameEventData::FrightenedEnded));
    assert_eq!(world.mode(), Mode::Approach);
    assert_eq!(world.pursuers[0].facing, before_exit.opposite());
    assert!(world.pursuers[0].immune);

    let mut fresh = None;
    for _ in 0..60 {
        let facing = world.pursuers[0].facing;
        let result = tick(&mut world, FRAME, Some(Direction::Left), &config);
        if has(&result.events, &GameEventData::FrightenedStarted { rearmed: false }) {
            fresh = Some((facing, result.events));
            break;
        }
    }

    let (facing_before, events) = fresh.expect("second trigger reached");
    let entries = events
        .iter()
        .filter(|e| e.data == GameEventData::ModeChanged { old_mode: Mode::Approach, new_mode: Mode::Frightened })
        .count();
    assert_eq!(entries, 1);
    assert!(!world.pursuers[0].immune);
    assert!(world.pursuers[0].alive);
    assert_eq!(world.pursuers[0].facing, facing_before.opposite());
}

#[test]
fn movers_never_enter_walls() {
    let config = SimConfig::default();
    let presses = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    for number in 1..=EmbeddedLevels.level_count() {
        let level = EmbeddedLevels.level(number).unwrap();
        let mut world = World::new(&level, number, GameProgress::new(99), &config);

        for t in 0..3000u32 {
            let pressed = if t % 45 == 0 { Some(presses[(t / 45) as usize % 4]) } else { None };
            let result = tick(&mut world, FRAME, pressed, &config);
            if result.level_complete || result.game_over {
                break;
            }
            if world.mode() == Mode::Captured {
                continue;
            }

            assert!(box_is_clear(&world, world.player.position, Bounds::PLAYER),
                "level {} tick {}: player in a wall at {}", number, t, world.player.position);
            for p in &world.pursuers {
                assert!(box_is_clear(&world, p.position, Bounds::PURSUER),
                    "level {} tick {}: pursuer {} in a wall at {}", number, t, p.id, p.position);
            }
        }
    }
}

#[test]
fn identical_scripts_replay_identically() {
    let config = SimConfig::default();
    let level = EmbeddedLevels.level(2).unwrap();
    let frames: Vec<InputFrame> = (0..2400u32)
        .map(|t| {
            let pressed = match t % 120 {
                0 => Some(Direction::Left),
                30 => Some(Direction::Up),
                60 => Some(Direction::Right),
                90 => Some(Direction::Down),
                _ => None,
            };
            // uneven frame pacing, including a stalled frame
            InputFrame::new(if t % 50 == 7 { 0 } else { FRAME + (t % 4) as i64 }, pressed)
        })
        .collect();

    let (a, events_a) = replay_level(&level, 2, GameProgress::new(3), &frames, &config);
    let (b, events_b) = replay_level(&level, 2, GameProgress::new(3), &frames, &config);
    assert_eq!(a.compute_hash(), b.compute_hash());
    assert_eq!(events_a, events_b);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[derive(Default)]
struct Recorder {
    sounds: Vec<SoundCue>,
    completed: Vec<u32>,
}

impl GameHooks for Recorder {
    fn on_level_complete(&mut self, level: u32, _score: u32) {
        self.completed.push(level);
    }

    fn on_sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }
}

#[test]
fn session_hooks_hear_music_and_completion() {
    let levels = maze_chase::TextLevels::sized(
        vec!["1 1\nXXXX\nX..X\nXXXX".to_string(); 2],
        4,
        3,
    );
    let mut session = Session::new(levels, SimConfig::default()).unwrap();
    let mut hooks = Recorder::default();

    session.advance(3000, None).unwrap().dispatch(&mut hooks);
    for _ in 0..10 {
        session.advance(FRAME, Some(Direction::Right)).unwrap().dispatch(&mut hooks);
    }
    session.advance(1500, None).unwrap().dispatch(&mut hooks);

    assert_eq!(hooks.completed, vec![1]);
    assert_eq!(hooks.sounds, vec![SoundCue::LevelMusic { level: 1 }, SoundCue::LevelMusic { level: 2 }]);
    assert_eq!(session.level(), 2);
}
