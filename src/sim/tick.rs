//! Fixed timestep simulation tick
//!
//! Core game loop that advances a level deterministically.

use super::actor::Direction;
use super::enemy::{Bullet, EnemyCommand};
use super::interaction;
use super::physics::BodyRole;
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::level::{self, BUILTIN_LEVEL_COUNT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Run left (held)
    pub left: bool,
    /// Run right (held)
    pub right: bool,
    /// Jump (held)
    pub jump: bool,
    /// Sword swing
    pub attack: bool,
    /// Pause toggle
    pub pause: bool,
    /// Wall clock for the level timer
    pub now_millis: u64,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::PauseMusic);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::ResumeMusic);
                state.clock.adjust_after_pause(input.now_millis);
            }
            _ => {}
        }
    }

    // Don't tick unless playing
    if state.phase != GamePhase::Playing {
        return;
    }

    let report = state.world.step(dt);
    interaction::dispatch(state, &report);

    apply_input(state, input);

    let player_pos = state.player_position();
    state.camera.follow(player_pos.x);

    for object in &mut state.objects {
        object.step(&mut state.world, player_pos);
    }

    step_actors(state);
    remove_out_of_bounds(state);
    state.sweep_dead();

    state.clock.update(input.now_millis);
    check_level_complete(state, input.now_millis);
    check_game_over(state);

    state.time_ticks += 1;
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let GameState { world, player, events, .. } = state;

    if input.attack {
        player.attack(world, events);
    }
    if input.left {
        player.move_in(world, Direction::Left);
    }
    if input.right {
        player.move_in(world, Direction::Right);
    }
    if input.jump {
        player.move_in(world, Direction::Up);
    }
    if !input.left && !input.right && !player.attacking {
        player.move_in(world, Direction::None);
    }
}

fn step_actors(state: &mut GameState) {
    let GameState {
        world,
        player,
        enemies,
        bullets,
        ..
    } = state;

    player.step(world);
    let target = world.position(player.body());

    for enemy in enemies.iter_mut() {
        if let Some(EnemyCommand::FireBullet { owner, from }) = enemy.step(world, target) {
            let moving_right = world.position(owner).is_none_or(|p| from.x >= p.x);
            bullets.push(Bullet::spawn(world, owner, from, moving_right));
        }
    }
}

/// Destroy loose dynamic bodies that fell out of the level
fn remove_out_of_bounds(state: &mut GameState) {
    let fallen: Vec<_> = state
        .world
        .iter()
        .filter(|b| b.is_dynamic() && b.role != BodyRole::Player && b.pos().y < BODY_KILL_Y)
        .map(|b| b.id)
        .collect();

    for id in fallen {
        log::trace!("Body {id:?} fell out of the level");
        state.world.destroy(id);
    }
}

fn check_level_complete(state: &mut GameState, now_millis: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let player_x = state.player_position().x;
    if !state.camera.at_right_limit() || !state.camera.reached_right_edge(player_x) {
        return;
    }

    state.score = state.score.saturating_add(LEVEL_COMPLETE_BONUS);
    let elapsed_secs = state.clock.elapsed_secs();
    state.events.push(GameEvent::LevelCompleted {
        level: state.level,
        score: state.score,
        elapsed_secs,
    });
    log::info!(
        "Level {:?} completed: score {} in {elapsed_secs}s",
        state.level,
        state.score
    );

    let next = state
        .level
        .builtin_index()
        .map(|index| index + 1)
        .filter(|&index| index < BUILTIN_LEVEL_COUNT);

    match next.map(|index| level::load_builtin(index, now_millis)) {
        Some(Ok(mut next_state)) => {
            let mut events = std::mem::take(&mut state.events);
            events.append(&mut next_state.events);
            next_state.events = events;
            *state = next_state;
        }
        Some(Err(e)) => {
            log::error!("Failed to load next level: {e}");
            state.phase = GamePhase::LevelComplete;
        }
        None => {
            state.phase = GamePhase::LevelComplete;
            state.play(SoundEffect::Win);
        }
    }
}

fn check_game_over(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if state.player_position().y >= PLAYER_KILL_Y && state.player.is_alive() {
        return;
    }

    state.player.health = 0;
    state.phase = GamePhase::GameOver;
    state.play(SoundEffect::GameOver);
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over with score {}", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::Shape;
    use crate::sim::state::LevelSource;
    use glam::Vec2;

    /// Player standing on a long floor whose top is at y = 0
    fn floor_state(length: f32, start: Vec2) -> GameState {
        let mut state = GameState::new(LevelSource::Custom, length, start, 0);
        state.add_platform("ground", Vec2::new(length / 2.0, -1.0), Shape::boxed(length, 1.0));
        state
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = floor_state(100.0, Vec2::new(0.0, 1.0));

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.drain_events(), vec![GameEvent::PauseMusic]);

        // Nothing advances while paused
        let ticks = state.time_ticks;
        run(&mut state, &TickInput::default(), 10);
        assert_eq!(state.time_ticks, ticks);

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::ResumeMusic));
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut state = floor_state(100.0, Vec2::new(0.0, 5.0));
        run(&mut state, &TickInput::default(), 120);

        let pos = state.player_position();
        assert!((pos.y - PLAYER_HALF_HEIGHT).abs() < 0.01, "player at {pos}");
        assert!(state.player.motion.can_jump);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_running_and_jumping() {
        let mut state = floor_state(100.0, Vec2::new(0.0, PLAYER_HALF_HEIGHT));
        run(&mut state, &TickInput::default(), 5);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, &right, 30);
        assert!(state.player_position().x > 1.0);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        run(&mut state, &TickInput::default(), 5);
        assert!(state.player_position().y > PLAYER_HALF_HEIGHT + 0.1);
    }

    #[test]
    fn test_fall_below_kill_plane_is_game_over() {
        let mut state = GameState::new(LevelSource::Custom, 100.0, Vec2::ZERO, 0);
        run(&mut state, &TickInput::default(), 200);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.health, 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::GameOver)));
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        // Frozen afterwards
        let ticks = state.time_ticks;
        run(&mut state, &TickInput::default(), 3);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_zero_health_is_game_over() {
        let mut state = floor_state(100.0, Vec2::new(0.0, PLAYER_HALF_HEIGHT));
        state.player.health = 0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_custom_level_completes_at_right_edge() {
        let mut state = floor_state(40.0, Vec2::new(25.0, PLAYER_HALF_HEIGHT));
        state.score = 7;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.score, 7 + LEVEL_COMPLETE_BONUS);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelCompleted {
            level: LevelSource::Custom,
            score: 7 + LEVEL_COMPLETE_BONUS,
            elapsed_secs: 0,
        }));
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Win)));
    }

    #[test]
    fn test_builtin_level_advances_to_next() {
        let mut state = level::load_builtin(0, 0).unwrap();
        state.drain_events();
        state.world.set_position(state.player.body(), Vec2::new(90.0, 10.0));

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.level, LevelSource::Builtin(1));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelCompleted {
                level: LevelSource::Builtin(0),
                score: LEVEL_COMPLETE_BONUS,
                ..
            }
        )));
        assert!(events.contains(&GameEvent::SwitchMusic { track: 1 }));
    }

    #[test]
    fn test_out_of_bounds_prop_removed() {
        let mut state = floor_state(100.0, Vec2::new(0.0, PLAYER_HALF_HEIGHT));
        let crate_body = state.add_prop("crate", Vec2::new(50.0, -30.0), Shape::boxed(0.5, 0.5), 1.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.world.is_alive(crate_body));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = level::load_builtin(0, 0).unwrap();
        let mut state2 = level::load_builtin(0, 0).unwrap();

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                left: true,
                ..Default::default()
            },
        ];

        for input in inputs.iter().cycle().take(240) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player_position(), state2.player_position());
        assert_eq!(state1.camera.offset, state2.camera.offset);
    }
}
