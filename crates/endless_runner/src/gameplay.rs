use core::time::Duration;

use bevy::prelude::*;
use bits_helpers::restart::{Restartable, cleanup_marked};
use serde::{Deserialize, Serialize};

use crate::physics::{ArcadePhysics, CollisionBox, PhysicsSet, overlaps};
use crate::player::Player;
use crate::scene::obstacles::Obstacle;
use crate::settings::RunnerSettings;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Start,
    Playing,
    Dying,
    GameOver,
}

/// Ordering of the per-frame work of a run. Only runs while playing.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunSet {
    Input,
    Scroll,
    Collide,
}

#[derive(Resource, Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreInfo {
    pub current_score: u32,
    pub high_score: u32,
}

impl Restartable for ScoreInfo {
    type State = GameState;

    fn reset(&mut self) {
        self.current_score = 0;
    }

    fn restart_state() -> GameState {
        GameState::Playing
    }
}

/// Awards one point per elapsed score interval.
#[derive(Resource, Debug)]
pub struct ScoreClock(Timer);

impl ScoreClock {
    pub fn new(interval: Duration) -> Self {
        Self(Timer::new(interval, TimerMode::Repeating))
    }

    /// Number of whole intervals completed after `delta` more time.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.0.tick(delta);
        self.0.times_finished_this_tick()
    }

    pub fn reset(&mut self) {
        self.0.reset();
    }
}

/// Scroll speed of obstacles in pixels per second.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct GameSpeed {
    pub current: f32,
    pub initial: f32,
    pub step: f32,
    pub points_per_step: u32,
}

impl GameSpeed {
    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self {
            current: settings.initial_speed,
            initial: settings.initial_speed,
            step: settings.speed_step,
            points_per_step: settings.points_per_speed_step.max(1),
        }
    }

    pub const fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Adds `points` to the score one at a time, speeding up on every multiple of
/// `points_per_step`. Returns how many speed-ups happened.
pub fn award_points(score: &mut ScoreInfo, speed: &mut GameSpeed, points: u32) -> u32 {
    let mut speed_ups = 0;

    for _ in 0..points {
        score.current_score += 1;
        if score.current_score % speed.points_per_step == 0 {
            speed.current += speed.step;
            speed_ups += 1;
        }
    }

    score.high_score = score.high_score.max(score.current_score);
    speed_ups
}

#[derive(Resource, Debug)]
struct DeathTimer(Timer);

#[derive(Event)]
pub struct ScoredEvent(pub u32);

#[derive(Event)]
pub struct SpeedUpEvent(pub f32);

#[derive(Event)]
pub struct JumpedEvent;

#[derive(Event)]
pub struct PlayerHitEvent;

#[derive(Event)]
pub struct ButtonClickedEvent;

/// Everything spawned for a single run, despawned when the next one starts.
#[derive(Component, Default)]
pub struct RunEntity;

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world_mut()
            .get_resource_or_insert_with(RunnerSettings::default)
            .clone();

        app.init_state::<GameState>()
            .register_type::<GameSpeed>()
            .insert_resource(ScoreInfo::default())
            .insert_resource(ScoreClock::new(settings.score_interval))
            .insert_resource(GameSpeed::from_settings(&settings))
            .insert_resource(ArcadePhysics::from_settings(&settings))
            .insert_resource(DeathTimer(Timer::new(
                settings.death_duration,
                TimerMode::Once,
            )))
            .add_event::<ScoredEvent>()
            .add_event::<SpeedUpEvent>()
            .add_event::<JumpedEvent>()
            .add_event::<PlayerHitEvent>()
            .add_event::<ButtonClickedEvent>()
            .configure_sets(
                Update,
                RunSet::Input
                    .before(PhysicsSet)
                    .run_if(in_state(GameState::Playing)),
            )
            .configure_sets(
                Update,
                RunSet::Scroll
                    .after(PhysicsSet)
                    .run_if(in_state(GameState::Playing)),
            )
            .configure_sets(
                Update,
                RunSet::Collide
                    .after(RunSet::Scroll)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                OnEnter(GameState::Playing),
                (cleanup_marked::<RunEntity>, reset_run).chain(),
            )
            .add_systems(OnEnter(GameState::Dying), start_dying)
            .add_systems(
                Update,
                (
                    check_for_collisions.in_set(RunSet::Collide),
                    tick_score.after(RunSet::Collide).run_if(in_state(GameState::Playing)),
                    finish_dying.run_if(in_state(GameState::Dying)),
                ),
            );
    }
}

fn reset_run(
    mut score_info: ResMut<ScoreInfo>,
    mut score_clock: ResMut<ScoreClock>,
    mut game_speed: ResMut<GameSpeed>,
    mut physics: ResMut<ArcadePhysics>,
) {
    score_info.reset();
    score_clock.reset();
    game_speed.reset();
    physics.resume();
    info!("Run started, high score {}", score_info.high_score);
}

fn tick_score(
    time: Res<Time>,
    physics: Res<ArcadePhysics>,
    mut score_clock: ResMut<ScoreClock>,
    mut score_info: ResMut<ScoreInfo>,
    mut game_speed: ResMut<GameSpeed>,
    mut scored_event: EventWriter<ScoredEvent>,
    mut speed_up_event: EventWriter<SpeedUpEvent>,
) {
    // Paused physics means the player was hit this frame.
    if physics.paused {
        return;
    }

    let points = score_clock.advance(time.delta());
    if points == 0 {
        return;
    }

    let speed_ups = award_points(&mut score_info, &mut game_speed, points);
    scored_event.send(ScoredEvent(score_info.current_score));

    if speed_ups > 0 {
        debug!("Speed up to {} at score {}", game_speed.current, score_info.current_score);
        speed_up_event.send(SpeedUpEvent(game_speed.current));
    }
}

fn check_for_collisions(
    player_query: Query<(&Transform, &CollisionBox), With<Player>>,
    obstacle_query: Query<(&Transform, &CollisionBox), With<Obstacle>>,
    mut physics: ResMut<ArcadePhysics>,
    mut next_state: ResMut<NextState<GameState>>,
    mut hit_event: EventWriter<PlayerHitEvent>,
) {
    let Ok((player_transform, player_box)) = player_query.get_single() else {
        return;
    };
    let player_aabb = player_box.aabb(player_transform.translation.truncate());

    let hit = obstacle_query.iter().any(|(transform, collision_box)| {
        overlaps(&player_aabb, &collision_box.aabb(transform.translation.truncate()))
    });

    if hit {
        physics.pause();
        hit_event.send(PlayerHitEvent);
        next_state.set(GameState::Dying);
    }
}

fn start_dying(mut death_timer: ResMut<DeathTimer>, score_info: Res<ScoreInfo>) {
    death_timer.0.reset();
    info!("Player hit an obstacle with score {}", score_info.current_score);
}

fn finish_dying(
    time: Res<Time>,
    mut death_timer: ResMut<DeathTimer>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if death_timer.0.tick(time.delta()).just_finished() {
        next_state.set(GameState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::player::PlayerState;
    use crate::scene::obstacles::{ObstacleKind, obstacle_y};

    fn speed() -> GameSpeed {
        GameSpeed::from_settings(&RunnerSettings::default())
    }

    fn gameplay_app(frame: Duration) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, GameplayPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(frame));
        app
    }

    fn enter(app: &mut App, state: GameState) {
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(state);
    }

    fn current_state(app: &App) -> GameState {
        *app.world().resource::<State<GameState>>().get()
    }

    /// Starts a run with a player in `state` at x = 0 and one obstacle.
    fn run_with_obstacle(state: PlayerState, kind: ObstacleKind, obstacle_x: f32) -> App {
        let mut app = gameplay_app(Duration::from_millis(100));
        enter(&mut app, GameState::Playing);
        app.update();

        let settings = RunnerSettings::default();
        app.world_mut().spawn((
            Player,
            state,
            state.collision_box(),
            Transform::from_xyz(0.0, settings.ground_y(), 2.0),
        ));
        app.world_mut().spawn((
            Obstacle { kind },
            CollisionBox::new(kind.size()),
            Transform::from_xyz(obstacle_x, obstacle_y(&settings, kind), 1.0),
        ));
        app
    }

    #[test]
    fn hitting_an_obstacle_ends_the_run() {
        let mut app = run_with_obstacle(PlayerState::Running, ObstacleKind::Crate, 20.0);
        app.update();
        app.update();

        let world = app.world();
        assert_eq!(current_state(&app), GameState::Dying, "hit did not kill the player");
        assert!(world.resource::<ArcadePhysics>().paused, "physics kept running");
        assert!(
            !world.resource::<Events<PlayerHitEvent>>().is_empty(),
            "hit was not reported"
        );
        assert_eq!(
            world.resource::<ScoreInfo>().current_score,
            0,
            "the hit frame awarded a point"
        );
    }

    #[test]
    fn distant_obstacle_is_harmless() {
        let mut app = run_with_obstacle(PlayerState::Running, ObstacleKind::Crate, 400.0);
        app.update();
        app.update();

        assert_eq!(current_state(&app), GameState::Playing, "run ended without a hit");
        assert!(!app.world().resource::<ArcadePhysics>().paused, "physics paused");
        assert_eq!(app.world().resource::<ScoreInfo>().current_score, 2, "score stalled");
    }

    #[test]
    fn sliding_passes_under_a_bird() {
        let mut app = run_with_obstacle(PlayerState::Sliding, ObstacleKind::Bird, 20.0);
        app.update();
        app.update();

        assert_eq!(current_state(&app), GameState::Playing, "bird hit a sliding player");
    }

    #[test]
    fn running_into_a_bird_ends_the_run() {
        let mut app = run_with_obstacle(PlayerState::Running, ObstacleKind::Bird, 20.0);
        app.update();
        app.update();

        assert_eq!(current_state(&app), GameState::Dying, "bird missed a running player");
    }

    #[test]
    fn clock_counts_whole_intervals() {
        let mut clock = ScoreClock::new(Duration::from_millis(100));
        assert_eq!(clock.advance(Duration::from_millis(99)), 0, "scored too early");
        assert_eq!(clock.advance(Duration::from_millis(1)), 1, "missed first point");
        assert_eq!(clock.advance(Duration::from_millis(250)), 2, "hitch lost points");
        assert_eq!(clock.advance(Duration::from_millis(50)), 1, "remainder was dropped");
    }

    #[test]
    fn speed_increases_every_hundred_points() {
        let mut score = ScoreInfo::default();
        let mut speed = speed();

        assert_eq!(award_points(&mut score, &mut speed, 99), 0, "early speed-up");
        assert!((speed.current - 300.0).abs() < f32::EPSILON, "speed changed early");

        assert_eq!(award_points(&mut score, &mut speed, 1), 1, "missed speed-up at 100");
        assert!((speed.current - 360.0).abs() < f32::EPSILON, "speed {}", speed.current);

        assert_eq!(award_points(&mut score, &mut speed, 150), 1, "wrong speed-ups to 250");
        assert_eq!(score.current_score, 250, "score drifted");
    }

    #[test]
    fn high_score_survives_reset() {
        let mut score = ScoreInfo::default();
        let mut speed = speed();
        award_points(&mut score, &mut speed, 42);
        score.reset();
        award_points(&mut score, &mut speed, 7);

        assert_eq!(score.current_score, 7, "current score not reset");
        assert_eq!(score.high_score, 42, "high score lost");
    }

    #[test]
    fn score_increments_every_hundred_milliseconds_while_playing() {
        let mut app = gameplay_app(Duration::from_millis(50));
        enter(&mut app, GameState::Playing);

        // The first frame has no delta, the next ten add up to 500ms.
        for _ in 0..11 {
            app.update();
        }

        assert_eq!(app.world().resource::<ScoreInfo>().current_score, 5, "wrong score");
    }

    #[test]
    fn score_does_not_tick_outside_of_play() {
        let mut app = gameplay_app(Duration::from_millis(50));
        enter(&mut app, GameState::Start);

        for _ in 0..11 {
            app.update();
        }

        assert_eq!(app.world().resource::<ScoreInfo>().current_score, 0, "scored on start screen");
    }

    #[test]
    fn dying_leads_to_game_over_after_the_death_animation() {
        let mut app = gameplay_app(Duration::from_millis(250));
        enter(&mut app, GameState::Dying);

        app.update();
        app.update();
        assert_eq!(current_state(&app), GameState::Dying, "left dying too early");

        for _ in 0..4 {
            app.update();
        }
        assert_eq!(current_state(&app), GameState::GameOver, "never reached game over");
    }

    #[test]
    fn entering_play_resets_the_run() {
        let mut app = gameplay_app(Duration::from_millis(50));
        {
            let world = app.world_mut();
            world.resource_mut::<ScoreInfo>().current_score = 12;
            world.resource_mut::<GameSpeed>().current = 999.0;
            world.resource_mut::<ArcadePhysics>().pause();
        }
        enter(&mut app, GameState::Playing);
        app.update();

        let world = app.world();
        assert_eq!(world.resource::<ScoreInfo>().current_score, 0, "score kept");
        assert!(
            (world.resource::<GameSpeed>().current - 300.0).abs() < f32::EPSILON,
            "speed kept"
        );
        assert!(!world.resource::<ArcadePhysics>().paused, "physics still paused");
    }
}
