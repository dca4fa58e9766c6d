use bevy::ecs::world::Command;
use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy_turborand::prelude::*;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::gameplay::{GameSpeed, GameState, RunEntity, RunSet};
use crate::physics::CollisionBox;
use crate::scene::SceneAssets;
use crate::settings::RunnerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount, Reflect)]
pub enum ObstacleKind {
    Crate,
    Cactus,
    Rock,
    Bird,
}

impl ObstacleKind {
    pub const fn size(self) -> Vec2 {
        match self {
            Self::Crate => Vec2::new(48.0, 48.0),
            Self::Cactus => Vec2::new(40.0, 72.0),
            Self::Rock => Vec2::new(64.0, 40.0),
            Self::Bird => Vec2::new(56.0, 40.0),
        }
    }

    /// Height above the platform. Floating obstacles have to be slid under.
    pub const fn elevation(self) -> f32 {
        match self {
            Self::Bird => 50.0,
            Self::Crate | Self::Cactus | Self::Rock => 0.0,
        }
    }

    pub fn random(rng: &mut GlobalRng) -> Self {
        let index = rng.usize(0..Self::COUNT);
        Self::iter().nth(index).unwrap_or(Self::Crate)
    }
}

#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Obstacle {
    pub kind: ObstacleKind,
}

/// x of the `index`th obstacle of a new run, `roll` in `[0, 1)`.
///
/// Obstacles start between 800 + 400i and 1200 + 600i pixels from the left of
/// the view, so the first one is always off screen.
pub fn initial_x(settings: &RunnerSettings, index: usize, roll: f32) -> f32 {
    let i = index as f32;
    let min = i.mul_add(400.0, 800.0);
    let max = i.mul_add(600.0, 1200.0);
    settings.left_edge() + roll.mul_add(max - min, min)
}

/// x of an obstacle sent back to the right of the view, `roll` in `[0, 1)`.
pub fn recycled_x(settings: &RunnerSettings, roll: f32) -> f32 {
    let gap = roll.mul_add(
        settings.recycle_gap_max - settings.recycle_gap_min,
        settings.recycle_gap_min,
    );
    settings.right_edge() + gap
}

pub fn obstacle_y(settings: &RunnerSettings, kind: ObstacleKind) -> f32 {
    settings.ground_y() + kind.elevation()
}

pub struct SpawnObstacle {
    pub position_x: f32,
    pub kind: ObstacleKind,
}

impl Command for SpawnObstacle {
    fn apply(self, world: &mut World) {
        let Some(settings) = world.get_resource::<RunnerSettings>() else {
            error!("Could not find resource RunnerSettings");
            return;
        };
        let Some(scene_assets) = world.get_resource::<SceneAssets>() else {
            warn!("Scene assets are not loaded, skipping obstacle");
            return;
        };

        let kind = self.kind;
        let translation = Vec3::new(self.position_x, obstacle_y(settings, kind), 1.0);
        let sprite = Sprite {
            image: scene_assets.obstacle_image(kind),
            custom_size: Some(kind.size()),
            anchor: Anchor::BottomLeft,
            ..default()
        };

        world.spawn((
            Name::new("Obstacle"),
            Obstacle { kind },
            RunEntity,
            CollisionBox::new(kind.size()),
            sprite,
            Transform::from_translation(translation),
        ));
    }
}

pub struct ObstaclesPlugin;

impl Plugin for ObstaclesPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Obstacle>()
            .add_systems(OnEnter(GameState::Playing), spawn_obstacles)
            .add_systems(
                Update,
                (move_obstacles, recycle_obstacles)
                    .chain()
                    .in_set(RunSet::Scroll),
            );
    }
}

fn spawn_obstacles(
    mut commands: Commands,
    settings: Res<RunnerSettings>,
    mut rng: ResMut<GlobalRng>,
) {
    for index in 0..settings.obstacle_count {
        let position_x = initial_x(&settings, index, rng.f32());
        let kind = ObstacleKind::random(&mut rng);
        commands.queue(SpawnObstacle { position_x, kind });
    }
}

pub(crate) fn move_obstacles(
    time: Res<Time>,
    game_speed: Res<GameSpeed>,
    mut query: Query<&mut Transform, With<Obstacle>>,
) {
    let dx = game_speed.current * time.delta_secs();
    for mut transform in &mut query {
        transform.translation.x -= dx;
    }
}

/// Sends obstacles that left the view back to the right with a new look.
pub(crate) fn recycle_obstacles(
    settings: Res<RunnerSettings>,
    scene_assets: Option<Res<SceneAssets>>,
    mut rng: ResMut<GlobalRng>,
    mut query: Query<(&mut Obstacle, &mut Transform, &mut Sprite, &mut CollisionBox)>,
) {
    let left_edge = settings.left_edge();

    for (mut obstacle, mut transform, mut sprite, mut collision_box) in &mut query {
        if transform.translation.x + obstacle.kind.size().x >= left_edge {
            continue;
        }

        let kind = ObstacleKind::random(&mut rng);
        obstacle.kind = kind;
        transform.translation.x = recycled_x(&settings, rng.f32());
        transform.translation.y = obstacle_y(&settings, kind);
        *collision_box = CollisionBox::new(kind.size());

        sprite.custom_size = Some(kind.size());
        if let Some(scene_assets) = &scene_assets {
            sprite.image = scene_assets.obstacle_image(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::gameplay::GameplayPlugin;

    #[test]
    fn first_obstacles_start_off_screen_and_spread_out() {
        let settings = RunnerSettings::default();

        for index in 0..settings.obstacle_count {
            let nearest = initial_x(&settings, index, 0.0);
            let farthest = initial_x(&settings, index, 0.999);
            assert!(nearest >= settings.left_edge() + 800.0, "obstacle {index} too close");
            assert!(
                farthest <= (index as f32).mul_add(600.0, settings.left_edge() + 1200.0),
                "obstacle {index} too far"
            );
        }
    }

    #[test]
    fn recycled_obstacles_land_in_the_gap_range() {
        let settings = RunnerSettings::default();
        let mut rng = GlobalRng::with_seed(7);

        for _ in 0..100 {
            let x = recycled_x(&settings, rng.f32());
            assert!(
                (settings.right_edge() + 100.0..=settings.right_edge() + 600.0).contains(&x),
                "recycled to {x}"
            );
        }
    }

    #[test]
    fn every_kind_can_be_rolled() {
        let mut rng = GlobalRng::with_seed(3);
        let rolled: Vec<_> = (0..200).map(|_| ObstacleKind::random(&mut rng)).collect();

        for kind in ObstacleKind::iter() {
            assert!(rolled.contains(&kind), "{kind:?} never rolled");
        }
    }

    #[test]
    fn obstacle_re_enters_from_the_right_once_past_the_left_edge() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, GameplayPlugin))
            .insert_resource(GlobalRng::with_seed(11))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
                100,
            )))
            .add_systems(
                Update,
                (move_obstacles, recycle_obstacles)
                    .chain()
                    .in_set(RunSet::Scroll),
            );
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);

        let settings = RunnerSettings::default();
        let kind = ObstacleKind::Crate;
        // Right bound 10px inside the view; 300px/s moves it 30px per frame.
        let start_x = settings.left_edge() - kind.size().x + 10.0;
        let obstacle = app
            .world_mut()
            .spawn((
                Obstacle { kind },
                CollisionBox::new(kind.size()),
                Sprite::default(),
                Transform::from_xyz(start_x, settings.ground_y(), 1.0),
            ))
            .id();

        app.update();
        let x = app.world().get::<Transform>(obstacle).map(|t| t.translation.x);
        assert_eq!(x, Some(start_x), "moved before the first delta");

        app.update();
        let transform = app.world().get::<Transform>(obstacle).copied();
        let Some(transform) = transform else {
            panic!("obstacle was despawned");
        };
        assert!(
            transform.translation.x >= settings.right_edge() + 100.0
                && transform.translation.x <= settings.right_edge() + 600.0,
            "obstacle not recycled, x = {}",
            transform.translation.x
        );

        let kind = app.world().get::<Obstacle>(obstacle).map(|o| o.kind);
        let Some(kind) = kind else {
            panic!("obstacle component missing");
        };
        assert!(
            (transform.translation.y - obstacle_y(&settings, kind)).abs() < f32::EPSILON,
            "recycled obstacle not placed for its kind"
        );
    }
}
