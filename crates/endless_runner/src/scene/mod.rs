pub mod obstacles;
pub mod scrolling;

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy_asset_loader::prelude::*;
use bevy_turborand::prelude::*;
use obstacles::ObstacleKind;
use scrolling::{BackgroundTile, PlatformTile, Wrapping};

use crate::gameplay::{GameState, RunSet};
use crate::settings::RunnerSettings;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobalRng::new())
            .add_loading_state(
                LoadingState::new(GameState::Loading)
                    .continue_to_state(GameState::Start)
                    .load_collection::<SceneAssets>(),
            )
            .add_systems(Startup, setup)
            .add_systems(OnExit(GameState::Loading), spawn_scenery)
            .add_systems(
                Update,
                (
                    scrolling::scroll_background,
                    scrolling::scroll_platform.in_set(RunSet::Scroll),
                    scrolling::wrap_tiles,
                )
                    .chain(),
            )
            .add_plugins(obstacles::ObstaclesPlugin);
    }
}

#[derive(AssetCollection, Resource)]
pub struct SceneAssets {
    #[asset(path = "images/background.png")]
    background: Handle<Image>,
    #[asset(path = "images/tile.png")]
    platform: Handle<Image>,
    #[asset(path = "images/obstacles/crate.png")]
    crate_obstacle: Handle<Image>,
    #[asset(path = "images/obstacles/cactus.png")]
    cactus: Handle<Image>,
    #[asset(path = "images/obstacles/rock.png")]
    rock: Handle<Image>,
    #[asset(path = "images/obstacles/bird.png")]
    bird: Handle<Image>,
}

impl SceneAssets {
    pub fn obstacle_image(&self, kind: ObstacleKind) -> Handle<Image> {
        match kind {
            ObstacleKind::Crate => self.crate_obstacle.clone(),
            ObstacleKind::Cactus => self.cactus.clone(),
            ObstacleKind::Rock => self.rock.clone(),
            ObstacleKind::Bird => self.bird.clone(),
        }
    }
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn spawn_scenery(
    mut commands: Commands,
    scene_assets: Res<SceneAssets>,
    images: Res<Assets<Image>>,
    settings: Res<RunnerSettings>,
) {
    let background_strip = Wrapping {
        width: settings.width,
        strip_len: settings.width * 2.0,
    };
    for i in 0..2 {
        commands.spawn((
            Name::new("Background"),
            BackgroundTile,
            background_strip,
            Sprite {
                image: scene_assets.background.clone(),
                custom_size: Some(settings.resolution()),
                anchor: Anchor::BottomLeft,
                ..default()
            },
            Transform::from_xyz(
                (i as f32).mul_add(settings.width, settings.left_edge()),
                settings.bottom_edge(),
                -10.0,
            ),
        ));
    }

    // Scale the tile to the platform height, keeping its aspect ratio.
    let tile_aspect = images
        .get(&scene_assets.platform)
        .map(|image| image.size_f32())
        .filter(|size| size.y > 0.0)
        .map_or(1.0, |size| size.x / size.y);
    let tile_size = Vec2::new(settings.platform_height * tile_aspect, settings.platform_height);
    let tile_count = scrolling::tiles_to_cover(settings.width, tile_size.x);
    let platform_strip = Wrapping {
        width: tile_size.x,
        strip_len: tile_size.x * tile_count as f32,
    };

    for i in 0..tile_count {
        commands.spawn((
            Name::new("Platform"),
            PlatformTile,
            platform_strip,
            Sprite {
                image: scene_assets.platform.clone(),
                custom_size: Some(tile_size),
                anchor: Anchor::BottomLeft,
                ..default()
            },
            Transform::from_xyz(
                (i as f32).mul_add(tile_size.x, settings.left_edge()),
                settings.bottom_edge(),
                0.0,
            ),
        ));
    }

    info!("Spawned scenery with {tile_count} platform tiles");
}
