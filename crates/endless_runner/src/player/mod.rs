pub mod animation;
pub mod controls;
pub mod inputs;

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy_asset_loader::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::gameplay::{GameState, RunEntity, RunSet};
use crate::physics::{CollisionBox, Grounded, Velocity};
use crate::settings::RunnerSettings;
use animation::{AnimationClip, SpriteAnimation, animate_sprites};

#[derive(AssetCollection, Resource)]
pub struct PlayerAssets {
    #[asset(texture_atlas_layout(tile_size_x = 64, tile_size_y = 80, columns = 10, rows = 1))]
    run_layout: Handle<TextureAtlasLayout>,
    #[asset(path = "images/player/run.png")]
    run: Handle<Image>,
    #[asset(texture_atlas_layout(tile_size_x = 64, tile_size_y = 80, columns = 10, rows = 1))]
    jump_layout: Handle<TextureAtlasLayout>,
    #[asset(path = "images/player/jump.png")]
    jump: Handle<Image>,
    #[asset(texture_atlas_layout(tile_size_x = 80, tile_size_y = 48, columns = 10, rows = 1))]
    slide_layout: Handle<TextureAtlasLayout>,
    #[asset(path = "images/player/slide.png")]
    slide: Handle<Image>,
    #[asset(texture_atlas_layout(tile_size_x = 96, tile_size_y = 76, columns = 10, rows = 1))]
    die_layout: Handle<TextureAtlasLayout>,
    #[asset(path = "images/player/die.png")]
    die: Handle<Image>,
}

impl PlayerAssets {
    fn sprite_for(&self, state: PlayerState) -> Sprite {
        let (image, layout) = match state {
            PlayerState::Running => (&self.run, &self.run_layout),
            PlayerState::Jumping => (&self.jump, &self.jump_layout),
            PlayerState::Sliding => (&self.slide, &self.slide_layout),
            PlayerState::Dead => (&self.die, &self.die_layout),
        };

        Sprite {
            custom_size: Some(state.display_size()),
            anchor: Anchor::BottomLeft,
            ..Sprite::from_atlas_image(
                image.clone(),
                TextureAtlas {
                    layout: layout.clone(),
                    index: 0,
                },
            )
        }
    }
}

#[derive(Component, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum PlayerState {
    #[default]
    Running,
    Jumping,
    Sliding,
    Dead,
}

impl PlayerState {
    pub const fn display_size(self) -> Vec2 {
        match self {
            Self::Running | Self::Jumping => Vec2::new(76.0, 92.0),
            Self::Sliding => Vec2::new(92.0, 50.0),
            Self::Dead => Vec2::new(123.0, 98.0),
        }
    }

    /// Hit box of the player in this state. Sliding halves the height so
    /// floating obstacles pass over it.
    pub const fn collision_box(self) -> CollisionBox {
        match self {
            Self::Running | Self::Jumping => {
                CollisionBox::new(Vec2::new(49.0, 86.0)).with_offset(Vec2::new(13.0, 0.0))
            }
            Self::Sliding => {
                CollisionBox::new(Vec2::new(60.0, 40.0)).with_offset(Vec2::new(16.0, 0.0))
            }
            Self::Dead => CollisionBox::new(Vec2::new(123.0, 98.0)),
        }
    }

    pub const fn clip(self) -> AnimationClip {
        match self {
            Self::Running => AnimationClip {
                frames: 10,
                fps: 30.0,
                looping: true,
            },
            Self::Jumping => AnimationClip {
                frames: 10,
                fps: 20.0,
                looping: false,
            },
            Self::Sliding => AnimationClip {
                frames: 10,
                fps: 20.0,
                looping: true,
            },
            Self::Dead => AnimationClip {
                frames: 10,
                fps: 10.0,
                looping: false,
            },
        }
    }
}

/// Jumps used since the player last touched the ground.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct JumpCounter {
    pub used: u32,
    pub was_on_ground: bool,
}

impl JumpCounter {
    pub const fn try_jump(&mut self, max_jumps: u32) -> bool {
        if self.used < max_jumps {
            self.used += 1;
            true
        } else {
            false
        }
    }

    /// Records this frame's ground contact. Returns true on the frame the
    /// player lands.
    pub const fn touch_ground(&mut self, on_ground: bool) -> bool {
        let landed = on_ground && !self.was_on_ground;
        if on_ground {
            self.used = 0;
        }
        self.was_on_ground = on_ground;
        landed
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<inputs::Action>::default())
            .register_type::<Player>()
            .register_type::<PlayerState>()
            .configure_loading_state(
                LoadingStateConfig::new(GameState::Loading).load_collection::<PlayerAssets>(),
            )
            .add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(OnEnter(GameState::Dying), kill_player)
            .add_systems(
                Update,
                (
                    controls::control_player.in_set(RunSet::Input),
                    sync_player_appearance
                        .before(RunSet::Collide)
                        .run_if(resource_exists::<PlayerAssets>),
                    animate_sprites,
                )
                    .chain(),
            );
    }
}

fn spawn_player(
    mut commands: Commands,
    settings: Res<RunnerSettings>,
    player_assets: Res<PlayerAssets>,
) {
    let state = PlayerState::Running;

    commands.spawn((
        Name::new("Player"),
        Player,
        RunEntity,
        state,
        JumpCounter::default(),
        Velocity::default(),
        Grounded(true),
        state.collision_box(),
        player_assets.sprite_for(state),
        SpriteAnimation::new(state.clip()),
        Transform::from_xyz(settings.left_edge() + settings.player_x, settings.ground_y(), 2.0),
        InputManagerBundle::<inputs::Action> {
            input_map: inputs::create_input_map(),
            ..default()
        },
    ));
}

fn kill_player(mut query: Query<(&mut PlayerState, &mut Velocity), With<Player>>) {
    for (mut state, mut velocity) in &mut query {
        *state = PlayerState::Dead;
        **velocity = Vec2::ZERO;
    }
}

/// Swaps sheet, clip and hit box whenever the state changes.
fn sync_player_appearance(
    player_assets: Res<PlayerAssets>,
    mut query: Query<
        (&PlayerState, &mut Sprite, &mut SpriteAnimation, &mut CollisionBox),
        Changed<PlayerState>,
    >,
) {
    for (state, mut sprite, mut animation, mut collision_box) in &mut query {
        *sprite = player_assets.sprite_for(*state);
        *animation = SpriteAnimation::new(state.clip());
        *collision_box = state.collision_box();
    }
}
