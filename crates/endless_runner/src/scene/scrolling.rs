use bevy::prelude::*;

use crate::gameplay::GameSpeed;
use crate::settings::RunnerSettings;

/// A tile in a strip that scrolls left and jumps back to the end of the strip
/// once it has left the view.
#[derive(Component, Debug, Clone, Copy)]
pub struct Wrapping {
    pub width: f32,
    pub strip_len: f32,
}

#[derive(Component)]
pub struct BackgroundTile;

#[derive(Component)]
pub struct PlatformTile;

/// New x of a bottom-left anchored tile: moved one strip length to the right
/// once its right bound is left of `left_edge`.
pub fn wrap_offset(x: f32, wrapping: Wrapping, left_edge: f32) -> f32 {
    if x + wrapping.width < left_edge {
        x + wrapping.strip_len
    } else {
        x
    }
}

/// Number of tiles needed to cover `view_width` while one of them is off screen.
pub fn tiles_to_cover(view_width: f32, tile_width: f32) -> usize {
    if tile_width <= 0.0 {
        return 0;
    }
    (view_width / tile_width).ceil() as usize + 1
}

pub fn scroll_background(
    time: Res<Time>,
    settings: Res<RunnerSettings>,
    mut query: Query<&mut Transform, With<BackgroundTile>>,
) {
    let dx = settings.background_speed * time.delta_secs();
    for mut transform in &mut query {
        transform.translation.x -= dx;
    }
}

pub fn scroll_platform(
    time: Res<Time>,
    settings: Res<RunnerSettings>,
    game_speed: Res<GameSpeed>,
    mut query: Query<&mut Transform, With<PlatformTile>>,
) {
    let dx = game_speed.current * settings.platform_speed_factor * time.delta_secs();
    for mut transform in &mut query {
        transform.translation.x -= dx;
    }
}

pub fn wrap_tiles(settings: Res<RunnerSettings>, mut query: Query<(&mut Transform, &Wrapping)>) {
    let left_edge = settings.left_edge();
    for (mut transform, wrapping) in &mut query {
        transform.translation.x = wrap_offset(transform.translation.x, *wrapping, left_edge);
    }
}
