use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::PrimaryWindow;

// Surfaces above this size fail to configure on most WebGL2 devices.
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Size the bit lays out its world in.
#[derive(Resource, Clone, Copy, Debug)]
pub struct LogicalResolution(pub Vec2);

/// Largest size with the logical aspect ratio that fits in `available` and
/// the GPU surface limit.
pub fn fit_resolution(logical: Vec2, available: Vec2) -> Vec2 {
    let bounds = available.min(Vec2::splat(MAX_SURFACE_EXTENT));
    if logical.x <= 0.0 || logical.y <= 0.0 {
        return bounds;
    }

    let scale = (bounds.x / logical.x).min(bounds.y / logical.y);
    logical * scale
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    logical: Res<LogicalResolution>,
    mut primary_query: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) = (wasm_window.inner_width(), wasm_window.inner_height())
    else {
        return;
    };
    let (Some(width), Some(height)) = (inner_width.as_f64(), inner_height.as_f64()) else {
        return;
    };

    let target = fit_resolution(logical.0, Vec2::new(width as f32, height as f32));

    for mut window in &mut primary_query {
        if (window.resolution.width() - target.x).abs() > f32::EPSILON
            || (window.resolution.height() - target.y).abs() > f32::EPSILON
        {
            window.resolution.set(target.x, target.y);
        }
    }
}
