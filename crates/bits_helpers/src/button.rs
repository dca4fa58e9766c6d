use bevy::prelude::*;

/// Scales a button while the pointer hovers it.
#[derive(Component, Clone, Copy, Debug)]
pub struct HoverScale {
    pub idle: f32,
    pub hovered: f32,
}

impl HoverScale {
    pub const fn new(idle: f32, hovered: f32) -> Self {
        Self { idle, hovered }
    }

    pub const fn scale_for(&self, interaction: Interaction) -> f32 {
        match interaction {
            Interaction::Hovered | Interaction::Pressed => self.hovered,
            Interaction::None => self.idle,
        }
    }
}

pub fn scale_on_hover(
    mut query: Query<(&Interaction, &HoverScale, &mut Transform), Changed<Interaction>>,
) {
    for (interaction, hover_scale, mut transform) in &mut query {
        transform.scale = Vec3::splat(hover_scale.scale_for(*interaction));
    }
}
