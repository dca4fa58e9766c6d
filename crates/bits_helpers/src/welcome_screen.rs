use bevy::prelude::*;

use crate::button::HoverScale;
use crate::restart::cleanup_marked;

#[derive(Component)]
pub struct WelcomeScreenElement;

/// Marks the button that leaves the welcome screen.
#[derive(Component)]
pub struct StartButton;

/// Spawns a centered title, an image start button and a hint line over the
/// running scene. Returns the button entity.
pub fn spawn_welcome_screen_button(
    commands: &mut Commands,
    title: &str,
    button_image: Handle<Image>,
    hint: &str,
) -> Entity {
    let mut button = Entity::PLACEHOLDER;

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(16.0),
                ..default()
            },
            WelcomeScreenElement,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            button = parent
                .spawn((
                    Button,
                    ImageNode::new(button_image),
                    HoverScale::new(1.0, 1.1),
                    StartButton,
                ))
                .id();

            parent.spawn((
                Text::new(hint),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    button
}

pub fn despawn_welcome_screen(commands: Commands, query: Query<Entity, With<WelcomeScreenElement>>) {
    cleanup_marked::<WelcomeScreenElement>(commands, query);
}
