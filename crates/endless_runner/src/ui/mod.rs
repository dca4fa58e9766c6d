use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bits_helpers::button::{HoverScale, scale_on_hover};
use bits_helpers::restart::{RestartButton, cleanup_marked, handle_restart};
use bits_helpers::welcome_screen::{
    StartButton, despawn_welcome_screen, spawn_welcome_screen_button,
};

use crate::gameplay::{ButtonClickedEvent, GameState, RunEntity, ScoreInfo, ScoredEvent};

const SCORE_FONT_SIZE: f32 = 32.0;
const REPLAY_BUTTON_SCALE: f32 = 0.5;

#[derive(AssetCollection, Resource)]
struct UiAssets {
    #[asset(path = "images/ui/play_button.png")]
    play_button: Handle<Image>,
    #[asset(path = "images/ui/replay_button.png")]
    replay_button: Handle<Image>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.configure_loading_state(
            LoadingStateConfig::new(GameState::Loading).load_collection::<UiAssets>(),
        )
        .add_systems(
            OnEnter(GameState::Start),
            (cleanup_marked::<RunEntity>, spawn_start_screen),
        )
        .add_systems(OnExit(GameState::Start), despawn_welcome_screen)
        .add_systems(OnEnter(GameState::Playing), spawn_score_hud)
        .add_systems(OnEnter(GameState::GameOver), spawn_game_over_screen)
        .add_systems(OnExit(GameState::GameOver), cleanup_marked::<GameOverScreen>)
        .add_systems(
            Update,
            (
                scale_on_hover,
                report_button_clicks,
                handle_start_button.run_if(in_state(GameState::Start)),
                handle_restart::<ScoreInfo>.run_if(in_state(GameState::GameOver)),
                update_score,
            ),
        );
    }
}

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct HighScoreText;

#[derive(Component)]
struct GameOverScreen;

fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

fn high_score_label(score: u32) -> String {
    format!("Best: {score}")
}

fn spawn_start_screen(mut commands: Commands, ui_assets: Res<UiAssets>) {
    spawn_welcome_screen_button(
        &mut commands,
        "Endless Runner",
        ui_assets.play_button.clone(),
        "Space or Up to jump, Down to slide",
    );
}

fn handle_start_button(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if interaction_query
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        next_state.set(GameState::Playing);
    }
}

fn report_button_clicks(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<Button>)>,
    mut clicked_event: EventWriter<ButtonClickedEvent>,
) {
    for interaction in &interaction_query {
        if *interaction == Interaction::Pressed {
            clicked_event.send(ButtonClickedEvent);
        }
    }
}

fn spawn_score_hud(mut commands: Commands, score_info: Res<ScoreInfo>) {
    commands.spawn((
        Text::new(score_label(score_info.current_score)),
        TextFont {
            font_size: SCORE_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            left: Val::Px(20.0),
            ..default()
        },
        GlobalZIndex(10),
        ScoreText,
        RunEntity,
    ));

    commands.spawn((
        Text::new(high_score_label(score_info.high_score)),
        TextFont {
            font_size: SCORE_FONT_SIZE * 0.75,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.84, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            right: Val::Px(20.0),
            ..default()
        },
        GlobalZIndex(10),
        HighScoreText,
        RunEntity,
    ));
}

fn update_score(
    mut scored_event: EventReader<ScoredEvent>,
    score_info: Res<ScoreInfo>,
    mut score_query: Query<&mut Text, (With<ScoreText>, Without<HighScoreText>)>,
    mut high_score_query: Query<&mut Text, (With<HighScoreText>, Without<ScoreText>)>,
) {
    if scored_event.read().last().is_none() {
        return;
    }

    for mut text in &mut score_query {
        text.0 = score_label(score_info.current_score);
    }
    for mut text in &mut high_score_query {
        text.0 = high_score_label(score_info.high_score);
    }
}

fn spawn_game_over_screen(
    mut commands: Commands,
    ui_assets: Res<UiAssets>,
    score_info: Res<ScoreInfo>,
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            GlobalZIndex(20),
            GameOverScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Game Over"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new(score_label(score_info.current_score)),
                TextFont {
                    font_size: SCORE_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Button,
                ImageNode::new(ui_assets.replay_button.clone()),
                Transform::from_scale(Vec3::splat(REPLAY_BUTTON_SCALE)),
                HoverScale::new(REPLAY_BUTTON_SCALE, REPLAY_BUTTON_SCALE * 1.1),
                RestartButton,
            ));
        });
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::gameplay::GameplayPlugin;

    #[test]
    fn labels_match_the_hud_format() {
        assert_eq!(score_label(0), "Score: 0", "wrong score label");
        assert_eq!(high_score_label(120), "Best: 120", "wrong high score label");
    }

    #[test]
    fn pressing_start_begins_the_run() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, GameplayPlugin))
            .add_systems(
                Update,
                (
                    report_button_clicks,
                    handle_start_button.run_if(in_state(GameState::Start)),
                ),
            );
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Start);
        app.update();

        app.world_mut()
            .spawn((Button, Interaction::Pressed, StartButton));
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::Playing,
            "start button ignored"
        );
        let clicks = app.world().resource::<Events<ButtonClickedEvent>>().len();
        assert!(clicks >= 1, "click not reported");
    }

    #[test]
    fn replay_resets_the_score_and_plays_again() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, GameplayPlugin))
            .add_systems(
                Update,
                handle_restart::<ScoreInfo>.run_if(in_state(GameState::GameOver)),
            );
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::GameOver);
        app.update();
        {
            let mut score = app.world_mut().resource_mut::<ScoreInfo>();
            score.current_score = 57;
            score.high_score = 57;
        }

        app.world_mut()
            .spawn((Button, Interaction::Pressed, RestartButton));
        app.update();
        app.update();

        let world = app.world();
        assert_eq!(
            *world.resource::<State<GameState>>().get(),
            GameState::Playing,
            "replay did not restart"
        );
        assert_eq!(world.resource::<ScoreInfo>().current_score, 0, "score not reset");
        assert_eq!(world.resource::<ScoreInfo>().high_score, 57, "high score lost");
    }
}
