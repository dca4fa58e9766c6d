use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::gameplay::{ButtonClickedEvent, GameState, JumpedEvent};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
enum AudioLoadState {
    #[default]
    Loading,
    Loaded,
}

#[derive(AssetCollection, Resource)]
struct AudioAssets {
    #[asset(path = "audio/jump.wav")]
    jump: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/click.wav")]
    click: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/hit.wav")]
    hit: Handle<bevy_kira_audio::prelude::AudioSource>,
}

/// Sound effects. Audio loads on its own so a slow download never holds up
/// the start screen; effects fired before it finishes are skipped.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .init_state::<AudioLoadState>()
            .add_loading_state(
                LoadingState::new(AudioLoadState::Loading)
                    .continue_to_state(AudioLoadState::Loaded)
                    .load_collection::<AudioAssets>(),
            )
            .add_systems(
                Update,
                (jump_audio, click_audio).run_if(in_state(AudioLoadState::Loaded)),
            )
            .add_systems(
                OnEnter(GameState::Dying),
                hit_audio.run_if(in_state(AudioLoadState::Loaded)),
            );
    }
}

fn hit_audio(audio_assets: Res<AudioAssets>, audio: Res<Audio>) {
    audio.play(audio_assets.hit.clone_weak());
}

fn jump_audio(
    audio_assets: Res<AudioAssets>,
    audio: Res<Audio>,
    mut jump_event: EventReader<JumpedEvent>,
) {
    for _ in jump_event.read() {
        audio.play(audio_assets.jump.clone_weak());
    }
}

fn click_audio(
    audio_assets: Res<AudioAssets>,
    audio: Res<Audio>,
    mut clicked_event: EventReader<ButtonClickedEvent>,
) {
    for _ in clicked_event.read() {
        audio.play(audio_assets.click.clone_weak());
    }
}
