mod audio;
pub mod gameplay;
pub mod physics;
pub mod player;
mod ribbit;
pub mod scene;
pub mod settings;
mod ui;

use ribbit::EndlessRunner;
use settings::RunnerSettings;

pub fn run() {
    let settings = RunnerSettings::default().or_default_if_invalid();

    bits_helpers::get_default_app::<EndlessRunner>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        settings.resolution(),
    )
    .insert_resource(settings)
    // Owns the game state, which the loading states below hang off.
    .add_plugins(gameplay::GameplayPlugin)
    .add_plugins(physics::ArcadePhysicsPlugin)
    .add_plugins(scene::ScenePlugin)
    .add_plugins(player::PlayerPlugin)
    .add_plugins(ui::UiPlugin)
    .add_plugins(audio::GameAudioPlugin)
    .run();
}
