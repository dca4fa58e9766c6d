use bevy::prelude::{GamepadButton, KeyCode, Reflect};
use leafwing_input_manager::prelude::*;

#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum Action {
    Jump,
    Slide,
}

// Touch is not supported by leafwing, taps are read from `Touches` directly.
pub fn create_input_map() -> InputMap<Action> {
    let mut input_map = InputMap::default();

    input_map.insert(Action::Jump, KeyCode::Space);
    input_map.insert(Action::Jump, KeyCode::ArrowUp);
    input_map.insert(Action::Jump, KeyCode::KeyW);
    input_map.insert(Action::Jump, GamepadButton::South);

    input_map.insert(Action::Slide, KeyCode::ArrowDown);
    input_map.insert(Action::Slide, KeyCode::KeyS);
    input_map.insert(Action::Slide, GamepadButton::East);

    input_map
}
