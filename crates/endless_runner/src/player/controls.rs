use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::gameplay::JumpedEvent;
use crate::physics::{Grounded, Velocity};
use crate::player::inputs::Action;
use crate::player::{JumpCounter, Player, PlayerState};
use crate::settings::RunnerSettings;

/// What the player asked for this frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerIntent {
    pub jump: bool,
    pub slide_started: bool,
    pub slide_held: bool,
}

/// Outcome of one frame of the player state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: PlayerState,
    pub jumped: bool,
    pub fast_fall: bool,
}

impl Step {
    const fn to(state: PlayerState) -> Self {
        Self {
            state,
            jumped: false,
            fast_fall: false,
        }
    }
}

pub fn step(
    state: PlayerState,
    counter: &mut JumpCounter,
    intent: PlayerIntent,
    grounded: bool,
    max_jumps: u32,
) -> Step {
    if state == PlayerState::Dead {
        return Step::to(state);
    }

    let landed = counter.touch_ground(grounded);

    if intent.jump && counter.try_jump(max_jumps) {
        return Step {
            state: PlayerState::Jumping,
            jumped: true,
            fast_fall: false,
        };
    }

    if intent.slide_held && grounded {
        return Step::to(PlayerState::Sliding);
    }

    if intent.slide_started && !grounded {
        return Step {
            state,
            jumped: false,
            fast_fall: true,
        };
    }

    match state {
        PlayerState::Sliding if !intent.slide_held => Step::to(PlayerState::Running),
        PlayerState::Jumping if landed => Step::to(PlayerState::Running),
        _ => Step::to(state),
    }
}

pub fn control_player(
    mut query: Query<
        (
            &ActionState<Action>,
            &mut PlayerState,
            &mut JumpCounter,
            &mut Velocity,
            &Grounded,
        ),
        With<Player>,
    >,
    settings: Res<RunnerSettings>,
    touch_input: Res<Touches>,
    mut jumped_event: EventWriter<JumpedEvent>,
) {
    let Ok((action_state, mut state, mut counter, mut velocity, grounded)) =
        query.get_single_mut()
    else {
        return;
    };

    let intent = PlayerIntent {
        jump: action_state.just_pressed(&Action::Jump) || touch_input.any_just_pressed(),
        slide_started: action_state.just_pressed(&Action::Slide),
        slide_held: action_state.pressed(&Action::Slide),
    };

    let next = step(*state, &mut counter, intent, grounded.0, settings.max_jumps);

    if next.jumped {
        velocity.y = settings.jump_velocity;
        jumped_event.send(JumpedEvent);
    } else if next.fast_fall {
        velocity.y = velocity.y.min(-settings.fast_fall_velocity);
    }

    // Re-playing the jump clip on a double jump needs a change even when the
    // state stays the same.
    if next.state != *state || next.jumped {
        *state = next.state;
    }
}
