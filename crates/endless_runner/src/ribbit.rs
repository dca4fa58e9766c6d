use bevy::log::info;
use bevy::prelude::{NextState, World};
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::gameplay::{GameState, ScoreInfo};
use crate::physics::ArcadePhysics;

#[derive(Default, Clone, Copy)]
pub struct EndlessRunner;

impl RibbitMessageHandler for EndlessRunner {
    fn restart(world: &mut World) {
        info!("Restarting EndlessRunner");

        world.insert_resource(ScoreInfo::default());

        let mut next_state = world.resource_mut::<NextState<GameState>>();
        next_state.set(GameState::Start);
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending EndlessRunner");

        world.resource_mut::<ArcadePhysics>().pause();

        let mut next_state = world.resource_mut::<NextState<GameState>>();
        next_state.set(GameState::GameOver);

        let score = world.resource::<ScoreInfo>();
        BitResult::HighestScore(score.current_score.into())
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
