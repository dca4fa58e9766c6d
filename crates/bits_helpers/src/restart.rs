use bevy::prelude::*;
use bevy::state::state::FreelyMutableState;

/// Marks a UI button that restarts the bit when pressed.
#[derive(Component)]
pub struct RestartButton;

/// A resource holding everything a single run owns.
///
/// Pressing a [`RestartButton`] resets it and moves to [`Restartable::restart_state`].
pub trait Restartable: Resource {
    type State: States + FreelyMutableState;

    fn reset(&mut self);
    fn restart_state() -> Self::State;
}

pub fn handle_restart<T: Restartable>(
    mut next_state: ResMut<NextState<T::State>>,
    mut restartable: ResMut<T>,
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
) {
    if interaction_query
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        restartable.reset();
        next_state.set(T::restart_state());
        info!("Restart requested");
    }
}

/// Despawns every entity tagged with `M`, children included.
pub fn cleanup_marked<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;

    #[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
    enum TestState {
        #[default]
        Over,
        Running,
    }

    #[derive(Resource, Default)]
    struct Attempts(u32);

    impl Restartable for Attempts {
        type State = TestState;

        fn reset(&mut self) {
            self.0 += 1;
        }

        fn restart_state() -> TestState {
            TestState::Running
        }
    }

    #[derive(Component)]
    struct Disposable;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<TestState>()
            .init_resource::<Attempts>()
            .add_systems(Update, handle_restart::<Attempts>);
        app
    }

    #[test]
    fn pressing_restart_button_resets_and_switches_state() {
        let mut app = test_app();
        app.world_mut()
            .spawn((Button, Interaction::Pressed, RestartButton));

        app.update();
        app.update();

        assert_eq!(app.world().resource::<Attempts>().0, 1, "reset should run once");
        assert_eq!(
            *app.world().resource::<State<TestState>>().get(),
            TestState::Running,
            "state should follow the restart"
        );
    }

    #[test]
    fn hovering_restart_button_does_nothing() {
        let mut app = test_app();
        app.world_mut()
            .spawn((Button, Interaction::Hovered, RestartButton));

        app.update();

        assert_eq!(app.world().resource::<Attempts>().0, 0, "hover must not reset");
    }

    #[test]
    fn cleanup_only_removes_marked_entities() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, cleanup_marked::<Disposable>);
        let marked = app.world_mut().spawn(Disposable).id();
        let kept = app.world_mut().spawn_empty().id();

        app.update();

        assert!(app.world().get_entity(marked).is_err(), "marked entity survived");
        assert!(app.world().get_entity(kept).is_ok(), "unmarked entity was removed");
    }
}
