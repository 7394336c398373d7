//! Logical input actions. Keyboard state is folded into a small `InputState` resource once per
//! frame so the physics step never touches raw key codes.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::state::{GameSet, GameState};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<KeyBindings>()
            .add_systems(
                Update,
                collect_keyboard_input
                    .in_set(GameSet::Input)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::MoveLeft, Action::MoveRight, Action::Jump];

    fn slot(self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
            Action::Jump => 2,
        }
    }
}

/// Pressed/released status of every logical action for the current frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 3],
}

impl InputState {
    pub fn is_pressed(&self, action: Action) -> bool {
        self.held[action.slot()]
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        self.held[action.slot()] = pressed;
    }

    #[cfg(test)]
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }
}

/// Key to action table. Several keys may feed the same action.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub bindings: Vec<(KeyCode, Action)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyCode::ArrowLeft, Action::MoveLeft),
                (KeyCode::KeyA, Action::MoveLeft),
                (KeyCode::ArrowRight, Action::MoveRight),
                (KeyCode::KeyD, Action::MoveRight),
                (KeyCode::KeyW, Action::Jump),
                (KeyCode::Space, Action::Jump),
                (KeyCode::ArrowUp, Action::Jump),
            ],
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(key, _)| *key)
    }
}

fn collect_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<InputState>,
) {
    for action in Action::ALL {
        let held = bindings.keys_for(action).any(|key| keyboard.pressed(key));
        input.set(action, held);
    }
}
