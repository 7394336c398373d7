//! Global game state definitions. States are stored by Bevy as a plain enum resource; switching
//! states updates the value and triggers the on-enter/on-exit schedules.

use bevy::prelude::*;

/// High-level state machine for the game loop. The game never pauses: once the character sprite is
/// ready it stays in `Playing` until the host stops scheduling frames.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Named system sets to structure the Update schedule. One pass through the chain is one
/// simulation step.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Key state is folded into `InputState`.
    Input,
    /// Physics, collision and animation state.
    Movement,
    /// Letter triggers and pronunciation.
    Effects,
}
