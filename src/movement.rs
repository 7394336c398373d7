//! Player kinematics. One call to [`step_body`] is one simulation frame: input sets horizontal
//! velocity, gravity accumulates, position integrates, and the contact resolver snaps the body onto
//! (or under) the level's platforms.
//!
//! Units are pixels and pixels-per-frame in y-down world space. The step is not scaled by frame
//! time, so simulation speed follows the display refresh rate.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::{resolve_platforms, Contact, Platform};
use crate::input::{Action, InputState};
use crate::level::Level;
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementSettings>()
            .init_resource::<WorldBounds>()
            .add_systems(
                Update,
                apply_kinematics
                    .in_set(GameSet::Movement)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub gravity: f32,
    pub jump_power: f32,
    pub move_speed: f32,
    /// Horizontal leniency on each side of a platform for the foot-point test.
    pub foot_margin: f32,
    /// Largest hover gap (exclusive of zero) that still snaps the body down onto a platform.
    pub snap_gap: f32,
    /// How far below the canvas the body may fall before it respawns.
    pub respawn_margin: f32,
    /// Vertical slack for the letter-block touch test.
    pub letter_tolerance: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_power: 15.0,
            move_speed: 8.0,
            foot_margin: 12.0,
            snap_gap: 4.0,
            respawn_margin: 100.0,
            letter_tolerance: 10.0,
        }
    }
}

/// Playable extents. Only the horizontal range is clamped; the vertical limit triggers respawn.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub width: f32,
    pub canvas_height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 3400.0,
            canvas_height: 620.0,
        }
    }
}

/// Physically simulated player body. `(x, y)` is the top-left corner in y-down world pixels.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub is_grounded: bool,
    /// Input latch: set by a jump, cleared once no jump key is held.
    pub is_jumping: bool,
    pub facing_right: bool,
    pub start_x: f32,
    pub start_y: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity_x: 0.0,
            velocity_y: 0.0,
            is_grounded: false,
            is_jumping: false,
            facing_right: true,
            start_x: x,
            start_y: y,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn foot_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub(crate) fn land_on(&mut self, platform: &Platform) {
        self.y = platform.top() - self.height;
        self.velocity_y = 0.0;
        self.is_grounded = true;
    }

    pub fn respawn(&mut self) {
        self.x = self.start_x;
        self.y = self.start_y;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.is_jumping = false;
        self.is_grounded = false;
    }
}

/// Summary of one step, used for logging and by callers that care about transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub contact: Contact,
    pub jumped: bool,
    pub respawned: bool,
}

/// Advances `body` by one frame against `platforms`, tested in iteration order.
pub fn step_body<'a>(
    body: &mut Body,
    input: &InputState,
    platforms: impl IntoIterator<Item = &'a Platform>,
    settings: &MovementSettings,
    bounds: &WorldBounds,
) -> StepReport {
    let mut report = StepReport::default();

    body.velocity_x = 0.0;
    if input.is_pressed(Action::MoveLeft) {
        body.velocity_x = -settings.move_speed;
        body.facing_right = false;
    }
    if input.is_pressed(Action::MoveRight) {
        body.velocity_x = settings.move_speed;
        body.facing_right = true;
    }

    body.velocity_y += settings.gravity;

    let previous_y = body.y;
    body.x += body.velocity_x;
    body.y += body.velocity_y;

    report.contact = resolve_platforms(body, previous_y, platforms, settings);

    let jump_held = input.is_pressed(Action::Jump);
    if jump_held && body.is_grounded && !body.is_jumping {
        body.velocity_y = -settings.jump_power;
        body.is_jumping = true;
        body.is_grounded = false;
        report.jumped = true;
    }
    if !jump_held {
        body.is_jumping = false;
    }

    if body.x < 0.0 {
        body.x = 0.0;
    }
    if body.x + body.width > bounds.width {
        body.x = bounds.width - body.width;
    }

    if body.y > bounds.canvas_height + settings.respawn_margin {
        body.respawn();
        report.respawned = true;
    }

    report
}

pub(crate) fn apply_kinematics(
    input: Res<InputState>,
    settings: Res<MovementSettings>,
    bounds: Res<WorldBounds>,
    level: Res<Level>,
    mut query: Query<&mut Body, With<Player>>,
) {
    for mut body in &mut query {
        let was_grounded = body.is_grounded;
        let report = step_body(
            &mut body,
            &input,
            level.collision_order(),
            &settings,
            &bounds,
        );

        if report.jumped {
            debug!("Jump from ({:.1}, {:.1})", body.x, body.y);
        } else if report.contact == Contact::Landed && !was_grounded {
            debug!("Landed at ({:.1}, {:.1})", body.x, body.y);
        }

        if report.respawned {
            warn!(
                "Player fell below the world; respawning at ({}, {})",
                body.start_x, body.start_y
            );
        }
    }
}
