//! Camera follow. The visible viewport is recomputed from scratch every frame from the player's
//! body; there is no smoothing, so the camera never lags or overshoots.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::movement::{Body, WorldBounds};
use crate::player::Player;
use crate::state::GameSet;

/// Registers the viewport resource and the follow system.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraView>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                follow_player_camera
                    .after(GameSet::Effects) // frame the body after the whole step has run
                    .run_if(has_player_and_camera),
            );
    }
}

/// Marker component so the follow system can locate the camera entity without relying on names.
#[derive(Component)]
pub struct FollowCamera;

/// Visible viewport in y-down world pixels: top-left corner plus size.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new(1280.0, 620.0)
    }
}

impl CameraView {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Keeps the body a third of the way in from the left edge and vertically centred. The left
    /// and top edges never pass 0 and the right edge never passes the world width; the bottom is
    /// unclamped.
    pub fn follow(&mut self, body: &Body, world_width: f32) {
        self.x = (body.x - self.width / 3.0).max(0.0);
        self.x = self.x.min(world_width - self.width);
        self.y = (body.y - self.height / 2.0).max(0.0);
    }

    /// Translation for a Bevy camera whose projection is centred on the view.
    pub fn camera_translation(&self, z: f32) -> Vec3 {
        Vec3::new(
            self.x + self.width * 0.5,
            -(self.y + self.height * 0.5),
            z,
        )
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2dBundle::default(),
        FollowCamera,
    ));
}

/// Run condition that only schedules the follow system when both a player and camera exist.
fn has_player_and_camera(
    player_query: Query<Entity, With<Player>>,
    camera_query: Query<Entity, With<FollowCamera>>,
) -> bool {
    !player_query.is_empty() && !camera_query.is_empty()
}

fn follow_player_camera(
    mut view: ResMut<CameraView>,
    bounds: Res<WorldBounds>,
    mut camera_query: Query<&mut Transform, With<FollowCamera>>,
    player_query: Query<&Body, With<Player>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(body) = player_query.get_single() else {
        return;
    };

    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    if let Ok(window) = window_query.get_single() {
        let (width, height) = (window.resolution.width(), window.resolution.height());
        if width > 0.0 && height > 0.0 && (width, height) != (view.width, view.height) {
            debug!("Viewport resized to {width}x{height}");
            view.resize(width, height);
        }
    }

    view.follow(body, bounds.width);
    camera_transform.translation = view.camera_translation(camera_transform.translation.z);
}
