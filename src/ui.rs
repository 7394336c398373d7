//! Loading overlay shown while the character sprite is being fetched.
//!
//! UI entities are part of Bevy's ECS; once despawned, all associated style/text components are
//! dropped automatically.

use bevy::prelude::*;

use crate::player::SelectedCharacter;
use crate::state::GameState;

/// Registers loading overlay spawn/despawn systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), spawn_loading_screen)
            .add_systems(OnExit(GameState::Loading), despawn_loading_screen);
    }
}

#[derive(Component)]
struct LoadingScreen;

fn loading_message(character: &SelectedCharacter) -> String {
    format!("Loading {} Sprite...", character.0.name)
}

/// Spawns a full-screen dimmed node with centered text.
fn spawn_loading_screen(mut commands: Commands, selected: Res<SelectedCharacter>) {
    commands
        .spawn((
            LoadingScreen,
            Name::new("LoadingScreen"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                loading_message(&selected),
                TextStyle {
                    font_size: 24.0,
                    color: Color::WHITE,
                    ..default()
                },
            ));
        });
}

fn despawn_loading_screen(mut commands: Commands, query: Query<Entity, With<LoadingScreen>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
