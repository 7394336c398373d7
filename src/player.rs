//! Player entity lifecycle: picks the character sprite, waits for it to load, then spawns the
//! simulated body at the level's spawn point.
//!
//! Which character is shown is plain configuration (`SelectedCharacter`) decided before the app
//! starts; nothing mutates it at runtime.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::animation::SpriteAnimator;
use crate::level::{world_to_translation, Level, LevelConfig};
use crate::movement::Body;
use crate::state::{GameSet, GameState};

/// Registers sprite loading, player spawning and the body → transform sync.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedCharacter>()
            .init_resource::<CharacterSprite>()
            .add_systems(OnEnter(GameState::Loading), load_character_sprite)
            .add_systems(
                Update,
                monitor_sprite_loading.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                sync_body_transform
                    .after(GameSet::Movement)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Marker component used by camera follow, physics and letter detection to find the player.
#[derive(Component)]
pub struct Player;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterProfile {
    pub id: String,
    pub name: String,
    pub sprite: String,
}

impl CharacterProfile {
    fn new(id: &str, name: &str, sprite: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            sprite: sprite.to_owned(),
        }
    }
}

/// Every playable character. The first entry is the default.
pub fn roster() -> Vec<CharacterProfile> {
    vec![
        CharacterProfile::new("bluey", "Bluey", "sprites/bluey-transparent.png"),
        CharacterProfile::new("bingo", "Bingo", "sprites/bingo-transparent.png"),
    ]
}

/// The character chosen for this run.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SelectedCharacter(pub CharacterProfile);

impl Default for SelectedCharacter {
    fn default() -> Self {
        let mut characters = roster();
        Self(characters.swap_remove(0))
    }
}

impl SelectedCharacter {
    pub fn by_id(id: &str) -> Option<Self> {
        roster()
            .into_iter()
            .find(|profile| profile.id.eq_ignore_ascii_case(id))
            .map(Self)
    }

    /// Reads the character id from the first argument after the program name. Unknown ids fall
    /// back to the default character.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let Some(requested) = args.into_iter().nth(1) else {
            return Self::default();
        };

        Self::by_id(&requested).unwrap_or_else(|| {
            warn!("Unknown character '{requested}'; using the default character.");
            Self::default()
        })
    }
}

#[derive(Resource, Default)]
pub struct CharacterSprite {
    pub image: Option<Handle<Image>>,
}

fn load_character_sprite(
    asset_server: Res<AssetServer>,
    selected: Res<SelectedCharacter>,
    mut sprite: ResMut<CharacterSprite>,
) {
    info!("Loading sprite for {} from {}", selected.0.name, selected.0.sprite);
    sprite.image = Some(asset_server.load(selected.0.sprite.clone()));
}

fn monitor_sprite_loading(
    asset_server: Res<AssetServer>,
    sprite: Res<CharacterSprite>,
    selected: Res<SelectedCharacter>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(handle) = sprite.image.as_ref() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            info!("Sprite for {} loaded", selected.0.name);
            next_state.set(GameState::Playing);
        }
        Some(LoadState::Failed(_)) => {
            warn!(
                "Unable to load sprite '{}'; continuing without a character image.",
                selected.0.sprite
            );
            next_state.set(GameState::Playing);
        }
        _ => {}
    }
}

fn spawn_player(
    mut commands: Commands,
    config: Res<LevelConfig>,
    sprite: Res<CharacterSprite>,
    selected: Res<SelectedCharacter>,
) {
    let spawn = Level::spawn_point(&config);
    let body = Body::new(spawn.x, spawn.y, config.player_width, config.player_height);
    let translation = world_to_translation(body.x, body.y, body.width, body.height, 1.0);

    commands.spawn((
        Name::new(format!("Player ({})", selected.0.name)),
        Player,
        SpriteBundle {
            texture: sprite.image.clone().unwrap_or_default(),
            sprite: Sprite {
                custom_size: Some(Vec2::new(body.width, body.height)),
                ..default()
            },
            transform: Transform::from_translation(translation),
            ..default()
        },
        SpriteAnimator::default(),
        body,
    ));
}

fn sync_body_transform(mut query: Query<(&Body, &mut Transform), With<Player>>) {
    for (body, mut transform) in &mut query {
        let z = transform.translation.z;
        transform.translation = world_to_translation(body.x, body.y, body.width, body.height, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn default_character_is_bluey() {
        assert_eq!(SelectedCharacter::default().0.id, "bluey");
    }

    #[test]
    fn character_comes_from_first_argument() {
        let selected = SelectedCharacter::from_args(args(&["alphabet_stairs", "Bingo"]));
        assert_eq!(selected.0.name, "Bingo");
        assert_eq!(selected.0.sprite, "sprites/bingo-transparent.png");
    }

    #[test]
    fn missing_or_unknown_argument_falls_back() {
        assert_eq!(
            SelectedCharacter::from_args(args(&["alphabet_stairs"])),
            SelectedCharacter::default()
        );
        assert_eq!(
            SelectedCharacter::from_args(args(&["alphabet_stairs", "muffin"])),
            SelectedCharacter::default()
        );
    }

    #[test]
    fn body_transform_tracks_the_simulation() {
        let mut app = App::new();
        app.add_systems(Update, sync_body_transform);

        let entity = app
            .world_mut()
            .spawn((
                Player,
                Body::new(50.0, 410.0, 180.0, 190.0),
                Transform::from_xyz(0.0, 0.0, 1.0),
            ))
            .id();
        app.update();

        let transform = app.world().get::<Transform>(entity).copied();
        assert_eq!(
            transform.map(|t| t.translation),
            Some(Vec3::new(140.0, -505.0, 1.0))
        );
    }
}
