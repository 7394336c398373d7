//! Level construction: the ground strip plus a cycling staircase of letter blocks.
//!
//! The `Level` resource owns every platform and fixes the order the contact resolver sees them in:
//! ground first, then letter blocks in the order they were laid out. Sprites spawned here are pure
//! presentation and never feed back into the simulation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::Platform;
use crate::letters::LetterPlatform;
use crate::movement::WorldBounds;

/// Builds the reference level at startup and spawns its sprites.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelConfig>()
            .add_systems(Startup, setup_level);
    }
}

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const GROUND_COLOR: Color = Color::srgb(0.204, 0.698, 0.2);

/// Layout constants for the procedurally generated staircase.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub ground_y: f32,
    pub ground_height: f32,
    pub block_width: f32,
    pub block_height: f32,
    /// Horizontal distance between consecutive stair blocks.
    pub stair_spacing: f32,
    pub stair_count: usize,
    pub first_stair_x: f32,
    /// Once a block top would rise above this y, the staircase drops back into a valley.
    pub stair_ceiling: f32,
    /// Valley blocks sit this far above the ground.
    pub valley_rise: f32,
    pub spawn_x: f32,
    pub player_width: f32,
    pub player_height: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            ground_y: 600.0,
            ground_height: 50.0,
            block_width: 100.0,
            block_height: 100.0,
            stair_spacing: 80.0,
            stair_count: 40,
            first_stair_x: 100.0,
            stair_ceiling: 100.0,
            valley_rise: 60.0,
            spawn_x: 50.0,
            player_width: 180.0,
            player_height: 190.0,
        }
    }
}

/// Ordered platform list for the running level.
#[derive(Resource, Debug, Clone, Default)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub letters: Vec<LetterPlatform>,
}

impl Level {
    /// Platforms in the order the contact resolver must test them.
    pub fn collision_order(&self) -> impl Iterator<Item = &Platform> + '_ {
        self.platforms
            .iter()
            .chain(self.letters.iter().map(|letter| &letter.platform))
    }

    pub fn spawn_point(config: &LevelConfig) -> Vec2 {
        Vec2::new(config.spawn_x, config.ground_y - config.player_height)
    }
}

/// Ground strip spanning the world plus `stair_count` letter blocks cycling through the alphabet.
/// Each block steps right and one block height up; when the top would pass the ceiling the
/// next block restarts low, creating a valley.
pub fn build_reference_level(config: &LevelConfig, bounds: &WorldBounds) -> Level {
    let ground = Platform::new(0.0, config.ground_y, bounds.width, config.ground_height);

    let mut letters = Vec::with_capacity(config.stair_count);
    let mut stair_x = config.first_stair_x;
    let mut stair_top = config.ground_y - config.block_height;

    for letter in ALPHABET.chars().cycle().take(config.stair_count) {
        letters.push(LetterPlatform::new(
            Platform::new(stair_x, stair_top, config.block_width, config.block_height),
            letter,
        ));

        stair_x += config.stair_spacing;
        stair_top -= config.block_height;
        if stair_top < config.stair_ceiling {
            stair_top = config.ground_y - config.valley_rise;
        }
    }

    Level {
        platforms: vec![ground],
        letters,
    }
}

/// Converts a y-down world rectangle into the centre translation Bevy's y-up sprites expect.
pub fn world_to_translation(x: f32, y: f32, width: f32, height: f32, z: f32) -> Vec3 {
    Vec3::new(x + width * 0.5, -(y + height * 0.5), z)
}

/// Links a block sprite back to its entry in `Level::letters`.
#[derive(Component, Debug, Clone, Copy)]
pub struct LetterBlockSprite {
    pub index: usize,
}

fn setup_level(mut commands: Commands, config: Res<LevelConfig>, bounds: Res<WorldBounds>) {
    let level = build_reference_level(&config, &bounds);
    info!(
        "Built level: {} ground platform(s), {} letter blocks",
        level.platforms.len(),
        level.letters.len()
    );

    commands
        .spawn((Name::new("Level"), SpatialBundle::default()))
        .with_children(|parent| {
            for platform in &level.platforms {
                parent.spawn((
                    Name::new("Ground"),
                    SpriteBundle {
                        sprite: Sprite {
                            color: GROUND_COLOR,
                            custom_size: Some(Vec2::new(platform.width, platform.height)),
                            ..default()
                        },
                        transform: Transform::from_translation(world_to_translation(
                            platform.x,
                            platform.y,
                            platform.width,
                            platform.height,
                            0.0,
                        )),
                        ..default()
                    },
                ));
            }

            for (index, block) in level.letters.iter().enumerate() {
                let platform = block.platform;
                parent
                    .spawn((
                        Name::new(format!("LetterBlock {}", block.letter)),
                        LetterBlockSprite { index },
                        SpriteBundle {
                            sprite: Sprite {
                                color: LetterPlatform::IDLE_COLOR,
                                custom_size: Some(Vec2::new(platform.width, platform.height)),
                                ..default()
                            },
                            transform: Transform::from_translation(world_to_translation(
                                platform.x,
                                platform.y,
                                platform.width,
                                platform.height,
                                0.5,
                            )),
                            ..default()
                        },
                    ))
                    .with_children(|block_parent| {
                        block_parent.spawn(Text2dBundle {
                            text: Text::from_section(
                                block.letter.to_string(),
                                TextStyle {
                                    font_size: 32.0,
                                    color: Color::WHITE,
                                    ..default()
                                },
                            ),
                            transform: Transform::from_xyz(0.0, 0.0, 0.1),
                            ..default()
                        });
                    });
            }
        });

    commands.insert_resource(level);
}
