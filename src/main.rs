//! Application entry point: composes the Bevy runtime, core plugins, and window configuration.
//!
//! The game itself lives in `AlphabetStairsPlugin` (see `app.rs`); this file only decides which
//! character to show and how the window and asset loading are set up for desktop vs web.

mod animation;
mod app;
mod camera;
mod collision;
mod input;
mod letters;
mod level;
mod movement;
mod player;
mod speech;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::AlphabetStairsPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::render::texture::ImagePlugin;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};
use player::SelectedCharacter;

const SKY_BLUE: Color = Color::srgb(0.529, 0.808, 0.922);

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    let character = SelectedCharacter::from_args(std::env::args());

    // The logical resolution matches the reference 1280×620 canvas so world pixels map 1:1 to
    // screen pixels. Resizing is allowed; the camera view follows the window size.
    let primary_window = Window {
        title: "Alphabet Stairs".to_string(),
        resolution: WindowResolution::new(1280.0, 620.0),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: 320.0,
            min_height: 240.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#gameCanvas".to_owned()),
        fit_canvas_to_parent: cfg!(all(target_arch = "wasm32", feature = "web")),
        ..default()
    };

    let mut default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(ImagePlugin::default_nearest());

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    App::new()
        .insert_resource(ClearColor(SKY_BLUE))
        .insert_resource(character)
        .add_plugins(default_plugins)
        .add_plugins(AlphabetStairsPlugin)
        .run();
}
