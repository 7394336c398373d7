//! Frame ordering for the whole game.
//!
//! Each `Update` is one simulation step, and the order matters: keys become actions, the body moves
//! and picks its animation, letter blocks fire, speech reacts to them, and only then does the camera
//! frame the body. The domain plugins attach to the `GameSet` chain configured here.

use bevy::prelude::*;

use crate::animation::AnimationPlugin;
use crate::camera::CameraPlugin;
use crate::input::InputPlugin;
use crate::letters::LettersPlugin;
use crate::level::LevelPlugin;
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::speech::SpeechPlugin;
use crate::state::{GameSet, GameState};
use crate::ui::UiPlugin;

/// Bundles every gameplay plugin into a single unit that can be added to the Bevy `App`.
pub struct AlphabetStairsPlugin;

impl Plugin for AlphabetStairsPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                LevelPlugin,     // Ground strip + letter staircase.
                PlayerPlugin,    // Character sprite loading and player spawning.
                InputPlugin,     // Keyboard → logical actions.
                MovementPlugin,  // Gravity, integration, platform contacts.
                AnimationPlugin, // Idle/walk/jump/fall frames.
                LettersPlugin,   // Rising-edge letter detection + highlight.
                SpeechPlugin,    // Cancel-then-speak letter clips.
                CameraPlugin,    // Viewport follow.
                UiPlugin,        // Loading overlay.
            ))
            // One pass through these sets is one simulation step:
            // Input → Movement (physics, animation) → Effects (letters, speech).
            // The camera runs after Effects so it frames the final position.
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Movement, GameSet::Effects)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::animation::{AnimationState, SpriteAnimator};
    use crate::camera::CameraView;
    use crate::letters::LetterLanded;
    use crate::level::ALPHABET;
    use crate::movement::Body;
    use crate::player::Player;
    use crate::speech::{LetterVoices, Pronunciation, Utterance};

    fn headless_app() -> App {
        let mut voices = LetterVoices::default();
        for letter in ALPHABET.chars() {
            voices.insert(letter, Handle::default());
        }

        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .insert_state(GameState::Playing)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins(AlphabetStairsPlugin)
            .insert_resource(voices);
        app
    }

    fn player_body(app: &mut App) -> Body {
        let mut query = app.world_mut().query_filtered::<&Body, With<Player>>();
        let bodies: Vec<Body> = query.iter(app.world()).cloned().collect();
        assert_eq!(bodies.len(), 1, "exactly one player is spawned");
        bodies[0].clone()
    }

    #[test]
    fn one_update_runs_the_whole_step_in_order() {
        let mut app = headless_app();
        // Startup builds the level and camera; entering Playing spawns the player on the ground.
        app.update();
        assert!(app.world().resource::<Pronunciation>().in_flight().is_none());

        // Drop the body towards the low 'P' block (x 1300, top 540) while walking right.
        {
            let mut query = app.world_mut().query_filtered::<&mut Body, With<Player>>();
            let mut body = query.single_mut(app.world_mut());
            body.x = 1242.0;
            body.y = 340.0;
            body.velocity_y = 10.0;
            body.is_grounded = false;
        }
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);

        let mut reader = app
            .world()
            .resource::<Events<LetterLanded>>()
            .get_reader();
        app.update();

        let body = player_body(&mut app);
        assert_eq!((body.x, body.y), (1250.0, 350.0));
        assert!(body.is_grounded);

        let events = app.world().resource::<Events<LetterLanded>>();
        let landed: Vec<char> = reader.read(events).map(|event| event.letter).collect();
        assert_eq!(landed, vec!['P']);

        let Some(utterance) = app.world().resource::<Pronunciation>().in_flight() else {
            panic!("the landing should be spoken in the same frame");
        };
        assert_eq!(
            app.world().get::<Utterance>(utterance).map(|u| u.letter),
            Some('P')
        );

        let mut expected = CameraView::default();
        expected.follow(&body, 3400.0);
        let view = *app.world().resource::<CameraView>();
        assert_eq!(view, expected);
        assert_eq!(view.y, 40.0);

        let mut query = app
            .world_mut()
            .query_filtered::<&SpriteAnimator, With<Player>>();
        let animator = query.single(app.world());
        assert_eq!(animator.state, AnimationState::Walk);
    }
}
