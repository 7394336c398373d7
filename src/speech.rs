//! Letter pronunciation. Each letter has a short voice clip; landing on a block plays it.
//!
//! At most one utterance is ever in flight. A new landing cancels whatever is still playing and
//! then starts its own clip, so the newest letter always wins and nothing queues up behind it.

use std::collections::HashMap;

use bevy::audio::{AudioSink, AudioSinkPlayback};
use bevy::prelude::*;

use crate::letters::{LetterDetection, LetterLanded};
use crate::level::ALPHABET;
use crate::state::{GameSet, GameState};

/// Playback speed for voice clips.
const SPEECH_RATE: f32 = 1.2;

pub struct SpeechPlugin;

impl Plugin for SpeechPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LetterVoices>()
            .init_resource::<Pronunciation>()
            .add_systems(OnEnter(GameState::Loading), load_letter_voices)
            .add_systems(
                Update,
                pronounce_letters
                    .in_set(GameSet::Effects)
                    .after(LetterDetection)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// One voice clip handle per letter. Holding the handles keeps the decoded audio alive.
#[derive(Resource, Default)]
pub struct LetterVoices {
    clips: HashMap<char, Handle<AudioSource>>,
}

impl LetterVoices {
    pub fn insert(&mut self, letter: char, clip: Handle<AudioSource>) {
        self.clips.insert(letter.to_ascii_uppercase(), clip);
    }

    pub fn get(&self, letter: char) -> Option<&Handle<AudioSource>> {
        self.clips.get(&letter.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }
}

pub fn voice_path(letter: char) -> String {
    format!("voices/{}.ogg", letter.to_ascii_lowercase())
}

/// Tracks the single outstanding utterance.
#[derive(Resource, Debug, Default)]
pub struct Pronunciation {
    in_flight: Option<Entity>,
}

impl Pronunciation {
    /// Forgets the current utterance and hands it back so the caller can stop it.
    pub fn cancel(&mut self) -> Option<Entity> {
        self.in_flight.take()
    }

    pub fn speak(&mut self, utterance: Entity) {
        self.in_flight = Some(utterance);
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<Entity> {
        self.in_flight
    }
}

/// Marks an audio entity as a spoken letter.
#[derive(Component, Debug, Clone, Copy)]
pub struct Utterance {
    pub letter: char,
}

fn load_letter_voices(asset_server: Res<AssetServer>, mut voices: ResMut<LetterVoices>) {
    for letter in ALPHABET.chars() {
        voices.insert(letter, asset_server.load(voice_path(letter)));
    }

    info!(
        "Queued {} letter voice clips from assets/voices/.",
        voices.len()
    );
}

fn pronounce_letters(
    mut commands: Commands,
    mut landed: EventReader<LetterLanded>,
    voices: Res<LetterVoices>,
    mut speech: ResMut<Pronunciation>,
    playing: Query<(&Utterance, Option<&AudioSink>)>,
) {
    for event in landed.read() {
        if let Some(previous) = speech.cancel() {
            if let Ok((utterance, sink)) = playing.get(previous) {
                debug!("Cancelling '{}'", utterance.letter);
                if let Some(sink) = sink {
                    sink.stop();
                }
            }
            // The clip may already have finished and despawned itself.
            commands.add(move |world: &mut World| {
                if world.get_entity(previous).is_some() {
                    world.despawn(previous);
                }
            });
        }

        let Some(clip) = voices.get(event.letter) else {
            warn!("No voice clip for letter '{}'", event.letter);
            continue;
        };

        let utterance = commands
            .spawn((
                Name::new(format!("Utterance {}", event.letter)),
                Utterance {
                    letter: event.letter,
                },
                AudioBundle {
                    source: clip.clone(),
                    settings: PlaybackSettings::DESPAWN.with_speed(SPEECH_RATE),
                },
            ))
            .id();
        speech.speak(utterance);

        info!("Speaking: {}", event.letter);
    }
}
