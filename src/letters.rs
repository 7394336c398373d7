//! Letter blocks: rising-edge detection of the player standing on a block, and the highlight that
//! shows which block is being touched.
//!
//! Detection uses its own, looser predicate than the landing test so a block still counts as
//! "stood on" for the frame in which the body settles onto it.

use bevy::prelude::*;

use crate::collision::{foot_overlaps, Platform};
use crate::level::{Level, LetterBlockSprite};
use crate::movement::{Body, MovementSettings};
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct LettersPlugin;

impl Plugin for LettersPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LetterLanded>().add_systems(
            Update,
            (
                detect_letter_landings
                    .in_set(GameSet::Effects)
                    .in_set(LetterDetection),
                paint_letter_blocks.after(GameSet::Effects),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Label for the detector so consumers of `LetterLanded` can run after it in the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LetterDetection;

/// Fired once when the player newly stands on a letter block.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterLanded {
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterPlatform {
    pub platform: Platform,
    pub letter: char,
    /// Highlight flag for the current frame; cleared after painting.
    pub is_colliding: bool,
    /// Whether the player was already on this block. Persists across frames.
    pub player_on: bool,
}

impl LetterPlatform {
    pub const IDLE_COLOR: Color = Color::srgb(1.0, 0.42, 0.616);
    pub const HIGHLIGHT_COLOR: Color = Color::srgb(1.0, 0.843, 0.0);

    pub fn new(platform: Platform, letter: char) -> Self {
        Self {
            platform,
            letter,
            is_colliding: false,
            player_on: false,
        }
    }

    /// Feeds this frame's touch result. Returns true only on the transition from not touching to
    /// touching; `player_on` must drop back to false before the block can fire again.
    pub fn observe(&mut self, colliding: bool) -> bool {
        if !colliding {
            self.player_on = false;
            return false;
        }

        self.is_colliding = true;
        if self.player_on {
            return false;
        }
        self.player_on = true;
        true
    }
}

/// Foot-point overlap, bottom edge no more than `letter_tolerance` below the top, and the projected
/// next bottom edge reaching the top.
pub fn touches_letter(body: &Body, platform: &Platform, settings: &MovementSettings) -> bool {
    let bottom = body.bottom();
    foot_overlaps(body, platform, settings.foot_margin)
        && bottom <= platform.top() + settings.letter_tolerance
        && bottom + body.velocity_y >= platform.top()
}

impl Level {
    /// Runs the rising-edge detector over every letter block and returns the letters to speak,
    /// in block order.
    pub fn detect_letter_landings(
        &mut self,
        body: &Body,
        settings: &MovementSettings,
    ) -> Vec<char> {
        self.letters
            .iter_mut()
            .filter_map(|block| {
                let colliding = touches_letter(body, &block.platform, settings);
                block.observe(colliding).then_some(block.letter)
            })
            .collect()
    }
}

fn detect_letter_landings(
    settings: Res<MovementSettings>,
    mut level: ResMut<Level>,
    player_query: Query<&Body, With<Player>>,
    mut landed: EventWriter<LetterLanded>,
) {
    let Ok(body) = player_query.get_single() else {
        return;
    };

    for letter in level.detect_letter_landings(body, &settings) {
        debug!("Landed on letter block {letter}");
        landed.send(LetterLanded { letter });
    }
}

fn paint_letter_blocks(
    mut level: ResMut<Level>,
    mut sprites: Query<(&LetterBlockSprite, &mut Sprite)>,
) {
    for (link, mut sprite) in &mut sprites {
        let Some(block) = level.letters.get(link.index) else {
            continue;
        };
        sprite.color = if block.is_colliding {
            LetterPlatform::HIGHLIGHT_COLOR
        } else {
            LetterPlatform::IDLE_COLOR
        };
    }

    for block in &mut level.letters {
        block.is_colliding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_a() -> LetterPlatform {
        LetterPlatform::new(Platform::new(100.0, 500.0, 100.0, 100.0), 'A')
    }

    fn standing_on(platform: &Platform) -> Body {
        let mut body = Body::new(platform.x, 0.0, 180.0, 190.0);
        body.y = platform.top() - body.height;
        body.is_grounded = true;
        body
    }

    #[test]
    fn continuous_stand_fires_once() {
        let mut block = block_a();
        let fired: u32 = (0..60).map(|_| block.observe(true) as u32).sum();
        assert_eq!(fired, 1);
        assert!(block.player_on);
        assert!(block.is_colliding);
    }

    #[test]
    fn leaving_rearms_the_block() {
        let mut block = block_a();
        assert!(block.observe(true));
        assert!(!block.observe(true));
        assert!(!block.observe(false));
        assert!(!block.player_on);
        assert!(block.observe(true));
    }

    #[test]
    fn standing_body_touches_block() {
        let settings = MovementSettings::default();
        let block = block_a();
        let body = standing_on(&block.platform);
        assert!(touches_letter(&body, &block.platform, &settings));
    }

    #[test]
    fn touch_allows_sinking_within_tolerance() {
        let settings = MovementSettings::default();
        let block = block_a();
        let mut body = standing_on(&block.platform);
        body.y += 10.0;
        assert!(touches_letter(&body, &block.platform, &settings));
        body.y += 1.0;
        assert!(!touches_letter(&body, &block.platform, &settings));
    }

    #[test]
    fn touch_uses_projected_bottom_edge() {
        let settings = MovementSettings::default();
        let block = block_a();
        let mut body = standing_on(&block.platform);
        body.y -= 20.0;
        body.velocity_y = 19.0;
        assert!(!touches_letter(&body, &block.platform, &settings));
        body.velocity_y = 20.0;
        assert!(touches_letter(&body, &block.platform, &settings));
    }

    #[test]
    fn touch_respects_foot_margin() {
        let settings = MovementSettings::default();
        let block = block_a();
        let mut body = standing_on(&block.platform);
        body.x = block.platform.x - settings.foot_margin - body.width / 2.0;
        assert!(touches_letter(&body, &block.platform, &settings));
        body.x -= 1.0;
        assert!(!touches_letter(&body, &block.platform, &settings));
    }

    #[test]
    fn level_reports_only_new_landings() {
        let settings = MovementSettings::default();
        let mut level = Level {
            platforms: vec![],
            letters: vec![
                block_a(),
                LetterPlatform::new(Platform::new(600.0, 500.0, 100.0, 100.0), 'B'),
            ],
        };
        let body = standing_on(&level.letters[0].platform);

        assert_eq!(level.detect_letter_landings(&body, &settings), vec!['A']);
        assert!(level.detect_letter_landings(&body, &settings).is_empty());
        assert!(!level.letters[1].player_on);
    }

    #[test]
    fn detection_system_sends_one_event_per_landing() {
        let mut app = App::new();
        app.add_event::<LetterLanded>()
            .init_resource::<MovementSettings>()
            .insert_resource(Level {
                platforms: vec![],
                letters: vec![block_a()],
            })
            .add_systems(Update, (detect_letter_landings, paint_letter_blocks).chain());

        let body = standing_on(&block_a().platform);
        app.world_mut().spawn((Player, body));

        let mut reader = app
            .world()
            .resource::<Events<LetterLanded>>()
            .get_reader();

        let mut spoken = Vec::new();
        for _ in 0..5 {
            app.update();
            let events = app.world().resource::<Events<LetterLanded>>();
            spoken.extend(reader.read(events).map(|event| event.letter));
        }

        assert_eq!(spoken, vec!['A']);
        let level = app.world().resource::<Level>();
        assert!(level.letters[0].player_on);
        assert!(!level.letters[0].is_colliding, "highlight is cleared after painting");
    }
}
