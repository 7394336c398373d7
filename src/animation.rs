//! Animation state for the player sprite.
//!
//! The state is never stored as an independent source of truth: it is re-derived from `Body`
//! every frame, and the animator only remembers which sheet frame of that state is showing.
//!
//! Frame indices only reach sprites that carry a `TextureAtlas`. The character images are single
//! pictures drawn whole, so for them the animator just drives the horizontal flip.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{apply_kinematics, Body};
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationSettings>().add_systems(
            Update,
            animate_player
                .in_set(GameSet::Movement)
                .after(apply_kinematics)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Updates between sheet frame advances.
    pub frame_delay: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { frame_delay: 8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Jump,
    Fall,
}

impl AnimationState {
    /// Sprite sheet frames for each state, in playback order.
    pub fn frames(self) -> &'static [usize] {
        match self {
            AnimationState::Idle => &[0],
            AnimationState::Walk => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            AnimationState::Jump => &[13, 14],
            AnimationState::Fall => &[15],
        }
    }
}

/// Airborne bodies rise (`Jump`) or fall (`Fall`); grounded ones walk while moving.
pub fn select_animation(body: &Body) -> AnimationState {
    if !body.is_grounded {
        if body.velocity_y < 0.0 {
            AnimationState::Jump
        } else {
            AnimationState::Fall
        }
    } else if body.velocity_x != 0.0 {
        AnimationState::Walk
    } else {
        AnimationState::Idle
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteAnimator {
    pub state: AnimationState,
    pub frame_index: usize,
    pub counter: u32,
}

impl SpriteAnimator {
    /// Switching state restarts the new animation from its first frame. No blending.
    pub fn set_state(&mut self, state: AnimationState) {
        if self.state != state {
            self.state = state;
            self.frame_index = 0;
            self.counter = 0;
        }
    }

    pub fn tick(&mut self, frame_delay: u32) {
        self.counter += 1;
        if self.counter >= frame_delay {
            self.counter = 0;
            self.frame_index = (self.frame_index + 1) % self.state.frames().len();
        }
    }

    pub fn sprite_frame(&self) -> usize {
        self.state.frames()[self.frame_index]
    }
}

fn animate_player(
    settings: Res<AnimationSettings>,
    mut query: Query<
        (
            &Body,
            &mut SpriteAnimator,
            &mut Sprite,
            Option<&mut TextureAtlas>,
        ),
        With<Player>,
    >,
) {
    for (body, mut animator, mut sprite, atlas) in &mut query {
        animator.set_state(select_animation(body));
        animator.tick(settings.frame_delay);

        if let Some(mut atlas) = atlas {
            atlas.index = animator.sprite_frame();
        }
        sprite.flip_x = !body.facing_right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(grounded: bool, velocity_x: f32, velocity_y: f32) -> Body {
        let mut body = Body::new(0.0, 0.0, 180.0, 190.0);
        body.is_grounded = grounded;
        body.velocity_x = velocity_x;
        body.velocity_y = velocity_y;
        body
    }

    #[test]
    fn selection_follows_body_state() {
        assert_eq!(select_animation(&body(false, 0.0, -3.0)), AnimationState::Jump);
        assert_eq!(select_animation(&body(false, 8.0, 0.0)), AnimationState::Fall);
        assert_eq!(select_animation(&body(false, 0.0, 5.0)), AnimationState::Fall);
        assert_eq!(select_animation(&body(true, -8.0, 0.0)), AnimationState::Walk);
        assert_eq!(select_animation(&body(true, 0.0, 0.0)), AnimationState::Idle);
    }

    #[test]
    fn frames_advance_every_nth_tick_and_wrap() {
        let mut animator = SpriteAnimator::default();
        animator.set_state(AnimationState::Jump);

        for _ in 0..7 {
            animator.tick(8);
        }
        assert_eq!(animator.sprite_frame(), 13);
        animator.tick(8);
        assert_eq!(animator.sprite_frame(), 14);
        assert_eq!(animator.counter, 0);

        for _ in 0..8 {
            animator.tick(8);
        }
        assert_eq!(animator.sprite_frame(), 13);
    }

    #[test]
    fn changing_state_restarts_the_cycle() {
        let mut animator = SpriteAnimator::default();
        animator.set_state(AnimationState::Walk);
        for _ in 0..20 {
            animator.tick(8);
        }
        assert_eq!(animator.frame_index, 2);
        assert_eq!(animator.counter, 4);

        animator.set_state(AnimationState::Walk);
        assert_eq!(animator.frame_index, 2);

        animator.set_state(AnimationState::Fall);
        assert_eq!(animator.frame_index, 0);
        assert_eq!(animator.counter, 0);
        assert_eq!(animator.sprite_frame(), 15);
    }

    #[test]
    fn single_frame_animations_stay_put() {
        let mut animator = SpriteAnimator::default();
        for _ in 0..100 {
            animator.tick(8);
        }
        assert_eq!(animator.sprite_frame(), 0);
    }

    #[test]
    fn atlas_index_follows_the_animator_and_plain_sprites_only_flip() {
        let mut app = App::new();
        app.init_resource::<AnimationSettings>()
            .add_systems(Update, animate_player);

        let mut walking = Body::new(0.0, 0.0, 180.0, 190.0);
        walking.is_grounded = true;
        walking.velocity_x = -8.0;
        walking.facing_right = false;

        let sheet = app
            .world_mut()
            .spawn((
                Player,
                walking.clone(),
                SpriteAnimator::default(),
                Sprite::default(),
                TextureAtlas::default(),
            ))
            .id();
        let plain = app
            .world_mut()
            .spawn((Player, walking, SpriteAnimator::default(), Sprite::default()))
            .id();

        for _ in 0..8 {
            app.update();
        }

        let atlas_index = app.world().get::<TextureAtlas>(sheet).map(|atlas| atlas.index);
        assert_eq!(atlas_index, Some(2));
        assert_eq!(app.world().get::<Sprite>(sheet).map(|s| s.flip_x), Some(true));

        assert!(app.world().get::<TextureAtlas>(plain).is_none());
        assert_eq!(app.world().get::<Sprite>(plain).map(|s| s.flip_x), Some(true));
        assert_eq!(
            app.world().get::<SpriteAnimator>(plain).map(|a| a.state),
            Some(AnimationState::Walk)
        );
    }
}
