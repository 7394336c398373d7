//! Platform geometry and the per-frame contact resolver.
//!
//! Platforms are resolved one at a time in the order the level lists them, and the first contact
//! ends the pass. Stair geometry is authored against that order, so the resolver never merges
//! simultaneous contacts.

use crate::movement::{Body, MovementSettings};

/// Static axis-aligned rectangle in y-down world pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// What the resolver did to the body this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contact {
    #[default]
    None,
    /// Bottom edge snapped onto a platform top (including small-gap snaps).
    Landed,
    /// Top edge snapped to a platform underside while rising.
    HeadBump,
}

/// Horizontal test used by both landing and letter detection: the body's centre ("foot point")
/// must lie inside the platform widened by `margin` on each side. Bounds are inclusive.
pub fn foot_overlaps(body: &Body, platform: &Platform, margin: f32) -> bool {
    let foot_x = body.foot_x();
    foot_x >= platform.x - margin && foot_x <= platform.right() + margin
}

/// Resolves the already-integrated body against `platforms`. `previous_y` is the body's top edge
/// before this frame's integration. Grounded state is rebuilt from scratch.
pub fn resolve_platforms<'a>(
    body: &mut Body,
    previous_y: f32,
    platforms: impl IntoIterator<Item = &'a Platform>,
    settings: &MovementSettings,
) -> Contact {
    body.is_grounded = false;

    let previous_bottom = previous_y + body.height;
    let previous_top = previous_y;

    for platform in platforms {
        if !foot_overlaps(body, platform, settings.foot_margin) {
            continue;
        }

        let current_bottom = body.bottom();
        if body.velocity_y >= 0.0
            && previous_bottom <= platform.top()
            && current_bottom >= platform.top()
        {
            body.land_on(platform);
            return Contact::Landed;
        }

        let current_top = body.y;
        if body.velocity_y < 0.0
            && previous_top >= platform.bottom()
            && current_top <= platform.bottom()
        {
            body.y = platform.bottom();
            body.velocity_y = 0.0;
            return Contact::HeadBump;
        }

        let gap = platform.top() - current_bottom;
        if gap > 0.0 && gap <= settings.snap_gap && body.velocity_y >= 0.0 {
            body.land_on(platform);
            return Contact::Landed;
        }
    }

    Contact::None
}
