use serde::{Deserialize, Serialize};

use super::Vec2;

/// Vertical distance between a player's position and its name tag.
pub const NAME_TAG_RISE_PX: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn half_width(&self) -> f32 {
        self.width as f32 * 0.5
    }
}

/// Server x coordinates are centred on the viewport; screen x starts at the
/// left edge. The local player is already camera-relative and never goes
/// through this conversion.
pub fn world_to_screen_x(world_x: f32, viewport: Viewport) -> f32 {
    world_x + viewport.half_width()
}

pub fn screen_to_world_x(screen_x: f32, viewport: Viewport) -> f32 {
    screen_x - viewport.half_width()
}

pub fn world_to_screen(world: Vec2, viewport: Viewport) -> Vec2 {
    Vec2 {
        x: world_to_screen_x(world.x, viewport),
        y: world.y,
    }
}

pub fn name_tag_anchor(world: Vec2, viewport: Viewport) -> Vec2 {
    Vec2 {
        x: world_to_screen_x(world.x, viewport),
        y: world.y - NAME_TAG_RISE_PX,
    }
}
