use crate::vector::Vec2f;

/// Position, scale and rotation of a gate or the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2f,
    pub scale: Vec2f,
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2f::default(),
            scale: Vec2f::single_value(1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn new(position: Vec2f, scale: Vec2f, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }
}

/// Editing-session view. Not owned by any simulation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    pub viewport: Vec2f,
}

impl Camera {
    pub fn screen_to_world(&self, pos: Vec2f) -> Vec2f {
        let scale = self.transform.scale;
        Vec2f::new(
            (pos.x - self.transform.position.x) / scale.x,
            (pos.y - self.transform.position.y) / scale.y,
        )
    }

    pub fn world_to_screen(&self, pos: Vec2f) -> Vec2f {
        let scale = self.transform.scale;
        Vec2f::new(
            pos.x * scale.x + self.transform.position.x,
            pos.y * scale.y + self.transform.position.y,
        )
    }
}
