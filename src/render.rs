//! Rendering collaborator
//!
//! The simulation never touches pixels. Entities describe themselves to a
//! [`Canvas`]; the browser build paints a 2D context, tests record a
//! [`DrawList`].

use crate::sim::Rect;

/// What is being drawn, so a backend can pick an image or colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Bullet,
    Enemy,
}

/// Any 2D raster surface
pub trait Canvas {
    /// Wipe the whole viewport
    fn clear(&mut self);
    /// Draw a sprite stretched to `rect`, horizontally mirrored if `mirrored`
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect, mirrored: bool);
    /// Draw overlay text with its baseline at (x, y)
    fn draw_text(&mut self, text: &str, x: f32, y: f32);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear,
    Sprite {
        sprite: Sprite,
        rect: Rect,
        mirrored: bool,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
    },
}

/// Canvas that records calls instead of drawing (headless runs and tests)
#[derive(Debug, Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sprites of a given kind in the recording
    pub fn count(&self, kind: Sprite) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Sprite { sprite, .. } if *sprite == kind))
            .count()
    }

    /// All text lines, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.cmds.clear();
        self.cmds.push(DrawCmd::Clear);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect, mirrored: bool) {
        self.cmds.push(DrawCmd::Sprite {
            sprite,
            rect,
            mirrored,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.cmds.push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// Left edge of the HUD text column
pub const HUD_X: f32 = 10.0;
/// Baselines of the score, lives and health lines
pub const HUD_LINES: [f32; 3] = [30.0, 60.0, 90.0];

/// Draw the score / lives / health overlay
pub fn draw_hud(canvas: &mut dyn Canvas, score: u64, lives: u32, health: i32) {
    canvas.draw_text(&format!("Score: {}", score), HUD_X, HUD_LINES[0]);
    canvas.draw_text(&format!("Lives: {}", lives), HUD_X, HUD_LINES[1]);
    canvas.draw_text(&format!("Health: {}%", health), HUD_X, HUD_LINES[2]);
}
