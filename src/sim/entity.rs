//! Player, bullet and enemy entities
//!
//! Each entity advances its own kinematics one tick at a time. None of them
//! clamp vertical motion; leaving the viewport is detected by the tick.

use glam::Vec2;

use super::tick::TickInput;
use crate::render::{Canvas, Sprite};
use crate::tuning::Tuning;

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub facing: Facing,
    /// Can dip below zero within a collision pass before it is normalized
    pub health: i32,
    pub lives: u32,
}

impl Player {
    /// Fresh player centered at the bottom of the viewport
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player_width, tuning.player_height);
        Self {
            pos: Vec2::new(
                tuning.viewport_width / 2.0 - size.x / 2.0,
                tuning.viewport_height - size.y - tuning.player_bottom_margin,
            ),
            size,
            speed: tuning.player_speed,
            facing: Facing::Right,
            health: tuning.full_health,
            lives: tuning.player_lives,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Horizontal movement from held input. Left is applied before right, so
    /// holding both ends the tick facing right.
    pub fn update(&mut self, input: &TickInput, viewport_width: f32) {
        if input.move_left && self.pos.x > 0.0 {
            self.pos.x -= self.speed;
            self.facing = Facing::Left;
        }
        if input.move_right && self.pos.x < viewport_width - self.size.x {
            self.pos.x += self.speed;
            self.facing = Facing::Right;
        }
    }

    /// Where a bullet of width `bullet_width` leaves the ship
    pub fn muzzle(&self, bullet_width: f32) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - bullet_width / 2.0, self.pos.y)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(Sprite::Player, self.bounds(), self.facing == Facing::Left);
    }
}

/// A projectile travelling straight up
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Player facing at fire time; only affects how the sprite is drawn
    pub facing: Facing,
}

impl Bullet {
    pub fn new(pos: Vec2, facing: Facing, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::new(tuning.bullet_width, tuning.bullet_height),
            speed: tuning.bullet_speed,
            facing,
        }
    }

    /// Fire from the player's muzzle
    pub fn fired_by(player: &Player, tuning: &Tuning) -> Self {
        Self::new(player.muzzle(tuning.bullet_width), player.facing, tuning)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(Sprite::Bullet, self.bounds(), self.facing == Facing::Left);
    }
}

/// A descending enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Fixed at spawn from the active difficulty
    pub speed: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
            speed,
        }
    }

    /// Enemy just above the top edge at horizontal position `x`
    pub fn spawn_at(x: f32, speed: f32, tuning: &Tuning) -> Self {
        Self::new(Vec2::new(x, -tuning.enemy_height), speed, tuning)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(Sprite::Enemy, self.bounds(), false);
    }
}
