use super::entity::{Body, Kind};
use super::vector::Vector2;

const SPEED: f64 = 6.75;
const RADIUS: f64 = 2.0;
pub const LIFESPAN: i32 = 60;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub(crate) body: Body,
    lifespan: i32,
}

impl Bullet {
    /// Leaves `origin` travelling along `angle` at a fixed speed.
    pub fn new(origin: Vector2, angle: f64) -> Self {
        let velocity = *Vector2::from_angle(angle).scale(SPEED);
        Self {
            body: Body::new(origin, velocity, RADIUS, 0),
            lifespan: LIFESPAN,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn lifespan(&self) -> i32 {
        self.lifespan
    }

    pub(crate) fn update(&mut self) {
        self.body.advance();
        self.lifespan -= 1;
        if self.lifespan <= 0 {
            self.body.flag_for_removal();
        }
    }

    // Bullets pass through the ship that fired them.
    pub(crate) fn handle_collision(&mut self, other: Kind) {
        if other != Kind::Player {
            self.body.flag_for_removal();
        }
    }
}
