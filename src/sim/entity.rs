use std::f64::consts::TAU;

use super::asteroid::Asteroid;
use super::bullet::Bullet;
use super::session::World;
use super::vector::Vector2;
use super::WORLD_SIZE;

/// Stable handle for an entity registered with a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// The closed set of things that live in the play-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Player,
    Bullet,
    Asteroid,
}

/// State shared by every entity variant: motion, facing, hit circle and the
/// removal latch.
#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) id: EntityId,
    pub position: Vector2,
    pub velocity: Vector2,
    rotation: f64,
    radius: f64,
    kill_score: u32,
    removal: bool,
}

impl Body {
    pub fn new(position: Vector2, velocity: Vector2, radius: f64, kill_score: u32) -> Self {
        Self {
            id: EntityId::default(),
            position,
            velocity,
            rotation: 0.0,
            radius,
            kill_score,
            removal: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn collision_radius(&self) -> f64 {
        self.radius
    }

    pub fn kill_score(&self) -> u32 {
        self.kill_score
    }

    /// Moves by one tick of velocity and wraps both axes onto the torus.
    pub fn advance(&mut self) {
        self.position.add(self.velocity);
        self.position.x = wrap(self.position.x);
        self.position.y = wrap(self.position.y);
    }

    /// Turns by `amount` radians, keeping the facing inside `[0, 2π)`.
    pub fn rotate(&mut self, amount: f64) {
        self.set_rotation(self.rotation + amount);
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        let wrapped = rotation.rem_euclid(TAU);
        self.rotation = if wrapped >= TAU { 0.0 } else { wrapped };
    }

    /// Strict circle overlap on squared distances.
    pub fn check_collision(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(&other.position) < reach * reach
    }

    pub fn flag_for_removal(&mut self) {
        self.removal = true;
    }

    pub fn needs_removal(&self) -> bool {
        self.removal
    }
}

/// Folds a coordinate into `[0, WORLD_SIZE)`.
pub fn wrap(value: f64) -> f64 {
    let mut value = value % WORLD_SIZE;
    if value < 0.0 {
        value += WORLD_SIZE;
    }
    // A tiny negative remainder can round up to exactly WORLD_SIZE above.
    value % WORLD_SIZE
}

/// Session-owned entities other than the player.
#[derive(Debug, Clone)]
pub enum Entity {
    Bullet(Bullet),
    Asteroid(Asteroid),
}

impl Entity {
    pub fn kind(&self) -> Kind {
        match self {
            Entity::Bullet(_) => Kind::Bullet,
            Entity::Asteroid(_) => Kind::Asteroid,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Entity::Bullet(bullet) => &bullet.body,
            Entity::Asteroid(asteroid) => &asteroid.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Entity::Bullet(bullet) => &mut bullet.body,
            Entity::Asteroid(asteroid) => &mut asteroid.body,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body().id
    }

    pub fn needs_removal(&self) -> bool {
        self.body().needs_removal()
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match self {
            Entity::Asteroid(asteroid) => Some(asteroid),
            Entity::Bullet(_) => None,
        }
    }

    pub(crate) fn update(&mut self) {
        match self {
            Entity::Bullet(bullet) => bullet.update(),
            Entity::Asteroid(asteroid) => asteroid.update(),
        }
    }

    pub(crate) fn handle_collision(&mut self, world: &mut World, other: Kind) {
        match self {
            Entity::Bullet(bullet) => bullet.handle_collision(other),
            Entity::Asteroid(asteroid) => asteroid.handle_collision(world, other),
        }
    }
}

impl From<Bullet> for Entity {
    fn from(bullet: Bullet) -> Self {
        Entity::Bullet(bullet)
    }
}

impl From<Asteroid> for Entity {
    fn from(asteroid: Asteroid) -> Self {
        Entity::Asteroid(asteroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f64, y: f64, radius: f64) -> Body {
        Body::new(Vector2::new(x, y), Vector2::ZERO, radius, 0)
    }

    #[test]
    fn test_wrap_stays_in_bounds() {
        for value in [-1.0, -550.0, -1e-17, 0.0, 549.999, 550.0, 551.5, 1100.0] {
            let wrapped = wrap(value);
            assert!((0.0..WORLD_SIZE).contains(&wrapped), "{value} -> {wrapped}");
        }
        assert_eq!(wrap(-1.0), 549.0);
        assert_eq!(wrap(551.5), 1.5);
    }

    #[test]
    fn test_advance_wraps_negative_positions() {
        let mut body = Body::new(Vector2::new(1.0, 549.0), Vector2::new(-3.0, 2.0), 1.0, 0);
        body.advance();
        assert_eq!(body.position, Vector2::new(548.0, 1.0));
    }

    #[test]
    fn test_rotation_stays_in_range() {
        let mut body = body_at(0.0, 0.0, 1.0);
        body.rotate(-0.5);
        assert!((0.0..TAU).contains(&body.rotation()));
        assert!((body.rotation() - (TAU - 0.5)).abs() < 1e-12);
        body.rotate(1.0);
        assert!((body.rotation() - 0.5).abs() < 1e-12);
        body.rotate(7.0 * TAU);
        assert!((0.0..TAU).contains(&body.rotation()));
    }

    #[test]
    fn test_collision_is_strict_and_symmetric() {
        let a = body_at(100.0, 100.0, 10.0);
        let touching = body_at(120.0, 100.0, 10.0);
        let overlapping = body_at(119.0, 100.0, 10.0);
        assert!(!a.check_collision(&touching));
        assert!(!touching.check_collision(&a));
        assert!(a.check_collision(&overlapping));
        assert!(overlapping.check_collision(&a));
    }

    #[test]
    fn test_removal_latch() {
        let mut body = body_at(0.0, 0.0, 1.0);
        assert!(!body.needs_removal());
        body.flag_for_removal();
        body.flag_for_removal();
        assert!(body.needs_removal());
    }
}
