use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use super::entity::{Body, Kind};
use super::session::World;
use super::vector::Vector2;
use super::WORLD_SIZE;

const MIN_ROTATION: f64 = 0.0075;
const MAX_ROTATION: f64 = 0.0175;
const MIN_VELOCITY: f64 = 0.75;
const MAX_VELOCITY: f64 = 1.65;
const MIN_DISTANCE: f64 = 200.0;
const MAX_DISTANCE: f64 = WORLD_SIZE / 2.0;
/// Ticks a fragment is advanced on creation so siblings separate.
const SPAWN_UPDATES: usize = 10;
/// Fragments spawned when a non-small asteroid breaks.
const FRAGMENTS: usize = 2;
const RADIUS_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    /// Radius of the drawn outline.
    pub fn radius(&self) -> f64 {
        match self {
            AsteroidSize::Small => 15.0,
            AsteroidSize::Medium => 25.0,
            AsteroidSize::Large => 40.0,
        }
    }

    /// Hit circle: the outline plus a small forgiveness margin.
    pub fn collision_radius(&self) -> f64 {
        self.radius() + RADIUS_MARGIN
    }

    pub fn points(&self) -> u32 {
        match self {
            AsteroidSize::Small => 100,
            AsteroidSize::Medium => 50,
            AsteroidSize::Large => 20,
        }
    }

    pub fn split(&self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub(crate) body: Body,
    size: AsteroidSize,
    spin: f64,
}

impl Asteroid {
    /// A large asteroid somewhere on the ring around the world centre.
    /// Root asteroids always spin counter-clockwise.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = spawn_position(rng);
        let velocity = random_velocity(rng);
        let spin = -random_spin(rng);
        Self::with_motion(AsteroidSize::Large, position, velocity, spin)
    }

    /// A fragment of `parent` at the next tier. Fragments spin clockwise and
    /// are pre-advanced without any collision or scoring side effects.
    pub fn fragment<R: Rng + ?Sized>(parent: &Asteroid, size: AsteroidSize, rng: &mut R) -> Self {
        let velocity = random_velocity(rng);
        let spin = random_spin(rng);
        let mut fragment = Self::with_motion(size, parent.body.position, velocity, spin);
        for _ in 0..SPAWN_UPDATES {
            fragment.update();
        }
        fragment
    }

    pub fn with_motion(size: AsteroidSize, position: Vector2, velocity: Vector2, spin: f64) -> Self {
        Self {
            body: Body::new(position, velocity, size.collision_radius(), size.points()),
            size,
            spin,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn size(&self) -> AsteroidSize {
        self.size
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub(crate) fn update(&mut self) {
        self.body.advance();
        self.body.rotate(self.spin);
    }

    pub(crate) fn handle_collision(&mut self, world: &mut World, other: Kind) {
        if other == Kind::Asteroid {
            return;
        }
        if let Some(next) = self.size.split() {
            for _ in 0..FRAGMENTS {
                let fragment = Asteroid::fragment(self, next, world.rng());
                world.register(fragment.into());
            }
            debug!(from = ?self.size, to = ?next, "asteroid split");
        }
        self.body.flag_for_removal();
        world.add_score(self.body.kill_score());
    }
}

fn spawn_position<R: Rng + ?Sized>(rng: &mut R) -> Vector2 {
    let mut position = Vector2::new(WORLD_SIZE / 2.0, WORLD_SIZE / 2.0);
    let angle = rng.gen::<f64>() * TAU;
    let distance = MIN_DISTANCE + rng.gen::<f64>() * (MAX_DISTANCE - MIN_DISTANCE);
    position.add(*Vector2::from_angle(angle).scale(distance));
    position
}

fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vector2 {
    let angle = rng.gen::<f64>() * TAU;
    let speed = MIN_VELOCITY + rng.gen::<f64>() * (MAX_VELOCITY - MIN_VELOCITY);
    *Vector2::from_angle(angle).scale(speed)
}

fn random_spin<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    MIN_ROTATION + rng.gen::<f64>() * (MAX_ROTATION - MIN_ROTATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_size_table() {
        assert_eq!(AsteroidSize::Small.collision_radius(), 16.0);
        assert_eq!(AsteroidSize::Medium.collision_radius(), 26.0);
        assert_eq!(AsteroidSize::Large.collision_radius(), 41.0);
        assert_eq!(AsteroidSize::Large.points(), 20);
        assert_eq!(AsteroidSize::Medium.points(), 50);
        assert_eq!(AsteroidSize::Small.points(), 100);
        assert_eq!(AsteroidSize::Large.split(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.split(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.split(), None);
    }

    #[test]
    fn test_root_spawn_geometry() {
        let mut rng = StdRng::seed_from_u64(7);
        let centre = Vector2::new(WORLD_SIZE / 2.0, WORLD_SIZE / 2.0);
        for _ in 0..200 {
            let asteroid = Asteroid::new(&mut rng);
            let distance = asteroid.body.position.distance_squared(&centre).sqrt();
            assert!(distance >= MIN_DISTANCE - 1e-9 && distance <= MAX_DISTANCE + 1e-9);
            let speed = asteroid.body.velocity.length_squared().sqrt();
            assert!(speed >= MIN_VELOCITY - 1e-9 && speed <= MAX_VELOCITY + 1e-9);
            assert!(asteroid.spin() <= -MIN_ROTATION && asteroid.spin() >= -MAX_ROTATION);
            assert_eq!(asteroid.size(), AsteroidSize::Large);
            assert_eq!(asteroid.body.kill_score(), 20);
        }
    }

    #[test]
    fn test_fragment_starts_at_parent_and_is_pre_advanced() {
        let mut rng = StdRng::seed_from_u64(11);
        let parent = Asteroid::with_motion(
            AsteroidSize::Large,
            Vector2::new(300.0, 300.0),
            Vector2::ZERO,
            0.0,
        );
        let fragment = Asteroid::fragment(&parent, AsteroidSize::Medium, &mut rng);
        let travelled = fragment.body.position.distance_squared(&parent.body.position).sqrt();
        let speed = fragment.body.velocity.length_squared().sqrt();
        assert!((travelled - speed * SPAWN_UPDATES as f64).abs() < 1e-6);
        assert!(fragment.spin() >= MIN_ROTATION && fragment.spin() <= MAX_ROTATION);
        assert_eq!(fragment.size(), AsteroidSize::Medium);
        assert_eq!(fragment.body.collision_radius(), 26.0);
    }
}
