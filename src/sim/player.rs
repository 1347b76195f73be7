use std::f64::consts::FRAC_PI_2;

use super::bullet::Bullet;
use super::entity::{Body, Entity, EntityId, Kind};
use super::input::Intents;
use super::session::World;
use super::vector::Vector2;
use super::WORLD_SIZE;

const DEFAULT_ROTATION: f64 = -FRAC_PI_2;
const THRUST_MAGNITUDE: f64 = 0.0385;
pub const MAX_SPEED: f64 = 6.5;
const ROTATION_SPEED: f64 = 0.052;
const SLOW_RATE: f64 = 0.995;
const RADIUS: f64 = 10.0;

pub const MAX_BULLETS: usize = 4;
pub const FIRE_RATE: i32 = 4;
pub const MAX_CONSECUTIVE_SHOTS: u32 = 8;
pub const MAX_OVERHEAT: i32 = 30;

/// The ship. One per session; it is reset in place, never removed.
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) body: Body,
    thrust: bool,
    rotate_left: bool,
    rotate_right: bool,
    fire: bool,
    firing_enabled: bool,
    consecutive_shots: u32,
    fire_cooldown: i32,
    overheat_cooldown: i32,
    animation_frame: u32,
    /// Bullets fired by this ship that are still in flight.
    bullets: Vec<EntityId>,
}

impl Player {
    pub fn new() -> Self {
        let mut body = Body::new(spawn_point(), Vector2::ZERO, RADIUS, 0);
        body.set_rotation(DEFAULT_ROTATION);
        Self {
            body,
            thrust: false,
            rotate_left: false,
            rotate_right: false,
            fire: false,
            firing_enabled: true,
            consecutive_shots: 0,
            fire_cooldown: 0,
            overheat_cooldown: 0,
            animation_frame: 0,
            bullets: Vec::new(),
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrust
    }

    pub fn is_firing_enabled(&self) -> bool {
        self.firing_enabled
    }

    pub fn set_firing_enabled(&mut self, enabled: bool) {
        self.firing_enabled = enabled;
    }

    pub fn consecutive_shots(&self) -> u32 {
        self.consecutive_shots
    }

    pub fn fire_cooldown(&self) -> i32 {
        self.fire_cooldown
    }

    pub fn overheat_cooldown(&self) -> i32 {
        self.overheat_cooldown
    }

    pub fn animation_frame(&self) -> u32 {
        self.animation_frame
    }

    pub fn bullets(&self) -> &[EntityId] {
        &self.bullets
    }

    pub fn set_intents(&mut self, intents: &Intents) {
        self.thrust = intents.thrust;
        self.rotate_left = intents.rotate_left;
        self.rotate_right = intents.rotate_right;
        self.fire = intents.fire;
    }

    /// Back to the centre, facing up, at rest. Bullets already in flight keep
    /// going; the ship just stops tracking them.
    pub fn reset(&mut self) {
        self.body.set_rotation(DEFAULT_ROTATION);
        let centre = spawn_point();
        self.body.position.set(centre.x, centre.y);
        self.body.velocity.set(0.0, 0.0);
        self.bullets.clear();
    }

    /// One tick of ship logic. `roster` is the live collection the session is
    /// iterating; it is only read to retire bullets that have been removed.
    pub(crate) fn update(&mut self, world: &mut World, roster: &[Entity]) {
        self.body.advance();
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if self.rotate_left != self.rotate_right {
            let amount = if self.rotate_left { -ROTATION_SPEED } else { ROTATION_SPEED };
            self.body.rotate(amount);
        }

        if self.thrust {
            let push = *Vector2::from_angle(self.body.rotation()).scale(THRUST_MAGNITUDE);
            let velocity = &mut self.body.velocity;
            velocity.add(push);
            if velocity.length_squared() >= MAX_SPEED * MAX_SPEED {
                velocity.normalize().scale(MAX_SPEED);
            }
        }

        if self.body.velocity.length_squared() != 0.0 {
            self.body.velocity.scale(SLOW_RATE);
        }

        self.bullets.retain(|id| {
            roster
                .iter()
                .chain(world.pending())
                .any(|entity| entity.id() == *id && !entity.needs_removal())
        });

        self.fire_cooldown -= 1;
        self.overheat_cooldown -= 1;

        let wants_fire = self.firing_enabled && self.fire;
        if wants_fire && self.fire_cooldown <= 0 && self.overheat_cooldown <= 0 {
            if self.bullets.len() < MAX_BULLETS {
                self.fire_cooldown = FIRE_RATE;
                let bullet = Bullet::new(self.body.position, self.body.rotation());
                let id = world.register(bullet.into());
                self.bullets.push(id);
            }

            self.consecutive_shots += 1;
            if self.consecutive_shots == MAX_CONSECUTIVE_SHOTS {
                self.consecutive_shots = 0;
                self.overheat_cooldown = MAX_OVERHEAT;
            }
        } else if !wants_fire && self.consecutive_shots > 0 {
            self.consecutive_shots -= 1;
        }
    }

    pub(crate) fn handle_collision(&mut self, world: &mut World, other: Kind) {
        if other == Kind::Asteroid {
            self.firing_enabled = false;
            world.kill_player();
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_point() -> Vector2 {
    Vector2::new(WORLD_SIZE / 2.0, WORLD_SIZE / 2.0)
}
