use super::asteroid::AsteroidSize;
use super::entity::{Body, Entity, EntityId, Kind};
use super::player::Player;
use super::vector::Vector2;

/// What a presentation layer should draw for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Ship { thrusting: bool, animation_frame: u32 },
    Bullet,
    Asteroid(AsteroidSize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: Kind,
    pub position: Vector2,
    pub rotation: f64,
    pub radius: f64,
    pub shape: Shape,
}

impl EntityView {
    pub(crate) fn of_player(player: &Player) -> Self {
        Self::from_body(
            player.body(),
            Kind::Player,
            Shape::Ship {
                thrusting: player.is_thrusting(),
                animation_frame: player.animation_frame(),
            },
        )
    }

    pub(crate) fn of_entity(entity: &Entity) -> Self {
        let shape = match entity {
            Entity::Bullet(_) => Shape::Bullet,
            Entity::Asteroid(asteroid) => Shape::Asteroid(asteroid.size()),
        };
        Self::from_body(entity.body(), entity.kind(), shape)
    }

    fn from_body(body: &Body, kind: Kind, shape: Shape) -> Self {
        Self {
            id: body.id(),
            kind,
            position: body.position,
            rotation: body.rotation(),
            radius: body.collision_radius(),
            shape,
        }
    }
}

/// Frame-ready copy of session state. Building one never mutates the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub entities: Vec<EntityView>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub is_showing_level: bool,
    pub can_draw_player: bool,
    pub is_player_invulnerable: bool,
}

impl Snapshot {
    pub fn ship(&self) -> Option<&EntityView> {
        self.entities.iter().find(|view| view.kind == Kind::Player)
    }

    /// The hull blinks while the ship is invulnerable, except when paused.
    pub fn hull_visible(&self, animation_frame: u32) -> bool {
        !self.is_player_invulnerable || self.is_paused || animation_frame % 20 < 10
    }

    pub fn flame_visible(&self, thrusting: bool, animation_frame: u32) -> bool {
        thrusting && !self.is_paused && animation_frame % 6 < 3
    }
}
