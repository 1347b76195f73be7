use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::asteroid::Asteroid;
use super::entity::{Entity, EntityId, Kind};
use super::input::Intents;
use super::player::Player;
use super::snapshot::{EntityView, Snapshot};

const STARTING_LIVES: u32 = 3;
/// Ticks the "LEVEL n" banner holds the field frozen.
pub const DISPLAY_LEVEL_LIMIT: u32 = 60;
pub const DEATH_COOLDOWN_LIMIT: i32 = 200;
pub const RESPAWN_COOLDOWN_LIMIT: i32 = 100;
pub const INVULN_COOLDOWN_LIMIT: i32 = 0;
pub const RESET_COOLDOWN_LIMIT: u32 = 120;
/// Extra asteroids on top of the level number.
const LEVEL_ASTEROID_BONUS: u32 = 2;

/// Everything an entity may touch while it updates or resolves a collision:
/// counters, cooldowns, the spawn buffer and the random source.
#[derive(Debug, Clone)]
pub struct World {
    pending: Vec<Entity>,
    rng: StdRng,
    next_id: u64,
    score: u32,
    lives: u32,
    level: u32,
    death_cooldown: i32,
    show_level_cooldown: u32,
    restart_cooldown: u32,
    game_over: bool,
    restart_requested: bool,
    paused: bool,
}

impl World {
    pub(crate) fn new(rng: StdRng) -> Self {
        Self {
            pending: Vec::new(),
            rng,
            next_id: 0,
            score: 0,
            lives: STARTING_LIVES,
            level: 0,
            death_cooldown: 0,
            show_level_cooldown: 0,
            restart_cooldown: 0,
            game_over: false,
            restart_requested: false,
            paused: false,
        }
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Queues `entity` for the next tick's merge and returns its handle.
    pub(crate) fn register(&mut self, mut entity: Entity) -> EntityId {
        let id = self.allocate_id();
        entity.body_mut().id = id;
        self.pending.push(entity);
        id
    }

    pub(crate) fn pending(&self) -> &[Entity] {
        &self.pending
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn kill_player(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            self.restart_cooldown = RESET_COOLDOWN_LIMIT;
            // Keeps the ship hidden and untouchable until the restart.
            self.death_cooldown = i32::MAX;
            info!(score = self.score, level = self.level, "game over");
        } else {
            self.death_cooldown = DEATH_COOLDOWN_LIMIT;
            info!(lives = self.lives, "player destroyed");
        }
    }

    pub(crate) fn is_player_invulnerable(&self) -> bool {
        self.death_cooldown > INVULN_COOLDOWN_LIMIT
    }
}

/// One game from first level to game over (and any number of restarts).
///
/// The ship lives outside the entity collection but always acts as if it
/// were its first element: it updates first and is paired first in the
/// collision pass.
#[derive(Debug, Clone)]
pub struct GameSession {
    player: Player,
    entities: Vec<Entity>,
    world: World,
}

impl GameSession {
    pub fn new(rng: StdRng) -> Self {
        let mut world = World::new(rng);
        let mut player = Player::new();
        player.body.id = world.allocate_id();
        Self {
            player,
            entities: Vec::new(),
            world,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Advances the simulation by one fixed step. A pause request is applied
    /// first; while paused nothing else happens.
    pub fn tick(&mut self, intents: Intents) {
        if intents.pause {
            self.toggle_pause();
        }
        if self.world.paused {
            return;
        }
        self.player.set_intents(&intents);
        if intents.restart {
            self.request_restart();
        }

        let arrivals = self.world.take_pending();
        self.entities.extend(arrivals);

        self.world.restart_cooldown = self.world.restart_cooldown.saturating_sub(1);
        self.world.show_level_cooldown = self.world.show_level_cooldown.saturating_sub(1);

        if self.world.game_over && self.world.restart_requested {
            self.reset_game();
        }

        if !self.world.game_over && self.asteroid_count() == 0 {
            self.advance_level();
        }

        if self.world.death_cooldown > 0 {
            self.world.death_cooldown -= 1;
            match self.world.death_cooldown {
                RESPAWN_COOLDOWN_LIMIT => {
                    self.player.reset();
                    self.player.set_firing_enabled(false);
                    debug!("player respawned");
                }
                INVULN_COOLDOWN_LIMIT => self.player.set_firing_enabled(true),
                _ => {}
            }
        }

        if self.world.show_level_cooldown == 0 {
            self.update_entities();
            self.resolve_collisions();
            self.entities.retain(|entity| !entity.needs_removal());
        }
    }

    /// Latches a restart if the game is over and the restart cooldown has
    /// run out. Returns whether the request was accepted.
    fn request_restart(&mut self) -> bool {
        let accepted = self.world.game_over && self.world.restart_cooldown == 0;
        if accepted {
            self.world.restart_requested = true;
        }
        accepted
    }

    /// Flips the pause flag. Has no effect once the game is over.
    fn toggle_pause(&mut self) -> bool {
        if !self.world.game_over {
            self.world.paused = !self.world.paused;
            info!(paused = self.world.paused, "pause toggled");
        }
        self.world.paused
    }

    /// Queues an entity for the next tick.
    pub fn register_entity(&mut self, entity: Entity) -> EntityId {
        self.world.register(entity)
    }

    fn update_entities(&mut self) {
        self.player.update(&mut self.world, &self.entities);
        for entity in &mut self.entities {
            entity.update();
        }
    }

    /// Pairwise pass in collection order. Each colliding pair responds in
    /// both directions, first element first. Pairs with the ship are skipped
    /// while it is invulnerable, re-checked per pair since a hit earlier in
    /// the pass can make it so.
    fn resolve_collisions(&mut self) {
        let Self {
            player,
            entities,
            world,
        } = self;

        for entity in entities.iter_mut() {
            if world.is_player_invulnerable() {
                break;
            }
            if player.body.check_collision(entity.body()) {
                player.handle_collision(world, entity.kind());
                entity.handle_collision(world, Kind::Player);
            }
        }

        let count = entities.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = entities.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if a.body().check_collision(b.body()) {
                    a.handle_collision(world, b.kind());
                    b.handle_collision(world, a.kind());
                }
            }
        }
    }

    fn advance_level(&mut self) {
        self.world.level += 1;
        self.world.show_level_cooldown = DISPLAY_LEVEL_LIMIT;

        // Stray bullets from the previous level go too.
        self.reset_entity_lists();
        self.player.reset();
        self.player.set_firing_enabled(true);

        let count = self.world.level + LEVEL_ASTEROID_BONUS;
        for _ in 0..count {
            let asteroid = Asteroid::new(self.world.rng());
            self.world.register(asteroid.into());
        }
        info!(level = self.world.level, asteroids = count, "level started");
    }

    fn reset_game(&mut self) {
        self.world.score = 0;
        self.world.level = 0;
        self.world.lives = STARTING_LIVES;
        self.world.death_cooldown = 0;
        self.world.game_over = false;
        self.world.restart_requested = false;
        self.world.paused = false;
        self.reset_entity_lists();
        info!("game restarted");
    }

    fn reset_entity_lists(&mut self) {
        self.world.pending.clear();
        self.entities.clear();
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn pending_count(&self) -> usize {
        self.world.pending.len()
    }

    pub fn asteroid_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind() == Kind::Asteroid)
            .count()
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    pub fn lives(&self) -> u32 {
        self.world.lives
    }

    pub fn level(&self) -> u32 {
        self.world.level
    }

    pub fn death_cooldown(&self) -> i32 {
        self.world.death_cooldown
    }

    pub fn show_level_cooldown(&self) -> u32 {
        self.world.show_level_cooldown
    }

    pub fn restart_cooldown(&self) -> u32 {
        self.world.restart_cooldown
    }

    pub fn is_game_over(&self) -> bool {
        self.world.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.world.paused
    }

    pub fn is_showing_level(&self) -> bool {
        self.world.show_level_cooldown > 0
    }

    pub fn is_player_invulnerable(&self) -> bool {
        self.world.is_player_invulnerable()
    }

    pub fn can_draw_player(&self) -> bool {
        self.world.death_cooldown <= RESPAWN_COOLDOWN_LIMIT
    }

    /// Read-only view for presentation, ship first.
    pub fn snapshot(&self) -> Snapshot {
        let mut entities = Vec::with_capacity(self.entities.len() + 1);
        entities.push(EntityView::of_player(&self.player));
        entities.extend(self.entities.iter().map(EntityView::of_entity));
        Snapshot {
            entities,
            score: self.world.score,
            lives: self.world.lives,
            level: self.world.level,
            is_game_over: self.world.game_over,
            is_paused: self.world.paused,
            is_showing_level: self.is_showing_level(),
            can_draw_player: self.can_draw_player(),
            is_player_invulnerable: self.is_player_invulnerable(),
        }
    }
}

#[cfg(test)]
mod tests;
