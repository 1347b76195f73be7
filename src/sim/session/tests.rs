use super::*;
use crate::sim::{AsteroidSize, Bullet, Vector2};

const CENTRE: Vector2 = Vector2 { x: 275.0, y: 275.0 };

/// Puts `entity` straight into the live collection, bypassing the pending
/// buffer.
fn place(session: &mut GameSession, mut entity: Entity) -> EntityId {
    let id = session.world.allocate_id();
    entity.body_mut().id = id;
    session.entities.push(entity);
    id
}

fn still_asteroid(size: AsteroidSize, position: Vector2) -> Entity {
    Asteroid::with_motion(size, position, Vector2::ZERO, 0.0).into()
}

/// Level 1 with the random asteroids swapped for a single parked one far
/// from the ship, so the level never completes during a test.
fn arena() -> GameSession {
    let mut session = GameSession::with_seed(42);
    session.tick(Intents::IDLE);
    assert_eq!(session.level(), 1);
    session.world.pending.clear();
    session.world.show_level_cooldown = 0;
    place(
        &mut session,
        still_asteroid(AsteroidSize::Small, Vector2::new(20.0, 20.0)),
    );
    session
}

fn pending_sizes(session: &GameSession) -> Vec<AsteroidSize> {
    session
        .world
        .pending()
        .iter()
        .filter_map(|entity| entity.as_asteroid().map(Asteroid::size))
        .collect()
}

#[test]
fn test_new_session_defaults() {
    let session = GameSession::with_seed(1);
    assert_eq!(session.lives(), 3);
    assert_eq!(session.score(), 0);
    assert_eq!(session.level(), 0);
    assert!(!session.is_game_over());
    assert!(session.entities().is_empty());
    assert_eq!(session.player().body().position, CENTRE);
}

#[test]
fn test_empty_field_starts_next_level() {
    let mut session = GameSession::with_seed(5);
    session.tick(Intents::IDLE);
    assert_eq!(session.level(), 1);
    assert_eq!(session.show_level_cooldown(), DISPLAY_LEVEL_LIMIT);
    assert!(session.is_showing_level());
    assert_eq!(session.pending_count(), 3);

    session.tick(Intents::IDLE);
    assert_eq!(session.asteroid_count(), 3);
    assert!(session
        .entities()
        .iter()
        .all(|entity| entity.as_asteroid().map(Asteroid::size) == Some(AsteroidSize::Large)));
}

#[test]
fn test_level_banner_freezes_the_field() {
    let mut session = GameSession::with_seed(9);
    session.tick(Intents::IDLE);
    session.tick(Intents::IDLE);
    let frozen: Vec<Vector2> = session.entities().iter().map(|e| e.body().position).collect();

    while session.show_level_cooldown() > 1 {
        session.tick(Intents::IDLE);
        let now: Vec<Vector2> = session.entities().iter().map(|e| e.body().position).collect();
        assert_eq!(now, frozen);
    }

    session.tick(Intents::IDLE);
    assert!(!session.is_showing_level());
    let moved: Vec<Vector2> = session.entities().iter().map(|e| e.body().position).collect();
    assert_ne!(moved, frozen);
}

#[test]
fn test_level_two_clears_stray_bullets() {
    let mut session = arena();
    place(&mut session, Bullet::new(Vector2::new(400.0, 100.0), 0.0).into());
    session.entities.retain(|entity| entity.kind() != Kind::Asteroid);

    session.tick(Intents::IDLE);
    assert_eq!(session.level(), 2);
    assert!(session.entities().is_empty());
    assert_eq!(session.pending_count(), 4);
    assert!(session.player().is_firing_enabled());
}

#[test]
fn test_registered_entities_wait_for_next_tick() {
    let mut session = arena();
    let id = session.register_entity(Bullet::new(Vector2::new(400.0, 400.0), 0.0).into());
    assert!(session.entities().iter().all(|entity| entity.id() != id));
    assert_eq!(session.pending_count(), 1);

    session.tick(Intents::IDLE);
    assert!(session.entities().iter().any(|entity| entity.id() == id));
    assert_eq!(session.pending_count(), 0);
}

#[test]
fn test_large_asteroid_splits_into_two_medium() {
    let mut session = arena();
    let origin = Vector2::new(100.0, 100.0);
    let rock = place(&mut session, still_asteroid(AsteroidSize::Large, origin));
    let shot = place(&mut session, Bullet::new(origin, 0.0).into());

    session.tick(Intents::IDLE);

    assert_eq!(session.score(), 20);
    assert_eq!(pending_sizes(&session), vec![AsteroidSize::Medium; 2]);
    for fragment in session.world.pending() {
        let drift = fragment.body().position.distance_squared(&origin).sqrt();
        assert!(drift <= 1.65 * 10.0 + 1e-9);
    }
    assert!(session.entities().iter().all(|e| e.id() != rock && e.id() != shot));
}

#[test]
fn test_medium_asteroid_splits_into_two_small() {
    let mut session = arena();
    let origin = Vector2::new(100.0, 400.0);
    place(&mut session, still_asteroid(AsteroidSize::Medium, origin));
    place(&mut session, Bullet::new(origin, 1.0).into());

    session.tick(Intents::IDLE);

    assert_eq!(session.score(), 50);
    assert_eq!(pending_sizes(&session), vec![AsteroidSize::Small; 2]);
}

#[test]
fn test_small_asteroid_is_simply_removed() {
    let mut session = arena();
    let origin = Vector2::new(450.0, 100.0);
    let rock = place(&mut session, still_asteroid(AsteroidSize::Small, origin));
    place(&mut session, Bullet::new(origin, 2.0).into());

    session.tick(Intents::IDLE);

    assert_eq!(session.score(), 100);
    assert_eq!(session.pending_count(), 0);
    assert!(session.entities().iter().all(|e| e.id() != rock));
}

#[test]
fn test_two_bullets_on_one_asteroid_both_count() {
    let mut session = arena();
    let origin = Vector2::new(100.0, 100.0);
    let rock = place(&mut session, still_asteroid(AsteroidSize::Large, origin));
    place(&mut session, Bullet::new(origin, 0.0).into());
    place(&mut session, Bullet::new(origin, 0.0).into());

    session.tick(Intents::IDLE);

    // The asteroid is already flagged when the second bullet reaches it;
    // that pair still resolves.
    assert_eq!(session.score(), 40);
    assert_eq!(pending_sizes(&session), vec![AsteroidSize::Medium; 4]);
    assert!(session.entities().iter().all(|e| e.id() != rock));
    assert!(session.entities().iter().all(|e| e.kind() != Kind::Bullet));
}

#[test]
fn test_asteroids_pass_through_each_other() {
    let mut session = arena();
    let origin = Vector2::new(450.0, 450.0);
    place(&mut session, still_asteroid(AsteroidSize::Large, origin));
    place(&mut session, still_asteroid(AsteroidSize::Medium, origin));

    session.tick(Intents::IDLE);

    assert_eq!(session.score(), 0);
    assert_eq!(session.asteroid_count(), 3);
    assert_eq!(session.pending_count(), 0);
}

#[test]
fn test_bullets_destroy_each_other_but_not_the_ship() {
    let mut session = arena();
    let a = place(&mut session, Bullet::new(Vector2::new(450.0, 300.0), 0.0).into());
    let b = place(&mut session, Bullet::new(Vector2::new(450.0, 300.0), 0.0).into());
    let c = place(&mut session, Bullet::new(CENTRE, 0.0).into());
    // Cancel the bullet's travel so it sits on the ship after moving.
    if let Some(entity) = session.entities.iter_mut().find(|e| e.id() == c) {
        entity.body_mut().velocity = Vector2::ZERO;
    }

    session.tick(Intents::IDLE);

    let ids: Vec<EntityId> = session.entities().iter().map(Entity::id).collect();
    assert!(!ids.contains(&a));
    assert!(!ids.contains(&b));
    assert!(ids.contains(&c));
    assert_eq!(session.lives(), 3);
}

#[test]
fn test_death_and_respawn_cycle() {
    let mut session = arena();
    place(&mut session, still_asteroid(AsteroidSize::Large, CENTRE));

    session.tick(Intents::IDLE);
    assert_eq!(session.lives(), 2);
    assert_eq!(session.death_cooldown(), DEATH_COOLDOWN_LIMIT);
    assert!(!session.player().is_firing_enabled());
    assert!(session.is_player_invulnerable());
    assert!(!session.can_draw_player());
    // The rock broke on the ship; keep its fragments out of the way.
    assert_eq!(session.score(), 20);
    session.world.pending.clear();

    // Drift the wreck so the respawn visibly recentres it.
    session.player.body.velocity.set(1.0, 0.5);

    while session.death_cooldown() > RESPAWN_COOLDOWN_LIMIT {
        assert!(!session.can_draw_player());
        session.tick(Intents::IDLE);
    }
    assert_eq!(session.death_cooldown(), RESPAWN_COOLDOWN_LIMIT);
    assert!(session.can_draw_player());
    assert_eq!(session.player().body().velocity, Vector2::ZERO);
    assert!(!session.player().is_firing_enabled());

    while session.death_cooldown() > INVULN_COOLDOWN_LIMIT {
        assert!(!session.player().is_firing_enabled());
        assert!(session.is_player_invulnerable());
        session.tick(Intents::IDLE);
    }
    assert!(session.player().is_firing_enabled());
    assert!(!session.is_player_invulnerable());
    assert_eq!(session.lives(), 2);
}

#[test]
fn test_invulnerable_ship_ignores_asteroids() {
    let mut session = arena();
    session.world.death_cooldown = 50;
    let rock = place(&mut session, still_asteroid(AsteroidSize::Large, CENTRE));

    session.tick(Intents::IDLE);

    assert_eq!(session.lives(), 3);
    assert_eq!(session.score(), 0);
    assert!(session.entities().iter().any(|e| e.id() == rock));
}

#[test]
fn test_only_one_death_per_tick() {
    let mut session = arena();
    place(&mut session, still_asteroid(AsteroidSize::Small, CENTRE));
    place(&mut session, still_asteroid(AsteroidSize::Small, CENTRE));

    session.tick(Intents::IDLE);

    assert_eq!(session.lives(), 2);
    // Only the first rock touched the ship; the second pair was skipped.
    assert_eq!(session.score(), 100);
}

#[test]
fn test_game_over_and_restart() {
    let mut session = arena();
    session.world.lives = 1;
    place(&mut session, still_asteroid(AsteroidSize::Small, CENTRE));

    session.tick(Intents::IDLE);
    assert_eq!(session.lives(), 0);
    assert!(session.is_game_over());
    assert_eq!(session.restart_cooldown(), RESET_COOLDOWN_LIMIT);
    assert!(!session.can_draw_player());
    assert!(session.is_player_invulnerable());

    let restart = Intents {
        restart: true,
        ..Intents::IDLE
    };
    while session.restart_cooldown() > 0 {
        assert!(!session.request_restart());
        session.tick(restart);
        assert!(session.is_game_over());
    }

    session.tick(restart);
    assert!(!session.is_game_over());
    assert_eq!(session.lives(), 3);
    assert_eq!(session.score(), 0);
    assert_eq!(session.level(), 1);
    assert_eq!(session.death_cooldown(), 0);
    assert!(session.player().is_firing_enabled());
    assert_eq!(session.player().body().position, CENTRE);
}

const PAUSE: Intents = Intents {
    pause: true,
    ..Intents::IDLE
};

#[test]
fn test_pause_toggle_is_ignored_after_game_over() {
    let mut session = arena();
    session.tick(PAUSE);
    assert!(session.is_paused());
    session.tick(PAUSE);
    assert!(!session.is_paused());

    session.world.lives = 1;
    place(&mut session, still_asteroid(AsteroidSize::Small, CENTRE));
    session.tick(Intents::IDLE);
    assert!(session.is_game_over());
    session.tick(PAUSE);
    assert!(!session.is_paused());
}

#[test]
fn test_paused_session_does_not_advance() {
    let mut session = arena();
    let before = session.player().body().position;
    let frame = session.player().animation_frame();
    session.tick(Intents {
        thrust: true,
        fire: true,
        pause: true,
        ..Intents::IDLE
    });
    for _ in 0..30 {
        session.tick(Intents {
            thrust: true,
            fire: true,
            ..Intents::IDLE
        });
    }
    assert_eq!(session.player().body().position, before);
    assert_eq!(session.player().animation_frame(), frame);
    assert_eq!(session.pending_count(), 0);
    assert!(session.snapshot().is_paused);

    session.tick(Intents {
        fire: true,
        pause: true,
        ..Intents::IDLE
    });
    assert!(!session.is_paused());
    assert_eq!(session.pending_count(), 1);
}

#[test]
fn test_snapshot_reports_ship_first() {
    let mut session = arena();
    session.tick(Intents {
        thrust: true,
        ..Intents::IDLE
    });
    let snapshot = session.snapshot();
    assert_eq!(snapshot.entities.len(), session.entities().len() + 1);
    let ship = snapshot.entities[0];
    assert_eq!(ship.kind, Kind::Player);
    assert_eq!(
        ship.shape,
        crate::sim::Shape::Ship {
            thrusting: true,
            animation_frame: 1
        }
    );
    assert_eq!(snapshot.lives, 3);
    assert_eq!(snapshot.level, 1);
    assert!(snapshot.can_draw_player);
    assert!(!snapshot.is_player_invulnerable);
}

#[test]
fn test_unhit_bullet_expires_after_lifespan() {
    let mut session = arena();
    let fire = Intents {
        fire: true,
        ..Intents::IDLE
    };
    session.tick(fire);
    assert_eq!(session.pending_count(), 1);
    let shot = session.world.pending()[0].id();

    let mut ticks = 0;
    loop {
        session.tick(Intents::IDLE);
        ticks += 1;
        if session.entities().iter().all(|e| e.id() != shot) {
            break;
        }
        assert!(ticks < crate::sim::bullet::LIFESPAN, "bullet outlived its lifespan");
    }
    assert_eq!(ticks, crate::sim::bullet::LIFESPAN);

    // The ship notices on its next update.
    assert_eq!(session.player().bullets(), &[shot]);
    session.tick(Intents::IDLE);
    assert!(session.player().bullets().is_empty());
}
