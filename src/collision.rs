/// Pickup and hit resolution, run once per playing tick.
///
/// The three checks run in a fixed order and touch disjoint entity pairs:
/// player↔coin, player↔power-up, enemy↔player.

use log::debug;
use rand::Rng;

use crate::compute::World;
use crate::entities::Entity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    PowerUpCollected,
    PowerUpExpired,
    PlayerHit,
}

impl GameEvent {
    /// Name of the sound effect this event triggers, if any.
    pub fn sound(&self) -> Option<&'static str> {
        match self {
            GameEvent::CoinCollected => Some("coin"),
            GameEvent::PowerUpCollected => Some("power"),
            GameEvent::PlayerHit => Some("hit"),
            GameEvent::PowerUpExpired => None,
        }
    }
}

pub fn resolve_collisions(world: &mut World, rng: &mut impl Rng, now: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let bounds = world.bounds;

    // 1. Coin
    if world.player.rect().overlaps(&world.coin.rect()) {
        world.score.add(1);
        world.coin.respawn(rng, bounds);
        debug!("coin collected, score {}", world.score.points());
        events.push(GameEvent::CoinCollected);
    }

    // 2. Power-up, only while it is on the field
    if let Some(hitbox) = world.powerup.hitbox() {
        if world.player.rect().overlaps(&hitbox) {
            world
                .player
                .set_invincible(now, world.powerup.duration_ms());
            world.powerup.despawn();
            debug!(
                "power-up collected, invincible until {} ms",
                world.player.invincible_until()
            );
            events.push(GameEvent::PowerUpCollected);
        }
    }

    // 3. Enemy, ignored entirely while invincible
    if !world.player.is_invincible(now) && world.enemy.rect().overlaps(&world.player.rect()) {
        world.player.lives.lose_one();
        world.player.respawn();
        world.enemy.respawn();
        world.coin.respawn(rng, bounds);
        world.powerup.despawn();
        debug!(
            "player hit, {} lives left",
            world.player.lives.remaining()
        );
        events.push(GameEvent::PlayerHit);
    }

    events
}
