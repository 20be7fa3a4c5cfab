/// One session's entities and the per-tick simulation step.
///
/// All randomness comes through the injected `rng` and all timing through
/// `now`, so callers control determinism (tests use a seeded RNG and a
/// hand-driven clock).

use rand::Rng;

use crate::collision::{resolve_collisions, GameEvent};
use crate::config::GameConfig;
use crate::entities::{
    Coin, Enemy, EnemyBehavior, Entity, Player, PowerUp, Score, Targets,
};
use crate::geometry::Bounds;
use crate::platform::Input;
use crate::spawn::SpawnScheduler;

#[derive(Clone, Debug)]
pub struct World {
    pub bounds: Bounds,
    pub player: Player,
    pub enemy: Enemy,
    pub coin: Coin,
    pub powerup: PowerUp,
    pub scheduler: SpawnScheduler,
    pub score: Score,
}

impl World {
    pub fn new(
        config: &GameConfig,
        behavior: EnemyBehavior,
        rng: &mut impl Rng,
        now: u64,
    ) -> Self {
        let bounds = config.bounds();
        World {
            bounds,
            player: Player::new(
                config.player_spawn(),
                config.player_speed,
                config.initial_lives,
                config.frame_time_ms,
                now,
            ),
            enemy: build_enemy(config, behavior, now),
            coin: Coin::new(rng, bounds),
            powerup: PowerUp::new(config.powerup_lifetime_ms, config.powerup_duration_ms),
            scheduler: SpawnScheduler::new(
                config.spawn_delay_min_ms,
                config.spawn_delay_max_ms,
                rng,
                now,
            ),
            score: Score::default(),
        }
    }

    /// Start-of-session reset: score, lives, positions, power-up and scheduler.
    pub fn reset(&mut self, rng: &mut impl Rng, now: u64) {
        self.score.reset();
        self.player.reset();
        self.enemy.respawn();
        self.coin.respawn(rng, self.bounds);
        self.powerup.despawn();
        self.scheduler.reset(rng, now);
    }

    /// Shift every running deadline past a pause that began at `paused_at`
    /// and lasted `delta_ms`.
    pub fn postpone_deadlines(&mut self, paused_at: u64, delta_ms: u64) {
        self.player.postpone_invincibility(paused_at, delta_ms);
        self.powerup.postpone(delta_ms);
        self.scheduler.postpone(delta_ms);
    }
}

/// A brand-new enemy at the configured spawn point.
pub fn build_enemy(config: &GameConfig, behavior: EnemyBehavior, now: u64) -> Enemy {
    Enemy::new(
        behavior,
        config.enemy_spawn(),
        config.enemy_speed,
        config.frame_time_ms,
        now,
    )
}

/// Advance a playing session by one tick: player, enemy, power-up timing,
/// then collisions.
pub fn step<I: Input + ?Sized>(
    world: &mut World,
    input: &I,
    rng: &mut impl Rng,
    now: u64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let bounds = world.bounds;

    world.player.update(bounds, input, now);

    let targets = Targets {
        player: world.player.rect(),
        coin: Some(world.coin.rect()),
    };
    world.enemy.update(bounds, input, targets, now);

    world.scheduler.poll(&mut world.powerup, rng, bounds, now);
    if world.powerup.update(now) {
        events.push(GameEvent::PowerUpExpired);
    }

    events.extend(resolve_collisions(world, rng, now));
    events
}
