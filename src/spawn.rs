/// Timed appearance of the power-up.

use log::debug;
use rand::Rng;

use crate::entities::PowerUp;
use crate::geometry::Bounds;

#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    next_spawn_at: u64,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl SpawnScheduler {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, rng: &mut impl Rng, now: u64) -> Self {
        let mut scheduler = SpawnScheduler {
            next_spawn_at: 0,
            min_delay_ms,
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        };
        scheduler.reset(rng, now);
        scheduler
    }

    pub fn next_spawn_at(&self) -> u64 {
        self.next_spawn_at
    }

    /// Draw a fresh deadline `now + [min, max]` milliseconds.
    pub fn reset(&mut self, rng: &mut impl Rng, now: u64) {
        let delay = rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        self.next_spawn_at = now.saturating_add(delay);
    }

    pub fn postpone(&mut self, delta_ms: u64) {
        self.next_spawn_at = self.next_spawn_at.saturating_add(delta_ms);
    }

    /// Spawn the power-up once the deadline has passed. Paused while one is
    /// already active, so at most one is ever on the field.
    pub fn poll(
        &mut self,
        powerup: &mut PowerUp,
        rng: &mut impl Rng,
        bounds: Bounds,
        now: u64,
    ) -> bool {
        if powerup.is_active() || now < self.next_spawn_at {
            return false;
        }
        powerup.spawn(rng, bounds, now);
        self.reset(rng, now);
        debug!(
            "power-up spawned at {:?}, next eligible at {} ms",
            powerup.hitbox(),
            self.next_spawn_at
        );
        true
    }
}
