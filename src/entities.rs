/// Game entities: the player, the enemy, the coin and the power-up.
///
/// Every entity is a `Body` (a rectangle plus the spawn point it returns to)
/// with its own per-tick `update`. Movement always applies the displacement
/// first and clamps into the playfield afterwards, so an overshooting step is
/// cut short at the edge.

use rand::Rng;

use crate::animation::{facing_row, FrameAnimator, SpriteSheet, CHARACTER_SHEET};
use crate::geometry::{Bounds, Rect};
use crate::platform::{displacement, Image, Input, SheetId, ENEMY_KEYS, PLAYER_KEYS};

pub const COIN_SIZE: i32 = 24;
pub const POWERUP_SIZE: i32 = 28;

// ── Base ──────────────────────────────────────────────────────────────────────

pub trait Entity {
    fn rect(&self) -> Rect;
    fn image(&self, now: u64) -> Image;
}

#[derive(Clone, Debug)]
pub struct Body {
    rect: Rect,
    spawn: (i32, i32),
}

impl Body {
    pub fn new(spawn: (i32, i32), w: i32, h: i32) -> Self {
        Body {
            rect: Rect::new(spawn.0, spawn.1, w.max(0), h.max(0)),
            spawn,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn spawn_point(&self) -> (i32, i32) {
        self.spawn
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn respawn(&mut self) {
        self.set_position(self.spawn.0, self.spawn.1);
    }

    /// Apply a displacement, then clamp into the playfield.
    pub fn move_within(&mut self, dx: i32, dy: i32, bounds: Bounds) {
        self.rect.translate(dx, dy);
        self.rect.clamp_into(bounds);
    }

    /// Place the centre uniformly at random so the whole rectangle is on-screen.
    fn place_randomly(&mut self, rng: &mut impl Rng, bounds: Bounds) {
        let rx = self.rect.w / 2;
        let ry = self.rect.h / 2;
        let cx = rng.gen_range(rx..=(bounds.width - rx).max(rx));
        let cy = rng.gen_range(ry..=(bounds.height - ry).max(ry));
        self.rect.set_center(cx, cy);
    }
}

// ── Counters ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lives {
    initial: u32,
    remaining: u32,
}

impl Lives {
    pub fn new(initial: u32) -> Self {
        Lives {
            initial,
            remaining: initial,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }

    pub fn lose_one(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_dead(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    points: u32,
}

impl Score {
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn add(&mut self, amount: u32) {
        self.points = self.points.saturating_add(amount);
    }

    pub fn reset(&mut self) {
        self.points = 0;
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    body: Body,
    speed: i32,
    pub lives: Lives,
    invincible_until: u64,
    animator: FrameAnimator,
}

impl Player {
    pub fn new(spawn: (i32, i32), speed: i32, lives: u32, frame_time_ms: u64, now: u64) -> Self {
        let (w, h) = CHARACTER_SHEET.drawn_size();
        Player {
            body: Body::new(spawn, w, h),
            speed,
            lives: Lives::new(lives),
            invincible_until: 0,
            animator: FrameAnimator::new(CHARACTER_SHEET, frame_time_ms, now),
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn animator(&self) -> &FrameAnimator {
        &self.animator
    }

    pub fn update<I: Input + ?Sized>(&mut self, bounds: Bounds, input: &I, now: u64) {
        let (dx, dy) = displacement(input, PLAYER_KEYS, self.speed);
        self.body.move_within(dx, dy, bounds);

        if let Some(row) = facing_row(dx, dy) {
            if row != self.animator.row() {
                self.animator.select_row(row);
            }
        }
        self.animator.advance(now);
    }

    pub fn is_invincible(&self, now: u64) -> bool {
        now < self.invincible_until
    }

    /// Overwrites any running window; windows never stack.
    pub fn set_invincible(&mut self, now: u64, duration_ms: u64) {
        self.invincible_until = now.saturating_add(duration_ms);
    }

    pub fn invincible_until(&self) -> u64 {
        self.invincible_until
    }

    /// Push a window still running at `paused_at` back by `delta_ms`.
    pub fn postpone_invincibility(&mut self, paused_at: u64, delta_ms: u64) {
        if self.invincible_until > paused_at {
            self.invincible_until = self.invincible_until.saturating_add(delta_ms);
        }
    }

    pub fn respawn(&mut self) {
        self.body.respawn();
    }

    /// Fresh session: full lives, no invincibility, back at the spawn point.
    pub fn reset(&mut self) {
        self.lives.reset();
        self.invincible_until = 0;
        self.body.respawn();
    }
}

impl Entity for Player {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn image(&self, now: u64) -> Image {
        let frame = self.animator.current();
        if self.is_invincible(now) {
            frame.on_sheet(SheetId::PlayerInvincible)
        } else {
            frame
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyMode {
    Human,
    Autonomous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetMode {
    PursuePlayer,
    PursueCoin,
}

/// Fixed at construction. Changing behaviour means building a new `Enemy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyBehavior {
    Human,
    Autonomous { target: TargetMode },
}

impl EnemyBehavior {
    pub fn from_mode(mode: EnemyMode, target: TargetMode) -> Self {
        match mode {
            EnemyMode::Human => EnemyBehavior::Human,
            EnemyMode::Autonomous => EnemyBehavior::Autonomous { target },
        }
    }

    pub fn mode(&self) -> EnemyMode {
        match self {
            EnemyBehavior::Human => EnemyMode::Human,
            EnemyBehavior::Autonomous { .. } => EnemyMode::Autonomous,
        }
    }
}

/// Read-only view of what an autonomous enemy may chase.
#[derive(Clone, Copy, Debug)]
pub struct Targets {
    pub player: Rect,
    pub coin: Option<Rect>,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    body: Body,
    speed: i32,
    behavior: EnemyBehavior,
    animator: FrameAnimator,
}

impl Enemy {
    pub fn new(
        behavior: EnemyBehavior,
        spawn: (i32, i32),
        speed: i32,
        frame_time_ms: u64,
        now: u64,
    ) -> Self {
        let sheet: SpriteSheet = CHARACTER_SHEET.with_id(SheetId::Enemy);
        let (w, h) = sheet.drawn_size();
        Enemy {
            body: Body::new(spawn, w, h),
            speed,
            behavior,
            animator: FrameAnimator::new(sheet, frame_time_ms, now),
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn behavior(&self) -> EnemyBehavior {
        self.behavior
    }

    pub fn animator(&self) -> &FrameAnimator {
        &self.animator
    }

    pub fn update<I: Input + ?Sized>(&mut self, bounds: Bounds, input: &I, targets: Targets, now: u64) {
        let (dx, dy) = match self.behavior {
            EnemyBehavior::Human => displacement(input, ENEMY_KEYS, self.speed),
            EnemyBehavior::Autonomous { target } => {
                let goal = match (target, targets.coin) {
                    (TargetMode::PursueCoin, Some(coin)) => coin,
                    _ => targets.player,
                };
                pursuit_step(self.body.rect().center(), goal.center(), self.speed)
            }
        };

        self.body.move_within(dx, dy, bounds);

        if let Some(row) = facing_row(dx, dy) {
            if row != self.animator.row() {
                self.animator.select_row(row);
            }
            self.animator.advance(now);
        }
    }

    pub fn respawn(&mut self) {
        self.body.respawn();
    }
}

impl Entity for Enemy {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn image(&self, _now: u64) -> Image {
        self.animator.current()
    }
}

/// Greedy chase: up to one `speed` step along every axis that is not yet
/// aligned, never past the target. Diagonals are not normalised.
pub fn pursuit_step(from: (i32, i32), to: (i32, i32), speed: i32) -> (i32, i32) {
    (axis_step(to.0 - from.0, speed), axis_step(to.1 - from.1, speed))
}

fn axis_step(offset: i32, speed: i32) -> i32 {
    speed.min(offset.abs()) * offset.signum()
}

// ── Coin ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Coin {
    body: Body,
}

impl Coin {
    pub fn new(rng: &mut impl Rng, bounds: Bounds) -> Self {
        let mut coin = Coin {
            body: Body::new((0, 0), COIN_SIZE, COIN_SIZE),
        };
        coin.respawn(rng, bounds);
        coin
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn radius(&self) -> i32 {
        self.body.rect().w / 2
    }

    pub fn respawn(&mut self, rng: &mut impl Rng, bounds: Bounds) {
        self.body.place_randomly(rng, bounds);
    }
}

impl Entity for Coin {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn image(&self, _now: u64) -> Image {
        Image {
            sheet: SheetId::Coin,
            src: Rect::new(0, 0, COIN_SIZE, COIN_SIZE),
            row: 0,
            column: 0,
        }
    }
}

// ── Power-up ──────────────────────────────────────────────────────────────────

/// Invincibility pickup. Its position is only meaningful while `active`.
#[derive(Clone, Debug)]
pub struct PowerUp {
    body: Body,
    active: bool,
    spawned_at: u64,
    lifetime_ms: u64,
    duration_ms: u64,
}

impl PowerUp {
    pub fn new(lifetime_ms: u64, duration_ms: u64) -> Self {
        PowerUp {
            body: Body::new((0, 0), POWERUP_SIZE, POWERUP_SIZE),
            active: false,
            spawned_at: 0,
            lifetime_ms,
            duration_ms,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawned_at(&self) -> u64 {
        self.spawned_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn radius(&self) -> i32 {
        self.body.rect().w / 2
    }

    /// Rectangle to draw and collide with, `None` while inactive.
    pub fn hitbox(&self) -> Option<Rect> {
        self.active.then(|| self.body.rect())
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn spawn(&mut self, rng: &mut impl Rng, bounds: Bounds, now: u64) {
        self.body.place_randomly(rng, bounds);
        self.active = true;
        self.spawned_at = now;
    }

    pub fn despawn(&mut self) {
        self.active = false;
    }

    /// Time spent paused does not count against the lifetime.
    pub fn postpone(&mut self, delta_ms: u64) {
        if self.active {
            self.spawned_at = self.spawned_at.saturating_add(delta_ms);
        }
    }

    /// Expire an unclaimed power-up once it has outlived `lifetime_ms`.
    /// Returns whether it expired on this call.
    pub fn update(&mut self, now: u64) -> bool {
        if self.active && now.saturating_sub(self.spawned_at) > self.lifetime_ms {
            self.despawn();
            return true;
        }
        false
    }
}

impl Entity for PowerUp {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn image(&self, _now: u64) -> Image {
        Image {
            sheet: SheetId::PowerUp,
            src: Rect::new(0, 0, POWERUP_SIZE, POWERUP_SIZE),
            row: 0,
            column: 0,
        }
    }
}
