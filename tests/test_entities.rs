mod common;

use collect_the_point::animation::ROW_RIGHT;
use collect_the_point::entities::*;
use collect_the_point::geometry::{Bounds, Rect};
use collect_the_point::platform::{Key, SheetId};

use common::ScriptedInput;
use rand::rngs::StdRng;
use rand::SeedableRng;

const BOUNDS: Bounds = Bounds {
    width: 800,
    height: 600,
};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn player() -> Player {
    Player::new((100, 300), 5, 3, 120, 0)
}

fn chaser(target: TargetMode, spawn: (i32, i32)) -> Enemy {
    Enemy::new(EnemyBehavior::Autonomous { target }, spawn, 4, 120, 0)
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_moves_one_step_per_held_key() {
    let mut p = player();
    p.update(BOUNDS, &ScriptedInput::holding(&[Key::PlayerLeft]), 16);
    assert_eq!((p.rect().x, p.rect().y), (95, 300));
}

#[test]
fn player_diagonal_is_unscaled_sum() {
    let mut p = player();
    let input = ScriptedInput::holding(&[Key::PlayerRight, Key::PlayerDown]);
    p.update(BOUNDS, &input, 16);
    assert_eq!((p.rect().x, p.rect().y), (105, 305));
}

#[test]
fn player_opposite_keys_cancel() {
    let mut p = player();
    let input = ScriptedInput::holding(&[Key::PlayerLeft, Key::PlayerRight]);
    p.update(BOUNDS, &input, 16);
    assert_eq!((p.rect().x, p.rect().y), (100, 300));
}

#[test]
fn player_ignores_enemy_keys() {
    let mut p = player();
    let input = ScriptedInput::holding(&[Key::EnemyLeft, Key::EnemyUp]);
    p.update(BOUNDS, &input, 16);
    assert_eq!((p.rect().x, p.rect().y), (100, 300));
}

#[test]
fn player_step_is_truncated_at_the_edge() {
    let mut p = player();
    p.body_mut().set_position(3, 2);
    let input = ScriptedInput::holding(&[Key::PlayerLeft, Key::PlayerUp]);
    p.update(BOUNDS, &input, 16);
    assert_eq!((p.rect().x, p.rect().y), (0, 0));

    p.body_mut().set_position(716, 512);
    let input = ScriptedInput::holding(&[Key::PlayerRight, Key::PlayerDown]);
    p.update(BOUNDS, &input, 32);
    assert_eq!((p.rect().x, p.rect().y), (718, 514)); // W - w, H - h
}

#[test]
fn player_faces_direction_of_travel() {
    let mut p = player();
    p.update(BOUNDS, &ScriptedInput::holding(&[Key::PlayerRight]), 16);
    assert_eq!(p.animator().row(), ROW_RIGHT);
    // standing still keeps the last facing
    p.update(BOUNDS, &ScriptedInput::none(), 32);
    assert_eq!(p.animator().row(), ROW_RIGHT);
}

#[test]
fn invincibility_lasts_exactly_duration() {
    let mut p = player();
    assert!(!p.is_invincible(0));
    p.set_invincible(1000, 3000);
    assert!(p.is_invincible(1000));
    assert!(p.is_invincible(3999));
    assert!(!p.is_invincible(4000)); // deadline itself is not invincible
}

#[test]
fn invincibility_overwrites_instead_of_stacking() {
    let mut p = player();
    p.set_invincible(0, 3000);
    p.set_invincible(1000, 500);
    assert_eq!(p.invincible_until(), 1500);
    assert!(!p.is_invincible(2000));
}

#[test]
fn invincible_player_uses_other_sheet() {
    let mut p = player();
    assert_eq!(p.image(0).sheet, SheetId::Player);
    p.set_invincible(0, 100);
    assert_eq!(p.image(50).sheet, SheetId::PlayerInvincible);
    assert_eq!(p.image(100).sheet, SheetId::Player);
}

#[test]
fn reset_restores_lives_spawn_and_clears_invincibility() {
    let mut p = player();
    p.lives.lose_one();
    p.set_invincible(0, 5000);
    p.body_mut().set_position(400, 10);
    p.reset();
    assert_eq!(p.lives.remaining(), 3);
    assert!(!p.is_invincible(1));
    assert_eq!((p.rect().x, p.rect().y), (100, 300));
}

#[test]
fn lives_floor_at_zero() {
    let mut lives = Lives::new(1);
    lives.lose_one();
    lives.lose_one();
    assert_eq!(lives.remaining(), 0);
    assert!(lives.is_dead());
    lives.reset();
    assert_eq!(lives.remaining(), 1);
}

#[test]
fn score_counts_and_resets() {
    let mut score = Score::default();
    score.add(1);
    score.add(1);
    assert_eq!(score.points(), 2);
    score.reset();
    assert_eq!(score.points(), 0);
}

#[test]
fn postponing_extends_only_a_running_window() {
    let mut p = player();
    p.set_invincible(0, 100);
    p.postpone_invincibility(50, 1000);
    assert_eq!(p.invincible_until(), 1100);

    p.postpone_invincibility(2000, 1000);
    assert_eq!(p.invincible_until(), 1100);
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn chaser_steps_toward_player_on_unaligned_axis_only() {
    let mut e = chaser(TargetMode::PursuePlayer, (100, 300));
    let targets = Targets {
        player: Rect::new(500, 300, 82, 86),
        coin: None,
    };
    e.update(BOUNDS, &ScriptedInput::none(), targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (104, 300));
}

#[test]
fn chaser_moves_diagonally_while_both_axes_differ() {
    let mut e = chaser(TargetMode::PursuePlayer, (300, 300));
    let targets = Targets {
        player: Rect::new(100, 100, 82, 86),
        coin: None,
    };
    e.update(BOUNDS, &ScriptedInput::none(), targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (296, 296));
}

#[test]
fn chaser_stops_when_aligned() {
    let mut e = chaser(TargetMode::PursuePlayer, (200, 200));
    let targets = Targets {
        player: Rect::new(200, 200, 82, 86),
        coin: None,
    };
    e.update(BOUNDS, &ScriptedInput::none(), targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (200, 200));
    assert_eq!(e.animator().index(), 0); // no movement, no animation
}

#[test]
fn chaser_converges_on_target() {
    let mut e = chaser(TargetMode::PursuePlayer, (100, 100));
    let targets = Targets {
        player: Rect::new(300, 140, 82, 86),
        coin: None,
    };
    for t in 0..100 {
        e.update(BOUNDS, &ScriptedInput::none(), targets, t * 16);
    }
    assert_eq!(e.rect().center(), targets.player.center());
}

#[test]
fn chaser_lands_exactly_on_offsets_off_the_speed_grid() {
    // Centre starts at (141, 143); coin centre (314, 154) is 173 / 11 away.
    let mut e = chaser(TargetMode::PursueCoin, (100, 100));
    let targets = Targets {
        player: Rect::new(600, 500, 82, 86),
        coin: Some(Rect::new(302, 142, 24, 24)),
    };
    for t in 0..80 {
        e.update(BOUNDS, &ScriptedInput::none(), targets, t * 16);
    }
    assert_eq!(e.rect().center(), (314, 154));

    // Settled: further ticks neither move nor animate it.
    let frame = e.animator().index();
    for t in 80..120 {
        e.update(BOUNDS, &ScriptedInput::none(), targets, t * 16);
        assert_eq!(e.rect().center(), (314, 154));
    }
    assert_eq!(e.animator().index(), frame);
}

#[test]
fn pursuit_step_is_capped_by_remaining_offset() {
    assert_eq!(pursuit_step((0, 0), (3, -2), 4), (3, -2));
    assert_eq!(pursuit_step((0, 0), (9, -9), 4), (4, -4));
    assert_eq!(pursuit_step((5, 5), (5, 5), 4), (0, 0));
}

#[test]
fn coin_chaser_heads_for_coin_centre() {
    let mut e = chaser(TargetMode::PursueCoin, (300, 300));
    let targets = Targets {
        player: Rect::new(300, 500, 82, 86),
        coin: Some(Rect::new(600, 100, 24, 24)),
    };
    e.update(BOUNDS, &ScriptedInput::none(), targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (304, 296));
}

#[test]
fn coin_chaser_without_coin_falls_back_to_player() {
    let mut e = chaser(TargetMode::PursueCoin, (300, 300));
    let targets = Targets {
        player: Rect::new(300, 500, 82, 86),
        coin: None,
    };
    e.update(BOUNDS, &ScriptedInput::none(), targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (300, 304));
}

#[test]
fn human_enemy_reads_its_own_keys() {
    let mut e = Enemy::new(EnemyBehavior::Human, (300, 300), 4, 120, 0);
    let targets = Targets {
        player: Rect::new(0, 0, 82, 86),
        coin: None,
    };
    let input = ScriptedInput::holding(&[Key::EnemyLeft, Key::EnemyUp, Key::PlayerRight]);
    e.update(BOUNDS, &input, targets, 16);
    assert_eq!((e.rect().x, e.rect().y), (296, 296));
}

#[test]
fn enemy_respawns_to_spawn_point() {
    let mut e = Enemy::new(EnemyBehavior::Human, (660, 300), 4, 120, 0);
    e.body_mut().set_position(10, 10);
    e.respawn();
    assert_eq!((e.rect().x, e.rect().y), (660, 300));
    assert_eq!(e.body().spawn_point(), (660, 300));
}

#[test]
fn pursuit_step_is_not_normalised() {
    assert_eq!(pursuit_step((0, 0), (10, 10), 4), (4, 4));
    assert_eq!(pursuit_step((0, 0), (10, 0), 4), (4, 0));
    assert_eq!(pursuit_step((10, 10), (0, 0), 4), (-4, -4));
    assert_eq!(pursuit_step((3, 3), (3, 3), 4), (0, 0));
}

// ── Coin & power-up ───────────────────────────────────────────────────────────

#[test]
fn coin_respawn_keeps_whole_sprite_on_screen() {
    let mut rng = seeded_rng();
    let mut coin = Coin::new(&mut rng, BOUNDS);
    let r = coin.radius();
    for _ in 0..1000 {
        coin.respawn(&mut rng, BOUNDS);
        let (cx, cy) = coin.rect().center();
        assert!(cx >= r && cx <= BOUNDS.width - r, "cx = {cx}");
        assert!(cy >= r && cy <= BOUNDS.height - r, "cy = {cy}");
        assert!(coin.rect().x >= 0 && coin.rect().right() <= BOUNDS.width);
        assert!(coin.rect().y >= 0 && coin.rect().bottom() <= BOUNDS.height);
    }
}

#[test]
fn powerup_spawn_stays_within_radius_margin() {
    let mut rng = seeded_rng();
    let mut powerup = PowerUp::new(6000, 3000);
    let r = powerup.radius();
    for t in 0..500 {
        powerup.spawn(&mut rng, BOUNDS, t);
        let (cx, cy) = powerup.rect().center();
        assert!(cx >= r && cx <= BOUNDS.width - r);
        assert!(cy >= r && cy <= BOUNDS.height - r);
    }
}

#[test]
fn powerup_expires_after_lifetime() {
    let mut rng = seeded_rng();
    let mut powerup = PowerUp::new(6000, 3000);
    powerup.spawn(&mut rng, BOUNDS, 0);

    assert!(!powerup.update(5999));
    assert!(powerup.is_active());
    assert!(!powerup.update(6000));
    assert!(powerup.is_active());
    assert!(powerup.update(6001));
    assert!(!powerup.is_active());
}

#[test]
fn inactive_powerup_has_no_hitbox() {
    let mut rng = seeded_rng();
    let mut powerup = PowerUp::new(6000, 3000);
    assert_eq!(powerup.hitbox(), None);
    powerup.spawn(&mut rng, BOUNDS, 0);
    assert!(powerup.hitbox().is_some());
    powerup.despawn();
    powerup.despawn(); // idempotent
    assert_eq!(powerup.hitbox(), None);
    assert!(!powerup.update(10_000));
}

#[test]
fn behavior_maps_to_and_from_mode() {
    assert_eq!(
        EnemyBehavior::from_mode(EnemyMode::Human, TargetMode::PursueCoin),
        EnemyBehavior::Human
    );
    let auto = EnemyBehavior::from_mode(EnemyMode::Autonomous, TargetMode::PursueCoin);
    assert_eq!(
        auto,
        EnemyBehavior::Autonomous {
            target: TargetMode::PursueCoin
        }
    );
    assert_eq!(auto.mode(), EnemyMode::Autonomous);
}
