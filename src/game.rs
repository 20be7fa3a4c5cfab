/// The game state machine: menu, playing, paused and game over.
///
/// `Game` owns the session (`World`), the sound manager and the RNG. Each
/// tick it turns the held-key snapshot into one-shot commands, routes them
/// according to the current state, and advances the world while playing.
/// Drawing only reads the state left behind by the last tick.

use std::collections::HashSet;

use log::info;
use rand::rngs::StdRng;

use crate::audio::SoundManager;
use crate::compute::{build_enemy, step, World};
use crate::config::GameConfig;
use crate::entities::{EnemyBehavior, EnemyMode, Entity, TargetMode};
use crate::error::ConfigError;
use crate::platform::{Audio, Color, Input, Key, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Whether the driver should keep calling `tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::rgb(0, 0, 0);
const C_TEXT: Color = Color::rgb(240, 240, 240);
const C_HINT: Color = Color::rgb(200, 200, 200);
const C_OPTION: Color = Color::rgb(220, 220, 220);
const C_SELECTED: Color = Color::rgb(255, 220, 60);
const C_GAME_OVER: Color = Color::rgb(255, 120, 120);

/// Nominal text advance in playfield pixels, used to centre lines.
const GLYPH_WIDTH: i32 = 10;

pub struct Game<A: Audio> {
    config: GameConfig,
    state: GameState,
    world: World,
    enemy_mode: Option<EnemyMode>,
    target_mode: TargetMode,
    sound: SoundManager<A>,
    rng: StdRng,
    /// Command keys held on the previous tick.
    held: HashSet<Key>,
    /// When the current pause began. Deadlines are frozen at this instant.
    paused_at: Option<u64>,
}

impl<A: Audio> Game<A> {
    pub fn new(config: GameConfig, audio: A, mut rng: StdRng, now: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let target_mode = TargetMode::PursuePlayer;
        let world = World::new(
            &config,
            EnemyBehavior::from_mode(EnemyMode::Human, target_mode),
            &mut rng,
            now,
        );
        let sound = SoundManager::new(audio, config.music_track.clone(), config.music_volume);
        Ok(Game {
            config,
            state: GameState::Menu,
            world,
            enemy_mode: None,
            target_mode,
            sound,
            rng,
            held: HashSet::new(),
            paused_at: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn enemy_mode(&self) -> Option<EnemyMode> {
        self.enemy_mode
    }

    pub fn target_mode(&self) -> TargetMode {
        self.target_mode
    }

    pub fn sound(&self) -> &SoundManager<A> {
        &self.sound
    }

    pub fn score(&self) -> u32 {
        self.world.score.points()
    }

    pub fn lives(&self) -> u32 {
        self.world.player.lives.remaining()
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    pub fn tick<I: Input + ?Sized>(&mut self, input: &I, now: u64) -> Flow {
        if input.quit_requested() {
            self.sound.stop_music();
            return Flow::Quit;
        }

        for key in self.newly_pressed(input) {
            if self.handle_command(key, now) == Flow::Quit {
                return Flow::Quit;
            }
        }

        if self.state == GameState::Playing {
            let events = step(&mut self.world, input, &mut self.rng, now);
            for event in events {
                if let Some(name) = event.sound() {
                    self.sound.play(name);
                }
            }

            if self.world.player.lives.is_dead() {
                self.set_state(GameState::GameOver);
                self.sound.stop_music();
            }
        }

        Flow::Continue
    }

    /// Command keys that went from released to held since the last tick.
    fn newly_pressed<I: Input + ?Sized>(&mut self, input: &I) -> Vec<Key> {
        let mut pressed = Vec::new();
        for key in Key::COMMANDS {
            if input.is_held(key) {
                if self.held.insert(key) {
                    pressed.push(key);
                }
            } else {
                self.held.remove(&key);
            }
        }
        pressed
    }

    fn handle_command(&mut self, key: Key, now: u64) -> Flow {
        if key == Key::Mute {
            self.sound.toggle_mute();
            return Flow::Continue;
        }

        match (self.state, key) {
            (GameState::Menu, Key::SelectHuman) => self.select_enemy_mode(EnemyMode::Human, now),
            (GameState::Menu, Key::SelectAutonomous) => {
                self.select_enemy_mode(EnemyMode::Autonomous, now)
            }
            (GameState::Menu, Key::TargetPlayer) => self.select_target(TargetMode::PursuePlayer, now),
            (GameState::Menu, Key::TargetCoin) => self.select_target(TargetMode::PursueCoin, now),
            (GameState::Menu, Key::Confirm) => self.start_session(now),

            (GameState::Playing, Key::Pause) => {
                self.paused_at = Some(now);
                self.set_state(GameState::Paused);
            }
            (GameState::Paused, Key::Pause) => self.resume(now),
            (GameState::Playing, Key::Cancel) | (GameState::Paused, Key::Cancel) => {
                self.paused_at = None;
                self.set_state(GameState::Menu);
                self.sound.stop_music();
            }

            (GameState::GameOver, Key::Restart) => self.start_session(now),
            (GameState::GameOver, Key::Cancel) => {
                self.sound.stop_music();
                info!("exit requested from game over");
                return Flow::Quit;
            }

            _ => {}
        }
        Flow::Continue
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            info!("state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn resume(&mut self, now: u64) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused_for = now.saturating_sub(paused_at);
            self.world.postpone_deadlines(paused_at, paused_for);
            info!("resumed after {} ms", paused_for);
        }
        self.set_state(GameState::Playing);
    }

    /// Replace the enemy with a fresh one of the chosen mode.
    fn select_enemy_mode(&mut self, mode: EnemyMode, now: u64) {
        self.enemy_mode = Some(mode);
        self.rebuild_enemy(now);
    }

    fn select_target(&mut self, target: TargetMode, now: u64) {
        self.target_mode = target;
        if self.enemy_mode == Some(EnemyMode::Autonomous) {
            self.rebuild_enemy(now);
        }
    }

    fn rebuild_enemy(&mut self, now: u64) {
        let mode = self.enemy_mode.unwrap_or(EnemyMode::Human);
        let behavior = EnemyBehavior::from_mode(mode, self.target_mode);
        self.world.enemy = build_enemy(&self.config, behavior, now);
        info!("enemy is now {:?}", behavior);
    }

    fn start_session(&mut self, now: u64) {
        let mode = *self.enemy_mode.get_or_insert(EnemyMode::Human);
        let behavior = EnemyBehavior::from_mode(mode, self.target_mode);
        if self.world.enemy.behavior() != behavior {
            self.rebuild_enemy(now);
        }
        self.world.reset(&mut self.rng, now);
        self.paused_at = None;
        info!("new session, enemy {:?}", behavior);
        self.set_state(GameState::Playing);
        self.sound.start_music();
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    /// Render one complete frame.
    pub fn draw<S: Surface>(&self, surface: &mut S, now: u64) -> Result<(), S::Error> {
        let now = self.paused_at.unwrap_or(now);
        surface.clear(C_BACKGROUND)?;

        match self.state {
            GameState::Menu => self.draw_menu(surface)?,
            GameState::Playing => {
                self.draw_world(surface, now)?;
                self.draw_hud(surface, now)?;
            }
            GameState::Paused => {
                self.draw_world(surface, now)?;
                self.draw_hud(surface, now)?;
                self.draw_centered(surface, "PAUSED", 220, C_TEXT)?;
            }
            GameState::GameOver => self.draw_game_over(surface)?,
        }

        surface.present()
    }

    fn draw_entity<S: Surface>(surface: &mut S, entity: &dyn Entity, now: u64) -> Result<(), S::Error> {
        surface.blit(&entity.image(now), entity.rect())
    }

    fn draw_world<S: Surface>(&self, surface: &mut S, now: u64) -> Result<(), S::Error> {
        let world = &self.world;
        Self::draw_entity(surface, &world.player, now)?;
        Self::draw_entity(surface, &world.enemy, now)?;
        Self::draw_entity(surface, &world.coin, now)?;
        if world.powerup.is_active() {
            Self::draw_entity(surface, &world.powerup, now)?;
        }
        Ok(())
    }

    fn draw_hud<S: Surface>(&self, surface: &mut S, now: u64) -> Result<(), S::Error> {
        let h = self.config.height;
        surface.draw_text(&format!("Score: {}", self.score()), 10, 10, C_TEXT)?;
        surface.draw_text(&format!("Lives: {}", self.lives()), 10, 45, C_TEXT)?;

        let status = format!(
            "Mute: {} (M) | Invincible: {}",
            if self.sound.is_muted() { "ON" } else { "OFF" },
            if self.world.player.is_invincible(now) { "YES" } else { "NO" },
        );
        surface.draw_text(&status, 10, h - 90, C_HINT)?;

        let mode = match self.world.enemy.behavior() {
            EnemyBehavior::Human => "Enemy: HUMAN (WASD)".to_string(),
            EnemyBehavior::Autonomous { target } => {
                format!("Enemy: AUTO | Target: {}", target_label(target))
            }
        };
        surface.draw_text(&mode, 10, h - 60, C_HINT)?;
        surface.draw_text("Player: Arrows | P: Pause | ESC: Menu", 10, h - 30, C_HINT)
    }

    fn draw_menu<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.draw_centered(surface, "COLLECT THE POINT", 110, C_TEXT)?;
        self.draw_centered(surface, "1) Human enemy (WASD)", 240, C_OPTION)?;
        self.draw_centered(surface, "2) Autonomous enemy", 280, C_OPTION)?;
        self.draw_centered(surface, "J) AI chases the player", 340, C_OPTION)?;
        self.draw_centered(surface, "C) AI chases the coin", 380, C_OPTION)?;

        let selected = match self.enemy_mode {
            None => "None",
            Some(EnemyMode::Human) => "HUMAN",
            Some(EnemyMode::Autonomous) => "AUTO",
        };
        let info = format!(
            "Selected: {} | AI target: {}",
            selected,
            target_label(self.target_mode)
        );
        self.draw_centered(surface, &info, 460, C_SELECTED)?;
        self.draw_centered(surface, "Enter: start | M: mute", 520, C_HINT)
    }

    fn draw_game_over<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.draw_centered(surface, "GAME OVER", 160, C_GAME_OVER)?;
        self.draw_centered(surface, &format!("Final score: {}", self.score()), 250, C_TEXT)?;
        self.draw_centered(surface, "R: restart | ESC: quit | M: mute", 340, C_OPTION)
    }

    fn draw_centered<S: Surface>(&self, surface: &mut S, text: &str, y: i32, color: Color) -> Result<(), S::Error> {
        let width = text.chars().count() as i32 * GLYPH_WIDTH;
        let x = (self.config.width / 2 - width / 2).max(0);
        surface.draw_text(text, x, y, color)
    }
}

fn target_label(target: TargetMode) -> &'static str {
    match target {
        TargetMode::PursuePlayer => "Player",
        TargetMode::PursueCoin => "Coin",
    }
}
