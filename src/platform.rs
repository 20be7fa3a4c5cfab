/// Contracts the game core consumes from its environment.
///
/// The core never opens windows, decodes assets or talks to a sound card.
/// A front end supplies a held-key snapshot, a millisecond clock, a drawing
/// surface and an audio sink; the core only produces draw calls and audio
/// triggers against them.

use crate::geometry::Rect;

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    PlayerUp,
    PlayerDown,
    PlayerLeft,
    PlayerRight,
    EnemyUp,
    EnemyDown,
    EnemyLeft,
    EnemyRight,
    Pause,
    Confirm,
    Restart,
    Cancel,
    Mute,
    SelectHuman,
    SelectAutonomous,
    TargetPlayer,
    TargetCoin,
}

impl Key {
    /// Keys that act once per press rather than every tick they are held.
    pub const COMMANDS: [Key; 9] = [
        Key::Pause,
        Key::Confirm,
        Key::Restart,
        Key::Cancel,
        Key::Mute,
        Key::SelectHuman,
        Key::SelectAutonomous,
        Key::TargetPlayer,
        Key::TargetCoin,
    ];
}

/// Four directional keys driving one movable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
}

pub const PLAYER_KEYS: DirectionKeys = DirectionKeys {
    up: Key::PlayerUp,
    down: Key::PlayerDown,
    left: Key::PlayerLeft,
    right: Key::PlayerRight,
};

pub const ENEMY_KEYS: DirectionKeys = DirectionKeys {
    up: Key::EnemyUp,
    down: Key::EnemyDown,
    left: Key::EnemyLeft,
    right: Key::EnemyRight,
};

pub trait Input {
    fn is_held(&self, key: Key) -> bool;
    fn quit_requested(&self) -> bool;
}

/// Sum of held directions, `speed` pixels per axis. Opposite keys cancel.
pub fn displacement<I: Input + ?Sized>(input: &I, keys: DirectionKeys, speed: i32) -> (i32, i32) {
    let mut dx = 0;
    let mut dy = 0;
    if input.is_held(keys.left) {
        dx -= speed;
    }
    if input.is_held(keys.right) {
        dx += speed;
    }
    if input.is_held(keys.up) {
        dy -= speed;
    }
    if input.is_held(keys.down) {
        dy += speed;
    }
    (dx, dy)
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Monotonic, non-decreasing milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ── Drawing ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SheetId {
    Player,
    PlayerInvincible,
    Enemy,
    Coin,
    PowerUp,
}

/// One frame cut out of a sprite sheet. `src` is the source rectangle in
/// sheet pixels; `row` and `column` locate it in the frame table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image {
    pub sheet: SheetId,
    pub src: Rect,
    pub row: usize,
    pub column: usize,
}

impl Image {
    /// Same frame, looked up on another sheet of identical layout.
    pub fn on_sheet(self, sheet: SheetId) -> Self {
        Image { sheet, ..self }
    }
}

pub trait Surface {
    type Error;

    fn clear(&mut self, color: Color) -> Result<(), Self::Error>;
    fn blit(&mut self, image: &Image, dest: Rect) -> Result<(), Self::Error>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<(), Self::Error>;
    fn present(&mut self) -> Result<(), Self::Error>;
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Fire-and-forget audio. Implementations must swallow their own failures.
pub trait Audio {
    fn play_sound(&mut self, name: &str);
    fn set_music_volume(&mut self, volume: f32);
    fn loop_music(&mut self, track: &str);
    fn stop_music(&mut self);
}
