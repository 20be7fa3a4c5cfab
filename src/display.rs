/// Rendering layer: all terminal output lives here.
///
/// The game draws in playfield pixels; this surface scales every rectangle
/// and text position onto the terminal grid and paints sprites as coloured
/// glyph blocks. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use collect_the_point::animation::{ROW_DOWN, ROW_LEFT, ROW_RIGHT, ROW_UP};
use collect_the_point::geometry::{Bounds, Rect};
use collect_the_point::platform::{self, Image, SheetId, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::Rgb { r: 70, g: 180, b: 255 };
const C_PLAYER_INVINCIBLE: Color = Color::Rgb { r: 140, g: 255, b: 180 };
const C_ENEMY: Color = Color::Rgb { r: 255, g: 90, b: 90 };
const C_COIN: Color = Color::Rgb { r: 255, g: 220, b: 60 };
const C_POWERUP: Color = Color::Rgb { r: 200, g: 120, b: 255 };

/// Walk-cycle shading, one per sheet column.
const SHADES: [char; 4] = ['█', '▓', '█', '▒'];

pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    playfield: Bounds,
    cols: u16,
    rows: u16,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, playfield: Bounds, cols: u16, rows: u16) -> Self {
        TerminalSurface {
            out,
            playfield,
            cols,
            rows,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Terminal cell for a playfield point, kept on-screen.
    pub fn cell(&self, x: i32, y: i32) -> (u16, u16) {
        (
            scale(x, self.playfield.width, self.cols),
            scale(y, self.playfield.height, self.rows),
        )
    }
}

fn scale(v: i32, extent: i32, cells: u16) -> u16 {
    if extent <= 0 || cells == 0 {
        return 0;
    }
    let c = i64::from(v.max(0)) * i64::from(cells) / i64::from(extent);
    c.min(i64::from(cells) - 1) as u16
}

fn to_color(c: platform::Color) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

fn facing_glyph(row: usize) -> char {
    match row {
        ROW_DOWN => '▼',
        ROW_LEFT => '◄',
        ROW_RIGHT => '►',
        ROW_UP => '▲',
        _ => '●',
    }
}

impl<W: Write> Surface for TerminalSurface<'_, W> {
    type Error = std::io::Error;

    fn clear(&mut self, color: platform::Color) -> std::io::Result<()> {
        self.out.queue(style::SetBackgroundColor(to_color(color)))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn blit(&mut self, image: &Image, dest: Rect) -> std::io::Result<()> {
        let (left, top) = self.cell(dest.x, dest.y);
        let (right, bottom) = self.cell(dest.right() - 1, dest.bottom() - 1);

        let (color, fill, mark) = match image.sheet {
            SheetId::Player => (C_PLAYER, SHADES[image.column % 4], Some(facing_glyph(image.row))),
            SheetId::PlayerInvincible => (
                C_PLAYER_INVINCIBLE,
                SHADES[image.column % 4],
                Some(facing_glyph(image.row)),
            ),
            SheetId::Enemy => (C_ENEMY, SHADES[image.column % 4], Some(facing_glyph(image.row))),
            SheetId::Coin => (C_COIN, '●', None),
            SheetId::PowerUp => (C_POWERUP, '◆', None),
        };

        self.out.queue(style::SetForegroundColor(color))?;
        let width = usize::from(right.saturating_sub(left)) + 1;
        for row in top..=bottom {
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print(fill.to_string().repeat(width)))?;
        }

        if let Some(mark) = mark {
            let cx = left + right.saturating_sub(left) / 2;
            let cy = top + bottom.saturating_sub(top) / 2;
            self.out.queue(cursor::MoveTo(cx, cy))?;
            self.out.queue(style::SetForegroundColor(Color::White))?;
            self.out.queue(Print(mark))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: platform::Color) -> std::io::Result<()> {
        let (col, row) = self.cell(x, y);
        let room = usize::from(self.cols.saturating_sub(col));
        let clipped: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(to_color(color)))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
