/// Sprite-sheet slicing and timed frame advance.

use crate::geometry::Rect;
use crate::platform::{Image, SheetId};

// ── Facing rows ───────────────────────────────────────────────────────────────

pub const ROW_DOWN: usize = 0;
pub const ROW_LEFT: usize = 1;
pub const ROW_RIGHT: usize = 2;
pub const ROW_UP: usize = 3;

/// Row for a displacement, or `None` when standing still.
/// The dominant axis wins; ties go to the vertical rows.
pub fn facing_row(dx: i32, dy: i32) -> Option<usize> {
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0 { ROW_RIGHT } else { ROW_LEFT })
    } else {
        Some(if dy > 0 { ROW_DOWN } else { ROW_UP })
    }
}

// ── Sheet geometry ────────────────────────────────────────────────────────────

/// Layout of a sheet: `rows × cols` frames of `frame_w × frame_h` pixels,
/// drawn `scale` times larger on the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSheet {
    pub id: SheetId,
    pub frame_w: i32,
    pub frame_h: i32,
    pub rows: usize,
    pub cols: usize,
    pub scale: i32,
}

/// Four walking directions, four frames each.
pub const CHARACTER_SHEET: SpriteSheet = SpriteSheet {
    id: SheetId::Player,
    frame_w: 41,
    frame_h: 43,
    rows: 4,
    cols: 4,
    scale: 2,
};

impl SpriteSheet {
    pub fn with_id(self, id: SheetId) -> Self {
        SpriteSheet { id, ..self }
    }

    /// On-screen size of one frame.
    pub fn drawn_size(&self) -> (i32, i32) {
        (self.frame_w * self.scale, self.frame_h * self.scale)
    }

    /// Cut the sheet into a row-major frame table.
    pub fn slice(&self) -> Vec<Vec<Image>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|column| Image {
                        sheet: self.id,
                        src: Rect::new(
                            column as i32 * self.frame_w,
                            row as i32 * self.frame_h,
                            self.frame_w,
                            self.frame_h,
                        ),
                        row,
                        column,
                    })
                    .collect()
            })
            .collect()
    }
}

// ── Animator ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct FrameAnimator {
    frames: Vec<Vec<Image>>,
    row: usize,
    index: usize,
    frame_time_ms: u64,
    last_advance_ms: u64,
}

impl FrameAnimator {
    pub fn new(sheet: SpriteSheet, frame_time_ms: u64, now: u64) -> Self {
        FrameAnimator {
            frames: sheet.slice(),
            row: 0,
            index: 0,
            frame_time_ms,
            last_advance_ms: now,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Switch to another row, restarting at its first frame.
    /// Out-of-range rows are ignored.
    pub fn select_row(&mut self, row: usize) {
        if row < self.frames.len() {
            self.row = row;
            self.index = 0;
        }
    }

    /// Step to the next frame once `frame_time_ms` has elapsed since the
    /// previous step. Returns whether the frame changed.
    pub fn advance(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.last_advance_ms) < self.frame_time_ms {
            return false;
        }
        let len = self.frames[self.row].len().max(1);
        self.index = (self.index + 1) % len;
        self.last_advance_ms = now;
        true
    }

    pub fn current(&self) -> Image {
        self.frames[self.row][self.index]
    }
}
