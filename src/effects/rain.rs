//! Falling-glyph rain drawn behind the transcript.
//!
//! One drop per column. Every frame each drop writes a random glyph at its
//! row and moves down by one; cells fade a little each frame, which leaves
//! a trail behind every drop. A drop that has fallen past the bottom goes
//! back to the top with a small probability per frame, so columns drift
//! out of step over time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use super::{EffectError, VisualEffect};

/// Glyphs a drop can show.
pub const RAIN_GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ123456789@#$%^&*()*&^%+-/~{[|`]}";

/// Time between two animation frames.
pub const RAIN_FRAME: Duration = Duration::from_millis(35);

/// How long a reset-to-top is shown before the caller moves on.
pub const RAIN_SETTLE: Duration = Duration::from_millis(1500);

/// Chance per frame that a drop below the bottom restarts at the top.
const RESET_CHANCE: f64 = 0.025;

/// Intensity lost per frame.
const FADE: u8 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    glyph: char,
    intensity: u8,
}

/// Animation state for a grid of `cols` x `rows` cells.
#[derive(Debug, Clone)]
pub struct RainField {
    cols: u16,
    rows: u16,
    drops: Vec<u16>,
    cells: Vec<Cell>,
    glyphs: Vec<char>,
}

impl RainField {
    /// New field with drops scattered over the height.
    pub fn new<R: Rng>(cols: u16, rows: u16, rng: &mut R) -> Self {
        let drops = (0..cols).map(|_| Self::random_row(rows, rng)).collect();
        Self {
            cols,
            rows,
            drops,
            cells: vec![Cell::default(); cols as usize * rows as usize],
            glyphs: RAIN_GLYPHS.chars().collect(),
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Current row of each column's drop.
    pub fn drops(&self) -> &[u16] {
        &self.drops
    }

    /// Resize, keeping the drops of columns that still exist.
    pub fn resize<R: Rng>(&mut self, cols: u16, rows: u16, rng: &mut R) {
        if (cols, rows) == (self.cols, self.rows) {
            return;
        }
        self.drops.truncate(cols as usize);
        while self.drops.len() < cols as usize {
            self.drops.push(Self::random_row(rows, rng));
        }
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::default(); cols as usize * rows as usize];
    }

    /// Put every drop back on the first row and wipe the trails.
    pub fn reset_to_top(&mut self) {
        self.drops.iter_mut().for_each(|d| *d = 0);
        self.cells.iter_mut().for_each(|c| *c = Cell::default());
    }

    /// Advance one frame.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            cell.intensity = cell.intensity.saturating_sub(FADE);
        }

        for col in 0..self.cols as usize {
            let row = self.drops[col];
            if row < self.rows {
                let glyph = self.glyphs[rng.random_range(0..self.glyphs.len())];
                self.cells[row as usize * self.cols as usize + col] = Cell {
                    glyph,
                    intensity: u8::MAX,
                };
            }

            if row >= self.rows && rng.random::<f64>() < RESET_CHANCE {
                self.drops[col] = 0;
            } else {
                self.drops[col] = row.saturating_add(1);
            }
        }
    }

    /// Glyph and intensity at a cell, if it is lit.
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, u8)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let cell = self.cells[row as usize * self.cols as usize + col as usize];
        (cell.intensity > 0).then_some((cell.glyph, cell.intensity))
    }

    fn random_row<R: Rng>(rows: u16, rng: &mut R) -> u16 {
        if rows == 0 {
            0
        } else {
            rng.random_range(0..rows)
        }
    }
}

impl Widget for &RainField {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height.min(self.rows) {
            for col in 0..area.width.min(self.cols) {
                let Some((glyph, intensity)) = self.cell(col, row) else {
                    continue;
                };
                let color = if intensity == u8::MAX {
                    Color::Rgb(180, 255, 180)
                } else {
                    Color::Rgb(0, intensity, 0)
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(glyph).set_style(Style::default().fg(color));
                }
            }
        }
    }
}

/// The rain as a visual collaborator.
#[derive(Debug)]
pub struct RainEffect {
    field: Mutex<RainField>,
    active: AtomicBool,
    settle: Duration,
}

impl RainEffect {
    /// Inactive rain; it starts with the first reset or `start`.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_settle(cols, rows, RAIN_SETTLE)
    }

    pub fn with_settle(cols: u16, rows: u16, settle: Duration) -> Self {
        Self {
            field: Mutex::new(RainField::new(cols, rows, &mut rand::rng())),
            active: AtomicBool::new(false),
            settle,
        }
    }

    /// Advance one frame if running.
    pub fn tick(&self) {
        if self.is_active() {
            self.field().advance(&mut rand::rng());
        }
    }

    pub fn resize(&self, cols: u16, rows: u16) {
        self.field().resize(cols, rows, &mut rand::rng());
    }

    /// Lock the field, e.g. to render it.
    pub fn field(&self) -> MutexGuard<'_, RainField> {
        self.field.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VisualEffect for RainEffect {
    fn start(&self) {
        self.active.store(true, Ordering::Release);
    }

    fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn toggle(&self) -> bool {
        let active = !self.active.fetch_xor(true, Ordering::AcqRel);
        tracing::info!(
            "matrix rain {}",
            if active { "enabled" } else { "disabled" }
        );
        active
    }

    fn reset_to_top_and_play(&self) -> Result<Duration, EffectError> {
        self.field().reset_to_top();
        self.start();
        tracing::debug!("matrix rain reset to top");
        Ok(self.settle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn new_field_scatters_drops_within_height() {
        let field = RainField::new(40, 10, &mut rng());
        assert_eq!(field.drops().len(), 40);
        assert!(field.drops().iter().all(|&d| d < 10));
    }

    #[test]
    fn reset_puts_all_drops_on_top() {
        let mut field = RainField::new(20, 10, &mut rng());
        field.advance(&mut rng());
        field.reset_to_top();

        assert!(field.drops().iter().all(|&d| d == 0));
        assert!((0..20).all(|c| (0..10).all(|r| field.cell(c, r).is_none())));
    }

    #[test]
    fn advance_lights_head_and_moves_down() {
        let mut field = RainField::new(5, 10, &mut rng());
        field.reset_to_top();
        field.advance(&mut rng());

        for col in 0..5 {
            let (glyph, intensity) = field.cell(col, 0).unwrap();
            assert!(RAIN_GLYPHS.contains(glyph));
            assert_eq!(intensity, u8::MAX);
        }
        assert!(field.drops().iter().all(|&d| d == 1));
    }

    #[test]
    fn trail_fades_over_frames() {
        let mut field = RainField::new(1, 20, &mut rng());
        field.reset_to_top();
        field.advance(&mut rng());
        field.advance(&mut rng());

        let (_, head) = field.cell(0, 1).unwrap();
        let (_, tail) = field.cell(0, 0).unwrap();
        assert!(tail < head);
    }

    #[test]
    fn resize_keeps_existing_columns() {
        let mut field = RainField::new(4, 10, &mut rng());
        let before = field.drops().to_vec();

        field.resize(6, 10, &mut rng());

        assert_eq!(field.size(), (6, 10));
        assert_eq!(&field.drops()[..4], &before[..]);
        field.resize(2, 10, &mut rng());
        assert_eq!(field.drops(), &before[..2]);
    }

    #[test]
    fn zero_sized_field_is_harmless() {
        let mut field = RainField::new(0, 0, &mut rng());
        field.advance(&mut rng());
        assert!(field.cell(0, 0).is_none());
    }

    #[test]
    fn effect_reset_starts_and_reports_settle() {
        let effect = RainEffect::new(10, 5);
        assert!(!effect.is_active());

        let settle = effect.reset_to_top_and_play().unwrap();

        assert_eq!(settle, RAIN_SETTLE);
        assert!(effect.is_active());
        assert!(effect.field().drops().iter().all(|&d| d == 0));
    }

    #[test]
    fn effect_toggle_and_tick() {
        let effect = RainEffect::new(3, 3);
        effect.tick(); // inactive, nothing moves
        assert!(effect.toggle());
        effect.field().reset_to_top();
        effect.tick();
        assert!(effect.field().drops().iter().all(|&d| d == 1));
        assert!(!effect.toggle());
        effect.start();
        assert!(effect.is_active());
        effect.stop();
        assert!(!effect.is_active());
    }

    #[test]
    fn renders_lit_cells_into_buffer() {
        let mut field = RainField::new(3, 2, &mut rng());
        field.reset_to_top();
        field.advance(&mut rng());

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        (&field).render(area, &mut buf);

        let symbol = buf[(0, 0)].symbol().to_string();
        assert!(RAIN_GLYPHS.contains(symbol.as_str()));
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }
}
