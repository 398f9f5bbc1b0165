//! GameView: maps a `PuzzleSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::PuzzleSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, Coord, PuzzleState};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Presentation-side state that is not part of the engine snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState<'a> {
    pub cursor: Option<Coord>,
    /// Tiles drawn highlighted (hint, replay preview).
    pub highlight: &'a [Coord],
    pub generating: bool,
    /// One-line status shown under the side panel.
    pub message: Option<&'a str>,
}

/// Banner drawn over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Generating,
    Solved,
    NoMoves,
    Replay,
}

impl Overlay {
    pub fn select(snap: &PuzzleSnapshot, view: &ViewState<'_>) -> Option<Self> {
        if view.generating {
            return Some(Overlay::Generating);
        }
        match snap.state {
            PuzzleState::Won => Some(Overlay::Solved),
            PuzzleState::Lost => Some(Overlay::NoMoves),
            PuzzleState::Replaying => Some(Overlay::Replay),
            PuzzleState::Ready | PuzzleState::Uninitialized => None,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Overlay::Generating => "GENERATING",
            Overlay::Solved => "SOLVED!",
            Overlay::NoMoves => "NO MOVES",
            Overlay::Replay => "REPLAY",
        }
    }
}

const PALETTE: [Rgb; 8] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 120, 220),
    Rgb::new(100, 200, 110),
    Rgb::new(240, 210, 80),
    Rgb::new(190, 110, 220),
    Rgb::new(80, 210, 210),
    Rgb::new(255, 160, 40),
    Rgb::new(170, 170, 170),
];

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);

/// Palette color of a tile.
pub fn tile_rgb(color: Color) -> Rgb {
    PALETTE[color as usize % PALETTE.len()]
}

/// Letter drawn on a tile: `A` for color 0, `B` for 1, and so on.
pub fn tile_letter(color: Color) -> char {
    (b'A' + color % 26) as char
}

/// A lightweight terminal renderer for the puzzle grid.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &PuzzleSnapshot,
        view: &ViewState<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let size = snap.size.max(1) as u16;
        let grid_w = size * self.cell_w;
        let frame_w = grid_w + 2;
        let frame_h = size + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            grid_w,
            size,
            ' ',
            CellStyle::new(FIELD_BG, FIELD_BG),
        );
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for y in 0..snap.size {
            for x in 0..snap.size {
                let c = Coord::new(x, y);
                let lit = view.highlight.contains(&c);
                let under_cursor = view.cursor == Some(c);
                self.draw_tile(fb, start_x, start_y, c, snap.cell(x, y), lit, under_cursor);
            }
        }

        self.draw_side_panel(fb, snap, view, viewport, start_x + frame_w + 2, start_y);

        match Overlay::select(snap, view) {
            // Replay keeps the grid visible; the banner sits on the top border.
            Some(Overlay::Replay) => {
                draw_centered(fb, start_x, start_y, frame_w, Overlay::Replay.text());
            }
            Some(overlay) => {
                draw_centered(fb, start_x, start_y + frame_h / 2, frame_w, overlay.text());
            }
            None => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &PuzzleSnapshot,
        view: &ViewState<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, view, viewport, &mut fb);
        fb
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        c: Coord,
        color: Option<Color>,
        lit: bool,
        under_cursor: bool,
    ) {
        let px = start_x + 1 + c.x as u16 * self.cell_w;
        let py = start_y + 1 + c.y as u16;

        let (ch, mut style) = match color {
            Some(color) => {
                let bg = if lit {
                    tile_rgb(color).lighten(60)
                } else {
                    tile_rgb(color)
                };
                (tile_letter(color), CellStyle::new(Rgb::new(15, 15, 20), bg).bold())
            }
            None => ('·', CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG).dim()),
        };
        if lit && color.is_some() {
            style.fg = Rgb::new(255, 255, 255);
        }

        fb.fill_rect(px, py, self.cell_w, 1, ' ', style);
        fb.put_char(px, py, ch, style);
        if under_cursor && self.cell_w > 1 {
            let marker = CellStyle {
                fg: Rgb::new(255, 255, 255),
                ..style
            }
            .bold();
            fb.put_char(px + self.cell_w - 1, py, '◂', marker);
        } else if under_cursor {
            style.fg = Rgb::new(255, 255, 255);
            fb.put_char(px, py, ch, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &PuzzleSnapshot,
        view: &ViewState<'_>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let rows: [(&str, u32); 6] = [
            ("SIZE", snap.size as u32),
            ("COLORS", snap.color_count as u32),
            ("MOVES", snap.moves),
            ("LEFT", snap.remaining as u32),
            ("SOLUTION", snap.solution_len as u32),
            ("SEED", snap.seed),
        ];

        let mut y = start_y;
        for (name, n) in rows {
            let end = fb.put_str(panel_x, y, name, label);
            fb.put_u32(end.max(panel_x + 9), y, n, value);
            y = y.saturating_add(1);
        }
        let end = fb.put_str(panel_x, y, "STATE", label);
        fb.put_str(end.max(panel_x + 9), y, snap.state.as_str(), value);
        y = y.saturating_add(2);

        if let Some(msg) = view.message {
            fb.put_str(panel_x, y, msg, value);
            y = y.saturating_add(2);
        }

        let help = value.dim();
        for line in HELP {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y = y.saturating_add(1);
        }
    }
}

const PANEL_W: u16 = 24;

const HELP: [&str; 5] = [
    "arrows/hjkl move",
    "space click",
    "r restore  s replay",
    "n new  ? hint",
    "q quit",
];

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_centered(fb: &mut FrameBuffer, start_x: u16, y: u16, frame_w: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    fb.put_str(x, y, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grid, PuzzleEngine};

    fn screen(fb: &FrameBuffer) -> String {
        (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn engine_with(rows: [[Color; 3]; 3]) -> PuzzleEngine {
        let mut engine = PuzzleEngine::new(1);
        engine.load(Grid::from_array(rows), vec![]);
        engine
    }

    #[test]
    fn tiles_render_as_letters() {
        let engine = engine_with([[0, 1, 2], [0, 1, 2], [3, 3, 4]]);
        let fb = GameView::default().render(
            &engine.snapshot(),
            &ViewState::default(),
            Viewport::new(60, 12),
        );
        let text = screen(&fb);
        assert!(text.contains("A B C"));
        assert!(text.contains("D D E"));
        assert!(text.contains("MOVES"));
        assert!(text.contains("ready"));
    }

    #[test]
    fn cursor_and_highlight_are_drawn() {
        let engine = engine_with([[0, 0, 1], [1, 2, 2], [0, 1, 2]]);
        let hl = [Coord::new(0, 0), Coord::new(1, 0)];
        let view = ViewState {
            cursor: Some(Coord::new(2, 2)),
            highlight: &hl,
            ..ViewState::default()
        };
        let fb = GameView::default().render(&engine.snapshot(), &view, Viewport::new(60, 12));
        assert!(screen(&fb).contains('◂'));

        let lit = fb
            .cells()
            .iter()
            .filter(|c| c.style.bg == tile_rgb(0).lighten(60))
            .count();
        assert_eq!(lit, 4, "two tiles, two columns each");
    }

    #[test]
    fn overlays_follow_state() {
        let mut engine = engine_with([[1, 1, 1], [1, 1, 1], [1, 1, 1]]);
        let view = GameView::default();
        let vp = Viewport::new(60, 12);

        let generating = ViewState {
            generating: true,
            ..ViewState::default()
        };
        assert!(screen(&view.render(&engine.snapshot(), &generating, vp)).contains("GENERATING"));

        assert!(engine.click(0, 0, false));
        let fb = view.render(&engine.snapshot(), &ViewState::default(), vp);
        assert!(screen(&fb).contains("SOLVED!"));

        engine.begin_replay().unwrap();
        let fb = view.render(&engine.snapshot(), &ViewState::default(), vp);
        let text = screen(&fb);
        assert!(text.contains("REPLAY"));
        assert!(text.contains("B B B"), "grid stays visible during replay");

        let mut engine = engine_with([[0, 1, 1], [1, 0, 2], [2, 1, 0]]);
        assert!(engine.click(1, 0, false));
        assert_eq!(engine.state(), PuzzleState::Lost);
        let fb = view.render(&engine.snapshot(), &ViewState::default(), vp);
        assert!(screen(&fb).contains("NO MOVES"));
    }

    #[test]
    fn empty_slots_render_as_dots() {
        let mut engine = engine_with([[0, 0, 1], [2, 3, 1], [4, 5, 1]]);
        assert!(engine.click(2, 0, false));
        let snap = engine.snapshot();
        let fb = GameView::default().render(&snap, &ViewState::default(), Viewport::new(60, 12));
        assert_eq!(
            screen(&fb).matches('·').count(),
            snap.size * snap.size - snap.remaining
        );
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let engine = engine_with([[0, 1, 2], [0, 1, 2], [3, 3, 4]]);
        let fb = GameView::default().render(
            &engine.snapshot(),
            &ViewState::default(),
            Viewport::new(3, 2),
        );
        assert_eq!(fb.width(), 3);
    }
}
