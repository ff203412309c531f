/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout:
///   row 0        HUD ("Difficulty: N")
///   row 2..      maze, each cell two terminal columns wide
///   +1 below     outcome message (centered, only once the session ends)
///   +3 below     key help

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::Cell;
use crate::domain::rules::Outcome;
use crate::domain::tile::Tile;
use crate::sim::session::Session;

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for every terminal cell, so inter-row gaps
    /// match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Differs from any real glyph, so every position gets diff'd.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, glyphs: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.glyphs = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.glyphs.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x] = glyph;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout constants ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const HELP: &str = " Arrows/WASD: Move   R: Restart   Esc/Q: Quit";

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, session: &Session) {
    let grid = session.grid();

    // HUD
    buf.fill_row(HUD_ROW, HUD_BG);
    let hud = format!(" Difficulty: {}   Moves: {}", session.difficulty().level(), session.moves());
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    // Maze
    for (r, row) in grid.rows().enumerate() {
        let y = MAP_ROW + r;
        for (c, &tile) in row.iter().enumerate() {
            let (c0, c1) = cell_glyphs(session, Cell::new(r, c), tile);
            buf.set(c * CELL_W, y, c0);
            buf.set(c * CELL_W + 1, y, c1);
        }
    }

    // Outcome message, centered under the maze
    let msg_row = MAP_ROW + grid.height() + 1;
    let outcome = session.outcome();
    if outcome.is_terminal() {
        let msg = outcome.message();
        let maze_w = grid.width() * CELL_W;
        let x = maze_w.saturating_sub(msg.chars().count()) / 2;
        buf.put_str(x, msg_row, msg, outcome_color(outcome), Color::Reset);
    }

    buf.put_str(0, MAP_ROW + grid.height() + 3, HELP, Color::DarkGrey, Color::Reset);
}

/// Pursuer, then rat, then hole, then traps, then the tile itself.
fn cell_glyphs(session: &Session, cell: Cell, tile: Tile) -> (Glyph, Glyph) {
    let pair = |ch: char, fg: Color| (Glyph::new(ch, fg, Color::Reset), Glyph::new(' ', fg, Color::Reset));

    if cell == session.pursuer() {
        pair('■', Color::Rgb { r: 255, g: 70, b: 70 })
    } else if cell == session.rat() {
        pair('▲', Color::Rgb { r: 230, g: 230, b: 230 })
    } else if cell == session.goals().hole {
        pair('◆', Color::Rgb { r: 80, g: 255, b: 80 })
    } else if session.goals().is_trap(cell) {
        pair('☠', Color::Rgb { r: 255, g: 180, b: 40 })
    } else if tile.is_wall() {
        let wall = Glyph::new('█', Color::Rgb { r: 120, g: 120, b: 120 }, Color::Rgb { r: 70, g: 70, b: 70 });
        (wall, wall)
    } else {
        (Glyph::BLANK, Glyph::BLANK)
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Won => Color::Rgb { r: 80, g: 255, b: 80 },
        Outcome::Trapped => Color::Rgb { r: 255, g: 180, b: 40 },
        Outcome::Caught => Color::Rgb { r: 255, g: 60, b: 60 },
        Outcome::Active => Color::White,
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // full repaint on first frame
        self.back.glyphs.fill(Glyph::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame (new session, new maze size).
    pub fn invalidate(&mut self) -> io::Result<()> {
        self.back.glyphs.fill(Glyph::INVALID);
        queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate()?;
        }

        self.front.clear();
        compose(&mut self.front, session);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let glyph = self.front.get(x, y);
                if glyph == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if glyph.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(glyph.fg))?;
                    last_fg = glyph.fg;
                }
                if glyph.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(glyph.bg))?;
                    last_bg = glyph.bg;
                }

                queue!(self.writer, Print(glyph.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
