/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws. Each maze
/// cell occupies two terminal columns, which keeps the aspect ratio
/// roughly square and leaves room for wide emoji pickups.
///
/// The renderer only reads the session: tiles, agents, score, lives,
/// phase, decorative tokens. All presentation state (camera, status
/// message, buffers) lives here, not in the core.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Direction, Ghost};
use crate::domain::tile::Tile;
use crate::sim::session::{Phase, Session};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16], // up to 16 bytes (supports multi-byte emoji)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool, // true = this char occupies 2 terminal columns
    cont: bool, // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Arcade-cabinet background: plain black.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 16],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    fn from_str_wide(s: &str, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let bytes = s.as_bytes();
        let len = bytes.len().min(16);
        cell.ch[..len].copy_from_slice(&bytes[..len]);
        cell.ch_len = len as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 {
            return "";
        }
        unsafe { std::str::from_utf8_unchecked(&self.ch[..self.ch_len as usize]) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Camera: viewport into the maze ──

/// `(x, y)` is the maze cell at the top-left of the viewport.
/// Scaled mazes are wider than most terminals; the camera follows the
/// player with a dead zone so scrolling stays smooth. Mazes smaller
/// than the viewport are centered.
struct Camera {
    x: i32,
    y: i32,
    view_w: usize,
    view_h: usize,
}

impl Camera {
    fn new() -> Self {
        Camera { x: 0, y: 0, view_w: 0, view_h: 0 }
    }

    /// Follow a target cell within the maze bounds. Dead zone: only
    /// scroll when the target nears the viewport edge.
    fn follow(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -((self.view_w as i32 - world_w as i32) / 2);
        } else {
            let margin_x = (self.view_w as i32) / 5;
            let left_bound = self.x + margin_x;
            let right_bound = self.x + self.view_w as i32 - margin_x - 1;

            if target_x < left_bound {
                self.x = target_x - margin_x;
            } else if target_x > right_bound {
                self.x = target_x - self.view_w as i32 + margin_x + 1;
            }
            self.x = self.x.max(0).min((world_w as i32 - self.view_w as i32).max(0));
        }

        if world_h <= self.view_h {
            self.y = -((self.view_h as i32 - world_h as i32) / 2);
        } else {
            let margin_y = (self.view_h as i32) / 5;
            let top_bound = self.y + margin_y;
            let bottom_bound = self.y + self.view_h as i32 - margin_y - 1;

            if target_y < top_bound {
                self.y = target_y - margin_y;
            } else if target_y > bottom_bound {
                self.y = target_y - self.view_h as i32 + margin_y + 1;
            }
            self.y = self.y.max(0).min((world_h as i32 - self.view_h as i32).max(0));
        }
    }

    /// Snap directly onto a target (session start, phase change).
    fn center_on(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -((self.view_w as i32 - world_w as i32) / 2);
        } else {
            self.x = target_x - self.view_w as i32 / 2;
            self.x = self.x.max(0).min((world_w as i32 - self.view_w as i32).max(0));
        }

        if world_h <= self.view_h {
            self.y = -((self.view_h as i32 - world_h as i32) / 2);
        } else {
            self.y = target_y - self.view_h as i32 / 2;
            self.y = self.y.max(0).min((world_h as i32 - self.view_h as i32).max(0));
        }
    }
}

// ── Renderer ──

/// Each maze cell maps to 2 terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

/// Classic arcade palette.
const WALL_COLOR: Color = Color::Rgb { r: 33, g: 33, b: 222 };
const PICKUP_COLOR: Color = Color::Rgb { r: 255, g: 184, b: 151 };
const PLAYER_COLOR: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const PLAYER_POWER_COLOR: Color = Color::Rgb { r: 0, g: 255, b: 255 };
const SCARED_COLOR: Color = Color::Rgb { r: 0, g: 0, b: 255 };
const GHOST_COLORS: [Color; 4] = [
    Color::Rgb { r: 255, g: 0, b: 0 },     // red
    Color::Rgb { r: 255, g: 184, b: 255 }, // pink
    Color::Rgb { r: 0, g: 255, b: 255 },   // cyan
    Color::Rgb { r: 255, g: 184, b: 82 },  // orange
];

/// Decorative pickup glyphs for emoji mode, indexed by the grid's
/// per-cell token. Cosmetic only.
const DECOR_EMOJI: [&str; 6] = ["🍒", "🍓", "🍊", "🍎", "🍇", "🍉"];

/// How many frames a status message stays on screen.
const MESSAGE_FRAMES: u32 = 150;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    camera: Camera,
    message: String,
    message_timer: u32,
    emoji_pickups: bool,
}

impl Renderer {
    pub fn new(emoji_pickups: bool) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            camera: Camera::new(),
            message: String::new(),
            message_timer: 0,
            emoji_pickups,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Show a transient status message under the maze.
    pub fn set_message(&mut self, msg: &str) {
        self.message = msg.to_string();
        self.message_timer = MESSAGE_FRAMES;
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Viewport dimensions from terminal size, capped to the maze.
        let reserved_rows = MAP_ROW + 2; // HUD + gap + message bar
        self.camera.view_w = (self.term_w / CELL_W).min(session.grid.cols());
        self.camera.view_h = if self.term_h > reserved_rows {
            (self.term_h - reserved_rows).min(session.grid.rows())
        } else {
            1
        };

        // Phase change → full repaint for a clean transition.
        let phase_changed = self.last_phase != Some(session.phase);
        if phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase);
        }

        let px = session.player.x.floor() as i32;
        let py = session.player.y.floor() as i32;
        if phase_changed {
            self.camera.center_on(px, py, session.grid.cols(), session.grid.rows());
        } else if session.phase == Phase::Playing {
            self.camera.follow(px, py, session.grid.cols(), session.grid.rows());
        }

        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }

        // Build front buffer
        self.front.clear();
        self.compose_hud(session);
        self.compose_maze(session);
        self.compose_agents(session);
        self.compose_message();

        match session.phase {
            Phase::Ready => self.compose_overlay(&["PRESS SPACE TO START"]),
            Phase::Paused => self.compose_overlay(&["PAUSED"]),
            Phase::GameOver => {
                self.compose_overlay(&["GAME OVER", "PRESS SPACE TO RESTART"])
            }
            Phase::Won => self.compose_overlay(&["YOU WIN!", "PRESS SPACE TO PLAY AGAIN"]),
            Phase::Playing => {}
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, session: &Session) {
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };
        let hearts = "♥".repeat(session.lives as usize);
        let hud = format!(" SCORE {:<7} LIVES {:<4}", session.score, hearts);
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, hud_bg));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

        if session.player.power_mode {
            let label = format!("POWER {:>2.0} ", session.player.power_timer.ceil());
            let x = self.front.width.saturating_sub(label.chars().count() + 1);
            self.front.put_str(x, HUD_ROW, &label, PLAYER_POWER_COLOR, hud_bg);
        }
    }

    fn compose_maze(&mut self, session: &Session) {
        for vy in 0..self.camera.view_h {
            let wy = self.camera.y + vy as i32;
            let row = MAP_ROW + vy;
            if row >= self.front.height {
                break;
            }
            for vx in 0..self.camera.view_w {
                let wx = self.camera.x + vx as i32;
                let col = vx * CELL_W;
                if col + 1 >= self.front.width {
                    break;
                }
                self.compose_tile(session, wx, wy, col, row);
            }
        }
    }

    fn compose_tile(&mut self, session: &Session, wx: i32, wy: i32, col: usize, row: usize) {
        if wx < 0 || wy < 0 || wx >= session.grid.cols() as i32 || wy >= session.grid.rows() as i32
        {
            self.front.set(col, row, Cell::BLANK);
            self.front.set(col + 1, row, Cell::BLANK);
            return;
        }

        let (r, c) = (wy as usize, wx as usize);
        match session.grid.tile_at(r, c) {
            Tile::Wall => {
                self.front.set(col, row, Cell::from_char('█', WALL_COLOR, Cell::BASE_BG));
                self.front.set(col + 1, row, Cell::from_char('█', WALL_COLOR, Cell::BASE_BG));
            }
            Tile::Empty => {
                self.front.set(col, row, Cell::BLANK);
                self.front.set(col + 1, row, Cell::BLANK);
            }
            Tile::Dot => {
                if self.emoji_pickups {
                    let token = session.grid.decor_token(r, c) as usize;
                    let emoji = DECOR_EMOJI[token % DECOR_EMOJI.len()];
                    self.front.set(col, row, Cell::from_str_wide(emoji, PICKUP_COLOR, Cell::BASE_BG));
                    self.front.set(col + 1, row, Cell::WIDE_CONT);
                } else {
                    self.front.set(col, row, Cell::from_char('·', PICKUP_COLOR, Cell::BASE_BG));
                    self.front.set(col + 1, row, Cell::BLANK);
                }
            }
            Tile::PowerPellet => {
                if self.emoji_pickups {
                    self.front.set(col, row, Cell::from_str_wide("🌟", PICKUP_COLOR, Cell::BASE_BG));
                    self.front.set(col + 1, row, Cell::WIDE_CONT);
                } else {
                    self.front.set(col, row, Cell::from_char('●', PICKUP_COLOR, Cell::BASE_BG));
                    self.front.set(col + 1, row, Cell::BLANK);
                }
            }
        }
    }

    fn compose_agents(&mut self, session: &Session) {
        // Ghosts first, player on top.
        for (i, ghost) in session.ghosts.iter().enumerate() {
            let color = if ghost.scared {
                SCARED_COLOR
            } else {
                GHOST_COLORS[i % GHOST_COLORS.len()]
            };
            self.put_agent(session, ghost.x, ghost.y, ghost_glyph(ghost), color);
        }

        let p = &session.player;
        let color = if p.power_mode { PLAYER_POWER_COLOR } else { PLAYER_COLOR };
        self.put_agent(session, p.x, p.y, player_glyph(p.direction, p.mouth_phase), color);
    }

    fn put_agent(&mut self, session: &Session, x: f32, y: f32, glyph: char, color: Color) {
        let wx = x.floor() as i32;
        let wy = y.floor() as i32;
        if wx < 0 || wy < 0 || wx >= session.grid.cols() as i32 || wy >= session.grid.rows() as i32
        {
            return;
        }
        let vx = wx - self.camera.x;
        let vy = wy - self.camera.y;
        if vx < 0 || vy < 0 || vx >= self.camera.view_w as i32 || vy >= self.camera.view_h as i32 {
            return;
        }
        let col = vx as usize * CELL_W;
        let row = MAP_ROW + vy as usize;
        self.front.set(col, row, Cell::from_char(glyph, color, Cell::BASE_BG));
        self.front.set(col + 1, row, Cell::BLANK);
    }

    fn compose_message(&mut self) {
        let msg_row = MAP_ROW + self.camera.view_h;
        if msg_row >= self.front.height || self.message.is_empty() {
            return;
        }
        let msg = format!(" {} ", self.message);
        self.front.put_str(0, msg_row, &msg, Color::Yellow, Cell::BASE_BG);
    }

    fn compose_overlay(&mut self, lines: &[&str]) {
        let mid_row = MAP_ROW + self.camera.view_h / 2;
        let start = mid_row.saturating_sub(lines.len() / 2);
        for (i, line) in lines.iter().enumerate() {
            let row = start + i;
            if row >= self.front.height {
                break;
            }
            let width = line.chars().count() + 4;
            let x = (self.term_w.saturating_sub(width)) / 2;
            let padded = format!("  {}  ", line);
            self.front.put_str(x, row, &padded, Color::Black, Color::Yellow);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev {
                        need_move = true;
                    }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

/// Mouth-open/closed glyph facing the travel direction.
fn player_glyph(direction: Direction, mouth_phase: f32) -> char {
    if mouth_phase < 0.1 {
        return 'O';
    }
    match direction {
        Direction::Right | Direction::None => 'C',
        Direction::Left => 'Ɔ',
        Direction::Up => 'U',
        Direction::Down => '∩',
    }
}

fn ghost_glyph(ghost: &Ghost) -> char {
    if ghost.scared {
        'W'
    } else {
        'M'
    }
}
