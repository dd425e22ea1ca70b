/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::hub::catalog::Category;
use crate::hub::{Hub, HubView};
use crate::minigame::growth::{Plot, PlotState, CROPS, FIELD_COLS};
use crate::minigame::matching::{Card, BOARD_COLS};
use crate::minigame::runner::{Obstacle, ObstacleKind, LANES};
use crate::minigame::GameView;
use crate::session::{SessionController, SessionState};

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
    /// Explicit dark background for all "empty" terminal cells, matching the
    /// Clear color so inter-row gap pixels never show through as lines.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 30 };

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

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
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

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
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

    /// Write a wide (emoji) char at (x, y), occupying two columns.
    fn put_wide(&mut self, x: usize, y: usize, c: char, bg: Color) {
        self.set(x, y, Cell::from_char_wide(c, Color::Reset, bg));
        self.set(x + 1, y, Cell::WIDE_CONT);
    }

    /// Horizontally centered string.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    /// Fill an entire row with a background color.
    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

/// `filled` out of `width` cells as a one-line gauge.
fn gauge(filled: usize, width: usize) -> String {
    let filled = filled.min(width);
    let mut s = String::with_capacity(width);
    for _ in 0..filled {
        s.push('█');
    }
    for _ in filled..width {
        s.push('░');
    }
    s
}

// ── Palette ──

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const BLUE: Color = Color::Rgb { r: 100, g: 160, b: 255 };
const DIM: Color = Color::DarkGrey;
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const CURSOR_BG: Color = Color::Rgb { r: 30, g: 60, b: 30 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

/// Which screen is being composed; a change forces a full repaint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Screen {
    Lobby,
    Profile,
    Loading,
    Idle,
    Playing,
    Paused,
    Settled,
}

fn screen_of(hub: &Hub) -> Screen {
    match &hub.session {
        None => match hub.view {
            HubView::Lobby => Screen::Lobby,
            HubView::Profile => Screen::Profile,
        },
        Some(session) => match session.state() {
            SessionState::Loading => Screen::Loading,
            SessionState::Idle => Screen::Idle,
            SessionState::Running => Screen::Playing,
            SessionState::Paused => Screen::Paused,
            SessionState::Settled => Screen::Settled,
        },
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
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
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

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

    pub fn render(&mut self, hub: &Hub) -> io::Result<()> {
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

        // Screen change → clear for a clean transition
        let screen = screen_of(hub);
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();

        match &hub.session {
            Some(session) => self.compose_room(hub, session),
            None => match hub.view {
                HubView::Lobby => self.compose_lobby(hub),
                HubView::Profile => self.compose_profile(hub),
            },
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor — the
        // terminal's native default may differ from BASE_BG.
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
                    x += 2; // skip the continuation cell
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Shared chrome ──

    fn compose_message_bar(&mut self, hub: &Hub) {
        if hub.message.is_empty() {
            return;
        }
        let row = self.front.height.saturating_sub(1);
        self.front.fill_row(row, MSG_BG);
        let msg = format!(" ◈ {} ", hub.message);
        self.front.put_str(0, row, &msg, Color::Black, MSG_BG);
    }

    // ── Lobby ──

    fn compose_lobby(&mut self, hub: &Hub) {
        self.front.put_str(2, 1, "GAME HALL", GOLD, Color::Reset);
        self.front.put_str(2, 2, "Ready to play?", DIM, Color::Reset);
        let coins = format!("🪙 {}", hub.profile.coins);
        let cx = self.front.width.saturating_sub(coins.chars().count() + 3);
        self.front.put_str(cx, 1, &coins, GOLD, Color::Reset);

        // Featured banner: the most-played game headlines the lobby.
        if let Some(featured) = crate::hub::catalog::by_popularity().first() {
            self.front.fill_row(4, HUD_BG);
            let banner = format!(
                "  FEATURED  {}  —  {}",
                featured.title, featured.description
            );
            self.front.put_str(0, 4, &banner, Color::White, HUD_BG);
        }

        // Category strip
        let mut cx = 2;
        for cat in [Category::Puzzle, Category::Competitive, Category::Simulation] {
            self.front.put_wide(cx, 5, cat.icon(), Color::Reset);
            self.front.put_str(cx + 3, 5, cat.label(), DIM, Color::Reset);
            cx += cat.label().len() + 7;
        }

        // Game list
        let list_top = 7;
        for (i, game) in crate::hub::catalog::CATALOG.iter().enumerate() {
            let row = list_top + i * 2;
            if row + 1 >= self.front.height.saturating_sub(2) {
                break;
            }
            let selected = i == hub.lobby_cursor;
            let bg = if selected { CURSOR_BG } else { Color::Reset };
            let marker = if selected { "▶" } else { " " };

            self.front.fill_row(row, bg);
            self.front.put_str(2, row, marker, GREEN, bg);
            self.front.put_wide(4, row, game.icon, bg);
            let line = format!(
                "{}  ★{:.1}  {} plays  [{}]",
                game.title, game.rating, game.play_count, game.category.label()
            );
            self.front.put_str(7, row, &line, Color::White, bg);
            let tags = game.tags.join(" · ");
            self.front.put_str(7, row + 1, &tags, DIM, Color::Reset);
        }

        let help_row = self.front.height.saturating_sub(2);
        self.front.put_str(
            2,
            help_row,
            "↑↓ Select   ENTER Play   TAB Profile   Q Quit",
            DIM,
            Color::Reset,
        );
        self.compose_message_bar(hub);
    }

    // ── Profile ──

    fn compose_profile(&mut self, hub: &Hub) {
        self.front.put_str(2, 1, "MY PROFILE", GOLD, Color::Reset);

        // User card
        self.front.put_wide(2, 3, hub.profile.avatar, Color::Reset);
        self.front.put_str(5, 3, &hub.profile.nickname, Color::White, Color::Reset);
        let coins = format!("🪙 {}", hub.profile.coins);
        self.front.put_str(5, 4, &coins, GOLD, Color::Reset);

        // Stats
        let stats = format!(
            "{} days   {} games   {} min played",
            hub.profile.login_days, hub.profile.games_played, hub.profile.total_play_minutes
        );
        self.front.put_str(2, 6, &stats, BLUE, Color::Reset);

        // Daily tasks
        self.front.put_str(2, 8, "Daily Tasks", GOLD, Color::Reset);
        let list_top = 10;
        for (i, task) in hub.tasks.iter().enumerate() {
            let row = list_top + i * 2;
            if row + 1 >= self.front.height.saturating_sub(2) {
                break;
            }
            let selected = i == hub.task_cursor;
            let bg = if selected { CURSOR_BG } else { Color::Reset };
            let marker = if selected { "▶" } else { " " };

            self.front.fill_row(row, bg);
            self.front.put_str(2, row, marker, GREEN, bg);
            self.front.put_str(4, row, task.description, Color::White, bg);

            let status = if task.collected {
                "Done".to_string()
            } else if task.completed() {
                format!("Get {} 🪙", task.reward)
            } else {
                format!("+{} 🪙", task.reward)
            };
            let status_fg = if task.completed() && !task.collected { GOLD } else { DIM };
            self.front.put_str(30, row, &status, status_fg, bg);

            let bar = gauge((task.current * 10 / task.target.max(1)) as usize, 10);
            let progress = format!("{} {}/{}", bar, task.current, task.target);
            self.front.put_str(4, row + 1, &progress, DIM, Color::Reset);
        }

        let help_row = self.front.height.saturating_sub(2);
        self.front.put_str(
            2,
            help_row,
            "↑↓ Select   ENTER Collect   TAB Lobby   Q Quit",
            DIM,
            Color::Reset,
        );
        self.compose_message_bar(hub);
    }

    // ── Game room ──

    fn compose_room(&mut self, hub: &Hub, session: &SessionController) {
        match session.state() {
            SessionState::Loading => self.compose_loading(session),
            SessionState::Idle => self.compose_start_overlay(session),
            SessionState::Running | SessionState::Paused => {
                self.compose_match(hub, session);
                if session.state() == SessionState::Paused {
                    self.compose_pause_overlay();
                }
            }
            SessionState::Settled => self.compose_settlement(session),
        }
    }

    fn compose_loading(&mut self, session: &SessionController) {
        let mid = self.front.height / 2;
        let d = session.descriptor();
        let title = format!("Loading {}...", d.title);
        self.front.put_centered(mid.saturating_sub(2), &title, Color::White, Color::Reset);

        let width = 24;
        let filled = (session.load_progress() * width as f32) as usize;
        self.front.put_centered(mid, &gauge(filled, width), BLUE, Color::Reset);
    }

    fn compose_start_overlay(&mut self, session: &SessionController) {
        let d = session.descriptor();
        let mid = self.front.height / 2;
        let icon_x = self.front.width / 2;
        self.front.put_wide(icon_x.saturating_sub(1), mid.saturating_sub(4), d.icon, Color::Reset);
        self.front.put_centered(mid.saturating_sub(2), d.title, GOLD, Color::Reset);
        self.front.put_centered(mid, d.description, DIM, Color::Reset);
        self.front.put_centered(mid + 3, "ENTER  Start Game", GREEN, Color::Reset);
        self.front.put_centered(mid + 4, "ESC    Back to Lobby", DIM, Color::Reset);
    }

    /// Header + mounted game area.
    fn compose_match(&mut self, _hub: &Hub, session: &SessionController) {
        let d = session.descriptor();
        let secs = session.remaining_secs();
        let clock_fg = if secs < 10 { Color::Red } else { Color::White };

        self.front.fill_row(0, HUD_BG);
        self.front.put_str(1, 0, d.title, Color::White, HUD_BG);
        let clock = format!("{:02}:{:02}", secs / 60, secs % 60);
        let cx = self.front.width / 2;
        self.front.put_str(cx.saturating_sub(2), 0, &clock, clock_fg, HUD_BG);
        let score = format!("{} pts", session.score());
        let sx = self.front.width.saturating_sub(score.len() + 2);
        self.front.put_str(sx, 0, &score, GOLD, HUD_BG);

        match session.view() {
            Some(GameView::Board { cards, cursor }) => self.compose_board(cards, cursor),
            Some(GameView::Track { player_lane, obstacles }) => {
                self.compose_track(player_lane, obstacles)
            }
            Some(GameView::Field { plots, cursor, clock }) => {
                self.compose_field(plots, cursor, clock)
            }
            None => {
                let msg = format!("Game content not found for {}", d.title);
                let mid = self.front.height / 2;
                self.front.put_centered(mid, &msg, DIM, Color::Reset);
            }
        }

        if session.awaiting_result() {
            let mid = self.front.height / 2;
            self.front.put_centered(mid, "Submitting score...", GOLD, Color::Reset);
        }

        let help_row = self.front.height.saturating_sub(1);
        self.front.put_str(
            2,
            help_row,
            "←→↑↓ Move   ENTER Act   P Pause",
            DIM,
            Color::Reset,
        );
    }

    // ── Matching board: 4×4 cards ──

    fn compose_board(&mut self, cards: &[Card], cursor: usize) {
        let cell_w = 6;
        let cell_h = 3;
        let grid_w = BOARD_COLS * cell_w;
        let rows = cards.len().div_ceil(BOARD_COLS);
        let left = self.front.width.saturating_sub(grid_w) / 2;
        let top = 3;

        for (i, card) in cards.iter().enumerate() {
            let cx = left + (i % BOARD_COLS) * cell_w;
            let cy = top + (i / BOARD_COLS) * cell_h;
            let selected = i == cursor;

            let bg = if selected {
                CURSOR_BG
            } else if card.matched {
                Color::Rgb { r: 20, g: 45, b: 20 }
            } else if card.face_up {
                Color::Rgb { r: 45, g: 45, b: 90 }
            } else {
                Color::Rgb { r: 40, g: 40, b: 55 }
            };

            for dy in 0..2 {
                for dx in 0..cell_w - 1 {
                    self.front.set(cx + dx, cy + dy, Cell::from_char(' ', Color::White, bg));
                }
            }
            if card.face_up || card.matched {
                self.front.put_wide(cx + 1, cy, card.symbol, bg);
                if card.matched {
                    self.front.put_str(cx + 3, cy + 1, "✓", GREEN, bg);
                }
            } else {
                self.front.put_str(cx + 2, cy, "?", DIM, bg);
            }
        }

        let hint_row = top + rows * cell_h + 1;
        self.front.put_centered(hint_row, "Find matching pairs!", DIM, Color::Reset);
    }

    // ── Runner track: 3 lanes, obstacles fall toward the player ──

    fn compose_track(&mut self, player_lane: usize, obstacles: &[Obstacle]) {
        let lane_w = 8;
        let track_w = LANES * lane_w + 1;
        let left = self.front.width.saturating_sub(track_w) / 2;
        let top = 2;
        let track_h = self.front.height.saturating_sub(top + 3);
        if track_h < 4 {
            return;
        }

        // Lane dividers
        for row in 0..track_h {
            for lane in 0..=LANES {
                let x = left + lane * lane_w;
                let ch = if lane == 0 || lane == LANES { '║' } else { '┊' };
                self.front.set(x, top + row, Cell::from_char(ch, DIM, Color::Reset));
            }
        }

        // Player near the bottom (the collision band's screen position)
        let player_row = top + track_h * 85 / 100;
        let player_x = left + player_lane * lane_w + lane_w / 2 - 1;
        self.front.put_wide(player_x, player_row, '🏎', Color::Reset);

        // Obstacles by progress: 0 at the far edge, 100 at the player's end
        for obs in obstacles {
            if obs.progress < 0.0 || obs.progress > 100.0 {
                continue;
            }
            let off = (obs.progress / 100.0 * (track_h - 1) as f32) as usize;
            let x = left + obs.lane * lane_w + lane_w / 2 - 1;
            let icon = match obs.kind {
                ObstacleKind::Hazard => '🪨',
                ObstacleKind::Bonus => '🪙',
            };
            self.front.put_wide(x, top + off.min(track_h - 1), icon, Color::Reset);
        }

        self.front.put_centered(top + track_h + 1, "← → Dodge!", DIM, Color::Reset);
    }

    // ── Growth field: 2×3 plots ──

    fn compose_field(&mut self, plots: &[Plot], cursor: usize, clock: Duration) {
        let cell_w = 14;
        let cell_h = 4;
        let grid_w = FIELD_COLS * cell_w;
        let left = self.front.width.saturating_sub(grid_w) / 2;
        let top = 3;

        self.front.put_centered(2, "Plant & harvest!", GOLD, Color::Reset);

        for (i, plot) in plots.iter().enumerate() {
            let cx = left + (i % FIELD_COLS) * cell_w;
            let cy = top + 1 + (i / FIELD_COLS) * cell_h;
            let selected = i == cursor;

            let bg = match plot.state {
                _ if selected => CURSOR_BG,
                PlotState::Empty => Color::Rgb { r: 40, g: 32, b: 25 },
                PlotState::Growing => Color::Rgb { r: 55, g: 42, b: 20 },
                PlotState::Ready => Color::Rgb { r: 25, g: 55, b: 25 },
            };

            for dy in 0..cell_h - 1 {
                for dx in 0..cell_w - 1 {
                    self.front.set(cx + dx, cy + dy, Cell::from_char(' ', Color::White, bg));
                }
            }

            match plot.state {
                PlotState::Empty => {
                    self.front.put_wide(cx + cell_w / 2 - 1, cy + 1, '🌱', bg);
                }
                PlotState::Growing => {
                    let crop = &CROPS[plot.crop];
                    self.front.put_wide(cx + 1, cy, '💧', bg);
                    let elapsed = clock.saturating_sub(plot.planted_at);
                    let frac = elapsed.as_secs_f32() / crop.grow.as_secs_f32().max(0.001);
                    let filled = (frac.min(1.0) * 8.0) as usize;
                    self.front.put_str(cx + 2, cy + 2, &gauge(filled, 8), BLUE, bg);
                }
                PlotState::Ready => {
                    self.front.put_wide(cx + cell_w / 2 - 1, cy + 1, CROPS[plot.crop].icon, bg);
                }
            }
        }
    }

    // ── Overlays / settlement ──

    fn compose_pause_overlay(&mut self) {
        let mid = self.front.height / 2;
        self.front.fill_row(mid.saturating_sub(1), HUD_BG);
        self.front.fill_row(mid, HUD_BG);
        self.front.fill_row(mid + 1, HUD_BG);
        self.front.put_centered(mid.saturating_sub(1), "P A U S E D", Color::White, HUD_BG);
        self.front.put_centered(mid + 1, "P Resume   ESC Exit Game", DIM, HUD_BG);
    }

    fn compose_settlement(&mut self, session: &SessionController) {
        let mid = self.front.height / 2;
        self.front.put_centered(mid.saturating_sub(6), "◆ MATCH FINISHED ◆", GOLD, Color::Reset);

        if let Some(result) = session.result() {
            let score = format!("Final Score   {}", result.score);
            let coins = format!("Coins Earned  +{}", result.coins_earned);
            self.front.put_centered(mid.saturating_sub(3), &score, Color::White, Color::Reset);
            self.front.put_centered(mid.saturating_sub(2), &coins, GOLD, Color::Reset);

            let rank = format!("You beat {}% of players!", result.rank_percent);
            self.front.put_centered(mid, &rank, BLUE, Color::Reset);
            let filled = (result.rank_percent as usize * 24) / 100;
            self.front.put_centered(mid + 1, &gauge(filled, 24), BLUE, Color::Reset);
        }

        self.front.put_centered(mid + 4, "ENTER  Play Again", GREEN, Color::Reset);
        self.front.put_centered(mid + 5, "S      Share Results", Color::White, Color::Reset);
        self.front.put_centered(mid + 6, "ESC    Back to Lobby", DIM, Color::Reset);
    }
}
