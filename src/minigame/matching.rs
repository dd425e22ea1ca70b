/// Matching-pairs: the turn-based memory board.
///
/// Selection state machine per pair: 0 revealed → 1 revealed → 2 revealed
/// → resolve → 0 revealed. A mismatch is resolved by the flip-back timer;
/// until it fires the two-card cap blocks any further reveal.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::MatchingConfig;

use super::{GameInput, GameView, MiniGame, ModuleSignal};

pub const BOARD_COLS: usize = 4;
pub const BOARD_ROWS: usize = 4;

const SYMBOLS: [char; 8] = ['🍎', '🍌', '🍇', '🍓', '🍒', '🍑', '🍍', '🥥'];

#[derive(Clone, Copy, Debug)]
pub struct Card {
    pub symbol: char,
    pub face_up: bool,
    pub matched: bool,
}

/// A mismatched pair waiting to flip back down.
struct FlipBack {
    first: usize,
    second: usize,
    remaining: Duration,
}

pub struct MatchingPairs {
    cards: Vec<Card>,
    /// Indices of currently revealed, unresolved cards (0..=2).
    revealed: Vec<usize>,
    cursor: usize,
    score: u32,
    active: bool,
    flip_back: Option<FlipBack>,
    /// Countdown from board completion to the game-over signal, so the
    /// final match stays visible for a beat.
    finish: Option<Duration>,
    game_over_sent: bool,
    cfg: MatchingConfig,
}

impl MatchingPairs {
    pub fn new(cfg: MatchingConfig, mut rng: ChaCha8Rng) -> Self {
        // Every symbol exactly twice, uniformly shuffled (Fisher–Yates).
        let mut deck: Vec<char> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        deck.shuffle(&mut rng);

        MatchingPairs {
            cards: deck
                .into_iter()
                .map(|symbol| Card { symbol, face_up: false, matched: false })
                .collect(),
            revealed: Vec::with_capacity(2),
            cursor: 0,
            score: 0,
            active: false,
            flip_back: None,
            finish: None,
            game_over_sent: false,
            cfg,
        }
    }

    /// Attempt to reveal the card at `index`.
    /// Rejected silently unless the module is active, the card is face-down
    /// and unmatched, and fewer than two cards are currently revealed.
    fn reveal(&mut self, index: usize) -> Vec<ModuleSignal> {
        if !self.active || index >= self.cards.len() {
            return vec![];
        }
        let card = self.cards[index];
        if card.matched || card.face_up || self.revealed.len() >= 2 {
            return vec![];
        }

        self.cards[index].face_up = true;
        self.revealed.push(index);

        if self.revealed.len() == 2 {
            self.resolve_pair()
        } else {
            vec![]
        }
    }

    fn resolve_pair(&mut self) -> Vec<ModuleSignal> {
        let (first, second) = (self.revealed[0], self.revealed[1]);
        let mut signals = vec![];

        if self.cards[first].symbol == self.cards[second].symbol {
            self.cards[first].matched = true;
            self.cards[second].matched = true;
            self.revealed.clear();
            self.score += self.cfg.match_points;
            signals.push(ModuleSignal::Score(self.score));

            if self.cards.iter().all(|c| c.matched) {
                self.score += self.cfg.clear_bonus;
                signals.push(ModuleSignal::Score(self.score));
                self.finish = Some(self.cfg.finish_delay);
            }
        } else {
            // Leave both face-up; the cap blocks new reveals until flip-back.
            self.flip_back = Some(FlipBack {
                first,
                second,
                remaining: self.cfg.flip_back,
            });
        }

        signals
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let col = (self.cursor % BOARD_COLS) as i32 + dx;
        let row = (self.cursor / BOARD_COLS) as i32 + dy;
        let col = col.clamp(0, BOARD_COLS as i32 - 1) as usize;
        let row = row.clamp(0, BOARD_ROWS as i32 - 1) as usize;
        self.cursor = row * BOARD_COLS + col;
    }
}

impl MiniGame for MatchingPairs {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn update(&mut self, dt: Duration) -> Vec<ModuleSignal> {
        if !self.active {
            return vec![];
        }

        if let Some(fb) = &mut self.flip_back {
            fb.remaining = fb.remaining.saturating_sub(dt);
            if fb.remaining.is_zero() {
                let (first, second) = (fb.first, fb.second);
                self.cards[first].face_up = false;
                self.cards[second].face_up = false;
                self.revealed.clear();
                self.flip_back = None;
            }
        }

        if let Some(remaining) = &mut self.finish {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.finish = None;
                if !self.game_over_sent {
                    self.game_over_sent = true;
                    return vec![ModuleSignal::GameOver(self.score)];
                }
            }
        }

        vec![]
    }

    fn handle_input(&mut self, input: GameInput) -> Vec<ModuleSignal> {
        if !self.active {
            return vec![];
        }
        match input {
            GameInput::Left => self.move_cursor(-1, 0),
            GameInput::Right => self.move_cursor(1, 0),
            GameInput::Up => self.move_cursor(0, -1),
            GameInput::Down => self.move_cursor(0, 1),
            GameInput::Activate => return self.reveal(self.cursor),
        }
        vec![]
    }

    fn view(&self) -> GameView<'_> {
        GameView::Board {
            cards: &self.cards,
            cursor: self.cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn module() -> MatchingPairs {
        let cfg = crate::config::HubConfig::default().matching;
        let mut m = MatchingPairs::new(cfg, ChaCha8Rng::seed_from_u64(7));
        m.set_active(true);
        m
    }

    /// Find two distinct indices holding the same symbol.
    fn find_pair(m: &MatchingPairs) -> (usize, usize) {
        for i in 0..m.cards.len() {
            for j in (i + 1)..m.cards.len() {
                if m.cards[i].symbol == m.cards[j].symbol {
                    return (i, j);
                }
            }
        }
        unreachable!("a shuffled deck always contains pairs");
    }

    /// Find two indices holding different symbols.
    fn find_mismatch(m: &MatchingPairs) -> (usize, usize) {
        for i in 0..m.cards.len() {
            for j in (i + 1)..m.cards.len() {
                if m.cards[i].symbol != m.cards[j].symbol {
                    return (i, j);
                }
            }
        }
        unreachable!("a 16-card deck has more than one symbol");
    }

    #[test]
    fn shuffle_preserves_symbol_multiset() {
        let m = module();
        assert_eq!(m.cards.len(), 16);
        for s in SYMBOLS {
            let count = m.cards.iter().filter(|c| c.symbol == s).count();
            assert_eq!(count, 2, "symbol {s} must appear exactly twice");
        }
    }

    #[test]
    fn matching_pair_scores_and_empties_buffer() {
        let mut m = module();
        let (a, b) = find_pair(&m);

        assert!(m.reveal(a).is_empty());
        let signals = m.reveal(b);

        assert_eq!(signals, vec![ModuleSignal::Score(100)]);
        assert!(m.cards[a].matched && m.cards[b].matched);
        assert!(m.revealed.is_empty());
    }

    #[test]
    fn mismatch_flips_back_after_delay() {
        let mut m = module();
        let (a, b) = find_mismatch(&m);

        m.reveal(a);
        let signals = m.reveal(b);
        assert!(signals.is_empty());
        assert!(m.cards[a].face_up && m.cards[b].face_up);

        // Third reveal is blocked by the two-card cap.
        let c = (0..16).find(|&i| i != a && i != b).unwrap();
        assert!(m.reveal(c).is_empty());
        assert!(!m.cards[c].face_up);

        // Not yet: 0.4s of the 1.0s delay.
        m.update(Duration::from_millis(400));
        assert!(m.cards[a].face_up);

        m.update(Duration::from_millis(700));
        assert!(!m.cards[a].face_up && !m.cards[b].face_up);
        assert!(m.revealed.is_empty());
    }

    #[test]
    fn clearing_the_board_awards_bonus_and_one_game_over() {
        let mut m = module();

        // Match every pair by symbol lookup.
        let mut total = 0;
        for s in SYMBOLS {
            let idx: Vec<usize> = (0..16).filter(|&i| m.cards[i].symbol == s).collect();
            m.reveal(idx[0]);
            let signals = m.reveal(idx[1]);
            total += 100;
            if m.cards.iter().all(|c| c.matched) {
                // Last pair: match points then the clear bonus.
                assert_eq!(
                    signals,
                    vec![ModuleSignal::Score(total), ModuleSignal::Score(total + 500)]
                );
            } else {
                assert_eq!(signals, vec![ModuleSignal::Score(total)]);
            }
        }

        // Game over arrives only after the finish delay, exactly once.
        assert!(m.update(Duration::from_millis(500)).is_empty());
        let signals = m.update(Duration::from_millis(600));
        assert_eq!(signals, vec![ModuleSignal::GameOver(1300)]);
        assert!(m.update(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn inactive_module_ignores_input_and_time() {
        let mut m = module();
        let (a, b) = find_mismatch(&m);
        m.reveal(a);
        m.reveal(b);

        m.set_active(false);
        assert!(m.reveal(5).is_empty());
        // Paused time must not advance the flip-back timer.
        m.update(Duration::from_secs(10));
        assert!(m.cards[a].face_up && m.cards[b].face_up);

        m.set_active(true);
        m.update(Duration::from_millis(1100));
        assert!(!m.cards[a].face_up);
    }

    #[test]
    fn cursor_clamps_at_board_edges() {
        let mut m = module();
        for _ in 0..10 {
            m.handle_input(GameInput::Left);
            m.handle_input(GameInput::Up);
        }
        assert_eq!(m.cursor, 0);
        for _ in 0..10 {
            m.handle_input(GameInput::Right);
            m.handle_input(GameInput::Down);
        }
        assert_eq!(m.cursor, 15);
    }
}
