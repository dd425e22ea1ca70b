/// Growth-plot: the tick-based farm simulation.
///
/// Plot lifecycle: Empty → Growing → Ready → Empty. Promotion runs on a
/// periodic scan, not per-frame, so a crop becomes Ready on the first tick
/// after its growth duration elapses. All timing lives on the module's
/// active-play clock: paused time does not grow crops.
///
/// No internal game-over — a farm session only ends on match-clock expiry.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GrowthConfig;

use super::{GameInput, GameView, MiniGame, ModuleSignal};

pub const FIELD_COLS: usize = 2;
pub const FIELD_ROWS: usize = 3;
pub const PLOT_COUNT: usize = FIELD_COLS * FIELD_ROWS;

pub struct Crop {
    pub icon: char,
    pub grow: Duration,
    pub points: u32,
}

/// The fixed crop table: planting picks one uniformly at random.
pub const CROPS: [Crop; 3] = [
    Crop { icon: '🥕', grow: Duration::from_secs(2), points: 50 },
    Crop { icon: '🌽', grow: Duration::from_secs(4), points: 120 },
    Crop { icon: '🎃', grow: Duration::from_secs(6), points: 250 },
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlotState {
    Empty,
    Growing,
    Ready,
}

#[derive(Clone, Copy, Debug)]
pub struct Plot {
    pub state: PlotState,
    /// Index into `CROPS`. Meaningful only while Growing/Ready.
    pub crop: usize,
    /// Active-clock timestamp of the planting.
    pub planted_at: Duration,
}

impl Plot {
    const EMPTY: Plot = Plot {
        state: PlotState::Empty,
        crop: 0,
        planted_at: Duration::ZERO,
    };
}

pub struct GrowthPlot {
    plots: [Plot; PLOT_COUNT],
    cursor: usize,
    score: u32,
    active: bool,
    /// Accumulated active time; the timestamp source for `planted_at`.
    clock: Duration,
    since_scan: Duration,
    rng: ChaCha8Rng,
    cfg: GrowthConfig,
}

impl GrowthPlot {
    pub fn new(cfg: GrowthConfig, rng: ChaCha8Rng) -> Self {
        GrowthPlot {
            plots: [Plot::EMPTY; PLOT_COUNT],
            cursor: 0,
            score: 0,
            active: false,
            clock: Duration::ZERO,
            since_scan: Duration::ZERO,
            rng,
            cfg,
        }
    }

    /// Promote every Growing plot whose duration has elapsed.
    fn scan(&mut self) {
        for plot in &mut self.plots {
            if plot.state == PlotState::Growing
                && self.clock.saturating_sub(plot.planted_at) >= CROPS[plot.crop].grow
            {
                plot.state = PlotState::Ready;
            }
        }
    }

    fn click(&mut self, index: usize) -> Vec<ModuleSignal> {
        let plot = &mut self.plots[index];
        match plot.state {
            PlotState::Empty => {
                plot.crop = self.rng.gen_range(0..CROPS.len());
                plot.state = PlotState::Growing;
                plot.planted_at = self.clock;
                vec![]
            }
            PlotState::Ready => {
                self.score += CROPS[plot.crop].points;
                *plot = Plot::EMPTY;
                vec![ModuleSignal::Score(self.score)]
            }
            // A growing plot ignores clicks.
            PlotState::Growing => vec![],
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let col = (self.cursor % FIELD_COLS) as i32 + dx;
        let row = (self.cursor / FIELD_COLS) as i32 + dy;
        let col = col.clamp(0, FIELD_COLS as i32 - 1) as usize;
        let row = row.clamp(0, FIELD_ROWS as i32 - 1) as usize;
        self.cursor = row * FIELD_COLS + col;
    }
}

impl MiniGame for GrowthPlot {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn update(&mut self, dt: Duration) -> Vec<ModuleSignal> {
        if !self.active {
            return vec![];
        }
        self.clock += dt;
        self.since_scan += dt;
        while self.since_scan >= self.cfg.tick_interval {
            self.since_scan -= self.cfg.tick_interval;
            self.scan();
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
            GameInput::Activate => return self.click(self.cursor),
        }
        vec![]
    }

    fn view(&self) -> GameView<'_> {
        GameView::Field {
            plots: &self.plots,
            cursor: self.cursor,
            clock: self.clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn module() -> GrowthPlot {
        let cfg = crate::config::HubConfig::default().growth;
        let mut m = GrowthPlot::new(cfg, ChaCha8Rng::seed_from_u64(3));
        m.set_active(true);
        m
    }

    #[test]
    fn planting_on_empty_starts_growth() {
        let mut m = module();
        assert!(m.click(0).is_empty());
        assert_eq!(m.plots[0].state, PlotState::Growing);
        assert!(m.plots[0].crop < CROPS.len());
    }

    #[test]
    fn harvest_before_ready_is_a_no_op() {
        let mut m = module();
        m.click(0);
        let crop = m.plots[0].crop;

        // Just short of the growth duration: clicks do nothing.
        m.update(CROPS[crop].grow - Duration::from_millis(600));
        assert!(m.click(0).is_empty());
        assert_eq!(m.plots[0].state, PlotState::Growing);
        assert_eq!(m.score, 0);
    }

    #[test]
    fn tick_promotes_then_harvest_awards_table_points() {
        let mut m = module();
        m.click(0);
        let crop = m.plots[0].crop;

        // Past the duration; the next scan tick promotes.
        m.update(CROPS[crop].grow + Duration::from_millis(500));
        assert_eq!(m.plots[0].state, PlotState::Ready);

        let signals = m.click(0);
        assert_eq!(signals, vec![ModuleSignal::Score(CROPS[crop].points)]);
        assert_eq!(m.plots[0].state, PlotState::Empty);
    }

    #[test]
    fn promotion_waits_for_the_scan_tick() {
        let mut m = module();
        // Plant 0.3s out of phase with the 0.5s scan grid.
        m.update(Duration::from_millis(300));
        m.click(0);
        let grow = CROPS[m.plots[0].crop].grow;

        // Land exactly on a scan boundary, 0.3s short of maturity.
        m.update(grow - Duration::from_millis(300));
        assert_eq!(m.plots[0].state, PlotState::Growing);

        // Past the duration now, but no scan has run since.
        m.update(Duration::from_millis(400));
        assert_eq!(m.plots[0].state, PlotState::Growing);

        // The next scan promotes.
        m.update(Duration::from_millis(100));
        assert_eq!(m.plots[0].state, PlotState::Ready);
    }

    #[test]
    fn paused_time_does_not_grow_crops() {
        let mut m = module();
        m.click(0);

        m.set_active(false);
        m.update(Duration::from_secs(60));
        assert_eq!(m.plots[0].state, PlotState::Growing);
        assert_eq!(m.clock, Duration::ZERO);

        // Active time still has to pass in full after resume.
        m.set_active(true);
        m.update(Duration::from_millis(500));
        assert_eq!(m.plots[0].state, PlotState::Growing);
    }

    #[test]
    fn plots_are_independent() {
        let mut m = module();
        m.click(0);
        m.update(Duration::from_millis(500));
        m.click(1);
        assert_eq!(m.plots[0].planted_at, Duration::ZERO);
        assert_eq!(m.plots[1].planted_at, Duration::from_millis(500));

        // Ripen everything, harvest plot 0; plot 1 must be untouched.
        m.update(Duration::from_secs(7));
        assert_eq!(m.plots[0].state, PlotState::Ready);
        assert_eq!(m.plots[1].state, PlotState::Ready);
        m.click(0);
        assert_eq!(m.plots[0].state, PlotState::Empty);
        assert_eq!(m.plots[1].state, PlotState::Ready);
    }

    #[test]
    fn cursor_clamps_to_field() {
        let mut m = module();
        for _ in 0..5 {
            m.handle_input(GameInput::Down);
        }
        m.handle_input(GameInput::Right);
        assert_eq!(m.cursor, PLOT_COUNT - 1);
        for _ in 0..5 {
            m.handle_input(GameInput::Up);
            m.handle_input(GameInput::Left);
        }
        assert_eq!(m.cursor, 0);
    }
}
