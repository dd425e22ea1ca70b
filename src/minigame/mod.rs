/// The pluggable mini-game contract.
///
/// A module owns its entire internal simulation; the session controller
/// talks to it through four calls and never looks inside:
///   - `set_active` — while false the module must not advance any internal
///     timer or accept input, but it keeps its state.
///   - `update(dt)`  — one frame of active time.
///   - `handle_input` — one player action.
///   - `view`        — read-only snapshot for the renderer.
///
/// Signals flow back in emission order. `Score` carries the cumulative
/// score, never a delta. `GameOver` fires at most once per instance.

pub mod growth;
pub mod matching;
pub mod runner;

pub use growth::GrowthPlot;
pub use matching::MatchingPairs;
pub use runner::LaneRunner;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::HubConfig;
use crate::hub::catalog::Category;

/// Player actions, already decoded from raw keys by the shell.
/// Each module interprets these its own way (cursor moves, lane switches).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameInput {
    Left,
    Right,
    Up,
    Down,
    Activate,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModuleSignal {
    /// Cumulative score after the latest award.
    Score(u32),
    /// Final score. At most once per module instance.
    GameOver(u32),
}

pub trait MiniGame {
    fn set_active(&mut self, active: bool);
    fn update(&mut self, dt: Duration) -> Vec<ModuleSignal>;
    fn handle_input(&mut self, input: GameInput) -> Vec<ModuleSignal>;
    fn view(&self) -> GameView<'_>;
}

/// Renderable snapshot of a module's internals.
/// The renderer matches on the variant; the controller never reads these.
pub enum GameView<'a> {
    Board {
        cards: &'a [matching::Card],
        cursor: usize,
    },
    Track {
        player_lane: usize,
        obstacles: &'a [runner::Obstacle],
    },
    Field {
        plots: &'a [growth::Plot],
        cursor: usize,
        clock: Duration,
    },
}

/// Which concrete module a descriptor mounts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModuleKind {
    MatchingPairs,
    LaneRunner,
    GrowthPlot,
}

/// Static category → module table. Mounting never branches on game identity;
/// a category missing here renders as a "content not found" room.
const MODULE_TABLE: &[(Category, ModuleKind)] = &[
    (Category::Puzzle, ModuleKind::MatchingPairs),
    (Category::Competitive, ModuleKind::LaneRunner),
    (Category::Simulation, ModuleKind::GrowthPlot),
];

pub fn module_for(category: Category) -> Option<ModuleKind> {
    MODULE_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, kind)| *kind)
}

/// Build a fresh module instance. Called once per session run — play-again
/// mounts a new instance rather than resetting the old one.
pub fn mount(kind: ModuleKind, cfg: &HubConfig, seed: u64) -> Box<dyn MiniGame> {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    match kind {
        ModuleKind::MatchingPairs => Box::new(MatchingPairs::new(cfg.matching.clone(), rng)),
        ModuleKind::LaneRunner => Box::new(LaneRunner::new(cfg.runner.clone(), rng)),
        ModuleKind::GrowthPlot => Box::new(GrowthPlot::new(cfg.growth.clone(), rng)),
    }
}
