/// Events emitted by the session controller.
/// The hub shell consumes these for bookkeeping and presentation.

use super::scoring::SettlementResult;

#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum SessionEvent {
    LoadFinished,
    Started,
    Paused,
    Resumed,
    /// Mirror update: the mounted module reported a new cumulative score.
    ScoreChanged(u32),
    /// The module (or clock expiry) ended the run; settlement is in flight.
    GameOver(u32),
    /// The scoring backend answered (or the local fallback kicked in).
    Settled(SettlementResult),
    /// Finish callback: exactly once per settled session.
    Finished(u32),
}
