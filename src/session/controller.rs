/// The session controller: one play-through of a mini-game, from load to
/// settlement.
///
/// Owns the lifecycle state machine, the match clock, and the score mirror,
/// and mounts at most one mini-game module. The module is a black box: the
/// controller flips its active flag, feeds it frames and input, and mirrors
/// the signals that come back. Switching runs (play-again) destroys the old
/// module instance and mounts a fresh one — state never bleeds between runs.
///
/// Settlement is launched exactly once per run, on whichever trigger comes
/// first (clock expiry or module game-over); the controller then freezes the
/// run and polls the scoring ticket until the result lands.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::HubConfig;
use crate::hub::catalog::GameDescriptor;
use crate::minigame::{self, GameInput, GameView, MiniGame, ModuleSignal};

use super::clock::MatchClock;
use super::event::SessionEvent;
use super::scoring::{coins_for, PendingSettlement, ScoreService, SettlementResult};

/// Rank used when the backend cannot be waited for any longer.
const FALLBACK_RANK: u8 = 50;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Loading,
    Idle,
    Running,
    Paused,
    Settled,
}

pub struct SessionController {
    descriptor: GameDescriptor,
    state: SessionState,
    load_remaining: Duration,
    clock: MatchClock,
    /// Mirror of the module's cumulative score; never computed here.
    score: u32,
    module: Option<Box<dyn MiniGame>>,
    /// Settlement launched for the current run.
    settling: bool,
    pending: Option<PendingSettlement>,
    /// Time spent waiting on the backend, for the timeout guard.
    waited: Duration,
    result: Option<SettlementResult>,
    finish_sent: bool,
    service: Box<dyn ScoreService>,
    cfg: HubConfig,
    /// Seeds each mounted module instance.
    rng: ChaCha8Rng,
}

impl SessionController {
    pub fn new(
        descriptor: GameDescriptor,
        cfg: HubConfig,
        service: Box<dyn ScoreService>,
        mut rng: ChaCha8Rng,
    ) -> Self {
        let module = minigame::module_for(descriptor.category)
            .map(|kind| minigame::mount(kind, &cfg, rng.gen()));
        if module.is_none() {
            tracing::warn!(game = descriptor.id, "no module for category, mounting placeholder");
        }
        tracing::info!(game = descriptor.id, "session loading");

        SessionController {
            state: SessionState::Loading,
            load_remaining: cfg.session.load_delay,
            clock: MatchClock::new(cfg.session.duration),
            score: 0,
            module,
            settling: false,
            pending: None,
            waited: Duration::ZERO,
            result: None,
            finish_sent: false,
            service,
            descriptor,
            cfg,
            rng,
        }
    }

    // ── Frame advance ──

    pub fn tick(&mut self, dt: Duration) -> Vec<SessionEvent> {
        let mut events = vec![];

        match self.state {
            SessionState::Loading => {
                self.load_remaining = self.load_remaining.saturating_sub(dt);
                if self.load_remaining.is_zero() {
                    self.state = SessionState::Idle;
                    events.push(SessionEvent::LoadFinished);
                }
            }
            SessionState::Running if self.settling => {
                self.poll_settlement(dt, &mut events);
            }
            SessionState::Running => {
                if let Some(module) = &mut self.module {
                    let signals = module.update(dt);
                    self.process_signals(signals, &mut events);
                }
                // A game-over signal above freezes the run before the clock
                // can also trigger.
                if !self.settling && self.clock.advance(dt) {
                    let score = self.score;
                    self.begin_settlement(score, &mut events);
                }
            }
            // Paused, Idle, Settled: nothing advances.
            _ => {}
        }

        events
    }

    // ── Player actions ──

    pub fn handle_input(&mut self, input: GameInput) -> Vec<SessionEvent> {
        let mut events = vec![];
        if self.state == SessionState::Running && !self.settling {
            if let Some(module) = &mut self.module {
                let signals = module.handle_input(input);
                self.process_signals(signals, &mut events);
            }
        }
        events
    }

    /// Idle → Running.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Idle {
            return vec![];
        }
        self.begin_run()
    }

    /// Settled → Running, as if from Idle: fresh score, fresh clock, and a
    /// brand-new module instance. The old instance is dropped, never reused.
    pub fn play_again(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Settled {
            return vec![];
        }
        self.module = minigame::module_for(self.descriptor.category)
            .map(|kind| minigame::mount(kind, &self.cfg, self.rng.gen()));
        self.settling = false;
        self.pending = None;
        self.waited = Duration::ZERO;
        self.result = None;
        self.finish_sent = false;
        self.begin_run()
    }

    pub fn pause(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Running || self.settling {
            return vec![];
        }
        self.state = SessionState::Paused;
        if let Some(module) = &mut self.module {
            module.set_active(false);
        }
        vec![SessionEvent::Paused]
    }

    pub fn resume(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Paused {
            return vec![];
        }
        self.state = SessionState::Running;
        if let Some(module) = &mut self.module {
            module.set_active(true);
        }
        vec![SessionEvent::Resumed]
    }

    // ── Internals ──

    fn begin_run(&mut self) -> Vec<SessionEvent> {
        self.score = 0;
        self.clock = MatchClock::new(self.cfg.session.duration);
        self.state = SessionState::Running;
        if let Some(module) = &mut self.module {
            module.set_active(true);
        }
        tracing::info!(game = self.descriptor.id, "match started");
        vec![SessionEvent::Started]
    }

    /// Commit signals in emission order: the score mirror is updated before
    /// a game-over from the same batch is acted on.
    fn process_signals(&mut self, signals: Vec<ModuleSignal>, events: &mut Vec<SessionEvent>) {
        for signal in signals {
            match signal {
                ModuleSignal::Score(score) => {
                    if !self.settling && self.state == SessionState::Running {
                        self.score = score;
                        events.push(SessionEvent::ScoreChanged(score));
                    }
                }
                ModuleSignal::GameOver(final_score) => {
                    self.begin_settlement(final_score, events);
                }
            }
        }
    }

    /// Freeze the run and submit the final score. No-op after the first
    /// trigger: late game-over signals and clock expiry race safely.
    fn begin_settlement(&mut self, final_score: u32, events: &mut Vec<SessionEvent>) {
        if self.settling || self.state == SessionState::Settled {
            return;
        }
        self.settling = true;
        self.score = final_score;
        if let Some(module) = &mut self.module {
            module.set_active(false);
        }
        events.push(SessionEvent::GameOver(final_score));

        match self.service.submit(self.descriptor.id, final_score) {
            Ok(pending) => {
                self.pending = Some(pending);
                self.waited = Duration::ZERO;
            }
            Err(e) => {
                tracing::warn!(game = self.descriptor.id, error = %e, "score submission failed, settling locally");
                self.complete_settlement(self.local_result(final_score), events);
            }
        }
    }

    fn poll_settlement(&mut self, dt: Duration, events: &mut Vec<SessionEvent>) {
        self.waited += dt;
        let resolved = match &mut self.pending {
            Some(pending) => pending.poll(dt),
            None => None,
        };

        if let Some(result) = resolved {
            self.complete_settlement(result, events);
        } else if self.pending.is_some() && self.waited >= self.cfg.session.settle_timeout {
            tracing::warn!(game = self.descriptor.id, "scoring backend timed out, settling locally");
            let fallback = self.local_result(self.score);
            self.complete_settlement(fallback, events);
        }
    }

    fn complete_settlement(&mut self, result: SettlementResult, events: &mut Vec<SessionEvent>) {
        self.pending = None;
        self.result = Some(result);
        self.state = SessionState::Settled;
        events.push(SessionEvent::Settled(result));
        if !self.finish_sent {
            self.finish_sent = true;
            events.push(SessionEvent::Finished(result.score));
        }
        tracing::info!(
            game = self.descriptor.id,
            score = result.score,
            rank = result.rank_percent,
            "session settled"
        );
    }

    fn local_result(&self, score: u32) -> SettlementResult {
        SettlementResult {
            score,
            rank_percent: FALLBACK_RANK,
            coins_earned: coins_for(score),
        }
    }

    // ── Read-only surface for the shell and renderer ──

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn descriptor(&self) -> &GameDescriptor {
        &self.descriptor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs()
    }

    pub fn load_progress(&self) -> f32 {
        let total = self.cfg.session.load_delay;
        if total.is_zero() {
            return 1.0;
        }
        1.0 - self.load_remaining.as_secs_f32() / total.as_secs_f32()
    }

    /// True between the settlement trigger and the backend's answer.
    pub fn awaiting_result(&self) -> bool {
        self.settling && self.result.is_none()
    }

    pub fn result(&self) -> Option<&SettlementResult> {
        self.result.as_ref()
    }

    /// None renders as the "content not found" placeholder.
    pub fn view(&self) -> Option<GameView<'_>> {
        self.module.as_ref().map(|m| m.view())
    }
}
