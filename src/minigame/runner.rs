/// Lane-runner: the continuous dodge-and-collect track.
///
/// Obstacle progress runs 0 (far edge) → 100 (player's end); the collision
/// band is the fixed range in front of the player. Positions advance once
/// per processed frame by the current speed; spawn timing is gated by
/// accumulated active time, so frame rate affects smoothness but not
/// spawn density. While inactive nothing advances, and no collision from
/// before a pause is ever re-run after resume.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::RunnerConfig;

use super::{GameInput, GameView, MiniGame, ModuleSignal};

pub const LANES: usize = 3;

/// Progress range where player/obstacle overlap is evaluated.
const BAND_NEAR: f32 = 75.0;
const BAND_FAR: f32 = 95.0;
/// Obstacles beyond this progress leave the track.
const DESPAWN: f32 = 110.0;
/// Fresh obstacles appear just off the far edge.
const SPAWN_PROGRESS: f32 = -10.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObstacleKind {
    Hazard,
    Bonus,
}

#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub lane: usize,
    pub kind: ObstacleKind,
    pub progress: f32,
    /// Dodge points already granted for clearing the band.
    scored: bool,
}

pub struct LaneRunner {
    player_lane: usize,
    obstacles: Vec<Obstacle>,
    speed: f32,
    /// Active time since the last spawn.
    since_spawn: Duration,
    score: u32,
    active: bool,
    game_over_sent: bool,
    rng: ChaCha8Rng,
    cfg: RunnerConfig,
}

impl LaneRunner {
    pub fn new(cfg: RunnerConfig, rng: ChaCha8Rng) -> Self {
        LaneRunner {
            player_lane: 1,
            obstacles: Vec::new(),
            speed: cfg.base_speed,
            since_spawn: Duration::ZERO,
            score: 0,
            active: false,
            game_over_sent: false,
            rng,
            cfg,
        }
    }

    fn spawn(&mut self) {
        let lane = self.rng.gen_range(0..LANES);
        let kind = if self.rng.gen_bool(self.cfg.hazard_chance) {
            ObstacleKind::Hazard
        } else {
            ObstacleKind::Bonus
        };
        self.obstacles.push(Obstacle {
            lane,
            kind,
            progress: SPAWN_PROGRESS,
            scored: false,
        });
    }

    /// Spawn gate: a new obstacle every `spawn_interval / speed` of active
    /// time. The interval shrinks as the speed ramps up.
    fn spawn_due(&self) -> bool {
        let interval = self.cfg.spawn_interval.div_f32(self.speed.max(0.1));
        self.since_spawn >= interval
    }
}

impl MiniGame for LaneRunner {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn update(&mut self, dt: Duration) -> Vec<ModuleSignal> {
        if !self.active || self.game_over_sent {
            return vec![];
        }

        self.since_spawn += dt;
        if self.spawn_due() {
            self.spawn();
            self.since_spawn = Duration::ZERO;
        }

        // Difficulty ramp: once per processed frame.
        self.speed += self.cfg.accel;

        let mut hit = false;
        let mut points = 0;
        let mut next = Vec::with_capacity(self.obstacles.len());

        for mut obs in self.obstacles.drain(..) {
            obs.progress += self.speed;

            let in_band = obs.progress > BAND_NEAR && obs.progress < BAND_FAR;
            if in_band && obs.lane == self.player_lane {
                match obs.kind {
                    ObstacleKind::Hazard => hit = true,
                    ObstacleKind::Bonus => {
                        points += self.cfg.bonus_points;
                        continue; // collected
                    }
                }
            }

            // A hazard clearing the band without contact was dodged.
            if !obs.scored && obs.progress >= BAND_FAR {
                obs.scored = true;
                if obs.kind == ObstacleKind::Hazard && !in_band {
                    points += self.cfg.dodge_points;
                }
            }

            if obs.progress < DESPAWN {
                next.push(obs);
            }
        }
        self.obstacles = next;

        if hit {
            // Score frozen at its pre-collision value: points gathered in
            // the triggering frame are discarded.
            self.game_over_sent = true;
            return vec![ModuleSignal::GameOver(self.score)];
        }

        if points > 0 {
            self.score += points;
            return vec![ModuleSignal::Score(self.score)];
        }

        vec![]
    }

    fn handle_input(&mut self, input: GameInput) -> Vec<ModuleSignal> {
        if !self.active || self.game_over_sent {
            return vec![];
        }
        match input {
            GameInput::Left => self.player_lane = self.player_lane.saturating_sub(1),
            GameInput::Right => self.player_lane = (self.player_lane + 1).min(LANES - 1),
            _ => {}
        }
        vec![]
    }

    fn view(&self) -> GameView<'_> {
        GameView::Track {
            player_lane: self.player_lane,
            obstacles: &self.obstacles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const FRAME: Duration = Duration::from_millis(50);

    fn module() -> LaneRunner {
        let cfg = crate::config::HubConfig::default().runner;
        let mut m = LaneRunner::new(cfg, ChaCha8Rng::seed_from_u64(11));
        m.set_active(true);
        m
    }

    fn put(m: &mut LaneRunner, lane: usize, kind: ObstacleKind, progress: f32) {
        m.obstacles.push(Obstacle { lane, kind, progress, scored: false });
    }

    #[test]
    fn hazard_in_player_lane_ends_session_with_frozen_score() {
        let mut m = module();
        m.score = 230;
        // Also drop a bonus on the same frame: its points must be discarded.
        put(&mut m, 1, ObstacleKind::Bonus, 80.0);
        put(&mut m, 1, ObstacleKind::Hazard, 80.0);

        let signals = m.update(FRAME);
        assert_eq!(signals, vec![ModuleSignal::GameOver(230)]);

        // Nothing accrues after the triggering frame.
        assert!(m.update(FRAME).is_empty());
        assert!(m.handle_input(GameInput::Left).is_empty());
    }

    #[test]
    fn bonus_in_player_lane_is_collected() {
        let mut m = module();
        put(&mut m, 1, ObstacleKind::Bonus, 80.0);

        let signals = m.update(FRAME);
        assert_eq!(signals, vec![ModuleSignal::Score(50)]);
        assert!(m.obstacles.iter().all(|o| o.kind != ObstacleKind::Bonus));
    }

    #[test]
    fn hazard_in_other_lane_awards_dodge_points_once() {
        let mut m = module();
        put(&mut m, 0, ObstacleKind::Hazard, 94.5);

        // Crosses the band edge this frame.
        let signals = m.update(FRAME);
        assert_eq!(signals, vec![ModuleSignal::Score(10)]);

        // Still on the track, but never scored again.
        assert!(!m.obstacles.is_empty());
        assert!(m.update(FRAME).is_empty());
    }

    #[test]
    fn obstacles_despawn_past_track_end() {
        let mut m = module();
        put(&mut m, 0, ObstacleKind::Hazard, 109.9);
        m.obstacles[0].scored = true;
        m.update(FRAME);
        assert!(m.obstacles.iter().all(|o| o.progress < DESPAWN));
    }

    #[test]
    fn lane_switch_clamps_at_boundaries() {
        let mut m = module();
        m.handle_input(GameInput::Left);
        m.handle_input(GameInput::Left);
        m.handle_input(GameInput::Left);
        assert_eq!(m.player_lane, 0);

        for _ in 0..5 {
            m.handle_input(GameInput::Right);
        }
        assert_eq!(m.player_lane, LANES - 1);
    }

    #[test]
    fn spawn_gated_by_active_time_not_frames() {
        let mut m = module();
        // One huge frame past the interval spawns exactly one obstacle.
        m.update(Duration::from_secs(2));
        assert_eq!(m.obstacles.len(), 1);

        // Many tiny frames summing to less than the interval spawn nothing.
        let before = m.obstacles.len();
        for _ in 0..4 {
            m.update(Duration::from_millis(10));
        }
        assert_eq!(m.obstacles.len(), before);
    }

    #[test]
    fn speed_ramps_every_processed_frame() {
        let mut m = module();
        let start = m.speed;
        for _ in 0..10 {
            m.update(FRAME);
        }
        let ramped = m.speed;
        assert!(ramped > start);

        // Inactive frames do not ramp.
        m.set_active(false);
        m.update(FRAME);
        assert_eq!(m.speed, ramped);
    }

    #[test]
    fn inactive_module_is_completely_frozen() {
        let mut m = module();
        put(&mut m, 1, ObstacleKind::Hazard, 80.0);
        m.set_active(false);

        // A collision that would fire stays dormant while paused...
        assert!(m.update(Duration::from_secs(30)).is_empty());
        assert_eq!(m.obstacles[0].progress, 80.0);
        assert!(m.handle_input(GameInput::Right).is_empty());
        assert_eq!(m.player_lane, 1);

        // ...and resolves normally on resume.
        m.set_active(true);
        let signals = m.update(FRAME);
        assert_eq!(signals, vec![ModuleSignal::GameOver(0)]);
    }
}
