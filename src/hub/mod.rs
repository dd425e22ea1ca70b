/// Hub shell state: which screen is up, the live game session, and the
/// bookkeeping that reacts to session events.
///
/// The shell owns at most one `SessionController` at a time. Opening a game
/// builds one; leaving the room drops it, session state and all. Everything
/// the session reports arrives as `SessionEvent`s through `apply`.

pub mod catalog;
pub mod profile;

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::HubConfig;
use crate::minigame::GameInput;
use crate::session::{SessionController, SessionEvent, SessionState, SimulatedScoreService};

use catalog::{GameDescriptor, CATALOG};
use profile::{DailyTask, PlayerProfile};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HubView {
    Lobby,
    Profile,
}

pub struct Hub {
    pub view: HubView,
    pub profile: PlayerProfile,
    pub tasks: Vec<DailyTask>,
    pub lobby_cursor: usize,
    pub task_cursor: usize,
    pub session: Option<SessionController>,
    pub message: String,
    message_remaining: Duration,
    cfg: HubConfig,
    rng: ChaCha8Rng,
}

impl Hub {
    pub fn new(cfg: HubConfig, rng: ChaCha8Rng) -> Self {
        Hub {
            view: HubView::Lobby,
            profile: PlayerProfile::new(),
            tasks: profile::daily_tasks(),
            lobby_cursor: 0,
            task_cursor: 0,
            session: None,
            message: String::new(),
            message_remaining: Duration::ZERO,
            cfg,
            rng,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.cfg
    }

    pub fn set_message(&mut self, msg: &str, duration: Duration) {
        self.message = msg.to_string();
        self.message_remaining = duration;
    }

    // ── Frame advance ──

    pub fn tick(&mut self, dt: Duration) {
        if !self.message_remaining.is_zero() {
            self.message_remaining = self.message_remaining.saturating_sub(dt);
            if self.message_remaining.is_zero() {
                self.message.clear();
            }
        }

        if let Some(session) = &mut self.session {
            let events = session.tick(dt);
            self.apply(events);
        }
    }

    fn apply(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            if let SessionEvent::Finished(score) = event {
                profile::record_game_finished(&mut self.profile, &mut self.tasks, score);
            }
        }
    }

    // ── Lobby / profile navigation ──

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            HubView::Lobby => HubView::Profile,
            HubView::Profile => HubView::Lobby,
        };
    }

    pub fn lobby_move(&mut self, delta: i32) {
        let len = CATALOG.len() as i32;
        self.lobby_cursor = (self.lobby_cursor as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn task_move(&mut self, delta: i32) {
        let len = self.tasks.len() as i32;
        self.task_cursor = (self.task_cursor as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn selected_game(&self) -> &'static GameDescriptor {
        &CATALOG[self.lobby_cursor.min(CATALOG.len() - 1)]
    }

    pub fn collect_selected_reward(&mut self) {
        let idx = self.task_cursor.min(self.tasks.len() - 1);
        let granted = profile::collect_reward(&mut self.profile, &mut self.tasks[idx]);
        if granted > 0 {
            self.set_message(&format!("+{granted} coins collected!"), Duration::from_secs(3));
        }
    }

    // ── Game room ──

    pub fn open_selected_game(&mut self) {
        let descriptor = self.selected_game().clone();
        let service = SimulatedScoreService::new(
            self.cfg.session.score_latency,
            ChaCha8Rng::seed_from_u64(self.rng.gen()),
        );
        self.session = Some(SessionController::new(
            descriptor,
            self.cfg.clone(),
            Box::new(service),
            ChaCha8Rng::seed_from_u64(self.rng.gen()),
        ));
    }

    /// Back to the lobby. Dropping the controller drops the mounted module
    /// and every timer it owned.
    pub fn close_game(&mut self) {
        self.session = None;
    }

    pub fn start_game(&mut self) {
        if let Some(session) = &mut self.session {
            let events = session.start();
            self.apply(events);
        }
    }

    pub fn pause_game(&mut self) {
        if let Some(session) = &mut self.session {
            let events = session.pause();
            self.apply(events);
        }
    }

    pub fn resume_game(&mut self) {
        if let Some(session) = &mut self.session {
            let events = session.resume();
            self.apply(events);
        }
    }

    pub fn play_again(&mut self) {
        if let Some(session) = &mut self.session {
            let events = session.play_again();
            self.apply(events);
        }
    }

    pub fn game_input(&mut self, input: GameInput) {
        if let Some(session) = &mut self.session {
            let events = session.handle_input(input);
            self.apply(events);
        }
    }

    /// Share from the settlement screen: credits the share task and leaves
    /// the room.
    pub fn share_results(&mut self) {
        let settled = self
            .session
            .as_ref()
            .is_some_and(|s| s.state() == SessionState::Settled);
        if settled {
            profile::record_shared(&mut self.tasks);
            self.set_message("Results shared!", Duration::from_secs(3));
            self.close_game();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile::TaskKind;

    fn hub() -> Hub {
        Hub::new(HubConfig::default(), ChaCha8Rng::seed_from_u64(21))
    }

    /// Open the selected game and run it to settlement via clock expiry.
    fn play_to_settlement(hub: &mut Hub) {
        hub.open_selected_game();
        hub.tick(Duration::from_secs(2)); // loading → idle
        hub.start_game();
        hub.tick(Duration::from_secs(61)); // clock expiry → submission
        hub.tick(Duration::from_secs(1)); // backend latency → settled
        assert_eq!(
            hub.session.as_ref().unwrap().state(),
            SessionState::Settled
        );
    }

    #[test]
    fn finished_session_updates_profile_once() {
        let mut h = hub();
        play_to_settlement(&mut h);

        assert_eq!(h.profile.games_played, 1);
        assert_eq!(h.profile.total_play_minutes, 5);
        let play = h.tasks.iter().find(|t| t.kind == TaskKind::PlayGames).unwrap();
        assert_eq!(play.current, 1);

        // Idling on the settlement screen adds nothing.
        h.tick(Duration::from_secs(30));
        assert_eq!(h.profile.games_played, 1);
    }

    #[test]
    fn play_again_counts_as_a_new_game() {
        let mut h = hub();
        play_to_settlement(&mut h);
        h.play_again();
        h.tick(Duration::from_secs(61));
        h.tick(Duration::from_secs(1));
        assert_eq!(h.profile.games_played, 2);
    }

    #[test]
    fn sharing_credits_the_task_and_leaves_the_room() {
        let mut h = hub();

        // Sharing outside a settled session does nothing.
        h.share_results();
        let share = h.tasks.iter().find(|t| t.kind == TaskKind::ShareResults).unwrap();
        assert_eq!(share.current, 0);

        play_to_settlement(&mut h);
        h.share_results();
        assert!(h.session.is_none());
        let share = h.tasks.iter().find(|t| t.kind == TaskKind::ShareResults).unwrap();
        assert!(share.completed());
    }

    #[test]
    fn closing_the_room_discards_the_session() {
        let mut h = hub();
        h.open_selected_game();
        h.tick(Duration::from_secs(2));
        h.start_game();
        h.close_game();
        assert!(h.session.is_none());
        // No stray bookkeeping from the abandoned session.
        assert_eq!(h.profile.games_played, 0);
    }

    #[test]
    fn lobby_cursor_wraps_around_the_catalog() {
        let mut h = hub();
        h.lobby_move(-1);
        assert_eq!(h.lobby_cursor, CATALOG.len() - 1);
        h.lobby_move(1);
        assert_eq!(h.lobby_cursor, 0);
    }

    #[test]
    fn collecting_the_login_reward_pays_once() {
        let mut h = hub();
        h.task_cursor = 0; // Daily Login starts completed
        h.collect_selected_reward();
        assert_eq!(h.profile.coins, 50);
        h.collect_selected_reward();
        assert_eq!(h.profile.coins, 50);
    }
}
