/// Player profile and daily tasks: the persistent-player side of the shell.
///
/// The session core never touches this state; results only arrive through
/// the finish callback, and task rewards are claimed from the profile
/// screen. Nothing here survives a process restart.

use crate::session::scoring::coins_for;

#[derive(Clone, Debug)]
pub struct PlayerProfile {
    pub nickname: String,
    pub avatar: char,
    pub coins: u32,
    pub login_days: u32,
    pub total_play_minutes: u32,
    pub games_played: u32,
}

impl PlayerProfile {
    pub fn new() -> Self {
        PlayerProfile {
            nickname: "Guest Player".into(),
            avatar: '🐵',
            coins: 0,
            login_days: 1,
            total_play_minutes: 0,
            games_played: 0,
        }
    }
}

/// What advances a task's progress.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskKind {
    Login,
    PlayGames,
    ShareResults,
}

#[derive(Clone, Debug)]
pub struct DailyTask {
    pub kind: TaskKind,
    pub description: &'static str,
    pub reward: u32,
    pub current: u32,
    pub target: u32,
    pub collected: bool,
}

impl DailyTask {
    pub fn completed(&self) -> bool {
        self.current >= self.target
    }

    fn advance(&mut self) {
        self.current = (self.current + 1).min(self.target);
    }
}

pub fn daily_tasks() -> Vec<DailyTask> {
    vec![
        DailyTask {
            kind: TaskKind::Login,
            description: "Daily Login",
            reward: 50,
            current: 1,
            target: 1,
            collected: false,
        },
        DailyTask {
            kind: TaskKind::PlayGames,
            description: "Play 2 Games",
            reward: 100,
            current: 0,
            target: 2,
            collected: false,
        },
        DailyTask {
            kind: TaskKind::ShareResults,
            description: "Share Results",
            reward: 30,
            current: 0,
            target: 1,
            collected: false,
        },
    ]
}

/// Finish callback bookkeeping: stats and play-count task progress.
/// The 5-minute credit mirrors the backend's flat per-match playtime.
pub fn record_game_finished(profile: &mut PlayerProfile, tasks: &mut [DailyTask], score: u32) {
    profile.games_played += 1;
    profile.total_play_minutes += 5;
    profile.coins += coins_for(score);
    for task in tasks.iter_mut().filter(|t| t.kind == TaskKind::PlayGames) {
        task.advance();
    }
}

pub fn record_shared(tasks: &mut [DailyTask]) {
    for task in tasks.iter_mut().filter(|t| t.kind == TaskKind::ShareResults) {
        task.advance();
    }
}

/// Claim a completed task's reward. Pays out at most once per task.
/// Returns the coins granted, zero for an invalid claim.
pub fn collect_reward(profile: &mut PlayerProfile, task: &mut DailyTask) -> u32 {
    if !task.completed() || task.collected {
        return 0;
    }
    task.collected = true;
    profile.coins += task.reward;
    task.reward
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_games_pays_coins_and_advances_the_task() {
        let mut profile = PlayerProfile::new();
        let mut tasks = daily_tasks();

        record_game_finished(&mut profile, &mut tasks, 345);
        assert_eq!(profile.coins, 34);
        assert_eq!(profile.games_played, 1);
        assert_eq!(profile.total_play_minutes, 5);

        let play = tasks.iter().find(|t| t.kind == TaskKind::PlayGames).unwrap();
        assert_eq!(play.current, 1);
        assert!(!play.completed());

        record_game_finished(&mut profile, &mut tasks, 0);
        let play = tasks.iter().find(|t| t.kind == TaskKind::PlayGames).unwrap();
        assert!(play.completed());

        // Progress caps at the target.
        record_game_finished(&mut profile, &mut tasks, 0);
        let play = tasks.iter().find(|t| t.kind == TaskKind::PlayGames).unwrap();
        assert_eq!(play.current, 2);
    }

    #[test]
    fn rewards_collect_exactly_once() {
        let mut profile = PlayerProfile::new();
        let mut tasks = daily_tasks();

        // Login task starts completed.
        assert_eq!(collect_reward(&mut profile, &mut tasks[0]), 50);
        assert_eq!(profile.coins, 50);
        assert_eq!(collect_reward(&mut profile, &mut tasks[0]), 0);
        assert_eq!(profile.coins, 50);
    }

    #[test]
    fn incomplete_task_cannot_be_collected() {
        let mut profile = PlayerProfile::new();
        let mut tasks = daily_tasks();
        let share = tasks.iter_mut().find(|t| t.kind == TaskKind::ShareResults).unwrap();

        assert_eq!(collect_reward(&mut profile, share), 0);
        record_shared(std::slice::from_mut(share));
        assert!(share.completed());
        assert_eq!(collect_reward(&mut profile, share), 30);
        assert_eq!(profile.coins, 30);
    }
}
