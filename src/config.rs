/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Durations are written as fractional seconds in the file and converted
/// to `Duration` once, here, so the rest of the code never does unit math.

use serde::Deserialize;
use std::time::Duration;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct HubConfig {
    pub tick_rate_ms: u64,
    pub session: SessionConfig,
    pub matching: MatchingConfig,
    pub runner: RunnerConfig,
    pub growth: GrowthConfig,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Total match time per session.
    pub duration: Duration,
    /// Simulated asset-load delay before the room becomes interactive.
    pub load_delay: Duration,
    /// Simulated scoring-backend latency.
    pub score_latency: Duration,
    /// How long to wait for the scoring backend before settling locally.
    pub settle_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct MatchingConfig {
    pub match_points: u32,
    pub clear_bonus: u32,
    /// How long a mismatched pair stays face-up before flipping back.
    pub flip_back: Duration,
    /// Delay between clearing the board and the game-over signal.
    pub finish_delay: Duration,
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Obstacle progress gained per frame at session start.
    pub base_speed: f32,
    /// Speed gained every processed frame.
    pub accel: f32,
    /// Spawn gate: a new obstacle appears every `spawn_interval / speed`.
    pub spawn_interval: Duration,
    pub hazard_chance: f64,
    pub bonus_points: u32,
    pub dodge_points: u32,
}

#[derive(Clone, Debug)]
pub struct GrowthConfig {
    /// Period of the promotion scan over the plots.
    pub tick_interval: Duration,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    session: TomlSession,
    #[serde(default)]
    matching: TomlMatching,
    #[serde(default)]
    runner: TomlRunner,
    #[serde(default)]
    growth: TomlGrowth,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSession {
    #[serde(default = "default_session_secs")]
    duration_secs: f64,
    #[serde(default = "default_load_secs")]
    load_delay_secs: f64,
    #[serde(default = "default_score_latency")]
    score_latency_secs: f64,
    #[serde(default = "default_settle_timeout")]
    settle_timeout_secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlMatching {
    #[serde(default = "default_match_points")]
    match_points: u32,
    #[serde(default = "default_clear_bonus")]
    clear_bonus: u32,
    #[serde(default = "default_flip_back")]
    flip_back_secs: f64,
    #[serde(default = "default_finish_delay")]
    finish_delay_secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlRunner {
    #[serde(default = "default_base_speed")]
    base_speed: f32,
    #[serde(default = "default_accel")]
    accel: f32,
    #[serde(default = "default_spawn_interval")]
    spawn_interval_secs: f64,
    #[serde(default = "default_hazard_chance")]
    hazard_chance: f64,
    #[serde(default = "default_bonus_points")]
    bonus_points: u32,
    #[serde(default = "default_dodge_points")]
    dodge_points: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGrowth {
    #[serde(default = "default_growth_tick")]
    tick_interval_secs: f64,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }

fn default_session_secs() -> f64 { 60.0 }
fn default_load_secs() -> f64 { 1.5 }
fn default_score_latency() -> f64 { 0.8 }
fn default_settle_timeout() -> f64 { 5.0 }

fn default_match_points() -> u32 { 100 }
fn default_clear_bonus() -> u32 { 500 }
fn default_flip_back() -> f64 { 1.0 }
fn default_finish_delay() -> f64 { 1.0 }

fn default_base_speed() -> f32 { 1.2 }
fn default_accel() -> f32 { 0.004 }
fn default_spawn_interval() -> f64 { 1.5 }
fn default_hazard_chance() -> f64 { 0.8 }
fn default_bonus_points() -> u32 { 50 }
fn default_dodge_points() -> u32 { 10 }

fn default_growth_tick() -> f64 { 0.5 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlSession {
    fn default() -> Self {
        TomlSession {
            duration_secs: default_session_secs(),
            load_delay_secs: default_load_secs(),
            score_latency_secs: default_score_latency(),
            settle_timeout_secs: default_settle_timeout(),
        }
    }
}

impl Default for TomlMatching {
    fn default() -> Self {
        TomlMatching {
            match_points: default_match_points(),
            clear_bonus: default_clear_bonus(),
            flip_back_secs: default_flip_back(),
            finish_delay_secs: default_finish_delay(),
        }
    }
}

impl Default for TomlRunner {
    fn default() -> Self {
        TomlRunner {
            base_speed: default_base_speed(),
            accel: default_accel(),
            spawn_interval_secs: default_spawn_interval(),
            hazard_chance: default_hazard_chance(),
            bonus_points: default_bonus_points(),
            dodge_points: default_dodge_points(),
        }
    }
}

impl Default for TomlGrowth {
    fn default() -> Self {
        TomlGrowth { tick_interval_secs: default_growth_tick() }
    }
}

// ── Loading ──

impl HubConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        HubConfig {
            tick_rate_ms: t.general.tick_rate_ms,
            session: SessionConfig {
                duration: secs(t.session.duration_secs),
                load_delay: secs(t.session.load_delay_secs),
                score_latency: secs(t.session.score_latency_secs),
                settle_timeout: secs(t.session.settle_timeout_secs),
            },
            matching: MatchingConfig {
                match_points: t.matching.match_points,
                clear_bonus: t.matching.clear_bonus,
                flip_back: secs(t.matching.flip_back_secs),
                finish_delay: secs(t.matching.finish_delay_secs),
            },
            runner: RunnerConfig {
                base_speed: t.runner.base_speed,
                accel: t.runner.accel,
                spawn_interval: secs(t.runner.spawn_interval_secs),
                hazard_chance: t.runner.hazard_chance,
                bonus_points: t.runner.bonus_points,
                dodge_points: t.runner.dodge_points,
            },
            growth: GrowthConfig {
                tick_interval: secs(t.growth.tick_interval_secs),
            },
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

fn secs(s: f64) -> Duration {
    // Negative or garbage values in the file would panic in from_secs_f64.
    Duration::from_secs_f64(s.max(0.0))
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<std::path::PathBuf> {
    use std::path::PathBuf;
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/gamehall)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gamehall");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[std::path::PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.session.duration, Duration::from_secs(60));
        assert_eq!(cfg.matching.match_points, 100);
        assert_eq!(cfg.matching.clear_bonus, 500);
        assert_eq!(cfg.growth.tick_interval, Duration::from_millis(500));
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let t: TomlConfig = toml::from_str(
            "[session]\nduration_secs = 30.0\n",
        ).unwrap();
        let cfg = HubConfig::from_toml(t);
        assert_eq!(cfg.session.duration, Duration::from_secs(30));
        // untouched sections keep their defaults
        assert_eq!(cfg.session.load_delay, Duration::from_millis(1500));
        assert_eq!(cfg.runner.bonus_points, 50);
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let t: TomlConfig = toml::from_str(
            "[session]\nload_delay_secs = -3.0\n",
        ).unwrap();
        let cfg = HubConfig::from_toml(t);
        assert_eq!(cfg.session.load_delay, Duration::ZERO);
    }
}
