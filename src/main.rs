/// Entry point and hub loop.

mod config;
mod hub;
mod minigame;
mod session;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use config::HubConfig;
use hub::{Hub, HubView};
use minigame::GameInput;
use session::SessionState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    // Logging is off by default so the TUI is never corrupted;
    // RUST_LOG=info (or finer) opts in.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = HubConfig::load();
    let mut hub = Hub::new(config, ChaCha8Rng::from_entropy());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = hub_loop(&mut hub, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Hub error: {e}");
    }

    println!();
    println!("Thanks for playing Game Hall!");
    println!("Coins: {}  Games played: {}", hub.profile.coins, hub.profile.games_played);
}

fn hub_loop(hub: &mut Hub, renderer: &mut Renderer) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(hub.config().tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(hub, &kb) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            // Feed the actual elapsed time, not the nominal tick rate, so
            // simulation speed is independent of render hiccups.
            let dt = last_tick.elapsed();
            hub.tick(dt);
            last_tick = Instant::now();
        }

        renderer.render(hub)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_SHARE: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Route keys by hub screen. Returns true to quit the program.
fn handle_meta(hub: &mut Hub, kb: &InputState) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.was_pressed(KeyCode::Esc);

    let session_state = hub.session.as_ref().map(|s| s.state());
    match session_state {
        // ── Game room ──
        Some(SessionState::Loading) => {
            // No input possible while assets load.
        }
        Some(SessionState::Idle) => {
            if confirm {
                hub.start_game();
            } else if esc {
                hub.close_game();
            }
        }
        Some(SessionState::Running) => {
            if kb.any_pressed(KEYS_PAUSE) || esc {
                hub.pause_game();
            } else {
                forward_game_input(hub, kb);
            }
        }
        Some(SessionState::Paused) => {
            if kb.any_pressed(KEYS_PAUSE) || confirm {
                hub.resume_game();
            } else if esc {
                hub.close_game();
            }
        }
        Some(SessionState::Settled) => {
            if confirm {
                hub.play_again();
            } else if kb.any_pressed(KEYS_SHARE) {
                hub.share_results();
            } else if esc {
                hub.close_game();
            }
        }

        // ── Lobby / profile ──
        None => {
            if kb.was_pressed(KeyCode::Tab) {
                hub.toggle_view();
                return false;
            }
            if kb.any_pressed(KEYS_QUIT) {
                return true;
            }
            match hub.view {
                HubView::Lobby => {
                    if kb.any_pressed(KEYS_UP) {
                        hub.lobby_move(-1);
                    } else if kb.any_pressed(KEYS_DOWN) {
                        hub.lobby_move(1);
                    } else if confirm {
                        hub.open_selected_game();
                    } else if esc {
                        return true;
                    }
                }
                HubView::Profile => {
                    if kb.any_pressed(KEYS_UP) {
                        hub.task_move(-1);
                    } else if kb.any_pressed(KEYS_DOWN) {
                        hub.task_move(1);
                    } else if confirm {
                        hub.collect_selected_reward();
                    } else if esc {
                        hub.view = HubView::Lobby;
                    }
                }
            }
        }
    }

    false
}

/// While a match runs, arrows and confirm go to the mounted module.
fn forward_game_input(hub: &mut Hub, kb: &InputState) {
    if kb.any_pressed(KEYS_LEFT) {
        hub.game_input(GameInput::Left);
    }
    if kb.any_pressed(KEYS_RIGHT) {
        hub.game_input(GameInput::Right);
    }
    if kb.any_pressed(KEYS_UP) {
        hub.game_input(GameInput::Up);
    }
    if kb.any_pressed(KEYS_DOWN) {
        hub.game_input(GameInput::Down);
    }
    if kb.any_pressed(KEYS_CONFIRM) {
        hub.game_input(GameInput::Activate);
    }
}
