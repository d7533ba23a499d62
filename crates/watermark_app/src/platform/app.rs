use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use watermark_core::{update, AppState, Msg};
use watermark_logging::{wm_info, LogDestination};

use super::config::{load_config, SERVER_URL_ENV};
use super::effects::EffectRunner;
use super::ui::input::{parse_line, Command, HELP};
use super::ui::render::render;

const LOG_FILENAME: &str = "watermark_client.log";

/// Everything the main loop reacts to.
pub(crate) enum HostEvent {
    Msg(Msg),
    /// Stdin reached end of file; no more UI events will arrive.
    InputClosed,
    Quit,
}

/// Runs the client until the user quits, or until stdin closes and every
/// outstanding request has settled.
///
/// State lives for the lifetime of the process. Requests still outstanding
/// at an explicit `quit` are abandoned, the way navigating away abandons a page.
pub fn run_app() -> anyhow::Result<()> {
    watermark_logging::initialize(
        LogDestination::Both(PathBuf::from(LOG_FILENAME)),
        LevelFilter::Info,
    );

    let cwd = std::env::current_dir().context("reading working directory")?;
    let config = load_config(&cwd).with_server_override(std::env::var(SERVER_URL_ENV).ok());
    wm_info!(
        "Starting client server_url={} output_dir={:?}",
        config.server_url,
        config.output_dir
    );

    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();
    let runner = EffectRunner::new(&config, host_tx.clone())
        .with_context(|| format!("connecting to {}", config.server_url))?;
    spawn_input_reader(host_tx);

    println!("Audio watermark client for {}. Type 'help' for commands.", config.server_url);
    let mut state = AppState::new();
    print_view(&state);

    let mut input_open = true;
    while let Ok(event) = host_rx.recv() {
        match event {
            HostEvent::Msg(msg) => {
                let (mut next, effects) = update(state, msg);
                runner.enqueue(effects);
                if next.consume_dirty() {
                    print_view(&next);
                }
                state = next;
            }
            HostEvent::InputClosed => {
                wm_info!("Input closed; waiting for outstanding requests");
                input_open = false;
            }
            HostEvent::Quit => break,
        }
        if is_drained(input_open, &state) {
            break;
        }
    }

    wm_info!("Client stopped");
    Ok(())
}

fn spawn_input_reader(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_line(&line) {
                Command::Dispatch(msgs) => {
                    if !forward(&host_tx, msgs) {
                        return;
                    }
                }
                Command::DispatchSkipping { msgs, skipped } => {
                    for reason in skipped {
                        println!("skipped {reason}");
                    }
                    if !forward(&host_tx, msgs) {
                        return;
                    }
                }
                Command::Help => println!("{HELP}"),
                Command::Invalid(reason) => println!("{reason} (type 'help')"),
                Command::Quit => {
                    let _ = host_tx.send(HostEvent::Quit);
                    return;
                }
            }
        }
        let _ = host_tx.send(HostEvent::InputClosed);
    });
}

fn forward(host_tx: &mpsc::Sender<HostEvent>, msgs: Vec<Msg>) -> bool {
    msgs.into_iter()
        .all(|msg| host_tx.send(HostEvent::Msg(msg)).is_ok())
}

/// After end of input the loop keeps running until nothing is outstanding.
fn is_drained(input_open: bool, state: &AppState) -> bool {
    !input_open && !state.has_pending_work()
}

fn print_view(state: &AppState) {
    for line in render(&state.view()) {
        println!("{line}");
    }
}
