use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use doclist_core::{update, AppState, DocumentId, Msg};
use doclist_logging::{doclist_info, doclist_warn, LogDestination};
use log::LevelFilter;

use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::ui::input::{self, Command, HELP};
use super::ui::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
}

pub fn run_app() -> anyhow::Result<()> {
    let path = config::config_path();
    let (app_config, config_error) = match config::load_from(&path) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    doclist_logging::initialize(
        LogDestination::default_file(app_config.log_to_terminal),
        doclist_logging::level_from_env(LevelFilter::Info),
    );
    if let Some(err) = config_error {
        doclist_warn!("Ignoring config, using defaults: {}", err);
    }
    doclist_info!("Starting doclist against {}", app_config.base_url);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(app_config.engine_settings(), tx.clone())
        .context("Failed to start the document engine")?;

    spawn_input_reader(tx.clone());
    spawn_ticker(tx);

    println!("{HELP}");
    let mut app = App::new(runner);
    app.dispatch(Msg::Mounted);
    app.render();

    for event in rx {
        let keep_running = match event {
            AppEvent::Msg(msg) => {
                app.dispatch(msg);
                true
            }
            AppEvent::Command(command) => app.handle_command(command),
        };
        if !keep_running {
            break;
        }
    }

    app.runner.shutdown();
    doclist_info!("doclist stopped");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    /// Applies one message; renders on tick when something changed.
    fn dispatch(&mut self, msg: Msg) {
        let tick = matches!(msg, Msg::Tick);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if tick && self.state.consume_dirty() {
            self.render();
        }
    }

    /// Returns false once the user asked to quit.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Search(text) => self.dispatch(Msg::SearchTextChanged(text)),
            Command::Type(chars) => {
                for ch in chars.chars() {
                    let mut text = self.state.search_text().to_string();
                    text.push(ch);
                    self.dispatch(Msg::SearchTextChanged(text));
                }
            }
            Command::Delete(id) => self.dispatch(Msg::DeleteClicked {
                id: DocumentId::new(id),
            }),
            Command::Upload(path) => match input::read_selection(&path) {
                Ok(selection) => self.dispatch(Msg::FileSelected(selection)),
                Err(err) => {
                    doclist_warn!("Could not read {:?}: {}", path, err);
                    println!("could not read {}: {err}", path.display());
                }
            },
            Command::Refresh => self.render(),
            Command::Quit => {
                self.dispatch(Msg::Unmounted);
                return false;
            }
        }
        true
    }

    fn render(&mut self) {
        self.state.consume_dirty();
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", render::render(&self.state.view()));
        let _ = stdout.flush();
    }
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match input::parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(AppEvent::Command(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{err}. {HELP}"),
            }
        }
        // End of input behaves like `quit`.
        let _ = tx.send(AppEvent::Command(Command::Quit));
    });
}

fn spawn_ticker(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while tx.send(AppEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}
