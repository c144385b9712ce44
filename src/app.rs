use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::config::{AppConfig, default_base_dir, load_or_init};
use crate::form::{Action, ClipboardSink, Dialog, Feedback, FormController};
use crate::logging::init_logging;
use crate::models::FormState;
use crate::storage::CredentialStore;
use crate::ui::{Focus, SystemClipboard, ViewState, draw};

const STATUS_MESSAGE_SECS: u64 = 3;
const NAV_HINT: &str =
    "Tab/↑/↓ move | Enter select | ^G generate | ^F search | ^S add | ^H show/hide | Esc quit";

pub fn run() -> Result<()> {
    let base_dir = default_base_dir()?;
    let cfg = load_or_init(&base_dir)?;
    let log_path = cfg.log_path(&base_dir);
    if let Err(e) = init_logging(&log_path) {
        eprintln!("Logging disabled ({}): {e}", log_path.display());
    }

    let (mut state, mut controller) = prepare(&base_dir, &cfg);
    info!(data_file = %controller.store().path().display(), "starting");

    let result = run_tui(&mut state, &mut controller);
    state.form.zeroize();
    info!("exiting");
    result
}

/// Builds the initial form and the controller over the configured data file.
pub fn prepare(base_dir: &Path, cfg: &AppConfig) -> (AppState, FormController<SystemClipboard>) {
    let store = CredentialStore::new(cfg.data_path(base_dir));
    let controller = FormController::new(store, SystemClipboard::default());
    (AppState::new(&cfg.default_email), controller)
}

/// Everything the event loop owns between key presses.
pub struct AppState {
    pub form: FormState,
    pub focus: Focus,
    pub show_password: bool,
    pub dialog: Option<Dialog>,
    pub quit_overlay: bool,
    pub status: String,
    pub status_until: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(default_email: &str) -> Self {
        Self {
            form: FormState::with_email(default_email),
            focus: Focus::Website,
            show_password: false,
            dialog: None,
            quit_overlay: false,
            status: NAV_HINT.to_string(),
            status_until: None,
            should_quit: false,
        }
    }

    /// Shows `message` in the footer and restarts its expiry, even when the
    /// text is unchanged.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_until = Some(Instant::now() + Duration::from_secs(STATUS_MESSAGE_SECS));
    }

    /// Falls back to the key hints once the current message has expired.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(until) = self.status_until {
            if now >= until {
                self.status = NAV_HINT.to_string();
                self.status_until = None;
            }
        }
    }

    fn view(&self) -> ViewState<'_> {
        ViewState {
            form: &self.form,
            focus: self.focus,
            show_password: self.show_password,
            dialog: self.dialog.as_ref(),
            quit_overlay: self.quit_overlay,
            status: &self.status,
        }
    }
}

pub fn handle_key<C: ClipboardSink>(
    state: &mut AppState,
    key: KeyEvent,
    controller: &mut FormController<C>,
) {
    if state.dialog.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.dialog = None;
        }
        return;
    }

    if state.quit_overlay {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => state.should_quit = true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.quit_overlay = false,
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('g') | KeyCode::Char('G') => apply(state, controller, Action::Generate),
            KeyCode::Char('f') | KeyCode::Char('F') => apply(state, controller, Action::Search),
            KeyCode::Char('s') | KeyCode::Char('S') => apply(state, controller, Action::Save),
            KeyCode::Char('h') | KeyCode::Char('H') => {
                state.show_password = !state.show_password;
                state.set_status(if state.show_password {
                    "Password visibility: visible"
                } else {
                    "Password visibility: hidden"
                });
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => state.quit_overlay = true,
        KeyCode::Tab | KeyCode::Down => state.focus = state.focus.next(),
        KeyCode::BackTab | KeyCode::Up => state.focus = state.focus.prev(),
        KeyCode::Enter => match state.focus {
            Focus::Website | Focus::Search => apply(state, controller, Action::Search),
            Focus::Generate => apply(state, controller, Action::Generate),
            Focus::Add => apply(state, controller, Action::Save),
            Focus::Password => state.focus = Focus::Add,
            Focus::Email => state.focus = state.focus.next(),
        },
        KeyCode::Backspace => {
            if let Some(field) = state.focus.field_mut(&mut state.form) {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            if let Some(field) = state.focus.field_mut(&mut state.form) {
                field.push(c);
            }
        }
        _ => {}
    }
}

fn apply<C: ClipboardSink>(state: &mut AppState, controller: &mut FormController<C>, action: Action) {
    let form = std::mem::take(&mut state.form);
    let (form, feedback) = controller.dispatch(action, form);
    state.form = form;
    match feedback {
        Feedback::Status(message) => state.set_status(message),
        Feedback::Dialog(dialog) => state.dialog = Some(dialog),
    }
    if action == Action::Generate {
        state.show_password = true;
    }
    if matches!(action, Action::Save | Action::Search) && state.form.website.is_empty() {
        state.focus = Focus::Website;
    }
}

fn run_tui<C: ClipboardSink>(state: &mut AppState, controller: &mut FormController<C>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = (|| -> Result<()> {
        while !state.should_quit {
            state.expire_status(Instant::now());

            terminal.draw(|f| draw(f, &state.view()))?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press {
                        handle_key(state, key_event, controller);
                    }
                }
            }
        }
        Ok(())
    })();

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(e) = &result {
        warn!("terminal loop ended with error: {e:#}");
    }
    result
}
