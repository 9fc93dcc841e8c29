/*!
 * Full-screen terminal front-end for converting one PDF at a time.
 *
 * Key handling and status changes live in [`ShellState`], which has no
 * terminal dependency; [`run`] owns the screen, polls keys and dispatches
 * conversions to a tokio task.
 */

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app_controller::Controller;
use crate::file_utils::FileManager;

const TITLE: &str = " PDF English → Swahili Converter ";
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Status line of the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    SelectFile,
    Ready,
    Processing,
    Done,
    Error,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::SelectFile => "Select a file",
            Status::Ready => "Ready to process",
            Status::Processing => "Processing...",
            Status::Done => "Done!",
            Status::Error => "Error",
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    None,
    Redraw,
    Process(PathBuf),
    Quit,
}

/// Screen state, driven by key presses and run results
#[derive(Debug, Clone)]
pub struct ShellState {
    selected: Option<PathBuf>,
    /// Path being typed, when the prompt is open
    prompt: Option<String>,
    status: Status,
    message: Option<String>,
    busy: bool,
    progress: (usize, usize),
    spinner_frame: usize,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            selected: None,
            prompt: None,
            status: Status::SelectFile,
            message: None,
            busy: false,
            progress: (0, 0),
            spinner_frame: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn progress(&self) -> (usize, usize) {
        self.progress
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ShellAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ShellAction::Quit;
        }

        if self.prompt.is_some() {
            return self.handle_prompt_key(key.code);
        }

        if self.busy {
            return ShellAction::None;
        }

        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let current = self
                    .selected
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(current);
                ShellAction::Redraw
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.start_processing(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ShellAction::Quit,
            _ => ShellAction::None,
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) -> ShellAction {
        let Some(input) = self.prompt.as_mut() else {
            return ShellAction::None;
        };

        match code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let path = input.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
                self.prompt = None;
                if !path.is_empty() {
                    self.selected = Some(PathBuf::from(path));
                    self.status = Status::Ready;
                    self.message = None;
                }
            }
            _ => return ShellAction::None,
        }
        ShellAction::Redraw
    }

    fn start_processing(&mut self) -> ShellAction {
        let Some(path) = self.selected.clone() else {
            self.message = Some("Please select a PDF first (press o)".to_string());
            return ShellAction::Redraw;
        };

        if !FileManager::file_exists(&path) {
            self.message = Some(format!("File not found: {}", path.display()));
            return ShellAction::Redraw;
        }

        self.busy = true;
        self.status = Status::Processing;
        self.message = None;
        self.progress = (0, 0);
        ShellAction::Process(path)
    }

    /// Record the outcome of a run
    pub fn finish(&mut self, result: Result<PathBuf, String>) {
        self.busy = false;
        match result {
            Ok(path) => {
                self.status = Status::Done;
                self.message = Some(format!("Saved: {}", path.display()));
            }
            Err(message) => {
                self.status = Status::Error;
                self.message = Some(message);
            }
        }
    }

    pub fn set_progress(&mut self, done: usize, total: usize) {
        self.progress = (done, total);
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    fn spinner(&self) -> char {
        SPINNER[self.spinner_frame]
    }
}

/// Alternate screen and raw mode, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the shell until the user quits
///
/// Needs the multi-threaded tokio runtime. Logging is silenced while the
/// shell owns the screen.
pub async fn run(controller: Controller) -> Result<()> {
    let previous_level = log::max_level();
    log::set_max_level(LevelFilter::Off);
    let result = event_loop(Arc::new(controller)).await;
    log::set_max_level(previous_level);
    result
}

async fn event_loop(controller: Arc<Controller>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut state = ShellState::new();
    let done = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<Result<PathBuf, String>>();

    loop {
        if state.is_busy() {
            state.set_progress(done.load(Ordering::SeqCst), total.load(Ordering::SeqCst));
            state.tick();
        }
        if let Ok(result) = result_rx.try_recv() {
            state.finish(result);
        }

        draw(&state)?;

        let next = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
            if event::poll(POLL_INTERVAL)? {
                Ok(Some(event::read()?))
            } else {
                Ok(None)
            }
        })?;

        let Some(Event::Key(key)) = next else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.handle_key(key) {
            ShellAction::Quit => break,
            ShellAction::Process(path) => {
                done.store(0, Ordering::SeqCst);
                total.store(0, Ordering::SeqCst);

                let controller = Arc::clone(&controller);
                let result_tx = result_tx.clone();
                let done = Arc::clone(&done);
                let total = Arc::clone(&total);
                let worker = tokio::spawn(async move {
                    controller
                        .convert_with_progress(&path, None, move |d, t| {
                            done.store(d, Ordering::SeqCst);
                            total.store(t, Ordering::SeqCst);
                        })
                        .await
                        .map_err(|e| e.to_string())
                });
                tokio::spawn(async move {
                    let _ = result_tx.send(join_conversion(worker).await);
                });
            }
            ShellAction::Redraw | ShellAction::None => {}
        }
    }

    Ok(())
}

/// Wait for a conversion task, turning a panic or cancellation into an
/// error message
async fn join_conversion(worker: JoinHandle<Result<PathBuf, String>>) -> Result<PathBuf, String> {
    match worker.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err("Conversion crashed unexpectedly".to_string()),
        Err(e) => Err(format!("Conversion stopped: {}", e)),
    }
}

fn draw(state: &ShellState) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (width, height) = terminal::size()?;

    queue!(
        stdout,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("{:^width$}", TITLE, width = width as usize)),
        ResetColor
    )?;

    let file = state
        .selected()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "No file selected".to_string());
    queue!(stdout, MoveTo(2, 2), Print(format!("File:   {}", file)))?;

    let status_color = match state.status() {
        Status::Done => Color::Green,
        Status::Error => Color::Red,
        Status::Processing => Color::Yellow,
        _ => Color::White,
    };
    queue!(
        stdout,
        MoveTo(2, 3),
        Print("Status: "),
        SetForegroundColor(status_color),
        Print(state.status().label()),
        ResetColor
    )?;

    if state.is_busy() {
        let (done, total) = state.progress();
        let detail = if total == 0 {
            "extracting".to_string()
        } else {
            format!("chunk {}/{}", done, total)
        };
        queue!(stdout, MoveTo(2, 4), Print(format!("{} {}", state.spinner(), detail)))?;
    }

    if let Some(message) = state.message() {
        queue!(stdout, MoveTo(2, 6), Print(message))?;
    }

    if let Some(input) = state.prompt() {
        queue!(
            stdout,
            MoveTo(2, 8),
            SetForegroundColor(Color::Cyan),
            Print("Select PDF: "),
            ResetColor,
            Print(input),
            Print("_")
        )?;
    }

    let help = if state.prompt().is_some() {
        "Enter confirm • Esc cancel"
    } else if state.is_busy() {
        "Working... Ctrl+C quit"
    } else {
        "o Select PDF • p Process • q Quit"
    };
    queue!(
        stdout,
        MoveTo(2, height.saturating_sub(2)),
        SetForegroundColor(Color::DarkGrey),
        Print(help),
        ResetColor
    )?;

    stdout.flush()
}
