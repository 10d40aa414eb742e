use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output target for the terminal UI.
///
/// Switch to [`Stderr`](OutputTarget::Stderr) when stdout is piped so the
/// panel still draws on the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

fn writer(target: OutputTarget) -> Box<dyn Write + Send> {
    match target {
        OutputTarget::Stdout => Box::new(stdout()),
        OutputTarget::Stderr => Box::new(stderr()),
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     mouse_capture: true,
///     title: Some("Control panel".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Draw on the alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse clicks and drags (default: false).
    pub mouse_capture: bool,
    /// Enable bracketed paste (default: true).
    pub bracketed_paste: bool,
    /// Terminal title.
    pub title: Option<String>,
    /// Restore the terminal before the panic message prints (default: true).
    pub catch_panics: bool,
    /// Exit cleanly on Ctrl+C signals (default: true).
    pub handle_signals: bool,
    /// Append runtime debug lines to this file. The terminal itself is owned
    /// by the UI, so this is the only place diagnostics can go.
    pub log_file: Option<PathBuf>,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: false,
            bracketed_paste: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            output: OutputTarget::default(),
        }
    }
}

/// The program runtime. Owns the terminal and drives the [`Model`]
/// lifecycle on a single task.
///
/// Messages are processed strictly one at a time in arrival order; each
/// `update` runs to completion before the next message is taken, and the
/// frame is redrawn on the next frame tick after any change.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Panel>::new(flags)?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Box<dyn Write + Send>>>,
    guard: TerminalGuard,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscription_manager: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
    log_file: Option<std::fs::File>,
    started: Instant,
    processed: u64,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Returns an error if the log file cannot be opened or terminal
    /// initialization fails.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let log_file = match options.log_file {
            Some(ref path) => Some(log_to_file(path)?),
            None => None,
        };

        let (model, init_cmd) = M::init(flags);

        let guard = TerminalGuard::enter(&options)?;
        let terminal = Terminal::new(CrosstermBackend::new(writer(options.output)))?;
        let subscription_manager = SubscriptionManager::new(msg_tx.clone());

        let mut program = Self {
            model,
            terminal,
            guard,
            msg_tx,
            msg_rx,
            subscription_manager,
            options,
            needs_redraw: true,
            should_quit: false,
            log_file,
            started: Instant::now(),
            processed: 0,
        };

        program.debug_log("program initialized");
        program.execute_command(init_cmd);

        let subs = program.model.subscriptions();
        program.subscription_manager.reconcile(subs);

        Ok(program)
    }

    /// Get a sender for injecting messages from outside the event loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.msg_tx.clone()
    }

    /// Run until the model returns [`Command::quit`] or a signal arrives.
    /// Returns the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;

        let summary = format!("shutting down after {} messages", self.processed);
        self.debug_log(&summary);
        self.subscription_manager.shutdown();
        self.guard.restore()?;

        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;

        loop {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    self.debug_log("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);
                    // Drain whatever is already queued so a burst of key
                    // repeats costs one redraw.
                    while !self.should_quit {
                        match self.msg_rx.try_recv() {
                            Ok(msg) => self.process_message(msg),
                            Err(_) => break,
                        }
                    }
                    if self.should_quit {
                        return Ok(());
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.processed += 1;
        self.execute_command(cmd);

        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);

        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.debug_log("quit requested");
                self.should_quit = true;
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn debug_log(&mut self, msg: &str) {
        if let Some(ref mut f) = self.log_file {
            let _ = writeln!(f, "[{:>9.3}s] {msg}", self.started.elapsed().as_secs_f64());
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

/// Puts the terminal into UI mode and takes it back out.
///
/// [`restore`](TerminalGuard::restore) is called on the normal exit path so
/// its error can be reported; dropping the guard restores on every other path.
struct TerminalGuard {
    alt_screen: bool,
    output: OutputTarget,
    active: bool,
}

impl TerminalGuard {
    fn enter(options: &ProgramOptions) -> Result<Self, ProgramError> {
        if options.catch_panics {
            install_panic_hook(options.alt_screen, options.output);
        }

        enable_raw_mode()?;
        let guard = Self {
            alt_screen: options.alt_screen,
            output: options.output,
            active: true,
        };

        let mut w = writer(options.output);
        if options.alt_screen {
            execute!(w, EnterAlternateScreen)?;
        }
        if options.bracketed_paste {
            execute!(w, EnableBracketedPaste)?;
        }
        if options.mouse_capture {
            execute!(w, EnableMouseCapture)?;
        }
        if let Some(ref title) = options.title {
            execute!(w, SetTitle(title))?;
        }
        execute!(w, cursor::Hide)?;
        Ok(guard)
    }

    fn restore(&mut self) -> Result<(), std::io::Error> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore_terminal(self.alt_screen, self.output)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn install_panic_hook(alt_screen: bool, output: OutputTarget) {
    use std::sync::Once;
    static HOOK_INSTALLED: Once = Once::new();
    HOOK_INSTALLED.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal(alt_screen, output);
            original_hook(info);
        }));
    });
}

// Best effort: keep going after individual failures so as much terminal
// state as possible is restored; only the raw-mode error is reported.
fn restore_terminal(alt_screen: bool, output: OutputTarget) -> Result<(), std::io::Error> {
    let raw = disable_raw_mode();
    let mut w = writer(output);
    execute!(w, DisableBracketedPaste).ok();
    execute!(w, DisableMouseCapture).ok();
    execute!(w, cursor::Show).ok();
    if alt_screen {
        execute!(w, LeaveAlternateScreen).ok();
    }
    raw
}

/// Open a log file in append mode, creating it if needed.
///
/// Handy for tracing a running panel, since stdout belongs to the UI.
///
/// ```no_run
/// use panelctl_core::runtime::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("panel.log").unwrap();
/// writeln!(f, "gain = 3.0").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(!opts.mouse_capture);
        assert!(opts.log_file.is_none());
        assert_eq!(opts.output, OutputTarget::Stdout);
    }

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("panelctl-log-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "first").unwrap();
        }
        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "second").unwrap();
        }
        let mut content = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }
}
