//! src/main.rs
//! Terminal file manager: directory tree, shortcuts and drive mounting.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{signal, sync::Notify};
use tracing::{error, info, warn};

use tfm_core::{
    Logger,
    config::Config,
    controller::{EventLoop, ExternalStep, Flow, Input, Session},
    drives::TokioRunner,
    view::{UIRenderer, theme},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "tfm", version, about = "Terminal file manager")]
struct Args {
    /// Directory to start in (defaults to the home directory)
    path: Option<PathBuf>,

    /// Show hidden files on startup
    #[arg(long)]
    show_hidden: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `tfm_core=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(&args).await;
    if args.show_hidden {
        config.show_hidden = true;
    }

    let log_dir = Config::log_dir().context("Failed to determine log directory")?;
    let log_level = args.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let _guard = Logger::init_tracing(&log_dir, &log_level).context("Failed to initialize logging")?;

    setup_panic_handler();

    let app = App::new(args, config)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

/// Config from `--config` or the default location. A broken file is
/// reported and replaced by defaults for this run only.
async fn load_config(args: &Args) -> Config {
    let loaded = match &args.config {
        Some(path) => Config::load_from(path).await,
        None => Config::load().await,
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("tfm: {e}; using default configuration");
        Config::default()
    })
}

/// The requested directory, canonicalized, or `home` when none was given.
fn resolve_start_dir(requested: Option<&Path>, home: &Path) -> Result<PathBuf> {
    match requested {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Cannot open {}", path.display())),
        None => Ok(home.to_path_buf()),
    }
}

struct App {
    terminal: AppTerminal,
    session: Session,
    event_loop: EventLoop,
    renderer: UIRenderer,
    shutdown: Arc<Notify>,
}

impl App {
    async fn new(args: Args, config: Config) -> Result<Self> {
        let home = Config::home_dir();
        let start_dir = resolve_start_dir(args.path.as_deref(), &home)?;
        info!("Starting in {} (home {})", start_dir.display(), home.display());

        let poll_interval = config.timing.poll_interval;
        let session = Session::new(config, start_dir, home, Arc::new(TokioRunner)).await;

        theme::init_theme();
        let terminal = setup_terminal()?;

        let mut app = Self {
            terminal,
            session,
            event_loop: EventLoop::new(poll_interval),
            renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
        };
        let size = app.terminal.size().context("Failed to read terminal size")?;
        app.session.resize(size.width, size.height);
        Ok(app)
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        loop {
            self.render()?;

            let input = tokio::select! {
                () = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }
                input = self.event_loop.next_input() => input,
            };

            let flow = match input {
                Input::Key(key) => self.session.handle_key(key).await,
                Input::Mouse(mouse) => self.session.handle_mouse(mouse).await,
                Input::Resize { width, height } => {
                    self.session.resize(width, height);
                    Flow::Continue
                }
                Input::Tick => Flow::Continue,
                Input::Closed => Flow::Quit,
            };
            self.session.tick().await;

            match flow {
                Flow::Continue => {}
                Flow::Quit => {
                    info!("Quit requested");
                    break;
                }
                Flow::Suspend(step) => self.run_external(step).await?,
            }
        }

        let stats = self.renderer.stats();
        info!(
            "Rendered {} frames ({} slow), {:?} total",
            stats.frames, stats.slow, stats.total
        );
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let Self {
            terminal,
            session,
            renderer,
            ..
        } = self;
        terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, session))
            .context("Failed to draw terminal")?;
        Ok(())
    }

    /// Give the terminal to `step`, then take it back whatever the outcome.
    async fn run_external(&mut self, step: ExternalStep) -> Result<()> {
        info!("Suspending for {:?}", step);
        self.event_loop.pause();
        cleanup_terminal(&mut self.terminal)?;

        let outcome = step.run().await;
        if let Err(e) = &outcome {
            warn!("External step failed: {e}");
        }

        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture,
            Clear(ClearType::All)
        )
        .context("Failed to re-enter alternate screen")?;
        self.terminal.clear().context("Failed to clear terminal")?;
        self.event_loop.resume();

        let size = self.terminal.size().context("Failed to read terminal size")?;
        self.session.resize(size.width, size.height);
        self.session.resume(outcome);
        Ok(())
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        tokio::select! {
                            _ = sigterm.recv() => info!("Received SIGTERM"),
                            _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                        }
                    }
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {}", e);
                        if signal::ctrl_c().await.is_err() {
                            return;
                        }
                    }
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_home_without_a_path() {
        let home = tempfile::tempdir().expect("tempdir");
        let start = resolve_start_dir(None, home.path()).expect("start dir");
        assert_eq!(start, home.path());
    }

    #[test]
    fn requested_path_is_canonicalized() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(root.path().join("sub")).expect("mkdir");
        let requested = root.path().join("sub").join("..").join("sub");
        let start = resolve_start_dir(Some(&requested), Path::new("/")).expect("start dir");
        assert_eq!(start, root.path().join("sub").canonicalize().expect("canonical"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("nope");
        assert!(resolve_start_dir(Some(&missing), root.path()).is_err());
    }
}
