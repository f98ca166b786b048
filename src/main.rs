//! stackwm
//!
//! A stacking X11 window manager: layered stacking, transient-aware
//! minimize and raise, sloppy or click focus, virtual desktops and
//! interactive move/resize with edge snapping.

mod config;
mod shared;
mod wm;
mod x11_async;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use x11rb::protocol::Event;

use crate::config::Config;
use crate::wm::WindowManager;
use crate::wm::backend::NoHooks;
use crate::wm::events::WmEvent;
use crate::wm::groups::RuleGroups;
use crate::wm::keyboard::KeyBindings;
use crate::wm::settings::Settings;
use crate::wm::translate::EventTranslator;
use crate::wm::x11::X11Backend;

/// Housekeeping tick delivered to the core as `WmEvent::Timeout`
const TICK: Duration = Duration::from_secs(1);

const USAGE: &str = "usage: stackwm [--replace] [--debug] [--config PATH] [--print-config]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    replace: bool,
    debug: bool,
    config: Option<PathBuf>,
    print_config: bool,
    help: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replace" | "-r" => parsed.replace = true,
            "--debug" | "-d" => parsed.debug = true,
            "--print-config" => parsed.print_config = true,
            "--help" | "-h" => parsed.help = true,
            "--config" | "-c" => {
                let Some(path) = args.next() else {
                    bail!("--config needs a path\n{}", USAGE);
                };
                parsed.config = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(parsed)
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "stackwm=debug" } else { "stackwm=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Main application state
struct StackWm {
    wm: WindowManager,
    translator: EventTranslator,
    x11_stream: x11_async::X11EventStream,
}

impl StackWm {
    fn new(args: &Args, config: &Config) -> Result<Self> {
        let backend = X11Backend::connect(args.replace)?;
        let screens = backend.screen_model().context("Failed to query screens")?;
        let translator = backend.event_translator().context("Failed to read keyboard mapping")?;
        let existing = backend.existing_windows().context("Failed to list existing windows")?;
        let x11_stream = x11_async::X11EventStream::new(backend.connection())?;

        let mut wm = WindowManager::new(
            Box::new(backend),
            Box::new(NoHooks),
            Box::new(RuleGroups::new(config.groups.clone())),
            Settings::from_config(config),
            screens,
            KeyBindings::new(&config.keybindings),
        );

        info!("Managing {} existing windows", existing.len());
        for window in existing {
            wm.add_client(window, true, true);
        }
        wm.flush();

        Ok(Self {
            wm,
            translator,
            x11_stream,
        })
    }

    fn dispatch(&mut self, event: Event) {
        if let Some(event) = self.translator.translate(event) {
            debug!("Event: {:?}", event);
            self.wm.handle_event(event);
        }
    }

    /// Run until a termination signal, then hand every client back.
    async fn run(mut self) -> Result<()> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut tick = tokio::time::interval(TICK);
        tick.tick().await;

        info!("Starting main event loop");
        loop {
            self.wm.flush();

            // drain what the connection has already buffered before waiting
            match self.x11_stream.poll_next_event() {
                Ok(Some(event)) => {
                    self.dispatch(event);
                    continue;
                }
                Ok(None) => {}
                Err(e) => return Err(e).context("X11 connection lost"),
            }

            tokio::select! {
                () = self.x11_stream.wait_readable() => {}
                _ = tick.tick() => self.wm.handle_event(WmEvent::Timeout),
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }
            }
        }

        self.wm.shutdown();
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    if args.print_config {
        print!("{}", Config::default_toml()?);
        return Ok(());
    }

    init_logging(args.debug);
    info!("Starting stackwm {}", env!("CARGO_PKG_VERSION"));
    if args.replace {
        info!("--replace flag detected: will attempt to replace existing WM");
    }

    let config = Config::load(args.config.as_deref())?;
    let app = match StackWm::new(&args, &config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {:#}", e);
            return Err(e);
        }
    };
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
        let args = parse(&["--replace", "--debug", "--config", "/tmp/wm.toml"]).unwrap();
        assert!(args.replace && args.debug);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/wm.toml")));
        assert!(parse(&["--print-config"]).unwrap().print_config);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--config"]).is_err());
        let err = parse(&["--tile"]).unwrap_err();
        assert!(err.to_string().contains("--tile"));
    }
}
