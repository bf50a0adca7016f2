mod animator;
mod app;
mod art;
mod config;
mod keys;
mod log_buffer;
mod style;
mod ui;

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use app::App;
use archival_core::{Catalog, InputEvent, Workstation};
use art::ArtCache;
use config::Config;
use keys::Action;
use log_buffer::{LogBuffer, LogBufferLayer};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Records shown when no catalog is configured.
const SAMPLE_CATALOG: &str = include_str!("../assets/catalog.toml");
/// Directory the sample catalog's images ship in.
const SAMPLE_ART_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

fn main() -> anyhow::Result<()> {
    // Create log buffer for TUI display instead of stdout.
    let log_buffer = LogBuffer::new();

    // Also log to a file, since the terminal is taken over by the desk.
    let log_file = std::fs::File::create("archival-tui.log")?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(LogBufferLayer::new(log_buffer.clone()))
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("archival=info")),
        )
        .init();

    let config = Config::load()?;
    let (catalog, art_dir) = load_catalog(&config)?;

    let (workstation, input) = Workstation::new(catalog, &config.navigation);
    let art_cache = ArtCache::new(art_dir);
    let mut app = App::new(config, workstation, input, art_cache, log_buffer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(app.config.general.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    result
}

/// Loads the configured catalog, or the built-in sample. Also returns the directory image
/// references are resolved against.
fn load_catalog(config: &Config) -> anyhow::Result<(Catalog, PathBuf)> {
    match &config.catalog.path {
        Some(path) => {
            let catalog = Catalog::load(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            let art_dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            tracing::info!("loaded {} records from {}", catalog.len(), path.display());
            Ok((catalog, art_dir))
        }
        None => {
            let catalog =
                Catalog::from_toml_str(SAMPLE_CATALOG).context("failed to parse sample catalog")?;
            tracing::info!("no catalog configured, using the {} sample records", catalog.len());
            Ok((catalog, PathBuf::from(SAMPLE_ART_DIR)))
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if app.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, app))?;
            app.needs_redraw = false;
        }
        let term_size = terminal.size()?;
        let size = Rect::new(0, 0, term_size.width, term_size.height);

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            // Process the first event, then drain all remaining queued events. Wheel notches
            // are forwarded one by one, since the workstation does its own debouncing.
            let process_event = |evt: Event, app: &mut App| match evt {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    handle_key_event(app, &key);
                    app.needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, &mouse, size);
                    app.needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    app.needs_redraw = true;
                }
                _ => {}
            };

            process_event(event::read()?, app);
            while event::poll(Duration::ZERO)? {
                process_event(event::read()?, app);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: &event::KeyEvent) {
    if app.show_logs {
        if let Some(action) = keys::logs_action(key) {
            ui::logs::handle_key(app, action);
        }
        return;
    }

    // The lightbox swallows every key; the mapped ones close it like the exit button does.
    if app.workstation.lightbox().is_open() {
        if keys::lightbox_action(key).is_some() {
            app.send(InputEvent::ClickBackdrop);
        }
        return;
    }

    match keys::desk_action(key) {
        Some(Action::Quit) => app.should_quit = true,
        Some(Action::Navigate(key)) => app.send(InputEvent::Key(key)),
        Some(Action::Enlarge) => app.enlarge_focused(),
        Some(Action::Logs) => app.toggle_logs(),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: &MouseEvent, size: Rect) {
    let main = ui::layout::split_main(size);
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Moved => {
            app.hovered = if app.show_logs || app.workstation.lightbox().is_open() {
                None
            } else {
                ui::desk::hit_test(app, main.desk, x, y).map(|hit| hit.index)
            };
        }
        MouseEventKind::Down(MouseButton::Left) => {
            // --- Log panel (absorbs clicks; clicking outside closes it) ---
            if app.show_logs {
                if !ui::layout::contains(ui::layout::log_panel_rect(main.desk), x, y) {
                    app.toggle_logs();
                }
                return;
            }

            // --- Lightbox (on top of everything else) ---
            if app.workstation.lightbox().is_open() {
                match ui::lightbox::hit_test(app, size, x, y) {
                    ui::lightbox::LightboxHit::ExitButton | ui::lightbox::LightboxHit::Backdrop => {
                        app.send(InputEvent::ClickBackdrop);
                    }
                    ui::lightbox::LightboxHit::Image => {}
                }
                return;
            }

            // --- Desk ---
            if let Some(hit) = ui::desk::hit_test(app, main.desk, x, y) {
                app.click_card(hit);
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let direction: f32 = if mouse.kind == MouseEventKind::ScrollUp {
                -1.0
            } else {
                1.0
            };
            if app.show_logs {
                ui::logs::scroll(app, direction as isize * ui::layout::SCROLL_WHEEL_STEPS as isize);
            } else {
                app.send(InputEvent::Wheel {
                    delta_y: direction * app.config.general.wheel_notch_delta,
                });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_loads() {
        let (catalog, art_dir) = load_catalog(&Config::default()).unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(art_dir, PathBuf::from(SAMPLE_ART_DIR));
        assert!(catalog.iter().any(|r| r.is_dark()));
        for record in catalog.iter() {
            let path = art_dir.join(&record.image_ref);
            assert!(image::open(&path).is_ok(), "bad sample image {}", path.display());
        }
    }
}
