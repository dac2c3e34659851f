use std::sync::Arc;
use std::{io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use nowplaying::app::{Engine, EngineHandle, NowPlayingView};
use nowplaying::config::{Config, UiConfig};
use nowplaying::handlers::{handle_key_event, KeyAction, SwipeDetector};
use nowplaying::logging;
use nowplaying::remote::SpotifyClient;
use nowplaying::ui::{render_now_playing, NowPlayingState};

#[tokio::main]
async fn main() -> Result<()> {
    // Fail before touching the terminal
    let config = Config::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;
    let client = SpotifyClient::new(&config.spotify)?;

    tracing::info!("Starting nowplaying");

    let engine = Engine::new(Arc::new(client), &config.sync);
    let handle = engine.handle();
    let views = engine.subscribe();
    let engine_task = tokio::spawn(engine.run());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &handle, views, &config.ui).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    handle.shutdown();
    if let Err(e) = engine_task.await {
        tracing::error!("Sync engine task failed: {}", e);
    }

    if let Err(err) = res {
        eprintln!("{:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    engine: &EngineHandle,
    mut views: watch::Receiver<NowPlayingView>,
    ui: &UiConfig,
) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    let mut swipes = SwipeDetector::new(ui.swipe_threshold);
    let mut window_title = String::new();
    let poll_timeout = Duration::from_millis(ui.input_poll_ms.max(1));

    loop {
        let view = views.borrow_and_update().clone();

        if view.window_title != window_title {
            window_title = view.window_title.clone();
            execute!(io::stdout(), SetTitle(&window_title))?;
        }

        terminal.draw(|f| {
            let state = NowPlayingState {
                view: &view,
                show_album_art_url: ui.show_album_art_url,
            };
            render_now_playing(f, &state, f.area());
        })?;

        if event::poll(poll_timeout)? {
            match event::read()? {
                Event::Key(key) => match handle_key_event(engine, key) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Continue => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(direction) = swipes.on_mouse(mouse) {
                        engine.gesture(direction);
                    }
                }
                _ => {}
            }
        }
    }
}
