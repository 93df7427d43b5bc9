use std::io;
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use tally_core::{counter::SystemClock, AppConfig};
use tally_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{StatsPageWidget, StatusBarWidget},
};

pub fn run(config: AppConfig) -> Result<()> {
    // Create app state before touching the terminal so config errors print normally
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);
    let mut app = App::new(config, Rc::new(SystemClock::new()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Tally"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app, &event_handler);

    // Release observations and restore terminal on every exit path
    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    // Checked at the end of each iteration to pick the next poll rate
    let mut needs_frame = false;

    loop {
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: page + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            app.set_viewport(main_layout[0]);
            StatsPageWidget::render(frame, main_layout[0], app);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        // Use the animation frame rate while any counter is running
        let event = if needs_frame {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    let action = handle_key_event(key, app);
                    app.apply(action);
                }
                AppEvent::Resize(_, _) => {
                    // Layout is recomputed on the next draw
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }

        needs_frame = app.update();
    }
}
