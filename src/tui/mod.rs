pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Run the interactive viewer until the user quits.
pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer log output while the TUI owns the screen
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let events = EventHandler::new(250);

    let result = (|| -> anyhow::Result<()> {
        while !app.should_quit {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
            match events.next()? {
                Event::Key(key) => handle_key_event(&mut app, key),
                Event::Tick => app.update_flash(),
            }
        }
        Ok(())
    })();

    // Restore terminal
    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => match app.current_tab {
                app::Tab::Ranking => app.next_row(),
                app::Tab::Charts => app.next_chart(),
            },
            KeyCode::Char('k') | KeyCode::Up => match app.current_tab {
                app::Tab::Ranking => app.previous_row(),
                app::Tab::Charts => app.previous_chart(),
            },
            KeyCode::Char('l') | KeyCode::Right => app.next_chart(),
            KeyCode::Char('h') | KeyCode::Left => app.previous_chart(),

            // Tab switching
            KeyCode::Tab => app.toggle_tab(),

            // Score breakdown
            KeyCode::Enter | KeyCode::Char('b') => app.show_score_breakdown(),

            // Export
            KeyCode::Char('e') => app.export_current(),

            // Help
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => app.dismiss_popup(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_popup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::app::{InputMode, Tab};
    use super::*;
    use crate::dataset::fixtures::{dataset, vendor};
    use crate::impute::ImputationParams;
    use crate::pipeline::analyze;
    use crate::scoring::WeightTable;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        let analysis = analyze(
            dataset(vec![vendor("A", 1.0, 1.0), vendor("B", 2.0, 1.0)], false),
            &WeightTable::default(),
            &ImputationParams::default(),
        )
        .unwrap();
        App::new(analysis, 10, None, b',', ThemeColors::dark())
    }

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert!(a.should_quit);

        let mut a = app();
        handle_key_event(&mut a, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.should_quit);
    }

    #[test]
    fn test_arrows_move_chart_on_charts_tab() {
        let mut a = app();
        press(&mut a, KeyCode::Tab);
        assert_eq!(a.current_tab, Tab::Charts);
        press(&mut a, KeyCode::Down);
        assert_eq!(a.chart_index, 1);
        assert_eq!(a.table_state.selected(), Some(0));
    }

    #[test]
    fn test_help_dismissed_by_any_key() {
        let mut a = app();
        press(&mut a, KeyCode::Char('?'));
        assert_eq!(a.input_mode, InputMode::Help);
        press(&mut a, KeyCode::Char('x'));
        assert_eq!(a.input_mode, InputMode::Normal);
        assert!(!a.should_quit);
    }

    #[test]
    fn test_breakdown_navigation() {
        let mut a = app();
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.input_mode, InputMode::ScoreBreakdown);
        press(&mut a, KeyCode::Down);
        assert_eq!(a.table_state.selected(), Some(1));
        // Esc closes the popup rather than quitting
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.input_mode, InputMode::Normal);
        assert!(!a.should_quit);
    }
}
