use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Processes),
        KeyCode::Char('3') => app.set_view(View::Disks),

        // Navigation (up/down for the process list, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Recording control
        KeyCode::Char('r') | KeyCode::Char(' ') => app.toggle_recording(),

        // Export the completed session
        KeyCode::Char('e') => app.request_export(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use crossterm::event::KeyEvent;

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), "report.json".into())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_q_quits() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_tab_cycles_views() {
        let mut app = app();
        assert_eq!(app.current_view, View::Overview);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Processes);
    }

    #[tokio::test]
    async fn test_r_toggles_recording() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert!(app.ingestor.recording().is_active());
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert!(!app.ingestor.recording().is_active());
    }

    #[tokio::test]
    async fn test_home_and_end_jump_selection() {
        let mut app = app();
        let payload = br#"{"processes":[
            {"pid":1,"name":"a"},
            {"pid":2,"name":"b"},
            {"pid":3,"name":"c"},
            {"pid":4,"name":"d"}
        ]}"#;
        app.ingestor.ingest(payload).unwrap();

        handle_key_event(&mut app, key(KeyCode::End));
        assert_eq!(app.selected_process_index, 3);
        handle_key_event(&mut app, key(KeyCode::Home));
        assert_eq!(app.selected_process_index, 0);
    }

    #[tokio::test]
    async fn test_any_key_closes_help() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert!(!app.show_help);
    }
}
