//! Shared chrome: header, tabs, status bar, help overlay.

use std::time::Duration;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, View};
use crate::data::RecordingStatus;

/// Render the header bar: host identification, connection state and
/// recording status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " sysdeck ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if let Some(system) = app.ingestor.latest().and_then(|s| s.system.as_ref()) {
        spans.push(Span::raw(format!(
            "{} ({} {}) ",
            system.hostname, system.platform, system.platform_release
        )));
    }

    spans.push(Span::styled(
        format!("[{}]", app.connection_state.label()),
        app.theme.connection_style(app.connection_state),
    ));

    let recording = app.ingestor.recording();
    match recording.status() {
        RecordingStatus::Idle => {}
        RecordingStatus::Active => {
            let elapsed = recording.elapsed().unwrap_or_default();
            let remaining = recording.remaining().unwrap_or_default();
            spans.push(Span::styled(
                format!(
                    " ● {} {} (-{})",
                    recording.status().label(),
                    format_clock(elapsed),
                    format_clock(remaining)
                ),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            ));
        }
        RecordingStatus::Completed => {
            spans.push(Span::styled(
                format!(
                    " ■ recording {} ({} samples)",
                    recording.status().label(),
                    recording.buffer().len()
                ),
                Style::default().fg(app.theme.highlight),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab line.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, view) in [View::Overview, View::Processes, View::Disks].iter().enumerate() {
        let style = if *view == app.current_view {
            app.theme.tab_active
        } else {
            app.theme.tab_inactive
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.label()), style));
        spans.push(Span::raw("│"));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the bottom status bar: status message or key hints, plus the
/// source description.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = match app.get_status_message() {
        Some(msg) => Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.highlight),
        ),
        None => Span::styled(
            " q:quit  Tab:views  r:record  e:export  ?:help",
            app.theme.tab_inactive,
        ),
    };

    let right = Span::styled(format!("{} ", app.source_description()), app.theme.tab_inactive);

    let chunks =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(right.width() as u16)])
            .split(area);
    frame.render_widget(Paragraph::new(Line::from(left)), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Render the help overlay.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from("  q, Ctrl-C     quit"),
        Line::from("  Tab / 1-3     switch view"),
        Line::from("  j/k, arrows   move selection"),
        Line::from("  Home/End      jump to first/last process"),
        Line::from("  r, Space      start/stop a 5-minute recording"),
        Line::from("  e             export the completed recording"),
        Line::from("  ?             toggle this help"),
        Line::from(""),
        Line::from("  Any key closes this overlay."),
    ];

    let width = 52.min(area.width);
    let height = (text.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        ),
        popup,
    );
}

/// Format a duration as m:ss (or h:mm:ss past an hour).
pub fn format_clock(d: Duration) -> String {
    let total = d.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
