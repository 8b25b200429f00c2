//! Processes view: top processes by CPU, selectable.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Row, Table, TableState};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Processes ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(snapshot) = app.ingestor.latest() else {
        frame.render_widget(block, area);
        return;
    };

    let rows: Vec<Row> = snapshot
        .processes
        .iter()
        .map(|p| {
            Row::new(vec![
                format!("{}", p.pid),
                p.name.clone(),
                format!("{:.1}", p.cpu_percent),
                format!("{:.1}", p.memory_percent),
                p.status.clone(),
            ])
            .style(app.theme.load_style(p.cpu_percent))
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["PID", "Name", "CPU%", "Mem%", "Status"]).style(app.theme.header))
        .row_highlight_style(app.theme.selected)
        .block(block);

    let mut state = TableState::default();
    if !snapshot.processes.is_empty() {
        state.select(Some(app.selected_process_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
