//! Disks view: partition usage table and network I/O totals.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(area);
    render_partitions(frame, app, rows[0]);
    render_net_io(frame, app, rows[1]);
}

fn render_partitions(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Disks ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let partitions = app
        .ingestor
        .latest()
        .and_then(|s| s.disk.as_ref())
        .map(|d| d.partitions.as_slice())
        .unwrap_or_default();

    if partitions.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("no disk data", app.theme.tab_inactive)).block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = partitions
        .iter()
        .map(|p| {
            Row::new(vec![
                p.mountpoint.clone(),
                format!("{:.1}%", p.percent),
                format!("{:.1}", p.used_gb),
                format!("{:.1}", p.free_gb),
                format!("{:.1}", p.total_gb),
            ])
            .style(app.theme.load_style(p.percent))
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Mount", "Used%", "Used GB", "Free GB", "Total GB"])
                .style(app.theme.header),
        )
        .block(block);
    frame.render_widget(table, area);
}

fn render_net_io(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Network totals ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let line = match app.ingestor.latest().and_then(|s| s.network) {
        Some(net) => Line::from(format!(
            "sent {:.1} MB   received {:.1} MB",
            net.io.bytes_sent_mb, net.io.bytes_recv_mb
        )),
        None => Line::from(Span::styled("no network data", app.theme.tab_inactive)),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}
