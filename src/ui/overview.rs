//! Overview view: gauges, trend sparklines and GPU summary.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Sparkline};
use ratatui::Frame;

use crate::app::App;
use crate::data::RingHistory;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(3), // CPU gauge
        Constraint::Length(3), // Memory gauge
        Constraint::Length(5), // Network trends
        Constraint::Min(3),    // Per-core bars + GPU
    ])
    .split(area);

    render_cpu_gauge(frame, app, rows[0]);
    render_memory_gauge(frame, app, rows[1]);
    render_network(frame, app, rows[2]);

    let bottom = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);
    render_cores(frame, app, bottom[0]);
    render_gpu(frame, app, bottom[1]);
}

fn bordered(app: &App, title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_cpu_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let latest = app.ingestor.latest();
    let percent = latest.and_then(|s| s.cpu_percent());
    let freq = latest.and_then(|s| s.cpu.as_ref()).map(|c| c.frequency_mhz);

    let title = match freq {
        Some(mhz) if mhz > 0.0 => format!("CPU @ {:.0} MHz", mhz),
        _ => "CPU".to_string(),
    };

    match percent {
        Some(p) => {
            let gauge = Gauge::default()
                .block(bordered(app, &title))
                .gauge_style(app.theme.load_style(p))
                .ratio(p / 100.0)
                .label(format!("{:.1}%", p));
            frame.render_widget(gauge, area);
        }
        None => render_no_data(frame, app, area, &title),
    }
}

fn render_memory_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let memory = app.ingestor.latest().and_then(|s| s.memory.as_ref());

    match memory {
        Some(m) => {
            let gauge = Gauge::default()
                .block(bordered(app, "Memory"))
                .gauge_style(app.theme.load_style(m.virt.percent))
                .ratio(m.virt.percent / 100.0)
                .label(format!(
                    "{:.1}%  ({:.1} / {:.1} GB)",
                    m.virt.percent, m.virt.used_gb, m.virt.total_gb
                ));
            frame.render_widget(gauge, area);
        }
        None => render_no_data(frame, app, area, "Memory"),
    }
}

fn render_network(frame: &mut Frame, app: &App, area: Rect) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    let histories = app.ingestor.histories();

    render_speed_trend(frame, app, halves[0], "Upload", &histories.net_up);
    render_speed_trend(frame, app, halves[1], "Download", &histories.net_down);
}

fn render_speed_trend(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    label: &str,
    history: &RingHistory<f64>,
) {
    let title = match history.latest() {
        Some(kb) => format!("{} {}", label, format_speed(*kb)),
        None => label.to_string(),
    };

    // Sparkline wants u64 levels; scale the window against its own peak
    let data = history.sparkline(100);
    let sparkline = Sparkline::default()
        .block(bordered(app, &title))
        .style(Style::default().fg(app.theme.highlight))
        .data(&data);
    frame.render_widget(sparkline, area);
}

fn render_cores(frame: &mut Frame, app: &App, area: Rect) {
    let block = bordered(app, "Cores");
    let Some(cpu) = app.ingestor.latest().and_then(|s| s.cpu.as_ref()) else {
        frame.render_widget(block, area);
        return;
    };

    let lines: Vec<Line> = cpu
        .percent_per_core
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let filled = ((p / 100.0) * 20.0).round() as usize;
            Line::from(vec![
                Span::raw(format!("{:>3} ", i)),
                Span::styled(
                    format!("{:<20}", "▮".repeat(filled)),
                    app.theme.load_style(p),
                ),
                Span::raw(format!(" {:>5.1}%", p)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gpu(frame: &mut Frame, app: &App, area: Rect) {
    let block = bordered(app, "GPU");
    let gpu = app.ingestor.latest().and_then(|s| s.gpu.as_ref());

    let lines: Vec<Line> = match gpu {
        Some(g) if g.available && !g.gpus.is_empty() => g
            .gpus
            .iter()
            .flat_map(|info| {
                vec![
                    Line::from(Span::styled(
                        info.name.clone(),
                        app.theme.header,
                    )),
                    Line::from(vec![
                        Span::raw("  load "),
                        Span::styled(format!("{:>5.1}%", info.load), app.theme.load_style(info.load)),
                        Span::raw(format!(
                            "   mem {:>5.1}% ({:.0}/{:.0} MB)   {:.0}°C",
                            info.memory_percent, info.memory_used, info.memory_total, info.temperature
                        )),
                    ]),
                ]
            })
            .collect(),
        _ => vec![Line::from(Span::styled(
            "not available",
            app.theme.tab_inactive,
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_no_data(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled("waiting for data...", app.theme.tab_inactive))
            .block(bordered(app, title)),
        area,
    );
}

/// Format a KB/s value with an adaptive unit.
pub fn format_speed(kb: f64) -> String {
    if kb >= 1024.0 {
        format!("{:.2} MB/s", kb / 1024.0)
    } else {
        format!("{:.1} KB/s", kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_speed_units() {
        assert_eq!(format_speed(0.0), "0.0 KB/s");
        assert_eq!(format_speed(512.0), "512.0 KB/s");
        assert_eq!(format_speed(2048.0), "2.00 MB/s");
    }
}
