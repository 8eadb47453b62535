use ratatui::prelude::*;
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Cell, Clear, Paragraph, Row, Table, Tabs,
};

use crate::output::format_value;
use crate::report::Bar as ChartBar;
use crate::tui::app::{App, InputMode, Tab};
use crate::tui::theme::ThemeColors;

/// Chart values are scaled by this before becoming integer bar lengths
const CHART_RESOLUTION: f64 = 1000.0;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_tab {
        Tab::Ranking => render_table(frame, chunks[2], app),
        Tab::Charts => render_charts(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = "vendor-rank";
    let mut spans = vec![Span::styled(title, Style::default().fg(theme.title_color).bold())];

    let summary = &app.analysis.summary;
    let right = match summary.mean_total {
        Some(mean) => format!("{} vendors, mean {:.3}", summary.count, mean),
        None => "no vendors".to_string(),
    };
    let padding_len = (area.width as usize).saturating_sub(title.len() + right.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right, Style::default().fg(theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.current_tab {
        Tab::Ranking => 0,
        Tab::Charts => 1,
    };

    let tabs = Tabs::new(vec!["Ranking", "Charts"])
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn score_bar(score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let filled = ((score.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let empty = width - filled;

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.score_color(score)),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }
    Line::from(spans)
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    if app.analysis.ranking.is_empty() {
        let empty_msg = Paragraph::new("No vendors in the input table")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let has_estimates = app.analysis.imputation.ran();
    let rows: Vec<Row> = app
        .analysis
        .ranked()
        .map(|ranked| {
            let total = ranked.vendor.total;
            let mut score_spans = vec![Span::styled(
                format!("{:.3} ", total),
                Style::default().fg(theme.score_color(total)),
            )];
            score_spans.extend(score_bar(total, 10, theme).spans);

            // Alternating row background (even ranks get subtle background)
            let row_style = if ranked.rank % 2 == 0 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            let mut cells = vec![
                Cell::from(format!("{}.", ranked.rank))
                    .style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(ranked.name.to_string()),
            ];
            if has_estimates {
                cells.push(Cell::from(
                    ranked.estimate.map(|v| format!("{:.2}", v)).unwrap_or_default(),
                ));
            }
            Row::new(cells).style(row_style)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(17), // Score + bar: "0.734 ███████░░░"
        Constraint::Fill(1),    // Name
    ];
    let mut header = vec!["#", "Score", "Vendor"];
    if has_estimates {
        widths.push(Constraint::Length(12));
        header.push("Est. value");
    }

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(theme.header_style).bottom_margin(1))
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn bar_chart<'a>(title: String, bars: &[ChartBar], color: Color, max: u64) -> BarChart<'a> {
    let bars: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::default()
                .value((b.value.max(0.0) * CHART_RESOLUTION).round() as u64)
                .label(Line::from(b.name.clone()))
                .text_value(format_value(b.value))
                .style(Style::default().fg(color))
        })
        .collect();

    BarChart::default()
        .block(Block::bordered().title(title))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max.max(1))
        .data(BarGroup::default().bars(&bars))
}

fn render_charts(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(series) = app.current_chart() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", series.criterion.column()),
            Style::default().fg(theme.title_color).bold(),
        ),
        Span::styled(
            format!("({}/{}, h/l to switch)", app.chart_index + 1, app.charts.len()),
            Style::default().fg(theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    if series.top.is_empty() {
        let empty = Paragraph::new("No data").alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
        return;
    }

    // Shared scale so top and bottom bars are comparable
    let max = series
        .top
        .iter()
        .chain(&series.bottom)
        .map(|b| (b.value.max(0.0) * CHART_RESOLUTION).round() as u64)
        .max()
        .unwrap_or(1);

    let top = bar_chart(
        format!(" Top {} ", series.top.len()),
        &series.top,
        theme.chart_top,
        max,
    );
    let bottom = bar_chart(
        format!(" Bottom {} ", series.bottom.len()),
        &series.bottom,
        theme.chart_bottom,
        max,
    );
    frame.render_widget(top, chunks[1]);
    frame.render_widget(bottom, chunks[2]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.current_tab {
            Tab::Ranking => &[
                ("j/k", ":nav "),
                ("Enter", ":breakdown "),
                ("e", ":export "),
                ("Tab", ":charts "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            Tab::Charts => &[
                ("h/l", ":criterion "),
                ("e", ":export "),
                ("Tab", ":ranking "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        let imputation = crate::output::format_imputation(&app.analysis.imputation);
        let first_line = imputation.lines().next().unwrap_or_default().to_string();
        spans.push(Span::styled(first_line, Style::default().fg(theme.muted)));
        spans.push(Span::raw("  "));
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let Some((name, breakdown)) = app.selected_breakdown() else {
        return;
    };

    let height = breakdown.contributions.len() as u16 + 6;
    let popup_area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(format!(" {} ", name), theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<28}{:>7}{:>8}{:>9}", "Criterion", "Score", "Weight", "Points"),
        theme.header_style,
    ))];
    for c in &breakdown.contributions {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<28}", c.criterion.column())),
            Span::styled(
                format!("{:>7.3}", c.score),
                Style::default().fg(theme.score_color(c.score)),
            ),
            Span::styled(format!("{:>8.2}", c.weight), Style::default().fg(theme.muted)),
            Span::raw(format!("{:>9.3}", c.contribution)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<43}", "Total"), Style::default().bold()),
        Span::styled(format!("{:>9.3}", breakdown.total()), Style::default().bold()),
    ]));
    lines.push(Line::from(Span::styled(
        "Esc: close | j/k: next vendor",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 14, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next vendor (next chart in Charts)"),
        ("k / Up        ", "Previous vendor"),
        ("h / l         ", "Previous / next criterion chart"),
        ("Enter / b     ", "Score breakdown"),
        ("Tab           ", "Toggle Ranking/Charts"),
        ("e             ", "Export to the -o path"),
        ("?             ", "Show/hide this help"),
        ("q / Esc       ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{dataset, vendor};
    use crate::impute::ImputationParams;
    use crate::pipeline::analyze;
    use crate::scoring::WeightTable;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let analysis = analyze(
            dataset(vec![vendor("Caro", 200.0, 5.0), vendor("Barato", 100.0, 5.0)], false),
            &WeightTable::default(),
            &ImputationParams::default(),
        )
        .unwrap();
        App::new(analysis, 10, None, b',', ThemeColors::dark())
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_ranking_tab_renders_vendors() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Ranking"));
        assert!(screen.contains("Barato"));
        assert!(screen.contains("Caro"));
    }

    #[test]
    fn test_charts_tab_renders_criterion() {
        let mut app = app();
        app.toggle_tab();
        let screen = render(&mut app);
        assert!(screen.contains("Precio"));
        assert!(screen.contains("Top 2"));
        assert!(screen.contains("Bottom 2"));
    }

    #[test]
    fn test_breakdown_popup_renders() {
        let mut app = app();
        app.show_score_breakdown();
        let screen = render(&mut app);
        assert!(screen.contains("Criterion"));
        assert!(screen.contains("Total"));
    }

    #[test]
    fn test_tiny_terminal() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
    }
}
