use crate::app::App;
use fxboard_domain::QuoteRecord;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(8),
            ]
            .as_ref(),
        )
        .split(frame.area());

    draw_header(frame, outer[0], app);
    draw_quotes(frame, outer[1], app);
    draw_logs(frame, outer[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Forex Market Overview",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(updated) = app.last_updated {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        "r refresh, q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_quotes(frame: &mut Frame, area: Rect, app: &App) {
    if app.refresh.is_loading() {
        let text = format!("{} loading quotes...", app.spinner_char());
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().title("Quotes").borders(Borders::ALL)),
            area,
        );
        return;
    }

    let header = Row::new(
        ["Currency Pair", "Bid", "Ask", "Change", "% Change"]
            .into_iter()
            .map(Cell::from),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app.refresh.quotes().iter().map(quote_row);

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("Quotes").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn quote_row(quote: &QuoteRecord) -> Row<'static> {
    let change_style = if quote.is_gaining() {
        Style::default().fg(Color::Green)
    } else if quote.is_losing() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(quote.symbol.clone()),
        Cell::from(quote.bid.to_string()),
        Cell::from(quote.ask.to_string()),
        Cell::from(quote.format_change()).style(change_style),
        Cell::from(quote.format_change_percent()).style(change_style),
    ])
}

fn draw_logs(frame: &mut Frame, area: Rect, app: &App) {
    let logs = app.logs.lock().snapshot();
    let max_lines = area.height.saturating_sub(2) as usize;

    let mut visible: Vec<String> = logs.into_iter().rev().take(max_lines).collect();
    visible.reverse();

    let text: Vec<Line> = visible.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().title("Logs").borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}
