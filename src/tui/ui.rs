use crate::tui::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

const HELP_LINES: &[(&str, &str)] = &[
    ("Enter", "print the selected name and exit"),
    ("Esc", "clear the query, or exit when empty"),
    ("Up/Down, Ctrl+K/J", "move the selection"),
    ("PgUp/PgDn, Ctrl+U/D", "move by a page"),
    ("Ctrl+G g", "jump to the first result"),
    ("Ctrl+X", "remove the selected name"),
    ("Ctrl+W", "delete the last word"),
    ("Ctrl+C", "exit"),
];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_results_list(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(f, chunks[1]);
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.query.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Find (Enter: pick, Ctrl+X: remove, F1: help, Esc: quit) "),
        );

    f.render_widget(input, area);

    if app.mode == Mode::Search {
        let width = app.query.chars().count() as u16;
        f.set_cursor_position((area.x + width + 1, area.y + 1));
    }
}

fn draw_results_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|name| ListItem::new(Line::from(highlight_match(name, &app.query))))
        .collect();

    let title = if app.results.len() < app.total {
        format!(" Names ({} of {}) ", app.results.len(), app.total)
    } else {
        format!(" Names ({}) ", app.total)
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.results.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status_message.as_str())
        .style(Style::default().fg(Color::Cyan));

    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let width = 60.min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{:<22}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
        popup,
    );
}

/// Split `text` into spans with the first occurrence of `query` highlighted
fn highlight_match<'a>(text: &'a str, query: &str) -> Vec<Span<'a>> {
    let Some(start) = (!query.is_empty()).then(|| text.find(query)).flatten() else {
        return vec![Span::raw(text)];
    };
    let end = start + query.len();
    let mut spans = Vec::new();

    if start > 0 {
        spans.push(Span::raw(&text[..start]));
    }

    spans.push(Span::styled(
        &text[start..end],
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));

    if end < text.len() {
        spans.push(Span::raw(&text[end..]));
    }

    spans
}
