use ratatui::{
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Top bar
    let help = match app.focus {
        Focus::Input => "newsearch: Enter:search  Tab:results  Ctrl+U:clear  Ctrl+C:quit",
        Focus::List => "newsearch: j/k:move  o/Enter:open  i:image  Tab:search  q:quit",
    };
    f.render_widget(Paragraph::new(help), chunks[0]);

    // Search field
    let input_title = if app.search.is_loading() { "Search (loading…)" } else { "Search" };
    let input = Paragraph::new(app.search.query())
        .block(Block::default().borders(Borders::ALL).title(input_title).border_style(focus_style(app.focus == Focus::Input)));
    f.render_widget(input, chunks[1]);
    if app.focus == Focus::Input {
        let typed = u16::try_from(app.search.query().chars().count()).unwrap_or(u16::MAX);
        let x = chunks[1].x.saturating_add(1).saturating_add(typed);
        let max_x = chunks[1].right().saturating_sub(2);
        f.set_cursor_position(Position::new(x.min(max_x), chunks[1].y + 1));
    }

    // Main panes
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);

    // Left: result list
    let items: Vec<ListItem> = app.search.results().iter().map(|a| {
        let line = format!("{:<16} {:<16} {}", a.date_line(), truncate(a.source_line(), 15), a.title_line());
        ListItem::new(Line::from(line))
    }).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Results").border_style(focus_style(app.focus == Focus::List)))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(app.selected_article().map(|_| app.selected));
    f.render_stateful_widget(list, panes[0], &mut state);

    // Right: article preview
    let body = if let Some(a) = app.selected_article() {
        let mut text = Text::default();
        text.lines.push(Line::from(a.title_line().to_string()).style(Style::default().add_modifier(Modifier::BOLD)));
        text.lines.push(Line::from(format!("From: {}    Date: {}", a.source_line(), a.date_line())));
        text.lines.push(Line::from(format!("Link: {}", a.link().unwrap_or("-"))));
        if let Some(image) = a.image_link() {
            text.lines.push(Line::from(format!("Image: {}", image)));
        }
        text.lines.push(Line::from(""));
        text.lines.extend(Text::from(truncate(a.description_text(), 1500)).lines);
        text
    } else if app.search.is_loading() {
        Text::from("Searching…")
    } else {
        Text::from("No articles. Type a search term and press Enter.")
    };

    let preview = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title("Article"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, panes[1]);

    // Error line, then status
    let error = Paragraph::new(app.search.error()).style(Style::default().fg(Color::Red));
    f.render_widget(error, chunks[3]);
    f.render_widget(Paragraph::new(app.status.as_str()), chunks[4]);
}

fn focus_style(focused: bool) -> Style {
    if focused { Style::default().fg(Color::Cyan) } else { Style::default() }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}…", &s[..end]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Article;
    use crate::search::OverlapPolicy;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn renders_results_and_error_together() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        app.search.set_query("elections");
        let ticket = app.begin_search().unwrap();
        app.apply(
            &ticket,
            Ok(vec![Article {
                title: Some("Turnout rises".into()),
                description: Some("Polls opened early".into()),
                url: Some("http://x".into()),
                ..Default::default()
            }]),
        );
        let ticket = app.begin_search().unwrap();
        app.apply(
            &ticket,
            Err(crate::error::SearchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        );

        let screen = render(&app);
        assert!(screen.contains("elections"));
        assert!(screen.contains("Turnout rises"));
        assert!(screen.contains("Polls opened early"));
        assert!(screen.contains("Error fetching news"));
    }

    #[test]
    fn cursor_stays_inside_the_field_for_huge_queries() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        app.search.set_query("x".repeat(70_000));

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor, Position::new(98, 2));
    }

    #[test]
    fn shows_loading_marker() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        app.search.set_query("news");
        app.begin_search().unwrap();

        let screen = render(&app);
        assert!(screen.contains("Search (loading…)"));
        assert!(screen.contains("Searching…"));
    }
}
