use crate::app::AppState;
use crate::tui::spinner;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        format!(" ghrm v{} ", state.config.version_string),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(user) = &state.user {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            user.login.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        let total = user.public_repos + user.total_private_repos;
        spans.push(Span::styled(
            format!(" ({total} repos)"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        format!(" page {}/{}", state.filters.page, state.total_pages),
        Style::default().fg(Color::Magenta),
    ));

    if !state.filters.search.is_empty() {
        spans.push(Span::styled(
            format!(" [\"{}\"]", state.filters.search),
            Style::default().fg(Color::Yellow),
        ));
    }

    if state.is_loading() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            spinner::frame(state.spinner_frame).to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    if state.error_message().is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}
