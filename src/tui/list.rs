use crate::app::{truncate, AppState, RepoItem};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    if state.repos.is_empty() {
        let message = if state.is_loading() {
            "Loading repositories…"
        } else {
            "No repositories match the current filters"
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .centered();
        f.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (i, repo) in state
        .repos
        .iter()
        .enumerate()
        .skip(state.list_offset)
        .take(height)
    {
        lines.push(row_line(
            repo,
            i == state.cursor,
            state.selection.contains(&repo.full_name),
            area.width,
        ));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn row_line(repo: &RepoItem, is_cursor: bool, is_selected: bool, width: u16) -> Line<'static> {
    let marker = if is_cursor { "▸ " } else { "  " };
    let checkbox = if is_selected { "[✓] " } else { "[ ] " };
    let lock = if repo.private { "🔒 " } else { "" };

    let meta = format!(
        " {} ★{} {}",
        repo.language.as_deref().unwrap_or("-"),
        repo.stargazers_count,
        repo.updated_at.format("%Y-%m-%d")
    );

    // Name gets priority, description fills whatever width remains.
    let fixed = marker.width() + checkbox.width() + lock.width() + meta.width();
    let name_budget = (width as usize).saturating_sub(fixed).min(40);
    let name = truncate(&repo.full_name, name_budget);
    let desc_budget = (width as usize)
        .saturating_sub(fixed + name.width() + 2)
        .min(60);
    let description = repo
        .description
        .as_deref()
        .map(|d| truncate(d, desc_budget))
        .unwrap_or_default();

    let name_style = if is_selected {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if is_cursor {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(
            checkbox.to_string(),
            if is_selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
        Span::raw(lock.to_string()),
        Span::styled(name, name_style),
    ];
    if !description.is_empty() {
        spans.push(Span::styled(
            format!("  {description}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(meta, Style::default().fg(Color::DarkGray)));

    let line = Line::from(spans);
    if is_cursor {
        line.style(Style::default().bg(Color::Rgb(30, 30, 40)))
    } else {
        line
    }
}
