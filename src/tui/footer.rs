use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::input::InputMode;

pub fn render(f: &mut Frame, area: Rect, state: &AppState, mode: InputMode) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    // Search entry takes over the whole footer line.
    if let Some(buffer) = &state.search_input {
        let line = Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Yellow)),
            Span::styled(buffer.clone(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);
        let footer = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(footer, area);
        return;
    }

    let hints: &[(&str, &str)] = if mode == InputMode::Confirm {
        &[("y", "confirm"), ("n", "cancel")]
    } else if narrow {
        &[
            ("j/k", "nav"),
            ("spc", "sel"),
            ("d/D", "del"),
            ("/", "find"),
            ("q", "quit"),
        ]
    } else {
        &[
            ("↑↓/jk", "navigate"),
            ("←→/hl", "page"),
            ("space", "select"),
            ("a", "all"),
            ("shift+drag", "box select"),
            ("d/D", "delete"),
            ("/", "search"),
            ("s/f/v/p", "sort/filter"),
            ("r", "refresh"),
            ("q", "quit"),
        ]
    };

    let line = if let Some(notif) = state.notifications.last() {
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(Color::Yellow)),
            Span::styled(notif.message.clone(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        if !state.selection.is_empty() {
            spans.push(Span::styled(
                format!("{} selected ", state.selection.len()),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        }
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if !narrow {
            spans.push(Span::styled(
                format!("  [{}]", state.filters.summary()),
                Style::default().fg(Color::Magenta),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
