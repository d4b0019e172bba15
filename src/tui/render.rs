use crate::app::{ActiveOverlay, AppState};
use crate::input::InputMode;
use crate::select::geometry::SelectionBox;
use crate::tui::{confirm_overlay, footer, header, layout, list};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(f: &mut Frame, state: &AppState, mode: InputMode) {
    let screen = layout(f.area());

    header::render(f, screen.header, state);
    list::render(f, screen.list, state);
    footer::render(f, screen.footer, state, mode);

    // Drag selection box, drawn over the list.
    if let Some(selection_box) = state.selection.drag_box() {
        if let Some(box_area) = drag_box_area(selection_box, screen.list) {
            let box_widget = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            f.render_widget(box_widget, box_area);
        }
    }

    // Error toast
    if let Some(err) = state.error_message() {
        let area = f.area();
        if area.height > 6 && area.width >= 4 {
            let err_area = Rect {
                x: area.x + 1,
                y: area.y + area.height.saturating_sub(5),
                width: area.width.saturating_sub(2),
                height: 3,
            };
            let err_widget = Paragraph::new(err.to_owned())
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::default()
                        .title(" Error ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(err_widget, err_area);
        }
    }

    // Overlay (drawn on top of everything)
    if let ActiveOverlay::Confirm(ref overlay) = state.overlay {
        confirm_overlay::render(f, overlay);
    }
}

/// Screen rectangle for the drag box. The box is container-local; translate
/// by the list origin and clamp to the list area. Boxes thinner than one
/// cell in either direction are not drawn.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn drag_box_area(selection_box: SelectionBox, list_area: Rect) -> Option<Rect> {
    let rect = selection_box
        .normalized()
        .translated(f64::from(list_area.x), f64::from(list_area.y));

    let area_left = f64::from(list_area.x);
    let area_top = f64::from(list_area.y);
    let area_right = f64::from(list_area.x + list_area.width);
    let area_bottom = f64::from(list_area.y + list_area.height);

    let left = rect.left.max(area_left);
    let top = rect.top.max(area_top);
    let right = rect.right.min(area_right);
    let bottom = rect.bottom.min(area_bottom);
    if right - left < 1.0 || bottom - top < 1.0 {
        return None;
    }

    Some(Rect::new(
        left.floor() as u16,
        top.floor() as u16,
        (right - left).round() as u16,
        (bottom - top).round() as u16,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::geometry::Point;

    fn selection(start: (f64, f64), end: (f64, f64)) -> SelectionBox {
        SelectionBox::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
    }

    #[test]
    fn drag_box_translated_into_list_area() {
        let area = Rect::new(0, 2, 80, 20);
        let rect = drag_box_area(selection((1.0, 1.0), (11.0, 5.0)), area).unwrap();
        assert_eq!(rect.x, 1);
        assert_eq!(rect.y, 3);
        assert_eq!(rect.width, 10);
        assert_eq!(rect.height, 4);
    }

    #[test]
    fn drag_box_clamped_to_list_area() {
        let area = Rect::new(0, 2, 40, 10);
        let rect = drag_box_area(selection((30.0, 5.0), (90.0, 50.0)), area).unwrap();
        assert_eq!(rect.x + rect.width, 40);
        assert_eq!(rect.y + rect.height, 12);
    }

    #[test]
    fn hairline_box_not_drawn() {
        let area = Rect::new(0, 0, 80, 24);
        assert!(drag_box_area(selection((5.0, 5.0), (5.2, 20.0)), area).is_none());
        assert!(drag_box_area(selection((5.0, 5.0), (5.0, 5.0)), area).is_none());
    }

    #[test]
    fn reverse_drag_box_normalizes() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = drag_box_area(selection((20.0, 10.0), (5.0, 2.0)), area).unwrap();
        assert_eq!(rect.x, 5);
        assert_eq!(rect.y, 2);
        assert_eq!(rect.width, 15);
        assert_eq!(rect.height, 8);
    }
}
