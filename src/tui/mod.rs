//! Rendering, split per screen region. [`layout`] and [`list_row_bounds`]
//! are the single source of screen geometry: the render pass and the mouse
//! handling both derive from them, so what is drawn is exactly what a drag
//! can hit.

pub mod confirm_overlay;
pub mod footer;
pub mod header;
pub mod list;
pub mod render;
pub mod spinner;

use crate::app::RepoItem;
use crate::select::geometry;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::collections::HashMap;

pub struct ScreenLayout {
    pub header: Rect,
    pub list: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(1),    // repo list
            Constraint::Length(2), // footer
        ])
        .split(area);
    ScreenLayout {
        header: chunks[0],
        list: chunks[1],
        footer: chunks[2],
    }
}

pub fn to_geometry(rect: Rect) -> geometry::Rect {
    geometry::Rect::new(
        f64::from(rect.x),
        f64::from(rect.y),
        f64::from(rect.x + rect.width),
        f64::from(rect.y + rect.height),
    )
}

/// Screen-space bounds of each visible repo row. One row per repository;
/// rows scrolled out of the viewport have no bounds and cannot be hit.
pub fn list_row_bounds(
    list_area: Rect,
    repos: &[RepoItem],
    list_offset: usize,
) -> HashMap<String, geometry::Rect> {
    let height = list_area.height as usize;
    repos
        .iter()
        .enumerate()
        .skip(list_offset)
        .take(height)
        .map(|(i, repo)| {
            let y = f64::from(list_area.y) + (i - list_offset) as f64;
            (
                repo.full_name.clone(),
                geometry::Rect::new(
                    f64::from(list_area.x),
                    y,
                    f64::from(list_area.x + list_area.width),
                    y + 1.0,
                ),
            )
        })
        .collect()
}
