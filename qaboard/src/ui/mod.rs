//! UI rendering for the qaboard TUI
//!
//! Rendering is split per view; `ui` lays out the header/content/footer
//! frame and routes to the active view, then draws any modal overlay
//! (form, dropdown, close confirmation) on top.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, View};

mod bug_views;
mod components;
mod detail_views;
mod form_views;
mod header_footer;
mod project_views;
mod scenario_views;
mod workflow_views;

pub use components::centered_rect;
use detail_views::render_project_detail;
use form_views::{render_dropdown, render_form};
use header_footer::{render_footer, render_header};
use project_views::render_project_list;

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.current_view {
        View::ProjectList => render_project_list(f, chunks[1], app),
        View::ProjectDetail => render_project_detail(f, chunks[1], app),
    }

    render_footer(f, chunks[2], app);

    // Modal overlays
    if app.form.is_some() {
        render_form(f, app);
    }
    if app.dropdown.is_some() {
        render_dropdown(f, app);
    }
    if app.show_close_confirmation {
        detail_views::render_close_confirmation(f);
    }
}
