//! Shared rendering helpers

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
};

use qaboard_sdk::{CaseStatus, ExecutionStatus, RunStatus};

/// Center a rect of the given percentage size inside `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn case_status_span(status: CaseStatus) -> Span<'static> {
    match status {
        CaseStatus::Untested => Span::styled("○ untested", Style::default().fg(Color::Gray)),
        CaseStatus::Passed => Span::styled("✓ passed", Style::default().fg(Color::Green)),
        CaseStatus::Failed => Span::styled("✗ failed", Style::default().fg(Color::Red)),
    }
}

pub fn run_status_span(status: RunStatus) -> Span<'static> {
    match status {
        RunStatus::Pass => Span::styled("✓ pass", Style::default().fg(Color::Green)),
        RunStatus::Fail => Span::styled("✗ fail", Style::default().fg(Color::Red)),
        RunStatus::Skipped => Span::styled("- skipped", Style::default().fg(Color::Yellow)),
    }
}

pub fn execution_status_span(status: ExecutionStatus) -> Span<'static> {
    match status {
        ExecutionStatus::Pending => Span::styled("○ pending", Style::default().fg(Color::Gray)),
        ExecutionStatus::Running => Span::styled("▶ running", Style::default().fg(Color::Yellow)),
        ExecutionStatus::Completed => {
            Span::styled("✓ completed", Style::default().fg(Color::Green))
        }
        ExecutionStatus::Failed => Span::styled("✗ failed", Style::default().fg(Color::Red)),
    }
}

/// Severity → color used by the bug list
pub fn severity_color(severity: &str) -> Color {
    match severity {
        "critical" => Color::Magenta,
        "high" => Color::Red,
        "medium" => Color::Yellow,
        _ => Color::Gray,
    }
}

pub fn expand_icon(expanded: bool) -> &'static str {
    if expanded {
        "▼"
    } else {
        "▶"
    }
}
