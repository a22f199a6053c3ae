//! Bug list rendering with lazily expanded fixes

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ProjectTab};

use super::components::{expand_icon, severity_color};

pub fn render_bugs(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.bugs;
    let bugs = app.filtered_bugs();

    if state.loading && bugs.is_empty() {
        f.render_widget(
            Paragraph::new("Loading bugs...")
                .block(Block::default().borders(Borders::ALL).title(" Bugs ")),
            area,
        );
        return;
    }

    if let Some(error) = &state.error {
        if bugs.is_empty() {
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                    Line::from(Span::styled(
                        "Press r to retry",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .block(Block::default().borders(Borders::ALL).title(" Bugs ")),
                area,
            );
            return;
        }
    }

    let mut lines: Vec<Line> = Vec::new();

    for (idx, bug) in bugs.iter().enumerate() {
        let expanded = tab.expanded_bugs.contains(&bug.id);
        let selected = idx == tab.selected;

        let summary_style = if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", expand_icon(expanded)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("[{}] ", bug.severity),
                Style::default().fg(severity_color(&bug.severity)),
            ),
            Span::styled(bug.summary.clone(), summary_style),
            Span::styled(
                format!("  {} · {}", bug.status, bug.created_by),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        if !expanded {
            continue;
        }

        if !bug.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", bug.description),
                Style::default().fg(Color::Gray),
            )));
        }

        // Fixes: fetched once on first expansion, cached thereafter
        if app.store.pending_fixes.contains(&bug.id) {
            lines.push(Line::from(Span::styled(
                "    fixes: loading...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(fixes) = app.store.bug_fixes.get(&bug.id) {
            if fixes.is_empty() {
                lines.push(Line::from(Span::styled(
                    "    no fixes recorded",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for fix in fixes {
                lines.push(Line::from(vec![
                    Span::styled("    ⚒ ", Style::default().fg(Color::Cyan)),
                    Span::styled(fix.fix_description.clone(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  [{}] {}", fix.fix_status, fix.fixed_by),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No bugs tracked. Press n to report one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if tab.filter.is_empty() {
        format!(" Bugs ({}) ", bugs.len())
    } else {
        format!(" Bugs ({}) /{} ", bugs.len(), tab.filter)
    };
    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((tab.scroll_offset as u16, 0));
    f.render_widget(content, area);
}
