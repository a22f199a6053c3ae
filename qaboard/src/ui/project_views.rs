//! Project list rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_project_list(f: &mut Frame, area: Rect, app: &App) {
    let projects = app.filtered_projects();

    if app.store.projects.loading && projects.is_empty() {
        let loading = Paragraph::new("Loading projects...")
            .block(Block::default().borders(Borders::ALL).title(" Projects "));
        f.render_widget(loading, area);
        return;
    }

    if let Some(error) = &app.store.projects.error {
        if projects.is_empty() {
            let error = Paragraph::new(vec![
                Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "Press r to retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(Block::default().borders(Borders::ALL).title(" Projects "));
            f.render_widget(error, area);
            return;
        }
    }

    let items: Vec<ListItem> = projects
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let selected = idx == app.selected;
            let style = if selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![Span::styled(project.name.clone(), style)];
            if !project.owner.is_empty() {
                spans.push(Span::styled(
                    format!("  @{}", project.owner),
                    Style::default().fg(Color::Cyan),
                ));
            }
            if !project.status.is_empty() {
                spans.push(Span::styled(
                    format!("  [{}]", project.status),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if !project.version.is_empty() {
                spans.push(Span::styled(
                    format!("  v{}", project.version),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Projects ({}) ", projects.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}
