//! Workflow configuration/executions and scan views

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use qaboard_sdk::VariableKind;

use crate::app::{App, ProjectTab};

use super::components::execution_status_span;

fn kind_label(kind: VariableKind) -> &'static str {
    match kind {
        VariableKind::SshHost => "ssh_host",
        VariableKind::SshPort => "ssh_port",
        VariableKind::Document => "document",
        VariableKind::Custom => "custom",
    }
}

pub fn render_workflow(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_config(f, chunks[0], app);
    render_executions(f, chunks[1], app, tab);
}

fn render_config(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    if app.store.config_loading {
        lines.push(Line::from(Span::styled(
            "Loading configuration...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &app.store.config_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(config) = &app.store.workflow_config {
        if config.variables.is_empty() {
            lines.push(Line::from(Span::styled(
                "No variables configured. Press n to add one.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for variable in &config.variables {
            lines.push(Line::from(vec![
                Span::styled(
                    variable.variable_name.clone(),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  [{}]", kind_label(variable.kind)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("  {} = {}", variable.key, variable.value),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "No configuration loaded.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Workflow Variables (x to execute) "),
        ),
        area,
    );
}

fn render_executions(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.executions;

    let mut items: Vec<ListItem> = Vec::new();
    for (idx, execution) in state.items.iter().enumerate() {
        let selected = idx == tab.selected;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::styled(execution.execution_id.clone(), style.fg(Color::White)),
            Span::raw("  "),
            execution_status_span(execution.status),
        ];
        if let Some(started) = &execution.started_at {
            spans.push(Span::styled(
                format!("  {}", started),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(error) = &execution.error_message {
            spans.push(Span::styled(
                format!("  {}", error),
                Style::default().fg(Color::Red),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));

        // Result payloads can be partially populated while the execution is
        // still materializing; absent fields mean "not yet available".
        if selected {
            let text = execution
                .result
                .as_ref()
                .and_then(|r| r.get("text"))
                .and_then(|t| t.as_str());
            let detail = match text {
                Some(text) => format!("    {}", text),
                None => "    output not yet available".to_string(),
            };
            items.push(ListItem::new(Line::from(Span::styled(
                detail,
                Style::default().fg(Color::Gray),
            ))));
        }
    }

    if state.loading && state.items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "Loading executions...",
            Style::default().fg(Color::Yellow),
        ))));
    } else if let Some(error) = &state.error {
        items.push(ListItem::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))));
    }

    let title = format!(" Executions ({}) - y to sync selected ", state.items.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

pub fn render_scans(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    // Repository picker summary
    let repo_line = match &tab.selected_repo {
        Some(repo) => Line::from(vec![
            Span::styled("Repository: ", Style::default().fg(Color::Gray)),
            Span::styled(repo.clone(), Style::default().fg(Color::White)),
        ]),
        None => Line::from(Span::styled(
            if app.store.repos_loading {
                "Loading repositories..."
            } else {
                "No repository selected. Press n to set up a scan."
            },
            Style::default().fg(Color::DarkGray),
        )),
    };
    let repos_known = Line::from(Span::styled(
        format!("{} repositories available", app.store.repos.len()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(vec![repo_line, repos_known])
            .block(Block::default().borders(Borders::ALL).title(" Scan Target ")),
        chunks[0],
    );

    // Submitted tasks
    let state = &app.store.codex_tasks;
    let mut items: Vec<ListItem> = Vec::new();
    for (idx, task) in state.items.iter().enumerate() {
        let selected = idx == tab.selected;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let status_color = match task.status.as_str() {
            "completed" => Color::Green,
            "failed" => Color::Red,
            "running" => Color::Yellow,
            _ => Color::Gray,
        };
        let mut spans = vec![
            Span::styled(task.task_id.clone(), style.fg(Color::White)),
            Span::styled(
                format!("  [{}]", task.status),
                Style::default().fg(status_color),
            ),
        ];
        // Tolerate partially populated tasks: the message may not exist yet
        if let Some(message) = &task.message {
            spans.push(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::Gray),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));
        if selected && !task.prompt.is_empty() {
            let prompt = if task.prompt.len() > 120 {
                format!("    {}...", &task.prompt[..120])
            } else {
                format!("    {}", task.prompt)
            };
            items.push(ListItem::new(Line::from(Span::styled(
                prompt,
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    if state.loading && state.items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "Loading scan tasks...",
            Style::default().fg(Color::Yellow),
        ))));
    } else if let Some(error) = &state.error {
        items.push(ListItem::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))));
    }

    let title = format!(" Submitted Scans ({}) ", state.items.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        chunks[1],
    );
}
