//! Project detail rendering: tab bar, section routing, and the flat
//! artifact sections (test cases, test data, runs, documents)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, ProjectTab, Section};

use super::components::{case_status_span, centered_rect, run_status_span};
use super::{bug_views, scenario_views, workflow_views};

pub fn render_project_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(tab) = app.current_tab() else {
        let empty = Paragraph::new("No project open. Press Esc for the project list.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_section_bar(f, chunks[0], app, tab);

    match tab.section {
        Section::Scenarios => scenario_views::render_scenario_tree(f, chunks[1], app, tab),
        Section::TestCases => render_test_cases(f, chunks[1], app, tab),
        Section::TestData => render_test_data(f, chunks[1], app, tab),
        Section::Bugs => bug_views::render_bugs(f, chunks[1], app, tab),
        Section::Runs => render_runs(f, chunks[1], app, tab),
        Section::Workflow => workflow_views::render_workflow(f, chunks[1], app, tab),
        Section::Scans => workflow_views::render_scans(f, chunks[1], app, tab),
        Section::Documents => render_documents(f, chunks[1], app, tab),
    }
}

fn render_section_bar(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let mut spans: Vec<Span> = Vec::new();

    // Open-tab indicator first
    for (idx, open) in app.open_tabs.iter().enumerate() {
        let style = if idx == app.active_tab_idx {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}] ", open.project_name), style));
    }
    spans.push(Span::raw("  "));

    for section in Section::ALL {
        let style = if section == tab.section {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", section.title()), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn loading_or_error(loading: bool, error: &Option<String>) -> Option<Vec<Line<'static>>> {
    if loading {
        return Some(vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))]);
    }
    if let Some(error) = error {
        return Some(vec![
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
    }
    None
}

fn render_test_cases(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.test_cases;

    if let Some(lines) = loading_or_error(state.loading && state.items.is_empty(), &state.error)
    {
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Test Cases ")),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(idx, case)| {
            let selected = idx == tab.selected;
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(case.title.clone(), style.fg(Color::White)),
                Span::raw("  "),
                case_status_span(case.status),
                Span::styled(
                    format!("  {} steps", case.steps.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Test Cases ({}) ", state.items.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_test_data(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    if let Some(lines) = loading_or_error(
        app.store.test_data_loading && app.store.test_data.is_empty(),
        &app.store.test_data_error,
    ) {
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Test Data ")),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (idx, record) in app.store.test_data.iter().enumerate() {
        let selected = idx == tab.selected;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(record.name.clone(), style.fg(Color::White)),
            Span::styled(
                format!("  ({})", record.updated_at),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        if selected {
            for (key, value) in &record.values {
                lines.push(Line::from(Span::styled(
                    format!("    {} = {}", key, value),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    let title = format!(" Test Data ({}) ", app.store.test_data.len());
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_runs(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.test_runs;

    if let Some(lines) = loading_or_error(state.loading && state.items.is_empty(), &state.error)
    {
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Run History ")),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(idx, run)| {
            let selected = idx == tab.selected;
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(run.run_id.clone(), style.fg(Color::White)),
                Span::raw("  "),
                run_status_span(run.status),
                Span::styled(
                    format!("  case {}  by {}  {}", run.test_case_id, run.executed_by, run.executed_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Run History ({}) ", state.items.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_documents(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.documents;

    if let Some(lines) = loading_or_error(state.loading && state.items.is_empty(), &state.error)
    {
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Documents ")),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            let selected = idx == tab.selected;
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(doc.filename.clone(), style.fg(Color::White))];
            if doc.is_current {
                spans.push(Span::styled(
                    "  ● current",
                    Style::default().fg(Color::Green),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", doc.uploaded_at),
                Style::default().fg(Color::DarkGray),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Documents ({}) ", state.items.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

pub fn render_close_confirmation(f: &mut Frame) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);
    let dialog = Paragraph::new(vec![
        Line::from("Close this project tab?"),
        Line::from(""),
        Line::from(Span::styled(
            "y close | n keep",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(dialog, area);
}
