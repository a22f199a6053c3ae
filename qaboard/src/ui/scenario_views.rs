//! Scenario tree rendering: Scenario → TestCase with expand/collapse

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use qaboard_sdk::Priority;

use crate::app::{App, ProjectTab};

use super::components::{case_status_span, expand_icon, run_status_span};

fn priority_span(priority: Priority) -> Span<'static> {
    match priority {
        Priority::High => Span::styled("High", Style::default().fg(Color::Red)),
        Priority::Medium => Span::styled("Medium", Style::default().fg(Color::Yellow)),
        Priority::Low => Span::styled("Low", Style::default().fg(Color::Gray)),
    }
}

pub fn render_scenario_tree(f: &mut Frame, area: Rect, app: &App, tab: &ProjectTab) {
    let state = &app.store.scenarios;
    let scenarios = app.filtered_scenarios();

    if state.loading && scenarios.is_empty() {
        f.render_widget(
            Paragraph::new("Loading scenarios...")
                .block(Block::default().borders(Borders::ALL).title(" Scenarios ")),
            area,
        );
        return;
    }

    if let Some(error) = &state.error {
        if scenarios.is_empty() {
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                    Line::from(Span::styled(
                        "Press r to retry",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .block(Block::default().borders(Borders::ALL).title(" Scenarios ")),
                area,
            );
            return;
        }
    }

    let mut lines: Vec<Line> = Vec::new();

    for (idx, scenario) in scenarios.iter().enumerate() {
        let expanded = tab.expanded_scenarios.contains(&scenario.id);
        let is_selected = idx == tab.selected && tab.selected_case.is_none();

        let name_style = if is_selected {
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
            Span::styled(scenario.name.clone(), name_style),
            Span::raw("  "),
            priority_span(scenario.priority),
            Span::styled(
                format!("  {} cases", scenario.test_cases.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        if !expanded {
            continue;
        }

        for case in &scenario.test_cases {
            let case_expanded = tab.expanded_cases.contains(&case.id);
            let case_selected = tab.selected_case.as_deref() == Some(case.id.as_str())
                && idx == tab.selected;

            let title_style = if case_selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{} ", expand_icon(case_expanded)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(case.title.clone(), title_style),
                Span::raw("  "),
                case_status_span(case.status),
            ]));

            if !case_expanded {
                continue;
            }

            for (step_idx, step) in case.steps.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("      {}. {}", step_idx + 1, step),
                    Style::default().fg(Color::Gray),
                )));
            }
            if !case.expected_result.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("      → {}", case.expected_result),
                    Style::default().fg(Color::Cyan),
                )));
            }

            // Lazily fetched run history for this case
            if app.store.pending_case_runs.contains(&case.id) {
                lines.push(Line::from(Span::styled(
                    "      runs: loading...",
                    Style::default().fg(Color::Yellow),
                )));
            } else if let Some(runs) = app.store.case_runs.get(&case.id) {
                if runs.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "      no runs recorded",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                for run in runs.iter().take(5) {
                    let mut spans = vec![Span::raw("      "), run_status_span(run.status)];
                    spans.push(Span::styled(
                        format!("  {}  {}", run.executed_at, run.executed_by),
                        Style::default().fg(Color::DarkGray),
                    ));
                    lines.push(Line::from(spans));
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scenarios yet. Press n to create one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!(" Scenarios ({}) ", scenarios.len());
    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((tab.scroll_offset as u16, 0));
    f.render_widget(content, area);
}
