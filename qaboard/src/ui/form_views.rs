//! Schema-driven form modal and dropdown overlay

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use qaboard_sdk::FieldType;

use crate::app::App;

use super::components::centered_rect;

fn field_type_hint(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "",
        FieldType::TextArea => " (multi-line, \\n for newline)",
        FieldType::Number { .. } => " (number)",
        FieldType::Select { .. } => " (Enter to pick)",
        FieldType::DocumentRef => " (Enter to pick a document)",
    }
}

pub fn render_form(f: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        form.metadata.description.clone(),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.field_index;
        let marker = if focused { "› " } else { "  " };

        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let required = if field.required { "*" } else { "" };
        let mut spans = vec![
            Span::raw(marker),
            Span::styled(format!("{}{}", field.label, required), label_style),
            Span::styled(
                field_type_hint(&field.field_type),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(": "),
        ];

        if focused && form.is_editing {
            spans.push(Span::styled(
                format!("{}█", form.edit_buffer),
                Style::default().fg(Color::Cyan),
            ));
        } else {
            let value = form.value(&field.name);
            if value.is_empty() {
                spans.push(Span::styled("-", Style::default().fg(Color::DarkGray)));
            } else {
                spans.push(Span::styled(
                    value.to_string(),
                    Style::default().fg(Color::Cyan),
                ));
            }
        }

        lines.push(Line::from(spans));

        if focused && !field.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", field.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let title = format!(" {} ", form.metadata.name);
    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(dialog, area);
}

pub fn render_dropdown(f: &mut Frame, app: &App) {
    let Some(dropdown) = &app.dropdown else {
        return;
    };

    let area = centered_rect(40, 40, f.area());
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = dropdown
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == dropdown.selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Span::styled(item.clone(), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Select ")
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}
