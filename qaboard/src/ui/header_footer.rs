//! Header and footer rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Section, View};

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.current_view {
        View::ProjectList => {
            if app.filter_query.is_empty() {
                " qaboard - Projects ".to_string()
            } else {
                format!(" qaboard - Projects /{} ", app.filter_query)
            }
        }
        View::ProjectDetail => {
            let name = app
                .current_tab()
                .map(|t| t.project_name.as_str())
                .unwrap_or("");
            format!(" qaboard - {} ", name)
        }
    };

    let mode = if app.config.offline { " offline " } else { "" };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode, Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();

    // Key hints vary per context
    let hints = if app.form.is_some() {
        "Tab/↑↓ field | Enter edit/pick | Ctrl+S submit | Esc cancel"
    } else {
        match app.current_view {
            View::ProjectList => "↑↓ move | Enter open | n new | / filter | r refresh | q quit",
            View::ProjectDetail => match app.current_tab().map(|t| t.section) {
                Some(Section::Bugs) => {
                    "↑↓ move | Space expand | n new | f fix | d delete | ←→ section | r refresh | w close tab"
                }
                Some(Section::Documents) => {
                    "↑↓ move | u upload | c set current | s save | d delete | ←→ section | r refresh"
                }
                Some(Section::Scans) => {
                    "↑↓ move | n scan | y sync status | o hand-off | ←→ section | r refresh"
                }
                Some(Section::Workflow) => {
                    "↑↓ move | n variable | x execute | y sync status | i import output | ←→ section | r refresh"
                }
                _ => "↑↓ move | Space expand | n new | d delete | ←→ section | Tab next tab | r refresh",
            },
        }
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    // Latest notice or error, if any
    if let Some(notice) = &app.store.notice {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let footer =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
