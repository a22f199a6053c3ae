use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use qaboard::app::{App, FormKind, Section, View};
use qaboard::ui::ui;
use qaboard::utils::{init_tracing, Config};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::parse();
    let _log_guard = init_tracing(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and load the project catalog
    let mut app = App::new(config)?;
    app.store.fetch_projects();

    // Run main loop
    let res = run_app(&mut terminal, &mut app);

    // Persist open tabs for the next session
    app.save_session();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply completions that arrived since the last tick
        app.tick();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Close confirmation dialog
    if app.show_close_confirmation {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.close_tab_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.show_close_confirmation = false;
            }
            _ => {}
        }
        return;
    }

    // Dropdown mode
    if let Some(dropdown) = &mut app.dropdown {
        match code {
            KeyCode::Down | KeyCode::Tab => dropdown.next(),
            KeyCode::Up => dropdown.previous(),
            KeyCode::Enter => app.dropdown_select(),
            KeyCode::Esc => app.dropdown = None,
            _ => {}
        }
        return;
    }

    // Form mode
    if app.form.is_some() {
        handle_form_key(app, code, modifiers);
        return;
    }

    // List filter input
    if app.filter_active {
        match code {
            KeyCode::Char(c) => match app.current_view {
                View::ProjectList => app.filter_query.push(c),
                View::ProjectDetail => {
                    if let Some(tab) = app.current_tab_mut() {
                        tab.filter.push(c);
                        tab.selected = 0;
                    }
                }
            },
            KeyCode::Backspace => match app.current_view {
                View::ProjectList => {
                    app.filter_query.pop();
                }
                View::ProjectDetail => {
                    if let Some(tab) = app.current_tab_mut() {
                        tab.filter.pop();
                    }
                }
            },
            KeyCode::Enter | KeyCode::Esc => app.filter_active = false,
            _ => {}
        }
        return;
    }

    // Normal navigation mode
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.navigate_down(),
        KeyCode::Up | KeyCode::Char('k') => app.navigate_up(),
        KeyCode::Char('/') => {
            app.filter_active = true;
        }
        KeyCode::Char('r') | KeyCode::Char('R') => match app.current_view {
            View::ProjectList => app.store.fetch_projects(),
            View::ProjectDetail => app.refresh_section(),
        },
        KeyCode::Char('n') => app.new_item(),
        KeyCode::Enter => match app.current_view {
            View::ProjectList => app.open_selected_project(),
            View::ProjectDetail => app.toggle_selected(),
        },
        KeyCode::Esc => match app.current_view {
            View::ProjectList => app.filter_query.clear(),
            View::ProjectDetail => app.back_to_list(),
        },
        _ => {}
    }

    if app.current_view != View::ProjectDetail {
        return;
    }

    // Detail-only keys
    match code {
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_section(),
        KeyCode::Right | KeyCode::Char('l') => app.next_section(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char('w') => app.close_current_tab(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('f') => app.new_bug_fix(),
        KeyCode::Char('y') => app.sync_selected(),
        KeyCode::Char('o') => app.handoff_selected_scan(),
        KeyCode::Char('i') => app.import_selected_execution(),
        KeyCode::Char('e') => app.export_scenarios(),
        KeyCode::Char('c') => app.set_selected_document_current(),
        KeyCode::Char('s') => app.download_selected_document(),
        KeyCode::Char('u') => {
            if app.current_tab().map(|t| t.section) == Some(Section::Documents) {
                if let Some(project_id) = app.current_tab().map(|t| t.project_id.clone()) {
                    app.open_form(FormKind::UploadDocument { project_id });
                }
            }
        }
        KeyCode::Char('x') => {
            if app.current_tab().map(|t| t.section) == Some(Section::Workflow) {
                if let Some(project_id) = app.current_tab().map(|t| t.project_id.clone()) {
                    let variables = app
                        .store
                        .workflow_config
                        .as_ref()
                        .map(|c| c.variables.clone())
                        .unwrap_or_default();
                    app.store.execute_workflow(project_id, variables);
                }
            }
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let editing = app.form.as_ref().map(|f| f.is_editing).unwrap_or(false);

    if editing {
        match code {
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                app.form_save_field();
                app.submit_form();
            }
            KeyCode::Char(c) => {
                if let Some(form) = &mut app.form {
                    form.edit_buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = &mut app.form {
                    form.edit_buffer.pop();
                }
            }
            KeyCode::Enter => app.form_save_field(),
            KeyCode::Esc => app.form_cancel_editing(),
            KeyCode::Tab => app.form_show_history(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => app.submit_form(),
        KeyCode::Down | KeyCode::Tab => app.form_next_field(),
        KeyCode::Up | KeyCode::BackTab => app.form_previous_field(),
        KeyCode::Enter => app.form_start_editing(),
        KeyCode::Esc => app.close_form(),
        _ => {}
    }
}
