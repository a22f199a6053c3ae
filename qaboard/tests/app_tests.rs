//! App-level behavior: expand/collapse idempotence, lazy child fetches,
//! and session persistence.

use qaboard::app::{App, Section};
use qaboard::store::StoreMsg;
use qaboard::utils::Config;
use qaboard_sdk::{Bug, BugFix};

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        api_base: "http://127.0.0.1:59999".to_string(),
        offline: true,
        data_dir: Some(dir.path().to_path_buf()),
    }
}

fn bug(id: &str) -> Bug {
    Bug {
        id: id.to_string(),
        project_id: "proj-1".to_string(),
        scenario_id: None,
        summary: format!("summary {}", id),
        description: "details".to_string(),
        severity: "high".to_string(),
        status: "open".to_string(),
        created_by: "qa-1".to_string(),
        created_at: String::new(),
        updated_at: String::new(),
        environment: None,
    }
}

fn fix(id: &str, bug_id: &str) -> BugFix {
    BugFix {
        id: id.to_string(),
        bug_id: bug_id.to_string(),
        fix_description: "patched the null check".to_string(),
        fixed_by: "dev-1".to_string(),
        fix_status: "applied".to_string(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn expand_collapse_is_idempotent_and_fetches_children_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(test_config(&dir)).unwrap();

    app.open_project("proj-1".to_string(), "Demo".to_string());
    app.current_tab_mut().unwrap().section = Section::Bugs;
    app.store.bugs.items.push(bug("bug-1"));

    let baseline = app.current_tab().unwrap().expanded_bugs.clone();

    // First expansion flips the set and dispatches the lazy fixes fetch
    app.toggle_selected();
    assert!(app.current_tab().unwrap().expanded_bugs.contains("bug-1"));
    assert!(app.store.pending_fixes.contains("bug-1"));

    // The reply lands and is cached per bug id
    app.store.apply(StoreMsg::BugFixes {
        bug_id: "bug-1".to_string(),
        result: Ok(vec![fix("fix-1", "bug-1")]),
    });
    assert!(!app.store.pending_fixes.contains("bug-1"));
    assert_eq!(app.store.bug_fixes.get("bug-1").unwrap().len(), 1);

    // Collapse then expand again: the set returns to its prior state and
    // no new request is dispatched - the cache answers.
    app.toggle_selected();
    assert_eq!(app.current_tab().unwrap().expanded_bugs, baseline);

    app.toggle_selected();
    assert!(app.current_tab().unwrap().expanded_bugs.contains("bug-1"));
    assert!(app.store.pending_fixes.is_empty());
    assert_eq!(app.store.bug_fixes.get("bug-1").unwrap().len(), 1);
}

#[test]
fn collapse_only_toggle_never_marks_a_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(test_config(&dir)).unwrap();

    app.open_project("proj-1".to_string(), "Demo".to_string());
    app.current_tab_mut().unwrap().section = Section::Bugs;
    app.store.bugs.items.push(bug("bug-9"));
    // Already expanded (e.g. restored from a session); cache already warm
    app.current_tab_mut()
        .unwrap()
        .expanded_bugs
        .insert("bug-9".to_string());
    app.store
        .bug_fixes
        .insert("bug-9".to_string(), Vec::new());

    // Collapse: pure set flip, nothing pending afterwards
    app.toggle_selected();
    assert!(!app.current_tab().unwrap().expanded_bugs.contains("bug-9"));
    assert!(app.store.pending_fixes.is_empty());
}

#[test]
fn session_roundtrips_open_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    {
        let mut app = App::new(config.clone()).unwrap();
        app.open_project("proj-1".to_string(), "Payments".to_string());
        app.current_tab_mut().unwrap().section = Section::Bugs;
        app.current_tab_mut()
            .unwrap()
            .expanded_bugs
            .insert("bug-3".to_string());
        app.save_session();
    }

    let app = App::new(config).unwrap();
    assert_eq!(app.open_tabs.len(), 1);
    let tab = &app.open_tabs[0];
    assert_eq!(tab.project_id, "proj-1");
    assert_eq!(tab.project_name, "Payments");
    assert_eq!(tab.section, Section::Bugs);
    assert!(tab.expanded_bugs.contains("bug-3"));
}

#[test]
fn notices_flow_through_the_channel_on_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(test_config(&dir)).unwrap();

    app.store
        .sender()
        .send(StoreMsg::Notice("Imported 3 bugs".to_string()))
        .unwrap();

    app.tick();
    assert_eq!(app.store.notice.as_deref(), Some("Imported 3 bugs"));
}
