//! Reducer-level tests for the resource store: loading lifecycle, merge
//! policy, and fetch sequencing.

use qaboard::store::{ResourceEvent, ResourceState};
use qaboard_sdk::Bug;

fn bug(id: &str, summary: &str) -> Bug {
    Bug {
        id: id.to_string(),
        project_id: "proj-1".to_string(),
        scenario_id: None,
        summary: summary.to_string(),
        description: "details".to_string(),
        severity: "high".to_string(),
        status: "open".to_string(),
        created_by: "qa-1".to_string(),
        created_at: String::new(),
        updated_at: String::new(),
        environment: None,
    }
}

#[test]
fn fetch_sets_loading_until_resolution_success_or_failure() {
    let mut state: ResourceState<Bug> = ResourceState::new();
    assert!(!state.loading);

    let token = state.begin_fetch();
    assert!(state.loading);
    assert!(state.error.is_none());

    state.apply(ResourceEvent::Listed {
        token,
        result: Ok(vec![bug("bug-1", "a")]),
    });
    assert!(!state.loading);
    assert_eq!(state.items.len(), 1);

    // Failure path clears loading too and stores the message
    let token = state.begin_fetch();
    assert!(state.loading);
    state.apply(ResourceEvent::Listed {
        token,
        result: Err("Network Error: Unable to connect to the server. Please check your connection.".to_string()),
    });
    assert!(!state.loading);
    assert!(state.error.as_deref().unwrap().starts_with("Network Error"));
    // The previous list survives a failed refresh
    assert_eq!(state.items.len(), 1);
}

#[test]
fn created_entity_appears_exactly_once_under_server_id() {
    let mut state: ResourceState<Bug> = ResourceState::new();
    state.begin_mutation();
    state.apply(ResourceEvent::Created(Ok(bug("bug-42", "first"))));
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "bug-42");

    // A duplicate create echo replaces rather than duplicating
    state.apply(ResourceEvent::Created(Ok(bug("bug-42", "echo"))));
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].summary, "echo");
}

#[test]
fn update_replaces_by_key_and_refreshes_current() {
    let mut state: ResourceState<Bug> = ResourceState::new();
    state.apply(ResourceEvent::Created(Ok(bug("bug-1", "original"))));
    state.current = Some(bug("bug-1", "original"));

    state.apply(ResourceEvent::Updated(Ok(bug("bug-1", "patched"))));
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].summary, "patched");
    assert_eq!(state.current.as_ref().unwrap().summary, "patched");
}

#[test]
fn delete_removes_by_id_and_failed_delete_preserves_list() {
    let mut state: ResourceState<Bug> = ResourceState::new();
    state.apply(ResourceEvent::Created(Ok(bug("bug-1", "a"))));
    state.apply(ResourceEvent::Created(Ok(bug("bug-2", "b"))));

    state.begin_mutation();
    state.apply(ResourceEvent::Deleted {
        id: "bug-1".to_string(),
        result: Ok(()),
    });
    assert_eq!(state.items.len(), 1);
    assert!(state.items.iter().all(|b| b.id != "bug-1"));

    // Deleting something already gone: the 404 surfaces as an error string
    // but the list is untouched
    state.begin_mutation();
    state.apply(ResourceEvent::Deleted {
        id: "bug-1".to_string(),
        result: Err("Not Found: The requested resource was not found".to_string()),
    });
    assert_eq!(state.items.len(), 1);
    assert!(state.error.as_deref().unwrap().starts_with("Not Found"));
    assert!(!state.loading);
}

#[test]
fn only_latest_fetch_token_is_applied_regardless_of_arrival_order() {
    let mut state: ResourceState<Bug> = ResourceState::new();

    let first = state.begin_fetch();
    let second = state.begin_fetch();

    // The newer fetch resolves first
    state.apply(ResourceEvent::Listed {
        token: second,
        result: Ok(vec![bug("bug-new", "fresh")]),
    });
    assert!(!state.loading);
    assert_eq!(state.items[0].id, "bug-new");

    // The stale response arrives afterwards and must be dropped
    state.apply(ResourceEvent::Listed {
        token: first,
        result: Ok(vec![bug("bug-old", "stale")]),
    });
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "bug-new");
}

#[test]
fn stale_error_does_not_clobber_fresh_result() {
    let mut state: ResourceState<Bug> = ResourceState::new();

    let first = state.begin_fetch();
    let second = state.begin_fetch();

    state.apply(ResourceEvent::Listed {
        token: second,
        result: Ok(vec![bug("bug-1", "fresh")]),
    });
    state.apply(ResourceEvent::Listed {
        token: first,
        result: Err("Server Error: An internal server error occurred. Please try again later.".to_string()),
    });

    assert!(state.error.is_none());
    assert_eq!(state.items.len(), 1);
}
