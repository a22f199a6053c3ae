//! End-to-end normalization checks: real entity payloads through both
//! response shapes must come out deep-equal.

use qaboard_client::Envelope;
use qaboard_sdk::{Bug, Keyed, Project, Scenario, TestRun};
use serde_json::json;

fn bug_payload() -> serde_json::Value {
    json!([
        {
            "bug_id": "bug-1",
            "project_id": "proj-1",
            "summary": "login button unresponsive",
            "description": "clicking login does nothing on slow networks",
            "severity": "high",
            "status": "open",
            "created_by": "qa-1",
            "created_at": "2025-05-01T10:00:00",
            "updated_at": "2025-05-02T09:30:00"
        },
        {
            "bug_id": "bug-2",
            "project_id": "proj-1",
            "scenario_id": "scn-4",
            "summary": "report export truncates rows",
            "description": "exports cap at 1000 rows silently",
            "severity": "medium",
            "status": "in_progress"
        }
    ])
}

#[test]
fn bug_list_normalizes_identically_from_both_shapes() {
    let bare: Envelope<Vec<Bug>> = serde_json::from_value(bug_payload()).unwrap();
    let wrapped: Envelope<Vec<Bug>> = serde_json::from_value(json!({
        "status": 200,
        "message": "Success",
        "result": bug_payload()
    }))
    .unwrap();

    let bare = bare.into_list();
    let wrapped = wrapped.into_list();

    assert_eq!(bare.len(), 2);
    assert_eq!(bare.len(), wrapped.len());
    for (a, b) in bare.iter().zip(wrapped.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.severity, b.severity);
    }
    // Server-side snake_case id landed on the canonical field
    assert_eq!(bare[0].key(), "bug-1");
    assert_eq!(bare[1].scenario_id.as_deref(), Some("scn-4"));
}

#[test]
fn project_payload_with_both_id_keys_deserializes() {
    let project: Project = serde_json::from_value(json!({
        "id": "proj-1",
        "project_id": "proj-1",
        "name": "Payments revamp",
        "description": "regression suite for the new payment flow",
        "owner": "qa-team",
        "status": "active",
        "version": "2.3",
        "uploaded_documents": [
            {
                "document_id": "doc-9",
                "project_id": "proj-1",
                "filename": "requirements.pdf",
                "is_current": true
            }
        ]
    }))
    .unwrap();

    assert_eq!(project.key(), "proj-1");
    assert_eq!(project.uploaded_documents.len(), 1);
    assert!(project.uploaded_documents[0].is_current);
}

#[test]
fn workflow_scenario_output_uses_aliased_field_names() {
    // Scenario-generation workflows emit scenario_id/scenario_name instead
    // of id/name; the aliases normalize both spellings.
    let scenario: Scenario = serde_json::from_value(json!({
        "scenario_id": "scn-1",
        "project_id": "proj-1",
        "scenario_name": "Checkout happy path",
        "description": "end to end purchase",
        "priority": "High",
        "test_cases": [
            {
                "test_case_id": "tc-1",
                "scenario_id": "scn-1",
                "test_case_name": "guest checkout",
                "expected_result": "order confirmation shown",
                "status": "untested"
            }
        ]
    }))
    .unwrap();

    assert_eq!(scenario.id, "scn-1");
    assert_eq!(scenario.name, "Checkout happy path");
    assert_eq!(scenario.test_cases[0].title, "guest checkout");
}

#[test]
fn test_run_keeps_native_run_id_key() {
    let run: TestRun = serde_json::from_value(json!({
        "run_id": "run-17",
        "project_id": "proj-1",
        "scenario_id": "scn-1",
        "test_case_id": "tc-1",
        "executed_by": "qa-2",
        "executed_at": "2025-06-11T08:00:00",
        "status": "fail",
        "logs": "assertion failed at step 3",
        "version": "1.0"
    }))
    .unwrap();

    assert_eq!(run.key(), "run-17");
    assert_eq!(run.status, qaboard_sdk::RunStatus::Fail);
}
