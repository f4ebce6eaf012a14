mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn correct_answer_clears_and_decorates_the_title() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    let (status, json) = common::submit(&app.router, &session_id, "q2_pattern", "162").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correct"], true);
    assert_eq!(json["is_clear"], true);
    assert_eq!(json["state_changed"], true);
    assert_eq!(json["attempts_used"], 1);

    // Re-fetched view reflects the transition.
    let (status, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q2_pattern", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "cleared");
    assert!(view["notice"].as_str().is_some());
    assert!(view["title"].as_str().unwrap().starts_with("✅ "));

    // Exactly one durable row was appended.
    assert_eq!(app.store.row_count(), 1);
    let row = &app.store.rows()[0];
    assert!(row.is_clear);
    assert_eq!(row.team_id, "team-a");
    assert_eq!(row.problem_id, "q2_pattern");
    assert_eq!(row.key, "main");
}

#[tokio::test]
async fn submissions_after_a_clear_are_suppressed() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    common::submit(&app.router, &session_id, "q2_pattern", "162").await;
    let (status, json) = common::submit(&app.router, &session_id, "q2_pattern", "162").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["retryable"], false);
    // Grading was never reached: still only the one row.
    assert_eq!(app.store.row_count(), 1);
}

#[tokio::test]
async fn three_wrong_answers_lock_the_problem_for_the_session() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    for expected_remaining in [2, 1] {
        let (status, json) =
            common::submit(&app.router, &session_id, "q1_sequence", "4-3-2-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["correct"], false);
        assert_eq!(json["is_failed"], false);
        assert_eq!(json["state_changed"], false);
        assert_eq!(json["attempts_remaining"], expected_remaining);
    }

    // Third wrong answer exhausts the budget and flips failed status once.
    let (status, json) = common::submit(&app.router, &session_id, "q1_sequence", "4-3-2-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_failed"], true);
    assert_eq!(json["state_changed"], true);
    assert_eq!(json["attempts_remaining"], 0);

    // Fourth submission is rejected before grading; no fourth row.
    let (status, json) = common::submit(&app.router, &session_id, "q1_sequence", "1-3-4-2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["retryable"], false);
    assert_eq!(app.store.row_count(), 3);

    let (_, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q1_sequence", session_id),
    )
    .await;
    assert_eq!(view["phase"], "exhausted");
    assert!(view["title"].as_str().unwrap().starts_with("❌ "));
    assert!(view["notice"].as_str().is_some());
}

#[tokio::test]
async fn cleared_status_survives_into_a_new_session() {
    let app = common::create_test_app().await;

    let first = common::create_session(&app.router, "team-a").await;
    common::submit(&app.router, &first, "q3_cipher", "CASTLE").await;

    // A brand-new session for the same team reconciles the durable clear.
    let second = common::create_session(&app.router, "team-a").await;
    let (status, problems) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems", second),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cipher = problems
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "q3_cipher")
        .unwrap();
    assert!(cipher["title"].as_str().unwrap().starts_with("✅ "));

    // Another team sees nothing.
    let other = common::create_session(&app.router, "team-b").await;
    let (_, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q3_cipher", other),
    )
    .await;
    assert_eq!(view["phase"], "unattempted");
    assert_eq!(view["is_clear"], false);
}

#[tokio::test]
async fn exhaustion_does_not_survive_into_a_new_session() {
    let app = common::create_test_app().await;

    let first = common::create_session(&app.router, "team-a").await;
    for _ in 0..3 {
        common::submit(&app.router, &first, "q1_sequence", "wrong").await;
    }

    // The counter is session-scoped: the new session starts at zero even
    // though the log still holds the three failed rows.
    let second = common::create_session(&app.router, "team-a").await;
    let (_, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q1_sequence", second),
    )
    .await;
    assert_eq!(view["phase"], "unattempted");
    assert_eq!(view["is_failed"], false);
    assert_eq!(view["attempts_remaining"], 3);
    assert_eq!(app.store.row_count(), 3);

    let (status, json) = common::submit(&app.router, &second, "q1_sequence", "1-3-4-2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_clear"], true);
}

#[tokio::test]
async fn open_practice_problem_tolerates_many_attempts() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    for _ in 0..10 {
        let (status, json) = common::submit(&app.router, &session_id, "q5_open", "1439").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_failed"], false);
    }

    let (status, json) = common::submit(&app.router, &session_id, "q5_open", "1440").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_clear"], true);
    assert_eq!(json["attempts_used"], 11);
}

#[tokio::test]
async fn write_failure_is_surfaced_as_retryable() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    app.store.set_fail_writes(true);
    let (status, json) = common::submit(&app.router, &session_id, "q1_sequence", "1-3-4-2").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["retryable"], true);
    assert_eq!(app.store.row_count(), 0);

    // The log recovers; the session can still clear on a later attempt.
    app.store.set_fail_writes(false);
    let (status, json) = common::submit(&app.router, &session_id, "q1_sequence", "1-3-4-2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_clear"], true);
    // Ambiguous-write policy: the failed round still consumed an attempt.
    assert_eq!(json["attempts_used"], 2);
}

#[tokio::test]
async fn reconcile_read_failure_falls_back_to_not_cleared() {
    let app = common::create_test_app().await;

    let first = common::create_session(&app.router, "team-a").await;
    common::submit(&app.router, &first, "q2_pattern", "162").await;

    // Reads fail while a new session reconciles: it degrades to
    // not-cleared instead of erroring out.
    app.store.set_fail_reads(true);
    let second = common::create_session(&app.router, "team-a").await;
    let (status, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q2_pattern", second),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["is_clear"], false);
    assert_eq!(view["phase"], "unattempted");
    app.store.set_fail_reads(false);
}

#[tokio::test]
async fn empty_answer_is_rejected_without_consuming_an_attempt() {
    let app = common::create_test_app().await;
    let session_id = common::create_session(&app.router, "team-a").await;

    let (status, _) = common::submit(&app.router, &session_id, "q1_sequence", "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.row_count(), 0);

    let (_, view) = common::get_json(
        &app.router,
        &format!("/api/v1/sessions/{}/problems/q1_sequence", session_id),
    )
    .await;
    assert_eq!(view["attempts_used"], 0);
}
