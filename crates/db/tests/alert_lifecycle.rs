//! Integration tests for the alert lifecycle: acknowledgement guard,
//! resolution, and status reconciliation.
//!
//! Exercises the repository layer against a real database so the unique
//! constraint — not application logic — decides acknowledgement races.

use assert_matches::assert_matches;
use mainsight_core::alert::AlertDraft;
use mainsight_core::projection::MachineStatus;
use mainsight_core::severity::Severity;
use mainsight_core::types::DbId;
use mainsight_db::models::alert::{AckOutcome, ResolveOutcome};
use mainsight_db::models::machine::CreateMachine;
use mainsight_db::models::prediction::NewPrediction;
use mainsight_db::models::sensor_reading::CreateSensorReading;
use mainsight_db::repositories::{AlertRepo, MachineRepo, PredictionRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_machine(pool: &PgPool, serial: &str) {
    MachineRepo::create(
        pool,
        &CreateMachine {
            serial: serial.to_string(),
            name: format!("Turbine {serial}"),
            machine_type: "M".to_string(),
            location: "Plant 1".to_string(),
            installed_at: None,
        },
    )
    .await
    .expect("machine seed should succeed");
}

async fn seed_user(pool: &PgPool, name: &str, email: &str) -> DbId {
    UserRepo::create(pool, name, email, "not-a-real-hash", "technician")
        .await
        .expect("user seed should succeed")
        .id
}

fn nominal_reading(serial: &str) -> CreateSensorReading {
    CreateSensorReading {
        machine_serial: serial.to_string(),
        air_temperature_k: 300.1,
        process_temperature_k: 310.2,
        rotational_speed_rpm: 1540,
        torque_nm: 44.5,
        tool_wear_min: 120,
        raw_payload: None,
        reading_timestamp: None,
    }
}

/// Record a failure analysis for the machine and return the alert id.
async fn seed_alert(pool: &PgPool, serial: &str) -> String {
    let verdict = NewPrediction {
        predicted_failure: true,
        confidence: 0.85,
        failure_type: Some("HDF".to_string()),
        severity: Severity::High,
    };
    let draft =
        AlertDraft::from_prediction(serial, true, Severity::High, Some("HDF")).expect("draft");

    let record = PredictionRepo::record_analysis(
        pool,
        &nominal_reading(serial),
        &verdict,
        Some(&draft),
        MachineStatus::Critical,
        None,
    )
    .await
    .expect("analysis should record");

    record.alert.expect("failure verdict must create alert").id
}

async fn ack_row_count(pool: &PgPool, alert_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM alert_acknowledgements WHERE alert_id = $1")
        .bind(alert_id)
        .fetch_one(pool)
        .await
        .expect("count query should succeed")
}

// ---------------------------------------------------------------------------
// Acknowledgement guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn acknowledging_missing_alert_creates_nothing(pool: PgPool) {
    let user = seed_user(&pool, "Tech One", "tech1@example.com").await;

    let outcome = AlertRepo::acknowledge(&pool, "AL-SN-404-nope", user)
        .await
        .expect("query should succeed");

    assert_matches!(outcome, AckOutcome::AlertNotFound);
    assert_eq!(ack_row_count(&pool, "AL-SN-404-nope").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn acknowledgement_transitions_status_and_records_one_row(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let user = seed_user(&pool, "Tech One", "tech1@example.com").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    let outcome = AlertRepo::acknowledge(&pool, &alert_id, user)
        .await
        .expect("query should succeed");

    let ack = match outcome {
        AckOutcome::Acknowledged(ack) => ack,
        other => panic!("expected Acknowledged, got {other:?}"),
    };
    assert_eq!(ack.acknowledged_by, user);
    assert_eq!(ack.acknowledged_by_name, "Tech One");

    let detail = AlertRepo::find_detail(&pool, &alert_id)
        .await
        .expect("query should succeed")
        .expect("alert should exist");
    assert_eq!(detail.status, "acknowledged");
    assert_eq!(detail.acknowledged_by_name.as_deref(), Some("Tech One"));
    assert_eq!(ack_row_count(&pool, &alert_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_acknowledgement_reports_original_acknowledger(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let first = seed_user(&pool, "Tech One", "tech1@example.com").await;
    let second = seed_user(&pool, "Tech Two", "tech2@example.com").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    let winner = AlertRepo::acknowledge(&pool, &alert_id, first)
        .await
        .expect("query should succeed");
    assert_matches!(winner, AckOutcome::Acknowledged(_));

    let loser = AlertRepo::acknowledge(&pool, &alert_id, second)
        .await
        .expect("query should succeed");

    let existing = match loser {
        AckOutcome::AlreadyAcknowledged(existing) => existing,
        other => panic!("expected AlreadyAcknowledged, got {other:?}"),
    };
    assert_eq!(existing.acknowledged_by, first);
    assert_eq!(existing.acknowledged_by_name, "Tech One");
    assert_eq!(ack_row_count(&pool, &alert_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_acknowledgements_have_exactly_one_winner(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let tech1 = seed_user(&pool, "Tech One", "tech1@example.com").await;
    let tech2 = seed_user(&pool, "Tech Two", "tech2@example.com").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    // Race two acknowledgements on separate pool connections. The unique
    // index decides the winner; both requests must get a coherent outcome.
    let (a, b) = tokio::join!(
        AlertRepo::acknowledge(&pool, &alert_id, tech1),
        AlertRepo::acknowledge(&pool, &alert_id, tech2),
    );
    let a = a.expect("first request should not error");
    let b = b.expect("second request should not error");

    let winners = [&a, &b]
        .iter()
        .filter(|o| matches!(o, AckOutcome::Acknowledged(_)))
        .count();
    let losers = [&a, &b]
        .iter()
        .filter(|o| matches!(o, AckOutcome::AlreadyAcknowledged(_)))
        .count();
    assert_eq!(winners, 1, "exactly one request must win the race");
    assert_eq!(losers, 1, "the other must observe the winner");

    // The loser reports the same identity the winner inserted.
    let winner_id = match (&a, &b) {
        (AckOutcome::Acknowledged(ack), _) | (_, AckOutcome::Acknowledged(ack)) => {
            ack.acknowledged_by
        }
        _ => unreachable!(),
    };
    let reported = match (&a, &b) {
        (AckOutcome::AlreadyAcknowledged(ack), _) | (_, AckOutcome::AlreadyAcknowledged(ack)) => {
            ack.acknowledged_by
        }
        _ => unreachable!(),
    };
    assert_eq!(winner_id, reported);
    assert_eq!(ack_row_count(&pool, &alert_id).await, 1);
}

// ---------------------------------------------------------------------------
// Status reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_stored_status_is_reconciled_on_read(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let user = seed_user(&pool, "Tech One", "tech1@example.com").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    AlertRepo::acknowledge(&pool, &alert_id, user)
        .await
        .expect("query should succeed");

    // Simulate the inconsistent state where the acknowledgement landed but
    // the status update was lost: the read must still derive
    // 'acknowledged' from the acknowledgement row.
    sqlx::query("UPDATE alerts SET status = 'open' WHERE id = $1")
        .bind(&alert_id)
        .execute(&pool)
        .await
        .expect("manual update should succeed");

    let detail = AlertRepo::find_detail(&pool, &alert_id)
        .await
        .expect("query should succeed")
        .expect("alert should exist");
    assert_eq!(detail.status, "acknowledged");
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolving_open_alert_bypasses_acknowledgement(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    let outcome = AlertRepo::resolve(&pool, &alert_id)
        .await
        .expect("query should succeed");

    let machine_status = match outcome {
        ResolveOutcome::Resolved { machine_status } => machine_status,
        other => panic!("expected Resolved, got {other:?}"),
    };
    // No unresolved alerts remain, so the projection returns to normal.
    assert_eq!(machine_status, "normal");

    let machine = MachineRepo::find_by_serial(&pool, "SN-001")
        .await
        .expect("query should succeed")
        .expect("machine should exist");
    assert_eq!(machine.status, "normal");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolution_is_terminal(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let alert_id = seed_alert(&pool, "SN-001").await;

    let first = AlertRepo::resolve(&pool, &alert_id)
        .await
        .expect("query should succeed");
    assert_matches!(first, ResolveOutcome::Resolved { .. });

    let second = AlertRepo::resolve(&pool, &alert_id)
        .await
        .expect("query should succeed");
    assert_matches!(second, ResolveOutcome::AlreadyResolved);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolving_one_of_two_alerts_keeps_machine_degraded(pool: PgPool) {
    seed_machine(&pool, "SN-001").await;
    let first = seed_alert(&pool, "SN-001").await;
    let _second = seed_alert(&pool, "SN-001").await;

    let outcome = AlertRepo::resolve(&pool, &first)
        .await
        .expect("query should succeed");

    // A high-severity alert is still unresolved.
    assert_matches!(
        outcome,
        ResolveOutcome::Resolved { ref machine_status } if machine_status == "critical"
    );
}
