//! Bulk operation tests using MockSession.
//!
//! These tests drive complete multi-round operations against scripted agent
//! responses and check both the result map and the requests that were sent.
//!
//! Run with: `cargo test --features testing --test bulk_mock`

mod common;

use common::{
    if_descr, if_in_octets, if_out_octets, init_tracing, interleaved_page, page_response,
    sys_descr, sys_uptime,
};
use snmp_bulk::session::{MockSession, ResponseBuilder};
use snmp_bulk::{
    BulkEntry, BulkOptions, BulkResponses, EntryError, Error, ErrorStatus, GetBulk,
    MalformedKind, Native, Oid, Payload, Value, Version, oid,
};

// ============================================================================
// Helper functions
// ============================================================================

fn raw() -> BulkOptions {
    BulkOptions::default().return_raw(true)
}

async fn run(session: &MockSession, oids: &[Oid], options: BulkOptions) -> BulkResponses {
    init_tracing();
    GetBulk::new(session.clone(), oids.iter().cloned(), options)
        .expect("valid options")
        .run()
        .await
        .expect("bulk operation succeeds")
}

fn raw_values(responses: &BulkResponses, requested: &Oid) -> Vec<(Oid, Value)> {
    responses
        .get(requested)
        .and_then(BulkEntry::values)
        .unwrap_or_else(|| panic!("{} should have values", requested))
        .iter()
        .map(|b| {
            let value = b.value.as_raw().cloned().expect("raw payload");
            (b.oid.clone(), value)
        })
        .collect()
}

fn entry_error(responses: &BulkResponses, requested: &Oid) -> Option<EntryError> {
    responses.get(requested).and_then(BulkEntry::error)
}

fn requested_oids(session: &MockSession, round: usize) -> Vec<Oid> {
    session.requests()[round].pdu.oids().cloned().collect()
}

// ============================================================================
// Demultiplexing
// ============================================================================

#[tokio::test]
async fn test_non_repeater_then_round_robin() {
    let (a, b, c) = (sys_uptime(), if_descr(), if_in_octets());
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(0), Value::TimeTicks(1)),
        (b.child(1), Value::from("lo")),
        (c.child(1), Value::Counter32(3)),
        (b.child(2), Value::from("eth0")),
    ]));

    let responses = run(&session, &[a.clone(), b.clone(), c.clone()], raw().non_repeaters(1)).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(raw_values(&responses, &a), vec![(a.child(0), Value::TimeTicks(1))]);
    assert_eq!(
        raw_values(&responses, &b),
        vec![(b.child(1), Value::from("lo")), (b.child(2), Value::from("eth0"))]
    );
    assert_eq!(raw_values(&responses, &c), vec![(c.child(1), Value::Counter32(3))]);
    assert_eq!(session.requests().len(), 1);
}

#[tokio::test]
async fn test_full_table_page() {
    let columns = [if_descr(), if_in_octets(), if_out_octets()];
    let session = MockSession::new("public");
    session.queue_response(page_response(interleaved_page(&columns, 4)));

    let responses = run(&session, &columns, raw().max_repetitions(4)).await;

    for (position, column) in columns.iter().enumerate() {
        let expected: Vec<_> = (1..=4)
            .map(|row| (column.child(row), Value::Counter32(row * 100 + position as u32)))
            .collect();
        assert_eq!(raw_values(&responses, column), expected);
    }
}

#[tokio::test]
async fn test_short_page_is_not_continued() {
    // Three repetitions asked for; the page stops after the first column's second row.
    let (a, b) = (if_descr(), if_in_octets());
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(1), Value::from("lo")),
        (b.child(1), Value::Counter32(10)),
        (a.child(2), Value::from("eth0")),
    ]));

    let responses = run(&session, &[a.clone(), b.clone()], raw().max_repetitions(3)).await;

    assert_eq!(raw_values(&responses, &a).len(), 2);
    assert_eq!(raw_values(&responses, &b).len(), 1);
    assert_eq!(session.requests().len(), 1, "truncated repeaters are not requested again");
}

#[tokio::test]
async fn test_repeater_without_bindings_gets_empty_entry() {
    let (a, b) = (sys_uptime(), if_descr());
    let session = MockSession::new("public");
    session.queue_response(page_response([(a.child(0), Value::TimeTicks(99))]));

    let responses = run(&session, &[a.clone(), b.clone()], raw().non_repeaters(1)).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses.get(&b), Some(&BulkEntry::Values(Vec::new())));
}

#[tokio::test]
async fn test_non_repeaters_clamped_to_oid_count() {
    let (a, b) = (sys_descr(), sys_uptime());
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(0), Value::from("router")),
        (b.child(0), Value::TimeTicks(5)),
    ]));

    let responses = run(&session, &[a.clone(), b.clone()], raw().non_repeaters(5)).await;

    assert_eq!(raw_values(&responses, &a).len(), 1);
    assert_eq!(raw_values(&responses, &b).len(), 1);
    // The configured count goes on the wire unchanged.
    assert_eq!(session.requests()[0].pdu.non_repeaters, 5);
}

#[tokio::test]
async fn test_duplicate_oids_share_one_entry() {
    let a = if_descr();
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(1), Value::from("lo")),
        (a.child(1), Value::from("lo")),
    ]));

    let responses = run(&session, &[a.clone(), a.clone()], raw()).await;

    assert_eq!(responses.len(), 1);
    assert_eq!(raw_values(&responses, &a).len(), 2);
}

#[tokio::test]
async fn test_end_of_mib_view_kept_in_place() {
    let (a, b) = (if_descr(), if_in_octets());
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(1), Value::from("lo")),
        (b.child(1), Value::Counter32(1)),
        (a.child(1), Value::EndOfMibView),
        (b.child(1), Value::EndOfMibView),
    ]));

    let responses = run(&session, &[a.clone(), b.clone()], BulkOptions::default()).await;

    let bindings = responses.get(&b).and_then(BulkEntry::values).unwrap();
    assert_eq!(bindings[0].value, Payload::Native(Native::Unsigned(1)));
    assert_eq!(bindings[1].value, Payload::Raw(Value::EndOfMibView));
}

// ============================================================================
// Error isolation
// ============================================================================

#[tokio::test]
async fn test_each_round_isolates_one_error() {
    let (a, b) = (sys_descr(), sys_uptime());
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::NoSuchName, 2).build());
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::GenErr, 1).build());

    let responses = run(&session, &[a.clone(), b.clone()], raw()).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(entry_error(&responses, &a), Some(EntryError::Agent(ErrorStatus::GenErr)));
    assert_eq!(entry_error(&responses, &b), Some(EntryError::Agent(ErrorStatus::NoSuchName)));
    assert_eq!(responses.error_count(), 2);

    assert_eq!(session.requests().len(), 2);
    assert_eq!(requested_oids(&session, 0), vec![a.clone(), b]);
    assert_eq!(requested_oids(&session, 1), vec![a]);
}

#[tokio::test]
async fn test_error_then_success() {
    let (a, b, c) = (sys_descr(), if_descr(), if_in_octets());
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::NoSuchName, 1).build());
    session.queue_response(page_response(interleaved_page(&[b.clone(), c.clone()], 2)));

    let responses = run(&session, &[a.clone(), b.clone(), c.clone()], BulkOptions::default()).await;

    assert_eq!(entry_error(&responses, &a), Some(EntryError::Agent(ErrorStatus::NoSuchName)));
    let bindings = responses.get(&b).and_then(BulkEntry::values).unwrap();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].value, Payload::Native(Native::Unsigned(100)));
    assert_eq!(bindings[1].oid, b.child(2));

    let second = &session.requests()[1];
    assert_eq!(second.pdu.oids().cloned().collect::<Vec<_>>(), vec![b, c]);
    assert_ne!(second.request_id(), session.requests()[0].request_id());
}

#[tokio::test]
async fn test_non_repeater_count_applies_to_remaining_oids() {
    // Two non-repeaters; the first fails, so the resend treats both
    // remaining OIDs as non-repeaters.
    let (a, b, c) = (sys_descr(), sys_uptime(), if_descr());
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::NoSuchName, 1).build());
    session.queue_response(page_response([
        (b.child(0), Value::TimeTicks(7)),
        (c.child(1), Value::from("lo")),
    ]));

    let responses = run(&session, &[a.clone(), b.clone(), c.clone()], raw().non_repeaters(2)).await;

    assert!(responses.get(&a).unwrap().is_error());
    assert_eq!(raw_values(&responses, &b), vec![(b.child(0), Value::TimeTicks(7))]);
    assert_eq!(raw_values(&responses, &c), vec![(c.child(1), Value::from("lo"))]);
    assert_eq!(requested_oids(&session, 1), vec![b, c]);
}

#[tokio::test]
async fn test_exhausted_budget_marks_pending() {
    let (a, b, c) = (sys_descr(), sys_uptime(), if_descr());
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::TooBig, 2).build());

    let responses = run(
        &session,
        &[a.clone(), b.clone(), c.clone()],
        raw().error_retries(1),
    )
    .await;

    assert_eq!(entry_error(&responses, &b), Some(EntryError::Agent(ErrorStatus::TooBig)));
    assert_eq!(entry_error(&responses, &a), Some(EntryError::RetriesExhausted));
    assert_eq!(entry_error(&responses, &c), Some(EntryError::RetriesExhausted));
    assert_eq!(session.requests().len(), 1);
}

#[tokio::test]
async fn test_zero_budget_still_sends_one_round() {
    let (a, b) = (if_descr(), if_in_octets());
    let session = MockSession::new("public");
    session.queue_response(page_response(interleaved_page(&[a.clone(), b.clone()], 1)));

    let responses = run(&session, &[a.clone(), b.clone()], raw().error_retries(0)).await;

    assert_eq!(raw_values(&responses, &a).len(), 1);
    assert_eq!(session.requests().len(), 1);
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_values_normalized_by_default() {
    let a = sys_descr();
    let session = MockSession::new("public");
    session.queue_response(page_response([
        (a.child(0), Value::from("Linux router1")),
        (a.child(0), Value::Null),
    ]));

    let responses = run(&session, &[a.clone()], BulkOptions::default().non_repeaters(0)).await;

    let bindings = responses.get(&a).and_then(BulkEntry::values).unwrap();
    assert_eq!(bindings[0].value, Payload::Native(Native::Text("Linux router1".into())));
    assert_eq!(bindings[1].value, Payload::Raw(Value::Null));
}

#[tokio::test]
async fn test_raw_mode_keeps_wire_values() {
    let a = sys_uptime();
    let session = MockSession::new("public");
    session.queue_response(page_response([(a.child(0), Value::TimeTicks(4200))]));

    let responses = run(&session, &[a.clone()], raw().non_repeaters(1)).await;

    assert_eq!(raw_values(&responses, &a), vec![(a.child(0), Value::TimeTicks(4200))]);
}

// ============================================================================
// Request contents
// ============================================================================

#[tokio::test]
async fn test_request_carries_options() {
    let session = MockSession::new("private");
    session.queue_response(page_response(interleaved_page(&[if_descr()], 1)));

    run(&session, &[sys_uptime(), if_descr()], raw().non_repeaters(1).max_repetitions(25)).await;

    let request = &session.requests()[0];
    assert_eq!(request.version, Version::V2c);
    assert_eq!(request.community.as_ref(), b"private");
    assert_eq!(request.pdu.non_repeaters, 1);
    assert_eq!(request.pdu.max_repetitions, 25);
    assert!(request.pdu.varbinds.iter().all(|vb| vb.value == Value::Null));
}

#[tokio::test]
async fn test_no_oids_completes_without_sending() {
    let session = MockSession::new("public");

    let responses = run(&session, &[], BulkOptions::default()).await;

    assert!(responses.is_empty());
    assert!(session.requests().is_empty());
}

#[test]
fn test_invalid_options_rejected() {
    let session = MockSession::new("public");
    for options in [
        BulkOptions::default().version(Version::V1),
        BulkOptions::default().version(Version::V3),
        BulkOptions::default().max_repetitions(0),
    ] {
        let err = GetBulk::new(session.clone(), [sys_uptime()], options).err().unwrap();
        assert!(matches!(*err, Error::Config(_)));
    }
}

// ============================================================================
// Operation failures
// ============================================================================

#[tokio::test]
async fn test_timeout_propagates() {
    init_tracing();
    let session = MockSession::new("public").with_retries(2);
    session.queue_timeout();

    let err = GetBulk::new(session.clone(), [sys_uptime()], raw())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::Timeout { retries: 2, .. }));
}

#[tokio::test]
async fn test_timeout_in_later_round_propagates() {
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::NoSuchName, 1).build());
    // Queue exhausted: the second round times out.

    let err = GetBulk::new(session.clone(), [sys_descr(), sys_uptime()], raw())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::Timeout { .. }));
    assert_eq!(session.requests().len(), 2);
}

#[tokio::test]
async fn test_network_error_propagates() {
    let session = MockSession::new("public");
    session.queue_io_error("connection refused");

    let err = GetBulk::new(session, [sys_uptime()], raw())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::Network { .. }));
}

#[tokio::test]
async fn test_request_id_mismatch_fails() {
    let session = MockSession::new("public");
    session.queue_raw_response(
        ResponseBuilder::new()
            .request_id(-7)
            .varbind(sys_uptime().child(0), Value::TimeTicks(1))
            .build(),
    );

    let err = GetBulk::new(session, [sys_uptime()], raw())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        *err,
        Error::MalformedResponse {
            kind: MalformedKind::RequestIdMismatch { actual: -7, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_error_index_out_of_range_fails() {
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::TooBig, 0).build());

    let err = GetBulk::new(session, [sys_descr(), sys_uptime()], raw())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        *err,
        Error::MalformedResponse {
            kind: MalformedKind::ErrorIndexOutOfRange { index: 0, pending: 2 },
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_non_repeaters_fails() {
    let session = MockSession::new("public");
    session.queue_response(page_response([(sys_descr().child(0), Value::from("x"))]));

    let err = GetBulk::new(session, [sys_descr(), sys_uptime()], raw().non_repeaters(2))
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        *err,
        Error::MalformedResponse {
            kind: MalformedKind::MissingNonRepeaters { expected: 2, actual: 1 },
            ..
        }
    ));
}

// ============================================================================
// Spawned operations
// ============================================================================

#[tokio::test]
async fn test_spawned_operation_resolves_handle() {
    let columns = [if_descr(), if_in_octets()];
    let session = MockSession::new("public");
    session.queue_response(ResponseBuilder::new().error(ErrorStatus::NoSuchName, 2).build());
    session.queue_response(page_response(interleaved_page(&columns[..1], 3)));

    let responses = GetBulk::start(session.clone(), columns.clone(), raw())
        .unwrap()
        .await
        .unwrap();

    assert_eq!(raw_values(&responses, &columns[0]).len(), 3);
    assert!(responses.get(&columns[1]).unwrap().is_error());
    assert_eq!(session.requests().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_operations_share_session() {
    let session = MockSession::new("public");
    let mut handles = Vec::new();
    for _ in 0..4 {
        // Every response is patched to its request, so order does not matter.
        session.queue_response(page_response([(sys_uptime().child(0), Value::TimeTicks(1))]));
        handles.push(GetBulk::new(session.clone(), [sys_uptime()], raw().non_repeaters(1)).unwrap().spawn());
    }

    for handle in handles {
        let responses = handle.await.unwrap();
        assert_eq!(responses.len(), 1);
    }

    let mut ids: Vec<_> = session.requests().iter().map(|r| r.request_id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn test_spawned_failure_reaches_handle() {
    let session = MockSession::new("public");

    let err = GetBulk::start(session, [oid!(1, 3, 6, 1)], raw())
        .unwrap()
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::Timeout { .. }));
}
