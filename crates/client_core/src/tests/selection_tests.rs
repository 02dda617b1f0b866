use std::{
    sync::{atomic::Ordering, Arc},
    time::Duration,
};

use super::*;
use crate::{
    test_support::{mounted_client, player, settings, FakeBackend, FakeGenerator},
    transport::{DescriptionGenerator, PlayerBackend},
    RosterClient,
};
use shared::domain::PlayerDraft;

#[tokio::test]
async fn select_uses_canonical_record_not_roster_entry() {
    let backend = FakeBackend::with_players(vec![player(5, 2019, 100)]);
    let canonical = Player {
        rank: 4,
        ..player(5, 2019, 120)
    };
    backend.records.lock().await.insert(PlayerId(5), canonical.clone());
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;

    let outcome = client.select(PlayerId(5)).await.expect("select");

    assert_eq!(outcome, SelectOutcome::Selected(canonical.clone()));
    assert_eq!(client.selection().await, Some(canonical.clone()));
    assert_eq!(client.draft().await, Some(PlayerDraft::from(&canonical)));
    assert_eq!(client.roster().await.players()[0].hits, 100);
}

#[tokio::test]
async fn later_select_wins_when_earlier_response_arrives_last() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200), player(2, 2021, 150)]);
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;
    let mut started = backend.notify_fetches().await;
    let release_a = backend.gate(PlayerId(1)).await;
    let release_b = backend.gate(PlayerId(2)).await;

    let first = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.select(PlayerId(1)).await }
    });
    assert_eq!(started.recv().await, Some(PlayerId(1)));
    let second = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.select(PlayerId(2)).await }
    });
    assert_eq!(started.recv().await, Some(PlayerId(2)));

    release_b.send(()).expect("release b");
    let second = second.await.expect("join b").expect("select b");
    release_a.send(()).expect("release a");
    let first = first.await.expect("join a").expect("select a");

    assert_eq!(second, SelectOutcome::Selected(player(2, 2021, 150)));
    assert_eq!(first, SelectOutcome::Superseded);
    assert_eq!(client.selection().await.map(|p| p.id), Some(PlayerId(2)));
    assert_eq!(
        client.draft().await,
        Some(PlayerDraft::from(&player(2, 2021, 150)))
    );
}

#[tokio::test]
async fn later_select_wins_when_earlier_response_arrives_first() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200), player(2, 2021, 150)]);
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;
    let mut started = backend.notify_fetches().await;
    let release_a = backend.gate(PlayerId(1)).await;
    let release_b = backend.gate(PlayerId(2)).await;

    let first = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.select(PlayerId(1)).await }
    });
    assert_eq!(started.recv().await, Some(PlayerId(1)));
    let second = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.select(PlayerId(2)).await }
    });
    assert_eq!(started.recv().await, Some(PlayerId(2)));

    release_a.send(()).expect("release a");
    let first = first.await.expect("join a").expect("select a");
    assert_eq!(first, SelectOutcome::Superseded);
    assert_eq!(client.selection().await, None);

    release_b.send(()).expect("release b");
    second.await.expect("join b").expect("select b");
    assert_eq!(client.selection().await.map(|p| p.id), Some(PlayerId(2)));
}

#[tokio::test]
async fn failed_select_keeps_previous_selection() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200), player(2, 2021, 150)]);
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;
    client.select(PlayerId(1)).await.expect("select 1");
    client.set_field("hits", "201").await.expect("edit");
    let mut events = client.subscribe_events();

    backend.fail_fetch.store(true, Ordering::SeqCst);
    let err = client.select(PlayerId(2)).await.expect_err("fetch fails");

    assert!(matches!(err, ClientError::Fetch(_)));
    assert_eq!(client.selection().await.map(|p| p.id), Some(PlayerId(1)));
    assert_eq!(
        client.draft().await.and_then(|d| d.hits.value().copied()),
        Some(201)
    );
    match events.recv().await.expect("failure event") {
        ClientEvent::Failure { kind, .. } => assert_eq!(kind, crate::error::FailureKind::Fetch),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn hung_fetch_times_out_as_failure() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200)]);
    let client = RosterClient::new_with_dependencies(
        &settings(Duration::from_millis(50)),
        Arc::clone(&backend) as Arc<dyn PlayerBackend>,
        FakeGenerator::replying("unused") as Arc<dyn DescriptionGenerator>,
    );
    client.mount().await.expect("initial sync");
    backend.hang_fetch.store(true, Ordering::SeqCst);

    let err = client.select(PlayerId(1)).await.expect_err("timeout");

    match err {
        ClientError::Fetch(message) => assert!(message.contains("timed out"), "{message}"),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(client.selection().await, None);
}

#[tokio::test]
async fn selecting_closes_open_editor_with_fresh_draft() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200), player(2, 2021, 150)]);
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;
    client.select(PlayerId(1)).await.expect("select 1");
    client.open_editor().await.expect("open");
    client.set_field("player_name", "Renamed").await.expect("edit");

    client.select(PlayerId(1)).await.expect("reselect");

    assert_eq!(client.dialog().await, DialogState::Closed);
    assert_eq!(
        client.draft().await,
        Some(PlayerDraft::from(&player(1, 2020, 200)))
    );
}

#[tokio::test]
async fn response_after_unmount_is_discarded() {
    let backend = FakeBackend::with_players(vec![player(1, 2020, 200)]);
    let client = mounted_client(&backend, &FakeGenerator::replying("unused")).await;
    let mut started = backend.notify_fetches().await;
    let release = backend.gate(PlayerId(1)).await;

    let pending = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.select(PlayerId(1)).await }
    });
    started.recv().await.expect("fetch started");
    client.unmount().await;
    release.send(()).expect("release");

    assert_eq!(
        pending.await.expect("join"),
        Err(ClientError::Unmounted)
    );
    assert_eq!(client.selection().await, None);
    assert!(!client.is_mounted().await);
}
