//! 会话拉取流程的端到端场景。

use std::{sync::Arc, time::Duration};

use spark_remote_config::{
    ConfigSession, FetchError, FetchStatus, InMemoryProvider, ProviderError, SessionSettings,
    TypedKey,
};
use tokio::sync::oneshot;

const QUANTITY: TypedKey<i64> = TypedKey::new("quantity");
const ITEM: TypedKey<String> = TypedKey::new("item");
const PRICE: TypedKey<f64> = TypedKey::new("price");

fn session() -> (Arc<InMemoryProvider>, Arc<ConfigSession>) {
    let provider = Arc::new(InMemoryProvider::new());
    let session = Arc::new(ConfigSession::new(provider.clone()));
    (provider, session)
}

#[tokio::test]
async fn fetched_values_override_defaults_and_untouched_defaults_persist() {
    let (provider, session) = session();
    let config = session.config();
    config.set(&QUANTITY, 0);
    config.set(&ITEM, "Apple".to_owned());

    provider.stage("quantity", 5_i64);
    provider.stage("price", 2.99_f64);
    let view = session.fetch(None).await.expect("fetch succeeds");

    assert_eq!(view.get(&QUANTITY), 5);
    assert_eq!(view.get(&ITEM), "Apple");
    assert_eq!(view.get(&PRICE), 2.99);
    assert_eq!(view.default_value(&QUANTITY), 0);
    assert_eq!(session.last_fetch_status(), FetchStatus::Success);
}

#[tokio::test]
async fn failed_fetch_leaves_reads_unchanged() {
    let (provider, session) = session();
    let config = session.config();
    config.set(&ITEM, "Apple".to_owned());
    provider.stage("quantity", 5_i64);
    session.fetch(None).await.expect("first fetch succeeds");

    let before = (config.get(&QUANTITY), config.get(&ITEM), config.get(&PRICE));

    provider.stage("quantity", 8_i64);
    provider.fail_with(ProviderError::network("connection reset"));
    let err = session
        .fetch(Some(Duration::ZERO))
        .await
        .expect_err("network failure surfaces");
    assert_eq!(
        err,
        FetchError::Provider(ProviderError::network("connection reset"))
    );
    assert_eq!(session.last_fetch_status(), FetchStatus::Failure);

    let after = (config.get(&QUANTITY), config.get(&ITEM), config.get(&PRICE));
    assert_eq!(before, after);
}

#[tokio::test]
async fn fetch_within_expiration_reuses_the_previous_round_trip() {
    let (provider, session) = session();
    provider.stage("quantity", 1_i64);
    session.fetch(None).await.expect("first fetch");

    provider.stage("quantity", 2_i64);
    let view = session.fetch(None).await.expect("cached fetch");
    assert_eq!(view.get(&QUANTITY), 1);
    assert_eq!(provider.round_trips(), 1);

    session.set_developer_mode(true);
    let view = session.fetch(None).await.expect("developer fetch");
    assert_eq!(view.get(&QUANTITY), 2);
    assert_eq!(provider.round_trips(), 2);
}

#[tokio::test]
async fn settings_loaded_from_toml_configure_the_provider() {
    let settings = SessionSettings::from_toml_str(
        r#"
        developer_mode = true
        default_expiration_secs = 60
        "#,
    )
    .expect("valid settings");
    let provider = Arc::new(InMemoryProvider::new());
    let session = ConfigSession::with_settings(provider.clone(), settings);

    assert!(session.developer_mode());
    assert!(session.provider_developer_mode());
    assert_eq!(session.default_expiration(), Duration::from_secs(60));

    session.set_developer_mode(false);
    assert!(!session.provider_developer_mode());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_fetch_completes_even_when_the_handle_is_dropped() {
    let (provider, session) = session();
    provider.stage("quantity", 5_i64);

    let (tx, rx) = oneshot::channel();
    drop(session.spawn_fetch(None, move |outcome| {
        let quantity = outcome.map(|view| view.get(&QUANTITY));
        let _ = tx.send(quantity);
    }));

    let quantity = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("completion delivered in time")
        .expect("completion sender kept alive");
    assert_eq!(quantity, Ok(5));
    assert_eq!(session.config().get(&QUANTITY), 5);
}

#[tokio::test]
async fn spawned_fetch_reports_failures_to_the_completion() {
    let (provider, session) = session();
    provider.fail_with(ProviderError::internal("maintenance"));

    let (tx, rx) = oneshot::channel();
    let handle = session.spawn_fetch(Some(Duration::ZERO), move |outcome| {
        let _ = tx.send(outcome.map(|_| ()));
    });
    handle.await.expect("fetch task does not panic");

    let outcome = rx.await.expect("completion delivered");
    assert_eq!(
        outcome,
        Err(FetchError::Provider(ProviderError::internal("maintenance")))
    );
}

#[tokio::test]
async fn independent_sessions_do_not_share_state() {
    let (first_provider, first) = session();
    let (_, second) = session();
    first.config().set(&QUANTITY, 4);
    first_provider.stage("item", "Pear");
    first.fetch(None).await.expect("fetch");

    assert_eq!(first.config().get(&ITEM), "Pear");
    assert_eq!(second.config().get(&ITEM), "");
    assert_eq!(second.config().get(&QUANTITY), 0);
    assert_eq!(second.last_fetch_status(), FetchStatus::NoFetchYet);
}
