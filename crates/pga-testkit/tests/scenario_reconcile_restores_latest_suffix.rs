use pga_sequence::TargetSource;
use pga_testkit::FakeStore;

/// The latest identifier's numeric suffix becomes the counter value.
#[tokio::test]
async fn reconcile_restores_latest_suffix() {
    let store = FakeStore::with_latest("PED-00042");

    let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(outcome.sequence_name, "pedido");
    assert_eq!(outcome.new_value, 42);
    assert_eq!(outcome.previous_value, None);
    assert_eq!(outcome.source, TargetSource::Parsed { suffix: 42 });
    assert_eq!(store.counter("pedido"), Some(42));
}

/// Padded and unpadded suffixes both reconcile to their numeric value.
#[tokio::test]
async fn reconcile_handles_varied_padding() {
    for (latest, expect) in [("PED-00001", 1), ("PED-7", 7), ("PED-123456", 123_456)] {
        let store = FakeStore::with_latest(latest);
        let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();
        assert_eq!(outcome.new_value, expect, "latest={latest}");
    }
}

/// A drifted counter is overwritten with the historical maximum.
#[tokio::test]
async fn reconcile_corrects_drifted_counter() {
    let store = FakeStore::with_latest("PED-00042");
    store.seed_counter("pedido", 3);

    let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(outcome.previous_value, Some(3));
    assert_eq!(outcome.new_value, 42);
    assert_eq!(store.counter("pedido"), Some(42));
}
