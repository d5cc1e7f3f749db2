use pga_testkit::FakeStore;

/// Two consecutive reconciles with no intervening record changes yield the
/// same value; the second write re-sets what the first wrote.
#[tokio::test]
async fn reconcile_twice_is_idempotent() {
    let store = FakeStore::with_latest("PED-00042");

    let first = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();
    let second = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(first.new_value, 42);
    assert_eq!(second.new_value, 42);
    assert_eq!(second.previous_value, Some(42));
    assert!(second.is_noop());
    assert_eq!(store.counter("pedido"), Some(42));
}
