use pga_sequence::TargetSource;
use pga_testkit::FakeStore;

/// No records is a valid, expected state: the counter is created at 0,
/// not reported as a failure.
#[tokio::test]
async fn reconcile_fresh_system_yields_zero() {
    let store = FakeStore::empty();

    let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(outcome.new_value, 0);
    assert_eq!(outcome.previous_value, None);
    assert_eq!(outcome.source, TargetSource::NoRecords);
    assert_eq!(store.counter("pedido"), Some(0));
}
