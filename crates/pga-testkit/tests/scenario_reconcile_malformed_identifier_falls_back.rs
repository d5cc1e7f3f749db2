use pga_sequence::TargetSource;
use pga_testkit::FakeStore;

/// A malformed latest identifier degrades to the zero target; no error
/// escapes reconcile.
#[tokio::test]
async fn malformed_suffix_falls_back_to_zero() {
    let store = FakeStore::with_latest("PED-abc");

    let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(outcome.new_value, 0);
    assert_eq!(
        outcome.source,
        TargetSource::MalformedIdentifier {
            raw: "PED-abc".to_string()
        }
    );
    assert_eq!(store.counter("pedido"), Some(0));
}

/// Wrong-prefix identifiers are not part of the family: same fallback.
#[tokio::test]
async fn wrong_prefix_falls_back_to_zero() {
    let store = FakeStore::with_latest("XYZ-001");

    let outcome = pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();

    assert_eq!(outcome.new_value, 0);
    assert!(!outcome.source.is_parsed());
}
