use pga_testkit::FakeStore;

/// The issuance precondition: after reconcile, the next minted identifier's
/// suffix is counter + 1.
#[tokio::test]
async fn mint_continues_after_reconcile() {
    let store = FakeStore::with_latest("PED-00042");

    pga_sequence::reconcile(&store, "pedido", "PED").await.unwrap();
    let minted = pga_sequence::mint(&store, "pedido", "PED").await.unwrap();

    assert_eq!(minted.value, 43);
    assert_eq!(minted.identifier, "PED-00043");
    assert_eq!(store.counter("pedido"), Some(43));
}

/// On a fresh system the first mint creates the counter and issues 1.
#[tokio::test]
async fn first_mint_on_fresh_system() {
    let store = FakeStore::empty();

    let minted = pga_sequence::mint(&store, "pedido", "PED").await.unwrap();

    assert_eq!(minted.value, 1);
    assert_eq!(minted.identifier, "PED-00001");
}

/// Consecutive mints issue strictly increasing identifiers.
#[tokio::test]
async fn consecutive_mints_increase() {
    let store = FakeStore::empty();

    let a = pga_sequence::mint(&store, "cotizacion", "COT").await.unwrap();
    let b = pga_sequence::mint(&store, "cotizacion", "COT").await.unwrap();

    assert_eq!(a.identifier, "COT-00001");
    assert_eq!(b.identifier, "COT-00002");
}
