//! End-to-end dispatcher tests against a live database

use record_shop::protocol::{Reply, Response};
use record_shop::{Dispatcher, Repository, RequestContext};
use serde_json::{json, Value};

mod common;

fn responses(reply: Reply) -> Vec<Response> {
    match reply {
        Reply::Single(response) => vec![response],
        Reply::Batch(responses) => responses,
    }
}

fn created_id(response: &Response) -> i64 {
    assert!(response.success, "expected success, got {response:?}");
    response.data.as_ref().and_then(|d| d["id"].as_i64()).unwrap()
}

#[tokio::test]
async fn test_catalog_and_purchase_flow() {
    let db = common::setup_test_db().await;
    let store = db.store.clone();
    let dispatcher = Dispatcher::new(Repository::new(store));
    let context = RequestContext::new();
    let artist = format!("Artist {}", uuid::Uuid::new_v4());

    // 1. Create an album and a user in one batch
    let frame = json!([
        {"action": "addAlbum", "data": {"title": "Blue Train", "artist": artist, "price": 29.99, "stock": 3}},
        {"action": "addUser", "data": {"username": "coltrane_fan", "email": "fan@example.com"}},
    ]);
    let created = responses(dispatcher.handle_frame(&frame.to_string(), &context).await);
    assert_eq!(created.len(), 2);
    let album_id = created_id(&created[0]);
    let user_id = created_id(&created[1]);

    // 2. Buy two copies
    let frame = json!({"action": "addPurchase", "data": {"user_id": user_id, "album_id": album_id, "quantity": 2}});
    let bought = responses(dispatcher.handle_frame(&frame.to_string(), &context).await);
    created_id(&bought[0]);

    // 3. Asking for two more fails with the stock figures
    let rejected = responses(dispatcher.handle_frame(&frame.to_string(), &context).await);
    assert_eq!(
        rejected[0].error.as_deref(),
        Some(format!("album {album_id} out of stock or insufficient stock (have=1, want=2)").as_str())
    );

    // 4. Read back the album and the summary
    let frame = json!([
        {"action": "getAlbumByID", "data": album_id},
        {"action": "getAlbumByArtist", "data": artist},
        {"action": "getUserPurchaseSummary", "data": user_id},
    ]);
    let reads = responses(dispatcher.handle_frame(&frame.to_string(), &context).await);
    assert!(reads.iter().all(|r| r.success), "{reads:?}");

    let album = reads[0].data.as_ref().unwrap();
    assert_eq!(album["stock"], 1);
    assert_eq!(album["price"], "29.99");

    let by_artist = reads[1].data.as_ref().unwrap().as_array().unwrap();
    assert_eq!(by_artist.len(), 1);

    let summary = reads[2].data.as_ref().unwrap();
    assert_eq!(summary["purchases"][0]["subtotal"], "59.98");
    assert_eq!(summary["total_cost"], "59.98");
}

#[tokio::test]
async fn test_mixed_batch_keeps_order_and_length() {
    let db = common::setup_test_db().await;
    let store = db.store.clone();
    let dispatcher = Dispatcher::new(Repository::new(store));

    let frame = json!([
        {"action": "getAlbums"},
        {"action": "launchRocket", "data": 1},
        {"action": "getAlbumByID", "data": 0},
        {"action": "getUsers"},
        {"action": "getUserByID", "data": i64::MAX},
    ]);
    let reply = responses(
        dispatcher
            .handle_frame(&frame.to_string(), &RequestContext::new())
            .await,
    );

    assert_eq!(reply.len(), 5);
    assert!(reply[0].success);
    assert!(reply[0].data.as_ref().is_some_and(Value::is_array));
    assert_eq!(reply[1].error.as_deref(), Some("unknown action"));
    assert_eq!(reply[2].error.as_deref(), Some("album ID must be greater than 0"));
    assert!(reply[3].success);
    assert_eq!(
        reply[4].error.as_deref(),
        Some(format!("user {} not found", i64::MAX).as_str())
    );
}

#[tokio::test]
async fn test_rejected_album_is_not_inserted() {
    let db = common::setup_test_db().await;
    let store = db.store.clone();
    let dispatcher = Dispatcher::new(Repository::new(store.clone()));
    let artist = format!("Artist {}", uuid::Uuid::new_v4());

    for data in [
        json!({"title": "Zero", "artist": artist, "price": 0, "stock": 1}),
        json!({"title": "Negative", "artist": artist, "price": 10, "stock": -1}),
    ] {
        let frame = json!({"action": "addAlbum", "data": data}).to_string();
        let reply = responses(dispatcher.handle_frame(&frame, &RequestContext::new()).await);
        assert!(!reply[0].success);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM albums WHERE artist = $1")
        .bind(&artist)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}
