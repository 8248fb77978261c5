//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    warden_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("role"), "missing role table");
    assert!(info_str.contains("session"), "missing session table");

    // Verify the membership edge table.
    assert!(info_str.contains("has_role"), "missing has_role edge");

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    warden_db::run_migrations(&db).await.unwrap();
    warden_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_emails() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    warden_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE user SET email = 'dup@example.com', \
         username = 'first', password_hash = 'x'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // Same email, different username — the index must reject it.
    let result = db
        .query(
            "CREATE user SET email = 'dup@example.com', \
             username = 'second', password_hash = 'x'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate email should be rejected");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_role_names() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    warden_db::run_migrations(&db).await.unwrap();

    db.query("CREATE role SET name = 'editor'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE role SET name = 'editor'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate role name should be rejected");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_memberships() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    warden_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE user:u1 SET email = 'a@example.com', \
         username = 'a', password_hash = 'x'; \
         CREATE role:r1 SET name = 'editor';",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    db.query("RELATE user:u1 -> has_role -> role:r1")
        .await
        .unwrap()
        .check()
        .unwrap();

    // A second identical edge must hit the (in, out) unique index.
    let result = db
        .query("RELATE user:u1 -> has_role -> role:r1")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate membership should be rejected");
}
