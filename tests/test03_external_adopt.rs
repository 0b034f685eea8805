#![cfg(feature = "sqlite")]

use sql_link::prelude::*;
use sql_link::rusqlite;

fn in_memory_handle() -> SharedHandle {
    adopt_sqlite(rusqlite::Connection::open_in_memory().expect("open in-memory sqlite"))
}

#[tokio::test]
async fn adopted_sqlite_reports_embedded_sentinel() {
    let conn = Connection::adopt(in_memory_handle()).await;
    assert_eq!(conn.database_name(), EMBEDDED_DATABASE_NAME);
    assert_eq!(conn.driver().expect("connected"), DriverKind::Sqlite);
    assert!(conn.is_connected().await);
}

#[tokio::test]
async fn adopted_connection_has_no_dsn() {
    let mut conn = Connection::adopt(in_memory_handle()).await;
    assert!(matches!(conn.dsn(), Err(SqlLinkError::Unsupported(_))));

    // State doesn't matter: an adopted connection never grows a DSN.
    conn.disconnect().await;
    assert!(matches!(conn.dsn(), Err(SqlLinkError::Unsupported(_))));
}

#[tokio::test]
async fn disconnect_never_closes_the_adopted_handle() {
    let shared = in_memory_handle();
    shared
        .lock()
        .await
        .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .await
        .expect("create table");

    let mut conn = Connection::adopt(shared.clone()).await;
    conn.disconnect().await;
    assert!(conn.handle().is_none());
    assert!(!conn.is_connected().await);

    // The caller's clone is untouched and still answers queries.
    let count = shared
        .lock()
        .await
        .query_scalar("SELECT COUNT(*) FROM t")
        .await
        .expect("query through caller handle");
    assert_eq!(count.as_deref(), Some("0"));
}

#[tokio::test]
async fn adopted_reconnect_is_a_probe_and_dies_after_disconnect() {
    let mut conn = Connection::adopt(in_memory_handle()).await;

    // Live handle: reconnect is a successful no-op.
    conn.reconnect().await.expect("probe on live handle");
    assert!(conn.is_connected().await);

    conn.disconnect().await;
    assert!(matches!(
        conn.reconnect().await,
        Err(SqlLinkError::DeadExternalConnection(_))
    ));
    // connect() can't help either: there are no credentials to dial with.
    assert!(matches!(
        conn.connect().await,
        Err(SqlLinkError::DeadExternalConnection(_))
    ));
}

#[tokio::test]
async fn adopted_transactions_delegate_to_the_handle() {
    let shared = in_memory_handle();
    shared
        .lock()
        .await
        .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .await
        .expect("create table");

    let mut conn = Connection::adopt(shared.clone()).await;

    conn.begin_transaction().await.expect("begin");
    shared
        .lock()
        .await
        .execute("INSERT INTO t (id) VALUES (1)")
        .await
        .expect("insert");
    conn.rollback().await.expect("rollback");

    let count = shared
        .lock()
        .await
        .query_scalar("SELECT COUNT(*) FROM t")
        .await
        .expect("count");
    assert_eq!(count.as_deref(), Some("0"));

    conn.begin_transaction().await.expect("begin");
    shared
        .lock()
        .await
        .execute("INSERT INTO t (id) VALUES (1)")
        .await
        .expect("insert");
    conn.commit().await.expect("commit");

    let count = shared
        .lock()
        .await
        .query_scalar("SELECT COUNT(*) FROM t")
        .await
        .expect("count");
    assert_eq!(count.as_deref(), Some("1"));
}
