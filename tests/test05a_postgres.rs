#![cfg(all(feature = "postgres", feature = "test-utils"))]

use postgresql_embedded::PostgreSQL;
use sql_link::prelude::*;
use sql_link::tokio_postgres;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn postgres_owned_and_adopted_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;
    postgresql.create_database("link_test").await?;

    let settings = postgresql.settings();
    let config = PostgresConfig::new(
        settings.host.clone(),
        settings.port,
        settings.username.clone(),
        settings.password.clone(),
        "link_test",
    );

    // Owned lifecycle against a real server.
    let mut conn = Connection::open(DbConfig::Postgres(config.clone())).await?;
    assert!(conn.is_connected().await);
    assert_eq!(conn.driver()?, DriverKind::Postgres);
    assert_eq!(conn.database_name(), "link_test");
    assert!(!conn.server_version().await?.is_empty());
    assert!(conn.dsn()?.contains("dbname=link_test"));

    let handle = conn.handle().expect("connected");
    handle
        .lock()
        .await
        .execute("CREATE TABLE t (id INT PRIMARY KEY, val TEXT NOT NULL)")
        .await?;

    conn.begin_transaction().await?;
    handle
        .lock()
        .await
        .execute("INSERT INTO t (id, val) VALUES (1, 'kept')")
        .await?;
    conn.commit().await?;

    conn.begin_transaction().await?;
    handle
        .lock()
        .await
        .execute("INSERT INTO t (id, val) VALUES (2, 'discarded')")
        .await?;
    conn.rollback().await?;

    let count = handle.lock().await.query_scalar("SELECT COUNT(*) FROM t").await?;
    assert_eq!(count.as_deref(), Some("1"));
    drop(handle);

    conn.reconnect().await?;
    assert!(conn.is_connected().await);
    conn.disconnect().await;
    assert!(!conn.is_connected().await);

    // Adopted client: detection resolves the server's current database.
    let (client, connection) = tokio_postgres::connect(&config.dsn(), tokio_postgres::NoTls).await?;
    let driver_task = tokio::spawn(async move {
        let _ = connection.await;
    });
    let shared = adopt_postgres(client);
    let mut adopted = Connection::adopt(shared.clone()).await;
    assert_eq!(adopted.database_name(), "link_test");
    assert_eq!(adopted.driver()?, DriverKind::Postgres);
    assert!(matches!(adopted.dsn(), Err(SqlLinkError::Unsupported(_))));

    adopted.reconnect().await?;
    assert!(adopted.is_connected().await);

    adopted.disconnect().await;
    // The caller's clone is still alive and usable.
    let one = shared.lock().await.query_scalar("SELECT 1").await?;
    assert_eq!(one.as_deref(), Some("1"));
    assert!(matches!(
        adopted.reconnect().await,
        Err(SqlLinkError::DeadExternalConnection(_))
    ));
    driver_task.abort();

    // A client whose connection task is gone can't answer the detection
    // probe; the name folds to the fallback instead of erroring.
    let (client, connection) = tokio_postgres::connect(&config.dsn(), tokio_postgres::NoTls).await?;
    let task = tokio::spawn(async move {
        let _ = connection.await;
    });
    task.abort();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let dead = Connection::adopt(adopt_postgres(client)).await;
    assert_eq!(dead.database_name(), UNKNOWN_DATABASE_NAME);

    postgresql.stop().await?;
    Ok(())
}
