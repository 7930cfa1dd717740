//! End-to-end loads into a live PostgreSQL server.
//!
//! Connection settings come from `WAREHOUSE_TEST_ACCOUNT`, `WAREHOUSE_TEST_USER`,
//! `WAREHOUSE_TEST_PASSWORD` and `WAREHOUSE_TEST_DATABASE`, defaulting to the
//! devcontainer's `postgres:postgres@postgresql:5432/testdb`.

use chrono::{TimeZone, Utc};
use job_core::TableName;
use job_csv::write_records;
use job_generator::JobGenerator;
use tempfile::TempDir;
use warehouse_loader::{
    Connection, ConnectionError, LoadError, Loader, PostgresWarehouse, Warehouse, WarehouseConfig,
    WarehouseError, WarehouseSession,
};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn test_config() -> WarehouseConfig {
    WarehouseConfig {
        user: Some(env_or("WAREHOUSE_TEST_USER", "postgres")),
        password: Some(env_or("WAREHOUSE_TEST_PASSWORD", "postgres")),
        account: Some(env_or("WAREHOUSE_TEST_ACCOUNT", "postgresql:5432")),
        database: Some(env_or("WAREHOUSE_TEST_DATABASE", "testdb")),
        schema: Some("public".to_string()),
        ..Default::default()
    }
}

async fn reset(warehouse: &PostgresWarehouse, table: &TableName) {
    let session = warehouse.connect().await.unwrap();
    session
        .client()
        .batch_execute(&format!("DROP TABLE IF EXISTS {}", table.qualified()))
        .await
        .unwrap();
    session.close().await.unwrap();
}

async fn count_rows(warehouse: &PostgresWarehouse, table: &TableName) -> i64 {
    let session = warehouse.connect().await.unwrap();
    let row = session
        .client()
        .query_one(&format!("SELECT COUNT(*) FROM {}", table.qualified()), &[])
        .await
        .unwrap();
    session.close().await.unwrap();
    row.get(0)
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL server"]
async fn test_load_generated_batch_twice() {
    let warehouse = PostgresWarehouse::new(test_config());
    let table = TableName::parse("public.job_postings_e2e").unwrap();
    reset(&warehouse, &table).await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job_postings.csv");
    let records = JobGenerator::new(42)
        .with_reference_time(Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap())
        .generate(200);
    write_records(&records, &path).unwrap();

    let loader = Loader::new(warehouse.clone());
    let first = loader.load_file(&path, &table).await.unwrap();
    let second = loader.load_file(&path, &table).await.unwrap();

    assert_eq!(first.rows_inserted, 200);
    assert_eq!(second.rows_inserted, 200);
    assert_eq!(count_rows(&warehouse, &table).await, 400);

    let session = warehouse.connect().await.unwrap();
    let row = session
        .client()
        .query_one(
            &format!(
                "SELECT job_id, salary, posted_date FROM {} ORDER BY create_date, job_id::BIGINT LIMIT 1",
                table.qualified()
            ),
            &[],
        )
        .await
        .unwrap();
    session.close().await.unwrap();

    let job_id: String = row.get(0);
    let salary: i64 = row.get(1);
    let posted_date: chrono::NaiveDate = row.get(2);
    assert_eq!(job_id, "1");
    assert_eq!(salary, records[0].salary);
    assert_eq!(posted_date, records[0].posted_date);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL server"]
async fn test_type_mismatch_inserts_nothing() {
    let warehouse = PostgresWarehouse::new(test_config());
    let table = TableName::parse("public.job_postings_e2e_bad").unwrap();
    reset(&warehouse, &table).await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "job_id,title,company,location,salary,posted_date,employment_type,create_date\n\
         1,Data Engineer,Acme,TX,120000,2025-01-01,Full-time,2025-01-01T00:00:00\n\
         2,Data Engineer,Acme,TX,lots,2025-01-01,Full-time,2025-01-01T00:00:00\n",
    )
    .unwrap();

    let mut session = warehouse.connect().await.unwrap();
    let err = Loader::new(warehouse.clone())
        .load(&path, &table, Connection::Borrowed(&mut session))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Insert {
            source: WarehouseError::InvalidValue(_),
            ..
        }
    ));

    // The borrowed session is still usable and the table is empty
    let row = session
        .client()
        .query_one(&format!("SELECT COUNT(*) FROM {}", table.qualified()), &[])
        .await
        .unwrap();
    let count: i64 = row.get(0);
    assert_eq!(count, 0);
    session.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL server"]
async fn test_wrong_password_is_a_connection_error() {
    let config = WarehouseConfig {
        password: Some("definitely-not-the-password".to_string()),
        ..test_config()
    };

    let result = PostgresWarehouse::new(config).connect().await;
    assert!(matches!(result, Err(ConnectionError::Rejected(_))));
}
