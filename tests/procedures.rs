mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use common::{customer, new_customer, setup};
use repobase::{Nested, NullPolicy, ProcedureParam, ProcedureReader, Repository, RepositoryBase, RepositoryError};
use sea_orm::{DatabaseConnection, DbBackend, MockDatabase, Transaction, Value};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Address {
    city: String,
    zip: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct CustomerCard {
    id: i32,
    name: String,
    address: Option<Address>,
}

fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::into_inner(db)
        .expect("repository handles dropped")
        .into_transaction_log()
}

const CARD_QUERY: &str = r#"SELECT id AS "id", name AS "name", city AS "address.city", zip AS "address.zip" FROM customers ORDER BY id"#;

#[tokio::test]
async fn test_read_query_builds_nested_structs() {
    let (storage, repo) = setup().await;
    let ada = repo.add_return_id(new_customer("Ada", Some("London"), 0)).await.unwrap();
    let grace = repo.add_return_id(new_customer("Grace", None, 0)).await.unwrap();

    let cards: Vec<CustomerCard> = repo.read_query(storage.statement(CARD_QUERY)).await.unwrap();

    assert_eq!(
        cards,
        vec![
            CustomerCard {
                id: ada,
                name: "Ada".to_string(),
                address: Some(Address {
                    city: "London".to_string(),
                    zip: None,
                }),
            },
            CustomerCard {
                id: grace,
                name: "Grace".to_string(),
                address: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_read_nested_omits_nulls_by_default() {
    let (storage, repo) = setup().await;
    repo.add(new_customer("Grace", None, 0)).await.unwrap();

    let rows = ProcedureReader::default()
        .read_nested(storage.conn(), storage.statement(CARD_QUERY))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("address").is_none());
    assert!(rows[0].get("name").is_some());
}

#[tokio::test]
async fn test_read_nested_keeps_nulls_when_explicit() {
    let (storage, repo) = setup().await;
    repo.add(new_customer("Ada", Some("London"), 0)).await.unwrap();

    let rows = ProcedureReader::default()
        .with_null_policy(NullPolicy::Explicit)
        .read_nested(storage.conn(), storage.statement(CARD_QUERY))
        .await
        .unwrap();

    assert_eq!(rows[0].get("address.zip"), Some(&Nested::Leaf(serde_json::Value::Null)));
    assert_eq!(rows[0].get("address.city"), Some(&Nested::Leaf(json!("London"))));
}

#[tokio::test]
async fn test_conflicting_aliases_fail() {
    let (storage, repo) = setup().await;
    repo.add(new_customer("Ada", Some("London"), 0)).await.unwrap();

    let err = repo
        .read_query::<serde_json::Value>(storage.statement(r#"SELECT name AS "a", city AS "a.city" FROM customers"#))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ShapeConflict(_)));
}

#[tokio::test]
async fn test_command_timeout() {
    let (storage, _repo) = setup().await;
    let reader = ProcedureReader::default().with_timeout(Duration::from_millis(1));

    let slow = storage.statement(
        "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 100000000) \
         SELECT count(*) AS total FROM n",
    );
    let err = reader.read_nested(storage.conn(), slow).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Timeout { .. }));
}

#[tokio::test]
async fn test_postgres_procedure_maps_entity_rows() {
    let db = MockDatabase::new(DbBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([
            ("id", Value::Int(Some(7))),
            ("name", Value::String(Some(Box::new("Ada".to_string())))),
            ("email", Value::String(None)),
            ("city", Value::String(Some(Box::new("London".to_string())))),
            ("zip", Value::String(None)),
            ("balance", Value::Int(Some(10))),
        ])]])
        .into_connection();
    let db = Arc::new(db);
    let repo = RepositoryBase::<customer::Entity>::new(Arc::clone(&db));

    let rows = repo
        .execute_reader_procedure("GetCustomer", vec![ProcedureParam::new("@CustomerId", 7)])
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![customer::Model {
            id: 7,
            name: "Ada".to_string(),
            email: None,
            city: Some("London".to_string()),
            zip: None,
            balance: 10,
        }]
    );
    drop(repo);
    assert_eq!(
        transaction_log(db),
        vec![Transaction::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT * FROM dbo.GetCustomer(CustomerId => $1)",
            [Value::Int(Some(7))],
        )]
    );
}

#[tokio::test]
async fn test_mysql_procedure_maps_nested_dto() {
    let db = MockDatabase::new(DbBackend::MySql)
        .append_query_results([vec![BTreeMap::from([
            ("id", Value::Int(Some(1))),
            ("name", Value::String(Some(Box::new("Linus".to_string())))),
            ("address.city", Value::String(Some(Box::new("Helsinki".to_string())))),
            ("address.zip", Value::String(Some(Box::new("00100".to_string())))),
        ])]])
        .into_connection();
    let db = Arc::new(db);
    let repo = RepositoryBase::<customer::Entity>::new(Arc::clone(&db));

    let cards: Vec<CustomerCard> = repo
        .execute_reader_procedure_as(
            "CustomerCards",
            vec![ProcedureParam::new("city", "Helsinki"), ProcedureParam::null("since")],
        )
        .await
        .unwrap();

    assert_eq!(
        cards,
        vec![CustomerCard {
            id: 1,
            name: "Linus".to_string(),
            address: Some(Address {
                city: "Helsinki".to_string(),
                zip: Some("00100".to_string()),
            }),
        }]
    );
    drop(repo);
    assert_eq!(
        transaction_log(db),
        vec![Transaction::from_sql_and_values(
            DbBackend::MySql,
            "CALL `dbo`.`CustomerCards`(?, ?)",
            [Value::String(Some(Box::new("Helsinki".to_string()))), Value::String(None)],
        )]
    );
}

#[tokio::test]
async fn test_configured_schema_is_used() {
    let db = MockDatabase::new(DbBackend::Postgres)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();
    let reader = ProcedureReader::from_config(&repobase::config::ProcedureConfig {
        schema: "reporting".to_string(),
        ..Default::default()
    });
    let db = Arc::new(db);
    let repo = RepositoryBase::<customer::Entity>::new(Arc::clone(&db)).with_reader(reader);

    let rows: Vec<serde_json::Value> = repo.execute_reader_procedure_as("Totals", Vec::new()).await.unwrap();
    assert!(rows.is_empty());
    drop(repo);
    assert_eq!(
        transaction_log(db),
        vec![Transaction::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT * FROM reporting.Totals()",
            [],
        )]
    );
}
