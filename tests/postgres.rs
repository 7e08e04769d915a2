//! Runs the Postgres store against a real database:
//! `DATABASE_URL=postgres://... cargo test --test postgres -- --ignored`
use products_api::models::product::Product;
use products_api::store::{PgProductStore, ProductStore, StoreError, TableName};
use sqlx::postgres::PgPoolOptions;

const TABLE: &str = "products_store_it";

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a PostgreSQL database"]
async fn pg_store_reads_and_updates_a_live_table() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();

    sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE}")).execute(&pool).await.unwrap();
    sqlx::query(&format!(
        "CREATE TABLE {TABLE} (id SERIAL PRIMARY KEY, purchasePrice NUMERIC NOT NULL, salePrice NUMERIC NOT NULL)"
    ))
    .execute(&pool)
    .await
    .unwrap();

    let store = PgProductStore::new(pool.clone(), &TableName::parse(TABLE).unwrap());
    assert!(store.list_all().await.unwrap().is_empty());

    sqlx::query(&format!(
        "INSERT INTO {TABLE} (id, purchasePrice, salePrice) VALUES (1, 100, 110), (2, 200, 210.5)"
    ))
    .execute(&pool)
    .await
    .unwrap();

    let mut products = store.list_all().await.unwrap();
    products.sort_by_key(|p| p.id);
    assert_eq!(products, vec![Product::new(1, 100.0, 110.0), Product::new(2, 200.0, 210.5)]);

    assert_eq!(store.get_by_id("2").await.unwrap(), Some(Product::new(2, 200.0, 210.5)));
    assert_eq!(store.get_by_id("99").await.unwrap(), None);

    assert_eq!(store.update_by_id("1", 150.0, 160.0).await.unwrap(), 1);
    assert_eq!(store.get_by_id("1").await.unwrap(), Some(Product::new(1, 150.0, 160.0)));
    assert_eq!(store.update_by_id("99", 1.0, 2.0).await.unwrap(), 0);

    assert!(matches!(store.get_by_id("abc").await, Err(StoreError::Database(_))));
    assert!(matches!(store.update_by_id("abc", 1.0, 2.0).await, Err(StoreError::Database(_))));

    sqlx::query(&format!("DROP TABLE {TABLE}")).execute(&pool).await.unwrap();
}
