//! End-to-end seeding runs against SQLite databases in a temp directory.
//!
//! These need no external services and always run.

use rand::rngs::StdRng;
use rand::SeedableRng;

use catalogseed_core::config::DEFAULT_ROW_COUNT;
use catalogseed_core::verify::verify_products;
use catalogseed_core::words::{category_of, faker_names, NameGenerator, ScriptedWords};
use catalogseed_core::{SeedConnection, Seeder, Step};

fn temp_db_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("seed.db").display())
}

async fn table_sql(url: &str) -> String {
    let mut conn = SeedConnection::connect(url).await.unwrap();
    let rows = conn
        .fetch_strings("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'product'")
        .await
        .unwrap();
    conn.close().await.unwrap();
    rows.into_iter().next().expect("product table missing")
}

#[tokio::test]
async fn test_full_run_inserts_default_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let url = temp_db_url(&dir);

    let seeder = Seeder::connect(&url).await.unwrap();
    assert_eq!(seeder.row_count(), DEFAULT_ROW_COUNT);
    let report = seeder.run(faker_names(Some(1)), None).await;

    assert!(!report.has_failures(), "{:?}", report.outcomes);
    assert_eq!(report.rows_inserted, 10_000);
    assert_eq!(
        report.outcome(Step::Populate).unwrap().status_line(),
        "10000 product names inserted successfully."
    );

    let mut conn = SeedConnection::connect(&url).await.unwrap();
    let verify = verify_products(&mut conn).await.unwrap();
    conn.close().await.unwrap();

    assert_eq!(verify.total_rows, 10_000);
    assert_eq!(verify.empty_names, 0);
    assert_eq!(verify.unknown_category, 0);
    assert!(verify.is_valid(Some(10_000)));
    assert!(verify.per_category.values().all(|&n| n > 0));
}

#[tokio::test]
async fn test_rerun_keeps_schema_and_replaces_rows() {
    let dir = tempfile::tempdir().unwrap();
    let url = temp_db_url(&dir);

    let first = Seeder::connect(&url)
        .await
        .unwrap()
        .with_row_count(300)
        .run(faker_names(Some(10)), None)
        .await;
    assert!(!first.has_failures());
    let schema_after_first = table_sql(&url).await;

    let second = Seeder::connect(&url)
        .await
        .unwrap()
        .with_row_count(300)
        .run(faker_names(Some(20)), None)
        .await;
    assert!(!second.has_failures());
    assert_eq!(table_sql(&url).await, schema_after_first);

    let mut conn = SeedConnection::connect(&url).await.unwrap();
    let verify = verify_products(&mut conn).await.unwrap();
    conn.close().await.unwrap();
    assert_eq!(verify.total_rows, 300);
}

#[tokio::test]
async fn test_preexisting_table_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let url = temp_db_url(&dir);

    let mut conn = SeedConnection::connect(&url).await.unwrap();
    conn.execute_in_transaction([
        "CREATE TABLE product (id INTEGER, legacy TEXT)",
        "INSERT INTO product (id, legacy) VALUES (1, 'old row')",
    ])
    .await
    .unwrap();
    conn.close().await.unwrap();

    let report = Seeder::connect(&url)
        .await
        .unwrap()
        .with_row_count(42)
        .run(faker_names(Some(3)), None)
        .await;
    assert!(!report.has_failures());

    let mut conn = SeedConnection::connect(&url).await.unwrap();
    let verify = verify_products(&mut conn).await.unwrap();
    conn.close().await.unwrap();
    assert!(verify.is_valid(Some(42)));
}

#[tokio::test]
async fn test_scripted_words_produce_expected_rows() {
    let mut seeder = Seeder::connect("sqlite::memory:")
        .await
        .unwrap()
        .with_row_count(4);
    assert!(seeder.drop_table().await.is_success());
    assert!(seeder.create_table().await.is_success());

    let mut names = NameGenerator::new(
        ScriptedWords::new(["lorem", "ipsum"]),
        StdRng::seed_from_u64(5),
    );
    assert!(seeder.populate(&mut names, None).await.is_success());

    let rows = seeder
        .connection()
        .fetch_strings("SELECT product_name FROM product ORDER BY product_id")
        .await
        .unwrap();
    seeder.close().await;

    assert_eq!(rows.len(), 4);
    for (row, word) in rows.iter().zip(["lorem", "ipsum", "lorem", "ipsum"]) {
        let (head, tail) = row.rsplit_once(' ').unwrap();
        assert_eq!(head, word);
        assert_eq!(category_of(row), Some(tail));
    }
}

#[tokio::test]
async fn test_populate_failure_rolls_back_every_row() {
    let mut seeder = Seeder::connect("sqlite::memory:")
        .await
        .unwrap()
        .with_row_count(300);

    // A constraint that only row 150 (the second batch) violates.
    seeder
        .connection()
        .execute_in_transaction([
            "CREATE TABLE product (\
                product_id INTEGER PRIMARY KEY AUTOINCREMENT, \
                product_name VARCHAR(255) NOT NULL CHECK (product_name NOT LIKE 'boom %'))",
        ])
        .await
        .unwrap();

    let words = std::iter::repeat("fine").take(149).chain(["boom"]);
    let mut names = NameGenerator::new(ScriptedWords::new(words), StdRng::seed_from_u64(6));

    let outcome = seeder.populate(&mut names, None).await;
    assert!(!outcome.is_success());
    assert!(outcome
        .status_line()
        .starts_with("Error inserting product names: "));

    let verify = verify_products(seeder.connection()).await.unwrap();
    seeder.close().await;
    assert_eq!(verify.total_rows, 0);
}

#[tokio::test]
async fn test_failed_steps_do_not_stop_later_steps() {
    let dir = tempfile::tempdir().unwrap();
    let url = temp_db_url(&dir);

    // A view named `product` makes every step fail.
    let mut conn = SeedConnection::connect(&url).await.unwrap();
    conn.execute_in_transaction(["CREATE VIEW product AS SELECT 'x cars' AS product_name"])
        .await
        .unwrap();
    conn.close().await.unwrap();

    let report = Seeder::connect(&url)
        .await
        .unwrap()
        .with_row_count(10)
        .run(faker_names(Some(4)), None)
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| !o.is_success()));
    assert!(report.has_failures());
    assert_eq!(report.rows_inserted, 0);
    assert!(report.outcomes[0]
        .status_line()
        .starts_with("Error dropping product table: "));
}
