//! Fixtures and checks shared by the per-backend integration tests.
//!
//! Every check runs against a fresh `items` table and works on any
//! [`Connection`], so each backend file only supplies a connection and its
//! [`Dialect`].

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use testcontainers::{ContainerAsync, Image};

use metakit::{
    query_context_paginate, s_paginate, Connection, Dialect, FromRow, Metadata, QueryContext,
    Result, Row, RowExt, Select, Value,
};

// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Called on process exit; lets the container thread drop its container.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(500));
}

/// Start a container on a dedicated thread and runtime, returning its URL.
///
/// The container lives inside the thread until the process exits. The
/// `watchdog` feature covers CTRL+C and SIGTERM.
pub fn spawn_container<I, F, Fut>(start: F) -> String
where
    I: Image + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = (ContainerAsync<I>, String)>,
{
    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    let (ready_tx, ready_rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (container, url) = start().await;
            ready_tx.send(url).unwrap();

            while !SHUTDOWN.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            drop(container);
        });
    });

    ready_rx.recv().expect("container failed to start")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
}

impl FromRow for Item {
    fn from_row<R: Row>(row: &R) -> Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
        })
    }

    fn column_names() -> &'static [&'static str] {
        &["id", "name", "category"]
    }
}

pub fn category(id: i64) -> &'static str {
    if id % 2 == 0 {
        "even"
    } else {
        "odd"
    }
}

/// Recreate `items` holding ids `1..=count`.
pub async fn create_items<C: Connection>(conn: &C, count: i64) -> anyhow::Result<()> {
    conn.execute("DROP TABLE IF EXISTS items", vec![]).await?;
    conn.execute(
        "CREATE TABLE items (\
            id BIGINT PRIMARY KEY, \
            name VARCHAR(64) NOT NULL, \
            category VARCHAR(16) NOT NULL)",
        vec![],
    )
    .await?;

    if count > 0 {
        let values: Vec<String> = (1..=count)
            .map(|id| format!("({}, 'Item {}', '{}')", id, id, category(id)))
            .collect();
        let sql = format!(
            "INSERT INTO items (id, name, category) VALUES {}",
            values.join(", ")
        );
        conn.execute(&sql, vec![]).await?;
    }
    Ok(())
}

pub async fn count_items<C: Connection>(conn: &C) -> anyhow::Result<i64> {
    let mut rows = conn
        .query("SELECT COUNT(*) AS total FROM items", vec![])
        .await?;
    let row = rows.next().ok_or_else(|| anyhow::anyhow!("count returned no rows"))?;
    Ok(row.get::<i64>("total")?)
}

fn ids(items: &[Item]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}

/// Fetch one page through the bound-argument paginator.
pub async fn fetch_page<C: Connection>(
    conn: &C,
    dialect: Dialect,
    m: &mut Metadata,
) -> anyhow::Result<Vec<Item>> {
    let rows = query_context_paginate(
        &QueryContext::background(),
        conn,
        dialect,
        "SELECT id, name, category FROM items",
        m,
        vec![],
    )
    .await?;
    Ok(rows.decode()?)
}

// ============ Shared checks ============

/// Page 1 with unset size and page on 100 rows.
pub async fn check_defaults_applied<C: Connection>(
    conn: &C,
    dialect: Dialect,
) -> anyhow::Result<()> {
    create_items(conn, 100).await?;
    let total = count_items(conn).await?;

    let mut m = Metadata::new(0, 0).with_sort("id", "").with_total_rows(total);
    let items = fetch_page(conn, dialect, &mut m).await?;

    assert_eq!(m.page, 1);
    assert_eq!(m.page_size, 10);
    assert_eq!(m.sort_direction, "asc");
    assert_eq!(m.total_pages, 10);
    assert_eq!(m.offset(), 0);
    assert_eq!(ids(&items), (1..=10).collect::<Vec<_>>());
    assert_eq!(items[0].name, "Item 1");
    assert_eq!(items[0].category, "odd");
    Ok(())
}

/// Page 3 of 20 on 100 rows, and page 2 of 50 on 120 rows.
pub async fn check_middle_pages<C: Connection>(conn: &C, dialect: Dialect) -> anyhow::Result<()> {
    create_items(conn, 100).await?;
    let mut m = Metadata::new(3, 20).with_sort("id", "asc").with_total_rows(100);
    let items = fetch_page(conn, dialect, &mut m).await?;

    assert_eq!(m.total_pages, 5);
    assert_eq!(m.offset(), 40);
    assert_eq!(ids(&items), (41..=60).collect::<Vec<_>>());

    create_items(conn, 120).await?;
    let mut m = Metadata::new(2, 50).with_sort("id", "asc").with_total_rows(120);
    let items = fetch_page(conn, dialect, &mut m).await?;

    assert_eq!(m.total_pages, 3);
    assert_eq!(m.offset(), 50);
    assert_eq!(ids(&items), (51..=100).collect::<Vec<_>>());
    Ok(())
}

/// A full page returns exactly `page_size` rows, the last page the remainder,
/// and a page past the end nothing.
pub async fn check_row_counts<C: Connection>(conn: &C, dialect: Dialect) -> anyhow::Result<()> {
    create_items(conn, 120).await?;

    let mut m = Metadata::new(3, 50).with_sort("id", "asc").with_total_rows(120);
    let items = fetch_page(conn, dialect, &mut m).await?;
    assert_eq!(m.total_pages, 3);
    assert_eq!(ids(&items), (101..=120).collect::<Vec<_>>());

    let mut m = Metadata::new(1, 500).with_sort("id", "asc").with_total_rows(120);
    let items = fetch_page(conn, dialect, &mut m).await?;
    assert_eq!(m.page_size, 100);
    assert_eq!(items.len(), 100);

    let mut m = Metadata::new(9, 50).with_sort("id", "asc").with_total_rows(120);
    let items = fetch_page(conn, dialect, &mut m).await?;
    assert!(items.is_empty());
    assert_eq!(m.page, 9);
    Ok(())
}

/// Descending order and caller arguments bound ahead of the window.
pub async fn check_filtered_descending<C: Connection>(
    conn: &C,
    dialect: Dialect,
) -> anyhow::Result<()> {
    create_items(conn, 40).await?;

    let query = format!(
        "SELECT id, name, category FROM items WHERE category = {}",
        dialect.placeholder(1)
    );
    let mut m = Metadata::new(2, 5).with_sort("id", "desc").with_total_rows(20);
    let rows = query_context_paginate(
        &QueryContext::background(),
        conn,
        dialect,
        &query,
        &mut m,
        vec![Value::from("even")],
    )
    .await?;
    let items: Vec<Item> = rows.decode()?;

    assert_eq!(m.total_pages, 4);
    assert_eq!(ids(&items), vec![30, 28, 26, 24, 22]);
    assert!(items.iter().all(|item| item.category == "even"));
    Ok(())
}

/// The literal-window paginator returns the same page as the bound one.
pub async fn check_literal_matches_bound<C: Connection>(
    conn: &C,
    dialect: Dialect,
) -> anyhow::Result<()> {
    create_items(conn, 100).await?;

    let mut literal = Metadata::new(4, 15).with_sort("id", "asc").with_total_rows(100);
    let literal_items: Vec<Item> = s_paginate(
        conn,
        "SELECT id, name, category FROM items",
        &mut literal,
    )
    .await?
    .decode()?;

    let mut bound = Metadata::new(4, 15).with_sort("id", "asc").with_total_rows(100);
    let bound_items = fetch_page(conn, dialect, &mut bound).await?;

    assert_eq!(literal, bound);
    assert_eq!(literal.total_pages, 7);
    assert_eq!(literal_items, bound_items);
    assert_eq!(ids(&literal_items), (46..=60).collect::<Vec<_>>());
    Ok(())
}

/// The builder scope pages through a filtered select.
pub async fn check_select_builder<C: Connection>(
    conn: &C,
    dialect: Dialect,
) -> anyhow::Result<()> {
    create_items(conn, 30).await?;

    let mut m = Metadata::new(2, 4).with_sort("id", "asc").with_total_rows(15);
    let items: Vec<Item> = Select::of::<Item>("items")
        .filter("category = ?")
        .bind("odd")
        .order_by_metadata(&m)
        .paginate(&mut m)
        .fetch_all(conn, dialect)
        .await?;

    assert_eq!(m.total_pages, 4);
    assert_eq!(ids(&items), vec![9, 11, 13, 15]);
    Ok(())
}

/// A cancelled context never reaches the database.
pub async fn check_cancelled_context<C: Connection>(
    conn: &C,
    dialect: Dialect,
) -> anyhow::Result<()> {
    create_items(conn, 10).await?;

    let ctx = QueryContext::background();
    ctx.cancel();
    let mut m = Metadata::new(1, 5).with_sort("id", "asc");
    let result = query_context_paginate(
        &ctx,
        conn,
        dialect,
        "SELECT id, name, category FROM items",
        &mut m,
        vec![],
    )
    .await;

    assert!(matches!(result, Err(metakit::Error::Cancelled)));
    assert_eq!(m.page_size, 5);
    Ok(())
}

/// Driver errors surface unchanged after the metadata was normalized.
pub async fn check_driver_error<C: Connection>(conn: &C, dialect: Dialect) -> anyhow::Result<()> {
    let mut m = Metadata::new(0, 0);
    let result = query_context_paginate(
        &QueryContext::background(),
        conn,
        dialect,
        "SELECT * FROM missing_table",
        &mut m,
        vec![],
    )
    .await;

    assert!(result.is_err());
    assert_eq!(m.page, 1);
    assert_eq!(m.page_size, 10);
    Ok(())
}
