//! SQLite-backed tabular store.
//!
//! rusqlite is synchronous, so every call runs on the blocking pool via
//! `tokio::task::spawn_blocking`. Dropping a call's future (for example when
//! a timeout fires) interrupts its statement so the connection is freed for
//! the next call.

use async_trait::async_trait;
use council_application::ports::tabular_store::{StoreError, TabularStore};
use council_domain::{Cell, Table, TableProfile};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, InterruptHandle, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Quote an identifier for interpolation into SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;
const DONE: u8 = 3;

/// Interrupts the call's statement if the awaiting future is dropped early.
///
/// The state moves PENDING -> RUNNING -> DONE inside the blocking task while
/// it holds the connection lock, so an interrupt only ever hits this call's
/// own statement.
struct CancelOnDrop {
    state: Arc<AtomicU8>,
    interrupt: Arc<InterruptHandle>,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.state.swap(CANCELLED, Ordering::SeqCst) == RUNNING {
            debug!("Interrupting abandoned store call");
            self.interrupt.interrupt();
        }
    }
}

/// Read-only store over one SQLite database file
pub struct SqliteTableStore {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl SqliteTableStore {
    /// Open an existing database read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Open(format!("{}: {}", path.display(), e)))?;
        info!("Opened tabular store {}", path.display());
        let interrupt = Arc::new(conn.get_interrupt_handle());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        })
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let guard = CancelOnDrop {
            state: Arc::new(AtomicU8::new(PENDING)),
            interrupt: Arc::clone(&self.interrupt),
        };
        let state = Arc::clone(&guard.state);

        let result = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Task(format!("connection lock poisoned: {}", e)))?;
            if state
                .compare_exchange(PENDING, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(StoreError::Task("call abandoned before it started".to_string()));
            }
            let result = work(&conn);
            state.store(DONE, Ordering::SeqCst);
            result
        })
        .await;

        guard.state.store(DONE, Ordering::SeqCst);
        result.map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn query_error(e: rusqlite::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(r) => Cell::Real(r),
        ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Cell::Text(format!("<blob {} bytes>", bytes.len())),
    }
}

/// Run `sql` and collect every row
fn read_table(conn: &Connection, sql: &str) -> Result<Table, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(query_error)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([]).map_err(query_error)?;
    while let Some(row) = cursor.next().map_err(query_error)? {
        let cells = (0..width)
            .map(|i| row.get_ref(i).map(to_cell))
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;
        rows.push(cells);
    }

    Table::new(columns, rows).map_err(|e| StoreError::Query(e.to_string()))
}

#[async_trait]
impl TabularStore for SqliteTableStore {
    async fn run_query(&self, query: &str) -> Result<Table, StoreError> {
        let sql = query.to_string();
        let table = self
            .blocking(move |conn| read_table(conn, &sql))
            .await?
            .with_temporal_columns();
        debug!("Store returned {} rows", table.row_count());
        Ok(table)
    }

    async fn distinct_values(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<Option<String>>, StoreError> {
        let sql = format!(
            "SELECT DISTINCT {} FROM {}",
            quote_identifier(column),
            quote_identifier(table)
        );
        let result = self.blocking(move |conn| read_table(conn, &sql)).await?;
        Ok(result
            .rows()
            .iter()
            .map(|row| row.first().and_then(Cell::to_text))
            .collect())
    }

    async fn describe(&self, table: &str) -> Result<TableProfile, StoreError> {
        let name = table.to_string();
        self.blocking(move |conn| {
            let info = read_table(
                conn,
                &format!("PRAGMA table_info({})", quote_identifier(&name)),
            )?;
            if info.is_empty() {
                return Err(StoreError::UnknownTable(name));
            }

            let mut profile = TableProfile::new(name.clone());
            for row in info.rows() {
                let column = row.get(1).and_then(Cell::to_text).unwrap_or_default();
                let declared = row.get(2).and_then(Cell::to_text).unwrap_or_default();
                profile = profile.with_column(column, declared);
            }

            let samples = read_table(
                conn,
                &format!(
                    "SELECT * FROM {} LIMIT {}",
                    quote_identifier(&name),
                    TableProfile::SAMPLE_ROWS
                ),
            )?;
            Ok(profile.with_samples(samples.rows().to_vec()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::ExecuteQueryUseCase;
    use council_domain::{ColumnKind, QueryDraft, ResultClassification};
    use std::path::PathBuf;
    use std::time::Duration;

    fn seed(dir: &Path) -> PathBuf {
        let path = dir.join("sales.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE sales (
                "Region" TEXT,
                "City" TEXT,
                "Invoice Date" TEXT,
                "Units" INTEGER
            );
            INSERT INTO sales VALUES ('West', 'Pune', '2021-01-05', 10);
            INSERT INTO sales VALUES ('West', 'Mumbai', '2021-03-01', 40);
            INSERT INTO sales VALUES ('East', 'Delhi', '2021-02-11', 25);
            INSERT INTO sales VALUES ('East', NULL, NULL, 5);
            "#,
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_run_query() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTableStore::open(seed(dir.path())).unwrap();

        let table = store
            .run_query(r#"SELECT "Region", SUM("Units") AS total FROM sales GROUP BY "Region""#)
            .await
            .unwrap();
        assert_eq!(table.columns(), &["Region".to_string(), "total".to_string()]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_kind(1), ColumnKind::Numeric);
    }

    #[tokio::test]
    async fn test_dates_become_temporal() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTableStore::open(seed(dir.path())).unwrap();

        let table = store
            .run_query(r#"SELECT "Invoice Date" FROM sales"#)
            .await
            .unwrap();
        assert_eq!(table.column_kind(0), ColumnKind::Temporal);
    }

    #[tokio::test]
    async fn test_errors_and_writes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTableStore::open(seed(dir.path())).unwrap();

        assert!(matches!(
            store.run_query("SELEC nonsense").await,
            Err(StoreError::Query(_))
        ));
        assert!(store.run_query("DELETE FROM sales").await.is_err());
        let table = store.run_query("SELECT * FROM sales").await.unwrap();
        assert_eq!(table.row_count(), 4);
    }

    #[tokio::test]
    async fn test_distinct_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTableStore::open(seed(dir.path())).unwrap();

        let values = store.distinct_values("sales", "City").await.unwrap();
        assert_eq!(values.len(), 4);
        assert!(values.contains(&Some("Pune".to_string())));
        assert!(values.contains(&None));

        assert!(store.distinct_values("missing", "City").await.is_err());
    }

    #[tokio::test]
    async fn test_describe() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTableStore::open(seed(dir.path())).unwrap();

        let profile = store.describe("sales").await.unwrap();
        let names: Vec<_> = profile.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Region", "City", "Invoice Date", "Units"]);
        assert_eq!(profile.columns[3].declared_type, "INTEGER");
        assert_eq!(profile.samples.len(), 3);

        assert!(matches!(
            store.describe("missing").await,
            Err(StoreError::UnknownTable(_))
        ));
    }

    #[tokio::test]
    async fn test_timed_out_query_frees_the_connection() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteTableStore::open(seed(dir.path())).unwrap());
        let executor = ExecuteQueryUseCase::new(Arc::clone(&store), 20, Duration::from_millis(300));

        let slow = QueryDraft::new(
            "count a lot",
            "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 300000000) \
             SELECT count(*) FROM c",
        );
        let execution = executor.classify(&slow).await;
        assert_eq!(execution.classification, ResultClassification::Empty);
        assert!(execution.fault.as_deref().unwrap().contains("300ms"));

        let quick = QueryDraft::new("two rows", "SELECT 1 AS n UNION ALL SELECT 2");
        let execution = executor.classify(&quick).await;
        assert_eq!(execution.classification, ResultClassification::Bounded);
        assert_eq!(execution.row_count, 2);
        assert!(execution.fault.is_none());

        let values = store.distinct_values("sales", "Region").await.unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SqliteTableStore::open(dir.path().join("absent.db")),
            Err(StoreError::Open(_))
        ));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Invoice Date"), "\"Invoice Date\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
