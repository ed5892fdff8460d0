//! Write path: decoded sheets into store tables.

use crate::error::{Error, Result};
use crate::schema;
use crate::sheet::{decode_sheet, Workbook};
use crate::statement::{build_insert_sql, truncate_sql};
use crate::table::FixtureTable;
use duckdb::Connection;
use log::{debug, info};

/// Loads fixture sheets into an open connection or transaction.
///
/// Nothing here commits; the caller owns the transaction boundary.
pub struct SheetLoader<'a> {
    conn: &'a Connection,
    auto_complete_not_null: bool,
}

impl<'a> SheetLoader<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            auto_complete_not_null: false,
        }
    }

    /// Fill required columns missing from a sheet with their type default.
    pub fn auto_complete_not_null(mut self, enabled: bool) -> Self {
        self.auto_complete_not_null = enabled;
        self
    }

    /// Decode `sheet` and replace the contents of its table.
    ///
    /// Errors are attributed to the sheet. Returns the loaded table.
    pub fn load_sheet(&self, book: &mut dyn Workbook, sheet: &str) -> Result<FixtureTable> {
        self.load_sheet_inner(book, sheet)
            .map_err(|e| e.in_sheet(sheet))
    }

    fn load_sheet_inner(&self, book: &mut dyn Workbook, sheet: &str) -> Result<FixtureTable> {
        let mut table = decode_sheet(book, sheet)?;

        if self.auto_complete_not_null {
            let defaults = schema::required_defaults(self.conn, &table.name)?;
            table.merge_defaults(&defaults);
        }

        let rows = replace_table(self.conn, &table)?;
        info!("Loaded sheet {} into {} ({} rows)", sheet, table.name, rows);
        Ok(table)
    }
}

/// Truncate `table.name` and insert every row of `table` in one statement.
///
/// Returns the number of rows inserted.
pub fn replace_table(conn: &Connection, table: &FixtureTable) -> Result<usize> {
    conn.execute_batch(&truncate_sql(&table.name))
        .map_err(Error::store(format!("truncate table {}", table.name)))?;

    insert_rows(conn, table)
}

fn insert_rows(conn: &Connection, table: &FixtureTable) -> Result<usize> {
    let Some(sql) = build_insert_sql(table) else {
        return Ok(0);
    };

    debug!("{}", sql);
    conn.execute_batch(&sql)
        .map_err(Error::store(format!("insert data to {}", table.name)))?;
    Ok(table.row_count())
}

/// Rows supplied directly by the caller instead of a sheet
#[derive(Debug, Clone, Default)]
pub struct LoadRawRequest {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Insert caller-supplied rows without truncating and without committing.
///
/// Uses the same cell encoding as sheet loads. Returns the number of rows
/// inserted.
pub fn load_raw(conn: &Connection, request: &LoadRawRequest) -> Result<usize> {
    let table = FixtureTable::new(
        request.table.clone(),
        request.columns.clone(),
        request.rows.clone(),
    );
    insert_rows(conn, &table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemoryBook;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE company (
                company_cd VARCHAR PRIMARY KEY,
                company_name VARCHAR NOT NULL,
                founded_year INTEGER
            );",
        )
        .unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    fn sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
        let mut grid = vec![vec![], vec!["company".to_string()]];
        grid.resize(8, Vec::new());
        grid.extend(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<_>>()),
        );
        grid
    }

    #[test]
    fn test_load_sheet_replaces_contents() {
        let conn = store();
        conn.execute_batch("INSERT INTO company VALUES ('old', 'Old', 1900);")
            .unwrap();

        let mut book = MemoryBook::new().with_sheet(
            "company",
            sheet(&[
                &["No", "company_cd", "company_name", "founded_year"],
                &["1", "0001", "Future", "1989"],
                &["2", "0002", "YDC", ""],
            ]),
        );

        let table = SheetLoader::new(&conn)
            .load_sheet(&mut book, "company")
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(count(&conn, "company"), 2);

        let founded: Option<i32> = conn
            .query_row(
                "SELECT founded_year FROM company WHERE company_cd = '0002'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(founded, None);
    }

    #[test]
    fn test_load_sheet_auto_completes_required_columns() {
        let conn = store();
        let mut book = MemoryBook::new().with_sheet(
            "company",
            sheet(&[&["No", "company_cd"], &["1", "0001"]]),
        );

        let err = SheetLoader::new(&conn)
            .load_sheet(&mut book, "company")
            .unwrap_err();
        assert_eq!(err.sheet(), Some("company"));
        assert_eq!(err.kind(), "store");

        SheetLoader::new(&conn)
            .auto_complete_not_null(true)
            .load_sheet(&mut book, "company")
            .unwrap();
        let name: String = conn
            .query_row("SELECT company_name FROM company", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "x");
    }

    #[test]
    fn test_empty_sheet_only_truncates() {
        let conn = store();
        conn.execute_batch("INSERT INTO company VALUES ('old', 'Old', 1900);")
            .unwrap();
        let mut book = MemoryBook::new().with_sheet(
            "company",
            sheet(&[&["No", "company_cd", "company_name"]]),
        );

        SheetLoader::new(&conn)
            .load_sheet(&mut book, "company")
            .unwrap();
        assert_eq!(count(&conn, "company"), 0);
    }

    #[test]
    fn test_load_raw_appends() {
        let conn = store();
        conn.execute_batch("INSERT INTO company VALUES ('old', 'Old', 1900);")
            .unwrap();

        let inserted = load_raw(
            &conn,
            &LoadRawRequest {
                table: "company".to_string(),
                columns: vec!["company_cd".to_string(), "company_name".to_string()],
                rows: vec![vec!["0001".to_string(), "Future".to_string()]],
            },
        )
        .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(count(&conn, "company"), 2);
    }

    #[test]
    fn test_load_raw_inside_transaction_is_not_committed() {
        let mut conn = store();
        {
            let tx = conn.transaction().unwrap();
            load_raw(
                &tx,
                &LoadRawRequest {
                    table: "company".to_string(),
                    columns: vec!["company_cd".to_string(), "company_name".to_string()],
                    rows: vec![vec!["0001".to_string(), "Future".to_string()]],
                },
            )
            .unwrap();
            assert_eq!(count(&tx, "company"), 1);
        }
        assert_eq!(count(&conn, "company"), 0);
    }
}
