//! SQL generation for fixture tables.
//!
//! Cell encoding, in priority order:
//! 1. empty cell → `null`
//! 2. a name from [`PASSTHROUGH_FUNCTIONS`] → emitted as is, evaluated by the store
//! 3. anything else → wrapped in single quotes
//!
//! Values are not escaped. A cell containing `'` produces invalid SQL; the
//! sheet author is responsible for such values.

use crate::table::FixtureTable;
use std::borrow::Cow;

/// Store-side functions that may appear unquoted in a cell.
///
/// Cells are inserted verbatim when they match one of these names exactly,
/// so this list stays closed.
pub const PASSTHROUGH_FUNCTIONS: &[&str] = &["current_timestamp"];

/// Prefix of the shadow table cloned from a real table during comparison
pub const SHADOW_TABLE_PREFIX: &str = "temp_";

fn encode_cell(cell: &str) -> Cow<'_, str> {
    if cell.is_empty() {
        Cow::Borrowed("null")
    } else if PASSTHROUGH_FUNCTIONS.contains(&cell) {
        Cow::Borrowed(cell)
    } else {
        Cow::Owned(format!("'{}'", cell))
    }
}

/// Build one multi-row INSERT covering every row of `table`.
///
/// Returns `None` when the table has no rows. Rows and cells keep their
/// order.
pub fn build_insert_sql(table: &FixtureTable) -> Option<String> {
    if table.rows.is_empty() {
        return None;
    }

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES",
        table.name,
        table.columns.join(",")
    );

    for (i, row) in table.rows.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('(');
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&encode_cell(cell));
        }
        sql.push(')');
    }
    sql.push(';');

    Some(sql)
}

pub fn truncate_sql(table: &str) -> String {
    format!("TRUNCATE TABLE {};", table)
}

/// Name of the shadow table for `table`.
pub fn shadow_table_name(table: &str) -> String {
    format!("{}{}", SHADOW_TABLE_PREFIX, table)
}

/// Clone the schema of `table` into an empty, session-scoped temporary table.
pub fn create_shadow_sql(table: &str) -> String {
    format!(
        "CREATE TEMP TABLE IF NOT EXISTS {} AS SELECT * FROM {} WHERE 0 = 1;",
        shadow_table_name(table),
        table
    )
}

/// SELECT of the given columns ordered by the primary key expression.
///
/// An empty projection selects a constant so that only row counts are compared.
pub fn select_projection_sql(table: &str, columns: &[String], order_by: &str) -> String {
    let projection = if columns.is_empty() {
        "1".to_string()
    } else {
        columns.join(", ")
    };
    format!("SELECT {} FROM {} ORDER BY {};", projection, table, order_by)
}
