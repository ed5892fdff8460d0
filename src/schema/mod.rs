//! Store metadata used by fixtures.
//!
//! This module provides:
//! - Primary key lookup, joined into the ORDER BY expression used for pairing
//! - Not-null columns without a default, for completing partial fixtures
//! - Column listings for template dumps

mod defaults;

pub use defaults::{default_literal, normalize_type};

use crate::error::SchemaError;
use crate::table::DefaultColumn;
use duckdb::types::Value;
use duckdb::Connection;
use log::warn;

const PRIMARY_KEY_QUERY: &str = "
SELECT constraint_column_names
FROM duckdb_constraints()
WHERE constraint_type = 'PRIMARY KEY'
  AND database_name = current_database()
  AND schema_name = current_schema()
  AND table_name = ?";

const COLUMNS_QUERY: &str = "
SELECT column_name, data_type, is_nullable, column_default
FROM information_schema.columns
WHERE table_catalog = current_database()
  AND table_schema = current_schema()
  AND table_name = ?
ORDER BY ordinal_position";

const TABLES_QUERY: &str = "
SELECT table_name
FROM information_schema.tables
WHERE table_catalog = current_database()
  AND table_schema = current_schema()
  AND table_type = 'BASE TABLE'
ORDER BY table_name";

/// Column metadata as reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    /// Store type name, e.g. `INTEGER` or `DECIMAL(10,2)`
    pub data_type: String,
    pub nullable: bool,
    pub has_default: bool,
}

impl ColumnMetadata {
    /// Not-null columns without a default must be supplied by every insert.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

/// Primary key columns in index-column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// ORDER BY expression pairing rows by key
    pub fn order_by(&self) -> String {
        self.columns.join(", ")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Look up the primary key of `table`.
pub fn primary_key(conn: &Connection, table: &str) -> Result<PrimaryKey, SchemaError> {
    let query_err = |source: duckdb::Error| SchemaError::Query {
        table: table.to_string(),
        source,
    };

    let mut stmt = conn.prepare(PRIMARY_KEY_QUERY).map_err(query_err)?;
    let mut rows = stmt.query([table]).map_err(query_err)?;

    let Some(row) = rows.next().map_err(query_err)? else {
        return Err(SchemaError::NoPrimaryKey {
            table: table.to_string(),
        });
    };

    let columns = match row.get::<_, Value>(0).map_err(query_err)? {
        Value::List(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Text(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    if columns.is_empty() {
        return Err(SchemaError::NoPrimaryKey {
            table: table.to_string(),
        });
    }
    Ok(PrimaryKey { columns })
}

/// All columns of `table` in ordinal order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnMetadata>, SchemaError> {
    let query_err = |source: duckdb::Error| SchemaError::Query {
        table: table.to_string(),
        source,
    };

    let mut stmt = conn.prepare(COLUMNS_QUERY).map_err(query_err)?;
    let columns = stmt
        .query_map([table], |row| {
            let is_nullable: String = row.get(2)?;
            let column_default: Option<String> = row.get(3)?;
            Ok(ColumnMetadata {
                name: row.get(0)?,
                data_type: row.get(1)?,
                nullable: is_nullable.eq_ignore_ascii_case("YES"),
                has_default: column_default.is_some(),
            })
        })
        .map_err(query_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_err)?;

    Ok(columns)
}

/// Not-null columns of `table` that have no column default.
pub fn not_null_columns(
    conn: &Connection,
    table: &str,
) -> Result<Vec<ColumnMetadata>, SchemaError> {
    Ok(table_columns(conn, table)?
        .into_iter()
        .filter(ColumnMetadata::is_required)
        .collect())
}

/// Default values for the required columns of `table`.
///
/// Columns whose type has no default literal are left out; the insert then
/// fails on the missing value unless the sheet supplies it.
pub fn required_defaults(conn: &Connection, table: &str) -> Result<Vec<DefaultColumn>, SchemaError> {
    let mut defaults = Vec::new();
    for column in not_null_columns(conn, table)? {
        match default_literal(&column.data_type) {
            Some(literal) => defaults.push(DefaultColumn::new(column.name, literal)),
            None => warn!(
                "No default value for {}.{} of type {}",
                table, column.name, column.data_type
            ),
        }
    }
    Ok(defaults)
}

/// Base tables of the current schema, sorted by name.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>, SchemaError> {
    let query_err = |source: duckdb::Error| SchemaError::Query {
        table: "*".to_string(),
        source,
    };

    let mut stmt = conn.prepare(TABLES_QUERY).map_err(query_err)?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(query_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_err)?;
    Ok(tables)
}
