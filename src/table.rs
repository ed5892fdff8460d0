//! In-memory fixture table.

/// A table decoded from one fixture sheet.
///
/// `Clone` is a deep copy: columns and every row get their own storage, so a
/// copy can be retargeted and loaded without touching the original.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixtureTable {
    /// Destination table name
    pub name: String,
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Cell values, one entry per column
    pub rows: Vec<Vec<String>>,
}

/// A column to append when a fixture omits it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultColumn {
    pub name: String,
    pub literal: String,
}

impl DefaultColumn {
    pub fn new(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literal: literal.into(),
        }
    }
}

impl FixtureTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append every default column the table does not define yet.
    ///
    /// Columns already present keep their sheet values. New columns go to the
    /// end in `defaults` order and every row receives the default literal.
    pub fn merge_defaults(&mut self, defaults: &[DefaultColumn]) {
        for default in defaults {
            if self.columns.iter().any(|c| c == &default.name) {
                continue;
            }
            self.columns.push(default.name.clone());
            for row in &mut self.rows {
                row.push(default.literal.clone());
            }
        }
    }

    /// Deep copy bound to another table name.
    pub fn with_name(&self, name: impl Into<String>) -> FixtureTable {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }
}
