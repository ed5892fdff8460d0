//! Default literals for required columns, keyed by store type.
//!
//! Text types default to `x` rather than an empty string because an empty
//! cell is inserted as NULL.

use ahash::AHashMap;
use once_cell::sync::Lazy;

static DEFAULT_LITERALS: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Boolean
        ("BOOLEAN", "false"),
        ("BOOL", "false"),
        // Integers
        ("TINYINT", "0"),
        ("SMALLINT", "0"),
        ("INTEGER", "0"),
        ("INT", "0"),
        ("BIGINT", "0"),
        ("HUGEINT", "0"),
        ("UTINYINT", "0"),
        ("USMALLINT", "0"),
        ("UINTEGER", "0"),
        ("UBIGINT", "0"),
        ("INT2", "0"),
        ("INT4", "0"),
        ("INT8", "0"),
        ("OID", "0"),
        // Floating point and fixed point
        ("FLOAT", "0"),
        ("FLOAT4", "0"),
        ("FLOAT8", "0"),
        ("REAL", "0"),
        ("DOUBLE", "0"),
        ("DOUBLE PRECISION", "0"),
        ("DECIMAL", "0"),
        ("NUMERIC", "0"),
        // Text
        ("VARCHAR", "x"),
        ("CHARACTER VARYING", "x"),
        ("TEXT", "x"),
        ("STRING", "x"),
        ("CHAR", "x"),
        ("CHARACTER", "x"),
        ("BPCHAR", "x"),
        // Date and time
        ("DATE", "0001-01-01"),
        ("TIME", "00:00:00"),
        ("TIMESTAMP", "0001-01-01 00:00:00"),
        ("TIMESTAMPTZ", "0001-01-01 00:00:00"),
        ("TIMESTAMP WITH TIME ZONE", "0001-01-01 00:00:00"),
        ("INTERVAL", "00:00:00"),
        // Other
        ("UUID", "00000000-0000-0000-0000-000000000000"),
        ("JSON", "{}"),
        ("JSONB", "{}"),
        ("BLOB", "0"),
        ("BYTEA", "0"),
        ("BIT", "0"),
        ("INET", "0.0.0.0"),
    ]
    .into_iter()
    .collect()
});

/// Upper-case base type name without precision or length modifiers.
pub fn normalize_type(data_type: &str) -> String {
    data_type
        .split('(')
        .next()
        .unwrap_or(data_type)
        .trim()
        .to_uppercase()
}

/// Default literal for a store type, or `None` when the type is unsupported.
pub fn default_literal(data_type: &str) -> Option<&'static str> {
    DEFAULT_LITERALS.get(normalize_type(data_type).as_str()).copied()
}
