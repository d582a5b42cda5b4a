//! Database access: loading whole tables into memory.
//!
//! Layout:
//! - `loader.rs`: connect, run `SELECT *`, close, wrap failures
//! - `table.rs`: the in-memory `Table` snapshot and its `Value` cells

pub mod loader;
pub mod table;

pub use loader::{STUDENTS_TABLE, read_sql_data, read_table};
pub use table::{Head, Table, Value};
