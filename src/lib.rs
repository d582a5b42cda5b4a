pub mod config;
pub mod db;
pub mod error;
pub mod packaging;

pub use config::{Config, Credentials};
pub use db::{Table, Value, read_sql_data, read_table};
pub use error::DataError;
pub use packaging::{PackageMetadata, get_requirements};
