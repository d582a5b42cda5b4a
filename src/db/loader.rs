use crate::config::Config;
use crate::db::table::{Table, Value};
use crate::error::DataError;
use sqlx::any::{AnyRow, AnyTypeInfoKind, install_default_drivers};
use sqlx::postgres::PgRow;
use sqlx::{
    AnyConnection, Column, Connection, Executor, PgConnection, Row, Statement, TypeInfo, ValueRef,
};
use tracing::{debug, info, warn};

/// Table read by [`read_sql_data`].
pub const STUDENTS_TABLE: &str = "students";

/// Read the whole `students` table from the database described by `config`.
pub async fn read_sql_data(config: &Config) -> Result<Table, DataError> {
    info!("Reading PostgreSQL database started");
    let url = config
        .connect_url()
        .map_err(|e| DataError::wrap(sqlx::Error::Configuration(e.into())))?;
    read_table(url.as_str(), STUDENTS_TABLE).await
}

/// Read every row of `table` over a single connection to `url`.
///
/// PostgreSQL URLs go through the native driver so every column type can be
/// materialized; other backends use the `Any` driver. The connection is
/// closed before returning, whether or not the query succeeded. Connect and
/// query failures both surface as [`DataError::Load`].
pub async fn read_table(url: &str, table: &str) -> Result<Table, DataError> {
    info!(table = %table, "reading table started");

    let table = if is_postgres(url) {
        read_postgres(url, table).await?
    } else {
        read_any(url, table).await?
    };
    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "table loaded"
    );
    Ok(table)
}

fn is_postgres(url: &str) -> bool {
    url.starts_with("postgres:") || url.starts_with("postgresql:")
}

async fn read_postgres(url: &str, table: &str) -> Result<Table, DataError> {
    let mut conn = PgConnection::connect(url)
        .await
        .map_err(|e| DataError::wrap(e))?;
    info!(backend = "PostgreSQL", "Connection Established");

    let loaded = fetch_postgres_rows(&mut conn, table).await;
    close(conn).await;
    loaded.map_err(|e| DataError::wrap(e))
}

async fn read_any(url: &str, table: &str) -> Result<Table, DataError> {
    install_default_drivers();
    let mut conn = AnyConnection::connect(url)
        .await
        .map_err(|e| DataError::wrap(e))?;
    info!(backend = conn.backend_name(), "Connection Established");

    let loaded = fetch_any_rows(&mut conn, table).await;
    close(conn).await;
    loaded.map_err(|e| DataError::wrap(e))
}

async fn close<C: Connection>(conn: C) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close database connection");
    }
}

/// Column names come from preparing the statement so an empty table still
/// reports its schema. Rows are fetched over the simple query protocol, which
/// returns every value as text.
async fn fetch_postgres_rows(conn: &mut PgConnection, table: &str) -> Result<Table, sqlx::Error> {
    let sql = select_all(table);
    debug!(sql = %sql, "executing query");

    let stmt = (&mut *conn).prepare(sql.as_str()).await?;
    let columns: Vec<String> = stmt
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let rows = sqlx::raw_sql(sql.as_str()).fetch_all(&mut *conn).await?;
    let rows = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|idx| decode_pg_cell(row, idx))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table::new(columns, rows))
}

fn decode_pg_cell(row: &PgRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Boolean(row.try_get(idx)?),
        "INT2" => Value::Integer(row.try_get::<i16, _>(idx)?.into()),
        "INT4" => Value::Integer(row.try_get::<i32, _>(idx)?.into()),
        "INT8" => Value::Integer(row.try_get(idx)?),
        "FLOAT4" => Value::Real(row.try_get::<f32, _>(idx)?.into()),
        "FLOAT8" => Value::Real(row.try_get(idx)?),
        "BYTEA" => Value::Blob(row.try_get(idx)?),
        // NUMERIC, DATE, TIMESTAMP, UUID, enums, ...: keep the server's text form.
        _ => Value::Text(row.try_get_unchecked(idx)?),
    };
    Ok(value)
}

async fn fetch_any_rows(conn: &mut AnyConnection, table: &str) -> Result<Table, sqlx::Error> {
    let sql = select_all(table);
    debug!(sql = %sql, "executing query");

    let stmt = (&mut *conn).prepare(sql.as_str()).await?;
    let columns: Vec<String> = stmt
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let rows = stmt.query().fetch_all(&mut *conn).await?;
    let rows = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|idx| decode_any_cell(row, idx))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table::new(columns, rows))
}

fn select_all(table: &str) -> String {
    format!(r#"SELECT * FROM "{}""#, table.replace('"', "\"\""))
}

fn decode_any_cell(row: &AnyRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let kind = raw.type_info().kind();

    let value = match kind {
        AnyTypeInfoKind::Null => Value::Null,
        AnyTypeInfoKind::Bool => Value::Boolean(row.try_get(idx)?),
        AnyTypeInfoKind::SmallInt => Value::Integer(row.try_get::<i16, _>(idx)?.into()),
        AnyTypeInfoKind::Integer => Value::Integer(row.try_get::<i32, _>(idx)?.into()),
        AnyTypeInfoKind::BigInt => Value::Integer(row.try_get(idx)?),
        AnyTypeInfoKind::Real => Value::Real(row.try_get::<f32, _>(idx)?.into()),
        AnyTypeInfoKind::Double => Value::Real(row.try_get(idx)?),
        AnyTypeInfoKind::Text => Value::Text(row.try_get(idx)?),
        AnyTypeInfoKind::Blob => Value::Blob(row.try_get(idx)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_all_quotes_identifier() {
        assert_eq!(select_all("students"), r#"SELECT * FROM "students""#);
        assert_eq!(select_all(r#"we"ird"#), r#"SELECT * FROM "we""ird""#);
    }

    #[test]
    fn postgres_urls_use_native_driver() {
        assert!(is_postgres("postgres://u:p@db.internal/school"));
        assert!(is_postgres("postgresql:///school?user=analyst"));
        assert!(!is_postgres("sqlite::memory:"));
        assert!(!is_postgres("mysql://localhost/school"));
    }
}
