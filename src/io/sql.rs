use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction};

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;

/// Run a query against a SQLite database and collect the result as text cells.
///
/// NULL becomes an empty cell.
pub fn read_sql<P: AsRef<Path>>(query: &str, db_path: P) -> Result<DataFrame> {
    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare(query)?;

    let column_names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
    let n_cols = column_names.len();

    let mut records = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(n_cols);
        for idx in 0..n_cols {
            let cell = match row.get::<_, Value>(idx)? {
                Value::Null => String::new(),
                Value::Integer(i) => i.to_string(),
                Value::Real(f) => f.to_string(),
                Value::Text(s) => s,
                Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
            };
            record.push(cell);
        }
        records.push(record);
    }

    DataFrame::from_records(column_names, records)
}

/// Replace SQLite tables with DataFrames in a single transaction.
///
/// Existing tables are dropped and recreated. Either every table is written
/// or, on error, none of them changes.
pub fn write_tables<P: AsRef<Path>>(tables: &[(&str, &DataFrame)], db_path: P) -> Result<()> {
    let mut conn = Connection::open(db_path)?;
    let tx = conn.transaction()?;
    for (table_name, df) in tables {
        write_table(&tx, df, table_name)?;
    }
    tx.commit()?;
    Ok(())
}

fn write_table(tx: &Transaction<'_>, df: &DataFrame, table_name: &str) -> Result<()> {
    tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table_name)), [])?;
    create_table_from_df(tx, df, table_name)?;

    let column_names = df.column_names();
    let columns: Vec<String> = column_names.iter().map(|c| quote_ident(c)).collect();
    let placeholders = vec!["?"; column_names.len()].join(", ");
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table_name),
        columns.join(", "),
        placeholders
    );

    let sql_types: Vec<SqlType> = column_names
        .iter()
        .map(|c| infer_sql_type(df.get_column(c).unwrap_or_default()))
        .collect();

    let mut stmt = tx.prepare(&insert_sql)?;
    for row_idx in 0..df.row_count() {
        let row = match df.row(row_idx) {
            Some(row) => row,
            None => continue,
        };
        let values = row
            .iter()
            .zip(&sql_types)
            .map(|(cell, sql_type)| to_sql_value(cell, *sql_type));
        stmt.execute(params_from_iter(values))?;
    }

    log::debug!("loaded {} row(s) into table {}", df.row_count(), table_name);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    fn name(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

fn create_table_from_df(tx: &Transaction<'_>, df: &DataFrame, table_name: &str) -> Result<()> {
    let columns: Vec<String> = df
        .column_names()
        .iter()
        .map(|c| {
            let sql_type = infer_sql_type(df.get_column(c).unwrap_or_default());
            format!("{} {}", quote_ident(c), sql_type.name())
        })
        .collect();

    let create_sql = format!("CREATE TABLE {} ({})", quote_ident(table_name), columns.join(", "));
    tx.execute(&create_sql, [])?;
    Ok(())
}

/// Column type from its cells; blanks do not count against a numeric type
fn infer_sql_type(cells: &[String]) -> SqlType {
    let present: Vec<&str> = cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if present.is_empty() {
        SqlType::Text
    } else if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        SqlType::Integer
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        SqlType::Real
    } else {
        SqlType::Text
    }
}

fn to_sql_value(cell: &str, sql_type: SqlType) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    match sql_type {
        SqlType::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Null),
        SqlType::Real => match NA::parse_cell(cell) {
            Ok(NA::Value(v)) => Value::Real(v),
            _ => Value::Null,
        },
        SqlType::Text => Value::Text(cell.to_string()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
