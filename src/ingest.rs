//! One-time bulk load of the library tables from CSV exports
//!
//! Types are decided per column, across every row of the file. An id
//! column whose cells are all numeric is loaded as integers (floats are
//! truncated); any other column, and any id column holding a single
//! non-numeric cell, keeps its cells as text exactly as written.

use std::{fs::File, io::Read, path::Path};

use sqlx::{Sqlite, SqlitePool};

use crate::error::{AppError, AppResult};

pub const BOOKS_FILE: &str = "book.csv";
pub const CHECKOUTS_FILE: &str = "checkouts.csv";
pub const USERS_FILE: &str = "users.csv";

/// A typed CSV cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Integer(i64),
    Text(String),
}

/// Declared type of a destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
}

/// Reads a cell as an integer, truncating decimals
///
/// Returns `None` for anything that is not a plain number or that falls
/// outside the `i64` range.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    if !looks_numeric(trimmed) {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

// Rust's float parser accepts "inf" and "NaN"; only plain decimals count.
fn looks_numeric(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

/// Types one column: integers only if the column is declared integer and
/// every cell parses, otherwise the raw text of every cell
fn type_column(kind: ColumnKind, raw: &[&str]) -> Vec<Cell> {
    if kind == ColumnKind::Integer {
        let parsed: Option<Vec<i64>> = raw.iter().map(|cell| parse_integer(cell)).collect();
        if let Some(values) = parsed {
            return values.into_iter().map(Cell::Integer).collect();
        }
    }
    raw.iter().map(|cell| Cell::Text(cell.to_string())).collect()
}

/// Destination table for one CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Books,
    Checkouts,
    Users,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Books => "books",
            Table::Checkouts => "user_checkouts",
            Table::Users => "users",
        }
    }

    /// Column types in insert order, matching the migration
    pub fn columns(&self) -> &'static [ColumnKind] {
        use ColumnKind::{Integer, Text};
        match self {
            Table::Books => &[Integer, Text, Text, Text, Text],
            Table::Checkouts => &[Integer, Integer],
            Table::Users => &[Integer, Text, Text, Text],
        }
    }

    fn insert_sql(&self) -> &'static str {
        match self {
            Table::Books => "INSERT INTO books VALUES (?, ?, ?, ?, ?)",
            Table::Checkouts => "INSERT INTO user_checkouts VALUES (?, ?)",
            Table::Users => "INSERT INTO users VALUES (?, ?, ?, ?)",
        }
    }
}

/// Rows inserted per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub books: u64,
    pub checkouts: u64,
    pub users: u64,
}

/// Parses CSV with a header row into typed rows shaped like `table`
pub fn parse_rows<R: Read>(reader: R, table: Table, source: &str) -> AppResult<Vec<Vec<Cell>>> {
    let columns = table.columns();
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| AppError::Ingest(format!("{}: {}", source, e)))?;
        if record.len() != columns.len() {
            // Header is line 1.
            return Err(AppError::Ingest(format!(
                "{} line {}: expected {} columns, found {}",
                source,
                index + 2,
                columns.len(),
                record.len()
            )));
        }
        records.push(record);
    }

    let mut typed: Vec<std::vec::IntoIter<Cell>> = columns
        .iter()
        .enumerate()
        .map(|(position, kind)| {
            let raw: Vec<&str> = records.iter().map(|record| &record[position]).collect();
            type_column(*kind, &raw).into_iter()
        })
        .collect();

    let rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|_| typed.iter_mut().filter_map(|column| column.next()).collect())
        .collect();

    Ok(rows)
}

/// Loads one CSV stream into `table` inside a single transaction
pub async fn ingest_table<R: Read>(
    pool: &SqlitePool,
    table: Table,
    reader: R,
    source: &str,
) -> AppResult<u64> {
    let rows = parse_rows(reader, table, source)?;

    let mut tx = pool.begin().await?;
    for row in &rows {
        let mut query = sqlx::query::<Sqlite>(table.insert_sql());
        for cell in row {
            query = match cell {
                Cell::Integer(value) => query.bind(*value),
                Cell::Text(value) => query.bind(value.clone()),
            };
        }
        query.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(table = table.name(), rows = rows.len(), source = %source, "Table ingested");

    Ok(rows.len() as u64)
}

/// Loads book.csv, checkouts.csv and users.csv from `dir`
pub async fn ingest_dir(pool: &SqlitePool, dir: &Path) -> AppResult<IngestSummary> {
    let books = ingest_file(pool, Table::Books, &dir.join(BOOKS_FILE)).await?;
    let checkouts = ingest_file(pool, Table::Checkouts, &dir.join(CHECKOUTS_FILE)).await?;
    let users = ingest_file(pool, Table::Users, &dir.join(USERS_FILE)).await?;

    Ok(IngestSummary {
        books,
        checkouts,
        users,
    })
}

async fn ingest_file(pool: &SqlitePool, table: Table, path: &Path) -> AppResult<u64> {
    let file = File::open(path)
        .map_err(|e| AppError::Ingest(format!("Failed to open {}: {}", path.display(), e)))?;
    ingest_table(pool, table, file, &path.display().to_string()).await
}
