//! Append-only sheet store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Address one sheet inside a named document.
//! - Append ordered field values and list every row keyed by column name.
//!
//! # Invariants
//! - A sheet's header is fixed when the sheet is created.
//! - `append_row` rejects value counts that differ from the header.
//! - `read_all` returns rows in append order.

use crate::db::DbError;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// One stored row keyed by header column name.
pub type SheetRow = BTreeMap<String, String>;

/// Row store error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Document or sheet name is blank.
    InvalidAddress(String),
    /// Sheet does not exist in the document.
    SheetNotFound { document: String, sheet: String },
    /// Existing sheet header differs from the requested one.
    HeaderMismatch {
        expected: Vec<String>,
        stored: Vec<String>,
    },
    /// Appended value count differs from the header width.
    FieldCountMismatch { expected: usize, actual: usize },
    /// Persisted state cannot be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidAddress(message) => write!(f, "invalid sheet address: {message}"),
            Self::SheetNotFound { document, sheet } => {
                write!(f, "sheet `{sheet}` not found in document `{document}`")
            }
            Self::HeaderMismatch { expected, stored } => write!(
                f,
                "sheet header mismatch: expected [{}], stored [{}]",
                expected.join(", "),
                stored.join(", ")
            ),
            Self::FieldCountMismatch { expected, actual } => write!(
                f,
                "row has {actual} fields but sheet header has {expected} columns"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted sheet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Append-only, row-oriented store bound to one sheet.
pub trait RowStore {
    /// Header columns in write order.
    fn columns(&self) -> &[String];
    /// Appends one row of values in header order.
    fn append_row(&self, values: &[String]) -> RepoResult<()>;
    /// Lists all rows in append order.
    fn read_all(&self) -> RepoResult<Vec<SheetRow>>;
}

impl<T: RowStore + ?Sized> RowStore for &T {
    fn columns(&self) -> &[String] {
        (**self).columns()
    }

    fn append_row(&self, values: &[String]) -> RepoResult<()> {
        (**self).append_row(values)
    }

    fn read_all(&self) -> RepoResult<Vec<SheetRow>> {
        (**self).read_all()
    }
}

/// SQLite-backed sheet.
#[derive(Debug)]
pub struct SqliteSheetStore<'conn> {
    conn: &'conn Connection,
    document: String,
    sheet: String,
    columns: Vec<String>,
}

impl<'conn> SqliteSheetStore<'conn> {
    /// Opens a sheet, creating it with `columns` as header when missing.
    ///
    /// An existing sheet must carry exactly the same header.
    pub fn open_or_create(
        conn: &'conn Connection,
        document: &str,
        sheet: &str,
        columns: &[&str],
    ) -> RepoResult<Self> {
        let (document, sheet) = normalize_address(document, sheet)?;
        let expected: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        if expected.is_empty() {
            return Err(RepoError::InvalidAddress(
                "sheet header needs at least one column".to_string(),
            ));
        }

        match load_header(conn, &document, &sheet)? {
            Some(stored) if stored != expected => {
                error!(
                    "event=sheet_open module=repo status=error error_code=header_mismatch stored_columns={} expected_columns={}",
                    stored.len(),
                    expected.len()
                );
                return Err(RepoError::HeaderMismatch { expected, stored });
            }
            Some(_) => {}
            None => {
                conn.execute(
                    "INSERT INTO sheets (document, sheet, columns) VALUES (?1, ?2, ?3);",
                    params![document, sheet, encode_cells(&expected)?],
                )?;
                info!(
                    "event=sheet_create module=repo status=ok columns={}",
                    expected.len()
                );
            }
        }

        Ok(Self {
            conn,
            document,
            sheet,
            columns: expected,
        })
    }

    /// Attaches to an existing sheet using its stored header.
    pub fn attach(conn: &'conn Connection, document: &str, sheet: &str) -> RepoResult<Self> {
        let (document, sheet) = normalize_address(document, sheet)?;
        let columns = load_header(conn, &document, &sheet)?.ok_or_else(|| {
            RepoError::SheetNotFound {
                document: document.clone(),
                sheet: sheet.clone(),
            }
        })?;
        Ok(Self {
            conn,
            document,
            sheet,
            columns,
        })
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sheet_rows WHERE document = ?1 AND sheet = ?2;",
            params![self.document, self.sheet],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

impl RowStore for SqliteSheetStore<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn append_row(&self, values: &[String]) -> RepoResult<()> {
        if values.len() != self.columns.len() {
            return Err(RepoError::FieldCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        self.conn.execute(
            "INSERT INTO sheet_rows (document, sheet, cells) VALUES (?1, ?2, ?3);",
            params![self.document, self.sheet, encode_cells(values)?],
        )?;
        Ok(())
    }

    fn read_all(&self) -> RepoResult<Vec<SheetRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cells FROM sheet_rows
             WHERE document = ?1 AND sheet = ?2
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![self.document, self.sheet])?;
        let mut out: Vec<SheetRow> = Vec::new();

        while let Some(row) = rows.next()? {
            let id: i64 = row.get("id")?;
            let cells_text: String = row.get("cells")?;
            let cells = decode_cells(&cells_text)?;
            if cells.len() != self.columns.len() {
                return Err(RepoError::InvalidData(format!(
                    "row {id} has {} cells but header has {} columns",
                    cells.len(),
                    self.columns.len()
                )));
            }
            out.push(self.columns.iter().cloned().zip(cells).collect());
        }

        Ok(out)
    }
}

fn normalize_address(document: &str, sheet: &str) -> RepoResult<(String, String)> {
    let document = document.trim();
    let sheet = sheet.trim();
    if document.is_empty() {
        return Err(RepoError::InvalidAddress("document name is blank".to_string()));
    }
    if sheet.is_empty() {
        return Err(RepoError::InvalidAddress("sheet name is blank".to_string()));
    }
    Ok((document.to_string(), sheet.to_string()))
}

fn load_header(conn: &Connection, document: &str, sheet: &str) -> RepoResult<Option<Vec<String>>> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT columns FROM sheets WHERE document = ?1 AND sheet = ?2;",
            params![document, sheet],
            |row| row.get(0),
        )
        .optional()?;
    stored.map(|text| decode_cells(&text)).transpose()
}

fn encode_cells(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode cells: {err}")))
}

fn decode_cells(text: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("failed to decode cells `{text}`: {err}")))
}
