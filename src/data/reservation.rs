//! Reservations: each submission reloads the reservation file, appends one row and
//! rewrites the whole file.
//!
//! There is no lock around the read-modify-write cycle. Two concurrent submissions can
//! both read the same file and the later write drops the earlier row.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::data::catalog::{find_book, read_catalog};
use crate::data::table::{read_table, write_table, Table, TableError};

pub const DATE_COLUMN: &str = "Data";
pub const STUDENT_COLUMN: &str = "Aluno";
pub const BOOK_COLUMN: &str = "Livro";
pub const AUTHOR_COLUMN: &str = "Autor";

pub const RESERVATION_COLUMNS: [&str; 4] = [DATE_COLUMN, STUDENT_COLUMN, BOOK_COLUMN, AUTHOR_COLUMN];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default reservation file, relative to the working directory.
pub const DEFAULT_RESERVATIONS_PATH: &str = "reservas.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub timestamp: String,
    pub student: String,
    pub book: String,
    pub author: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("book '{0}' not found in catalog")]
    BookNotFound(String),
    #[error("failed to store reservation: {0}")]
    Storage(#[from] TableError),
}

/// Column positions of an existing reservation table.
struct ReservationColumns {
    date: usize,
    student: usize,
    book: usize,
    author: usize,
}

impl ReservationColumns {
    fn find(table: &Table, path: &Path) -> Result<Self, TableError> {
        Ok(ReservationColumns {
            date: table.require_column(DATE_COLUMN, path)?,
            student: table.require_column(STUDENT_COLUMN, path)?,
            book: table.require_column(BOOK_COLUMN, path)?,
            author: table.require_column(AUTHOR_COLUMN, path)?,
        })
    }
}

fn load_reservation_table(path: &Path) -> Result<Table, TableError> {
    match read_table(path) {
        Ok(table) => Ok(table),
        Err(err) if err.is_not_found() => Ok(Table::new(RESERVATION_COLUMNS)),
        Err(err) => Err(err),
    }
}

/// All reservations in file order. An absent file holds no reservations.
pub fn load_reservations(path: &Path) -> Result<Vec<Reservation>, TableError> {
    let table = load_reservation_table(path)?;
    let cols = ReservationColumns::find(&table, path)?;
    Ok(table
        .rows
        .iter()
        .map(|row| Reservation {
            timestamp: Table::cell(row, cols.date).to_string(),
            student: Table::cell(row, cols.student).to_string(),
            book: Table::cell(row, cols.book).to_string(),
            author: Table::cell(row, cols.author).to_string(),
        })
        .collect())
}

/// Append one reservation, creating the file with the standard header when absent.
/// Extra columns of an existing file are preserved and left empty on the new row.
pub fn append_reservation(path: &Path, reservation: &Reservation) -> Result<(), TableError> {
    if !path.exists() {
        info!(path = %path.display(), "creating new reservation file");
    }
    let mut table = load_reservation_table(path)?;
    let cols = ReservationColumns::find(&table, path)?;

    let mut row = vec![String::new(); table.columns.len()];
    row[cols.date] = reservation.timestamp.clone();
    row[cols.student] = reservation.student.clone();
    row[cols.book] = reservation.book.clone();
    row[cols.author] = reservation.author.clone();
    table.rows.push(row);

    write_table(path, &table)
}

/// Reserve `book_name` for `student`, stamped with the current local time.
pub fn reserve(
    catalog_path: &Path,
    reservations_path: &Path,
    student: &str,
    book_name: &str,
) -> Result<Reservation, ReservationError> {
    reserve_at(
        catalog_path,
        reservations_path,
        student,
        book_name,
        Local::now().naive_local(),
    )
}

pub fn reserve_at(
    catalog_path: &Path,
    reservations_path: &Path,
    student: &str,
    book_name: &str,
    now: NaiveDateTime,
) -> Result<Reservation, ReservationError> {
    let books = read_catalog(catalog_path);
    let Some(book) = find_book(&books, book_name) else {
        warn!(book = book_name, "book not found");
        return Err(ReservationError::BookNotFound(book_name.to_string()));
    };

    let reservation = Reservation {
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        student: student.to_string(),
        book: book.name.clone(),
        author: book.author.clone(),
    };
    append_reservation(reservations_path, &reservation)?;
    info!(?reservation, "reservation added");
    Ok(reservation)
}
