//! Book catalog: read-only list of books loaded from a tabular file on every request.

use std::path::Path;

use tracing::{debug, error, info};

use crate::data::table::{read_table, Table, TableError};

pub const NAME_COLUMN: &str = "Nome";
pub const AUTHOR_COLUMN: &str = "Autor";

/// Default catalog file, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "livros.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    pub author: String,
}

/// Load the catalog, keeping file order. Rows with neither name nor author are skipped;
/// columns other than `Nome` and `Autor` are ignored.
pub fn load_catalog(path: &Path) -> Result<Vec<Book>, TableError> {
    let table = read_table(path)?;
    debug!(path = %path.display(), columns = ?table.columns, "catalog columns");

    let name_col = table.require_column(NAME_COLUMN, path)?;
    let author_col = table.require_column(AUTHOR_COLUMN, path)?;

    let books: Vec<Book> = table
        .rows
        .iter()
        .map(|row| Book {
            name: Table::cell(row, name_col).to_string(),
            author: Table::cell(row, author_col).to_string(),
        })
        .filter(|book| !book.name.is_empty() || !book.author.is_empty())
        .collect();
    debug!(?books, "catalog records");
    Ok(books)
}

/// Load the catalog, falling back to an empty list when the file is absent or unreadable.
pub fn read_catalog(path: &Path) -> Vec<Book> {
    match load_catalog(path) {
        Ok(books) => {
            info!(count = books.len(), "catalog loaded");
            books
        }
        Err(err) if err.is_not_found() => {
            error!(path = %path.display(), "catalog file not found");
            Vec::new()
        }
        Err(err) => {
            error!(error = %err, "failed to load catalog");
            Vec::new()
        }
    }
}

/// First book whose name matches exactly (case-sensitive).
pub fn find_book<'a>(books: &'a [Book], name: &str) -> Option<&'a Book> {
    books.iter().find(|book| book.name == name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn book(name: &str, author: &str) -> Book {
        Book {
            name: name.to_string(),
            author: author.to_string(),
        }
    }

    #[test]
    fn load_catalog_keeps_file_order_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");
        fs::write(&path, "Ano,Autor,Nome\n1899,Author2,B\n1881,Author1,A\n").unwrap();

        let books = load_catalog(&path).unwrap();
        assert_eq!(books, vec![book("B", "Author2"), book("A", "Author1")]);
    }

    #[test]
    fn load_catalog_reads_xlsx_workbook_in_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Nome").unwrap();
        sheet.write_string(0, 1, "Autor").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_string(1, 1, "Author1").unwrap();
        sheet.write_number(2, 0, 1984.0).unwrap();
        sheet.write_string(2, 1, "Orwell").unwrap();
        workbook.save(&path).unwrap();

        let books = load_catalog(&path).unwrap();
        assert_eq!(books, vec![book("A", "Author1"), book("1984", "Orwell")]);
    }

    #[test]
    fn load_catalog_requires_name_and_author_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");
        fs::write(&path, "Titulo,Autor\nA,Author1\n").unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { ref column, .. } if column == "Nome"));
    }

    #[test]
    fn read_catalog_is_empty_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_catalog(&dir.path().join("livros.xlsx")).is_empty());
    }

    #[test]
    fn read_catalog_is_empty_when_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.xlsx");
        fs::write(&path, b"not a workbook").unwrap();
        assert!(read_catalog(&path).is_empty());
    }

    #[test]
    fn find_book_is_exact_case_sensitive_and_first_match() {
        let books = vec![
            book("Dom Casmurro", "Machado de Assis"),
            book("dom casmurro", "Someone Else"),
            book("Dom Casmurro", "Duplicate Entry"),
        ];
        let found = find_book(&books, "Dom Casmurro").unwrap();
        assert_eq!(found.author, "Machado de Assis");
        assert_eq!(find_book(&books, "dom casmurro").unwrap().author, "Someone Else");
        assert!(find_book(&books, "Dom Casmurro ").is_none());
    }
}
