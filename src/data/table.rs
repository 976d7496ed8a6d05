//! Tabular files: a header row plus data rows, every cell rendered as a string.
//! Spreadsheets (xlsx/xls/ods) are read through calamine and `.xlsx` is written through
//! rust_xlsxwriter. CSV is read and written through csv.

use std::path::{Path, PathBuf};

use calamine::Reader;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to process csv {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("spreadsheet {} has no worksheets", .0.display())]
    EmptyWorkbook(PathBuf),
    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("unsupported tabular file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to write workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
    #[error("table does not fit in a worksheet: {}", .0.display())]
    TooLarge(PathBuf),
    #[error("only .xlsx and .csv files can be written, not {}", .0.display())]
    ReadOnlyFormat(PathBuf),
}

impl TableError {
    /// True when the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::NotFound(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Office Open XML workbook, readable and writable.
    Xlsx,
    /// Other workbook formats calamine can read but nothing here writes.
    Spreadsheet,
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(TableFormat::Xlsx),
            "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            "csv" => Ok(TableFormat::Csv),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Position of a header cell, compared after trimming surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }

    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    }

    /// Cell at `row[col]`, empty when the row is shorter than the header.
    pub fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let format = TableFormat::from_path(path)?;
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }
    match format {
        TableFormat::Xlsx | TableFormat::Spreadsheet => read_spreadsheet(path),
        TableFormat::Csv => read_csv(path),
    }
}

/// Rewrites the whole file from `table`. Only `.xlsx` and `.csv` targets are writable.
pub fn write_table(path: &Path, table: &Table) -> Result<(), TableError> {
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx => write_xlsx(path, table),
        TableFormat::Spreadsheet => Err(TableError::ReadOnlyFormat(path.to_path_buf())),
        TableFormat::Csv => write_csv(path, table),
    }
}

fn cell_str(d: &calamine::Data) -> String {
    match d {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => format!("{}", f),
        calamine::Data::Int(i) => format!("{}", i),
        calamine::Data::Bool(b) => format!("{}", b),
        other => other.to_string(),
    }
}

fn read_spreadsheet(path: &Path) -> Result<Table, TableError> {
    let spreadsheet_err = |source| TableError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut wb = calamine::open_workbook_auto(path).map_err(spreadsheet_err)?;
    let sheet_name = wb
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TableError::EmptyWorkbook(path.to_path_buf()))?;
    let range = wb.worksheet_range(&sheet_name).map_err(spreadsheet_err)?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_str).collect::<Vec<_>>());
    let columns = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    Ok(Table { columns, rows })
}

fn read_csv(path: &Path) -> Result<Table, TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let columns = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(Table { columns, rows })
}

/// Single worksheet, header in row 0, every cell written as a string.
fn write_xlsx(path: &Path, table: &Table) -> Result<(), TableError> {
    let workbook_err = |source| TableError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let too_large = || TableError::TooLarge(path.to_path_buf());

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in std::iter::once(&table.columns).chain(&table.rows).enumerate() {
        let r = u32::try_from(r).map_err(|_| too_large())?;
        for (c, value) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| too_large())?;
            sheet.write_string(r, c, value).map_err(workbook_err)?;
        }
    }
    workbook.save(path).map_err(workbook_err)
}

fn write_csv(path: &Path, table: &Table) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(&table.columns).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}
