use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::TVError;
use crate::extract::extract_table;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    HTML,
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub file_type: FileType,
}

/// The row model of a preview: column names plus row-major cell values.
///
/// Rows may be shorter than the header; missing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: String::new(),
            columns,
            rows,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncolumns(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Resolve a column either by its 0-based index or by its (case-insensitive) name.
    pub fn column_index(&self, key: &str) -> Result<usize, TVError> {
        let key = key.trim();
        if let Ok(idx) = key.parse::<usize>()
            && idx < self.columns.len()
        {
            return Ok(idx);
        }
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(key))
            .ok_or_else(|| TVError::InvalidColumn(key.to_string()))
    }

    pub fn load(path: PathBuf) -> Result<Self, TVError> {
        let file_info = Table::get_file_info(path)?;
        let start_time = Instant::now();

        let table = match file_info.file_type {
            FileType::HTML => extract_table(&fs::read_to_string(&file_info.path)?)?,
            FileType::CSV => Table::from_frame(Table::load_csv(&file_info.path)?)?,
            FileType::PARQUET => Table::from_frame(Table::load_parquet(&file_info.path)?)?,
            FileType::ARROW => Table::from_frame(Table::load_arrow(&file_info.path)?)?,
        };

        let name = file_info
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        info!(
            "Loaded {} ({} bytes, {:?}) with {} rows x {} columns in {}ms",
            name,
            file_info.file_size,
            file_info.file_type,
            table.nrows(),
            table.ncolumns(),
            start_time.elapsed().as_millis()
        );
        Ok(table.with_name(name))
    }

    // Each column is stringified in its own rayon task, then transposed into rows.
    fn from_frame(frame: LazyFrame) -> Result<Self, TVError> {
        let df = Arc::new(frame.collect()?);
        let c_: Result<Vec<(String, Vec<String>)>, _> = df
            .get_column_names()
            .par_iter()
            .map(|name| Self::load_column(&df, name))
            .collect();
        let columns = c_?;

        let nrows = df.height();
        let mut rows = vec![Vec::with_capacity(columns.len()); nrows];
        for (_, data) in columns.iter() {
            for (row, value) in rows.iter_mut().zip(data.iter()) {
                row.push(value.clone());
            }
        }
        for (name, data) in columns.iter() {
            debug!("Column: \"{}\", # rows {}", name, data.len());
        }

        Ok(Table::new(
            columns.into_iter().map(|(name, _)| name).collect(),
            rows,
        ))
    }

    fn load_column(df: &DataFrame, col_name: &str) -> Result<(String, Vec<String>), PolarsError> {
        let col = df.column(col_name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let data = series
            .into_iter()
            .map(|value| match value {
                Some(s) => s.replace("\r\n", " ↵ ").replace('\n', " ↵ "),
                None => String::new(),
            })
            .collect();
        Ok((col_name.to_string(), data))
    }

    pub fn detect_file_type(path: &Path) -> Result<FileType, TVError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("HTML") | Some("HTM") => Ok(FileType::HTML),
            Some("CSV") => Ok(FileType::CSV),
            Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
            Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
            _ => Err(TVError::UnknownFileType),
        }
    }

    fn get_file_info(path: PathBuf) -> Result<FileInfo, TVError> {
        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TVError::FileNotFound,
            ErrorKind::PermissionDenied => TVError::PermissionDenied,
            _ => TVError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(TVError::LoadingFailed("Not a file!".into()));
        }

        let file_size = metadata.len();
        let file_type = Table::detect_file_type(&path)?;

        Ok(FileInfo {
            path,
            file_size,
            file_type,
        })
    }

    fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.into()))
            .with_has_header(true)
            .finish()
    }

    fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
    }

    fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_ipc(
            PlPath::Local(path.into()),
            polars::io::ipc::IpcScanOptions,
            UnifiedScanArgs::default(),
        )
    }
}
