use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

use crate::session::LoadTicket;
use crate::table::Table;

/// Number of rows shown on a single page of the preview.
pub const ROWS_PER_PAGE: usize = 30;

#[derive(Debug)]
pub enum TVError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    NoTable,
    InvalidPage(String),
    InvalidFilter(String),
    InvalidColumn(String),
}

impl fmt::Display for TVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TVError::IoError(e) => write!(f, "io error: {e}"),
            TVError::PolarsError(e) => write!(f, "failed to read data: {e}"),
            TVError::LoadingFailed(reason) => write!(f, "loading failed: {reason}"),
            TVError::FileNotFound => write!(f, "file not found"),
            TVError::PermissionDenied => write!(f, "permission denied"),
            TVError::UnknownFileType => write!(f, "unknown file type"),
            TVError::NoTable => write!(f, "no <table> element found"),
            TVError::InvalidPage(p) => write!(f, "invalid page \"{p}\""),
            TVError::InvalidFilter(s) => write!(f, "invalid filter \"{s}\""),
            TVError::InvalidColumn(c) => write!(f, "unknown column \"{c}\""),
        }
    }
}

impl std::error::Error for TVError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TVError::IoError(e) => Some(e),
            TVError::PolarsError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for TVError {
    fn from(err: Error) -> Self {
        TVError::IoError(err)
    }
}

impl From<PolarsError> for TVError {
    fn from(err: PolarsError) -> Self {
        TVError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TVConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub log_file: PathBuf,
}

impl Default for TVConfig {
    fn default() -> Self {
        TVConfig {
            event_poll_time: 100,
            max_column_width: 32,
            log_file: PathBuf::from("tpv.log"),
        }
    }
}

#[derive(Debug)]
pub enum Message {
    Quit,
    Exit,
    Enter,
    Help,
    Search,
    GotoPage,
    FilterDialog,
    ClearFilters,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    SortAscending,
    SortDescending,
    ClearSort,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    SwitchFocus,
    Delete,
    Reload,
    Resize(usize, usize),
    RawKey(KeyEvent),
    Loaded(LoadTicket, Result<Table, TVError>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CMDMode {
    Search,
    GotoPage,
    FilterValue,
}

pub const HELP_TEXT: &str = "\
 /            search all columns
 f            open filter dialog
 x            clear all filters
 n, PgDown    next page
 p, PgUp      previous page
 g, Home      first page
 G, End       last page
 :            go to page
 ←, →         select column
 s, S         sort selected column asc / desc
 u            remove sorting
 r            reload file
 ?            this help
 Esc          close popup
 q            quit

 Filter dialog
 ↑, ↓         select column / filter
 ←, →         change operator
 Enter        enter value and apply
 Tab          switch between columns and active filters
 d, Del       remove selected filter
 x            clear all filters
 Esc          close dialog";
