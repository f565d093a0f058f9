pub mod controller;
pub mod dialog;
pub mod domain;
pub mod extract;
pub mod filter;
pub mod inputter;
pub mod logging;
pub mod model;
pub mod options;
pub mod pagination;
pub mod render;
pub mod search;
pub mod session;
pub mod sort;
pub mod state;
pub mod table;
pub mod ui;

pub use dialog::{DialogAction, DialogOutcome, FilterDialog};
pub use domain::{ROWS_PER_PAGE, TVConfig, TVError};
pub use extract::extract_table;
pub use filter::{ColumnFilter, FilterOperator, FilterSpec, row_matches_filters};
pub use options::PreviewOptions;
pub use pagination::PageTarget;
pub use session::{LoadOutcome, LoadTicket, PreviewSlot};
pub use state::TableState;
pub use table::Table;
