use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use tracing::info;

use tpv::controller::Controller;
use tpv::domain::{TVConfig, TVError};
use tpv::logging::init_logging;
use tpv::model::{Model, Status};
use tpv::options::PreviewOptions;
use tpv::render::render_preview;
use tpv::session::{LoadOutcome, PreviewSlot};
use tpv::table::Table;
use tpv::ui::TableUI;

/// Preview a table with search, column filters and pagination.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// HTML, CSV, Parquet or Arrow file to preview
    file: String,

    /// Print the preview as HTML instead of opening the interactive view
    #[arg(long)]
    print: bool,

    /// Only keep rows containing this text in any column
    #[arg(short, long)]
    search: Option<String>,

    /// Column filter, e.g. "Age:greater:28". May be given multiple times
    #[arg(short, long = "filter", value_name = "COLUMN:OPERATOR:VALUE")]
    filters: Vec<String>,

    /// Page to show: a number, "first" or "last"
    #[arg(short, long)]
    page: Option<String>,

    /// Sort by a column, append ":desc" for descending order
    #[arg(long, value_name = "COLUMN[:desc]")]
    sort: Option<String>,

    #[arg(long, default_value = "tpv.log")]
    log_file: String,

    #[arg(long, default_value_t = 32)]
    max_column_width: usize,
}

impl Args {
    fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            filters: self.filters.clone(),
            search: self.search.clone(),
            sort: self.sort.clone(),
            page: self.page.clone(),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand(path: &str) -> Result<PathBuf, TVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TVError::LoadingFailed(e.to_string()))
}

fn run() -> Result<(), TVError> {
    let args = Args::parse();

    let config = TVConfig::default()
        .with_max_column_width(args.max_column_width)
        .with_log_file(expand(&args.log_file)?);
    init_logging(&config)?;

    let path = expand(&args.file)?;
    info!("Starting tpv for {:?}", path);

    if args.print {
        print_preview(&args, path)
    } else {
        run_interactive(&config, path)
    }
}

fn print_preview(args: &Args, path: PathBuf) -> Result<(), TVError> {
    let mut slot = PreviewSlot::new();
    let ticket = slot.begin_load(path.clone());
    if let LoadOutcome::Failed(e) = slot.finish_load(ticket, Table::load(path)) {
        return Err(e);
    }
    let state = slot
        .state_mut()
        .ok_or_else(|| TVError::LoadingFailed("preview was superseded".into()))?;
    args.preview_options().apply(state)?;
    println!("{}", render_preview(state));
    Ok(())
}

fn run_interactive(config: &TVConfig, path: PathBuf) -> Result<(), TVError> {
    let (loads_tx, loads_rx) = mpsc::channel();
    let mut terminal = ratatui::init();
    let result = (|| -> Result<(), TVError> {
        let size = terminal.size()?;
        let mut model = Model::init(config, path, loads_tx, size.width as usize);
        model.reload();

        let ui = TableUI::new(config);
        let controller = Controller::new(config, loads_rx);

        while model.status != Status::QUITTING {
            // Render the current view
            terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

            // Handle events and map to a Message
            if let Some(message) = controller.handle_event(&model)? {
                model.update(Some(message))?;
            };
        }
        Ok(())
    })();
    ratatui::restore();
    result
}
