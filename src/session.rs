use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::domain::TVError;
use crate::state::TableState;
use crate::table::Table;

/// Handed out when a load starts. Only the ticket of the most recent load may install its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub source: PathBuf,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Installed,
    Superseded,
    Failed(TVError),
}

/// Holds the preview of one slot and decides which load result is shown.
///
/// Every `begin_load` supersedes all loads started before it, no matter in
/// which order they finish.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    generation: u64,
    state: Option<TableState>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, source: PathBuf) -> LoadTicket {
        self.generation += 1;
        info!("Loading {:?} (generation {})", source, self.generation);
        LoadTicket {
            generation: self.generation,
            source,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Table, TVError>,
    ) -> LoadOutcome {
        if !self.is_current(&ticket) {
            warn!(
                "Dropping stale load of {:?} (generation {}, current {})",
                ticket.source, ticket.generation, self.generation
            );
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(table) => {
                self.state = Some(TableState::new(table));
                LoadOutcome::Installed
            }
            Err(e) => {
                error!("Loading {:?} failed: {}", ticket.source, e);
                LoadOutcome::Failed(e)
            }
        }
    }

    pub fn state(&self) -> Option<&TableState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut TableState> {
        self.state.as_mut()
    }

    /// Discards the preview, e.g. when it is closed.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Table {
        Table::new(vec!["c".into()], vec![vec![name.into()]]).with_name(name)
    }

    #[test]
    fn later_request_wins_over_later_arrival() {
        let mut slot = PreviewSlot::new();
        let first = slot.begin_load("a.csv".into());
        let second = slot.begin_load("b.csv".into());

        assert!(matches!(
            slot.finish_load(second, Ok(table("b"))),
            LoadOutcome::Installed
        ));
        assert!(matches!(
            slot.finish_load(first, Ok(table("a"))),
            LoadOutcome::Superseded
        ));
        assert_eq!(slot.state().unwrap().table().name, "b");
    }

    #[test]
    fn failed_load_keeps_previous_preview() {
        let mut slot = PreviewSlot::new();
        let ticket = slot.begin_load("a.csv".into());
        slot.finish_load(ticket, Ok(table("a")));
        let ticket = slot.begin_load("b.csv".into());
        assert!(matches!(
            slot.finish_load(ticket, Err(TVError::FileNotFound)),
            LoadOutcome::Failed(TVError::FileNotFound)
        ));
        assert_eq!(slot.state().unwrap().table().name, "a");
    }

    #[test]
    fn close_invalidates_pending_loads() {
        let mut slot = PreviewSlot::new();
        let ticket = slot.begin_load("a.csv".into());
        slot.close();
        assert!(!slot.is_current(&ticket));
        assert!(matches!(
            slot.finish_load(ticket, Ok(table("a"))),
            LoadOutcome::Superseded
        ));
        assert!(slot.state().is_none());
    }
}
