use std::ops::Range;
use std::str::FromStr;

use crate::domain::{ROWS_PER_PAGE, TVError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    First,
    Last,
    Next,
    Previous,
    Number(i64),
}

impl FromStr for PageTarget {
    type Err = TVError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(PageTarget::First),
            "last" => Ok(PageTarget::Last),
            "next" => Ok(PageTarget::Next),
            "prev" | "previous" => Ok(PageTarget::Previous),
            other => other
                .parse::<i64>()
                .map(PageTarget::Number)
                .map_err(|_| TVError::InvalidPage(s.to_string())),
        }
    }
}

/// Tracks the 1-based current page over a row set of changing size.
#[derive(Debug, Clone, PartialEq)]
pub struct Pager {
    current_page: usize,
    rows_per_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: ROWS_PER_PAGE,
        }
    }
}

impl Pager {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        std::cmp::max(1, total_rows.div_ceil(self.rows_per_page))
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Move to `target`, clamped into `[1, total_pages]`. Returns the new page.
    pub fn navigate(&mut self, target: PageTarget, total_rows: usize) -> usize {
        let total_pages = self.total_pages(total_rows) as i64;
        let page = match target {
            PageTarget::First => 1,
            PageTarget::Last => total_pages,
            PageTarget::Next => self.current_page as i64 + 1,
            PageTarget::Previous => self.current_page as i64 - 1,
            PageTarget::Number(n) => n,
        };
        self.current_page = page.clamp(1, total_pages) as usize;
        self.current_page
    }

    /// Index range into the filtered rows that is visible on the current page.
    pub fn page_range(&self, total_rows: usize) -> Range<usize> {
        let begin = std::cmp::min((self.current_page - 1) * self.rows_per_page, total_rows);
        let end = std::cmp::min(begin + self.rows_per_page, total_rows);
        begin..end
    }
}
