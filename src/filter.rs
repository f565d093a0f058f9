use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::TVError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Contains,
    Equals,
    Starts,
    Ends,
    Greater,
    Less,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 6] = [
        FilterOperator::Contains,
        FilterOperator::Equals,
        FilterOperator::Starts,
        FilterOperator::Ends,
        FilterOperator::Greater,
        FilterOperator::Less,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::Equals => "equals",
            FilterOperator::Starts => "starts",
            FilterOperator::Ends => "ends",
            FilterOperator::Greater => "greater",
            FilterOperator::Less => "less",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Contains => "Contains",
            FilterOperator::Equals => "Equals",
            FilterOperator::Starts => "Starts with",
            FilterOperator::Ends => "Ends with",
            FilterOperator::Greater => "Greater than",
            FilterOperator::Less => "Less than",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|o| o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|o| o == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Compare a cell against the filter value. Both sides are compared case-insensitive,
    /// numeric operators fail closed if either side is not a number.
    pub fn matches(&self, cell: &str, value: &str) -> bool {
        match self {
            FilterOperator::Greater | FilterOperator::Less => {
                match (parse_number(cell), parse_number(value)) {
                    (Some(c), Some(v)) => {
                        if *self == FilterOperator::Greater {
                            c > v
                        } else {
                            c < v
                        }
                    }
                    _ => false,
                }
            }
            _ => {
                let cell = cell.to_lowercase();
                let value = value.to_lowercase();
                match self {
                    FilterOperator::Contains => cell.contains(&value),
                    FilterOperator::Equals => cell == value,
                    FilterOperator::Starts => cell.starts_with(&value),
                    FilterOperator::Ends => cell.ends_with(&value),
                    FilterOperator::Greater | FilterOperator::Less => false,
                }
            }
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = TVError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(FilterOperator::Contains),
            "equals" | "eq" | "=" => Ok(FilterOperator::Equals),
            "starts" => Ok(FilterOperator::Starts),
            "ends" => Ok(FilterOperator::Ends),
            "greater" | "gt" | ">" => Ok(FilterOperator::Greater),
            "less" | "lt" | "<" => Ok(FilterOperator::Less),
            other => Err(TVError::InvalidFilter(other.to_string())),
        }
    }
}

// Rejects NaN so that "NaN" in a cell never passes a numeric filter.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    pub operator: FilterOperator,
    pub value: String,
}

impl ColumnFilter {
    pub fn new(operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }
}

/// Active filters keyed by column index. At most one filter per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    filters: BTreeMap<usize, ColumnFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the filter of a column.
    pub fn set(&mut self, column: usize, filter: ColumnFilter) -> Option<ColumnFilter> {
        self.filters.insert(column, filter)
    }

    pub fn with(mut self, column: usize, operator: FilterOperator, value: &str) -> Self {
        self.set(column, ColumnFilter::new(operator, value));
        self
    }

    pub fn remove(&mut self, column: usize) -> Option<ColumnFilter> {
        self.filters.remove(&column)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, column: usize) -> Option<&ColumnFilter> {
        self.filters.get(&column)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ColumnFilter)> {
        self.filters.iter().map(|(&c, f)| (c, f))
    }
}

pub fn row_matches_filters(row: &[String], active_filters: &FilterSpec) -> bool {
    active_filters.iter().all(|(column, filter)| {
        let cell = row.get(column).map(String::as_str).unwrap_or("");
        filter.operator.matches(cell, &filter.value)
    })
}

/// Parses a command line filter of the form `COLUMN:OPERATOR:VALUE`.
/// The value may itself contain `:`.
pub fn parse_filter_arg(arg: &str) -> Result<(String, ColumnFilter), TVError> {
    let mut parts = arg.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(op), Some(value)) if !column.trim().is_empty() => Ok((
            column.trim().to_string(),
            ColumnFilter::new(op.parse()?, value),
        )),
        _ => Err(TVError::InvalidFilter(arg.to_string())),
    }
}
