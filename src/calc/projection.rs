//! Next-market stock projection.
//!
//! For each item: mean of the sampled sales, times a safety margin,
//! rounded to a whole sandwich. Arithmetic is done in `Decimal` so the
//! margin product is exact and midpoints round the way the policy says.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::config::{ProjectionSettings, RoundingMode};
use crate::types::{parse_cell, ProjectedStockRow, SalesHistoryColumns, SandwichError, Worksheet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Multiplier applied to the mean (1.1 = 10% extra).
    pub margin: Decimal,
    pub rounding: RoundingMode,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            margin: dec!(1.1),
            rounding: RoundingMode::HalfUp,
        }
    }
}

impl From<&ProjectionSettings> for ProjectionConfig {
    fn from(settings: &ProjectionSettings) -> Self {
        Self {
            margin: settings.margin,
            rounding: settings.rounding,
        }
    }
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

pub struct StockProjector {
    config: ProjectionConfig,
}

impl StockProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project stock for every sampled column, in item order.
    pub fn project_stock(&self, columns: &SalesHistoryColumns) -> Result<ProjectedStockRow, SandwichError> {
        let projected = columns
            .columns()
            .iter()
            .enumerate()
            .map(|(item, column)| self.project_column(item, column))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(?projected, margin = %self.config.margin, rounding = ?self.config.rounding, "Stock projected");
        Ok(ProjectedStockRow(projected))
    }

    /// round(mean(column) × margin) for a single item.
    pub fn project_column(&self, item: usize, column: &[String]) -> Result<i64, SandwichError> {
        if column.is_empty() {
            return Err(SandwichError::EmptyHistory { item });
        }

        let mut sum = Decimal::ZERO;
        for cell in column {
            sum += Decimal::from(parse_cell(Worksheet::Sales, cell)?);
        }
        let mean = sum / Decimal::from(column.len());
        let scaled = mean * self.config.margin;
        let rounded = scaled.round_dp_with_strategy(0, self.config.rounding.strategy());

        rounded.to_i64().ok_or_else(|| SandwichError::Parse {
            worksheet: Worksheet::Sales,
            value: scaled.to_string(),
        })
    }
}

impl Default for StockProjector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}
