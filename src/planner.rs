//! The load-planning capability interface.
//!
//! The batch runner core depends on [`LoadPlanner`] only; the concrete engine
//! behind it is replaceable. [`LoadPlanReport`] is what every engine must
//! produce: the placements it found, the items it could not load, and a
//! derivable summary.

use thiserror::Error;

use crate::model::{ContainerSpec, ItemSpec, LoadPlanRequest, Placement};
use crate::types::{Dimensional, Weighted};

/// Failure inside a load-planning engine.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("engine rejected the request: {reason}")]
    RequestRejected { reason: String },

    #[error("engine failed internally: {reason}")]
    Engine { reason: String },
}

/// Capability interface of the load-planning engine.
///
/// `plan` is a single opaque call: it receives one container and an ordered
/// item collection and reports which items were placed where. Retry and
/// search policy belong to the implementation, never to the caller.
pub trait LoadPlanner {
    fn plan(&self, request: &LoadPlanRequest) -> Result<LoadPlanReport, PlannerError>;
}

/// Why an item could not be loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotLoadedReason {
    TooHeavyForContainer,
    DimensionsExceedContainer,
    NoStablePosition,
}

impl NotLoadedReason {
    pub fn code(&self) -> &'static str {
        match self {
            NotLoadedReason::TooHeavyForContainer => "too_heavy_for_container",
            NotLoadedReason::DimensionsExceedContainer => "dimensions_exceed_container",
            NotLoadedReason::NoStablePosition => "no_stable_position",
        }
    }
}

impl std::fmt::Display for NotLoadedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotLoadedReason::TooHeavyForContainer => {
                write!(f, "item exceeds the remaining weight capacity")
            }
            NotLoadedReason::DimensionsExceedContainer => {
                write!(f, "item does not fit the container in at least one dimension")
            }
            NotLoadedReason::NoStablePosition => {
                write!(f, "no stable position found inside the container")
            }
        }
    }
}

/// An item the engine could not place.
#[derive(Clone, Debug)]
pub struct NotLoadedItem {
    pub item: ItemSpec,
    pub reason: NotLoadedReason,
}

/// Result of one `plan` invocation.
///
/// Placements are in placement order, not-loaded items in request order.
#[derive(Clone, Debug)]
pub struct LoadPlanReport {
    pub container: ContainerSpec,
    pub placements: Vec<Placement>,
    pub not_loaded: Vec<NotLoadedItem>,
}

impl LoadPlanReport {
    /// Count of not-loaded packages, the headline number of every report.
    #[inline]
    pub fn not_loaded_count(&self) -> usize {
        self.not_loaded.len()
    }

    /// Derives the aggregate summary of this report.
    pub fn summary(&self) -> ReportSummary {
        let total_weight: f64 = self.placements.iter().map(|p| p.weight()).sum();
        let max_height = self.placements.iter().map(Placement::top_z).max().unwrap_or(0);
        let item_volume: i64 = self.placements.iter().map(|p| p.volume()).sum();

        // Utilization against the circumscribed cuboid (container footprint
        // up to the highest placement), as the benchmark evaluation defines it.
        let circumscribed = self.container.dims().base_area() * max_height;
        let volume_utilization = if circumscribed > 0 {
            item_volume as f64 / circumscribed as f64
        } else {
            0.0
        };

        ReportSummary {
            loaded: self.placements.len(),
            not_loaded: self.not_loaded.len(),
            total_weight,
            max_height,
            volume_utilization,
        }
    }
}

/// Aggregate numbers derived from a [`LoadPlanReport`].
#[derive(Clone, Copy, Debug)]
pub struct ReportSummary {
    pub loaded: usize,
    pub not_loaded: usize,
    pub total_weight: f64,
    pub max_height: i64,
    pub volume_utilization: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_item, Orientation};
    use crate::types::Pos;

    #[test]
    fn summary_aggregates_placements() {
        let container = ContainerSpec::new(800, 1200, 2000, 1500.0);
        let report = LoadPlanReport {
            container,
            placements: vec![
                Placement::new(test_item("a", 400, 300, 200, 5.0), Pos::zero(), Orientation::AsGiven),
                Placement::new(
                    test_item("b", 400, 300, 300, 7.5),
                    Pos::new(400, 0, 0),
                    Orientation::AsGiven,
                ),
            ],
            not_loaded: vec![NotLoadedItem {
                item: test_item("c", 900, 900, 900, 1.0),
                reason: NotLoadedReason::DimensionsExceedContainer,
            }],
        };

        let summary = report.summary();
        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.not_loaded, 1);
        assert_eq!(report.not_loaded_count(), 1);
        assert_eq!(summary.max_height, 300);
        assert!((summary.total_weight - 12.5).abs() < 1e-9);

        let expected = (400 * 300 * 200 + 400 * 300 * 300) as f64 / (800 * 1200 * 300) as f64;
        assert!((summary.volume_utilization - expected).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_report_is_zeroed() {
        let report = LoadPlanReport {
            container: ContainerSpec::new(0, 0, 2000, 1500.0),
            placements: Vec::new(),
            not_loaded: Vec::new(),
        };

        let summary = report.summary();
        assert_eq!(summary.loaded, 0);
        assert_eq!(summary.not_loaded, 0);
        assert_eq!(summary.max_height, 0);
        assert_eq!(summary.volume_utilization, 0.0);
    }
}
