//! Request construction per order.
//!
//! Maps the order's declared target type to a fixed container footprint and
//! pairs it with the order's item sequence. One order record produces exactly
//! one request.

use tracing::warn;

use crate::error::BatchResult;
use crate::input::OrderRecord;
use crate::model::{ContainerSpec, LoadPlanRequest};

/// Fixed container height in mm, applied regardless of target.
pub const CONTAINER_HEIGHT_MM: i64 = 2000;

/// Fixed container weight capacity in kg, applied regardless of target.
pub const CONTAINER_MAX_WEIGHT_KG: f64 = 1500.0;

/// Footprint (length, width) in mm for a declared target type.
///
/// The table is exhaustive; extend it only by adding rows.
fn footprint_for_target(target: &str) -> Option<(i64, i64)> {
    match target {
        // length and width swapped relative to the natural pallet
        // orientation; the downstream planner expects them this way
        "euro-pallet" => Some((800, 1200)),
        "rollcontainer" => Some((700, 800)),
        _ => None,
    }
}

/// Derives the container for a target type.
///
/// An unrecognized target is a soft condition: it is logged and yields a
/// container with a 0 x 0 footprint, which the engine will reject every item
/// for. The batch keeps running.
pub fn container_for_target(target: &str) -> ContainerSpec {
    let (length, width) = match footprint_for_target(target) {
        Some(footprint) => footprint,
        None => {
            warn!(target_type = target, "Target IS UNKNOWN!!!");
            (0, 0)
        }
    };
    ContainerSpec::new(length, width, CONTAINER_HEIGHT_MM, CONTAINER_MAX_WEIGHT_KG)
}

/// Builds the load-plan request for one order record.
pub fn build_request(record: &OrderRecord<'_>) -> BatchResult<LoadPlanRequest> {
    let container = container_for_target(record.target()?);
    let items = record.items()?;
    Ok(LoadPlanRequest::new(container, items))
}
