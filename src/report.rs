//! Report rendering and emission.
//!
//! Three outputs per batch: a one-line console summary per order, an appended
//! text block per order in the shared output file, and (optionally) one
//! machine-readable packing-plan document for the whole batch.
//!
//! The output file is opened in append mode and closed again per order, so a
//! crash mid-batch leaves a valid partial file. It is never truncated:
//! running a batch twice appends two copies.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::BatchResult;
use crate::model::{ItemSpec, Placement};
use crate::planner::LoadPlanReport;

/// Separator line framing each order block in the output file.
pub const SEPARATOR: &str = "====================";

/// Renders the human-readable placement text of a report.
///
/// Deterministic: the container line, one line per placement in placement
/// order, one line per not-loaded item in request order, and a summary line.
pub fn render(report: &LoadPlanReport) -> String {
    let container = report.container;
    let mut out = format!(
        "container {}x{}x{} max weight {:.0}kg\n",
        container.length, container.width, container.height, container.max_weight
    );

    for placement in &report.placements {
        let dims = placement.dims();
        out.push_str(&format!(
            "loaded {}: pos=({},{},{}) size={}x{}x{} orientation={} weight={:.2}kg\n",
            placement.item.article,
            placement.position.x,
            placement.position.y,
            placement.position.z,
            dims.length,
            dims.width,
            dims.height,
            placement.orientation.code(),
            placement.item.weight,
        ));
    }

    for rejected in &report.not_loaded {
        out.push_str(&format!(
            "not loaded {}: {}\n",
            rejected.item.article, rejected.reason
        ));
    }

    let summary = report.summary();
    out.push_str(&format!(
        "summary: {} loaded, {} not loaded, weight {:.2}/{:.0}kg, height {}mm, utilization {:.1}%\n",
        summary.loaded,
        summary.not_loaded,
        summary.total_weight,
        container.max_weight,
        summary.max_height,
        summary.volume_utilization * 100.0,
    ));

    out
}

/// The per-order console summary line.
pub fn console_summary(order_id: &str, report: &LoadPlanReport) -> String {
    format!(
        "Order {}: nr of not loaded packages = {}",
        order_id,
        report.not_loaded_count()
    )
}

/// Appends one order block to the shared output file.
pub fn append_block(
    path: &Path,
    order_id: &str,
    report: &LoadPlanReport,
    placements_text: &str,
) -> BatchResult<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    write!(
        file,
        "{SEPARATOR}\norder id:{order_id}\nnot placed items={}\n{placements_text}",
        report.not_loaded_count()
    )?;
    Ok(())
}

/// Appends the trailing separator after the last order.
pub fn append_trailer(path: &Path) -> BatchResult<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    writeln!(file, "{SEPARATOR}")?;
    Ok(())
}

/// One placement action in the packing-plan document.
///
/// Shape follows the benchmark environment: the item as given in the order
/// data, its front-left-bottom coordinates, and the orientation code.
#[derive(Clone, Debug, Serialize)]
pub struct PlanAction {
    pub item: ItemSpec,
    pub flb_coordinates: [i64; 3],
    pub orientation: u8,
}

impl From<&Placement> for PlanAction {
    fn from(placement: &Placement) -> Self {
        Self {
            item: placement.item.clone(),
            flb_coordinates: placement.position.as_array(),
            orientation: placement.orientation.code(),
        }
    }
}

/// Accumulates the per-order placement actions of a batch, in order.
#[derive(Clone, Debug, Default)]
pub struct PackingPlans {
    plans: Map<String, Value>,
}

impl PackingPlans {
    /// Creates an empty plan collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the placements of one order's report.
    pub fn record(&mut self, order_id: &str, report: &LoadPlanReport) -> BatchResult<()> {
        let actions: Vec<PlanAction> = report.placements.iter().map(PlanAction::from).collect();
        self.plans
            .insert(order_id.to_string(), serde_json::to_value(actions)?);
        Ok(())
    }

    /// Writes the collected plans as one JSON document.
    pub fn write_to(&self, path: &Path) -> BatchResult<()> {
        let doc = serde_json::to_string_pretty(&self.plans)?;
        fs::write(path, doc)?;
        Ok(())
    }
}
