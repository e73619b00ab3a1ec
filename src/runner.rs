//! The sequential order batch runner.
//!
//! One pass over the input batch, one order at a time: build the request,
//! invoke the planner, emit the report. No retries, no parallelism; the
//! first hard error aborts the batch and already-appended output stays on
//! disk. The only soft condition (unknown target) is handled inside the
//! request builder.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::BatchResult;
use crate::input;
use crate::planner::LoadPlanner;
use crate::report::{self, PackingPlans};
use crate::request;

/// Where a batch reads from and writes to.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Path of the benchmark order file.
    pub input: PathBuf,
    /// Path of the shared, append-only report file.
    pub output: PathBuf,
    /// Optional path for the machine-readable packing-plan document.
    pub plan_out: Option<PathBuf>,
}

/// Aggregate numbers of one finished batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchSummary {
    pub orders: usize,
    pub loaded: usize,
    pub not_loaded: usize,
}

/// Runs one batch.
pub fn run_batch(options: &BatchOptions, planner: &dyn LoadPlanner) -> BatchResult<BatchSummary> {
    let batch = input::load_order_batch(&options.input)?;
    info!(orders = batch.len(), "order batch loaded");

    let mut plans = options.plan_out.as_ref().map(|_| PackingPlans::new());
    let mut summary = BatchSummary::default();

    for order in batch.iter() {
        let order_id = order.order_id();
        let request = request::build_request(&order)?;
        debug!(order_id, items = request.items.len(), "request built");

        let report = planner.plan(&request)?;

        let placements_text = report::render(&report);
        println!("{}", report::console_summary(order_id, &report));
        report::append_block(&options.output, order_id, &report, &placements_text)?;

        if let Some(plans) = plans.as_mut() {
            plans.record(order_id, &report)?;
        }

        summary.orders += 1;
        summary.loaded += report.placements.len();
        summary.not_loaded += report.not_loaded_count();
    }

    report::append_trailer(&options.output)?;

    if let (Some(plans), Some(path)) = (plans.as_ref(), options.plan_out.as_ref()) {
        plans.write_to(path)?;
        info!(path = %path.display(), "packing-plan document written");
    }

    Ok(summary)
}
