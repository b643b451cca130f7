//! Slot discovery across several time ranges.
//!
//! Each configured range gets its own scanner task. Scanners report back
//! through a join barrier; the batch is only classified once every scanner
//! has finished, so one failing range never cuts short the others.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use slotwatch_client::SlotService;
use slotwatch_models::{Slot, TaskHandle, TimeRange};

use crate::call::guarded;
use crate::error::{DiscoveryFailure, ScanError};

/// What a single range scanner contributed.
#[derive(Debug)]
enum ScanOutcome {
    Found(Vec<Slot>),
    Empty,
    Cancelled,
    Failed(ScanError),
}

/// Fans a task out across time ranges and merges the slots found.
#[derive(Clone)]
pub struct SlotDiscovery {
    service: Arc<dyn SlotService>,
    request_timeout: Duration,
}

impl SlotDiscovery {
    /// Creates a discovery engine bounding each scanner call by `request_timeout`.
    pub fn new(service: Arc<dyn SlotService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Returns every slot found in any of `ranges`, sorted ascending.
    ///
    /// Slots reported by overlapping ranges appear once per range. A range
    /// with nothing open contributes nothing. If any scanner fails, the whole
    /// call fails with every recorded error and no slots. Scanners interrupted
    /// by `cancel` contribute nothing and are not errors.
    pub async fn discover(
        &self,
        task: &TaskHandle,
        ranges: &[TimeRange],
        cancel: &CancellationToken,
    ) -> Result<Vec<Slot>, DiscoveryFailure> {
        if ranges.is_empty() {
            return Ok(Vec::new());
        }

        let mut scanners = JoinSet::new();
        for range in ranges.iter().copied() {
            scanners.spawn(scan_range(
                Arc::clone(&self.service),
                task.clone(),
                range,
                self.request_timeout,
                cancel.clone(),
            ));
        }

        let mut slots = Vec::new();
        let mut errors = Vec::new();

        while let Some(joined) = scanners.join_next().await {
            match joined {
                Ok(ScanOutcome::Found(found)) => slots.extend(found),
                Ok(ScanOutcome::Empty) | Ok(ScanOutcome::Cancelled) => {}
                Ok(ScanOutcome::Failed(e)) => errors.push(e),
                Err(e) => errors.push(ScanError::Panicked(e.to_string())),
            }
        }

        if !errors.is_empty() {
            return Err(DiscoveryFailure::new(errors));
        }

        slots.sort_unstable();

        debug!(task = %task, ranges = ranges.len(), slots = slots.len(), "discovery finished");

        Ok(slots)
    }
}

async fn scan_range(
    service: Arc<dyn SlotService>,
    task: TaskHandle,
    range: TimeRange,
    limit: Duration,
    cancel: CancellationToken,
) -> ScanOutcome {
    trace!(task = %task, range = %range, "scanning range");

    let call = service.list_slots(&task, range.start(), range.end());
    match guarded(&cancel, limit, call).await {
        None => ScanOutcome::Cancelled,
        Some(Ok(slots)) if slots.is_empty() => ScanOutcome::Empty,
        Some(Ok(slots)) => ScanOutcome::Found(slots),
        Some(Err(source)) => ScanOutcome::Failed(ScanError::Client { range, source }),
    }
}
