use crate::error::AppError;
use crate::model::Bucket;
use crate::task_store::{Reorder, RowHandle, TaskStore};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { source: usize, bucket: Bucket },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndicator {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { from: usize, to: usize },
    Rejected,
    NotDragging,
}

/// Tracks a single drag gesture over the rendered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn start(&mut self, store: &TaskStore, handle: RowHandle) -> Result<(), AppError> {
        let source = store.resolve(handle)?;
        let bucket = store.bucket_of(source)?;
        debug!(source, bucket = bucket.label(), "drag started");
        self.state = DragState::Dragging { source, bucket };
        Ok(())
    }

    /// Indicator for the row under the pointer; `None` when no drag is in
    /// progress.
    pub fn over(&self, store: &TaskStore, handle: RowHandle) -> Option<DropIndicator> {
        let DragState::Dragging { bucket, .. } = self.state else {
            return None;
        };
        let indicator = match store
            .resolve(handle)
            .and_then(|target| store.bucket_of(target))
        {
            Ok(target) if target == bucket => DropIndicator::Valid,
            _ => DropIndicator::Invalid,
        };
        Some(indicator)
    }

    /// Abandons the gesture without touching the store.
    pub fn end(&mut self) {
        if self.state != DragState::Idle {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    pub fn drop_on(
        &mut self,
        store: &mut TaskStore,
        handle: RowHandle,
    ) -> Result<DropOutcome, AppError> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging { source, .. } = state else {
            return Ok(DropOutcome::NotDragging);
        };

        let target = store.resolve(handle)?;
        let outcome = match store.reorder(source, target)? {
            Reorder::Moved { from, to } => DropOutcome::Moved { from, to },
            Reorder::Rejected => DropOutcome::Rejected,
        };
        debug!(source, target, ?outcome, "drop handled");
        Ok(outcome)
    }
}
