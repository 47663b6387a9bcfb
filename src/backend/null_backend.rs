use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{ChartBackend, ChartHandle};
use crate::core::{ChartSpec, NodeId};
use crate::error::{LifecycleError, LifecycleResult};

/// Journal record written by `NullBackend` and its charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendEvent {
    Created { chart: u64, node: NodeId },
    SpecApplied { chart: u64 },
    Resized { chart: u64 },
    Disposed { chart: u64 },
}

type Journal = Rc<RefCell<Vec<BackendEvent>>>;

/// Headless backend used by tests and by hosts without a drawing surface.
///
/// It still validates spec shape so malformed specs surface as creation
/// failures the same way a real charting library would reject them.
#[derive(Debug, Default)]
pub struct NullBackend {
    journal: Journal,
    next_chart: u64,
}

impl NullBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<BackendEvent> {
        self.journal.borrow().clone()
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.count(|event| matches!(event, BackendEvent::Created { .. }))
    }

    #[must_use]
    pub fn disposed_count(&self) -> usize {
        self.count(|event| matches!(event, BackendEvent::Disposed { .. }))
    }

    #[must_use]
    pub fn resize_count(&self, chart: u64) -> usize {
        self.count(|event| *event == BackendEvent::Resized { chart })
    }

    #[must_use]
    pub fn is_chart_disposed(&self, chart: u64) -> bool {
        self.count(|event| *event == BackendEvent::Disposed { chart }) > 0
    }

    fn count(&self, predicate: impl Fn(&BackendEvent) -> bool) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

impl ChartBackend for NullBackend {
    type Handle = NullChart;

    fn create(&mut self, node: NodeId, spec: &ChartSpec) -> LifecycleResult<NullChart> {
        validate_spec(spec)?;
        self.next_chart += 1;
        let chart = self.next_chart;
        self.journal
            .borrow_mut()
            .push(BackendEvent::Created { chart, node });
        Ok(NullChart {
            chart,
            node,
            spec: spec.clone(),
            resize_count: 0,
            disposed: false,
            journal: Rc::clone(&self.journal),
        })
    }
}

#[derive(Debug)]
pub struct NullChart {
    chart: u64,
    node: NodeId,
    spec: ChartSpec,
    resize_count: u32,
    disposed: bool,
    journal: Journal,
}

impl NullChart {
    /// Backend-local sequence number, as recorded in the journal.
    #[must_use]
    pub fn chart(&self) -> u64 {
        self.chart
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn resize_count(&self) -> u32 {
        self.resize_count
    }

    fn ensure_live(&self) -> LifecycleResult<()> {
        if self.disposed {
            return Err(LifecycleError::Backend(format!(
                "chart {} is already disposed",
                self.chart
            )));
        }
        Ok(())
    }
}

impl ChartHandle for NullChart {
    fn apply_spec(&mut self, spec: &ChartSpec) -> LifecycleResult<()> {
        self.ensure_live()?;
        validate_spec(spec)?;
        self.spec = spec.clone();
        self.journal
            .borrow_mut()
            .push(BackendEvent::SpecApplied { chart: self.chart });
        Ok(())
    }

    fn resize(&mut self) -> LifecycleResult<()> {
        self.ensure_live()?;
        self.resize_count += 1;
        self.journal
            .borrow_mut()
            .push(BackendEvent::Resized { chart: self.chart });
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.journal
            .borrow_mut()
            .push(BackendEvent::Disposed { chart: self.chart });
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

fn validate_spec(spec: &ChartSpec) -> LifecycleResult<()> {
    if let Some(kind) = spec.get("type") {
        if !kind.is_string() {
            return Err(LifecycleError::InvalidSpec(
                "`type` must be a string".to_owned(),
            ));
        }
    }
    for key in ["data", "series"] {
        match spec.get(key) {
            None | Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(LifecycleError::InvalidSpec(format!(
                    "`{key}` must be an array"
                )));
            }
        }
    }
    Ok(())
}
