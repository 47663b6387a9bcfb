use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::ChartBackend;
use crate::core::{ChartSpec, ContainerRef};
use crate::host::ContainerHost;

use super::{ChartLifecycleManager, MountedChart};

/// One entry of a dashboard-wide `init_many` call.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    /// Caller label reported back in the summary; defaults to `chart-<index>`.
    pub id: Option<String>,
    pub container: ContainerRef,
    pub spec: ChartSpec,
    pub force_create: bool,
}

impl ChartRequest {
    #[must_use]
    pub fn new(container: impl Into<ContainerRef>, spec: ChartSpec) -> Self {
        Self {
            id: None,
            container: container.into(),
            spec,
            force_create: false,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn force_create(mut self) -> Self {
        self.force_create = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: String,
    pub mounted: Option<MountedChart>,
    pub error: Option<String>,
}

impl BatchItem {
    #[must_use]
    pub fn success(&self) -> bool {
        self.mounted.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
}

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    /// Initializes several charts; a failing request never blocks the others.
    pub fn init_many(&mut self, requests: impl IntoIterator<Item = ChartRequest>) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for (index, request) in requests.into_iter().enumerate() {
            let id = request.id.unwrap_or_else(|| format!("chart-{index}"));
            let item = match self.try_init(request.container, request.spec, request.force_create)
            {
                Ok(mounted) => BatchItem {
                    id,
                    mounted: Some(mounted),
                    error: None,
                },
                Err(err) => BatchItem {
                    id,
                    mounted: None,
                    error: Some(err.to_string()),
                },
            };
            if item.success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary.items.push(item);
        }
        summary.total = summary.items.len();
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch chart initialization finished"
        );
        summary
    }
}
