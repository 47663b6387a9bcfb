use indexmap::map::Entry;
use tracing::debug;

use crate::backend::ChartBackend;
use crate::error::{LifecycleError, LifecycleResult};
use crate::extensions::LifecycleObserver;
use crate::host::ContainerHost;

use super::ChartLifecycleManager;

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    /// Adds an observer under its `id()`. Events reach observers in the order
    /// they were added.
    pub fn register_observer(
        &mut self,
        observer: Box<dyn LifecycleObserver>,
    ) -> LifecycleResult<()> {
        let id = observer.id().to_owned();
        if id.trim().is_empty() {
            return Err(LifecycleError::InvalidData(
                "lifecycle observer needs a non-blank id".to_owned(),
            ));
        }
        match self.observers.entry(id) {
            Entry::Occupied(slot) => Err(LifecycleError::InvalidData(format!(
                "lifecycle observer `{}` already listens on this manager",
                slot.key()
            ))),
            Entry::Vacant(slot) => {
                debug!(observer = %slot.key(), "lifecycle observer attached");
                slot.insert(observer);
                Ok(())
            }
        }
    }

    /// Detaches the observer and hands it back, keeping the others in order.
    pub fn unregister_observer(&mut self, id: &str) -> Option<Box<dyn LifecycleObserver>> {
        self.observers.shift_remove(id)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, id: &str) -> bool {
        self.observers.contains_key(id)
    }

    /// Observer ids in dispatch order.
    pub fn observer_ids(&self) -> impl Iterator<Item = &str> {
        self.observers.keys().map(String::as_str)
    }
}
