use super::memory::AgentMemory;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::debug;

/// In-memory conversation store keyed by thread id.
///
/// Clones share the same store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    threads: Arc<Mutex<HashMap<String, AgentMemory>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the memory saved for `thread_id`
    pub fn load(&self, thread_id: &str) -> Option<AgentMemory> {
        self.lock().get(thread_id).cloned()
    }

    /// Replace the memory saved for `thread_id`
    pub fn save(&self, thread_id: &str, memory: AgentMemory) {
        debug!(thread_id, steps = memory.step_count(), "saving checkpoint");
        self.lock().insert(thread_id.to_string(), memory);
    }

    /// Drop a thread, returning its last saved memory
    pub fn clear(&self, thread_id: &str) -> Option<AgentMemory> {
        self.lock().remove(thread_id)
    }

    pub fn thread_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, AgentMemory>> {
        self.threads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
