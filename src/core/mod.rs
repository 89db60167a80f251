pub mod agent;
pub mod checkpoint;
pub mod memory;
pub mod steps;

pub use crate::types::result::{RunResult, TokenUsage};
pub use agent::Agent;
pub use checkpoint::MemorySaver;
pub use memory::AgentMemory;
pub use steps::AgentStep;
