//! 核心编排层：错误分类、任务账本、对话转录、编排器主流程

pub mod agent;
pub mod error;
pub mod task;
pub mod transcript;

pub use agent::{Agent, AgentFactory, RunResult};
pub use error::AgentError;
pub use task::{Task, TaskId, TaskLedger, TaskStatus};
pub use transcript::{Message, Role, Transcript};
