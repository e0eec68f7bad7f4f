//! 任务账本：命名任务树与状态追踪
//!
//! 每个逻辑步骤在开始时创建一个任务，仅由创建它的步骤变更其状态；
//! 任务从不销毁，账本为整个 run 保留完整历史。
//! 状态沿 Pending -> Running -> {Done | Error} 单调推进，终态不可变。

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::core::error::AgentError;

/// 任务 ID（账本内唯一，按创建顺序递增）
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct TaskId(u64);

impl TaskId {
    /// 由原始数值构造（测试与错误展示用）
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 任务状态
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Error,
}

impl TaskStatus {
    /// 单调序：Pending(0) < Running(1) < 终态(2)
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Done | TaskStatus::Error => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }
}

/// 单个任务记录：描述、状态、子任务与可选结果负载
#[derive(Clone, Debug, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    pub children: Vec<TaskId>,
    pub result: Option<String>,
}

/// 任务账本：ID 到记录的映射，保留插入顺序
#[derive(Debug, Default)]
pub struct TaskLedger {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
    next_id: u64,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建根任务，初始状态 Running，返回其 ID
    pub fn create_task(&mut self, description: impl Into<String>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            id,
            Task {
                id,
                description: description.into(),
                status: TaskStatus::Running,
                children: Vec::new(),
                result: None,
            },
        );
        self.order.push(id);
        id
    }

    /// 创建子任务并挂到父任务的 children 上
    pub fn create_subtask(
        &mut self,
        parent: TaskId,
        description: impl Into<String>,
    ) -> Result<TaskId, AgentError> {
        if !self.tasks.contains_key(&parent) {
            return Err(AgentError::UnknownTask(parent));
        }
        let id = self.create_task(description);
        if let Some(p) = self.tasks.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// 状态转移。终态不可变、不允许回退：违例仅告警并忽略（保持单调不变量）
    pub fn set_status(
        &mut self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<(), AgentError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(AgentError::UnknownTask(id))?;
        if task.status.is_terminal() || status.rank() < task.status.rank() {
            tracing::warn!(
                task = %id,
                current = ?task.status,
                requested = ?status,
                "ignoring non-monotonic task status transition"
            );
            return Ok(());
        }
        task.status = status;
        Ok(())
    }

    /// 写入任务结果负载
    pub fn set_result(
        &mut self,
        id: TaskId,
        result: impl Into<String>,
    ) -> Result<(), AgentError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(AgentError::UnknownTask(id))?;
        task.result = Some(result.into());
        Ok(())
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// 按创建顺序的稳定快照
    pub fn list(&self) -> Vec<&Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id)).collect()
    }

    /// 按描述查找（测试与客户端展示用）
    pub fn find_by_description(&self, description: &str) -> Option<&Task> {
        self.list().into_iter().find(|t| t.description == description)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
