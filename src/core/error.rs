//! Agent 错误分类
//!
//! 规划 / 路径枚举 / 逐文件生成期间的所有失败在编排器顶层边界统一捕获，
//! 转换为失败的 RunResult；边界以下不允许终止进程。

use thiserror::Error;

use crate::core::task::TaskId;

/// Agent 运行过程中可能出现的错误（账本误用、通道、流、生成、补丁）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 账本误用：任务 ID 不存在。属编程错误，不应暴露给用户
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    /// 远端不可达或通道在应答前关闭；对当前任务致命，对进程无害
    #[error("Channel error: {0}")]
    Channel(String),

    /// 补全供应商的片段流在中途失败；已累积的部分文本被丢弃
    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Patch error: {0}")]
    Patch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_detail() {
        let err = AgentError::Generator("plan failed".to_string());
        assert!(err.to_string().contains("plan failed"));

        let err = AgentError::Channel("peer closed".to_string());
        assert!(err.to_string().contains("peer closed"));
    }

    #[test]
    fn unknown_task_names_the_id() {
        let err = AgentError::UnknownTask(TaskId::from_raw(7));
        assert!(err.to_string().contains('7'));
    }
}
