//! Scribe - 编码智能体编排核心
//!
//! 将一条自然语言提示编排为一组生成的源码文件，过程中通过关联 RPC 通道
//! 向远端客户端上报细粒度进度。代码生成、传输协议、模型后端与补丁合并
//! 均为外部能力（capability trait），本 crate 只负责编排。
//!
//! 模块划分：
//! - **codegen**: 生成器与补丁器能力边界（plan / 文件路径枚举 / 逐文件生成 / 合并）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 任务账本、对话转录、编排器与错误分类
//! - **llm**: 补全供应商抽象与实现（OpenAI 兼容 / Mock）
//! - **rpc**: 关联 RPC：通道名推导、阻塞式请求应答、单向进度通知
//! - **stream**: 流式响应聚合器（逐片段累积 + 串行化进度发布）

pub mod codegen;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod rpc;
pub mod stream;

pub use crate::core::{Agent, AgentFactory, RunResult};
