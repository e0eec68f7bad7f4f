//! 关联 RPC 层
//!
//! 请求按「agent 种类 + 实例 ID + 请求种类」推导出的通道名与远端对端关联：
//! 每个请求恰好等待一条应答（阻塞式往返，核心不设超时），进度通知为单向发送。
//! 底层传输是外部能力（RpcChannel trait），核心只负责命名、序列化与关联。

pub mod channel;
pub mod correlator;
pub mod mock;
pub mod types;

pub use channel::RpcChannel;
pub use correlator::RpcCorrelator;
pub use mock::ScriptedChannel;
pub use types::{ChatResponse, InputRequest, InputResponse, Progress};
