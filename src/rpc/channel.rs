//! 传输能力边界
//!
//! 协议分帧与投递由宿主实现；核心只依赖「按通道名请求一条应答」与
//! 「按通道名单向通知」两个原语。超时（若需要）也是传输实现的职责。

use async_trait::async_trait;
use serde_json::Value;

/// RPC 通道 trait（外部传输能力）
#[async_trait]
pub trait RpcChannel: Send + Sync {
    /// 在指定通道上发出请求并等待恰好一条应答；
    /// 对端不可达或通道在应答前关闭时返回 Err
    async fn request(&self, channel: &str, params: Value) -> Result<Value, String>;

    /// 在指定通道上发出单向通知（fire-and-forget）
    async fn notify(&self, channel: &str, params: Value) -> Result<(), String>;
}
