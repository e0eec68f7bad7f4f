//! 脚本化回环通道（用于测试与 headless 演示，无需真实对端）
//!
//! 请求按入队顺序弹出预置应答；队列耗尽时永久挂起，模拟「对端不回复」
//! 的无超时契约。所有请求与通知都被记录，供断言检查。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::rpc::channel::RpcChannel;

/// 脚本化通道：预置应答 + 记录流量
#[derive(Default)]
pub struct ScriptedChannel {
    replies: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<(String, Value)>>,
    notifications: Mutex<Vec<(String, Value)>>,
    // 从不触发：应答耗尽后 request 在此永久等待
    never: Notify,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一条应答（按请求到达顺序消费）
    pub fn queue_reply(&self, reply: Value) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// 已记录的请求 (通道名, 负载)
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    /// 已记录的通知 (通道名, 负载)
    pub fn notifications(&self) -> Vec<(String, Value)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcChannel for ScriptedChannel {
    async fn request(&self, channel: &str, params: Value) -> Result<Value, String> {
        self.requests
            .lock()
            .unwrap()
            .push((channel.to_string(), params));

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(v) => Ok(v),
            None => loop {
                // 对端永不回复：调用流保持挂起
                self.never.notified().await;
            },
        }
    }

    async fn notify(&self, channel: &str, params: Value) -> Result<(), String> {
        self.notifications
            .lock()
            .unwrap()
            .push((channel.to_string(), params));
        Ok(())
    }
}
