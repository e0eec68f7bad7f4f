//! RPC 关联器
//!
//! 通道名模板（每种请求/通知一个）：
//! `{agent_kind}_{instance_id}_request_input`
//! `{agent_kind}_{instance_id}_request_chat`
//! `{agent_kind}_{instance_id}_send_progress`
//!
//! 请求为阻塞式往返：调用流挂起直到匹配通道上恰好一条应答到达，核心不设超时。
//! 并发调用方的通知投递顺序不由此处保证，需要串行化时由调用方持锁（见 stream 模块）。

use std::sync::Arc;

use crate::core::{AgentError, Message};
use crate::rpc::channel::RpcChannel;
use crate::rpc::types::{ChatResponse, InputRequest, InputResponse, Progress};

/// 按通道名关联请求与应答，并发出进度通知
#[derive(Clone)]
pub struct RpcCorrelator {
    channel: Arc<dyn RpcChannel>,
    agent_kind: String,
    instance_id: u64,
}

impl RpcCorrelator {
    pub fn new(channel: Arc<dyn RpcChannel>, agent_kind: impl Into<String>, instance_id: u64) -> Self {
        Self {
            channel,
            agent_kind: agent_kind.into(),
            instance_id,
        }
    }

    /// 由 (agent 种类, 实例 ID, 请求种类) 确定性地推导通道名
    fn channel_name(&self, request_kind: &str) -> String {
        format!("{}_{}_{}", self.agent_kind, self.instance_id, request_kind)
    }

    /// 向远端索要自由格式输入；挂起直到应答到达
    pub async fn request_input(&self, request: InputRequest) -> Result<InputResponse, AgentError> {
        let params = serde_json::to_value(&request).map_err(|e| AgentError::Channel(e.to_string()))?;
        let reply = self
            .channel
            .request(&self.channel_name("request_input"), params)
            .await
            .map_err(AgentError::Channel)?;
        serde_json::from_value(reply).map_err(|e| AgentError::Channel(e.to_string()))
    }

    /// 发送当前转录并挂起，直到远端用户的一条回复到达
    pub async fn request_chat(&self, transcript: &[Message]) -> Result<ChatResponse, AgentError> {
        let params = serde_json::to_value(transcript).map_err(|e| AgentError::Channel(e.to_string()))?;
        let reply = self
            .channel
            .request(&self.channel_name("request_chat"), params)
            .await
            .map_err(AgentError::Channel)?;
        serde_json::from_value(reply).map_err(|e| AgentError::Channel(e.to_string()))
    }

    /// 单向进度通知
    pub async fn send_progress(&self, progress: Progress) -> Result<(), AgentError> {
        let params = serde_json::to_value(&progress).map_err(|e| AgentError::Channel(e.to_string()))?;
        self.channel
            .notify(&self.channel_name("send_progress"), params)
            .await
            .map_err(AgentError::Channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::ScriptedChannel;

    #[test]
    fn channel_names_follow_template() {
        let channel = Arc::new(ScriptedChannel::new());
        let rpc = RpcCorrelator::new(channel, "codegen", 3);
        assert_eq!(rpc.channel_name("request_input"), "codegen_3_request_input");
        assert_eq!(rpc.channel_name("request_chat"), "codegen_3_request_chat");
        assert_eq!(rpc.channel_name("send_progress"), "codegen_3_send_progress");
    }

    #[tokio::test]
    async fn request_chat_returns_exactly_one_reply() {
        let channel = Arc::new(ScriptedChannel::new());
        channel.queue_reply(serde_json::json!({ "response": "build a todo app" }));

        let rpc = RpcCorrelator::new(channel.clone(), "codegen", 1);
        let transcript = vec![Message::system("What do you want me to code?")];
        let reply = rpc.request_chat(&transcript).await.unwrap();
        assert_eq!(reply.response, "build a todo app");

        let requests = channel.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "codegen_1_request_chat");
    }

    #[tokio::test]
    async fn request_input_round_trips() {
        let channel = Arc::new(ScriptedChannel::new());
        channel.queue_reply(serde_json::json!({ "response": "yes" }));

        let rpc = RpcCorrelator::new(channel.clone(), "codegen", 1);
        let reply = rpc
            .request_input(InputRequest {
                msg: "Continue?".to_string(),
                place_holder: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response, "yes");
        assert_eq!(channel.requests()[0].0, "codegen_1_request_input");
    }

    #[tokio::test]
    async fn undecodable_reply_is_a_channel_error() {
        let channel = Arc::new(ScriptedChannel::new());
        channel.queue_reply(serde_json::json!({ "unexpected": true }));

        let rpc = RpcCorrelator::new(channel, "codegen", 1);
        let err = rpc.request_chat(&[]).await.unwrap_err();
        assert!(matches!(err, AgentError::Channel(_)));
    }

    #[tokio::test]
    async fn send_progress_is_recorded_on_the_notify_channel() {
        let channel = Arc::new(ScriptedChannel::new());
        let rpc = RpcCorrelator::new(channel.clone(), "codegen", 2);
        rpc.send_progress(Progress::streaming("ab")).await.unwrap();

        let notes = channel.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].0, "codegen_2_send_progress");
        assert_eq!(notes[0].1["response"], "ab");
    }
}
