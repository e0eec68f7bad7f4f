//! RPC 线上负载类型
//!
//! 应答负载对核心而言是不透明的自由格式值：ChatResponse 原样转交给补全供应商。

use serde::{Deserialize, Serialize};

/// request_input 请求：向远端索要自由格式输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRequest {
    pub msg: String,
    #[serde(default)]
    pub place_holder: String,
}

/// request_input 应答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputResponse {
    pub response: String,
}

/// request_chat 应答：远端用户对当前转录的回复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// 进度通知：逐片段增长的响应文本，或逐文件发布的合并结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub done_streaming: bool,
}

impl Progress {
    /// 流式进度：携带当前累积文本，尚未结束
    pub fn streaming(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            done_streaming: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_omits_absent_response() {
        let p = Progress {
            response: None,
            done_streaming: true,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("response"));
        assert!(json.contains("done_streaming"));
    }

    #[test]
    fn chat_response_roundtrip() {
        let v = serde_json::json!({ "response": "use argparse" });
        let r: ChatResponse = serde_json::from_value(v).unwrap();
        assert_eq!(r.response, "use argparse");
    }
}
