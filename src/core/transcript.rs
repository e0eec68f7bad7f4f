//! 对话转录：跨整个 run 累积的消息序列
//!
//! 只追加、追加后不再修改，顺序即因果顺序；由 Agent 持有，
//! 补全供应商读取、Agent 与远端应答共同追加。不跨 run 持久化。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    Assistant,
    User,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 对话转录：只追加的消息列表
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// 全部消息内容的拼接，作为生成阶段的 prompt
    pub fn concat(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut t = Transcript::new();
        t.push(Message::system("sys"));
        t.push(Message::user("hello"));
        t.push(Message::user("world"));

        let roles: Vec<&Role> = t.messages().iter().map(|m| &m.role).collect();
        assert_eq!(roles, vec![&Role::System, &Role::User, &Role::User]);
    }

    #[test]
    fn concat_joins_all_contents() {
        let mut t = Transcript::new();
        t.push(Message::system("a"));
        t.push(Message::assistant("b"));
        t.push(Message::user("c"));
        assert_eq!(t.concat(), "abc");
    }
}
