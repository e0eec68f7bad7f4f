//! Agent 编排器：主流程状态机
//!
//! 固定序列「收集提示 -> 有界澄清问答 -> 规划 -> 枚举文件路径 ->
//! 逐文件生成 -> 合并 -> 上报结果」，每步开启/关闭对应任务；
//! 任何失败在顶层边界转换为失败的 RunResult，绝不终止进程。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::codegen::{DocumentIdentity, Generator, Patcher};
use crate::core::{AgentError, Message, TaskId, TaskLedger, TaskStatus, Transcript};
use crate::llm::{ChatProvider, CursorPosition};
use crate::rpc::{Progress, RpcChannel, RpcCorrelator};
use crate::stream::ResponseAggregator;

/// 澄清问答的固定轮数。该循环无条件执行、不依据回复内容退出
/// （沿用原始产品行为，未经产品确认不得更改轮数）
const CLARIFY_ROUNDS: usize = 3;

/// 收集提示阶段注入转录的邀请消息
const PROMPT_INVITE: &str = "What do you want me to code?";

/// 默认系统提示词
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI agent that generates code based on a prompt. \
When you are given the prompt, ask 3 more questions about the most important implementation details \
that the user might want to modify or correct. \
Then, generate code based on the prompt and the answers to the questions.";

/// 一次 run 的结构化结果：成功携带文件映射，失败携带人类可读的错误串
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    fn completed(files: BTreeMap<String, String>) -> Self {
        Self {
            success: true,
            result: Some(files),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Agent 工厂：持有协作者引用与实例计数器
///
/// 实例 ID 由工厂独占的原子计数器铸造（单调递增，仅用于生成唯一的
/// RPC 通道名），并发构造也不会碰撞；除此之外实例间不共享任何状态。
pub struct AgentFactory {
    next_id: AtomicU64,
    agent_kind: String,
    system_prompt: String,
    provider: Arc<dyn ChatProvider>,
    generator: Arc<dyn Generator>,
    patcher: Arc<dyn Patcher>,
    channel: Arc<dyn RpcChannel>,
}

impl AgentFactory {
    pub fn new(
        agent_kind: impl Into<String>,
        system_prompt: impl Into<String>,
        provider: Arc<dyn ChatProvider>,
        generator: Arc<dyn Generator>,
        patcher: Arc<dyn Patcher>,
        channel: Arc<dyn RpcChannel>,
    ) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            agent_kind: agent_kind.into(),
            system_prompt: system_prompt.into(),
            provider,
            generator,
            patcher,
            channel,
        }
    }

    /// 创建一个新 Agent 实例：铸造 ID、以系统提示词播种转录。
    /// 每个实例恰好服务一次 run，不复用、不进池
    pub fn create(&self) -> Agent {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut transcript = Transcript::new();
        transcript.push(Message::system(self.system_prompt.clone()));

        Agent {
            id,
            transcript,
            ledger: TaskLedger::new(),
            provider: self.provider.clone(),
            generator: self.generator.clone(),
            patcher: self.patcher.clone(),
            rpc: RpcCorrelator::new(self.channel.clone(), self.agent_kind.clone(), id),
            aggregator: ResponseAggregator::new(),
        }
    }
}

/// 编码智能体：单个 run 的全部状态
pub struct Agent {
    id: u64,
    transcript: Transcript,
    ledger: TaskLedger,
    provider: Arc<dyn ChatProvider>,
    generator: Arc<dyn Generator>,
    patcher: Arc<dyn Patcher>,
    rpc: RpcCorrelator,
    aggregator: ResponseAggregator,
}

impl Agent {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// 账本状态写入；ID 来自刚铸造的任务，失败属编程错误，记录后继续
    fn mark(&mut self, id: TaskId, status: TaskStatus) {
        if let Err(e) = self.ledger.set_status(id, status) {
            tracing::error!(agent = self.id, task = %id, error = %e, "ledger update failed");
        }
    }

    /// 执行一次完整 run：提示收集 + 澄清，然后规划与逐文件生成。
    /// 所有失败在此边界收敛为 RunResult，当前打开的顶层任务标记 Error
    pub async fn run(&mut self) -> RunResult {
        let prompt_task = self.ledger.create_task("Getting Prompt");
        if let Err(e) = self.collect_prompt().await {
            self.mark(prompt_task, TaskStatus::Error);
            tracing::error!(agent = self.id, error = %e, "prompt collection failed");
            return RunResult::failed(e.to_string());
        }
        self.mark(prompt_task, TaskStatus::Done);

        let generate_task = self.ledger.create_task("Generate code");
        match self.generate(generate_task).await {
            Ok(files) => {
                self.mark(generate_task, TaskStatus::Done);
                tracing::info!(agent = self.id, files = files.len(), "run completed");
                RunResult::completed(files)
            }
            Err(e) => {
                self.mark(generate_task, TaskStatus::Error);
                tracing::error!(agent = self.id, error = %e, "generation failed");
                RunResult::failed(e.to_string())
            }
        }
    }

    /// 收集提示并执行固定轮数的澄清问答。
    /// 每轮：请求远端回复 -> 追加为 user 消息 -> 流式消费供应商响应并发布进度。
    /// 首轮的响应文本同样被丢弃（仅用于向客户端展示确认）
    async fn collect_prompt(&mut self) -> Result<(), AgentError> {
        self.transcript.push(Message::system(PROMPT_INVITE));
        self.chat_round().await?;

        for round in 0..CLARIFY_ROUNDS {
            tracing::debug!(agent = self.id, round, "clarification round");
            self.chat_round().await?;
        }
        Ok(())
    }

    /// 一次阻塞式聊天往返 + 随后的流式响应聚合
    async fn chat_round(&mut self) -> Result<(), AgentError> {
        let reply = self.rpc.request_chat(self.transcript.messages()).await?;
        self.transcript.push(Message::user(reply.response.clone()));

        let stream = self
            .provider
            .run_chat(
                "",
                self.transcript.messages(),
                &reply.response,
                CursorPosition::default(),
            )
            .await
            .map_err(AgentError::Stream)?;

        // 聚合出的完整文本在此阶段不进入转录
        self.aggregator.aggregate(stream, &self.rpc).await?;
        Ok(())
    }

    /// 规划 -> 枚举文件路径 -> 逐文件生成与合并。
    /// 中途失败丢弃整个文件映射；已作为进度发布的逐文件结果保持已投递
    async fn generate(&mut self, parent: TaskId) -> Result<BTreeMap<String, String>, AgentError> {
        let prompt = self.transcript.concat();

        let plan_task = self.ledger.create_subtask(parent, "Planning...")?;
        let plan = self
            .generator
            .plan(&prompt)
            .await
            .map_err(AgentError::Generator)?;
        self.mark(plan_task, TaskStatus::Done);

        let paths_task = self
            .ledger
            .create_subtask(parent, "Determining file paths...")?;
        let file_paths = self
            .generator
            .specify_file_paths(&prompt, &plan)
            .await
            .map_err(AgentError::Generator)?;
        self.mark(paths_task, TaskStatus::Done);

        let splines = self
            .ledger
            .create_subtask(parent, "Reticulating splines...")?;
        self.mark(splines, TaskStatus::Done);

        let mut generated = BTreeMap::new();
        for path in &file_paths {
            let task = self
                .ledger
                .create_subtask(parent, format!("Codegen for: {}", path))?;
            let code = self
                .generator
                .generate_code(path, &prompt, &plan)
                .await
                .map_err(AgentError::Generator)?;

            // TODO: 读取既有文件内容作为合并基线，目前固定空基线
            let document = DocumentIdentity::from_path(path);
            let merged = self
                .patcher
                .apply_diff(&document, "", &code)
                .await
                .map_err(AgentError::Patch)?;

            self.rpc
                .send_progress(Progress::streaming(merged.clone()))
                .await?;
            self.ledger.set_result(task, merged.clone())?;
            self.mark(task, TaskStatus::Done);
            generated.insert(path.clone(), merged);
        }

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{MockGenerator, ReplacePatcher};
    use crate::llm::MockChatProvider;
    use crate::rpc::ScriptedChannel;

    fn factory_with(
        generator: MockGenerator,
        channel: Arc<ScriptedChannel>,
    ) -> AgentFactory {
        AgentFactory::new(
            "codegen",
            DEFAULT_SYSTEM_PROMPT,
            Arc::new(MockChatProvider::new()),
            Arc::new(generator),
            Arc::new(ReplacePatcher),
            channel,
        )
    }

    fn queue_chat_replies(channel: &ScriptedChannel, replies: &[&str]) {
        for r in replies {
            channel.queue_reply(serde_json::json!({ "response": r }));
        }
    }

    #[test]
    fn sequentially_created_agents_get_increasing_ids() {
        let channel = Arc::new(ScriptedChannel::new());
        let factory = factory_with(MockGenerator::new("plan", vec![]), channel);
        let first = factory.create().id();
        let second = factory.create().id();
        assert!(second > first);
    }

    #[tokio::test]
    async fn transcript_gathers_invite_and_peer_replies() {
        let channel = Arc::new(ScriptedChannel::new());
        // 1 次提示 + 3 次澄清
        queue_chat_replies(&channel, &["build x", "a", "b", "c"]);

        let factory = factory_with(MockGenerator::new("plan", vec![]), channel);
        let mut agent = factory.create();
        let result = agent.run().await;

        assert!(result.success);
        // system 提示词 + 邀请 + 4 条 user 回复
        assert_eq!(agent.transcript().len(), 6);
        let concat = agent.transcript().concat();
        assert!(concat.contains("build x"));
        assert!(concat.contains(PROMPT_INVITE));
    }

    #[tokio::test]
    async fn successful_run_marks_both_top_level_tasks_done() {
        let channel = Arc::new(ScriptedChannel::new());
        queue_chat_replies(&channel, &["build x", "a", "b", "c"]);

        let factory = factory_with(
            MockGenerator::new("plan", vec![("main.py", "stub")]),
            channel,
        );
        let mut agent = factory.create();
        assert!(agent.run().await.success);

        for description in ["Getting Prompt", "Generate code"] {
            let task = agent.ledger().find_by_description(description).unwrap();
            assert_eq!(task.status, TaskStatus::Done);
        }
    }

    #[tokio::test]
    async fn failed_run_marks_prompt_task_error_when_channel_dies() {
        struct DeadChannel;

        #[async_trait::async_trait]
        impl RpcChannel for DeadChannel {
            async fn request(
                &self,
                _channel: &str,
                _params: serde_json::Value,
            ) -> Result<serde_json::Value, String> {
                Err("connection refused".to_string())
            }

            async fn notify(
                &self,
                _channel: &str,
                _params: serde_json::Value,
            ) -> Result<(), String> {
                Ok(())
            }
        }

        let factory = AgentFactory::new(
            "codegen",
            DEFAULT_SYSTEM_PROMPT,
            Arc::new(MockChatProvider::new()),
            Arc::new(MockGenerator::new("plan", vec![])),
            Arc::new(ReplacePatcher),
            Arc::new(DeadChannel),
        );
        let mut agent = factory.create();
        let result = agent.run().await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("connection refused"));
        let prompt_task = agent.ledger().find_by_description("Getting Prompt").unwrap();
        assert_eq!(prompt_task.status, TaskStatus::Error);
    }

    #[tokio::test]
    async fn per_file_results_are_published_as_progress() {
        let channel = Arc::new(ScriptedChannel::new());
        queue_chat_replies(&channel, &["build x", "a", "b", "c"]);

        let factory = factory_with(
            MockGenerator::new("plan", vec![("main.py", "stub-main")]),
            channel.clone(),
        );
        let mut agent = factory.create();
        let result = agent.run().await;
        assert!(result.success);

        let published: Vec<String> = channel
            .notifications()
            .into_iter()
            .map(|(_, v)| v["response"].as_str().unwrap().to_string())
            .collect();
        assert!(published.contains(&"stub-main".to_string()));
    }
}
