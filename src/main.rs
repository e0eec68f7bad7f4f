//! Scribe - 编码智能体编排核心
//!
//! headless 演示入口：初始化日志与配置，用脚本化通道与 Mock 生成器
//! 跑一次完整 run（提示 + 3 轮澄清 + 规划 + 逐文件生成），打印结果与任务账本。

use std::sync::Arc;

use anyhow::Context;
use scribe::codegen::{MockGenerator, ReplacePatcher};
use scribe::config::load_config;
use scribe::core::agent::DEFAULT_SYSTEM_PROMPT;
use scribe::llm::create_provider_from_config;
use scribe::rpc::ScriptedChannel;
use scribe::AgentFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scribe::observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        Default::default()
    });

    let provider = create_provider_from_config(&cfg);

    // 演示用协作者：脚本化对端应答 + 固定计划与文件桩
    let channel = Arc::new(ScriptedChannel::new());
    for reply in [
        "Build a CLI todo app",
        "Store todos in a JSON file",
        "Support add, list and done subcommands",
        "Plain Python, no third-party deps",
    ] {
        channel.queue_reply(serde_json::json!({ "response": reply }));
    }

    let generator = MockGenerator::new(
        "1. Parse CLI arguments\n2. Persist todos to todos.json",
        vec![
            ("main.py", "from todo import TodoList\n\nif __name__ == '__main__':\n    TodoList().main()\n"),
            ("todo.py", "class TodoList:\n    def main(self):\n        pass\n"),
        ],
    );

    let factory = AgentFactory::new(
        cfg.agent.kind.clone(),
        cfg.agent
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        provider,
        Arc::new(generator),
        Arc::new(ReplacePatcher),
        channel.clone(),
    );

    let mut agent = factory.create();
    tracing::info!(agent = agent.id(), "starting run");
    let result = agent.run().await;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serialize run result")?
    );

    for task in agent.ledger().list() {
        tracing::info!(
            task = %task.id,
            status = ?task.status,
            "{}",
            task.description
        );
    }

    let progress_count = channel.notifications().len();
    tracing::info!(progress_count, "progress notifications delivered");

    Ok(())
}
