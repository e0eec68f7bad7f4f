//! Mock 生成器与直写补丁器（用于测试与 headless 演示）

use std::collections::HashMap;

use async_trait::async_trait;

use crate::codegen::{DocumentIdentity, Generator, Patcher};

/// Mock 生成器：固定 plan 与文件桩；可配置为在 plan 阶段失败
#[derive(Debug, Default)]
pub struct MockGenerator {
    plan: String,
    files: Vec<(String, String)>,
    fail_plan: Option<String>,
}

impl MockGenerator {
    /// 固定 plan 文本与 (路径, 桩内容) 列表
    pub fn new(plan: impl Into<String>, files: Vec<(&str, &str)>) -> Self {
        Self {
            plan: plan.into(),
            files: files
                .into_iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            fail_plan: None,
        }
    }

    /// plan 调用直接失败（错误路径测试用）
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_plan: Some(message.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn plan(&self, _prompt: &str) -> Result<String, String> {
        if let Some(msg) = &self.fail_plan {
            return Err(msg.clone());
        }
        Ok(self.plan.clone())
    }

    async fn specify_file_paths(&self, _prompt: &str, _plan: &str) -> Result<Vec<String>, String> {
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn generate_code(&self, path: &str, _prompt: &str, _plan: &str) -> Result<String, String> {
        let stubs: HashMap<&str, &str> = self
            .files
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_str()))
            .collect();
        Ok(stubs
            .get(path)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("# generated for {}\n", path)))
    }
}

/// 直写补丁器：忽略既有内容，直接以新生成的代码作为合并结果
/// （空基线时与写入新文件等价）
#[derive(Debug, Default)]
pub struct ReplacePatcher;

#[async_trait]
impl Patcher for ReplacePatcher {
    async fn apply_diff(
        &self,
        _document: &DocumentIdentity,
        _existing: &str,
        generated: &str,
    ) -> Result<String, String> {
        Ok(generated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_generator_serves_configured_stubs() {
        let gen = MockGenerator::new("1. do it", vec![("main.py", "print('hi')")]);
        assert_eq!(gen.plan("p").await.unwrap(), "1. do it");
        assert_eq!(
            gen.specify_file_paths("p", "plan").await.unwrap(),
            vec!["main.py"]
        );
        assert_eq!(
            gen.generate_code("main.py", "p", "plan").await.unwrap(),
            "print('hi')"
        );
    }

    #[tokio::test]
    async fn failing_generator_fails_at_plan() {
        let gen = MockGenerator::failing("planner exploded");
        assert_eq!(gen.plan("p").await.unwrap_err(), "planner exploded");
    }

    #[tokio::test]
    async fn replace_patcher_keeps_generated_text() {
        let patcher = ReplacePatcher;
        let doc = DocumentIdentity::from_path("main.py");
        let merged = patcher.apply_diff(&doc, "", "new content").await.unwrap();
        assert_eq!(merged, "new content");
    }
}
