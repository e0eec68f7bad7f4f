//! 生成器与补丁器能力边界
//!
//! 实际的规划 / 文件路径推断 / 代码生成算法以及 diff 合并都在外部实现；
//! 核心只依赖这里的窄接口（恰好三个生成操作 + 一个合并操作）。

pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use mock::{MockGenerator, ReplacePatcher};

/// 被合并文档的标识（路径 URI + 可选版本）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIdentity {
    pub uri: String,
    pub version: Option<i32>,
}

impl DocumentIdentity {
    /// 由文件路径构造 file:// URI
    pub fn from_path(path: &str) -> Self {
        Self {
            uri: format!("file://{}", path),
            version: None,
        }
    }
}

/// 生成器 trait：plan -> 文件路径枚举 -> 逐文件生成
#[async_trait]
pub trait Generator: Send + Sync {
    /// 由完整 prompt 产出实施计划
    async fn plan(&self, prompt: &str) -> Result<String, String>;

    /// 枚举需要生成的文件路径
    async fn specify_file_paths(&self, prompt: &str, plan: &str) -> Result<Vec<String>, String>;

    /// 为单个文件生成代码文本
    async fn generate_code(&self, path: &str, prompt: &str, plan: &str) -> Result<String, String>;
}

/// 补丁器 trait：将新生成的代码合并进既有文件内容
#[async_trait]
pub trait Patcher: Send + Sync {
    async fn apply_diff(
        &self,
        document: &DocumentIdentity,
        existing: &str,
        generated: &str,
    ) -> Result<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_identity_builds_file_uri() {
        let doc = DocumentIdentity::from_path("src/main.py");
        assert_eq!(doc.uri, "file://src/main.py");
        assert!(doc.version.is_none());
    }
}
