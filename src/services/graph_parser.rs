// スキーマグラフパーサーサービス
//
// アダプターが出力したスキーマグラフのスナップショット（YAML / JSON）を読み込みます。
// コアの正規化処理はこのパーサーが返す純粋なデータだけを扱います。

use crate::core::error::IoError;
use crate::core::graph::SchemaGraph;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// スナップショットの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// ファイル拡張子から形式を判定（.json 以外はYAMLとして扱う）
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }
}

/// スキーマグラフパーサーサービス
#[derive(Debug, Clone)]
pub struct GraphParserService {}

impl GraphParserService {
    /// 新しいGraphParserServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// スナップショットファイルを解析
    ///
    /// # Errors
    ///
    /// - ファイルが存在しない場合
    /// - ファイルの読み込みに失敗した場合
    /// - YAML / JSON の解析に失敗した場合
    pub fn parse_file(&self, file_path: &Path) -> Result<SchemaGraph> {
        if !file_path.exists() {
            return Err(IoError::FileNotFound {
                path: file_path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(file_path).map_err(|e| IoError::FileRead {
            path: file_path.display().to_string(),
            cause: e.to_string(),
        })?;

        let format = SnapshotFormat::from_path(file_path);
        debug!(path = %file_path.display(), ?format, "Parsing schema graph snapshot");

        self.parse_str(&content, format)
            .with_context(|| format!("Failed to parse schema graph: {:?}", file_path))
    }

    /// スナップショット文字列を解析
    pub fn parse_str(&self, content: &str, format: SnapshotFormat) -> Result<SchemaGraph> {
        let graph: SchemaGraph = match format {
            SnapshotFormat::Yaml => serde_saphyr::from_str(content)
                .with_context(|| "Invalid YAML schema graph")?,
            SnapshotFormat::Json => {
                serde_json::from_str(content).with_context(|| "Invalid JSON schema graph")?
            }
        };

        Ok(graph)
    }
}

impl Default for GraphParserService {
    fn default() -> Self {
        Self::new()
    }
}
