// コマンド共通コンテキスト
//
// 設定ファイル読み込み、パス解決、スナップショットの正規化をCLI層で集約する。

use crate::core::config::Config;
use crate::core::schema::SchemaIr;
use crate::services::graph_parser::GraphParserService;
use crate::services::schema_normalizer::{NormalizeOptions, SchemaNormalizerService};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    ///
    /// 既定の設定ファイルが無い場合は既定値を使います。
    /// 明示的に指定された設定ファイルが無い場合はエラーです。
    pub fn load(project_path: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let explicit = config_path.is_some();
        let config_path = config_path
            .map(|p| resolve(&project_path, &p))
            .unwrap_or_else(|| project_path.join(Config::DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Config::from_file(&config_path).with_context(|| "Failed to read config file")?
        } else if explicit {
            return Err(anyhow!("Config file not found: {:?}", config_path));
        } else {
            debug!(path = %config_path.display(), "Config file not found, using defaults");
            Config::default()
        };

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// プロジェクトルート基準でパスを解決
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve(&self.project_path, path)
    }

    /// 入力スナップショットのパス（引数が優先）
    pub fn input_path(&self, input: Option<&Path>) -> PathBuf {
        match input {
            Some(path) => self.resolve(path),
            None => self.resolve(&self.config.input),
        }
    }

    /// 正規化オプション
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            unresolved_relations: self.config.unresolved_relations,
        }
    }

    /// スナップショットを読み込んで正規化
    pub fn load_ir(&self, input: Option<&Path>) -> Result<SchemaIr> {
        let input_path = self.input_path(input);
        let graph = GraphParserService::new().parse_file(&input_path)?;

        SchemaNormalizerService::with_options(self.normalize_options())
            .normalize(&graph)
            .with_context(|| format!("Failed to normalize schema graph: {:?}", input_path))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
