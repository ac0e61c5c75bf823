// initコマンドハンドラー
//
// プロジェクトの初期化処理を実装します。
// - デフォルト設定ファイルの生成（.tessera.yaml）
// - サンプルのスキーマグラフスナップショットの生成
// - 初期化済みプロジェクトの検出と警告

use crate::core::config::Config;
use crate::core::error::IoError;
use crate::core::naming::{DefaultNamingPolicy, NamingPolicy, NamingProfile};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// サンプルのスキーマグラフスナップショット
pub const EXAMPLE_GRAPH: &str = r#"version: "1"
entries:
  - kind: enum
    binding: roleEnum
    name: Role
    values: [ADMIN, USER]

  - kind: table
    binding: users
    name: User
    columns:
      - { alias: id, name: id, storage: text, sql_type: text, primary: true, not_null: true }
      - { alias: email, name: email, storage: varchar, sql_type: varchar(255), not_null: true, unique: true }
      - { alias: role, name: role, storage: enum, sql_type: role, enum_name: Role, not_null: true, has_default: true, default_value: USER }
      - { alias: settingsId, name: settings_id, storage: text, sql_type: text }
      - { alias: createdAt, name: created_at, storage: timestamp, sql_type: timestamp with time zone, not_null: true, has_default: true }
    indexes:
      - { name: users_email_idx, columns: [email], unique: true }

  - kind: table
    binding: userSettings
    name: UserSettings
    columns:
      - { alias: id, name: id, storage: text, sql_type: text, primary: true, not_null: true }
      - { alias: theme, name: theme, storage: text, sql_type: text, not_null: true, has_default: true, default_value: light }

  - kind: table
    binding: posts
    name: Post
    columns:
      - { alias: id, name: id, storage: text, sql_type: text, primary: true, not_null: true }
      - { alias: authorId, name: author_id, storage: text, sql_type: text, not_null: true }
      - { alias: tags, name: tags, storage: array, sql_type: "text[]" }
    foreign_keys:
      - { columns: [author_id], foreign_table: User, foreign_columns: [id] }

  - kind: relations
    binding: userRelations
    table: User
    relations:
      - name: settings
        cardinality: one
        referenced_table: UserSettings
        config: { fields: [settings_id], references: [id] }
      - name: posts
        cardinality: many
        referenced_table: Post

  - kind: relations
    binding: postRelations
    table: Post
    relations:
      - name: author
        cardinality: one
        referenced_table: User
"#;

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 強制的に初期化（既存の設定を上書き）
    pub force: bool,
}

/// initコマンドハンドラー
#[derive(Debug, Clone)]
pub struct InitCommandHandler {
    naming: NamingProfile,
}

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self {
            naming: DefaultNamingPolicy::current(),
        }
    }

    /// initコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は作成したファイルの一覧
    pub fn execute(&self, command: &InitCommand) -> Result<String> {
        if self.is_already_initialized(&command.project_path) && !command.force {
            return Err(anyhow!(
                "Project is already initialized. Use --force option to force re-initialization."
            ));
        }

        let config_path = self.generate_config_file(&command.project_path)?;
        let mut output = format!("Created {}\n", config_path.display());

        // 既存のスナップショットは上書きしない
        match self.generate_example_graph(&command.project_path)? {
            Some(graph_path) => output.push_str(&format!("Created {}\n", graph_path.display())),
            None => output.push_str(&format!("Kept existing {}\n", self.naming.graph_path)),
        }

        output.push_str(&format!(
            "Project initialized. Run `{} summary` to inspect the schema graph.",
            self.naming.binary_name
        ));
        Ok(output)
    }

    /// プロジェクトが既に初期化されているかチェック
    pub fn is_already_initialized(&self, project_path: &Path) -> bool {
        project_path.join(&self.naming.config_path).exists()
    }

    /// 設定ファイルを生成
    pub fn generate_config_file(&self, project_path: &Path) -> Result<PathBuf> {
        let yaml = Config::new().to_yaml()?;

        let config_path = project_path.join(&self.naming.config_path);
        write_file(&config_path, &yaml)?;
        debug!(path = %config_path.display(), "Wrote config file");

        Ok(config_path)
    }

    /// サンプルのスナップショットを生成（既に存在する場合はNone）
    pub fn generate_example_graph(&self, project_path: &Path) -> Result<Option<PathBuf>> {
        let graph_path = project_path.join(&self.naming.graph_path);
        if graph_path.exists() {
            return Ok(None);
        }

        if let Some(parent) = graph_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        write_file(&graph_path, EXAMPLE_GRAPH)?;
        debug!(path = %graph_path.display(), "Wrote example schema graph");

        Ok(Some(graph_path))
    }
}

impl Default for InitCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        IoError::FileWrite {
            path: path.display().to_string(),
            cause: e.to_string(),
        }
        .into()
    })
}
