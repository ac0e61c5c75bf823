// generateコマンドハンドラー
//
// 正規化IRからテキスト文書を生成します。
// - スキーマグラフの読み込みと正規化
// - ベースプレリュードの解決（Prismaのみ）
// - 出力ファイルへの書き込み、または標準出力への表示

use crate::adapters::generator::{generator_for, GeneratorTarget};
use crate::cli::command_context::CommandContext;
use crate::core::error::IoError;
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// generateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 生成対象
    pub target: GeneratorTarget,
    /// 入力スナップショット
    pub input: Option<PathBuf>,
    /// ベースプレリュードのファイル
    pub base: Option<PathBuf>,
    /// 出力先（指定されない場合は設定ファイルから取得）
    pub output: Option<PathBuf>,
    /// 標準出力に表示
    pub stdout: bool,
}

/// generateコマンドハンドラー
#[derive(Debug, Clone)]
pub struct GenerateCommandHandler {}

impl GenerateCommandHandler {
    /// 新しいGenerateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// generateコマンドを実行
    ///
    /// # Returns
    ///
    /// 標準出力モードでは生成された文書、それ以外は書き込み結果のメッセージ
    pub fn execute(&self, command: &GenerateCommand) -> Result<String> {
        let context = CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let ir = context.load_ir(command.input.as_deref())?;

        let base_prelude = match command.target {
            GeneratorTarget::Prisma => self.load_base_prelude(&context, command.base.as_deref())?,
            GeneratorTarget::Types => None,
        };

        let generator = generator_for(command.target, base_prelude);
        let document = generator.generate(&ir);
        debug!(target_kind = %command.target, bytes = document.len(), "Generated document");

        if command.stdout {
            return Ok(document);
        }

        let output_path = match &command.output {
            Some(path) => context.resolve(path),
            None => match command.target {
                GeneratorTarget::Prisma => context.resolve(&context.config.outputs.prisma),
                GeneratorTarget::Types => context.resolve(&context.config.outputs.types),
            },
        };

        self.write_output(&output_path, &document)?;
        info!(path = %output_path.display(), "Wrote generated document");

        Ok(format!(
            "{} Generated {} ({} models, {} enums): {}",
            "✓".green(),
            command.target,
            ir.models.len(),
            ir.enums.len(),
            output_path.display()
        ))
    }

    /// ベースプレリュードを読み込む（引数が設定ファイルより優先）
    fn load_base_prelude(&self, context: &CommandContext, base: Option<&Path>) -> Result<Option<String>> {
        let path = match base.or(context.config.base_prelude.as_deref()) {
            Some(path) => context.resolve(path),
            None => return Ok(None),
        };

        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(&path).map_err(|e| IoError::FileRead {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        Ok(Some(content))
    }

    /// 出力ファイルに書き込む（親ディレクトリは必要に応じて作成）
    fn write_output(&self, path: &Path, document: &str) -> Result<()> {
        let write_error = |e: std::io::Error| IoError::FileWrite {
            path: path.display().to_string(),
            cause: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, document).map_err(write_error)?;
        Ok(())
    }
}

impl Default for GenerateCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
