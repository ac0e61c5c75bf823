// summaryコマンドハンドラー
//
// スキーマグラフを正規化し、サマリーとチェックサムを表示します。
// --json 指定時は正規化IRをJSONで出力します。

use crate::cli::command_context::CommandContext;
use crate::core::schema::SchemaIr;
use crate::services::schema_checksum::SchemaChecksumService;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// summaryコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct SummaryCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 入力スナップショット（指定されない場合は設定ファイルから取得）
    pub input: Option<PathBuf>,
    /// JSON出力
    pub json: bool,
}

/// summaryコマンドハンドラー
#[derive(Debug, Clone)]
pub struct SummaryCommandHandler {}

impl SummaryCommandHandler {
    /// 新しいSummaryCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// summaryコマンドを実行
    pub fn execute(&self, command: &SummaryCommand) -> Result<String> {
        let context = CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let ir = context.load_ir(command.input.as_deref())?;

        if command.json {
            return serde_json::to_string_pretty(&ir).with_context(|| "Failed to serialize schema IR");
        }

        self.format_summary(&ir)
    }

    /// サマリーとチェックサムをフォーマット
    pub fn format_summary(&self, ir: &SchemaIr) -> Result<String> {
        let checksum = SchemaChecksumService::new()
            .calculate_checksum(ir)
            .with_context(|| "Failed to calculate schema checksum")?;

        let mut output = ir.summary.clone();
        output.push_str(&format!("{} {}", "Checksum:".bold(), checksum));
        Ok(output)
    }
}

impl Default for SummaryCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
