// validateコマンドハンドラー
//
// 正規化IRの検証機能を実装します。
// - スキーマグラフの読み込みと正規化
// - 参照整合性チェックの実行
// - エラーと警告のフォーマットされた表示

use crate::cli::command_context::CommandContext;
use crate::core::error::ValidationResult;
use crate::core::schema::SchemaIr;
use crate::services::schema_validator::SchemaValidatorService;
use anyhow::{anyhow, Result};
use colored::Colorize;
use std::path::PathBuf;

/// validateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ValidateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 入力スナップショット（指定されない場合は設定ファイルから取得）
    pub input: Option<PathBuf>,
}

/// validateコマンドハンドラー
#[derive(Debug, Clone)]
pub struct ValidateCommandHandler {}

impl ValidateCommandHandler {
    /// 新しいValidateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// validateコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は検証結果のサマリー。検証エラーがある場合はレポート全体をエラーとして返します。
    pub fn execute(&self, command: &ValidateCommand) -> Result<String> {
        let context = CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let ir = context.load_ir(command.input.as_deref())?;

        let validation_result = SchemaValidatorService::new().validate(&ir);
        let report = self.format_validation_result(&validation_result, &ir);

        if validation_result.is_valid() {
            Ok(report)
        } else {
            Err(anyhow!(report))
        }
    }

    /// 検証結果をフォーマット
    fn format_validation_result(&self, result: &ValidationResult, ir: &SchemaIr) -> String {
        let mut output = String::new();

        output.push_str("=== Schema Validation Results ===\n\n");

        if !result.errors.is_empty() {
            output.push_str(&format!(
                "{} {} error(s) found:\n\n",
                "✗".red(),
                result.errors.len()
            ));

            for (i, error) in result.errors.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, error));

                if let Some(suggestion) = error.suggestion() {
                    output.push_str(&format!("   Suggestion: {}\n", suggestion));
                }

                output.push('\n');
            }
        }

        if !result.warnings.is_empty() {
            output.push_str(&format!(
                "{} {} warning(s) found:\n\n",
                "⚠".yellow(),
                result.warnings.len()
            ));
            for warning in &result.warnings {
                output.push_str(&format!("- {}\n", warning.format()));
            }
            output.push('\n');
        }

        output.push_str("=== Validation Statistics ===\n");
        output.push_str(&self.format_statistics(ir));

        output.push_str("\n=== Result ===\n");
        if result.is_valid() {
            output.push_str(&format!(
                "{} Validation complete. No errors found.\n",
                "✓".green()
            ));
        } else {
            output.push_str(&format!(
                "{} Validation complete. {} error(s) found.\n",
                "✗".red(),
                result.errors.len()
            ));
        }

        output
    }

    /// IRの統計情報をフォーマット
    fn format_statistics(&self, ir: &SchemaIr) -> String {
        let columns: usize = ir.models.iter().map(|m| m.columns.len()).sum();
        let indexes: usize = ir.models.iter().map(|m| m.indexes.len()).sum();

        format!(
            "Models: {}\nColumns: {}\nIndexes: {}\nEnums: {}\nRelations: {}\n",
            ir.model_count(),
            columns,
            indexes,
            ir.enums.len(),
            ir.relations.len()
        )
    }
}

impl Default for ValidateCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::init::EXAMPLE_GRAPH;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_example_graph() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("schema")).unwrap();
        fs::write(temp_dir.path().join("schema/graph.yaml"), EXAMPLE_GRAPH).unwrap();

        let command = ValidateCommand {
            project_path: temp_dir.path().to_path_buf(),
            config_path: None,
            input: None,
        };
        let output = ValidateCommandHandler::new().execute(&command).unwrap();
        assert!(output.contains("No errors found"));
        assert!(output.contains("Models: 3"));
        assert!(output.contains("Relations: 3"));
    }

    #[test]
    fn test_validate_reports_errors() {
        let temp_dir = TempDir::new().unwrap();
        let graph = r#"{
            "entries": [
                {"kind": "table", "binding": "posts", "name": "Post",
                 "columns": [{"alias": "id", "name": "id", "storage": "integer", "sql_type": "integer"}],
                 "indexes": [{"name": "by_slug", "columns": ["slug"], "unique": true}]}
            ]
        }"#;
        fs::write(temp_dir.path().join("graph.json"), graph).unwrap();

        let command = ValidateCommand {
            project_path: temp_dir.path().to_path_buf(),
            config_path: None,
            input: Some(PathBuf::from("graph.json")),
        };
        let error = ValidateCommandHandler::new().execute(&command).unwrap_err();
        assert!(error.to_string().contains("1 error(s) found"));
        assert!(error.to_string().contains("by_slug"));
    }
}
