// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、NormalizeError, ValidationError, IoError を定義します。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 正規化エラー
///
/// スキーマグラフの正規化を中断する致命的なエラーを表現します。
/// いずれかが発生した時点でパイプラインは停止し、部分的なIRは返されません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Column shape matches none of the supported type tags
    #[error("Cannot classify column '{column}' on table '{table}': {reason} (storage: {storage}, sql type: {sql_type})")]
    UnclassifiableColumn {
        /// テーブル名
        table: String,
        /// カラム名
        column: String,
        /// ストレージ種別
        storage: String,
        /// レンダリング済みSQL型
        sql_type: String,
        /// 分類できなかった理由
        reason: String,
    },

    /// Relation descriptor that is neither singular nor collection
    #[error("Relation '{relation}' on table '{table}' is neither a one nor a many relation (cardinality: {cardinality})")]
    MalformedRelation {
        /// 宣言元テーブル名
        table: String,
        /// リレーション名
        relation: String,
        /// 受け取った基数タグ
        cardinality: String,
    },

    /// Index kind other than unique/normal
    #[error("Unsupported index kind '{kind}' for index '{index}' on table '{table}'")]
    UnsupportedIndexKind {
        /// テーブル名
        table: String,
        /// インデックス名
        index: String,
        /// 受け取った種別
        kind: String,
    },

    /// Index configuration that cannot be classified unambiguously
    #[error("Ambiguous index '{index}' on table '{table}': {reason}")]
    AmbiguousIndex {
        /// テーブル名
        table: String,
        /// インデックス名
        index: String,
        /// 理由
        reason: String,
    },

    /// Singular relation whose fields could not be resolved (error policy only)
    #[error("Cannot resolve fields for relation '{relation}' on table '{table}': no explicit fields and no foreign key to '{referenced_table}'")]
    UnresolvedRelationFields {
        /// 宣言元テーブル名
        table: String,
        /// リレーション名
        relation: String,
        /// 参照先テーブル名
        referenced_table: String,
    },

    /// Two tables sharing a canonical name
    #[error("Duplicate model name '{name}'")]
    DuplicateModel {
        /// モデル名
        name: String,
    },
}

impl NormalizeError {
    /// カラム分類エラーかどうか
    pub fn is_unclassifiable_column(&self) -> bool {
        matches!(self, NormalizeError::UnclassifiableColumn { .. })
    }

    /// 不正リレーションエラーかどうか
    pub fn is_malformed_relation(&self) -> bool {
        matches!(self, NormalizeError::MalformedRelation { .. })
    }

    /// インデックス関連エラーかどうか
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            NormalizeError::UnsupportedIndexKind { .. } | NormalizeError::AmbiguousIndex { .. }
        )
    }

    /// リレーションフィールド未解決エラーかどうか
    pub fn is_unresolved_relation_fields(&self) -> bool {
        matches!(self, NormalizeError::UnresolvedRelationFields { .. })
    }

    /// エラーが発生したテーブル名を取得
    pub fn table(&self) -> Option<&str> {
        match self {
            NormalizeError::UnclassifiableColumn { table, .. }
            | NormalizeError::MalformedRelation { table, .. }
            | NormalizeError::UnsupportedIndexKind { table, .. }
            | NormalizeError::AmbiguousIndex { table, .. }
            | NormalizeError::UnresolvedRelationFields { table, .. } => Some(table),
            NormalizeError::DuplicateModel { name } => Some(name),
        }
    }
}

/// 正規化警告
///
/// パイプラインを止めない診断を表現します。
/// サマリーとログに記録され、制御フローには影響しません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationWarning {
    /// 警告メッセージ
    pub message: String,
    /// 警告発生位置
    pub location: Option<ErrorLocation>,
    /// 警告の種類
    pub kind: NormalizationWarningKind,
}

/// 正規化警告の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationWarningKind {
    /// リレーションのフィールドリストを解決できなかった
    UnresolvedRelationFields,
}

impl NormalizationWarning {
    /// リレーションフィールド未解決の警告を作成
    pub fn unresolved_relation_fields(table: &str, relation: &str, referenced_table: &str) -> Self {
        Self {
            message: format!(
                "Relation '{}' on '{}' has no fields: no explicit config and no foreign key to '{}'",
                relation, table, referenced_table
            ),
            location: Some(ErrorLocation::with_table(table.to_string())),
            kind: NormalizationWarningKind::UnresolvedRelationFields,
        }
    }

    /// 位置情報付きでフォーマット
    pub fn format(&self) -> String {
        let location_str = self
            .location
            .as_ref()
            .map_or(String::new(), |loc| loc.format());
        format!("Warning: {}{}", self.message, location_str)
    }
}

/// バリデーションエラー
///
/// 組み立て後のIRに対する参照整合性チェックで発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Reference error
    #[error("Reference error: {message}{}", format_location_opt(.location))]
    Reference {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
        /// 修正提案
        suggestion: Option<String>,
    },

    /// Constraint error
    #[error("Constraint error: {message}{}", format_location_opt(.location))]
    Constraint {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
        /// 修正提案
        suggestion: Option<String>,
    },
}

impl ValidationError {
    /// 参照エラーかどうか
    pub fn is_reference(&self) -> bool {
        matches!(self, ValidationError::Reference { .. })
    }

    /// 制約エラーかどうか
    pub fn is_constraint(&self) -> bool {
        matches!(self, ValidationError::Constraint { .. })
    }

    /// エラー発生位置を取得
    pub fn location(&self) -> Option<&ErrorLocation> {
        match self {
            ValidationError::Reference { location, .. }
            | ValidationError::Constraint { location, .. } => location.as_ref(),
        }
    }

    /// 修正提案を取得
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ValidationError::Reference { suggestion, .. }
            | ValidationError::Constraint { suggestion, .. } => suggestion.as_deref(),
        }
    }
}

/// バリデーション警告
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// 警告メッセージ
    pub message: String,
    /// 警告発生位置
    pub location: Option<ErrorLocation>,
}

impl ValidationWarning {
    /// 新しい警告を作成
    pub fn new(message: String, location: Option<ErrorLocation>) -> Self {
        Self { message, location }
    }

    /// 位置情報をフォーマット
    pub fn format(&self) -> String {
        let location_str = self
            .location
            .as_ref()
            .map_or(String::new(), |loc| loc.format());
        format!("Warning: {}{}", self.message, location_str)
    }
}

/// エラー発生位置
///
/// IR内のエラー発生位置を表現します。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorLocation {
    /// テーブル名
    pub table: Option<String>,
    /// カラム名
    pub column: Option<String>,
    /// リレーション名またはインデックス名
    pub member: Option<String>,
}

impl ErrorLocation {
    /// 新しいエラー位置を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブル名を指定してエラー位置を作成
    pub fn with_table(table: String) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    /// テーブル名とメンバー名を指定してエラー位置を作成
    pub fn with_member(table: String, member: String) -> Self {
        Self {
            table: Some(table),
            column: None,
            member: Some(member),
        }
    }

    /// 位置情報をフォーマット
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if let Some(table) = &self.table {
            parts.push(format!("table: {}", table));
        }
        if let Some(column) = &self.column {
            parts.push(format!("column: {}", column));
        }
        if let Some(member) = &self.member {
            parts.push(format!("member: {}", member));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

/// 位置情報をフォーマットするヘルパー関数
fn format_location_opt(location: &Option<ErrorLocation>) -> String {
    location.as_ref().map_or(String::new(), |loc| loc.format())
}

/// バリデーション結果
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// エラーのリスト
    pub errors: Vec<ValidationError>,
    /// 警告のリスト
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// 新しいバリデーション結果を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 警告を追加
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 検証が成功したかどうか（エラーがない場合は成功）
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// エラーの数を取得
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告の数を取得
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 他のバリデーション結果をマージ
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// I/Oエラー
///
/// ファイル操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// ファイルパス
        path: String,
    },

    /// File read error
    #[error("Failed to read file: {path} (cause: {cause})")]
    FileRead {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// File write error
    #[error("Failed to write file: {path} (cause: {cause})")]
    FileWrite {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl IoError {
    /// ファイルが見つからないエラーかどうか
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, IoError::FileNotFound { .. })
    }

    /// ファイル読み込みエラーかどうか
    pub fn is_file_read(&self) -> bool {
        matches!(self, IoError::FileRead { .. })
    }

    /// ファイル書き込みエラーかどうか
    pub fn is_file_write(&self) -> bool {
        matches!(self, IoError::FileWrite { .. })
    }
}
