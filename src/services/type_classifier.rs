// カラム型分類サービス
//
// 正規化されたカラム記述を、固定集合の正規カラム型のいずれかに分類します。
// 型タグの判定は順序付きで、最初に一致したものが採用されます。

use crate::core::error::NormalizeError;
use crate::core::graph::{ColumnDescriptor, StorageKind};
use crate::core::schema::{Column, ColumnType};
use regex::Regex;
use std::sync::LazyLock;

/// "varchar(255)" / "character varying(255)" の長さ部分
static VARCHAR_LENGTH: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:varchar|character varying)\s*\(\s*(\d+)\s*\)").ok()
});

/// 型分類の結果（型タグと配列フラグ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Classification {
    column_type: ColumnType,
    is_array: bool,
}

impl Classification {
    fn scalar(column_type: ColumnType) -> Self {
        Self {
            column_type,
            is_array: false,
        }
    }

    fn array(column_type: ColumnType) -> Self {
        Self {
            column_type,
            is_array: true,
        }
    }
}

/// カラム型分類サービス
#[derive(Debug, Clone)]
pub struct TypeClassifierService {}

impl TypeClassifierService {
    /// 新しいTypeClassifierServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// カラム記述を正規カラムに分類
    ///
    /// # Arguments
    ///
    /// * `table` - カラムを含むテーブルの正規名（エラー報告用）
    /// * `descriptor` - カラム記述
    ///
    /// # Errors
    ///
    /// どの型タグにも一致しない場合、またはサポートされない配列要素型の場合は
    /// `NormalizeError::UnclassifiableColumn` を返します。
    pub fn classify(
        &self,
        table: &str,
        descriptor: &ColumnDescriptor,
    ) -> Result<Column, NormalizeError> {
        let classification = self.classify_type(table, descriptor)?;

        let mut column = Column::new(
            descriptor.alias.clone(),
            descriptor.name.clone(),
            classification.column_type,
        );
        column.is_nullable = descriptor.is_nullable();
        column.is_primary = descriptor.primary;
        column.is_unique = descriptor.unique;
        column.is_array = classification.is_array;
        column.is_updated_at = descriptor.updated_at;
        column.default_value = descriptor.default_value.clone();
        column.has_default = descriptor.has_default;

        if classification.column_type == ColumnType::Enum {
            column.enum_name = descriptor.enum_name.clone();
        }

        if classification.column_type == ColumnType::Varchar {
            column.length_hint = descriptor
                .length
                .or_else(|| parse_length_hint(&descriptor.sql_type));
        }

        // テキスト型の主キーでデフォルト値が無いものはID生成規約の対象
        if column.column_type == ColumnType::Text
            && column.is_primary
            && !column.is_array
            && column.default_value.is_none()
        {
            column.has_generated_id = true;
            column.has_default = true;
        }

        Ok(column)
    }

    /// 型タグを判定（最初に一致したものを採用）
    fn classify_type(
        &self,
        table: &str,
        descriptor: &ColumnDescriptor,
    ) -> Result<Classification, NormalizeError> {
        match &descriptor.storage {
            StorageKind::Enum => {
                if descriptor.enum_name.is_none() {
                    return Err(unclassifiable(
                        table,
                        descriptor,
                        "enum column without an enum name",
                    ));
                }
                Ok(Classification::scalar(ColumnType::Enum))
            }
            StorageKind::Timestamp => Ok(Classification::scalar(ColumnType::Datetime)),
            StorageKind::Boolean => Ok(Classification::scalar(ColumnType::Boolean)),
            StorageKind::Text => Ok(Classification::scalar(ColumnType::Text)),
            StorageKind::Integer => Ok(Classification::scalar(ColumnType::Int)),
            StorageKind::BigInt53 => Ok(Classification::scalar(ColumnType::Bigint)),
            StorageKind::Jsonb => Ok(Classification::scalar(ColumnType::Json)),
            StorageKind::Varchar => Ok(Classification::scalar(ColumnType::Varchar)),
            StorageKind::Array => match descriptor.sql_type.trim() {
                "text[]" => Ok(Classification::array(ColumnType::Text)),
                "jsonb[]" => Ok(Classification::array(ColumnType::Json)),
                _ => Err(unclassifiable(
                    table,
                    descriptor,
                    "unsupported array element type",
                )),
            },
            StorageKind::Custom => match descriptor.sql_type.trim() {
                "bytea" => Ok(Classification::scalar(ColumnType::Bytea)),
                _ => Err(unclassifiable(
                    table,
                    descriptor,
                    "unsupported custom column type",
                )),
            },
            StorageKind::Numeric => Ok(Classification::scalar(ColumnType::Decimal)),
            StorageKind::Date => Ok(Classification::scalar(ColumnType::Date)),
            StorageKind::Other(_) => Err(unclassifiable(table, descriptor, "no type tag matched")),
        }
    }
}

impl Default for TypeClassifierService {
    fn default() -> Self {
        Self::new()
    }
}

fn unclassifiable(table: &str, descriptor: &ColumnDescriptor, reason: &str) -> NormalizeError {
    NormalizeError::UnclassifiableColumn {
        table: table.to_string(),
        column: descriptor.name.clone(),
        storage: descriptor.storage.to_string(),
        sql_type: descriptor.sql_type.clone(),
        reason: reason.to_string(),
    }
}

/// "varchar(255)" 形式のSQL型から長さを取り出す
fn parse_length_hint(sql_type: &str) -> Option<u32> {
    let caps = VARCHAR_LENGTH.as_ref()?.captures(sql_type)?;
    caps.get(1)?.as_str().parse().ok()
}
