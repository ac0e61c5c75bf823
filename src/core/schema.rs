// 正規化スキーマIR
//
// ソーススキーマグラフから生成される、言語非依存の中間表現。
// Model, Column, Enum, Relation, Index, SchemaIr などの構造体を提供します。
// すべて一度だけ構築され、以後は読み取り専用として扱われます。

use crate::core::error::NormalizationWarning;
use crate::core::graph::DefaultValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// スキーマIR
///
/// 正規化パイプラインの最終成果物です。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaIr {
    /// モデルのリスト（ソースグラフの列挙順）
    pub models: Vec<Model>,

    /// 列挙型のリスト
    pub enums: Vec<Enum>,

    /// 解決済みリレーションのフラットなリスト
    pub relations: Vec<Relation>,

    /// 非致命的な診断
    #[serde(default)]
    pub warnings: Vec<NormalizationWarning>,

    /// 人間向けのサマリー
    pub summary: String,
}

impl SchemaIr {
    /// 正規名でモデルを取得
    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.canonical_name == name)
    }

    /// 正規名で列挙型を取得
    pub fn get_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.canonical_name == name)
    }

    /// モデル数を取得
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

/// 列挙型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// グラフ上のバインディング名
    pub alias: String,

    /// 下流で出力する正規名
    pub canonical_name: String,

    /// 値のリスト（宣言順）
    pub values: Vec<String>,
}

/// 正規カラム型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Enum,
    Boolean,
    Text,
    Varchar,
    Date,
    Datetime,
    Int,
    Bigint,
    Decimal,
    Json,
    Bytea,
}

impl ColumnType {
    /// 型タグ文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Enum => "enum",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
            ColumnType::Varchar => "varchar",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
            ColumnType::Int => "int",
            ColumnType::Bigint => "bigint",
            ColumnType::Decimal => "decimal",
            ColumnType::Json => "json",
            ColumnType::Bytea => "bytea",
        }
    }

    /// 配列形式をサポートする型か
    pub fn supports_array(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Json)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// カラム定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// テーブルオブジェクト上のキー
    pub alias: String,

    /// ストレージ上の名前
    pub canonical_name: String,

    /// カラム型
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// NULL許可フラグ
    pub is_nullable: bool,

    /// デフォルト値を持つか（生成IDを含む）
    pub has_default: bool,

    /// デフォルト値
    pub default_value: Option<DefaultValue>,

    /// プライマリキー
    pub is_primary: bool,

    /// ユニーク制約
    pub is_unique: bool,

    /// 配列カラム（text / json のみ）
    pub is_array: bool,

    /// 更新時刻マーカー
    pub is_updated_at: bool,

    /// ID生成規約によるデフォルトを持つか
    pub has_generated_id: bool,

    /// 参照する列挙型の正規名
    pub enum_name: Option<String>,

    /// varcharの長さヒント
    pub length_hint: Option<u32>,
}

impl Column {
    /// 新しいカラムを作成
    pub fn new(alias: String, canonical_name: String, column_type: ColumnType) -> Self {
        Self {
            alias,
            canonical_name,
            column_type,
            is_nullable: true,
            has_default: false,
            default_value: None,
            is_primary: false,
            is_unique: false,
            is_array: false,
            is_updated_at: false,
            has_generated_id: false,
            enum_name: None,
            length_hint: None,
        }
    }
}

/// リレーションの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 参照される側（逆方向ビュー）
    In,
    /// 宣言側（外部キーを所有）
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// リレーション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Relation {
    /// 単数リレーション
    One(OneRelation),
    /// コレクションリレーション
    Many(ManyRelation),
}

impl Relation {
    pub fn declared_name(&self) -> &str {
        match self {
            Relation::One(rel) => &rel.declared_name,
            Relation::Many(rel) => &rel.declared_name,
        }
    }

    pub fn source_model(&self) -> &str {
        match self {
            Relation::One(rel) => &rel.source_model,
            Relation::Many(rel) => &rel.source_model,
        }
    }

    pub fn reference_model(&self) -> &str {
        match self {
            Relation::One(rel) => &rel.reference_model,
            Relation::Many(rel) => &rel.reference_model,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Relation::One(rel) => rel.direction,
            Relation::Many(rel) => rel.direction,
        }
    }

    /// 基数タグ文字列
    pub fn kind(&self) -> &'static str {
        match self {
            Relation::One(_) => "one",
            Relation::Many(_) => "many",
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Relation::One(_))
    }

    /// 向きを差し替えた複製を作成
    pub fn with_direction(&self, direction: Direction) -> Self {
        match self {
            Relation::One(rel) => Relation::One(OneRelation {
                direction,
                ..rel.clone()
            }),
            Relation::Many(rel) => Relation::Many(ManyRelation {
                direction,
                ..rel.clone()
            }),
        }
    }
}

/// 単数リレーション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneRelation {
    /// 宣言名
    pub declared_name: String,

    /// 出力時のフィールド名
    pub alias: String,

    /// 明示的なリレーション名
    pub relation_name: Option<String>,

    /// 宣言側モデル
    pub source_model: String,

    /// 参照先モデル
    pub reference_model: String,

    /// 宣言側カラム
    pub source_fields: Vec<String>,

    /// 参照先カラム
    pub reference_fields: Vec<String>,

    /// 任意リレーション
    pub is_optional: bool,

    /// 向き
    pub direction: Direction,
}

impl OneRelation {
    /// フィールドリストが解決済みか
    pub fn is_resolved(&self) -> bool {
        !self.source_fields.is_empty() && self.source_fields.len() == self.reference_fields.len()
    }

    /// 出力用の制約名（"Reference_Source"）
    pub fn constraint_name(&self) -> String {
        self.relation_name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.reference_model, self.source_model))
    }
}

/// コレクションリレーション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyRelation {
    /// 宣言名
    pub declared_name: String,

    /// 宣言側モデル
    pub source_model: String,

    /// 参照先モデル
    pub reference_model: String,

    /// 向き
    pub direction: Direction,
}

/// インデックス種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Unique,
    Normal,
}

/// インデックス定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// インデックス種別
    pub kind: IndexKind,

    /// 宣言名
    pub name: String,

    /// 対象カラム（宣言順）
    pub fields: Vec<String>,
}

impl Index {
    /// 新しいインデックスを作成
    pub fn new(kind: IndexKind, name: String, fields: Vec<String>) -> Self {
        Self { kind, name, fields }
    }

    pub fn is_unique(&self) -> bool {
        self.kind == IndexKind::Unique
    }
}

/// モデル定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// モデルの正規名
    pub canonical_name: String,

    /// グラフ上のバインディング名
    pub binding: String,

    /// カラムのリスト（エイリアスは一意）
    pub columns: Vec<Column>,

    /// 入出力リレーション
    pub relations: Vec<Relation>,

    /// インデックス
    pub indexes: Vec<Index>,
}

impl Model {
    /// 新しいモデルを作成
    pub fn new(canonical_name: String, binding: String) -> Self {
        Self {
            canonical_name,
            binding,
            columns: Vec::new(),
            relations: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// カラムを追加
    ///
    /// 同じエイリアスのカラムが既に存在する場合は後勝ちで置き換え、
    /// 置き換えられたカラムを返します。位置は最初の挿入位置のままです。
    pub fn insert_column(&mut self, column: Column) -> Option<Column> {
        match self.columns.iter().position(|c| c.alias == column.alias) {
            Some(pos) => Some(std::mem::replace(&mut self.columns[pos], column)),
            None => {
                self.columns.push(column);
                None
            }
        }
    }

    /// エイリアスでカラムを取得
    pub fn get_column(&self, alias: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.alias == alias)
    }

    /// ストレージ名でカラムを取得
    pub fn get_column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.canonical_name == name)
    }

    /// 指定した向きのリレーションを取得
    pub fn relations_in_direction(&self, direction: Direction) -> impl Iterator<Item = &Relation> {
        self.relations
            .iter()
            .filter(move |r| r.direction() == direction)
    }
}
