// ソーススキーマグラフ
//
// テーブル定義ライブラリが生成したオブジェクトグラフを、
// エコシステム非依存のプレーンデータとして表現する型群。
// ビルダーコールバックはアダプター側で事前に解決済みであることを前提とします。

use serde::{Deserialize, Serialize};
use std::fmt;

/// スキーマグラフのスナップショット
///
/// バインディング名ごとのエントリを、ソースグラフの列挙順のまま保持します。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaGraph {
    /// スナップショットのバージョン
    #[serde(default)]
    pub version: Option<String>,

    /// エントリのリスト（列挙順）
    #[serde(default)]
    pub entries: Vec<GraphEntry>,
}

impl SchemaGraph {
    /// 空のグラフを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを追加
    pub fn push(&mut self, entry: GraphEntry) {
        self.entries.push(entry);
    }

    /// テーブル宣言を列挙順で取得
    pub fn tables(&self) -> impl Iterator<Item = &TableDeclaration> {
        self.entries.iter().filter_map(|entry| match entry {
            GraphEntry::Table(table) => Some(table),
            _ => None,
        })
    }

    /// 列挙型宣言を列挙順で取得
    pub fn enums(&self) -> impl Iterator<Item = &EnumDeclaration> {
        self.entries.iter().filter_map(|entry| match entry {
            GraphEntry::Enum(decl) => Some(decl),
            _ => None,
        })
    }

    /// リレーション宣言を列挙順で取得
    pub fn relation_sets(&self) -> impl Iterator<Item = &RelationSetDeclaration> {
        self.entries.iter().filter_map(|entry| match entry {
            GraphEntry::Relations(set) => Some(set),
            _ => None,
        })
    }

    /// テーブル名（正規名）でテーブル宣言を検索
    pub fn table_named(&self, name: &str) -> Option<&TableDeclaration> {
        self.tables().find(|table| table.name == name)
    }
}

/// グラフのエントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphEntry {
    /// 列挙型宣言
    Enum(EnumDeclaration),

    /// テーブル宣言
    Table(TableDeclaration),

    /// リレーションセット宣言
    Relations(RelationSetDeclaration),

    /// 解析対象外のエクスポート
    #[serde(other)]
    Other,
}

impl GraphEntry {
    /// バインディング名を取得（対象外エントリはNone）
    pub fn binding(&self) -> Option<&str> {
        match self {
            GraphEntry::Enum(decl) => Some(&decl.binding),
            GraphEntry::Table(decl) => Some(&decl.binding),
            GraphEntry::Relations(decl) => Some(&decl.binding),
            GraphEntry::Other => None,
        }
    }
}

/// 列挙型宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    /// グラフ上のバインディング名
    pub binding: String,

    /// 列挙型自身の正規名
    pub name: String,

    /// 値のリスト（宣言順）
    #[serde(default)]
    pub values: Vec<String>,
}

/// テーブル宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDeclaration {
    /// グラフ上のバインディング名
    pub binding: String,

    /// テーブルの正規名
    pub name: String,

    /// カラム記述のリスト（宣言順）
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,

    /// インデックス宣言（インデックスビルダーを持たない場合はNone）
    #[serde(default)]
    pub indexes: Option<Vec<IndexDeclaration>>,

    /// インライン外部キー制約
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableDeclaration {
    /// 新しいテーブル宣言を作成（バインディング名は正規名と同じ）
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            binding: name.clone(),
            name,
            columns: Vec::new(),
            indexes: None,
            foreign_keys: Vec::new(),
        }
    }

    /// nameOf(table)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// inlineForeignKeysOf(table)
    pub fn inline_foreign_keys(&self) -> &[ForeignKeyDescriptor] {
        &self.foreign_keys
    }

    /// ストレージ名でカラムを検索
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// カラムを追加
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// 外部キーを追加
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// インデックスを追加（インデックスビルダーを有効化）
    pub fn with_index(mut self, index: IndexDeclaration) -> Self {
        self.indexes.get_or_insert_with(Vec::new).push(index);
        self
    }
}

/// カラム記述
///
/// 具体的なカラムクラスの代わりに、ストレージ種別・レンダリング済みSQL型などの
/// 正規化された属性でカラムを表現します。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// テーブルオブジェクト上のキー
    pub alias: String,

    /// ストレージ上のカラム名
    pub name: String,

    /// ストレージ種別
    pub storage: StorageKind,

    /// レンダリング済みストレージ型（例: "text[]", "bytea", "varchar(255)"）
    #[serde(default)]
    pub sql_type: String,

    /// NOT NULL制約
    #[serde(default)]
    pub not_null: bool,

    /// デフォルト値を持つか
    #[serde(default)]
    pub has_default: bool,

    /// デフォルト値（そのまま保持）
    #[serde(default)]
    pub default_value: Option<DefaultValue>,

    /// プライマリキー
    #[serde(default)]
    pub primary: bool,

    /// ユニーク制約
    #[serde(default)]
    pub unique: bool,

    /// 参照する列挙型の正規名（storage = enum の場合）
    #[serde(default)]
    pub enum_name: Option<String>,

    /// 文字列長
    #[serde(default)]
    pub length: Option<u32>,

    /// 更新時刻マーカー
    #[serde(default)]
    pub updated_at: bool,
}

impl ColumnDescriptor {
    /// 新しいカラム記述を作成（エイリアスはストレージ名と同じ）
    pub fn new(name: impl Into<String>, storage: StorageKind, sql_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            storage,
            sql_type: sql_type.into(),
            not_null: false,
            has_default: false,
            default_value: None,
            primary: false,
            unique: false,
            enum_name: None,
            length: None,
            updated_at: false,
        }
    }

    /// NOT NULLを設定
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// プライマリキーを設定（NOT NULLを含む）
    pub fn primary_key(mut self) -> Self {
        self.primary = true;
        self.not_null = true;
        self
    }

    /// デフォルト値を設定
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.has_default = true;
        self.default_value = Some(value);
        self
    }

    /// NULL許可かどうか
    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }
}

/// ストレージ種別
///
/// 未知の種別は `Other` に生の文字列のまま保持されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageKind {
    Enum,
    Timestamp,
    Boolean,
    Text,
    Integer,
    BigInt53,
    Jsonb,
    Varchar,
    Array,
    Custom,
    Numeric,
    Date,
    Other(String),
}

impl StorageKind {
    pub fn as_str(&self) -> &str {
        match self {
            StorageKind::Enum => "enum",
            StorageKind::Timestamp => "timestamp",
            StorageKind::Boolean => "boolean",
            StorageKind::Text => "text",
            StorageKind::Integer => "integer",
            StorageKind::BigInt53 => "bigint53",
            StorageKind::Jsonb => "jsonb",
            StorageKind::Varchar => "varchar",
            StorageKind::Array => "array",
            StorageKind::Custom => "custom",
            StorageKind::Numeric => "numeric",
            StorageKind::Date => "date",
            StorageKind::Other(raw) => raw,
        }
    }
}

impl From<String> for StorageKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "enum" => StorageKind::Enum,
            "timestamp" => StorageKind::Timestamp,
            "boolean" => StorageKind::Boolean,
            "text" => StorageKind::Text,
            "integer" => StorageKind::Integer,
            "bigint53" => StorageKind::BigInt53,
            "jsonb" => StorageKind::Jsonb,
            "varchar" => StorageKind::Varchar,
            "array" => StorageKind::Array,
            "custom" => StorageKind::Custom,
            "numeric" => StorageKind::Numeric,
            "date" => StorageKind::Date,
            _ => StorageKind::Other(raw),
        }
    }
}

impl From<StorageKind> for String {
    fn from(kind: StorageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// デフォルト値リテラル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(value) => write!(f, "{}", value),
            DefaultValue::Int(value) => write!(f, "{}", value),
            DefaultValue::Float(value) => write!(f, "{}", value),
            DefaultValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// インライン外部キー制約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// ローカル側カラム（ストレージ名）
    pub columns: Vec<String>,

    /// 参照先テーブルの正規名
    pub foreign_table: String,

    /// 参照先カラム（ストレージ名）
    pub foreign_columns: Vec<String>,
}

impl ForeignKeyDescriptor {
    pub fn new(columns: Vec<String>, foreign_table: impl Into<String>, foreign_columns: Vec<String>) -> Self {
        Self {
            columns,
            foreign_table: foreign_table.into(),
            foreign_columns,
        }
    }
}

/// インデックス宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDeclaration {
    /// 宣言名
    pub name: String,

    /// 対象カラム（ストレージ名、宣言順）
    #[serde(default)]
    pub columns: Vec<String>,

    /// ユニークフラグ
    #[serde(default)]
    pub unique: Option<bool>,

    /// 種別（"unique" / "normal" / "index"）
    #[serde(default)]
    pub kind: Option<String>,
}

impl IndexDeclaration {
    pub fn new(name: impl Into<String>, columns: Vec<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: Some(unique),
            kind: None,
        }
    }
}

/// リレーションセット宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationSetDeclaration {
    /// グラフ上のバインディング名
    pub binding: String,

    /// 宣言元テーブルの正規名
    pub table: String,

    /// 名前付きリレーション記述（宣言順）
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
}

/// リレーション記述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// リレーション名
    pub name: String,

    /// 基数タグ
    pub cardinality: RelationCardinality,

    /// 宣言元テーブルの正規名（省略時はリレーションセットのテーブル）
    #[serde(default)]
    pub source_table: String,

    /// 参照先テーブルの正規名
    pub referenced_table: String,

    /// 明示的な設定
    #[serde(default)]
    pub config: Option<RelationConfig>,
}

impl RelationDescriptor {
    /// 単数リレーションを作成
    pub fn one(name: impl Into<String>, source: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: RelationCardinality::One,
            source_table: source.into(),
            referenced_table: referenced.into(),
            config: None,
        }
    }

    /// コレクションリレーションを作成
    pub fn many(name: impl Into<String>, source: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: RelationCardinality::Many,
            source_table: source.into(),
            referenced_table: referenced.into(),
            config: None,
        }
    }

    /// 明示的な設定を付与
    pub fn with_config(mut self, config: RelationConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// リレーションの明示的な設定
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationConfig {
    /// ソース側カラム（ストレージ名）
    #[serde(default)]
    pub fields: Vec<String>,

    /// 参照先カラム（ストレージ名）
    #[serde(default)]
    pub references: Vec<String>,

    /// 任意リレーションか（未指定の場合はソースカラムのNULL許可から導出）
    #[serde(default)]
    pub optional: Option<bool>,

    /// 明示的なリレーション名
    #[serde(default)]
    pub relation_name: Option<String>,
}

/// リレーション基数タグ
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationCardinality {
    One,
    Many,
    Other(String),
}

impl From<String> for RelationCardinality {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "one" => RelationCardinality::One,
            "many" => RelationCardinality::Many,
            _ => RelationCardinality::Other(raw),
        }
    }
}

impl From<RelationCardinality> for String {
    fn from(cardinality: RelationCardinality) -> Self {
        cardinality.to_string()
    }
}

impl fmt::Display for RelationCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationCardinality::One => write!(f, "one"),
            RelationCardinality::Many => write!(f, "many"),
            RelationCardinality::Other(raw) => write!(f, "{}", raw),
        }
    }
}
