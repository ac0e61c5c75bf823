// Prismaスキーマジェネレーター
//
// 正規化IRからPrismaスキーマ文書を生成します。
// モデルと列挙型は名前順に並べ替えて出力します。

use crate::adapters::generator::{quote, SchemaGenerator};
use crate::core::schema::{Column, ColumnType, Direction, Enum, Index, Model, OneRelation, Relation, SchemaIr};
use std::collections::HashSet;

/// 既定のベースプレリュード（generator / datasource ブロック）
pub const DEFAULT_BASE_PRELUDE: &str = r#"generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}
"#;

/// Prismaスキーマジェネレーター
#[derive(Debug, Clone)]
pub struct PrismaGenerator {
    base_prelude: String,
}

impl PrismaGenerator {
    /// 既定のプレリュードで作成
    pub fn new() -> Self {
        Self {
            base_prelude: DEFAULT_BASE_PRELUDE.to_string(),
        }
    }

    /// ベースプレリュードを差し替え
    pub fn with_base_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.base_prelude = prelude.into();
        self
    }

    /// 列挙型ブロックを生成
    fn generate_enum(&self, e: &Enum) -> String {
        let mut block = format!("enum {} {{\n", e.canonical_name);
        for value in &e.values {
            block.push_str(&format!("  {}\n", value));
        }
        block.push('}');
        block
    }

    /// モデルブロックを生成
    fn generate_model(&self, model: &Model) -> String {
        let columns: Vec<String> = model
            .columns
            .iter()
            .map(|c| self.generate_column_definition(c))
            .collect();

        let mut used_names: HashSet<String> = model.columns.iter().map(|c| c.alias.clone()).collect();
        let relations: Vec<String> = model
            .relations
            .iter()
            .filter_map(|r| self.generate_relation(r, &mut used_names))
            .collect();

        let indexes: Vec<String> = model.indexes.iter().map(|i| self.generate_index(i)).collect();

        let mut sections = Vec::new();
        for (title, lines) in [
            ("//> Definition", &columns),
            ("//> Relations", &relations),
            ("//> Constraints & indexes", &indexes),
        ] {
            if lines.is_empty() {
                continue;
            }
            let mut section = format!("  {}\n", title);
            for line in lines {
                section.push_str(&format!("  {}\n", line));
            }
            sections.push(section);
        }

        format!("model {} {{\n{}}}", model.canonical_name, sections.join("\n"))
    }

    /// カラム定義を生成
    fn generate_column_definition(&self, column: &Column) -> String {
        let array = if column.is_array { "[]" } else { "" };
        // 配列カラムには `?` を付けない
        let nullable = if column.is_nullable && !column.is_array { "?" } else { "" };

        let type_name = match column.column_type {
            ColumnType::Enum => column.enum_name.clone().unwrap_or_else(|| column.alias.clone()),
            ColumnType::Date | ColumnType::Datetime => "DateTime".to_string(),
            ColumnType::Text | ColumnType::Varchar => "String".to_string(),
            ColumnType::Boolean => "Boolean".to_string(),
            ColumnType::Decimal => "Decimal".to_string(),
            ColumnType::Int => "Int".to_string(),
            ColumnType::Bigint => "BigInt".to_string(),
            ColumnType::Json => "Json".to_string(),
            ColumnType::Bytea => "Bytes".to_string(),
        };

        let mut parts = vec![column.alias.clone(), format!("{}{}{}", type_name, array, nullable)];

        if column.is_primary {
            parts.push("@id".to_string());
        } else if column.is_unique {
            parts.push("@unique".to_string());
        }

        if column.is_updated_at {
            parts.push("@updatedAt".to_string());
        }

        if let Some(default) = self.generate_default(column) {
            parts.push(default);
        }

        match column.column_type {
            ColumnType::Datetime => parts.push("@db.Timestamptz()".to_string()),
            ColumnType::Date => parts.push("@db.Date".to_string()),
            ColumnType::Varchar => match column.length_hint {
                Some(length) => parts.push(format!("@db.VarChar({})", length)),
                None => parts.push("@db.VarChar".to_string()),
            },
            ColumnType::Bytea => parts.push("@db.ByteA()".to_string()),
            _ => {}
        }

        parts.join(" ")
    }

    /// デフォルト属性を生成
    fn generate_default(&self, column: &Column) -> Option<String> {
        if column.has_generated_id {
            return Some("@default(cuid())".to_string());
        }

        match column.column_type {
            ColumnType::Date | ColumnType::Datetime => {
                // 日時のデフォルトは常に現在時刻として出力
                (column.has_default && !column.is_updated_at).then(|| "@default(now())".to_string())
            }
            ColumnType::Text | ColumnType::Varchar => column
                .default_value
                .as_ref()
                .map(|value| format!("@default({})", quote(&value.to_string()))),
            _ => column
                .default_value
                .as_ref()
                .map(|value| format!("@default({})", value)),
        }
    }

    /// リレーションフィールドを生成
    ///
    /// コレクションリレーションは出力しません。
    fn generate_relation(&self, relation: &Relation, used_names: &mut HashSet<String>) -> Option<String> {
        let Relation::One(one) = relation else {
            return None;
        };

        match one.direction {
            Direction::Out => {
                used_names.insert(one.alias.clone());
                Some(self.generate_outbound(one))
            }
            Direction::In => {
                let mut field = one.source_model.clone();
                if !used_names.insert(field.clone()) {
                    field = format!("{}_{}", one.source_model, one.declared_name);
                    used_names.insert(field.clone());
                }
                Some(format!(
                    "{} {}[] @relation(\"{}\")",
                    field,
                    one.source_model,
                    one.constraint_name()
                ))
            }
        }
    }

    fn generate_outbound(&self, one: &OneRelation) -> String {
        let optional = if one.is_optional { "?" } else { "" };
        let mut arguments = vec![format!("\"{}\"", one.constraint_name())];
        if !one.source_fields.is_empty() {
            arguments.push(format!("fields: [{}]", one.source_fields.join(", ")));
            arguments.push(format!("references: [{}]", one.reference_fields.join(", ")));
        }

        format!(
            "{} {}{} @relation({})",
            one.alias,
            one.reference_model,
            optional,
            arguments.join(", ")
        )
    }

    /// インデックス属性を生成
    fn generate_index(&self, index: &Index) -> String {
        let attribute = if index.is_unique() { "@@unique" } else { "@@index" };
        format!("{}([{}])", attribute, index.fields.join(", "))
    }
}

impl Default for PrismaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaGenerator for PrismaGenerator {
    fn generate(&self, ir: &SchemaIr) -> String {
        let mut models: Vec<&Model> = ir.models.iter().collect();
        models.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        let mut enums: Vec<&Enum> = ir.enums.iter().collect();
        enums.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));

        let mut output = String::new();
        output.push_str(self.base_prelude.trim_end());
        output.push_str("\n\n// ENUMS:\n");
        for e in enums {
            output.push('\n');
            output.push_str(&self.generate_enum(e));
            output.push('\n');
        }

        output.push_str("\n// MODELS:\n");
        for model in models {
            output.push('\n');
            output.push_str(&self.generate_model(model));
            output.push('\n');
        }

        output
    }

    fn file_extension(&self) -> &'static str {
        "prisma"
    }
}
