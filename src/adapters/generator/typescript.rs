// TypeScript型定義ジェネレーター
//
// 正規化IRから型レベルのスキーマ記述（TypeScript型定義）を生成します。
// 出力順はIRの順序のままです。

use crate::adapters::generator::{quote, quoted_list, SchemaGenerator};
use crate::core::schema::{Column, Direction, Enum, Model, OneRelation, Relation, SchemaIr};

/// 生成される型定義が依存する基本型
pub const BASE_TYPES_PRELUDE: &str = r#"export type __ColumnType =
    | "enum"
    | "boolean"
    | "text"
    | "varchar"
    | "date"
    | "datetime"
    | "int"
    | "bigint"
    | "json"
    | "bytea"
    | "decimal";

export type __Column = {
    alias: string;
    name: string;
    type: __ColumnType;
    isNullable: boolean;
    isHasDefault: boolean;
    isPrimary: boolean;
    isUnique: boolean;
    enumName?: string;
};

export type __Enum = {
    name: string;
    values: string[];
};

export type __One = {
    type: "one";
    kind: "in" | "out";
    source: __Model;
    reference: __Model;
    sourceFields: string[];
    referenceFields: string[];
};

export type __Many = {
    type: "many";
    source: __Model;
    reference: __Model;
};

export type __Relation<O extends __One | __Many> = O;

export type __Model = {
    name: string;
    columns: Record<string, __Column>;
    relations: Record<string, __Relation<any>>;
    indexes: Record<string, string>;
};

export type __CreateColumn<O extends __Column> = O;
export type __CreateEnum<O extends __Enum> = O;
export type __CreateOne<O extends __One> = O;
export type __CreateMany<O extends __Many> = O;
export type __CreateRelation<O extends __One | __Many> = O;
export type __CreateModel<O extends __Model> = O;

export type __AllEntriesSetup = {
    models: Record<string, __Model>;
    enums: Record<string, __Enum>;
};
"#;

/// TypeScript型定義ジェネレーター
#[derive(Debug, Clone)]
pub struct TypeScriptGenerator {}

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self {}
    }

    fn generate_enum_type(&self, e: &Enum) -> String {
        format!(
            "export type {} = __CreateEnum<{{\n    name: {};\n    values: [{}];\n}}>;\n",
            e.alias,
            quote(&e.canonical_name),
            quoted_list(&e.values)
        )
    }

    fn generate_column_type(&self, column: &Column) -> String {
        let enum_name = match &column.enum_name {
            Some(name) => quote(name),
            None => "undefined".to_string(),
        };

        let mut lines = vec![format!("        {}: __CreateColumn<{{", column.alias)];
        lines.push(format!("            alias: {};", quote(&column.alias)));
        lines.push(format!("            name: {};", quote(&column.canonical_name)));
        lines.push(format!("            type: \"{}\";", column.column_type));
        lines.push(format!("            isNullable: {};", column.is_nullable));
        lines.push(format!("            isHasDefault: {};", column.has_default));
        lines.push(format!("            isPrimary: {};", column.is_primary));
        lines.push(format!("            isUnique: {};", column.is_unique));
        lines.push(format!("            enumName: {};", enum_name));
        lines.push("        }>;".to_string());
        lines.join("\n")
    }

    fn generate_relation_type(&self, relation: &OneRelation) -> String {
        let mut lines = vec![format!("        {}: __CreateRelation<{{", relation.alias)];
        lines.push("            type: \"one\";".to_string());
        lines.push(format!("            kind: \"{}\";", relation.direction));
        lines.push(format!("            source: {};", relation.source_model));
        lines.push(format!("            reference: {};", relation.reference_model));
        lines.push(format!(
            "            sourceFields: [{}];",
            quoted_list(&relation.source_fields)
        ));
        lines.push(format!(
            "            referenceFields: [{}];",
            quoted_list(&relation.reference_fields)
        ));
        lines.push("        }>;".to_string());
        lines.join("\n")
    }

    /// モデル型を生成
    ///
    /// リレーションは宣言側の単数リレーションのみ出力します。
    fn generate_model_type(&self, model: &Model) -> String {
        let columns: Vec<String> = model
            .columns
            .iter()
            .map(|c| self.generate_column_type(c))
            .collect();

        let relations: Vec<String> = model
            .relations_in_direction(Direction::Out)
            .filter_map(|r| match r {
                Relation::One(one) => Some(self.generate_relation_type(one)),
                Relation::Many(_) => None,
            })
            .collect();

        let mut output = format!("export type {} = __CreateModel<{{\n", model.canonical_name);
        output.push_str(&format!("    name: {};\n", quote(&model.canonical_name)));
        output.push_str(&block("columns", &columns));
        output.push_str(&block("relations", &relations));
        output.push_str("    indexes: {};\n");
        output.push_str("}>;\n");
        output
    }
}

impl Default for TypeScriptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaGenerator for TypeScriptGenerator {
    fn generate(&self, ir: &SchemaIr) -> String {
        let mut output = String::from(BASE_TYPES_PRELUDE);

        for e in &ir.enums {
            output.push('\n');
            output.push_str(&self.generate_enum_type(e));
        }

        for model in &ir.models {
            output.push('\n');
            output.push_str(&self.generate_model_type(model));
        }

        let models: Vec<String> = ir
            .models
            .iter()
            .map(|m| format!("    {}: {};", m.canonical_name, m.canonical_name))
            .collect();
        let enums: Vec<String> = ir
            .enums
            .iter()
            .map(|e| format!("    {}: {};", e.canonical_name, e.alias))
            .collect();

        output.push('\n');
        output.push_str(&type_literal("__AllModels", &models));
        output.push('\n');
        output.push_str(&type_literal("__AllEnums", &enums));
        output.push_str("\nexport type __AllEntries = {\n    models: __AllModels;\n    enums: __AllEnums;\n};\n");

        output
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }
}

fn block(name: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return format!("    {}: {{}};\n", name);
    }
    format!("    {}: {{\n{}\n    }};\n", name, entries.join("\n"))
}

fn type_literal(name: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return format!("export type {} = {{}};\n", name);
    }
    format!("export type {} = {{\n{}\n}};\n", name, entries.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ColumnType, ManyRelation};

    fn sample_ir() -> SchemaIr {
        let mut user = Model::new("User".to_string(), "users".to_string());
        let mut id = Column::new("id".to_string(), "id".to_string(), ColumnType::Text);
        id.is_nullable = false;
        id.is_primary = true;
        id.has_default = true;
        user.insert_column(id);
        let mut role = Column::new("role".to_string(), "role".to_string(), ColumnType::Enum);
        role.enum_name = Some("Role".to_string());
        user.insert_column(role);

        let settings = OneRelation {
            declared_name: "settings".to_string(),
            alias: "settings".to_string(),
            relation_name: None,
            source_model: "User".to_string(),
            reference_model: "UserSettings".to_string(),
            source_fields: vec!["settingsId".to_string()],
            reference_fields: vec!["id".to_string()],
            is_optional: true,
            direction: Direction::Out,
        };
        user.relations.push(Relation::One(settings.clone()));
        user.relations.push(Relation::One(OneRelation {
            alias: "owner".to_string(),
            direction: Direction::In,
            ..settings
        }));
        user.relations.push(Relation::Many(ManyRelation {
            declared_name: "posts".to_string(),
            source_model: "User".to_string(),
            reference_model: "Post".to_string(),
            direction: Direction::Out,
        }));

        SchemaIr {
            models: vec![user],
            enums: vec![Enum {
                alias: "roleEnum".to_string(),
                canonical_name: "Role".to_string(),
                values: vec!["ADMIN".to_string(), "USER".to_string()],
            }],
            relations: Vec::new(),
            warnings: Vec::new(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_enum_type() {
        let output = TypeScriptGenerator::new().generate(&sample_ir());
        assert!(output.contains(
            "export type roleEnum = __CreateEnum<{\n    name: \"Role\";\n    values: [\"ADMIN\", \"USER\"];\n}>;"
        ));
        assert!(output.contains("    Role: roleEnum;"));
    }

    #[test]
    fn test_column_metadata() {
        let output = TypeScriptGenerator::new().generate(&sample_ir());
        assert!(output.contains("            type: \"text\";\n            isNullable: false;"));
        assert!(output.contains("            enumName: \"Role\";"));
        assert!(output.contains("            enumName: undefined;"));
    }

    #[test]
    fn test_only_outbound_one_relations() {
        let output = TypeScriptGenerator::new().generate(&sample_ir());
        assert!(output.contains("        settings: __CreateRelation<{"));
        assert!(output.contains("            reference: UserSettings;"));
        assert!(output.contains("            sourceFields: [\"settingsId\"];"));
        assert!(!output.contains("owner:"));
        assert!(!output.contains("posts:"));
    }

    #[test]
    fn test_aggregate_types() {
        let output = TypeScriptGenerator::new().generate(&sample_ir());
        assert!(output.starts_with("export type __ColumnType"));
        assert!(output.contains("export type __AllModels = {\n    User: User;\n};"));
        assert!(output.ends_with("export type __AllEntries = {\n    models: __AllModels;\n    enums: __AllEnums;\n};\n"));
    }

    #[test]
    fn test_empty_ir() {
        let ir = SchemaIr {
            models: Vec::new(),
            enums: Vec::new(),
            relations: Vec::new(),
            warnings: Vec::new(),
            summary: String::new(),
        };
        let output = TypeScriptGenerator::default().generate(&ir);
        assert!(output.contains("export type __AllModels = {};"));
        assert!(output.contains("export type __AllEnums = {};"));
    }
}
