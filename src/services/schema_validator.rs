// スキーマIRバリデーターサービス
//
// 組み立て後のIRに対して参照整合性を検証するサービス。
// リレーションとインデックスのフィールド、列挙型カラムの参照先を確認します。

use crate::core::error::{ErrorLocation, ValidationError, ValidationResult, ValidationWarning};
use crate::core::schema::{ColumnType, Direction, Model, OneRelation, Relation, SchemaIr};

/// スキーマIRバリデーターサービス
#[derive(Debug, Clone)]
pub struct SchemaValidatorService {}

impl SchemaValidatorService {
    /// 新しいSchemaValidatorServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// IR全体の検証を実行
    ///
    /// # Arguments
    ///
    /// * `ir` - 検証対象のスキーマIR
    ///
    /// # Returns
    ///
    /// 検証結果（エラーと警告のリスト）
    pub fn validate(&self, ir: &SchemaIr) -> ValidationResult {
        let mut result = ValidationResult::new();

        for model in &ir.models {
            result.merge(self.validate_enum_columns(model, ir));
            result.merge(self.validate_indexes(model));

            for relation in model.relations_in_direction(Direction::Out) {
                if let Relation::One(one) = relation {
                    result.merge(self.validate_one_relation(model, one, ir));
                }
            }
        }

        result
    }

    /// 列挙型カラムが抽出済みの列挙型を参照しているか
    fn validate_enum_columns(&self, model: &Model, ir: &SchemaIr) -> ValidationResult {
        let mut result = ValidationResult::new();

        for column in model.columns.iter().filter(|c| c.column_type == ColumnType::Enum) {
            let known = column
                .enum_name
                .as_deref()
                .is_some_and(|name| ir.get_enum(name).is_some());

            if !known {
                result.add_error(ValidationError::Reference {
                    message: format!(
                        "Column '{}' references unknown enum '{}'",
                        column.alias,
                        column.enum_name.as_deref().unwrap_or("<none>")
                    ),
                    location: Some(ErrorLocation {
                        table: Some(model.canonical_name.clone()),
                        column: Some(column.alias.clone()),
                        member: None,
                    }),
                    suggestion: Some("Export the enum declaration alongside the table".to_string()),
                });
            }
        }

        result
    }

    /// インデックスのフィールドがモデルに存在するか
    fn validate_indexes(&self, model: &Model) -> ValidationResult {
        let mut result = ValidationResult::new();

        for index in &model.indexes {
            for field in &index.fields {
                if model.get_column_by_name(field).is_none() {
                    result.add_error(ValidationError::Reference {
                        message: format!(
                            "Index '{}' references column '{}' which does not exist on '{}'",
                            index.name, field, model.canonical_name
                        ),
                        location: Some(ErrorLocation {
                            table: Some(model.canonical_name.clone()),
                            column: Some(field.clone()),
                            member: Some(index.name.clone()),
                        }),
                        suggestion: Some(format!(
                            "Define column '{}' or remove it from the index",
                            field
                        )),
                    });
                }
            }
        }

        result
    }

    /// 単数リレーションのフィールドリストを検証
    fn validate_one_relation(
        &self,
        model: &Model,
        relation: &OneRelation,
        ir: &SchemaIr,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        let location = ErrorLocation::with_member(
            model.canonical_name.clone(),
            relation.declared_name.clone(),
        );

        if relation.source_fields.is_empty() && relation.reference_fields.is_empty() {
            result.add_warning(ValidationWarning::new(
                format!(
                    "Relation '{}' has no fields and cannot be emitted with a key",
                    relation.declared_name
                ),
                Some(location),
            ));
            return result;
        }

        if relation.source_fields.len() != relation.reference_fields.len() {
            result.add_error(ValidationError::Constraint {
                message: format!(
                    "Relation '{}' has {} source field(s) but {} reference field(s)",
                    relation.declared_name,
                    relation.source_fields.len(),
                    relation.reference_fields.len()
                ),
                location: Some(location.clone()),
                suggestion: Some("List the same number of fields on both sides".to_string()),
            });
        }

        for field in &relation.source_fields {
            if model.get_column_by_name(field).is_none() {
                result.add_error(missing_field(field, &model.canonical_name, &location));
            }
        }

        match ir.get_model(&relation.reference_model) {
            Some(reference) => {
                for field in &relation.reference_fields {
                    if reference.get_column_by_name(field).is_none() {
                        result.add_error(missing_field(field, &reference.canonical_name, &location));
                    }
                }
            }
            None => {
                result.add_error(ValidationError::Reference {
                    message: format!(
                        "Relation '{}' references unknown model '{}'",
                        relation.declared_name, relation.reference_model
                    ),
                    location: Some(location),
                    suggestion: None,
                });
            }
        }

        result
    }
}

impl Default for SchemaValidatorService {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_field(field: &str, model: &str, location: &ErrorLocation) -> ValidationError {
    ValidationError::Reference {
        message: format!("Relation field '{}' does not exist on '{}'", field, model),
        location: Some(location.clone()),
        suggestion: Some(format!("Define column '{}' on '{}'", field, model)),
    }
}
