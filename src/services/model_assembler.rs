// モデル組み立てサービス
//
// 単一のテーブル宣言と解決済みリレーションから正規化モデルを組み立てます。

use crate::core::error::NormalizeError;
use crate::core::graph::TableDeclaration;
use crate::core::schema::Model;
use crate::services::index_extractor::IndexExtractorService;
use crate::services::relation_resolver::ResolvedRelations;
use crate::services::type_classifier::TypeClassifierService;
use tracing::debug;

/// モデル組み立てサービス
#[derive(Debug, Clone)]
pub struct ModelAssemblerService {
    classifier: TypeClassifierService,
    index_extractor: IndexExtractorService,
}

impl ModelAssemblerService {
    /// 新しいModelAssemblerServiceを作成
    pub fn new() -> Self {
        Self {
            classifier: TypeClassifierService::new(),
            index_extractor: IndexExtractorService::new(),
        }
    }

    /// テーブル宣言からモデルを組み立てる
    ///
    /// # Arguments
    ///
    /// * `table` - テーブル宣言
    /// * `relations` - 解決済みリレーション（解決パス完了後のもの）
    ///
    /// # Errors
    ///
    /// いずれかのカラムが分類できない場合、またはインデックスが不正な場合。
    /// 部分的なモデルは返されません。
    pub fn assemble(
        &self,
        table: &TableDeclaration,
        relations: &ResolvedRelations,
    ) -> Result<Model, NormalizeError> {
        let mut model = Model::new(table.name.clone(), table.binding.clone());

        for descriptor in &table.columns {
            let column = self.classifier.classify(&table.name, descriptor)?;
            if let Some(replaced) = model.insert_column(column) {
                debug!(
                    model = %table.name,
                    column = %replaced.alias,
                    "Duplicate column alias, keeping the last declaration"
                );
            }
        }

        model.relations = relations.attached_to(&table.name);
        model.indexes = self.index_extractor.extract(table)?;

        debug!(
            model = %model.canonical_name,
            columns = model.columns.len(),
            relations = model.relations.len(),
            indexes = model.indexes.len(),
            "Assembled model"
        );

        Ok(model)
    }
}

impl Default for ModelAssemblerService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{ColumnDescriptor, IndexDeclaration, StorageKind};
    use crate::core::schema::{ColumnType, Direction, IndexKind, ManyRelation, Relation};

    #[test]
    fn test_assemble_columns_relations_indexes() {
        let table = TableDeclaration::new("Post")
            .with_column(ColumnDescriptor::new("id", StorageKind::Text, "text").primary_key())
            .with_column(ColumnDescriptor::new("title", StorageKind::Varchar, "varchar(120)"))
            .with_index(IndexDeclaration::new("title_idx", vec!["title".to_string()], false));

        let relations = ResolvedRelations {
            relations: vec![Relation::Many(ManyRelation {
                declared_name: "comments".to_string(),
                source_model: "Post".to_string(),
                reference_model: "Comment".to_string(),
                direction: Direction::Out,
            })],
            warnings: Vec::new(),
        };

        let model = ModelAssemblerService::new().assemble(&table, &relations).unwrap();
        assert_eq!(model.canonical_name, "Post");
        assert_eq!(model.columns.len(), 2);
        assert_eq!(model.columns[1].column_type, ColumnType::Varchar);
        assert_eq!(model.columns[1].length_hint, Some(120));
        assert_eq!(model.relations.len(), 1);
        assert_eq!(model.indexes[0].kind, IndexKind::Normal);
    }

    #[test]
    fn test_duplicate_alias_last_write_wins() {
        let mut second = ColumnDescriptor::new("name", StorageKind::Varchar, "varchar(40)");
        second.alias = "name".to_string();

        let table = TableDeclaration::new("Tag")
            .with_column(ColumnDescriptor::new("name", StorageKind::Text, "text"))
            .with_column(second);

        let model = ModelAssemblerService::new()
            .assemble(&table, &ResolvedRelations::default())
            .unwrap();
        assert_eq!(model.columns.len(), 1);
        assert_eq!(model.columns[0].column_type, ColumnType::Varchar);
    }

    #[test]
    fn test_unclassifiable_column_fails_whole_model() {
        let table = TableDeclaration::new("Place")
            .with_column(ColumnDescriptor::new("id", StorageKind::Integer, "integer"))
            .with_column(ColumnDescriptor::new("area", StorageKind::Custom, "polygon"));

        let error = ModelAssemblerService::new()
            .assemble(&table, &ResolvedRelations::default())
            .unwrap_err();
        assert!(error.is_unclassifiable_column());
        assert_eq!(error.table(), Some("Place"));
    }
}
