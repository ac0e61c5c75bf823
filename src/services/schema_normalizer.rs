// スキーマ正規化サービス
//
// 列挙型抽出、リレーション解決、モデル組み立てを順に実行し、
// 正規化されたスキーマIRとサマリーを生成します。
// I/Oを伴わない純粋な計算で、入力グラフを変更しません。

use crate::core::config::UnresolvedRelationPolicy;
use crate::core::error::{NormalizationWarning, NormalizeError};
use crate::core::graph::{SchemaGraph, StorageKind, TableDeclaration};
use crate::core::schema::{Enum, Model, Relation, SchemaIr};
use crate::services::enum_extractor::EnumExtractorService;
use crate::services::model_assembler::ModelAssemblerService;
use crate::services::relation_resolver::RelationResolverService;
use std::collections::HashSet;
use tracing::{debug, info};

/// 正規化オプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// 未解決リレーションの扱い
    pub unresolved_relations: UnresolvedRelationPolicy,
}

/// スキーマ正規化サービス
#[derive(Debug, Clone)]
pub struct SchemaNormalizerService {
    options: NormalizeOptions,
    enum_extractor: EnumExtractorService,
    relation_resolver: RelationResolverService,
    model_assembler: ModelAssemblerService,
}

impl SchemaNormalizerService {
    /// 既定のオプションでSchemaNormalizerServiceを作成
    pub fn new() -> Self {
        Self::with_options(NormalizeOptions::default())
    }

    /// オプションを指定してSchemaNormalizerServiceを作成
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            options,
            enum_extractor: EnumExtractorService::new(),
            relation_resolver: RelationResolverService::new(options.unresolved_relations),
            model_assembler: ModelAssemblerService::new(),
        }
    }

    /// 適用中のオプション
    pub fn options(&self) -> NormalizeOptions {
        self.options
    }

    /// スキーマグラフを正規化
    ///
    /// # Arguments
    ///
    /// * `graph` - ソーススキーマグラフのスナップショット
    ///
    /// # Returns
    ///
    /// モデル・列挙型・リレーションとサマリーを含むスキーマIR
    ///
    /// # Errors
    ///
    /// 致命的な条件を検出した時点で停止し、そのエラーを返します。
    pub fn normalize(&self, graph: &SchemaGraph) -> Result<SchemaIr, NormalizeError> {
        debug!(entries = graph.entries.len(), "Normalizing schema graph");

        let enums = self.enum_extractor.extract(graph);

        // すべてのモデル組み立てより前にリレーション解決を完了させる
        let resolved = self.relation_resolver.resolve(graph)?;

        let mut models = Vec::new();
        let mut seen = HashSet::new();
        for table in graph.tables() {
            if !seen.insert(table.name.as_str()) {
                return Err(NormalizeError::DuplicateModel {
                    name: table.name.clone(),
                });
            }
            let model = self.model_assembler.assemble(table, &resolved)?;
            check_enum_links(table, &enums)?;
            models.push(model);
        }

        let summary = format_summary(&models, &enums, &resolved.relations, &resolved.warnings);

        info!(
            models = models.len(),
            enums = enums.len(),
            relations = resolved.relations.len(),
            warnings = resolved.warnings.len(),
            "Normalized schema graph"
        );

        Ok(SchemaIr {
            models,
            enums,
            relations: resolved.relations,
            warnings: resolved.warnings,
            summary,
        })
    }
}

impl Default for SchemaNormalizerService {
    fn default() -> Self {
        Self::new()
    }
}

/// 列挙型カラムの参照先が抽出済みの列挙型であることを確認
fn check_enum_links(table: &TableDeclaration, enums: &[Enum]) -> Result<(), NormalizeError> {
    for descriptor in &table.columns {
        if descriptor.storage != StorageKind::Enum {
            continue;
        }
        let Some(enum_name) = descriptor.enum_name.as_deref() else {
            continue;
        };
        if !enums.iter().any(|e| e.canonical_name == enum_name) {
            return Err(NormalizeError::UnclassifiableColumn {
                table: table.name.clone(),
                column: descriptor.name.clone(),
                storage: descriptor.storage.to_string(),
                sql_type: descriptor.sql_type.clone(),
                reason: format!("unknown enum '{}'", enum_name),
            });
        }
    }
    Ok(())
}

/// 人間向けのサマリーを生成
fn format_summary(
    models: &[Model],
    enums: &[Enum],
    relations: &[Relation],
    warnings: &[NormalizationWarning],
) -> String {
    let mut output = String::new();

    output.push_str("===================================\n");
    output.push_str("Successfully parsed schema graph!\n");
    output.push_str("===================================\n");

    output.push_str(&format!("MODELS ({}):\n", models.len()));
    for model in models {
        output.push_str(&format!(
            "-> {} ({} columns, {} relations)\n",
            model.canonical_name,
            model.columns.len(),
            model.relations.len()
        ));
    }
    output.push_str("--\n");

    output.push_str(&format!("ENUMS ({}):\n", enums.len()));
    for e in enums {
        output.push_str(&format!("-> {} ({} values)\n", e.canonical_name, e.values.len()));
    }
    output.push_str("--\n");

    output.push_str(&format!("RELATIONS ({}):\n", relations.len()));
    for relation in relations {
        output.push_str(&format!(
            "* {} <-> {} [kind: {}, direction: {}]\n",
            relation.source_model(),
            relation.reference_model(),
            relation.kind(),
            relation.direction()
        ));
    }
    output.push_str("--\n");

    if !warnings.is_empty() {
        output.push_str(&format!("WARNINGS ({}):\n", warnings.len()));
        for warning in warnings {
            output.push_str(&format!("! {}\n", warning.message));
        }
        output.push_str("--\n");
    }

    output.push_str(">> RESULT <<:\n");
    output.push_str(&format!(
        "=> Models: {}, enums: {}, relations: {}.\n",
        models.len(),
        enums.len(),
        relations.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{
        ColumnDescriptor, EnumDeclaration, GraphEntry, RelationDescriptor,
        RelationSetDeclaration, StorageKind, TableDeclaration,
    };

    fn blog_graph() -> SchemaGraph {
        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Enum(EnumDeclaration {
            binding: "roleEnum".to_string(),
            name: "Role".to_string(),
            values: vec!["ADMIN".to_string(), "USER".to_string()],
        }));

        let mut role = ColumnDescriptor::new("role", StorageKind::Enum, "role").not_null();
        role.enum_name = Some("Role".to_string());
        graph.push(GraphEntry::Table(
            TableDeclaration::new("User")
                .with_column(ColumnDescriptor::new("id", StorageKind::Text, "text").primary_key())
                .with_column(role),
        ));
        graph.push(GraphEntry::Relations(RelationSetDeclaration {
            binding: "userRelations".to_string(),
            table: "User".to_string(),
            relations: vec![RelationDescriptor::one("manager", "User", "Manager")],
        }));
        graph
    }

    #[test]
    fn test_summary_lists_every_entity() {
        let ir = SchemaNormalizerService::new().normalize(&blog_graph()).unwrap();

        assert!(ir.summary.contains("MODELS (1):\n-> User (2 columns, 1 relations)"));
        assert!(ir.summary.contains("ENUMS (1):\n-> Role (2 values)"));
        assert!(ir.summary.contains("* User <-> Manager [kind: one, direction: out]"));
        assert!(ir.summary.contains("WARNINGS (1):"));
        assert!(ir.summary.ends_with("=> Models: 1, enums: 1, relations: 1.\n"));
    }

    #[test]
    fn test_error_policy_aborts_without_partial_ir() {
        let service = SchemaNormalizerService::with_options(NormalizeOptions {
            unresolved_relations: UnresolvedRelationPolicy::Error,
        });
        assert_eq!(service.options().unresolved_relations, UnresolvedRelationPolicy::Error);
        assert!(service.normalize(&blog_graph()).is_err());
    }

    #[test]
    fn test_duplicate_model_names_rejected() {
        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Table(TableDeclaration::new("User")));
        let mut duplicate = TableDeclaration::new("User");
        duplicate.binding = "users2".to_string();
        graph.push(GraphEntry::Table(duplicate));

        let error = SchemaNormalizerService::new().normalize(&graph).unwrap_err();
        assert_eq!(
            error,
            NormalizeError::DuplicateModel {
                name: "User".to_string()
            }
        );
    }

    #[test]
    fn test_empty_graph() {
        let ir = SchemaNormalizerService::new().normalize(&SchemaGraph::new()).unwrap();
        assert!(ir.models.is_empty());
        assert!(ir.enums.is_empty());
        assert!(ir.relations.is_empty());
        assert!(ir.summary.contains("=> Models: 0, enums: 0, relations: 0."));
    }
}
