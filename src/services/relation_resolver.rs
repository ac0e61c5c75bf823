// リレーション解決サービス
//
// スキーマグラフのリレーション宣言を走査し、単数（one）/コレクション（many）に分類します。
// 単数リレーションは参加カラムを解決し、明示的な設定が無い場合は
// 宣言元テーブルのインライン外部キー制約から推論します。

use crate::core::config::UnresolvedRelationPolicy;
use crate::core::error::{NormalizationWarning, NormalizeError};
use crate::core::graph::{
    RelationCardinality, RelationDescriptor, RelationSetDeclaration, SchemaGraph,
    TableDeclaration,
};
use crate::core::schema::{Direction, ManyRelation, OneRelation, Relation};
use tracing::{debug, warn};

/// 解決済みリレーション
///
/// すべてのモデル組み立てより前に完成している必要があります。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRelations {
    /// フラットなリレーションリスト（単数→コレクションの順、いずれも宣言側の向き）
    pub relations: Vec<Relation>,

    /// 解決中に記録された非致命的な診断
    pub warnings: Vec<NormalizationWarning>,
}

impl ResolvedRelations {
    /// 指定モデルに接続するリレーションを向き付きで取得
    ///
    /// 単数リレーションは宣言側に `out`、参照側に `in` として接続されます。
    /// コレクションリレーションは宣言側に `out` としてのみ接続されます。
    /// 返却順は入力（in）→出力（out）です。
    pub fn attached_to(&self, model: &str) -> Vec<Relation> {
        let inbound = self
            .relations
            .iter()
            .filter(|r| r.is_one() && r.reference_model() == model)
            .map(|r| r.with_direction(Direction::In));

        let outbound = self
            .relations
            .iter()
            .filter(|r| r.source_model() == model)
            .map(|r| r.with_direction(Direction::Out));

        inbound.chain(outbound).collect()
    }

    /// 単数リレーションの数
    pub fn one_count(&self) -> usize {
        self.relations.iter().filter(|r| r.is_one()).count()
    }

    /// コレクションリレーションの数
    pub fn many_count(&self) -> usize {
        self.relations.len() - self.one_count()
    }
}

/// リレーション解決サービス
#[derive(Debug, Clone)]
pub struct RelationResolverService {
    policy: UnresolvedRelationPolicy,
}

impl RelationResolverService {
    /// 新しいRelationResolverServiceを作成
    pub fn new(policy: UnresolvedRelationPolicy) -> Self {
        Self { policy }
    }

    /// グラフ内のすべてのリレーション宣言を解決
    ///
    /// # Errors
    ///
    /// - 単数でもコレクションでもない記述: `MalformedRelation`
    /// - `error` ポリシーでフィールドを解決できない単数リレーション: `UnresolvedRelationFields`
    pub fn resolve(&self, graph: &SchemaGraph) -> Result<ResolvedRelations, NormalizeError> {
        let mut one_relations = Vec::new();
        let mut many_relations = Vec::new();
        let mut warnings = Vec::new();

        for set in graph.relation_sets() {
            for descriptor in &set.relations {
                let source_table_name = source_table_name(set, descriptor);

                match &descriptor.cardinality {
                    RelationCardinality::One => {
                        let source_table = graph.table_named(source_table_name);
                        let relation =
                            self.resolve_one(source_table_name, source_table, descriptor, &mut warnings)?;
                        one_relations.push(Relation::One(relation));
                    }
                    RelationCardinality::Many => {
                        many_relations.push(Relation::Many(ManyRelation {
                            declared_name: descriptor.name.clone(),
                            source_model: source_table_name.to_string(),
                            reference_model: descriptor.referenced_table.clone(),
                            direction: Direction::Out,
                        }));
                    }
                    RelationCardinality::Other(raw) => {
                        return Err(NormalizeError::MalformedRelation {
                            table: source_table_name.to_string(),
                            relation: descriptor.name.clone(),
                            cardinality: raw.clone(),
                        });
                    }
                }
            }
        }

        let mut relations: Vec<Relation> = Vec::with_capacity(one_relations.len() + many_relations.len());
        for relation in one_relations.into_iter().chain(many_relations) {
            if !relations.contains(&relation) {
                relations.push(relation);
            }
        }

        debug!(
            count = relations.len(),
            warnings = warnings.len(),
            "Resolved relations"
        );

        Ok(ResolvedRelations {
            relations,
            warnings,
        })
    }

    /// 単数リレーションの参加カラムを解決
    fn resolve_one(
        &self,
        source_table_name: &str,
        source_table: Option<&TableDeclaration>,
        descriptor: &RelationDescriptor,
        warnings: &mut Vec<NormalizationWarning>,
    ) -> Result<OneRelation, NormalizeError> {
        let config = descriptor.config.clone().unwrap_or_default();
        let mut source_fields = config.fields;
        let mut reference_fields = config.references;
        let mut is_optional = config
            .optional
            .unwrap_or_else(|| any_nullable(source_table, &source_fields));

        if source_fields.is_empty() || reference_fields.is_empty() {
            debug!(
                model = %source_table_name,
                relation = %descriptor.name,
                "Missing source or referenced fields, extracting from foreign keys"
            );

            let foreign_key = source_table.and_then(|table| {
                table
                    .inline_foreign_keys()
                    .iter()
                    .find(|fk| fk.foreign_table == descriptor.referenced_table)
            });

            if let Some(fk) = foreign_key {
                source_fields = fk.columns.clone();
                reference_fields = fk.foreign_columns.clone();
                is_optional = any_nullable(source_table, &source_fields);
                debug!(
                    model = %source_table_name,
                    relation = %descriptor.name,
                    source = %source_fields.join(","),
                    referenced = %reference_fields.join(","),
                    "Detected source and referenced fields from foreign key"
                );
            } else {
                match self.policy {
                    UnresolvedRelationPolicy::Error => {
                        return Err(NormalizeError::UnresolvedRelationFields {
                            table: source_table_name.to_string(),
                            relation: descriptor.name.clone(),
                            referenced_table: descriptor.referenced_table.clone(),
                        });
                    }
                    UnresolvedRelationPolicy::Warn => {
                        let warning = NormalizationWarning::unresolved_relation_fields(
                            source_table_name,
                            &descriptor.name,
                            &descriptor.referenced_table,
                        );
                        warn!("{}", warning.message);
                        warnings.push(warning);
                        source_fields.clear();
                        reference_fields.clear();
                    }
                }
            }
        }

        Ok(OneRelation {
            declared_name: descriptor.name.clone(),
            alias: descriptor.name.clone(),
            relation_name: descriptor
                .config
                .as_ref()
                .and_then(|c| c.relation_name.clone()),
            source_model: source_table_name.to_string(),
            reference_model: descriptor.referenced_table.clone(),
            source_fields,
            reference_fields,
            is_optional,
            direction: Direction::Out,
        })
    }
}

impl Default for RelationResolverService {
    fn default() -> Self {
        Self::new(UnresolvedRelationPolicy::default())
    }
}

/// 記述の宣言元テーブル名（省略時はリレーションセットのテーブル）
fn source_table_name<'a>(
    set: &'a RelationSetDeclaration,
    descriptor: &'a RelationDescriptor,
) -> &'a str {
    if descriptor.source_table.is_empty() {
        &set.table
    } else {
        &descriptor.source_table
    }
}

/// 指定カラムのいずれかがNULL許可か
fn any_nullable(table: Option<&TableDeclaration>, columns: &[String]) -> bool {
    let Some(table) = table else {
        return false;
    };
    columns.iter().any(|name| {
        table
            .column_by_name(name)
            .is_some_and(|column| column.is_nullable())
    })
}
