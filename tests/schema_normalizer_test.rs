/// スキーマ正規化のテスト
///
/// ソーススキーマグラフから正規化IRへの変換全体を確認します。

#[cfg(test)]
mod schema_normalizer_tests {
    use tessera::core::config::UnresolvedRelationPolicy;
    use tessera::core::error::NormalizeError;
    use tessera::core::graph::{
        ColumnDescriptor, ForeignKeyDescriptor, GraphEntry, IndexDeclaration, RelationConfig,
        RelationDescriptor, RelationSetDeclaration, SchemaGraph, StorageKind, TableDeclaration,
    };
    use tessera::core::schema::{ColumnType, Direction, IndexKind, Relation};
    use tessera::services::schema_checksum::SchemaChecksumService;
    use tessera::services::schema_normalizer::{NormalizeOptions, SchemaNormalizerService};

    fn relation_set(table: &str, relations: Vec<RelationDescriptor>) -> GraphEntry {
        GraphEntry::Relations(RelationSetDeclaration {
            binding: format!("{}Relations", table),
            table: table.to_string(),
            relations,
        })
    }

    /// User / UserSettings の2モデル構成
    fn user_settings_graph() -> SchemaGraph {
        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Table(
            TableDeclaration::new("User")
                .with_column(ColumnDescriptor::new("id", StorageKind::Text, "text").primary_key())
                .with_column(ColumnDescriptor::new("settingsId", StorageKind::Text, "text"))
                .with_foreign_key(ForeignKeyDescriptor::new(
                    vec!["settingsId".to_string()],
                    "UserSettings",
                    vec!["id".to_string()],
                )),
        ));
        graph.push(GraphEntry::Table(
            TableDeclaration::new("UserSettings")
                .with_column(ColumnDescriptor::new("id", StorageKind::Text, "text").primary_key()),
        ));
        graph.push(relation_set(
            "User",
            vec![RelationDescriptor::one("settings", "User", "UserSettings")],
        ));
        graph.push(relation_set(
            "UserSettings",
            vec![RelationDescriptor::many("user", "UserSettings", "User")],
        ));
        graph
    }

    /// 2モデル構成のラウンドトリップ
    #[test]
    fn test_user_settings_round_trip() {
        let ir = SchemaNormalizerService::new()
            .normalize(&user_settings_graph())
            .unwrap();

        let user = ir.get_model("User").unwrap();
        assert_eq!(user.relations.len(), 1);
        assert_eq!(user.relations_in_direction(Direction::In).count(), 0);
        match &user.relations[0] {
            Relation::One(one) => {
                assert_eq!(one.direction, Direction::Out);
                assert_eq!(one.reference_model, "UserSettings");
                assert_eq!(one.source_fields, vec!["settingsId".to_string()]);
                assert_eq!(one.reference_fields, vec!["id".to_string()]);
                assert!(one.is_optional);
            }
            other => panic!("Expected one relation, got {:?}", other),
        }

        let settings = ir.get_model("UserSettings").unwrap();
        assert_eq!(settings.relations.len(), 2);
        match &settings.relations[0] {
            Relation::One(one) => {
                assert_eq!(one.direction, Direction::In);
                assert_eq!(one.source_fields, vec!["settingsId".to_string()]);
                assert_eq!(one.reference_fields, vec!["id".to_string()]);
            }
            other => panic!("Expected inbound one relation, got {:?}", other),
        }
        match &settings.relations[1] {
            Relation::Many(many) => {
                assert_eq!(many.direction, Direction::Out);
                assert_eq!(many.reference_model, "User");
            }
            other => panic!("Expected outbound many relation, got {:?}", other),
        }

        let id = user.get_column("id").unwrap();
        assert!(id.has_generated_id);
        assert!(id.has_default);
        assert!(!id.is_nullable);
        assert!(ir.warnings.is_empty());
    }

    /// 同じ入力からは同一のIRが得られる
    #[test]
    fn test_normalize_is_idempotent() {
        let graph = user_settings_graph();
        let service = SchemaNormalizerService::new();

        let first = service.normalize(&graph).unwrap();
        let second = service.normalize(&graph).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let checksum = SchemaChecksumService::new();
        assert_eq!(
            checksum.calculate_checksum(&first).unwrap(),
            checksum.calculate_checksum(&second).unwrap()
        );
    }

    /// 外部キーからのフィールド推論
    #[test]
    fn test_foreign_key_fallback_follows_nullability() {
        for not_null in [false, true] {
            let mut author_id = ColumnDescriptor::new("author_id", StorageKind::Integer, "integer");
            author_id.not_null = not_null;

            let mut graph = SchemaGraph::new();
            graph.push(GraphEntry::Table(
                TableDeclaration::new("Post")
                    .with_column(author_id)
                    .with_foreign_key(ForeignKeyDescriptor::new(
                        vec!["author_id".to_string()],
                        "Author",
                        vec!["uid".to_string()],
                    )),
            ));
            graph.push(GraphEntry::Table(
                TableDeclaration::new("Author")
                    .with_column(ColumnDescriptor::new("uid", StorageKind::Integer, "integer").primary_key()),
            ));
            graph.push(relation_set("Post", vec![RelationDescriptor::one("author", "Post", "Author")]));

            let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
            match &ir.relations[0] {
                Relation::One(one) => {
                    assert_eq!(one.source_fields, vec!["author_id".to_string()]);
                    assert_eq!(one.reference_fields, vec!["uid".to_string()]);
                    assert_eq!(one.is_optional, !not_null);
                }
                other => panic!("Expected one relation, got {:?}", other),
            }
        }
    }

    /// 明示的な設定は外部キーより優先される
    #[test]
    fn test_explicit_config_wins_over_foreign_key() {
        let mut graph = user_settings_graph();
        graph.entries.truncate(2);
        graph.push(relation_set(
            "User",
            vec![RelationDescriptor::one("settings", "User", "UserSettings").with_config(
                RelationConfig {
                    fields: vec!["id".to_string()],
                    references: vec!["id".to_string()],
                    optional: Some(false),
                    relation_name: Some("SharedId".to_string()),
                },
            )],
        ));

        let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
        match &ir.relations[0] {
            Relation::One(one) => {
                assert_eq!(one.source_fields, vec!["id".to_string()]);
                assert!(!one.is_optional);
                assert_eq!(one.constraint_name(), "SharedId");
            }
            other => panic!("Expected one relation, got {:?}", other),
        }
    }

    /// 未解決リレーションのポリシー
    #[test]
    fn test_unresolved_relation_policies() {
        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Table(TableDeclaration::new("Post")));
        graph.push(relation_set("Post", vec![RelationDescriptor::one("author", "Post", "User")]));

        let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
        assert_eq!(ir.warnings.len(), 1);
        assert!(ir.warnings[0].message.contains("author"));

        let strict = SchemaNormalizerService::with_options(NormalizeOptions {
            unresolved_relations: UnresolvedRelationPolicy::Error,
        });
        let error = strict.normalize(&graph).unwrap_err();
        assert!(error.is_unresolved_relation_fields());
    }

    /// 2カラムのユニークインデックス
    #[test]
    fn test_unique_index_over_two_columns() {
        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Table(
            TableDeclaration::new("Membership")
                .with_column(ColumnDescriptor::new("team_id", StorageKind::Integer, "integer"))
                .with_column(ColumnDescriptor::new("user_id", StorageKind::Integer, "integer"))
                .with_index(IndexDeclaration::new(
                    "membership_unique",
                    vec!["user_id".to_string(), "team_id".to_string()],
                    true,
                )),
        ));

        let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
        let model = ir.get_model("Membership").unwrap();
        assert_eq!(model.indexes.len(), 1);
        assert_eq!(model.indexes[0].kind, IndexKind::Unique);
        assert_eq!(
            model.indexes[0].fields,
            vec!["user_id".to_string(), "team_id".to_string()]
        );
    }

    /// 同じエイリアスのカラムは後勝ち
    #[test]
    fn test_duplicate_column_alias_last_write_wins() {
        let mut replacement = ColumnDescriptor::new("email_address", StorageKind::Varchar, "varchar(320)");
        replacement.alias = "email".to_string();

        let mut graph = SchemaGraph::new();
        graph.push(GraphEntry::Table(
            TableDeclaration::new("User")
                .with_column(ColumnDescriptor::new("email", StorageKind::Text, "text"))
                .with_column(ColumnDescriptor::new("name", StorageKind::Text, "text"))
                .with_column(replacement),
        ));

        let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
        let model = ir.get_model("User").unwrap();
        assert_eq!(model.columns.len(), 2);
        assert_eq!(model.columns[0].alias, "email");
        assert_eq!(model.columns[0].canonical_name, "email_address");
        assert_eq!(model.columns[0].column_type, ColumnType::Varchar);
        assert_eq!(model.columns[0].length_hint, Some(320));
    }

    /// 致命的エラーでは部分的なIRを返さない
    #[test]
    fn test_unclassifiable_column_aborts() {
        let mut graph = user_settings_graph();
        graph.push(GraphEntry::Table(
            TableDeclaration::new("Geo")
                .with_column(ColumnDescriptor::new("area", StorageKind::from("geometry".to_string()), "geometry")),
        ));

        let error = SchemaNormalizerService::new().normalize(&graph).unwrap_err();
        assert!(error.is_unclassifiable_column());
        assert_eq!(error.table(), Some("Geo"));
    }

    /// 未抽出の列挙型を参照するカラムは分類できない
    #[test]
    fn test_enum_column_with_unknown_enum_aborts() {
        let mut status = ColumnDescriptor::new("status", StorageKind::Enum, "status");
        status.enum_name = Some("Missing".to_string());

        let mut graph = user_settings_graph();
        graph.push(GraphEntry::Table(TableDeclaration::new("Post").with_column(status)));

        let error = SchemaNormalizerService::new().normalize(&graph).unwrap_err();
        assert!(error.is_unclassifiable_column());
        assert_eq!(error.table(), Some("Post"));
        assert!(error.to_string().contains("unknown enum 'Missing'"));
    }

    /// 解析対象外のエントリは無視される
    #[test]
    fn test_other_entries_ignored() {
        let mut graph = user_settings_graph();
        graph.push(GraphEntry::Other);

        let ir = SchemaNormalizerService::new().normalize(&graph).unwrap();
        assert_eq!(ir.models.len(), 2);
        assert_eq!(ir.relations.len(), 2);
    }

    /// 不正な基数タグ
    #[test]
    fn test_malformed_relation() {
        let mut descriptor = RelationDescriptor::one("settings", "User", "UserSettings");
        descriptor.cardinality = "several".to_string().into();

        let mut graph = user_settings_graph();
        graph.push(relation_set("User", vec![descriptor]));

        let error = SchemaNormalizerService::new().normalize(&graph).unwrap_err();
        assert!(matches!(error, NormalizeError::MalformedRelation { .. }));
    }
}
