/// 設定ファイル管理機能のテスト
///
/// このテストは、設定ファイルの読み込み、検証、YAMLへの書き出しが
/// 正しく動作することを確認します。

#[cfg(test)]
mod config_tests {
    use std::fs;
    use std::path::Path;
    use tessera::core::config::{Config, UnresolvedRelationPolicy};
    use tempfile::TempDir;

    /// Config構造体が正しくデシリアライズできることを確認
    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
version: "1.0"
input: exported/graph.json
base_prelude: prisma/base.prisma
outputs:
  prisma: prisma/schema.prisma
  types: src/schema.types.ts
unresolved_relations: error
"#;

        let config: Config = serde_saphyr::from_str(yaml).unwrap();

        assert_eq!(config.version, "1.0");
        assert_eq!(config.input, Path::new("exported/graph.json"));
        assert_eq!(config.base_prelude.as_deref(), Some(Path::new("prisma/base.prisma")));
        assert_eq!(config.outputs.prisma, Path::new("prisma/schema.prisma"));
        assert_eq!(config.outputs.types, Path::new("src/schema.types.ts"));
        assert_eq!(config.unresolved_relations, UnresolvedRelationPolicy::Error);
    }

    /// 書き出した設定を読み戻せることを確認
    #[test]
    fn test_config_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".tessera.yaml");
        fs::write(&path, Config::new().to_yaml().unwrap()).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.input, Path::new("schema/graph.yaml"));
        assert_eq!(config.unresolved_relations, UnresolvedRelationPolicy::Warn);
    }

    /// 不正な設定の検出
    #[test]
    fn test_invalid_config() {
        let config: Config = "version: \"\"\n".parse().unwrap();
        assert!(config.validate().is_err());

        assert!("version: \"1.0\"\nunresolved_relations: ignore\n"
            .parse::<Config>()
            .is_err());

        let missing = Config::from_file(Path::new("/nonexistent/.tessera.yaml"));
        assert!(missing.unwrap_err().to_string().contains("File not found"));
    }
}
