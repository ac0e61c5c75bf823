// スキーマIRチェックサム計算サービス
//
// スキーマIRのSHA-256ハッシュ計算と比較を行うサービス。
// 同じグラフから生成したIRは常に同じチェックサムになります。

use crate::core::error::NormalizationWarning;
use crate::core::schema::{Enum, Model, Relation, SchemaIr};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// チェックサム対象（サマリーは表示用のため除外）
#[derive(Serialize)]
struct CanonicalIr<'a> {
    models: &'a [Model],
    enums: &'a [Enum],
    relations: &'a [Relation],
    warnings: &'a [NormalizationWarning],
}

/// スキーマIRチェックサムサービス
#[derive(Debug, Clone)]
pub struct SchemaChecksumService {}

impl SchemaChecksumService {
    /// 新しいSchemaChecksumServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// IRのチェックサムを計算
    ///
    /// # Returns
    ///
    /// SHA-256ハッシュ（64文字の16進数文字列）
    ///
    /// # Errors
    ///
    /// IRのシリアライズに失敗した場合
    pub fn calculate_checksum(&self, ir: &SchemaIr) -> Result<String, serde_json::Error> {
        let normalized = self.normalize_ir(ir)?;

        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let result = hasher.finalize();

        Ok(format!("{:x}", result))
    }

    /// IRを正規化された文字列表現に変換
    ///
    /// IRの順序はソースグラフの列挙順で確定しているため、並べ替えは行いません。
    pub fn normalize_ir(&self, ir: &SchemaIr) -> Result<String, serde_json::Error> {
        let canonical = CanonicalIr {
            models: &ir.models,
            enums: &ir.enums,
            relations: &ir.relations,
            warnings: &ir.warnings,
        };

        serde_json::to_string(&canonical)
    }

    /// 2つのチェックサムを比較
    pub fn compare_checksums(&self, left: &str, right: &str) -> bool {
        left == right
    }
}

impl Default for SchemaChecksumService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{ColumnDescriptor, GraphEntry, SchemaGraph, StorageKind, TableDeclaration};
    use crate::services::schema_normalizer::SchemaNormalizerService;

    fn graph_with(tables: &[&str]) -> SchemaGraph {
        let mut graph = SchemaGraph::new();
        for name in tables {
            graph.push(GraphEntry::Table(
                TableDeclaration::new(*name)
                    .with_column(ColumnDescriptor::new("id", StorageKind::Integer, "integer")),
            ));
        }
        graph
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let ir = SchemaNormalizerService::new().normalize(&graph_with(&["A"])).unwrap();
        let checksum = SchemaChecksumService::new().calculate_checksum(&ir).unwrap();
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_deterministic() {
        let service = SchemaChecksumService::new();
        let graph = graph_with(&["A", "B"]);
        let first = service
            .calculate_checksum(&SchemaNormalizerService::new().normalize(&graph).unwrap())
            .unwrap();
        let second = service
            .calculate_checksum(&SchemaNormalizerService::new().normalize(&graph).unwrap())
            .unwrap();
        assert!(service.compare_checksums(&first, &second));
    }

    #[test]
    fn test_checksum_depends_on_order() {
        let service = SchemaChecksumService::new();
        let ab = SchemaNormalizerService::new().normalize(&graph_with(&["A", "B"])).unwrap();
        let ba = SchemaNormalizerService::new().normalize(&graph_with(&["B", "A"])).unwrap();
        assert_ne!(
            service.calculate_checksum(&ab).unwrap(),
            service.calculate_checksum(&ba).unwrap()
        );
    }

    #[test]
    fn test_summary_excluded_from_checksum() {
        let service = SchemaChecksumService::new();
        let ir = SchemaNormalizerService::new().normalize(&graph_with(&["A"])).unwrap();
        let mut edited = ir.clone();
        edited.summary.push_str("edited");
        assert_eq!(
            service.calculate_checksum(&ir).unwrap(),
            service.calculate_checksum(&edited).unwrap()
        );
    }

    #[test]
    fn test_normalized_form_is_json_without_summary() {
        let ir = SchemaNormalizerService::new().normalize(&graph_with(&["A"])).unwrap();
        let normalized = SchemaChecksumService::new().normalize_ir(&ir).unwrap();

        let value: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(value["models"].as_array().map(|m| m.len()), Some(1));
        assert!(value.get("summary").is_none());
    }
}
