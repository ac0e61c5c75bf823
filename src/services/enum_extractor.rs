// 列挙型抽出サービス
//
// スキーマグラフから列挙型宣言を走査し、IRの列挙型に変換します。

use crate::core::graph::SchemaGraph;
use crate::core::schema::Enum;
use tracing::debug;

/// 列挙型抽出サービス
#[derive(Debug, Clone)]
pub struct EnumExtractorService {}

impl EnumExtractorService {
    /// 新しいEnumExtractorServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// グラフ内のすべての列挙型宣言を列挙順で抽出
    ///
    /// 列挙型が一つもない場合は空のリストを返します。
    pub fn extract(&self, graph: &SchemaGraph) -> Vec<Enum> {
        let enums: Vec<Enum> = graph
            .enums()
            .map(|decl| Enum {
                alias: decl.binding.clone(),
                canonical_name: decl.name.clone(),
                values: decl.values.clone(),
            })
            .collect();

        debug!(count = enums.len(), "Extracted enums");
        enums
    }
}

impl Default for EnumExtractorService {
    fn default() -> Self {
        Self::new()
    }
}
