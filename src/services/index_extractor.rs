// インデックス抽出サービス
//
// テーブル宣言のインデックス設定を unique / normal のインデックスに分類します。

use crate::core::error::NormalizeError;
use crate::core::graph::{IndexDeclaration, TableDeclaration};
use crate::core::schema::{Index, IndexKind};

/// インデックス抽出サービス
#[derive(Debug, Clone)]
pub struct IndexExtractorService {}

impl IndexExtractorService {
    /// 新しいIndexExtractorServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// テーブルのインデックスを宣言順に抽出
    ///
    /// インデックスビルダーを持たないテーブルは空のリストを返します。
    ///
    /// # Errors
    ///
    /// - 未知のインデックス種別: `UnsupportedIndexKind`
    /// - 種別とユニークフラグの矛盾、対象カラムなし: `AmbiguousIndex`
    pub fn extract(&self, table: &TableDeclaration) -> Result<Vec<Index>, NormalizeError> {
        let Some(declarations) = &table.indexes else {
            return Ok(Vec::new());
        };

        declarations
            .iter()
            .map(|decl| self.extract_one(&table.name, decl))
            .collect()
    }

    fn extract_one(&self, table: &str, decl: &IndexDeclaration) -> Result<Index, NormalizeError> {
        if decl.columns.is_empty() {
            return Err(NormalizeError::AmbiguousIndex {
                table: table.to_string(),
                index: decl.name.clone(),
                reason: "index has no columns".to_string(),
            });
        }

        let declared_kind = match decl.kind.as_deref() {
            None => None,
            Some("unique") => Some(IndexKind::Unique),
            Some("normal") | Some("index") => Some(IndexKind::Normal),
            Some(other) => {
                return Err(NormalizeError::UnsupportedIndexKind {
                    table: table.to_string(),
                    index: decl.name.clone(),
                    kind: other.to_string(),
                })
            }
        };

        let flag_kind = decl.unique.map(|unique| {
            if unique {
                IndexKind::Unique
            } else {
                IndexKind::Normal
            }
        });

        let kind = match (declared_kind, flag_kind) {
            (Some(declared), Some(flag)) if declared != flag => {
                return Err(NormalizeError::AmbiguousIndex {
                    table: table.to_string(),
                    index: decl.name.clone(),
                    reason: format!(
                        "kind '{}' contradicts unique flag {}",
                        decl.kind.as_deref().unwrap_or_default(),
                        decl.unique.unwrap_or_default()
                    ),
                })
            }
            (Some(kind), _) | (None, Some(kind)) => kind,
            (None, None) => IndexKind::Normal,
        };

        Ok(Index::new(kind, decl.name.clone(), decl.columns.clone()))
    }
}

impl Default for IndexExtractorService {
    fn default() -> Self {
        Self::new()
    }
}
