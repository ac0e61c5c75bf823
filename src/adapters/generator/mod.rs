// テキストジェネレーターアダプター
//
// 正規化済みのスキーマIRからテキスト文書を生成するアダプター層。
// ジェネレーターはIRを読み取るだけで、変更しません。

pub mod prisma;
pub mod typescript;

use crate::core::schema::SchemaIr;
use std::fmt;
use std::str::FromStr;

pub use prisma::PrismaGenerator;
pub use typescript::TypeScriptGenerator;

/// 生成対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorTarget {
    /// Prismaスキーマ
    Prisma,
    /// TypeScript型定義
    Types,
}

impl fmt::Display for GeneratorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorTarget::Prisma => write!(f, "prisma"),
            GeneratorTarget::Types => write!(f, "types"),
        }
    }
}

impl FromStr for GeneratorTarget {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "prisma" => Ok(GeneratorTarget::Prisma),
            "types" | "typescript" | "ts" => Ok(GeneratorTarget::Types),
            other => Err(anyhow::anyhow!(
                "Unsupported generator target: {}. Please specify one of: prisma, types.",
                other
            )),
        }
    }
}

/// スキーマジェネレータートレイト
///
/// 各出力形式のジェネレーターが実装すべきインターフェース。
pub trait SchemaGenerator {
    /// IR全体から文書を生成
    ///
    /// # Arguments
    ///
    /// * `ir` - 正規化済みのスキーマIR
    ///
    /// # Returns
    ///
    /// 生成された文書の文字列
    fn generate(&self, ir: &SchemaIr) -> String;

    /// 出力ファイルの既定の拡張子
    fn file_extension(&self) -> &'static str;
}

/// 生成対象に対応するジェネレーターを作成
///
/// `base_prelude` はPrismaジェネレーターのみが使用します。
pub fn generator_for(target: GeneratorTarget, base_prelude: Option<String>) -> Box<dyn SchemaGenerator> {
    match target {
        GeneratorTarget::Prisma => {
            let generator = PrismaGenerator::new();
            match base_prelude {
                Some(prelude) => Box::new(generator.with_base_prelude(prelude)),
                None => Box::new(generator),
            }
        }
        GeneratorTarget::Types => Box::new(TypeScriptGenerator::new()),
    }
}

/// 文字列を二重引用符で囲む（`\` と `"` はエスケープ）
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// 文字列リストを引用符付きでカンマ連結
pub(crate) fn quoted_list(values: &[String]) -> String {
    values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ")
}
