// 命名ポリシー
//
// アプリケーション名と関連パスの単一ソースを提供します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "tessera";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".tessera.yaml";

/// 既定のスキーマグラフスナップショット
pub const DEFAULT_GRAPH_FILE: &str = "schema/graph.yaml";

/// 既定のPrisma出力先
pub const DEFAULT_PRISMA_OUTPUT: &str = "generated/schema.prisma";

/// 既定の型定義出力先
pub const DEFAULT_TYPES_OUTPUT: &str = "generated/schema.types.ts";

/// バイナリ名
pub const BINARY_NAME: &str = "tessera";

/// ログフィルタのターゲット名
pub const LOG_TARGET: &str = "tessera";

/// 命名プロファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingProfile {
    pub app_name: String,
    pub config_path: String,
    pub graph_path: String,
    pub binary_name: String,
}

/// 命名ポリシー
pub trait NamingPolicy {
    fn current() -> NamingProfile;
}

/// 既定の命名ポリシー
pub struct DefaultNamingPolicy;

impl NamingPolicy for DefaultNamingPolicy {
    fn current() -> NamingProfile {
        NamingProfile {
            app_name: APP_NAME.to_string(),
            config_path: CONFIG_FILE.to_string(),
            graph_path: DEFAULT_GRAPH_FILE.to_string(),
            binary_name: BINARY_NAME.to_string(),
        }
    }
}
