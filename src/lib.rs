// Tesseraライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（ソースグラフ、正規化IR、エラー、設定）
// - services: 正規化パイプライン（型分類、リレーション解決、モデル組み立て）
// - adapters: 正規化IRからのテキスト生成

pub mod cli;
pub mod core;
pub mod adapters;
pub mod services;
