// Adapters
// 正規化IRを外部のスキーマ記述言語・型定義へ変換する出力アダプター

pub mod generator;
