// Services Layer
// スキーマグラフの正規化エンジンと周辺サービス

pub mod enum_extractor;
pub mod graph_parser;
pub mod index_extractor;
pub mod model_assembler;
pub mod relation_resolver;
pub mod schema_checksum;
pub mod schema_normalizer;
pub mod schema_validator;
pub mod type_classifier;
