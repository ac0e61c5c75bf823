// Core Domain
// ソーススキーマグラフ、正規化IR、エラー、設定の純粋なドメイン型

pub mod config;
pub mod error;
pub mod graph;
pub mod naming;
pub mod schema;
