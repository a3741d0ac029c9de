// Adapters layer: concrete implementations for external systems (http, filesystem).

pub mod sources;
pub mod storage;
