// Adapters layer: the HTTP surface over the core prediction pipelines.

pub mod http;
