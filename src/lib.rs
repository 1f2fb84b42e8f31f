pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod mla;
pub mod page;
pub mod relay;
pub mod server;
pub mod sources;
pub mod types;
