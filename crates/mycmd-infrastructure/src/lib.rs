//! Infrastructure implementations for the MyCMD core traits: filesystem
//! persistence, configuration loading, the HTTP quote chain, and the
//! system URL opener.

pub mod config;
pub mod opener;
pub mod paths;
pub mod quote;
pub mod store;

pub use config::ConfigStorage;
pub use opener::SystemOpener;
pub use paths::MycmdPaths;
pub use quote::HttpQuoteService;
pub use store::FileStore;
