// fairy-core/src/infrastructure/mod.rs

pub mod error;
pub mod fs;
pub mod hashing;
pub mod params;
pub mod render;
pub mod rulepack_loader;
pub mod settings;
pub mod table_loader;

pub use render::MarkdownRenderer;
pub use rulepack_loader::load_rulepack;
pub use table_loader::CsvTableLoader;
