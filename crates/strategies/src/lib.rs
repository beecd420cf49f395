// In crates/strategies/src/lib.rs

pub mod blueprint;
pub mod builder;
pub mod compiler;
pub mod templates;
pub mod types;

pub use blueprint::{BlueprintBlock, StrategyBlueprint};
pub use builder::BuilderSession;
pub use compiler::{compile, compile_named};
pub use templates::{StrategyTemplate, TemplateCatalog};
