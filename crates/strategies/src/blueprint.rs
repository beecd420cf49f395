// In crates/strategies/src/blueprint.rs

use crate::builder::BuilderSession;
use core_types::{BlockConfig, DEFAULT_STRATEGY_NAME, Result, StrategySpec};
use serde::Deserialize;

/// A strategy described in a file, block by block, rather than assembled
/// interactively.
#[derive(Deserialize, Debug, Clone)]
pub struct StrategyBlueprint {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BlueprintBlock>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlueprintBlock {
    pub label: Option<String>,
    pub config: BlockConfig,
}

fn default_name() -> String {
    DEFAULT_STRATEGY_NAME.to_string()
}

impl StrategyBlueprint {
    /// Replays the blueprint into a fresh builder session.
    pub fn to_session(&self) -> BuilderSession {
        let mut session = BuilderSession::new();
        for block in &self.blocks {
            session.add_configured(block.label.as_deref(), block.config.clone());
        }
        session
    }

    pub fn compile(&self) -> Result<StrategySpec> {
        self.to_session().compile_named(&self.name)
    }
}
