use crate::block::{Block, BlockConfig, BlockId, BlockKind};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STRATEGY_NAME: &str = "Custom Strategy";

/// The canonical, submit-ready form of a block-built strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    /// Blocks in evaluation order.
    pub blocks: Vec<BlockDescriptor>,
}

/// A flattened, self-describing copy of a [`Block`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub id: BlockId,
    pub label: String,
    pub config: BlockConfig,
}

impl From<&Block> for BlockDescriptor {
    fn from(block: &Block) -> Self {
        Self {
            kind: block.kind(),
            id: block.id.clone(),
            label: block.label.clone(),
            config: block.config.clone(),
        }
    }
}

impl StrategySpec {
    /// Number of blocks of the given kind.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| b.kind == kind).count()
    }
}
