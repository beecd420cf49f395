// In crates/strategies/src/builder.rs

use crate::compiler;
use core_types::{Block, BlockConfig, BlockId, BlockKind, Error, Result, StrategySpec};

/// The editable state of one strategy-builder session.
///
/// Owns its blocks exclusively; dropping the session drops them. Block order
/// is evaluation order.
#[derive(Debug, Default)]
pub struct BuilderSession {
    blocks: Vec<Block>,
    selected: Option<BlockId>,
    /// Monotonic counter behind generated ids; never reused, even after removals.
    next_seq: u64,
}

impl BuilderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block of the given palette variant with its default configuration.
    ///
    /// # Arguments
    ///
    /// * `kind`: The block role the variant must belong to.
    /// * `variant_id`: The palette id, e.g. `"rsi-level"`.
    /// * `label`: Display label; a blank label falls back to the palette label.
    ///
    /// # Returns
    ///
    /// The newly appended block, or a validation error if the variant is unknown
    /// or belongs to a different kind.
    pub fn add_block(&mut self, kind: BlockKind, variant_id: &str, label: &str) -> Result<&Block> {
        let config = BlockConfig::default_for(kind, variant_id)?;
        Ok(self.add_configured(Some(label), config))
    }

    /// Appends a block whose configuration is already populated.
    pub fn add_configured(&mut self, label: Option<&str>, config: BlockConfig) -> &Block {
        self.next_seq += 1;
        let id = BlockId(format!("{}-{}", config.variant_id(), self.next_seq));
        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => config.palette_label().to_string(),
        };

        self.blocks.push(Block { id, label, config });
        let idx = self.blocks.len() - 1;
        &self.blocks[idx]
    }

    /// Removes a block, clearing the selection if it pointed at it.
    pub fn remove_block(&mut self, id: &BlockId) -> Option<Block> {
        let idx = self.blocks.iter().position(|b| &b.id == id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.blocks.remove(idx))
    }

    pub fn select(&mut self, id: &BlockId) -> Result<&Block> {
        let idx = self.index_of(id)?;
        self.selected = Some(id.clone());
        Ok(&self.blocks[idx])
    }

    pub fn selected(&self) -> Option<&Block> {
        let id = self.selected.as_ref()?;
        self.get(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replaces a block's configuration. The variant cannot change.
    pub fn update_config(&mut self, id: &BlockId, config: BlockConfig) -> Result<()> {
        let idx = self.index_of(id)?;
        let block = &mut self.blocks[idx];
        if block.variant_id() != config.variant_id() {
            return Err(Error::validation(
                "block config",
                format!("block '{}' is a '{}' block, not '{}'", id, block.variant_id(), config.variant_id()),
            ));
        }
        block.config = config;
        Ok(())
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn compile(&self) -> Result<StrategySpec> {
        compiler::compile(&self.blocks)
    }

    pub fn compile_named(&self, name: &str) -> Result<StrategySpec> {
        compiler::compile_named(name, &self.blocks)
    }

    fn index_of(&self, id: &BlockId) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| Error::validation("block", format!("no block with id '{id}'")))
    }
}
