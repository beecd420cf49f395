// In crates/strategies/src/compiler.rs

use core_types::{Block, BlockDescriptor, DEFAULT_STRATEGY_NAME, Error, Result, StrategySpec};
use std::collections::HashSet;

/// Compiles an ordered block list into a [`StrategySpec`] named "Custom Strategy".
///
/// See [`compile_named`].
pub fn compile(blocks: &[Block]) -> Result<StrategySpec> {
    compile_named(DEFAULT_STRATEGY_NAME, blocks)
}

/// Compiles an ordered block list into a [`StrategySpec`].
///
/// This is a pure projection: each block becomes one descriptor, in the same
/// order, so compiling the same blocks twice yields equal specs.
///
/// # Errors
///
/// A validation error if `name` is blank, `blocks` is empty, two blocks share
/// an id, or any block carries invalid option values.
pub fn compile_named(name: &str, blocks: &[Block]) -> Result<StrategySpec> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("strategy name", "must not be empty"));
    }
    if blocks.is_empty() {
        return Err(Error::validation("blocks", "an empty strategy cannot be submitted"));
    }

    let mut seen = HashSet::with_capacity(blocks.len());
    for block in blocks {
        if !seen.insert(&block.id) {
            return Err(Error::validation("blocks", format!("duplicate block id '{}'", block.id)));
        }
        block.config.validate().map_err(|e| match e {
            Error::Validation { field, reason } => Error::Validation {
                field,
                reason: format!("{reason} (block '{}', {})", block.label, block.id),
            },
            other => other,
        })?;
    }

    Ok(StrategySpec {
        name: name.to_string(),
        blocks: blocks.iter().map(BlockDescriptor::from).collect(),
    })
}
