//! Style resolution: global theme defaults overridden by block-level keys.
//!
//! Live preview and every exporter call the same function, so what is shown
//! and what is exported never diverge.

use crate::model::{AttrMap, Block, GlobalStyles};

/// Shallow merge; a block key wins over the theme key of the same name.
pub fn resolve(global: &GlobalStyles, block_styles: &AttrMap) -> AttrMap {
    let mut effective = global.to_map();
    for (key, value) in block_styles {
        effective.insert(key.clone(), value.clone());
    }
    effective
}

pub fn resolve_block(global: &GlobalStyles, block: &Block) -> AttrMap {
    resolve(global, &block.styles)
}
