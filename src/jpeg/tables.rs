use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::Result;
use crate::jpeg::dct::DctBasis;
use crate::jpeg::zigzag::ZigzagOrder;

/// Everything a block transform of size N needs, built once per N.
#[derive(Debug)]
pub struct BlockTables {
    pub basis: DctBasis,
    pub zigzag: ZigzagOrder,
}

impl BlockTables {
    pub fn new(size: usize) -> Result<BlockTables> {
        Ok(BlockTables {
            basis: DctBasis::new(size)?,
            zigzag: ZigzagOrder::new(size),
        })
    }

    pub fn size(&self) -> usize {
        self.basis.size()
    }

    pub fn coefficient_count(&self) -> usize {
        self.size() * self.size()
    }
}

static TABLES: Lazy<RwLock<HashMap<usize, Arc<BlockTables>>>> = Lazy::new(Default::default);

/// Shared tables for block size `size`. Entries are never replaced or mutated
/// after insertion, so every caller asking for the same N gets the same `Arc`.
pub fn tables_for(size: usize) -> Result<Arc<BlockTables>> {
    if let Some(tables) = TABLES.read().get(&size) {
        return Ok(Arc::clone(tables));
    }

    let mut cache = TABLES.write();
    if let Some(tables) = cache.get(&size) {
        return Ok(Arc::clone(tables));
    }
    debug!("building DCT basis and zigzag order for {}x{} blocks", size, size);
    let tables = Arc::new(BlockTables::new(size)?);
    cache.insert(size, Arc::clone(&tables));
    Ok(tables)
}
