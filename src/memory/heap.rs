//! Heap implementation for the interpreter
//!
//! This module provides region-based memory management with:
//! - Explicit allocation/deallocation of heap blocks (`MALLOC`/`FREE`)
//! - Array regions backing declared arrays, released with their owner
//! - Per-cell initialization tracking (unwritten cells read as `Uninitialized`)
//! - Use-after-free and double-free detection
//!
//! # Addressing
//!
//! A [`Pointer`] names a region and a byte offset. Cells are stored sparsely
//! by byte offset, so any offset can be written; bounds are not checked.
//! A region stays addressable until it is released, after which every
//! pointer into it is dangling.
//!
//! # Error Handling
//!
//! Methods return [`HeapError`], which the interpreter converts to a
//! `RuntimeError` carrying the location of the failing construct.

use super::value::{Pointer, RegionId, Value};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures reported by the heap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("out of memory: requested {requested} bytes, {allocated} already allocated, limit is {limit}")]
    OutOfMemory {
        requested: usize,
        allocated: usize,
        limit: usize,
    },
    #[error("{0} is not the base of a live heap block")]
    NotABlockBase(Pointer),
    #[error("{0} points into released or unknown storage")]
    Dangling(Pointer),
}

/// What a region backs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Created by `MALLOC`, released only by `FREE`
    Block,
    /// Storage of a declared array, released with its frame
    Array,
}

/// A live region of memory
#[derive(Debug, Clone)]
pub struct Region {
    pub kind: RegionKind,
    pub size: usize,
    cells: FxHashMap<i64, Value>,
}

impl Region {
    fn new(kind: RegionKind, size: usize) -> Self {
        Region {
            kind,
            size,
            cells: FxHashMap::default(),
        }
    }
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    regions: BTreeMap<RegionId, Region>,
    next_region: u32,
    total_allocated_bytes: usize,
    max_heap_size: usize,
}

impl Heap {
    /// Create a new heap with a maximum size limit
    pub fn new(max_heap_size: usize) -> Self {
        Heap {
            regions: BTreeMap::new(),
            next_region: 0,
            total_allocated_bytes: 0,
            max_heap_size,
        }
    }

    fn create(&mut self, kind: RegionKind, size: usize) -> Result<Pointer, HeapError> {
        let within_limit = self
            .total_allocated_bytes
            .checked_add(size)
            .is_some_and(|total| total <= self.max_heap_size);
        if !within_limit {
            return Err(HeapError::OutOfMemory {
                requested: size,
                allocated: self.total_allocated_bytes,
                limit: self.max_heap_size,
            });
        }

        let id = RegionId(self.next_region);
        self.next_region += 1;
        self.regions.insert(id, Region::new(kind, size));
        self.total_allocated_bytes += size;

        Ok(Pointer::new(id, 0))
    }

    /// Allocate a heap block of `size` bytes and return its base
    pub fn allocate(&mut self, size: usize) -> Result<Pointer, HeapError> {
        let ptr = self.create(RegionKind::Block, size)?;
        tracing::debug!(region = ptr.region.0, size, "heap block allocated");
        Ok(ptr)
    }

    /// Allocate backing storage for an array of `size` bytes
    pub fn allocate_array(&mut self, size: usize) -> Result<Pointer, HeapError> {
        self.create(RegionKind::Array, size)
    }

    /// Release the heap block whose base is exactly `ptr`
    pub fn release(&mut self, ptr: Pointer) -> Result<(), HeapError> {
        match self.regions.get(&ptr.region) {
            Some(region) if region.kind == RegionKind::Block && ptr.offset == 0 => {
                let size = region.size;
                self.regions.remove(&ptr.region);
                self.total_allocated_bytes -= size;
                tracing::debug!(region = ptr.region.0, size, "heap block released");
                Ok(())
            }
            _ => Err(HeapError::NotABlockBase(ptr)),
        }
    }

    /// Drop a region regardless of kind; used when an array's owner goes away
    pub fn drop_region(&mut self, id: RegionId) {
        if let Some(region) = self.regions.remove(&id) {
            self.total_allocated_bytes -= region.size;
        }
    }

    /// Read the cell `ptr` points at
    pub fn read(&self, ptr: Pointer) -> Result<Value, HeapError> {
        let region = self
            .regions
            .get(&ptr.region)
            .ok_or(HeapError::Dangling(ptr))?;
        Ok(region.cells.get(&ptr.offset).copied().unwrap_or_default())
    }

    /// Write the cell `ptr` points at
    pub fn write(&mut self, ptr: Pointer, value: Value) -> Result<(), HeapError> {
        let region = self
            .regions
            .get_mut(&ptr.region)
            .ok_or(HeapError::Dangling(ptr))?;
        region.cells.insert(ptr.offset, value);
        Ok(())
    }

    pub fn is_live(&self, id: RegionId) -> bool {
        self.regions.contains_key(&id)
    }

    /// Live heap blocks as (base, size), in allocation order
    pub fn live_blocks(&self) -> impl Iterator<Item = (Pointer, usize)> + '_ {
        self.regions
            .iter()
            .filter(|(_, region)| region.kind == RegionKind::Block)
            .map(|(id, region)| (Pointer::new(*id, 0), region.size))
    }

    /// Number of live heap blocks
    pub fn block_count(&self) -> usize {
        self.live_blocks().count()
    }

    /// Bytes held by all live regions, arrays included
    pub fn total_allocated(&self) -> usize {
        self.total_allocated_bytes
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(crate::interpreter::constants::DEFAULT_HEAP_LIMIT)
    }
}
