//! First-fit аллокатор непрерывной памяти / First-fit contiguous allocator
//!
//! Свободное пространство — отсортированный по `start` список регионов.
//! Free space is a list of extents sorted by `start`.
//!
//! При аллокации: первый регион, в который помещается запрос (first-fit),
//! отрезается спереди. При освобождении: вставка на место + слияние соседей.
//! On allocate: the first extent that fits is carved from the front.
//! On free: sorted insert, then adjacent extents are merged.
//!
//! Выданные регионы учитываются по `start`; освободить можно только регион,
//! выданный целиком.
//! Handed-out extents are tracked by `start`; only a whole extent that was
//! handed out can be freed.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use libossim::{Error, Extent, Result};
use log::{trace, warn};

pub struct FreeListAllocator {
    capacity:  usize,
    free:      Vec<Extent>,
    /// start → size
    allocated: BTreeMap<usize, usize>,
}

impl FreeListAllocator {
    /// Всё адресное пространство `[0, capacity)` свободно.
    /// The whole `[0, capacity)` range starts out free.
    pub fn new(capacity: usize) -> Self {
        let free = if capacity > 0 { vec![Extent::new(0, capacity)] } else { Vec::new() };
        Self { capacity, free, allocated: BTreeMap::new() }
    }

    /// Выделить `size` единиц одним регионом или ничего.
    /// Allocate `size` units as a single extent, or nothing at all.
    pub fn allocate(&mut self, size: usize) -> Result<Extent> {
        if size == 0 {
            return Err(Error::InvalidSize);
        }

        let Some(idx) = self.free.iter().position(|e| e.size >= size) else {
            return Err(Error::OutOfMemory { requested: size, largest_free: self.largest_free() });
        };

        let hole = &mut self.free[idx];
        let block = Extent::new(hole.start, size);
        if hole.size == size {
            self.free.remove(idx);
        } else {
            hole.start += size;
            hole.size  -= size;
        }

        self.allocated.insert(block.start, block.size);
        trace!("[mm] allocated {} from hole #{}", block, idx);
        Ok(block)
    }

    /// Вернуть регион в список свободных и слить соседей.
    /// Return an extent to the free list and coalesce neighbours.
    ///
    /// `None` и любой регион, не совпадающий в точности с выданным, игнорируются.
    /// Возвращает `true`, если регион действительно был возвращён.
    /// `None` and any extent that is not exactly one handed out are ignored.
    /// Returns `true` if the extent was actually given back.
    pub fn free(&mut self, block: Option<Extent>) -> bool {
        let Some(block) = block else { return false };

        if self.allocated.get(&block.start) != Some(&block.size) {
            warn!("[mm] ignoring free of {}: not allocated", block);
            return false;
        }
        self.allocated.remove(&block.start);

        let at = self.free.partition_point(|e| e.start < block.start);
        self.free.insert(at, block);
        self.coalesce();

        trace!("[mm] freed {}, {} hole(s) left", block, self.free.len());
        true
    }

    // один проход слева направо / single left-to-right sweep
    fn coalesce(&mut self) {
        self.free.dedup_by(|next, prev| {
            if prev.touches(*next) {
                prev.size += next.size;
                true
            } else {
                false
            }
        });
    }

    pub fn free_extents(&self) -> &[Extent] {
        &self.free
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn free_total(&self) -> usize {
        self.free.iter().map(|e| e.size).sum()
    }

    pub fn allocated_total(&self) -> usize {
        self.allocated.values().sum()
    }

    pub fn largest_free(&self) -> usize {
        self.free.iter().map(|e| e.size).max().unwrap_or(0)
    }
}
