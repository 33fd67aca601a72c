//! Fixed-capacity ring pools for short-lived entities
//!
//! Entities live in parallel arrays (one array per field) and are written at a
//! wrapping cursor. Emitting into a full pool overwrites the oldest slot; there
//! is no "pool full" case. Slots are deactivated, never freed.

use serde::{Deserialize, Serialize};

/// Write cursor that wraps at `capacity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingCursor {
    index: usize,
    capacity: usize,
}

impl RingCursor {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        Self { index: 0, capacity }
    }

    /// Slot the next emit will write
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claim the current slot and move the cursor on
    #[inline]
    pub fn advance(&mut self) -> usize {
        let slot = self.index;
        self.index = (self.index + 1) % self.capacity;
        slot
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Structure-of-arrays storage addressed by slot index
pub trait SoaSlots {
    fn capacity(&self) -> usize;
    /// Zero every field of a slot (inactive afterwards)
    fn clear_slot(&mut self, slot: usize);
    fn is_active(&self, slot: usize) -> bool;
}

/// A ring of SOA slots plus its wrapping cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingPool<S> {
    pub slots: S,
    cursor: RingCursor,
}

impl<S: SoaSlots> RingPool<S> {
    pub fn new(slots: S) -> Self {
        let cursor = RingCursor::new(slots.capacity());
        Self { slots, cursor }
    }

    /// Write a new entity at the cursor, recycling whatever lived there
    pub fn emit(&mut self, write: impl FnOnce(&mut S, usize)) -> usize {
        let slot = self.cursor.advance();
        self.slots.clear_slot(slot);
        write(&mut self.slots, slot);
        slot
    }

    /// Zero all slots and rewind the cursor
    pub fn reset(&mut self) {
        for slot in 0..self.slots.capacity() {
            self.slots.clear_slot(slot);
        }
        self.cursor.reset();
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    pub fn active_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.slots.capacity()).filter(|&i| self.slots.is_active(i))
    }

    pub fn active_count(&self) -> usize {
        self.active_slots().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Tags {
        active: Vec<bool>,
        tag: Vec<u32>,
    }

    impl Tags {
        fn with_capacity(n: usize) -> Self {
            Self {
                active: vec![false; n],
                tag: vec![0; n],
            }
        }
    }

    impl SoaSlots for Tags {
        fn capacity(&self) -> usize {
            self.active.len()
        }
        fn clear_slot(&mut self, slot: usize) {
            self.active[slot] = false;
            self.tag[slot] = 0;
        }
        fn is_active(&self, slot: usize) -> bool {
            self.active[slot]
        }
    }

    fn emit_tag(pool: &mut RingPool<Tags>, tag: u32) -> usize {
        pool.emit(|s, i| {
            s.active[i] = true;
            s.tag[i] = tag;
        })
    }

    #[test]
    fn test_wraparound_overwrites_oldest() {
        let mut pool = RingPool::new(Tags::with_capacity(4));
        for tag in 1..=4 {
            emit_tag(&mut pool, tag);
        }
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.active_count(), 4);

        let slot = emit_tag(&mut pool, 5);
        assert_eq!(slot, 0);
        assert_eq!(pool.slots.tag[0], 5);
        assert_eq!(pool.cursor(), 1);
        assert_eq!(pool.active_count(), 4);
    }

    #[test]
    fn test_cursor_advances_mod_capacity() {
        let mut pool = RingPool::new(Tags::with_capacity(3));
        for n in 0..10u32 {
            let before = pool.cursor();
            emit_tag(&mut pool, n);
            assert_eq!(pool.cursor(), (before + 1) % 3);
        }
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut pool = RingPool::new(Tags::with_capacity(3));
        emit_tag(&mut pool, 7);
        emit_tag(&mut pool, 8);
        pool.reset();
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.slots.tag.iter().all(|&t| t == 0));
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_rejected() {
        let _ = RingCursor::new(0);
    }
}
