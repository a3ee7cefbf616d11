//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Capacity is a power of two so the slot index is `key & mask`. Each slot
//! holds one entry; a store replaces only when the slot is empty or the new
//! entry was searched at least as deep as the resident one.

use tracing::debug;

use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
    occupied: usize,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        Self::with_capacity(bytes / entry_size)
    }

    /// Table with the largest power-of-two slot count not above `slots`
    /// (at least one slot).
    pub fn with_capacity(slots: usize) -> Self {
        let slots = slots.max(1);
        let capacity = 1usize << (usize::BITS - 1 - slots.leading_zeros());
        debug!(capacity, "transposition table allocated");
        Self {
            entries: vec![None; capacity],
            mask: capacity - 1,
            occupied: 0,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.occupied = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let hit = self.entries[self.idx(key)].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Best move recorded for `key`, without touching the statistics.
    pub fn best_move(&self, key: u64) -> Option<Move> {
        self.entries[self.idx(key)]
            .filter(|e| e.key == key)
            .and_then(|e| e.best_move)
    }

    pub fn store(&mut self, entry: TTEntry) {
        let idx = self.idx(entry.key);
        let slot = &mut self.entries[idx];
        let replace = match slot {
            None => {
                self.occupied += 1;
                true
            }
            Some(existing) => entry.depth >= existing.depth,
        };
        if replace {
            *slot = Some(entry);
            self.stats.stores += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TTEntry, TranspositionTable};
    use crate::moves::chess_move::Move;
    use crate::position::chess_types::*;

    fn entry(key: u64, depth: u8, score: i32, bound: Bound) -> TTEntry {
        TTEntry {
            key,
            depth,
            score,
            bound,
            best_move: None,
        }
    }

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let mv = Move::new(12, 28, Piece::new(PieceKind::Pawn, Color::White), Piece::EMPTY);
        let stored = TTEntry {
            best_move: Some(mv),
            ..entry(123, 5, 42, Bound::Exact)
        };
        tt.store(stored);
        let got = tt.probe(123).expect("entry should exist");
        assert_eq!(got, stored);
        assert_eq!(tt.best_move(123), Some(mv));
        assert_eq!(tt.stats().probes, 1);
        assert_eq!(tt.stats().hits, 1);
    }

    #[test]
    fn depth_preferred_replacement() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let key = 555;
        tt.store(entry(key, 2, 1, Bound::Upper));
        tt.store(entry(key, 1, 9, Bound::Exact));
        assert_eq!(tt.probe(key).expect("exists").score, 1);
        tt.store(entry(key, 2, 4, Bound::Lower));
        assert_eq!(tt.probe(key).expect("exists").score, 4);
        tt.store(entry(key, 6, 3, Bound::Lower));
        let got = tt.probe(key).expect("exists");
        assert_eq!(got.depth, 6);
        assert_eq!(got.score, 3);
        assert_eq!(tt.stats().stores, 3);
    }

    #[test]
    fn capacity_is_a_power_of_two() {
        assert_eq!(TranspositionTable::with_capacity(1000).capacity(), 512);
        assert_eq!(TranspositionTable::with_capacity(1024).capacity(), 1024);
        assert_eq!(TranspositionTable::with_capacity(0).capacity(), 1);
        let tt = TranspositionTable::new_with_mb(1);
        assert!(tt.capacity().is_power_of_two());
    }

    #[test]
    fn colliding_key_is_not_a_hit() {
        let mut tt = TranspositionTable::with_capacity(16);
        tt.store(entry(3, 4, 10, Bound::Exact));
        assert!(tt.probe(3 + 16).is_none());
        assert_eq!(tt.best_move(3 + 16), None);
        // Shallower entry for the other key cannot evict the resident one.
        tt.store(entry(3 + 16, 1, 7, Bound::Exact));
        assert_eq!(tt.probe(3).expect("resident").score, 10);
        tt.store(entry(3 + 16, 4, 7, Bound::Exact));
        assert!(tt.probe(3).is_none());
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn clear_empties_slots_and_stats() {
        let mut tt = TranspositionTable::with_capacity(8);
        tt.store(entry(1, 1, 1, Bound::Exact));
        tt.store(entry(2, 1, 1, Bound::Exact));
        assert_eq!(tt.len(), 2);
        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.probe(1).is_none());
        assert_eq!(tt.stats().stores, 0);
    }
}
