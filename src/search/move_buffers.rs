//! Per-ply move and score buffers reused across the whole search.
//!
//! A node takes its ply's buffer out of the pool, fills it, and hands it back
//! before returning, so recursion never allocates once the pool is warm.

use crate::moves::chess_move::Move;

#[derive(Debug, Default)]
pub struct PlyBuffer {
    pub moves: Vec<Move>,
    pub scores: Vec<i32>,
}

impl PlyBuffer {
    pub fn clear(&mut self) {
        self.moves.clear();
        self.scores.clear();
    }
}

#[derive(Debug, Default)]
pub struct MoveBufferPool {
    buffers: Vec<PlyBuffer>,
}

impl MoveBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the (cleared) buffer for `ply`, growing the pool on first use.
    pub fn acquire(&mut self, ply: usize) -> PlyBuffer {
        if self.buffers.len() <= ply {
            self.buffers.resize_with(ply + 1, PlyBuffer::default);
        }
        let mut buffer = std::mem::take(&mut self.buffers[ply]);
        buffer.clear();
        buffer
    }

    pub fn release(&mut self, ply: usize, buffer: PlyBuffer) {
        if let Some(slot) = self.buffers.get_mut(ply) {
            *slot = buffer;
        }
    }

    pub fn depth(&self) -> usize {
        self.buffers.len()
    }
}
