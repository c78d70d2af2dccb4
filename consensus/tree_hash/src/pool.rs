use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// The number of idle buffers retained by the global pool.
pub const MAX_POOLED_BUFFERS: usize = 64;

/// Buffers which grew beyond this capacity are dropped rather than returned to the pool.
pub const MAX_POOLED_CAPACITY: usize = 1 << 20;

lazy_static! {
    /// Buffers used for packing basic values into chunks prior to merkleization.
    pub static ref CHUNK_POOL: ChunkPool = ChunkPool::new(MAX_POOLED_BUFFERS);
}

/// A bounded set of re-usable byte buffers.
pub struct ChunkPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_buffers: usize,
}

impl ChunkPool {
    pub fn new(max_buffers: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_buffers)),
            max_buffers,
        }
    }

    /// Take an empty buffer from the pool, allocating if none are idle.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.buffers.lock().pop().unwrap_or_default();

        PooledBuffer { buf, pool: self }
    }

    /// The number of idle buffers.
    pub fn idle(&self) -> usize {
        self.buffers.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }

        buf.clear();

        let mut buffers = self.buffers.lock();
        if buffers.len() < self.max_buffers {
            buffers.push(buf);
        }
    }
}

/// A buffer borrowed from a `ChunkPool`. It is cleared and returned to the pool when dropped.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a ChunkPool,
}

impl<'a> Deref for PooledBuffer<'a> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl<'a> DerefMut for PooledBuffer<'a> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl<'a> Drop for PooledBuffer<'a> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_reused() {
        let pool = ChunkPool::new(2);
        assert_eq!(pool.idle(), 0);

        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(&[1; 100]);
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty(), "returned buffers are cleared");
        assert!(buf.capacity() >= 100, "allocation is retained");
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn pool_is_bounded() {
        let pool = ChunkPool::new(2);

        let buffers = (0..4).map(|_| pool.acquire()).collect::<Vec<_>>();
        drop(buffers);

        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let pool = ChunkPool::new(2);

        {
            let mut buf = pool.acquire();
            buf.reserve(MAX_POOLED_CAPACITY + 1);
        }

        assert_eq!(pool.idle(), 0);
    }
}
