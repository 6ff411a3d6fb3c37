//! Identifiers and a simple allocator for canvas entities.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AxesId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ArtistId(pub u32);

/// Monotonic allocator for AxesId and ArtistId.
/// Ids are never reused, so a removed artist's handle stays dead.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_axes: u32,
    next_artist: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_axes(&mut self) -> AxesId {
        let id = AxesId(self.next_axes);
        self.next_axes = self.next_axes.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_artist(&mut self) -> ArtistId {
        let id = ArtistId(self.next_artist);
        self.next_artist = self.next_artist.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_axes(), AxesId(0));
        assert_eq!(alloc.alloc_axes(), AxesId(1));
        assert_eq!(alloc.alloc_artist(), ArtistId(0));
        assert_eq!(alloc.alloc_artist(), ArtistId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_artist(), ArtistId(0));
    }
}
