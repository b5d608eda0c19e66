// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Vertex identifiers.
//!
//! Vertices are numbered `1..=n`, matching the way tree instances are written
//! down by hand and in the instance format read by `loading`. `VertexIndex`
//! stores that 1-based id verbatim. Dense per-vertex arrays inside the model
//! and the solver are laid out 0-based; `slot` and `from_slot` convert between
//! the two numbering schemes so the off-by-one lives in exactly one place.

/// A strongly typed, 1-based vertex id.
///
/// # Examples
///
/// ```rust
/// # use canopy_model::index::VertexIndex;
///
/// let v = VertexIndex::new(3);
/// assert_eq!(v.get(), 3);
/// assert_eq!(v.slot(), 2);
/// assert_eq!(VertexIndex::from_slot(2), v);
/// assert_eq!(format!("{}", v), "Vertex(3)");
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIndex {
    id: usize,
}

impl VertexIndex {
    /// Creates a vertex index from its 1-based id.
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self { id }
    }

    /// Creates a vertex index from a 0-based array position.
    #[inline(always)]
    pub const fn from_slot(slot: usize) -> Self {
        Self { id: slot + 1 }
    }

    /// Returns the 1-based id.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.id
    }

    /// Returns the 0-based array position of this vertex.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the id is zero.
    #[inline(always)]
    pub const fn slot(&self) -> usize {
        debug_assert!(
            self.id > 0,
            "called `VertexIndex::slot` on id 0: vertex ids start at 1"
        );
        self.id - 1
    }

    /// Returns `true` if this id names a vertex of a tree with
    /// `num_vertices` vertices.
    #[inline(always)]
    pub const fn is_within(&self, num_vertices: usize) -> bool {
        self.id >= 1 && self.id <= num_vertices
    }
}

impl std::fmt::Debug for VertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vertex({})", self.id)
    }
}

impl std::fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vertex({})", self.id)
    }
}

impl From<usize> for VertexIndex {
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<VertexIndex> for usize {
    fn from(vertex: VertexIndex) -> Self {
        vertex.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_round_trip() {
        for slot in 0..16 {
            let v = VertexIndex::from_slot(slot);
            assert_eq!(v.get(), slot + 1);
            assert_eq!(v.slot(), slot);
        }
    }

    #[test]
    fn test_is_within() {
        assert!(!VertexIndex::new(0).is_within(4));
        assert!(VertexIndex::new(1).is_within(4));
        assert!(VertexIndex::new(4).is_within(4));
        assert!(!VertexIndex::new(5).is_within(4));
        assert!(!VertexIndex::new(1).is_within(0));
    }

    #[test]
    fn test_conversions() {
        let v: VertexIndex = 7.into();
        assert_eq!(v.get(), 7);
        let raw: usize = v.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_ordering_follows_ids() {
        let mut vs = vec![VertexIndex::new(3), VertexIndex::new(1), VertexIndex::new(2)];
        vs.sort();
        assert_eq!(
            vs,
            vec![VertexIndex::new(1), VertexIndex::new(2), VertexIndex::new(3)]
        );
    }

    #[test]
    fn test_debug_and_display() {
        let v = VertexIndex::new(12);
        assert_eq!(format!("{}", v), "Vertex(12)");
        assert_eq!(format!("{:?}", v), "Vertex(12)");
    }
}
