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

use crate::index::VertexIndex;
use canopy_core::num::weight::TreeWeight;

/// The answer to a capacitated p-center query on a tree.
///
/// `assignment` is laid out by vertex slot: `assignment[v.slot()]` is the
/// center serving vertex `v`. `centers` keeps the order in which centers were
/// opened by the search.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterSolution<W> {
    /// The minimum feasible radius found by the search.
    radius: W,

    /// The opened centers, in opening order.
    centers: Vec<VertexIndex>,

    /// The serving center of every vertex, indexed by slot.
    assignment: Vec<VertexIndex>,
}

impl<W> CenterSolution<W>
where
    W: TreeWeight,
{
    /// Constructs a new `CenterSolution`.
    ///
    /// # Panics
    ///
    /// Panics if some vertex is assigned to a vertex that is not in `centers`.
    pub fn new(radius: W, centers: Vec<VertexIndex>, assignment: Vec<VertexIndex>) -> Self {
        assert!(
            assignment.iter().all(|c| centers.contains(c)),
            "called CenterSolution::new with an assignment to a vertex that is not an opened center"
        );

        Self {
            radius,
            centers,
            assignment,
        }
    }

    /// Returns the radius of this solution.
    #[inline]
    pub fn radius(&self) -> W {
        self.radius
    }

    /// Returns the opened centers in opening order.
    #[inline]
    pub fn centers(&self) -> &[VertexIndex] {
        &self.centers
    }

    /// Returns the serving center of every vertex, indexed by slot.
    #[inline]
    pub fn assignment(&self) -> &[VertexIndex] {
        &self.assignment
    }

    /// Returns the number of vertices covered by this solution.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.assignment.len()
    }

    /// Returns the number of opened centers.
    #[inline]
    pub fn num_centers(&self) -> usize {
        self.centers.len()
    }

    /// Returns the center serving `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    #[inline]
    pub fn center_of(&self, vertex: VertexIndex) -> VertexIndex {
        debug_assert!(
            vertex.is_within(self.num_vertices()),
            "called `CenterSolution::center_of` with vertex out of bounds: the len is {} but the vertex is {}",
            self.num_vertices(),
            vertex.get()
        );

        self.assignment[vertex.slot()]
    }

    /// Returns `true` if `vertex` was opened as a center.
    #[inline]
    pub fn is_center(&self, vertex: VertexIndex) -> bool {
        self.centers.contains(&vertex)
    }

    /// Returns the vertices served by `center`, in ascending id order.
    pub fn members_of(&self, center: VertexIndex) -> impl Iterator<Item = VertexIndex> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == center)
            .map(|(slot, _)| VertexIndex::from_slot(slot))
    }

    /// Returns the number of vertices served by `center`.
    #[inline]
    pub fn load_of(&self, center: VertexIndex) -> usize {
        self.members_of(center).count()
    }

    /// Returns the largest number of vertices served by a single center.
    pub fn max_load(&self) -> usize {
        self.centers
            .iter()
            .map(|&c| self.load_of(c))
            .max()
            .unwrap_or(0)
    }
}

impl<W> std::fmt::Display for CenterSolution<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Radius: {}", self.radius)?;
        write!(f, "   Centers:")?;
        for c in &self.centers {
            write!(f, " {}", c.get())?;
        }
        writeln!(f)?;
        writeln!(f)?;

        writeln!(f, "   {:<10} | {:<10}", "Vertex", "Center")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (slot, center) in self.assignment.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", slot + 1, center.get())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vi(i: usize) -> VertexIndex {
        VertexIndex::new(i)
    }

    fn star_solution() -> CenterSolution<i64> {
        CenterSolution::new(1, vec![vi(3), vi(1)], vec![vi(1), vi(1), vi(3), vi(1)])
    }

    #[test]
    fn test_accessors() {
        let sol = star_solution();
        assert_eq!(sol.radius(), 1);
        assert_eq!(sol.centers(), &[vi(3), vi(1)]);
        assert_eq!(sol.num_vertices(), 4);
        assert_eq!(sol.num_centers(), 2);
        assert_eq!(sol.center_of(vi(2)), vi(1));
        assert_eq!(sol.center_of(vi(3)), vi(3));
        assert!(sol.is_center(vi(3)));
        assert!(!sol.is_center(vi(2)));
    }

    #[test]
    fn test_members_and_loads() {
        let sol = star_solution();
        let members: Vec<VertexIndex> = sol.members_of(vi(1)).collect();
        assert_eq!(members, vec![vi(1), vi(2), vi(4)]);
        assert_eq!(sol.load_of(vi(1)), 3);
        assert_eq!(sol.load_of(vi(3)), 1);
        assert_eq!(sol.load_of(vi(2)), 0);
        assert_eq!(sol.max_load(), 3);
    }

    #[test]
    #[should_panic(expected = "called CenterSolution::new with an assignment to a vertex")]
    fn test_new_panics_on_unopened_center() {
        let _ = CenterSolution::new(0_i64, vec![vi(1)], vec![vi(1), vi(2)]);
    }

    #[test]
    fn test_display_formatting_example() {
        let sol = CenterSolution::new(2_i64, vec![vi(1)], vec![vi(1), vi(1)]);

        let mut expected = String::new();
        expected.push_str("Solution Summary\n");
        expected.push_str("   Radius: 2\n");
        expected.push_str("   Centers: 1\n");
        expected.push('\n');
        expected.push_str("   Vertex     | Center    \n");
        expected.push_str("   -----------+-----------\n");
        expected.push_str("   1          | 1         \n");
        expected.push_str("   2          | 1         \n");

        assert_eq!(format!("{}", sol), expected);
    }

    #[test]
    fn test_clone_eq_and_debug() {
        let sol = star_solution();
        assert_eq!(sol.clone(), sol);
        let dbg = format!("{:?}", sol);
        assert!(dbg.contains("CenterSolution"));
        assert!(dbg.contains("radius"));
        assert!(dbg.contains("assignment"));
    }
}
