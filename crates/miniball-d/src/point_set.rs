//! Point storage and the move-to-front scan order.

/// Sentinel index marking the end of a [`ScanOrder`].
pub(crate) const END: usize = usize::MAX;

/// Checked-in points, stored contiguously in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct PointSet {
    dim: usize,
    len: usize,
    coords: Vec<f64>,
}

impl PointSet {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            len: 0,
            coords: Vec::new(),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn push(&mut self, point: &[f64]) {
        debug_assert_eq!(point.len(), self.dim);
        self.coords.extend_from_slice(point);
        self.len += 1;
    }

    /// Coordinates of the point with insertion index `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> &[f64] {
        let start = idx * self.dim;
        &self.coords[start..start + self.dim]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

/// Doubly linked list threaded through point indices.
///
/// The engine scans prefixes of this list and moves boundary-violating points to
/// the front. Nodes are insertion indices into a [`PointSet`]; moving a node never
/// invalidates a cursor held on another node.
#[derive(Debug, Clone)]
pub(crate) struct ScanOrder {
    head: usize,
    next: Vec<usize>,
    prev: Vec<usize>,
}

impl ScanOrder {
    /// Insertion order over `n` points.
    pub fn new(n: usize) -> Self {
        let next = (0..n).map(|i| if i + 1 < n { i + 1 } else { END }).collect();
        let prev = (0..n).map(|i| if i > 0 { i - 1 } else { END }).collect();
        Self {
            head: if n > 0 { 0 } else { END },
            next,
            prev,
        }
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn next(&self, node: usize) -> usize {
        self.next[node]
    }

    /// Splice `node` out of its position and reinsert it at the head.
    pub fn move_to_front(&mut self, node: usize) {
        if node == self.head {
            return;
        }

        let (p, n) = (self.prev[node], self.next[node]);
        // node is not the head, so it has a predecessor
        self.next[p] = n;
        if n != END {
            self.prev[n] = p;
        }

        self.next[node] = self.head;
        self.prev[self.head] = node;
        self.prev[node] = END;
        self.head = node;
    }

    /// Nodes from `start` up to (excluding) `end`.
    pub fn range(&self, start: usize, end: usize) -> ScanIter<'_> {
        ScanIter {
            order: self,
            cursor: start,
            end,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScanIter<'a> {
    order: &'a ScanOrder,
    cursor: usize,
    end: usize,
}

impl Iterator for ScanIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cursor == self.end || self.cursor == END {
            return None;
        }
        let node = self.cursor;
        self.cursor = self.order.next(node);
        Some(node)
    }
}
