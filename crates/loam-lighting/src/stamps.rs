/// Per-cell visit marks for the flood fill.
///
/// A cell counts as visited in the current fill iff its stamp equals `mark`.
/// Starting a fill bumps the mark instead of clearing the buffer; the buffer is
/// only zeroed when the counter wraps.
#[derive(Clone, Debug, Default)]
pub struct VisitStamps {
    stamps: Vec<u32>,
    mark: u32,
}

impl VisitStamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocates when the grid size changed since the last fill.
    pub fn ensure_len(&mut self, len: usize) {
        if self.stamps.len() != len {
            self.stamps = vec![0; len];
            self.mark = 1;
        }
    }

    /// Start a new fill and return its mark.
    pub fn next_mark(&mut self) -> u32 {
        self.mark = self.mark.wrapping_add(1);
        if self.mark == 0 {
            self.stamps.fill(0);
            self.mark = 1;
        }
        self.mark
    }

    #[inline]
    pub fn mark(&self) -> u32 {
        self.mark
    }

    /// Stamp `i` for the current fill. Returns false if it was already stamped.
    #[inline]
    pub fn visit(&mut self, i: usize) -> bool {
        if self.stamps[i] == self.mark {
            return false;
        }
        self.stamps[i] = self.mark;
        true
    }

    #[inline]
    pub fn is_visited(&self, i: usize) -> bool {
        self.stamps.get(i).is_some_and(|&s| s == self.mark)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn force_mark(&mut self, mark: u32) {
        self.mark = mark;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraparound_clears_stale_stamps() {
        let mut v = VisitStamps::new();
        v.ensure_len(4);
        v.force_mark(u32::MAX);
        assert!(v.visit(2));
        assert!(v.is_visited(2));
        let m = v.next_mark();
        assert_eq!(m, 1);
        assert!(!v.is_visited(2));
        // a stamp of 1 left over from before the wrap must not survive either
        assert!(v.visit(2));
        assert!(!v.visit(2));
    }

    #[test]
    fn resize_resets_mark() {
        let mut v = VisitStamps::new();
        v.ensure_len(3);
        v.next_mark();
        v.next_mark();
        v.ensure_len(5);
        assert_eq!(v.len(), 5);
        assert_eq!(v.mark(), 1);
        v.ensure_len(5);
        assert_eq!(v.mark(), 1);
    }
}
