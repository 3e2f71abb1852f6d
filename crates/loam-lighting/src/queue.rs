/// FIFO of `(x, y, level)` entries in parallel vectors with a moving head.
///
/// `clear` resets the logical contents but keeps the allocation, so a fill
/// after warm-up does not allocate.
#[derive(Clone, Debug, Default)]
pub struct SpreadQueue {
    xs: Vec<i32>,
    ys: Vec<i32>,
    levels: Vec<u8>,
    head: usize,
}

impl SpreadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            xs: Vec::with_capacity(cap),
            ys: Vec::with_capacity(cap),
            levels: Vec::with_capacity(cap),
            head: 0,
        }
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.levels.clear();
        self.head = 0;
    }

    #[inline]
    pub fn push(&mut self, x: i32, y: i32, level: u8) {
        self.xs.push(x);
        self.ys.push(y);
        self.levels.push(level);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(i32, i32, u8)> {
        let i = self.head;
        if i >= self.xs.len() {
            return None;
        }
        self.head += 1;
        Some((self.xs[i], self.ys[i], self.levels[i]))
    }

    /// Entries ever pushed since the last `clear`, popped ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.xs.len() - self.head
    }

    pub fn capacity(&self) -> usize {
        self.xs.capacity()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<(i32, i32, u8)> {
        if i >= self.xs.len() {
            return None;
        }
        Some((self.xs[i], self.ys[i], self.levels[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.levels)
            .map(|((&x, &y), &l)| (x, y, l))
    }
}
