/// Fixed-capacity circular buffer that overwrites its oldest slot on wrap.
///
/// `position` is the index of the next write and `written` counts every
/// append ever made, so `position == written % capacity` always holds.
#[derive(Debug, Clone)]
pub(crate) struct RingBuffer<T> {
    items: Box<[T]>,
    position: usize,
    written: usize,
}

impl<T: Clone> RingBuffer<T> {
    pub(crate) fn new(capacity: usize, default: T) -> Self {
        Self::from_fn(capacity, || default.clone())
    }
}

impl<T> RingBuffer<T> {
    pub(crate) fn from_fn(capacity: usize, f: impl FnMut() -> T) -> Self {
        assert!(capacity > 0);
        Self {
            items: std::iter::repeat_with(f).take(capacity).collect(),
            position: 0,
            written: 0,
        }
    }

    pub(crate) fn append(&mut self, value: T) {
        self.items[self.position] = value;
        self.position = (self.position + 1) % self.items.len();
        self.written += 1;
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn written(&self) -> usize {
        self.written
    }

    /// Resolves an offset relative to the write cursor; `-1` is the newest item.
    fn index(&self, offset: isize) -> usize {
        let capacity = self.items.len() as isize;
        (self.position as isize + offset).rem_euclid(capacity) as usize
    }

    pub(crate) fn get(&self, offset: isize) -> &T {
        &self.items[self.index(offset)]
    }

    pub(crate) fn get_mut(&mut self, offset: isize) -> &mut T {
        let index = self.index(offset);
        &mut self.items[index]
    }

    /// Iterates over all slots from the oldest to the newest.
    pub(crate) fn iter_chronological(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.items.split_at(self.position);
        older.iter().chain(newer.iter())
    }
}
