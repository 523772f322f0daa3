use core::ops::{Index, Range};

use bytemuck::Pod;

/// Memory page size the backing storage is rounded to (bytes).
pub const PAGE_SIZE: usize = 4096;

/// Rounds `bytes` up to the next multiple of [`PAGE_SIZE`].
#[inline]
pub const fn align_to_page(bytes: usize) -> usize {
    (bytes + PAGE_SIZE - 1) & !(PAGE_SIZE - 1)
}

/// Growable flat array whose capacity always spans whole memory pages.
///
/// Two sizes are tracked:
/// - `len`: logical element count
/// - `space`: physical capacity in elements, always a whole number of pages
///
/// Invariants:
/// - `len <= space`
/// - `space` never shrinks
/// - writing below `len` never reallocates
/// - growth copies every existing element to the new storage
///
/// The storage is zero-filled up to `space` so the whole allocation can be handed
/// to the GPU as is. Writes are tracked as a dirty element range, letting the GPU
/// copy be patched instead of re-uploaded.
#[derive(Debug, Clone)]
pub struct PageAlignedArray<T: Pod> {
    storage: Vec<T>,
    len: usize,
    dirty: Option<Range<usize>>,
}

impl<T: Pod> Default for PageAlignedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> PageAlignedArray<T> {
    /// Creates an array holding one page.
    pub fn new() -> Self {
        Self::with_space(1)
    }

    /// Creates an array whose space covers at least `min_space` elements (and at
    /// least one page).
    pub fn with_space(min_space: usize) -> Self {
        let space = Self::space_for(min_space.max(1));
        Self {
            storage: vec![T::zeroed(); space],
            len: 0,
            dirty: None,
        }
    }

    /// Elements in one growth step: the smallest count spanning whole pages.
    pub fn elements_per_step() -> usize {
        let size = core::mem::size_of::<T>().max(1);
        PAGE_SIZE / gcd(size, PAGE_SIZE)
    }

    /// Smallest page-aligned space able to hold `count` elements.
    pub fn space_for(count: usize) -> usize {
        let step = Self::elements_per_step();
        count.div_ceil(step).max(1) * step
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical capacity in elements.
    #[inline]
    pub fn space(&self) -> usize {
        self.storage.len()
    }

    /// Physical capacity in bytes; always a multiple of [`PAGE_SIZE`].
    #[inline]
    pub fn space_bytes(&self) -> usize {
        self.storage.len() * core::mem::size_of::<T>()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// Overwrites the element at `index` in place.
    ///
    /// # Panics
    /// If `index >= len`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T)
    where
        T: PartialEq,
    {
        assert!(
            index < self.len,
            "PageAlignedArray::set: index {index} out of bounds (len {})",
            self.len
        );
        if self.storage[index] != value {
            self.storage[index] = value;
            self.mark_dirty(index..index + 1);
        }
    }

    /// Appends `value`, growing to the next page when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.space() {
            self.grow_to(self.len + 1);
        }
        let index = self.len;
        self.storage[index] = value;
        self.len += 1;
        self.mark_dirty(index..index + 1);
    }

    /// Ensures room for `additional` more elements with at most one reallocation.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        if needed > self.space() {
            self.grow_to(needed);
        }
    }

    /// Resets `len` to zero. Space is kept.
    pub fn clear(&mut self) {
        self.len = 0;
        self.dirty = None;
    }

    /// Logical contents (`..len`).
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.len]
    }

    /// Whole backing storage (`..space`), zero past `len`.
    #[inline]
    pub fn as_backing_slice(&self) -> &[T] {
        &self.storage
    }

    #[inline]
    pub fn as_backing_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.storage)
    }

    /// Element range written since the previous call, if any.
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    fn grow_to(&mut self, min_space: usize) {
        let new_space = Self::space_for(min_space);
        debug_assert!(new_space > self.space());

        let mut storage = vec![T::zeroed(); new_space];
        storage[..self.len].copy_from_slice(&self.storage[..self.len]);
        self.storage = storage;

        log::trace!(
            "page-aligned array grew to {new_space} elements ({} bytes)",
            self.space_bytes()
        );
    }

    fn mark_dirty(&mut self, range: Range<usize>) {
        self.dirty = Some(match self.dirty.take() {
            Some(d) => d.start.min(range.start)..d.end.max(range.end),
            None => range,
        });
    }
}

impl<T: Pod> Index<usize> for PageAlignedArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
