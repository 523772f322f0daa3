//! CPU-side vertex storage shared with the GPU.
//!
//! The renderer writes stroke geometry into a [`PageAlignedArray`] and mirrors it
//! into a GPU buffer of the same size. Capacity only changes in whole pages, so the
//! GPU buffer is recreated rarely and patched in place otherwise.

mod page_aligned;

pub use page_aligned::{align_to_page, PageAlignedArray, PAGE_SIZE};
