//! Contiguous numeric buffers for mesh geometry.
//!
//! A [Buffer] owns zero-initialised storage of one [Element] type. Any number of read-only
//! [BufferViews](BufferView) may alias that storage; writes through the owning [Buffer] are
//! visible through every view, but a view never follows its source to a *new* allocation.
//!
//! Buffers are `!Send` and `!Sync`; they are meant to be touched from a single frame thread.

mod element;
pub use element::*;

use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("buffer length mismatch (expected: {expected}, found: {found})")]
    LengthMismatch { expected: usize, found: usize },
}

/// Owning handle to a contiguous run of `T`.
pub struct Buffer<T: Element> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T: Element> Buffer<T> {
    /// Allocate `len` zeroed elements, with storage independent from any other buffer.
    pub fn zeroed(len: usize) -> Self {
        tracing::trace!(len, component = ?T::COMPONENT, "allocating buffer");
        Self {
            data: Rc::new(RefCell::new(vec![T::ZERO; len])),
        }
    }

    /// Allocate a new buffer holding a copy of `src`.
    pub fn from_slice(src: &[T]) -> Self {
        tracing::trace!(len = src.len(), component = ?T::COMPONENT, "allocating buffer");
        Self {
            data: Rc::new(RefCell::new(src.to_vec())),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the buffer contents, in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.len() * T::COMPONENT.size()
    }

    /// # Panics
    ///
    /// * if the buffer is currently borrowed mutably
    #[inline]
    pub fn read(&self) -> Ref<'_, [T]> {
        Ref::map(self.data.borrow(), Vec::as_slice)
    }

    /// # Panics
    ///
    /// * if the buffer is currently borrowed, through this handle or any view
    #[inline]
    pub fn write(&self) -> RefMut<'_, [T]> {
        RefMut::map(self.data.borrow_mut(), Vec::as_mut_slice)
    }

    /// Overwrite the contents of this buffer in place.
    ///
    /// # Errors
    ///
    /// * [`LengthMismatch`](Error::LengthMismatch) if `src.len() != self.len()`; the buffer is
    ///   left untouched.
    pub fn copy_from_slice(&self, src: &[T]) -> Result<(), Error> {
        let mut data = self.data.borrow_mut();
        if data.len() != src.len() {
            return Err(Error::LengthMismatch {
                expected: data.len(),
                found: src.len(),
            });
        }
        data.copy_from_slice(src);
        Ok(())
    }

    /// Fill this buffer by repeating `pattern` until it is full.
    ///
    /// # Errors
    ///
    /// * [`LengthMismatch`](Error::LengthMismatch) if `self.len()` is not a multiple of
    ///   `pattern.len()`.
    pub fn fill_pattern(&self, pattern: &[T]) -> Result<(), Error> {
        let mut data = self.data.borrow_mut();
        if pattern.is_empty() || data.len() % pattern.len() != 0 {
            return Err(Error::LengthMismatch {
                expected: data.len(),
                found: pattern.len(),
            });
        }
        for chunk in data.chunks_exact_mut(pattern.len()) {
            chunk.copy_from_slice(pattern);
        }
        Ok(())
    }

    /// Create a read-only alias of this buffer's current storage.
    #[inline]
    pub fn view(&self) -> BufferView<T> {
        BufferView {
            data: Rc::clone(&self.data),
        }
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("component", &T::COMPONENT)
            .field("len", &self.len())
            .finish()
    }
}

/// Read-only alias of a [Buffer]'s storage.
pub struct BufferView<T: Element> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T: Element> Clone for BufferView<T> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl<T: Element> BufferView<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// * if the owning [Buffer] is currently borrowed mutably
    #[inline]
    pub fn read(&self) -> Ref<'_, [T]> {
        Ref::map(self.data.borrow(), Vec::as_slice)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.borrow().get(index).copied()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.borrow().clone()
    }

    /// Whether `self` and `buf` alias the same storage.
    #[inline]
    pub fn aliases(&self, buf: &Buffer<T>) -> bool {
        Rc::ptr_eq(&self.data, &buf.data)
    }

    /// Whether `self` and `other` alias the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: Element> fmt::Debug for BufferView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferView")
            .field("component", &T::COMPONENT)
            .field("len", &self.len())
            .finish()
    }
}
