use std::cell::UnsafeCell;
use std::fmt;
use std::rc::Rc;

/// The non-moving byte storage backing one or more iobufs.
///
/// A `Bigstring` is a fixed-size heap allocation behind a refcount. Cloning a
/// handle shares the allocation; the bytes are freed when the last handle is
/// dropped. The allocation never moves or resizes, so a pointer into it
/// stays valid for the duration of any syscall it is handed to.
///
/// Several iobufs may write through aliasing handles to the same storage.
/// That is sound here only because the whole type is single-threaded:
/// `Rc` + `UnsafeCell` make `Bigstring` neither `Send` nor `Sync`, and every
/// mutation runs to completion without yielding.
pub struct Bigstring {
    data: Rc<UnsafeCell<Box<[u8]>>>,
}

impl Bigstring {
    /// Allocates `len` zeroed bytes.
    pub fn new(len: usize) -> Self {
        Self::from_boxed(vec![0u8; len].into_boxed_slice())
    }

    /// Allocates storage holding a copy of `src`.
    pub fn from_slice(src: &[u8]) -> Self {
        Self::from_boxed(src.to_vec().into_boxed_slice())
    }

    fn from_boxed(data: Box<[u8]>) -> Self {
        Self {
            data: Rc::new(UnsafeCell::new(data)),
        }
    }

    /// Size of the allocation in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        unsafe { (&*self.data.get()).len() }
    }

    /// `true` if the allocation is zero-sized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if both handles share the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Stable pointer to the first byte of the allocation.
    ///
    /// The pointer is valid for reads and writes of `len()` bytes for as
    /// long as any handle to this storage is alive. Writing through it from
    /// code that only holds read permission on an iobuf is a contract
    /// violation of the [`expert`](crate::Iobuf::expert) interface, not a
    /// compile error.
    #[inline]
    pub(crate) fn as_mut_ptr(&self) -> *mut u8 {
        unsafe { (*self.data.get()).as_mut_ptr() }
    }
}

impl Clone for Bigstring {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl fmt::Debug for Bigstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bigstring")
            .field("len", &self.len())
            .field("handles", &Rc::strong_count(&self.data))
            .finish()
    }
}
