//! Shared handle over encoded image bytes.

use std::fmt;
use std::sync::Arc;

use crate::CodecError;

/// Cheaply clonable handle to an immutable byte region.
///
/// The handle either shares ownership of the bytes through an atomic
/// reference count, or borrows memory that the caller owns. Both kinds clone
/// and drop the same way; only the release differs. The last clone of a
/// shared handle frees the bytes, while dropping a borrowed handle never
/// touches the caller's memory.
///
/// The borrow lifetime `'a` ties every resource built over a borrowed handle
/// to the caller's buffer, so a resource cannot outlive the memory it reads.
#[derive(Clone)]
pub struct SharedBuffer<'a> {
    storage: Storage<'a>,
}

#[derive(Clone)]
enum Storage<'a> {
    Slice(Arc<[u8]>),
    Owner(Arc<dyn AsRef<[u8]> + Send + Sync>),
    Borrowed(&'a [u8]),
}

impl<'a> SharedBuffer<'a> {
    /// Wrap caller-owned memory without taking ownership.
    pub const fn borrowed(data: &'a [u8]) -> Self {
        Self {
            storage: Storage::Borrowed(data),
        }
    }

    /// The wrapped bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Slice(data) => &data[..],
            Storage::Owner(owner) => (**owner).as_ref(),
            Storage::Borrowed(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Whether dropping the last clone releases the memory.
    ///
    /// `false` for handles over caller-owned memory.
    pub fn is_owned(&self) -> bool {
        !matches!(self.storage, Storage::Borrowed(_))
    }

    /// First `len` bytes of the region.
    ///
    /// Fails when `len` describes more bytes than the handle holds.
    pub fn prefix(&self, len: usize) -> Result<&[u8], CodecError> {
        let data = self.as_slice();
        data.get(..len).ok_or_else(|| {
            CodecError::InvalidInput(format!(
                "declared length {len} exceeds buffer of {} bytes",
                data.len()
            ))
        })
    }
}

impl SharedBuffer<'static> {
    /// Share an existing reference-counted slice.
    pub fn shared(data: Arc<[u8]>) -> Self {
        Self {
            storage: Storage::Slice(data),
        }
    }

    /// Take ownership of any byte container.
    pub fn from_owner<T>(owner: T) -> Self
    where
        T: AsRef<[u8]> + Send + Sync + 'static,
    {
        SharedBuffer {
            storage: Storage::Owner(Arc::new(owner)),
        }
    }
}

impl AsRef<[u8]> for SharedBuffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<'a> From<&'a [u8]> for SharedBuffer<'a> {
    fn from(data: &'a [u8]) -> Self {
        SharedBuffer::borrowed(data)
    }
}

impl<'a> From<&'a Vec<u8>> for SharedBuffer<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        SharedBuffer::borrowed(data.as_slice())
    }
}

impl From<Vec<u8>> for SharedBuffer<'static> {
    fn from(data: Vec<u8>) -> Self {
        SharedBuffer::from_owner(data)
    }
}

impl From<Arc<[u8]>> for SharedBuffer<'static> {
    fn from(data: Arc<[u8]>) -> Self {
        SharedBuffer::shared(data)
    }
}

impl fmt::Debug for SharedBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .field("owned", &self.is_owned())
            .finish()
    }
}
