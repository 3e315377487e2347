//! Fixed-capacity byte buffers
//!
//! [`ByteBuffer`] backs the program, input and output resources. Its length
//! marks the end of the content, so no sentinel byte is stored.
//!
//! Program and input are replaced wholesale through [`ByteBuffer::replace`];
//! output is rebuilt one byte at a time through [`ByteBuffer::push`].

use super::{CapacityError, Region};

/// What to do with a replacement that is longer than the capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Keep the first `capacity` bytes and succeed
    #[default]
    Truncate,
    /// Fail with [`CapacityError`] and leave the buffer untouched
    Reject,
}

/// A byte sequence that never grows past its capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    region: Region,
    data: Vec<u8>,
    capacity: usize,
}

impl ByteBuffer {
    pub fn new(region: Region, capacity: usize) -> Self {
        ByteBuffer {
            region,
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the whole content, returning how many bytes were stored
    pub fn replace(&mut self, bytes: &[u8], policy: WritePolicy) -> Result<usize, CapacityError> {
        let stored = if bytes.len() > self.capacity {
            match policy {
                WritePolicy::Truncate => self.capacity,
                WritePolicy::Reject => {
                    return Err(CapacityError::new(self.region, self.capacity, bytes.len()));
                }
            }
        } else {
            bytes.len()
        };

        self.data.clear();
        self.data.extend_from_slice(&bytes[..stored]);
        Ok(stored)
    }

    /// Append one byte
    pub fn push(&mut self, byte: u8) -> Result<(), CapacityError> {
        if self.data.len() >= self.capacity {
            return Err(CapacityError::new(
                self.region,
                self.capacity,
                self.data.len() + 1,
            ));
        }
        self.data.push(byte);
        Ok(())
    }

    /// Byte at `index`, or `None` past the end of the content
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }
}
