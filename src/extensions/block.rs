//! Handshake extension block framing.
//!
//! Wire format:
//! ```text
//! +0   Block Type     (2 bytes BE16)
//! +2   Logical Length (2 bytes BE16, content bytes, not padded)
//! +4   Payload        (Length rounded up to a multiple of 4; padding is zero)
//! ```
//!
//! The header is one alignment unit, so every block starts aligned.

use crate::core::constants::{ALIGNMENT_UNIT, BLOCK_HEADER_SIZE, MAX_BLOCK_LENGTH};
use crate::core::{OptionError, OptionResult};

/// Payload size on the wire for `len` content bytes.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(ALIGNMENT_UNIT) * ALIGNMENT_UNIT
}

/// One extension block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBlock {
    block_type: u16,
    data: Vec<u8>,
}

impl ExtensionBlock {
    /// Create a block holding `data` as its logical content.
    pub fn new(block_type: u16, data: Vec<u8>) -> OptionResult<Self> {
        if data.len() > MAX_BLOCK_LENGTH {
            return Err(OptionError::ExtensionOverflow {
                block_type,
                declared: data.len(),
                max: MAX_BLOCK_LENGTH,
            });
        }
        Ok(Self { block_type, data })
    }

    /// Block type.
    pub fn block_type(&self) -> u16 {
        self.block_type
    }

    /// Logical content, without padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Total wire size including header and padding.
    pub fn wire_size(&self) -> usize {
        BLOCK_HEADER_SIZE + padded_len(self.data.len())
    }

    /// Append the encoded block to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        // Length fits, checked in `new`
        let declared = self.data.len() as u16;
        buf.extend_from_slice(&self.block_type.to_be_bytes());
        buf.extend_from_slice(&declared.to_be_bytes());
        buf.extend_from_slice(&self.data);
        buf.resize(buf.len() + padded_len(self.data.len()) - self.data.len(), 0);
    }

    /// Encode to bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_size());
        self.encode_into(&mut buf);
        buf
    }

    /// Decode one block from the front of `data`, returning it and the bytes
    /// consumed.
    ///
    /// `limit` gives the largest logical length the receiver accepts for a
    /// block type. The declared length is checked against it before the
    /// payload is read, so an oversized block is reported as an overflow even
    /// if the buffer is also short.
    pub fn decode(data: &[u8], limit: impl Fn(u16) -> usize) -> OptionResult<(Self, usize)> {
        if data.len() < BLOCK_HEADER_SIZE {
            return Err(OptionError::MalformedExtension {
                expected: BLOCK_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let block_type = u16::from_be_bytes([data[0], data[1]]);
        let declared = usize::from(u16::from_be_bytes([data[2], data[3]]));

        let max = limit(block_type);
        if declared > max {
            return Err(OptionError::ExtensionOverflow {
                block_type,
                declared,
                max,
            });
        }

        let size = BLOCK_HEADER_SIZE + padded_len(declared);
        if data.len() < size {
            return Err(OptionError::MalformedExtension {
                expected: size,
                actual: data.len(),
            });
        }

        // Padding bytes are discarded whatever they hold
        let content = data[BLOCK_HEADER_SIZE..BLOCK_HEADER_SIZE + declared].to_vec();
        Ok((
            Self {
                block_type,
                data: content,
            },
            size,
        ))
    }
}

/// Ordered collection of extension blocks, at most one per type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    blocks: Vec<ExtensionBlock>,
}

impl ExtensionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block, replacing any earlier block of the same type.
    pub fn add(&mut self, block: ExtensionBlock) {
        if let Some(existing) = self
            .blocks
            .iter_mut()
            .find(|b| b.block_type == block.block_type)
        {
            *existing = block;
        } else {
            self.blocks.push(block);
        }
    }

    /// Get a block by type.
    pub fn get(&self, block_type: u16) -> Option<&ExtensionBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// Check if a block of this type is present.
    pub fn has(&self, block_type: u16) -> bool {
        self.get(block_type).is_some()
    }

    /// Iterate over the blocks in order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionBlock> {
        self.blocks.iter()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Encode all blocks back to back.
    pub fn encode(&self) -> Vec<u8> {
        let total = self.blocks.iter().map(ExtensionBlock::wire_size).sum();
        let mut buf = Vec::with_capacity(total);
        for block in &self.blocks {
            block.encode_into(&mut buf);
        }
        buf
    }

    /// Decode a whole extension area.
    ///
    /// A repeated block type keeps the last occurrence.
    pub fn decode(data: &[u8], limit: impl Fn(u16) -> usize) -> OptionResult<Self> {
        let mut set = Self::new();
        let mut offset = 0;

        while offset < data.len() {
            let (block, consumed) = ExtensionBlock::decode(&data[offset..], &limit)?;
            set.add(block);
            offset += consumed;
        }

        Ok(set)
    }
}
