//! ARM boot parameter list (ATAGs).
//!
//! Every record starts with a two-word header, `(size, tag)`, where `size`
//! counts the header itself. A zero-size `ATAG_NONE` record ends the list.

use log::debug;

use super::error::{BootError, Result};

pub const ATAG_NONE: u32 = 0x0000_0000;
pub const ATAG_CORE: u32 = 0x5441_0001;
pub const ATAG_MEM: u32 = 0x5441_0002;
pub const ATAG_CMDLINE: u32 = 0x5441_0009;

const HEADER_WORDS: usize = 2;
pub const CORE_WORDS: usize = HEADER_WORDS + 3;
pub const MEM_WORDS: usize = HEADER_WORDS + 2;

/// Word count of a command-line record holding `len` bytes plus the NUL.
pub const fn cmdline_words(len: usize) -> usize {
    (8 + len + 1 + 3) / 4
}

/// Words needed for a full `core, mem, cmdline, none` list.
pub fn list_words(cmdline: &str) -> usize {
    CORE_WORDS + MEM_WORDS + cmdline_words(cmdline.len()) + HEADER_WORDS
}

/// Appends records to a parameter region.
pub struct ParamBuilder<'a> {
    region: &'a mut [u32],
    cursor: usize,
}

impl<'a> ParamBuilder<'a> {
    pub fn new(region: &'a mut [u32]) -> Self {
        Self { region, cursor: 0 }
    }

    /// Builder over `words` words of physical memory at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be 4-byte aligned, valid for writes of `words` words and
    /// not aliased for the lifetime of the builder.
    pub unsafe fn at(base: usize, words: usize) -> Self {
        Self::new(unsafe { core::slice::from_raw_parts_mut(base as *mut u32, words) })
    }

    /// Words written so far, excluding the terminator.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    fn record(&mut self, words: usize) -> Result<&mut [u32]> {
        // the terminator header must always fit after this record
        let end = self.cursor + words;
        if end + HEADER_WORDS > self.region.len() {
            return Err(BootError::ParamsOverflow);
        }
        let record = &mut self.region[self.cursor..end];
        self.cursor = end;
        Ok(record)
    }

    pub fn start(&mut self) -> Result<&mut Self> {
        let record = self.record(CORE_WORDS)?;
        record.copy_from_slice(&[CORE_WORDS as u32, ATAG_CORE, 0, 0, 0]);
        Ok(self)
    }

    pub fn memory(&mut self, base: u32, size: u32) -> Result<&mut Self> {
        let record = self.record(MEM_WORDS)?;
        record.copy_from_slice(&[MEM_WORDS as u32, ATAG_MEM, size, base]);
        Ok(self)
    }

    pub fn cmdline(&mut self, cmdline: &str) -> Result<&mut Self> {
        let words = cmdline_words(cmdline.len());
        let record = self.record(words)?;
        record[0] = words as u32;
        record[1] = ATAG_CMDLINE;
        let payload = &mut record[HEADER_WORDS..];
        payload.fill(0);
        for (i, byte) in cmdline.bytes().enumerate() {
            payload[i / 4] |= (byte as u32) << ((i % 4) * 8);
        }
        debug!("atags: cmdline {} bytes in {} words", cmdline.len(), words);
        Ok(self)
    }

    /// Write the terminator. The cursor does not move.
    pub fn end(&mut self) -> Result<()> {
        let tail = self
            .region
            .get_mut(self.cursor..self.cursor + HEADER_WORDS)
            .ok_or(BootError::ParamsOverflow)?;
        tail.copy_from_slice(&[0, ATAG_NONE]);
        Ok(())
    }
}

/// One record seen while walking a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub tag: u32,
    pub payload: &'a [u32],
}

impl Tag<'_> {
    /// Payload as little-endian bytes.
    pub fn payload_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.payload.iter().flat_map(|word| word.to_le_bytes())
    }
}

/// Walks records by their size field, stopping at the terminator.
pub struct TagIter<'a> {
    words: &'a [u32],
    done: bool,
}

impl<'a> TagIter<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, done: false }
    }
}

impl<'a> Iterator for TagIter<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        if self.done || self.words.len() < HEADER_WORDS {
            return None;
        }
        let size = self.words[0] as usize;
        let tag = self.words[1];
        if size == 0 {
            self.done = true;
            return Some(Tag { tag, payload: &[] });
        }
        if size < HEADER_WORDS || size > self.words.len() {
            self.done = true;
            return None;
        }
        let payload = &self.words[HEADER_WORDS..size];
        self.words = &self.words[size..];
        Some(Tag { tag, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(cmdline: &str) -> ([u32; 64], usize) {
        let mut region = [0xDEAD_BEEF; 64];
        let mut builder = ParamBuilder::new(&mut region);
        builder
            .start()
            .and_then(|b| b.memory(0x3000_0000, 0x0400_0000))
            .and_then(|b| b.cmdline(cmdline))
            .unwrap();
        builder.end().unwrap();
        let len = builder.len();
        (region, len)
    }

    #[test]
    fn core_and_mem_records() {
        let (region, _) = build("");
        assert_eq!(&region[..5], &[5, ATAG_CORE, 0, 0, 0]);
        assert_eq!(&region[5..9], &[4, ATAG_MEM, 0x0400_0000, 0x3000_0000]);
    }

    #[test]
    fn cmdline_sizes() {
        assert_eq!(cmdline_words(0), 3);
        assert_eq!(cmdline_words(3), 3);
        assert_eq!(cmdline_words(4), 4);
        assert_eq!(cmdline_words(8), 5);

        let (region, len) = build("");
        assert_eq!(&region[9..12], &[3, ATAG_CMDLINE, 0]);
        assert_eq!(len, 12);

        let (region, _) = build("abcd");
        assert_eq!(&region[9..13], &[4, ATAG_CMDLINE, u32::from_le_bytes(*b"abcd"), 0]);
    }

    #[test]
    fn cmdline_is_nul_terminated_and_zero_padded() {
        let (region, _) = build("root=/dev/mtdblock3");
        let tag = TagIter::new(&region).find(|t| t.tag == ATAG_CMDLINE).unwrap();
        let bytes: Vec<u8> = tag.payload_bytes().collect();
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(&bytes[..19], b"root=/dev/mtdblock3");
        assert!(bytes[19..].iter().all(|&b| b == 0));
    }

    #[test]
    fn list_ends_at_exactly_one_terminator() {
        let cmdline = "noinitrd console=ttySAC0";
        let (region, len) = build(cmdline);
        let tags: Vec<Tag> = TagIter::new(&region).collect();
        let ids: Vec<u32> = tags.iter().map(|t| t.tag).collect();
        assert_eq!(ids, [ATAG_CORE, ATAG_MEM, ATAG_CMDLINE, ATAG_NONE]);
        assert_eq!(len + 2, list_words(cmdline));
        assert_eq!(&region[len..len + 2], &[0, ATAG_NONE]);
        assert_eq!(region[len + 2], 0xDEAD_BEEF);
    }

    #[test]
    fn overflow_is_reported_without_writing_past_the_region() {
        let mut region = [0u32; 12];
        let mut builder = ParamBuilder::new(&mut region[..10]);
        builder.start().unwrap();
        assert_eq!(builder.memory(0, 0).err(), Some(BootError::ParamsOverflow));
        assert_eq!(builder.len(), 5);
        builder.end().unwrap();
        assert_eq!(&region[5..7], &[0, ATAG_NONE]);
        assert_eq!(&region[10..], &[0, 0]);
    }

    #[test]
    fn long_cmdline_overflows() {
        let mut region = [0u32; 16];
        let mut builder = ParamBuilder::new(&mut region);
        builder.start().unwrap();
        let long = "x".repeat(40);
        assert_eq!(builder.cmdline(&long).err(), Some(BootError::ParamsOverflow));
    }
}
