//! Bounds-checked forward reader over an in-memory byte region

use crate::error::{Result, TagError};

/// Forward-only reader over a borrowed byte slice.
///
/// Every read checks bounds and fails with [`TagError::OutOfBounds`] instead of
/// panicking. Sub-regions borrow the same buffer, nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Offset of the next read, relative to the start of this region
    pub fn position(&self) -> usize {
        self.pos
    }

    fn check(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(TagError::OutOfBounds {
                offset: self.pos,
                requested: n,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Return the next `n` bytes and advance past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn peek_byte(&self) -> Result<u8> {
        self.check(1)?;
        Ok(self.data[self.pos])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Split off a cursor over the next `n` bytes and advance this one past them.
    pub fn sub_region(&mut self, n: usize) -> Result<ByteCursor<'a>> {
        Ok(ByteCursor::new(self.read(n)?))
    }

    /// Cursor over everything not yet read.
    pub fn rest(&mut self) -> ByteCursor<'a> {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        ByteCursor::new(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reads_both_endiannesses() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32_be().unwrap(), 0x01020304);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x04030201);
        assert!(cursor.is_empty());
    }

    #[test]
    fn u16_reads() {
        let data = [0xAB, 0xCD, 0xAB, 0xCD];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u16_be().unwrap(), 0xABCD);
        assert_eq!(cursor.read_u16_le().unwrap(), 0xCDAB);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [7, 8];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.peek_byte().unwrap(), 7);
        assert_eq!(cursor.read_byte().unwrap(), 7);
        assert_eq!(cursor.read_byte().unwrap(), 8);
        assert!(cursor.peek_byte().is_err());
    }

    #[test]
    fn sub_region_advances_parent() {
        let data = [1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data);
        let mut sub = cursor.sub_region(3).unwrap();

        assert_eq!(cursor.remaining(), 2);
        assert_eq!(sub.read(3).unwrap(), &[1, 2, 3]);
        assert!(matches!(sub.read_byte(), Err(TagError::OutOfBounds { .. })));
        assert_eq!(cursor.read_byte().unwrap(), 4);
    }

    #[test]
    fn failed_read_leaves_position() {
        let data = [1, 2];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.read_u32_be().is_err());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0102);
    }

    proptest! {
        #[test]
        fn reads_never_exceed_region(data in proptest::collection::vec(any::<u8>(), 0..64), n in 0usize..80) {
            let mut cursor = ByteCursor::new(&data);
            let result = cursor.read(n);
            if n <= data.len() {
                prop_assert_eq!(result.unwrap().len(), n);
                prop_assert_eq!(cursor.remaining(), data.len() - n);
            } else {
                let is_out_of_bounds = matches!(result, Err(TagError::OutOfBounds { .. }));
                prop_assert!(is_out_of_bounds);
                prop_assert_eq!(cursor.remaining(), data.len());
            }
        }

        #[test]
        fn skip_and_sub_region_agree(data in proptest::collection::vec(any::<u8>(), 0..64), n in 0usize..80) {
            let mut a = ByteCursor::new(&data);
            let mut b = ByteCursor::new(&data);
            prop_assert_eq!(a.skip(n).is_ok(), b.sub_region(n).is_ok());
            prop_assert_eq!(a.remaining(), b.remaining());
        }
    }
}
