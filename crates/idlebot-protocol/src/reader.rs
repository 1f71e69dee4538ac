//! Cursor over a packet payload.
//!
//! All integers on the wire are little-endian. Strings come in two
//! flavours: NUL-terminated (chat text) and fixed-width NUL-padded
//! (character names, always 16 bytes).

use bytes::Buf;

use crate::DecodeFault;

/// Width of a fixed character-name field.
pub(crate) const NAME_LEN: usize = 16;

/// Reads one payload through [`Buf`], reporting short reads as
/// [`DecodeFault`]s instead of panicking.
pub(crate) struct PacketReader<'a> {
    src: &'a [u8],
    len: usize,
}

impl<'a> PacketReader<'a> {
    /// Starts reading at `offset` (usually 1, right after the tag byte).
    pub(crate) fn at(data: &'a [u8], offset: usize) -> Self {
        let mut src = data;
        src.advance(offset.min(data.len()));
        Self {
            src,
            len: data.len(),
        }
    }

    fn offset(&self) -> usize {
        self.len - self.src.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeFault> {
        let available = self.src.remaining();
        if available < needed {
            return Err(DecodeFault::Truncated {
                offset: self.offset(),
                needed,
                available,
            });
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeFault> {
        self.ensure(1)?;
        Ok(self.src.get_u8())
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeFault> {
        self.ensure(2)?;
        Ok(self.src.get_u16_le())
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeFault> {
        self.ensure(4)?;
        Ok(self.src.get_u32_le())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), DecodeFault> {
        self.ensure(n)?;
        self.src.advance(n);
        Ok(())
    }

    /// Reads a fixed-width field and cuts it at the first NUL.
    pub(crate) fn fixed_str(&mut self, width: usize) -> Result<String, DecodeFault> {
        self.ensure(width)?;
        let raw = self.src.copy_to_bytes(width);
        let end = nul_position(&raw).unwrap_or(raw.len());
        Ok(lossy(&raw[..end]))
    }

    /// Reads up to (and consumes) the next NUL byte.
    pub(crate) fn cstr(&mut self) -> Result<String, DecodeFault> {
        let start = self.offset();
        let end = nul_position(self.src.chunk())
            .ok_or(DecodeFault::UnterminatedString(start))?;
        let text = lossy(&self.src.chunk()[..end]);
        self.src.advance(end + 1);
        Ok(text)
    }

    /// Everything not yet consumed.
    pub(crate) fn rest(&mut self) -> Vec<u8> {
        self.src.copy_to_bytes(self.src.remaining()).to_vec()
    }
}

fn nul_position(raw: &[u8]) -> Option<usize> {
    raw.iter().position(|&b| b == 0)
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
