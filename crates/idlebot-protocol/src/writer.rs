//! Little-endian payload builder, the mirror of the packet reader.

use bytes::{BufMut, BytesMut};

pub(crate) struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    pub(crate) fn new(tag: u8) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u8(tag);
        Self { buf }
    }

    pub(crate) fn u8(mut self, value: u8) -> Self {
        self.buf.put_u8(value);
        self
    }

    pub(crate) fn u16(mut self, value: u16) -> Self {
        self.buf.put_u16_le(value);
        self
    }

    pub(crate) fn u32(mut self, value: u32) -> Self {
        self.buf.put_u32_le(value);
        self
    }

    /// Appends the text followed by a NUL terminator.
    pub(crate) fn cstr(mut self, text: &str) -> Self {
        self.buf.put_slice(text.as_bytes());
        self.buf.put_u8(0);
        self
    }

    /// Appends the text NUL-padded (or cut) to exactly `width` bytes.
    pub(crate) fn fixed_str(mut self, text: &str, width: usize) -> Self {
        let bytes = text.as_bytes();
        let len = bytes.len().min(width);
        self.buf.put_slice(&bytes[..len]);
        self.buf.put_bytes(0, width - len);
        self
    }

    pub(crate) fn bytes(mut self, raw: &[u8]) -> Self {
        self.buf.put_slice(raw);
        self
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_integers_are_little_endian() {
        let out = PacketWriter::new(0x6d).u8(1).u16(0x1234).u32(0x1234_5678).finish();
        assert_eq!(out, vec![0x6d, 0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_fixed_str_pads_and_cuts() {
        let short = PacketWriter::new(0).fixed_str("Al", 4).finish();
        let long = PacketWriter::new(0).fixed_str("Alexander", 4).finish();
        assert_eq!(short, b"\0Al\0\0");
        assert_eq!(long, b"\0Alex");
    }

    #[test]
    fn test_cstr_appends_terminator() {
        let out = PacketWriter::new(0x15).cstr("hi").cstr("").finish();
        assert_eq!(out, b"\x15hi\0\0");
    }
}
