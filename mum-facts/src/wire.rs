//! Minimal length-prefixed little-endian primitives for the fact frame
//! (spec §4.4). No external serialization crate is used here on purpose:
//! the frame is a fixed, hand-specified binary layout, not a generic
//! serde format.

use crate::error::{FactError, FactResult};

#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.write_u16(bytes.len() as u16);
        self.buf.extend_from_slice(bytes);
    }
}

pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn need(&self, n: usize) -> FactResult<()> {
        if self.pos + n > self.buf.len() {
            Err(FactError::Truncated {
                needed: n,
                available: self.buf.len().saturating_sub(self.pos),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_raw(&mut self, n: usize) -> FactResult<&'a [u8]> {
        self.need(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> FactResult<u8> {
        Ok(self.read_raw(1)?[0])
    }

    pub fn read_u16(&mut self) -> FactResult<u16> {
        let b = self.read_raw(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i64(&mut self) -> FactResult<i64> {
        let b = self.read_raw(8)?;
        Ok(i64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_f64(&mut self) -> FactResult<f64> {
        let b = self.read_raw(8)?;
        Ok(f64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_string(&mut self, field: &'static str) -> FactResult<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_raw(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FactError::InvalidUtf8 { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_primitives() {
        let mut w = ByteWriter::new();
        w.write_u8(7);
        w.write_u16(1234);
        w.write_i64(-42);
        w.write_f64(3.5);
        w.write_string("héllo");
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert_eq!(r.read_u16().unwrap(), 1234);
        assert_eq!(r.read_i64().unwrap(), -42);
        assert_eq!(r.read_f64().unwrap(), 3.5);
        assert_eq!(r.read_string("x").unwrap(), "héllo");
    }

    #[test]
    fn detects_truncation() {
        let mut r = ByteReader::new(&[0u8, 1]);
        assert!(r.read_i64().is_err());
    }
}
