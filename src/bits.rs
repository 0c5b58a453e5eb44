/// An appendable sequence of bits (0s and 1s).
///
/// Holds the segment headers, payloads and padding of a symbol before they are packed into
/// codewords. Lengths are counted in bits throughout.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BitBuffer(Vec<bool>);

impl BitBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends the low `len` bits of `val`, most significant bit first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or if `val` has bits set at or above position `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        self.0.extend((0..len).rev().map(|i| ((val >> i) & 1) != 0));
    }

    pub(crate) fn extend_from(&mut self, other: &BitBuffer) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Packs the bits into bytes, big endian. A trailing partial byte is padded with zeros.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = vec![0u8; (self.0.len() + 7) / 8];
        for (i, &bit) in self.0.iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b101, 3);
        bb.append_bits(0, 0);
        bb.append_bits(0x4, 4);
        assert_eq!(bb.len(), 7);
        assert_eq!(bb.bits(), &[true, false, true, false, true, false, false]);
    }

    #[test]
    fn test_to_bytes_pads_last_byte() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0xEC, 8);
        bb.append_bits(0b1, 1);
        assert_eq!(bb.to_bytes(), vec![0xEC, 0x80]);
    }

    #[test]
    #[should_panic(expected = "Value out of range")]
    fn test_append_bits_rejects_wide_value() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0x10, 4);
    }
}
