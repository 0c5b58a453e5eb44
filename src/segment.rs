use crate::bits::BitBuffer;
use crate::config::Version;

/// A segment of data in a QR code.
///
/// Only byte mode is produced. A segment is built once per chunk of input and consumed when the
/// segments are concatenated into the symbol's data bit string.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: BitBuffer,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode, 8 bits per byte, most significant bit
    /// first.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment::new(QrSegmentMode::Byte, data.len(), bb)
    }

    /// Splits text into segments for encoding.
    ///
    /// Always returns a single byte-mode segment over the whole UTF-8 representation of `text`,
    /// including when `text` is empty. No numeric or alphanumeric segments are chosen.
    pub fn make_segments(text: &str) -> Vec<Self> {
        vec![QrSegment::make_bytes(text.as_bytes())]
    }

    pub fn new(mode: QrSegmentMode, numchars: usize, data: BitBuffer) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    /// Number of bits needed to encode `segs` at the given version: a 4-bit mode header, the
    /// character count field and the payload of every segment.
    ///
    /// Returns `None` if a character count does not fit its field, or if the total would
    /// overflow an `i32`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let limit = i32::MAX as usize;
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits)).filter(|&n| n <= limit)?;
            result = result.checked_add(seg.data.len()).filter(|&n| n <= limit)?;
        }
        Some(result)
    }
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Byte,
}

impl QrSegmentMode {
    pub(crate) fn mode_bits(self) -> u32 {
        match self {
            QrSegmentMode::Byte => 0x4,
        }
    }

    /// Width of the character count field for this mode at the given version.
    pub(crate) fn num_char_count_bits(self, ver: Version) -> u8 {
        (match self {
            QrSegmentMode::Byte => [8, 16, 16],
        })[usize::from((ver.value() + 7) / 17)]
    }
}

/// Error type for when data exceeds the configured symbol's capacity.
///
/// The configuration is fixed, so the remedies are on the caller's side: shorten the data, or
/// build with a larger version or lower error correction level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTooLong {
    /// A segment's character count does not fit its count field, or the total bit length
    /// overflows.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_bytes() {
        let seg = QrSegment::make_bytes(b"Hi");
        assert_eq!(seg.mode(), QrSegmentMode::Byte);
        assert_eq!(seg.num_chars(), 2);
        assert_eq!(seg.data().to_bytes(), b"Hi".to_vec());
        assert_eq!(seg.data().len(), 16);
    }

    #[test]
    fn test_make_segments_is_byte_only() {
        let segs = QrSegment::make_segments("12345");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].mode(), QrSegmentMode::Byte);
        assert_eq!(segs[0].num_chars(), 5);

        let segs = QrSegment::make_segments("");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].num_chars(), 0);
    }

    #[test]
    fn test_get_total_bits() {
        let segs = QrSegment::make_segments("abc");
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(5)), Some(4 + 8 + 24));
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(10)), Some(4 + 16 + 24));
        assert_eq!(QrSegment::get_total_bits(&[], Version::new(5)), Some(0));
    }

    #[test]
    fn test_get_total_bits_count_field_overflow() {
        let data = vec![b'x'; 256];
        let segs = [QrSegment::make_bytes(&data)];
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(9)), None);
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(10)), Some(4 + 16 + 2048));
    }

    #[test]
    fn test_data_too_long_display() {
        let err = DataTooLong::DataOverCapacity(868, 864);
        assert_eq!(err.to_string(), "Data length = 868 bits, Max capacity = 864 bits");
        assert_eq!(DataTooLong::SegmentTooLong.to_string(), "Segment too long");
    }
}
