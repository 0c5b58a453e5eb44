//! QR code encoding functionality.
//!
//! This module turns text or bytes into a finished symbol for one pinned [`QrConfig`]: byte-mode
//! segments, terminator and pad codewords, Reed–Solomon ECC, codeword placement and masking.

use log::debug;

use crate::bits::BitBuffer;
use crate::config::{Mask, QrCodeEcc, QrConfig, Version};
use crate::matrix::{add_ecc_and_interleave, SymbolBuilder};
use crate::segment::{DataTooLong, QrSegment};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Instances are immutable after creation and own only the final module grid; the bookkeeping
/// used while drawing is gone by the time an encode call returns.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Use [`QrCode::encode_segments`].
/// - Low-level: Use [`QrCode::encode_codewords`] with already padded data codewords.
///
/// # Example
///
/// ```rust
/// use qrfixed::config::QrConfig;
/// use qrfixed::qrcode::QrCode;
///
/// let qr = QrCode::encode_text("WIFI:S:lab;T:WPA;P:hunter22;;", QrConfig::DEFAULT, None).unwrap();
///
/// assert_eq!(qr.size(), 37);
/// assert!(qr.mask().value() <= 7);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    config: QrConfig,

    /// The mask that was applied, in the range [0, 7].
    mask: Mask,

    /// The modules of this QR Code (`true` = dark), row-major. Accessed through `get_module()`.
    modules: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string into a QR code of the configured version.
    ///
    /// The text is always encoded as a single byte-mode segment of its UTF-8 bytes. The `mask`
    /// can be `None` for automatic selection (slower) or a value from 0 to 7.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the text does not fit `config`. See
    /// [`QrConfig::byte_capacity`] to check the length up front.
    pub fn encode_text(
        text: &str,
        config: QrConfig,
        mask: Option<Mask>,
    ) -> Result<Self, DataTooLong> {
        let segs = QrSegment::make_segments(text);
        QrCode::encode_segments(&segs, config, mask)
    }

    /// Encodes binary data into a QR code as one byte-mode segment.
    pub fn encode_binary(
        data: &[u8],
        config: QrConfig,
        mask: Option<Mask>,
    ) -> Result<Self, DataTooLong> {
        let seg = QrSegment::make_bytes(data);
        QrCode::encode_segments(&[seg], config, mask)
    }

    /// Encodes the given segments, in order, into a QR code.
    pub fn encode_segments(
        segs: &[QrSegment],
        config: QrConfig,
        mask: Option<Mask>,
    ) -> Result<Self, DataTooLong> {
        let datacodewords = QrCode::encode_segments_to_codewords(segs, config)?;
        Ok(QrCode::encode_codewords(&datacodewords, config, mask))
    }

    /// Concatenates the segments into the data codewords of `config`: segment headers and
    /// payloads, a terminator of up to four zero bits, zero bits up to a byte boundary, then
    /// alternating `0xEC`/`0x11` pad bytes up to the data capacity.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong::SegmentTooLong`] if a segment's length cannot be represented and
    /// [`DataTooLong::DataOverCapacity`] if the segments do not fit.
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        config: QrConfig,
    ) -> Result<Vec<u8>, DataTooLong> {
        let version: Version = config.version();
        let datacapacitybits: usize = config.data_capacity_bits();
        let datausedbits: usize =
            QrSegment::get_total_bits(segs, version).ok_or(DataTooLong::SegmentTooLong)?;
        if datausedbits > datacapacitybits {
            return Err(DataTooLong::DataOverCapacity(datausedbits, datacapacitybits));
        }

        let mut bb = BitBuffer::new();
        for seg in segs {
            let numchars = u32::try_from(seg.num_chars()).map_err(|_| DataTooLong::SegmentTooLong)?;
            bb.append_bits(seg.mode().mode_bits(), 4);
            bb.append_bits(numchars, seg.mode().num_char_count_bits(version));
            bb.extend_from(seg.data());
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let numzerobits: usize = (datacapacitybits - bb.len()).min(4);
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        debug_assert_eq!(bb.len(), datacapacitybits);

        let datacodewords = bb.to_bytes();
        debug!("data codewords ({} bits used): {:02x?}", datausedbits, datacodewords);
        Ok(datacodewords)
    }

    /// Creates a QR Code from data codewords that already fill the configured data capacity.
    ///
    /// This is a low-level API that most users should not use directly.
    ///
    /// # Panics
    ///
    /// Panics if `datacodewords.len()` differs from [`QrConfig::data_codewords`].
    pub fn encode_codewords(datacodewords: &[u8], config: QrConfig, mask: Option<Mask>) -> Self {
        assert_eq!(datacodewords.len(), config.data_codewords(), "Invalid data codeword length");
        let mut builder = SymbolBuilder::new(config);
        builder.draw_function_patterns();
        let allcodewords = add_ecc_and_interleave(datacodewords, config);
        builder.draw_codewords(&allcodewords);

        let mask: Mask = match mask {
            Some(mask) => mask,
            None => builder.select_mask(),
        };
        builder.finish(mask)
    }

    pub(crate) fn from_parts(config: QrConfig, mask: Mask, modules: Vec<bool>) -> Self {
        assert_eq!(modules.len(), (config.size() * config.size()) as usize);
        Self { config, mask, modules }
    }

    /// Returns the configuration this QR Code was built with.
    pub fn config(&self) -> QrConfig {
        self.config
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.config.version()
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.config.size()
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.config.error_correction_level()
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size() + x) as usize]
    }

    #[cfg(test)]
    pub(crate) fn penalty_score(&self) -> i32 {
        crate::penalty::penalty_score(self.size(), &self.modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_low() -> QrConfig {
        QrConfig::new(Version::new(1), QrCodeEcc::Low)
    }

    fn data_codewords(text: &str, config: QrConfig) -> Vec<u8> {
        QrCode::encode_segments_to_codewords(&QrSegment::make_segments(text), config).unwrap()
    }

    #[test]
    fn test_data_codewords_for_short_text() {
        let codewords = data_codewords("abc", v1_low());
        assert_eq!(codewords.len(), 19);
        assert_eq!(&codewords[..5], &[0x40, 0x36, 0x16, 0x26, 0x30]);
        // 14 pad bytes, starting with 0xEC, so the last one is 0x11.
        let padding: Vec<u8> = [0xec, 0x11].iter().copied().cycle().take(14).collect();
        assert_eq!(&codewords[5..], &padding[..]);
        assert_eq!(codewords[18], 0x11);
    }

    #[test]
    fn test_empty_text() {
        let codewords = data_codewords("", v1_low());
        // Byte mode header with a zero count, the terminator, then padding.
        assert_eq!(&codewords[..3], &[0x40, 0x00, 0xec]);

        let qr = QrCode::encode_text("", QrConfig::DEFAULT, None).unwrap();
        assert_eq!(qr.size(), 37);
    }

    #[test]
    fn test_text_at_capacity() {
        let config = QrConfig::DEFAULT;
        let text = "x".repeat(config.byte_capacity());
        assert!(QrCode::encode_text(&text, config, None).is_ok());

        let text = "x".repeat(config.byte_capacity() + 1);
        assert_eq!(
            QrCode::encode_text(&text, config, None),
            Err(DataTooLong::DataOverCapacity(12 + 107 * 8, 864))
        );
    }

    #[test]
    fn test_terminator_clipped_at_capacity() {
        // 17 bytes leave exactly 4 bits in a version 1-L symbol; 18 bytes do not fit.
        let codewords = data_codewords(&"A".repeat(17), v1_low());
        assert_eq!(codewords.len(), 19);
        assert_eq!(codewords[18] & 0x0f, 0);
        assert_eq!(
            QrCode::encode_text(&"A".repeat(18), v1_low(), None),
            Err(DataTooLong::DataOverCapacity(156, 152))
        );
    }

    #[test]
    fn test_segment_too_long() {
        let data = vec![0u8; 256];
        let config = QrConfig::new(Version::new(9), QrCodeEcc::Low);
        assert_eq!(QrCode::encode_binary(&data, config, None), Err(DataTooLong::SegmentTooLong));
    }

    #[test]
    fn test_deterministic() {
        let text = "https://example.com/provision?id=42";
        let a = QrCode::encode_text(text, QrConfig::DEFAULT, None).unwrap();
        let b = QrCode::encode_text(text, QrConfig::DEFAULT, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_explicit_mask_is_kept() {
        for i in 0u8..8 {
            let qr = QrCode::encode_text("hello", QrConfig::DEFAULT, Some(Mask::new(i))).unwrap();
            assert_eq!(qr.mask(), Mask::new(i));
        }
    }

    #[test]
    fn test_auto_mask_has_lowest_penalty() {
        for text in ["", "hello", "WIFI:S:lab;T:WPA;P:hunter22;;"] {
            let auto = QrCode::encode_text(text, QrConfig::DEFAULT, None).unwrap();
            let penalties: Vec<i32> = (0u8..8)
                .map(|i| {
                    QrCode::encode_text(text, QrConfig::DEFAULT, Some(Mask::new(i)))
                        .unwrap()
                        .penalty_score()
                })
                .collect();
            let min = *penalties.iter().min().unwrap();
            let first = penalties.iter().position(|&p| p == min).unwrap();
            assert_eq!(auto.penalty_score(), min);
            assert_eq!(usize::from(auto.mask().value()), first);
            let explicit =
                QrCode::encode_text(text, QrConfig::DEFAULT, Some(Mask::new(first as u8))).unwrap();
            assert_eq!(auto, explicit);
        }
    }

    #[test]
    fn test_always_dark_module() {
        for text in ["", "a", "another input", "0123456789"] {
            let qr = QrCode::encode_text(text, QrConfig::DEFAULT, Some(Mask::new(0))).unwrap();
            assert!(qr.get_module(8, qr.size() - 8));
        }
    }

    #[test]
    fn test_format_bits_readable_from_modules() {
        let config = QrConfig::new(Version::new(3), QrCodeEcc::High);
        let qr = QrCode::encode_text("format", config, Some(Mask::new(5))).unwrap();
        // Bits 14..10 of the format information sit at (0..=4, 8) after unmasking with 0x5412.
        let read = |x: i32| u8::from(qr.get_module(x, 8));
        let field = (read(0) << 4) | (read(1) << 3) | (read(2) << 2) | (read(3) << 1) | read(4);
        assert_eq!(field ^ 0b10101, (2 << 3) | 5);
    }

    #[test]
    fn test_get_module_out_of_bounds() {
        let qr = QrCode::encode_text("bounds", QrConfig::DEFAULT, None).unwrap();
        assert!(qr.get_module(0, 0));
        assert!(!qr.get_module(-1, 0));
        assert!(!qr.get_module(0, -1));
        assert!(!qr.get_module(qr.size(), 0));
        assert!(!qr.get_module(0, qr.size()));
        assert!(!qr.get_module(i32::MIN, i32::MAX));
    }

    #[test]
    fn test_accessors_follow_config() {
        let config = QrConfig::new(Version::new(7), QrCodeEcc::Quartile);
        let qr = QrCode::encode_binary(&[0xde, 0xad, 0xbe, 0xef], config, None).unwrap();
        assert_eq!(qr.config(), config);
        assert_eq!(qr.version(), Version::new(7));
        assert_eq!(qr.size(), 45);
        assert_eq!(qr.error_correction_level(), QrCodeEcc::Quartile);
    }

    #[test]
    #[should_panic(expected = "Invalid data codeword length")]
    fn test_encode_codewords_rejects_short_data() {
        let _ = QrCode::encode_codewords(&[0x40], QrConfig::DEFAULT, None);
    }
}
