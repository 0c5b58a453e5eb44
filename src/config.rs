//! Build-time symbol configuration.
//!
//! The encoder never searches for a version that fits the data. A [`QrConfig`] pins one version
//! and one error correction level, and everything else (symbol size, block layout, data capacity)
//! follows from that pair through the standard tables below.

use crate::segment::QrSegmentMode;

/// The pinned version and error correction level of every symbol an encode call produces.
///
/// # Example
///
/// ```rust
/// use qrfixed::config::{QrCodeEcc, QrConfig, Version};
///
/// let config = QrConfig::new(Version::new(2), QrCodeEcc::Medium);
/// assert_eq!(config.size(), 25);
/// assert_eq!(config.data_codewords(), 28);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QrConfig {
    version: Version,
    ecl: QrCodeEcc,
}

impl QrConfig {
    /// Version 5 at Low error correction: a 37x37 symbol holding up to 106 bytes, enough for a
    /// typical provisioning URI.
    pub const DEFAULT: QrConfig = QrConfig::new(Version::new(5), QrCodeEcc::Low);

    pub const fn new(version: Version, ecl: QrCodeEcc) -> Self {
        Self { version, ecl }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Width and height of the symbol in modules, `version * 4 + 17`.
    pub fn size(&self) -> i32 {
        i32::from(self.version.value()) * 4 + 17
    }

    pub fn ecc_codewords_per_block(&self) -> usize {
        table_get(&ECC_CODEWORDS_PER_BLOCK, self.version, self.ecl)
    }

    pub fn num_blocks(&self) -> usize {
        table_get(&NUM_ERROR_CORRECTION_BLOCKS, self.version, self.ecl)
    }

    /// Number of 8-bit codewords (data and ECC) the symbol can hold. Remainder bits are excluded.
    pub fn raw_codewords(&self) -> usize {
        self.raw_data_modules() / 8
    }

    /// Number of modules left for data and ECC bits once every function pattern is drawn,
    /// remainder bits included.
    pub(crate) fn raw_data_modules(&self) -> usize {
        num_raw_data_modules(self.version)
    }

    /// Number of data codewords, i.e. the capacity in bytes before error correction.
    pub fn data_codewords(&self) -> usize {
        self.raw_codewords() - self.ecc_codewords_per_block() * self.num_blocks()
    }

    pub fn data_capacity_bits(&self) -> usize {
        self.data_codewords() * 8
    }

    /// The longest byte-mode payload that fits this configuration.
    ///
    /// Callers should check their input against this before encoding.
    pub fn byte_capacity(&self) -> usize {
        let ccbits = QrSegmentMode::Byte.num_char_count_bits(self.version);
        let payloadbits = self.data_capacity_bits().saturating_sub(4 + usize::from(ccbits));
        (payloadbits / 8).min((1usize << ccbits) - 1)
    }

    /// Centre coordinates of the alignment patterns, in ascending order. The same list applies
    /// to both axes. Empty for version 1.
    pub(crate) fn alignment_pattern_positions(&self) -> Vec<i32> {
        let ver = i32::from(self.version.value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign: i32 = ver / 7 + 2;
        let step: i32 = if ver == 32 {
            26
        } else {
            ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size() - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    debug_assert!((208..=29648).contains(&result));
    result
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value written into the format information.
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this mask flips the module at `(x, y)`.
    pub fn inverts(self, x: i32, y: i32) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => ((x * y) % 2) + ((x * y) % 3) == 0,
            6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
            7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
            _ => unreachable!(),
        }
    }
}
