//! Symbol construction: function patterns, error correction, codeword placement and masking.
//!
//! A [`SymbolBuilder`] goes through its steps in a fixed order: function patterns, codewords,
//! mask trials, the final mask and format bits, then [`SymbolBuilder::finish`]. The function
//! module grid is complete before any codeword bit is placed and is dropped by `finish`.

use log::{debug, trace};

use crate::config::{Mask, QrConfig};
use crate::penalty;
use crate::qrcode::QrCode;
use crate::reed_solomon::ReedSolomonGenerator;

pub(crate) struct SymbolBuilder {
    config: QrConfig,
    size: i32,
    /// Current color of every module, row-major (`true` = dark).
    modules: Vec<bool>,
    /// Modules that belong to a function pattern and are never masked.
    is_function: Vec<bool>,
}

impl SymbolBuilder {
    /// An all-light symbol for `config` with no function modules marked yet.
    pub fn new(config: QrConfig) -> Self {
        let size = config.size();
        let len = (size * size) as usize;
        Self {
            config,
            size,
            modules: vec![false; len],
            is_function: vec![false; len],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        let range = 0..self.size;
        assert!(range.contains(&x) && range.contains(&y));
        (y * self.size + x) as usize
    }

    #[cfg(test)]
    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.is_function[i] = true;
    }

    pub fn draw_function_patterns(&mut self) {
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // The finders overwrite the ends of the timing patterns
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let alignpatpos = self.config.alignment_pattern_positions();
        let numalign = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                if (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0)
                {
                    continue;
                }
                self.draw_alignment_pattern(pos0, pos1);
            }
        }

        // Placeholder so the format area is reserved; redrawn once the mask is known
        self.draw_format_bits(Mask::new(0));
        self.draw_version();
    }

    /// 9x9 area centred on `(x, y)`: the 7x7 finder plus its light separator, clipped to the
    /// symbol.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist: i32 = dx.abs().max(dy.abs());
                let (xx, yy) = (x + dx, y + dy);
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Draws both copies of the format information for the configured ECC level and `mask`,
    /// plus the module that is always dark.
    pub fn draw_format_bits(&mut self, mask: Mask) {
        let bits = format_bits(self.config, mask);

        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    /// Version information blocks next to the top-right and bottom-left finders. Versions 1-6
    /// have none.
    fn draw_version(&mut self) {
        let Some(bits) = version_bits(self.config) else {
            return;
        };
        for i in 0..18 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + i % 3;
            let b: i32 = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Places the interleaved codewords along the zig-zag scan, skipping function modules.
    ///
    /// Remainder modules past the last codeword bit keep their initial light color.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(data.len(), self.config.raw_codewords(), "Illegal argument");
        let size: i32 = self.size;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = right - j;
                    let upward: bool = ((right + 1) & 2) == 0;
                    let y = if upward { size - 1 - vert } else { vert };
                    let index = self.index(x, y);
                    if !self.is_function[index] && i < data.len() * 8 {
                        self.modules[index] = get_bit(data[i >> 3].into(), 7 - (i & 7) as i32);
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        assert_eq!(i, data.len() * 8);
    }

    /// XORs `mask` over every non-function module. Applying the same mask twice restores the
    /// previous state.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let index = self.index(x, y);
                if !self.is_function[index] && mask.inverts(x, y) {
                    self.modules[index] = !self.modules[index];
                }
            }
        }
    }

    pub fn penalty_score(&self) -> i32 {
        penalty::penalty_score(self.size, &self.modules)
    }

    /// Tries all eight masks, format bits included, and returns the one with the lowest
    /// penalty. Ties go to the lower mask number. Leaves the data modules unmasked.
    pub fn select_mask(&mut self) -> Mask {
        let mut best = Mask::new(0);
        let mut minpenalty = i32::MAX;
        for i in 0u8..8 {
            let mask = Mask::new(i);
            self.apply_mask(mask);
            self.draw_format_bits(mask);
            let penalty: i32 = self.penalty_score();
            trace!("mask {} penalty {}", i, penalty);
            if penalty < minpenalty {
                best = mask;
                minpenalty = penalty;
            }
            self.apply_mask(mask); // Undoes the mask due to XOR
        }
        debug!("selected mask {} with penalty {}", best.value(), minpenalty);
        best
    }

    /// Applies `mask` for good, draws its format bits and drops the function module grid.
    pub fn finish(mut self, mask: Mask) -> QrCode {
        self.apply_mask(mask);
        self.draw_format_bits(mask);
        QrCode::from_parts(self.config, mask, self.modules)
    }
}

/// Splits `data` into the configured blocks, appends each block's ECC codewords and
/// interleaves the blocks into one codeword sequence.
pub(crate) fn add_ecc_and_interleave(data: &[u8], config: QrConfig) -> Vec<u8> {
    assert_eq!(data.len(), config.data_codewords());
    let numblocks: usize = config.num_blocks();
    let blockecclen: usize = config.ecc_codewords_per_block();
    let rawcodewords: usize = config.raw_codewords();
    let numshortblocks: usize = numblocks - rawcodewords % numblocks;
    let shortblocklen: usize = rawcodewords / numblocks;
    let shortblockdatalen: usize = shortblocklen - blockecclen;

    let rs = ReedSolomonGenerator::new(blockecclen);
    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(numblocks);
    let mut dat: &[u8] = data;
    for i in 0..numblocks {
        let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
        let (head, rest) = dat.split_at(datlen);
        let ecc = rs.compute_remainder(head);
        let mut block = head.to_vec();
        if i < numshortblocks {
            block.push(0);
        }
        block.extend_from_slice(&ecc);
        blocks.push(block);
        dat = rest;
    }
    debug_assert!(dat.is_empty());

    let mut result: Vec<u8> = Vec::with_capacity(rawcodewords);
    for i in 0..shortblocklen + 1 {
        for (j, block) in blocks.iter().enumerate() {
            // Skip the padding byte of short blocks
            if i != shortblockdatalen || j >= numshortblocks {
                result.push(block[i]);
            }
        }
    }
    assert_eq!(result.len(), rawcodewords);
    result
}

/// The 15-bit format information: ECC level and mask, BCH(15,5) protected, XORed with 0x5412.
fn format_bits(config: QrConfig, mask: Mask) -> u32 {
    let data = u32::from((config.error_correction_level().format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = ((data << 10) | rem) ^ 0x5412;
    debug_assert_eq!(bits >> 15, 0);
    bits
}

/// The 18-bit version information, BCH(18,6) protected, for versions 7 and up.
fn version_bits(config: QrConfig) -> Option<u32> {
    let ver = u32::from(config.version().value());
    if ver < 7 {
        return None;
    }
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    Some((ver << 12) | rem)
}

fn get_bit(x: u32, i: i32) -> bool {
    ((x >> i) & 1) != 0
}
