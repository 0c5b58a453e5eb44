//! # qrfixed
//!
//! A QR code encoder for targets whose symbol layout is fixed at build time.
//!
//! `qrfixed` encodes text or binary data into a QR Code Model 2 symbol of one pinned version and
//! error correction level, described by a [`QrConfig`](config::QrConfig). There is no automatic
//! version selection: callers check their input against
//! [`QrConfig::byte_capacity`](config::QrConfig::byte_capacity) and get a
//! [`DataTooLong`](segment::DataTooLong) error if it does not fit. Rendering the finished module
//! grid is left to the caller.
//!
//! ## Features
//!
//! - Byte mode segments, terminator and `0xEC`/`0x11` padding.
//! - Reed–Solomon error correction over GF(256) with block interleaving.
//! - Finder, timing, alignment, format and version patterns for versions 1 to 40.
//! - Automatic mask selection by penalty score, or a caller-chosen mask.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! use qrfixed::{QrCode, QrConfig};
//!
//! let config = QrConfig::DEFAULT;
//! let text = "WIFI:S:workshop;T:WPA;P:correct-horse;;";
//! assert!(text.len() <= config.byte_capacity());
//!
//! let qr = QrCode::encode_text(text, config, None).unwrap();
//! for y in 0..qr.size() {
//!     let row: String = (0..qr.size())
//!         .map(|x| if qr.get_module(x, y) { '#' } else { ' ' })
//!         .collect();
//!     assert_eq!(row.chars().count(), 37);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: The encoded symbol and the encoding entry points.
//! - [`config`]: Version, error correction level, mask and the pinned configuration.
//! - [`segment`]: Byte-mode segments and the capacity error.
//! - [`bits`]: Bit buffer used to assemble the data codewords.

#![forbid(unsafe_code)]

pub mod bits;
pub mod config;
mod matrix;
mod penalty;
pub mod qrcode;
mod reed_solomon;
pub mod segment;

pub use config::{Mask, QrCodeEcc, QrConfig, Version};
pub use qrcode::QrCode;
pub use segment::{DataTooLong, QrSegment};
