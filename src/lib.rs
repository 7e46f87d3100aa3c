//! PDF417 symbol assembly and rendering.
//!
//! The crate turns a piece of text (or a caller-supplied codeword list)
//! into a complete PDF417 symbol and renders it as a text grid, a
//! grayscale raster or PNG bytes. The [`Symbol`] facade is the main entry
//! point: configure it with setters, read any output accessor and the
//! symbol is generated on demand and cached until the next mutation.
//!
//! ```
//! use pdf417_symbol::{RenderConfig, Symbol};
//!
//! let mut symbol = Symbol::with_text("Hello, world!");
//! symbol.set_error_level(Some(3));
//!
//! // terminal-friendly rows of '1'/'0'
//! for line in symbol.to_text_grid().unwrap() {
//!     println!("{line}");
//! }
//!
//! // or a PNG, scaled 2x horizontally and 6x vertically
//! let config = RenderConfig { x_scale: 2, y_scale: 6, margin: 20 };
//! let png = symbol.to_png_bytes(&config).unwrap();
//! # assert!(!png.is_empty());
//! ```
//!
//! The pieces underneath are usable on their own: [`engine::Pdf417Engine`]
//! implements the full encoding pipeline (text compaction, Reed-Solomon
//! error correction over GF(929), row assembly and bit packing) behind the
//! [`engine::EncodingEngine`] trait, [`matrix::BitMatrix`] decodes the
//! byte-aligned blob back into modules, and [`render`] maps a matrix onto
//! the supported output formats.

pub mod engine;
mod error;
pub mod matrix;
pub mod render;
pub mod request;
mod symbol;

pub use error::Error;
pub use render::RenderConfig;
pub use symbol::Symbol;
