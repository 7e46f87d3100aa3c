//! The encoding engine contract and its built-in implementation.
//!
//! The rest of the crate is written against [`EncodingEngine`], not a
//! specific binding: the interpreter and renderer only ever see a
//! [`SymbolResult`]. The production engine, [`Pdf417Engine`], is a
//! from-scratch implementation of the symbology living in this module's
//! submodules.

mod compaction;
mod ecc;
mod pdf417;
mod tables;

pub use pdf417::Pdf417Engine;

use crate::request::GenerationRequest;

/// Engine-side failure classification. Mirrors the error codes of classic
/// PDF417 generator libraries: a failed generation hands back a result with
/// an empty blob and one of these set, it does not panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The content exceeds the symbol capacity under the given constraints.
    TextTooBig,
    /// Conflicting or out-of-range configuration, including a raw codeword
    /// sequence whose first element does not state its own length.
    InvalidParams,
    /// Anything else the engine could not handle.
    Other,
}

/// The raw output of a generation run: a byte-aligned bitmap blob plus the
/// geometry needed to interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolResult {
    /// Symbol bitmap, each row packed MSB-first into whole bytes.
    pub blob: Vec<u8>,
    /// True symbol width in bits.
    pub bit_columns: u32,
    /// Total bit count claimed by the blob, row padding included.
    pub bit_length: u32,
    pub code_rows: u32,
    pub code_cols: u32,
    /// Resolved error correction level.
    pub error_level: u8,
    /// The data codewords: echoes raw codewords when supplied, otherwise
    /// the computed compaction.
    pub codewords: Vec<u16>,
    pub error: Option<EngineError>,
}

impl SymbolResult {
    pub(crate) fn failed(error: EngineError) -> Self {
        SymbolResult {
            blob: Vec::new(),
            bit_columns: 0,
            bit_length: 0,
            code_rows: 0,
            code_cols: 0,
            error_level: 0,
            codewords: Vec::new(),
            error: Some(error),
        }
    }
}

/// A synchronous PDF417 encoding engine.
pub trait EncodingEngine {
    /// Converts text to data codewords (length indicator included), without
    /// assembling a symbol.
    fn encode_text(&self, text: &str) -> Vec<u16>;

    /// Runs the full pipeline for a resolved request. Failures are reported
    /// through [`SymbolResult::error`], never by panicking.
    fn generate_symbol(&self, request: &GenerationRequest) -> SymbolResult;
}
