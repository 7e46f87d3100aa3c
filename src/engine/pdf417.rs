//! The built-in PDF417 encoding engine.

use log::debug;

use super::compaction::{Compactor, CW_PADDING};
use super::{ecc, tables, EncodingEngine, EngineError, SymbolResult};
use crate::request::{GenerationOptions, GenerationRequest};

/// Minimum number of rows in a PDF417 symbol.
pub const MIN_ROWS: u32 = 3;
/// Maximum number of rows in a PDF417 symbol.
pub const MAX_ROWS: u32 = 90;
/// Minimum number of data columns in a PDF417 symbol.
pub const MIN_COLS: u32 = 1;
/// Maximum number of data columns in a PDF417 symbol.
pub const MAX_COLS: u32 = 30;
/// Maximum number of codewords in a symbol, data and error correction.
pub const MAX_CODEWORDS: u32 = 928;

/// From-scratch implementation of the [`EncodingEngine`] contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pdf417Engine;

impl EncodingEngine for Pdf417Engine {
    fn encode_text(&self, text: &str) -> Vec<u16> {
        let mut compactor = Compactor::new();
        if text.is_ascii() {
            compactor.append_ascii(text);
        } else {
            compactor.append_utf8(text);
        }
        compactor.finish()
    }

    fn generate_symbol(&self, request: &GenerationRequest) -> SymbolResult {
        let data = if request.options.contains(GenerationOptions::USE_RAW_CODEWORDS) {
            let Some(raw) = request.raw_codewords.as_deref() else {
                return SymbolResult::failed(EngineError::InvalidParams);
            };
            // the first element must state the sequence length
            if raw.first().copied().map(usize::from) != Some(raw.len())
                || raw.iter().any(|&cw| cw >= 929)
            {
                return SymbolResult::failed(EngineError::InvalidParams);
            }
            raw.to_vec()
        } else {
            self.encode_text(&request.text)
        };

        let level = request.error_level.unwrap_or_else(|| recommended_level(data.len()));
        let ecc_len = ecc::ecc_count(level);
        let total = data.len() as u32 + ecc_len as u32;

        let (rows, cols) = match resolve_dimensions(request, total) {
            Ok(dimensions) => dimensions,
            Err(error) => return SymbolResult::failed(error),
        };
        debug!(
            "assembling {rows}x{cols} symbol at level {level} ({} data + {ecc_len} ecc codewords)",
            data.len()
        );

        let cells = (rows * cols) as usize;
        let mut storage = vec![CW_PADDING; cells];
        storage[..data.len()].copy_from_slice(&data);
        // the length indicator spans padding too
        storage[0] = (cells - ecc_len) as u16;
        ecc::generate_ecc(&mut storage, level);

        let bit_columns = 17 * (cols + 3) + 18;
        let bytes_per_row = ((bit_columns - 1) / 8 + 1) as usize;
        let mut blob = vec![0u8; bytes_per_row * rows as usize];

        let rows_val = (rows - 1) / 3;
        let cols_val = cols - 1;
        let level_val = level as u32 * 3 + (rows - 1) % 3;

        for row in 0..rows as usize {
            let cluster = row % 3;
            let row_id = row as u32 / 3 * 30;
            let (left, right) = match cluster {
                0 => (rows_val, cols_val),
                1 => (level_val, rows_val),
                2 => (cols_val, level_val),
                _ => unreachable!(),
            };

            let mut out = BitPacker::new(&mut blob[row * bytes_per_row..(row + 1) * bytes_per_row]);
            out.put(tables::START_PAT, tables::START_PAT_LEN);
            out.put(tables::pattern(cluster, (row_id + left) as u16), 17);
            for &codeword in &storage[row * cols as usize..(row + 1) * cols as usize] {
                out.put(tables::pattern(cluster, codeword), 17);
            }
            out.put(tables::pattern(cluster, (row_id + right) as u16), 17);
            out.put(tables::STOP_PAT, tables::STOP_PAT_LEN);
        }

        SymbolResult {
            blob,
            bit_columns,
            bit_length: (bytes_per_row * 8) as u32 * rows,
            code_rows: rows,
            code_cols: cols,
            error_level: level,
            codewords: data,
            error: None,
        }
    }
}

/// Recommended minimum error correction level for the data codeword count.
fn recommended_level(data_len: usize) -> u8 {
    match data_len {
        0..=40 => 2,
        41..=160 => 3,
        161..=320 => 4,
        _ => 5,
    }
}

/// Smallest legal row count for `cols` columns, if the symbol fits.
fn fit_rows(total: u32, cols: u32) -> Option<u32> {
    let rows = total.div_ceil(cols).max(MIN_ROWS);
    (rows <= MAX_ROWS && rows * cols <= MAX_CODEWORDS).then_some(rows)
}

/// Picks the symbol dimensions for `total` codewords according to the sizing
/// flags of the request.
fn resolve_dimensions(request: &GenerationRequest, total: u32) -> Result<(u32, u32), EngineError> {
    if total > MAX_CODEWORDS {
        return Err(EngineError::TextTooBig);
    }
    let options = request.options;

    if options.contains(GenerationOptions::FIXED_RECTANGLE) {
        let (rows, cols) = match (request.rows, request.cols) {
            (Some(rows), Some(cols)) => (rows, cols),
            _ => return Err(EngineError::InvalidParams),
        };
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows)
            || !(MIN_COLS..=MAX_COLS).contains(&cols)
            || rows * cols > MAX_CODEWORDS
        {
            return Err(EngineError::InvalidParams);
        }
        if rows * cols < total {
            return Err(EngineError::TextTooBig);
        }
        return Ok((rows, cols));
    }

    if options.contains(GenerationOptions::FIXED_ROWS) {
        let rows = request.rows.ok_or(EngineError::InvalidParams)?;
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(EngineError::InvalidParams);
        }
        let cols = total.div_ceil(rows).max(MIN_COLS);
        if cols > MAX_COLS || rows * cols > MAX_CODEWORDS {
            return Err(EngineError::TextTooBig);
        }
        return Ok((rows, cols));
    }

    if options.contains(GenerationOptions::FIXED_COLUMNS) {
        let cols = request.cols.ok_or(EngineError::InvalidParams)?;
        if !(MIN_COLS..=MAX_COLS).contains(&cols) {
            return Err(EngineError::InvalidParams);
        }
        return fit_rows(total, cols).ok_or(EngineError::TextTooBig).map(|rows| (rows, cols));
    }

    // Automatic sizing: target aspect_ratio = height / width with rows of
    // y_height modules and a row width of 17 * cols + 69 modules. Solving
    // rows * cols = total for that target gives the ideal column count
    //   17*ar*c^2 + 69*ar*c - total*yh = 0.
    let ar = request.aspect_ratio as f64;
    let yh = request.y_height as f64;
    if !(ar > 0.0) || !(yh > 0.0) {
        return Err(EngineError::InvalidParams);
    }
    let ideal = (-69.0 * ar + (4761.0 * ar * ar + 68.0 * ar * yh * total as f64).sqrt())
        / (34.0 * ar);

    let mut best: Option<(u32, u32)> = None;
    let mut best_distance = f64::INFINITY;
    for cols in MIN_COLS..=MAX_COLS {
        let Some(rows) = fit_rows(total, cols) else { continue };
        let distance = (cols as f64 - ideal).abs();
        if distance < best_distance {
            best = Some((rows, cols));
            best_distance = distance;
        }
    }
    best.ok_or(EngineError::TextTooBig)
}

/// Packs bits MSB-first into a byte slice.
struct BitPacker<'a> {
    out: &'a mut [u8],
    bit: usize,
}

impl<'a> BitPacker<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        BitPacker { out, bit: 0 }
    }

    fn put(&mut self, bits: u32, count: u32) {
        for i in (0..count).rev() {
            if bits >> i & 1 == 1 {
                self.out[self.bit / 8] |= 0x80 >> (self.bit % 8);
            }
            self.bit += 1;
        }
    }
}
