//! Interpretation of the engine's packed blob into a logical bit matrix.

use crate::error::Error;

/// The logical `code_rows x bit_columns` module grid of a symbol.
///
/// The engine's blob stores each symbol row byte-aligned; the matrix is the
/// logical rectangle with that transport padding stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Recovers the logical rectangle from a byte-aligned `blob`.
    ///
    /// Each physical row spans `ceil(bit_columns / 8)` bytes; only the first
    /// `code_rows` rows are kept (the engine may over-allocate trailing
    /// rows) and each row is cut to exactly `bit_columns` bits, dropping the
    /// byte-boundary padding. A blob too short for the declared geometry is
    /// a [`Error::MalformedSymbol`], never silently truncated further.
    pub fn interpret(
        blob: &[u8],
        bit_columns: u32,
        bit_length: u32,
        code_rows: u32,
    ) -> Result<BitMatrix, Error> {
        let width = bit_columns as usize;
        let bytes_per_row = (width + 7) / 8;
        let need = bytes_per_row * code_rows as usize;
        if blob.is_empty() || blob.len() < need || blob.len() * 8 < bit_length as usize {
            return Err(Error::MalformedSymbol { need, got: blob.len() });
        }

        let mut bits = Vec::with_capacity(width * code_rows as usize);
        for chunk in blob.chunks(bytes_per_row).take(code_rows as usize) {
            bits.extend(
                chunk
                    .iter()
                    .flat_map(|&byte| (0..8).rev().map(move |i| byte >> i & 1 == 1))
                    .take(width),
            );
        }

        Ok(BitMatrix { width, bits })
    }

    /// Builds a matrix from row-major booleans. `bits` must hold a whole
    /// number of rows of `width` cells.
    pub fn from_bits(width: usize, bits: Vec<bool>) -> BitMatrix {
        assert!(width > 0 && bits.len() % width == 0);
        BitMatrix { width, bits }
    }

    /// Width in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in modules.
    pub fn height(&self) -> usize {
        self.bits.len() / self.width
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.bits[row * self.width + col]
    }

    /// Iterator over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bits.chunks(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_interpret_truncates_row_padding() {
        // 10 significant bits per row, padded to 2 bytes
        let blob = [0b1011_0011, 0b1100_0000, 0b0000_0001, 0b0111_1111];
        let matrix = BitMatrix::interpret(&blob, 10, 32, 2).unwrap();
        assert_eq!((matrix.width(), matrix.height()), (10, 2));
        let rows: Vec<&[bool]> = matrix.rows().collect();
        assert_eq!(
            rows[0],
            [true, false, true, true, false, false, true, true, true, true]
        );
        assert_eq!(
            rows[1],
            [false, false, false, false, false, false, false, true, false, true]
        );
    }

    #[test]
    fn test_interpret_discards_extra_rows() {
        let blob = [0xFF; 6]; // three physical rows of two bytes
        let matrix = BitMatrix::interpret(&blob, 16, 32, 2).unwrap();
        assert_eq!(matrix.height(), 2);
        assert!(matrix.rows().all(|row| row.iter().all(|&b| b)));
    }

    #[test]
    fn test_interpret_exact_byte_width() {
        let blob = [0b1010_1010, 0b0101_0101];
        let matrix = BitMatrix::interpret(&blob, 8, 16, 2).unwrap();
        assert_eq!((matrix.width(), matrix.height()), (8, 2));
        assert!(matrix.get(0, 0));
        assert!(!matrix.get(1, 0));
    }

    #[test]
    fn test_interpret_empty_blob() {
        let err = BitMatrix::interpret(&[], 10, 0, 0).unwrap_err();
        assert!(matches!(err, Error::MalformedSymbol { .. }));
    }

    #[test]
    fn test_interpret_short_blob() {
        let blob = [0u8; 3];
        let err = BitMatrix::interpret(&blob, 10, 64, 2).unwrap_err();
        assert!(matches!(err, Error::MalformedSymbol { need: 4, got: 3 }));
    }
}
