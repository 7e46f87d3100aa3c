//! The unified error type for symbol generation and rendering.

use thiserror::Error;

/// Classified generation and rendering failures.
///
/// Everything is detected at the point of generation and raised
/// immediately; no partial symbol is ever cached or returned.
#[derive(Error, Debug)]
pub enum Error {
    /// The content exceeds the symbol capacity under the current size and
    /// error level constraints.
    #[error("Text is too big")]
    TextTooBig,

    /// Conflicting or out-of-range configuration. `raw_length` carries the
    /// stated and actual lengths when the raw codeword sequence did not
    /// start with its own length.
    #[error("Invalid parameters: {applied}{}", raw_length_hint(.raw_length))]
    InvalidParameters {
        applied: String,
        raw_length: Option<(u16, usize)>,
    },

    /// The engine returned an empty or otherwise failed result.
    #[error("Could not generate symbol: {applied}")]
    GenerationFailed { applied: String },

    /// The engine's blob is shorter than its declared geometry implies.
    /// This is a defect in the engine's output, not a user error.
    #[error("Malformed symbol: blob holds {got} bytes but the geometry requires {need}")]
    MalformedSymbol { need: usize, got: usize },

    /// Raster serialization failure. Fatal, there is no fallback rendering
    /// path.
    #[error("Raster encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

fn raw_length_hint(raw_length: &Option<(u16, usize)>) -> String {
    match raw_length {
        Some((stated, actual)) => format!(
            ". The first element of the raw codewords must be the length of the sequence: \
             it is {stated}, perhaps it should be {actual}?"
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_text_too_big_message() {
        assert_eq!(Error::TextTooBig.to_string(), "Text is too big");
    }

    #[test]
    fn test_invalid_parameters_lists_applied_options() {
        let err = Error::InvalidParameters {
            applied: "raw codewords, 4x3".to_owned(),
            raw_length: None,
        };
        assert_eq!(err.to_string(), "Invalid parameters: raw codewords, 4x3");
    }

    #[test]
    fn test_raw_length_mismatch_names_both_lengths() {
        let err = Error::InvalidParameters {
            applied: "raw codewords".to_owned(),
            raw_length: Some((3, 4)),
        };
        let message = err.to_string();
        assert!(message.contains("it is 3"), "{message}");
        assert!(message.contains("should be 4"), "{message}");
    }
}
