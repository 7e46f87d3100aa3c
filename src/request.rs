//! Generation options and the request resolver.
//!
//! [`resolve`](GenerationRequest::resolve) folds the freely mutable
//! configuration of a [`Symbol`](crate::Symbol) into one internally
//! consistent request for the encoding engine. It is a pure function and
//! never fails: inconsistent values are either dropped (out-of-range error
//! level) or left for the engine to reject.

use bitflags::bitflags;

bitflags! {
    /// Flags forwarded to the encoding engine alongside the field values
    /// that justify them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GenerationOptions: u32 {
        /// Encode the user-supplied codewords instead of the text.
        const USE_RAW_CODEWORDS = 1 << 0;
        /// The number of rows is fixed, columns follow from the data.
        const FIXED_ROWS = 1 << 1;
        /// The number of columns is fixed, rows follow from the data.
        const FIXED_COLUMNS = 1 << 2;
        /// Both dimensions are fixed.
        const FIXED_RECTANGLE = 1 << 3;
        /// Use the requested error correction level instead of the
        /// recommended one.
        const USE_ERROR_LEVEL = 1 << 4;
    }
}

/// The mutable configuration owned by a [`Symbol`](crate::Symbol).
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolConfig {
    pub text: String,
    pub raw_codewords: Option<Vec<u16>>,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub error_level: Option<i32>,
    pub aspect_ratio: f32,
    pub y_height: f32,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        SymbolConfig {
            text: String::new(),
            raw_codewords: None,
            rows: None,
            cols: None,
            error_level: None,
            aspect_ratio: 0.5,
            y_height: 3.0,
        }
    }
}

/// A resolved, internally consistent generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub text: String,
    pub raw_codewords: Option<Vec<u16>>,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub error_level: Option<u8>,
    pub aspect_ratio: f32,
    pub y_height: f32,
    pub options: GenerationOptions,
    /// Human-readable list of the options actually applied, kept for error
    /// messages.
    pub applied: Vec<String>,
}

impl GenerationRequest {
    /// Resolves the configuration into a request. Only one sizing flag is
    /// ever set: a full rectangle wins over fixed rows, which win over
    /// fixed columns.
    pub fn resolve(config: &SymbolConfig) -> GenerationRequest {
        let mut options = GenerationOptions::empty();
        let mut applied = Vec::new();

        let raw_codewords = match &config.raw_codewords {
            Some(raw) if !raw.is_empty() => {
                options |= GenerationOptions::USE_RAW_CODEWORDS;
                applied.push("raw codewords".to_owned());
                Some(raw.clone())
            }
            _ => None,
        };

        let rows = config.rows.filter(|&r| r > 0);
        let cols = config.cols.filter(|&c| c > 0);
        let (rows, cols) = match (rows, cols) {
            (Some(r), Some(c)) => {
                options |= GenerationOptions::FIXED_RECTANGLE;
                applied.push(format!("{r}x{c}"));
                (Some(r), Some(c))
            }
            (Some(r), None) => {
                options |= GenerationOptions::FIXED_ROWS;
                applied.push(format!("{r} rows"));
                (Some(r), None)
            }
            (None, Some(c)) => {
                options |= GenerationOptions::FIXED_COLUMNS;
                applied.push(format!("{c} cols"));
                (None, Some(c))
            }
            (None, None) => (None, None),
        };

        let error_level = match config.error_level {
            Some(level @ 0..=8) => {
                options |= GenerationOptions::USE_ERROR_LEVEL;
                applied.push(format!("requested {level} error level"));
                Some(level as u8)
            }
            _ => None,
        };

        GenerationRequest {
            text: config.text.clone(),
            raw_codewords,
            rows,
            cols,
            error_level,
            aspect_ratio: config.aspect_ratio,
            y_height: config.y_height,
            options,
            applied,
        }
    }

    /// The applied-options list joined for diagnostics.
    pub fn applied_options(&self) -> String {
        self.applied.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SymbolConfig {
        SymbolConfig::default()
    }

    #[test]
    fn test_defaults_resolve_to_no_options() {
        let req = GenerationRequest::resolve(&config());
        assert_eq!(req.options, GenerationOptions::empty());
        assert!(req.applied.is_empty());
        assert_eq!(req.aspect_ratio, 0.5);
        assert_eq!(req.y_height, 3.0);
    }

    #[test]
    fn test_fixed_rectangle_wins() {
        let mut cfg = config();
        cfg.rows = Some(10);
        cfg.cols = Some(5);
        let req = GenerationRequest::resolve(&cfg);
        assert_eq!(req.options, GenerationOptions::FIXED_RECTANGLE);
        assert_eq!((req.rows, req.cols), (Some(10), Some(5)));
        assert_eq!(req.applied, ["10x5"]);
    }

    #[test]
    fn test_fixed_rows_only() {
        let mut cfg = config();
        cfg.rows = Some(10);
        let req = GenerationRequest::resolve(&cfg);
        assert_eq!(req.options, GenerationOptions::FIXED_ROWS);
        assert_eq!((req.rows, req.cols), (Some(10), None));
        assert_eq!(req.applied, ["10 rows"]);
    }

    #[test]
    fn test_fixed_cols_only() {
        let mut cfg = config();
        cfg.cols = Some(5);
        let req = GenerationRequest::resolve(&cfg);
        assert_eq!(req.options, GenerationOptions::FIXED_COLUMNS);
        assert_eq!((req.rows, req.cols), (None, Some(5)));
    }

    #[test]
    fn test_zero_dimensions_are_unset() {
        let mut cfg = config();
        cfg.rows = Some(0);
        cfg.cols = Some(5);
        let req = GenerationRequest::resolve(&cfg);
        assert_eq!(req.options, GenerationOptions::FIXED_COLUMNS);
    }

    #[test]
    fn test_raw_codewords_forwarded_verbatim() {
        let mut cfg = config();
        cfg.text = "ignored".to_owned();
        cfg.raw_codewords = Some(vec![4, 900, 10, 900]);
        let req = GenerationRequest::resolve(&cfg);
        assert!(req.options.contains(GenerationOptions::USE_RAW_CODEWORDS));
        assert_eq!(req.raw_codewords.as_deref(), Some(&[4, 900, 10, 900][..]));
        assert_eq!(req.applied, ["raw codewords"]);
    }

    #[test]
    fn test_empty_raw_codewords_ignored() {
        let mut cfg = config();
        cfg.raw_codewords = Some(Vec::new());
        let req = GenerationRequest::resolve(&cfg);
        assert!(!req.options.contains(GenerationOptions::USE_RAW_CODEWORDS));
        assert_eq!(req.raw_codewords, None);
    }

    #[test]
    fn test_error_level_bounds_are_inclusive() {
        for (level, set) in [(-1, false), (0, true), (8, true), (9, false)] {
            let mut cfg = config();
            cfg.error_level = Some(level);
            let req = GenerationRequest::resolve(&cfg);
            assert_eq!(req.options.contains(GenerationOptions::USE_ERROR_LEVEL), set, "{level}");
            assert_eq!(req.error_level.is_some(), set);
        }
    }

    #[test]
    fn test_applied_options_join() {
        let mut cfg = config();
        cfg.rows = Some(4);
        cfg.cols = Some(3);
        cfg.error_level = Some(1);
        cfg.raw_codewords = Some(vec![1]);
        let req = GenerationRequest::resolve(&cfg);
        assert_eq!(req.applied_options(), "raw codewords, 4x3, requested 1 error level");
    }
}
