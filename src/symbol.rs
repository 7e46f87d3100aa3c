//! The symbol facade: configuration, lazy generation and cached access.

use image::GrayImage;
use log::debug;

use crate::engine::{EncodingEngine, EngineError, Pdf417Engine, SymbolResult};
use crate::error::Error;
use crate::matrix::BitMatrix;
use crate::render::{self, RenderConfig};
use crate::request::{GenerationRequest, SymbolConfig};

/// Cached output of the last successful generation.
#[derive(Debug)]
struct Built {
    result: SymbolResult,
    matrix: BitMatrix,
    /// Bytes per physical symbol row in the blob.
    bit_rows: u32,
}

/// One PDF417 symbol: owns its configuration, generates lazily and caches
/// the result until a setter invalidates it.
///
/// Every read accessor that needs a generated symbol triggers
/// [`generate`](Symbol::generate) at most once; repeated reads are served
/// from the cache. Every setter drops the cache, so no stale field survives
/// a mutation. A `Symbol` is not meant to be shared across threads while
/// mutated; distinct instances are fully independent.
///
/// ```
/// use pdf417_symbol::Symbol;
///
/// let mut symbol = Symbol::with_text("Hello, world!");
/// for line in symbol.to_text_grid_display().unwrap() {
///     println!("{line}");
/// }
/// ```
#[derive(Debug)]
pub struct Symbol<E: EncodingEngine = Pdf417Engine> {
    engine: E,
    config: SymbolConfig,
    built: Option<Built>,
}

impl Symbol<Pdf417Engine> {
    pub fn new() -> Self {
        Self::with_engine(Pdf417Engine)
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut symbol = Self::new();
        symbol.set_text(text);
        symbol
    }
}

impl Default for Symbol<Pdf417Engine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EncodingEngine> Symbol<E> {
    /// Creates a symbol backed by a specific encoding engine.
    pub fn with_engine(engine: E) -> Self {
        Symbol { engine, config: SymbolConfig::default(), built: None }
    }

    fn invalidate(&mut self) {
        self.built = None;
    }

    /// Sets the text to encode. Invalidates the cache.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.invalidate();
        self.config.text = text.into();
    }

    /// Sets the codewords directly, overriding the text. Invalidates the
    /// cache.
    pub fn set_raw_codewords(&mut self, raw: Option<Vec<u16>>) {
        self.invalidate();
        self.config.raw_codewords = raw;
    }

    /// Fixes the number of rows. Invalidates the cache.
    pub fn set_rows(&mut self, rows: Option<u32>) {
        self.invalidate();
        self.config.rows = rows;
    }

    /// Fixes the number of data columns. Invalidates the cache.
    pub fn set_cols(&mut self, cols: Option<u32>) {
        self.invalidate();
        self.config.cols = cols;
    }

    /// Requests an error correction level, honored when within `0..=8` and
    /// silently ignored otherwise. Invalidates the cache.
    pub fn set_error_level(&mut self, level: Option<i32>) {
        self.invalidate();
        self.config.error_level = level;
    }

    /// Sets the module height of a row. Invalidates the cache.
    pub fn set_y_height(&mut self, y_height: f32) {
        self.invalidate();
        self.config.y_height = y_height;
    }

    /// Sets the target height/width ratio for automatic sizing. Resets any
    /// fixed rows and columns so the automatic sizing takes over, and
    /// invalidates the cache.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.invalidate();
        self.config.rows = None;
        self.config.cols = None;
        self.config.aspect_ratio = aspect_ratio;
    }

    /// The configured text. Reports an empty string while raw codewords
    /// are set: the symbol's content is then authoritatively the codewords,
    /// and surfacing stale text would mislead about what was encoded.
    pub fn text(&self) -> &str {
        if self.config.raw_codewords.is_some() {
            ""
        } else {
            &self.config.text
        }
    }

    pub fn raw_codewords(&self) -> Option<&[u16]> {
        self.config.raw_codewords.as_deref()
    }

    pub fn rows(&self) -> Option<u32> {
        self.config.rows
    }

    pub fn cols(&self) -> Option<u32> {
        self.config.cols
    }

    pub fn error_level(&self) -> Option<i32> {
        self.config.error_level
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.aspect_ratio
    }

    pub fn y_height(&self) -> f32 {
        self.config.y_height
    }

    /// The symbol's data codewords: the raw codewords when supplied,
    /// otherwise the compaction of the current text (cached when a symbol
    /// has been generated).
    pub fn codewords(&self) -> Vec<u16> {
        if let Some(raw) = &self.config.raw_codewords {
            return raw.clone();
        }
        match &self.built {
            Some(built) => built.result.codewords.clone(),
            None => self.engine.encode_text(&self.config.text),
        }
    }

    /// Resolves the configuration, runs the engine and caches the
    /// interpreted result. This is the only transition into the built
    /// state; on error the cache stays empty and nothing partial is kept.
    pub fn generate(&mut self) -> Result<(), Error> {
        self.invalidate();
        let request = GenerationRequest::resolve(&self.config);
        debug!("generating symbol with options [{}]", request.applied_options());
        let result = self.engine.generate_symbol(&request);

        if let Some(error) = result.error {
            return Err(classify(error, &request));
        }
        if result.blob.is_empty() {
            return Err(Error::GenerationFailed { applied: request.applied_options() });
        }

        let matrix = BitMatrix::interpret(
            &result.blob,
            result.bit_columns,
            result.bit_length,
            result.code_rows,
        )?;

        // adopt the resolved geometry, as the engine may have chosen it
        self.config.rows = Some(result.code_rows);
        self.config.cols = Some(result.code_cols);
        self.config.error_level = Some(result.error_level as i32);

        let bit_rows = (result.bit_columns - 1) / 8 + 1;
        self.built = Some(Built { result, matrix, bit_rows });
        Ok(())
    }

    fn ensure_built(&mut self) -> Result<&Built, Error> {
        if self.built.is_none() {
            self.generate()?;
        }
        match &self.built {
            Some(built) => Ok(built),
            None => unreachable!("generate() caches a result on success"),
        }
    }

    /// True symbol width in bits.
    pub fn bit_columns(&mut self) -> Result<u32, Error> {
        Ok(self.ensure_built()?.result.bit_columns)
    }

    /// Bytes per physical symbol row in the blob.
    pub fn bit_rows(&mut self) -> Result<u32, Error> {
        Ok(self.ensure_built()?.bit_rows)
    }

    /// Total bit count of the blob, row padding included.
    pub fn bit_length(&mut self) -> Result<u32, Error> {
        Ok(self.ensure_built()?.result.bit_length)
    }

    /// The raw byte-aligned blob as produced by the engine.
    pub fn to_raw_bytes(&mut self) -> Result<&[u8], Error> {
        Ok(&self.ensure_built()?.result.blob)
    }

    /// The interpreted bit matrix.
    pub fn to_bit_matrix(&mut self) -> Result<&BitMatrix, Error> {
        Ok(&self.ensure_built()?.matrix)
    }

    /// One `'1'`/`'0'` string per symbol row.
    pub fn to_text_grid(&mut self) -> Result<Vec<String>, Error> {
        Ok(render::text_grid(&self.ensure_built()?.matrix))
    }

    /// [`to_text_grid`](Symbol::to_text_grid) with spaces for zeros.
    pub fn to_text_grid_display(&mut self) -> Result<Vec<String>, Error> {
        Ok(render::text_grid_display(&self.ensure_built()?.matrix))
    }

    /// Renders the symbol to a grayscale raster image.
    pub fn to_raster(&mut self, config: &RenderConfig) -> Result<GrayImage, Error> {
        Ok(render::raster(&self.ensure_built()?.matrix, config))
    }

    /// Renders the symbol and encodes the raster as PNG bytes.
    pub fn to_png_bytes(&mut self, config: &RenderConfig) -> Result<Vec<u8>, Error> {
        render::png_bytes(&self.ensure_built()?.matrix, config)
    }
}

fn classify(error: EngineError, request: &GenerationRequest) -> Error {
    match error {
        EngineError::TextTooBig => Error::TextTooBig,
        EngineError::InvalidParams => {
            let raw_length = request.raw_codewords.as_ref().and_then(|raw| {
                let stated = raw.first().copied().unwrap_or(0);
                (stated as usize != raw.len()).then_some((stated, raw.len()))
            });
            Error::InvalidParameters { applied: request.applied_options(), raw_length }
        }
        EngineError::Other => Error::GenerationFailed { applied: request.applied_options() },
    }
}
