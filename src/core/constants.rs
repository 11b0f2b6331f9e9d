//! Constants used throughout the layout pipeline.

/// Scale applied to normalized coordinates before clustering.
///
/// Thresholds such as [`DEFAULT_FONT_METRIC`] are expressed in this scale.
pub const WORKING_SCALE: f32 = 1000.0;

/// Font metric used when an orientation has no lines to take a median from.
pub const DEFAULT_FONT_METRIC: f32 = 20.0;

/// Confidence assumed for a recognized word that carries none.
pub const DEFAULT_WORD_CONFIDENCE: f32 = 0.95;

/// Separator placed between merged line texts: U+200D ZERO WIDTH JOINER.
pub const ZERO_WIDTH_JOINER: &str = "\u{200D}";

/// Pages taller than this are sliced before recognition.
pub const DEFAULT_MAX_UNSLICED_HEIGHT: u32 = 1500;

/// Height of one recognition band.
pub const DEFAULT_BAND_HEIGHT: u32 = 1500;

/// Pixel height bound for one clustering chunk.
pub const DEFAULT_CLUSTERING_CHUNK_HEIGHT: u32 = 3000;

/// Default bound on a single page recognition.
pub const DEFAULT_RECOGNITION_TIMEOUT_MS: u64 = 45_000;

/// Clustering chunks are merged in parallel only above this count.
pub const DEFAULT_PARALLEL_CHUNK_THRESHOLD: usize = 2;
