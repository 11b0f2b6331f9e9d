//! Page-level orchestration: tiling, recognition, layout merging and the memoized service.

pub mod chunking;
pub mod layout;
pub mod ocr;
pub mod recognizer;
pub mod service;
pub mod stats;

pub use chunking::{Chunk, ChunkPlanner, ClusteringChunk};
pub use layout::{LayoutMerger, normalize_lines};
pub use ocr::{RecognitionPipeline, RecognitionPipelineBuilder};
pub use recognizer::{Recognizer, SharedRecognizer};
pub use service::RecognitionService;
pub use stats::{ServiceStats, StatsSnapshot};
