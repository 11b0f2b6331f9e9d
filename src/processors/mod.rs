//! Layout processors: geometry, font statistics, clustering and block merging.

pub mod cluster;
pub mod geometry;
pub mod merge;
pub mod statistics;
pub mod union_find;

pub use cluster::{ClusterEngine, PairDecision};
pub use geometry::{BoundingBox, Point};
pub use merge::{BlockMerger, vote_orientation};
pub use statistics::{FontStatistics, RobustStatistics, median};
pub use union_find::UnionFind;
