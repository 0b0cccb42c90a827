//! # 数据模型模块
//!
//! 定义结构快照、image 概要和优化步矩阵。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `analyzer/` 和 `viz/` 使用
//! - 子模块: structure, calculation, matrix, elements

pub mod calculation;
pub mod elements;
pub mod matrix;
pub mod structure;

pub use calculation::{ImageRole, ImageSummary};
pub use matrix::{resolve_index, StepMatrix};
pub use structure::{Atom, Crystal, Lattice};
