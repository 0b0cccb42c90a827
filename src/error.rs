//! # 统一错误处理模块
//!
//! 定义 neb-analyzer 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::fmt;
use thiserror::Error;

/// 提取流程的阶段，用于标注构造失败发生在哪一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    ImageCount,
    InitialEnergy,
    FinalEnergy,
    Energies,
    Distances,
    Forces,
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStage::ImageCount => write!(f, "image-count discovery"),
            ExtractionStage::InitialEnergy => write!(f, "initial-image energy"),
            ExtractionStage::FinalEnergy => write!(f, "final-image energy"),
            ExtractionStage::Energies => write!(f, "intermediate-image energies"),
            ExtractionStage::Distances => write!(f, "inter-image distances"),
            ExtractionStage::Forces => write!(f, "convergence forces"),
        }
    }
}

/// neb-analyzer 统一错误类型
#[derive(Error, Debug)]
pub enum NebError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid NEB run directory: {0}")]
    InvalidRunDirectory(String),

    // ─────────────────────────────────────────────────────────────
    // 数据形状与状态错误
    // ─────────────────────────────────────────────────────────────
    #[error("Shape mismatch in {what}: column {column} has {found} steps, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
        column: usize,
    },

    #[error("Step index {step} out of range for {len} recorded steps")]
    StepOutOfRange { step: isize, len: usize },

    #[error("No values recorded: {0}")]
    EmptySeries(String),

    #[error("NEB data has not been extracted yet")]
    NotComputed,

    #[error("Extraction failed during {stage}")]
    Extraction {
        stage: ExtractionStage,
        #[source]
        source: Box<NebError>,
    },

    // ─────────────────────────────────────────────────────────────
    // 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plotting failed: {0}")]
    Plot(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl NebError {
    /// 为错误标注提取阶段
    pub fn at_stage(self, stage: ExtractionStage) -> Self {
        NebError::Extraction {
            stage,
            source: Box::new(self),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, NebError>;
