//! # neb-analyzer - NEB 计算后处理库
//!
//! 读取 VASP (VTST) NEB 计算目录，提取每个 image 随优化步变化的能量、
//! 相邻 image 距离与最大受力，在此基础上给出能量曲线、最小受力步、
//! 路径结构以及绘图和 3D 交互视图。
//!
//! ## 使用
//! ```no_run
//! use neb_analyzer::{Reference, VaspAnalyzer};
//!
//! let analyzer = VaspAnalyzer::open("path/to/neb")?;
//! let profile = analyzer.get_e(-1, Reference::Min)?;
//! println!("{:?}", profile.energies);
//! # Ok::<(), neb_analyzer::NebError>(())
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── analyzer/   (NebReader 接口、通用后处理、VASP 实现)
//!   │     ├── parsers/   (OUTCAR / POSCAR / 轨迹解析)
//!   │     └── models/    (结构、步矩阵、image 概要)
//!   ├── viz/        (能量曲线、3D 视图、居中)
//!   ├── units.rs    (eV ↔ kcal/mol)
//!   └── error.rs    (错误处理)
//! ```

pub mod analyzer;
pub mod error;
pub mod models;
pub mod parsers;
pub mod units;
pub mod viz;

pub use analyzer::{
    Analyzer, EnergyProfile, MinForce, NebData, NebReader, Reference, VaspAnalyzer, VaspReader,
};
pub use error::{ExtractionStage, NebError, Result};
pub use models::{Atom, Crystal, ImageRole, ImageSummary, Lattice, StepMatrix};
pub use viz::{center_atoms, PlotConfig, ViewerConfig};
