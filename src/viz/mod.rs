//! # 可视化模块
//!
//! 能量曲线绘图、路径 3D 视图以及结构居中。
//!
//! ## 依赖关系
//! - 被 `analyzer/` 和 `commands/` 使用
//! - 子模块: plot, spline, viewer, center

pub mod center;
pub mod plot;
pub mod spline;
pub mod viewer;

pub use center::center_atoms;
pub use plot::PlotConfig;
pub use viewer::ViewerConfig;
