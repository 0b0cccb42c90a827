//! # 解析器模块
//!
//! 提供 VASP 结构文件和 OUTCAR 输出的解析器。
//!
//! ## 依赖关系
//! - 被 `analyzer/` 和 `commands/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, outcar, trajectory

pub mod outcar;
pub mod poscar;
pub mod trajectory;
