//! # 工具函数模块
//!
//! 终端输出样式与进度显示。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 子模块: output, progress

pub mod output;
pub mod progress;
