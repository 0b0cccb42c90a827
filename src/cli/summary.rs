//! # summary 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/summary.rs`

use clap::Args;
use std::path::PathBuf;

/// summary 子命令参数
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// NEB run directory containing 00, 01, ... image folders
    #[arg(env = "NEB_RUN_DIR")]
    pub run_dir: PathBuf,
}
