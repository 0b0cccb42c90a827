//! # forces 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/forces.rs`

use clap::Args;
use std::path::PathBuf;

/// forces 子命令参数
#[derive(Args, Debug)]
pub struct ForcesArgs {
    /// NEB run directory containing 00, 01, ... image folders
    #[arg(env = "NEB_RUN_DIR")]
    pub run_dir: PathBuf,

    /// Print the maximum force of every step
    #[arg(long, default_value_t = false)]
    pub all: bool,
}
