//! # pathway 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pathway.rs`

use clap::Args;
use std::path::PathBuf;

/// pathway 子命令参数
#[derive(Args, Debug)]
pub struct PathwayArgs {
    /// NEB run directory containing 00, 01, ... image folders
    #[arg(env = "NEB_RUN_DIR")]
    pub run_dir: PathBuf,

    /// Optimization step, negative values count from the end
    #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
    pub step: isize,

    /// Use the initial (unoptimized) guess for every image
    #[arg(long, default_value_t = false)]
    pub initial: bool,

    /// Center these atoms (0-based, comma separated) of the initial image in the cell
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub center: Option<Vec<usize>>,

    /// Output HTML file
    #[arg(short, long, default_value = "pathway.html")]
    pub output: PathBuf,

    /// Page title
    #[arg(long, default_value = "NEB pathway")]
    pub title: String,
}
