//! # energy 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/energy.rs`

use clap::{Args, ValueEnum};
use neb_analyzer::Reference;
use std::path::PathBuf;

/// 能量参考点
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ReferenceArg {
    /// Lowest energy on the pathway
    Min,
    /// Final image
    Fin,
    /// Initial image
    Ini,
}

impl From<ReferenceArg> for Reference {
    fn from(arg: ReferenceArg) -> Self {
        match arg {
            ReferenceArg::Min => Reference::Min,
            ReferenceArg::Fin => Reference::Final,
            ReferenceArg::Ini => Reference::Initial,
        }
    }
}

/// energy 子命令参数
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// NEB run directory containing 00, 01, ... image folders
    #[arg(env = "NEB_RUN_DIR")]
    pub run_dir: PathBuf,

    /// Optimization step, negative values count from the end
    #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
    pub step: isize,

    /// Energy reference
    #[arg(short, long, value_enum, default_value_t = ReferenceArg::Min)]
    pub reference: ReferenceArg,

    /// Also plot the profile to this file (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 600)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 400)]
    pub height: u32,

    /// Plot title
    #[arg(long)]
    pub title: Option<String>,
}
