//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `utils/` 以及库中的 `analyzer/`, `viz/`
//! - 子模块: energy, forces, pathway, summary

pub mod energy;
pub mod forces;
pub mod pathway;
pub mod summary;

use crate::cli::Commands;
use crate::utils::progress;

use neb_analyzer::{Result, VaspAnalyzer};
use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Energy(args) => energy::execute(args),
        Commands::Forces(args) => forces::execute(args),
        Commands::Pathway(args) => pathway::execute(args),
        Commands::Summary(args) => summary::execute(args),
    }
}

/// 打开 NEB 目录并提取数据，期间显示 spinner
fn open_analyzer(run_dir: &Path) -> Result<VaspAnalyzer> {
    progress::with_spinner(&format!("Reading NEB run '{}'", run_dir.display()), || {
        VaspAnalyzer::open(run_dir)
    })
}
