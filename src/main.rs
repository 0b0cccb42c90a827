//! # neb-analyzer - NEB 计算后处理命令行工具
//!
//! 库 `neb_analyzer` 的薄封装，提供常用分析的终端入口。
//!
//! ## 子命令
//! - `energy`  - 能量曲线表格，可选输出 PNG/SVG 图
//! - `forces`  - 最小受力优化步
//! - `pathway` - 路径 3D 交互视图 (HTML)
//! - `summary` - 每个 image 的 OUTCAR 概要
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── neb_analyzer (analyzer / parsers / viz)
//!   └── utils/      (输出样式、进度条)
//! ```

mod cli;
mod commands;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(e) = commands::run(cli.command) {
        let mut msg = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            msg.push_str(&format!("\n      caused by: {}", cause));
            source = cause.source();
        }
        utils::output::print_error(&msg);
        std::process::exit(1);
    }
}
