//! # forces 子命令实现
//!
//! 找出最大 image 受力最小的优化步；`--all` 时列出每步的最大受力。
//!
//! ## 依赖关系
//! - 使用 `cli/forces.rs` 定义的参数
//! - 使用 `analyzer::VaspAnalyzer`
//! - 使用 `utils/output.rs`

use crate::cli::forces::ForcesArgs;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 单个 image 的受力
#[derive(Debug, Clone, Tabled)]
struct ImageForceRow {
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Max force (eV/Å)")]
    force: String,
}

/// 每一步的最大受力
#[derive(Debug, Clone, Tabled)]
struct StepForceRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Max force (eV/Å)")]
    force: String,
}

/// 执行 forces 子命令
pub fn execute(args: ForcesArgs) -> neb_analyzer::Result<()> {
    output::print_header("NEB Convergence Forces");

    let analyzer = super::open_analyzer(&args.run_dir)?;

    if args.all {
        let rows: Vec<StepForceRow> = analyzer
            .data()?
            .forces
            .rows()
            .enumerate()
            .map(|(step, row)| StepForceRow {
                step,
                force: format!(
                    "{:.6}",
                    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
                ),
            })
            .collect();

        if rows.is_empty() {
            output::print_warning("No force records found (VTST output missing?)");
            return Ok(());
        }
        println!("{}", Table::new(&rows));
    }

    let min_force = analyzer.get_min_force()?;

    let rows: Vec<ImageForceRow> = min_force
        .forces
        .iter()
        .enumerate()
        .map(|(i, f)| ImageForceRow {
            image: format!("{:02}", i + 1),
            force: format!("{:.6}", f),
        })
        .collect();

    output::print_separator();
    println!("{}", Table::new(&rows));
    output::print_success(&format!(
        "Minimum force at step {} ({:.6} eV/Å)",
        min_force.step,
        min_force.max()
    ));

    Ok(())
}
