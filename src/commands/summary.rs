//! # summary 子命令实现
//!
//! 逐个读取 image 的 OUTCAR，输出计算状态、离子步数、能量与受力。
//!
//! ## 依赖关系
//! - 使用 `cli/summary.rs` 定义的参数
//! - 使用 `parsers/outcar.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::summary::SummaryArgs;
use crate::utils::{output, progress};

use neb_analyzer::parsers::outcar;
use neb_analyzer::{ImageRole, NebReader, VaspReader};
use tabled::{Table, Tabled};

/// 概要表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Finished")]
    finished: String,
    #[tabled(rename = "Steps")]
    steps: usize,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
    #[tabled(rename = "Max force (eV/Å)")]
    force: String,
}

/// 执行 summary 子命令
pub fn execute(args: SummaryArgs) -> neb_analyzer::Result<()> {
    output::print_header("NEB Image Summary");

    let reader = VaspReader::new(&args.run_dir);
    let n_images = reader.count_images()?;

    output::print_info(&format!(
        "Found {} images in '{}'",
        n_images,
        reader.run_dir().display()
    ));

    let pb = progress::create_progress_bar(n_images as u64, "Parsing");
    let mut rows = Vec::with_capacity(n_images);
    let mut unfinished = 0;

    for i in 0..n_images {
        let label = format!("{:02}", i);
        let path = reader.image_dir(i).join("OUTCAR");

        let row = match outcar::parse_image_summary(&path, &label) {
            Ok(summary) => {
                if !summary.is_finished {
                    unfinished += 1;
                }
                SummaryRow {
                    image: summary.label.clone(),
                    role: ImageRole::of(i, n_images).to_string(),
                    finished: if summary.is_finished { "yes" } else { "no" }.to_string(),
                    steps: summary.ionic_steps,
                    energy: fmt_opt(summary.energy_ev, 6),
                    force: fmt_opt(summary.max_force, 4),
                }
            }
            Err(e) => {
                log::warn!("{}", e);
                unfinished += 1;
                SummaryRow {
                    image: label,
                    role: ImageRole::of(i, n_images).to_string(),
                    finished: "missing".to_string(),
                    steps: 0,
                    energy: "-".to_string(),
                    force: "-".to_string(),
                }
            }
        };
        rows.push(row);
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("{}", Table::new(&rows));

    if unfinished > 0 {
        output::print_warning(&format!("{} image(s) not finished", unfinished));
    } else {
        output::print_success("All images finished");
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}
