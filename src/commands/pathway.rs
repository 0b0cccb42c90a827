//! # pathway 子命令实现
//!
//! 取出某一优化步的路径结构，可选居中，写出 HTML 3D 视图。
//!
//! ## 依赖关系
//! - 使用 `cli/pathway.rs` 定义的参数
//! - 使用 `analyzer::VaspAnalyzer`, `viz::center`, `viz::viewer`
//! - 使用 `utils/output.rs`

use crate::cli::pathway::PathwayArgs;
use crate::utils::output;

use neb_analyzer::viz::viewer;
use neb_analyzer::{center_atoms, Analyzer, VaspReader, ViewerConfig};

/// 执行 pathway 子命令
pub fn execute(args: PathwayArgs) -> neb_analyzer::Result<()> {
    output::print_header("NEB Pathway Viewer");

    // 结构只来自 POSCAR / OUTCAR 轨迹，不需要提取能量矩阵
    let analyzer = Analyzer::new(VaspReader::new(&args.run_dir), false)?;

    let config = ViewerConfig {
        output: args.output,
        title: args.title,
        ..ViewerConfig::default()
    };

    let written = match args.center {
        None => analyzer.vis_pathway(args.step, args.initial, &config)?,
        Some(indices) => {
            let pathway = analyzer.get_pathway(args.step, args.initial)?;
            let selection = (!indices.is_empty()).then_some(indices.as_slice());
            let centered = center_atoms(&pathway, selection, 0)?;
            viewer::write_viewer(&centered, &config)?;
            config.output.clone()
        }
    };

    output::print_info(&format!(
        "{}: {} images, {}",
        analyzer.reader().run_dir().display(),
        analyzer.n_images(),
        if args.initial {
            "initial guess".to_string()
        } else {
            format!("step {}", args.step)
        }
    ));
    output::print_success(&format!("Viewer saved to '{}'", written.display()));

    Ok(())
}
