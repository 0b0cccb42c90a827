//! # energy 子命令实现
//!
//! 打印某一优化步的能量曲线，可选输出图表。
//!
//! ## 依赖关系
//! - 使用 `cli/energy.rs` 定义的参数
//! - 使用 `analyzer::VaspAnalyzer`, `viz::plot`
//! - 使用 `utils/output.rs`

use crate::cli::energy::EnergyArgs;
use crate::utils::output;

use neb_analyzer::{PlotConfig, Reference};
use tabled::{Table, Tabled};

/// 能量表格行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "ΔE (kcal/mol)")]
    energy: String,
    #[tabled(rename = "Coordinate (Å)")]
    coord: String,
}

/// 执行 energy 子命令
pub fn execute(args: EnergyArgs) -> neb_analyzer::Result<()> {
    output::print_header("NEB Energy Profile");

    let analyzer = super::open_analyzer(&args.run_dir)?;
    let n_images = analyzer.n_images();
    let reference = Reference::from(args.reference);

    output::print_info(&format!(
        "{} images, step {}, reference '{}'",
        n_images, args.step, reference
    ));

    let profile = analyzer.get_e(args.step, reference)?;

    let rows: Vec<EnergyRow> = profile
        .energies
        .iter()
        .zip(profile.coords.iter())
        .enumerate()
        .map(|(i, (e, x))| EnergyRow {
            image: format!("{:02}", i),
            role: neb_analyzer::ImageRole::of(i, n_images).to_string(),
            energy: format!("{:.3}", e),
            coord: format!("{:.4}", x),
        })
        .collect();

    println!("{}", Table::new(&rows));

    if let Some((ts, e_max)) = profile
        .energies
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        output::print_separator();
        output::print_kv("Highest image", &format!("{:02}", ts));
        output::print_kv("Barrier (kcal/mol)", &format!("{:.3}", e_max - profile.energies[0]));
    }

    if let Some(path) = args.plot {
        let config = PlotConfig {
            output: path,
            width: args.width,
            height: args.height,
            title: args.title,
        };
        let written = analyzer.plot_e(args.step, reference, &config)?;
        output::print_success(&format!("Energy profile saved to '{}'", written.display()));
    }

    Ok(())
}
