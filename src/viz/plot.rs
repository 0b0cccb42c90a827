//! # 能量曲线图表生成
//!
//! 使用 `plotters` 绘制 NEB 能量曲线：自然三次样条平滑的虚线，原始 image 处画圆点。
//!
//! ## 依赖关系
//! - 被 `analyzer/mod.rs` 的 `plot_e` 调用
//! - 使用 `viz/spline.rs`
//! - 使用 `plotters` 渲染图表

use crate::error::{NebError, Result};
use crate::viz::spline::NaturalCubicSpline;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::{Path, PathBuf};

/// 样条采样步长 (Å)
const SPLINE_STEP: f64 = 0.001;

/// 曲线颜色 (darkred)
const CURVE_COLOR: RGBColor = RGBColor(139, 0, 0);

/// 能量曲线图表配置
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// 输出路径，扩展名为 `.svg` 时输出 SVG，否则输出 PNG
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            output: PathBuf::from("energy_profile.png"),
            width: 600,
            height: 400,
            title: None,
        }
    }
}

impl PlotConfig {
    fn use_svg(&self) -> bool {
        self.output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false)
    }
}

/// 绘制能量 (kcal/mol) 随反应坐标 (Å) 的变化曲线
pub fn plot_energy_profile(energies: &[f64], coords: &[f64], config: &PlotConfig) -> Result<()> {
    let spline = NaturalCubicSpline::new(coords, energies)?;
    let curve = spline.sample(SPLINE_STEP);
    let markers: Vec<(f64, f64)> = coords.iter().copied().zip(energies.iter().copied()).collect();

    ensure_parent_dir(&config.output)?;

    if config.use_svg() {
        let root = SVGBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
        draw_energy_chart(&root, &curve, &markers, config.title.as_deref())?;
        root.present()
            .map_err(|e| NebError::Plot(e.to_string()))?;
    } else {
        let root =
            BitMapBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
        draw_energy_chart(&root, &curve, &markers, config.title.as_deref())?;
        root.present()
            .map_err(|e| NebError::Plot(e.to_string()))?;
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|e| NebError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

/// 绘制图表的核心逻辑
fn draw_energy_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    curve: &[(f64, f64)],
    markers: &[(f64, f64)],
    title: Option<&str>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| NebError::Plot(format!("{:?}", e)))?;

    let x_max = curve.last().map(|(x, _)| *x).unwrap_or(1.0);
    let (y_min, y_max) = curve
        .iter()
        .chain(markers.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    let y_margin = ((y_max - y_min).abs() * 0.1).max(0.5);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60);
    if let Some(title) = title {
        builder.caption(title, ("sans-serif", 20).into_font());
    }

    let mut chart = builder
        .build_cartesian_2d(
            -0.05 * x_max..1.05 * x_max,
            (y_min - y_margin)..(y_max + y_margin),
        )
        .map_err(|e| NebError::Plot(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Reaction coordinate (Å)")
        .y_desc("Energy (kcal/mol)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| NebError::Plot(format!("{:?}", e)))?;

    // 平滑曲线
    chart
        .draw_series(DashedLineSeries::new(
            curve.iter().copied(),
            8,
            5,
            CURVE_COLOR.stroke_width(2),
        ))
        .map_err(|e| NebError::Plot(format!("{:?}", e)))?;

    // 原始 image 位置
    chart
        .draw_series(
            markers
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 6, CURVE_COLOR.filled())),
        )
        .map_err(|e| NebError::Plot(format!("{:?}", e)))?;

    Ok(())
}
