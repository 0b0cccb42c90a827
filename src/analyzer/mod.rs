//! # NEB 分析器
//!
//! 定义各计算程序通用的数据提取接口 [`NebReader`]，以及在提取结果上进行的通用后处理：
//! 参考能量归一化、反应坐标累加、最小受力查找、绘图与路径可视化。
//!
//! ## 流程
//! ```text
//! Analyzer::new(reader, read_neb)
//!   ├── count_images
//!   └── extract (read_neb = true)
//!         initial_energy → final_energy → all_energies → all_distances → all_forces
//! ```
//!
//! ## 依赖关系
//! - 使用 `models/`, `units.rs`, `viz/`
//! - 子模块: vasp

pub mod vasp;

use crate::error::{ExtractionStage, NebError, Result};
use crate::models::{Crystal, StepMatrix};
use crate::units::EV_TO_KCAL_PER_MOL;
use crate::viz::plot::{self, PlotConfig};
use crate::viz::viewer::{self, ViewerConfig};

use std::path::PathBuf;
use std::str::FromStr;

pub use vasp::{VaspAnalyzer, VaspReader};

/// 计算程序相关的数据提取接口
///
/// `n_images` 为 [`NebReader::count_images`] 的结果，包含两端的 image。
pub trait NebReader {
    /// 统计 image 数 N
    fn count_images(&self) -> Result<usize>;

    /// 初态 (image 00) 最后一步的能量 (eV)
    fn initial_energy(&self, n_images: usize) -> Result<f64>;

    /// 末态 (image N-1) 最后一步的能量 (eV)
    fn final_energy(&self, n_images: usize) -> Result<f64>;

    /// 中间 image 的能量矩阵，形状 (steps, N-2)
    fn all_energies(&self, n_images: usize) -> Result<StepMatrix>;

    /// 相邻 image 距离矩阵，形状 (steps, N-1)
    fn all_distances(&self, n_images: usize) -> Result<StepMatrix>;

    /// 中间 image 最大受力矩阵，形状 (steps, N-2)
    fn all_forces(&self, n_images: usize) -> Result<StepMatrix>;

    /// 取某一优化步的完整路径（N 个结构）
    ///
    /// `initial` 为 true 时所有 image 都使用优化前的初始猜测。
    fn pathway(&self, n_images: usize, step: isize, initial: bool) -> Result<Vec<Crystal>>;
}

/// 一次完整提取的结果
#[derive(Debug, Clone)]
pub struct NebData {
    pub n_images: usize,
    /// 初态能量 (eV)
    pub e_ini: f64,
    /// 末态能量 (eV)
    pub e_fin: f64,
    pub energies: StepMatrix,
    pub distances: StepMatrix,
    pub forces: StepMatrix,
}

/// 按固定顺序运行全部提取步骤
pub fn extract<R: NebReader + ?Sized>(reader: &R, n_images: usize) -> Result<NebData> {
    use ExtractionStage::*;

    log::debug!("extracting NEB data for {} images", n_images);

    let e_ini = reader
        .initial_energy(n_images)
        .map_err(|e| e.at_stage(InitialEnergy))?;
    let e_fin = reader
        .final_energy(n_images)
        .map_err(|e| e.at_stage(FinalEnergy))?;
    let energies = reader
        .all_energies(n_images)
        .map_err(|e| e.at_stage(Energies))?;
    let distances = reader
        .all_distances(n_images)
        .map_err(|e| e.at_stage(Distances))?;
    let forces = reader
        .all_forces(n_images)
        .map_err(|e| e.at_stage(Forces))?;

    let data = NebData {
        n_images,
        e_ini,
        e_fin,
        energies,
        distances,
        forces,
    };
    data.check_shapes()?;

    Ok(data)
}

impl NebData {
    /// 检查列数；各矩阵步数不一致时只给出警告
    fn check_shapes(&self) -> Result<()> {
        let n = self.n_images;
        let checks = [
            ("energies", &self.energies, n.saturating_sub(2), ExtractionStage::Energies),
            ("distances", &self.distances, n.saturating_sub(1), ExtractionStage::Distances),
            ("forces", &self.forces, n.saturating_sub(2), ExtractionStage::Forces),
        ];

        for (what, matrix, expected, stage) in checks {
            if matrix.n_cols() != expected {
                return Err(NebError::ShapeMismatch {
                    what: format!("{} columns", what),
                    expected,
                    found: matrix.n_cols(),
                    column: 0,
                }
                .at_stage(stage));
            }
        }

        let steps = self.energies.n_steps();
        for (what, matrix) in [("distances", &self.distances), ("forces", &self.forces)] {
            if matrix.n_steps() != steps {
                log::warn!(
                    "{} cover {} optimization steps but energies cover {}",
                    what,
                    matrix.n_steps(),
                    steps
                );
            }
        }
        Ok(())
    }
}

/// 能量参考点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reference {
    /// 减去路径上的最低能量
    #[default]
    Min,
    /// 减去末态能量
    Final,
    /// 减去初态能量
    Initial,
}

impl From<&str> for Reference {
    /// "min" / "fin"，其余任何字符串都视为初态参考
    fn from(s: &str) -> Self {
        match s {
            "min" => Reference::Min,
            "fin" => Reference::Final,
            _ => Reference::Initial,
        }
    }
}

impl FromStr for Reference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Reference::from(s))
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Min => write!(f, "min"),
            Reference::Final => write!(f, "fin"),
            Reference::Initial => write!(f, "ini"),
        }
    }
}

/// 某一优化步的能量曲线
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyProfile {
    /// 相对能量 (kcal/mol)，N 个值
    pub energies: Vec<f64>,
    /// 反应坐标 (Å)，从 0 开始的累计距离，N 个值
    pub coords: Vec<f64>,
}

/// 最小受力所在的优化步
#[derive(Debug, Clone, PartialEq)]
pub struct MinForce {
    pub step: usize,
    /// 该步每个中间 image 的最大受力 (eV/Å)
    pub forces: Vec<f64>,
}

impl MinForce {
    /// 该步所有 image 中的最大受力
    pub fn max(&self) -> f64 {
        self.forces.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// 通用 NEB 分析器，持有具体程序的 [`NebReader`]
pub struct Analyzer<R: NebReader> {
    reader: R,
    n_images: usize,
    data: Option<NebData>,
}

impl<R: NebReader> Analyzer<R> {
    /// 创建分析器：总是统计 image 数，`read_neb` 为 true 时立即提取全部数据
    pub fn new(reader: R, read_neb: bool) -> Result<Self> {
        let n_images = reader
            .count_images()
            .map_err(|e| e.at_stage(ExtractionStage::ImageCount))?;
        if n_images < 3 {
            return Err(NebError::InvalidRunDirectory(format!(
                "found {} images, a pathway needs at least 3",
                n_images
            ))
            .at_stage(ExtractionStage::ImageCount));
        }

        let mut analyzer = Analyzer {
            reader,
            n_images,
            data: None,
        };
        if read_neb {
            analyzer.read_neb()?;
        }
        Ok(analyzer)
    }

    /// 提取全部数据（已提取时直接返回）
    pub fn read_neb(&mut self) -> Result<&NebData> {
        if self.data.is_none() {
            self.data = Some(extract(&self.reader, self.n_images)?);
        }
        self.data()
    }

    /// 已提取的数据，未提取时返回 `NotComputed`
    pub fn data(&self) -> Result<&NebData> {
        self.data.as_ref().ok_or(NebError::NotComputed)
    }

    pub fn n_images(&self) -> usize {
        self.n_images
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// 取某一优化步的完整路径
    pub fn get_pathway(&self, step: isize, initial: bool) -> Result<Vec<Crystal>> {
        self.reader.pathway(self.n_images, step, initial)
    }

    /// 最大 image 受力最小的优化步，并列时取最早的一步
    pub fn get_min_force(&self) -> Result<MinForce> {
        let forces = &self.data()?.forces;

        let mut best: Option<(usize, f64)> = None;
        for (step, row) in forces.rows().enumerate() {
            let row_max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            match best {
                Some((_, current)) if row_max >= current => {}
                _ => best = Some((step, row_max)),
            }
        }

        let (step, _) = best.ok_or_else(|| {
            NebError::EmptySeries("no convergence forces recorded".to_string())
        })?;

        Ok(MinForce {
            step,
            forces: forces.row(step as isize)?.to_vec(),
        })
    }

    /// 某一优化步的能量曲线（kcal/mol）与反应坐标（Å）
    pub fn get_e(&self, step: isize, reference: Reference) -> Result<EnergyProfile> {
        let data = self.data()?;

        let mut energies = Vec::with_capacity(data.n_images);
        energies.push(data.e_ini);
        energies.extend_from_slice(data.energies.row(step)?);
        energies.push(data.e_fin);

        let e_ref = match reference {
            Reference::Min => energies.iter().copied().fold(f64::INFINITY, f64::min),
            Reference::Final => energies[energies.len() - 1],
            Reference::Initial => energies[0],
        };

        let energies = energies
            .into_iter()
            .map(|e| (e - e_ref) * EV_TO_KCAL_PER_MOL)
            .collect();

        let coords = std::iter::once(0.0)
            .chain(data.distances.row(step)?.iter().scan(0.0, |acc, d| {
                *acc += d;
                Some(*acc)
            }))
            .collect();

        Ok(EnergyProfile { energies, coords })
    }

    /// 绘制能量曲线，返回输出文件路径
    pub fn plot_e(&self, step: isize, reference: Reference, config: &PlotConfig) -> Result<PathBuf> {
        let profile = self.get_e(step, reference)?;
        plot::plot_energy_profile(&profile.energies, &profile.coords, config)?;
        Ok(config.output.clone())
    }

    /// 生成路径的 3D 交互视图，返回输出文件路径
    pub fn vis_pathway(&self, step: isize, initial: bool, config: &ViewerConfig) -> Result<PathBuf> {
        let pathway = self.get_pathway(step, initial)?;
        viewer::write_viewer(&pathway, config)?;
        Ok(config.output.clone())
    }
}
