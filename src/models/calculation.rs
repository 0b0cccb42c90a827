//! # 单个 image 计算结果数据模型
//!
//! 存储每个 NEB image 目录下 OUTCAR 的概要信息。
//!
//! ## 依赖关系
//! - 被 `parsers/outcar.rs` 使用
//! - 被 `commands/summary.rs` 使用

use serde::{Deserialize, Serialize};

/// image 在路径中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRole {
    /// 反应物 (00)
    Initial,
    /// 中间 image，由 NEB 优化
    Intermediate,
    /// 产物 (N-1)
    Final,
}

impl ImageRole {
    /// 根据编号与 image 总数判断角色
    pub fn of(index: usize, n_images: usize) -> Self {
        if index == 0 {
            ImageRole::Initial
        } else if index + 1 == n_images {
            ImageRole::Final
        } else {
            ImageRole::Intermediate
        }
    }

    pub fn is_boundary(&self) -> bool {
        !matches!(self, ImageRole::Intermediate)
    }
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Initial => write!(f, "initial"),
            ImageRole::Intermediate => write!(f, "intermediate"),
            ImageRole::Final => write!(f, "final"),
        }
    }
}

/// 单个 image 的 OUTCAR 概要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    /// image 目录名 (00, 01, ...)
    pub label: String,

    /// 计算是否正常结束
    pub is_finished: bool,

    /// 离子步数
    pub ionic_steps: usize,

    /// 最后一步 energy(sigma->0) (eV)
    pub energy_ev: Option<f64>,

    /// 最后一步最大原子受力 (eV/Å)，需要 VTST 输出
    pub max_force: Option<f64>,

    /// 原子数
    pub num_atoms: Option<usize>,
}

impl ImageSummary {
    pub fn new(label: impl Into<String>) -> Self {
        ImageSummary {
            label: label.into(),
            is_finished: false,
            ionic_steps: 0,
            energy_ev: None,
            max_force: None,
            num_atoms: None,
        }
    }

    /// 计算每原子能量
    pub fn energy_per_atom(&self) -> Option<f64> {
        match (self.energy_ev, self.num_atoms) {
            (Some(e), Some(n)) if n > 0 => Some(e / n as f64),
            _ => None,
        }
    }
}
