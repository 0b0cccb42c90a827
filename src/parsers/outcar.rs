//! # VASP OUTCAR 文本扫描
//!
//! 逐行扫描 OUTCAR，提取每个离子步的能量、NEB 相邻 image 距离和最大受力。
//! 能量优先使用 `parsers/trajectory.rs` 的结构化读取，失败时退回文本扫描。
//!
//! 缺失或无法解析的标记行只会让序列变短，不会报错。
//!
//! ## 依赖关系
//! - 被 `analyzer/vasp.rs`, `commands/summary.rs` 使用
//! - 使用 `parsers/trajectory.rs`, `models/calculation.rs`

use crate::error::{NebError, Result};
use crate::models::ImageSummary;
use crate::parsers::trajectory;
use std::fs;
use std::path::Path;

/// 离子步能量行 (VASP 在离子步结束时输出，两个空格)
pub const ENERGY_MARKER: &str = "energy  without entropy=";

/// VTST NEB 距离行
pub const DISTANCE_MARKER: &str = "NEB: distance to prev, next image, angle between";

/// VTST 最大受力行
pub const FORCE_MARKER: &str = "FORCES: max atom, RMS";

/// 计算正常结束的标记
const FINISHED_MARKER: &str = "General timing and accounting informations for this job";

/// 相邻 image 方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Previous,
    Next,
}

impl Neighbor {
    /// 在距离行中的 token 位置
    fn token_index(self) -> usize {
        match self {
            Neighbor::Previous => 8,
            Neighbor::Next => 9,
        }
    }
}

/// 读取整个 OUTCAR
///
/// 非 UTF-8 字节按替换字符解码，只影响所在行，不会让整个文件读取失败。
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| NebError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 读取一个 image 的逐步能量 (eV)
///
/// 先尝试结构化轨迹读取；失败时退回到 `energy  without entropy=` 文本扫描。
pub fn read_energies(path: &Path) -> Result<Vec<f64>> {
    let content = read_log(path)?;

    match trajectory::parse_trajectory(&content) {
        Ok(frames) => {
            let energies: Option<Vec<f64>> = frames.iter().map(|f| f.energy).collect();
            if let Some(energies) = energies {
                return Ok(energies);
            }
            log::debug!(
                "{}: trajectory frames without energy, scanning text",
                path.display()
            );
        }
        Err(e) => {
            log::debug!(
                "{}: structured read failed ({}), scanning text",
                path.display(),
                e
            );
        }
    }

    Ok(scan_energies(&content))
}

/// 扫描 `energy  without entropy=` 行，取最后一个 token
pub fn scan_energies(content: &str) -> Vec<f64> {
    content
        .lines()
        .filter(|line| line.contains(ENERGY_MARKER))
        .filter_map(|line| line.split_whitespace().last()?.parse().ok())
        .collect()
}

/// 扫描 NEB 距离行
pub fn scan_neb_distances(content: &str, neighbor: Neighbor) -> Vec<f64> {
    let idx = neighbor.token_index();
    content
        .lines()
        .filter(|line| line.contains(DISTANCE_MARKER))
        .filter_map(|line| line.split_whitespace().nth(idx)?.parse().ok())
        .collect()
}

/// 扫描 `FORCES: max atom, RMS` 行，第 5 个 token 为最大原子受力
pub fn scan_max_forces(content: &str) -> Vec<f64> {
    content
        .lines()
        .filter(|line| line.contains(FORCE_MARKER))
        .filter_map(|line| line.split_whitespace().nth(4)?.parse().ok())
        .collect()
}

/// 解析单个 image 的 OUTCAR 概要
pub fn parse_image_summary(path: &Path, label: &str) -> Result<ImageSummary> {
    let content = read_log(path)?;
    let mut summary = ImageSummary::new(label);

    for line in content.lines() {
        if line.contains(FINISHED_MARKER) {
            summary.is_finished = true;
        }

        // "   NIONS =       8"
        if summary.num_atoms.is_none() && line.contains("NIONS =") {
            if let Some(val) = extract_last_number(line) {
                summary.num_atoms = Some(val as usize);
            }
        }
    }

    let energies = scan_energies(&content);
    summary.ionic_steps = energies.len();
    summary.energy_ev = energies.last().copied();
    summary.max_force = scan_max_forces(&content).last().copied();

    Ok(summary)
}

/// 提取字符串中最后一个数字
fn extract_last_number(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|w| w.parse::<f64>().ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NEB_STEPS: &str = r#"
   NIONS =       4
  NEB: distance to prev, next image, angle between     1.021456    0.987654  172.345678
  FORCES: max atom, RMS     1.234567    0.456789
  free  energy   TOTEN  =       -24.11110000 eV

  energy  without entropy=      -24.10000000  energy(sigma->0) =      -24.10500000
  NEB: distance to prev, next image, angle between     1.011111    0.977777  171.000000
  FORCES: max atom, RMS     0.654321    0.123456
  free  energy   TOTEN  =       -24.30000000 eV

  energy  without entropy=      -24.29000000  energy(sigma->0) =      -24.29500000
 General timing and accounting informations for this job:
"#;

    #[test]
    fn test_scan_energies() {
        assert_eq!(scan_energies(NEB_STEPS), vec![-24.105, -24.295]);
    }

    #[test]
    fn test_scan_energies_ignores_electronic_steps() {
        // 电子步的行是单个空格，不应被计入
        let content = "  energy without entropy =     -1.0  energy(sigma->0) =     -1.0\n";
        assert!(scan_energies(content).is_empty());
    }

    #[test]
    fn test_scan_neb_distances() {
        assert_eq!(
            scan_neb_distances(NEB_STEPS, Neighbor::Previous),
            vec![1.021456, 1.011111]
        );
        assert_eq!(
            scan_neb_distances(NEB_STEPS, Neighbor::Next),
            vec![0.987654, 0.977777]
        );
    }

    #[test]
    fn test_scan_max_forces() {
        assert_eq!(scan_max_forces(NEB_STEPS), vec![1.234567, 0.654321]);
    }

    #[test]
    fn test_missing_markers_yield_empty_series() {
        let content = "nothing interesting here\n  FORCES: max atom, RMS\n";
        assert!(scan_max_forces(content).is_empty());
        assert!(scan_neb_distances(content, Neighbor::Next).is_empty());
        assert!(scan_energies(content).is_empty());
    }

    #[test]
    fn test_read_energies_falls_back_to_text_scan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", NEB_STEPS).unwrap();

        let energies = read_energies(file.path()).unwrap();
        assert_eq!(energies, vec![-24.105, -24.295]);
    }

    #[test]
    fn test_read_log_tolerates_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b" SYSTEM = caf\xe9\n").unwrap();
        write!(file, "{}", NEB_STEPS).unwrap();

        let content = read_log(file.path()).unwrap();
        assert_eq!(scan_max_forces(&content), vec![1.234567, 0.654321]);
        assert_eq!(read_energies(file.path()).unwrap(), vec![-24.105, -24.295]);
    }

    #[test]
    fn test_read_energies_missing_file() {
        let err = read_energies(Path::new("/nonexistent/00/OUTCAR")).unwrap_err();
        assert!(matches!(err, NebError::FileReadError { .. }));
    }

    #[test]
    fn test_parse_image_summary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", NEB_STEPS).unwrap();

        let summary = parse_image_summary(file.path(), "02").unwrap();
        assert_eq!(summary.label, "02");
        assert!(summary.is_finished);
        assert_eq!(summary.ionic_steps, 2);
        assert_eq!(summary.num_atoms, Some(4));
        assert_eq!(summary.energy_ev, Some(-24.295));
        assert_eq!(summary.max_force, Some(0.654321));
    }
}
