//! # VASP OUTCAR 结构化轨迹读取
//!
//! 将 OUTCAR 解析为按离子步排列的结构快照（晶格、坐标、受力、能量）。
//!
//! ## 解析的内容
//! ```text
//!  POTCAR:    PAW_PBE Ti_pv 07Sep2000          # 元素（前 ntypes 行）
//!    ions per type =               3   1       # 每种元素的原子数
//!       direct lattice vectors    ...          # 当前晶格（每步更新）
//!  POSITION        TOTAL-FORCE (eV/Angst)      # 坐标 + 受力块
//!   free  energy   TOTEN  =  -24.1 eV          # 自由能
//!   energy  without entropy=  ...  energy(sigma->0) =  -24.1   # 离子步结束
//! ```
//!
//! 末尾未写完能量的离子步会被丢弃。
//!
//! ## 依赖关系
//! - 被 `parsers/outcar.rs`, `analyzer/vasp.rs` 使用
//! - 使用 `models/structure.rs`, `regex`

use crate::error::{NebError, Result};
use crate::models::{resolve_index, Atom, Crystal, Lattice};
use crate::parsers::outcar::{read_log, ENERGY_MARKER};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static POTCAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*POTCAR:\s+\S+\s+(\S+)").unwrap());

static IONS_PER_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ions per type =([ \t\d]+)").unwrap());

fn parse_error(reason: impl Into<String>) -> NebError {
    NebError::ParseError {
        format: "outcar".to_string(),
        path: "OUTCAR".to_string(),
        reason: reason.into(),
    }
}

/// 读取 OUTCAR 文件中的全部离子步
pub fn read_trajectory(path: &Path) -> Result<Vec<Crystal>> {
    let content = read_log(path)?;
    parse_trajectory(&content).map_err(|e| match e {
        NebError::ParseError { format, reason, .. } => NebError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 读取指定离子步，`step` 支持负下标（-1 为最后一步）
pub fn read_snapshot(path: &Path, step: isize) -> Result<Crystal> {
    let mut frames = read_trajectory(path)?;
    let len = frames.len();
    let idx = resolve_index(step, len).ok_or(NebError::StepOutOfRange { step, len })?;
    Ok(frames.swap_remove(idx))
}

/// 从 OUTCAR 文本解析离子步轨迹
pub fn parse_trajectory(content: &str) -> Result<Vec<Crystal>> {
    let counts = parse_ions_per_type(content)?;
    let species = parse_species(content, counts.len())?;
    let nions: usize = counts.iter().sum();

    let elements: Vec<&str> = species
        .iter()
        .zip(counts.iter())
        .flat_map(|(el, &n)| std::iter::repeat(el.as_str()).take(n))
        .collect();

    let lines: Vec<&str> = content.lines().collect();
    let mut cell: Option<Lattice> = None;
    let mut pending: Option<Crystal> = None;
    let mut frames: Vec<Crystal> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if line.contains("direct lattice vectors") {
            cell = Some(parse_cell(&lines[i + 1..])?);
            i += 4;
            continue;
        }

        if line.trim_start().starts_with("POSITION") && line.contains("TOTAL-FORCE") {
            let lattice = cell
                .clone()
                .ok_or_else(|| parse_error("POSITION block before any lattice vectors"))?;
            // 表头之后是一行分隔线；文件在块中间结束说明计算被中断
            let Some(block) = lines.get(i + 2..i + 2 + nions) else {
                log::debug!("POSITION block at line {} cut off by end of file", i + 1);
                break;
            };
            let (positions, forces) = parse_posforce(block)?;

            let atoms = elements
                .iter()
                .zip(positions.iter())
                .map(|(el, &cart)| Atom::new(*el, lattice.cart_to_frac(cart)))
                .collect();

            let mut crystal = Crystal::new(format!("step {}", frames.len()), lattice, atoms);
            crystal.forces = Some(forces);
            crystal.source_format = Some("outcar".to_string());
            pending = Some(crystal);

            i += 2 + nions;
            continue;
        }

        if line.contains("free  energy   TOTEN") {
            if let Some(frame) = pending.as_mut() {
                frame.free_energy = extract_number_before(line, "eV");
            }
        }

        if line.contains(ENERGY_MARKER) {
            if let Some(mut frame) = pending.take() {
                frame.energy = line.split_whitespace().last().and_then(|s| s.parse().ok());
                if frame.energy.is_none() {
                    return Err(parse_error(format!("Invalid energy line {}", i + 1)));
                }
                frames.push(frame);
            }
        }

        i += 1;
    }

    if pending.is_some() {
        log::debug!("dropping trailing ionic step without energy");
    }

    if frames.is_empty() {
        return Err(parse_error("No complete ionic step found"));
    }

    Ok(frames)
}

/// 解析 "ions per type =" 行
fn parse_ions_per_type(content: &str) -> Result<Vec<usize>> {
    let caps = IONS_PER_TYPE_RE
        .captures(content)
        .ok_or_else(|| parse_error("Missing 'ions per type' line"))?;

    let counts: Vec<usize> = caps[1]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();

    if counts.is_empty() {
        return Err(parse_error("Empty 'ions per type' line"));
    }
    Ok(counts)
}

/// 从 POTCAR 行解析元素符号；OUTCAR 中 POTCAR 行会出现两遍，取前 `ntypes` 个
fn parse_species(content: &str, ntypes: usize) -> Result<Vec<String>> {
    let species: Vec<String> = POTCAR_RE
        .captures_iter(content)
        .take(ntypes)
        .map(|caps| {
            caps[1]
                .split(|c| c == '_' || c == '.')
                .next()
                .unwrap_or(&caps[1])
                .to_string()
        })
        .collect();

    if species.len() != ntypes {
        return Err(parse_error(format!(
            "Found {} POTCAR entries for {} ion types",
            species.len(),
            ntypes
        )));
    }
    Ok(species)
}

/// 解析 "direct lattice vectors" 之后的三行
fn parse_cell(lines: &[&str]) -> Result<Lattice> {
    let mut matrix = [[0.0; 3]; 3];
    for (row, target) in matrix.iter_mut().enumerate() {
        let values: Vec<f64> = lines
            .get(row)
            .ok_or_else(|| parse_error("Truncated lattice vectors"))?
            .split_whitespace()
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if values.len() < 3 {
            return Err(parse_error("Invalid lattice vector line"));
        }
        *target = [values[0], values[1], values[2]];
    }
    Ok(Lattice::from_vectors(matrix))
}

/// 解析 POSITION/TOTAL-FORCE 数据行
fn parse_posforce(lines: &[&str]) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>)> {
    let mut positions = Vec::with_capacity(lines.len());
    let mut forces = Vec::with_capacity(lines.len());

    for line in lines {
        let v: Vec<f64> = line
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if v.len() < 6 {
            return Err(parse_error(format!("Invalid POSITION line: '{}'", line.trim())));
        }
        positions.push([v[0], v[1], v[2]]);
        forces.push([v[3], v[4], v[5]]);
    }

    Ok((positions, forces))
}

/// 从字符串中提取指定标记之前的数字
fn extract_number_before(s: &str, marker: &str) -> Option<f64> {
    let pos = s.find(marker)?;
    s[..pos].split_whitespace().last()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTCAR: &str = r#" vasp.5.4.4.18Apr17-6-g9f103f2a35
 POTCAR:    PAW_PBE H 15Jun2001
 POTCAR:    PAW_PBE O 08Apr2002
 POTCAR:    PAW_PBE H 15Jun2001
 POTCAR:    PAW_PBE O 08Apr2002
   ions per type =               2   1
   NIONS =       3
      direct lattice vectors                 reciprocal lattice vectors
    10.000000000  0.000000000  0.000000000     0.100000000  0.000000000  0.000000000
     0.000000000 10.000000000  0.000000000     0.000000000  0.100000000  0.000000000
     0.000000000  0.000000000 10.000000000     0.000000000  0.000000000  0.100000000

 POSITION                                       TOTAL-FORCE (eV/Angst)
 -----------------------------------------------------------------------------------
      5.75700      5.58600      5.00000         0.300000      0.400000      0.000000
      4.24300      5.58600      5.00000        -0.100000      0.000000      0.000000
      5.00000      5.00000      5.00000         0.000000     -0.200000      0.000000
 -----------------------------------------------------------------------------------
  FREE ENERGIE OF THE ION-ELECTRON SYSTEM (eV)
  ---------------------------------------------------
  free  energy   TOTEN  =       -14.21000000 eV

  energy  without entropy=      -14.20000000  energy(sigma->0) =      -14.20500000

      direct lattice vectors                 reciprocal lattice vectors
    10.000000000  0.000000000  0.000000000     0.100000000  0.000000000  0.000000000
     0.000000000 10.000000000  0.000000000     0.000000000  0.100000000  0.000000000
     0.000000000  0.000000000 10.000000000     0.000000000  0.000000000  0.100000000

 POSITION                                       TOTAL-FORCE (eV/Angst)
 -----------------------------------------------------------------------------------
      5.76000      5.59000      5.00000         0.010000      0.020000      0.000000
      4.24000      5.59000      5.00000        -0.010000      0.020000      0.000000
      5.00000      5.00000      5.00000         0.000000     -0.040000      0.000000
 -----------------------------------------------------------------------------------
  free  energy   TOTEN  =       -14.31000000 eV

  energy  without entropy=      -14.30000000  energy(sigma->0) =      -14.30500000

 POSITION                                       TOTAL-FORCE (eV/Angst)
 -----------------------------------------------------------------------------------
      5.76100      5.59100      5.00000         0.001000      0.002000      0.000000
"#;

    #[test]
    fn test_parse_trajectory_frames() {
        let frames = parse_trajectory(OUTCAR).unwrap();

        // 第三个 POSITION 块不完整，被丢弃
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].formula(), "H2O");
        assert_eq!(frames[0].energy, Some(-14.205));
        assert_eq!(frames[0].free_energy, Some(-14.21));
        assert_eq!(frames[1].energy, Some(-14.305));
    }

    #[test]
    fn test_parse_trajectory_positions_and_forces() {
        let frames = parse_trajectory(OUTCAR).unwrap();
        let first = &frames[0];

        assert_eq!(first.atoms[0].element, "H");
        assert_eq!(first.atoms[2].element, "O");
        assert!((first.atoms[0].position[0] - 0.5757).abs() < 1e-9);

        let cart = first.cartesian_positions();
        assert!((cart[1][0] - 4.243).abs() < 1e-9);

        assert!((first.max_force().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_trajectory_without_header_fails() {
        let content = "  energy  without entropy=  -1.0  energy(sigma->0) =  -1.0\n";
        assert!(parse_trajectory(content).is_err());
    }

    #[test]
    fn test_parse_trajectory_truncated_first_block_fails() {
        let cut = OUTCAR
            .find("      4.24300")
            .map(|pos| &OUTCAR[..pos])
            .unwrap();
        assert!(parse_trajectory(cut).is_err());
    }

    #[test]
    fn test_read_snapshot_indexing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, OUTCAR.as_bytes()).unwrap();

        let last = read_snapshot(file.path(), -1).unwrap();
        assert_eq!(last.energy, Some(-14.305));

        let first = read_snapshot(file.path(), 0).unwrap();
        assert_eq!(first.energy, Some(-14.205));

        assert!(matches!(
            read_snapshot(file.path(), 2),
            Err(NebError::StepOutOfRange { step: 2, len: 2 })
        ));
    }
}
