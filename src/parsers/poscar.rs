//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件格式，用于读取 NEB 的初始猜测结构。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `analyzer/vasp.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{NebError, Result};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| NebError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let default_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_poscar_content(&content, default_name).map_err(|e| match e {
        NebError::ParseError { format, reason, .. } => NebError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

fn parse_error(name: &str, reason: impl Into<String>) -> NebError {
    NebError::ParseError {
        format: "poscar".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 8 {
        return Err(parse_error(default_name, "File too short"));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1].trim().parse().unwrap_or(1.0);

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_error(
                &name,
                format!("Invalid lattice vector at line {}", 3 + i),
            ));
        }
        matrix[i] = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    let first = line5_parts
        .first()
        .ok_or_else(|| parse_error(&name, "Missing species/count line"))?;
    let (elements, counts, atom_line_start) = if first.parse::<usize>().is_ok() {
        // VASP 4 format: no element line, only counts
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let elements: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (elements, counts, 6)
    } else {
        // VASP 5+ format: element symbols on line 5, counts on line 6
        // POTCAR 标签可能写成 "Ti_pv" 或 "Ti/abc123"
        let elements: Vec<String> = line5_parts
            .iter()
            .map(|s| {
                s.split(|c| c == '_' || c == '/')
                    .next()
                    .unwrap_or(s)
                    .to_string()
            })
            .collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (elements, counts, 7)
    };

    if elements.len() != counts.len() {
        return Err(parse_error(
            &name,
            format!(
                "{} species but {} counts",
                elements.len(),
                counts.len()
            ),
        ));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = atom_line_start;
    if lines.len() > coord_line
        && lines[coord_line]
            .trim()
            .to_lowercase()
            .starts_with('s')
    {
        coord_line += 1;
    }

    // Coordinate type line
    if lines.len() <= coord_line {
        return Err(parse_error(&name, "Missing coordinate type line"));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let mut atoms: Vec<Atom> = Vec::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            if line_idx >= lines.len() {
                break;
            }
            let parts: Vec<f64> = lines[line_idx]
                .split_whitespace()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();

            if parts.len() >= 3 {
                let position = if is_cartesian {
                    // Cartesian 坐标同样受 scaling factor 缩放
                    lattice.cart_to_frac([parts[0] * scale, parts[1] * scale, parts[2] * scale])
                } else {
                    [parts[0], parts[1], parts[2]]
                };
                atoms.push(Atom::new(elem.clone(), position));
            }
            line_idx += 1;
        }
    }

    let expected: usize = counts.iter().sum();
    if atoms.len() != expected {
        return Err(parse_error(
            &name,
            format!("Expected {} atoms, found {}", expected, atoms.len()),
        ));
    }

    let mut crystal = Crystal::new(name, lattice, atoms);
    crystal.source_format = Some("poscar".to_string());

    Ok(crystal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_vasp5() {
        let content = r#"NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
4 4
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
0.5 0.0 0.0
0.0 0.5 0.0
0.0 0.0 0.5
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "NaCl").unwrap();
        assert_eq!(crystal.name, "NaCl");
        assert_eq!(crystal.atoms.len(), 8);

        let na_count = crystal.atoms.iter().filter(|a| a.element == "Na").count();
        let cl_count = crystal.atoms.iter().filter(|a| a.element == "Cl").count();
        assert_eq!(na_count, 4);
        assert_eq!(cl_count, 4);
        assert_eq!(crystal.source_format.as_deref(), Some("poscar"));
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = crystal.lattice.parameters();

        // 2.0 * 2.0 = 4.0
        assert!((a - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_poscar_cartesian_and_selective() {
        let content = r#"H2 on slab
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
H_s
2
Selective dynamics
Cartesian
5.0 5.0 5.0 T T T
5.0 5.0 5.74 F F F
"#;
        let crystal = parse_poscar_content(content, "01").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.atoms[0].element, "H");
        assert!((crystal.atoms[1].position[2] - 0.574).abs() < 1e-9);
    }

    #[test]
    fn test_parse_poscar_vasp4_counts_only() {
        let content = r#"old style
1.0
3.0 0.0 0.0
0.0 3.0 0.0
0.0 0.0 3.0
1 1
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "00").unwrap();
        assert_eq!(crystal.atoms[0].element, "X1");
        assert_eq!(crystal.atoms[1].element, "X2");
    }

    #[test]
    fn test_parse_poscar_truncated() {
        let content = "short\n1.0\n1 0 0\n";
        assert!(parse_poscar_content(content, "00").is_err());
    }
}
