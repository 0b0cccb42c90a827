//! # VASP NEB 数据读取
//!
//! 解析 VASP (VTST) NEB 计算目录：
//! ```text
//! run_dir/
//!   00/  POSCAR OUTCAR        # 初态，不参与优化
//!   01/  POSCAR OUTCAR CONTCAR
//!   ...
//!   NN/  POSCAR OUTCAR        # 末态
//! ```
//!
//! ## 依赖关系
//! - 实现 `analyzer/mod.rs` 的 `NebReader`
//! - 使用 `parsers/outcar.rs`, `parsers/poscar.rs`, `parsers/trajectory.rs`
//! - 使用 `walkdir`, `glob` 发现 image 目录

use super::{Analyzer, NebReader};
use crate::error::{NebError, Result};
use crate::models::{Crystal, ImageRole, StepMatrix};
use crate::parsers::outcar::{self, Neighbor};
use crate::parsers::{poscar, trajectory};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// VASP 计算的 NEB 分析器
pub type VaspAnalyzer = Analyzer<VaspReader>;

impl VaspAnalyzer {
    /// 打开 VASP NEB 计算目录并提取全部数据
    pub fn open(run_dir: impl Into<PathBuf>) -> Result<Self> {
        Analyzer::new(VaspReader::new(run_dir), true)
    }
}

/// VASP NEB 目录读取器
#[derive(Debug, Clone)]
pub struct VaspReader {
    run_dir: PathBuf,
}

impl VaspReader {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        VaspReader {
            run_dir: run_dir.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// image 目录，如 `run_dir/03`
    pub fn image_dir(&self, index: usize) -> PathBuf {
        self.run_dir.join(format!("{:02}", index))
    }

    fn outcar(&self, index: usize) -> PathBuf {
        self.image_dir(index).join("OUTCAR")
    }

    /// 所有 image 的目录名（按编号排序）
    pub fn image_labels(&self) -> Result<Vec<String>> {
        if !self.run_dir.is_dir() {
            return Err(NebError::DirectoryNotFound {
                path: self.run_dir.display().to_string(),
            });
        }

        let pattern = glob::Pattern::new("[0-9][0-9]")
            .map_err(|e| NebError::InvalidArgument(e.to_string()))?;

        let mut labels: Vec<String> = WalkDir::new(&self.run_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| pattern.matches(name))
            .collect();
        labels.sort();

        Ok(labels)
    }

    /// 中间 image 的编号 1..N-1
    fn intermediate(n_images: usize) -> std::ops::Range<usize> {
        1..n_images.saturating_sub(1)
    }

    /// 某个 image 的最后一个能量
    fn last_energy(&self, index: usize) -> Result<f64> {
        let path = self.outcar(index);
        outcar::read_energies(&path)?
            .last()
            .copied()
            .ok_or_else(|| NebError::EmptySeries(format!("no ionic energies in {}", path.display())))
    }

    fn distances(&self, index: usize, neighbor: Neighbor) -> Result<Vec<f64>> {
        let content = outcar::read_log(&self.outcar(index))?;
        Ok(outcar::scan_neb_distances(&content, neighbor))
    }
}

impl NebReader for VaspReader {
    fn count_images(&self) -> Result<usize> {
        let labels = self.image_labels()?;

        if labels.is_empty() {
            return Err(NebError::InvalidRunDirectory(format!(
                "no two-digit image directories in {}",
                self.run_dir.display()
            )));
        }

        // 目录必须是连续的 00, 01, ..., N-1
        for (i, label) in labels.iter().enumerate() {
            if *label != format!("{:02}", i) {
                return Err(NebError::InvalidRunDirectory(format!(
                    "image directories are not contiguous: expected {:02}, found {}",
                    i, label
                )));
            }
        }

        log::debug!("{}: {} images", self.run_dir.display(), labels.len());
        Ok(labels.len())
    }

    fn initial_energy(&self, _n_images: usize) -> Result<f64> {
        self.last_energy(0)
    }

    fn final_energy(&self, n_images: usize) -> Result<f64> {
        let last = n_images.checked_sub(1).ok_or_else(|| {
            NebError::InvalidRunDirectory("cannot read the final image of an empty run".to_string())
        })?;
        self.last_energy(last)
    }

    fn all_energies(&self, n_images: usize) -> Result<StepMatrix> {
        let columns = Self::intermediate(n_images)
            .map(|i| outcar::read_energies(&self.outcar(i)))
            .collect::<Result<Vec<_>>>()?;
        StepMatrix::from_columns("energies", columns)
    }

    fn all_distances(&self, n_images: usize) -> Result<StepMatrix> {
        let mut columns = Vec::with_capacity(n_images.saturating_sub(1));
        for i in Self::intermediate(n_images) {
            // image 01 额外提供 00 → 01 的距离
            if i == 1 {
                columns.push(self.distances(i, Neighbor::Previous)?);
            }
            columns.push(self.distances(i, Neighbor::Next)?);
        }
        StepMatrix::from_columns("distances", columns)
    }

    fn all_forces(&self, n_images: usize) -> Result<StepMatrix> {
        let columns = Self::intermediate(n_images)
            .map(|i| {
                outcar::read_log(&self.outcar(i)).map(|content| outcar::scan_max_forces(&content))
            })
            .collect::<Result<Vec<_>>>()?;
        StepMatrix::from_columns("forces", columns)
    }

    fn pathway(&self, n_images: usize, step: isize, initial: bool) -> Result<Vec<Crystal>> {
        (0..n_images)
            .map(|i| {
                let label = format!("{:02}", i);
                let mut crystal = if ImageRole::of(i, n_images).is_boundary() || initial {
                    poscar::parse_poscar_file(&self.image_dir(i).join("POSCAR"))?
                } else {
                    trajectory::read_snapshot(&self.outcar(i), step)?
                };
                crystal.name = label;
                Ok(crystal)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_images(root: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir_all(root.join(name)).unwrap();
        }
    }

    #[test]
    fn test_count_images() {
        for n in 3..8 {
            let dir = tempfile::tempdir().unwrap();
            let names: Vec<String> = (0..n).map(|i| format!("{:02}", i)).collect();
            let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            make_images(dir.path(), &refs);

            // 干扰项：非两位数字的目录和同名文件
            make_images(dir.path(), &["vtst", "1", "001"]);
            fs::write(dir.path().join("99"), "not a directory").unwrap();

            assert_eq!(VaspReader::new(dir.path()).count_images().unwrap(), n);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_count_images_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let run = dir.path().join("run");
        make_images(&run, &["00", "01"]);
        make_images(dir.path(), &["endpoint"]);
        std::os::unix::fs::symlink(dir.path().join("endpoint"), run.join("02")).unwrap();

        assert_eq!(VaspReader::new(&run).count_images().unwrap(), 3);
    }

    #[test]
    fn test_final_energy_of_empty_run() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VaspReader::new(dir.path()).final_energy(0),
            Err(NebError::InvalidRunDirectory(_))
        ));
    }

    #[test]
    fn test_count_images_rejects_gaps() {
        let dir = tempfile::tempdir().unwrap();
        make_images(dir.path(), &["00", "01", "03"]);

        assert!(matches!(
            VaspReader::new(dir.path()).count_images(),
            Err(NebError::InvalidRunDirectory(_))
        ));
    }

    #[test]
    fn test_count_images_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VaspReader::new(dir.path()).count_images(),
            Err(NebError::InvalidRunDirectory(_))
        ));
    }

    #[test]
    fn test_count_images_missing_dir() {
        assert!(matches!(
            VaspReader::new("/nonexistent/neb/run").count_images(),
            Err(NebError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_forces_without_markers_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        make_images(dir.path(), &["00", "01", "02"]);
        for name in ["00", "01", "02"] {
            fs::write(dir.path().join(name).join("OUTCAR"), "no markers\n").unwrap();
        }

        let forces = VaspReader::new(dir.path()).all_forces(3).unwrap();
        assert_eq!(forces.n_cols(), 1);
        assert!(forces.is_empty());
    }

    #[test]
    fn test_ragged_energies_rejected() {
        let dir = tempfile::tempdir().unwrap();
        make_images(dir.path(), &["00", "01", "02", "03"]);
        let line = "  energy  without entropy=  -1.0  energy(sigma->0) =  -1.0\n";
        fs::write(dir.path().join("01/OUTCAR"), line.repeat(2)).unwrap();
        fs::write(dir.path().join("02/OUTCAR"), line.repeat(3)).unwrap();

        assert!(matches!(
            VaspReader::new(dir.path()).all_energies(4),
            Err(NebError::ShapeMismatch { column: 1, .. })
        ));
    }
}
