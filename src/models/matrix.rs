//! # 优化步矩阵
//!
//! 行 = 优化步，列 = image（或 image 间隙）。由每个 image 的序列按列堆叠得到，
//! 相当于把 per-image 序列转置。
//!
//! ## 依赖关系
//! - 被 `analyzer/` 使用

use crate::error::{NebError, Result};
use serde::{Deserialize, Serialize};

/// 解析步下标：负数从末尾计数
pub fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if resolved >= 0 && (resolved as usize) < len {
        Some(resolved as usize)
    } else {
        None
    }
}

/// 优化步 × 列 的二维数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMatrix {
    rows: Vec<Vec<f64>>,
    n_cols: usize,
}

impl StepMatrix {
    /// 由各列（每个 image 的逐步序列）构建矩阵
    ///
    /// 各列长度必须一致，否则返回 `ShapeMismatch`。
    pub fn from_columns(what: &str, columns: Vec<Vec<f64>>) -> Result<Self> {
        let n_cols = columns.len();
        let n_steps = columns.first().map(|c| c.len()).unwrap_or(0);

        if let Some((column, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != n_steps)
        {
            return Err(NebError::ShapeMismatch {
                what: what.to_string(),
                expected: n_steps,
                found: col.len(),
                column,
            });
        }

        let rows = (0..n_steps)
            .map(|step| columns.iter().map(|c| c[step]).collect())
            .collect();

        Ok(StepMatrix { rows, n_cols })
    }

    /// 优化步数
    pub fn n_steps(&self) -> usize {
        self.rows.len()
    }

    /// 列数
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 取某一优化步的所有列，支持负下标
    pub fn row(&self, step: isize) -> Result<&[f64]> {
        resolve_index(step, self.rows.len())
            .map(|i| self.rows[i].as_slice())
            .ok_or(NebError::StepOutOfRange {
                step,
                len: self.rows.len(),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(2, 3), Some(2));
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(-1, 0), None);
    }

    #[test]
    fn test_from_columns_transposes() {
        let m = StepMatrix::from_columns(
            "energies",
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();

        assert_eq!(m.n_steps(), 3);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.row(0).unwrap(), &[1.0, 4.0]);
        assert_eq!(m.row(-1).unwrap(), &[3.0, 6.0]);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = StepMatrix::from_columns("forces", vec![vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        match err {
            NebError::ShapeMismatch {
                expected,
                found,
                column,
                ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
                assert_eq!(column, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_columns() {
        let m = StepMatrix::from_columns("forces", vec![vec![], vec![]]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.n_cols(), 2);
        assert!(matches!(
            m.row(-1),
            Err(NebError::StepOutOfRange { step: -1, len: 0 })
        ));
    }
}
