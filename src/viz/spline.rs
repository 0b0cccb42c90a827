//! # 自然三次样条
//!
//! 端点二阶导数为零的三次样条插值，用于平滑能量曲线。

use crate::error::{NebError, Result};

/// 自然三次样条
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// 各节点处的二阶导数
    m: Vec<f64>,
}

impl NaturalCubicSpline {
    /// 由节点构建样条，`xs` 必须严格递增
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(NebError::InvalidArgument(format!(
                "spline needs equal-length inputs, got {} x and {} y",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(NebError::InvalidArgument(
                "spline needs at least 2 points".to_string(),
            ));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(NebError::InvalidArgument(
                "spline x values must be strictly increasing".to_string(),
            ));
        }

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let mut m = vec![0.0; n];

        if n > 2 {
            // 三对角方程组 (Thomas 算法)，未知量为 m[1..n-1]
            let size = n - 2;
            let mut diag = vec![0.0; size];
            let mut upper = vec![0.0; size];
            let mut rhs = vec![0.0; size];

            for k in 0..size {
                let i = k + 1;
                diag[k] = 2.0 * (h[i - 1] + h[i]);
                upper[k] = h[i];
                rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            }

            for k in 1..size {
                let lower = h[k];
                let w = lower / diag[k - 1];
                diag[k] -= w * upper[k - 1];
                rhs[k] -= w * rhs[k - 1];
            }

            m[size] = rhs[size - 1] / diag[size - 1];
            for k in (0..size - 1).rev() {
                m[k + 1] = (rhs[k] - upper[k] * m[k + 2]) / diag[k];
            }
        }

        Ok(NaturalCubicSpline {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    /// 在 `x` 处求值，区间外按端点段外推
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.partition_point(|&xi| xi <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }

    /// 在 [x_first, x_last] 上以固定步长采样，包含两个端点
    pub fn sample(&self, step: f64) -> Vec<(f64, f64)> {
        let start = self.xs[0];
        let end = self.xs[self.xs.len() - 1];
        let count = ((end - start) / step).ceil() as usize;

        let mut points: Vec<(f64, f64)> = (0..count)
            .map(|k| start + k as f64 * step)
            .take_while(|&x| x < end)
            .map(|x| (x, self.eval(x)))
            .collect();
        points.push((end, self.eval(end)));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_knots() {
        let xs = [0.0, 1.0, 2.2, 3.3, 4.2];
        let ys = [46.1, 69.2, 80.7, 57.7, 0.0];
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();

        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.eval(*x) - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_three_point_value() {
        // 手算: M1 = -3, S(0.5) = -3 * 0.125 / 6 + 1.5 * 0.5
        let spline = NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!((spline.eval(0.5) - 0.6875).abs() < 1e-12);
        assert!((spline.eval(1.5) - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let spline = NaturalCubicSpline::new(&[0.0, 1.0, 3.0, 4.0], &[1.0, 3.0, 7.0, 9.0]).unwrap();
        assert!((spline.eval(2.0) - 5.0).abs() < 1e-9);
        assert!((spline.eval(3.5) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_points() {
        let spline = NaturalCubicSpline::new(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
        assert!((spline.eval(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_increasing() {
        assert!(NaturalCubicSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
        assert!(NaturalCubicSpline::new(&[0.0], &[0.0]).is_err());
    }

    #[test]
    fn test_sample_covers_range() {
        let spline = NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        let points = spline.sample(0.001);

        assert_eq!(points.first().unwrap().0, 0.0);
        assert_eq!(points.last().unwrap().0, 2.0);
        assert!(points.windows(2).all(|w| w[1].0 > w[0].0));
    }
}
