//! # 原子结构数据模型
//!
//! 定义 NEB 路径上每个 image 的结构表示，可以来自 POSCAR 或 OUTCAR 轨迹。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `viz/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶格表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 晶胞中心的笛卡尔坐标 (a + b + c) / 2
    pub fn center(&self) -> [f64; 3] {
        self.frac_to_cart([0.5, 0.5, 0.5])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标
    ///
    /// 奇异晶格（体积接近 0）原样返回输入。
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // 行向量约定: cart = frac · M，故 frac = cart · M⁻¹
        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 单个 image 的结构快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// energy(sigma->0) (eV)
    pub energy: Option<f64>,

    /// free energy TOTEN (eV)
    pub free_energy: Option<f64>,

    /// 每个原子的受力 (eV/Å)，与 `atoms` 一一对应
    pub forces: Option<Vec<[f64; 3]>>,

    /// 来源文件格式
    pub source_format: Option<String>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
            energy: None,
            free_energy: None,
            forces: None,
            source_format: None,
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 所有原子的笛卡尔坐标
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| self.lattice.frac_to_cart(a.position))
            .collect()
    }

    /// 最大原子受力模长
    pub fn max_force(&self) -> Option<f64> {
        self.forces.as_ref().and_then(|forces| {
            forces
                .iter()
                .map(|f| norm(*f))
                .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |m| m.max(x))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    #[test]
    fn test_lattice_parameters_cubic() {
        let (a, b, c, alpha, beta, gamma) = cubic(4.0).parameters();

        assert!((a - 4.0).abs() < 1e-6);
        assert!((b - 4.0).abs() < 1e-6);
        assert!((c - 4.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        // 5^3 = 125
        assert!((cubic(5.0).volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_frac_cart_conversion_hexagonal() {
        let lattice = Lattice::from_vectors([
            [3.0, 0.0, 0.0],
            [-1.5, 2.598076211, 0.0],
            [0.0, 0.0, 5.0],
        ]);
        let frac = [0.25, 0.6, 0.1];
        let cart = lattice.frac_to_cart(frac);
        let back = lattice.cart_to_frac(cart);

        for i in 0..3 {
            assert!((back[i] - frac[i]).abs() < 1e-9);
        }

        let (_, _, _, _, _, gamma) = lattice.parameters();
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_lattice_center() {
        let center = cubic(6.0).center();
        assert_eq!(center, [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_crystal_formula() {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.0]),
            Atom::new("H", [0.1, 0.0, 0.0]),
            Atom::new("H", [0.0, 0.1, 0.0]),
        ];
        let crystal = Crystal::new("water", cubic(10.0), atoms);
        assert_eq!(crystal.formula(), "H2O");
    }

    #[test]
    fn test_crystal_max_force() {
        let mut crystal = Crystal::new(
            "pair",
            cubic(10.0),
            vec![Atom::new("H", [0.0; 3]), Atom::new("H", [0.5; 3])],
        );
        assert!(crystal.max_force().is_none());

        crystal.forces = Some(vec![[0.3, 0.4, 0.0], [0.0, 0.0, -0.1]]);
        assert!((crystal.max_force().unwrap() - 0.5).abs() < 1e-12);
    }
}
