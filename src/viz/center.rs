//! # 路径结构居中
//!
//! 把参考 image 中选定原子的质心平移到晶胞中心，所有 image 使用同一个平移量，
//! 然后将分数坐标折回 [0, 1)。便于观察跨越周期边界的吸附物。
//!
//! ## 依赖关系
//! - 被 `commands/pathway.rs` 使用
//! - 使用 `models/elements.rs` 的原子量

use crate::error::{NebError, Result};
use crate::models::elements::atomic_mass;
use crate::models::Crystal;

/// 居中路径上的所有结构
///
/// `indices` 为 `None` 时使用参考 image 的全部原子。未知元素按质量 1.0 计。
pub fn center_atoms(
    structures: &[Crystal],
    indices: Option<&[usize]>,
    reference_image: usize,
) -> Result<Vec<Crystal>> {
    let reference = structures.get(reference_image).ok_or_else(|| {
        NebError::InvalidArgument(format!(
            "reference image {} out of range for {} images",
            reference_image,
            structures.len()
        ))
    })?;

    let selected: Vec<usize> = match indices {
        Some(list) => list.to_vec(),
        None => (0..reference.atoms.len()).collect(),
    };
    if selected.is_empty() {
        return Err(NebError::InvalidArgument(
            "no atoms selected for centering".to_string(),
        ));
    }
    if let Some(&bad) = selected.iter().find(|&&i| i >= reference.atoms.len()) {
        return Err(NebError::InvalidArgument(format!(
            "atom index {} out of range for {} atoms",
            bad,
            reference.atoms.len()
        )));
    }

    let com = center_of_mass(reference, &selected);
    let target = reference.lattice.center();
    let shift = [target[0] - com[0], target[1] - com[1], target[2] - com[2]];
    log::debug!(
        "centering {} atoms of image {}: shift ({:.4}, {:.4}, {:.4})",
        selected.len(),
        reference.name,
        shift[0],
        shift[1],
        shift[2]
    );

    Ok(structures
        .iter()
        .map(|crystal| {
            let mut moved = crystal.clone();
            for atom in moved.atoms.iter_mut() {
                let cart = crystal.lattice.frac_to_cart(atom.position);
                let frac = crystal.lattice.cart_to_frac([
                    cart[0] + shift[0],
                    cart[1] + shift[1],
                    cart[2] + shift[2],
                ]);
                atom.position = frac.map(wrap_unit);
            }
            moved
        })
        .collect())
}

/// 质心的笛卡尔坐标
fn center_of_mass(crystal: &Crystal, selected: &[usize]) -> [f64; 3] {
    let positions = crystal.cartesian_positions();
    let mut total = 0.0;
    let mut sum = [0.0; 3];

    for &i in selected {
        let mass = atomic_mass(&crystal.atoms[i].element).unwrap_or(1.0);
        total += mass;
        for k in 0..3 {
            sum[k] += mass * positions[i][k];
        }
    }
    sum.map(|s| s / total)
}

fn wrap_unit(x: f64) -> f64 {
    let w = x.rem_euclid(1.0);
    // rem_euclid 对极小的负数可能返回 1.0
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}
