//! # 单位换算
//!
//! 能量单位换算常数（CODATA 2014，与 ASE 一致）。

/// 1 eV 对应的 kcal/mol
pub const EV_TO_KCAL_PER_MOL: f64 = 23.060_547_830_619_026;

/// eV 转 kcal/mol
pub fn ev_to_kcal_per_mol(ev: f64) -> f64 {
    ev * EV_TO_KCAL_PER_MOL
}

/// kcal/mol 转 eV
pub fn kcal_per_mol_to_ev(kcal: f64) -> f64 {
    kcal / EV_TO_KCAL_PER_MOL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for ev in [-123.456789, -1.0, 0.0, 0.0421, 7.5] {
            let back = kcal_per_mol_to_ev(ev_to_kcal_per_mol(ev));
            assert!((back - ev).abs() < 1e-12);
        }
    }

    #[test]
    fn test_one_ev() {
        assert!((ev_to_kcal_per_mol(1.0) - 23.0605).abs() < 1e-3);
    }
}
