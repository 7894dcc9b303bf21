// crates/pf_physics/src/engine/accumulator.rs

//! 残差累加器
//!
//! 将面上计算的通量累加到单元残差。同一单元的两个界面可能在
//! 不同线程上求解，因此通量施加要么按单元串行，要么（本实现）
//! 通过按线程的部分和在扫掠结束后合并。
//!
//! 约定：法向指向界面右侧，所有者单元（左侧）取负通量，
//! 邻居单元（右侧）取正通量。

use glam::DVec3;

/// 残差累加器
///
/// 按相的量以单元优先展平存储：索引 `cell * n_phases + k`。
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualAccumulator {
    n_cells: usize,
    n_phases: usize,
    n_transports: usize,
    /// 各相体积分数残差
    pub alpha: Vec<f64>,
    /// 各相质量残差
    pub mass: Vec<f64>,
    /// 各相能量残差
    pub energy: Vec<f64>,
    /// 动量残差
    pub momentum: Vec<DVec3>,
    /// 混合物能量残差
    pub energy_mixture: Vec<f64>,
    /// 被动输运标量残差
    pub transports: Vec<f64>,
}

impl ResidualAccumulator {
    /// 创建累加器
    pub fn new(n_cells: usize, n_phases: usize, n_transports: usize) -> Self {
        Self {
            n_cells,
            n_phases,
            n_transports,
            alpha: vec![0.0; n_cells * n_phases],
            mass: vec![0.0; n_cells * n_phases],
            energy: vec![0.0; n_cells * n_phases],
            momentum: vec![DVec3::ZERO; n_cells],
            energy_mixture: vec![0.0; n_cells],
            transports: vec![0.0; n_cells * n_transports],
        }
    }

    /// 单元数
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 相数
    pub fn n_phases(&self) -> usize {
        self.n_phases
    }

    /// 重置所有累加值为零
    pub fn reset(&mut self) {
        self.alpha.fill(0.0);
        self.mass.fill(0.0);
        self.energy.fill(0.0);
        self.momentum.fill(DVec3::ZERO);
        self.energy_mixture.fill(0.0);
        self.transports.fill(0.0);
    }

    /// 将通量按因子累加到单元
    ///
    /// `factor` 为 ±面积：所有者单元取 `-area`（通量流出为负），
    /// 邻居单元取 `+area`。
    #[inline]
    pub fn apply(&mut self, cell: usize, flux: &crate::riemann::FluxBuffer, factor: f64) {
        let base = cell * self.n_phases;
        for k in 0..self.n_phases {
            self.alpha[base + k] += factor * flux.alpha[k];
            self.mass[base + k] += factor * flux.mass[k];
            self.energy[base + k] += factor * flux.energy[k];
        }
        self.momentum[cell] += factor * flux.momentum;
        self.energy_mixture[cell] += factor * flux.energy_mixture;
        let tbase = cell * self.n_transports;
        for i in 0..self.n_transports {
            self.transports[tbase + i] += factor * flux.transports[i];
        }
    }

    /// 合并另一累加器的部分和
    pub fn merge(&mut self, other: &Self) {
        debug_assert_eq!(self.n_cells, other.n_cells);
        for (a, b) in self.alpha.iter_mut().zip(&other.alpha) {
            *a += b;
        }
        for (a, b) in self.mass.iter_mut().zip(&other.mass) {
            *a += b;
        }
        for (a, b) in self.energy.iter_mut().zip(&other.energy) {
            *a += b;
        }
        for (a, b) in self.momentum.iter_mut().zip(&other.momentum) {
            *a += *b;
        }
        for (a, b) in self.energy_mixture.iter_mut().zip(&other.energy_mixture) {
            *a += b;
        }
        for (a, b) in self.transports.iter_mut().zip(&other.transports) {
            *a += b;
        }
    }

    /// 单元的各相质量残差切片
    #[inline]
    pub fn mass_of(&self, cell: usize) -> &[f64] {
        &self.mass[cell * self.n_phases..(cell + 1) * self.n_phases]
    }

    /// 单元的各相体积分数残差切片
    #[inline]
    pub fn alpha_of(&self, cell: usize) -> &[f64] {
        &self.alpha[cell * self.n_phases..(cell + 1) * self.n_phases]
    }

    /// 单元的各相能量残差切片
    #[inline]
    pub fn energy_of(&self, cell: usize) -> &[f64] {
        &self.energy[cell * self.n_phases..(cell + 1) * self.n_phases]
    }

    /// 单元的被动输运标量残差切片
    #[inline]
    pub fn transports_of(&self, cell: usize) -> &[f64] {
        &self.transports[cell * self.n_transports..(cell + 1) * self.n_transports]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riemann::FluxBuffer;

    fn sample_flux() -> FluxBuffer {
        let mut flux = FluxBuffer::new(2, 1);
        flux.alpha = vec![0.1, 0.2];
        flux.mass = vec![1.0, 2.0];
        flux.energy = vec![10.0, 20.0];
        flux.momentum = DVec3::new(5.0, 0.0, 0.0);
        flux.energy_mixture = 7.0;
        flux.transports = vec![3.0];
        flux
    }

    #[test]
    fn test_apply_owner_neighbor_antisymmetric() {
        let mut acc = ResidualAccumulator::new(2, 2, 1);
        let flux = sample_flux();
        let area = 2.0;

        acc.apply(0, &flux, -area);
        acc.apply(1, &flux, area);

        // 所有者与邻居的贡献正好相消
        assert_eq!(acc.mass_of(0)[0], -2.0);
        assert_eq!(acc.mass_of(1)[0], 2.0);
        assert_eq!(acc.mass_of(0)[1] + acc.mass_of(1)[1], 0.0);
        assert_eq!(acc.momentum[0] + acc.momentum[1], DVec3::ZERO);
        assert_eq!(acc.energy_mixture[0] + acc.energy_mixture[1], 0.0);
        assert_eq!(acc.transports_of(0)[0] + acc.transports_of(1)[0], 0.0);
    }

    #[test]
    fn test_merge_partial_sums() {
        let flux = sample_flux();
        let mut a = ResidualAccumulator::new(2, 2, 1);
        let mut b = ResidualAccumulator::new(2, 2, 1);
        a.apply(0, &flux, 1.0);
        b.apply(0, &flux, 1.0);
        b.apply(1, &flux, -1.0);

        a.merge(&b);

        assert_eq!(a.mass_of(0)[0], 2.0);
        assert_eq!(a.mass_of(1)[0], -1.0);
        assert_eq!(a.energy_mixture[0], 14.0);
    }

    #[test]
    fn test_reset() {
        let mut acc = ResidualAccumulator::new(1, 2, 1);
        acc.apply(0, &sample_flux(), 1.0);
        acc.reset();
        assert!(acc.mass.iter().all(|&v| v == 0.0));
        assert!(acc.momentum.iter().all(|&v| v == DVec3::ZERO));
    }
}
