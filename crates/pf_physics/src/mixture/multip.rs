// crates/pf_physics/src/mixture/multip.rs

//! 多压力封闭模型
//!
//! 仅机械弛豫：各相保留独立的压力与温度。混合物量为各相量的
//! 体积/质量分数加权和，封闭本身不内嵌任何跨相热力学耦合——
//! 边界求解器需要的耦合由黎曼求解器逐相调用状态方程完成。

use crate::eos::EosSet;
use crate::state::CellState;

/// 多压力封闭
pub struct MultiPClosure {
    eos: EosSet,
}

impl MultiPClosure {
    /// 封闭模型名称
    pub const NAME: &'static str = "MultiP";

    /// 创建封闭模型（对相数与状态方程族无限制）
    pub fn new(eos: EosSet) -> Self {
        Self { eos }
    }

    /// 状态方程集
    pub fn eos(&self) -> &EosSet {
        &self.eos
    }

    /// 相数
    pub fn n_phases(&self) -> usize {
        self.eos.len()
    }

    /// 状态补全
    ///
    /// 由各相 (ρ_k, p_k) 补全能量与声速，再做加权和得到混合物量：
    /// ρ = Σ α_k ρ_k，p = Σ α_k p_k，e = Σ Y_k e_k，
    /// 冻结声速 c = sqrt(Σ Y_k c_k²)。
    pub fn fulfill_state(&self, cell: &mut CellState) {
        for (k, phase) in cell.phases.iter_mut().enumerate() {
            phase.energy = self.eos[k].energy(phase.density, phase.pressure);
            phase.sound_speed = self.eos[k].sound_speed(phase.density, phase.pressure);
        }

        let rho = cell.phases.mixture_density();
        let mut pressure = 0.0;
        let mut energy = 0.0;
        let mut c2 = 0.0;
        for k in 0..cell.phases.len() {
            let phase = &cell.phases[k];
            let yk = cell.phases.mass_fraction(k, rho);
            pressure += phase.alpha * phase.pressure;
            energy += yk * phase.energy;
            c2 += yk * phase.sound_speed * phase.sound_speed;
        }
        cell.mixture.density = rho;
        cell.mixture.pressure = pressure;
        cell.mixture.energy = energy;
        cell.mixture.sound_speed = c2.sqrt();
    }
}
