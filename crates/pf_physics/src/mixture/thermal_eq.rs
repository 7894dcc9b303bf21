// crates/pf_physics/src/mixture/thermal_eq.rs

//! 热平衡封闭模型
//!
//! 各相共享单一压力与单一温度。该封闭只对至多两相的刚性气体族
//! 流体成立，其余配置在构造时报为致命错误。
//!
//! 提供以参考态 (p0, T0) 参数化的三个等熵关系（温度、比焓、比容，
//! 各带对压力的解析导数），以及两相刚性气体的解析混合压力/温度
//! 求解（无需迭代）。

use crate::eos::{EosSet, StiffenedCoefficients};
use crate::error::{ModelError, ModelResult};
use crate::state::CellState;

/// 热平衡封闭
///
/// 构造时校验相数与状态方程族，之后所有方法均假定约束成立。
pub struct ThermalEqClosure {
    eos: EosSet,
    coeffs: Vec<StiffenedCoefficients>,
}

impl ThermalEqClosure {
    /// 封闭模型名称
    pub const NAME: &'static str = "ThermalEq";

    /// 允许的最大相数
    pub const MAX_PHASES: usize = 2;

    /// 创建封闭模型
    ///
    /// 相数超过 2 或任一状态方程不属于刚性气体族时返回错误。
    pub fn new(eos: EosSet) -> ModelResult<Self> {
        if eos.is_empty() || eos.len() > Self::MAX_PHASES {
            return Err(ModelError::PhaseCount {
                closure: Self::NAME,
                actual: eos.len(),
                max: Self::MAX_PHASES,
            });
        }
        let mut coeffs = Vec::with_capacity(eos.len());
        for law in &eos {
            match law.stiffened_coefficients() {
                Some(c) => coeffs.push(c),
                None => {
                    return Err(ModelError::UnsupportedEos {
                        closure: Self::NAME,
                        eos: law.name().to_string(),
                    })
                }
            }
        }
        Ok(Self { eos, coeffs })
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
    /// 由混合物 (p, T) 反推各相密度，再按质量分数加权重算混合物
    /// 密度/能量/声速（声速为加权平方和再开方）。
    pub fn fulfill_state(&self, cell: &mut CellState) {
        let p = cell.mixture.pressure;
        let t = cell.mixture.temperature;

        for (k, phase) in cell.phases.iter_mut().enumerate() {
            phase.pressure = p;
            phase.density = self.eos[k].density(p, t);
            phase.energy = self.eos[k].energy(phase.density, p);
            phase.sound_speed = self.eos[k].sound_speed(phase.density, p);
        }

        let rho = cell.phases.mixture_density();
        let mut energy = 0.0;
        let mut c2 = 0.0;
        for k in 0..cell.phases.len() {
            let yk = cell.phases.mass_fraction(k, rho);
            energy += yk * cell.phases[k].energy;
            c2 += yk * cell.phases[k].sound_speed * cell.phases[k].sound_speed;
        }
        cell.mixture.density = rho;
        cell.mixture.energy = energy;
        cell.mixture.sound_speed = c2.sqrt();
    }

    /// 混合物密度 Σ α_k ρ_k
    pub fn mixture_density(&self, alpha: &[f64], rho: &[f64]) -> f64 {
        alpha.iter().zip(rho).map(|(a, r)| a * r).sum()
    }

    // --------------------------------------------------------------------
    // 解析混合压力 / 温度（两相刚性气体）
    // --------------------------------------------------------------------

    /// 由各相体积质量与混合物比内能解析求混合压力
    ///
    /// 两相刚性气体的压力满足一个二次方程，直接取物理可容许根：
    /// `0.5(A1+A2-(pInf1+pInf2)) + sqrt(判别式)`。单相时退化为该相
    /// 状态方程的直接反演。
    pub fn pressure_from_masses(&self, masses: &[f64], mix_energy: f64) -> f64 {
        let rho_mix: f64 = masses.iter().sum();
        if self.coeffs.len() == 1 {
            return self.eos[0].pressure(rho_mix, mix_energy);
        }

        let c1 = &self.coeffs[0];
        let c2 = &self.coeffs[1];
        let y1 = masses[0] / rho_mix;
        let y2 = masses[1] / rho_mix;

        let q = y1 * c1.e_ref + y2 * c2.e_ref;
        let cv_mix = y1 * c1.cv + y2 * c2.cv;

        let a1 = y1 * (c1.gamma - 1.0) * c1.cv / cv_mix
            * (rho_mix * (mix_energy - q) - c1.p_inf);
        let a2 = y2 * (c2.gamma - 1.0) * c2.cv / cv_mix
            * (rho_mix * (mix_energy - q) - c2.p_inf);

        0.5 * (a1 + a2 - (c1.p_inf + c2.p_inf))
            + (0.25 * (a2 - a1 - (c2.p_inf - c1.p_inf)) * (a2 - a1 - (c2.p_inf - c1.p_inf))
                + a1 * a2)
                .sqrt()
    }

    /// 由各相体积质量与混合压力求平衡温度
    pub fn temperature_from_masses(&self, masses: &[f64], pressure: f64) -> f64 {
        let rho_mix: f64 = masses.iter().sum();
        let mut inv_t = 0.0;
        for (k, c) in self.coeffs.iter().enumerate() {
            let yk = masses[k] / rho_mix;
            inv_t += yk * (c.gamma - 1.0) * c.cv / (pressure + c.p_inf);
        }
        1.0 / (inv_t * rho_mix)
    }

    // --------------------------------------------------------------------
    // 混合物等熵关系
    // --------------------------------------------------------------------

    /// 等熵线上的温度与 dT/dp
    ///
    /// T(p) = T0 · Π_k ((p+pInf_k)/(p0+pInf_k))^β_k，
    /// β_k = (γ_k-1) Y_k cv_k / Σ Y γ cv。
    pub fn temperature_isentrope(&self, yk: &[f64], p0: f64, t0: f64, p: f64) -> (f64, f64) {
        let cm: f64 = self
            .coeffs
            .iter()
            .zip(yk)
            .map(|(c, y)| y * c.gamma * c.cv)
            .sum();

        let mut t = t0;
        let mut dt_dp = 0.0;
        for (c, y) in self.coeffs.iter().zip(yk) {
            let beta = (c.gamma - 1.0) * y * c.cv / cm;
            t *= ((p + c.p_inf) / (p0 + c.p_inf)).powf(beta);
            dt_dp += beta / (p + c.p_inf);
        }
        dt_dp *= t;
        (t, dt_dp)
    }

    /// 等熵线上的比焓与 dh/dp
    pub fn enthalpy_isentrope(&self, yk: &[f64], p0: f64, t0: f64, p: f64) -> (f64, f64) {
        let (t, dt_dp) = self.temperature_isentrope(yk, p0, t0, p);
        let mut h = 0.0;
        let mut dh_dp = 0.0;
        for (c, y) in self.coeffs.iter().zip(yk) {
            h += y * (c.gamma * c.cv * t + c.e_ref);
            dh_dp += y * c.gamma * c.cv * dt_dp;
        }
        (h, dh_dp)
    }

    /// 等熵线上的比容与 dv/dp
    pub fn volume_isentrope(&self, yk: &[f64], p0: f64, t0: f64, p: f64) -> (f64, f64) {
        let (t, dt_dp) = self.temperature_isentrope(yk, p0, t0, p);
        let mut v = 0.0;
        let mut dv_dp = 0.0;
        for (c, y) in self.coeffs.iter().zip(yk) {
            let vk = (c.gamma - 1.0) * c.cv * t / (p + c.p_inf);
            let dvk = ((c.gamma - 1.0) * c.cv * dt_dp - vk) / (p + c.p_inf);
            v += y * vk;
            dv_dp += y * dvk;
        }
        (v, dv_dp)
    }
}
