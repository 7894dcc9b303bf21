// crates/pf_physics/src/riemann/multip.rs

//! 多压力封闭下的黎曼求解器
//!
//! 内部界面为 Davis 波速估计的三波近似解；星区内各相的密度/压力/
//! 能量由该相自己的等熵关系从波前状态求到星区压力（异质弛豫）。
//! 边界半求解器逐相调用状态方程，不依赖任何单一混合物温度。

use glam::DVec3;

use pf_foundation::NumericalTolerance;

use crate::boundary::{InflowParameters, ReservoirState};
use crate::eos::EosSet;
use crate::error::{ModelError, ModelResult};
use crate::state::CellState;

use super::flux::{FluxBuffer, InterfaceBasis};
use super::traits::{DtBound, RiemannSolver};

/// 多压力黎曼求解器
pub struct MultiPRiemann {
    eos: EosSet,
    tol: NumericalTolerance,
}

impl MultiPRiemann {
    /// 创建求解器
    pub fn new(eos: EosSet) -> Self {
        Self {
            eos,
            tol: NumericalTolerance::default(),
        }
    }

    /// 指定数值容差
    pub fn with_tolerance(mut self, tol: NumericalTolerance) -> Self {
        self.tol = tol;
        self
    }

    /// 状态方程集
    pub fn eos(&self) -> &EosSet {
        &self.eos
    }

    /// 单侧完整状态的通量（超声速采样分支）
    fn uniform_flux(
        &self,
        cell: &CellState,
        u: f64,
        v: f64,
        w: f64,
        s_m: f64,
        flux: &mut FluxBuffer,
    ) {
        let mix = &cell.mixture;
        for (k, phase) in cell.phases.iter().enumerate() {
            flux.alpha[k] = phase.alpha * s_m;
            flux.mass[k] = phase.alpha * phase.density * u;
            flux.energy[k] = phase.alpha * phase.density * phase.energy * u;
        }
        let total_energy = mix.total_energy();
        flux.momentum = DVec3::new(
            mix.density * u * u + mix.pressure,
            mix.density * v * u,
            mix.density * w * u,
        );
        flux.energy_mixture = (mix.density * total_energy + mix.pressure) * u;
    }

    /// 星区采样分支的通量
    ///
    /// `m_mix` 为混合物质量流量 ρ(s-u)，`s` 为对应侧的外波速。
    #[allow(clippy::too_many_arguments)]
    fn star_flux(
        &self,
        cell: &CellState,
        u: f64,
        v: f64,
        w: f64,
        s: f64,
        s_m: f64,
        m_mix: f64,
        flux: &mut FluxBuffer,
    ) {
        let mix = &cell.mixture;
        let total_energy = mix.total_energy();
        let rho_star = m_mix / (s - s_m);
        let e_star = total_energy + (s_m - u) * (s_m + mix.pressure / m_mix);
        let p_star = m_mix * (s_m - u) + mix.pressure;

        for (k, phase) in cell.phases.iter().enumerate() {
            let mk = phase.density * (s - u);
            let rhok_star = mk / (s - s_m);
            let pk_star =
                self.eos[k].pressure_isentropic(phase.pressure, phase.density, rhok_star);
            let ek_star = self.eos[k].energy(rhok_star, pk_star);
            flux.alpha[k] = phase.alpha * s_m;
            flux.mass[k] = phase.alpha * rhok_star * s_m;
            flux.energy[k] = phase.alpha * rhok_star * ek_star * s_m;
        }
        flux.momentum = DVec3::new(
            rho_star * s_m * s_m + p_star,
            rho_star * v * s_m,
            rho_star * w * s_m,
        );
        flux.energy_mixture = (rho_star * e_star + p_star) * s_m;
    }
}

impl RiemannSolver for MultiPRiemann {
    fn name(&self) -> &'static str {
        "MultiP"
    }

    fn n_phases(&self) -> usize {
        self.eos.len()
    }

    fn eos_set(&self) -> &EosSet {
        &self.eos
    }

    fn solve_interface(
        &self,
        left: &CellState,
        right: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dx_right: f64,
        dt: &mut DtBound,
        flux: &mut FluxBuffer,
    ) {
        let (u_l, v_l, w_l) = basis.local_components(left.mixture.velocity);
        let (u_r, v_r, w_r) = basis.local_components(right.mixture.velocity);
        let (c_l, p_l, rho_l) = (
            left.mixture.sound_speed,
            left.mixture.pressure,
            left.mixture.density,
        );
        let (c_r, p_r, rho_r) = (
            right.mixture.sound_speed,
            right.mixture.pressure,
            right.mixture.density,
        );

        // Davis 波速估计
        let s_l = (u_l - c_l).min(u_r - c_r);
        let s_r = (u_r + c_r).max(u_l + c_l);
        dt.restrict(dx_left, s_l);
        dt.restrict(dx_right, s_r);

        // 左右质量流量与接触波速
        let m_l = rho_l * (s_l - u_l);
        let m_r = rho_r * (s_r - u_r);
        let mut s_m = (p_r - p_l + m_l * u_l - m_r * u_r) / (m_l - m_r);
        if s_m.abs() < self.tol.sm_zero {
            s_m = 0.0;
        }

        // 按区域采样
        if s_l >= 0.0 {
            self.uniform_flux(left, u_l, v_l, w_l, s_m, flux);
        } else if s_r <= 0.0 {
            self.uniform_flux(right, u_r, v_r, w_r, s_m, flux);
        } else if s_m >= 0.0 {
            self.star_flux(left, u_l, v_l, w_l, s_l, s_m, m_l, flux);
        } else {
            self.star_flux(right, u_r, v_r, w_r, s_r, s_m, m_r, flux);
        }

        flux.s_m = s_m;
        flux.reverse_projection(basis);
    }

    fn solve_outflow(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        p0: f64,
        flux: &mut FluxBuffer,
        mass_rates: &mut [f64],
    ) {
        let n = self.eos.len();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l) = (mix.sound_speed, mix.pressure, mix.density);
        let e_l = mix.total_energy();

        let z_l = rho_l * c_l;
        let mut p_star = p0;

        // 左行等熵波假设：各相经 Hugoniot 关系到 p0
        let mut rhok_star = vec![0.0; n];
        let mut v_star = 0.0;
        for (k, phase) in left.phases.iter().enumerate() {
            let (rk, _) = self.eos[k].density_hugoniot(p_l, phase.density, p_star);
            rhok_star[k] = rk;
            v_star += phase.alpha * phase.density / rho_l / rk;
        }
        let v_jump = v_star - 1.0 / rho_l;
        let m_l = if v_jump.abs() > self.tol.volume_jump {
            ((p_l - p_star) / v_jump).sqrt()
        } else {
            z_l
        };
        let s_l = u_l - m_l / rho_l;
        dt.restrict(dx_left, s_l);
        let mut u_star = u_l + m_l * v_jump;

        let e_star;
        if s_l >= 0.0 || u_star < 0.0 {
            // 超声速出流，或接触速度指示实际入流：出流假设失效，
            // 原样复制左状态
            u_star = u_l;
            p_star = p_l;
            for (k, phase) in left.phases.iter().enumerate() {
                rhok_star[k] = phase.density;
            }
            v_star = 1.0 / rho_l;
            e_star = e_l;
        } else {
            e_star = e_l + (u_star - u_l) * (u_star - p_l / m_l);
        }

        // 通量完成
        for (k, phase) in left.phases.iter().enumerate() {
            let yk_l = phase.alpha * phase.density / rho_l;
            let ek_star = self.eos[k].energy(rhok_star[k], p_star);
            flux.alpha[k] = yk_l / rhok_star[k] / v_star * u_star;
            flux.mass[k] = flux.alpha[k] * rhok_star[k];
            flux.energy[k] = flux.mass[k] * ek_star;
        }
        flux.momentum = DVec3::new(
            u_star * u_star / v_star + p_star,
            u_star * v_l / v_star,
            u_star * w_l / v_star,
        );
        flux.energy_mixture = (e_star / v_star + p_star) * u_star;
        flux.s_m = u_star;

        // 各相穿越边界的质量流量输出
        mass_rates.copy_from_slice(&flux.mass);

        flux.reverse_projection(basis);
    }

    fn solve_inflow(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        inflow: &InflowParameters,
        flux: &mut FluxBuffer,
    ) -> ModelResult<()> {
        let n = self.eos.len();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l) = (mix.sound_speed, mix.pressure, mix.density);

        // 注入流体的各相总焓与质量分数
        let rho0 = inflow.mixture_density();
        let u0 = inflow.m0 / rho0;
        let mut h0 = vec![0.0; n];
        let mut yk0 = vec![0.0; n];
        for k in 0..n {
            h0[k] = self.eos[k].total_enthalpy(inflow.density[k], inflow.pressure[k], u0);
            yk0[k] = inflow.alpha[k] * inflow.density[k] / rho0;
        }

        // 声波波速估计
        let s_l = u_l - c_l;
        dt.restrict(dx_left, s_l);
        let z_l = rho_l * c_l;

        // 星区压力的牛顿迭代：由 m0 与速度推出的比容 等于
        // 各相 v_k(p, h_k) 的质量分数加权和
        let mut p_star = p_l;
        let mut vk_star = vec![0.0; n];
        let mut f = 0.0;
        let mut df = 1.0;
        let mut u;
        let mut v;
        let mut iterations = 0;
        loop {
            p_star -= f / df;
            iterations += 1;
            if iterations > self.tol.newton_max_iterations {
                return Err(ModelError::non_convergence(
                    "MultiP::solve_inflow",
                    self.tol.newton_max_iterations,
                    f.abs(),
                ));
            }
            for law in &self.eos {
                p_star = law.clamp_pressure(p_star);
            }
            // 左侧声学关系
            u = u_l + (p_l - p_star) / z_l;
            if u >= -1e-6 {
                u = -1e-6;
            }
            let du = -1.0 / z_l;
            // 右侧由 m0, Hk0, Yk0 给出
            v = u / inflow.m0;
            let dv = du / inflow.m0;
            f = v;
            df = dv;
            for k in 0..n {
                let hk = h0[k] - 0.5 * u * u;
                vk_star[k] = self.eos[k].specific_volume(p_star, hk);
                let dvk = self.eos[k].dv_dp_h(p_star, hk)
                    - self.eos[k].dv_dh_p(p_star, hk) * u * du;
                f -= yk0[k] * vk_star[k];
                df -= yk0[k] * dvk;
            }
            if f.abs() <= self.tol.inflow_convergence {
                break;
            }
        }

        // 通量完成
        let mut e_star = 0.5 * (u * u + v_l * v_l + w_l * w_l);
        for k in 0..n {
            let rhok = 1.0 / vk_star[k];
            let ek = self.eos[k].energy(rhok, p_star);
            e_star += yk0[k] * ek;
            flux.alpha[k] = yk0[k] * vk_star[k] / v * u;
            flux.mass[k] = flux.alpha[k] * rhok;
            flux.energy[k] = flux.alpha[k] * rhok * ek;
        }
        flux.momentum = DVec3::new(u * u / v + p_star, u * v_l / v, u * w_l / v);
        flux.energy_mixture = (e_star / v + p_star) * u;
        flux.s_m = u;
        flux.reverse_projection(basis);
        Ok(())
    }

    fn solve_tank(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        reservoir: &ReservoirState,
        flux: &mut FluxBuffer,
    ) -> ModelResult<()> {
        let n = self.eos.len();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l) = (mix.sound_speed, mix.pressure, mix.density);
        let p0 = reservoir.pressure;

        let z_l = rho_l * c_l;

        // 1) 用 pStar = p0 估计左波速
        let mut p_star = p0;
        let mut rhok_star = vec![0.0; n];
        let mut v_star = 0.0;
        for (k, phase) in left.phases.iter().enumerate() {
            let (rk, _) = self.eos[k].density_hugoniot(phase.pressure, phase.density, p_star);
            rhok_star[k] = rk;
            v_star += phase.alpha * phase.density / rho_l / rk;
        }
        let mut v_jump = v_star - 1.0 / rho_l;
        let mut m_l = if v_jump.abs() > self.tol.volume_jump {
            ((p_l - p_star) / v_jump).sqrt()
        } else {
            z_l
        };
        let mut s_l = u_l - m_l / rho_l;
        dt.restrict(dx_left, s_l);
        let s_m = u_l + m_l * v_jump;

        // 2) 病态情形判别
        let mut yk_star = vec![0.0; n];
        let u_star;
        let rho_star;
        let uy_star;
        let uz_star;
        if s_l >= 0.0 {
            // 超声速出流：左状态即解
            u_star = u_l;
            p_star = p_l;
            for (k, phase) in left.phases.iter().enumerate() {
                rhok_star[k] = phase.density;
                yk_star[k] = phase.alpha * phase.density / rho_l;
            }
            rho_star = rho_l;
            uy_star = v_l;
            uz_star = w_l;
        } else if s_m >= -1e-3 {
            // 亚声速出流：星左状态，压力近似取 p0
            u_star = s_m;
            p_star = p0;
            for (k, phase) in left.phases.iter().enumerate() {
                // rhok_star 保持步骤 1) 的值
                yk_star[k] = phase.alpha * phase.density / rho_l;
            }
            rho_star = 1.0 / v_star;
            uy_star = v_l;
            uz_star = w_l;
        } else {
            // 3) 真实储罐入流：压力的牛顿迭代
            let rho0 = reservoir.mixture_density();
            let mut yk0 = vec![0.0; n];
            let mut h_total = 0.0;
            for k in 0..n {
                yk0[k] = reservoir.alpha[k] * reservoir.density[k] / rho0;
                // 储罐内默认静止
                h_total +=
                    yk0[k] * self.eos[k].total_enthalpy(reservoir.density[k], p0, 0.0);
            }

            let mut p = 0.5 * p0;
            let mut f = 0.0;
            let mut df = 1.0;
            let mut u_star_l;
            let mut u_star_r;
            let mut iterations = 0;
            loop {
                p -= f / df;
                iterations += 1;
                if iterations > self.tol.newton_max_iterations {
                    return Err(ModelError::non_convergence(
                        "MultiP::solve_tank",
                        self.tol.newton_max_iterations,
                        f.abs(),
                    ));
                }
                for law in &self.eos {
                    p = law.clamp_pressure(p);
                }
                if p > p0 {
                    p = p0 - 1e-6;
                }
                // R) 储罐侧关系（H 与各相熵守恒）
                let mut h_sum = h_total;
                let mut dh_sum = 0.0;
                for k in 0..n {
                    let (rk, _) = self.eos[k].density_isentropic(p0, reservoir.density[k], p);
                    rhok_star[k] = rk;
                    let (hk, dhk) =
                        self.eos[k].enthalpy_isentropic(p0, reservoir.density[k], p);
                    h_sum -= yk0[k] * hk;
                    dh_sum -= yk0[k] * dhk;
                }
                u_star_r = -(2.0 * h_sum).sqrt();
                let du_star_r = dh_sum / u_star_r;
                // L) 域侧关系（各相熵守恒）
                let mut v_star_l = 0.0;
                let mut dv_star_l = 0.0;
                for (k, phase) in left.phases.iter().enumerate() {
                    let (rk, drk) =
                        self.eos[k].density_hugoniot(phase.pressure, phase.density, p);
                    let yk_l = phase.alpha * phase.density / rho_l;
                    v_star_l += yk_l / rk;
                    dv_star_l -= yk_l / (rk * rk) * drk;
                }
                v_jump = v_star_l - 1.0 / rho_l;
                let dm_l;
                if v_jump.abs() > self.tol.volume_jump {
                    m_l = ((p_l - p) / v_jump).sqrt();
                    dm_l = 0.5 * (-v_jump + (p - p_l) * dv_star_l) / (v_jump * v_jump) / m_l;
                } else {
                    m_l = z_l;
                    dm_l = 0.0;
                }
                s_l = u_l - m_l / rho_l;
                dt.restrict(dx_left, s_l);
                u_star_l = u_l + m_l * v_jump;
                let du_star_l = dm_l * v_jump + m_l * dv_star_l;
                f = u_star_r - u_star_l;
                df = du_star_r - du_star_l;
                if f.abs() <= self.tol.tank_convergence {
                    break;
                }
            }
            p_star = p;
            u_star = 0.5 * (u_star_l + u_star_r);
            let mut v_sum = 0.0;
            for k in 0..n {
                yk_star[k] = yk0[k];
                v_sum += yk_star[k] / rhok_star[k];
            }
            rho_star = 1.0 / v_sum;
            uy_star = 0.0;
            uz_star = 0.0;
        }

        // 4) 通量完成
        let mut e_star = 0.5 * (u_star * u_star + uy_star * uy_star + uz_star * uz_star);
        for k in 0..n {
            let ek = self.eos[k].energy(rhok_star[k], p_star);
            e_star += yk_star[k] * ek;
            flux.alpha[k] = yk_star[k] * rho_star / rhok_star[k] * u_star;
            flux.mass[k] = flux.alpha[k] * rhok_star[k];
            flux.energy[k] = flux.mass[k] * ek;
        }
        flux.momentum = DVec3::new(
            rho_star * u_star * u_star + p_star,
            rho_star * u_star * uy_star,
            rho_star * u_star * uz_star,
        );
        flux.energy_mixture = (rho_star * e_star + p_star) * u_star;
        flux.s_m = s_m;
        flux.reverse_projection(basis);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Composition;
    use crate::eos::{EquationOfState, IdealGas, StiffenedGas};
    use crate::mixture::MultiPClosure;
    use crate::state::{MixtureState, PhaseState, Phases};
    use std::sync::Arc;

    fn eos_set() -> EosSet {
        vec![
            Arc::new(StiffenedGas::new("water", 4.4, 6.0e8, 1000.0, 0.0, 0.0).unwrap())
                as Arc<dyn EquationOfState>,
            Arc::new(IdealGas::new("air", 1.4, 717.5, 0.0, 0.0).unwrap()),
        ]
    }

    fn cell(alpha_water: f64, p: f64, u: f64) -> CellState {
        let closure = MultiPClosure::new(eos_set());
        let phases = Phases::new(vec![
            PhaseState::new(alpha_water, 1000.0, p),
            PhaseState::new(1.0 - alpha_water, 1.2, p),
        ])
        .unwrap();
        let mixture = MixtureState {
            velocity: DVec3::new(u, 0.0, 0.0),
            ..Default::default()
        };
        let mut cell = CellState::new(phases, mixture);
        closure.fulfill_state(&mut cell);
        cell
    }

    fn solver() -> MultiPRiemann {
        MultiPRiemann::new(eos_set())
    }

    #[test]
    fn test_uniform_interface_no_spurious_jump() {
        // 左右状态相同时，通量等于该均匀状态的解析通量，sM 等于公共速度
        let solver = solver();
        let u = 5.0;
        let left = cell(0.3, 2.0e5, u);
        let right = left.clone();
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);

        solver.solve_interface(
            &left,
            &right,
            &InterfaceBasis::x_axis(),
            0.1,
            0.1,
            &mut dt,
            &mut flux,
        );

        assert!((flux.s_m - u).abs() < 1e-9);
        let mix = &left.mixture;
        for (k, phase) in left.phases.iter().enumerate() {
            assert!((flux.mass[k] - phase.alpha * phase.density * u).abs() < 1e-6);
            assert!(
                (flux.energy[k] - phase.alpha * phase.density * phase.energy * u).abs()
                    < 1e-4 * flux.energy[k].abs().max(1.0)
            );
            assert!((flux.alpha[k] - phase.alpha * u).abs() < 1e-9);
        }
        let qx_expected = mix.density * u * u + mix.pressure;
        assert!((flux.momentum.x - qx_expected).abs() < 1e-6 * qx_expected);
        let em_expected = (mix.density * mix.total_energy() + mix.pressure) * u;
        assert!((flux.energy_mixture - em_expected).abs() < 1e-6 * em_expected.abs());
    }

    #[test]
    fn test_interface_cfl_bound() {
        let solver = solver();
        let left = cell(0.3, 2.0e5, 0.0);
        let right = cell(0.3, 1.0e5, 0.0);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let dx = 0.01;

        solver.solve_interface(
            &left,
            &right,
            &InterfaceBasis::x_axis(),
            dx,
            dx,
            &mut dt,
            &mut flux,
        );

        // 波速以声速为界，dt ≈ dx/|s| 有限
        assert!(dt.value() < f64::MAX);
        assert!(dt.value() > 0.0);
        assert!(dt.value() <= dx / left.mixture.sound_speed.min(right.mixture.sound_speed) * 2.0);
    }

    #[test]
    fn test_wall_zero_mass_flux() {
        let solver = solver();
        let left = cell(0.3, 2.0e5, 3.0);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);

        solver.solve_wall(&left, &InterfaceBasis::x_axis(), 0.1, &mut dt, &mut flux);

        assert!(flux.mass.iter().all(|&m| m == 0.0));
        assert!(flux.alpha.iter().all(|&a| a == 0.0));
        assert!(flux.energy.iter().all(|&e| e == 0.0));
        assert_eq!(flux.energy_mixture, 0.0);
        assert_eq!(flux.s_m, 0.0);
        // uL ≥ 0 时动量通量为正
        assert!(flux.momentum.x > 0.0);
        // p* = ρL(uL-sL)uL + pL ≥ pL
        assert!(flux.momentum.x >= left.mixture.pressure);
    }

    #[test]
    fn test_outflow_degenerate_pressure() {
        // p0 等于左压力时退化为左状态的平凡对流通量
        let solver = solver();
        let u = 4.0;
        let left = cell(0.3, 2.0e5, u);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let mut rates = vec![0.0; 2];

        solver.solve_outflow(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            left.mixture.pressure,
            &mut flux,
            &mut rates,
        );

        assert!((flux.s_m - u).abs() < 1e-9);
        for (k, phase) in left.phases.iter().enumerate() {
            let expected = phase.alpha * phase.density * u;
            assert!((flux.mass[k] - expected).abs() < 1e-6 * expected.abs().max(1.0));
            assert!((rates[k] - flux.mass[k]).abs() < 1e-12);
        }
        let qx = left.mixture.density * u * u + left.mixture.pressure;
        assert!((flux.momentum.x - qx).abs() < 1e-6 * qx);
    }

    #[test]
    fn test_outflow_detects_actual_inflow() {
        // 接触速度为负（实际入流）时复制左状态
        let solver = solver();
        let u = -10.0;
        let left = cell(0.3, 2.0e5, u);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let mut rates = vec![0.0; 2];

        solver.solve_outflow(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            1.9e5,
            &mut flux,
            &mut rates,
        );

        // 出流假设失效：uStar 回退为 uL
        assert!((flux.s_m - u).abs() < 1e-9);
    }

    #[test]
    fn test_inflow_converges_for_matched_state() {
        // 储源与域内状态一致且无速度差时，首次迭代即收敛
        let solver = solver();
        let u = -2.0;
        let left = cell(0.3, 2.0e5, u);
        let rho0 = left.mixture.density;
        let m0 = rho0 * u;
        let inflow = InflowParameters::new(
            m0,
            Composition::VolumeFractions(vec![0.3, 0.7]),
            vec![left.phases[0].density, left.phases[1].density],
            vec![left.phases[0].pressure, left.phases[1].pressure],
            2,
        )
        .unwrap();

        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let result = solver.solve_inflow(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            &inflow,
            &mut flux,
        );

        assert!(result.is_ok());
        assert!(flux.is_valid());
        // 接触速度为入流方向
        assert!(flux.s_m < 0.0);
        assert!((flux.s_m - u).abs() < 1e-6);
        // 质量通量指向计算域（负）
        assert!(flux.mass.iter().all(|&m| m < 0.0));
    }

    #[test]
    fn test_tank_matched_state_gives_zero_flux() {
        // 储罐状态与静止域一致：亚声速出流分支，uStar = sM = 0，零质量通量
        let solver = solver();
        let left = cell(0.3, 2.0e5, 0.0);
        let t_left = solver.eos()[0].temperature(left.phases[0].density, 2.0e5);
        let reservoir = ReservoirState {
            alpha: vec![0.3, 0.7],
            density: vec![left.phases[0].density, left.phases[1].density],
            pressure: 2.0e5,
            temperature: t_left,
            transports: vec![],
        };

        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let result = solver.solve_tank(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            &reservoir,
            &mut flux,
        );

        assert!(result.is_ok());
        assert!(flux.is_valid());
        assert!(flux.s_m.abs() < 1e-9);
        for &m in &flux.mass {
            assert!(m.abs() < 1e-9);
        }
        // 压力通量保留
        assert!((flux.momentum.x - 2.0e5).abs() < 1.0);
    }

    #[test]
    fn test_tank_high_pressure_drives_inflow() {
        // 储罐压力远高于域内时进入牛顿分支并产生入流
        let solver = solver();
        let left = cell(0.3, 1.0e5, 0.0);
        let p0 = 1.0e6;
        let t0 = 300.0;
        let eos = eos_set();
        let reservoir = ReservoirState {
            alpha: vec![0.3, 0.7],
            density: eos.iter().map(|law| law.density(p0, t0)).collect(),
            pressure: p0,
            temperature: t0,
            transports: vec![],
        };

        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let result = solver.solve_tank(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            &reservoir,
            &mut flux,
        );

        assert!(result.is_ok(), "tank solver failed: {:?}", result);
        assert!(flux.is_valid());
        // 入流：接触速度与质量通量为负
        assert!(flux.s_m < 0.0);
        assert!(flux.mass.iter().sum::<f64>() < 0.0);
    }

    #[test]
    fn test_interface_rotated_basis_momentum() {
        // 法向取 y 轴：均匀流的动量通量应落在全局 y 方向
        let solver = solver();
        let u = 5.0;
        let closure = MultiPClosure::new(eos_set());
        let phases = Phases::new(vec![
            PhaseState::new(0.3, 1000.0, 2.0e5),
            PhaseState::new(0.7, 1.2, 2.0e5),
        ])
        .unwrap();
        let mixture = MixtureState {
            velocity: DVec3::new(0.0, u, 0.0),
            ..Default::default()
        };
        let mut left = CellState::new(phases, mixture);
        closure.fulfill_state(&mut left);
        let right = left.clone();

        let basis = InterfaceBasis::new(DVec3::Y, DVec3::Z, DVec3::X);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        solver.solve_interface(&left, &right, &basis, 0.1, 0.1, &mut dt, &mut flux);

        let qy_expected = left.mixture.density * u * u + left.mixture.pressure;
        assert!((flux.momentum.y - qy_expected).abs() < 1e-6 * qy_expected);
        assert!(flux.momentum.x.abs() < 1e-9);
        assert!(flux.momentum.z.abs() < 1e-9);
    }
}
