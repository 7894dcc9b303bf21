// crates/pf_physics/src/riemann/thermal_eq.rs

//! 热平衡封闭下的黎曼求解器
//!
//! 内部界面与多压力版本共享同一三波骨架，但星区只计算单一的
//! 混合物密度/能量；各相质量通量为相质量分数乘以混合物星区
//! 通量。边界半求解器使用混合物等熵关系（单一温度）而非逐相
//! 关系。

use glam::DVec3;

use pf_foundation::NumericalTolerance;

use crate::boundary::{InflowParameters, ReservoirState};
use crate::eos::EosSet;
use crate::error::{ModelError, ModelResult};
use crate::mixture::ThermalEqClosure;
use crate::state::CellState;

use super::flux::{FluxBuffer, InterfaceBasis};
use super::traits::{DtBound, RiemannSolver};

/// 热平衡黎曼求解器
pub struct ThermalEqRiemann {
    closure: ThermalEqClosure,
    tol: NumericalTolerance,
}

impl ThermalEqRiemann {
    /// 创建求解器（封闭模型已在构造时校验相数与状态方程族）
    pub fn new(closure: ThermalEqClosure) -> Self {
        Self {
            closure,
            tol: NumericalTolerance::default(),
        }
    }

    /// 指定数值容差
    pub fn with_tolerance(mut self, tol: NumericalTolerance) -> Self {
        self.tol = tol;
        self
    }

    /// 封闭模型
    pub fn closure(&self) -> &ThermalEqClosure {
        &self.closure
    }

    /// 左单元各相质量分数
    fn mass_fractions(&self, cell: &CellState) -> Vec<f64> {
        let rho = cell.mixture.density;
        (0..cell.phases.len())
            .map(|k| cell.phases.mass_fraction(k, rho))
            .collect()
    }

    /// 单侧完整状态的通量（超声速采样分支）
    fn uniform_flux(&self, cell: &CellState, u: f64, v: f64, w: f64, flux: &mut FluxBuffer) {
        let mix = &cell.mixture;
        for (k, phase) in cell.phases.iter().enumerate() {
            flux.mass[k] = phase.alpha * phase.density * u;
        }
        let total_energy = mix.total_energy();
        flux.momentum = DVec3::new(
            mix.density * u * u + mix.pressure,
            mix.density * v * u,
            mix.density * w * u,
        );
        flux.energy_mixture = (mix.density * total_energy + mix.pressure) * u;
    }

    /// 星区采样分支的通量（单一混合物星区密度/能量）
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
            let mk = phase.alpha * phase.density * (s - u);
            flux.mass[k] = mk / (s - s_m) * s_m;
        }
        flux.momentum = DVec3::new(
            rho_star * s_m * s_m + p_star,
            rho_star * v * s_m,
            rho_star * w * s_m,
        );
        flux.energy_mixture = (rho_star * e_star + p_star) * s_m;
    }
}

impl RiemannSolver for ThermalEqRiemann {
    fn name(&self) -> &'static str {
        "ThermalEq"
    }

    fn n_phases(&self) -> usize {
        self.closure.n_phases()
    }

    fn eos_set(&self) -> &EosSet {
        self.closure.eos()
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
        flux.reset();
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

        let m_l = rho_l * (s_l - u_l);
        let m_r = rho_r * (s_r - u_r);
        let mut s_m = (p_r - p_l + m_l * u_l - m_r * u_r) / (m_l - m_r);
        if s_m.abs() < self.tol.sm_zero {
            s_m = 0.0;
        }

        if s_l >= 0.0 {
            self.uniform_flux(left, u_l, v_l, w_l, flux);
        } else if s_r <= 0.0 {
            self.uniform_flux(right, u_r, v_r, w_r, flux);
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
        flux.reset();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l, t_l) = (mix.sound_speed, mix.pressure, mix.density, mix.temperature);
        let yk = self.mass_fractions(left);

        // 左行波的混合物等熵估计
        let z_l = rho_l * c_l;
        let mut p_star = p0;
        let (v_iso, _) = self.closure.volume_isentrope(&yk, p_l, t_l, p0);
        let mut rho_star = 1.0 / v_iso;
        let v_jump = 1.0 / rho_star - 1.0 / rho_l;
        let m_l = if v_jump.abs() > self.tol.volume_jump {
            ((p_l - p0) / v_jump).sqrt()
        } else {
            z_l
        };
        let s_l = u_l - m_l / rho_l;
        dt.restrict(dx_left, s_l);
        let mut u_star = u_l + m_l * v_jump;

        // 病态情形：超声速出流复制左状态
        if s_l >= 0.0 {
            u_star = u_l;
            p_star = p_l;
            rho_star = rho_l;
        }

        // 通量完成
        let e_star = mix.total_energy() + (u_star - u_l) * (u_star - p_l / m_l);
        for (k, yk_l) in yk.iter().enumerate() {
            flux.mass[k] = rho_star * yk_l * u_star;
        }
        flux.momentum = DVec3::new(
            u_star * u_star * rho_star + p_star,
            u_star * v_l * rho_star,
            u_star * w_l * rho_star,
        );
        flux.energy_mixture = (e_star * rho_star + p_star) * u_star;
        flux.s_m = u_star;

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
        flux.reset();
        let n = self.closure.n_phases();
        let eos = self.closure.eos();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l) = (mix.sound_speed, mix.pressure, mix.density);

        // 注入流体的各相总焓与质量分数
        let rho0 = inflow.mixture_density();
        let u0 = inflow.m0 / rho0;
        let mut h0 = vec![0.0; n];
        let mut yk0 = vec![0.0; n];
        for k in 0..n {
            h0[k] = eos[k].total_enthalpy(inflow.density[k], inflow.pressure[k], u0);
            yk0[k] = inflow.alpha[k] * inflow.density[k] / rho0;
        }

        let s_l = u_l - c_l;
        dt.restrict(dx_left, s_l);
        let z_l = rho_l * c_l;

        // 星区压力的牛顿迭代（逐相比容三元组）
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
                    "ThermalEq::solve_inflow",
                    self.tol.newton_max_iterations,
                    f.abs(),
                ));
            }
            for law in eos {
                p_star = law.clamp_pressure(p_star);
            }
            u = u_l + (p_l - p_star) / z_l;
            if u >= -1e-6 {
                u = -1e-6;
            }
            let du = -1.0 / z_l;
            v = u / inflow.m0;
            let dv = du / inflow.m0;
            f = v;
            df = dv;
            for k in 0..n {
                let hk = h0[k] - 0.5 * u * u;
                vk_star[k] = eos[k].specific_volume(p_star, hk);
                let dvk = eos[k].dv_dp_h(p_star, hk) - eos[k].dv_dh_p(p_star, hk) * u * du;
                f -= yk0[k] * vk_star[k];
                df -= yk0[k] * dvk;
            }
            if f.abs() <= self.tol.inflow_convergence {
                break;
            }
        }

        // 通量完成（热平衡形：仅各相质量 + 混合物动量/能量）
        let mut e_star = 0.5 * (u * u + v_l * v_l + w_l * w_l);
        for k in 0..n {
            let rhok = 1.0 / vk_star[k];
            e_star += yk0[k] * eos[k].energy(rhok, p_star);
            flux.mass[k] = yk0[k] * u / v;
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
        flux.reset();
        let n = self.closure.n_phases();
        let eos = self.closure.eos();
        let mix = &left.mixture;
        let (u_l, v_l, w_l) = basis.local_components(mix.velocity);
        let (c_l, p_l, rho_l, t_l) = (mix.sound_speed, mix.pressure, mix.density, mix.temperature);
        let e_l = mix.total_energy();
        let p0 = reservoir.pressure;
        let t0 = reservoir.temperature;
        let yk = self.mass_fractions(left);

        let z_l = rho_l * c_l;

        // 1) 用 pStar = p0 估计左波速（混合物等熵线）
        let mut p_star = p0;
        let (v_star, _) = self.closure.volume_isentrope(&yk, p_l, t_l, p_star);
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
        let mut yk_star = yk.clone();
        let u_star;
        let rho_star;
        let uy_star;
        let uz_star;
        let e_star;
        if s_l >= 0.0 {
            // 超声速出流：左状态即解
            u_star = u_l;
            p_star = p_l;
            rho_star = rho_l;
            uy_star = v_l;
            uz_star = w_l;
            e_star = e_l;
        } else if s_m >= -1e-3 {
            // 亚声速出流：星左状态，压力近似取 p0
            u_star = s_m;
            p_star = p0;
            rho_star = 1.0 / v_star;
            uy_star = v_l;
            uz_star = w_l;
            e_star = e_l + (u_star - u_l) * (u_star + p_l / m_l);
        } else {
            // 3) 真实储罐入流：压力的牛顿迭代，
            // 储罐侧 H=cte、s=cte 与域侧 s=cte 的速度相等
            let rho0 = reservoir.mixture_density();
            let mut yk0 = vec![0.0; n];
            let mut h_total = 0.0;
            for k in 0..n {
                yk0[k] = reservoir.alpha[k] * reservoir.density[k] / rho0;
                // 储罐内默认静止
                h_total += yk0[k] * eos[k].total_enthalpy(reservoir.density[k], p0, 0.0);
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
                        "ThermalEq::solve_tank",
                        self.tol.newton_max_iterations,
                        f.abs(),
                    ));
                }
                for law in eos {
                    p = law.clamp_pressure(p);
                }
                if p > p0 {
                    p = p0 - 1e-6;
                }
                // R) 储罐侧：混合物熵守恒给出 h(p)，能量方程给出速度
                let (h_star_r, dh_star_r) = self.closure.enthalpy_isentrope(&yk0, p0, t0, p);
                u_star_r = -(2.0 * (h_total - h_star_r)).sqrt();
                let du_star_r = -dh_star_r / u_star_r;
                // L) 域侧：混合物熵守恒
                let (v_star_l, dv_star_l) = self.closure.volume_isentrope(&yk, p_l, t_l, p);
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
            let (t_star_r, _) = self.closure.temperature_isentrope(&yk0, p0, t0, p_star);
            let mut v_sum = 0.0;
            for k in 0..n {
                yk_star[k] = yk0[k];
                v_sum += yk0[k] / eos[k].density(p_star, t_star_r);
            }
            rho_star = 1.0 / v_sum;
            uy_star = 0.0;
            uz_star = 0.0;
            e_star = h_total - p_star / rho_star;
        }

        // 4) 通量完成
        for k in 0..n {
            flux.mass[k] = rho_star * yk_star[k] * u_star;
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
    use crate::eos::{EosSet, EquationOfState, IdealGas, StiffenedGas};
    use crate::state::{MixtureState, PhaseState, Phases};
    use std::sync::Arc;

    fn eos_set() -> EosSet {
        vec![
            Arc::new(StiffenedGas::new("water", 4.4, 6.0e8, 1000.0, 0.0, 0.0).unwrap())
                as Arc<dyn EquationOfState>,
            Arc::new(IdealGas::new("air", 1.4, 717.5, 0.0, 0.0).unwrap()),
        ]
    }

    fn solver() -> ThermalEqRiemann {
        ThermalEqRiemann::new(ThermalEqClosure::new(eos_set()).unwrap())
    }

    /// 以 (alpha, p, T, u) 构造热平衡一致的单元状态
    fn cell(alpha_water: f64, p: f64, t: f64, u: f64) -> CellState {
        let closure = ThermalEqClosure::new(eos_set()).unwrap();
        let phases = Phases::new(vec![
            PhaseState::new(alpha_water, 0.0, 0.0),
            PhaseState::new(1.0 - alpha_water, 0.0, 0.0),
        ])
        .unwrap();
        let mixture = MixtureState {
            pressure: p,
            temperature: t,
            velocity: DVec3::new(u, 0.0, 0.0),
            ..Default::default()
        };
        let mut cell = CellState::new(phases, mixture);
        closure.fulfill_state(&mut cell);
        cell
    }

    #[test]
    fn test_uniform_interface_no_spurious_jump() {
        let solver = solver();
        let u = 3.0;
        let left = cell(0.4, 2.0e5, 300.0, u);
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
        for (k, phase) in left.phases.iter().enumerate() {
            let expected = phase.alpha * phase.density * u;
            assert!((flux.mass[k] - expected).abs() < 1e-6 * expected.abs().max(1.0));
        }
        // 热平衡形：无体积分数/各相能量通量
        assert!(flux.alpha.iter().all(|&a| a == 0.0));
        assert!(flux.energy.iter().all(|&e| e == 0.0));
        let qx = left.mixture.density * u * u + left.mixture.pressure;
        assert!((flux.momentum.x - qx).abs() < 1e-6 * qx);
    }

    #[test]
    fn test_wall_reflective() {
        let solver = solver();
        let left = cell(0.4, 2.0e5, 300.0, 1.0);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);

        solver.solve_wall(&left, &InterfaceBasis::x_axis(), 0.1, &mut dt, &mut flux);

        assert!(flux.mass.iter().all(|&m| m == 0.0));
        assert_eq!(flux.energy_mixture, 0.0);
        assert_eq!(flux.s_m, 0.0);
        assert!(flux.momentum.x >= left.mixture.pressure);
    }

    #[test]
    fn test_outflow_degenerate_pressure() {
        // p0 等于左压力时退化为左状态的平凡对流通量
        let solver = solver();
        let u = 2.0;
        let left = cell(0.4, 2.0e5, 300.0, u);
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
            assert_eq!(rates[k], flux.mass[k]);
        }
    }

    #[test]
    fn test_outflow_lower_pressure_accelerates() {
        // p0 低于左压力时出流加速，质量通量增大
        let solver = solver();
        let u = 2.0;
        let left = cell(0.4, 2.0e5, 300.0, u);
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 0);
        let mut rates = vec![0.0; 2];

        solver.solve_outflow(
            &left,
            &InterfaceBasis::x_axis(),
            0.1,
            &mut dt,
            1.5e5,
            &mut flux,
            &mut rates,
        );

        assert!(flux.s_m > u);
        assert!(flux.is_valid());
    }

    #[test]
    fn test_inflow_converges_for_matched_state() {
        let solver = solver();
        let u = -1.5;
        let left = cell(0.4, 2.0e5, 300.0, u);
        let rho0 = left.mixture.density;
        let inflow = InflowParameters::new(
            rho0 * u,
            Composition::VolumeFractions(vec![0.4, 0.6]),
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
        assert!((flux.s_m - u).abs() < 1e-6);
        assert!(flux.mass.iter().all(|&m| m < 0.0));
    }

    #[test]
    fn test_tank_matched_state_gives_zero_flux() {
        let solver = solver();
        let left = cell(0.4, 2.0e5, 300.0, 0.0);
        let eos = eos_set();
        let reservoir = ReservoirState {
            alpha: vec![0.4, 0.6],
            density: eos.iter().map(|law| law.density(2.0e5, 300.0)).collect(),
            pressure: 2.0e5,
            temperature: 300.0,
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
        assert!(flux.s_m.abs() < 1e-9);
        for &m in &flux.mass {
            assert!(m.abs() < 1e-9);
        }
        assert!((flux.momentum.x - 2.0e5).abs() < 1.0);
    }

    #[test]
    fn test_tank_high_pressure_drives_inflow() {
        let solver = solver();
        let left = cell(0.4, 1.0e5, 300.0, 0.0);
        let p0 = 1.0e6;
        let t0 = 300.0;
        let eos = eos_set();
        let reservoir = ReservoirState {
            alpha: vec![0.4, 0.6],
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
        assert!(flux.s_m < 0.0);
        assert!(flux.mass.iter().sum::<f64>() < 0.0);
    }

    #[test]
    fn test_transport_follows_hydrodynamic_sm() {
        // 输运通量消费同一界面求解写入的 sM
        let solver = solver();
        let u = 3.0;
        let left = cell(0.4, 2.0e5, 300.0, u).with_transports(vec![7.0]);
        let right = left.clone();
        let mut dt = DtBound::new(f64::MAX);
        let mut flux = FluxBuffer::new(2, 1);

        solver.solve_interface(
            &left,
            &right,
            &InterfaceBasis::x_axis(),
            0.1,
            0.1,
            &mut dt,
            &mut flux,
        );
        solver.solve_transport_interface(&left, &right, &mut flux);

        assert!((flux.transports[0] - 7.0 * u).abs() < 1e-9);
    }
}
