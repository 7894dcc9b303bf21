// crates/pf_physics/src/eos/stiffened_gas.rs

//! 刚性气体状态方程
//!
//! p = (γ-1)ρ(e - eRef) - γ·pInf
//!
//! 通过参考压力 pInf 描述凝聚态介质的内聚效应，pInf = 0 时退化为
//! 理想气体。适用于液相（水：γ≈4.4, pInf≈6e8）与气相。

use serde::{Deserialize, Serialize};

use pf_foundation::{PfError, PfResult};

use super::traits::{EquationOfState, StiffenedCoefficients, EPSILON};

/// 刚性气体定律
///
/// 参数在装载后不可变，在所有单元与线程间只读共享。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StiffenedGas {
    /// 流体名称
    pub name: String,
    /// 比热比 γ
    pub gamma: f64,
    /// 参考压力 pInf [Pa]
    pub p_inf: f64,
    /// 定容比热 cv [J/(kg·K)]
    pub cv: f64,
    /// 参考比内能 eRef [J/kg]
    #[serde(default)]
    pub e_ref: f64,
    /// 参考比熵 sRef [J/(kg·K)]
    #[serde(default)]
    pub s_ref: f64,
}

impl StiffenedGas {
    /// 创建并校验参数
    pub fn new(
        name: impl Into<String>,
        gamma: f64,
        p_inf: f64,
        cv: f64,
        e_ref: f64,
        s_ref: f64,
    ) -> PfResult<Self> {
        let eos = Self {
            name: name.into(),
            gamma,
            p_inf,
            cv,
            e_ref,
            s_ref,
        };
        eos.validate()?;
        Ok(eos)
    }

    /// 参数校验
    pub fn validate(&self) -> PfResult<()> {
        if self.gamma <= 1.0 {
            return Err(PfError::out_of_range("gamma", self.gamma, 1.0, f64::MAX));
        }
        if self.cv <= 0.0 {
            return Err(PfError::out_of_range("cv", self.cv, 0.0, f64::MAX));
        }
        if self.p_inf < 0.0 {
            return Err(PfError::out_of_range("p_inf", self.p_inf, 0.0, f64::MAX));
        }
        Ok(())
    }
}

impl EquationOfState for StiffenedGas {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, pressure: f64, temperature: f64) -> f64 {
        (pressure + self.p_inf) / ((self.gamma - 1.0) * self.cv * temperature).max(EPSILON)
    }

    fn temperature(&self, density: f64, pressure: f64) -> f64 {
        (pressure + self.p_inf) / (self.gamma - 1.0) / density.max(EPSILON) / self.cv
    }

    fn energy(&self, density: f64, pressure: f64) -> f64 {
        (pressure + self.gamma * self.p_inf) / (self.gamma - 1.0) / density.max(EPSILON)
            + self.e_ref
    }

    fn pressure(&self, density: f64, energy: f64) -> f64 {
        (self.gamma - 1.0) * density * (energy - self.e_ref) - self.gamma * self.p_inf
    }

    fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma * (pressure + self.p_inf) / density.max(EPSILON)).sqrt()
    }

    fn entropy(&self, temperature: f64, pressure: f64) -> f64 {
        self.cv
            * (temperature.powf(self.gamma)
                / (pressure + self.p_inf).powf(self.gamma - 1.0).max(EPSILON))
            .ln()
            + self.s_ref
    }

    fn pressure_isentropic(&self, p0: f64, rho0: f64, rho: f64) -> f64 {
        (p0 + self.p_inf) * (rho / rho0.max(EPSILON)).powf(self.gamma) - self.p_inf
    }

    fn pressure_hugoniot(&self, p0: f64, rho0: f64, rho: f64) -> f64 {
        let gp1 = self.gamma + 1.0;
        let gm1 = self.gamma - 1.0;
        (p0 + self.p_inf) * (gp1 * rho - gm1 * rho0) / (gp1 * rho0 - gm1 * rho).max(EPSILON)
            - self.p_inf
    }

    fn density_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let rho = rho0
            * ((pressure + self.p_inf) / (p0 + self.p_inf).max(EPSILON)).powf(1.0 / self.gamma);
        let drho_dp = rho / (self.gamma * (pressure + self.p_inf)).max(EPSILON);
        (rho, drho_dp)
    }

    fn density_hugoniot(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let gp1 = self.gamma + 1.0;
        let gm1 = self.gamma - 1.0;
        let num = gp1 * (pressure + self.p_inf) + gm1 * (p0 + self.p_inf);
        let denom = gm1 * (pressure + self.p_inf) + gp1 * (p0 + self.p_inf);
        let rho = rho0 * num / denom.max(EPSILON);
        let drho_dp = rho0 * 4.0 * self.gamma * (p0 + self.p_inf) / (denom * denom).max(EPSILON);
        (rho, drho_dp)
    }

    fn enthalpy_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let (rho, drho_dp) = self.density_isentropic(p0, rho0, pressure);
        let h = self.gamma * (pressure + self.p_inf) / (self.gamma - 1.0) / rho.max(EPSILON)
            + self.e_ref;
        let dh_dp = self.gamma / (self.gamma - 1.0) * (rho - (pressure + self.p_inf) * drho_dp)
            / (rho * rho).max(EPSILON);
        (h, dh_dp)
    }

    fn density_saturation(&self, pressure: f64, t_sat: f64, dtsat_dp: f64) -> (f64, f64) {
        let gm1cv = (self.gamma - 1.0) * self.cv;
        let mut drho_dp = gm1cv * t_sat - (pressure + self.p_inf) * gm1cv * dtsat_dp;
        drho_dp /= (gm1cv * t_sat * gm1cv * t_sat).max(EPSILON);
        let rho = (pressure + self.p_inf) / (gm1cv * t_sat).max(EPSILON);
        (rho, drho_dp)
    }

    fn density_energy_saturation(&self, pressure: f64, rho: f64, drho_dp: f64) -> (f64, f64) {
        let drhoe_dp = 1.0 / (self.gamma - 1.0) + drho_dp * self.e_ref;
        let rho_e = (pressure + self.gamma * self.p_inf) / (self.gamma - 1.0) + rho * self.e_ref;
        (rho_e, drhoe_dp)
    }

    fn specific_volume(&self, pressure: f64, enthalpy: f64) -> f64 {
        (self.gamma - 1.0) * (enthalpy - self.e_ref)
            / (self.gamma * (pressure + self.p_inf)).max(EPSILON)
    }

    fn dv_dp_h(&self, pressure: f64, enthalpy: f64) -> f64 {
        (1.0 - self.gamma) / self.gamma * (enthalpy - self.e_ref)
            / ((pressure + self.p_inf) * (pressure + self.p_inf)).max(EPSILON)
    }

    fn dv_dh_p(&self, pressure: f64, _enthalpy: f64) -> f64 {
        (self.gamma - 1.0) / self.gamma / (pressure + self.p_inf).max(EPSILON)
    }

    fn pressure_floor(&self) -> f64 {
        -(1.0 - 1e-15) * self.p_inf + 1e-15
    }

    fn stiffened_coefficients(&self) -> Option<StiffenedCoefficients> {
        Some(StiffenedCoefficients {
            gamma: self.gamma,
            p_inf: self.p_inf,
            cv: self.cv,
            e_ref: self.e_ref,
        })
    }
}
