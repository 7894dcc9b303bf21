// crates/pf_physics/src/eos/ideal_gas.rs

//! 理想气体状态方程
//!
//! p = (γ-1)ρ(e - eRef)
//!
//! 刚性气体在 pInf = 0 时的退化形式，保留为独立定律以简化公式。

use serde::{Deserialize, Serialize};

use pf_foundation::{PfError, PfResult};

use super::traits::{EquationOfState, StiffenedCoefficients, EPSILON};

/// 理想气体定律
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealGas {
    /// 流体名称
    pub name: String,
    /// 比热比 γ
    pub gamma: f64,
    /// 定容比热 cv [J/(kg·K)]
    pub cv: f64,
    /// 参考比内能 eRef [J/kg]
    #[serde(default)]
    pub e_ref: f64,
    /// 参考比熵 sRef [J/(kg·K)]
    #[serde(default)]
    pub s_ref: f64,
}

impl IdealGas {
    /// 创建并校验参数
    pub fn new(name: impl Into<String>, gamma: f64, cv: f64, e_ref: f64, s_ref: f64) -> PfResult<Self> {
        let eos = Self {
            name: name.into(),
            gamma,
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
        Ok(())
    }
}

impl EquationOfState for IdealGas {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, pressure: f64, temperature: f64) -> f64 {
        pressure / ((self.gamma - 1.0) * self.cv * temperature).max(EPSILON)
    }

    fn temperature(&self, density: f64, pressure: f64) -> f64 {
        pressure / (self.gamma - 1.0) / density.max(EPSILON) / self.cv
    }

    fn energy(&self, density: f64, pressure: f64) -> f64 {
        pressure / (self.gamma - 1.0) / density.max(EPSILON) + self.e_ref
    }

    fn pressure(&self, density: f64, energy: f64) -> f64 {
        (self.gamma - 1.0) * density * (energy - self.e_ref)
    }

    fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma * pressure / density.max(EPSILON)).sqrt()
    }

    fn entropy(&self, temperature: f64, pressure: f64) -> f64 {
        self.cv
            * (temperature.powf(self.gamma) / pressure.powf(self.gamma - 1.0).max(EPSILON)).ln()
            + self.s_ref
    }

    fn pressure_isentropic(&self, p0: f64, rho0: f64, rho: f64) -> f64 {
        p0 * (rho / rho0.max(EPSILON)).powf(self.gamma)
    }

    fn pressure_hugoniot(&self, p0: f64, rho0: f64, rho: f64) -> f64 {
        let gp1 = self.gamma + 1.0;
        let gm1 = self.gamma - 1.0;
        p0 * (gp1 * rho - gm1 * rho0) / (gp1 * rho0 - gm1 * rho).max(EPSILON)
    }

    fn density_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let rho = rho0 * (pressure / p0.max(EPSILON)).powf(1.0 / self.gamma);
        let drho_dp = rho / (self.gamma * pressure).max(EPSILON);
        (rho, drho_dp)
    }

    fn density_hugoniot(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let gp1 = self.gamma + 1.0;
        let gm1 = self.gamma - 1.0;
        let num = gp1 * pressure + gm1 * p0;
        let denom = gm1 * pressure + gp1 * p0;
        let rho = rho0 * num / denom.max(EPSILON);
        let drho_dp = rho0 * 4.0 * self.gamma * p0 / (denom * denom).max(EPSILON);
        (rho, drho_dp)
    }

    fn enthalpy_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64) {
        let (rho, drho_dp) = self.density_isentropic(p0, rho0, pressure);
        let h = self.gamma * pressure / (self.gamma - 1.0) / rho.max(EPSILON) + self.e_ref;
        let dh_dp = self.gamma / (self.gamma - 1.0) * (rho - pressure * drho_dp)
            / (rho * rho).max(EPSILON);
        (h, dh_dp)
    }

    fn density_saturation(&self, pressure: f64, t_sat: f64, dtsat_dp: f64) -> (f64, f64) {
        let gm1cv = (self.gamma - 1.0) * self.cv;
        let mut drho_dp = gm1cv * t_sat - pressure * gm1cv * dtsat_dp;
        drho_dp /= (gm1cv * t_sat * gm1cv * t_sat).max(EPSILON);
        let rho = pressure / (gm1cv * t_sat).max(EPSILON);
        (rho, drho_dp)
    }

    fn density_energy_saturation(&self, pressure: f64, rho: f64, drho_dp: f64) -> (f64, f64) {
        let drhoe_dp = 1.0 / (self.gamma - 1.0) + drho_dp * self.e_ref;
        let rho_e = pressure / (self.gamma - 1.0) + rho * self.e_ref;
        (rho_e, drhoe_dp)
    }

    fn specific_volume(&self, pressure: f64, enthalpy: f64) -> f64 {
        (self.gamma - 1.0) * (enthalpy - self.e_ref) / (self.gamma * pressure).max(EPSILON)
    }

    fn dv_dp_h(&self, pressure: f64, enthalpy: f64) -> f64 {
        (1.0 - self.gamma) / self.gamma * (enthalpy - self.e_ref)
            / (pressure * pressure).max(EPSILON)
    }

    fn dv_dh_p(&self, pressure: f64, _enthalpy: f64) -> f64 {
        (self.gamma - 1.0) / self.gamma / pressure.max(EPSILON)
    }

    fn pressure_floor(&self) -> f64 {
        1e-15
    }

    fn stiffened_coefficients(&self) -> Option<StiffenedCoefficients> {
        Some(StiffenedCoefficients {
            gamma: self.gamma,
            p_inf: 0.0,
            cv: self.cv,
            e_ref: self.e_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air() -> IdealGas {
        IdealGas::new("air", 1.4, 717.5, 0.0, 0.0).unwrap()
    }

    #[test]
    fn test_roundtrip_pressure_energy() {
        let eos = air();
        let rho = 1.2;
        let p = 1.0e5;
        let e = eos.energy(rho, p);
        assert!((eos.pressure(rho, e) - p).abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_density_temperature() {
        let eos = air();
        let rho = 1.2;
        let p = 1.0e5;
        let t = eos.temperature(rho, p);
        assert!((eos.density(p, t) - rho).abs() < 1e-12);
    }

    #[test]
    fn test_sound_speed_air() {
        let eos = air();
        let c = eos.sound_speed(1.2, 1.0e5);
        // 常温空气声速约 340 m/s
        assert!((c - 341.6).abs() < 1.0);
    }

    #[test]
    fn test_matches_stiffened_gas_at_zero_pinf() {
        use super::super::stiffened_gas::StiffenedGas;
        let ig = air();
        let sg = StiffenedGas::new("air_sg", 1.4, 0.0, 717.5, 0.0, 0.0).unwrap();
        let rho = 1.2;
        let p = 1.0e5;
        assert!((ig.energy(rho, p) - sg.energy(rho, p)).abs() < 1e-9);
        assert!((ig.sound_speed(rho, p) - sg.sound_speed(rho, p)).abs() < 1e-9);
        let (r1, d1) = ig.density_isentropic(1.0e5, rho, 2.0e5);
        let (r2, d2) = sg.density_isentropic(1.0e5, rho, 2.0e5);
        assert!((r1 - r2).abs() < 1e-12);
        assert!((d1 - d2).abs() < 1e-18);
    }

    #[test]
    fn test_stiffened_coefficients() {
        let c = air().stiffened_coefficients().unwrap();
        assert_eq!(c.p_inf, 0.0);
        assert_eq!(c.gamma, 1.4);
    }
}
