// crates/pf_physics/src/eos/traits.rs

//! 状态方程统一接口

use std::sync::Arc;

use crate::error::{ModelError, ModelResult};

/// 代数关系分母保护下限
///
/// 所有密度/能量分母在低于该值时被抬升，避免除零。
pub const EPSILON: f64 = 1e-15;

/// 一组按相索引的状态方程
///
/// 在所有单元与线程间只读共享。
pub type EosSet = Vec<Arc<dyn EquationOfState>>;

/// 刚性气体系数
///
/// 热平衡封闭模型的解析混合压力/温度公式只对刚性气体族成立，
/// 通过该结构体向封闭模型暴露所需系数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StiffenedCoefficients {
    /// 比热比
    pub gamma: f64,
    /// 参考压力 [Pa]
    pub p_inf: f64,
    /// 定容比热 [J/(kg·K)]
    pub cv: f64,
    /// 参考比内能 [J/kg]
    pub e_ref: f64,
}

/// 状态方程 trait
///
/// 单相流体的封闭式热力学关系。所有公式均为代数式，
/// 等熵/Hugoniot 关系同时返回解析导数 dρ/dp 供牛顿迭代使用。
pub trait EquationOfState: Send + Sync {
    /// 流体名称（配置中按名称引用）
    fn name(&self) -> &str;

    // --------------------------------------------------------------------
    // 基本换算关系
    // --------------------------------------------------------------------

    /// 密度 ρ(p, T)
    fn density(&self, pressure: f64, temperature: f64) -> f64;

    /// 温度 T(ρ, p)
    fn temperature(&self, density: f64, pressure: f64) -> f64;

    /// 比内能 e(ρ, p)
    fn energy(&self, density: f64, pressure: f64) -> f64;

    /// 压力 p(ρ, e)
    fn pressure(&self, density: f64, energy: f64) -> f64;

    /// 声速 c(ρ, p)
    fn sound_speed(&self, density: f64, pressure: f64) -> f64;

    /// 比熵 s(T, p)
    fn entropy(&self, temperature: f64, pressure: f64) -> f64;

    /// 总比焓 H = e + p/ρ + u²/2
    fn total_enthalpy(&self, density: f64, pressure: f64, velocity: f64) -> f64 {
        self.energy(density, pressure)
            + pressure / density.max(EPSILON)
            + 0.5 * velocity * velocity
    }

    // --------------------------------------------------------------------
    // 等熵 / Hugoniot 关系
    // --------------------------------------------------------------------

    /// 等熵压缩的终态压力：从 (p0, ρ0) 沿等熵线到密度 ρ
    fn pressure_isentropic(&self, p0: f64, rho0: f64, rho: f64) -> f64;

    /// Hugoniot 关系的终态压力：从 (p0, ρ0) 经激波到密度 ρ
    fn pressure_hugoniot(&self, p0: f64, rho0: f64, rho: f64) -> f64;

    /// 等熵压缩的终态密度与 dρ/dp：从 (p0, ρ0) 沿等熵线到压力 p
    fn density_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64);

    /// Hugoniot 关系的终态密度与 dρ/dp：从 (p0, ρ0) 经激波到压力 p
    fn density_hugoniot(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64);

    /// 等熵压缩的终态比焓与 dh/dp
    fn enthalpy_isentropic(&self, p0: f64, rho0: f64, pressure: f64) -> (f64, f64);

    // --------------------------------------------------------------------
    // 饱和关系
    // --------------------------------------------------------------------

    /// 饱和线上的密度与 dρ/dp
    ///
    /// `t_sat` 为饱和温度，`dtsat_dp` 为饱和温度对压力的导数。
    fn density_saturation(&self, pressure: f64, t_sat: f64, dtsat_dp: f64) -> (f64, f64);

    /// 饱和线上的体积内能 ρe 与 d(ρe)/dp
    fn density_energy_saturation(&self, pressure: f64, rho: f64, drho_dp: f64) -> (f64, f64);

    // --------------------------------------------------------------------
    // 入流/储罐求解器使用的比容三元组
    // --------------------------------------------------------------------

    /// 比容 v(p, h)
    fn specific_volume(&self, pressure: f64, enthalpy: f64) -> f64;

    /// 定焓偏导 ∂v/∂p|h
    fn dv_dp_h(&self, pressure: f64, enthalpy: f64) -> f64;

    /// 定压偏导 ∂v/∂h|p
    fn dv_dh_p(&self, pressure: f64, enthalpy: f64) -> f64;

    // --------------------------------------------------------------------
    // 压力有效性
    // --------------------------------------------------------------------

    /// 本定律的压力有效下限
    fn pressure_floor(&self) -> f64;

    /// 校验压力有效性，低于下限时返回错误（一次性求值场合）
    fn verify_pressure(&self, pressure: f64, context: &'static str) -> ModelResult<()> {
        let floor = self.pressure_floor();
        if pressure <= floor {
            return Err(ModelError::non_physical_pressure(
                context,
                pressure,
                floor,
                self.name(),
            ));
        }
        Ok(())
    }

    /// 将压力钳制到有效下限（迭代循环内部使用，保持迭代点物理）
    #[inline]
    fn clamp_pressure(&self, pressure: f64) -> f64 {
        pressure.max(self.pressure_floor())
    }

    /// 刚性气体系数，非刚性气体族定律返回 `None`
    fn stiffened_coefficients(&self) -> Option<StiffenedCoefficients>;
}
