// crates/pf_foundation/src/tolerance.rs

//! 数值容差配置
//!
//! 集中定义数值计算中使用的容差阈值，通过参数注入传递，
//! 不使用全局静态变量。
//!
//! # 用法
//!
//! ```
//! use pf_foundation::tolerance::NumericalTolerance;
//!
//! let tol = NumericalTolerance::default();
//! assert!(tol.epsilon_div < 1e-10);
//! ```

/// 数值容差配置
///
/// 包含通量求解与边界牛顿迭代中使用的全部容差阈值。
#[derive(Debug, Clone, Copy)]
pub struct NumericalTolerance {
    /// 安全除法下限（分母保护）
    pub epsilon_div: f64,
    /// 接触波速置零阈值
    pub sm_zero: f64,
    /// 参与 CFL 限制的最小波速
    pub wave_speed_floor: f64,
    /// 组分求和容差（体积分数/质量分数之和与 1 的偏差）
    pub composition_sum: f64,
    /// 入流牛顿迭代收敛容差
    pub inflow_convergence: f64,
    /// 储罐牛顿迭代收敛容差
    pub tank_convergence: f64,
    /// 牛顿迭代次数上限
    pub newton_max_iterations: usize,
    /// 比容差退化判断阈值（声学回退）
    pub volume_jump: f64,
}

impl Default for NumericalTolerance {
    fn default() -> Self {
        Self {
            epsilon_div: 1e-15,
            sm_zero: 1e-8,
            wave_speed_floor: 1e-3,
            composition_sum: 1e-6,
            inflow_convergence: 1e-10,
            tank_convergence: 1e-3,
            newton_max_iterations: 50,
            volume_jump: 1e-10,
        }
    }
}

impl NumericalTolerance {
    /// 安全除法：分母绝对值低于 `epsilon_div` 时按符号抬升
    #[inline]
    pub fn safe_div(&self, num: f64, denom: f64) -> f64 {
        if denom.abs() < self.epsilon_div {
            num / self.epsilon_div.copysign(denom)
        } else {
            num / denom
        }
    }

    /// 判断组分之和是否满足归一化约束
    #[inline]
    pub fn sum_is_unit(&self, sum: f64) -> bool {
        (sum - 1.0).abs() <= self.composition_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let tol = NumericalTolerance::default();
        assert_eq!(tol.newton_max_iterations, 50);
        assert_eq!(tol.wave_speed_floor, 1e-3);
    }

    #[test]
    fn test_safe_div() {
        let tol = NumericalTolerance::default();
        assert_eq!(tol.safe_div(1.0, 2.0), 0.5);
        assert!(tol.safe_div(1.0, 0.0).is_finite());
        assert!(tol.safe_div(1.0, 0.0) > 0.0);
        assert!(tol.safe_div(1.0, -1e-20) < 0.0);
    }

    #[test]
    fn test_sum_is_unit() {
        let tol = NumericalTolerance::default();
        assert!(tol.sum_is_unit(1.0));
        assert!(tol.sum_is_unit(1.0 + 5e-7));
        assert!(!tol.sum_is_unit(1.01));
    }
}
