// crates/pf_physics/src/state.rs

//! 相状态与混合物状态
//!
//! 定义单个控制体内的状态表示：
//! - PhaseState: 单相原始变量与导出变量
//! - Phases: 携带长度的相序列，构造时校验体积分数归一化
//! - MixtureState: 由封闭模型导出的混合物变量
//! - CellState: 单元完整状态（相 + 混合物 + 被动输运标量）
//!
//! # 所有权
//!
//! 相状态由其单元独占，每个时间步只在封闭模型的状态补全与
//! 通量施加两处被修改；混合物状态永远由相状态确定性导出，
//! 不被独立修改。

use glam::DVec3;

use pf_foundation::{NumericalTolerance, PfError, PfResult};

/// 单相状态
///
/// 体积分数 α ∈ [0,1]，同一单元内各相 α 之和为 1（由 [`Phases`] 保证）。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseState {
    /// 体积分数 α
    pub alpha: f64,
    /// 密度 ρ [kg/m³]
    pub density: f64,
    /// 压力 p [Pa]
    pub pressure: f64,
    /// 比内能 e [J/kg]
    pub energy: f64,
    /// 声速 c [m/s]
    pub sound_speed: f64,
}

impl PhaseState {
    /// 从体积分数、密度与压力创建（能量与声速待封闭模型补全）
    pub fn new(alpha: f64, density: f64, pressure: f64) -> Self {
        Self {
            alpha,
            density,
            pressure,
            energy: 0.0,
            sound_speed: 0.0,
        }
    }
}

/// 携带长度的相序列
///
/// 不变量"长度 == 活动相数"在构造时确定；体积分数之和
/// 在 1 ± 1e-6 内，构造时校验一次，之后不再作为参数单独传递。
#[derive(Debug, Clone, PartialEq)]
pub struct Phases {
    phases: Vec<PhaseState>,
}

impl Phases {
    /// 创建相序列，校验体积分数归一化
    pub fn new(phases: Vec<PhaseState>) -> PfResult<Self> {
        if phases.is_empty() {
            return Err(PfError::invalid_input("相序列不能为空"));
        }
        let tol = NumericalTolerance::default();
        let sum: f64 = phases.iter().map(|p| p.alpha).sum();
        if !tol.sum_is_unit(sum) {
            return Err(PfError::validation(format!(
                "体积分数之和 {sum} 偏离 1 超过容差"
            )));
        }
        for p in &phases {
            PfError::check_range("alpha", p.alpha, 0.0, 1.0)?;
        }
        Ok(Self { phases })
    }

    /// 相数
    #[inline]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// 是否为空（构造保证非空，保留以满足惯用接口）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// 只读遍历
    pub fn iter(&self) -> std::slice::Iter<'_, PhaseState> {
        self.phases.iter()
    }

    /// 可变遍历（封闭模型状态补全使用）
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PhaseState> {
        self.phases.iter_mut()
    }

    /// 混合物密度 Σ α_k ρ_k
    pub fn mixture_density(&self) -> f64 {
        self.phases.iter().map(|p| p.alpha * p.density).sum()
    }

    /// 第 k 相的质量分数 Y_k = α_k ρ_k / ρ
    #[inline]
    pub fn mass_fraction(&self, k: usize, mixture_density: f64) -> f64 {
        self.phases[k].alpha * self.phases[k].density / mixture_density
    }
}

impl std::ops::Index<usize> for Phases {
    type Output = PhaseState;

    #[inline]
    fn index(&self, k: usize) -> &PhaseState {
        &self.phases[k]
    }
}

impl std::ops::IndexMut<usize> for Phases {
    #[inline]
    fn index_mut(&mut self, k: usize) -> &mut PhaseState {
        &mut self.phases[k]
    }
}

/// 混合物状态
///
/// 由活动封闭模型从相状态确定性导出。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MixtureState {
    /// 混合物密度 [kg/m³]
    pub density: f64,
    /// 混合物压力 [Pa]
    pub pressure: f64,
    /// 混合物温度 [K]（多压力封闭模型下无单一温度，保持为 0）
    pub temperature: f64,
    /// 速度向量 [m/s]
    pub velocity: DVec3,
    /// 比内能 [J/kg]
    pub energy: f64,
    /// 冻结/混合物声速 [m/s]
    pub sound_speed: f64,
}

impl MixtureState {
    /// 总比能 E = e + |u|²/2
    #[inline]
    pub fn total_energy(&self) -> f64 {
        self.energy + 0.5 * self.velocity.length_squared()
    }
}

/// 单元完整状态
///
/// 被动输运标量随单元携带，由输运求解器用接触波速对流。
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    /// 各相状态
    pub phases: Phases,
    /// 混合物状态
    pub mixture: MixtureState,
    /// 被动输运标量
    pub transports: Vec<f64>,
}

impl CellState {
    /// 创建单元状态
    pub fn new(phases: Phases, mixture: MixtureState) -> Self {
        Self {
            phases,
            mixture,
            transports: Vec::new(),
        }
    }

    /// 附加被动输运标量
    pub fn with_transports(mut self, transports: Vec<f64>) -> Self {
        self.transports = transports;
        self
    }

    /// 相数
    #[inline]
    pub fn n_phases(&self) -> usize {
        self.phases.len()
    }
}
