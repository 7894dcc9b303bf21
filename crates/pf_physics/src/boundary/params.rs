// crates/pf_physics/src/boundary/params.rs

//! 储罐 / 入流 / 出流边界参数

use serde::{Deserialize, Serialize};

use pf_foundation::{NumericalTolerance, PfError, PfResult};

use crate::eos::EosSet;

use super::timetable::TimeTable;

// ============================================================
// 组分
// ============================================================

/// 储源组分
///
/// 体积分数与质量分数互斥，由枚举构造保证。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    /// 体积分数 α_k，之和为 1 ± 1e-6
    VolumeFractions(Vec<f64>),
    /// 质量分数 Y_k，之和为 1 ± 1e-6
    MassFractions(Vec<f64>),
}

impl Composition {
    /// 校验并归一化
    ///
    /// 每个分量在 [0,1] 内、之和在容差内为 1，随后精确归一化。
    pub fn validated(self, n_phases: usize) -> PfResult<Self> {
        let tol = NumericalTolerance::default();
        let fractions = match &self {
            Self::VolumeFractions(f) | Self::MassFractions(f) => f,
        };
        PfError::check_size("Composition", n_phases, fractions.len())?;
        for &f in fractions {
            PfError::check_range("fraction", f, 0.0, 1.0)?;
        }
        let sum: f64 = fractions.iter().sum();
        if !tol.sum_is_unit(sum) {
            return Err(PfError::validation(format!(
                "组分之和 {sum} 偏离 1 超过容差 {}",
                tol.composition_sum
            )));
        }
        let normalized: Vec<f64> = fractions.iter().map(|f| f / sum).collect();
        Ok(match self {
            Self::VolumeFractions(_) => Self::VolumeFractions(normalized),
            Self::MassFractions(_) => Self::MassFractions(normalized),
        })
    }

    /// 在给定 (p0, T0) 下解析为体积分数
    ///
    /// 各相密度由各自状态方程在 (p0, T0) 处求得；质量分数输入
    /// 通过 α_k = ρ_mix·Y_k/ρ_k 转换。
    pub fn resolve_alpha(&self, eos: &EosSet, p0: f64, t0: f64) -> Vec<f64> {
        let rhok: Vec<f64> = eos.iter().map(|law| law.density(p0, t0)).collect();
        match self {
            Self::VolumeFractions(alpha) => alpha.clone(),
            Self::MassFractions(yk) => {
                let rho_mix = 1.0
                    / yk.iter()
                        .zip(&rhok)
                        .map(|(y, r)| y / r)
                        .sum::<f64>();
                yk.iter()
                    .zip(&rhok)
                    .map(|(y, r)| rho_mix * y / r)
                    .collect()
            }
        }
    }
}

// ============================================================
// 解析后的储源状态
// ============================================================

/// 给定时刻的储源状态
///
/// 由 [`TankParameters::resolve`] 在每个时间步解析得到，
/// 传给储罐半黎曼求解器。
#[derive(Debug, Clone, PartialEq)]
pub struct ReservoirState {
    /// 各相体积分数 ak0
    pub alpha: Vec<f64>,
    /// 各相密度 ρk0（由 (p0, T0) 求得）
    pub density: Vec<f64>,
    /// 滞止压力 p0 [Pa]
    pub pressure: f64,
    /// 滞止温度 T0 [K]
    pub temperature: f64,
    /// 被动输运标量的储源值
    pub transports: Vec<f64>,
}

impl ReservoirState {
    /// 储源混合物密度 Σ α_k ρ_k
    pub fn mixture_density(&self) -> f64 {
        self.alpha
            .iter()
            .zip(&self.density)
            .map(|(a, r)| a * r)
            .sum()
    }
}

// ============================================================
// 储罐边界参数
// ============================================================

/// 储罐/储源边界参数（滞止 p0, T0 + 组分）
///
/// 压力与温度历史为成对 (时间, 数值) 采样表，查询取不超过当前
/// 物理时间的最近采样。组分按装载时刻的末采样 (p0, T0) 解析为
/// 体积分数后固定；各相密度每步由查得的 (p0, T0) 重算。
#[derive(Debug, Clone)]
pub struct TankParameters {
    /// 装载时解析的体积分数
    alpha: Vec<f64>,
    /// 滞止压力历史
    p0: TimeTable,
    /// 滞止温度历史
    t0: TimeTable,
    /// 被动输运标量的储源值
    transports: Vec<f64>,
}

impl TankParameters {
    /// 创建储罐参数
    pub fn new(
        composition: Composition,
        p0: TimeTable,
        t0: TimeTable,
        transports: Vec<f64>,
        eos: &EosSet,
    ) -> PfResult<Self> {
        let composition = composition.validated(eos.len())?;
        let alpha = composition.resolve_alpha(eos, p0.last(), t0.last());
        Ok(Self {
            alpha,
            p0,
            t0,
            transports,
        })
    }

    /// 常值储罐（p0, T0 不随时间变化）
    pub fn constant(
        composition: Composition,
        p0: f64,
        t0: f64,
        eos: &EosSet,
    ) -> PfResult<Self> {
        Self::new(
            composition,
            TimeTable::constant(p0),
            TimeTable::constant(t0),
            Vec::new(),
            eos,
        )
    }

    /// 附加被动输运标量储源值
    pub fn with_transports(mut self, transports: Vec<f64>) -> Self {
        self.transports = transports;
        self
    }

    /// 被动输运标量储源值
    pub fn transports(&self) -> &[f64] {
        &self.transports
    }

    /// 解析给定物理时刻的储源状态
    pub fn resolve(&self, time: f64, eos: &EosSet) -> ReservoirState {
        let p0 = self.p0.value_at(time);
        let t0 = self.t0.value_at(time);
        let density = eos.iter().map(|law| law.density(p0, t0)).collect();
        ReservoirState {
            alpha: self.alpha.clone(),
            density,
            pressure: p0,
            temperature: t0,
            transports: self.transports.clone(),
        }
    }
}

// ============================================================
// 入流边界参数
// ============================================================

/// 入流边界参数（给定质量流量 m0 与储源组分）
///
/// `m0` 以界面法向（指向域外）为正方向，入流为负值。
#[derive(Debug, Clone, PartialEq)]
pub struct InflowParameters {
    /// 给定质量流量 [kg/(s·m²)]，入流为负
    pub m0: f64,
    /// 各相体积分数 ak0
    pub alpha: Vec<f64>,
    /// 各相密度 ρk0
    pub density: Vec<f64>,
    /// 各相压力 pk0
    pub pressure: Vec<f64>,
    /// 被动输运标量的储源值
    pub transports: Vec<f64>,
}

impl InflowParameters {
    /// 创建入流参数
    pub fn new(
        m0: f64,
        composition: Composition,
        density: Vec<f64>,
        pressure: Vec<f64>,
        n_phases: usize,
    ) -> PfResult<Self> {
        if m0 >= 0.0 {
            return Err(PfError::invalid_input(format!(
                "入流质量流量必须为负（指向计算域），实际 {m0}"
            )));
        }
        PfError::check_size("InflowParameters::density", n_phases, density.len())?;
        PfError::check_size("InflowParameters::pressure", n_phases, pressure.len())?;
        let alpha = match composition.validated(n_phases)? {
            Composition::VolumeFractions(alpha) => alpha,
            Composition::MassFractions(yk) => {
                // 质量分数输入用给定的各相密度转换
                let rho_mix = 1.0
                    / yk.iter()
                        .zip(&density)
                        .map(|(y, r)| y / r)
                        .sum::<f64>();
                yk.iter()
                    .zip(&density)
                    .map(|(y, r)| rho_mix * y / r)
                    .collect()
            }
        };
        Ok(Self {
            m0,
            alpha,
            density,
            pressure,
            transports: Vec::new(),
        })
    }

    /// 附加被动输运标量储源值
    pub fn with_transports(mut self, transports: Vec<f64>) -> Self {
        self.transports = transports;
        self
    }

    /// 储源混合物密度 Σ α_k ρ_k
    pub fn mixture_density(&self) -> f64 {
        self.alpha
            .iter()
            .zip(&self.density)
            .map(|(a, r)| a * r)
            .sum()
    }
}

// ============================================================
// 出流边界参数
// ============================================================

/// 出流边界参数（给定静压 p0）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutflowParameters {
    /// 给定静压 [Pa]
    pub p0: f64,
}

impl OutflowParameters {
    /// 创建出流参数
    pub fn new(p0: f64) -> PfResult<Self> {
        if !p0.is_finite() || p0 <= 0.0 {
            return Err(PfError::out_of_range("p0", p0, 0.0, f64::MAX));
        }
        Ok(Self { p0 })
    }
}
