// crates/pf_physics/src/riemann/flux.rs

//! 通量暂存与界面局部基
//!
//! `FluxBuffer` 是单次界面求解的暂存累加器：按相的体积分数通量、
//! 质量通量、能量通量，一个动量向量，一个混合物能量通量标量，
//! 接触间断速度 sM，以及被动输运标量通量。
//!
//! 缓冲区没有跨调用身份，在调用间复用以避免分配，但绝不在并发
//! 执行的界面求解间共享——由调用方（每个扫掠任务）独占持有并
//! 显式传入。

use glam::DVec3;

/// 界面局部正交基
///
/// 法向指向界面右侧（边界界面指向计算域外）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceBasis {
    /// 法向量
    pub normal: DVec3,
    /// 切向量
    pub tangent: DVec3,
    /// 副法向量
    pub binormal: DVec3,
}

impl InterfaceBasis {
    /// 由三个正交单位向量创建
    pub fn new(normal: DVec3, tangent: DVec3, binormal: DVec3) -> Self {
        Self {
            normal,
            tangent,
            binormal,
        }
    }

    /// 由法向量构造任意一组正交基
    pub fn from_normal(normal: DVec3) -> Self {
        let n = normal.normalize();
        let helper = if n.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
        let tangent = n.cross(helper).normalize();
        let binormal = n.cross(tangent);
        Self {
            normal: n,
            tangent,
            binormal,
        }
    }

    /// x 轴法向基（一维问题）
    pub fn x_axis() -> Self {
        Self {
            normal: DVec3::X,
            tangent: DVec3::Y,
            binormal: DVec3::Z,
        }
    }

    /// 向量在局部基下的三个分量 (法向, 切向, 副法向)
    #[inline]
    pub fn local_components(&self, v: DVec3) -> (f64, f64, f64) {
        (
            v.dot(self.normal),
            v.dot(self.tangent),
            v.dot(self.binormal),
        )
    }
}

/// 单次界面求解的通量暂存
///
/// 不变量：`alpha`/`mass`/`energy` 的长度等于活动相数，
/// `transports` 的长度等于被动输运标量数，均在构造时确定。
#[derive(Debug, Clone, PartialEq)]
pub struct FluxBuffer {
    /// 各相体积分数通量
    pub alpha: Vec<f64>,
    /// 各相质量通量
    pub mass: Vec<f64>,
    /// 各相能量通量
    pub energy: Vec<f64>,
    /// 动量通量向量
    pub momentum: DVec3,
    /// 混合物能量通量
    pub energy_mixture: f64,
    /// 接触间断速度 sM
    pub s_m: f64,
    /// 被动输运标量通量
    pub transports: Vec<f64>,
}

impl FluxBuffer {
    /// 创建通量暂存
    pub fn new(n_phases: usize, n_transports: usize) -> Self {
        Self {
            alpha: vec![0.0; n_phases],
            mass: vec![0.0; n_phases],
            energy: vec![0.0; n_phases],
            momentum: DVec3::ZERO,
            energy_mixture: 0.0,
            s_m: 0.0,
            transports: vec![0.0; n_transports],
        }
    }

    /// 相数
    #[inline]
    pub fn n_phases(&self) -> usize {
        self.alpha.len()
    }

    /// 清零所有分量（保持容量）
    pub fn reset(&mut self) {
        self.alpha.fill(0.0);
        self.mass.fill(0.0);
        self.energy.fill(0.0);
        self.momentum = DVec3::ZERO;
        self.energy_mixture = 0.0;
        self.s_m = 0.0;
        self.transports.fill(0.0);
    }

    /// 将动量通量从界面局部基旋转回全局坐标系
    ///
    /// 标量通量（质量/能量/体积分数）与基无关，不做旋转。
    pub fn reverse_projection(&mut self, basis: &InterfaceBasis) {
        let q = self.momentum;
        self.momentum = basis.normal * q.x + basis.tangent * q.y + basis.binormal * q.z;
    }

    /// 检查数值有效性
    pub fn is_valid(&self) -> bool {
        self.momentum.is_finite()
            && self.energy_mixture.is_finite()
            && self.s_m.is_finite()
            && self.alpha.iter().all(|v| v.is_finite())
            && self.mass.iter().all(|v| v.is_finite())
            && self.energy.iter().all(|v| v.is_finite())
    }
}
