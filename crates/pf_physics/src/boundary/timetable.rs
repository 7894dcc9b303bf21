// crates/pf_physics/src/boundary/timetable.rs

//! 时变边界条件的时间表
//!
//! 存储成对的 (时间, 数值) 采样，驱动时变储罐条件。
//! 查询返回不超过当前物理时间的最近一个采样，采样之间不插值。

use serde::{Deserialize, Serialize};

use pf_foundation::{PfError, PfResult};

/// 时间表
///
/// # 约束
///
/// - 时间数组严格单调递增
/// - 时间与数值数组长度相等且非空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
    /// 时间点 [s]（严格单调递增）
    times: Vec<f64>,
    /// 对应的值
    values: Vec<f64>,
}

impl TimeTable {
    /// 从时间与数值数组创建
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> PfResult<Self> {
        PfError::check_size("TimeTable", times.len(), values.len())?;
        if times.is_empty() {
            return Err(PfError::invalid_input("时间表不能为空"));
        }
        for pair in times.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PfError::invalid_input(format!(
                    "时间表必须严格单调递增: {} 之后出现 {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self { times, values })
    }

    /// 常值表（不随时间变化）
    pub fn constant(value: f64) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
        }
    }

    /// 采样数
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// 是否为空（构造保证非空）
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// 查询不超过 `time` 的最近采样值
    ///
    /// `time` 早于首个采样时返回首个值。
    pub fn value_at(&self, time: f64) -> f64 {
        match self.times.partition_point(|&t| t <= time) {
            0 => self.values[0],
            i => self.values[i - 1],
        }
    }

    /// 末一个采样值
    pub fn last(&self) -> f64 {
        *self.values.last().expect("TimeTable 构造保证非空")
    }
}
