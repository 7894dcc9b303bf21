// crates/pf_physics/src/boundary/mod.rs

//! 边界参数
//!
//! 定义四类边界条件的外部参数：壁面（无参数）、给定静压出流、
//! 给定质量流量入流、滞止储罐。参数由声明式配置构造，装载时
//! 校验，之后不可变（时变储罐通过时间表查询除外），由具体边界
//! 实例持有并显式传入求解调用——不经过任何环境全局状态。
//!
//! # 组分约定
//!
//! 储罐/入流组分要么是体积分数、要么是质量分数（二者互斥），
//! 各自之和须在 1 ± 1e-6 内，校验后归一化。

mod params;
mod timetable;

pub use params::{Composition, InflowParameters, OutflowParameters, ReservoirState, TankParameters};
pub use timetable::TimeTable;
