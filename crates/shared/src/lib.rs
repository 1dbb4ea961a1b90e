//! 共享库
//!
//! 规则引擎及其宿主共用的配置与可观测性基础设施。

pub mod config;
pub mod observability;
