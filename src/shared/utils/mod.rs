/// 공유 유틸리티 모듈
/// Shared Utilities Module
pub mod constant_time;

pub use constant_time::*;
