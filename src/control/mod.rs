//! Per-cycle control laws: drive shaping, gear shifting, arm and claws.

pub mod arm;
pub mod drive;
pub mod gear;
