// lib.rs
// 扫描模块入口，声明并导出各子模块。
pub mod axis;
pub mod config;
pub mod drivers;
pub mod error;
pub mod invocation;
pub mod runner;
pub mod script_gen;
pub mod sweep;
