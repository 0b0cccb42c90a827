//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `energy`: 能量曲线（可选绘图）
//! - `forces`: 最小受力步 / 每步最大受力
//! - `pathway`: 生成路径 3D 视图
//! - `summary`: 每个 image 的 OUTCAR 概要
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: energy, forces, pathway, summary

pub mod energy;
pub mod forces;
pub mod pathway;
pub mod summary;

use clap::{Parser, Subcommand};

/// neb-analyzer - NEB 计算后处理工具
#[derive(Parser)]
#[command(name = "neb-analyzer")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Analyze nudged elastic band (NEB) calculations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Print (and optionally plot) the energy profile of one optimization step
    Energy(energy::EnergyArgs),

    /// Find the step with the smallest maximum force
    Forces(forces::ForcesArgs),

    /// Write an interactive 3D viewer of the pathway
    Pathway(pathway::PathwayArgs),

    /// Summarize the OUTCAR of every image
    Summary(summary::SummaryArgs),
}
