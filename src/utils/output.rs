//! # 终端输出工具
//!
//! 统一的状态行前缀：`[OK]` / `[*]` / `[WARN]` / `[ERR]`。
//! 状态行写到 stdout，错误写到 stderr，日志由 `env_logger` 单独输出到 stderr。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

const RULE_WIDTH: usize = 60;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印键值对，如 `  Transition state : 02`
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<18} : {}", key.dimmed(), value);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(RULE_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}
