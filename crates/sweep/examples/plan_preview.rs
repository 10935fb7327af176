use sweep::drivers::{fit_model_sweep, gabor_feature_sweep};
use sweep::error::Result;
use prettytable::{row, Table};
use uuid::Uuid;

/// 计划预览示例：展开两个驱动的扫描并以表格打印，不执行任何外部程序
fn main() -> Result<()> {
    println!("=== 扫描计划预览 ===");

    // 1. 拟合扫描：被试 × sigma网格
    let fit = fit_model_sweep(&[1, 2], false)?;
    println!(
        "拟合扫描: {} 个被试 × {} 个sigma = {} 个调用",
        2,
        fit.axes[1].values.len(),
        fit.total_invocations()
    );
    let invocations = fit.generate(&format!("fit_{}", Uuid::new_v4()))?;

    let mut table = Table::new();
    table.add_row(row!["调用ID", "命令"]);
    for invocation in invocations.iter().take(5) {
        table.add_row(row![invocation.invocation_id, invocation.command_line()]);
    }
    table.printstd();
    println!("（仅显示前5个调用）");

    // 2. 特征提取扫描：每个被试一个调用
    let gabor = gabor_feature_sweep(&[1, 2])?;
    let invocations = gabor.generate(&format!("gabor_{}", Uuid::new_v4()))?;
    for invocation in &invocations {
        println!("{}", invocation.command_line());
    }

    Ok(())
}
