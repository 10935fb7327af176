use sweep::config::RunnerConfig;
use sweep::drivers::gabor_feature_sweep;
use sweep::runner::InvocationRunner;
use uuid::Uuid;

/// 执行示例：串行运行特征提取扫描，失败时继续后续调用
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let generator = gabor_feature_sweep(&[1])?;
    let sweep_id = format!("gabor_{}", Uuid::new_v4());
    let mut invocations = generator.generate(&sweep_id)?;

    let mut runner = InvocationRunner::new(RunnerConfig::default());
    runner.set_working_dir(&generator.config.working_dir);

    match runner.run_sweep(&mut invocations) {
        Ok(summary) => {
            println!("扫描结束: 成功 {}，失败 {}", summary.completed, summary.failed);
        }
        Err(e) => {
            eprintln!("扫描中止: {}", e);
            eprintln!("请检查Python环境和外部脚本路径。");
        }
    }
    Ok(())
}
