use sweep::config::SlurmDirectives;
use sweep::drivers::{fit_model_sweep, gabor_feature_sweep, NSD_SUBJECTS};
use sweep::error::Result;
use sweep::script_gen::ScriptGenerator;

/// 脚本生成示例：为两个驱动各生成一份集群提交脚本
fn main() -> Result<()> {
    println!("=== 生成集群提交脚本 ===");

    let fit = fit_model_sweep(&NSD_SUBJECTS, false)?;
    let script_gen = ScriptGenerator::new("fit_gabor", SlurmDirectives::default());
    script_gen.write_script(&fit, "fit_gabor", "jobs/fit_gabor.sh")?;

    let gabor = gabor_feature_sweep(&NSD_SUBJECTS)?;
    let script_gen = ScriptGenerator::new("extract_gabor", SlurmDirectives::default());
    script_gen.write_script(&gabor, "extract_gabor", "jobs/extract_gabor.sh")?;

    println!("可以查看 jobs/ 目录下的脚本文件。");
    Ok(())
}
