// script_gen.rs
// 提交脚本生成器，将一个扫描渲染为完整的集群批处理脚本并写入磁盘。
use crate::config::SlurmDirectives;
use crate::error::Result;
use crate::sweep::SweepGenerator;
use std::fs;
use std::path::Path;

/// 提交脚本生成器。资源声明只渲染为 #SBATCH 指令行，由外部调度器消费。
pub struct ScriptGenerator {
    /// 作业名
    pub job_name: String,
    /// 集群资源声明
    pub directives: SlurmDirectives,
}

impl ScriptGenerator {
    /// 创建新的脚本生成器
    pub fn new(job_name: &str, directives: SlurmDirectives) -> Self {
        Self {
            job_name: job_name.to_string(),
            directives,
        }
    }

    /// 渲染完整的提交脚本：#SBATCH头、环境激活、工作目录切换，
    /// 随后按扫描顺序每个调用一行命令。
    pub fn render(&self, generator: &SweepGenerator, sweep_id: &str) -> Result<String> {
        let invocations = generator.generate(sweep_id)?;

        let mut script = String::new();
        script.push_str("#!/bin/bash\n");
        script.push_str(&format!("#SBATCH --job-name={}\n", self.job_name));
        script.push_str(&format!("#SBATCH --partition={}\n", self.directives.partition));
        script.push_str(&format!("#SBATCH --gres=gpu:{}\n", self.directives.gpus));
        script.push_str(&format!("#SBATCH --mem={}\n", self.directives.mem));
        script.push_str(&format!("#SBATCH --cpus-per-task={}\n", self.directives.cpus_per_task));
        script.push_str(&format!("#SBATCH --time={}\n", self.directives.time));
        script.push_str(&format!("#SBATCH --output={}\n", self.directives.output_pattern));
        script.push('\n');
        // 先切换到工作目录，再激活其下的虚拟环境；
        // 命令行中的相对解释器路径同样在chdir之后解析
        script.push_str(&format!("cd {}\n", generator.config.working_dir));
        script.push_str("source venv/bin/activate\n");
        script.push('\n');
        for invocation in &invocations {
            script.push_str(&invocation.command_line());
            script.push('\n');
        }
        Ok(script)
    }

    /// 渲染并写入脚本文件，父目录不存在时先创建
    pub fn write_script(&self, generator: &SweepGenerator, sweep_id: &str, path: &str) -> Result<()> {
        let script = self.render(generator, sweep_id)?;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, script)?;
        println!("提交脚本已写入: {}", path);
        Ok(())
    }
}
