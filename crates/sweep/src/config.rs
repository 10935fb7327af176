// config.rs
// 扫描全局配置结构体及其默认实现，包含固定参数记录、运行器配置和集群资源声明。
use crate::axis::ParamValue;
use crate::error::{Error, Result};
use crate::runner::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 单个驱动的扫描配置：要执行的外部程序、工作目录和所有调用共享的固定参数。
/// 在扫描开始时构造一次，按值传入生成器，迭代期间不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// 可执行程序路径（已解析的解释器）
    pub program: String,
    /// 外部脚本路径，作为第一个参数传给解释器
    pub script: String,
    /// 工作目录，外部脚本相对此目录定位
    pub working_dir: String,
    /// 固定参数的有序列表 (标志名, 取值)，所有调用共享且逐字节一致
    pub fixed: Vec<(String, ParamValue)>,
}

/// 运行器全局配置，控制失败策略和日志文件路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// 调用失败时的处理策略
    pub failure_policy: FailurePolicy,
    /// 追加写入的共享日志文件路径，None表示继承父进程的标准输出
    pub log_path: Option<String>,
}

impl Default for RunnerConfig {
    /// 默认配置：忽略失败继续扫描（与原始脚本行为一致），不重定向日志
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::ContinueOnError,
            log_path: None,
        }
    }
}

impl RunnerConfig {
    /// 从JSON文件读取运行器配置
    /// 文件不存在或格式错误则返回配置错误
    pub fn from_json_file(path: &str) -> Result<Self> {
        let config_path = Path::new(path);
        if !config_path.exists() {
            return Err(Error::ConfigError(format!("未找到配置文件 {}", path)));
        }
        let mut file = File::open(config_path)
            .map_err(|e| Error::ConfigError(format!("打开配置文件失败: {}", e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| Error::ConfigError(format!("读取配置文件失败: {}", e)))?;
        let config: RunnerConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("解析配置文件失败: {}", e)))?;
        Ok(config)
    }
}

/// 集群资源声明，由外部调度器消费，不是可执行逻辑。
/// 仅在生成提交脚本时渲染为 #SBATCH 指令行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlurmDirectives {
    /// 分区名
    pub partition: String,
    /// GPU数量
    pub gpus: u32,
    /// 内存请求（如 "48G"）
    pub mem: String,
    /// CPU核数
    pub cpus_per_task: u32,
    /// 时间上限（如 "7-00:00:00"）
    pub time: String,
    /// 输出日志文件名模式，%j为作业ID，%x为作业名
    pub output_pattern: String,
}

impl Default for SlurmDirectives {
    /// 默认资源声明，复现原始作业头：1块GPU、4核、48G、7天时限
    fn default() -> Self {
        Self {
            partition: "gpu".to_string(),
            gpus: 1,
            mem: "48G".to_string(),
            cpus_per_task: 4,
            time: "7-00:00:00".to_string(),
            output_pattern: "%j_%x.out".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_runner_config_default() {
        let config = RunnerConfig::default();
        assert!(matches!(config.failure_policy, FailurePolicy::ContinueOnError));
        assert!(config.log_path.is_none());
    }

    #[test]
    fn test_runner_config_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"failure_policy":"FailFast","log_path":"sweep.out"}}"#
        )
        .unwrap();

        let config = RunnerConfig::from_json_file(path.to_str().unwrap()).unwrap();
        assert!(matches!(config.failure_policy, FailurePolicy::FailFast));
        assert_eq!(config.log_path.as_deref(), Some("sweep.out"));
    }

    #[test]
    fn test_runner_config_missing_file() {
        let result = RunnerConfig::from_json_file("no_such_dir/runner.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_slurm_directives_roundtrip() {
        let directives = SlurmDirectives::default();
        let json = serde_json::to_string(&directives).unwrap();
        let back: SlurmDirectives = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gpus, 1);
        assert_eq!(back.mem, "48G");
        assert_eq!(back.output_pattern, "%j_%x.out");
    }
}
