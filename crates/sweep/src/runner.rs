// runner.rs
// 调用运行器，负责将调用串行降为子进程执行，并处理失败策略与日志追加。
use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::invocation::{Invocation, InvocationStatus};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::process::{Command, Stdio};

/// 调用失败时的处理策略。
/// 原始脚本不检查外部程序退出码，对应 ContinueOnError；
/// FailFast 在首个失败处中止整个扫描。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// 忽略失败，继续执行剩余调用
    ContinueOnError,
    /// 首个失败即中止扫描
    FailFast,
}

/// 扫描执行汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    /// 调用总数
    pub total: usize,
    /// 成功完成数
    pub completed: usize,
    /// 失败数
    pub failed: usize,
}

/// 调用运行器。严格串行：每个调用运行结束后才开始下一个，驱动内部无并行。
pub struct InvocationRunner {
    /// 运行器配置
    pub config: RunnerConfig,
    /// 子进程工作目录，None表示继承当前目录
    pub working_dir: Option<String>,
}

impl InvocationRunner {
    /// 创建新的运行器实例
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            working_dir: None,
        }
    }

    /// 设置子进程工作目录
    pub fn set_working_dir(&mut self, dir: &str) {
        self.working_dir = Some(dir.to_string());
    }

    /// 串行执行整组调用，按失败策略处理非零退出。
    /// ContinueOnError 下失败只计数不中断，与原始脚本行为一致。
    pub fn run_sweep(&self, invocations: &mut [Invocation]) -> Result<SweepSummary> {
        let total = invocations.len();
        let mut completed = 0;
        let mut failed = 0;

        for invocation in invocations.iter_mut() {
            match self.run_single(invocation) {
                Ok(()) => {
                    completed += 1;
                }
                Err(e) => {
                    failed += 1;
                    match self.config.failure_policy {
                        FailurePolicy::ContinueOnError => {
                            eprintln!("调用 {} 失败: {}", invocation.invocation_id, e);
                        }
                        FailurePolicy::FailFast => {
                            return Err(Error::Other(format!(
                                "调用 {} 失败，扫描中止: {}",
                                invocation.invocation_id, e
                            )));
                        }
                    }
                }
            }
        }

        let summary = SweepSummary {
            total,
            completed,
            failed,
        };
        println!("扫描执行完成: 共 {} 个调用，成功 {}，失败 {}", total, completed, failed);
        Ok(summary)
    }

    /// 执行单个调用：启动子进程并等待其结束，随后记录退出码和状态。
    /// 配置了日志时子进程输出重定向追加到日志文件；
    /// 否则继承父进程的标准输出/错误，长作业的输出实时可见、不在内存中缓冲。
    /// 多个作业并发追加同一日志时交错顺序不保证，这不影响正确性。
    fn run_single(&self, invocation: &mut Invocation) -> Result<()> {
        invocation.status = InvocationStatus::Running;

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        if let Some(path) = &self.config.log_path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "=== {} ===", invocation.invocation_id)?;
            command.stdout(Stdio::from(file.try_clone()?));
            command.stderr(Stdio::from(file));
        }

        let status = command.status().map_err(|e| {
            let msg = format!("启动 {} 失败: {}", invocation.program, e);
            invocation.status = InvocationStatus::Failed(msg.clone());
            Error::SpawnError(msg)
        })?;

        invocation.exit_code = status.code();
        if status.success() {
            invocation.status = InvocationStatus::Completed;
            Ok(())
        } else {
            let msg = format!("退出码 {:?}", status.code());
            invocation.status = InvocationStatus::Failed(msg.clone());
            Err(Error::Other(msg))
        }
    }
}
