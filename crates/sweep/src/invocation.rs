// invocation.rs
// 定义调用记录：一次外部程序执行的完整参数绑定及其生命周期状态。
use serde::{Deserialize, Serialize};

/// 调用状态枚举，描述单次调用的生命周期
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InvocationStatus {
    /// 等待执行
    Pending,
    /// 正在执行
    Running,
    /// 已完成
    Completed,
    /// 执行失败，包含失败原因
    Failed(String),
}

/// 调用记录，包含调用ID、程序路径、完整参数列表、状态和退出码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// 调用唯一ID，由扫描ID和轴坐标派生
    pub invocation_id: String,
    /// 可执行程序路径
    pub program: String,
    /// 展平后的命令行参数列表（含外部脚本路径和所有 --flag value 对）
    pub args: Vec<String>,
    /// 当前调用状态
    pub status: InvocationStatus,
    /// 外部程序退出码，仅在执行结束后有值
    pub exit_code: Option<i32>,
}

impl Invocation {
    /// 渲染为单行命令文本，用于计划预览和提交脚本生成
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let invocation = Invocation {
            invocation_id: "sweep_subject_1".to_string(),
            program: "python3".to_string(),
            args: vec![
                "fit_model.py".to_string(),
                "--subject".to_string(),
                "1".to_string(),
            ],
            status: InvocationStatus::Pending,
            exit_code: None,
        };
        assert_eq!(
            invocation.command_line(),
            "python3 fit_model.py --subject 1"
        );
    }
}
