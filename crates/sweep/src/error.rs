// error.rs
// 定义项目通用的错误类型（如IO、配置、扫描轴、子进程等）和Result类型。
use std::fmt;
use std::io;

/// 项目通用错误类型，涵盖IO、配置、扫描轴、子进程启动等错误
#[derive(Debug)]
pub enum Error {
    /// IO错误
    Io(io::Error),
    /// 配置错误
    ConfigError(String),
    /// 扫描轴错误（如空轴、非法取值范围）
    AxisError(String),
    /// 子进程启动错误
    SpawnError(String),
    /// 其他类型错误
    Other(String),
}

/// 通用结果类型
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO错误: {}", e),
            Error::ConfigError(msg) => write!(f, "配置错误: {}", msg),
            Error::AxisError(msg) => write!(f, "扫描轴错误: {}", msg),
            Error::SpawnError(msg) => write!(f, "子进程启动错误: {}", msg),
            Error::Other(msg) => write!(f, "其他错误: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
