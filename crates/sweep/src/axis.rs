// axis.rs
// 定义扫描轴相关类型：标量参数值、扫描轴（命令行标志名 + 有序取值列表）。
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 标量参数值，渲染为命令行上的单个token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// 整数参数（布尔参数以0/1整数形式传递）
    Int(i64),
    /// 浮点参数
    Float(f64),
    /// 文本参数（也用于格式已固定的数值字面量，如 "0.020"）
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// 扫描轴：一个命令行标志名和它的有序取值序列。
/// 轴的声明顺序决定嵌套循环顺序：先声明的轴在外层。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepAxis {
    /// 命令行标志名（不含前导 "--"）
    pub flag: String,
    /// 有序取值列表，顺序即扫描顺序
    pub values: Vec<ParamValue>,
}

impl SweepAxis {
    /// 创建新的扫描轴
    pub fn new(flag: &str, values: Vec<ParamValue>) -> Self {
        Self {
            flag: flag.to_string(),
            values,
        }
    }

    /// 验证扫描轴格式
    pub fn validate(&self) -> Result<()> {
        if self.flag.is_empty() {
            return Err(Error::AxisError("扫描轴标志名为空".to_string()));
        }
        if self.values.is_empty() {
            return Err(Error::AxisError(format!("扫描轴 {} 的取值列表为空", self.flag)));
        }
        Ok(())
    }
}
