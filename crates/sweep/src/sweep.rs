// sweep.rs
// 扫描生成器，负责将扫描配置和若干扫描轴按笛卡尔积展开为有序的调用列表。
use crate::axis::{ParamValue, SweepAxis};
use crate::config::SweepConfig;
use crate::error::{Error, Result};
use crate::invocation::{Invocation, InvocationStatus};

/// 扫描生成器，持有一个驱动的不可变配置和扫描轴定义。
/// 生成过程是确定性的且无副作用：相同输入重复生成得到完全相同的调用序列。
pub struct SweepGenerator {
    /// 扫描配置（固定参数记录）
    pub config: SweepConfig,
    /// 扫描轴列表，先声明的轴在嵌套循环外层
    pub axes: Vec<SweepAxis>,
}

impl SweepGenerator {
    /// 创建新的扫描生成器
    pub fn new(config: SweepConfig, axes: Vec<SweepAxis>) -> Self {
        Self { config, axes }
    }

    /// 验证扫描轴定义
    pub fn validate_axes(&self) -> Result<()> {
        if self.axes.is_empty() {
            return Err(Error::AxisError("扫描轴列表为空".to_string()));
        }
        for axis in &self.axes {
            axis.validate()?;
        }
        Ok(())
    }

    /// 笛卡尔积的调用总数
    pub fn total_invocations(&self) -> usize {
        self.axes.iter().map(|axis| axis.values.len()).product()
    }

    /// 展开笛卡尔积，生成有序的调用列表。
    /// 迭代顺序与嵌套循环一致：第一个轴最外层，最后一个轴最内层。
    pub fn generate(&self, sweep_id: &str) -> Result<Vec<Invocation>> {
        self.validate_axes()?;

        let sizes: Vec<usize> = self.axes.iter().map(|axis| axis.values.len()).collect();
        let total = self.total_invocations();
        let mut invocations = Vec::with_capacity(total);

        for index in 0..total {
            // 按轴分解线性下标，外层轴步长为后续各轴长度之积
            let mut point = Vec::with_capacity(self.axes.len());
            let mut stride = total;
            for (axis, size) in self.axes.iter().zip(&sizes) {
                stride /= size;
                let value_idx = (index / stride) % size;
                point.push((axis.flag.as_str(), &axis.values[value_idx]));
            }

            let invocation = Invocation {
                invocation_id: self.generate_invocation_id(sweep_id, &point),
                program: self.config.program.clone(),
                args: self.lower_arguments(&point),
                status: InvocationStatus::Pending,
                exit_code: None,
            };
            invocations.push(invocation);
        }

        // 进度行走标准错误，标准输出留给计划输出（如JSON转储）
        eprintln!("扫描 {} 展开为 {} 个调用", sweep_id, invocations.len());
        Ok(invocations)
    }

    /// 生成调用ID：扫描ID加各轴坐标
    fn generate_invocation_id(&self, sweep_id: &str, point: &[(&str, &ParamValue)]) -> String {
        let mut id = sweep_id.to_string();
        for (flag, value) in point {
            id.push('_');
            id.push_str(flag);
            id.push('_');
            id.push_str(&value.to_string());
        }
        id
    }

    /// 将一个轴坐标点降为展平的参数列表：
    /// 脚本路径在前，随后是轴参数（按轴声明顺序），最后是固定参数块。
    fn lower_arguments(&self, point: &[(&str, &ParamValue)]) -> Vec<String> {
        let mut args = Vec::with_capacity(2 + 2 * (point.len() + self.config.fixed.len()));
        args.push(self.config.script.clone());
        for (flag, value) in point {
            args.push(format!("--{}", flag));
            args.push(value.to_string());
        }
        for (flag, value) in &self.config.fixed {
            args.push(format!("--{}", flag));
            args.push(value.to_string());
        }
        args
    }
}
