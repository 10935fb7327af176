// main.rs
// 扫描驱动命令行入口：选择驱动、预览计划、生成提交脚本或串行执行扫描。
use anyhow::{bail, Result};
use prettytable::{row, Table};
use sweep::config::{RunnerConfig, SlurmDirectives};
use sweep::drivers::{fit_model_sweep, gabor_feature_sweep, NSD_SUBJECTS};
use sweep::invocation::Invocation;
use sweep::runner::{FailurePolicy, InvocationRunner};
use sweep::script_gen::ScriptGenerator;
use sweep::sweep::SweepGenerator;
use uuid::Uuid;

/// 命令行选项
struct CliOptions {
    /// 驱动名："fit" 或 "gabor"
    driver: String,
    /// 被试列表覆盖，None使用全部NSD被试
    subjects: Option<Vec<i64>>,
    /// 只打印调用计划表格，不执行
    dry_run: bool,
    /// 以JSON形式输出调用计划
    json: bool,
    /// 生成提交脚本的输出路径
    emit_script: Option<String>,
    /// 首个失败即中止
    fail_fast: bool,
    /// 追加日志文件路径
    log_path: Option<String>,
    /// 运行器JSON配置文件路径
    config_path: Option<String>,
    /// 为拟合扫描预抽取非零乱序种子
    randomize_seed: bool,
}

fn usage() -> &'static str {
    "用法: model-sweeps <fit|gabor> [选项]\n\
     选项:\n\
       --subjects 1,2,5     覆盖被试列表（默认1-8全部被试）\n\
       --dry-run            只打印调用计划，不执行\n\
       --json               以JSON形式输出调用计划\n\
       --emit-script PATH   生成集群提交脚本并写入PATH\n\
       --fail-fast          首个失败即中止扫描\n\
       --log PATH           子进程输出追加到PATH\n\
       --config PATH        从JSON文件读取运行器配置\n\
       --randomize-seed     为拟合扫描预抽取非零乱序种子"
}

/// 解析逗号分隔的被试列表
fn parse_subjects(text: &str) -> Result<Vec<i64>> {
    let mut subjects = Vec::new();
    for part in text.split(',') {
        let subject: i64 = part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("非法的被试编号: {}", part))?;
        subjects.push(subject);
    }
    if subjects.is_empty() {
        bail!("被试列表为空");
    }
    Ok(subjects)
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    if args.is_empty() {
        bail!("{}", usage());
    }
    let driver = args[0].clone();
    if driver != "fit" && driver != "gabor" {
        bail!("未知驱动 {}\n{}", driver, usage());
    }

    let mut options = CliOptions {
        driver,
        subjects: None,
        dry_run: false,
        json: false,
        emit_script: None,
        fail_fast: false,
        log_path: None,
        config_path: None,
        randomize_seed: false,
    };

    let mut i = 1;
    while i < args.len() {
        let take_value = |i: usize| -> Result<String> {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("选项 {} 缺少参数值", args[i]))
        };
        match args[i].as_str() {
            "--subjects" => {
                options.subjects = Some(parse_subjects(&take_value(i)?)?);
                i += 2;
            }
            "--dry-run" => {
                options.dry_run = true;
                i += 1;
            }
            "--json" => {
                options.json = true;
                i += 1;
            }
            "--emit-script" => {
                options.emit_script = Some(take_value(i)?);
                i += 2;
            }
            "--fail-fast" => {
                options.fail_fast = true;
                i += 1;
            }
            "--log" => {
                options.log_path = Some(take_value(i)?);
                i += 2;
            }
            "--config" => {
                options.config_path = Some(take_value(i)?);
                i += 2;
            }
            "--randomize-seed" => {
                options.randomize_seed = true;
                i += 1;
            }
            other => bail!("未知选项 {}\n{}", other, usage()),
        }
    }
    Ok(options)
}

/// 按选项构造驱动对应的扫描生成器
fn build_generator(options: &CliOptions) -> Result<(SweepGenerator, &'static str)> {
    let subjects = options
        .subjects
        .clone()
        .unwrap_or_else(|| NSD_SUBJECTS.to_vec());
    match options.driver.as_str() {
        "fit" => Ok((
            fit_model_sweep(&subjects, options.randomize_seed)?,
            "fit_gabor",
        )),
        "gabor" => Ok((gabor_feature_sweep(&subjects)?, "extract_gabor")),
        _ => unreachable!(),
    }
}

/// 以表格形式打印调用计划
fn print_plan(invocations: &[Invocation]) {
    let mut table = Table::new();
    table.add_row(row!["序号", "调用ID", "命令"]);
    for (i, invocation) in invocations.iter().enumerate() {
        table.add_row(row![i + 1, invocation.invocation_id, invocation.command_line()]);
    }
    table.printstd();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let (generator, job_name) = build_generator(&options)?;
    let sweep_id = format!("{}_{}", job_name, Uuid::new_v4());

    // 生成提交脚本后直接返回，不在本地执行
    if let Some(path) = &options.emit_script {
        let script_gen = ScriptGenerator::new(job_name, SlurmDirectives::default());
        script_gen.write_script(&generator, &sweep_id, path)?;
        return Ok(());
    }

    let mut invocations = generator.generate(&sweep_id)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&invocations)?);
        return Ok(());
    }
    if options.dry_run {
        print_plan(&invocations);
        return Ok(());
    }

    // 运行器配置：文件配置打底，命令行选项覆盖
    let mut runner_config = match &options.config_path {
        Some(path) => RunnerConfig::from_json_file(path)?,
        None => RunnerConfig::default(),
    };
    if options.fail_fast {
        runner_config.failure_policy = FailurePolicy::FailFast;
    }
    if options.log_path.is_some() {
        runner_config.log_path = options.log_path.clone();
    }

    let mut runner = InvocationRunner::new(runner_config);
    runner.set_working_dir(&generator.config.working_dir);
    let summary = runner.run_sweep(&mut invocations)?;

    if summary.failed > 0 {
        eprintln!("注意: {} 个调用失败，详情见日志", summary.failed);
    }
    Ok(())
}
