// drivers.rs
// 两个具体扫描驱动的定义：模型拟合扫描（被试 × sigma网格）和Gabor纹理特征提取扫描（被试）。
use crate::axis::{ParamValue, SweepAxis};
use crate::config::SweepConfig;
use crate::error::{Error, Result};
use crate::sweep::SweepGenerator;
use rand::Rng;
use std::path::Path;

/// NSD数据集的全部被试编号
pub const NSD_SUBJECTS: [i64; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// sigma网格的取值个数
pub const SIGMA_GRID_STEPS: usize = 10;

/// 生成 steps 个在 [min, max] 闭区间内对数等距的点
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(Error::AxisError(format!(
            "非法的对数网格范围: min={}, max={}",
            min, max
        )));
    }
    if steps < 2 {
        return Err(Error::AxisError("对数网格至少需要2个点".to_string()));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut values = Vec::with_capacity(steps);
    for i in 0..steps {
        values.push((ln_min + step * i as f64).exp());
    }
    Ok(values)
}

/// 拟合扫描使用的sigma网格：0.020到1.000之间的10个对数等距值。
/// 渲染为三位小数文本，与原始作业脚本中的字面量逐字节一致。
pub fn sigma_grid() -> Result<Vec<ParamValue>> {
    let values = log_space(0.02, 1.0, SIGMA_GRID_STEPS)?;
    Ok(values
        .into_iter()
        .map(|v| ParamValue::Text(format!("{:.3}", v)))
        .collect())
}

/// 确定Python解释器路径，优先使用工作目录下的虚拟环境。
/// 返回相对于工作目录的路径：子进程在工作目录下启动，
/// 提交脚本也先切换到工作目录再执行命令，相对路径在chdir之后解析。
pub fn resolve_python(working_dir: &str) -> String {
    if Path::new(working_dir).join("venv/bin/python3").exists() {
        "venv/bin/python3".to_string()
    } else {
        "python3".to_string()
    }
}

/// 被试扫描轴
fn subject_axis(subjects: &[i64]) -> SweepAxis {
    SweepAxis::new(
        "subject",
        subjects.iter().map(|s| ParamValue::Int(*s)).collect(),
    )
}

/// 驱动A：模型拟合扫描，对每个 (被试, sigma) 组合调用一次 fit_model.py。
/// 固定参数复现外部程序的命令行契约，布尔参数以0/1整数传递。
/// randomize_seed 为真时预先抽取一个非零乱序种子写入参数列表
/// （fit_model.py 在种子为0时自行随机抽取，预抽取使种子留有记录）；
/// 为假时保持0，重复生成的结果完全确定。
pub fn fit_model_sweep(subjects: &[i64], randomize_seed: bool) -> Result<SweepGenerator> {
    let working_dir = "code/model_fitting".to_string();

    let shuff_rnd_seed = if randomize_seed {
        rand::thread_rng().gen_range(1..1_000_000_i64)
    } else {
        0
    };

    let fixed: Vec<(String, ParamValue)> = [
        ("fitting_type", ParamValue::from("gabor_texture")),
        ("volume_space", ParamValue::Int(1)),
        ("up_to_sess", ParamValue::Int(40)),
        ("single_sess", ParamValue::Int(0)),
        ("which_prf_grid", ParamValue::Int(5)),
        ("use_precomputed_prfs", ParamValue::Int(0)),
        ("sample_batch_size", ParamValue::Int(100)),
        ("voxel_batch_size", ParamValue::Int(100)),
        ("zscore_features", ParamValue::Int(1)),
        ("ridge", ParamValue::Int(1)),
        ("shuff_rnd_seed", ParamValue::Int(shuff_rnd_seed)),
        ("debug", ParamValue::Int(0)),
        ("do_fitting", ParamValue::Int(1)),
        ("do_val", ParamValue::Int(1)),
        ("do_tuning", ParamValue::Int(0)),
        ("do_sem_disc", ParamValue::Int(0)),
        ("do_varpart", ParamValue::Int(0)),
        ("save_pred_data", ParamValue::Int(0)),
        ("date_str", ParamValue::Int(0)),
        ("n_ori_gabor", ParamValue::Int(12)),
        ("n_sf_gabor", ParamValue::Int(8)),
        ("gabor_nonlin_fn", ParamValue::Int(1)),
        ("random_images", ParamValue::Int(0)),
        ("random_voxel_data", ParamValue::Int(0)),
    ]
    .into_iter()
    .map(|(flag, value)| (flag.to_string(), value))
    .collect();

    let config = SweepConfig {
        program: resolve_python(&working_dir),
        script: "fit_model.py".to_string(),
        working_dir,
        fixed,
    };

    // 被试轴在外层，sigma轴在内层
    let axes = vec![subject_axis(subjects), SweepAxis::new("prf_fixed_sigma", sigma_grid()?)];
    Ok(SweepGenerator::new(config, axes))
}

/// 驱动B：Gabor纹理特征提取扫描，对每个被试调用一次
/// extract_gabor_texture_features.py。
pub fn gabor_feature_sweep(subjects: &[i64]) -> Result<SweepGenerator> {
    let working_dir = "code/feature_extraction".to_string();

    let fixed: Vec<(String, ParamValue)> = [
        ("image_set", ParamValue::from("nsd")),
        ("use_node_storage", ParamValue::Int(1)),
        ("debug", ParamValue::Int(0)),
        ("which_prf_grid", ParamValue::Int(5)),
        ("batch_size", ParamValue::Int(100)),
        ("n_ori", ParamValue::Int(12)),
        ("n_sf", ParamValue::Int(8)),
    ]
    .into_iter()
    .map(|(flag, value)| (flag.to_string(), value))
    .collect();

    let config = SweepConfig {
        program: resolve_python(&working_dir),
        script: "extract_gabor_texture_features.py".to_string(),
        working_dir,
        fixed,
    };

    Ok(SweepGenerator::new(config, vec![subject_axis(subjects)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_python_prefers_working_dir_venv() {
        let dir = tempdir().unwrap();
        let work = dir.path();

        // 没有虚拟环境时回退到PATH上的python3
        assert_eq!(resolve_python(work.to_str().unwrap()), "python3");

        std::fs::create_dir_all(work.join("venv/bin")).unwrap();
        std::fs::write(work.join("venv/bin/python3"), "").unwrap();
        // 返回相对工作目录的路径，供子进程在chdir之后解析
        assert_eq!(resolve_python(work.to_str().unwrap()), "venv/bin/python3");
    }

    #[test]
    fn test_log_space_bounds_and_count() {
        let values = log_space(0.02, 1.0, 10).unwrap();
        assert_eq!(values.len(), 10);
        assert!((values[0] - 0.02).abs() < 1e-12);
        assert!((values[9] - 1.0).abs() < 1e-12);
        // 严格单调递增
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_log_space_rejects_bad_ranges() {
        assert!(log_space(0.0, 1.0, 10).is_err());
        assert!(log_space(-0.5, 1.0, 10).is_err());
        assert!(log_space(1.0, 0.02, 10).is_err());
        assert!(log_space(0.02, 1.0, 1).is_err());
    }

    #[test]
    fn test_sigma_grid_matches_original_literals() {
        let grid = sigma_grid().unwrap();
        let rendered: Vec<String> = grid.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "0.020", "0.031", "0.048", "0.074", "0.114", "0.176", "0.271", "0.419",
                "0.647", "1.000"
            ]
        );
    }

    #[test]
    fn test_fit_sweep_count_is_subjects_times_sigmas() {
        let generator = fit_model_sweep(&NSD_SUBJECTS, false).unwrap();
        assert_eq!(generator.total_invocations(), 8 * SIGMA_GRID_STEPS);

        let generator = fit_model_sweep(&[1, 2], false).unwrap();
        let invocations = generator.generate("fit").unwrap();
        assert_eq!(invocations.len(), 2 * SIGMA_GRID_STEPS);
    }

    #[test]
    fn test_gabor_sweep_count_is_subject_count() {
        let generator = gabor_feature_sweep(&[1, 5, 7]).unwrap();
        let invocations = generator.generate("gabor").unwrap();
        assert_eq!(invocations.len(), 3);
    }

    #[test]
    fn test_fit_sweep_external_contract() {
        let generator = fit_model_sweep(&[1], false).unwrap();
        let invocations = generator.generate("fit").unwrap();
        let args = &invocations[0].args;

        // 脚本路径在参数列表首位
        assert_eq!(args[0], "fit_model.py");
        // 轴参数在前，固定参数块在后
        assert_eq!(args[1], "--subject");
        assert_eq!(args[2], "1");
        assert_eq!(args[3], "--prf_fixed_sigma");
        assert_eq!(args[4], "0.020");
        let fixed_block = &args[5..];
        assert!(fixed_block.contains(&"--fitting_type".to_string()));
        assert!(fixed_block.contains(&"gabor_texture".to_string()));
        assert!(fixed_block.contains(&"--ridge".to_string()));
        assert!(fixed_block.contains(&"--n_ori_gabor".to_string()));
    }

    #[test]
    fn test_gabor_sweep_external_contract() {
        let generator = gabor_feature_sweep(&[3]).unwrap();
        let invocations = generator.generate("gabor").unwrap();
        let args = &invocations[0].args;

        assert_eq!(args[0], "extract_gabor_texture_features.py");
        assert_eq!(args[1], "--subject");
        assert_eq!(args[2], "3");
        assert!(args.contains(&"--image_set".to_string()));
        assert!(args.contains(&"nsd".to_string()));
        assert!(args.contains(&"--batch_size".to_string()));
    }

    #[test]
    fn test_fixed_seed_keeps_regeneration_deterministic() {
        let first = fit_model_sweep(&[1, 2], false).unwrap().generate("fit").unwrap();
        let second = fit_model_sweep(&[1, 2], false).unwrap().generate("fit").unwrap();
        let first_args: Vec<&Vec<String>> = first.iter().map(|inv| &inv.args).collect();
        let second_args: Vec<&Vec<String>> = second.iter().map(|inv| &inv.args).collect();
        assert_eq!(first_args, second_args);
    }

    #[test]
    fn test_randomized_seed_is_nonzero_and_shared() {
        let generator = fit_model_sweep(&[1, 2], true).unwrap();
        let invocations = generator.generate("fit").unwrap();

        let seed_of = |args: &[String]| {
            let idx = args.iter().position(|a| a == "--shuff_rnd_seed").unwrap();
            args[idx + 1].clone()
        };
        let seed = seed_of(&invocations[0].args);
        assert_ne!(seed, "0");
        // 同一扫描内所有调用共享同一个预抽取种子
        for inv in &invocations {
            assert_eq!(seed_of(&inv.args), seed);
        }
    }
}
