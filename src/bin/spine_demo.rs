use spine_roi::analysis::{analyze_stack, AnyExecutor, ParallelOptions};
use spine_roi::config::{load_config, AnalysisConfig};
use spine_roi::geometry::rasterize;
use spine_roi::image::io::{load_grayscale_plane, save_mask_png, write_json_file};
use spine_roi::image::ImageStack;
use spine_roi::BatchReport;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let planes = config
        .input
        .iter()
        .map(|p| load_grayscale_plane(p))
        .collect::<Result<Vec<_>, _>>()?;
    if planes.is_empty() {
        return Err("Config lists no input planes".to_string());
    }
    let stack = ImageStack::new(planes)?;

    let options = if config.parallel {
        ParallelOptions::new(true, 2)
    } else {
        ParallelOptions::disabled()
    };
    let executor = AnyExecutor::from_options(options);
    let report = analyze_stack(
        &executor,
        &stack,
        &config.segments,
        &config.spines,
        &config.params,
    );

    write_json_file(&config.output.result_json, &report)?;
    if let Some(dir) = &config.output.mask_dir {
        save_masks(dir, &stack, &report)?;
    }
    print_summary(&config, &report);
    Ok(())
}

fn save_masks(dir: &Path, stack: &ImageStack, report: &BatchReport) -> Result<(), String> {
    for result in &report.results {
        let Some(polygon) = &result.spine_roi_polygon else {
            continue;
        };
        let mask = rasterize(polygon, stack.w, stack.h);
        let path = dir.join(format!("spine_{}.png", result.spine_id));
        save_mask_png(&mask, &path)?;
    }
    Ok(())
}

fn print_summary(config: &AnalysisConfig, report: &BatchReport) {
    println!(
        "Analysed {} spine(s) on {} segment(s) in {:.2} ms ({} aborted, {} degraded background)",
        report.results.len(),
        config.segments.len(),
        report.timing.total_ms,
        report.aborted,
        report.degraded
    );
    let channel = config.params.channel;
    for result in report.results.iter().filter(|r| r.is_done()) {
        let cols = result.columns(channel);
        let get = |name: &str| {
            cols.iter()
                .find(|(n, _)| n == &format!("{name}_ch{channel}"))
                .map(|(_, v)| *v)
                .unwrap_or(f64::NAN)
        };
        println!(
            "  spine {:>4}  index {:>4}  sMean {:>8.4}  sbMean {:>8.4}  segMean {:>8.4}",
            result.spine_id,
            result.brightest_index.map_or(-1, |i| i as i64),
            get("sMean"),
            get("sbMean"),
            get("segMean"),
        );
    }
    println!("Saved results to {}", config.output.result_json.display());
}

fn usage() -> String {
    "Usage: spine_demo <config.json>".to_string()
}
