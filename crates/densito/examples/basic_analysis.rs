use densito::{AnalysisConfig, Analyzer};
use image::ImageReader;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <plate.png> [config.json] [out.json]", args[0]);
        std::process::exit(2);
    }

    let image = ImageReader::open(&args[1])?.decode()?.to_luma8();
    let config = match args.get(2) {
        Some(path) => AnalysisConfig::from_json_file(Path::new(path))?,
        None => AnalysisConfig::default(),
    };

    let result = Analyzer::with_config(config).analyze(&image)?;
    for sample in &result.samples {
        println!(
            "{}: {} peaks, total surface {:.1}",
            sample.name,
            sample.peaks().len(),
            sample.total_surface()
        );
        for peak in sample.peaks() {
            println!(
                "  {} [{:.3}, {:.3}] surface {:.1} ({:.1}%)",
                peak.name, peak.limits.start, peak.limits.end, peak.surface, peak.relative_surface
            );
        }
    }

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
