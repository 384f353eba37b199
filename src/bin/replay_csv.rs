use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use gestoscopio::catalog::ModelCatalog;
use gestoscopio::config::PipelineOptions;
use gestoscopio::csv_loader::load_window_from_csv;
use gestoscopio::normalizer::NormalizationStats;
use gestoscopio::types::flatten_window;

struct ReplayOptions {
    dump_tensor: bool,
}

fn parse_args() -> Result<(String, String, PathBuf, ReplayOptions)> {
    let mut dump_tensor = false;
    let mut positional: Vec<String> = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump-tensor" => dump_tensor = true,
            _ => positional.push(arg),
        }
    }

    if positional.len() != 3 {
        bail!("Uso: replay_csv [--dump-tensor] <catalogo.json> <version> <captura.csv>");
    }

    let csv_path = PathBuf::from(positional.pop().unwrap_or_default());
    let version = positional.pop().unwrap_or_default();
    let catalog_path = positional.pop().unwrap_or_default();

    Ok((catalog_path, version, csv_path, ReplayOptions { dump_tensor }))
}

fn main() -> Result<()> {
    let (catalog_path, version, csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo gesto desde {:?}", csv_path);

    let catalog = ModelCatalog::from_file(&catalog_path)?;
    let entry = catalog.resolve(&version)?;

    let options = PipelineOptions::default();
    let window = load_window_from_csv(&csv_path, options.window_size)?;

    let mut pipeline = catalog.build_pipeline(&version, options)?;
    if !pipeline.load() {
        bail!("No se pudo cargar el modelo de la versión '{}'", version);
    }

    // Una sola inferencia: llenar la ventana y quedarse con el resultado
    // que dispara el llenado
    let mut last = None;
    for sample in &window {
        if let Some(result) = pipeline.append(*sample)? {
            last = Some(result);
        }
    }

    let result = last.ok_or_else(|| anyhow!("La captura no llenó la ventana"))?;

    let mut scores = result.probabilities.clone();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!(
        "\n🥇 Predicción: {} ({:.1}%, {:.2} ms)",
        result.gesture,
        result.confidence * 100.0,
        result.latency_ms
    );

    println!("\nTop-5 probabilidades:");
    for (idx, (label, score)) in scores.iter().take(5).enumerate() {
        println!("  {:>2}. {:<25} {:>6.2}%", idx + 1, label, score * 100.0);
    }

    if opts.dump_tensor {
        let stats = NormalizationStats::new(entry.stats.mean.clone(), entry.stats.std.clone())?;
        let tensor = flatten_window(&stats.normalize(&window));
        println!("\n🧱 Tensor normalizado ({} valores):", tensor.len());
        for (idx, value) in tensor.iter().enumerate() {
            println!("  {:04}: {:>12.6}", idx, value);
        }
    }

    pipeline.dispose();
    Ok(())
}
