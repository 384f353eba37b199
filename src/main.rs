/*
Reconocimiento de gestos en tiempo real - Rust + ONNX

Sistema que:
1. Reproduce capturas IMU de 9 ejes (CSV) como si llegaran del sensor
2. Alimenta el pipeline de clasificación en streaming
3. Realiza predicciones con ONNX Runtime a cadencia fija
4. Imprime solo las predicciones que superan el umbral de confianza

Antes de todo, asegurarse de tener onnxruntime instalado.
wget https://github.com/microsoft/onnxruntime/releases/download/v1.22.0/onnxruntime-linux-x64-1.22.0.tgz
tar -xzf onnxruntime-linux-x64-1.22.0.tgz

Para compilar y ejecutar:
set -x LD_LIBRARY_PATH (pwd)/onnxruntime-linux-x64-1.22.0/lib $LD_LIBRARY_PATH
    ./target/release/gestoscopio modelos.json v1 capturas/gesto_001.csv
*/

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::bounded;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gestoscopio::catalog::ModelCatalog;
use gestoscopio::config::PipelineOptions;
use gestoscopio::csv_loader::load_samples_from_csv;
use gestoscopio::types::{SensorSample, SAMPLING_RATE};

fn usage() -> ! {
    eprintln!("Uso: gestoscopio <catalogo.json> <version> <captura.csv|directorio>");
    eprintln!("     Con un directorio se elige una captura CSV al azar");
    std::process::exit(2);
}

/// Elige una captura: el propio archivo, o un CSV al azar del directorio
fn pick_capture(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("No existe la ruta {:?}", path);
    }

    let csv_files: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();

    if csv_files.is_empty() {
        bail!("No hay archivos CSV en {:?}", path);
    }

    use rand::Rng;
    let random_idx = rand::thread_rng().gen_range(0..csv_files.len());
    Ok(csv_files[random_idx].clone())
}

fn main() -> Result<()> {
    println!("🎯 Gestoscopio - Reconocimiento de gestos IMU + ONNX\n");

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        usage();
    }

    let catalog_path = &args[1];
    let version = &args[2];
    let capture_arg = PathBuf::from(&args[3]);

    let catalog = ModelCatalog::from_file(catalog_path)
        .with_context(|| format!("No se pudo cargar el catálogo {}", catalog_path))?;

    println!("📚 Catálogo: {} (versiones: {})", catalog_path, catalog.versions().join(", "));

    let mut pipeline = catalog.build_pipeline(version, PipelineOptions::default())?;

    pipeline.set_on_ready(|| println!("✅ Clasificador cargado y listo\n"));
    pipeline.set_on_error(|e| eprintln!("❌ Error en pipeline: {}", e));
    pipeline.set_on_prediction(|result| {
        println!(
            "🖐️  {} (conf: {:.1}%, {:.2} ms)",
            result.gesture,
            result.confidence * 100.0,
            result.latency_ms
        );
    });

    println!("🔧 Inicializando clasificador ONNX...");
    if !pipeline.load() {
        bail!("No se pudo cargar el modelo de la versión '{}'", version);
    }

    let capture = pick_capture(&capture_arg)?;
    let samples = load_samples_from_csv(&capture)?;
    println!(
        "🎞️  Reproduciendo {:?} ({} muestras a {} Hz)\n",
        capture.file_name().ok_or_else(|| anyhow!("Ruta sin nombre"))?,
        samples.len(),
        SAMPLING_RATE
    );

    // Hilo productor: reproduce la captura al ritmo nominal del sensor
    let (tx, rx) = bounded::<SensorSample>(100);
    let period = Duration::from_secs_f32(1.0 / SAMPLING_RATE);
    std::thread::spawn(move || {
        for sample in samples {
            if tx.send(sample).is_err() {
                return;
            }
            std::thread::sleep(period);
        }
    });

    // El consumidor posee el pipeline; append es síncrono y no bloquea al
    // productor más allá de la capacidad del canal
    for sample in rx {
        pipeline.append(sample)?;
    }

    println!(
        "\n📊 Resumen: {} inferencias, última latencia {:.2} ms",
        pipeline.inference_count(),
        pipeline.last_latency_ms()
    );

    pipeline.dispose();
    Ok(())
}
