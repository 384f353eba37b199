use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::config::sample_from_slice;
use crate::types::{SensorSample, NUM_CHANNELS};

/// Carga una secuencia de muestras desde un CSV en el formato
/// sample,ax,ay,az,gx,gy,gz,mx,my,mz ordenado por sample.
pub fn load_samples_from_csv(path: impl AsRef<Path>) -> Result<Vec<SensorSample>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut samples: BTreeMap<usize, SensorSample> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() < 1 + NUM_CHANNELS {
            bail!("La fila {} no tiene {} columnas", row_idx + 1, 1 + NUM_CHANNELS);
        }

        let sample_idx: usize = record[0]
            .parse()
            .with_context(|| format!("sample inválido en fila {}", row_idx + 1))?;

        let mut values = [0.0f32; NUM_CHANNELS];
        for (i, value) in values.iter_mut().enumerate() {
            *value = record[1 + i]
                .parse()
                .with_context(|| format!("canal {} inválido en fila {}", i, row_idx + 1))?;
        }

        samples.insert(sample_idx, sample_from_slice(&values)?);
    }

    if samples.is_empty() {
        return Err(anyhow!("El CSV {:?} no contiene datos", path));
    }

    let (&min_sample, _) = samples.iter().next().unwrap();
    ensure!(
        min_sample == 0,
        "El CSV debe iniciar en sample=0 (encontrado sample={})",
        min_sample
    );
    let max_sample = *samples.keys().max().unwrap();

    let mut frames = Vec::with_capacity(max_sample + 1);
    let mut last_sample = [0.0f32; NUM_CHANNELS];
    for idx in 0..=max_sample {
        if let Some(sample) = samples.get(&idx) {
            last_sample = *sample;
            frames.push(*sample);
        } else {
            // Rellenar huecos repitiendo la última muestra válida
            frames.push(last_sample);
        }
    }

    Ok(frames)
}

/// Reconstruye exactamente una ventana de `window_size` muestras desde un
/// CSV, rellenando o truncando si hace falta.
pub fn load_window_from_csv(
    path: impl AsRef<Path>,
    window_size: usize,
) -> Result<Vec<SensorSample>> {
    let mut samples = load_samples_from_csv(path)?;
    if samples.len() < window_size {
        let pad = *samples.last().unwrap_or(&[0.0; NUM_CHANNELS]);
        samples.resize(window_size, pad);
    } else if samples.len() > window_size {
        samples.truncate(window_size);
    }
    Ok(samples)
}
