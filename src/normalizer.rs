use crate::types::{SensorSample, NUM_CHANNELS};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid stats length: expected {expected} channels, got mean={mean} std={std}")]
    InvalidLength {
        expected: usize,
        mean: usize,
        std: usize,
    },

    #[error("Zero std for channel {channel}")]
    ZeroStd { channel: usize },
}

/// Estadísticas de normalización fijadas en entrenamiento: un par
/// (media, desviación) por canal, en el mismo orden que SensorSample.
///
/// Se valida completa al construirse y solo se reemplaza como objeto
/// entero, nunca canal a canal, para que una ventana a medio llenar jamás
/// se normalice contra una mezcla de estadísticas.
#[derive(Debug, Clone)]
pub struct NormalizationStats {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl NormalizationStats {
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, StatsError> {
        if mean.len() != NUM_CHANNELS || std.len() != NUM_CHANNELS {
            return Err(StatsError::InvalidLength {
                expected: NUM_CHANNELS,
                mean: mean.len(),
                std: std.len(),
            });
        }

        // std == 0 es un error fatal de configuración, no un fallback
        for (channel, &value) in std.iter().enumerate() {
            if value == 0.0 {
                return Err(StatsError::ZeroStd { channel });
            }
        }

        Ok(Self { mean, std })
    }

    /// Estadísticas identidad (media 0, desviación 1)
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; NUM_CHANNELS],
            std: vec![1.0; NUM_CHANNELS],
        }
    }

    /// Z-score por canal sobre la ventana completa, todos los pasos de
    /// tiempo. Función pura: la entrada no se modifica, la salida se
    /// construye en una estructura nueva.
    pub fn normalize(&self, window: &[SensorSample]) -> Vec<SensorSample> {
        window
            .iter()
            .map(|sample| {
                let mut out = [0.0f32; NUM_CHANNELS];
                for (i, value) in sample.iter().enumerate() {
                    out[i] = (value - self.mean[i]) / self.std[i];
                }
                out
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: [f32; 3]) -> SensorSample {
        let mut s = [0.0; NUM_CHANNELS];
        s[0] = values[0];
        s[1] = values[1];
        s[2] = values[2];
        s
    }

    #[test]
    fn test_identity_stats_do_not_change_window() {
        let stats = NormalizationStats::identity();
        let window = vec![sample([1.0, -2.0, 3.5]); 4];
        assert_eq!(stats.normalize(&window), window);
    }

    #[test]
    fn test_zscore_per_channel() {
        let mut mean = vec![0.0; NUM_CHANNELS];
        let mut std = vec![1.0; NUM_CHANNELS];
        mean[0] = 2.0;
        std[0] = 4.0;
        let stats = NormalizationStats::new(mean, std).unwrap();

        let window = vec![sample([10.0, 5.0, 0.0])];
        let normalized = stats.normalize(&window);
        assert_eq!(normalized[0][0], 2.0); // (10 - 2) / 4
        assert_eq!(normalized[0][1], 5.0); // canal sin ajuste
    }

    #[test]
    fn test_normalize_is_pure() {
        let mut mean = vec![0.0; NUM_CHANNELS];
        mean[2] = 1.0;
        let stats = NormalizationStats::new(mean, vec![2.0; NUM_CHANNELS]).unwrap();

        let window = vec![sample([3.0, 1.0, 4.0]); 8];
        let snapshot = window.clone();

        let first = stats.normalize(&window);
        let second = stats.normalize(&window);

        assert_eq!(first, second);
        assert_eq!(window, snapshot); // la entrada queda intacta
    }

    #[test]
    fn test_zero_std_is_rejected() {
        let mut std = vec![1.0; NUM_CHANNELS];
        std[4] = 0.0;
        let err = NormalizationStats::new(vec![0.0; NUM_CHANNELS], std).unwrap_err();
        assert!(matches!(err, StatsError::ZeroStd { channel: 4 }));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let err = NormalizationStats::new(vec![0.0; 3], vec![1.0; NUM_CHANNELS]).unwrap_err();
        assert!(matches!(err, StatsError::InvalidLength { .. }));
    }
}
