/// Muestra de un IMU de 9 ejes: [ax, ay, az, gx, gy, gz, mx, my, mz]
///
/// El orden de canales es fijo y debe coincidir con el orden usado al
/// calcular las estadísticas de normalización y al entrenar el modelo.
pub type SensorSample = [f32; NUM_CHANNELS];

/// Constantes del sistema
pub const NUM_CHANNELS: usize = 9; // ax, ay, az, gx, gy, gz, mx, my, mz
pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_STRIDE: usize = 25;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const SAMPLING_RATE: f32 = 50.0; // Hz

/// Resultado de una inferencia completada.
///
/// Se construye nuevo en cada inferencia y no se muta después; el
/// suscriptor lo recibe por referencia de solo lectura.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Etiqueta con la probabilidad máxima (empates: gana el índice menor)
    pub gesture: String,
    /// Probabilidad máxima, en [0, 1]
    pub confidence: f32,
    /// Probabilidad por etiqueta, en el orden del LabelSet
    pub probabilities: Vec<(String, f32)>,
    /// Tiempo de pared de la inferencia, en milisegundos
    pub latency_ms: f32,
}

impl PredictionResult {
    /// Busca la probabilidad de una etiqueta concreta
    pub fn probability_of(&self, label: &str) -> Option<f32> {
        self.probabilities
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, p)| *p)
    }
}

/// Aplana una ventana [window_size x 9] al tensor [1, window_size, 9]
/// que espera el clasificador. Layout: [t * 9 + canal]
pub fn flatten_window(window: &[SensorSample]) -> Vec<f32> {
    let mut flat = Vec::with_capacity(window.len() * NUM_CHANNELS);
    for sample in window {
        flat.extend_from_slice(sample);
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_order() {
        let mut a: SensorSample = [0.0; NUM_CHANNELS];
        let mut b: SensorSample = [0.0; NUM_CHANNELS];
        a[0] = 1.0;
        b[8] = 2.0;

        let flat = flatten_window(&[a, b]);
        assert_eq!(flat.len(), 2 * NUM_CHANNELS);
        assert_eq!(flat[0], 1.0);
        assert_eq!(flat[NUM_CHANNELS + 8], 2.0);
    }

    #[test]
    fn test_probability_lookup() {
        let result = PredictionResult {
            gesture: "puño".to_string(),
            confidence: 0.9,
            probabilities: vec![("puño".to_string(), 0.9), ("palma".to_string(), 0.1)],
            latency_ms: 1.0,
        };
        assert_eq!(result.probability_of("palma"), Some(0.1));
        assert_eq!(result.probability_of("ok"), None);
    }
}
