/// Decide cuándo disparar una inferencia a partir del contador de muestras
/// aceptadas.
///
/// Política: ninguna inferencia antes de que la ventana se llene por
/// primera vez; a partir de ahí, dispara cada `stride` muestras aceptadas,
/// contando desde el momento del llenado. Un `reset` vuelve el contador a
/// cero, así que se exige un re-llenado completo antes del siguiente
/// disparo.
pub struct CadenceController {
    window_size: usize,
    stride: usize,
    accepted: u64,
}

impl CadenceController {
    /// `window_size` y `stride` ya vienen validados (> 0) por la
    /// configuración del pipeline.
    pub fn new(window_size: usize, stride: usize) -> Self {
        Self {
            window_size,
            stride,
            accepted: 0,
        }
    }

    /// Registra una muestra aceptada y devuelve si este append debe
    /// disparar una inferencia
    pub fn accept(&mut self) -> bool {
        self.accepted += 1;
        if self.accepted < self.window_size as u64 {
            return false;
        }
        (self.accepted - self.window_size as u64) % self.stride as u64 == 0
    }

    /// Contador de muestras aceptadas desde la construcción o el último reset
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Reinicia el contador; se llama junto con el clear de la ventana,
    /// nunca por el flujo normal de muestras
    pub fn reset(&mut self) {
        self.accepted = 0;
    }
}
