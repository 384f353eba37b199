use crate::types::SensorSample;
use std::collections::VecDeque;

/// Ventana deslizante acotada sobre el stream de muestras.
///
/// FIFO con capacidad fija: al llegar una muestra con la ventana llena se
/// desaloja la más antigua antes de insertar. La longitud es siempre
/// `< window_size` (llenándose) o exactamente `window_size` (lista).
pub struct SampleBuffer {
    buffer: VecDeque<SensorSample>,
    window_size: usize,
}

impl SampleBuffer {
    /// Crea un buffer con el tamaño de ventana indicado
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Añade una muestra, desalojando la más antigua si la ventana está llena.
    /// O(1) amortizado; la capacidad se reserva una sola vez.
    pub fn push(&mut self, sample: SensorSample) {
        if self.buffer.len() == self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    /// Verifica si la ventana está completa
    pub fn is_ready(&self) -> bool {
        self.buffer.len() == self.window_size
    }

    /// Devuelve la ventana completa (las `window_size` muestras más
    /// recientes, la más antigua primero), o None si aún se está llenando
    pub fn window(&self) -> Option<Vec<SensorSample>> {
        if !self.is_ready() {
            return None;
        }
        Some(self.buffer.iter().copied().collect())
    }

    /// Número de muestras acumuladas
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Vacía la ventana
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NUM_CHANNELS;

    fn sample(value: f32) -> SensorSample {
        let mut s = [0.0; NUM_CHANNELS];
        s[0] = value;
        s
    }

    #[test]
    fn test_buffer_not_ready_initially() {
        let buffer = SampleBuffer::new(50);
        assert!(!buffer.is_ready());
        assert!(buffer.window().is_none());
    }

    #[test]
    fn test_buffer_ready_at_window_size() {
        let mut buffer = SampleBuffer::new(50);
        for i in 0..50 {
            buffer.push(sample(i as f32));
        }
        assert!(buffer.is_ready());
        assert!(buffer.window().is_some());
    }

    #[test]
    fn test_sliding_window_keeps_most_recent() {
        let mut buffer = SampleBuffer::new(50);
        for i in 0..70 {
            buffer.push(sample(i as f32));
        }

        // Nunca supera window_size y contiene las últimas 50 en orden
        assert_eq!(buffer.len(), 50);
        let window = buffer.window().unwrap();
        assert_eq!(window[0][0], 20.0);
        assert_eq!(window[49][0], 69.0);
    }

    #[test]
    fn test_clear_empties_window() {
        let mut buffer = SampleBuffer::new(4);
        for i in 0..4 {
            buffer.push(sample(i as f32));
        }
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.window().is_none());
    }
}
