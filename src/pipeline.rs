use crate::cadence::CadenceController;
use crate::classifier::{GestureModel, InferenceError, LoadError, OnnxModel};
use crate::config::{ConfigError, PipelineOptions};
use crate::normalizer::NormalizationStats;
use crate::sample_buffer::SampleBuffer;
use crate::types::{flatten_window, PredictionResult, SensorSample};
use std::collections::HashSet;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Pipeline already disposed")]
    Disposed,
}

/// Estados del ciclo de vida del pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Sin modelo cargado
    Unloaded,
    /// Carga de modelo en curso
    Loading,
    /// La carga falló; puede reintentarse
    Failed,
    /// Modelo cargado, la cadencia dispara inferencias
    Ready,
    /// Terminal: el pipeline ya no puede usarse
    Disposed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Unloaded => "UNLOADED",
            PipelineState::Loading => "LOADING",
            PipelineState::Failed => "FAILED",
            PipelineState::Ready => "READY",
            PipelineState::Disposed => "DISPOSED",
        }
    }
}

type PredictionCallback = Box<dyn FnMut(&PredictionResult) + Send>;
type ReadyCallback = Box<dyn FnMut() + Send>;
type ErrorCallback = Box<dyn FnMut(&PipelineError) + Send>;

/// Pipeline de clasificación en streaming.
///
/// Posee una ventana deslizante, un contador de cadencia, las estadísticas
/// de normalización, el LabelSet y como mucho un modelo cargado. El
/// productor alimenta `append` de forma síncrona; cuando la cadencia lo
/// decide, se normaliza la ventana, se consulta el clasificador y el
/// resultado pasa por la puerta de confianza antes de llegar al suscriptor.
pub struct GesturePipeline {
    options: PipelineOptions,
    buffer: SampleBuffer,
    cadence: CadenceController,
    stats: NormalizationStats,
    labels: Vec<String>,
    model: Option<Box<dyn GestureModel>>,
    state: PipelineState,
    inference_in_flight: bool,
    last_latency_ms: f32,
    inference_count: u64,
    on_prediction: Option<PredictionCallback>,
    on_ready: Option<ReadyCallback>,
    on_error: Option<ErrorCallback>,
}

impl std::fmt::Debug for GesturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GesturePipeline")
            .field("state", &self.state)
            .field("inference_in_flight", &self.inference_in_flight)
            .field("last_latency_ms", &self.last_latency_ms)
            .field("inference_count", &self.inference_count)
            .finish_non_exhaustive()
    }
}

impl GesturePipeline {
    /// Crea un pipeline sin modelo. Valida opciones y LabelSet; cualquier
    /// problema aquí es un error fatal de configuración.
    pub fn new(
        options: PipelineOptions,
        labels: Vec<String>,
        stats: NormalizationStats,
    ) -> Result<Self, ConfigError> {
        options.validate()?;

        if labels.is_empty() {
            return Err(ConfigError::EmptyLabelSet);
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicateLabel(label.clone()));
            }
        }

        let window_size = options.window_size;
        let stride = options.stride;

        Ok(Self {
            options,
            buffer: SampleBuffer::new(window_size),
            cadence: CadenceController::new(window_size, stride),
            stats,
            labels,
            model: None,
            state: PipelineState::Unloaded,
            inference_in_flight: false,
            last_latency_ms: 0.0,
            inference_count: 0,
            on_prediction: None,
            on_ready: None,
            on_error: None,
        })
    }

    /// Suscriptor pasivo: solo recibe resultados con confianza suficiente
    pub fn set_on_prediction<F>(&mut self, callback: F)
    where
        F: FnMut(&PredictionResult) + Send + 'static,
    {
        self.on_prediction = Some(Box::new(callback));
    }

    pub fn set_on_ready<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_ready = Some(Box::new(callback));
    }

    pub fn set_on_error<F>(&mut self, callback: F)
    where
        F: FnMut(&PipelineError) + Send + 'static,
    {
        self.on_error = Some(Box::new(callback));
    }

    /// Carga el modelo ONNX configurado en `model_path`.
    ///
    /// Devuelve true si el pipeline quedó listo. Un fallo deja el estado en
    /// FAILED (reintentable) y se reporta por `on_error`; el camino de
    /// buffering sigue funcionando.
    pub fn load(&mut self) -> bool {
        if self.state == PipelineState::Disposed {
            return false;
        }

        self.state = PipelineState::Loading;
        match OnnxModel::load(&self.options.model_path, self.options.window_size) {
            Ok(model) => self.attach_model(Box::new(model)),
            Err(e) => {
                self.state = PipelineState::Failed;
                self.report_error(PipelineError::Load(e));
                false
            }
        }
    }

    /// Instala un clasificador ya construido (backend alternativo).
    ///
    /// Verifica que la cardinalidad de salida del modelo coincida con el
    /// LabelSet antes de pasar a READY.
    pub fn attach_model(&mut self, model: Box<dyn GestureModel>) -> bool {
        if self.state == PipelineState::Disposed {
            return false;
        }

        if let Some(outputs) = model.num_outputs() {
            if outputs != self.labels.len() {
                self.state = PipelineState::Failed;
                self.report_error(PipelineError::Config(ConfigError::LabelCardinality {
                    labels: self.labels.len(),
                    outputs,
                }));
                return false;
            }
        }

        self.model = Some(model);
        self.state = PipelineState::Ready;
        if let Some(cb) = self.on_ready.as_mut() {
            cb();
        }
        true
    }

    /// Acepta una muestra del productor. Siempre síncrono y sin bloqueo.
    ///
    /// La ventana y el contador avanzan en cualquier estado no terminal;
    /// la cadencia solo dispara inferencia en READY. Devuelve el resultado
    /// si este append disparó una inferencia que completó.
    pub fn append(
        &mut self,
        sample: SensorSample,
    ) -> Result<Option<PredictionResult>, PipelineError> {
        if self.state == PipelineState::Disposed {
            return Err(PipelineError::Disposed);
        }

        self.buffer.push(sample);
        let trigger = self.cadence.accept();

        if trigger && self.state == PipelineState::Ready {
            return Ok(self.run_inference());
        }
        Ok(None)
    }

    /// Ejecuta una inferencia sobre la ventana actual.
    ///
    /// Precondiciones: estado READY, ventana completa y ninguna inferencia
    /// en vuelo. Si alguna falla devuelve None sin efectos secundarios:
    /// "aún no listo" es un estado transitorio normal, no un fallo. Un
    /// disparo de cadencia que llegue con otra inferencia en vuelo se
    /// descarta, nunca se encola.
    ///
    /// El resultado siempre se devuelve al llamante; el suscriptor
    /// `on_prediction` solo se invoca cuando la confianza alcanza el
    /// umbral configurado.
    pub fn run_inference(&mut self) -> Option<PredictionResult> {
        if self.state != PipelineState::Ready || self.inference_in_flight {
            return None;
        }
        let window = self.buffer.window()?;
        let model = self.model.as_mut()?;

        self.inference_in_flight = true;

        // La normalización construye una ventana nueva; la original queda
        // intacta pase lo que pase después
        let normalized = self.stats.normalize(&window);
        let tensor = flatten_window(&normalized);

        let start = Instant::now();
        let probs = match model.predict(&tensor) {
            Ok(probs) => probs,
            Err(e) => {
                self.inference_in_flight = false;
                self.report_error(PipelineError::Inference(e));
                return None;
            }
        };
        let latency_ms = start.elapsed().as_secs_f32() * 1000.0;

        // Argmax con desempate por índice menor: solo un valor estrictamente
        // mayor reemplaza al máximo actual
        let mut best_idx = 0usize;
        let mut best_prob = f32::NEG_INFINITY;
        for (i, &p) in probs.iter().enumerate().take(self.labels.len()) {
            if p > best_prob {
                best_prob = p;
                best_idx = i;
            }
        }

        let probabilities: Vec<(String, f32)> = self
            .labels
            .iter()
            .zip(probs.iter())
            .map(|(label, &p)| (label.clone(), p))
            .collect();

        let result = PredictionResult {
            gesture: self.labels[best_idx].clone(),
            confidence: best_prob,
            probabilities,
            latency_ms,
        };

        self.last_latency_ms = latency_ms;
        self.inference_count += 1;
        self.inference_in_flight = false;

        // Verificar que el pipeline sigue vivo antes de notificar: un
        // resultado que resuelva tras dispose() se descarta en silencio
        if self.state == PipelineState::Ready
            && result.confidence >= self.options.confidence_threshold
        {
            if let Some(cb) = self.on_prediction.as_mut() {
                cb(&result);
            }
        }

        Some(result)
    }

    /// Reemplaza las estadísticas de normalización como objeto entero.
    /// Nunca se mutan canal a canal: una ventana a medio llenar jamás se
    /// normaliza contra una mezcla de estadísticas.
    pub fn set_stats(&mut self, stats: NormalizationStats) {
        self.stats = stats;
    }

    /// Vacía la ventana y reinicia el contador de cadencia, juntos.
    /// Hasta que la ventana vuelva a llenarse por completo no hay disparos.
    pub fn clear_buffer(&mut self) -> Result<(), PipelineError> {
        if self.state == PipelineState::Disposed {
            return Err(PipelineError::Disposed);
        }
        self.buffer.clear();
        self.cadence.reset();
        Ok(())
    }

    /// Libera el modelo y deja el pipeline en estado terminal
    pub fn dispose(&mut self) {
        self.model = None;
        self.buffer.clear();
        self.cadence.reset();
        self.state = PipelineState::Disposed;
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PipelineState::Ready
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }

    pub fn accepted_samples(&self) -> u64 {
        self.cadence.accepted()
    }

    /// Latencia de la última inferencia, en milisegundos
    pub fn last_latency_ms(&self) -> f32 {
        self.last_latency_ms
    }

    /// Inferencias completadas desde la construcción
    pub fn inference_count(&self) -> u64 {
        self.inference_count
    }

    fn report_error(&mut self, err: PipelineError) {
        match self.on_error.as_mut() {
            Some(cb) => cb(&err),
            None => eprintln!("❌ Error en pipeline: {}", err),
        }
    }
}
