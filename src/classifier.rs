use crate::types::NUM_CHANNELS;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("ONNX Runtime error: {0}")]
    OnnxError(#[from] ort::Error),

    #[error("Missing ONNX {kind}")]
    MissingIo { kind: &'static str },
}

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("ONNX Runtime error: {0}")]
    OnnxError(#[from] ort::Error),

    #[error("Invalid tensor size: expected {expected}, got {actual}")]
    InvalidTensorSize { expected: usize, actual: usize },

    #[error("No output tensor found")]
    NoOutputTensor,
}

/// Colaborador clasificador, visto por el pipeline como caja negra.
///
/// Recibe el tensor [1, window_size, 9] aplanado y devuelve una
/// distribución de probabilidad sobre las etiquetas.
pub trait GestureModel: Send {
    fn predict(&mut self, tensor: &[f32]) -> Result<Vec<f32>, InferenceError>;

    /// Cardinalidad de salida del modelo, si la reporta
    fn num_outputs(&self) -> Option<usize> {
        None
    }
}

/// Clasificador ONNX cargado en una sesión de onnxruntime
pub struct OnnxModel {
    session: Session,
    window_size: usize,
    input_name: String,
    prob_output_name: String,
    num_outputs: Option<usize>,
}

impl OnnxModel {
    /// Carga el modelo y fuerza la inicialización perezosa con una
    /// predicción de calentamiento sobre un tensor en cero, para pagar ese
    /// coste aquí y no en la primera muestra real.
    pub fn load(model_path: &str, window_size: usize) -> Result<Self, LoadError> {
        let session = Session::builder()?.commit_from_file(model_path)?;

        let input_name = session
            .inputs
            .get(0)
            .map(|input| input.name.clone())
            .ok_or(LoadError::MissingIo { kind: "input" })?;

        let prob_output_name = session
            .outputs
            .iter()
            .find(|output| {
                matches!(
                    output.output_type,
                    ValueType::Tensor {
                        ty: TensorElementType::Float32,
                        ..
                    }
                )
            })
            .or_else(|| session.outputs.get(0))
            .map(|output| output.name.clone())
            .ok_or(LoadError::MissingIo { kind: "output" })?;

        println!("[ONNX] Modelo cargado: {}", model_path);
        println!("[ONNX] Input: {}", input_name);
        println!("[ONNX] Output: {}", prob_output_name);

        let mut model = Self {
            session,
            window_size,
            input_name,
            prob_output_name,
            num_outputs: None,
        };

        // Warmup: una predicción descartada sobre ceros. De paso fija la
        // cardinalidad de salida real del modelo.
        let zeros = vec![0.0f32; window_size * NUM_CHANNELS];
        match model.predict(&zeros) {
            Ok(probs) => model.num_outputs = Some(probs.len()),
            Err(e) => eprintln!("⚠️  Warmup falló: {}", e),
        }

        Ok(model)
    }
}

impl GestureModel for OnnxModel {
    fn predict(&mut self, tensor: &[f32]) -> Result<Vec<f32>, InferenceError> {
        let expected = self.window_size * NUM_CHANNELS;
        if tensor.len() != expected {
            return Err(InferenceError::InvalidTensorSize {
                expected,
                actual: tensor.len(),
            });
        }

        // Tensor de entrada [1, window_size, 9]
        let shape_vec = vec![1_usize, self.window_size, NUM_CHANNELS];
        let input_value = ort::value::Value::from_array((shape_vec, tensor.to_vec()))?;

        let outputs = self.session.run(ort::inputs![
            self.input_name.as_str() => &input_value,
        ])?;

        let (prob_shape, prob_data) =
            outputs[self.prob_output_name.as_str()].try_extract_tensor::<f32>()?;

        let num_classes = if prob_shape.len() >= 2 {
            prob_shape[1] as usize
        } else if !prob_shape.is_empty() {
            prob_shape[0] as usize
        } else {
            return Err(InferenceError::NoOutputTensor);
        };

        if num_classes == 0 || prob_data.len() < num_classes {
            return Err(InferenceError::NoOutputTensor);
        }

        Ok(prob_data[..num_classes].to_vec())
    }

    fn num_outputs(&self) -> Option<usize> {
        self.num_outputs
    }
}
