//! Reconocimiento de gestos en tiempo real desde un stream IMU de 9 ejes.
//!
//! El núcleo es `pipeline::GesturePipeline`: ventana deslizante sobre el
//! stream de muestras, disparo de inferencia a cadencia fija, z-score
//! contra estadísticas de entrenamiento y puerta de confianza antes de
//! notificar al suscriptor. El clasificador (ONNX vía `ort`) se consume
//! como colaborador de caja negra a través de `classifier::GestureModel`.

pub mod cadence;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod csv_loader;
pub mod finger_map;
pub mod normalizer;
pub mod pipeline;
pub mod sample_buffer;
pub mod types;
