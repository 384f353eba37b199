use crate::config::{ConfigError, PipelineOptions};
use crate::normalizer::{NormalizationStats, StatsError};
use crate::pipeline::GesturePipeline;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid stats: {0}")]
    StatsError(#[from] StatsError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsEntry {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

/// Entrada del catálogo: todo lo necesario para configurar un pipeline
/// contra una versión concreta del modelo
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub path: String,
    pub labels: Vec<String>,
    pub stats: StatsEntry,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
}

/// Catálogo explícito de versiones de modelo.
///
/// Se construye desde un JSON (o entradas en memoria) y se pasa a quien lo
/// necesite; el núcleo del pipeline no depende de ningún registro global,
/// solo de la terna {path, labels, stats} ya resuelta.
pub struct ModelCatalog {
    entries: BTreeMap<String, ModelEntry>,
}

impl ModelCatalog {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ModelEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, ModelEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Versiones disponibles, en orden estable
    pub fn versions(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Resuelve una versión; desconocida es un error de configuración que
    /// enumera las versiones disponibles
    pub fn resolve(&self, version: &str) -> Result<&ModelEntry, ConfigError> {
        self.entries
            .get(version)
            .ok_or_else(|| ConfigError::UnknownVersion {
                requested: version.to_string(),
                available: self.versions(),
            })
    }

    /// Construye un pipeline completamente configurado contra una versión
    /// del catálogo, en una sola llamada. El modelo no se carga aquí: el
    /// llamante invoca `load()` (y puede reintentarla si falla).
    pub fn build_pipeline(
        &self,
        version: &str,
        options: PipelineOptions,
    ) -> Result<GesturePipeline, CatalogError> {
        let entry = self.resolve(version)?;
        let stats = NormalizationStats::new(entry.stats.mean.clone(), entry.stats.std.clone())?;

        let options = PipelineOptions {
            model_path: entry.path.clone(),
            ..options
        };

        let pipeline = GesturePipeline::new(options, entry.labels.clone(), stats)?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NUM_CHANNELS;

    fn catalog_json() -> String {
        let mean: Vec<String> = vec!["0.0".to_string(); NUM_CHANNELS];
        let std: Vec<String> = vec!["1.0".to_string(); NUM_CHANNELS];
        format!(
            r#"{{
                "v1": {{
                    "path": "modelos/gestos_v1.onnx",
                    "labels": ["palma", "puño", "ok"],
                    "stats": {{ "mean": [{m}], "std": [{s}] }},
                    "description": "modelo base",
                    "date": "2026-01-15"
                }},
                "v2": {{
                    "path": "modelos/gestos_v2.onnx",
                    "labels": ["palma", "puño"],
                    "stats": {{ "mean": [{m}], "std": [{s}] }}
                }}
            }}"#,
            m = mean.join(","),
            s = std.join(",")
        )
    }

    #[test]
    fn test_parse_and_resolve() {
        let catalog = ModelCatalog::from_json_str(&catalog_json()).unwrap();
        let entry = catalog.resolve("v1").unwrap();
        assert_eq!(entry.labels.len(), 3);
        assert_eq!(entry.date, "2026-01-15");

        // Los campos opcionales pueden faltar
        let entry = catalog.resolve("v2").unwrap();
        assert!(entry.description.is_empty());
    }

    #[test]
    fn test_unknown_version_lists_available() {
        let catalog = ModelCatalog::from_json_str(&catalog_json()).unwrap();
        let err = catalog.resolve("v9").unwrap_err();
        match err {
            ConfigError::UnknownVersion {
                requested,
                available,
            } => {
                assert_eq!(requested, "v9");
                assert_eq!(available, vec!["v1", "v2"]);
            }
            other => panic!("Error inesperado: {other}"),
        }
    }

    #[test]
    fn test_build_pipeline_from_entry() {
        let catalog = ModelCatalog::from_json_str(&catalog_json()).unwrap();
        let pipeline = catalog
            .build_pipeline("v1", PipelineOptions::default())
            .unwrap();
        assert_eq!(pipeline.labels(), ["palma", "puño", "ok"]);
        assert!(!pipeline.is_ready());
    }

    #[test]
    fn test_zero_std_entry_is_fatal() {
        let mut std = vec![1.0; NUM_CHANNELS];
        std[0] = 0.0;
        let entry = ModelEntry {
            path: "x.onnx".to_string(),
            labels: vec!["a".to_string()],
            stats: StatsEntry {
                mean: vec![0.0; NUM_CHANNELS],
                std,
            },
            description: String::new(),
            date: String::new(),
        };
        let catalog = ModelCatalog::from_entries([("v1".to_string(), entry)]);
        let err = catalog
            .build_pipeline("v1", PipelineOptions::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::StatsError(_)));
    }
}
