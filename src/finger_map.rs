use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Estado de los cinco dedos para los renderizadores de mano.
///
/// Cada dedo es un real en [0, 2]: 0 extendido, 2 completamente cerrado.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FingerPose {
    pub thumb: f32,
    pub index: f32,
    pub middle: f32,
    pub ring: f32,
    pub pinky: f32,
}

impl FingerPose {
    /// Mano abierta
    pub fn open() -> Self {
        Self {
            thumb: 0.0,
            index: 0.0,
            middle: 0.0,
            ring: 0.0,
            pinky: 0.0,
        }
    }

    fn clamped(self) -> Self {
        Self {
            thumb: self.thumb.clamp(0.0, 2.0),
            index: self.index.clamp(0.0, 2.0),
            middle: self.middle.clamp(0.0, 2.0),
            ring: self.ring.clamp(0.0, 2.0),
            pinky: self.pinky.clamp(0.0, 2.0),
        }
    }
}

/// Tabla etiqueta → pose de dedos, cargada desde JSON.
///
/// El contenido del mapeo es cosa de los colaboradores de presentación; el
/// núcleo solo transporta la tabla y la consulta por etiqueta.
pub struct FingerMap {
    poses: HashMap<String, FingerPose>,
}

impl FingerMap {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let poses: HashMap<String, FingerPose> = serde_json::from_str(json)?;
        Ok(Self {
            poses: poses
                .into_iter()
                .map(|(label, pose)| (label, pose.clamped()))
                .collect(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    pub fn pose_for(&self, label: &str) -> Option<FingerPose> {
        self.poses.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
