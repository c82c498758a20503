// Shader binaries
//
// Vulkan consumes SPIR-V as 4-byte words. Binaries come from the host as a
// file path or an in-memory buffer and are validated before any module is
// created from them.

use crate::error::RenderError;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// A validated SPIR-V binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCode {
    words: Vec<u32>,
}

impl ShaderCode {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        let words = ash::util::read_spv(&mut Cursor::new(bytes))
            .map_err(|e| RenderError::PipelineBuild(format!("unreadable SPIR-V: {e}")))?;

        if words.first() != Some(&SPIRV_MAGIC) {
            return Err(RenderError::PipelineBuild(
                "SPIR-V magic number missing".to_string(),
            ));
        }

        Ok(Self { words })
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| {
            RenderError::PipelineBuild(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

/// Where a shader binary comes from.
#[derive(Debug, Clone)]
pub enum ShaderSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ShaderSource {
    pub fn load(&self) -> Result<ShaderCode, RenderError> {
        match self {
            ShaderSource::Path(path) => ShaderCode::from_path(path),
            ShaderSource::Bytes(bytes) => ShaderCode::from_bytes(bytes),
        }
    }
}

/// Vertex + fragment pair the pipeline is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    pub vertex: ShaderCode,
    pub fragment: ShaderCode,
}

impl ShaderSet {
    pub fn load(vertex: &ShaderSource, fragment: &ShaderSource) -> Result<Self, RenderError> {
        Ok(Self {
            vertex: vertex.load()?,
            fragment: fragment.load()?,
        })
    }
}

#[cfg(test)]
pub(crate) fn spirv_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[cfg(test)]
pub(crate) fn test_shaders() -> ShaderSet {
    let module = spirv_bytes(&[SPIRV_MAGIC, 0x0001_0000, 0, 1, 0]);
    ShaderSet {
        vertex: ShaderCode::from_bytes(&module).unwrap(),
        fragment: ShaderCode::from_bytes(&module).unwrap(),
    }
}
