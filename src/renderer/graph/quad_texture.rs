//! File textures bound into quad passes.

use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::host::{ParamValue, ShaderManager, TextureManager};
use crate::renderer::core::{ShaderHandle, TextureHandle};

/// A file texture plus the metadata pushed next to it.
///
/// Binding a `QuadTexture` under parameter `gTex` sets four shader
/// parameters: `gTex`, `gTexUVOffset`, `gTexScale` and `gTexDimensions`.
#[derive(Debug)]
pub struct QuadTexture {
    parameter: String,
    directory: PathBuf,
    file_name: String,
    handle: Option<TextureHandle>,
    dimensions: [f32; 2],
    scale: f32,
    uv_offset: [f32; 2],
}

impl QuadTexture {
    /// Creates the texture and loads `file_name` from `directory`.
    pub fn new<H: TextureManager + ?Sized>(
        parameter: impl Into<String>,
        directory: impl Into<PathBuf>,
        file_name: &str,
        host: &mut H,
    ) -> Self {
        let mut texture = Self {
            parameter: parameter.into(),
            directory: directory.into(),
            file_name: String::new(),
            handle: None,
            dimensions: [0.0; 2],
            scale: 1.0,
            uv_offset: [0.0; 2],
        };
        texture.load_texture(file_name, host);
        texture
    }

    /// Replaces the texture with `file_name`.
    ///
    /// The previous handle is released before the new one is acquired, so a
    /// reload never holds two textures. Returns `false` (and keeps a null
    /// handle) when the file cannot be loaded.
    pub fn load_texture<H: TextureManager + ?Sized>(&mut self, file_name: &str, host: &mut H) -> bool {
        if let Some(old) = self.handle.take() {
            host.release_texture(old);
        }
        self.file_name = file_name.to_owned();

        let path = self.path();
        match host.acquire_texture(&path) {
            Ok((handle, info)) => {
                debug!("Loaded texture {} ({}x{})", path.display(), info.width, info.height);
                self.handle = Some(handle);
                self.dimensions = [info.width as f32, info.height as f32];
                true
            }
            Err(e) => {
                error!("Texture {} could not be loaded: {e}", path.display());
                self.dimensions = [0.0; 2];
                false
            }
        }
    }

    /// Sets the texture and its three companion parameters on `shader`.
    /// Returns how many of the four the shader accepted.
    pub fn push_params<H: ShaderManager + ?Sized>(&self, shader: ShaderHandle, host: &mut H) -> usize {
        let p = &self.parameter;
        [
            host.set_parameter(shader, p, ParamValue::Texture(self.handle)),
            host.set_parameter(shader, &format!("{p}UVOffset"), ParamValue::Float(&self.uv_offset)),
            host.set_parameter(shader, &format!("{p}Scale"), ParamValue::Float(std::slice::from_ref(&self.scale))),
            host.set_parameter(shader, &format!("{p}Dimensions"), ParamValue::Float(&self.dimensions)),
        ]
        .into_iter()
        .filter(|accepted| *accepted)
        .count()
    }

    pub fn release<H: TextureManager + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.handle.take() {
            host.release_texture(handle);
        }
    }

    #[inline]
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    #[inline]
    pub fn set_uv_offset(&mut self, offset: [f32; 2]) {
        self.uv_offset = offset;
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn uv_offset(&self) -> [f32; 2] {
        self.uv_offset
    }

    /// Pixel size of the loaded file, `[0, 0]` when nothing is loaded.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> [f32; 2] {
        self.dimensions
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    #[inline]
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}
