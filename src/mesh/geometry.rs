use tessel_buffer::{Buffer, Element};

use crate::{render::DrawMode, Error};

use super::{Attribute, Required, StaleAttributePolicy, Store, TriMesh};

/// Convert a color channel in `[0, 1]` to an unsigned byte: `round(c * 255) & 0xFF`.
///
/// Out-of-range input is wrapped by the mask rather than clamped.
#[inline]
pub fn quantize_channel(c: f32) -> u8 {
    ((c * 255.0).round() as i32 & 0xFF) as u8
}

/// Write `src` into `slot`, reusing the existing storage if it's owned and the same length.
///
/// Returns whether new storage was allocated.
fn write_store<T: Element>(slot: &mut Option<Store<T>>, src: &[T]) -> Result<bool, Error> {
    match slot {
        Some(Store::Owned(buf)) if buf.len() == src.len() => {
            buf.copy_from_slice(src)?;
            Ok(false)
        }
        _ => {
            *slot = Some(Store::Owned(Buffer::from_slice(src)));
            Ok(true)
        }
    }
}

/// Apply `policy` to an attribute buffer whose length no longer matches `expected`.
fn check_stale<T: Element>(
    slot: &mut Option<Store<T>>,
    attribute: Attribute,
    expected: usize,
    policy: StaleAttributePolicy,
    mesh: &str,
) {
    let Some(found) = slot.as_ref().map(Store::len) else {
        return;
    };
    if found == expected {
        return;
    }
    match policy {
        StaleAttributePolicy::Clear => {
            tracing::warn!(mesh, %attribute, expected, found, "cleared stale attribute buffer");
            *slot = None;
        }
        StaleAttributePolicy::Keep => {
            tracing::warn!(mesh, %attribute, expected, found, "attribute buffer no longer matches vertex count");
        }
    }
}

impl TriMesh {
    /// Reject any attempt to write the geometry of a clone.
    fn ensure_writable(&self) -> Result<(), Error> {
        if self.is_clone() {
            return self.reject(Error::ReadOnlyClone {
                mesh: self.spatial.name().to_owned(),
            });
        }
        Ok(())
    }

    fn check_attribute(&self, attribute: Attribute, found: usize) -> Result<(), Error> {
        let expected = self.vertex_count * attribute.components();
        if found != expected {
            return self.reject(Error::AttributeLength {
                mesh: self.spatial.name().to_owned(),
                attribute,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Set the vertex positions, as `x, y, z` triples.
    ///
    /// Storage is reused when the length is unchanged (so clones see the new positions) and
    /// reallocated otherwise (so clones keep the old ones). The model bound is marked dirty, and
    /// attribute buffers sized for a different vertex count are handled per
    /// [StaleAttributePolicy].
    ///
    /// # Errors
    ///
    /// * [`VertexLength`](Error::VertexLength) if `vertices.len() % 3 != 0`
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_vertices(&mut self, vertices: &[f32]) -> Result<(), Error> {
        self.ensure_writable()?;
        if vertices.len() % 3 != 0 {
            return self.reject(Error::VertexLength {
                mesh: self.spatial.name().to_owned(),
                found: vertices.len(),
            });
        }
        let reallocated = write_store(&mut self.buffers.vertices, vertices)?;
        self.vertex_count = vertices.len() / 3;
        if let Some(store) = &self.buffers.vertices {
            self.bound.replace_vertices(store.view());
        }
        tracing::debug!(
            mesh = %self.spatial.name(),
            vertex_count = self.vertex_count,
            reallocated,
            "vertices set"
        );

        let n = self.vertex_count;
        let policy = self.config.stale_attributes;
        let name = self.spatial.name();
        check_stale(&mut self.buffers.normals, Attribute::Normal, n * 3, policy, name);
        check_stale(&mut self.buffers.texcoords, Attribute::TexCoord, n * 2, policy, name);
        check_stale(&mut self.buffers.colors, Attribute::Color, n * 4, policy, name);
        Ok(())
    }

    /// Mutate the existing vertex storage in place and mark the model bound dirty.
    ///
    /// The change is visible to every clone sharing this storage.
    ///
    /// # Errors
    ///
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    /// * [`MissingGeometry`](Error::MissingGeometry) if no vertices have been set
    pub fn modify_vertices(&mut self, f: impl FnOnce(&mut [f32])) -> Result<(), Error> {
        self.ensure_writable()?;
        let Some(Store::Owned(buf)) = &self.buffers.vertices else {
            return self.reject(self.missing(Required::Vertices));
        };
        {
            let mut data = buf.write();
            f(&mut data);
        }
        self.invalidate_model_bound();
        Ok(())
    }

    /// Set the index list.
    ///
    /// Indices are not checked against the vertex count; an out-of-range index is the caller's
    /// problem, and will only surface when the mesh is drawn.
    ///
    /// # Errors
    ///
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_indices(&mut self, indices: &[u16]) -> Result<(), Error> {
        self.ensure_writable()?;
        let reallocated = write_store(&mut self.buffers.indices, indices)?;
        tracing::debug!(mesh = %self.spatial.name(), count = indices.len(), reallocated, "indices set");
        Ok(())
    }

    /// Set per-vertex normals; `normals.len()` must equal `3 * vertex_count`.
    ///
    /// # Errors
    ///
    /// * [`AttributeLength`](Error::AttributeLength) on a length mismatch
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_normals(&mut self, normals: &[f32]) -> Result<(), Error> {
        self.ensure_writable()?;
        self.check_attribute(Attribute::Normal, normals.len())?;
        write_store(&mut self.buffers.normals, normals)?;
        Ok(())
    }

    /// Set per-vertex texture coordinates; `texcoords.len()` must equal `2 * vertex_count`.
    ///
    /// # Errors
    ///
    /// * [`AttributeLength`](Error::AttributeLength) on a length mismatch
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_texcoords(&mut self, texcoords: &[f32]) -> Result<(), Error> {
        self.ensure_writable()?;
        self.check_attribute(Attribute::TexCoord, texcoords.len())?;
        write_store(&mut self.buffers.texcoords, texcoords)?;
        Ok(())
    }

    /// Set per-vertex RGBA colors; `colors.len()` must equal `4 * vertex_count`.
    ///
    /// # Errors
    ///
    /// * [`AttributeLength`](Error::AttributeLength) on a length mismatch
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_colors(&mut self, colors: &[u8]) -> Result<(), Error> {
        self.ensure_writable()?;
        self.check_attribute(Attribute::Color, colors.len())?;
        write_store(&mut self.buffers.colors, colors)?;
        Ok(())
    }

    /// Color every vertex with the same RGBA value, given as floats in `[0, 1]`.
    ///
    /// Equivalent to [set_solid_color_bytes](Self::set_solid_color_bytes) with each channel
    /// [quantized](quantize_channel).
    pub fn set_solid_color(&mut self, rgba: [f32; 4]) -> Result<(), Error> {
        self.set_solid_color_bytes(rgba.map(quantize_channel))
    }

    /// Color every vertex with the same RGBA value.
    ///
    /// The color buffer is reallocated only if its length isn't already `4 * vertex_count`.
    ///
    /// # Errors
    ///
    /// * [`ReadOnlyClone`](Error::ReadOnlyClone) if this is a clone
    pub fn set_solid_color_bytes(&mut self, rgba: [u8; 4]) -> Result<(), Error> {
        self.ensure_writable()?;
        let len = self.vertex_count * 4;
        let reuse = matches!(&self.buffers.colors, Some(Store::Owned(b)) if b.len() == len);
        if !reuse {
            self.buffers.colors = Some(Store::Owned(Buffer::zeroed(len)));
        }
        if let Some(Store::Owned(buf)) = &self.buffers.colors {
            buf.fill_pattern(&rgba)?;
        }
        Ok(())
    }

    /// Set how the index list is assembled into triangles.
    ///
    /// Allowed on clones; the draw mode is copied, not shared.
    #[inline]
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Set the draw mode from its raw GL value.
    ///
    /// # Errors
    ///
    /// * [`DrawMode`](Error::DrawMode) unless `raw` is `GL_TRIANGLES`, `GL_TRIANGLE_STRIP`, or
    ///   `GL_TRIANGLE_FAN`; the current mode is kept
    pub fn set_draw_mode_raw(&mut self, raw: u32) -> Result<(), Error> {
        match DrawMode::try_from(raw) {
            Ok(mode) => {
                self.set_draw_mode(mode);
                Ok(())
            }
            Err(raw) => self.reject(Error::DrawMode {
                mesh: self.spatial.name().to_owned(),
                raw,
            }),
        }
    }
}
