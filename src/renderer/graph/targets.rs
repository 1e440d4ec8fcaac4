//! Render Target Registry
//!
//! [`TargetRegistry`] keeps two parallel arrays: the descriptions of every
//! named render target and the host handles backing them. Index is the only
//! key used internally; names resolve to indices through an ordered map
//! built at append time.
//!
//! The registry also records, for every pass, the ordered list of handles
//! that pass renders into, plus which target is presented at the end of the
//! frame.
//!
//! # Lifecycle
//!
//! ```text
//! append(..) x N            (graph build, handles acquired)
//!   └─ set_operation_outputs (per pass, handles captured by value)
//! descriptor_mut(..)         (resize / MSAA / color depth, any number)
//!   └─ update_target_descriptions   (one batched push per change set)
//! reacquire_missing()        (null handles from failed allocations)
//! clear()                    (teardown, every handle released)
//! ```
//!
//! Resizing never replaces a handle, so output lists captured before a
//! resize keep pointing at live targets.

use log::{debug, error, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::Result;
use crate::host::TargetManager;
use crate::renderer::core::TargetHandle;

/// Name of the shared depth-stencil target.
pub const DEPTH_TARGET: &str = "depthTarget";

// ─── Descriptor ────────────────────────────────────────────────────────────

/// Description of one render target.
///
/// The descriptor owns no GPU memory. It is mutated in place when the
/// viewport size, sample count or color depth change, then pushed to its
/// handle by [`TargetRegistry::update_target_descriptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDescriptor {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    pub format: wgpu::TextureFormat,
    /// `0` for a plain 2D target.
    pub array_slices: u32,
    pub is_cube_map: bool,
}

impl RenderTargetDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32, sample_count: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            sample_count,
            format,
            array_slices: 0,
            is_cube_map: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_depth(&self) -> bool {
        self.format.has_depth_aspect()
    }

    /// Usage flags a wgpu-backed host should allocate with.
    #[must_use]
    pub fn usage(&self) -> wgpu::TextureUsages {
        if self.is_depth() {
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_SRC
        }
    }

    /// The equivalent wgpu texture description.
    #[must_use]
    pub fn texture_descriptor(&self) -> wgpu::TextureDescriptor<'_> {
        let layers = self.array_slices.max(1) * if self.is_cube_map { 6 } else { 1 };
        wgpu::TextureDescriptor {
            label: Some(&self.name),
            size: wgpu::Extent3d {
                width: self.width.max(1),
                height: self.height.max(1),
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: self.sample_count.max(1),
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: self.usage(),
            view_formats: &[],
        }
    }
}

// ─── Per-pass outputs ──────────────────────────────────────────────────────

/// The declared outputs of one pass.
///
/// Handles are captured when the outputs are declared. Names are kept so the
/// list can be re-resolved if a target had to be re-acquired.
#[derive(Debug, Clone, Default)]
struct OutputBinding {
    names: SmallVec<[String; 4]>,
    handles: SmallVec<[Option<TargetHandle>; 4]>,
}

// ─── Registry ──────────────────────────────────────────────────────────────

/// Ordered collection of named render targets.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    descriptors: Vec<RenderTargetDescriptor>,
    handles: Vec<Option<TargetHandle>>,
    index: FxHashMap<String, usize>,
    outputs: FxHashMap<String, OutputBinding>,
    present: Option<usize>,
}

impl TargetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a target and returns its index.
    ///
    /// Without an explicit `handle` one is acquired from `host`. A failed
    /// allocation is logged and leaves a null handle; it is retried by
    /// [`reacquire_missing`](Self::reacquire_missing).
    pub fn append<H: TargetManager + ?Sized>(
        &mut self,
        desc: RenderTargetDescriptor,
        handle: Option<TargetHandle>,
        host: &mut H,
    ) -> usize {
        let handle = handle.or_else(|| match host.acquire_target(&desc) {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Render target '{}' could not be allocated: {e}", desc.name);
                None
            }
        });

        let index = self.descriptors.len();
        if self.index.contains_key(&desc.name) {
            error!("Render target '{}' registered twice, lookups keep the first", desc.name);
        } else {
            self.index.insert(desc.name.clone(), index);
        }

        trace!("Target [{index}] '{}' {}x{} x{} {:?}", desc.name, desc.width, desc.height, desc.sample_count, desc.format);
        self.descriptors.push(desc);
        self.handles.push(handle);
        index
    }

    /// Index of the target called `name`. Misses are logged.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let found = self.index.get(name).copied();
        if found.is_none() {
            error!("Render target '{name}' not found");
        }
        found
    }

    /// Like [`index_of`](Self::index_of) without logging a miss.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Handle at `index`; `None` when out of range or never allocated.
    #[inline]
    #[must_use]
    pub fn target(&self, index: usize) -> Option<TargetHandle> {
        self.handles.get(index).copied().flatten()
    }

    #[must_use]
    pub fn target_by_name(&self, name: &str) -> Option<TargetHandle> {
        self.index_of(name).and_then(|i| self.target(i))
    }

    #[inline]
    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<&RenderTargetDescriptor> {
        self.descriptors.get(index)
    }

    #[inline]
    pub fn descriptor_mut(&mut self, index: usize) -> Option<&mut RenderTargetDescriptor> {
        self.descriptors.get_mut(index)
    }

    pub fn descriptor_by_name_mut(&mut self, name: &str) -> Option<&mut RenderTargetDescriptor> {
        let index = self.index_of(name)?;
        self.descriptors.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn descriptors(&self) -> &[RenderTargetDescriptor] {
        &self.descriptors
    }

    /// Every descriptor, for batched edits.
    #[inline]
    pub fn descriptors_mut(&mut self) -> &mut [RenderTargetDescriptor] {
        &mut self.descriptors
    }

    #[inline]
    #[must_use]
    pub fn handles(&self) -> &[Option<TargetHandle>] {
        &self.handles
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    // ─── Pass outputs ──────────────────────────────────────────────────

    /// Declares the ordered outputs of `pass`, capturing the handles the
    /// names resolve to right now. Unknown names become null entries.
    pub fn set_operation_outputs(&mut self, pass: &str, targets: &[&str]) {
        let mut binding = OutputBinding::default();
        for &name in targets {
            binding.names.push(name.to_owned());
            binding.handles.push(self.target_by_name(name));
        }
        self.outputs.insert(pass.to_owned(), binding);
    }

    /// The outputs declared for `pass`, empty if none were.
    #[must_use]
    pub fn operation_outputs(&self, pass: &str) -> &[Option<TargetHandle>] {
        self.outputs.get(pass).map_or(&[][..], |b| b.handles.as_slice())
    }

    /// Names of the outputs declared for `pass`.
    pub fn operation_output_names(&self, pass: &str) -> impl Iterator<Item = &str> {
        self.outputs.get(pass).into_iter().flat_map(|b| b.names.iter().map(String::as_str))
    }

    // ─── Present pair ──────────────────────────────────────────────────

    /// Designates the target at `index` as the presented color buffer.
    /// The depth half of the pair is always [`DEPTH_TARGET`].
    pub fn set_present_target(&mut self, index: usize) -> bool {
        if index >= self.len() {
            error!("Present target index {index} out of range ({} targets)", self.len());
            return false;
        }
        self.present = Some(index);
        true
    }

    #[inline]
    #[must_use]
    pub fn present_index(&self) -> Option<usize> {
        self.present
    }

    /// `[color, depth]` handles the frame ends on.
    #[must_use]
    pub fn present_targets(&self) -> [Option<TargetHandle>; 2] {
        let color = self.present.and_then(|i| self.target(i));
        let depth = self.index.get(DEPTH_TARGET).and_then(|&i| self.target(i));
        [color, depth]
    }

    // ─── Batched updates ───────────────────────────────────────────────

    /// Pushes every descriptor into its handle in one host call.
    ///
    /// Targets without a handle are skipped; see
    /// [`reacquire_missing`](Self::reacquire_missing). Returns the number of
    /// targets in the batch, or the host's error with nothing applied.
    pub fn update_target_descriptions<H: TargetManager + ?Sized>(&self, host: &mut H) -> Result<usize> {
        let batch: Vec<(TargetHandle, &RenderTargetDescriptor)> = self
            .handles
            .iter()
            .zip(&self.descriptors)
            .filter_map(|(handle, desc)| handle.map(|h| (h, desc)))
            .collect();

        if batch.is_empty() {
            return Ok(0);
        }
        host.update_targets(&batch)?;
        Ok(batch.len())
    }

    /// Acquires every target whose allocation failed earlier.
    ///
    /// Live targets are not touched. If any target comes back, pass output
    /// lists are re-resolved by name so they pick up the new handle.
    /// Returns the number of targets acquired.
    pub fn reacquire_missing<H: TargetManager + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut reacquired = 0;
        for (desc, slot) in self.descriptors.iter().zip(self.handles.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            match host.acquire_target(desc) {
                Ok(handle) => {
                    debug!("Render target '{}' acquired on retry", desc.name);
                    *slot = Some(handle);
                    reacquired += 1;
                }
                Err(e) => trace!("Render target '{}' still unavailable: {e}", desc.name),
            }
        }

        if reacquired > 0 {
            self.refresh_operation_outputs();
        }
        reacquired
    }

    fn refresh_operation_outputs(&mut self) {
        let Self { outputs, index, handles, .. } = self;
        for binding in outputs.values_mut() {
            for (name, handle) in binding.names.iter().zip(binding.handles.iter_mut()) {
                *handle = index.get(name).and_then(|&i| handles[i]);
            }
        }
    }

    /// Whether any target is still missing its GPU handle.
    #[must_use]
    pub fn has_missing_handles(&self) -> bool {
        self.handles.iter().any(Option::is_none)
    }

    /// Releases every handle and forgets every target and output list.
    /// Safe to call on an empty registry.
    pub fn clear<H: TargetManager + ?Sized>(&mut self, host: &mut H) {
        for handle in self.handles.drain(..).flatten() {
            host.release_target(handle);
        }
        self.descriptors.clear();
        self.index.clear();
        self.outputs.clear();
        self.present = None;
    }
}
