//! Render Graph
//!
//! [`RenderGraph`] owns the ordered pass list. Execution is linear: every
//! enabled pass runs once per frame in registration order.
//!
//! Passes are addressed either by registration index or by name. Names
//! resolve through an ordered name→index map kept next to the list; both
//! lookups are checked and never index out of bounds.

use log::{error, trace};
use rustc_hash::FxHashMap;

use super::pass::{PassContext, RenderPass};
use crate::errors::{BrushworkError, Result};
use crate::host::Host;

/// Ordered list of render passes.
#[derive(Default)]
pub struct RenderGraph {
    passes: Vec<Box<dyn RenderPass>>,
    index: FxHashMap<String, usize>,
}

impl RenderGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            passes: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    /// Appends a pass. Passes execute in the order they are added.
    ///
    /// A pass whose name is already taken is still executed, but name
    /// lookups keep resolving to the first pass registered under it.
    pub fn add_pass(&mut self, pass: Box<dyn RenderPass>) -> usize {
        let idx = self.passes.len();
        let name = pass.name().to_owned();
        if self.index.contains_key(&name) {
            error!("Duplicate render pass name '{name}', lookups keep the first one");
        } else {
            self.index.insert(name, idx);
        }
        self.passes.push(pass);
        idx
    }

    /// Registration index of the pass called `name`.
    #[must_use]
    pub fn pass_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Checked variant of [`pass_index`](Self::pass_index).
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.pass_index(name).ok_or_else(|| BrushworkError::ResourceNotFound {
            kind: "render pass",
            name: name.to_owned(),
        })
    }

    #[must_use]
    pub fn pass(&self, index: usize) -> Option<&dyn RenderPass> {
        self.passes.get(index).map(AsRef::as_ref)
    }

    pub fn pass_mut(&mut self, index: usize) -> Option<&mut (dyn RenderPass + 'static)> {
        self.passes.get_mut(index).map(AsMut::as_mut)
    }

    #[must_use]
    pub fn pass_by_name(&self, name: &str) -> Option<&dyn RenderPass> {
        self.pass_index(name).and_then(|idx| self.pass(idx))
    }

    pub fn pass_by_name_mut(&mut self, name: &str) -> Option<&mut (dyn RenderPass + 'static)> {
        let idx = self.pass_index(name)?;
        self.pass_mut(idx)
    }

    /// Checked index access for the command surface.
    pub fn checked_mut(&mut self, index: usize) -> Result<&mut (dyn RenderPass + 'static)> {
        let len = self.passes.len();
        self.pass_mut(index).ok_or(BrushworkError::IndexOutOfRange {
            context: "render pass",
            index,
            len,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RenderPass> {
        self.passes.iter().map(AsRef::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn RenderPass + 'static)> {
        self.passes.iter_mut().map(AsMut::as_mut)
    }

    /// Pass names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.passes.iter().map(|p| p.name().to_owned()).collect()
    }

    /// Runs every enabled pass in order.
    pub fn execute(&mut self, ctx: &mut PassContext<'_>) {
        for pass in &mut self.passes {
            if !pass.enabled() {
                trace!("Skipping disabled pass '{}'", pass.name());
                continue;
            }
            pass.execute(ctx);
        }
    }

    /// Releases every pass's host resources and empties the list.
    pub fn release_all(&mut self, host: &mut dyn Host) {
        for pass in &mut self.passes {
            pass.release(host);
        }
        self.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.passes.clear();
        self.index.clear();
    }
}
