//! Versioned parameter sources.
//!
//! [`Shared<T>`] is the link between user-facing settings and the shader
//! parameter sets that read them. The settings own one clone, every pass that
//! binds the value owns another; all clones point at the same slot, so a
//! write through any of them is visible on the next parameter push without a
//! propagation step.
//!
//! Each write bumps a version counter. Parameter sets remember the version
//! they last pushed and can report which sources went stale in between.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;
use parking_lot::{RwLock, RwLockReadGuard};

struct Slot<T> {
    value: RwLock<T>,
    version: AtomicU64,
}

/// A cloneable, versioned handle to a shared value.
pub struct Shared<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Shared<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(Slot {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Read access to the current value.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.slot.value.read()
    }

    /// Replaces the value and bumps the version.
    pub fn set(&self, value: T) {
        *self.slot.value.write() = value;
        self.slot.version.fetch_add(1, Ordering::Release);
    }

    /// Mutates the value in place and bumps the version.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.slot.value.write());
        self.slot.version.fetch_add(1, Ordering::Release);
        result
    }

    /// Number of writes since creation.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.version.load(Ordering::Acquire)
    }

    /// Whether both handles alias the same slot.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.slot, &b.slot)
    }
}

impl<T: Clone> Shared<T> {
    /// Clones the current value out of the slot.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot.value.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("value", &*self.read())
            .field("version", &self.version())
            .finish()
    }
}

/// A float vector parameter (length 1 for scalars).
pub type FloatParam = Shared<Vec<f32>>;

/// A 4x4 matrix parameter.
pub type MatrixParam = Shared<Mat4>;

impl Shared<Vec<f32>> {
    #[must_use]
    pub fn floats(values: &[f32]) -> Self {
        Self::new(values.to_vec())
    }

    /// First component, or `0.0` when empty.
    #[must_use]
    pub fn scalar(&self) -> f32 {
        self.read().first().copied().unwrap_or(0.0)
    }

    /// Writes the first component, growing the vector if it was empty.
    pub fn set_scalar(&self, value: f32) {
        self.modify(|values| match values.first_mut() {
            Some(first) => *first = value,
            None => values.push(value),
        });
    }

    /// Overwrites the leading components with `values`.
    pub fn set_components(&self, values: &[f32]) {
        self.modify(|current| {
            if current.len() < values.len() {
                current.resize(values.len(), 0.0);
            }
            current[..values.len()].copy_from_slice(values);
        });
    }

    /// Component `index`, or `0.0` when out of range.
    #[must_use]
    pub fn component(&self, index: usize) -> f32 {
        self.read().get(index).copied().unwrap_or(0.0)
    }
}
