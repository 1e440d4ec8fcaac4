//! Opaque GPU resource handles.
//!
//! The graph never owns GPU memory directly. Every target, texture, sampler
//! and shader instance lives in the host and is referred to by a small
//! `Copy` id. Identity is the raw id: two handles are the same resource iff
//! their ids are equal, which is what lets captured output lists survive an
//! in-place resize.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a host-side id.
            #[inline]
            #[must_use]
            pub const fn from_raw(id: u64) -> Self {
                Self(id)
            }

            /// The host-side id.
            #[inline]
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_handle!(
    /// A render target allocated by the host's target manager.
    TargetHandle
);
define_handle!(
    /// A texture loaded by the host's texture manager.
    TextureHandle
);
define_handle!(
    /// A sampler state object acquired from the host.
    SamplerHandle
);
define_handle!(
    /// A compiled, parameterizable shader instance (file + technique).
    ShaderHandle
);
define_handle!(
    /// A mesh in the host scene, visited by the velocity pass.
    MeshId
);
