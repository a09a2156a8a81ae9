//! Opaque backend object handles
//!
//! Handles are plain indices minted by a [`GraphicsBackend`](crate::GraphicsBackend).
//! The front end never interprets them beyond equality and hashing.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw handle value
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_handle!(
    /// GPU buffer (vertex, index or uniform storage)
    BufferHandle
);
define_handle!(
    /// Sampled texture owned by the application
    TextureHandle
);
define_handle!(SamplerHandle);
define_handle!(
    /// Compiled shader object for a single stage
    ShaderHandle
);
define_handle!(
    /// Resource binding: one shader-visible slot set of a binding bank
    BindingHandle
);
define_handle!(VertexLayoutHandle);
define_handle!(
    /// Vertex buffer binding (layout + attached buffers)
    VertexBindingHandle
);
define_handle!(
    /// Shader signature describing every binding bank
    SignatureHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_value() {
        assert_eq!(BufferHandle(3), BufferHandle(3));
        assert_ne!(BindingHandle(1), BindingHandle(2));
        assert_eq!(TextureHandle(7).raw(), 7);
    }
}
