//! Image assets
//!
//! The loop needs three images before it can draw anything. Providers are
//! host-specific; the bundle is all-or-nothing.

use thiserror::Error;

/// Logical image resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    Background,
    ActorHandle,
    ActorBlade,
}

impl AssetId {
    /// Every resource a session needs, in load order
    pub const ALL: [AssetId; 3] = [AssetId::Background, AssetId::ActorHandle, AssetId::ActorBlade];

    /// Logical resource name
    pub fn name(&self) -> &'static str {
        match self {
            AssetId::Background => "background",
            AssetId::ActorHandle => "actor-handle",
            AssetId::ActorBlade => "actor-blade",
        }
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetLoadError {
    #[error("asset `{id}` is unavailable")]
    Missing { id: AssetId },
    #[error("asset `{id}` failed to decode: {reason}")]
    Decode { id: AssetId, reason: String },
}

/// Decoded images, shared read-only by the renderer
#[derive(Debug, Clone)]
pub struct AssetBundle<I> {
    pub background: I,
    pub actor_handle: I,
    pub actor_blade: I,
}

/// Resolves a named resource into a drawable image
#[allow(async_fn_in_trait)]
pub trait AssetProvider {
    type Image;

    /// Resolve and fully decode one resource
    async fn load(&self, id: AssetId) -> Result<Self::Image, AssetLoadError>;
}

/// Load every resource, failing on the first error
pub async fn load_bundle<P: AssetProvider>(
    provider: &P,
) -> Result<AssetBundle<P::Image>, AssetLoadError> {
    let background = provider.load(AssetId::Background).await?;
    let actor_handle = provider.load(AssetId::ActorHandle).await?;
    let actor_blade = provider.load(AssetId::ActorBlade).await?;
    log::info!("Loaded {} assets", AssetId::ALL.len());
    Ok(AssetBundle {
        background,
        actor_handle,
        actor_blade,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory provider; images are their own names
    #[derive(Default)]
    pub(crate) struct MemoryProvider {
        pub broken: Option<AssetId>,
        pub requested: RefCell<Vec<AssetId>>,
    }

    impl AssetProvider for MemoryProvider {
        type Image = &'static str;

        async fn load(&self, id: AssetId) -> Result<Self::Image, AssetLoadError> {
            self.requested.borrow_mut().push(id);
            if self.broken == Some(id) {
                return Err(AssetLoadError::Decode {
                    id,
                    reason: "corrupt image".into(),
                });
            }
            Ok(id.name())
        }
    }

    #[test]
    fn test_names() {
        let names: Vec<_> = AssetId::ALL.iter().map(AssetId::name).collect();
        assert_eq!(names, ["background", "actor-handle", "actor-blade"]);
    }

    #[test]
    fn test_load_bundle() {
        let provider = MemoryProvider::default();
        let bundle = pollster::block_on(load_bundle(&provider)).unwrap();
        assert_eq!(bundle.background, "background");
        assert_eq!(bundle.actor_handle, "actor-handle");
        assert_eq!(bundle.actor_blade, "actor-blade");
        assert_eq!(*provider.requested.borrow(), AssetId::ALL);
    }

    #[test]
    fn test_load_bundle_stops_at_first_failure() {
        let provider = MemoryProvider {
            broken: Some(AssetId::ActorHandle),
            ..Default::default()
        };
        let err = pollster::block_on(load_bundle(&provider)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "asset `actor-handle` failed to decode: corrupt image"
        );
        assert_eq!(
            *provider.requested.borrow(),
            [AssetId::Background, AssetId::ActorHandle]
        );
    }
}
