//! What the renderer draws: models placed by per-instance transforms.

/// Instance data, the asteroid ring generator and instance culling.
pub mod instancing;
mod object;

pub use instancing::{asteroid_ring, visible_instances, InstanceRaw};
pub use object::SceneObject;
