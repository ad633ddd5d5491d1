use bytemuck::{Pod, Zeroable};
use glam::DVec3;

use crate::api::types::BodyState;
use crate::core::body::BodyParameters;

/// Per-body GPU instance data, positioned relative to the eye.
/// 8 floats = 32 bytes stride.
///
/// Subtracting the eye in f64 before narrowing keeps nearby geometry precise
/// even when the eye is 1e12 m from the origin.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// Eye-relative position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Physical radius.
    pub radius: f32,
    /// Rotation about the body's axis, radians.
    pub rotation: f32,
    /// Cloud layer displacement in [0, 1).
    pub cloud_disp: f32,
    /// Far-away brightness (stars only).
    pub brightness: f32,
    /// 1.0 for the focused body, 0.0 otherwise.
    pub focused: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Instance buffer rebuilt once per frame.
pub struct InstanceBuffer {
    pub instances: Vec<BodyInstance>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(32),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Rebuild from this frame's body states.
    pub fn rebuild(&mut self, eye: DVec3, params: &[BodyParameters], states: &[BodyState], focused: usize) {
        self.clear();
        for (i, (p, s)) in params.iter().zip(states).enumerate() {
            let rel = (s.position - eye).as_vec3();
            self.instances.push(BodyInstance {
                x: rel.x,
                y: rel.y,
                z: rel.z,
                radius: p.radius as f32,
                rotation: s.rotation_angle,
                cloud_disp: s.cloud_disp,
                brightness: if p.is_star { p.brightness } else { 0.0 },
                focused: if i == focused { 1.0 } else { 0.0 },
            });
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
