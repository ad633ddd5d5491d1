//! Static per-body parameters: orbit, physical and visual properties.
//!
//! Everything here is immutable once the system is loaded. Units are SI
//! (meters, seconds, m³/s²) and all angles are radians.

use glam::Vec3;

use crate::error::{ConfigError, ConfigResult};

/// Kepler orbital elements, relative to the parent body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitalElements {
    /// Eccentricity (0 = circular).
    pub ecc: f64,
    /// Semi-major axis in meters.
    pub sma: f64,
    /// Inclination.
    pub inc: f64,
    /// Longitude of the ascending node.
    pub lan: f64,
    /// Argument of periapsis.
    pub arg: f64,
    /// Mean anomaly at epoch 0.
    pub m0: f64,
}

impl OrbitalElements {
    /// All-zero elements, used by roots.
    pub const ZERO: Self = Self { ecc: 0.0, sma: 0.0, inc: 0.0, lan: 0.0, arg: 0.0, m0: 0.0 };

    /// Circular orbit in the reference plane.
    pub fn circular(sma: f64) -> Self {
        Self { sma, ..Self::ZERO }
    }

    pub fn with_ecc(mut self, ecc: f64) -> Self {
        self.ecc = ecc;
        self
    }

    pub fn with_inc(mut self, inc: f64) -> Self {
        self.inc = inc;
        self
    }

    pub fn with_lan(mut self, lan: f64) -> Self {
        self.lan = lan;
        self
    }

    pub fn with_arg(mut self, arg: f64) -> Self {
        self.arg = arg;
        self
    }

    pub fn with_m0(mut self, m0: f64) -> Self {
        self.m0 = m0;
        self
    }

    fn validate(&self, body: &str) -> ConfigResult<()> {
        let fields = [self.ecc, self.sma, self.inc, self.lan, self.arg, self.m0];
        let invalid = |reason: &str| ConfigError::InvalidElements {
            body: body.to_string(),
            reason: reason.to_string(),
        };
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite value"));
        }
        if !(0.0..1.0).contains(&self.ecc) {
            return Err(invalid("eccentricity must be in [0, 1)"));
        }
        if self.sma < 0.0 {
            return Err(invalid("negative semi-major axis"));
        }
        Ok(())
    }
}

/// Scattering atmosphere descriptor, consumed by the renderer only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AtmosphericParameters {
    pub has_atmosphere: bool,
    /// Scattering constants (RGB wavelengths + Mie term).
    pub k: [f32; 4],
    pub density: f32,
    /// Max atmospheric height above the surface.
    pub max_height: f32,
    pub scale_height: f32,
}

/// Planetary ring descriptor, consumed by the renderer only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RingParameters {
    pub has_rings: bool,
    /// Distance from the planet center to the inner edge.
    pub inner_distance: f32,
    /// Distance from the planet center to the outer edge.
    pub outer_distance: f32,
    /// Ring plane normal (normalized).
    pub normal: Vec3,
}

/// Texture and model file names. The core carries these but never opens them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPaths {
    pub diffuse: String,
    pub cloud: String,
    pub night: String,
    pub model: String,
    pub ring_backscat: String,
    pub ring_forwardscat: String,
    pub ring_unlit: String,
    pub ring_transparency: String,
    pub ring_color: String,
}

/// Complete static description of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyParameters {
    /// Unique key.
    pub name: String,
    /// Parent body name, empty for roots.
    pub parent: String,
    pub orbit: OrbitalElements,
    /// Physical radius in meters.
    pub radius: f64,
    /// Sidereal rotation period in seconds (0 = not rotating).
    pub rotation_period: f64,
    pub rotation_axis: Vec3,
    /// Gravitational parameter GM in m³/s².
    pub gm: f64,
    /// Cloud layer displacement period in seconds (0 = static clouds).
    pub cloud_period: f64,
    pub is_star: bool,
    /// Color seen from far away.
    pub mean_color: Vec3,
    /// Light intensity seen from far away.
    pub brightness: f32,
    pub night_intensity: f32,
    pub atmosphere: AtmosphericParameters,
    pub ring: RingParameters,
    pub assets: AssetPaths,
}

impl BodyParameters {
    /// A body with the given name and radius, no parent, no orbit.
    pub fn new(name: impl Into<String>, radius: f64) -> Self {
        Self {
            name: name.into(),
            parent: String::new(),
            orbit: OrbitalElements::ZERO,
            radius,
            rotation_period: 0.0,
            rotation_axis: Vec3::Z,
            gm: 0.0,
            cloud_period: 0.0,
            is_star: false,
            mean_color: Vec3::ONE,
            brightness: 0.0,
            night_intensity: 0.0,
            atmosphere: AtmosphericParameters::default(),
            ring: RingParameters::default(),
            assets: AssetPaths::default(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>, orbit: OrbitalElements) -> Self {
        self.parent = parent.into();
        self.orbit = orbit;
        self
    }

    pub fn with_gm(mut self, gm: f64) -> Self {
        self.gm = gm;
        self
    }

    pub fn with_rotation_period(mut self, period: f64) -> Self {
        self.rotation_period = period;
        self
    }

    pub fn with_cloud_period(mut self, period: f64) -> Self {
        self.cloud_period = period;
        self
    }

    pub fn as_star(mut self, brightness: f32) -> Self {
        self.is_star = true;
        self.brightness = brightness;
        self
    }

    /// Whether this body declares a parent.
    pub fn has_parent(&self) -> bool {
        !self.parent.is_empty()
    }

    /// Distance the camera settles at when this body is focused.
    pub fn default_view_distance(&self) -> f64 {
        self.radius * 4.0
    }

    /// Reject values the per-frame update cannot handle.
    pub fn validate(&self) -> ConfigResult<()> {
        self.orbit.validate(&self.name)?;
        let invalid = |reason: &str| ConfigError::InvalidBody {
            body: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid("radius must be positive"));
        }
        if !self.gm.is_finite() || self.gm < 0.0 {
            return Err(invalid("GM must be non-negative"));
        }
        if !self.rotation_period.is_finite() || !self.cloud_period.is_finite() {
            return Err(invalid("non-finite period"));
        }
        Ok(())
    }
}

/// Unit vector pointing at the given right ascension / declination
/// (a rotation pole or ring-plane normal).
pub fn pole_direction(right_ascension: f32, declination: f32) -> Vec3 {
    Vec3::new(
        -right_ascension.sin() * declination.cos(),
        right_ascension.cos() * declination.cos(),
        declination.sin(),
    )
}
