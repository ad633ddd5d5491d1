use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::body::{
    pole_direction, AssetPaths, AtmosphericParameters, BodyParameters, OrbitalElements,
    RingParameters,
};
use crate::core::hierarchy::BodyHierarchy;
use crate::error::ConfigResult;

/// Planetary system description, loaded from a JSON file.
/// Angles are written in degrees; everything else in SI units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemManifest {
    /// Ambient light level.
    #[serde(default)]
    pub ambient_color: f32,
    pub planets: Vec<PlanetDescriptor>,
}

/// One body in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub name: String,
    /// Parent body name, omitted for roots.
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub orbit: Option<OrbitDescriptor>,
    #[serde(default)]
    pub body: Option<BodyDescriptor>,
    #[serde(default)]
    pub atmosphere: Option<AtmosphereDescriptor>,
    #[serde(default)]
    pub ring: Option<RingDescriptor>,
}

/// Kepler elements with angles in degrees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitDescriptor {
    pub ecc: f64,
    pub sma: f64,
    pub inc: f64,
    pub lan: f64,
    pub arg: f64,
    pub m0: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyDescriptor {
    pub radius: f64,
    /// Rotation pole right ascension, degrees.
    pub right_ascension: f32,
    /// Rotation pole declination, degrees.
    pub declination: f32,
    #[serde(rename = "rotPeriod")]
    pub rotation_period: f64,
    pub mean_color: [f32; 3],
    pub brightness: f32,
    #[serde(rename = "GM")]
    pub gm: f64,
    pub is_star: bool,
    pub diffuse: String,
    pub night: String,
    pub cloud: String,
    pub model: String,
    pub cloud_disp_period: f64,
    pub night_tex_intensity: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtmosphereDescriptor {
    pub max_altitude: f32,
    #[serde(rename = "K")]
    pub k: [f32; 4],
    pub density: f32,
    pub scale_height: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingDescriptor {
    pub inner: f32,
    pub outer: f32,
    /// Ring plane pole right ascension, degrees.
    pub right_ascension: f32,
    /// Ring plane pole declination, degrees.
    pub declination: f32,
    pub backscat: String,
    pub forwardscat: String,
    pub unlit: String,
    pub transparency: String,
    pub color: String,
}

impl OrbitDescriptor {
    fn to_elements(self) -> OrbitalElements {
        OrbitalElements {
            ecc: self.ecc,
            sma: self.sma,
            inc: self.inc.to_radians(),
            lan: self.lan.to_radians(),
            arg: self.arg.to_radians(),
            m0: self.m0.to_radians(),
        }
    }
}

impl PlanetDescriptor {
    /// Convert to runtime parameters (degrees → radians, pole vectors).
    pub fn to_parameters(&self) -> BodyParameters {
        let mut params = BodyParameters::new(self.name.clone(), 0.0);
        params.parent = self.parent.clone();
        if let Some(orbit) = self.orbit {
            params.orbit = orbit.to_elements();
        }

        if let Some(body) = &self.body {
            params.radius = body.radius;
            params.rotation_axis =
                pole_direction(body.right_ascension.to_radians(), body.declination.to_radians());
            params.rotation_period = body.rotation_period;
            params.mean_color = Vec3::from_array(body.mean_color);
            params.brightness = body.brightness;
            params.gm = body.gm;
            params.is_star = body.is_star;
            params.cloud_period = body.cloud_disp_period;
            params.night_intensity = body.night_tex_intensity;
            params.assets.diffuse = body.diffuse.clone();
            params.assets.night = body.night.clone();
            params.assets.cloud = body.cloud.clone();
            params.assets.model = body.model.clone();
        }

        if let Some(atmo) = &self.atmosphere {
            params.atmosphere = AtmosphericParameters {
                has_atmosphere: true,
                k: atmo.k,
                density: atmo.density,
                max_height: atmo.max_altitude,
                scale_height: atmo.scale_height,
            };
        }

        if let Some(ring) = &self.ring {
            params.ring = RingParameters {
                has_rings: true,
                inner_distance: ring.inner,
                outer_distance: ring.outer,
                normal: pole_direction(ring.right_ascension.to_radians(), ring.declination.to_radians()),
            };
            params.assets = AssetPaths {
                ring_backscat: ring.backscat.clone(),
                ring_forwardscat: ring.forwardscat.clone(),
                ring_unlit: ring.unlit.clone(),
                ring_transparency: ring.transparency.clone(),
                ring_color: ring.color.clone(),
                ..params.assets
            };
        }

        params
    }
}

impl SystemManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a manifest file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Convert every planet and validate the result as a whole: per-body
    /// values, unique names, resolvable parents, no cycles.
    pub fn to_bodies(&self) -> ConfigResult<Vec<BodyParameters>> {
        let bodies: Vec<BodyParameters> = self.planets.iter().map(PlanetDescriptor::to_parameters).collect();
        for body in &bodies {
            body.validate()?;
        }
        BodyHierarchy::new(&bodies)?;
        log::info!("Loaded {} bodies", bodies.len());
        Ok(bodies)
    }
}
