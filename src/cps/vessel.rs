use crate::util::{Bounds, Transform, Vec3D};
use std::fmt::Display;

/// Stable identifier of a vessel in the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VesselId(pub u64);

impl Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "V{}", self.0) }
}

/// Read-only per-tick snapshot of a vessel as provided by the host simulation.
///
/// All vectors are world-space. The exhaust volume is expressed in the vessel's
/// own reference frame ([`VesselState::ref_transform`]).
#[derive(Debug, Clone, PartialEq)]
pub struct VesselState {
    pub id: VesselId,
    /// World position of the center of mass.
    pub position: Vec3D<f64>,
    pub surface_velocity: Vec3D<f64>,
    pub acceleration: Vec3D<f64>,
    /// Direction-dependent bound on how quickly the vessel can turn its velocity.
    pub max_angular_accel: Vec3D<f64>,
    /// Characteristic radius of the vessel.
    pub radius: f64,
    /// Engine plume hazard volume in the vessel's reference frame.
    pub exhaust: Bounds,
    /// Orientation of the vessel's reference frame, `None` while the host has no valid one.
    pub ref_transform: Option<Transform>,
    pub landed_or_splashed: bool,
    pub on_planet: bool,
    /// Physics-suppressed by the host (on rails).
    pub packed: bool,
    pub loaded: bool,
    pub mass: f64,
    pub surface_speed: f64,
    /// Local "up" direction (unit length).
    pub up: Vec3D<f64>,
    /// Horizontal velocity the autopilot currently wants to achieve.
    pub needed_hor_velocity: Vec3D<f64>,
    /// Altitude above the terrain below the vessel.
    pub rel_altitude: f64,
    /// Vessel height (distance from the center of mass to its lowest point).
    pub height: f64,
    pub rel_vertical_speed: f64,
}

impl Default for VesselState {
    fn default() -> Self {
        Self {
            id: VesselId(0),
            position: Vec3D::zero(),
            surface_velocity: Vec3D::zero(),
            acceleration: Vec3D::zero(),
            max_angular_accel: Vec3D::new(1.0, 1.0, 1.0),
            radius: 1.0,
            exhaust: Bounds::empty(),
            ref_transform: Some(Transform::translation(Vec3D::zero())),
            landed_or_splashed: false,
            on_planet: true,
            packed: false,
            loaded: true,
            mass: 1.0,
            surface_speed: 0.0,
            up: Vec3D::unit_y(),
            needed_hor_velocity: Vec3D::zero(),
            rel_altitude: 100.0,
            height: 1.0,
            rel_vertical_speed: 0.0,
        }
    }
}

impl VesselState {
    /// The vessel's reference frame anchored at its center of mass. Falls back to a
    /// world-aligned frame if the host did not provide one.
    pub fn frame(&self) -> Transform {
        self.ref_transform.map_or_else(|| Transform::translation(self.position), |t| t.with_origin(self.position))
    }

    /// Distance from a world-space point to this vessel's exhaust volume.
    pub fn dist_to_exhaust(&self, point: Vec3D<f64>) -> f64 {
        self.exhaust.sqr_distance(self.frame().inverse_transform_point(point)).sqrt()
    }

    /// Whether the scanner may evaluate this vessel at all.
    pub fn is_scannable(&self) -> bool { self.loaded && !self.packed }
}

/// Geometry and controller state published by a foreign vessel that runs its own
/// collision prevention system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerStatus {
    pub radius: f64,
    pub exhaust: Bounds,
    pub ref_transform: Transform,
    /// The peer's CPS is currently engaged.
    pub cps_active: bool,
}

/// The host's view of all loaded vessels.
///
/// Implementations must tolerate lookups of vessels that vanished since
/// [`Fleet::roster`] was called by returning `None`.
pub trait Fleet {
    /// Snapshot of the ids of every vessel currently known to the host.
    fn roster(&self) -> Vec<VesselId>;

    /// Current state of a vessel, `None` if it no longer exists.
    fn vessel(&self, id: VesselId) -> Option<&VesselState>;

    /// Cooperating controller data of a vessel, `None` if it does not run a CPS.
    fn peer(&self, id: VesselId) -> Option<PeerStatus>;

    /// Sweeps a sphere from `origin` along `dir` for at most `max_dist` and returns
    /// the first world-space point hit.
    fn sphere_cast(&self, origin: Vec3D<f64>, radius: f64, dir: Vec3D<f64>, max_dist: f64)
    -> Option<Vec3D<f64>>;
}

/// Host-side toggles read by the controller every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags {
    /// Horizontal flight control is engaged; the CPS only runs while it is.
    pub horizontal_flight: bool,
    /// Altitude hold is engaged, vertical corrections go to the vertical setpoint.
    pub altitude_control: bool,
}

impl Default for ControlFlags {
    fn default() -> Self { Self { horizontal_flight: true, altitude_control: true } }
}

/// Channels consumed by the downstream flight controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightDemand {
    /// Vertical speed setpoint; the CPS only ever adds to it.
    pub vertical_cutoff: f64,
    /// Horizontal course corrections collected during the current tick.
    course_corrections: Vec<Vec3D<f64>>,
}

impl FlightDemand {
    pub fn new(vertical_cutoff: f64) -> Self { Self { vertical_cutoff, course_corrections: Vec::new() } }

    pub fn adjust_vertical_cutoff(&mut self, delta: f64) { self.vertical_cutoff += delta; }

    pub fn add_course_correction(&mut self, correction: Vec3D<f64>) { self.course_corrections.push(correction); }

    pub fn course_corrections(&self) -> &[Vec3D<f64>] { &self.course_corrections }

    /// Sum of all corrections added this tick.
    pub fn total_course_correction(&self) -> Vec3D<f64> { self.course_corrections.iter().sum() }

    /// Called by the host once the flight controller consumed this tick's corrections.
    pub fn clear_course_corrections(&mut self) { self.course_corrections.clear(); }
}
