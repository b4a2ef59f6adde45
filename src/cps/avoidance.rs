use super::vessel::{PeerStatus, VesselState};
use crate::config::CpsConfig;
use crate::util::{
    Bounds, Transform, Vec3D,
    helpers::{GEOM_EPS, clamp_h, clamp_l, sign, sin_from_cos},
};

/// Lower bound for the distance to the safety sphere used to time closing-course maneuvers.
const MIN_APPROACH_DIST: f64 = 0.1;
/// Threshold used by the proximity check when the caller left it unset and the
/// course is not closing: only actual overlap of more than a meter is corrected.
const UNSET_THRESHOLD: f64 = -1.0;
/// Smallest violation of the safe distance that is worth a proximity correction.
const MIN_PROXIMITY_CORRECTION_SQR: f64 = 0.25;
/// Gap the proximity correction always asks for, even right at the threshold.
const MIN_DIST_TO_SAFE: f64 = -0.01;
/// Bounds for the turning capability along the closing direction.
const TURN_CAPABILITY_RANGE: (f64, f64) = (0.01, 1.0);

/// Separation margin used by [`avoid_vessel`] on top of the combined collision distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeparationThreshold {
    /// Use the combined collision distance itself as the margin.
    Auto,
    /// Use a caller supplied margin, e.g. the safe distance for vessels already
    /// flagged as dangerous.
    Fixed(f64),
    /// The obstacle is landed or splashed: no closing-course maneuver, only the
    /// proximity correction against actual overlap with the bodies.
    Landed,
}

/// Size and hazard geometry of the obstacle vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleGeometry {
    pub radius: f64,
    /// Exhaust volume in the obstacle's reference frame.
    pub exhaust: Bounds,
    pub ref_transform: Transform,
}

impl From<&PeerStatus> for ObstacleGeometry {
    fn from(peer: &PeerStatus) -> Self {
        Self { radius: peer.radius, exhaust: peer.exhaust, ref_transform: peer.ref_transform }
    }
}

/// Time budget before the closest approach at which a vessel has to start evading.
///
/// Vessels that can turn their velocity quickly along `dvn` get a smaller budget.
///
/// # Arguments
/// - `cfg`: The CPS configuration providing the base safe time.
/// - `own`: The evading vessel.
/// - `dvn`: Unit relative velocity.
pub fn safe_time(cfg: &CpsConfig, own: &VesselState, dvn: Vec3D<f64>) -> f64 {
    let (lo, hi) = TURN_CAPABILITY_RANGE;
    cfg.safe_time / own.max_angular_accel.dot(dvn).abs().clamp(lo, hi)
}

/// Unit direction orthogonal to the relative velocity pointing away from the obstacle.
///
/// For exact head-on geometry there is no preferred side; the horizontal perpendicular
/// of the velocity is used then, or any perpendicular if the velocity is vertical.
fn lateral_escape(dir: Vec3D<f64>, dvn: Vec3D<f64>, cos_a: f64, up: Vec3D<f64>) -> Vec3D<f64> {
    let lateral = dvn * cos_a - dir;
    if lateral.abs() > GEOM_EPS {
        return lateral.normalize();
    }
    let horizontal = up.cross(dvn);
    if horizontal.abs() > GEOM_EPS { horizontal.normalize() } else { dvn.any_orthogonal() }
}

/// Computes an avoidance maneuver against a fixed point obstacle.
///
/// # Arguments
/// - `cfg`: The CPS configuration.
/// - `own`: The evading vessel; its radius defines the safety margin.
/// - `dir`: Unit direction from the vessel to the obstacle.
/// - `dist`: Distance to the obstacle.
/// - `dv`: Closing velocity of the vessel relative to the obstacle.
///
/// # Returns
/// - `Some(maneuver)`: A velocity correction orthogonal to `dv`, growing stronger as the
///   encounter nears.
/// - `None`: If the vessel moves away, passes at a safe distance or still has enough
///   time to react later.
pub fn avoid_static(
    cfg: &CpsConfig,
    own: &VesselState,
    dir: Vec3D<f64>,
    dist: f64,
    dv: Vec3D<f64>,
) -> Option<Vec3D<f64>> {
    let dv_abs = dv.abs();
    if dv_abs < GEOM_EPS || dist < GEOM_EPS {
        return None;
    }
    let dvn = dv / dv_abs;
    let cos_a = dir.dot(dvn).clamp(-1.0, 1.0);
    if cos_a <= 0.0 {
        return None;
    }
    let sin_a = sin_from_cos(cos_a);
    let along_track = dist * cos_a;
    let min_separation = dist * sin_a;
    let sep_threshold = own.radius * 2.0;
    if min_separation > sep_threshold || (min_separation > own.radius && along_track < min_separation) {
        return None;
    }
    let approach_time = clamp_l(along_track / dv_abs, GEOM_EPS);
    if approach_time > safe_time(cfg, own, dvn) {
        return None;
    }
    let escape = lateral_escape(dir, dvn, cos_a, own.up);
    Some(escape * ((sep_threshold - min_separation) / approach_time.sqrt()))
}

/// Computes an avoidance maneuver against another, possibly moving, vessel.
///
/// The combined collision distance accounts for both radii and both exhaust volumes:
/// each side contributes the larger of its radius and the clearance its exhaust
/// requires towards the other vessel. Two corrections are summed:
///
/// 1. A closing-course correction if the relative velocity brings the vessels within
///    `collision_dist + threshold` sooner than [`safe_time`] allows. Skipped for
///    [`SeparationThreshold::Landed`] obstacles. It pushes sideways
///    and away vertically, scaled by the remaining margin over the time to contact.
/// 2. A proximity correction whenever the current gap between the bodies is below the
///    threshold, regardless of the course. It moves sideways relative to the needed
///    horizontal velocity if there is one, directly away otherwise.
///
/// # Arguments
/// - `cfg`: The CPS configuration.
/// - `own`: The evading vessel.
/// - `dir`: Unit direction from the vessel to the obstacle.
/// - `dist`: Distance between the centers of mass.
/// - `dv`: Relative velocity of the vessel with respect to the obstacle.
/// - `obstacle`: Size and exhaust geometry of the obstacle.
/// - `threshold`: Separation margin, see [`SeparationThreshold`].
///
/// # Returns
/// - `Some(maneuver)` if the combined correction is non-zero, `None` otherwise.
pub fn avoid_vessel(
    cfg: &CpsConfig,
    own: &VesselState,
    dir: Vec3D<f64>,
    dist: f64,
    dv: Vec3D<f64>,
    obstacle: &ObstacleGeometry,
    threshold: SeparationThreshold,
) -> Option<Vec3D<f64>> {
    if dist < GEOM_EPS {
        return None;
    }
    let collision_dist = collision_distance(own, dir, dist, obstacle);
    let fixed = match threshold {
        SeparationThreshold::Auto => None,
        SeparationThreshold::Fixed(t) => Some(t),
        SeparationThreshold::Landed => Some(0.0),
    };
    let mut maneuver = Vec3D::zero();
    let mut proximity_threshold = fixed.unwrap_or(UNSET_THRESHOLD);
    let dv_abs = dv.abs();
    if dv_abs >= GEOM_EPS && threshold != SeparationThreshold::Landed {
        let dvn = dv / dv_abs;
        let cos_a = dir.dot(dvn).clamp(-1.0, 1.0);
        if cos_a > 0.0 {
            let margin = fixed.unwrap_or(collision_dist);
            proximity_threshold = margin;
            let approach = Approach { dir, dist, dv_abs, dvn, cos_a };
            if let Some(m) = closing_course(cfg, own, &approach, collision_dist + margin) {
                maneuver = m;
            }
        }
    }
    maneuver += proximity_correction(cfg, own, dir, dist - collision_dist, proximity_threshold);
    (!maneuver.is_zero() && maneuver.is_finite()).then_some(maneuver)
}

/// Sum of both bodies' effective radii along the line between them.
pub fn collision_distance(own: &VesselState, dir: Vec3D<f64>, dist: f64, obstacle: &ObstacleGeometry) -> f64 {
    let own_clearance = clamp_l(dist - own.dist_to_exhaust(own.position + dir * dist), own.radius);
    let own_local = obstacle.ref_transform.inverse_transform_point(own.position);
    let other_clearance = clamp_l(dist - obstacle.exhaust.sqr_distance(own_local).sqrt(), obstacle.radius);
    own_clearance + other_clearance
}

/// Relative motion of an approaching pair.
struct Approach {
    dir: Vec3D<f64>,
    dist: f64,
    dv_abs: f64,
    dvn: Vec3D<f64>,
    cos_a: f64,
}

fn closing_course(cfg: &CpsConfig, own: &VesselState, ap: &Approach, sep_threshold: f64) -> Option<Vec3D<f64>> {
    if sep_threshold <= GEOM_EPS {
        return None;
    }
    let sin_a = sin_from_cos(ap.cos_a);
    let min_separation = ap.dist * sin_a;
    if min_separation > sep_threshold {
        return None;
    }
    // distance travelled until the safety sphere around the obstacle is entered
    let entry_dist = if sin_a <= 0.0 {
        ap.dist - sep_threshold
    } else if ap.dist > sep_threshold {
        let at_obstacle = (min_separation / sep_threshold).asin() - ap.cos_a.acos();
        sep_threshold * at_obstacle.sin() / sin_a
    } else {
        0.0
    };
    let approach_time = clamp_l(entry_dist, MIN_APPROACH_DIST) / ap.dv_abs;
    if approach_time > safe_time(cfg, own, ap.dvn) {
        return None;
    }
    let closeness = 1.0 - min_separation / sep_threshold;
    let vertical = -own.up * (sign(ap.dir.dot(own.up)) * closeness);
    let lateral = lateral_escape(ap.dir, ap.dvn, ap.cos_a, own.up);
    Some((vertical + lateral).normalize() * ((sep_threshold - min_separation) / approach_time))
}

fn proximity_correction(cfg: &CpsConfig, own: &VesselState, dir: Vec3D<f64>, gap: f64, threshold: f64) -> Vec3D<f64> {
    if gap >= threshold {
        return Vec3D::zero();
    }
    let dist_to_safe = clamp_h(gap - threshold, MIN_DIST_TO_SAFE);
    let mut correction = dir * dist_to_safe;
    if own.needed_hor_velocity.sqr_abs() > cfg.lat_avoid_min_vel_sqr {
        let lat_avoid = own.up.cross(own.needed_hor_velocity.normalize());
        // keep the side that still moves away from the obstacle
        correction = if correction.dot(lat_avoid) >= 0.0 {
            lat_avoid * -dist_to_safe
        } else {
            lat_avoid * dist_to_safe
        };
    }
    if correction.sqr_abs() > MIN_PROXIMITY_CORRECTION_SQR {
        correction / cfg.safe_time * 2.0
    } else {
        Vec3D::zero()
    }
}

/// Right-of-way between two vessels both running a CPS.
///
/// Returns `true` if `own` should leave the avoidance to the other vessel: the peer's
/// CPS is engaged and `own` is both heavier and faster.
pub fn defers_to_peer(own: &VesselState, other: &VesselState, peer: &PeerStatus) -> bool {
    peer.cps_active && own.mass > other.mass && own.surface_speed > other.surface_speed
}
