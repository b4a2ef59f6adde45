//! Minimal kinematic host used by the demo binary and the tests.

use crate::cps::{Fleet, PeerStatus, VesselId, VesselState};
use crate::util::{Vec3D, helpers::GEOM_EPS};
use itertools::Itertools;
use std::collections::HashMap;

/// In-process fleet of point-mass vessels with bounding spheres.
#[derive(Debug, Default)]
pub struct SimFleet {
    vessels: HashMap<VesselId, VesselState>,
    /// Vessels running their own CPS, mapped to whether it is currently engaged.
    peers: HashMap<VesselId, bool>,
}

impl SimFleet {
    pub fn new() -> Self { Self::default() }

    /// Adds or replaces a vessel.
    pub fn insert(&mut self, state: VesselState) { self.vessels.insert(state.id, state); }

    /// Removes a vessel, e.g. to emulate a despawn in the middle of a scan.
    pub fn remove(&mut self, id: VesselId) -> Option<VesselState> {
        self.peers.remove(&id);
        self.vessels.remove(&id)
    }

    pub fn get_mut(&mut self, id: VesselId) -> Option<&mut VesselState> { self.vessels.get_mut(&id) }

    /// Marks a vessel as running a cooperating CPS.
    pub fn set_peer(&mut self, id: VesselId, cps_active: bool) { self.peers.insert(id, cps_active); }

    pub fn len(&self) -> usize { self.vessels.len() }

    pub fn is_empty(&self) -> bool { self.vessels.is_empty() }

    /// Integrates all airborne vessels over `dt` seconds with constant acceleration.
    pub fn advance(&mut self, dt: f64) {
        for v in self.vessels.values_mut().filter(|v| !v.landed_or_splashed && !v.packed) {
            v.position += v.surface_velocity * dt + v.acceleration * (dt * dt / 2.0);
            v.surface_velocity += v.acceleration * dt;
            v.surface_speed = v.surface_velocity.abs();
            v.rel_vertical_speed = v.surface_velocity.dot(v.up);
            v.rel_altitude += v.rel_vertical_speed * dt;
        }
    }

    /// Distance along the ray to where a sphere of `radius` first touches `target`.
    fn sweep_hit(target: &VesselState, origin: Vec3D<f64>, radius: f64, dir: Vec3D<f64>) -> Option<f64> {
        let reach = target.radius + radius;
        let oc = target.position.to(&origin);
        let b = oc.dot(dir);
        let c = oc.sqr_abs() - reach * reach;
        if c <= 0.0 {
            // the sweep starts inside this body
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

impl Fleet for SimFleet {
    fn roster(&self) -> Vec<VesselId> { self.vessels.keys().copied().sorted().collect() }

    fn vessel(&self, id: VesselId) -> Option<&VesselState> { self.vessels.get(&id) }

    fn peer(&self, id: VesselId) -> Option<PeerStatus> {
        let cps_active = *self.peers.get(&id)?;
        let v = self.vessels.get(&id)?;
        Some(PeerStatus { radius: v.radius, exhaust: v.exhaust, ref_transform: v.frame(), cps_active })
    }

    fn sphere_cast(&self, origin: Vec3D<f64>, radius: f64, dir: Vec3D<f64>, max_dist: f64) -> Option<Vec3D<f64>> {
        let dir = dir.normalize();
        if dir.abs() < GEOM_EPS {
            return None;
        }
        self.vessels
            .values()
            .filter_map(|v| Self::sweep_hit(v, origin, radius, dir).map(|t| (t, v)))
            .filter(|(t, _)| *t <= max_dist)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, v)| {
                let swept = origin + dir * t;
                v.position + v.position.to(&swept).normalize() * v.radius
            })
    }
}

#[cfg(test)]
mod tests {
    use super::SimFleet;
    use crate::cps::{Fleet, VesselId, VesselState};
    use crate::util::Vec3D;

    fn body(id: u64, x: f64, radius: f64) -> VesselState {
        VesselState { id: VesselId(id), position: Vec3D::new(x, 0.0, 0.0), radius, ..VesselState::default() }
    }

    #[test]
    fn test_sphere_cast_hits_surface_of_nearest() {
        let mut fleet = SimFleet::new();
        fleet.insert(body(1, 0.0, 1.0));
        fleet.insert(body(2, 20.0, 3.0));
        fleet.insert(body(3, 50.0, 3.0));
        let hit = fleet.sphere_cast(Vec3D::new(1.1, 0.0, 0.0), 1.0, Vec3D::unit_x(), 60.0).unwrap();
        assert!((hit.x() - 17.0).abs() < 1e-9);
        assert!((hit.euclid_distance(&Vec3D::new(20.0, 0.0, 0.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_cast_respects_max_dist() {
        let mut fleet = SimFleet::new();
        fleet.insert(body(2, 20.0, 1.0));
        assert!(fleet.sphere_cast(Vec3D::zero(), 1.0, Vec3D::unit_x(), 10.0).is_none());
    }

    #[test]
    fn test_roster_is_sorted_and_peers_follow_removal() {
        let mut fleet = SimFleet::new();
        for id in [5, 1, 3] {
            fleet.insert(body(id, 0.0, 1.0));
        }
        fleet.set_peer(VesselId(3), true);
        assert_eq!(fleet.roster(), vec![VesselId(1), VesselId(3), VesselId(5)]);
        assert!(fleet.peer(VesselId(3)).is_some_and(|p| p.cps_active));
        fleet.remove(VesselId(3));
        assert!(fleet.peer(VesselId(3)).is_none());
        assert_eq!(fleet.len(), 2);
    }

    #[test]
    fn test_advance_integrates_velocity() {
        let mut fleet = SimFleet::new();
        let mut v = body(1, 0.0, 1.0);
        v.surface_velocity = Vec3D::new(2.0, 0.0, 0.0);
        fleet.insert(v);
        fleet.advance(0.5);
        let v = fleet.vessel(VesselId(1)).unwrap();
        assert!((v.position.x() - 1.0).abs() < 1e-12);
        assert!((v.surface_speed - 2.0).abs() < 1e-12);
    }
}
