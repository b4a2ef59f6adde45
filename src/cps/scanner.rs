use super::{
    avoidance::{ObstacleGeometry, SeparationThreshold, avoid_vessel, defers_to_peer},
    vessel::{Fleet, VesselId, VesselState},
};
use crate::config::CpsConfig;
use crate::event;
use crate::util::{Vec3D, helpers::GEOM_EPS};
use std::collections::HashSet;
use std::sync::Arc;
use strum_macros::Display;

/// Gap kept between the own hull and the start of the radar sweep.
const RADAR_CLEARANCE: f64 = 0.1;

/// Result of a single [`VesselScanner::step`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ScanProgress {
    /// The cycle evaluated a candidate and will continue on the next step.
    Scanning,
    /// The cycle ran past the last candidate and published its corrections.
    Done,
}

/// One pass over the fleet, possibly spanning many ticks.
#[derive(Debug)]
struct ScanCycle {
    /// Fleet snapshot taken when the cycle started.
    roster: Vec<VesselId>,
    cursor: usize,
    corrections: Vec<Vec3D<f64>>,
    evaluated: Vec<VesselId>,
}

impl ScanCycle {
    fn start(roster: Vec<VesselId>) -> Self {
        Self { roster, cursor: 0, corrections: Vec::new(), evaluated: Vec::new() }
    }

    fn next_id(&mut self) -> Option<VesselId> {
        let id = self.roster.get(self.cursor).copied();
        self.cursor += 1;
        id
    }
}

#[derive(Debug)]
enum ScanState {
    Idle,
    Scanning(ScanCycle),
}

/// Cooperative scanner spreading the fleet evaluation over many ticks.
///
/// Every call to [`VesselScanner::step`] evaluates at most one candidate vessel, so the
/// per-tick cost stays bounded no matter how many vessels are loaded. Invalid entries
/// (the own vessel, packed or unloaded vessels, vessels that vanished since the cycle
/// started) are skipped without counting as a step. Once the cycle runs past the last
/// entry the collected corrections replace the previously published ones.
///
/// The scanner also owns the set of vessels currently judged dangerous. Membership is
/// updated on every evaluation and escalates the separation margin for that vessel.
#[derive(Debug)]
pub struct VesselScanner {
    cfg: Arc<CpsConfig>,
    state: ScanState,
    dangerous: HashSet<VesselId>,
    corrections: Vec<Vec3D<f64>>,
    last_evaluated: Vec<VesselId>,
}

impl VesselScanner {
    pub fn new(cfg: Arc<CpsConfig>) -> Self {
        Self {
            cfg,
            state: ScanState::Idle,
            dangerous: HashSet::new(),
            corrections: Vec::new(),
            last_evaluated: Vec::new(),
        }
    }

    /// Advances the current scan cycle by one candidate, starting a new cycle if idle.
    ///
    /// # Arguments
    /// - `own`: State of the vessel running this scanner.
    /// - `fleet`: The host's fleet view.
    ///
    /// # Returns
    /// - [`ScanProgress::Done`] if the cycle completed during this step. The results are
    ///   then available through [`VesselScanner::corrections`].
    /// - [`ScanProgress::Scanning`] otherwise.
    pub fn step<F: Fleet>(&mut self, own: &VesselState, fleet: &F) -> ScanProgress {
        let mut cycle = match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::Idle => ScanCycle::start(fleet.roster()),
            ScanState::Scanning(cycle) => cycle,
        };
        while let Some(id) = cycle.next_id() {
            if id == own.id {
                continue;
            }
            let Some(other) = fleet.vessel(id) else { continue };
            if !other.is_scannable() {
                continue;
            }
            cycle.evaluated.push(id);
            if let Some(maneuver) = self.compute_maneuver(own, other, fleet) {
                cycle.corrections.push(maneuver);
            }
            self.state = ScanState::Scanning(cycle);
            return ScanProgress::Scanning;
        }
        self.finish(cycle, fleet);
        ScanProgress::Done
    }

    fn finish<F: Fleet>(&mut self, cycle: ScanCycle, fleet: &F) {
        self.dangerous.retain(|id| fleet.vessel(*id).is_some());
        event!(
            "Scan cycle over {} vessels done: {} corrections, {} dangerous",
            cycle.evaluated.len(),
            cycle.corrections.len(),
            self.dangerous.len()
        );
        self.corrections = cycle.corrections;
        self.last_evaluated = cycle.evaluated;
    }

    /// Evaluates a single foreign vessel and updates its dangerous-set membership.
    fn compute_maneuver<F: Fleet>(&mut self, own: &VesselState, other: &VesselState, fleet: &F) -> Option<Vec3D<f64>> {
        let offset = own.position.to(&other.position);
        let dist = offset.abs();
        if dist < GEOM_EPS {
            return None;
        }
        let dir = offset / dist;
        let obstacle = match fleet.peer(other.id) {
            Some(peer) => {
                if defers_to_peer(own, other, &peer) {
                    event!("{} yields to {}: peer is lighter and slower", own.id, other.id);
                    return None;
                }
                ObstacleGeometry::from(&peer)
            }
            None => ObstacleGeometry {
                radius: Self::radar_radius(own, other, dir, dist, fleet),
                exhaust: other.exhaust,
                ref_transform: other.frame(),
            },
        };
        let dv = own.surface_velocity - other.surface_velocity
            + (own.acceleration - other.acceleration) * self.cfg.look_ahead_time;
        let threshold = if other.landed_or_splashed {
            SeparationThreshold::Landed
        } else if self.dangerous.contains(&other.id) {
            SeparationThreshold::Fixed(self.cfg.safe_distance)
        } else {
            SeparationThreshold::Auto
        };
        let maneuver = avoid_vessel(&self.cfg, own, dir, dist, dv, &obstacle, threshold);
        if maneuver.is_some() {
            if self.dangerous.insert(other.id) {
                event!("{} is on a collision course with {} at {dist:.1} m", own.id, other.id);
            }
        } else if self.dangerous.remove(&other.id) {
            event!("{} cleared {}", own.id, other.id);
        }
        maneuver
    }

    /// Estimates the radius of a vessel that does not publish its geometry by sweeping
    /// a sphere of the own radius towards it. Zero if nothing is hit.
    fn radar_radius<F: Fleet>(own: &VesselState, other: &VesselState, dir: Vec3D<f64>, dist: f64, fleet: &F) -> f64 {
        let origin = own.position + dir * (own.radius + RADAR_CLEARANCE);
        fleet
            .sphere_cast(origin, own.radius, dir, dist)
            .map_or(0.0, |hit| hit.euclid_distance(&other.position))
    }

    /// Drops the cycle in progress; the next step starts a fresh one.
    pub fn abandon(&mut self) {
        if matches!(self.state, ScanState::Scanning(_)) {
            event!("Scan cycle abandoned");
        }
        self.state = ScanState::Idle;
    }

    pub fn clear_dangerous(&mut self) { self.dangerous.clear(); }

    /// Corrections published by the last completed cycle.
    pub fn corrections(&self) -> &[Vec3D<f64>] { &self.corrections }

    pub fn dangerous(&self) -> &HashSet<VesselId> { &self.dangerous }

    pub fn is_dangerous(&self, id: VesselId) -> bool { self.dangerous.contains(&id) }

    /// Vessels evaluated by the last completed cycle, in evaluation order.
    pub fn last_evaluated(&self) -> &[VesselId] { &self.last_evaluated }

    pub fn is_scanning(&self) -> bool { matches!(self.state, ScanState::Scanning(_)) }
}
