use super::{
    filter::LowPassFilterV,
    scanner::{ScanProgress, VesselScanner},
    timer::{ManeuverTimer, secs_to_delta},
    vessel::{ControlFlags, Fleet, FlightDemand, VesselId, VesselState},
};
use crate::config::CpsConfig;
use crate::util::Vec3D;
use crate::{event, info, log};
use chrono::TimeDelta;
use std::collections::HashSet;
use std::sync::Arc;
use strum_macros::Display;

/// What a single [`CollisionPreventionSystem::update`] did.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The system is switched off for this vessel.
    Inactive,
    /// Active, but no correction is held.
    Clear,
    /// No correction for a full maneuver timer period: everything was reset.
    FullStop,
    /// A smoothed correction was written to the flight demand.
    Correcting,
}

/// Per-vessel collision prevention controller.
///
/// Drives the [`VesselScanner`] one step per tick, sums the corrections of each
/// completed scan cycle, smooths the held correction every tick and splits it into a
/// vertical setpoint adjustment and a horizontal course correction.
#[derive(Debug)]
pub struct CollisionPreventionSystem {
    cfg: Arc<CpsConfig>,
    scanner: VesselScanner,
    filter: LowPassFilterV,
    maneuver_timer: ManeuverTimer,
    /// Sum of the last non-zero scan result, held until the maneuver timer elapses.
    correction: Vec3D<f64>,
    /// Simulation time accumulated from the tick deltas.
    clock: TimeDelta,
    active: bool,
}

impl CollisionPreventionSystem {
    pub fn new(cfg: Arc<CpsConfig>) -> Self {
        Self {
            scanner: VesselScanner::new(Arc::clone(&cfg)),
            filter: LowPassFilterV::new(cfg.low_pass_f),
            maneuver_timer: ManeuverTimer::new(secs_to_delta(cfg.maneuver_timer)),
            correction: Vec3D::zero(),
            clock: TimeDelta::zero(),
            active: false,
            cfg,
        }
    }

    /// Runs one control tick.
    ///
    /// # Arguments
    /// - `own`: Current state of the controlled vessel.
    /// - `fleet`: The host's fleet view.
    /// - `flags`: Host toggles for horizontal flight and altitude hold.
    /// - `demand`: Downstream channels receiving the corrections.
    /// - `dt`: Simulation time elapsed since the previous tick.
    ///
    /// # Returns
    /// - A [`TickOutcome`] describing what was done.
    pub fn update<F: Fleet>(
        &mut self,
        own: &VesselState,
        fleet: &F,
        flags: ControlFlags,
        demand: &mut FlightDemand,
        dt: TimeDelta,
    ) -> TickOutcome {
        self.clock += dt;
        if !self.update_state(own, flags) {
            return TickOutcome::Inactive;
        }
        if self.scanner.step(own, fleet) == ScanProgress::Done {
            let correction: Vec3D<f64> = self.scanner.corrections().iter().sum();
            if correction.is_zero() {
                if self.maneuver_timer.check(self.clock) {
                    self.full_stop();
                    return TickOutcome::FullStop;
                }
            } else {
                self.maneuver_timer.reset();
                self.correction = correction;
            }
        }
        if self.correction.is_zero() {
            return TickOutcome::Clear;
        }
        let filtered = self.filter.update(self.correction.clamp_components(0.0, self.cfg.max_avoidance_speed));
        if flags.altitude_control {
            self.correct_vertical_speed(own, filtered, demand);
        }
        demand.add_course_correction(filtered.exclude(own.up));
        event!("{} correcting course by {filtered}", own.id);
        TickOutcome::Correcting
    }

    /// Re-evaluates whether the system may run for `own` this tick.
    ///
    /// Deactivation drops the held correction and abandons the scan in progress.
    fn update_state(&mut self, own: &VesselState, flags: ControlFlags) -> bool {
        let active =
            flags.horizontal_flight && own.on_planet && !own.landed_or_splashed && own.ref_transform.is_some();
        if active != self.active {
            info!("Collision prevention for {} {}", own.id, if active { "engaged" } else { "disengaged" });
        }
        self.active = active;
        if !active {
            self.correction = Vec3D::zero();
            self.scanner.abandon();
        }
        active
    }

    /// Applies the vertical part of the correction to the vertical speed setpoint.
    ///
    /// Climbing is always allowed; descending only if the vessel would still clear the
    /// terrain after the look-ahead time.
    fn correct_vertical_speed(&self, own: &VesselState, filtered: Vec3D<f64>, demand: &mut FlightDemand) {
        let d_vsp = filtered.dot(own.up);
        let floor_margin = own.rel_altitude - own.height + (d_vsp + own.rel_vertical_speed) * self.cfg.look_ahead_time;
        if d_vsp > 0.0 || floor_margin > 0.0 {
            demand.adjust_vertical_cutoff(d_vsp);
        } else {
            event!("{} descent by {d_vsp:.2} m/s suppressed, floor margin {floor_margin:.2} m", own.id);
        }
    }

    fn full_stop(&mut self) {
        log!("No collision threats for {}s, resetting avoidance", self.cfg.maneuver_timer);
        self.scanner.clear_dangerous();
        self.correction = Vec3D::zero();
        self.filter.reset();
    }

    pub fn is_active(&self) -> bool { self.active }

    /// The smoothed correction applied during the last tick.
    pub fn filtered_correction(&self) -> Vec3D<f64> { self.filter.value() }

    /// The unfiltered correction currently held.
    pub fn held_correction(&self) -> Vec3D<f64> { self.correction }

    pub fn dangerous(&self) -> &HashSet<VesselId> { self.scanner.dangerous() }

    pub fn scan_in_progress(&self) -> bool { self.scanner.is_scanning() }

    pub fn scanner(&self) -> &VesselScanner { &self.scanner }

    pub fn config(&self) -> &CpsConfig { &self.cfg }
}
