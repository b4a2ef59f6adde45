use std::sync::Arc;
use tca_cps::config::CpsConfig;
use tca_cps::cps::{CollisionPreventionSystem, ControlFlags, Fleet, FlightDemand, TickOutcome, VesselId, VesselState};
use tca_cps::sim::SimFleet;
use tca_cps::util::{Transform, Vec3D};
use tca_cps::{error, info, warn};

const DT_SECS: f64 = 0.02;
const SIM_SECS: f64 = 30.0;
const REPORT_EVERY: usize = 50;

fn vessel(id: u64, position: Vec3D<f64>, velocity: Vec3D<f64>, mass: f64) -> VesselState {
    VesselState {
        id: VesselId(id),
        position,
        surface_velocity: velocity,
        surface_speed: velocity.abs(),
        ref_transform: Some(Transform::translation(position)),
        needed_hor_velocity: velocity,
        radius: 4.0,
        mass,
        rel_altitude: position.y(),
        ..VesselState::default()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn main() {
    let cfg = match CpsConfig::default().init() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Invalid collision prevention config: {e}");
            std::process::exit(1);
        }
    };
    let mut fleet = SimFleet::new();
    fleet.insert(vessel(1, Vec3D::new(0.0, 120.0, 0.0), Vec3D::new(20.0, 0.0, 0.0), 12.0));
    fleet.insert(vessel(2, Vec3D::new(400.0, 120.0, -3.0), Vec3D::new(-20.0, 0.0, 0.0), 8.0));
    let ids = fleet.roster();
    let mut controllers: Vec<(VesselId, CollisionPreventionSystem, FlightDemand)> = ids
        .iter()
        .map(|id| {
            fleet.set_peer(*id, false);
            (*id, CollisionPreventionSystem::new(Arc::clone(&cfg)), FlightDemand::default())
        })
        .collect();

    let dt = tca_cps::cps::secs_to_delta(DT_SECS);
    let steps = (SIM_SECS / DT_SECS) as usize;
    let mut min_separation = f64::MAX;
    for step in 0..steps {
        for (id, cps, demand) in &mut controllers {
            let Some(own) = fleet.vessel(*id).cloned() else { continue };
            let outcome = cps.update(&own, &fleet, ControlFlags::default(), demand, dt);
            let correction = demand.total_course_correction();
            demand.clear_course_corrections();
            fleet.set_peer(*id, cps.is_active());
            if outcome == TickOutcome::Correcting {
                if let Some(v) = fleet.get_mut(*id) {
                    v.surface_velocity += correction * DT_SECS;
                }
            }
        }
        fleet.advance(DT_SECS);
        if let (Some(a), Some(b)) = (fleet.vessel(ids[0]), fleet.vessel(ids[1])) {
            min_separation = min_separation.min(a.position.euclid_distance(&b.position));
        }
        if step % REPORT_EVERY == 0 {
            for (id, cps, demand) in &controllers {
                info!(
                    "t={:5.2}s {id}: dangerous={} filtered={} vertical_cutoff={:.2}",
                    step as f64 * DT_SECS,
                    cps.dangerous().len(),
                    cps.filtered_correction(),
                    demand.vertical_cutoff
                );
            }
        }
    }
    let hulls: f64 = ids.iter().filter_map(|id| fleet.vessel(*id)).map(|v| v.radius).sum();
    if min_separation < hulls {
        warn!("Hulls touched: minimum separation {min_separation:.2} m below {hulls:.2} m");
    }
    info!("Encounter finished, minimum separation {min_separation:.2} m");
}
