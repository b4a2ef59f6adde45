pub mod avoidance;
mod filter;
mod scanner;
mod system;
mod timer;
mod vessel;

pub use filter::LowPassFilterV;
pub use scanner::{ScanProgress, VesselScanner};
pub use system::{CollisionPreventionSystem, TickOutcome};
pub use timer::{ManeuverTimer, secs_to_delta};
pub use vessel::{ControlFlags, Fleet, FlightDemand, PeerStatus, VesselId, VesselState};
