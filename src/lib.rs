#![allow(clippy::similar_names, clippy::module_name_repetitions)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
//! Collision prevention for autopilot-driven vessels.
//!
//! Each vessel runs a [`cps::CollisionPreventionSystem`] that scans the loaded fleet a
//! little every physics tick, predicts closing courses analytically and feeds a smoothed
//! evasive correction into the vertical speed setpoint and the horizontal course
//! corrections of the flight controller.

pub mod config;
pub mod cps;
pub mod sim;
pub mod util;
