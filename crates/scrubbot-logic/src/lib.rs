//! Pure cleaning-session logic for ScrubBot.
//!
//! This crate contains the rules of a session independent of any ECS,
//! engine, or renderer. Types hold plain data and every transition is a
//! method call with an explicit tick, so everything here is unit-testable
//! and deterministic.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`accumulator`] | Cleaned pixels → capacity units and score deltas |
//! | [`canvas`] | Contamination grid and circular brush strokes |
//! | [`condition`] | Broken / slowed / dashing / emptying / scanning flags |
//! | [`config`] | Session configuration, JSON loading, validation |
//! | [`health`] | Damage, repair, HUD health band |
//! | [`ledger`] | Bounded bag capacity |
//! | [`movement`] | Speed resolution, camera-relative steering, floor bounds |
//! | [`objectives`] | Score ledger and win condition |
//! | [`timers`] | Tick timer queue with sequence-number supersession |

pub mod accumulator;
pub mod canvas;
pub mod condition;
pub mod config;
pub mod health;
pub mod ledger;
pub mod movement;
pub mod objectives;
pub mod timers;
