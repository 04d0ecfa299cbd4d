//! ScrubBot Headless Session Harness
//!
//! Validates the cleaning logic and full sessions in-process: no renderer,
//! no physics engine, no input devices.
//!
//! Usage:
//!   cargo run -p scrubbot-simtest
//!   cargo run -p scrubbot-simtest -- --verbose
//!   cargo run -p scrubbot-simtest -- --config session.json

mod logging;

use scrubbot_core::prelude::*;
use scrubbot_logic::accumulator::Accumulator;
use scrubbot_logic::canvas::{Brush, StainCanvas};
use scrubbot_logic::config::SessionConfig;
use scrubbot_logic::ledger::CapacityLedger;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    logging::init(verbose);

    let config = match config_path(&args) {
        Some(path) => match SessionConfig::from_json_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to load {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => SessionConfig::default(),
    };
    println!("=== ScrubBot Session Harness ===\n");

    let mut results = Vec::new();

    // 1. Canvas and brush
    results.extend(validate_canvas(verbose));

    // 2. Pixel accumulation
    results.extend(validate_accumulator(verbose));

    // 3. Capacity ledger
    results.extend(validate_ledger(verbose));

    // 4. Breakdown on repeated collisions
    results.extend(validate_breakdown(&config, verbose));

    // 5. Disposal protocol
    results.extend(validate_disposal(&config, verbose));

    // 6. Dash cooldown
    results.extend(validate_dash(&config, verbose));

    // 7. Scripted playthrough to a win
    results.extend(validate_playthrough(&config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn config_path(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn new_engine(config: &SessionConfig) -> Result<SessionEngine, TestResult> {
    SessionEngine::new(config.clone()).map_err(|e| TestResult {
        name: "engine_new".into(),
        passed: false,
        detail: format!("session rejected config: {}", e),
    })
}

fn press(f: impl FnOnce(&mut TickInput)) -> TickInput {
    let mut input = TickInput::default();
    f(&mut input);
    input
}

// ── 1. Canvas ───────────────────────────────────────────────────────────

fn validate_canvas(verbose: bool) -> Vec<TestResult> {
    println!("--- Canvas ---");
    let mut results = Vec::new();

    let brush = Brush::circular(15);
    let mut canvas = match StainCanvas::new(512, None) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "canvas_new".into(),
                passed: false,
                detail: format!("{}", e),
            });
            return results;
        }
    };

    // Centre strike covers the whole brush
    let first = canvas.clear_at(&brush, 0.5, 0.5);
    results.push(TestResult {
        name: "canvas_centre_strike".into(),
        passed: first == 709 && first as usize == brush.area(),
        detail: format!("{} cells cleaned, brush area {}", first, brush.area()),
    });

    // Same spot again cleans nothing
    let again = canvas.clear_at(&brush, 0.5, 0.5);
    results.push(TestResult {
        name: "canvas_repeat_is_noop".into(),
        passed: again == 0 && canvas.revision() == 1,
        detail: format!("{} cells, revision {}", again, canvas.revision()),
    });

    // Corner strike is clipped, never wraps
    let corner = canvas.clear_at(&brush, 0.0, 0.0);
    results.push(TestResult {
        name: "canvas_corner_clipped".into(),
        passed: corner > 0 && (corner as usize) < brush.area(),
        detail: format!("{} of {} offsets in bounds", corner, brush.area()),
    });

    // Garbage coordinates are skipped
    let nan = canvas.clear_at(&brush, f32::NAN, 0.5);
    results.push(TestResult {
        name: "canvas_nan_skipped".into(),
        passed: nan == 0,
        detail: format!("{} cells", nan),
    });

    if verbose {
        println!(
            "  cleaned fraction after strikes: {:.4}",
            canvas.cleaned_fraction()
        );
    }
    results
}

// ── 2. Accumulator ──────────────────────────────────────────────────────

fn validate_accumulator(verbose: bool) -> Vec<TestResult> {
    println!("--- Accumulator ---");
    let mut results = Vec::new();

    let strokes = [120u32, 80, 300, 999, 1, 450];
    let sum: u32 = strokes.iter().sum();
    let mut acc = Accumulator::new(500.0);
    let units: u32 = strokes.iter().map(|&s| acc.fold(s).units).sum();

    results.push(TestResult {
        name: "accumulator_units".into(),
        passed: units == sum / 500,
        detail: format!("{} pixels → {} units", sum, units),
    });
    results.push(TestResult {
        name: "accumulator_carry".into(),
        passed: acc.carry() == (sum % 500) as f64,
        detail: format!("carry {}", acc.carry()),
    });

    let mut exact = Accumulator::new(500.0);
    let first = exact.fold(500);
    results.push(TestResult {
        name: "accumulator_exact_threshold".into(),
        passed: first.units == 1 && exact.carry() == 0.0 && first.score_delta == 50,
        detail: format!("{:?}, carry {}", first, exact.carry()),
    });

    if verbose {
        println!("  strokes {:?}", strokes);
    }
    results
}

// ── 3. Ledger ───────────────────────────────────────────────────────────

fn validate_ledger(_verbose: bool) -> Vec<TestResult> {
    println!("--- Ledger ---");
    let mut ledger = CapacityLedger::new(10);
    let stored = (0..25).filter(|_| ledger.try_add_unit()).count();
    let bulk = ledger.add_units(5);

    vec![TestResult {
        name: "ledger_bounded".into(),
        passed: stored == 10 && bulk == 0 && ledger.current() == 10 && ledger.is_full(),
        detail: format!("{} of 25 stored, bulk add took {}", stored, bulk),
    }]
}

// ── 4. Breakdown ────────────────────────────────────────────────────────

fn validate_breakdown(config: &SessionConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Breakdown ---");
    let mut results = Vec::new();
    let mut engine = match new_engine(config) {
        Ok(e) => e,
        Err(r) => return vec![r],
    };
    let limit = config.conditions.hit_limit as usize;

    engine.extend_events(vec![SessionEvent::ObstacleHit; limit]);
    engine.update(&TickInput::default());
    let flags = engine.flags().unwrap_or_default();
    results.push(TestResult {
        name: "breakdown_after_hit_limit".into(),
        passed: flags.broken && flags.hits == 0,
        detail: format!("broken={} hits={}", flags.broken, flags.hits),
    });

    engine.extend_events(vec![SessionEvent::ObstacleHit; 5]);
    engine.update(&TickInput::default());
    let after = engine.flags().unwrap_or_default();
    results.push(TestResult {
        name: "breakdown_ignores_hits".into(),
        passed: after.hits == 0 && after.total_hits == flags.total_hits,
        detail: format!("total hits {}", after.total_hits),
    });

    engine.idle(config.ticks(config.conditions.broken_secs));
    let repaired = engine.flags().unwrap_or_default();
    results.push(TestResult {
        name: "breakdown_repairs".into(),
        passed: !repaired.broken,
        detail: format!("broken={} at tick {}", repaired.broken, engine.tick()),
    });

    if verbose {
        println!("  notifications: {:?}", engine.drain_notifications());
    }
    results
}

// ── 5. Disposal ─────────────────────────────────────────────────────────

fn validate_disposal(config: &SessionConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Disposal ---");
    let mut results = Vec::new();
    let mut engine = match new_engine(config) {
        Ok(e) => e,
        Err(r) => return vec![r],
    };

    // Outside the zone: refused, nothing changes
    let agent = engine.agent();
    if let Ok(mut ledger) = engine.world.get::<&mut CapacityLedger>(agent) {
        ledger.reset();
        ledger.add_units(7);
    }
    engine.update(&press(|i| i.dispose = true));
    let refused = engine
        .drain_notifications()
        .contains(&Notification::EmptyRefused);
    results.push(TestResult {
        name: "disposal_needs_zone".into(),
        passed: refused && !engine.flags().unwrap_or_default().emptying,
        detail: format!("refused={}", refused),
    });

    engine.push_event(SessionEvent::ZoneEnter);
    engine.update(&press(|i| i.dispose = true));
    let units_before = engine.ledger().map(|l| l.current()).unwrap_or(0);
    engine.idle(config.ticks(config.conditions.empty_secs));
    let ledger = engine.ledger().map(|l| l.current()).unwrap_or(u32::MAX);
    let emptying = engine.flags().unwrap_or_default().emptying;
    results.push(TestResult {
        name: "disposal_resets_ledger".into(),
        passed: units_before >= 7 && ledger == 0 && !emptying,
        detail: format!("{} units → {}, emptying={}", units_before, ledger, emptying),
    });

    let deposits = engine
        .drain_notifications()
        .iter()
        .filter(|n| **n == Notification::DepositSpawned)
        .count();
    results.push(TestResult {
        name: "disposal_spawns_deposit".into(),
        passed: deposits == 1,
        detail: format!("{} deposits", deposits),
    });

    // Empty bag in the zone: refused
    engine.update(&press(|i| i.dispose = true));
    let refused = engine
        .drain_notifications()
        .contains(&Notification::EmptyRefused);
    results.push(TestResult {
        name: "disposal_refuses_empty_bag".into(),
        passed: refused,
        detail: format!("refused={}", refused),
    });

    if verbose {
        println!("  finished at tick {}", engine.tick());
    }
    results
}

// ── 6. Dash ─────────────────────────────────────────────────────────────

fn validate_dash(config: &SessionConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Dash ---");
    let mut results = Vec::new();
    let mut engine = match new_engine(config) {
        Ok(e) => e,
        Err(r) => return vec![r],
    };
    let window =
        config.ticks(config.conditions.dash_secs) + config.ticks(config.conditions.dash_cooldown_secs);
    let dash = press(|i| i.dash = true);

    engine.update(&dash);
    engine.drain_notifications();
    let start = engine.tick();
    let mut accepted_early = 0;
    while engine.tick() < start + window - 1 {
        engine.update(&dash);
        accepted_early += engine
            .drain_notifications()
            .iter()
            .filter(|n| **n == Notification::DashStarted)
            .count();
    }
    results.push(TestResult {
        name: "dash_rejected_during_cooldown".into(),
        passed: accepted_early == 0,
        detail: format!("{} dashes accepted inside {} ticks", accepted_early, window),
    });

    engine.update(&dash);
    let ready = engine
        .drain_notifications()
        .contains(&Notification::DashStarted);
    results.push(TestResult {
        name: "dash_ready_after_cooldown".into(),
        passed: ready,
        detail: format!("dash accepted at tick {}", engine.tick()),
    });

    if verbose {
        println!("  window {} ticks", window);
    }
    results
}

// ── 7. Playthrough ──────────────────────────────────────────────────────

const MAX_TICKS_PER_TARGET: u64 = 3600;

fn validate_playthrough(config: &SessionConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Playthrough ---");
    let mut results = Vec::new();

    let mut cfg = config.clone();
    cfg.objectives.dust_required = cfg.scatter.count;
    cfg.objectives.require_weapon = true;
    let mut engine = match new_engine(&cfg) {
        Ok(e) => e,
        Err(r) => return vec![r],
    };

    let scattered = engine.scatter_dust();
    let knife = Evidence::new("Kitchen Knife", 500, 1).knife();
    let knife_entity = engine.spawn_evidence(knife.clone(), Vec2::new(3.0, -4.0));

    let mut targets: Vec<(hecs::Entity, Vec2, bool)> = engine
        .world
        .query::<(&Position, &Dust)>()
        .iter()
        .map(|(e, (p, _))| (e, p.0, false))
        .collect();
    targets.push((knife_entity, Vec2::new(3.0, -4.0), true));

    let mut collected = 0;
    let mut cleaned_total: u64 = 0;
    for (entity, at, is_evidence) in targets {
        let (reached, cleaned) = drive_to(&mut engine, at);
        cleaned_total += cleaned;
        if !reached {
            log::warn!("could not reach {:?} at {:?}", entity, at);
            continue;
        }
        if engine.ledger().map(|l| l.is_full()).unwrap_or(false) {
            empty_bag(&mut engine, &cfg);
        }
        let event = if is_evidence {
            SessionEvent::EvidencePickup {
                evidence: knife.clone(),
                entity: Some(entity),
            }
        } else {
            SessionEvent::DustPickup {
                entity: Some(entity),
            }
        };
        engine.push_event(event);
        engine.update(&TickInput::default());
        if !engine.world.contains(entity) {
            collected += 1;
        }
    }

    results.push(TestResult {
        name: "playthrough_collects_everything".into(),
        passed: collected == scattered + 1,
        detail: format!("{} of {} pickups", collected, scattered + 1),
    });
    results.push(TestResult {
        name: "playthrough_cleans_while_driving".into(),
        passed: cleaned_total > 0,
        detail: format!("{} cells cleaned", cleaned_total),
    });

    empty_bag(&mut engine, &cfg);
    let hud = engine.hud();
    results.push(TestResult {
        name: "playthrough_wins".into(),
        passed: engine.outcome() == Some(SessionOutcome::Won),
        detail: format!(
            "outcome {:?} at tick {}, score {}",
            engine.outcome(),
            engine.tick(),
            engine.score()
        ),
    });

    let tick = engine.tick();
    engine.update(&TickInput::default());
    results.push(TestResult {
        name: "playthrough_frozen_after_win".into(),
        passed: engine.tick() == tick,
        detail: format!("tick {} → {}", tick, engine.tick()),
    });

    if verbose {
        match hud.map_err(|e| e.to_string()).and_then(|h| {
            serde_json::to_string_pretty(&h).map_err(|e| e.to_string())
        }) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("  HUD unavailable: {}", e),
        }
    }
    results
}

/// Steer straight at `target` until touching it. Returns whether it was
/// reached and how many cells were cleaned on the way.
fn drive_to(engine: &mut SessionEngine, target: Vec2) -> (bool, u64) {
    let reach = 1.0;
    let mut cleaned = 0u64;
    for _ in 0..MAX_TICKS_PER_TARGET {
        let Some(pos) = engine.agent_position() else {
            return (false, cleaned);
        };
        if pos.distance(&target) <= reach {
            return (true, cleaned);
        }
        let input = press(|i| {
            i.movement = MoveInput {
                x: target.x - pos.x,
                z: target.z - pos.z,
                yaw: 0.0,
            }
        });
        cleaned += engine.update(&input).cleaned as u64;
    }
    (false, cleaned)
}

/// Pretend the disposal zone is underfoot and wait for the bag to empty.
fn empty_bag(engine: &mut SessionEngine, config: &SessionConfig) {
    engine.push_event(SessionEvent::ZoneEnter);
    engine.update(&press(|i| i.dispose = true));
    engine.idle(config.ticks(config.conditions.empty_secs));
    engine.push_event(SessionEvent::ZoneExit);
    log::debug!("bag emptied at tick {}", engine.tick());
}
