//! Integration tests: the controller driven end-to-end through its ports
//! with a simulated rig and synthetic timestamps.

use coolantctl::adapters::sim::SimulatedRig;
use coolantctl::app::events::ControlEvent;
use coolantctl::app::ports::EventSink;
use coolantctl::app::service::CoolantService;
use coolantctl::config::SystemConfig;
use coolantctl::error::SafetyFault;
use coolantctl::fsm::context::SensorSnapshot;
use coolantctl::fsm::Mode;

/// Event sink that records everything it sees.
#[derive(Default)]
struct RecordingSink {
    events: Vec<ControlEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}

impl RecordingSink {
    fn mode_changes(&self) -> Vec<(Mode, Mode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ControlEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn faults(&self) -> Vec<SafetyFault> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ControlEvent::FaultEscalated(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

fn snapshot(temperature_c: f64, coolant_level_ok: bool, ignition_on: bool) -> SensorSnapshot {
    SensorSnapshot {
        temperature_c,
        coolant_level_ok,
        ignition_on,
    }
}

/// Fresh started service plus rig and sink.
fn harness() -> (CoolantService, SimulatedRig, RecordingSink) {
    let mut service = CoolantService::new(SystemConfig::default());
    let mut sink = RecordingSink::default();
    service.start(&mut sink);
    (service, SimulatedRig::new(), sink)
}

/// Drive `secs` of simulated time at 10 Hz starting from `*now`.
fn run_for(
    service: &mut CoolantService,
    rig: &mut SimulatedRig,
    sink: &mut RecordingSink,
    now: &mut f64,
    secs: f64,
) {
    // Derive each timestamp from the tick index rather than accumulating
    // `+= 0.1`, so repeated calls don't drift below the nominal tick times.
    let start_tick = (*now * 10.0).round() as u64;
    let ticks = (secs * 10.0).round() as u64;
    for i in 1..=ticks {
        *now = (start_tick + i) as f64 * 0.1;
        service.tick(rig, sink, *now);
    }
}

#[test]
fn ignition_off_stays_off_with_all_outputs_off() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(25.0, true, false);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 1.0);

    assert_eq!(service.mode(), Mode::Off);
    let cmd = rig.last_applied().unwrap();
    assert!(!cmd.pump_on);
    assert!(!cmd.fan_on);
    assert_eq!(cmd.fan_speed_percent, 0);
}

#[test]
fn ignition_on_reaches_running_with_pump_on_after_prime() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(25.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);

    assert_eq!(service.mode(), Mode::Running);
    assert!(rig.last_applied().unwrap().pump_on);
    assert_eq!(
        sink.mode_changes(),
        vec![
            (Mode::Off, Mode::Initializing),
            (Mode::Initializing, Mode::Running)
        ]
    );
}

#[test]
fn temperature_ramp_past_critical_trips_emergency_on_first_exceeding_tick() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(60.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);
    assert_eq!(service.mode(), Mode::Running);

    // Ramp 60 -> 88 °C in 4 °C steps
    for temp in [64.0, 68.0, 72.0, 76.0, 80.0, 84.0, 88.0] {
        rig.set_temperature(temp);
        now += 0.1;
        service.tick(&mut rig, &mut sink, now);
        if temp <= 85.0 {
            assert_eq!(service.mode(), Mode::Running, "tripped early at {temp}°C");
        }
    }
    assert_eq!(service.mode(), Mode::EmergencyStop);
    assert_eq!(sink.faults(), vec![SafetyFault::CriticalTemperature]);

    let cmd = rig.last_applied().unwrap();
    assert!(!cmd.pump_on);
    assert!(cmd.fan_on);
    assert_eq!(cmd.fan_speed_percent, 100);
}

#[test]
fn low_coolant_shorter_than_grace_is_tolerated() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(65.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);
    assert_eq!(service.mode(), Mode::Running);

    rig.set_coolant_level(false);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.9);
    assert_eq!(service.mode(), Mode::Running, "grace period not exceeded");

    rig.set_coolant_level(true);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 1.0);
    assert_eq!(service.mode(), Mode::Running);
    assert!(sink.faults().is_empty());
}

#[test]
fn sustained_low_coolant_escalates_and_recovers() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(65.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);

    rig.set_coolant_level(false);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 3.5);
    assert_eq!(service.mode(), Mode::Error);
    assert_eq!(sink.faults(), vec![SafetyFault::LowCoolant]);
    let cmd = rig.last_applied().unwrap();
    assert!(!cmd.pump_on);
    assert!(!cmd.fan_on);

    // Refill with ignition still on: back through INITIALIZING to RUNNING
    rig.set_coolant_level(true);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);
    assert_eq!(service.mode(), Mode::Running);
}

#[test]
fn sustained_over_temperature_escalates_after_ten_seconds() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(65.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);

    rig.set_temperature(80.0); // above max, below critical
    run_for(&mut service, &mut rig, &mut sink, &mut now, 9.9);
    assert_eq!(service.mode(), Mode::Running, "still inside grace");

    run_for(&mut service, &mut rig, &mut sink, &mut now, 0.2);
    assert_eq!(service.mode(), Mode::Error);
    assert_eq!(sink.faults(), vec![SafetyFault::OverTemperature]);
}

#[test]
fn emergency_recovery_path_reaches_running_again() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(65.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);

    rig.set_temperature(90.0);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 0.5);
    assert_eq!(service.mode(), Mode::EmergencyStop);

    // Cool below max: EMERGENCY_STOP -> ERROR -> INITIALIZING -> RUNNING
    rig.set_temperature(70.0);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 3.0);
    assert_eq!(service.mode(), Mode::Running);

    let changes = sink.mode_changes();
    assert!(changes.contains(&(Mode::EmergencyStop, Mode::Error)));
    assert!(changes.contains(&(Mode::Error, Mode::Initializing)));
}

#[test]
fn fan_engages_above_start_and_speed_tracks_error() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(58.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 2.5);
    assert!(!rig.last_applied().unwrap().fan_on, "fan off below 60°C");

    rig.set_temperature(68.0);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 1.0);
    let mild = *rig.last_applied().unwrap();
    assert!(mild.fan_on);
    assert!(mild.fan_speed_percent > 0);

    rig.set_temperature(74.0);
    run_for(&mut service, &mut rig, &mut sink, &mut now, 1.0);
    let hot = *rig.last_applied().unwrap();
    assert!(hot.fan_speed_percent > mild.fan_speed_percent);
}

#[test]
fn fan_invariant_holds_for_every_applied_command() {
    let (mut service, mut rig, mut sink) = harness();
    let script: &[(f64, bool, bool, f64)] = &[
        (25.0, true, true, 3.0),
        (66.0, true, true, 2.0),
        (88.0, true, true, 1.0),
        (70.0, true, true, 3.0),
        (55.0, true, true, 2.0),
        (54.0, false, true, 4.0),
        (54.0, true, false, 1.0),
    ];
    let mut now = 0.0;
    for &(temp, level, ignition, secs) in script {
        rig.set_sensors(temp, level, ignition);
        run_for(&mut service, &mut rig, &mut sink, &mut now, secs);
    }
    for cmd in &rig.applied {
        assert!(
            cmd.fan_on || cmd.fan_speed_percent == 0,
            "fan speed {} while fan off",
            cmd.fan_speed_percent
        );
    }
}

#[test]
fn shutdown_forces_off_with_outputs_zeroed() {
    let (mut service, mut rig, mut sink) = harness();
    rig.set_sensors(70.0, true, true);
    let mut now = 0.0;
    run_for(&mut service, &mut rig, &mut sink, &mut now, 3.0);
    assert_eq!(service.mode(), Mode::Running);
    assert!(rig.last_applied().unwrap().pump_on);

    service.shutdown(&mut rig, &mut sink);
    assert_eq!(service.mode(), Mode::Off);
    let cmd = rig.last_applied().unwrap();
    assert!(!cmd.pump_on);
    assert!(!cmd.fan_on);
    assert_eq!(cmd.fan_speed_percent, 0);
    assert!(sink.mode_changes().contains(&(Mode::Running, Mode::Off)));
}

#[test]
fn started_event_carries_initial_mode() {
    let mut service = CoolantService::new(SystemConfig::default());
    let mut sink = RecordingSink::default();
    service.start(&mut sink);
    assert!(matches!(sink.events[0], ControlEvent::Started(Mode::Off)));
}

#[test]
fn step_api_matches_port_driven_tick() {
    // The pure step() contract and the port-driven tick() must agree.
    let mut a = CoolantService::new(SystemConfig::default());
    let mut b = CoolantService::new(SystemConfig::default());
    let mut sink = RecordingSink::default();
    a.start(&mut sink);
    b.start(&mut sink);

    let mut rig = SimulatedRig::new();
    rig.set_sensors(66.0, true, true);

    let mut now = 0.0;
    for _ in 0..40 {
        now += 0.1;
        let cmd_a = a.step(snapshot(66.0, true, true), now);
        b.tick(&mut rig, &mut sink, now);
        assert_eq!(Some(&cmd_a), rig.last_applied());
        assert_eq!(a.mode(), b.mode());
    }
}
