use carnival_engine::core::zones::events::{
    BarrierDissolved, EnemyDefeated, MechanismCompleted, MechanismProgressed, RidesStopped,
    ZoneCleared, ZoneUnlocked,
};
use carnival_engine::prelude::*;

const TPS: f64 = 10.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn carnival() -> Session {
    init_logging();
    let config = SessionConfig::carnival().expect("bundled layout parses");
    let mut session = Session::new(&config, TPS).expect("bundled layout validates");
    session.tick();
    session.take_commands();
    session
}

/// Runs `ticks` ticks and returns every command they produced.
fn run(session: &mut Session, ticks: usize) -> Vec<HostCommand> {
    let mut commands = Vec::new();
    for _ in 0..ticks {
        session.tick();
        commands.extend(session.take_commands());
    }
    commands
}

fn send(session: &mut Session, event: HostEvent) -> Vec<HostCommand> {
    session.submit(event);
    run(session, 1)
}

fn interact(zone: u8, event: InteractionEvent) -> HostEvent {
    HostEvent::Interaction {
        zone: ZoneId(zone),
        event,
    }
}

fn spawned_actors(commands: &[HostCommand]) -> Vec<ActorHandle> {
    commands
        .iter()
        .filter_map(|command| match command {
            HostCommand::SpawnActor { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect()
}

//=========================================================================
// Full zone pipeline
//=========================================================================

#[test]
fn generator_zone_runs_from_lever_to_cleared() {
    let mut session = carnival();
    send(&mut session, HostEvent::UnlockZone(ZoneId(3)));
    assert!(session.is_unlocked(ZoneId(3)));

    // Three pushes, each after the push animation has settled.
    send(&mut session, interact(3, InteractionEvent::Push));
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::MechanismActive));
    assert_eq!(
        session.events::<MechanismProgressed>(),
        &[MechanismProgressed {
            zone: ZoneId(3),
            current: 1,
            required: 3
        }]
    );
    run(&mut session, 10);
    send(&mut session, interact(3, InteractionEvent::Push));
    run(&mut session, 10);
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::MechanismActive));

    let stop_tick = send(&mut session, interact(3, InteractionEvent::Push));
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::RidesStopped));
    assert_eq!(session.events::<MechanismCompleted>().len(), 1);
    assert_eq!(
        session.events::<RidesStopped>(),
        &[RidesStopped {
            zone: ZoneId(3),
            count: 2
        }]
    );
    assert!(stop_tick.contains(&HostCommand::PlaySound {
        clip: "rides_power_down".into(),
        at: None
    }));
    for ride in ["bumper_cars", "teacups"] {
        assert!(stop_tick.contains(&HostCommand::SetRideMotion {
            ride: ride.into(),
            running: false
        }));
    }

    // A late push after completion changes nothing.
    run(&mut session, 10);
    let late = send(&mut session, interact(3, InteractionEvent::Push));
    assert!(session.events::<MechanismCompleted>().is_empty());
    assert!(!late
        .iter()
        .any(|c| matches!(c, HostCommand::SetRideMotion { .. })));

    // Settle delay, then three staggered spawns.
    let mut commands = run(&mut session, 25);
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::EncounterSpawned));
    commands.extend(run(&mut session, 15));
    assert!(commands.contains(&HostCommand::StopAudio {
        source: "bumper_cars_ambient".into()
    }));
    let actors = spawned_actors(&commands);
    assert_eq!(actors.len(), 3);

    // Destroy out of order, with a duplicate report along the way.
    send(&mut session, HostEvent::ActorDestroyed { actor: actors[2] });
    assert_eq!(session.events::<EnemyDefeated>()[0].remaining, 2);
    assert!(session.events::<ZoneCleared>().is_empty());

    session.submit(HostEvent::ActorDestroyed { actor: actors[0] });
    session.submit(HostEvent::ActorDestroyed { actor: actors[0] });
    run(&mut session, 1);
    assert_eq!(session.events::<EnemyDefeated>().len(), 1);
    assert!(session.events::<ZoneCleared>().is_empty());
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::EncounterSpawned));

    let final_tick = send(&mut session, HostEvent::ActorDestroyed { actor: actors[1] });
    assert_eq!(
        session.events::<ZoneCleared>(),
        &[ZoneCleared { zone: ZoneId(3) }]
    );
    assert!(final_tick.contains(&HostCommand::Notify(ZoneNotice::Cleared(ZoneId(3)))));
    assert_eq!(session.zone_state(ZoneId(3)), Some(ZoneState::Cleared));

    let after = send(&mut session, HostEvent::ActorDestroyed { actor: actors[1] });
    assert!(session.events::<ZoneCleared>().is_empty());
    assert!(!after.contains(&HostCommand::Notify(ZoneNotice::Cleared(ZoneId(3)))));
}

#[test]
fn hand_crank_completes_after_five_turns() {
    let mut session = carnival();

    session.submit(interact(4, InteractionEvent::Grab));
    for _ in 0..19 {
        session.submit(interact(4, InteractionEvent::Rotate { degrees: 90.0 }));
    }
    run(&mut session, 1);
    assert_eq!(session.zone_state(ZoneId(4)), Some(ZoneState::MechanismActive));

    send(&mut session, interact(4, InteractionEvent::Rotate { degrees: 90.0 }));
    assert_eq!(session.zone_state(ZoneId(4)), Some(ZoneState::RidesStopped));
}

#[test]
fn socket_runs_on_its_own_once_seated() {
    let mut session = carnival();

    send(&mut session, interact(1, InteractionEvent::Socketed));
    run(&mut session, 15);
    assert_eq!(session.zone_state(ZoneId(1)), Some(ZoneState::MechanismActive));

    let commands = run(&mut session, 10);
    assert_eq!(session.zone_state(ZoneId(1)), Some(ZoneState::RidesStopped));
    assert!(commands.contains(&HostCommand::FadeAudio {
        source: "carousel_organ".into(),
        target_volume: 0.0,
        duration_secs: 2.0
    }));
}

#[test]
fn big_top_without_rides_still_progresses() {
    let mut session = carnival();

    send(&mut session, interact(5, InteractionEvent::Socketed));
    let commands = run(&mut session, 40);
    assert_eq!(session.zone_state(ZoneId(5)), Some(ZoneState::EncounterSpawned));
    assert!(!spawned_actors(&commands).is_empty());
}

//=========================================================================
// Progression and barriers
//=========================================================================

#[test]
fn second_zone_stays_locked_until_unlocked() {
    let mut session = carnival();
    assert!(session.is_unlocked(ZoneId(1)));

    for _ in 0..5 {
        run(&mut session, 1);
        assert!(!session.is_unlocked(ZoneId(2)));
    }

    let commands = send(&mut session, HostEvent::UnlockZone(ZoneId(2)));
    assert!(session.is_unlocked(ZoneId(2)));
    assert!(commands.contains(&HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(2)))));

    run(&mut session, 100);
    assert!(session.is_unlocked(ZoneId(2)));
}

#[test]
fn repeated_unlock_shows_each_barrier_once() {
    let mut session = carnival();

    session.submit(HostEvent::UnlockZone(ZoneId(2)));
    session.submit(HostEvent::UnlockZone(ZoneId(2)));
    let mut commands = run(&mut session, 1);
    for _ in 0..3 {
        commands.extend(send(&mut session, HostEvent::UnlockZone(ZoneId(2))));
    }

    let shown = commands
        .iter()
        .filter(|c| {
            **c == HostCommand::SetBarrierVisible {
                barrier: BarrierId(2),
                visible: true,
            }
        })
        .count();
    assert_eq!(shown, 1);
    let notices = commands
        .iter()
        .filter(|c| **c == HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(2))))
        .count();
    assert_eq!(notices, 1);
}

#[test]
fn scripted_dissolve_opens_only_unlocked_zones() {
    let mut session = carnival();
    let hidden = HostCommand::SetBarrierVisible {
        barrier: BarrierId(3),
        visible: false,
    };

    let locked = send(&mut session, HostEvent::DissolveBarriers { zone: ZoneId(3) });
    assert!(locked.is_empty());
    assert!(!run(&mut session, 20).contains(&hidden));

    send(&mut session, HostEvent::UnlockZone(ZoneId(3)));
    let mut commands = send(&mut session, HostEvent::DissolveBarriers { zone: ZoneId(3) });
    commands.extend(run(&mut session, 20));
    assert!(commands.contains(&hidden));
    assert!(!commands
        .iter()
        .any(|c| matches!(c, HostCommand::PlaySound { clip, .. } if clip == "barrier_blocked")));
}

#[test]
fn briefing_cue_unlocks_its_zone_when_finished() {
    let mut session = carnival();

    let first = send(&mut session, HostEvent::RadioPressed);
    assert!(first.contains(&HostCommand::PlaySound {
        clip: "briggs_1".into(),
        at: None
    }));

    // Cooldown: a second press right away plays nothing.
    let early = send(&mut session, HostEvent::RadioPressed);
    assert!(!early
        .iter()
        .any(|c| matches!(c, HostCommand::PlaySound { .. })));

    run(&mut session, 60);
    let second = send(&mut session, HostEvent::RadioPressed);
    assert!(second.contains(&HostCommand::PlaySound {
        clip: "briggs_2".into(),
        at: None
    }));

    run(&mut session, 90);
    assert!(!session.is_unlocked(ZoneId(2)));

    let commands = run(&mut session, 20);
    assert!(session.is_unlocked(ZoneId(2)));
    assert!(commands.contains(&HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(2)))));
    assert!(commands.contains(&HostCommand::SetBarrierVisible {
        barrier: BarrierId(2),
        visible: true
    }));
}

#[test]
fn locked_barrier_blocks_until_zone_unlocks() {
    let mut session = carnival();
    let contact = HostEvent::PlayerContact {
        barrier: BarrierId(4),
    };

    for _ in 0..2 {
        let commands = send(&mut session, contact.clone());
        assert!(commands
            .iter()
            .any(|c| matches!(c, HostCommand::PlaySound { clip, .. } if clip == "barrier_blocked")));
    }

    send(&mut session, HostEvent::UnlockZone(ZoneId(4)));
    send(&mut session, contact.clone());

    let mut dissolved = 0;
    let mut commands = Vec::new();
    for _ in 0..20 {
        commands.extend(run(&mut session, 1));
        dissolved += session.events::<BarrierDissolved>().len();
    }
    assert_eq!(dissolved, 1);
    assert!(commands.contains(&HostCommand::SetBarrierVisible {
        barrier: BarrierId(4),
        visible: false
    }));

    // Passed barriers ignore further contact and repeated unlocks.
    let again = send(&mut session, contact);
    assert!(again.is_empty());
    send(&mut session, HostEvent::UnlockZone(ZoneId(4)));
    assert!(session.events::<ZoneUnlocked>().is_empty());
}

//=========================================================================
// Teardown
//=========================================================================

#[test]
fn teardown_mid_encounter_drops_late_signals() {
    let mut session = carnival();

    send(&mut session, interact(2, InteractionEvent::Socketed));
    let commands = run(&mut session, 25);
    assert_eq!(session.zone_state(ZoneId(2)), Some(ZoneState::EncounterSpawned));
    let actors = spawned_actors(&commands);
    assert!(!actors.is_empty());

    send(&mut session, HostEvent::Teardown { zone: ZoneId(2) });
    assert_eq!(session.zone_state(ZoneId(2)), Some(ZoneState::Disposed));

    for actor in actors {
        session.submit(HostEvent::ActorDestroyed { actor });
    }
    let late = run(&mut session, 30);
    assert!(session.events::<ZoneCleared>().is_empty());
    assert!(spawned_actors(&late).is_empty());
    assert!(!late.contains(&HostCommand::Notify(ZoneNotice::Cleared(ZoneId(2)))));
}

//=========================================================================
// Threaded runtime
//=========================================================================

#[test]
fn engine_forwards_notices_to_host() {
    init_logging();
    let handle = EngineBuilder::new()
        .with_tps(200.0)
        .build()
        .expect("bundled layout")
        .start();

    handle
        .send(HostEvent::UnlockZone(ZoneId(5)))
        .expect("logic thread alive");
    let commands = handle.commands().clone();
    handle.shutdown();

    let received: Vec<HostCommand> = commands.try_iter().collect();
    assert!(received.contains(&HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(1)))));
    assert!(received.contains(&HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(5)))));
}
