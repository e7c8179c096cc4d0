use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use relaunch::engine::{Action, Input, SupervisorCore, SupervisorState};
use relaunch::resolve::Locator;
use relaunch::watch::{FileStamp, Snapshot};

fn ident() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,11}"
}

fn stamps() -> impl Strategy<Value = BTreeMap<String, u8>> {
    proptest::collection::btree_map("[a-e]{1,2}\\.rs", 0u8..4, 0..8)
}

fn to_snapshot(files: &BTreeMap<String, u8>) -> Snapshot {
    files
        .iter()
        .map(|(name, secs)| {
            (
                PathBuf::from(name),
                FileStamp::Modified(SystemTime::UNIX_EPOCH + Duration::from_secs(u64::from(*secs))),
            )
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Event {
    Quiet,
    Change,
    Exit(i32),
    Shutdown,
}

fn events() -> impl Strategy<Value = Vec<Event>> {
    proptest::collection::vec(
        prop_oneof![
            4 => Just(Event::Quiet),
            3 => Just(Event::Change),
            1 => (0i32..256).prop_map(Event::Exit),
            1 => Just(Event::Shutdown),
        ],
        0..40,
    )
}

proptest! {
    #[test]
    fn well_formed_locators_split_at_the_separator(unit in ident(), attr in ident()) {
        let raw = format!("{unit}:{attr}");
        let locator = Locator::parse(&raw).unwrap();
        prop_assert_eq!(locator.unit(), unit.as_str());
        prop_assert_eq!(locator.attribute(), attr.as_str());
        prop_assert_eq!(locator.to_string(), raw);
    }

    #[test]
    fn locators_without_separator_are_rejected(raw in "[a-z0-9_.]{0,16}") {
        prop_assert!(Locator::parse(&raw).is_err());
    }

    #[test]
    fn snapshot_equality_matches_empty_diff(a in stamps(), b in stamps()) {
        let (old, new) = (to_snapshot(&a), to_snapshot(&b));
        let diff = old.diff(&new);
        prop_assert_eq!(old == new, diff.is_empty());

        for path in &diff.added {
            prop_assert!(old.get(path).is_none() && new.get(path).is_some());
        }
        for path in &diff.removed {
            prop_assert!(old.get(path).is_some() && new.get(path).is_none());
        }
        prop_assert!(old.diff(&old).is_empty());
    }

    #[test]
    fn snapshot_ignores_insertion_order(a in stamps()) {
        let forward = to_snapshot(&a);
        let reversed: Snapshot = a
            .iter()
            .rev()
            .map(|(name, secs)| {
                (
                    PathBuf::from(name),
                    FileStamp::Modified(SystemTime::UNIX_EPOCH + Duration::from_secs(u64::from(*secs))),
                )
            })
            .collect();
        prop_assert_eq!(forward, reversed);
    }

    /// Drive the core through random histories: at most one child at a time,
    /// restarts count change ticks, and the loop finishes with the right code.
    #[test]
    fn core_histories_are_consistent(history in events()) {
        let mut core = SupervisorCore::new();
        let mut alive = false;
        let mut changes = 0u32;
        let mut finished = None;

        let mut pending: VecDeque<Action> = core.step(Input::Started).into();
        let mut history = history.into_iter();

        loop {
            while let Some(action) = pending.pop_front() {
                match action {
                    Action::SpawnChild => {
                        prop_assert!(!alive, "spawned while a child is alive");
                        alive = true;
                        pending.extend(core.step(Input::Spawned { pid: 1 }));
                    }
                    Action::StopChild => {
                        prop_assert!(alive);
                        alive = false;
                        pending.extend(core.step(Input::ChildStopped));
                    }
                    Action::Finish(exit) => finished = Some(exit),
                }
            }
            if finished.is_some() {
                break;
            }
            prop_assert_eq!(core.state(), SupervisorState::Running);

            let input = match history.next() {
                Some(Event::Quiet) => Input::Tick { changed: false },
                Some(Event::Change) => {
                    changes += 1;
                    Input::Tick { changed: true }
                }
                Some(Event::Exit(code)) => {
                    alive = false;
                    Input::ChildExited { code }
                }
                Some(Event::Shutdown) | None => Input::ShutdownRequested,
            };
            let expected_code = match &input {
                Input::ChildExited { code } => Some(*code),
                Input::ShutdownRequested => Some(0),
                _ => None,
            };
            pending = core.step(input).into();

            if let Some(code) = expected_code {
                while let Some(action) = pending.pop_front() {
                    match action {
                        Action::StopChild => {
                            alive = false;
                            pending.extend(core.step(Input::ChildStopped));
                        }
                        Action::Finish(exit) => {
                            prop_assert_eq!(exit.code, code);
                            finished = Some(exit);
                        }
                        Action::SpawnChild => prop_assert!(false, "respawn after final event"),
                    }
                }
                break;
            }
        }

        let exit = finished.expect("core always finishes");
        prop_assert_eq!(exit.restarts, changes);
        prop_assert_eq!(core.state(), SupervisorState::Exited);
        prop_assert!(!alive);
    }
}
