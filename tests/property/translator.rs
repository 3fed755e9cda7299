use proptest::prelude::*;
use treewatch::Event;
use treewatch::types::{NativeKind, RenameCapability};
use treewatch::watch::{KindTable, ScopedRecord, Translator, TranslatorState};

#[derive(Debug, Clone)]
enum Step {
    Record(String, NativeKind),
    Overflow,
    Reset,
}

fn native_kind() -> impl Strategy<Value = NativeKind> {
    prop_oneof![
        Just(NativeKind::Create),
        Just(NativeKind::Write),
        Just(NativeKind::Metadata),
        Just(NativeKind::Remove),
        Just(NativeKind::RenameFrom),
        Just(NativeKind::RenameTo),
        Just(NativeKind::Rename),
        Just(NativeKind::Access),
        Just(NativeKind::Other),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    // A handful of names so duplicates actually happen.
    let name = prop_oneof![Just("a"), Just("a/b"), Just("c")].prop_map(|s| s.to_string());
    prop_oneof![
        8 => (name, native_kind()).prop_map(|(n, k)| Step::Record(n, k)),
        1 => Just(Step::Overflow),
        1 => Just(Step::Reset),
    ]
}

fn capability() -> impl Strategy<Value = RenameCapability> {
    prop_oneof![
        Just(RenameCapability::Distinguishes),
        Just(RenameCapability::Indistinct(treewatch::EventKind::Remove)),
        Just(RenameCapability::Indistinct(treewatch::EventKind::NonRemove)),
    ]
}

proptest! {
    #[test]
    fn emitted_stream_keeps_its_guarantees(
        rename in capability(),
        steps in proptest::collection::vec(step(), 0..200),
    ) {
        let mut t = Translator::new(KindTable::new(rename));
        let mut emitted: Vec<Event> = Vec::new();
        let mut reset_since_emit = false;

        for step in steps {
            let before = t.state();
            let emitted_before = emitted.len();
            match step {
                Step::Record(name, kind) => {
                    let out = t.on_record(ScopedRecord::new(name.clone(), kind));
                    if before == TranslatorState::Overflowed {
                        prop_assert_eq!(out.clone(), None);
                    }
                    if kind == NativeKind::Access {
                        prop_assert_eq!(out.clone(), None);
                    }
                    if let Some(event) = out {
                        prop_assert_eq!(&event.name, &name);
                        emitted.push(event);
                    }
                }
                Step::Overflow => {
                    let out = t.on_overflow();
                    match before {
                        TranslatorState::Active => prop_assert_eq!(out.clone(), Some(Event::root())),
                        _ => prop_assert_eq!(out.clone(), None),
                    }
                    prop_assert_eq!(t.state(), TranslatorState::Overflowed);
                    emitted.extend(out);
                }
                Step::Reset => {
                    let changed = t.reset();
                    prop_assert_eq!(changed, before == TranslatorState::Overflowed);
                    prop_assert_eq!(t.state(), TranslatorState::Active);
                    reset_since_emit |= changed;
                }
            }

            if emitted.len() > emitted_before {
                // A repeat is only allowed right after a reset.
                if emitted_before > 0 && emitted[emitted_before - 1] == emitted[emitted_before] {
                    prop_assert!(reset_since_emit);
                }
                reset_since_emit = false;
            }
        }
    }

    #[test]
    fn without_resets_no_event_repeats_back_to_back(
        steps in proptest::collection::vec(step(), 0..200),
    ) {
        let mut t = Translator::new(KindTable::new(RenameCapability::Distinguishes));
        let mut emitted: Vec<Event> = Vec::new();

        for step in steps {
            match step {
                Step::Record(name, kind) => emitted.extend(t.on_record(ScopedRecord::new(name, kind))),
                Step::Overflow => emitted.extend(t.on_overflow()),
                Step::Reset => {}
            }
        }

        for pair in emitted.windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
        prop_assert!(emitted.iter().filter(|e| e.is_root()).count() <= 1);
    }
}
