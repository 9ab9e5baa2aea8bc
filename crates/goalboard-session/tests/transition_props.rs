//! Properties of session transitions under arbitrary event streams

use goalboard_model::Field;
use goalboard_session::{validate_transition, Effect, Event, Phase, Session};
use goalboard_store::{MutationKind, StoreError, TransportError};
use goalboard_test_utils::{sample_goal, sample_draft};
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = MutationKind> {
    prop_oneof![
        Just(MutationKind::Create),
        Just(MutationKind::Update),
        Just(MutationKind::Delete),
    ]
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Load),
        Just(Event::SubmitAdd),
        Just(Event::SubmitEdit),
        Just(Event::Delete),
        Just(Event::CloseDialog),
        Just(Event::DismissNotice),
        (0u64..4).prop_map(|row| Event::OpenEdit(sample_goal(row))),
        (0..Field::ALL.len(), "[0-9a-z ]{0,4}")
            .prop_map(|(i, v)| Event::SetAddField(Field::ALL[i], v)),
        (kind(), any::<bool>()).prop_map(|(kind, ok)| Event::MutationCompleted {
            kind,
            result: if ok {
                Ok(())
            } else {
                Err(StoreError::Transport(TransportError::Status(502)))
            },
        }),
        any::<bool>().prop_map(|ok| Event::FetchCompleted(if ok {
            Ok(vec![sample_goal(2)])
        } else {
            Err(StoreError::MalformedResponse("html".to_string()))
        })),
    ]
}

fn seeded() -> Session {
    let mut session = Session::new();
    let draft = sample_draft();
    for field in Field::ALL {
        session.apply(Event::SetAddField(field, draft.get(field).to_string()));
    }
    session
}

proptest! {
    #[test]
    fn phase_changes_are_always_allowed(events in prop::collection::vec(event(), 0..40)) {
        let mut session = seeded();
        for event in events {
            let before = session.phase();
            session.apply(event);
            let after = session.phase();
            if before != after {
                prop_assert!(validate_transition(before, after).is_ok());
            }
        }
    }

    #[test]
    fn at_most_one_mutation_in_flight(events in prop::collection::vec(event(), 0..40)) {
        let mut session = seeded();
        for event in events {
            let was_busy = session.is_busy();
            let effects = session.apply(event);
            let dispatches = effects
                .iter()
                .filter(|e| matches!(e, Effect::Dispatch(_)))
                .count();

            prop_assert!(dispatches <= 1);
            if dispatches == 1 {
                prop_assert!(!was_busy);
                prop_assert_eq!(session.phase(), Phase::Submitting);
            }
        }
    }

    #[test]
    fn refetch_follows_every_completed_edit_or_delete(
        kind in prop_oneof![Just(MutationKind::Update), Just(MutationKind::Delete)],
        ok in any::<bool>(),
    ) {
        let mut session = seeded();
        session.apply(Event::OpenEdit(sample_goal(3)));
        let submit = if kind == MutationKind::Update { Event::SubmitEdit } else { Event::Delete };
        prop_assert_eq!(session.apply(submit).len(), 1);

        let result = if ok {
            Ok(())
        } else {
            Err(StoreError::Transport(TransportError::Status(500)))
        };
        let effects = session.apply(Event::MutationCompleted { kind, result });
        prop_assert_eq!(effects, vec![Effect::Fetch]);
        prop_assert_eq!(session.phase(), Phase::RefetchPending);
    }
}
