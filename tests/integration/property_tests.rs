//! Property-based tests for the tuple grammar, adapter and token codec.

use inferadb_tuple::token::{self, DecodedToken};
use inferadb_tuple::tuple::{self, ELLIPSIS, ObjectAndRelation, Operation, RelationTuple};
use inferadb_tuple::types::{ObjectReference, Relationship, SubjectReference};
use inferadb_tuple::{ConsistencyToken, Revision};
use proptest::prelude::*;

fn arb_namespace() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{1,20}[a-z0-9]",
        "[a-z][a-z0-9_]{1,10}[a-z0-9]/[a-z][a-z0-9_]{1,20}[a-z0-9]",
    ]
}

fn arb_object_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9/_-]{0,40}"
}

fn arb_relation() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{1,20}[a-z0-9]"
}

fn arb_subject_relation() -> impl Strategy<Value = String> {
    prop_oneof![Just(ELLIPSIS.to_string()), arb_relation()]
}

fn arb_tuple() -> impl Strategy<Value = RelationTuple> {
    (
        arb_namespace(),
        arb_object_id(),
        arb_relation(),
        arb_namespace(),
        arb_object_id(),
        arb_subject_relation(),
    )
        .prop_map(|(ns, id, rel, subject_ns, subject_id, subject_rel)| {
            RelationTuple::new(
                ObjectAndRelation::new(ns, id, rel),
                ObjectAndRelation::new(subject_ns, subject_id, subject_rel),
            )
        })
}

fn arb_relationship() -> impl Strategy<Value = Relationship> {
    (
        arb_namespace(),
        arb_object_id(),
        arb_relation(),
        arb_namespace(),
        arb_object_id(),
        proptest::option::of(arb_relation()),
    )
        .prop_map(|(ns, id, rel, subject_ns, subject_id, subject_rel)| {
            let object = ObjectReference::new(subject_ns, subject_id);
            let subject = match subject_rel {
                Some(relation) => SubjectReference::with_relation(object, relation),
                None => SubjectReference::new(object),
            };
            Relationship::new(ObjectReference::new(ns, id), rel, subject)
        })
}

fn arb_revision() -> impl Strategy<Value = Revision> {
    (any::<i64>(), "[0-9]{0,12}").prop_map(|(whole, fraction)| {
        let text = if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        };
        text.parse().unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Canonical text survives a format/parse round trip
    #[test]
    fn prop_text_round_trip(t in arb_tuple()) {
        let text = tuple::format(&t);
        prop_assert_eq!(tuple::parse(&text), Some(t));
    }

    /// The relationship adapter is lossless for valid tuples
    #[test]
    fn prop_relationship_round_trip(t in arb_tuple()) {
        let relationship = tuple::to_relationship(&t).unwrap();
        prop_assert_eq!(relationship.is_subject_set(), t.subject.relation != ELLIPSIS);
        prop_assert_eq!(tuple::from_relationship(&relationship).unwrap(), t);
    }

    /// Valid relationships survive a trip through the tuple model
    #[test]
    fn prop_relationship_to_tuple_round_trip(relationship in arb_relationship()) {
        let t = tuple::from_relationship(&relationship).unwrap();
        prop_assert_eq!(t.subject.relation == ELLIPSIS, !relationship.is_subject_set());
        prop_assert_eq!(tuple::to_relationship(&t).unwrap(), relationship);
    }

    /// Formatting never emits the wildcard relation
    #[test]
    fn prop_format_omits_ellipsis(t in arb_tuple()) {
        prop_assert!(!tuple::format(&t).contains("#..."));
    }

    /// Parsing arbitrary text never panics
    #[test]
    fn prop_parse_arbitrary_text(text in "\\PC{0,200}") {
        if let Some(t) = tuple::parse(&text) {
            prop_assert!(t.validate().is_ok());
        }
    }

    /// Revisions survive a token round trip
    #[test]
    fn prop_token_round_trip(revision in arb_revision()) {
        let minted = token::new_from_revision(&revision);
        prop_assert_eq!(token::decode_revision(Some(&minted)).unwrap(), revision);
    }

    /// Legacy zookies decode to the same revision without truncation
    #[test]
    fn prop_legacy_zookie(revision in any::<u64>()) {
        let legacy = token::encode(&DecodedToken::DeprecatedV1Zookie { revision });
        prop_assert_eq!(
            token::decode_revision(Some(&legacy)).unwrap(),
            Revision::from(revision)
        );
    }

    /// Decoding arbitrary tokens fails cleanly instead of panicking
    #[test]
    fn prop_decode_arbitrary_token(text in "[A-Za-z0-9+/=]{0,64}") {
        let _ = token::decode(Some(&ConsistencyToken::new(text)));
    }

    /// Operation tags outside the known set are rejected
    #[test]
    fn prop_unknown_operation_rejected(
        tag in any::<i32>().prop_filter("known tag", |t| !(1..=3).contains(t))
    ) {
        prop_assert!(Operation::try_from(tag).is_err());
    }
}
