use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::StaticRadixMap;

/// Wrapper for key generation with custom strategy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key(Vec<u8>);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // Empty key
            Just(Key(vec![])),
            // Short keys (1-4 bytes)
            prop::collection::vec(any::<u8>(), 1..4).prop_map(Key),
            // Medium keys (4-64 bytes)
            prop::collection::vec(any::<u8>(), 4..64).prop_map(Key),
            // Structured keys with separators, as command tables have
            "[a-z]{2,6}:[a-z]{1,6}".prop_map(|s| Key(s.into_bytes())),
            "[a-z]{2,6}/[a-z]{1,6}".prop_map(|s| Key(s.into_bytes())),
            // Keys sharing a long common prefix
            "[a-z]{1,4}".prop_map(|suffix| {
                let mut key = b"shared/prefix/".to_vec();
                key.extend_from_slice(suffix.as_bytes());
                Key(key)
            }),
        ]
        .boxed()
    }
}

/// Probes derived from the stored key set: exact hits plus near-misses that
/// follow the same dispatch route for a while.
#[derive(Arbitrary, Debug, Clone)]
enum Probe {
    /// A stored key, unmodified.
    Exact(prop::sample::Index),
    /// A stored key cut short.
    Truncated(prop::sample::Index, prop::sample::Index),
    /// A stored key with extra bytes appended.
    Extended(prop::sample::Index, u8),
    /// A stored key with one byte rewritten.
    Edited(prop::sample::Index, prop::sample::Index, u8),
    /// An unrelated key.
    Random(Key),
}

impl Probe {
    fn bytes(&self, keys: &[Vec<u8>]) -> Vec<u8> {
        match self {
            Probe::Exact(which) => keys[which.index(keys.len())].clone(),
            Probe::Truncated(which, at) => {
                let key = &keys[which.index(keys.len())];
                let cut = if key.is_empty() { 0 } else { at.index(key.len()) };
                key[..cut].to_vec()
            }
            Probe::Extended(which, byte) => {
                let mut key = keys[which.index(keys.len())].clone();
                key.push(*byte);
                key
            }
            Probe::Edited(which, at, byte) => {
                let mut key = keys[which.index(keys.len())].clone();
                if !key.is_empty() {
                    let pos = at.index(key.len());
                    key[pos] = *byte;
                }
                key
            }
            Probe::Random(key) => key.0.clone(),
        }
    }
}

fn build_pair(
    pairs: Vec<(Key, u64)>,
) -> (BTreeMap<Vec<u8>, u64>, StaticRadixMap<Vec<u8>, u64>, Vec<Vec<u8>>) {
    // Deduplicate through the model; construction order is the model's.
    let mut model = BTreeMap::new();
    for (key, value) in pairs {
        model.insert(key.0, value);
    }
    let map = StaticRadixMap::new(model.iter().map(|(k, v)| (k.clone(), *v)))
        .expect("unique keys must build");
    let keys: Vec<Vec<u8>> = model.keys().cloned().collect();
    (model, map, keys)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_round_trip_and_order(pairs in prop::collection::vec(any::<(Key, u64)>(), 1..64)) {
        let (model, map, _) = build_pair(pairs);

        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.get(key.as_slice()), Some(value), "key {:?}", key);
            prop_assert_eq!(map.count(key.as_slice()), 1);
        }

        // Iteration yields entries exactly in construction order.
        let got: Vec<(Vec<u8>, u64)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn proptest_probes_agree_with_model(
        pairs in prop::collection::vec(any::<(Key, u64)>(), 1..48),
        probes in prop::collection::vec(any::<Probe>(), 1..64),
    ) {
        let (model, map, keys) = build_pair(pairs);

        for probe in probes {
            let bytes = probe.bytes(&keys);
            let expected = model.get(&bytes);
            prop_assert_eq!(
                map.get(bytes.as_slice()),
                expected,
                "probe {:?} disagreed with model",
                bytes
            );
            prop_assert_eq!(map.contains(bytes.as_slice()), expected.is_some());
            match map.find(bytes.as_slice()) {
                Some(pos) => {
                    let (k, v) = map.get_index(pos).expect("find position must resolve");
                    prop_assert_eq!(k.as_slice(), bytes.as_slice());
                    prop_assert_eq!(Some(v), expected);
                    prop_assert_eq!(map.equal_range(bytes.as_slice()), pos..pos + 1);
                }
                None => {
                    prop_assert!(expected.is_none());
                    prop_assert!(map.equal_range(bytes.as_slice()).is_empty());
                }
            }
        }
    }

    #[test]
    fn proptest_trusted_walk_hits_present_keys(
        pairs in prop::collection::vec(any::<(Key, u64)>(), 1..48),
    ) {
        let mut model = BTreeMap::new();
        for (key, value) in pairs {
            model.insert(key.0, value);
        }
        let map: StaticRadixMap<Vec<u8>, u64, true> =
            StaticRadixMap::new(model.iter().map(|(k, v)| (k.clone(), *v)))
                .expect("unique keys must build");

        for (key, value) in &model {
            prop_assert_eq!(map.get(key.as_slice()), Some(value));
        }
    }
}
