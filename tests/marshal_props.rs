mod common;

use std::collections::BTreeSet;

use common::new_file;
use proptest::prelude::*;
use shark_store::prelude::*;
use shark_store::marshal::{fill_probe, string_from_api};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_names_survive_marshalling(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,24}", 0..12)
    ) {
        let (store, mut file) = new_file("props.hdf5");
        for name in &names {
            file.create_group(name).unwrap();
        }

        prop_assert_eq!(file.num_objs().unwrap(), names.len() as u64);
        let listed: BTreeSet<String> = file.child_names().unwrap().into_iter().collect();
        prop_assert_eq!(&listed, &names);

        for idx in 0..names.len() as u64 {
            let name = file.objname_by_idx(idx).unwrap();
            prop_assert!(names.contains(&name));
        }
        prop_assert_eq!(store.open_handles(), 1);
    }

    #[test]
    fn prop_marshalled_length_matches(value in "\\PC{0,40}") {
        let s = string_from_api(|buf| fill_probe(&value, buf)).unwrap();
        prop_assert_eq!(s.len(), value.len());
        prop_assert_eq!(s, value);
    }
}
