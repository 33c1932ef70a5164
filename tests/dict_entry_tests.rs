use rdict::{Dict, Entry};

#[test]
fn word_count_via_entry_and_modify() {
    let mut counts: Dict<&str, u32> = Dict::new();

    for w in "the quick brown fox jumps over the lazy dog the fox runs".split_whitespace() {
        counts.entry(w).and_modify(|c| *c += 1).or_insert(1);
    }

    assert_eq!(counts.get(&"the"), Some(&3));
    assert_eq!(counts.get(&"fox"), Some(&2));
    assert_eq!(counts.get(&"dog"), Some(&1));
    assert_eq!(counts.get(&"missing"), None);
}

#[test]
fn entry_or_default_builds_up_a_grouped_collection() {
    let mut groups: Dict<u32, Vec<u32>> = Dict::new();

    for i in 0..100u32 {
        groups.entry(i % 7).or_default().push(i);
    }

    assert_eq!(groups.len(), 7);
    for bucket in 0..7u32 {
        let values = groups.get(&bucket).unwrap();
        assert!(values.iter().all(|v| v % 7 == bucket));
    }
}

#[test]
fn occupied_remove_mid_chain_during_rehash() {
    let mut d: Dict<u32, u32> = Dict::new();
    for i in 0..40u32 {
        d.insert(i, i * 10);
    }

    for i in (0..40u32).step_by(3) {
        if let Entry::Occupied(e) = d.entry(i) {
            let removed = e.remove();
            assert_eq!(removed, i * 10);
        }
    }

    for i in 0..40u32 {
        if i % 3 == 0 {
            assert_eq!(d.get(&i), None);
        } else {
            assert_eq!(d.get(&i), Some(&(i * 10)));
        }
    }
}

#[test]
fn vacant_insert_then_occupied_update_round_trip() {
    let mut d: Dict<String, Vec<i32>> = Dict::new();

    match d.entry("key".to_string()) {
        Entry::Vacant(e) => {
            e.insert(vec![1, 2, 3]);
        }
        Entry::Occupied(_) => panic!("expected vacant on first insert"),
    }

    match d.entry("key".to_string()) {
        Entry::Occupied(mut e) => e.get_mut().push(4),
        Entry::Vacant(_) => panic!("expected occupied on second lookup"),
    }

    assert_eq!(d.get("key"), Some(&vec![1, 2, 3, 4]));
}

#[test]
fn entry_does_not_duplicate_keys_across_many_or_inserts() {
    let mut d: Dict<u32, u32> = Dict::new();

    for _ in 0..50 {
        d.entry(1).or_insert(0);
    }

    assert_eq!(d.len(), 1);
}

#[test]
fn replace_write_before_destroy_order_with_rc_values() {
    use std::rc::Rc;

    let mut d: Dict<&str, Rc<i32>> = Dict::new();
    let shared = Rc::new(10);
    d.insert("k", shared.clone());
    assert_eq!(Rc::strong_count(&shared), 2);

    // Replacing with a clone of the same Rc must not observe a
    // zero-refcount in between: the new value is written before the old
    // one is dropped.
    let same = shared.clone();
    d.insert("k", same);
    assert_eq!(*d.get(&"k").unwrap().as_ref(), 10);
}
