#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use bpfstats_core::{hash_labels, LabelSet};

#[test]
fn insertion_order_does_not_change_key() {
    let a = LabelSet::new()
        .with("status", "ok")
        .with("op", "push")
        .with("node", "n1");
    let b = LabelSet::new()
        .with("node", "n1")
        .with("status", "ok")
        .with("op", "push");

    assert_eq!(hash_labels(&a).unwrap(), hash_labels(&b).unwrap());
}

#[test]
fn hashmap_input_is_order_independent() {
    let mut m1 = HashMap::new();
    let mut m2 = HashMap::new();
    for i in 0..32 {
        m1.insert(format!("k{i}"), format!("v{i}"));
    }
    for i in (0..32).rev() {
        m2.insert(format!("k{i}"), format!("v{i}"));
    }

    let a: LabelSet = m1.into_iter().collect();
    let b: LabelSet = m2.into_iter().collect();
    assert_eq!(a.key().unwrap(), b.key().unwrap());
}

#[test]
fn different_content_gives_different_keys() {
    let ok = LabelSet::new().with("status", "ok");
    let err = LabelSet::new().with("status", "err");
    let renamed = LabelSet::new().with("state", "ok");

    let k_ok = ok.key().unwrap();
    assert_ne!(k_ok, err.key().unwrap());
    assert_ne!(k_ok, renamed.key().unwrap());
}

#[test]
fn separator_characters_do_not_collide() {
    // "a" => "b,c" must not look like "a" => "b" plus "c" => "".
    let joined = LabelSet::new().with("a", "b,c");
    let split = LabelSet::new().with("a", "b").with("c", "");
    assert_ne!(joined.key().unwrap(), split.key().unwrap());

    let quoted = LabelSet::new().with("a", "\"b\"");
    let plain = LabelSet::new().with("a", "b");
    assert_ne!(quoted.key().unwrap(), plain.key().unwrap());
}

#[test]
fn empty_set_has_stable_distinct_key() {
    let empty = LabelSet::new();
    assert!(empty.is_empty());
    assert_eq!(empty.key().unwrap(), LabelSet::default().key().unwrap());
    assert_ne!(empty.key().unwrap(), LabelSet::new().with("a", "").key().unwrap());
}

#[test]
fn scalar_values_are_rendered_as_strings() {
    let labels = LabelSet::new().with("port", 9091).with("tls", true);
    assert_eq!(labels.get("port"), Some("9091"));
    assert_eq!(labels.get("tls"), Some("true"));

    let same = LabelSet::new().with("port", "9091").with("tls", "true");
    assert_eq!(labels.key().unwrap(), same.key().unwrap());
}

#[test]
fn key_displays_as_hex_digest() {
    let key = LabelSet::new().with("op", "push").key().unwrap();
    let shown = key.to_string();
    assert_eq!(shown.len(), 64);
    assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(key.as_bytes().len(), 32);
}

#[test]
fn iteration_is_name_sorted() {
    let labels = LabelSet::new().with("z", 1).with("a", 2).with("m", 3);
    let names: Vec<&str> = labels.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["a", "m", "z"]);
}

#[test]
fn label_names_are_checked_against_the_exposition_grammar() {
    for good in ["status", "_private", "http_path", "cpu0", "A"] {
        assert!(LabelSet::new().with(good, "v").validate().is_ok(), "{good:?}");
    }
    for bad in ["http.path", "a-c", "9lives", "", "ns:sub", "with space"] {
        let err = LabelSet::new()
            .with("ok", "v")
            .with(bad, "v")
            .validate()
            .expect_err("must reject");
        assert_eq!(err.kind().as_str(), "INVALID_LABEL", "{bad:?}");
        assert!(err.to_string().contains(&format!("{bad:?}")), "{err}");
    }
    assert!(LabelSet::new().validate().is_ok());
}
