//! Type registry and getter template bookkeeping

use std::sync::Arc;

use heist::types::{CoreDictionary, TypeList};
use heist::{Dictionary, HeistError, InputTag, Registry};

use crate::helpers::{hits_registry, HITS_QUICKTAG};

#[test]
fn templates_are_declared_once_per_type() {
    let registry = hits_registry();
    InputTag::from_quicktag(&registry, HITS_QUICKTAG).unwrap();
    InputTag::from_quicktag(&registry, "gm2calo::CrystalHitArtRecords_other").unwrap();
    InputTag::from_quicktag(&registry, "gm2calo::CrystalHitArtRecord_single").unwrap();

    assert_eq!(
        registry.declared_getters(),
        vec![
            "gm2calo::CrystalHitArtRecord".to_string(),
            "vector<gm2calo::CrystalHitArtRecord>".to_string(),
        ]
    );
}

#[test]
fn opaque_type_builds_a_tag_but_declares_nothing() {
    let registry = Registry::new();
    registry.register_opaque("calo::Blob").unwrap();

    let tag = InputTag::from_quicktag(&registry, "calo::Blobs_mod").unwrap();
    assert_eq!(tag.type_descriptor(), "ROOT.vector(ROOT.calo.Blob)");
    assert!(!registry.is_declared("vector<calo::Blob>"));
}

#[test]
fn reset_templates_forgets_declarations() {
    let registry = hits_registry();
    InputTag::from_quicktag(&registry, HITS_QUICKTAG).unwrap();
    assert!(!registry.declared_getters().is_empty());

    registry.reset_templates();
    assert!(registry.declared_getters().is_empty());
}

#[test]
fn dictionaries_load_once_by_name() {
    let registry = Registry::new();
    let list = TypeList {
        name: "calo".to_string(),
        untyped: vec!["calo::Hit".to_string()],
        opaque: Vec::new(),
    };

    assert!(registry.load_dictionary(&CoreDictionary));
    assert!(registry.load_dictionary(&list));
    assert!(!registry.load_dictionary(&list));
    assert_eq!(
        registry.loaded_dictionaries(),
        vec!["calo".to_string(), CoreDictionary::NAME.to_string()]
    );
}

#[test]
fn failing_dictionary_is_not_recorded() {
    struct Broken;

    impl Dictionary for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn register(&self, registry: &Registry) -> heist::Result<()> {
            registry.register_untyped("vector<calo::Hit>")
        }
    }

    let registry = Registry::new();
    assert!(!registry.load_dictionary(&Broken));
    assert!(registry.loaded_dictionaries().is_empty());
}

#[test]
fn strict_and_permissive_resolution() {
    let strict = Registry::new();
    assert!(matches!(
        strict.resolve("ROOT.calo.Hit"),
        Err(HeistError::UnknownType(_))
    ));

    let permissive = Registry::permissive();
    let handle = permissive.resolve("ROOT.vector(ROOT.calo.Hit)").unwrap();
    assert_eq!(handle.friendly_name(), "calo::Hits");
    assert!(permissive.contains("ROOT.calo.Hit"));

    assert!(matches!(
        permissive.resolve("vector(calo.Hit"),
        Err(HeistError::MalformedDescriptor(_))
    ));
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = hits_registry();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                InputTag::from_quicktag(&registry, HITS_QUICKTAG).map(|_| ())
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert_eq!(registry.declared_getters().len(), 1);
}
