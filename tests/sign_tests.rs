#![allow(clippy::unwrap_used)]

use astro_vibe_bot::signs::{SignBook, ZodiacSign};

#[test]
fn test_parse_accepts_both_locales_any_case() {
    for sign in ZodiacSign::ALL {
        assert_eq!(ZodiacSign::parse(sign.name_en()), Some(sign));
        assert_eq!(ZodiacSign::parse(&sign.name_en().to_uppercase()), Some(sign));
        assert_eq!(ZodiacSign::parse(sign.name_ua()), Some(sign));
        assert_eq!(ZodiacSign::parse(&sign.name_ua().to_lowercase()), Some(sign));
    }
}

#[test]
fn test_parse_is_closed() {
    assert_eq!(ZodiacSign::parse("Ophiuchus"), None);
    assert_eq!(ZodiacSign::parse("lion"), None);
    assert_eq!(ZodiacSign::parse("Лев Толстой"), None);
    assert_eq!(ZodiacSign::parse("/set_sign"), None);
}

#[test]
fn test_from_name_en_is_exact() {
    assert_eq!(ZodiacSign::from_name_en("Leo"), Some(ZodiacSign::Leo));
    // Storage lookups are strict: no case folding, no Ukrainian names
    assert_eq!(ZodiacSign::from_name_en("leo"), None);
    assert_eq!(ZodiacSign::from_name_en("Лев"), None);
}

#[test]
fn test_shipped_sign_config_is_complete() {
    let book = SignBook::load("config/signs.yaml").unwrap();

    let signs = book.signs();
    assert_eq!(signs.len(), 12);
    assert_eq!(signs, ZodiacSign::ALL.to_vec());

    for sign in signs {
        let profile = book.profile(sign).unwrap();
        assert!(!profile.traits.is_empty(), "{} has no traits", sign.name_en());
        assert!(!profile.specificity.is_empty());
    }
}

#[test]
fn test_valid_names_lists_ukrainian_names() {
    let book = SignBook::load("config/signs.yaml").unwrap();
    let names = book.valid_names();
    assert!(names.contains("Лев"));
    assert!(names.contains("Риби"));
    assert!(!names.contains("Leo"));
}

#[test]
fn test_prompt_payload_keyed_by_english_names() {
    let book = SignBook::load("config/signs.yaml").unwrap();
    let payload = book.prompt_payload();
    let object = payload.as_object().unwrap();
    assert_eq!(object.len(), 12);
    assert!(object.contains_key("Leo"));
    assert!(object["Leo"]["traits"].is_array());
}
