use super::*;

use assert_matches::assert_matches;
use rstest::rstest;

#[test]
fn test_field_names() {
    assert_eq!(
        Field::names().collect::<Vec<_>>(),
        vec!["group", "title", "name", "url", "input", "caption"]
    );
    assert_eq!(Field::Url.to_string(), "url");
    assert_eq!(Field::Caption.as_ref(), "caption");
}

#[rstest]
#[case("group", Field::Group)]
#[case("TITLE", Field::Title)]
#[case("Input", Field::Input)]
fn test_field_from_str(#[case] input: &str, #[case] field: Field) {
    assert_eq!(input.parse::<Field>().unwrap(), field);
}

#[test]
fn test_field_from_str_unknown() {
    assert!("channel".parse::<Field>().is_err());
}

#[rstest]
#[case("live", ItemType::Live)]
#[case("VOD", ItemType::Vod)]
#[case("Series", ItemType::Series)]
fn test_item_type_from_str(#[case] input: &str, #[case] value: ItemType) {
    assert_eq!(input.parse::<ItemType>().unwrap(), value);
}

#[test]
fn test_playlist_item_deserialize() {
    let item: PlaylistItem = json::from_str(
        r#"{"group":"Sports","title":"Match","url":"http://x/1.ts","type":"vod","tvg-id":"m1","duration":-1}"#,
    )
    .unwrap();

    assert_eq!(item.get(Field::Group).as_deref(), Some("Sports"));
    assert_eq!(item.get(Field::Title).as_deref(), Some("Match"));
    assert_eq!(item.get(Field::Url).as_deref(), Some("http://x/1.ts"));
    assert_eq!(item.get(Field::Name), None);
    assert_eq!(item.item_type(), Some(ItemType::Vod));
    assert_eq!(item.extra.len(), 2);
    assert_eq!(item.extra["tvg-id"], json::json!("m1"));
}

#[test]
fn test_playlist_item_default_type() {
    let item: PlaylistItem = json::from_str(r#"{"name":"News 24"}"#).unwrap();
    assert_eq!(item.item_type(), Some(ItemType::Live));

    let item: PlaylistItem = json::from_str(r#"{"type":"Series"}"#).unwrap();
    assert_eq!(item.item_type, Some(ItemType::Series));
}

#[test]
fn test_playlist_item_keeps_absent_type() {
    let input = r#"{"name":"News 24","tvg-id":"n24"}"#;
    let item: PlaylistItem = json::from_str(input).unwrap();
    assert_eq!(item.item_type, None);
    assert_eq!(item.item_type(), Some(ItemType::Live));
    assert_eq!(json::to_string(&item).unwrap(), input);

    let item: PlaylistItem = json::from_str(r#"{"group":null,"title":"T"}"#).unwrap();
    assert_eq!(item.get(Field::Group), None);
    assert_eq!(json::to_string(&item).unwrap(), r#"{"title":"T"}"#);
}

#[test]
fn test_playlist_item_unknown_type() {
    let result = json::from_str::<PlaylistItem>(r#"{"type":"radio"}"#);
    assert_matches!(result, Err(_));
    assert!(result.unwrap_err().to_string().contains("unknown variant"));
}

#[test]
fn test_playlist_item_serialize() {
    let item = PlaylistItem::new(ItemType::Series)
        .with(Field::Title, "Show")
        .with(Field::Caption, "S01E01");
    assert_eq!(
        json::to_string(&item).unwrap(),
        r#"{"title":"Show","caption":"S01E01","type":"series"}"#
    );

    let input = r#"{"name":"A","type":"live","x-extra":[1,2]}"#;
    let item: PlaylistItem = json::from_str(input).unwrap();
    assert_eq!(json::to_string(&item).unwrap(), input);
}

#[test]
fn test_record_wrappers() {
    let item = PlaylistItem::new(ItemType::Live).with(Field::Group, "News");

    let boxed = Box::new(item.clone());
    assert_eq!(boxed.get(Field::Group).as_deref(), Some("News"));

    let shared = Arc::new(item.clone());
    assert_eq!(shared.item_type(), Some(ItemType::Live));

    let borrowed = &&item;
    assert_eq!(borrowed.get(Field::Group).as_deref(), Some("News"));
}

#[test]
fn test_filter_mode() {
    assert_eq!(FilterMode::default(), FilterMode::Include);
    assert!(FilterMode::Include.keep(true));
    assert!(!FilterMode::Include.keep(false));
    assert!(!FilterMode::Discard.keep(true));
    assert!(FilterMode::Discard.keep(false));

    assert_eq!("DISCARD".parse::<FilterMode>().unwrap(), FilterMode::Discard);
    assert_eq!(FilterMode::Discard.to_string(), "discard");
}
