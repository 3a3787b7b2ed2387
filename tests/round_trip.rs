use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tinylist::io::{ErrorKind, ListStore};
use tinylist::model::{ColourMode, Node, flatten, is_valid_file_key};
use tinylist::parse::{parse_list, serialize_list};

const GROCERIES: &str = "\
Name Groceries

BeginItems
Item zebra
Item apple
Item fruit:banana
Item fruit:apple
EndItems
";

fn store_with_groceries() -> (TempDir, ListStore) {
    let tmp = TempDir::new().unwrap();
    let store = ListStore::new(tmp.path()).with_colours(ColourMode::Stable);
    fs::write(tmp.path().join("groceries.list"), GROCERIES).unwrap();
    (tmp, store)
}

fn item_region(store: &ListStore, key: &str) -> Vec<String> {
    let text = fs::read_to_string(store.dir().join(format!("{}.list", key))).unwrap();
    text.split('\n')
        .skip_while(|l| *l != "BeginItems")
        .skip(1)
        .take_while(|l| *l != "EndItems")
        .map(str::to_string)
        .collect()
}

fn sorted_paths(store: &ListStore, key: &str) -> Vec<String> {
    let doc = store.open(key).unwrap();
    let mut paths: Vec<String> = doc
        .items()
        .item_paths()
        .into_iter()
        .map(str::to_string)
        .collect();
    paths.sort();
    paths
}

#[test]
fn flatten_output_is_always_a_valid_key_body() {
    for name in ["My Groceries", "Q3 (draft) - v2", "ÀÉÎ õü", "a\tb", "__"] {
        let flat = flatten(name);
        assert_eq!(flatten(&flat), flat);
        if !flat.is_empty() {
            assert!(is_valid_file_key(&format!("{}.list", flat)), "{:?}", flat);
        }
    }
}

#[test]
fn new_list_starts_empty() {
    let tmp = TempDir::new().unwrap();
    let store = ListStore::new(tmp.path());
    let key = store.create("My Groceries").unwrap();
    assert_eq!(key.as_str(), "my_groceries");
    assert_eq!(
        fs::read_to_string(tmp.path().join("my_groceries.list")).unwrap(),
        "Name My Groceries\n\nBeginItems\nEndItems\n"
    );
    assert_eq!(store.open("my_groceries").unwrap().item_count(), 0);
}

#[test]
fn parse_builds_sublists() {
    let list = parse_list(GROCERIES, ColourMode::Random);
    let top: Vec<(&str, bool)> = list
        .items
        .iter()
        .map(|n| (n.name(), matches!(n, Node::Sublist(_))))
        .collect();
    assert_eq!(top, vec![("zebra", false), ("apple", false), ("fruit", true)]);

    let fruit: Vec<&str> = list
        .items
        .sublist("fruit")
        .unwrap()
        .children
        .iter()
        .map(Node::name)
        .collect();
    assert_eq!(fruit, vec!["banana", "apple"]);
    assert_eq!(list.item_count(), 4);
}

#[test]
fn add_item_sorts_whole_lines() {
    let (_tmp, store) = store_with_groceries();
    let doc = store
        .open("groceries")
        .unwrap()
        .add_item("fruit:cherry")
        .unwrap()
        .reload()
        .unwrap();

    assert_eq!(
        item_region(&store, "groceries"),
        vec![
            "Item apple",
            "Item fruit:apple",
            "Item fruit:banana",
            "Item fruit:cherry",
            "Item zebra",
        ]
    );
    let fruit = doc.items().sublist("fruit").unwrap();
    assert_eq!(fruit.children.as_slice()[2].name(), "cherry");
}

#[test]
fn remove_item_drops_exactly_one() {
    let (_tmp, store) = store_with_groceries();
    let doc = store.open("groceries").unwrap();
    let count = doc.item_count();
    let banana = doc.items().sublist("fruit").unwrap().children.as_slice()[0]
        .item_ref()
        .unwrap();

    let doc = doc.remove_item(&banana).unwrap().reload().unwrap();
    assert_eq!(doc.item_count(), count - 1);
    assert_eq!(
        item_region(&store, "groceries"),
        vec!["Item zebra", "Item apple", "Item fruit:apple"]
    );
}

#[test]
fn no_op_mutation_round_trip() {
    let (_tmp, store) = store_with_groceries();
    let before = sorted_paths(&store, "groceries");

    let doc = store.open("groceries").unwrap();
    let name = doc.name().to_string();
    let count = doc.item_count();
    let first = doc.items().as_slice()[0].item_ref().unwrap();
    let path = first.expected.clone().unwrap();
    let doc = doc.alter_item(&first, &path).unwrap().reload().unwrap();

    assert_eq!(doc.name(), name);
    assert_eq!(doc.item_count(), count);
    assert_eq!(sorted_paths(&store, "groceries"), before);

    // The rewritten file is now in canonical form
    let text = fs::read_to_string(store.dir().join("groceries.list")).unwrap();
    assert_eq!(serialize_list(doc.list()), text);
}

#[test]
fn create_over_existing_key_is_refused() {
    let (tmp, store) = store_with_groceries();
    let before = fs::read(tmp.path().join("groceries.list")).unwrap();

    let err = store.create("GROCERIES").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read(tmp.path().join("groceries.list")).unwrap(), before);
}

#[test]
fn stale_line_numbers_are_caught() {
    let (_tmp, store) = store_with_groceries();
    let doc = store.open("groceries").unwrap();
    let zebra = doc.items().as_slice()[0].item_ref().unwrap();

    // Keep using the old reference after the file has been re-sorted
    let doc = doc.add_item("kiwi").unwrap().reload().unwrap();
    let err = doc.alter_item(&zebra, "zebu").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleReference);

    // A fresh reference works
    let doc = store.open("groceries").unwrap();
    let zebra = doc
        .items()
        .iter()
        .find(|n| n.name() == "zebra")
        .and_then(Node::item_ref)
        .unwrap();
    let doc = doc.alter_item(&zebra, "zebu").unwrap().reload().unwrap();
    assert!(doc.items().iter().any(|n| n.name() == "zebu"));
}
