use super::*;

const JSON: &str = r#"{
  "台灣": [
    {"name": "全台", "url": "maps/tw.png"},
    {"name": "台北", "url": "maps/tpe.png"}
  ],
  "Asia": [{"name": "Japan", "url": "maps/jp.png"}],
  "空": []
}"#;

#[test]
fn keeps_file_order_of_categories() {
    let catalog = MapCatalog::from_json(JSON).unwrap();
    let cats: Vec<&str> = catalog.categories().collect();
    assert_eq!(cats, vec!["台灣", "Asia", "空"]);
    assert_eq!(catalog.first_category(), Some("台灣"));
}

#[test]
fn lists_and_finds_maps() {
    let catalog = MapCatalog::from_json(JSON).unwrap();
    assert_eq!(catalog.maps_in("台灣").len(), 2);
    assert_eq!(catalog.maps_in("台灣")[1].name, "台北");
    assert!(catalog.maps_in("空").is_empty());
    assert!(catalog.maps_in("missing").is_empty());

    let (cat, entry) = catalog.find("maps/jp.png").unwrap();
    assert_eq!(cat, "Asia");
    assert_eq!(entry.name, "Japan");
    assert!(catalog.find("maps/none.png").is_none());
}

#[test]
fn empty_catalog_has_no_first_category() {
    let catalog = MapCatalog::from_json("{}").unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.first_category(), None);
}

#[test]
fn rejects_malformed_catalogs() {
    for bad in [
        "[]",
        r#"{"a": [{"name": "x"}]}"#,
        r#"{"a": [], "a": []}"#,
    ] {
        let err = MapCatalog::from_json(bad).unwrap_err();
        assert!(err.to_string().contains("invalid map catalog"), "{bad}: {err}");
    }
}

#[test]
fn serializes_in_the_same_order() {
    let catalog = MapCatalog::from_json(JSON).unwrap();
    let json = serde_json::to_string(&catalog).unwrap();
    let again = MapCatalog::from_json(&json).unwrap();
    assert_eq!(again, catalog);
    assert!(json.find("台灣").unwrap() < json.find("Asia").unwrap());
}
