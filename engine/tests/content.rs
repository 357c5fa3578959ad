use std::path::Path;

use combat_engine::content::{
    builtin_character, builtin_characters, builtin_enemies, builtin_enemy, load_enemy,
    parse_enemy, ContentError, Format,
};
use combat_engine::{Combatant, Tactics};

#[test]
fn every_builtin_enemy_parses() {
    for id in builtin_enemies().keys() {
        let enemy = builtin_enemy(id).unwrap();
        assert!(enemy.maximum_life_points() > 0, "{id}");
        assert_eq!(enemy.current_life_points(), enemy.maximum_life_points());
    }
}

#[test]
fn every_builtin_character_parses() {
    for id in builtin_characters().keys() {
        builtin_character(id).unwrap();
    }
}

#[test]
fn builtins_keep_their_listing_order() {
    let ids: Vec<_> = builtin_enemies().keys().copied().collect();
    assert_eq!(ids, vec!["goblin", "bog_witch", "cave_troll"]);
}

#[test]
fn wanderer_gets_equipment_bonuses() {
    let wanderer = builtin_character("wanderer").unwrap();
    assert_eq!(wanderer.attack_value(), 7);
    assert_eq!(wanderer.defense_value(), 6);
    assert_eq!(wanderer.luck_modifier(), 1);
}

#[test]
fn unknown_builtin_is_an_error() {
    let err = builtin_enemy("dragon").unwrap_err();
    assert!(matches!(err, ContentError::UnknownBuiltin { kind: "enemy", .. }));
    assert_eq!(err.to_string(), "unknown builtin enemy 'dragon'");
}

#[test]
fn yaml_enemies_parse() {
    let yaml = "
name: Marsh Wisp
ratings:
  attack: 1
  defense: 3
  magic: 6
  initiative: 7
life:
  maximum: 6
power:
  maximum: 8
spells:
  - name: Glimmer
    damage_multiplier: 1.5
    power_cost: 2
tactics: opportunist
";
    let wisp = parse_enemy("wisp", yaml, Format::Yaml).unwrap();
    assert_eq!(wisp.tactics, Tactics::Opportunist);
    assert_eq!(wisp.spells.len(), 1);
    assert_eq!(wisp.current_power_points(), 8);
}

#[test]
fn non_positive_life_is_rejected() {
    let json = r#"{ "name": "Ghost", "ratings": {}, "life": { "maximum": 0 }, "power": { "maximum": 0 } }"#;
    let err = parse_enemy("ghost", json, Format::Json).unwrap_err();
    assert!(matches!(err, ContentError::Invalid { .. }));
}

#[test]
fn bad_spell_is_rejected() {
    let json = r#"{
        "name": "Imp", "ratings": {}, "life": { "maximum": 4 }, "power": { "maximum": 4 },
        "spells": [ { "name": "Fizzle", "damage_multiplier": 0.0, "power_cost": 1 } ]
    }"#;
    assert!(matches!(
        parse_enemy("imp", json, Format::Json),
        Err(ContentError::Invalid { .. })
    ));
}

#[test]
fn malformed_json_reports_label() {
    let err = parse_enemy("broken.json", "{", Format::Json).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse JSON broken.json"));
}

#[test]
fn loads_from_content_dir() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("content/enemies/cave_troll.json");
    let troll = load_enemy(&path).unwrap();
    assert_eq!(troll.name, "Cave Troll");
    assert_eq!(Format::from_path(Path::new("a/b.YML")), Format::Yaml);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_enemy(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, ContentError::Io { .. }));
}
