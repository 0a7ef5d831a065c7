use endtally_game::{
    DEFAULT_SAVE_KEY, Game, MemoryStorage, ScoreEngine, ScoreError, Side,
};

#[test]
fn saved_game_reloads_with_history() {
    let storage = MemoryStorage::new();
    let engine = ScoreEngine::new(storage.clone());
    let mut session = engine.open_session(DEFAULT_SAVE_KEY).unwrap();
    session.record_end(5, Side::A).unwrap();
    session.record_end(3, Side::B).unwrap();
    session.correct_end(1, Side::B, 7).unwrap();
    let game = session.into_game();
    engine.save(DEFAULT_SAVE_KEY, &game).unwrap();

    let raw = storage.raw(DEFAULT_SAVE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["scores"], serde_json::json!([5, -7]));
    assert_eq!(value["editLog"], serde_json::json!([[1, -3, -7]]));
    assert_eq!(value["id"], serde_json::json!(game.id()));

    let reloaded = engine.load(DEFAULT_SAVE_KEY).unwrap();
    assert_eq!(reloaded, game);
    assert_eq!(reloaded.totals(), game.totals());
}

#[test]
fn legacy_save_is_upgraded_on_load() {
    let storage = MemoryStorage::new();
    storage.insert_raw(
        DEFAULT_SAVE_KEY,
        r#"{"gameID":"1b4e28ba-2fa1-4d2b-883f-0016d3cca427","date":1650000000000,"scores":[3,-1,0,2],"logs":[[2,-4,-1]]}"#,
    );
    let engine = ScoreEngine::new(storage.clone());
    let game = engine.load_or_create(DEFAULT_SAVE_KEY).unwrap();
    assert_eq!(game.id(), "1b4e28ba-2fa1-4d2b-883f-0016d3cca427");
    assert_eq!(game.edit_log().entries()[0].end_index, 1);

    engine.save(DEFAULT_SAVE_KEY, &game).unwrap();
    let raw = storage.raw(DEFAULT_SAVE_KEY).unwrap();
    assert!(raw.contains("\"createdAt\":1650000000000"));
    assert!(!raw.contains("gameID"));
}

#[test]
fn unreadable_save_is_a_persistence_failure() {
    let storage = MemoryStorage::new();
    storage.insert_raw("broken", r#"{"id":"x","createdAt":1,"scores":[1],"editLog":[[4,0,1]]}"#);
    let engine = ScoreEngine::new(storage);
    assert!(matches!(
        engine.load_or_create("broken"),
        Err(ScoreError::PersistenceFailure(_))
    ));
}

#[test]
fn keys_hold_independent_games() {
    let engine = ScoreEngine::new(MemoryStorage::new());
    let mut first = Game::new("first", 1);
    first.record_end(1, Side::A).unwrap();
    let mut second = Game::new("second", 2);
    second.record_end(2, Side::B).unwrap();
    engine.save("sheet-1", &first).unwrap();
    engine.save("sheet-2", &second).unwrap();

    assert_eq!(engine.load("sheet-1").unwrap().id(), "first");
    assert_eq!(engine.load("sheet-2").unwrap().totals().side_b, 2);

    let fresh = engine.reset("sheet-1").unwrap();
    assert_eq!(fresh.ends(), 0);
    assert!(matches!(
        engine.load("sheet-1"),
        Err(ScoreError::NotFound { .. })
    ));
    assert_eq!(engine.load("sheet-2").unwrap().id(), "second");
}
