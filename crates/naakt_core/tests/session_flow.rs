use naakt_core::{
    pattern_catalog, ColorSlot, HexColor, InMemoryDocument, JsonTaxonomyRepository,
    NamingSession, ProvisionError, SessionError, SessionState, TaxonomyStore,
    INCOMPLETE_PREVIEW,
};
use std::path::Path;

fn seeded_session(dir: &Path) -> NamingSession<JsonTaxonomyRepository> {
    std::fs::write(
        dir.join("names.json"),
        r#"{"beschrijving": "Geldige NAA.K.T. NAMEN", "namen": ["hout", "beton"]}"#,
    )
    .expect("fixture should be written");
    std::fs::write(
        dir.join("attributes.json"),
        r#"{"kenmerken_per_naam": {"beton": ["prefab", "generiek", "ntb"], "hout": ["eiken"]}}"#,
    )
    .expect("fixture should be written");
    std::fs::write(
        dir.join("applications.json"),
        r#"{"toepassingen_per_naam": {"beton": ["wand", "vloer"], "hout": ["kozijn", "generiek"]}}"#,
    )
    .expect("fixture should be written");
    let (store, report) = TaxonomyStore::open(JsonTaxonomyRepository::in_dir(dir));
    assert!(report.is_clean());
    NamingSession::start(store)
}

#[test]
fn start_selects_first_name_and_preferred_members() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let session = seeded_session(dir.path());

    assert_eq!(session.selected_name(), Some("beton"));
    assert_eq!(session.attribute_choices(), ["generiek", "ntb", "prefab"]);
    assert_eq!(session.selected_attribute(), Some("generiek"));
    // no "generiek" application for beton: first sorted entry wins
    assert_eq!(session.selected_application(), Some("vloer"));
    assert_eq!(session.state(), SessionState::ReadyToCreate);
}

#[test]
fn switching_name_refreshes_choices() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut session = seeded_session(dir.path());
    session.select_name("hout").expect("select_name should succeed");

    assert_eq!(session.attribute_choices(), ["eiken"]);
    assert_eq!(session.selected_attribute(), Some("eiken"));
    assert_eq!(session.selected_application(), Some("generiek"));
    assert!(session.select_name("zink").is_err());
}

#[test]
fn preview_shows_placeholder_until_complete() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut session = seeded_session(dir.path());
    session.select_name("beton").expect("select_name should succeed");
    session.select_attribute("prefab").expect("select_attribute should succeed");
    session.select_application("wand").expect("select_application should succeed");
    session.set_free_text("  Glad Afgewerkt ");

    let composed = session.composed();
    assert_eq!(composed.preview_text(), "beton_prefab_wand_glad_afgewerkt");
    assert_eq!(
        session.copy_text().expect("copy_text should succeed"),
        "beton_prefab_wand_glad_afgewerkt"
    );

    let dir = tempfile::tempdir().expect("tempdir should be created");
    let (store, _) = TaxonomyStore::open(JsonTaxonomyRepository::in_dir(dir.path()));
    let idle = NamingSession::start(store);
    assert_eq!(idle.composed().preview_text(), INCOMPLETE_PREVIEW);
}

#[test]
fn create_material_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut session = seeded_session(dir.path());
    let mut doc = InMemoryDocument::new();
    doc.add_fill_pattern("Solid fill", true);
    doc.add_fill_pattern("Beton", false);
    doc.add_material("Generic");
    doc.add_material("Beton - prefab");

    let catalog = pattern_catalog(&doc).expect("pattern_catalog should succeed");
    session.apply_default_patterns(&catalog);
    session.select_patterns(&catalog, "Beton", "Solid fill");
    let light = HexColor::parse("#DDDDDD").expect("color literal should parse");
    session.set_color(ColorSlot::SurfaceBackground, light);
    session.select_application("wand").expect("select_application should succeed");

    let plan = session.plan_material(&mut doc).expect("plan_material should succeed");
    assert_eq!(plan.source.name, "Beton - prefab");
    assert_eq!(plan.new_name, "beton_generiek_wand");

    let report = session.create_material(&mut doc).expect("create_material should succeed");
    let created = doc.material(report.material).expect("material should exist");
    assert_eq!(created.name, "beton_generiek_wand");
    assert_eq!(
        created.slot(ColorSlot::SurfaceForeground).pattern,
        catalog.id_of("Beton")
    );
    assert_eq!(
        created.slot(ColorSlot::CutForeground).pattern,
        catalog.id_of("Solid fill")
    );
    assert_eq!(
        created.slot(ColorSlot::SurfaceBackground).color,
        Some(HexColor::rgb(0xDD, 0xDD, 0xDD))
    );

    let again = session
        .create_material(&mut doc)
        .expect_err("existing material should be rejected");
    assert!(matches!(
        again,
        SessionError::Provision(ProvisionError::AlreadyExists(_))
    ));
    assert_eq!(
        again.user_message(),
        "Materiaal 'beton_generiek_wand' bestaat al in het model."
    );
}

#[test]
fn added_entries_are_selected_and_persisted() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut session = seeded_session(dir.path());

    session.add_name("Kunststof").expect("add_name should succeed");
    assert_eq!(session.selected_name(), Some("kunststof"));
    session.add_attribute("PVC").expect("add_attribute should succeed");
    session.add_application("Riool").expect("add_application should succeed");
    assert_eq!(
        session.copy_text().expect("copy_text should succeed"),
        "kunststof_pvc_riool"
    );

    let dup = session.add_attribute("pvc").expect_err("duplicate attribute should be rejected");
    assert_eq!(dup.user_message(), "KENMERK bestaat al of is ongeldig.");

    let (reloaded, _) = TaxonomyStore::open(JsonTaxonomyRepository::in_dir(dir.path()));
    assert_eq!(reloaded.names(), vec!["beton", "hout", "kunststof"]);
    assert_eq!(
        reloaded.attributes_for("kunststof"),
        vec!["generiek", "ntb", "pvc"]
    );
}
