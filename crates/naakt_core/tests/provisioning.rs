use naakt_core::{
    find_closest, pattern_catalog, ColorSlot, Fault, HexColor, HostDocument, HostError,
    InMemoryDocument, MaterialProvisioner, PresentationConfig, ProvisionError,
};

fn document() -> InMemoryDocument {
    let mut doc = InMemoryDocument::new();
    doc.add_fill_pattern("<Solid fill>", true);
    doc.add_fill_pattern("Beton", false);
    doc.add_fill_pattern("Hout - langs", false);
    doc.add_material("Staal");
    doc.add_material("Houten kozijn");
    doc.add_material_with_asset("Hout", "Hout render");
    doc
}

#[test]
fn matcher_prefers_exact_over_prefix_over_none() {
    let doc = document();
    let materials = doc.materials().expect("materials should succeed");
    let found = find_closest("hout", &materials).expect("a candidate should match");
    assert_eq!(found.candidate.name, "Hout");
    assert_eq!(found.score, 10);
}

#[test]
fn matcher_reports_no_match_for_empty_document() {
    let doc = InMemoryDocument::new();
    let materials = doc.materials().expect("materials should succeed");
    assert!(find_closest("hout", &materials).is_none());
}

#[test]
fn create_duplicates_source_and_applies_presentation() {
    let mut doc = document();
    let catalog = pattern_catalog(&doc).expect("pattern_catalog should succeed");
    let mut presentation = PresentationConfig::default();
    presentation.surface_pattern = catalog.id_of("Hout - langs");
    presentation.set_color(ColorSlot::CutForeground, HexColor::rgb(0x35, 0x0E, 0x35));

    let report = MaterialProvisioner::new(&mut doc)
        .create("hout", "hout_eiken_vloer", &presentation)
        .expect("create should succeed");
    assert_eq!(report.source_name, "Hout");
    assert!(report.asset_duplicated);
    assert!(report.diagnostics.is_empty());

    let created = doc.material_by_name("hout_eiken_vloer").expect("material should exist");
    let asset = created.appearance_asset.expect("copy should carry an asset");
    assert_eq!(doc.asset_name(asset), Some("hout_eiken_vloer"));

    let surface_fg = created.slot(ColorSlot::SurfaceForeground);
    assert_eq!(surface_fg.pattern, catalog.id_of("Hout - langs"));
    assert_eq!(surface_fg.color, Some(HexColor::rgb(0x32, 0x32, 0x32)));

    for slot in [ColorSlot::SurfaceBackground, ColorSlot::CutBackground] {
        assert_eq!(created.slot(slot).pattern, catalog.solid);
    }
    assert_eq!(created.slot(ColorSlot::CutForeground).pattern, None);
    assert_eq!(
        created.slot(ColorSlot::CutForeground).color,
        Some(HexColor::rgb(0x35, 0x0E, 0x35))
    );
    assert_eq!(
        created.slot(ColorSlot::CutBackground).color,
        Some(HexColor::rgb(0xB4, 0xB4, 0xB4))
    );
    assert_eq!(doc.committed_transactions(), ["NAA.K.T. Materiaal aanmaken"]);
}

#[test]
fn existing_name_is_rejected_before_any_mutation() {
    let mut doc = document();
    doc.add_material("beton_generiek_wand");
    let before = doc.material_count();

    let err = MaterialProvisioner::new(&mut doc)
        .create("beton", "beton_generiek_wand", &PresentationConfig::default())
        .expect_err("create should be rejected");
    assert_eq!(
        err,
        ProvisionError::AlreadyExists("beton_generiek_wand".to_string())
    );
    assert_eq!(doc.material_count(), before);
    assert!(!doc.in_transaction());
    assert!(doc.committed_transactions().is_empty());
}

#[test]
fn name_check_is_case_sensitive() {
    let mut doc = document();
    doc.add_material("Beton_Generiek_Wand");
    let report = MaterialProvisioner::new(&mut doc)
        .create("beton", "beton_generiek_wand", &PresentationConfig::default())
        .expect("create should succeed");
    assert_eq!(report.name, "beton_generiek_wand");
}

#[test]
fn empty_document_has_no_source() {
    let mut doc = InMemoryDocument::new();
    let err = MaterialProvisioner::new(&mut doc)
        .create("beton", "beton_generiek_wand", &PresentationConfig::default())
        .expect_err("create should be rejected");
    assert_eq!(err, ProvisionError::NoSourceMaterial);
    assert_ne!(err.user_message(), ProvisionError::AlreadyExists(String::new()).user_message());
}

#[test]
fn failure_mid_duplication_rolls_back() {
    let mut doc = document();
    let materials_before = doc.material_count();
    let assets_before = doc.asset_count();
    doc.inject_fault(Fault::SetPatternColor);

    let err = MaterialProvisioner::new(&mut doc)
        .create("hout", "hout_generiek_vloer", &PresentationConfig::default())
        .expect_err("create should be rejected");
    assert!(matches!(err, ProvisionError::Host(HostError::Operation(_))));
    assert_eq!(doc.material_count(), materials_before);
    assert_eq!(doc.asset_count(), assets_before);
    assert!(doc.material_by_name("hout_generiek_vloer").is_none());
    assert!(!doc.in_transaction());
}

#[test]
fn failed_material_duplicate_leaves_document_unchanged() {
    let mut doc = document();
    let before = doc.material_count();
    doc.inject_fault(Fault::DuplicateMaterial);

    let err = MaterialProvisioner::new(&mut doc)
        .create("hout", "hout_generiek_vloer", &PresentationConfig::default())
        .expect_err("create should be rejected");
    assert!(matches!(err, ProvisionError::Host(_)));
    assert_eq!(doc.material_count(), before);
}

#[test]
fn asset_failure_is_tolerated_with_diagnostic() {
    let mut doc = document();
    doc.inject_fault(Fault::DuplicateAsset);

    let report = MaterialProvisioner::new(&mut doc)
        .create("hout", "hout_generiek_vloer", &PresentationConfig::default())
        .expect("create should succeed");
    assert!(!report.asset_duplicated);
    assert_eq!(report.diagnostics.len(), 1);

    let created = doc.material_by_name("hout_generiek_vloer").expect("material should exist");
    let source = doc.material_by_name("Hout").expect("material should exist");
    assert_eq!(created.appearance_asset, source.appearance_asset);
}

#[test]
fn missing_solid_pattern_keeps_background_patterns() {
    let mut doc = InMemoryDocument::new();
    doc.add_fill_pattern("Hatch", false);
    doc.add_material("Glas");

    let report = MaterialProvisioner::new(&mut doc)
        .create("glas", "glas_generiek_raam", &PresentationConfig::default())
        .expect("create should succeed");
    assert_eq!(report.diagnostics.len(), 1);
    let created = doc.material(report.material).expect("material should exist");
    assert_eq!(created.slot(ColorSlot::SurfaceBackground).pattern, None);
}

#[test]
fn provisioner_works_through_trait_objects() {
    let mut doc = document();
    let host: &mut dyn HostDocument = &mut doc;
    let plan = MaterialProvisioner::new(host)
        .plan("metaal", "metaal_generiek_kozijn")
        .expect("plan should succeed");
    assert_eq!(plan.source.name, "Staal");
    assert!(!plan.fallback_source);
}

#[test]
fn failed_asset_assignment_is_tolerated_with_diagnostic() {
    let mut doc = document();
    doc.inject_fault(Fault::SetAppearanceAsset);
    let materials_before = doc.material_count();

    let report = MaterialProvisioner::new(&mut doc)
        .create("hout", "hout_generiek_vloer", &PresentationConfig::default())
        .expect("asset assignment failure should not abort creation");
    assert!(!report.asset_duplicated);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(doc.material_count(), materials_before + 1);

    let created = doc
        .material_by_name("hout_generiek_vloer")
        .expect("material should be committed");
    let source = doc.material_by_name("Hout").expect("source should remain");
    assert_eq!(created.appearance_asset, source.appearance_asset);
    assert_eq!(doc.committed_transactions(), ["NAA.K.T. Materiaal aanmaken"]);
}
