//! Integrationstests der Editier-Befehle: Einfügen, Aktualisieren mit
//! Klemmen, Löschen mit Bestätigung, Rollback bei Provider-Fehlern.

use glam::DVec2;
use linref_engine::core::records::AttrValue;
use linref_engine::host::VectorLayerPort;
use linref_engine::{
    AppController, AppIntent, Capabilities, Crs, EngineState, Feature, FieldDef, FieldType,
    FieldValue, KeyModifiers, MemoryHost, MemoryLayer, MessageLevel, MouseButton,
    PendingEditsChoice, PolMode, ReferenceGeometry, ToolKind,
};

fn setup() -> (AppController, EngineState, MemoryHost) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));

    let mut ref_layer = MemoryLayer::new(
        "ref_layer",
        "Bezugslinien",
        Crs::projected("EPSG:25832"),
        vec![FieldDef {
            name: "id".to_string(),
            field_type: FieldType::Int64,
        }],
        Capabilities::READ_ONLY,
    );
    ref_layer.seed_feature(
        Feature::new(0)
            .with_attr("id", Some(AttrValue::Int(1)))
            .with_geometry(ReferenceGeometry::Single(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(100.0, 100.0),
            ])),
    );
    host.add_layer(ref_layer);

    host.add_layer(MemoryLayer::new(
        "pol_data",
        "PoL-Daten",
        Crs::projected("EPSG:25832"),
        vec![
            FieldDef {
                name: "fid".to_string(),
                field_type: FieldType::Int64,
            },
            FieldDef {
                name: "line_ref_id".to_string(),
                field_type: FieldType::Int64,
            },
            FieldDef {
                name: "measure".to_string(),
                field_type: FieldType::Double,
            },
        ],
        Capabilities::FULL,
    ));

    let mut state = EngineState::new();
    let mut controller = AppController::new();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::ReferenceLayerBound {
                tool: ToolKind::Pol,
                layer_id: "ref_layer".to_string(),
                id_field: "id".to_string(),
            },
        )
        .unwrap();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::PolDataLayerBound {
                layer_id: "pol_data".to_string(),
                pk_field: "fid".to_string(),
                ref_field: "line_ref_id".to_string(),
                m_field: "measure".to_string(),
            },
        )
        .unwrap();
    (controller, state, host)
}

fn measure_at(
    controller: &mut AppController,
    state: &mut EngineState,
    host: &mut MemoryHost,
    x: f64,
    y: f64,
) {
    if state.pol.mode == PolMode::AfterMeasure {
        controller
            .handle_intent(
                state,
                host,
                AppIntent::ResumeRequested {
                    tool: ToolKind::Pol,
                },
            )
            .unwrap();
    }
    controller
        .handle_intent(
            state,
            host,
            AppIntent::CanvasPressed {
                tool: ToolKind::Pol,
                pos: DVec2::new(x, y),
                button: MouseButton::Left,
                modifiers: KeyModifiers::NONE,
            },
        )
        .expect("Messen sollte funktionieren");
    assert_eq!(state.pol.mode, PolMode::AfterMeasure);
}

fn insert(controller: &mut AppController, state: &mut EngineState, host: &mut MemoryHost) {
    controller
        .handle_intent(
            state,
            host,
            AppIntent::InsertRequested {
                tool: ToolKind::Pol,
            },
        )
        .expect("Einfügen sollte funktionieren");
}

#[test]
fn insert_writes_row_and_selects_it() {
    let (mut controller, mut state, mut host) = setup();
    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    let layer = host.memory_layer("pol_data").unwrap();
    let features = layer.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].key_value("fid"), Some(FieldValue::Int(1)));
    assert_eq!(
        features[0].key_value("line_ref_id"),
        Some(FieldValue::Int(1))
    );
    assert_eq!(features[0].number("measure"), Some(50.0));

    // Arbeits-Selektion und edit_pk zeigen auf den neuen Datensatz
    assert!(state.pol.selection.contains(&FieldValue::Int(1)));
    assert_eq!(state.pol.edit_pk, Some(FieldValue::Int(1)));
    assert_eq!(host.form.opened_forms, 1);
}

#[test]
fn insert_auto_increments_integer_pk() {
    let (mut controller, mut state, mut host) = setup();
    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    measure_at(&mut controller, &mut state, &mut host, 80.0, 1.0);
    insert(&mut controller, &mut state, &mut host);

    let layer = host.memory_layer("pol_data").unwrap();
    let features = layer.features();
    assert_eq!(features.len(), 2);
    let pks: Vec<_> = features.iter().map(|f| f.key_value("fid")).collect();
    assert!(pks.contains(&Some(FieldValue::Int(1))));
    assert!(pks.contains(&Some(FieldValue::Int(2))));
}

#[test]
fn cancelled_form_rolls_back_insert() {
    let (mut controller, mut state, mut host) = setup();
    host.form.confirm_feature_forms = false;

    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    let layer = host.memory_layer("pol_data").unwrap();
    assert!(layer.features().is_empty());
    assert!(!layer.is_editing());
    assert!(host.messages.contains("abgebrochen"));
    assert!(state.pol.selection.is_empty());
}

#[test]
fn failed_commit_rolls_back_and_reports_critical() {
    let (mut controller, mut state, mut host) = setup();
    host.memory_layer_mut("pol_data").unwrap().fail_next_commit = true;

    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    let layer = host.memory_layer("pol_data").unwrap();
    assert!(layer.features().is_empty());
    assert!(!layer.is_editing());
    assert_eq!(host.messages.count_of(MessageLevel::Critical), 1);
    assert!(state.pol.selection.is_empty());
}

#[test]
fn update_clamps_out_of_range_measure_with_message() {
    let (mut controller, mut state, mut host) = setup();
    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    // Dialog-Eingabe weit außerhalb der Linienlänge 200
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::MeasureEdited {
                tool: ToolKind::Pol,
                target: linref_engine::MeasureTarget::From,
                value: 1000.0,
            },
        )
        .unwrap();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::UpdateRequested {
                tool: ToolKind::Pol,
            },
        )
        .unwrap();

    let layer = host.memory_layer("pol_data").unwrap();
    let features = layer.features();
    assert_eq!(features[0].number("measure"), Some(200.0));
    assert!(host.messages.contains("geklemmt"));
}

#[test]
fn delete_requires_confirmation() {
    let (mut controller, mut state, mut host) = setup();
    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    // Erste Anfrage abgelehnt
    host.form.confirm_answer = false;
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::DeleteRequested {
                tool: ToolKind::Pol,
            },
        )
        .unwrap();
    assert_eq!(host.memory_layer("pol_data").unwrap().features().len(), 1);

    // Zweite Anfrage bestätigt
    host.form.confirm_answer = true;
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::DeleteRequested {
                tool: ToolKind::Pol,
            },
        )
        .unwrap();
    assert!(host.memory_layer("pol_data").unwrap().features().is_empty());
    assert!(state.pol.selection.is_empty());
    assert_eq!(state.pol.edit_pk, None);
    assert_eq!(state.pol.mode, PolMode::Measuring);
}

#[test]
fn pending_foreign_edits_are_resolved_before_insert() {
    let (mut controller, mut state, mut host) = setup();

    // Fremde Edit-Session mit offener Änderung
    {
        let layer = host.memory_layer_mut("pol_data").unwrap();
        layer.start_edit().unwrap();
        layer
            .add_feature(
                Feature::new(0)
                    .with_attr("fid", Some(AttrValue::Int(99)))
                    .with_attr("line_ref_id", Some(AttrValue::Int(1)))
                    .with_attr("measure", Some(AttrValue::Real(10.0))),
            )
            .unwrap();
    }
    host.form.pending_edits_choice = PendingEditsChoice::Rollback;

    measure_at(&mut controller, &mut state, &mut host, 50.0, 2.0);
    insert(&mut controller, &mut state, &mut host);

    // Fremde Änderung verworfen, eigener Datensatz geschrieben
    let layer = host.memory_layer("pol_data").unwrap();
    let features = layer.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].number("measure"), Some(50.0));
}

#[test]
fn insert_without_measure_warns() {
    let (mut controller, mut state, mut host) = setup();
    insert(&mut controller, &mut state, &mut host);

    assert!(host.messages.count_of(MessageLevel::Warning) >= 1);
    assert!(host.memory_layer("pol_data").unwrap().features().is_empty());
}
