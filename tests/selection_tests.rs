//! Integrationstests der Arbeits-Selektion: Rechteck-Selektion mit
//! Modifikatoren, Deduplikation, stilles Entfernen ungültiger Einträge.

use glam::DVec2;
use linref_engine::core::records::AttrValue;
use linref_engine::{
    AppController, AppIntent, Capabilities, Crs, EngineState, Feature, FieldDef, FieldType,
    FieldValue, KeyModifiers, MemoryHost, MemoryLayer, MouseButton, PolMode, ReferenceGeometry,
    ToolKind,
};

/// Bezugslinie 1 (Länge 200) plus drei PoL-Zeilen:
/// pk 1 bei m=25, pk 2 bei m=75, pk 3 mit nicht auflösbarer ref_id.
fn setup() -> (AppController, EngineState, MemoryHost) {
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

    let mut data = MemoryLayer::new(
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
    );
    for (pk, ref_id, m) in [(1, 1, 25.0), (2, 1, 75.0), (3, 999, 10.0)] {
        data.seed_feature(
            Feature::new(0)
                .with_attr("fid", Some(AttrValue::Int(pk)))
                .with_attr("line_ref_id", Some(AttrValue::Int(ref_id)))
                .with_attr("measure", Some(AttrValue::Real(m))),
        );
    }
    host.add_layer(data);

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
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SelectFeaturesToggled {
                tool: ToolKind::Pol,
                active: true,
            },
        )
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::SelectFeatures);
    (controller, state, host)
}

fn rect_select(
    controller: &mut AppController,
    state: &mut EngineState,
    host: &mut MemoryHost,
    a: DVec2,
    b: DVec2,
    modifiers: KeyModifiers,
) {
    controller
        .handle_intent(
            state,
            host,
            AppIntent::CanvasPressed {
                tool: ToolKind::Pol,
                pos: a,
                button: MouseButton::Left,
                modifiers,
            },
        )
        .unwrap();
    controller
        .handle_intent(
            state,
            host,
            AppIntent::CanvasReleased {
                tool: ToolKind::Pol,
                pos: b,
                button: MouseButton::Left,
                modifiers,
            },
        )
        .unwrap();
}

fn selected(state: &EngineState) -> Vec<FieldValue> {
    state.pol.selection.iter().cloned().collect()
}

#[test]
fn rect_without_modifier_replaces_selection() {
    let (mut controller, mut state, mut host) = setup();
    state.pol.selection.insert(FieldValue::Int(2));

    // Rechteck nur um den Show-Punkt (25, 0)
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::NONE,
    );
    assert_eq!(selected(&state), vec![FieldValue::Int(1)]);
}

#[test]
fn shift_adds_and_ctrl_removes() {
    let (mut controller, mut state, mut host) = setup();

    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::NONE,
    );
    // Shift: zweiten Punkt (75, 0) ergänzen
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(60.0, -5.0),
        DVec2::new(90.0, 5.0),
        KeyModifiers::SHIFT,
    );
    assert_eq!(
        selected(&state),
        vec![FieldValue::Int(1), FieldValue::Int(2)]
    );

    // Ctrl: ersten Punkt wieder entfernen
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::CTRL,
    );
    assert_eq!(selected(&state), vec![FieldValue::Int(2)]);
}

#[test]
fn selection_is_deduplicated() {
    let (mut controller, mut state, mut host) = setup();

    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::NONE,
    );
    // Shift über dasselbe Rechteck: kein Duplikat
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::SHIFT,
    );
    assert_eq!(selected(&state), vec![FieldValue::Int(1)]);
}

#[test]
fn invalid_rows_are_dropped_silently_with_summary() {
    let (mut controller, mut state, mut host) = setup();

    // pk 3 (ref_id 999) von Hand in die Selektion legen
    state.pol.selection.insert(FieldValue::Int(3));
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(0.0, -5.0),
        DVec2::new(50.0, 5.0),
        KeyModifiers::SHIFT,
    );

    assert_eq!(
        selected(&state),
        vec![FieldValue::Int(1)],
        "nicht auflösbare Zeile fliegt still raus"
    );
    assert!(host.messages.contains("Arbeits-Selektion"));
}

#[test]
fn row_with_out_of_range_measure_stays_selectable() {
    let (mut controller, mut state, mut host) = setup();

    // Zeile mit m außerhalb der Linienlänge: markiert, aber nicht verworfen
    host.memory_layer_mut("pol_data").unwrap().seed_feature(
        Feature::new(0)
            .with_attr("fid", Some(AttrValue::Int(4)))
            .with_attr("line_ref_id", Some(AttrValue::Int(1)))
            .with_attr("measure", Some(AttrValue::Real(1000.0))),
    );

    // Abgeleitete Geometrie klemmt auf das Linienende (100, 100)
    rect_select(
        &mut controller,
        &mut state,
        &mut host,
        DVec2::new(95.0, 95.0),
        DVec2::new(105.0, 105.0),
        KeyModifiers::NONE,
    );
    assert_eq!(selected(&state), vec![FieldValue::Int(4)]);
}

#[test]
fn leaving_select_mode_returns_to_measuring() {
    let (mut controller, mut state, mut host) = setup();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SelectFeaturesToggled {
                tool: ToolKind::Pol,
                active: false,
            },
        )
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::Measuring);
}
