//! Integrationstests der Mess-Abläufe: beide Werkzeuge werden über den
//! Controller gegen den In-Memory-Host getrieben.

use glam::DVec2;
use linref_engine::core::records::AttrValue;
use linref_engine::{
    AppController, AppIntent, Capabilities, Crs, EngineState, Feature, FieldDef, FieldType,
    FieldValue, KeyModifiers, LolMode, MemoryHost, MemoryLayer, MouseButton, PolMode,
    ReferenceGeometry, ToolKind,
};

fn ref_layer() -> MemoryLayer {
    let mut layer = MemoryLayer::new(
        "ref_layer",
        "Bezugslinien",
        Crs::projected("EPSG:25832"),
        vec![FieldDef {
            name: "id".to_string(),
            field_type: FieldType::Int64,
        }],
        Capabilities::READ_ONLY,
    );
    // Linie 1: L-Form, Gesamtlänge 200
    layer.seed_feature(
        Feature::new(0)
            .with_attr("id", Some(AttrValue::Int(1)))
            .with_geometry(ReferenceGeometry::Single(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(100.0, 100.0),
            ])),
    );
    // Linie 3: mehrteilig, wird markiert und nie stationiert
    layer.seed_feature(
        Feature::new(0)
            .with_attr("id", Some(AttrValue::Int(3)))
            .with_geometry(ReferenceGeometry::Multi(vec![
                vec![DVec2::new(0.0, 500.0), DVec2::new(50.0, 500.0)],
                vec![DVec2::new(60.0, 500.0), DVec2::new(90.0, 500.0)],
            ])),
    );
    layer
}

fn pol_data_layer() -> MemoryLayer {
    MemoryLayer::new(
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
    )
}

fn lol_data_layer() -> MemoryLayer {
    MemoryLayer::new(
        "lol_data",
        "LoL-Daten",
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
                name: "m_from".to_string(),
                field_type: FieldType::Double,
            },
            FieldDef {
                name: "m_to".to_string(),
                field_type: FieldType::Double,
            },
            FieldDef {
                name: "seg_offset".to_string(),
                field_type: FieldType::Double,
            },
        ],
        Capabilities::FULL,
    )
}

fn setup_pol() -> (AppController, EngineState, MemoryHost) {
    let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));
    host.add_layer(ref_layer());
    host.add_layer(pol_data_layer());

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
        .expect("Referenz binden sollte funktionieren");
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
        .expect("Daten binden sollte funktionieren");
    (controller, state, host)
}

fn setup_lol() -> (AppController, EngineState, MemoryHost) {
    let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));
    host.add_layer(ref_layer());
    host.add_layer(lol_data_layer());

    let mut state = EngineState::new();
    let mut controller = AppController::new();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::ReferenceLayerBound {
                tool: ToolKind::Lol,
                layer_id: "ref_layer".to_string(),
                id_field: "id".to_string(),
            },
        )
        .unwrap();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::LolDataLayerBound {
                layer_id: "lol_data".to_string(),
                pk_field: "fid".to_string(),
                ref_field: "line_ref_id".to_string(),
                m_from_field: "m_from".to_string(),
                m_to_field: "m_to".to_string(),
                offset_field: "seg_offset".to_string(),
            },
        )
        .unwrap();
    (controller, state, host)
}

fn press(tool: ToolKind, x: f64, y: f64) -> AppIntent {
    AppIntent::CanvasPressed {
        tool,
        pos: DVec2::new(x, y),
        button: MouseButton::Left,
        modifiers: KeyModifiers::NONE,
    }
}

fn release(tool: ToolKind, x: f64, y: f64) -> AppIntent {
    AppIntent::CanvasReleased {
        tool,
        pos: DVec2::new(x, y),
        button: MouseButton::Left,
        modifiers: KeyModifiers::NONE,
    }
}

fn moved(tool: ToolKind, x: f64, y: f64) -> AppIntent {
    AppIntent::CanvasMoved {
        tool,
        pos: DVec2::new(x, y),
    }
}

// ── PoL ─────────────────────────────────────────────────────────────

#[test]
fn binding_enables_measuring_and_configures_snapping() {
    let (_, state, host) = setup_pol();
    assert_eq!(state.pol.mode, PolMode::Measuring);
    assert!(host.snapping_configured_for("ref_layer"));
    assert_eq!(state.pol.subscriptions.len(), 2);
}

#[test]
fn hover_reports_snapped_measure() {
    let (mut controller, mut state, mut host) = setup_pol();

    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Pol, 50.0, 2.0))
        .unwrap();

    let hover = state.pol.hover.as_ref().expect("Hover-Feedback erwartet");
    assert_eq!(hover.ref_id, FieldValue::Int(1));
    assert!((hover.m - 50.0).abs() < 1e-9);
    assert_eq!(hover.ref_point, DVec2::new(50.0, 0.0));
}

#[test]
fn click_locks_measure_at_snapped_station() {
    let (mut controller, mut state, mut host) = setup_pol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 50.0, 2.0))
        .unwrap();

    assert_eq!(state.pol.mode, PolMode::AfterMeasure);
    let measure = state.pol.measure.as_ref().expect("Messung erwartet");
    assert_eq!(measure.ref_id, FieldValue::Int(1));
    assert!((measure.m - 50.0).abs() < 1e-9);
}

#[test]
fn click_outside_tolerance_does_not_lock() {
    let (mut controller, mut state, mut host) = setup_pol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 50.0, 30.0))
        .unwrap();

    assert_eq!(state.pol.mode, PolMode::Measuring);
    assert!(state.pol.measure.is_none());
}

#[test]
fn click_after_measure_returns_to_measuring() {
    let (mut controller, mut state, mut host) = setup_pol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 50.0, 2.0))
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::AfterMeasure);

    // Klick abseits des Mess-Punkts: zurück nach Measuring
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 20.0, 30.0))
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::Measuring);
    assert!(state.pol.measure.is_none());
}

#[test]
fn dragging_the_handle_updates_measure_live() {
    let (mut controller, mut state, mut host) = setup_pol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 50.0, 2.0))
        .unwrap();
    // Griff packen (innerhalb der Griff-Toleranz)
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 52.0, 1.0))
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::BeforeMovePoint);

    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Pol, 80.0, 10.0))
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::MovePoint);
    assert!((state.pol.measure.as_ref().unwrap().m - 80.0).abs() < 1e-9);

    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Pol, 80.0, 10.0))
        .unwrap();
    assert_eq!(state.pol.mode, PolMode::AfterMeasure);
}

#[test]
fn multipart_reference_is_reported_once() {
    let (mut controller, mut state, mut host) = setup_pol();

    let count = host.messages.entries.iter().filter(|(_, t)| t.contains("Mehrteilige")).count();
    assert_eq!(count, 1, "eine Meldung pro Feature");

    // Erneuter Check erzeugt keine zweite Meldung
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::CheckSettingsRequested {
                tool: ToolKind::Pol,
            },
        )
        .unwrap();
    let count = host.messages.entries.iter().filter(|(_, t)| t.contains("Mehrteilige")).count();
    assert_eq!(count, 1);
}

// ── LoL ─────────────────────────────────────────────────────────────

#[test]
fn lol_measures_a_segment_with_click_drag_release() {
    let (mut controller, mut state, mut host) = setup_lol();
    assert_eq!(state.lol.mode, LolMode::BeforeMeasure);

    // Erster Klick fixiert m_from = 50 auf Linie 1
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 50.0, 2.0))
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::Measuring);

    // Cursor treibt den zweiten Punkt hinter den Knick (m = 150)
    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 98.0, 50.0))
        .unwrap();
    let measure = state.lol.measure.as_ref().unwrap();
    assert!((measure.m_from - 50.0).abs() < 1e-9);
    assert!((measure.m_to - 150.0).abs() < 1e-9);

    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 98.0, 50.0))
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::AfterMeasure);
}

#[test]
fn lol_second_point_stays_on_first_feature() {
    let (mut controller, mut state, mut host) = setup_lol();

    // Zweite Linie dicht daneben
    let layer = host.memory_layer_mut("ref_layer").unwrap();
    layer.seed_feature(
        Feature::new(0)
            .with_attr("id", Some(AttrValue::Int(2)))
            .with_geometry(ReferenceGeometry::Single(vec![
                DVec2::new(0.0, 6.0),
                DVec2::new(100.0, 6.0),
            ])),
    );
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::CheckSettingsRequested {
                tool: ToolKind::Lol,
            },
        )
        .unwrap();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 50.0, 1.0))
        .unwrap();
    // Cursor näher an Linie 2; Snap bleibt auf Linie 1
    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 70.0, 5.0))
        .unwrap();

    let measure = state.lol.measure.as_ref().unwrap();
    assert_eq!(measure.ref_id, FieldValue::Int(1));
    assert!((measure.m_to - 70.0).abs() < 1e-9);
}

#[test]
fn lol_segment_drag_is_clipped_at_line_end() {
    let (mut controller, mut state, mut host) = setup_lol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 20.0, 1.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 80.0, 1.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 80.0, 1.0))
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::AfterMeasure);

    // Segment-Körper packen und weit über das Linienende hinaus ziehen
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 50.0, 1.0))
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::BeforeMoveSegment);

    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 100.0, 80.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 100.0, 80.0))
        .unwrap();

    let measure = state.lol.measure.as_ref().unwrap();
    let (a, b) = (measure.m_from.min(measure.m_to), measure.m_from.max(measure.m_to));
    // Geclippt, Segment-Länge erhalten
    assert!((b - 200.0).abs() < 1e-9);
    assert!((b - a - 60.0).abs() < 1e-9);
    assert!(a >= 0.0 && b <= 200.0);
}

#[test]
fn lol_endpoint_drag_moves_single_measure() {
    let (mut controller, mut state, mut host) = setup_lol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 20.0, 1.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 80.0, 1.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 80.0, 1.0))
        .unwrap();

    // Von-Punkt packen (bei m_from = 20) und auf m = 40 ziehen
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 21.0, 2.0))
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::BeforeMoveFromPoint);
    controller
        .handle_intent(&mut state, &mut host, moved(ToolKind::Lol, 40.0, 3.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 40.0, 3.0))
        .unwrap();

    let measure = state.lol.measure.as_ref().unwrap();
    assert!((measure.m_from - 40.0).abs() < 1e-9);
    assert!((measure.m_to - 80.0).abs() < 1e-9);
}

#[test]
fn resume_discards_the_measure() {
    let (mut controller, mut state, mut host) = setup_lol();

    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Lol, 20.0, 1.0))
        .unwrap();
    controller
        .handle_intent(&mut state, &mut host, release(ToolKind::Lol, 60.0, 1.0))
        .unwrap();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::ResumeRequested {
                tool: ToolKind::Lol,
            },
        )
        .unwrap();
    assert_eq!(state.lol.mode, LolMode::BeforeMeasure);
    assert!(state.lol.measure.is_none());
}

#[test]
fn kernel_measures_in_reference_crs_not_display_crs() {
    // Display-CRS mit Faktor 2 gegenüber dem Bezugs-CRS: die Stationierung
    // muss trotzdem in Bezugslinien-Einheiten herauskommen
    let ref_crs = Crs::projected("EPSG:25832");
    let display_crs = Crs::projected("EPSG:3857");
    let mut host = MemoryHost::with_projection(
        display_crs.clone(),
        Box::new(linref_engine::core::PlanarScaleProjection::new(
            ref_crs,
            display_crs,
            2.0,
        )),
    );
    host.add_layer(ref_layer());

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

    // Display (100, 2) entspricht Bezug (50, 1)
    controller
        .handle_intent(&mut state, &mut host, press(ToolKind::Pol, 100.0, 2.0))
        .unwrap();

    let measure = state.pol.measure.as_ref().expect("Messung erwartet");
    assert!((measure.m - 50.0).abs() < 1e-9);
}

#[test]
fn unbinding_reference_disables_the_tool() {
    let (mut controller, mut state, mut host) = setup_pol();

    host.remove_layer("ref_layer");
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::CheckSettingsRequested {
                tool: ToolKind::Pol,
            },
        )
        .unwrap();

    assert_eq!(state.pol.mode, PolMode::Disabled);
    assert!(state.pol.bindings.reference.is_none());
    assert!(state.pol.subscriptions.is_empty());
}
