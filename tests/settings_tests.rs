//! Integrationstests der Konfigurations-Verwaltung: benannte
//! Konfigurationen, Projekt-Lebenszyklus, Layer-Signale.

use glam::DVec2;
use linref_engine::core::records::AttrValue;
use linref_engine::{
    AppController, AppIntent, Capabilities, Crs, EngineState, Feature, FieldDef, FieldType,
    MemoryHost, MemoryLayer, PolMode, ReferenceGeometry, ToolKind,
};

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
                DVec2::new(200.0, 0.0),
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

#[test]
fn save_and_restore_reproduce_bindings_and_style() {
    let (mut controller, mut state, mut host) = setup();
    state.pol.style.point_color = "#FFAA00".to_string();
    state.pol.style.point_size_px = 14.0;

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsSaveRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();
    assert!(host.store.dirty_count > 0);

    // Konfiguration verstellen
    state.pol.style.point_color = "#000000".to_string();
    state.pol.bindings.data = None;

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsRestoreRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();

    // Byte-genau wiederhergestellt
    assert_eq!(state.pol.style.point_color, "#FFAA00");
    assert_eq!(state.pol.style.point_size_px, 14.0);
    let data = state.pol.bindings.data.as_ref().expect("Daten-Bindung");
    assert_eq!(data.layer_id, "pol_data");
    assert_eq!(data.m_field, "measure");
    assert_eq!(state.pol.mode, PolMode::Measuring);
}

#[test]
fn overwrite_asks_for_confirmation() {
    let (mut controller, mut state, mut host) = setup();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsSaveRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();

    // Ablehnen: alter Stand bleibt
    state.pol.style.point_color = "#123456".to_string();
    host.form.confirm_answer = false;
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsSaveRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();
    assert!(host
        .form
        .questions
        .iter()
        .any(|q| q.contains("überschreiben")));

    state.pol.style.point_color = "#000000".to_string();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsRestoreRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();
    assert_ne!(state.pol.style.point_color, "#123456");
}

#[test]
fn delete_removes_named_configuration() {
    let (mut controller, mut state, mut host) = setup();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsSaveRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsDeleteRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();
    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsRestoreRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();

    assert!(host.messages.contains("nicht gefunden"));
}

#[test]
fn project_save_and_open_roundtrip() {
    let (mut controller, mut state, mut host) = setup();
    state.pol.style.line_color = "#00AAFF".to_string();

    controller
        .handle_intent(&mut state, &mut host, AppIntent::ProjectSaving)
        .unwrap();

    // Neue Sitzung gegen denselben Projektspeicher
    let mut fresh = EngineState::new();
    controller
        .handle_intent(&mut fresh, &mut host, AppIntent::ProjectOpened)
        .unwrap();

    assert_eq!(fresh.pol.style.line_color, "#00AAFF");
    let data = fresh.pol.bindings.data.as_ref().expect("Daten-Bindung");
    assert_eq!(data.layer_id, "pol_data");
    assert_eq!(fresh.pol.mode, PolMode::Measuring);
    assert!(fresh.pol.catalog.is_some());
}

#[test]
fn restore_drops_missing_layers_silently() {
    let (mut controller, mut state, mut host) = setup();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsSaveRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();

    host.remove_layer("pol_data");
    let warnings_before = host
        .messages
        .entries
        .iter()
        .filter(|(l, _)| *l == linref_engine::MessageLevel::Warning)
        .count();

    controller
        .handle_intent(
            &mut state,
            &mut host,
            AppIntent::SettingsRestoreRequested {
                tool: ToolKind::Pol,
                name: "A".to_string(),
            },
        )
        .unwrap();

    // Bindung still verworfen, keine zusätzliche Warnung
    assert!(state.pol.bindings.data.is_none());
    let warnings_after = host
        .messages
        .entries
        .iter()
        .filter(|(l, _)| *l == linref_engine::MessageLevel::Warning)
        .count();
    assert_eq!(warnings_before, warnings_after);
}

#[test]
fn commit_signal_triggers_check_and_repaint() {
    let (mut controller, mut state, mut host) = setup();

    // Commit auf dem gebundenen Daten-Layer erzeugt ein Layer-Signal
    {
        let layer = host.memory_layer_mut("pol_data").unwrap();
        use linref_engine::host::VectorLayerPort;
        layer.start_edit().unwrap();
        layer
            .add_feature(
                Feature::new(0)
                    .with_attr("fid", Some(AttrValue::Int(7)))
                    .with_attr("line_ref_id", Some(AttrValue::Int(1)))
                    .with_attr("measure", Some(AttrValue::Real(20.0))),
            )
            .unwrap();
        layer.commit().unwrap();
    }

    let repaints_before = host.canvas.repaints;
    controller
        .handle_intent(&mut state, &mut host, AppIntent::LayerSignalsPending)
        .unwrap();

    assert!(host.canvas.repaints > repaints_before);
}

#[test]
fn layer_removal_signal_drops_binding_with_warning() {
    let (mut controller, mut state, mut host) = setup();

    host.remove_layer("pol_data");
    host.emit(linref_engine::LayerEvent {
        layer_id: "pol_data".to_string(),
        kind: linref_engine::LayerEventKind::ConfigChanged,
    });

    controller
        .handle_intent(&mut state, &mut host, AppIntent::LayerSignalsPending)
        .unwrap();

    assert!(state.pol.bindings.data.is_none());
    assert!(host.messages.contains("Konfiguration unvollständig"));
}
