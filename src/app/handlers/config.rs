//! Handler: Bindungen, Einstellungs-Checks, Konfigurations-Verwaltung.

use crate::app::bindings::{LolDataBinding, PolDataBinding, ReferenceBinding, ShowBinding};
use crate::app::state::EngineState;
use crate::app::tools::ToolKind;
use crate::app::use_cases::{check_settings, stored_settings};
use crate::host::HostPort;

pub fn bind_reference(state: &mut EngineState, tool: ToolKind, layer_id: String, id_field: String) {
    let binding = ReferenceBinding { layer_id, id_field };
    match tool {
        ToolKind::Pol => state.pol.bindings.reference = Some(binding),
        ToolKind::Lol => state.lol.bindings.reference = Some(binding),
    }
}

pub fn bind_pol_data(
    state: &mut EngineState,
    layer_id: String,
    pk_field: String,
    ref_field: String,
    m_field: String,
) {
    state.pol.bindings.data = Some(PolDataBinding {
        layer_id,
        pk_field,
        ref_field,
        m_field,
    });
}

#[allow(clippy::too_many_arguments)]
pub fn bind_lol_data(
    state: &mut EngineState,
    layer_id: String,
    pk_field: String,
    ref_field: String,
    m_from_field: String,
    m_to_field: String,
    offset_field: String,
) {
    state.lol.bindings.data = Some(LolDataBinding {
        layer_id,
        pk_field,
        ref_field,
        m_from_field,
        m_to_field,
        offset_field,
    });
}

pub fn bind_show(
    state: &mut EngineState,
    tool: ToolKind,
    layer_id: String,
    back_ref_field: String,
) {
    let binding = ShowBinding {
        layer_id,
        back_ref_field,
    };
    match tool {
        ToolKind::Pol => state.pol.bindings.show = Some(binding),
        ToolKind::Lol => state.lol.bindings.show = Some(binding),
    }
}

pub fn check_settings(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    check_settings::check_settings(state, host, tool, false);
}

pub fn save_settings(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, name: &str) {
    stored_settings::save_named(state, host, tool, name);
}

pub fn restore_settings(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    name: &str,
) {
    stored_settings::restore_named(state, host, tool, name);
}

pub fn delete_settings(host: &mut dyn HostPort, tool: ToolKind, name: &str) {
    stored_settings::delete_named(host, tool, name);
}

pub fn store_current_settings(state: &mut EngineState, host: &mut dyn HostPort) {
    stored_settings::store_current(state, host);
}

pub fn restore_current_settings(state: &mut EngineState, host: &mut dyn HostPort) {
    stored_settings::restore_current(state, host);
}

/// Verarbeitet anstehende Layer-Signale: je Signal ein voller
/// `check_settings`-Durchlauf der betroffenen Werkzeuge, danach ein Repaint.
pub fn process_layer_signals(state: &mut EngineState, host: &mut dyn HostPort) {
    let events = host.event_hub().drain();
    if events.is_empty() {
        return;
    }

    for event in &events {
        log::debug!("Layer-Signal: {:?} auf '{}'", event.kind, event.layer_id);

        let pol_affected = pol_binds_layer(state, &event.layer_id);
        let lol_affected = lol_binds_layer(state, &event.layer_id);
        if pol_affected {
            check_settings::check_settings(state, host, ToolKind::Pol, false);
        }
        if lol_affected {
            check_settings::check_settings(state, host, ToolKind::Lol, false);
        }
    }

    // Mutation abgeschlossen, erst jetzt neu zeichnen
    host.canvas().request_repaint();
}

fn pol_binds_layer(state: &EngineState, layer_id: &str) -> bool {
    let b = &state.pol.bindings;
    b.reference.as_ref().is_some_and(|r| r.layer_id == layer_id)
        || b.data.as_ref().is_some_and(|d| d.layer_id == layer_id)
        || b.show.as_ref().is_some_and(|s| s.layer_id == layer_id)
}

fn lol_binds_layer(state: &EngineState, layer_id: &str) -> bool {
    let b = &state.lol.bindings;
    b.reference.as_ref().is_some_and(|r| r.layer_id == layer_id)
        || b.data.as_ref().is_some_and(|d| d.layer_id == layer_id)
        || b.show.as_ref().is_some_and(|s| s.layer_id == layer_id)
}
