//! Benannte Konfigurationen im Projektspeicher des Hosts.
//!
//! Aktuelle Konfiguration unter `/<Werkzeug>/…`, benannte unter
//! `/<Werkzeug>StoredSettings/setting_<i>/…`; höchstens 100 pro Werkzeug.
//! Jede Mutation markiert das Projekt als geändert.

use std::collections::BTreeMap;

use crate::app::state::EngineState;
use crate::app::tools::{LolTool, PolTool, ToolKind};
use crate::app::bindings::{
    LolBindings, LolDataBinding, PolBindings, PolDataBinding, ReferenceBinding, ShowBinding,
};
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

use super::check_settings;

/// Obergrenze benannter Konfigurationen pro Werkzeug.
pub const MAX_STORED_SETTINGS: usize = 100;

fn namespace(tool: ToolKind) -> &'static str {
    match tool {
        ToolKind::Pol => "PolEvt",
        ToolKind::Lol => "LolEvt",
    }
}

fn stored_namespace(tool: ToolKind) -> String {
    format!("{}StoredSettings", namespace(tool))
}

// ── Flache Kodierung ────────────────────────────────────────────────

fn pol_entries(tool: &PolTool) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    if let Some(r) = &tool.bindings.reference {
        entries.push(("refLayerId".to_string(), r.layer_id.clone()));
        entries.push(("refIdField".to_string(), r.id_field.clone()));
    }
    if let Some(d) = &tool.bindings.data {
        entries.push(("dataLayerId".to_string(), d.layer_id.clone()));
        entries.push(("dataPkField".to_string(), d.pk_field.clone()));
        entries.push(("dataRefField".to_string(), d.ref_field.clone()));
        entries.push(("dataMField".to_string(), d.m_field.clone()));
    }
    if let Some(s) = &tool.bindings.show {
        entries.push(("showLayerId".to_string(), s.layer_id.clone()));
        entries.push(("showBackRefField".to_string(), s.back_ref_field.clone()));
    }
    entries.extend(tool.style.to_entries());
    entries
}

fn lol_entries(tool: &LolTool) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    if let Some(r) = &tool.bindings.reference {
        entries.push(("refLayerId".to_string(), r.layer_id.clone()));
        entries.push(("refIdField".to_string(), r.id_field.clone()));
    }
    if let Some(d) = &tool.bindings.data {
        entries.push(("dataLayerId".to_string(), d.layer_id.clone()));
        entries.push(("dataPkField".to_string(), d.pk_field.clone()));
        entries.push(("dataRefField".to_string(), d.ref_field.clone()));
        entries.push(("dataMFromField".to_string(), d.m_from_field.clone()));
        entries.push(("dataMToField".to_string(), d.m_to_field.clone()));
        entries.push(("dataOffsetField".to_string(), d.offset_field.clone()));
    }
    if let Some(s) = &tool.bindings.show {
        entries.push(("showLayerId".to_string(), s.layer_id.clone()));
        entries.push(("showBackRefField".to_string(), s.back_ref_field.clone()));
    }
    entries.extend(tool.style.to_entries());
    entries
}

fn apply_pol_entries(tool: &mut PolTool, map: &BTreeMap<String, String>) {
    tool.bindings = PolBindings {
        reference: match (map.get("refLayerId"), map.get("refIdField")) {
            (Some(layer_id), Some(id_field)) => Some(ReferenceBinding {
                layer_id: layer_id.clone(),
                id_field: id_field.clone(),
            }),
            _ => None,
        },
        data: match (
            map.get("dataLayerId"),
            map.get("dataPkField"),
            map.get("dataRefField"),
            map.get("dataMField"),
        ) {
            (Some(layer_id), Some(pk), Some(ref_field), Some(m)) => Some(PolDataBinding {
                layer_id: layer_id.clone(),
                pk_field: pk.clone(),
                ref_field: ref_field.clone(),
                m_field: m.clone(),
            }),
            _ => None,
        },
        show: match (map.get("showLayerId"), map.get("showBackRefField")) {
            (Some(layer_id), Some(back_ref)) => Some(ShowBinding {
                layer_id: layer_id.clone(),
                back_ref_field: back_ref.clone(),
            }),
            _ => None,
        },
    };
    for (key, value) in map {
        tool.style.apply_entry(key, value);
    }
}

fn apply_lol_entries(tool: &mut LolTool, map: &BTreeMap<String, String>) {
    tool.bindings = LolBindings {
        reference: match (map.get("refLayerId"), map.get("refIdField")) {
            (Some(layer_id), Some(id_field)) => Some(ReferenceBinding {
                layer_id: layer_id.clone(),
                id_field: id_field.clone(),
            }),
            _ => None,
        },
        data: match (
            map.get("dataLayerId"),
            map.get("dataPkField"),
            map.get("dataRefField"),
            map.get("dataMFromField"),
            map.get("dataMToField"),
            map.get("dataOffsetField"),
        ) {
            (Some(layer_id), Some(pk), Some(ref_field), Some(m_from), Some(m_to), Some(offset)) => {
                Some(LolDataBinding {
                    layer_id: layer_id.clone(),
                    pk_field: pk.clone(),
                    ref_field: ref_field.clone(),
                    m_from_field: m_from.clone(),
                    m_to_field: m_to.clone(),
                    offset_field: offset.clone(),
                })
            }
            _ => None,
        },
        show: match (map.get("showLayerId"), map.get("showBackRefField")) {
            (Some(layer_id), Some(back_ref)) => Some(ShowBinding {
                layer_id: layer_id.clone(),
                back_ref_field: back_ref.clone(),
            }),
            _ => None,
        },
    };
    for (key, value) in map {
        tool.style.apply_entry(key, value);
    }
}

fn read_namespace_map(host: &dyn HostPort, ns: &str, prefix: &str) -> BTreeMap<String, String> {
    let store = host.store_ref();
    store
        .keys(ns)
        .into_iter()
        .filter_map(|key| {
            let stripped = key.strip_prefix(prefix)?.to_string();
            store.read(ns, &key).map(|value| (stripped, value))
        })
        .collect()
}

// ── Aktuelle Konfiguration (Projekt-Lebenszyklus) ───────────────────

/// Schreibt die aktuellen Konfigurationen beider Werkzeuge in den
/// Projektspeicher (beim Projekt-Speichern).
pub fn store_current(state: &EngineState, host: &mut dyn HostPort) {
    for (ns, entries) in [
        (namespace(ToolKind::Pol), pol_entries(&state.pol)),
        (namespace(ToolKind::Lol), lol_entries(&state.lol)),
    ] {
        let stale: Vec<String> = host.store_ref().keys(ns);
        let store = host.store();
        for key in stale {
            store.remove(ns, &key);
        }
        for (key, value) in entries {
            store.write(ns, &key, &value);
        }
    }
    log::info!("Konfigurationen in den Projektspeicher geschrieben");
}

/// Lädt die aktuellen Konfigurationen beider Werkzeuge aus dem
/// Projektspeicher (beim Projekt-Öffnen). Der anschließende
/// `check_settings`-Durchlauf validiert die Bindungen.
pub fn restore_current(state: &mut EngineState, host: &mut dyn HostPort) {
    let pol_map = read_namespace_map(host, namespace(ToolKind::Pol), "");
    let lol_map = read_namespace_map(host, namespace(ToolKind::Lol), "");
    apply_pol_entries(&mut state.pol, &pol_map);
    apply_lol_entries(&mut state.lol, &lol_map);
    state.pol.reset();
    state.lol.reset();
}

// ── Benannte Konfigurationen ────────────────────────────────────────

fn find_named_index(host: &dyn HostPort, tool: ToolKind, name: &str) -> Option<usize> {
    let ns = stored_namespace(tool);
    (0..MAX_STORED_SETTINGS).find(|i| {
        host.store_ref()
            .read(&ns, &format!("setting_{i}/name"))
            .as_deref()
            == Some(name)
    })
}

fn first_free_index(host: &dyn HostPort, tool: ToolKind) -> Option<usize> {
    let ns = stored_namespace(tool);
    (0..MAX_STORED_SETTINGS)
        .find(|i| host.store_ref().read(&ns, &format!("setting_{i}/name")).is_none())
}

fn remove_index(host: &mut dyn HostPort, tool: ToolKind, index: usize) {
    let ns = stored_namespace(tool);
    let prefix = format!("setting_{index}/");
    let keys: Vec<String> = host
        .store_ref()
        .keys(&ns)
        .into_iter()
        .filter(|k| k.starts_with(&prefix))
        .collect();
    let store = host.store();
    for key in keys {
        store.remove(&ns, &key);
    }
}

/// Speichert die aktuelle Konfiguration unter einem Namen; bestehende Namen
/// werden nach Rückfrage überschrieben.
pub fn save_named(state: &EngineState, host: &mut dyn HostPort, tool: ToolKind, name: &str) {
    let index = match find_named_index(host, tool, name) {
        Some(existing) => {
            let overwrite = host
                .form()
                .confirm(&format!("Konfiguration '{name}' überschreiben?"));
            if !overwrite {
                host.messages()
                    .push(MessageLevel::Info, "Speichern abgebrochen");
                return;
            }
            remove_index(host, tool, existing);
            existing
        }
        None => match first_free_index(host, tool) {
            Some(free) => free,
            None => {
                host.messages().push(
                    MessageLevel::Warning,
                    &format!("Maximal {MAX_STORED_SETTINGS} Konfigurationen pro Werkzeug"),
                );
                return;
            }
        },
    };

    let entries = match tool {
        ToolKind::Pol => pol_entries(&state.pol),
        ToolKind::Lol => lol_entries(&state.lol),
    };
    let ns = stored_namespace(tool);
    let store = host.store();
    store.write(&ns, &format!("setting_{index}/name"), name);
    for (key, value) in entries {
        store.write(&ns, &format!("setting_{index}/{key}"), &value);
    }
    store.set_dirty();
    log::info!("Konfiguration '{name}' gespeichert (Index {index})");
}

/// Stellt eine benannte Konfiguration wieder her.
///
/// Rebindet alle Layer-Referenzen und validiert sie neu; fehlende oder
/// inkompatible Bindungen werden still verworfen.
pub fn restore_named(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, name: &str) {
    let Some(index) = find_named_index(host, tool, name) else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Konfiguration '{name}' nicht gefunden"),
        );
        return;
    };

    let ns = stored_namespace(tool);
    let map = read_namespace_map(host, &ns, &format!("setting_{index}/"));
    match tool {
        ToolKind::Pol => {
            apply_pol_entries(&mut state.pol, &map);
            state.pol.reset();
        }
        ToolKind::Lol => {
            apply_lol_entries(&mut state.lol, &map);
            state.lol.reset();
        }
    }
    check_settings::check_settings(state, host, tool, true);
    log::info!("Konfiguration '{name}' wiederhergestellt");
}

/// Löscht eine benannte Konfiguration.
pub fn delete_named(host: &mut dyn HostPort, tool: ToolKind, name: &str) {
    let Some(index) = find_named_index(host, tool, name) else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Konfiguration '{name}' nicht gefunden"),
        );
        return;
    };
    remove_index(host, tool, index);
    host.store().set_dirty();
    log::info!("Konfiguration '{name}' gelöscht");
}
