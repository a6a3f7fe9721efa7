//! Handler: Editier-Befehle auf dem Daten-Layer.

use crate::app::state::EngineState;
use crate::app::tools::ToolKind;
use crate::app::use_cases::editing;
use crate::core::records::FieldValue;
use crate::host::HostPort;

pub fn insert(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    editing::insert(state, host, tool);
}

pub fn update(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    editing::update(state, host, tool);
}

pub fn delete(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    editing::delete(state, host, tool);
}

pub fn choose_edit_record(state: &mut EngineState, tool: ToolKind, pk: FieldValue) {
    match tool {
        ToolKind::Pol => state.pol.edit_pk = Some(pk),
        ToolKind::Lol => state.lol.edit_pk = Some(pk),
    }
}
