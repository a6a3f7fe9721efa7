//! Handler: Arbeits-Selektion.

use glam::DVec2;

use crate::app::state::EngineState;
use crate::app::tools::ToolKind;
use crate::app::use_cases::selection;
use crate::host::canvas::KeyModifiers;
use crate::host::HostPort;

pub fn set_select_mode(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    active: bool,
) {
    selection::set_select_mode(state, host, tool, active);
}

pub fn set_rect_anchor(state: &mut EngineState, tool: ToolKind, pos: DVec2) {
    selection::set_rect_anchor(state, tool, pos);
}

pub fn select_in_rect(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    min: DVec2,
    max: DVec2,
    modifiers: KeyModifiers,
) {
    selection::select_in_rect(state, host, tool, min, max, modifiers);
}

pub fn clear(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    selection::clear(state, host, tool);
}
