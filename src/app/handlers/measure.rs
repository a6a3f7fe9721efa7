//! Handler: Messen, Griff-Drags und Stationierungs-Arithmetik.

use glam::DVec2;

use crate::app::state::EngineState;
use crate::app::tools::{lol, pol, MeasureTarget, StepDirection, ToolKind};
use crate::app::use_cases::measure;
use crate::host::canvas::KeyModifiers;
use crate::host::HostPort;

pub fn hover(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, pos: DVec2) {
    measure::hover(state, host, tool, pos);
}

pub fn click(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, pos: DVec2) {
    measure::click_measure(state, host, tool, pos);
}

pub fn press_after_measure(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    pos: DVec2,
) {
    measure::press_after_measure(state, host, tool, pos);
}

pub fn update_drag(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    pos: DVec2,
    modifiers: KeyModifiers,
) {
    measure::update_drag(state, host, tool, pos, modifiers);
}

pub fn end_drag(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    measure::end_drag(state, host, tool);
}

pub fn end_measure(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    measure::end_measure(state, host, tool);
}

pub fn resume(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    measure::resume(state, host, tool);
}

pub fn set_measure(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    target: MeasureTarget,
    value: f64,
) {
    match tool {
        ToolKind::Pol => pol::arithmetic::set_measure(&mut state.pol, value),
        ToolKind::Lol => lol::arithmetic::set_measure(&mut state.lol, target, value),
    }
    host.canvas().request_repaint();
}

pub fn set_offset(state: &mut EngineState, host: &mut dyn HostPort, value: f64) {
    lol::arithmetic::set_offset(&mut state.lol, value);
    host.canvas().request_repaint();
}

pub fn step_measure(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    target: MeasureTarget,
    direction: StepDirection,
    modifiers: KeyModifiers,
) {
    match tool {
        ToolKind::Pol => pol::arithmetic::step_measure(&mut state.pol, direction, modifiers),
        ToolKind::Lol => {
            lol::arithmetic::step_measure(&mut state.lol, target, direction, modifiers)
        }
    }
    host.canvas().request_repaint();
}

pub fn move_to_start(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => pol::arithmetic::move_to_start(&mut state.pol),
        ToolKind::Lol => lol::arithmetic::move_to_start(&mut state.lol),
    }
    host.canvas().request_repaint();
}

pub fn move_to_end(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => pol::arithmetic::move_to_end(&mut state.pol),
        ToolKind::Lol => lol::arithmetic::move_to_end(&mut state.lol),
    }
    host.canvas().request_repaint();
}

pub fn prepend(state: &mut EngineState, host: &mut dyn HostPort) {
    lol::arithmetic::prepend(&mut state.lol);
    host.canvas().request_repaint();
}

pub fn append(state: &mut EngineState, host: &mut dyn HostPort) {
    lol::arithmetic::append(&mut state.lol);
    host.canvas().request_repaint();
}

pub fn flip(state: &mut EngineState, host: &mut dyn HostPort) {
    lol::arithmetic::flip(&mut state.lol);
    host.canvas().request_repaint();
}
