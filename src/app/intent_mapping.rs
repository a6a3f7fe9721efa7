//! Mapping von Host-/Dialog-Intents auf mutierende App-Commands.
//!
//! Canvas-Events werden abhängig vom aktuellen Werkzeug-Modus übersetzt;
//! Dialog-Intents sind überwiegend Durchreichungen.

use glam::DVec2;

use super::events::{AppCommand, AppIntent};
use super::state::EngineState;
use super::tools::{LolMode, PolMode, ToolKind};
use crate::host::canvas::MouseButton;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &EngineState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::CanvasMoved { tool, pos } => map_canvas_moved(state, tool, pos),
        AppIntent::CanvasPressed {
            tool, pos, button, ..
        } => {
            if button != MouseButton::Left {
                return vec![];
            }
            map_canvas_pressed(state, tool, pos)
        }
        AppIntent::CanvasReleased {
            tool,
            pos,
            button,
            modifiers,
        } => {
            if button != MouseButton::Left {
                return vec![];
            }
            map_canvas_released(state, tool, pos, modifiers)
        }

        AppIntent::MeasureEdited {
            tool,
            target,
            value,
        } => vec![AppCommand::SetMeasure {
            tool,
            target,
            value,
        }],
        AppIntent::OffsetEdited { value } => vec![AppCommand::SetOffset { value }],
        AppIntent::StepMeasureRequested {
            tool,
            target,
            direction,
            modifiers,
        } => vec![AppCommand::StepMeasure {
            tool,
            target,
            direction,
            modifiers,
        }],
        AppIntent::MoveToStartRequested { tool } => vec![AppCommand::MoveToStart { tool }],
        AppIntent::MoveToEndRequested { tool } => vec![AppCommand::MoveToEnd { tool }],
        AppIntent::PrependRequested => vec![AppCommand::Prepend],
        AppIntent::AppendRequested => vec![AppCommand::Append],
        AppIntent::FlipRequested => vec![AppCommand::Flip],

        AppIntent::InsertRequested { tool } => vec![AppCommand::InsertRecord { tool }],
        AppIntent::UpdateRequested { tool } => vec![AppCommand::UpdateRecord { tool }],
        AppIntent::DeleteRequested { tool } => vec![AppCommand::DeleteRecord { tool }],
        AppIntent::ResumeRequested { tool } => vec![AppCommand::Resume { tool }],
        AppIntent::EditRecordChosen { tool, pk } => {
            vec![AppCommand::ChooseEditRecord { tool, pk }]
        }

        AppIntent::SelectFeaturesToggled { tool, active } => {
            vec![AppCommand::SetSelectMode { tool, active }]
        }
        AppIntent::ClearSelectionRequested { tool } => vec![AppCommand::ClearSelection { tool }],

        AppIntent::ReferenceLayerBound {
            tool,
            layer_id,
            id_field,
        } => vec![
            AppCommand::BindReferenceLayer {
                tool,
                layer_id,
                id_field,
            },
            AppCommand::CheckSettings { tool },
        ],
        AppIntent::PolDataLayerBound {
            layer_id,
            pk_field,
            ref_field,
            m_field,
        } => vec![
            AppCommand::BindPolDataLayer {
                layer_id,
                pk_field,
                ref_field,
                m_field,
            },
            AppCommand::CheckSettings {
                tool: ToolKind::Pol,
            },
        ],
        AppIntent::LolDataLayerBound {
            layer_id,
            pk_field,
            ref_field,
            m_from_field,
            m_to_field,
            offset_field,
        } => vec![
            AppCommand::BindLolDataLayer {
                layer_id,
                pk_field,
                ref_field,
                m_from_field,
                m_to_field,
                offset_field,
            },
            AppCommand::CheckSettings {
                tool: ToolKind::Lol,
            },
        ],
        AppIntent::ShowLayerBound {
            tool,
            layer_id,
            back_ref_field,
        } => vec![
            AppCommand::BindShowLayer {
                tool,
                layer_id,
                back_ref_field,
            },
            AppCommand::CheckSettings { tool },
        ],

        AppIntent::SettingsSaveRequested { tool, name } => {
            vec![AppCommand::SaveSettings { tool, name }]
        }
        AppIntent::SettingsRestoreRequested { tool, name } => {
            vec![AppCommand::RestoreSettings { tool, name }]
        }
        AppIntent::SettingsDeleteRequested { tool, name } => {
            vec![AppCommand::DeleteSettings { tool, name }]
        }

        AppIntent::ProjectSaving => vec![AppCommand::StoreCurrentSettings],
        AppIntent::ProjectOpened => vec![
            AppCommand::RestoreCurrentSettings,
            AppCommand::CheckSettings {
                tool: ToolKind::Pol,
            },
            AppCommand::CheckSettings {
                tool: ToolKind::Lol,
            },
        ],
        AppIntent::LayerSignalsPending => vec![AppCommand::ProcessLayerSignals],
        AppIntent::CheckSettingsRequested { tool } => vec![AppCommand::CheckSettings { tool }],
    }
}

fn map_canvas_moved(state: &EngineState, tool: ToolKind, pos: DVec2) -> Vec<AppCommand> {
    match tool {
        ToolKind::Pol => match state.pol.mode {
            PolMode::Measuring | PolMode::AfterMeasure => {
                vec![AppCommand::HoverMeasure { tool, pos }]
            }
            PolMode::BeforeMovePoint | PolMode::MovePoint => vec![AppCommand::UpdateDrag {
                tool,
                pos,
                modifiers: Default::default(),
            }],
            _ => vec![],
        },
        ToolKind::Lol => match state.lol.mode {
            LolMode::BeforeMeasure | LolMode::Measuring | LolMode::AfterMeasure => {
                vec![AppCommand::HoverMeasure { tool, pos }]
            }
            LolMode::BeforeMoveFromPoint
            | LolMode::MoveFromPoint
            | LolMode::BeforeMoveToPoint
            | LolMode::MoveToPoint
            | LolMode::BeforeMoveSegment
            | LolMode::MoveSegment => vec![AppCommand::UpdateDrag {
                tool,
                pos,
                modifiers: Default::default(),
            }],
            _ => vec![],
        },
    }
}

fn map_canvas_pressed(state: &EngineState, tool: ToolKind, pos: DVec2) -> Vec<AppCommand> {
    match tool {
        ToolKind::Pol => match state.pol.mode {
            PolMode::Measuring => vec![AppCommand::ClickMeasure { tool, pos }],
            PolMode::AfterMeasure => vec![AppCommand::PressAfterMeasure { tool, pos }],
            PolMode::SelectFeatures => vec![AppCommand::SetRectAnchor { tool, pos }],
            _ => vec![],
        },
        ToolKind::Lol => match state.lol.mode {
            LolMode::BeforeMeasure => vec![AppCommand::ClickMeasure { tool, pos }],
            LolMode::AfterMeasure => vec![AppCommand::PressAfterMeasure { tool, pos }],
            LolMode::SelectFeatures => vec![AppCommand::SetRectAnchor { tool, pos }],
            _ => vec![],
        },
    }
}

fn map_canvas_released(
    state: &EngineState,
    tool: ToolKind,
    pos: DVec2,
    modifiers: crate::host::canvas::KeyModifiers,
) -> Vec<AppCommand> {
    let rect_anchor = match tool {
        ToolKind::Pol => state.pol.rect_anchor,
        ToolKind::Lol => state.lol.rect_anchor,
    };

    match tool {
        ToolKind::Pol => match state.pol.mode {
            PolMode::BeforeMovePoint | PolMode::MovePoint => vec![AppCommand::EndDrag { tool }],
            PolMode::SelectFeatures => rect_command(tool, rect_anchor, pos, modifiers),
            _ => vec![],
        },
        ToolKind::Lol => match state.lol.mode {
            LolMode::Measuring => vec![
                AppCommand::UpdateDrag {
                    tool,
                    pos,
                    modifiers,
                },
                AppCommand::EndMeasure { tool },
            ],
            LolMode::BeforeMoveFromPoint
            | LolMode::MoveFromPoint
            | LolMode::BeforeMoveToPoint
            | LolMode::MoveToPoint
            | LolMode::BeforeMoveSegment
            | LolMode::MoveSegment => vec![AppCommand::EndDrag { tool }],
            LolMode::SelectFeatures => rect_command(tool, rect_anchor, pos, modifiers),
            _ => vec![],
        },
    }
}

fn rect_command(
    tool: ToolKind,
    anchor: Option<DVec2>,
    pos: DVec2,
    modifiers: crate::host::canvas::KeyModifiers,
) -> Vec<AppCommand> {
    let Some(anchor) = anchor else {
        return vec![];
    };
    vec![AppCommand::SelectInRect {
        tool,
        min: anchor.min(pos),
        max: anchor.max(pos),
        modifiers,
    }]
}
