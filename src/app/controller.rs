//! Application Controller für zentrale Event-Verarbeitung.
//!
//! Alle Engine-Methoden laufen auf dem UI-Thread des Hosts und kehren vor
//! dem nächsten Event zurück; Signale werden serialisiert in
//! Ankunftsreihenfolge verarbeitet.

use super::events::{AppCommand, AppIntent};
use super::state::EngineState;
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

/// Orchestriert Host-Events und Use-Cases auf dem EngineState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent→Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut EngineState,
        host: &mut dyn HostPort,
        intent: AppIntent,
    ) -> anyhow::Result<()> {
        let commands = super::intent_mapping::map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, host, command)?;
        }

        Ok(())
    }

    /// Wie [`handle_intent`](Self::handle_intent), aber ohne Fehler-Rückgabe:
    /// jeder Restfehler wird gemeldet statt in die Event-Schleife des Hosts
    /// zu entkommen.
    pub fn dispatch(&mut self, state: &mut EngineState, host: &mut dyn HostPort, intent: AppIntent) {
        if let Err(e) = self.handle_intent(state, host, intent) {
            log::error!("Intent-Verarbeitung fehlgeschlagen: {e}");
            host.messages().push(MessageLevel::Critical, &e.to_string());
        }
    }

    /// Führt mutierende Commands auf dem EngineState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut EngineState,
        host: &mut dyn HostPort,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        log::trace!("Command: {command:?}");
        use super::handlers;

        match command {
            // === Messen & Drags ===
            AppCommand::HoverMeasure { tool, pos } => handlers::measure::hover(state, host, tool, pos),
            AppCommand::ClickMeasure { tool, pos } => handlers::measure::click(state, host, tool, pos),
            AppCommand::PressAfterMeasure { tool, pos } => {
                handlers::measure::press_after_measure(state, host, tool, pos)
            }
            AppCommand::UpdateDrag {
                tool,
                pos,
                modifiers,
            } => handlers::measure::update_drag(state, host, tool, pos, modifiers),
            AppCommand::EndDrag { tool } => handlers::measure::end_drag(state, host, tool),
            AppCommand::EndMeasure { tool } => handlers::measure::end_measure(state, host, tool),

            // === Stationierungs-Arithmetik ===
            AppCommand::SetMeasure {
                tool,
                target,
                value,
            } => handlers::measure::set_measure(state, host, tool, target, value),
            AppCommand::SetOffset { value } => handlers::measure::set_offset(state, host, value),
            AppCommand::StepMeasure {
                tool,
                target,
                direction,
                modifiers,
            } => handlers::measure::step_measure(state, host, tool, target, direction, modifiers),
            AppCommand::MoveToStart { tool } => handlers::measure::move_to_start(state, host, tool),
            AppCommand::MoveToEnd { tool } => handlers::measure::move_to_end(state, host, tool),
            AppCommand::Prepend => handlers::measure::prepend(state, host),
            AppCommand::Append => handlers::measure::append(state, host),
            AppCommand::Flip => handlers::measure::flip(state, host),

            // === Selektion ===
            AppCommand::SetSelectMode { tool, active } => {
                handlers::selection::set_select_mode(state, host, tool, active)
            }
            AppCommand::SetRectAnchor { tool, pos } => {
                handlers::selection::set_rect_anchor(state, tool, pos)
            }
            AppCommand::SelectInRect {
                tool,
                min,
                max,
                modifiers,
            } => handlers::selection::select_in_rect(state, host, tool, min, max, modifiers),
            AppCommand::ClearSelection { tool } => handlers::selection::clear(state, host, tool),

            // === Editieren ===
            AppCommand::InsertRecord { tool } => handlers::editing::insert(state, host, tool),
            AppCommand::UpdateRecord { tool } => handlers::editing::update(state, host, tool),
            AppCommand::DeleteRecord { tool } => handlers::editing::delete(state, host, tool),
            AppCommand::Resume { tool } => handlers::measure::resume(state, host, tool),
            AppCommand::ChooseEditRecord { tool, pk } => {
                handlers::editing::choose_edit_record(state, tool, pk)
            }

            // === Konfiguration ===
            AppCommand::BindReferenceLayer {
                tool,
                layer_id,
                id_field,
            } => handlers::config::bind_reference(state, tool, layer_id, id_field),
            AppCommand::BindPolDataLayer {
                layer_id,
                pk_field,
                ref_field,
                m_field,
            } => handlers::config::bind_pol_data(state, layer_id, pk_field, ref_field, m_field),
            AppCommand::BindLolDataLayer {
                layer_id,
                pk_field,
                ref_field,
                m_from_field,
                m_to_field,
                offset_field,
            } => handlers::config::bind_lol_data(
                state,
                layer_id,
                pk_field,
                ref_field,
                m_from_field,
                m_to_field,
                offset_field,
            ),
            AppCommand::BindShowLayer {
                tool,
                layer_id,
                back_ref_field,
            } => handlers::config::bind_show(state, tool, layer_id, back_ref_field),
            AppCommand::SaveSettings { tool, name } => {
                handlers::config::save_settings(state, host, tool, &name)
            }
            AppCommand::RestoreSettings { tool, name } => {
                handlers::config::restore_settings(state, host, tool, &name)
            }
            AppCommand::DeleteSettings { tool, name } => {
                handlers::config::delete_settings(host, tool, &name)
            }
            AppCommand::StoreCurrentSettings => {
                handlers::config::store_current_settings(state, host)
            }
            AppCommand::RestoreCurrentSettings => {
                handlers::config::restore_current_settings(state, host)
            }
            AppCommand::CheckSettings { tool } => {
                handlers::config::check_settings(state, host, tool)
            }
            AppCommand::ProcessLayerSignals => {
                handlers::config::process_layer_signals(state, host)
            }
        }

        Ok(())
    }
}
