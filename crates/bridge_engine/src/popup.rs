use std::collections::VecDeque;
use std::sync::Arc;

use bridge_core::{
    update, CommandOutcome, Effect, Msg, PopupAction, PopupState, PopupViewModel,
};
use bridge_logging::{bridge_debug, bridge_info, bridge_warn};
use tokio::sync::mpsc;

use crate::channel::{PopupSurface, RuntimeChannel, TabsApi};
use crate::{RuntimeAck, RuntimeCommand, ScrapeRequest};

/// Drives the popup state machine: applies messages, renders, and runs the
/// resulting effects against the runtime, tabs and surface seams.
///
/// `dispatch` awaits every request it issues before taking the next message,
/// so a user action never has more than one request in flight. Timers (status
/// expiry, popup close) run as spawned tasks and come back through
/// [`PopupController::process_deferred`].
pub struct PopupController {
    state: PopupState,
    runtime: Arc<dyn RuntimeChannel>,
    tabs: Arc<dyn TabsApi>,
    surface: Arc<dyn PopupSurface>,
    deferred_tx: mpsc::UnboundedSender<Msg>,
    deferred_rx: mpsc::UnboundedReceiver<Msg>,
}

impl PopupController {
    pub fn new(
        state: PopupState,
        runtime: Arc<dyn RuntimeChannel>,
        tabs: Arc<dyn TabsApi>,
        surface: Arc<dyn PopupSurface>,
    ) -> Self {
        let (deferred_tx, deferred_rx) = mpsc::unbounded_channel();
        Self {
            state,
            runtime,
            tabs,
            surface,
            deferred_tx,
            deferred_rx,
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn view(&self) -> PopupViewModel {
        self.state.view()
    }

    /// Applies `msg`, then runs its effects to completion, feeding completion
    /// messages back through the state machine.
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let view = state.view();
            if state.consume_dirty() {
                self.surface.render(&view);
            }
            self.state = state;

            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect).await {
                    inbox.push_back(follow_up);
                }
            }
        }
    }

    /// Waits for the next timer message and dispatches it.
    ///
    /// Only await this while a timer is pending; the controller keeps its own
    /// sender alive, so the wait does not end on its own.
    pub async fn process_deferred(&mut self) {
        if let Some(msg) = self.deferred_rx.recv().await {
            self.dispatch(msg).await;
        }
    }

    async fn run_effect(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::QueryActiveTab => match self.tabs.query_active_tab().await {
                Ok(tab) => Some(Msg::ActiveTabDetected(tab)),
                Err(err) => {
                    bridge_warn!("Error checking current tab: {}", err);
                    Some(Msg::ActiveTabQueryFailed(err.to_string()))
                }
            },
            Effect::ScrapeTab { tab_id, token } => Some(
                self.send_command(
                    PopupAction::ScrapeCurrent,
                    RuntimeCommand::PopupScrapeCurrent { tab_id, token },
                )
                .await,
            ),
            Effect::StartScrape { profile_url, token } => Some(
                self.send_command(
                    PopupAction::ScrapeUrl,
                    RuntimeCommand::StartFromApp {
                        payload: ScrapeRequest {
                            profile_url,
                            token,
                            preferred_model: None,
                        },
                    },
                )
                .await,
            ),
            Effect::OpenTab { url } => {
                let outcome = match self.tabs.create_tab(&url).await {
                    Ok(()) => CommandOutcome::Acknowledged,
                    Err(err) => {
                        bridge_warn!("Could not open {}: {}", url, err);
                        CommandOutcome::ChannelFailed(err.to_string())
                    }
                };
                Some(Msg::CommandFinished {
                    action: PopupAction::OpenLinkedIn,
                    outcome,
                })
            }
            Effect::ClosePopupAfter { delay } => {
                let surface = self.surface.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    surface.close();
                });
                None
            }
            Effect::FocusUrlInput => {
                self.surface.focus_url_input();
                None
            }
            Effect::ClearStatusAfter { seq, delay } => {
                let tx = self.deferred_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Msg::StatusExpired { seq });
                });
                None
            }
        }
    }

    /// Sends one command and always produces the completion message that
    /// releases `action`'s busy flag.
    async fn send_command(&self, action: PopupAction, command: RuntimeCommand) -> Msg {
        let kind = command.kind();
        bridge_debug!("Popup sending {}", kind);
        let outcome = match self.runtime.send(command).await {
            Ok(reply) => {
                let ack = RuntimeAck::from_reply(reply.as_ref());
                if ack.ok {
                    bridge_info!("{} acknowledged", kind);
                    CommandOutcome::Acknowledged
                } else {
                    CommandOutcome::Rejected(ack.error)
                }
            }
            Err(err) => {
                bridge_warn!("{} failed: {}", kind, err);
                CommandOutcome::ChannelFailed(err.to_string())
            }
        };
        Msg::CommandFinished { action, outcome }
    }
}
