use std::sync::Arc;

use shared::domain::{PlayerDraft, PlayerField};
use tracing::debug;

use crate::{
    error::ClientError,
    state::{DialogState, SavePhase, SessionContext, SessionState},
    ClientEvent,
};

#[derive(Clone)]
pub struct EditSession {
    ctx: Arc<SessionContext>,
}

impl EditSession {
    pub(crate) fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    pub async fn open_editor(&self) -> Result<(), ClientError> {
        {
            let mut guard = self.ctx.lock_mounted().await?;
            if guard.selection.is_none() {
                return Err(ClientError::NoSelection);
            }
            if guard.dialog == DialogState::Editing {
                return Ok(());
            }
            guard.dialog = DialogState::Editing;
        }
        self.ctx.emit(ClientEvent::EditorOpened);
        Ok(())
    }

    pub async fn set_field(&self, name: &str, value: &str) -> Result<(), ClientError> {
        let field = self.parse_field(name)?;
        self.edit_draft(|draft| draft.assign(field, value).map_err(ClientError::from))
            .await?;
        debug!("edit: set field={field}");
        Ok(())
    }

    pub async fn clear_field(&self, name: &str) -> Result<(), ClientError> {
        let field = self.parse_field(name)?;
        self.edit_draft(|draft| {
            draft.clear(field);
            Ok(())
        })
        .await?;
        debug!("edit: cleared field={field}");
        Ok(())
    }

    pub async fn discard(&self) -> Result<(), ClientError> {
        {
            let mut guard = self.ctx.lock_mounted().await?;
            ensure_idle(&guard)?;
            guard
                .selection
                .as_mut()
                .ok_or(ClientError::NoSelection)?
                .reset_draft();
        }
        self.ctx.emit(ClientEvent::DraftChanged);
        Ok(())
    }

    /// Dialog cancel: the draft is discarded, never merged back.
    pub async fn cancel_edit(&self) -> Result<(), ClientError> {
        self.discard().await?;
        let was_open = {
            let mut guard = self.ctx.lock_mounted().await?;
            std::mem::replace(&mut guard.dialog, DialogState::Closed) == DialogState::Editing
        };
        if was_open {
            self.ctx.emit(ClientEvent::EditorClosed);
        }
        Ok(())
    }

    pub async fn draft(&self) -> Option<PlayerDraft> {
        let guard = self.ctx.state.lock().await;
        guard.selection.as_ref().map(|selection| selection.draft.clone())
    }

    pub async fn dialog(&self) -> DialogState {
        self.ctx.state.lock().await.dialog
    }

    fn parse_field(&self, name: &str) -> Result<PlayerField, ClientError> {
        name.parse::<PlayerField>().map_err(|err| {
            let err = ClientError::from(err);
            self.ctx.report(&err);
            err
        })
    }

    async fn edit_draft<F>(&self, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut PlayerDraft) -> Result<(), ClientError>,
    {
        let result = {
            let mut guard = self.ctx.lock_mounted().await?;
            ensure_idle(&guard).and_then(|()| match guard.selection.as_mut() {
                Some(selection) => apply(&mut selection.draft),
                None => Err(ClientError::NoSelection),
            })
        };

        match result {
            Ok(()) => {
                self.ctx.emit(ClientEvent::DraftChanged);
                Ok(())
            }
            Err(err) => {
                self.ctx.report(&err);
                Err(err)
            }
        }
    }
}

fn ensure_idle(state: &SessionState) -> Result<(), ClientError> {
    if state.save_phase == SavePhase::Idle {
        Ok(())
    } else {
        Err(ClientError::SaveInProgress)
    }
}

#[cfg(test)]
#[path = "tests/edit_tests.rs"]
mod tests;
