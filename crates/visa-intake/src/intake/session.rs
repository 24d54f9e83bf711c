use std::sync::Arc;

use tracing::debug;

use super::domain::{ProfileId, StepId};
use super::flow::Navigation;
use super::form::{FormFeedback, IntakeApi, StepForm, Toast};

/// Explicit wizard commands. Navigation is always the result of a resolved
/// mutation, never a flag polled by the mounted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Mount `step` without persisting anything.
    Mount { step: StepId },
    /// Save the current draft (blanks resolved to persisted values) and move to `step`.
    RequestSave { step: StepId },
    Submit { is_editing: bool },
}

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Step(StepId),
    Summary,
}

/// Owns the mounted step form and routes commands to it.
pub struct WizardSession<A> {
    api: Arc<A>,
    profile_id: ProfileId,
    form: Option<StepForm<A>>,
    location: Location,
}

impl<A: IntakeApi> WizardSession<A> {
    /// Open the wizard on the step named by a `formStep=N` query.
    pub fn open(api: Arc<A>, profile_id: ProfileId, query: &str) -> Result<Self, Toast> {
        let step = StepId::from_query(query);
        let form = StepForm::mount(api.clone(), profile_id.clone(), step)?;
        Ok(Self {
            api,
            profile_id,
            form: Some(form),
            location: Location::Step(step),
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn url(&self) -> String {
        match self.location {
            Location::Step(step) => Navigation::Step(step).url(&self.profile_id),
            Location::Summary => Navigation::Summary.url(&self.profile_id),
        }
    }

    pub fn form(&self) -> Option<&StepForm<A>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut StepForm<A>> {
        self.form.as_mut()
    }

    pub fn handle(&mut self, command: Command) -> Result<Option<FormFeedback>, Toast> {
        debug!(profile_id = %self.profile_id, ?command, "wizard command");
        match command {
            Command::Mount { step } => {
                self.mount(step)?;
                Ok(None)
            }
            Command::RequestSave { step } => {
                let Some(form) = self.form.as_mut() else {
                    self.mount(step)?;
                    return Ok(None);
                };
                let feedback = form.save(Some(step));
                self.follow(feedback.navigation)?;
                Ok(Some(feedback))
            }
            Command::Submit { is_editing } => {
                let Some(form) = self.form.as_mut() else {
                    return Ok(None);
                };
                let feedback = form.submit(is_editing);
                self.follow(feedback.navigation)?;
                Ok(Some(feedback))
            }
        }
    }

    fn follow(&mut self, navigation: Option<Navigation>) -> Result<(), Toast> {
        match navigation {
            Some(Navigation::Step(step)) => self.mount(step),
            Some(Navigation::Summary) => {
                self.form = None;
                self.location = Location::Summary;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn mount(&mut self, step: StepId) -> Result<(), Toast> {
        let form = StepForm::mount(self.api.clone(), self.profile_id.clone(), step)?;
        self.form = Some(form);
        self.location = Location::Step(step);
        Ok(())
    }
}
