use crate::intake::EventIntake;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) intake: EventIntake,
}
