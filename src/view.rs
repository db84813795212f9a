use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::PredictionService;
use crate::directory::ProgramSelect;
use crate::error::{ClientError, Result};
use crate::form::FormInput;
use crate::models::{PredictionRequest, PredictionResponse};
use crate::render::ResultView;

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Error al conectar con el servidor. Verifique que el backend esté ejecutándose.";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Results(Box<ResultView>),
    Error(String),
}

impl ViewState {
    pub fn region(&self) -> RegionKind {
        match self {
            ViewState::Idle => RegionKind::Form,
            ViewState::Loading => RegionKind::Loading,
            ViewState::Results(_) => RegionKind::Results,
            ViewState::Error(_) => RegionKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Form,
    Loading,
    Results,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct Screen {
    regions: [Region; 4],
}

impl Default for Screen {
    fn default() -> Self {
        let region = |kind| Region { kind, hidden: true };
        let mut screen = Self {
            regions: [
                region(RegionKind::Form),
                region(RegionKind::Loading),
                region(RegionKind::Results),
                region(RegionKind::Error),
            ],
        };
        screen.show(RegionKind::Form);
        screen
    }
}

impl Screen {
    /// Hides every region, then unhides `kind`.
    pub fn show(&mut self, kind: RegionKind) {
        for region in self.regions.iter_mut() {
            region.hidden = true;
        }
        for region in self.regions.iter_mut().filter(|r| r.kind == kind) {
            region.hidden = false;
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn visible(&self) -> Option<RegionKind> {
        let mut shown = self.regions.iter().filter(|r| !r.hidden);
        match (shown.next(), shown.next()) {
            (Some(region), None) => Some(region.kind),
            _ => None,
        }
    }
}

/// Handed out when a submission starts; only the latest one may finish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(Uuid);

impl SubmissionTicket {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug)]
pub struct ViewController {
    state: ViewState,
    screen: Screen,
    in_flight: Option<SubmissionTicket>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            screen: Screen::default(),
            in_flight: None,
        }
    }
}

impl ViewController {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    fn transition(&mut self, state: ViewState) {
        debug!(from = ?self.state.region(), to = ?state.region(), "view transition");
        self.screen.show(state.region());
        self.state = state;
    }

    pub fn begin_submission(&mut self) -> Result<SubmissionTicket> {
        if self.in_flight.is_some() {
            warn!("submission rejected, another prediction is in flight");
            return Err(ClientError::SubmissionInFlight);
        }
        let ticket = SubmissionTicket(Uuid::new_v4());
        self.in_flight = Some(ticket);
        self.transition(ViewState::Loading);
        Ok(ticket)
    }

    /// Applies the outcome of `ticket`'s request. Returns `false` and changes
    /// nothing when the ticket is not the one in flight.
    pub fn finish(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResponse>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            warn!(submission = %ticket.id(), "dropping stale prediction outcome");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                info!(
                    submission = %ticket.id(),
                    probability = response.prediccion.probabilidad,
                    "prediction received"
                );
                let view = ResultView::from_response(&response);
                self.transition(ViewState::Results(Box::new(view)));
            }
            Err(err) => {
                error!(submission = %ticket.id(), error = %err, "prediction failed");
                self.transition(ViewState::Error(format!("{CONNECTION_ERROR_MESSAGE} ({err})")));
            }
        }
        true
    }

    /// Back to the empty form. Any in-flight submission is abandoned.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.transition(ViewState::Idle);
    }
}

/// One full submission: loading, a single request, then results or error.
/// Returns the response when the results region ends up showing it.
pub async fn submit<S>(
    controller: &mut ViewController,
    service: &S,
    request: &PredictionRequest,
) -> Result<Option<PredictionResponse>>
where
    S: PredictionService + ?Sized,
{
    let ticket = controller.begin_submission()?;
    let outcome = service.predict(request).await;
    let response = outcome.as_ref().ok().cloned();
    let applied = controller.finish(ticket, outcome);
    Ok(response.filter(|_| applied))
}

/// Submit button handler: the validity gate, then [`submit`]. The program
/// check only applies when the directory actually loaded. An invalid form
/// sends nothing and leaves the view untouched.
pub async fn submit_form<S>(
    controller: &mut ViewController,
    service: &S,
    form: &FormInput,
    select: &ProgramSelect,
) -> Result<Option<PredictionResponse>>
where
    S: PredictionService + ?Sized,
{
    let program_error = if select.is_error() {
        warn!("program directory unavailable, skipping program check");
        None
    } else {
        form.check_program(select)
    };

    let request = match (form.serialize(), program_error) {
        (Ok(request), None) => request,
        (Ok(_), Some(err)) => return Err(ClientError::InvalidForm(vec![err])),
        (Err(ClientError::InvalidForm(mut errors)), program_error) => {
            errors.extend(program_error);
            return Err(ClientError::InvalidForm(errors));
        }
        (Err(err), _) => return Err(err),
    };

    if let Some(name) = select.label_for(&request.programa) {
        info!(programa = %request.programa, nombre = name, "submitting prediction");
    }
    submit(controller, service, &request).await
}
