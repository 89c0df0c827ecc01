use service::jobs::schedule::SchedulePolicy;
use service::AppServices;

/// Shared handler state: the service graph.
#[derive(Clone)]
pub struct ServerState {
    pub services: AppServices,
}

impl ServerState {
    pub fn new(services: AppServices) -> Self { Self { services } }

    /// Backed by the in-memory store; used by tests.
    pub fn in_memory(policy: SchedulePolicy) -> Self { Self::new(AppServices::in_memory(policy)) }
}
