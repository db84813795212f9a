use tracing::{error, info, warn};

use crate::client::PredictionService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    Ready,
    ModelNotLoaded,
    Unreachable(String),
}

/// One-shot health check. The result is only logged; it never touches the view.
pub async fn check_connectivity<S>(service: &S) -> Connectivity
where
    S: PredictionService + ?Sized,
{
    match service.health().await {
        Ok(status) if status.is_ready() => {
            info!("backend connection ok, model loaded");
            if status.mapeos_cargados == Some(false) {
                warn!("backend has no program name mappings loaded");
            }
            Connectivity::Ready
        }
        Ok(status) => {
            warn!(status = %status.status, "backend reachable but model not loaded");
            Connectivity::ModelNotLoaded
        }
        Err(err) => {
            error!(error = %err, "backend connection failed");
            Connectivity::Unreachable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubService;
    use crate::error::ClientError;
    use crate::models::HealthStatus;

    fn status(status: &str, loaded: bool) -> HealthStatus {
        HealthStatus {
            status: status.to_string(),
            modelo_cargado: loaded,
            mapeos_cargados: Some(true),
        }
    }

    #[tokio::test]
    async fn healthy_with_model_is_ready() {
        let service = StubService::default().with_health(Ok(status("healthy", true)));
        assert_eq!(check_connectivity(&service).await, Connectivity::Ready);
    }

    #[tokio::test]
    async fn missing_model_or_other_status_is_not_ready() {
        let service = StubService::default().with_health(Ok(status("healthy", false)));
        assert_eq!(
            check_connectivity(&service).await,
            Connectivity::ModelNotLoaded
        );

        let service = StubService::default().with_health(Ok(status("degraded", true)));
        assert_eq!(
            check_connectivity(&service).await,
            Connectivity::ModelNotLoaded
        );
    }

    #[tokio::test]
    async fn failure_is_reported_not_raised() {
        let service = StubService::default().with_health(Err(ClientError::Status {
            status: 503,
            detail: "Service Unavailable".to_string(),
        }));
        assert!(matches!(
            check_connectivity(&service).await,
            Connectivity::Unreachable(_)
        ));
    }
}
