use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::build_app;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use underwriter::config::{AppConfig, AppEnvironment};
use underwriter::error::AppError;
use underwriter::telemetry;
use underwriter::workflows::underwriting::{
    EvaluationConfig, OpenAiChatModel, UnderwritingService,
};
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let model = Arc::new(OpenAiChatModel::new(config.advisory.openai_settings()?)?);
    let faults = config.fault_injection();
    if config.fault_sentinel.is_some() && config.environment == AppEnvironment::Production {
        warn!("APP_FAULT_SENTINEL is ignored in production");
    } else if faults.is_armed() {
        warn!("fault injection armed for this process");
    }

    let mut service =
        UnderwritingService::new(model, EvaluationConfig::default(), config.advisory.retry)
            .with_fault_injection(faults);
    if let Some(deadline) = config.advisory.deadline {
        service = service.with_advisory_deadline(deadline);
    }

    let app = build_app(Arc::new(service), app_state, &config.server.cors_origins)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.advisory.model,
        advisory_attempts = config.advisory.retry.max_attempts,
        advisory_backoff = ?config.advisory.retry.total_backoff(),
        "loan underwriting service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
