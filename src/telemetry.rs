//! Optional Sentry error reporting.
//!
//! Nothing is sent unless a DSN is configured. The returned guard flushes
//! pending events on drop, so the caller keeps it alive for the whole run.

use sentry::ClientInitGuard;
use sentry::types::Dsn;
use tracing::{debug, warn};

use crate::error::AppError;

pub fn init(dsn: Option<&str>, environment: Option<&str>) -> Result<Option<ClientInitGuard>, AppError> {
    let Some(raw) = dsn.map(str::trim).filter(|d| !d.is_empty()) else {
        debug!("Sentry DSN not set; error reporting disabled");
        return Ok(None);
    };

    let dsn: Dsn = raw
        .parse()
        .map_err(|e| AppError::usage(format!("Invalid Sentry DSN: {e}")))?;

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        environment: environment.map(|e| e.to_string().into()),
        ..Default::default()
    });

    if !guard.is_enabled() {
        warn!("Sentry client failed to initialize; error reporting disabled");
    }
    Ok(Some(guard))
}

/// Send a failed run to Sentry. A no-op when no client is bound.
pub fn report_error(err: &AppError) {
    sentry::with_scope(
        |scope| scope.set_tag("exit_code", err.exit_code()),
        || sentry::capture_message(err.message(), sentry::Level::Error),
    );
}
