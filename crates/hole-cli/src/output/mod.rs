use hole_config::ConfigError;
use hole_core::errors::CoreError;
use hole_core::responses::ErrorResponse;
use hole_store::StoreError;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Error body for a store rejection.
#[must_use]
pub fn store_error_response(error: &StoreError) -> ErrorResponse {
    ErrorResponse {
        code: error.code().to_string(),
        message: error.to_string(),
    }
}

/// Error body printed when a command fails. The code is taken from the
/// first store, core, or config error in the chain.
#[must_use]
pub fn error_response(error: &anyhow::Error) -> ErrorResponse {
    let code = error
        .chain()
        .find_map(|cause| {
            if let Some(store) = cause.downcast_ref::<StoreError>() {
                Some(store.code())
            } else if let Some(core) = cause.downcast_ref::<CoreError>() {
                Some(match core {
                    CoreError::InvalidContentKind { .. } => "invalid_content_kind",
                    CoreError::InvalidMarker(_) | CoreError::Validation(_) => "validation",
                    CoreError::Other(_) => "other",
                })
            } else {
                cause.downcast_ref::<ConfigError>().map(|_| "config")
            }
        })
        .unwrap_or("other");

    ErrorResponse {
        code: code.to_string(),
        message: format!("{error:#}"),
    }
}
