use crate::{
    config::{Canvas, Config, Credentials, OrderData},
    error::PayzenError,
};

/// A [`Config`] whose required sections are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct CheckedConfig<'a> {
    pub credentials: &'a Credentials,
    pub order_data: &'a OrderData,
    pub target: Option<&'a str>,
    pub canvas: Option<&'a Canvas>,
}

/// Verifies the configuration before anything is built.
pub fn check(config: Option<&Config>) -> Result<CheckedConfig<'_>, PayzenError> {
    let Some(config) = config else {
        return Err(PayzenError::integration("config"));
    };

    let Some(credentials) = config.credentials.as_ref() else {
        return Err(PayzenError::integration("config.credentials"));
    };

    let Some(order_data) = config.order_data.as_ref() else {
        return Err(PayzenError::integration("config.orderData"));
    };

    if credentials.signature().is_none() && credentials.source().is_none() {
        return Err(PayzenError::integration(
            "config.credentials.signature or config.credentials.source",
        ));
    }

    if let Some(canvas) = &config.canvas
        && canvas.id.trim().is_empty()
    {
        return Err(PayzenError::integration("config.canvas.id"));
    }

    Ok(CheckedConfig {
        credentials,
        order_data,
        target: config.target.as_deref().filter(|t| !t.is_empty()),
        canvas: config.canvas.as_ref(),
    })
}
