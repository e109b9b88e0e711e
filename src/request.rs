//! Query-string validation for `/translationList`.

use glossa_core::error::{GatewayError, Param};
use glossa_core::translation::LookupRequest;

/// First value supplied for `name`, if any.
fn first<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Build a [`LookupRequest`] from decoded query pairs.
///
/// Checks `site`, then `lang`, then `t`, and stops at the first failure.
/// No store access happens here.
pub fn parse_lookup(params: &[(String, String)]) -> Result<LookupRequest, GatewayError> {
    let site = first(params, Param::Site.name())
        .ok_or(GatewayError::MissingParameter(Param::Site))?;
    let site_id = site
        .parse::<i64>()
        .map_err(|_| GatewayError::InvalidParameter(Param::Site))?;

    let language = match first(params, Param::Lang.name()) {
        Some(lang) if !lang.is_empty() => lang.to_string(),
        _ => return Err(GatewayError::MissingParameter(Param::Lang)),
    };

    let keys: Vec<String> = params
        .iter()
        .filter(|(k, _)| k == Param::Keys.name())
        .map(|(_, v)| v.clone())
        .collect();
    if keys.is_empty() {
        return Err(GatewayError::MissingParameter(Param::Keys));
    }

    Ok(LookupRequest {
        site_id,
        language,
        keys,
    })
}
