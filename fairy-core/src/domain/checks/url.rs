// fairy-core/src/domain/checks/url.rs

use url::Url;

use super::config::{opt_str_list, req_str};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::is_blank;

const DEFAULT_SCHEMES: [&str; 2] = ["http", "https"];

/// Why a value is not an acceptable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlProblem {
    Syntax(String),
    Scheme(String),
    MissingHost,
}

/// Validates one (non-blank) value. A bare `www.` prefix is read as
/// `https://www.`.
pub fn validate_url(raw: &str, schemes: &[String]) -> Result<Url, UrlProblem> {
    let trimmed = raw.trim();
    let candidate = if trimmed
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("www."))
    {
        format!("https://{}", trimmed)
    } else {
        trimmed.to_string()
    };

    let url = Url::parse(&candidate).map_err(|e| UrlProblem::Syntax(e.to_string()))?;
    if !schemes.iter().any(|s| s.eq_ignore_ascii_case(url.scheme())) {
        return Err(UrlProblem::Scheme(url.scheme().to_string()));
    }
    if url.is_special() && url.scheme() != "file" && url.host_str().is_none_or(str::is_empty) {
        return Err(UrlProblem::MissingHost);
    }
    Ok(url)
}

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let column = req_str(config, "column")?;
    let schemes = opt_str_list(config, "schemes")?
        .unwrap_or_else(|| DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect());

    let (name, table) = input.target()?;
    let cells = table
        .column(column)
        .ok_or_else(|| CheckError::missing_column(name, column))?;

    let mut outcome = Outcome::for_target(name, Some(column));
    for (row, cell) in cells.enumerate() {
        if is_blank(cell) {
            continue;
        }
        let message = match validate_url(cell, &schemes) {
            Ok(_) => continue,
            Err(UrlProblem::Syntax(reason)) => format!("'{}' is not a valid URL ({}).", cell, reason),
            Err(UrlProblem::Scheme(scheme)) => format!(
                "URL scheme '{}' is not allowed; expected one of {}.",
                scheme,
                schemes.join(", ")
            ),
            Err(UrlProblem::MissingHost) => format!("URL '{}' has no host.", cell),
        };
        outcome.push(
            Sample::at_row(row)
                .column(column)
                .value(cell)
                .message(message)
                .hint(input.hint()),
        );
    }
    Ok(outcome)
}
