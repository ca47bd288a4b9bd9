// Route resolution

use crate::error::Result;
use crate::request::{SsrRequest, location_of};
use crate::routes::{MatchOutcome, RouteMatcher};

/// Resolve the request location against `routes`.
///
/// Returns the location alongside the outcome. Matcher failures are
/// returned unchanged.
pub async fn resolve(
    routes: &dyn RouteMatcher,
    request: &dyn SsrRequest,
) -> Result<(String, MatchOutcome)> {
    let location = location_of(request)?;
    tracing::debug!(location = %location, "Resolving route");
    let outcome = routes.match_location(&location).await?;
    Ok((location, outcome))
}
