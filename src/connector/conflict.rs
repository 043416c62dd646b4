//! Interpretation of HTTP 409 answers to create and update calls.
//!
//! A 409 means the e-mail address is taken, but not necessarily by an account
//! this tenant can see. The classifier asks the listing endpoint: if the e-mail
//! is visible the account really exists here, otherwise it belongs to another
//! tenant and the call resolves to a conflict sentinel instead of failing.

use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::record::UserPage;
use crate::resource::value_objects::Uid;
use crate::transport::{Endpoints, RestRequest, RestTransport};
use log::{debug, warn};

/// Outcome of a 409, decided by a follow-up search for the e-mail.
///
/// Returns the sentinel Uid when the owner is invisible, and
/// [`ConnectorError::AlreadyExists`] carrying `conflict_body` when it is
/// visible. Failures of the search itself are returned as they are.
pub async fn classify_conflict<T: RestTransport>(
    transport: &T,
    endpoints: &Endpoints,
    email: &str,
    uid: Option<&Uid>,
    conflict_body: &str,
) -> ConnectorResult<Uid> {
    debug!("Conflict for email {}, checking its visibility", email);

    let response = transport
        .execute(RestRequest::get(endpoints.list(Some(email), None)))
        .await?
        .error_for_status()?;
    let page: UserPage = response.json()?;

    if page.total_found == 0 {
        let sentinel = Uid::conflict(email, uid);
        warn!(
            "Email {} is used by an account outside this tenant, returning {}",
            email, sentinel
        );
        Ok(sentinel)
    } else {
        Err(ConnectorError::already_exists(conflict_body))
    }
}
