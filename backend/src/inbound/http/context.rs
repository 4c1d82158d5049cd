//! Request extractor yielding the caller's resolved [`CurrentUserContext`].
//!
//! One context is created per request and cached in the request extensions,
//! so several extractors in the same request share a single resolution.

use std::sync::Arc;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{CurrentUserContext, Error, HouseholdScope, UserSummary};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// A Ready user context for the current request.
#[derive(Clone)]
pub struct UserContext(Arc<CurrentUserContext>);

impl UserContext {
    /// Identity resolved for this request.
    pub fn summary(&self) -> Result<UserSummary, Error> {
        Ok(self.0.summary()?)
    }

    /// Scope to pass to household-owned data access.
    pub fn scope(&self) -> Result<HouseholdScope, Error> {
        Ok(self.0.scope()?)
    }

    /// Whether the caller is a platform administrator.
    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

fn context_for(
    req: &HttpRequest,
    state: &HttpState,
    session: &SessionContext,
) -> Result<Arc<CurrentUserContext>, Error> {
    if let Some(existing) = req.extensions().get::<Arc<CurrentUserContext>>() {
        return Ok(existing.clone());
    }
    let context = Arc::new(CurrentUserContext::new(
        session.user_id()?,
        state.principals.clone(),
    ));
    req.extensions_mut().insert(context.clone());
    Ok(context)
}

impl FromRequest for UserContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let session = session.await?;
            let context = context_for(&req, &state, &session)?;
            context.initialize().await?;
            Ok(Self(context))
        })
    }
}
