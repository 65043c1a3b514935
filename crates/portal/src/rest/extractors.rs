//! Auth Gate als axum-Extractors
//!
//! `AktiveSitzung` entspricht `sitzung_erfordern`, `AdminSitzung` zusaetzlich
//! `rolle_erfordern(Admin)`. Beide laufen vor dem Body-Extractor und damit
//! vor jeder Geschaeftslogik.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use oya_auth::{rolle_erfordern, sitzung_erfordern, Sitzung};
use oya_core::Rolle;

use crate::error::PortalError;
use crate::rest::{middleware::token_aus_headers, PortalState};

/// Request mit gueltiger Session
pub struct AktiveSitzung(pub Sitzung);

#[async_trait]
impl FromRequestParts<PortalState> for AktiveSitzung {
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PortalState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_aus_headers(&parts.headers, &state.cookie.name);
        let sitzung = sitzung_erfordern(&state.auth, token).await?;
        Ok(Self(sitzung))
    }
}

/// Request mit gueltiger Session und Rolle Admin
pub struct AdminSitzung(pub Sitzung);

#[async_trait]
impl FromRequestParts<PortalState> for AdminSitzung {
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PortalState,
    ) -> Result<Self, Self::Rejection> {
        let AktiveSitzung(sitzung) = AktiveSitzung::from_request_parts(parts, state).await?;
        rolle_erfordern(&sitzung, Rolle::Admin)?;
        Ok(Self(sitzung))
    }
}
