use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dog_core::errors::DogError;
use dog_tenancy::TenancyError;
use tracing::error;

#[derive(Debug)]
pub struct DogAxumError(pub anyhow::Error);

impl From<anyhow::Error> for DogAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<DogError> for DogAxumError {
    fn from(e: DogError) -> Self {
        Self(anyhow::Error::new(e))
    }
}

impl From<TenancyError> for DogAxumError {
    fn from(e: TenancyError) -> Self {
        DogError::from(e).into()
    }
}

impl IntoResponse for DogAxumError {
    fn into_response(self) -> Response {
        // Keep Feathers-ish fields when a DogError sits anywhere in the chain.
        let dog = match DogError::from_anyhow(&self.0) {
            Some(dog) => dog.sanitize_for_client(),
            None => DogError::general_error(self.0.to_string()).sanitize_for_client(),
        };

        if dog.kind.is_server_error() {
            error!(error = ?self.0, "request failed");
        }

        let status = StatusCode::from_u16(dog.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(dog.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenancy_rejections_become_401() {
        let res = DogAxumError::from(TenancyError::NoTenantClaim).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn plain_errors_become_500() {
        let res = DogAxumError::from(anyhow::anyhow!("pool timed out")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
