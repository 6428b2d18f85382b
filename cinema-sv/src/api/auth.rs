use actix_web::dev::Payload;
use actix_web::http::header::{HeaderValue, AUTHORIZATION};
use actix_web::{FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::core::error::Error;

/// Token from an `Authorization: Token <uuid>` header. Resolving it to a user
/// needs the database and happens in the handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthToken(pub Uuid);

impl FromRequest for AuthToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_token(req.headers().get(AUTHORIZATION)))
    }
}

fn parse_token(header: Option<&HeaderValue>) -> Result<AuthToken, Error> {
    let value = header
        .ok_or(Error::MissingCredentialsError)?
        .to_str()
        .map_err(|_| Error::InvalidTokenError)?;

    let mut parts = value.trim().splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("token") =>
            Uuid::parse_str(token.trim())
                .map(AuthToken)
                .map_err(|_| Error::InvalidTokenError),
        (Some(scheme), None) if scheme.eq_ignore_ascii_case("token") =>
            Err(Error::InvalidTokenError),
        _ => Err(Error::MissingCredentialsError),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test;

    use super::*;

    const TOKEN: &str = "6f1d6e0e-4c53-4c1a-9d8e-2b7f0c6a9a11";

    #[actix_rt::test]
    async fn extracts_token() {
        let req = test::TestRequest::default()
            .header("Authorization", format!("Token {}", TOKEN))
            .to_http_request();

        let token = AuthToken::extract(&req).await.unwrap();
        assert_eq!(token, AuthToken(Uuid::parse_str(TOKEN).unwrap()));
    }

    #[actix_rt::test]
    async fn missing_header_is_missing_credentials() {
        let req = test::TestRequest::default().to_http_request();
        assert!(matches!(AuthToken::extract(&req).await, Err(Error::MissingCredentialsError)));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let header = HeaderValue::from_static("Bearer abc");
        assert!(matches!(parse_token(Some(&header)), Err(Error::MissingCredentialsError)));
    }

    #[test]
    fn malformed_tokens_are_invalid() {
        let header = HeaderValue::from_static("Token not-a-uuid");
        assert!(matches!(parse_token(Some(&header)), Err(Error::InvalidTokenError)));

        let header = HeaderValue::from_static("Token");
        assert!(matches!(parse_token(Some(&header)), Err(Error::InvalidTokenError)));
    }
}
