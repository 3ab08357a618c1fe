use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use serde_json::json;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use crate::models::Group;
use crate::services::auth::{Claims, TokenService};

/// The caller behind a verified bearer token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub groups: Vec<String>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal {
            user_id: claims.sub,
            username: claims.username,
            groups: claims.groups,
        }
    }
}

pub fn request_principal(req: &HttpRequest) -> Option<Rc<Principal>> {
    req.extensions().get::<Rc<Principal>>().cloned()
}

/// Lets a request through when its bearer token verifies and belongs to at
/// least one of `allowed`. Missing or bad tokens get 401, other groups 403.
pub struct Authorization {
    tokens: Arc<TokenService>,
    allowed: Rc<Vec<Group>>,
}

impl Authorization {
    pub fn new(tokens: Arc<TokenService>, allowed: &[Group]) -> Self {
        Authorization {
            tokens,
            allowed: Rc::new(allowed.to_vec()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorization
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthorizationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizationMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct AuthorizationMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
    allowed: Rc<Vec<Group>>,
}

fn reject<B>(req: ServiceRequest, http_res: HttpResponse) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    B: 'static,
{
    let (http_req, _) = req.into_parts();
    let res = ServiceResponse::new(http_req, http_res);
    (async move { Ok(res.map_into_right_body()) }).boxed_local()
}

impl<S, B> Service<ServiceRequest> for AuthorizationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Error = Error;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let _guard = tracing::info_span!("Authorization middleware").entered();

        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let header_value = match header_value {
            Some(value) => value,
            None => {
                tracing::error!("No Authorization header found in request");
                return reject(
                    req,
                    HttpResponse::Unauthorized().json(json!({
                        "error": "Missing authorization token"
                    })),
                );
            }
        };

        let claims = match self.tokens.verify_bearer(&header_value) {
            Ok(claims) if claims.is_access_token() => claims,
            Ok(claims) => {
                tracing::error!(user = %claims.sub, token_use = %claims.token_use, "Rejected non-access token");
                return reject(
                    req,
                    HttpResponse::Unauthorized().json(json!({
                        "error": "Invalid authorization token"
                    })),
                );
            }
            Err(err) => {
                tracing::error!("Rejected token: {}", err);
                return reject(
                    req,
                    HttpResponse::Unauthorized().json(json!({
                        "error": "Invalid authorization token"
                    })),
                );
            }
        };

        if !self.allowed.iter().any(|group| group.is_member(&claims.groups)) {
            tracing::error!(user = %claims.sub, groups = ?claims.groups, "Caller lacks required group");
            return reject(
                req,
                HttpResponse::Forbidden().json(json!({
                    "error": "User is not authorized to access this resource"
                })),
            );
        }

        tracing::info!(user = %claims.sub, "Authorized request");
        req.extensions_mut()
            .insert::<Rc<Principal>>(Rc::new(Principal::from(claims)));
        let service = self.service.clone();
        async move {
            let res: ServiceResponse<B> = service.call(req).await?;
            Ok(res.map_into_left_body())
        }
        .boxed_local()
    }
}
