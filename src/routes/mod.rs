pub mod health_check;
mod signup;
mod signup_confirm;

pub use signup::*;
pub use signup_confirm::*;

use crate::commands::SignupError;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::{Request, Response};

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

impl<'r> Responder<'r, 'static> for SignupError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("SignupError: {:?}", self);
        Response::build()
            .status(match self {
                SignupError::InvalidEmail(_) => Status::BadRequest,
                SignupError::ConcurrentSignup => Status::Conflict,
                SignupError::Unexpected(_) => Status::InternalServerError,
            })
            .ok()
    }
}
