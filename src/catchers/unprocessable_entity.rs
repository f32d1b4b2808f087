use rocket::response::status;
use rocket::response::status::BadRequest;
use rocket::Request;

// A form submission missing its `email` field is a client error, not an
// unprocessable entity.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> BadRequest<()> {
    status::BadRequest::<()>(None)
}
