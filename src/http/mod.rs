pub mod date;
pub mod mime;
mod request;
mod response;

pub use request::{HttpRequest, HttpRequestError, MAX_METHOD_LEN, MAX_TARGET_LEN};
pub use response::{HttpResponse, HELLO_MESSAGE, SERVER_NAME};
