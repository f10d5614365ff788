pub mod tracing;

pub use self::tracing::{request_id_middleware, request_span, REQUEST_ID_HEADER};
