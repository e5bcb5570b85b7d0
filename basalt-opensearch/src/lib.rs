//! Search backend integration of the basalt optimizer.
//!
//! * [`optimizer`] Rule set and optimizer for plans lowered to search requests.
//! * [`query_string`] The `query_string` relevance function and its parameters.
//! * [`request`] Request shapes understood by the backend, and the client talking to it.
//! * [`executor`] Dispatch of a request to the backend, rendering the result as json.

pub mod error;
pub mod executor;
pub mod optimizer;
pub mod query_string;
pub mod request;
