/// Contains a Http client capable of executing [`RestRequest`](http::rest::RestRequest)s, as
/// well as the build & parse strategies it is configured with.
pub mod http;
