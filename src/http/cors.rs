use vercel_runtime::{Body, Response};

/// Origins allowed to call the widget endpoint. The first entry doubles as
/// the value announced to unknown callers.
pub const ALLOWED_ORIGINS: [&str; 4] = [
    "https://wil-et-merlin.com",
    "https://www.wil-et-merlin.com",
    "http://wil-et-merlin.com",
    "http://www.wil-et-merlin.com",
];

pub fn pick_allow_origin(origin: Option<&str>) -> &'static str {
    origin
        .and_then(|o| ALLOWED_ORIGINS.iter().find(|allowed| **allowed == o))
        .copied()
        .unwrap_or(ALLOWED_ORIGINS[0])
}

pub fn add_cors(mut resp: Response<Body>, allow_origin: &'static str) -> Response<Body> {
    let h = resp.headers_mut();
    h.insert("Access-Control-Allow-Origin", allow_origin.parse().unwrap());
    // Caches and CDNs must key on the origin, since the allow header echoes it.
    h.insert("Vary", "Origin".parse().unwrap());
    h.insert("Access-Control-Allow-Methods", "POST, OPTIONS".parse().unwrap());
    h.insert(
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization".parse().unwrap(),
    );
    resp
}
