use std::env;

pub fn sse_keep_alive_secs() -> u64 {
    env::var("SSE_KEEP_ALIVE_SECS")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap_or(15)
}
