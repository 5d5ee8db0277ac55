mod client;

pub use client::{Activity, ApiError, ApiResult, StravaApiClient};
