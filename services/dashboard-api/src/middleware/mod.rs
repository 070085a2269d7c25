// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

// Request middleware
pub mod request;

pub use request::{request_context_middleware, ReqContext, RequestContext, X_REQUEST_ID};
