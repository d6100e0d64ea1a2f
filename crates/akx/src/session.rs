//! A connection the menu can call tools through.

use serde_json::Value;
use std::future::Future;

use crate::error::Result;

/// Tool-calling connection to an akx-server
pub trait ToolSession {
    /// Call `name` with JSON object arguments and return the text result
    fn call(&self, name: &str, arguments: Value) -> impl Future<Output = Result<String>> + Send;

    /// Human-readable description of the connection
    fn describe(&self) -> String;
}
