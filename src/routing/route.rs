use http::Method;

use crate::matcher::Params;

use super::payload::{HandlerBinding, Metadata};

/// A resolved request: the matched binding and the placeholder values taken from the path.
#[derive(Debug)]
pub struct Route<'a, H> {
    /// Concrete path that was resolved.
    pub path: String,
    /// Pattern it matched.
    pub pattern: &'a str,
    pub binding: &'a HandlerBinding<H>,
    pub params: Params,
    /// Path level metadata of the matched pattern.
    pub metadata: &'a Metadata,
}

impl<'a, H> Route<'a, H> {
    pub fn method(&self) -> &Method {
        self.binding.method()
    }

    pub fn handler(&self) -> &'a H {
        self.binding.handler()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
