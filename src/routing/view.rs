//! Views and handler extraction.
//!
//! A view is either a plain endpoint, registered under caller provided methods
//! (`GET` when none are given), or a resource that declares one handler per HTTP
//! method it supports. [`extract`] expands a view into `(method, handler)` pairs.

use http::Method;

use crate::ConfigurationError;

/// Methods a route can be registered under.
pub const METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

/// Something that can be registered on a route table.
pub trait View<H> {
    /// Handlers the view declares for itself. `None` for views without that capability.
    fn operations(&self) -> Option<Vec<(Method, H)>> {
        None
    }

    /// Handler used for every method given at registration time.
    fn endpoint(&self) -> Option<H> {
        None
    }
}

/// A single handler, registered under the methods given at registration time.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint<H>(pub H);

impl<H: Clone> View<H> for Endpoint<H> {
    fn endpoint(&self) -> Option<H> {
        Some(self.0.clone())
    }
}

/// A multi-method resource. Each implemented method is one operation of the view.
pub trait Resource<H> {
    fn get(&self) -> Option<H> {
        None
    }

    fn head(&self) -> Option<H> {
        None
    }

    fn post(&self) -> Option<H> {
        None
    }

    fn put(&self) -> Option<H> {
        None
    }

    fn delete(&self) -> Option<H> {
        None
    }

    fn connect(&self) -> Option<H> {
        None
    }

    fn options(&self) -> Option<H> {
        None
    }

    fn trace(&self) -> Option<H> {
        None
    }

    fn patch(&self) -> Option<H> {
        None
    }
}

/// Registers a [`Resource`] as a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceView<R>(pub R);

impl<H, R: Resource<H>> View<H> for ResourceView<R> {
    fn operations(&self) -> Option<Vec<(Method, H)>> {
        let resource = &self.0;
        let operations = [
            (Method::GET, resource.get()),
            (Method::HEAD, resource.head()),
            (Method::POST, resource.post()),
            (Method::PUT, resource.put()),
            (Method::DELETE, resource.delete()),
            (Method::CONNECT, resource.connect()),
            (Method::OPTIONS, resource.options()),
            (Method::TRACE, resource.trace()),
            (Method::PATCH, resource.patch()),
        ];
        Some(
            operations
                .into_iter()
                .filter_map(|(method, handler)| handler.map(|handler| (method, handler)))
                .collect(),
        )
    }
}

/// A resource assembled at runtime from an explicit operation list.
#[derive(Debug, Clone, PartialEq)]
pub struct Operations<H>(pub Vec<(Method, H)>);

impl<H: Clone> View<H> for Operations<H> {
    fn operations(&self) -> Option<Vec<(Method, H)>> {
        Some(self.0.clone())
    }
}

/// Parses a method token. Only the standard, upper-case methods are accepted.
pub fn parse_method(token: &str) -> Result<Method, ConfigurationError> {
    METHODS
        .iter()
        .find(|method| method.as_str() == token)
        .cloned()
        .ok_or_else(|| ConfigurationError::UnknownMethod(token.to_string()))
}

/// Expands `view` into the `(method, handler)` pairs to register.
pub fn extract<H, V>(view: &V, methods: Option<&[&str]>) -> Result<Vec<(Method, H)>, ConfigurationError>
where
    H: Clone,
    V: View<H> + ?Sized,
{
    if let Some(operations) = view.operations() {
        if methods.is_some() {
            return Err(ConfigurationError::MethodsWithResource);
        }
        if operations.is_empty() {
            return Err(ConfigurationError::UnrecognizedView);
        }
        return Ok(operations);
    }
    let handler = view.endpoint().ok_or(ConfigurationError::UnrecognizedView)?;
    methods
        .unwrap_or(&["GET"])
        .iter()
        .map(|token| parse_method(token).map(|method| (method, handler.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct Item;

    impl Resource<&'static str> for Item {
        fn get(&self) -> Option<&'static str> {
            Some("item.get")
        }

        fn post(&self) -> Option<&'static str> {
            Some("item.post")
        }
    }

    struct Empty;

    impl Resource<&'static str> for Empty {}

    struct Opaque;

    impl View<&'static str> for Opaque {}

    #[test]
    fn test_endpoint_defaults_to_get() {
        let pairs = extract(&Endpoint("index"), None).unwrap();
        assert_eq!(pairs, vec![(Method::GET, "index")]);
    }

    #[test]
    fn test_endpoint_with_methods() {
        let pairs = extract(&Endpoint("form"), Some(&["GET", "POST"])).unwrap();
        assert_eq!(pairs, vec![(Method::GET, "form"), (Method::POST, "form")]);
    }

    #[rstest]
    #[case("get")]
    #[case("FETCH")]
    #[case("")]
    fn test_endpoint_unknown_method(#[case] token: &str) {
        assert_eq!(
            extract(&Endpoint("form"), Some(&[token])),
            Err(ConfigurationError::UnknownMethod(token.to_string()))
        );
    }

    #[test]
    fn test_resource_operations() {
        let pairs = extract(&ResourceView(Item), None).unwrap();
        assert_eq!(
            pairs,
            vec![(Method::GET, "item.get"), (Method::POST, "item.post")]
        );
    }

    #[test]
    fn test_resource_rejects_methods() {
        assert_eq!(
            extract(&ResourceView(Item), Some(&["GET"])),
            Err(ConfigurationError::MethodsWithResource)
        );
        assert_eq!(
            extract(&Operations(vec![(Method::PUT, "put")]), Some(&["PUT"])),
            Err(ConfigurationError::MethodsWithResource)
        );
    }

    #[test]
    fn test_unrecognized_views() {
        assert_eq!(
            extract(&ResourceView(Empty), None),
            Err(ConfigurationError::UnrecognizedView)
        );
        assert_eq!(
            extract(&Opaque, Some(&["GET"])),
            Err(ConfigurationError::UnrecognizedView)
        );
    }
}
