use http::Method;
use pretty_assertions::{assert_eq, assert_ne};
use route_table::{Endpoint, Payload, RouteTable};

use helper::{entry, handler, listing, setup_system, Handler};

fn table(routes: &[(&str, Payload<Handler>)]) -> RouteTable<Handler> {
    let mut table = RouteTable::new();
    for (path, payload) in routes {
        table.add(path, payload.clone()).unwrap();
    }
    table
}

#[test]
fn iterates_routes_with_merged_metadata() {
    setup_system();
    let mut routes = RouteTable::new();
    assert!(listing(&routes).is_empty());

    routes.add("/test", Payload::new()).unwrap();
    routes.add("/test2/{me}", Payload::new()).unwrap();
    routes
        .add("/foo", Payload::new().with_metadata("foo", "bar"))
        .unwrap();
    routes
        .add("/foo", Payload::new().with_metadata("qux", "test"))
        .unwrap();

    assert_eq!(
        listing(&routes),
        vec![
            entry("/test", Payload::new()),
            entry("/test2/{me}", Payload::new()),
            entry(
                "/foo",
                Payload::new()
                    .with_metadata("foo", "bar")
                    .with_metadata("qux", "test")
            ),
        ]
    );

    let found = routes.lookup("/test2/you").unwrap();
    assert_eq!(found.pattern, "/test2/{me}");
    assert_eq!(found.params.get("me").map(String::as_str), Some("you"));
}

#[test]
fn iteration_follows_prefix_order() {
    let routes = table(&[
        ("/a/b", Payload::new()),
        ("/c", Payload::new()),
        ("/a", Payload::new()),
        ("/a/{x}", Payload::new()),
    ]);
    let paths = routes.iter().map(|route| route.path).collect::<Vec<_>>();
    assert_eq!(paths, vec!["/a", "/a/b", "/a/{x}", "/c"]);
    assert_eq!(
        routes.iter().map(|route| route.path).collect::<Vec<_>>(),
        paths
    );
}

#[test]
fn merges_disjoint_paths_in_operand_order() {
    let left = table(&[("/test", Payload::new())]);
    let right = table(&[("/test2", Payload::new())]);
    assert_eq!(
        listing(&left.merge(&right)),
        vec![entry("/test", Payload::new()), entry("/test2", Payload::new())]
    );
}

#[test]
fn merge_overrides_metadata_from_the_right() {
    let left = table(&[
        ("/test", Payload::new()),
        ("/test2", Payload::new().with_metadata("test", 1)),
    ]);
    let right = table(&[("/test2", Payload::new().with_metadata("test", 2))]);

    let merged = &left + &right;
    assert_eq!(
        listing(&merged),
        vec![
            entry("/test", Payload::new()),
            entry("/test2", Payload::new().with_metadata("test", 2)),
        ]
    );

    let merged = &right + &left;
    assert_eq!(
        listing(&merged),
        vec![
            entry("/test", Payload::new()),
            entry("/test2", Payload::new().with_metadata("test", 1)),
        ]
    );
}

#[test]
fn merge_keeps_keys_unique_to_either_side() {
    let left = table(&[
        ("/test", Payload::new()),
        ("/test2", Payload::new().with_metadata("test", 1)),
    ]);
    let right = table(&[("/test2", Payload::new().with_metadata("foo", "bar"))]);

    let expected = Payload::new()
        .with_metadata("test", 1)
        .with_metadata("foo", "bar");
    assert_eq!(left.merge(&right).get("/test2"), Some(&expected));
    assert_eq!(listing(&left.merge(&right)), listing(&right.merge(&left)));
}

#[test]
fn merges_method_registrations() {
    let mut left = RouteTable::new();
    left.register("/test").view(Endpoint("my_get")).unwrap();
    let mut right = RouteTable::new();
    right
        .register("/test")
        .methods(["POST"])
        .view(Endpoint("my_post"))
        .unwrap();

    assert_eq!(
        listing(&left),
        vec![entry("/test", Payload::new().with_handler(Method::GET, "my_get"))]
    );
    assert_eq!(
        listing(&right),
        vec![entry("/test", Payload::new().with_handler(Method::POST, "my_post"))]
    );
    assert_eq!(
        listing(&left.merge(&right)),
        vec![entry(
            "/test",
            Payload::new()
                .with_handler(Method::GET, "my_get")
                .with_handler(Method::POST, "my_post")
        )]
    );
}

#[test]
fn merge_is_not_commutative_for_shared_methods() {
    let mut left = RouteTable::new();
    left.register("/test").view(Endpoint("my_get")).unwrap();
    let mut right = RouteTable::new();
    right
        .register("/test")
        .methods(["GET"])
        .view(Endpoint("my_other_get"))
        .unwrap();

    let forward = left.merge(&right);
    let backward = right.merge(&left);
    assert_eq!(handler(&forward, "/test", Method::GET), Some("my_other_get"));
    assert_eq!(handler(&backward, "/test", Method::GET), Some("my_get"));
    assert_ne!(listing(&forward), listing(&backward));

    assert_eq!(handler(&left, "/test", Method::GET), Some("my_get"));
    assert_eq!(handler(&right, "/test", Method::GET), Some("my_other_get"));
}

#[test]
fn merge_with_empty_table_is_a_copy() {
    let routes = table(&[
        ("/a", Payload::new().with_handler(Method::GET, "a")),
        ("/b/{id:digit}", Payload::new().with_handler(Method::PUT, "b")),
    ]);
    let empty = RouteTable::new();
    assert_eq!(listing(&routes.merge(&empty)), listing(&routes));
    assert_eq!(listing(&empty.merge(&routes)), listing(&routes));
}

#[test]
fn add_overwrites_same_methods_only() {
    let mut routes = RouteTable::new();
    routes
        .add("/a", Payload::new().with_handler(Method::GET, "h1"))
        .unwrap();
    routes
        .add("/a", Payload::new().with_handler(Method::POST, "h2"))
        .unwrap();
    routes
        .add("/a", Payload::new().with_handler(Method::GET, "h3"))
        .unwrap();
    assert_eq!(handler(&routes, "/a", Method::GET), Some("h3"));
    assert_eq!(handler(&routes, "/a", Method::POST), Some("h2"));
}

#[test]
fn merge_precedence_follows_the_right_operand() {
    let a = table(&[("/x", Payload::new().with_handler(Method::GET, "g1"))]);
    let b = table(&[(
        "/x",
        Payload::new()
            .with_handler(Method::GET, "g2")
            .with_handler(Method::POST, "p1"),
    )]);

    let ab = a.merge(&b);
    let ba = b.merge(&a);
    assert_eq!(handler(&ab, "/x", Method::GET), Some("g2"));
    assert_eq!(handler(&ab, "/x", Method::POST), Some("p1"));
    assert_eq!(handler(&ba, "/x", Method::GET), Some("g1"));
    assert_eq!(handler(&ba, "/x", Method::POST), Some("p1"));
    assert_ne!(ab.get("/x"), ba.get("/x"));
}
