//! Tests for route registration, lookup and handler invocation.

#[cfg(test)]
mod router_tests {
    use std::collections::HashMap;
    use serde::{Deserialize, Serialize};

    use crate::parser::{HttpRequest, HttpVersion, Method};
    use crate::router::{Context, Error, Handler, Reply, Route, RouteTable};
    use crate::server::StatusCode;

    fn request(method: Method, target: &str) -> HttpRequest {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "localhost".to_string());
        HttpRequest::new(method, target, HttpVersion::Http11, headers)
    }

    fn body_of(reply: Reply) -> String {
        String::from_utf8(reply.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut table = RouteTable::new();
        table.get("/a", Handler::plain(|| "a")).unwrap();
        table.post("/b", Handler::plain(|| "b")).unwrap();
        table.delete("/c", Handler::plain(|| "c")).unwrap();

        let patterns: Vec<&str> = table.routes().iter().map(Route::pattern).collect();
        assert_eq!(patterns, vec!["/a", "/b", "/c"]);
        assert_eq!(table.routes()[1].method(), Method::POST);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_invalid_pattern_is_rejected_and_not_stored() {
        let mut table = RouteTable::new();
        table.get("/ok", Handler::plain(|| "ok")).unwrap();

        let result = table.get("/broken/(\\d+", Handler::arg(|id| id));
        assert!(matches!(result, Err(Error::InvalidPattern { ref pattern, .. }) if pattern == "/broken/(\\d+"));

        // Later registrations are unaffected.
        table.get("/after", Handler::plain(|| "after")).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.find(Method::GET, "/after").is_some());
    }

    #[test]
    fn test_unbalanced_pattern_is_not_rescued_by_anchoring() {
        let mut table = RouteTable::new();
        let result = table.get("/a)|(/b", Handler::arg(|b| b));
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn test_arity_mismatch_is_rejected_at_registration() {
        let mut table = RouteTable::new();

        let result = table.get("/users/(\\d+)/posts/(\\d+)", Handler::arg(|id| id));
        assert!(matches!(result, Err(Error::ArityMismatch { expected: 1, found: 2 })));

        let result = table.get("/users/(\\d+)", Handler::plain(|| "none"));
        assert!(matches!(result, Err(Error::ArityMismatch { expected: 0, found: 1 })));

        assert!(table.is_empty());
    }

    #[test]
    fn test_non_capturing_groups_do_not_count() {
        let mut table = RouteTable::new();
        table.get("/(?:en|de)/about", Handler::plain(|| "about")).unwrap();
        let found = table.find(Method::GET, "/de/about").unwrap();
        assert!(found.captures.is_empty());
    }

    #[test]
    fn test_find_requires_full_match() {
        let mut table = RouteTable::new();
        table.get("/users/(\\d+)", Handler::arg(|id| id)).unwrap();

        assert!(table.find(Method::GET, "/users/123").is_some());
        assert!(table.find(Method::GET, "/users/123/extra").is_none());
        assert!(table.find(Method::GET, "/api/users/123").is_none());
        assert!(table.find(Method::GET, "/users/").is_none());
    }

    #[test]
    fn test_full_match_with_alternation() {
        // Leftmost-first matching of `a|ab` would stop at "a"; the route must still match "ab".
        let mut table = RouteTable::new();
        table.get("/a|/ab", Handler::plain(|| "hit")).unwrap();
        assert!(table.find(Method::GET, "/ab").is_some());
        assert!(table.find(Method::GET, "/a").is_some());
        assert!(table.find(Method::GET, "/abc").is_none());
    }

    #[test]
    fn test_method_must_match_exactly() {
        let mut table = RouteTable::new();
        table.get("/hello", Handler::plain(|| "hi")).unwrap();

        assert!(table.find(Method::GET, "/hello").is_some());
        assert!(table.find(Method::POST, "/hello").is_none());
        assert!(table.find(Method::HEAD, "/hello").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RouteTable::new();
        table.get("/users/me", Handler::plain(|| "me")).unwrap();
        table.get("/users/([a-z]+)", Handler::arg(|name| name)).unwrap();
        table.get("/users/(.+)", Handler::arg(|rest| rest)).unwrap();

        let found = table.find(Method::GET, "/users/me").unwrap();
        assert_eq!(found.route.pattern(), "/users/me");

        let found = table.find(Method::GET, "/users/alice").unwrap();
        assert_eq!(found.route.pattern(), "/users/([a-z]+)");
        assert_eq!(found.captures, vec!["alice".to_string()]);

        let found = table.find(Method::GET, "/users/Alice").unwrap();
        assert_eq!(found.route.pattern(), "/users/(.+)");
    }

    #[test]
    fn test_registration_order_decides_shadowing() {
        let mut table = RouteTable::new();
        table.get("/files/(.*)", Handler::arg(|path| path)).unwrap();
        table.get("/files/readme", Handler::plain(|| "readme")).unwrap();

        let found = table.find(Method::GET, "/files/readme").unwrap();
        assert_eq!(found.route.pattern(), "/files/(.*)");
        assert_eq!(found.captures, vec!["readme".to_string()]);
    }

    #[test]
    fn test_captures_in_group_order() {
        let mut table = RouteTable::new();
        table
            .get("/repos/([^/]+)/([^/]+)/issues/(\\d+)", Handler::with_args(3, |args| args.join(",")))
            .unwrap();

        let found = table.find(Method::GET, "/repos/rust-lang/regex/issues/42").unwrap();
        assert_eq!(found.captures, vec!["rust-lang", "regex", "42"]);
    }

    #[test]
    fn test_unmatched_optional_group_is_empty() {
        let mut table = RouteTable::new();
        table.get("/page(/(\\d+))?", Handler::with_args(2, |args| args.join("|"))).unwrap();

        let found = table.find(Method::GET, "/page").unwrap();
        assert_eq!(found.captures, vec![String::new(), String::new()]);

        let found = table.find(Method::GET, "/page/3").unwrap();
        assert_eq!(found.captures, vec!["/3", "3"]);
    }

    #[test]
    fn test_invoke_each_handler_shape() {
        let table = RouteTable::new();
        let mut ctx = Context::new(request(Method::GET, "/x?who=query"), &table);

        let plain = Handler::plain(|| "plain");
        assert_eq!(body_of(plain.invoke(&mut ctx, vec![]).unwrap()), "plain");

        let context_only = Handler::with_context(|ctx: &mut Context| ctx.param("who").unwrap_or("nobody").to_string());
        assert_eq!(body_of(context_only.invoke(&mut ctx, vec![]).unwrap()), "query");

        let args_only = Handler::with_args(2, |args| format!("{}-{}", args[0], args[1]));
        let reply = args_only.invoke(&mut ctx, vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(body_of(reply), "a-b");

        let both = Handler::context_arg(|ctx: &mut Context, name: String| format!("{} {}", ctx.path(), name));
        assert_eq!(body_of(both.invoke(&mut ctx, vec!["bob".into()]).unwrap()), "/x bob");

        assert!(!plain.takes_context());
        assert!(both.takes_context());
        assert_eq!(args_only.arity(), 2);
    }

    #[test]
    fn test_invoke_rejects_wrong_capture_count() {
        let table = RouteTable::new();
        let mut ctx = Context::new(request(Method::GET, "/"), &table);

        let handler = Handler::with_args(2, |args| args.join(""));
        let too_few = handler.invoke(&mut ctx, vec!["only".into()]);
        assert!(matches!(too_few, Err(Error::ArityMismatch { expected: 2, found: 1 })));

        let too_many = handler.invoke(&mut ctx, vec!["a".into(), "b".into(), "c".into()]);
        assert!(matches!(too_many, Err(Error::ArityMismatch { expected: 2, found: 3 })));

        let plain = Handler::plain(|| "x");
        assert!(matches!(plain.invoke(&mut ctx, vec!["extra".into()]), Err(Error::ArityMismatch { .. })));
    }

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Person {
        Name: String,
    }

    #[test]
    fn test_reply_encoding() {
        assert_eq!(Reply::from("<h1>hi</h1>").encode().unwrap(), b"<h1>hi</h1>");
        assert_eq!(Reply::from("\"quoted\"".to_string()).encode().unwrap(), b"\"quoted\"");
        assert_eq!(Reply::raw(vec![0u8, 1, 2]).encode().unwrap(), vec![0u8, 1, 2]);

        let reply = Reply::json(Person { Name: "bob".to_string() });
        assert!(reply.is_structured());
        assert_eq!(reply.encode().unwrap(), br#"{"Name":"bob"}"#);
    }

    #[test]
    fn test_reply_encoding_failure() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "tuple keys are not valid JSON object keys");
        assert!(Reply::json(map).encode().is_err());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Login {
        name: String,
        role: Option<String>,
    }

    #[test]
    fn test_context_params_merge_query_and_form() {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "localhost".to_string());
        headers.insert("Content-Type".to_string(), "application/x-www-form-urlencoded".to_string());
        let request = HttpRequest::with_body(
            Method::POST,
            "/login?name=from-query&page=2",
            HttpVersion::Http11,
            headers,
            b"name=from-body&role=admin".to_vec(),
        );

        let table = RouteTable::new();
        let ctx = Context::new(request, &table);
        assert_eq!(ctx.param("name"), Some("from-body"));
        assert_eq!(ctx.param("page"), Some("2"));
        assert_eq!(ctx.param("role"), Some("admin"));
        assert_eq!(ctx.params().len(), 3);

        let login: Login = ctx.form().unwrap();
        assert_eq!(login, Login { name: "from-body".to_string(), role: Some("admin".to_string()) });
    }

    #[test]
    fn test_context_response_state_and_routes() {
        let mut table = RouteTable::new();
        table.get("/a", Handler::plain(|| "a")).unwrap();

        let mut ctx = Context::new(request(Method::GET, "/a"), &table);
        assert_eq!(ctx.status(), StatusCode::Ok);
        assert_eq!(ctx.routes().len(), 1);
        assert_eq!(ctx.header("host"), Some("localhost"));

        ctx.set_status(StatusCode::Created);
        ctx.set_header("X-Trace", "abc");
        let (status, headers) = ctx.into_response_parts();
        assert_eq!(status, StatusCode::Created);
        assert_eq!(headers.get("X-Trace").map(String::as_str), Some("abc"));
    }
}
