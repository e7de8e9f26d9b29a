//! Tests for the HTTP request parser.

#[cfg(test)]
mod tests {
    use crate::parser::{
        parse_request, Enforcer, EnforcerRules, ParseError, RequestParser, DEFAULT_HEADER_LIMIT,
    };

    fn request_with_headers(count: usize, terminator: &str) -> String {
        let mut request = String::from("GET / HTTP/1.1\r\n");
        for i in 0..count {
            request.push_str(&format!("X-Header-{i}: value{i}\r\n"));
        }
        request.push_str(terminator);
        request
    }

    #[test]
    fn test_parse_simple_get_request() {
        let result = parse_request("GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(result.method, "GET");
        assert_eq!(result.target, "/");
        assert_eq!(result.version, 1.1);
        assert_eq!(result.headers.len(), 1);
        assert_eq!(result.header("Host"), Some("x"));
        assert_eq!(result.body, None);
    }

    #[test]
    fn test_parse_post_with_body() {
        let result = parse_request("POST /ifttt HTTP/1.1\r\n\r\nhello").unwrap();
        assert_eq!(result.method, "POST");
        assert_eq!(result.target, "/ifttt");
        assert!(result.headers.is_empty());
        assert_eq!(result.body.as_deref(), Some("hello"));
    }

    #[test]
    fn test_body_lines_are_concatenated() {
        let result = parse_request("POST / HTTP/1.1\r\nA: 1\r\n\r\nline1\r\nline2\r\n").unwrap();
        assert_eq!(result.body.as_deref(), Some("line1line2"));
    }

    #[test]
    fn test_blank_body_is_absent() {
        let result = parse_request("POST / HTTP/1.1\r\n\r\n\r\n\r\n").unwrap();
        assert_eq!(result.body, None);
    }

    #[test]
    fn test_no_blank_line_means_no_body() {
        let result = parse_request("GET / HTTP/1.1\r\nHost: x").unwrap();
        assert_eq!(result.header("Host"), Some("x"));
        assert_eq!(result.body, None);

        let result = parse_request("GET / HTTP/1.1").unwrap();
        assert!(result.headers.is_empty());
        assert_eq!(result.body, None);
    }

    #[test]
    fn test_bad_method_short_circuits() {
        assert_eq!(parse_request("PUT / HTTP/1.1\r\n\r\n"), Err(ParseError::BadMethod));
        assert_eq!(parse_request("PUT /nope HTTP/abc\r\n\r\n"), Err(ParseError::BadMethod));
        // method alone is still judged as a method first
        assert_eq!(parse_request("PUT"), Err(ParseError::BadMethod));
        assert_eq!(parse_request("get / HTTP/1.1\r\n\r\n"), Err(ParseError::BadMethod));
        assert_eq!(parse_request(""), Err(ParseError::BadMethod));
    }

    #[test]
    fn test_bad_target() {
        assert_eq!(parse_request("GET /index.html HTTP/1.1\r\n\r\n"), Err(ParseError::BadTarget));
        // no prefix matching
        assert_eq!(parse_request("GET /ifttt/x HTTP/1.1\r\n\r\n"), Err(ParseError::BadTarget));
        assert_eq!(parse_request("GET /nope HTTP/abc\r\n\r\n"), Err(ParseError::BadTarget));
    }

    #[test]
    fn test_bad_version() {
        assert_eq!(parse_request("GET / HTTP/2.0\r\n\r\n"), Err(ParseError::BadVersion));
        assert_eq!(parse_request("GET / HTTP/abc\r\n\r\n"), Err(ParseError::BadVersion));
        assert_eq!(parse_request("GET / HTTP/\r\n\r\n"), Err(ParseError::BadVersion));
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        assert_eq!(parse_request("GET"), Err(ParseError::Malformed));
        assert_eq!(parse_request("GET\r\nHost: x\r\n\r\n"), Err(ParseError::Malformed));
        assert_eq!(parse_request("GET /\r\n\r\n"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_extra_request_line_fields_are_ignored() {
        let result = parse_request("GET / HTTP/1.1 trailing\r\n\r\n").unwrap();
        assert_eq!(result.version, 1.1);
    }

    #[test]
    fn test_header_without_delimiter_is_skipped() {
        let result =
            parse_request("GET / HTTP/1.1\r\nInvalidHeader\r\nNoSpace:x\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(result.headers.len(), 1);
        assert!(!result.has_header("InvalidHeader"));
        assert!(!result.has_header("NoSpace"));
        assert_eq!(result.header("Host"), Some("x"));
    }

    #[test]
    fn test_header_trimming_and_duplicates() {
        let result =
            parse_request("GET / HTTP/1.1\r\nAccept:   text/plain  \r\nAccept: */*\r\n\r\n").unwrap();
        assert_eq!(result.header("Accept"), Some("*/*"));

        let result = parse_request("GET / HTTP/1.1\r\nHost:   spaced   \r\n\r\n").unwrap();
        assert_eq!(result.header("Host"), Some("spaced"));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let result = parse_request("GET / HTTP/1.1\r\nhost: x\r\n\r\n").unwrap();
        assert_eq!(result.header("host"), Some("x"));
        assert_eq!(result.header("Host"), None);
    }

    #[test]
    fn test_header_value_stops_at_next_delimiter() {
        let result = parse_request("GET / HTTP/1.1\r\nX-Pair: a: b\r\n\r\n").unwrap();
        assert_eq!(result.header("X-Pair"), Some("a"));
    }

    #[test]
    fn test_too_many_headers() {
        let request = request_with_headers(DEFAULT_HEADER_LIMIT + 1, "\r\n");
        assert_eq!(parse_request(&request), Err(ParseError::RequestTooLong));
    }

    #[test]
    fn test_headers_filling_limit_without_blank_line() {
        let request = request_with_headers(DEFAULT_HEADER_LIMIT, "");
        assert_eq!(parse_request(&request), Err(ParseError::RequestTooLong));
    }

    #[test]
    fn test_limit_is_checked_before_blank_line() {
        let request = request_with_headers(DEFAULT_HEADER_LIMIT, "\r\n");
        assert_eq!(parse_request(&request), Err(ParseError::RequestTooLong));

        let request = request_with_headers(DEFAULT_HEADER_LIMIT - 1, "\r\n");
        let result = parse_request(&request).unwrap();
        assert_eq!(result.headers.len(), DEFAULT_HEADER_LIMIT - 1);
    }

    #[test]
    fn test_skipped_lines_count_toward_limit() {
        let parser = RequestParser::new(EnforcerRules::default().with_header_limit(2));
        assert_eq!(parser.enforcer().header_limit(), 2);
        assert!(parser.parse("GET / HTTP/1.1\r\nA: 1\r\n\r\n").is_ok());
        assert_eq!(
            parser.parse("GET / HTTP/1.1\r\nbogus\r\nA: 1\r\n\r\n"),
            Err(ParseError::RequestTooLong)
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = EnforcerRules::default()
            .with_methods(["PUT"])
            .with_targets(["/upload"])
            .with_versions([1.0, 2.0]);
        let parser = RequestParser::new(rules);
        assert_eq!(parser.enforcer().rules().allowed_versions, vec![1.0, 2.0]);
        assert!(parser.enforcer().validate_method("PUT").is_ok());

        let result = parser.parse("PUT /upload HTTP/2.0\r\n\r\ndata").unwrap();
        assert_eq!(result.method, "PUT");
        assert_eq!(result.version, 2.0);
        assert_eq!(result.body.as_deref(), Some("data"));

        assert_eq!(parser.parse("GET /upload HTTP/1.0\r\n\r\n"), Err(ParseError::BadMethod));
        assert_eq!(parser.parse("PUT / HTTP/1.0\r\n\r\n"), Err(ParseError::BadTarget));
        assert_eq!(parser.parse("PUT /upload HTTP/1.1\r\n\r\n"), Err(ParseError::BadVersion));
    }

    #[test]
    fn test_enforcer_allow_sets() {
        let enforcer = Enforcer::default();
        for method in ["GET", "POST", "PUT", "DELETE", "get", "GET "] {
            let expected = matches!(method, "GET" | "POST");
            assert_eq!(enforcer.validate_method(method).is_ok(), expected, "method {method:?}");
        }
        for target in ["/", "/ifttt", "/index.html", "", "/IFTTT"] {
            let expected = matches!(target, "/" | "/ifttt");
            assert_eq!(enforcer.validate_target(target).is_ok(), expected, "target {target:?}");
        }
        for version in ["1.1", "1.10", "1.0", "2", "abc", ""] {
            let expected = matches!(version, "1.1" | "1.10");
            assert_eq!(enforcer.validate_version(version).is_ok(), expected, "version {version:?}");
        }
        assert_eq!(enforcer.validate_version("abc"), Err(ParseError::BadVersion));
        assert_eq!(enforcer.validate_version("2.0"), Err(ParseError::BadVersion));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ParseError::Malformed.code(), 1);
        assert_eq!(ParseError::BadMethod.code(), 2);
        assert_eq!(ParseError::BadTarget.code(), 3);
        assert_eq!(ParseError::BadVersion.code(), 4);
        assert_eq!(ParseError::RequestTooLong.code(), 5);
        assert_eq!(ParseError::code_of(&parse_request("GET / HTTP/1.1\r\n\r\n")), 0);
        assert_eq!(ParseError::code_of(&parse_request("GET / HTTP/2.0\r\n\r\n")), 4);
    }

    #[test]
    fn test_rules_from_partial_json() {
        let rules: EnforcerRules =
            serde_json::from_str(r#"{"allowed_methods": ["PUT"], "allowed_versions": [1.0]}"#).unwrap();
        assert_eq!(rules.header_limit, DEFAULT_HEADER_LIMIT);
        assert!(rules.allowed_methods.contains("PUT"));
        assert!(!rules.allowed_methods.contains("GET"));
        assert!(rules.allowed_targets.contains("/ifttt"));
        assert_eq!(rules.allowed_versions, vec![1.0]);
    }

    #[test]
    fn test_request_to_json() {
        let result = parse_request("POST / HTTP/1.1\r\nHost: x\r\n\r\nhi").unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"]["Host"], "x");
        assert_eq!(json["body"], "hi");
    }
}
