//! Verify request building and response parsing against the JSON vectors in
//! `test-vectors/`.
//!
//! Expected bodies are compared as parsed JSON, so key order in the vector
//! files does not matter.

use menus_core::{
    ApiError, ApiResponse, HttpResponse, MenusClient, MenusFilter, Pagination, RateLimit,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> MenusClient {
    MenusClient::with_base_url("TOKEN", BASE_URL)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pagination = || -> Pagination {
            serde_json::from_value(case["pagination"].clone()).unwrap()
        };
        let id = || case["id"].as_u64().unwrap();

        let req = match case["endpoint"].as_str().unwrap() {
            "get_menus" => {
                let filter: MenusFilter = serde_json::from_value(case["filter"].clone()).unwrap();
                c.build_get_menus(&filter)
            }
            "get_menus_id" => c.build_get_menus_id(id(), pagination()),
            "get_menus_id_pages" => c.build_get_menus_id_pages(id(), pagination()),
            "get_menus_id_dishes" => c.build_get_menus_id_dishes(id(), pagination()),
            "get_dishes_search" => {
                c.build_get_dishes_search(case["query"].as_str().unwrap(), pagination())
            }
            other => panic!("{name}: unknown endpoint {other}"),
        };

        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", case["expected_url"].as_str().unwrap()),
            "{name}: url"
        );
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let headers: Vec<(String, String)> = case["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers,
            body: case["body"].as_str().unwrap().to_string(),
        };

        let mut c = client();
        let result = c.parse_response(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "MissingHeader" => {
                    assert!(matches!(err, ApiError::MissingHeader(_)), "{name}: {err}")
                }
                "InvalidHeader" => {
                    assert!(matches!(err, ApiError::InvalidHeader { .. }), "{name}: {err}")
                }
                "Deserialization" => {
                    assert!(matches!(err, ApiError::Deserialization(_)), "{name}: {err}")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let result = result.unwrap();
        if case.get("expected_no_result").is_some() {
            assert_eq!(result, ApiResponse::NoResult, "{name}: sentinel");
        } else {
            assert_eq!(
                result,
                ApiResponse::Json(case["expected_result"].clone()),
                "{name}: parsed result"
            );
        }

        let expected: RateLimit = serde_json::from_value(case["expected_rate_limit"].clone()).unwrap();
        assert_eq!(c.cached_rate_limit(), Some(expected), "{name}: rate limit");
    }
}
