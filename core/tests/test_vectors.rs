//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Request bodies are compared as parsed JSON so
//! field order does not matter.

use instatus_core::{
    ClientConfig, Component, ComponentStatus, HttpMethod, HttpRequest, HttpResponse, InstatusClient, Page, PageUpdate,
    Transport,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

/// The vectors never reach a transport; build/parse are exercised directly.
struct Unreachable;

impl Transport for Unreachable {
    fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, instatus_core::ApiError> {
        panic!("test vectors must not perform I/O")
    }
}

fn client() -> InstatusClient {
    InstatusClient::with_transport(
        ClientConfig::new("vector-key").with_base_url(BASE_URL),
        std::sync::Arc::new(Unreachable),
    )
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v[key].as_str().unwrap_or_default().to_string()
}

fn opt_field(v: &Value, key: &str) -> Option<String> {
    v[key].as_str().map(str::to_string)
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap())
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(req.header("authorization"), Some("Bearer vector-key"), "{name}: auth");
    assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn component_from(v: &Value) -> Component {
    Component {
        id: None,
        name: str_field(v, "name"),
        description: str_field(v, "description"),
        status: v["status"].as_str().unwrap().parse::<ComponentStatus>().unwrap(),
        show_uptime: v["show_uptime"].as_bool().unwrap_or(false),
        order: v["order"].as_i64(),
        grouped: v["grouped"].as_bool().unwrap_or(false),
        group_id: opt_field(v, "group_id"),
        group_name: None,
        archived: v["archived"].as_bool().unwrap_or(false),
        unique_email: None,
        translations: None,
    }
}

fn check_component(name: &str, got: &Component, expected: &Value) {
    assert_eq!(got.id, opt_field(expected, "id"), "{name}: id");
    assert_eq!(got.name, str_field(expected, "name"), "{name}: name");
    assert_eq!(got.description, str_field(expected, "description"), "{name}: description");
    assert_eq!(got.status.as_str(), expected["status"].as_str().unwrap(), "{name}: status");
    assert_eq!(got.show_uptime, expected["show_uptime"].as_bool().unwrap(), "{name}: show_uptime");
    assert_eq!(got.order, expected["order"].as_i64(), "{name}: order");
    assert_eq!(got.grouped, expected["grouped"].as_bool().unwrap(), "{name}: grouped");
    assert_eq!(got.group_id, opt_field(expected, "group_id"), "{name}: group_id");
    assert_eq!(got.group_name, opt_field(expected, "group_name"), "{name}: group_name");
    assert_eq!(got.archived, expected["archived"].as_bool().unwrap(), "{name}: archived");
    assert_eq!(got.unique_email, opt_field(expected, "unique_email"), "{name}: unique_email");
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[test]
fn component_test_vectors() {
    let raw = include_str!("../../test-vectors/components.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let page_id = case["page_id"].as_str().unwrap();
        let component_id = case["component_id"].as_str().unwrap_or_default();

        match case["operation"].as_str().unwrap() {
            "create" => {
                let input = component_from(&case["input"]);
                let req = c.build_create_component(page_id, &input).unwrap();
                check_request(name, &req, &case["expected_request"]);
                let got = c.parse_create_component(simulated(case)).unwrap();
                check_component(name, &got, &case["expected_result"]);
            }
            "get" => {
                let req = c.build_get_component(page_id, component_id).unwrap();
                check_request(name, &req, &case["expected_request"]);
                let got = c.parse_get_component(simulated(case)).unwrap();
                check_component(name, &got, &case["expected_result"]);
            }
            "update" => {
                let input = component_from(&case["input"]);
                let req = c.build_update_component(page_id, component_id, &input).unwrap();
                check_request(name, &req, &case["expected_request"]);
                let got = c.parse_update_component(simulated(case)).unwrap();
                check_component(name, &got, &case["expected_result"]);
            }
            "delete" => {
                let req = c.build_delete_component(page_id, component_id).unwrap();
                check_request(name, &req, &case["expected_request"]);
                let err = c.parse_delete(simulated(case)).unwrap_err();
                let expected_status = case["expected_error"]["status"].as_u64().unwrap() as u16;
                assert_eq!(err.status(), Some(expected_status), "{name}: status");
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[test]
fn page_test_vectors() {
    let raw = include_str!("../../test-vectors/pages.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        match case["operation"].as_str().unwrap() {
            "create" => {
                let input = &case["input"];
                let page = Page {
                    email: str_field(input, "email"),
                    name: str_field(input, "name"),
                    subdomain: str_field(input, "subdomain"),
                    ..Page::default()
                };
                let req = c.build_create_status_page(&page).unwrap();
                check_request(name, &req, &case["expected_request"]);

                let got = c.parse_create_status_page(&page, simulated(case)).unwrap();
                let expected = &case["expected_result"];
                assert_eq!(got.id, opt_field(expected, "id"), "{name}: id");
                assert_eq!(got.workspace_id, opt_field(expected, "workspace_id"), "{name}: workspace_id");
                assert_eq!(got.workspace_slug, opt_field(expected, "workspace_slug"), "{name}: slug");
                assert_eq!(got.email, str_field(expected, "email"), "{name}: email");
                assert_eq!(got.name, str_field(expected, "name"), "{name}: name");
                assert_eq!(got.subdomain, str_field(expected, "subdomain"), "{name}: subdomain");
            }
            "update" => {
                let input = &case["input"];
                let update = PageUpdate {
                    email: str_field(input, "email"),
                    name: str_field(input, "name"),
                    subdomain: str_field(input, "subdomain"),
                    custom_domain: opt_field(input, "custom_domain"),
                    ..PageUpdate::default()
                };
                let page_id = case["page_id"].as_str().unwrap();
                let req = c.build_update_status_page(page_id, &update).unwrap();
                check_request(name, &req, &case["expected_request"]);

                let got = c.parse_update_status_page(&update, simulated(case)).unwrap();
                let expected = &case["expected_result"];
                assert_eq!(got.email, str_field(expected, "email"), "{name}: email");
                assert_eq!(got.name, str_field(expected, "name"), "{name}: name");
                assert_eq!(got.subdomain, str_field(expected, "subdomain"), "{name}: subdomain");
                assert_eq!(got.custom_domain, opt_field(expected, "custom_domain"), "{name}: custom_domain");
            }
            "delete" => {
                let expected = case["expected_requests"].as_array().unwrap();
                let page_req = c.build_delete_status_page(case["page_id"].as_str().unwrap()).unwrap();
                let workspace_req = c
                    .build_delete_workspace(case["workspace_id"].as_str().unwrap())
                    .unwrap();
                check_request(name, &page_req, &expected[0]);
                check_request(name, &workspace_req, &expected[1]);
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}
