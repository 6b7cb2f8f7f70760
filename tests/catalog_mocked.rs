/// Catalog client tests with mocked external APIs.
/// Exercises the lookup workflow without hitting the real catalog.
use persona_api::catalog::CatalogClient;
use persona_api::config::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHOOLS_PATH: &str = "/api/explore/v2.1/catalog/datasets/us-public-schools/records";
const UNIVERSITIES_PATH: &str =
    "/api/explore/v2.1/catalog/datasets/us-colleges-and-universities/records";

/// Helper function to create a client pointed at the mock server.
fn test_client(base_url: String) -> CatalogClient {
    let config = Config {
        port: 8080,
        catalog_base_url: base_url,
        catalog_timeout_secs: 5,
    };
    CatalogClient::new(&config).expect("client should build")
}

fn school_body() -> serde_json::Value {
    serde_json::json!({
        "total_count": 1,
        "results": [{
            "name": "Lone Star High School",
            "ncesid": "480000100001",
            "zip": "75035",
            "website": "www.lonestar.example",
            "address": "2606 Rogers Rd",
            "city": "FRISCO",
            "state": "TX",
            "telephone": "(469) 555-0100",
            "st_grade": "9",
            "end_grade": "12"
        }]
    })
}

#[tokio::test]
async fn school_lookup_returns_the_single_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .and(query_param("where", r#"state="TX" AND end_grade = "12""#))
        .and(query_param("order_by", "random(42)"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(school_body()))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let school = client.lookup_school(42, "TX", None).await;

    let school = school.expect("should resolve a school");
    assert_eq!(school.name, "Lone Star High School");
    assert_eq!(school.ncesid, "480000100001");
    assert_eq!(school.end_grade, "12");
}

#[tokio::test]
async fn city_miss_falls_back_to_state_wide_filter() {
    let mock_server = MockServer::start().await;

    // City-filtered query finds nothing...
    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .and(query_param(
            "where",
            r#"state="TX" AND end_grade = "12" AND city="NOWHEREVILLE""#,
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "total_count": 0, "results": [] })),
        )
        .mount(&mock_server)
        .await;

    // ...and the state-wide retry succeeds.
    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .and(query_param("where", r#"state="TX" AND end_grade = "12""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(school_body()))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let school = client.lookup_school(42, "TX", Some("Nowhereville")).await;

    assert_eq!(school.expect("fallback should resolve").city, "FRISCO");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "expected city query plus one fallback");
}

#[tokio::test]
async fn absent_state_skips_the_network_entirely() {
    let mock_server = MockServer::start().await;
    let client = test_client(mock_server.uri());

    assert!(client.lookup_school(42, "", None).await.is_none());
    assert!(client.lookup_school(42, "random", None).await.is_none());
    assert!(client.lookup_university(42, "  ", None).await.is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no catalog call should be issued");
}

#[tokio::test]
async fn not_available_marker_is_normalized() {
    let mock_server = MockServer::start().await;

    let mut body = school_body();
    body["results"][0]["website"] = serde_json::json!("NOT AVAILABLE");
    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let school = client.lookup_school(42, "TX", None).await.unwrap();
    assert_eq!(school.website, "");
}

#[tokio::test]
async fn server_error_folds_to_no_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    assert!(client.lookup_school(42, "TX", None).await.is_none());
}

#[tokio::test]
async fn malformed_body_folds_to_no_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    assert!(client.lookup_school(7, "TX", None).await.is_none());
}

#[tokio::test]
async fn university_lookup_filters_public_institutions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(UNIVERSITIES_PATH))
        .and(query_param("where", r#"state="CA" AND type="1""#))
        .and(query_param("order_by", "random(7)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": 1,
            "results": [{
                "name": "California State University",
                "ipedsid": "110000",
                "zip": "90032",
                "website": "www.calstate.example",
                "address": "5151 State University Dr",
                "city": "LOS ANGELES",
                "state": "CA",
                "telephone": "(323) 555-0190",
                "type": "1"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let university = client.lookup_university(7, "CA", None).await;

    let university = university.expect("should resolve a university");
    assert_eq!(university.name, "California State University");
    assert_eq!(university.type_code, "1");
}

#[tokio::test]
async fn city_filter_is_uppercased_for_the_catalog() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(UNIVERSITIES_PATH))
        .and(query_param(
            "where",
            r#"state="CA" AND type="1" AND city="BERKELEY""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": 1,
            "results": [{
                "name": "Berkeley City College",
                "ipedsid": "111111",
                "zip": "94704",
                "website": "www.berkeley.example",
                "address": "2050 Center St",
                "city": "BERKELEY",
                "state": "CA",
                "telephone": "(510) 555-0142",
                "type": "1"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let university = client.lookup_university(3, "CA", Some("Berkeley")).await;
    assert_eq!(university.unwrap().city, "BERKELEY");
}

#[tokio::test]
async fn same_seed_issues_the_same_ordering() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCHOOLS_PATH))
        .and(query_param("order_by", "random(555)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(school_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = test_client(mock_server.uri());
    let first = client.lookup_school(555, "TX", None).await;
    let second = client.lookup_school(555, "TX", None).await;
    assert_eq!(first, second);
}
