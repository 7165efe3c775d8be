//! Tests for the YQL client against a mock endpoint

mod common;

use common::*;
use myql::client::{OAuth1, Yql};
use myql::constants::COMMUNITY_ENV;
use myql::contrib::{StockRetriever, Weather};
use myql::models::{ResponseFormat, TemperatureUnit};
use myql::query::{Condition, FuncFilter, RemoteFilter};
use tempfile::TempDir;
use wiremock::matchers::{header_exists, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_select_sends_query_and_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .and(query_param(
            "q",
            "SELECT name,code FROM geo.countries WHERE place = 'North America' LIMIT 2",
        ))
        .and(query_param("format", "json"))
        .and(query_param("diagnostics", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let yql = Yql::new(mock_config(&server)).unwrap();
    let response = yql
        .select("geo.countries", &["name", "code"])
        .filter(Condition::equals("place", "North America"))
        .limit(2)
        .send()
        .await
        .unwrap();

    assert!(response.is_success());
    let results = response.results().unwrap();
    assert_eq!(results["place"][1]["code"], "MX");
}

#[tokio::test]
async fn test_raw_query_with_xml_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .and(query_param("q", "desc weather.forecast"))
        .and(query_param("format", "xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<query><results><table/></results></query>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let yql = Yql::new(mock_config(&server)).unwrap();
    let response = yql
        .raw_query("desc weather.forecast", Some(ResponseFormat::Xml))
        .await
        .unwrap();

    assert_eq!(response.format(), ResponseFormat::Xml);
    assert!(response.pretty().unwrap().contains("\t<results>"));
}

#[tokio::test]
async fn test_community_and_use_prefixes() {
    let server = MockServer::start().await;
    let expected = format!(
        "env '{COMMUNITY_ENV}'; use 'http://josuebrunel.org/mytable.xml' as mytable; SELECT * FROM mytable(5) | reverse()"
    );
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .and(query_param("q", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let mut yql = Yql::new(mock_config(&server)).unwrap();
    yql.set_community(true);
    yql.use_table("http://josuebrunel.org/mytable.xml", "mytable");
    let response = yql
        .select("mytable", &[])
        .remote_filter(RemoteFilter::count(5))
        .func_filter(FuncFilter::Reverse)
        .send()
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_error_status_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string(SAMPLE_ERROR))
        .mount(&server)
        .await;

    let yql = Yql::new(mock_config(&server)).unwrap();
    let response = yql.raw_query("SELECT * FRM t", None).await.unwrap();

    assert_eq!(response.status(), 400);
    assert!(response
        .error_description()
        .unwrap()
        .starts_with("Query syntax error(s)"));
    assert!(response.error_for_status().is_err());
}

#[tokio::test]
async fn test_invalid_statement_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let yql = Yql::new(mock_config(&server)).unwrap();
    let result = yql
        .insert("yql.storage.admin", &["value", "name"], &["http://josuebrunel.org"])
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_signed_query_uses_private_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRIVATE_PATH))
        .and(header_regex("authorization", r#"^OAuth realm="yahooapis\.com", "#))
        .and(header_regex("authorization", r#"oauth_consumer_key="dj0yJmk9""#))
        .and(header_regex("authorization", r#"oauth_token="A%3Dtoken""#))
        .and(header_regex("authorization", r#"oauth_signature_method="HMAC-SHA1""#))
        .and(header_regex("authorization", r#"oauth_signature="[A-Za-z0-9%]+""#))
        .and(query_param("q", "SELECT * FROM yahoo.identity WHERE yid = 'josue_brunel'"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let yql = Yql::new(mock_config(&server))
        .unwrap()
        .with_oauth(OAuth1::new(credentials(0)));
    assert!(yql.is_signed());

    let response = yql.get_guid("josue_brunel").await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=A%3Dfresh&oauth_token_secret=fresh_secret&oauth_session_handle=AOvNew&xoauth_yahoo_guid=GUID42",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PRIVATE_PATH))
        .and(header_regex("authorization", r#"oauth_token="A%3Dfresh""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let credentials_path = write_credentials(dir.path(), &credentials(7200));
    let mut config = mock_config(&server);
    config.credentials_file = Some(credentials_path.clone());

    let yql = Yql::new(config).unwrap();
    yql.show_tables(None).await.unwrap();

    let saved = OAuth1::from_file(&credentials_path).unwrap();
    assert_eq!(saved.credentials().access_token.as_deref(), Some("A=fresh"));
    assert_eq!(saved.credentials().session_handle.as_deref(), Some("AOvNew"));
    assert_eq!(saved.credentials().guid.as_deref(), Some("GUID42"));
    assert!(saved.token_is_valid());
}

#[tokio::test]
async fn test_weather_forecast_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .and(query_param(
            "q",
            "SELECT item.forecast FROM weather.forecast WHERE woeid in (SELECT woeid FROM geo.places WHERE text=\"choisy-le-roi\") AND u = 'c'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let weather = Weather::new(mock_config(&server), TemperatureUnit::Celsius).unwrap();
    let response = weather.get_weather_forecast("choisy-le-roi").await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_stock_lookup_runs_in_community_mode() {
    let server = MockServer::start().await;
    let expected =
        format!("env '{COMMUNITY_ENV}'; SELECT * FROM yahoo.finance.stocks WHERE company = 'Google'");
    Mock::given(method("GET"))
        .and(path(PUBLIC_PATH))
        .and(query_param("q", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let stock = StockRetriever::new(mock_config(&server)).unwrap();
    let response = stock.stock_lookup("Google").await.unwrap();
    assert!(response.is_success());
}
