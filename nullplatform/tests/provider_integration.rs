#![allow(clippy::disallowed_methods)]

use mockito::{Matcher, Server};
use nullplatform::NullplatformProvider;
use serde_json::json;
use tfplug::data_source::ReadDataSourceRequest;
use tfplug::provider::ConfigureRequest;
use tfplug::resource::{CreateResourceRequest, ReadResourceRequest, ValidateResourceConfigRequest};
use tfplug::{plan_resource_change, Provider, ReadOutcome, State};

const APP_NRN: &str = "organization=1:account=2:namespace=3:application=4";

async fn configured_provider(server: &mut Server) -> NullplatformProvider {
    let token_mock = server
        .mock("POST", "/token")
        .match_body(Matcher::Json(json!({"apikey": "key"})))
        .with_body(r#"{"access_token":"tok"}"#)
        .create_async()
        .await;

    let mut provider = NullplatformProvider::new();
    let response = provider
        .configure(ConfigureRequest {
            config: State::from_value(json!({"api_key": "key", "host": server.url()})).unwrap(),
        })
        .await;

    assert!(
        !response.diagnostics.has_errors(),
        "configure failed: {:?}",
        response.diagnostics.errors
    );
    token_mock.assert_async().await;
    provider
}

fn application_body(status: &str) -> String {
    json!({
        "id": 4,
        "name": "billing",
        "nrn": APP_NRN,
        "slug": "billing",
        "status": status,
        "namespace_id": 3,
        "repository_url": "https://github.com/acme/billing"
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn parameter_created_under_application_nrn() {
    let mut server = Server::new_async().await;
    let provider = configured_provider(&mut server).await;
    let resource = provider
        .create_resource("nullplatform_parameter")
        .await
        .unwrap();

    let config = State::from_value(json!({
        "name": "DB host",
        "application_id": 4,
        "variable": "DB_HOST"
    }))
    .unwrap();

    let validation = resource
        .validate(ValidateResourceConfigRequest {
            config: config.clone(),
        })
        .await;
    assert!(validation.diagnostics.is_empty());

    let app_mock = server
        .mock("GET", "/application/4")
        .match_header("authorization", "Bearer tok")
        .with_body(application_body("active"))
        .create_async()
        .await;
    let create_mock = server
        .mock("POST", "/parameter")
        .match_body(Matcher::PartialJson(json!({
            "name": "DB host",
            "nrn": APP_NRN,
            "type": "environment",
            "encoding": "plaintext",
            "variable": "DB_HOST"
        })))
        .with_body(
            json!({
                "id": 31,
                "name": "DB host",
                "nrn": APP_NRN,
                "type": "environment",
                "encoding": "plaintext",
                "variable": "DB_HOST",
                "secret": false,
                "read_only": false,
                "values": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let plan = plan_resource_change(&resource.schema(), &State::new(), &config);
    let created = resource
        .create(CreateResourceRequest {
            config,
            planned_state: plan.planned_state,
        })
        .await;

    assert!(!created.diagnostics.has_errors());
    assert_eq!(created.new_state.get_string("id").unwrap(), "31");
    assert_eq!(created.new_state.get_string("nrn").unwrap(), APP_NRN);
    assert_eq!(created.new_state.get_i64("application_id").unwrap(), 4);
    app_mock.assert_async().await;
    create_mock.assert_async().await;

    // refresh of a parameter removed outside Terraform
    let _gone = server
        .mock("GET", "/parameter/31")
        .with_status(404)
        .create_async()
        .await;
    let read = resource
        .read(ReadResourceRequest {
            current_state: created.new_state,
        })
        .await;
    assert_eq!(read.outcome, ReadOutcome::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn parameter_refuses_deleted_application() {
    let mut server = Server::new_async().await;
    let provider = configured_provider(&mut server).await;
    let resource = provider
        .create_resource("nullplatform_parameter")
        .await
        .unwrap();

    let _app_mock = server
        .mock("GET", "/application/4")
        .with_body(application_body("deleted"))
        .create_async()
        .await;
    let create_mock = server
        .mock("POST", "/parameter")
        .expect(0)
        .create_async()
        .await;

    let config = State::from_value(json!({
        "name": "DB host",
        "application_id": 4,
        "variable": "DB_HOST"
    }))
    .unwrap();

    let created = resource
        .create(CreateResourceRequest {
            config: config.clone(),
            planned_state: config,
        })
        .await;

    assert!(created.diagnostics.has_errors());
    assert!(created.diagnostics.errors[0]
        .detail
        .contains("application 4 has been deleted"));
    create_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn application_data_source() {
    let mut server = Server::new_async().await;
    let provider = configured_provider(&mut server).await;
    let data_source = provider
        .create_data_source("nullplatform_application")
        .await
        .unwrap();

    let active = server
        .mock("GET", "/application/4")
        .with_body(application_body("active"))
        .create_async()
        .await;

    let response = data_source
        .read(ReadDataSourceRequest {
            config: State::from_value(json!({"id": "4"})).unwrap(),
        })
        .await;
    assert!(response.diagnostics.is_empty());
    assert_eq!(response.state.get_string("nrn").unwrap(), APP_NRN);
    assert_eq!(response.state.get_i64("namespace_id").unwrap(), 3);
    active.remove_async().await;

    let _deleted = server
        .mock("GET", "/application/4")
        .with_body(application_body("deleted"))
        .create_async()
        .await;

    let response = data_source
        .read(ReadDataSourceRequest {
            config: State::from_value(json!({"id": "4"})).unwrap(),
        })
        .await;
    assert!(response.diagnostics.has_errors());
    assert_eq!(
        response.diagnostics.errors[0].summary,
        "Failed to read application"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn parameter_data_source_lists_values() {
    let mut server = Server::new_async().await;
    let provider = configured_provider(&mut server).await;
    let data_source = provider
        .create_data_source("nullplatform_parameter")
        .await
        .unwrap();

    let _mock = server
        .mock("GET", "/parameter/31")
        .with_body(
            json!({
                "id": 31,
                "name": "DB host",
                "nrn": APP_NRN,
                "type": "environment",
                "encoding": "plaintext",
                "variable": "DB_HOST",
                "secret": true,
                "read_only": false,
                "values": [
                    {"id": 1, "nrn": APP_NRN, "value": "db.dev", "dimensions": {"environment": "dev"}},
                    {"id": 2, "nrn": APP_NRN, "value": "db.prod", "dimensions": {"environment": "prod"}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = data_source
        .read(ReadDataSourceRequest {
            config: State::from_value(json!({"id": "31"})).unwrap(),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.state.get_bool("secret").unwrap());
    let values = response.state.get("values").unwrap().as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[1]["value"], "db.prod");
    assert_eq!(values[0]["generated_id"].as_str().unwrap().len(), 64);
    assert!(data_source
        .schema()
        .attribute("values")
        .unwrap()
        .r#type
        .accepts(response.state.get("values").unwrap()));
}
