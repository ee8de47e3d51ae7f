//! Integration tests for the HCI client and the network ACL rule resource
//! using wiremock
//!
//! These tests run the full stack against mocked endpoints: environment
//! resolution, the data envelope, the API key header and not-found handling.

use hci_acl::hci::{HciClient, HciError, NetworkAclRule, NetworkAclRuleApi};
use hci_acl::resource::{NetworkAclRuleResource, ResourceData};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key";
const ENV_PATH: &str = "/v1/environments/env-1";
const RULES_PATH: &str = "/v1/services/compute-qc/prod/networkaclrules";

fn client(server: &MockServer) -> HciClient {
    HciClient::new(&format!("{}/v1", server.uri()), API_KEY).expect("Client should build")
}

async fn mount_environment(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ENV_PATH))
        .and(header("MC-Api-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "env-1",
                "name": "prod",
                "serviceConnection": {"id": "sc-1", "serviceCode": "compute-qc"}
            }
        })))
        .mount(server)
        .await;
}

fn rule_config() -> ResourceData {
    ResourceData::new()
        .with("environment_id", "env-1")
        .with("rule_number", "10")
        .with("cidr", "10.0.0.0/24")
        .with("action", "Allow")
        .with("protocol", "TCP")
        .with("traffic_type", "Ingress")
        .with("start_port", "80")
        .with("end_port", "443")
        .with("network_acl_id", "acl-1")
}

fn stored_rule() -> serde_json::Value {
    json!({
        "data": {
            "id": "rule-1",
            "ruleNumber": "10",
            "cidr": "10.0.0.0/24",
            "action": "ALLOW",
            "protocol": "TCP",
            "trafficType": "INGRESS",
            "startPort": "80",
            "endPort": "443",
            "networkAclId": "acl-1"
        }
    })
}

/// Test module for HTTP client integration tests
mod http_client_tests {
    use super::*;

    /// Environment lookup decodes the data envelope and sends the API key
    #[tokio::test]
    async fn test_get_environment() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        let env = client(&server)
            .get_environment("env-1")
            .await
            .expect("Environment should resolve");

        assert_eq!(env.name, "prod");
        assert_eq!(env.service_connection.service_code, "compute-qc");
    }

    /// 404 maps to the typed not-found error
    #[tokio::test]
    async fn test_404_returns_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/environments/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"code": "NOT_FOUND", "message": "Environment not found"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_environment("nope").await.unwrap_err();

        assert!(err.is_not_found());
    }

    /// Other failures carry the status and the first error message
    #[tokio::test]
    async fn test_error_message_is_extracted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ENV_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "errors": [{"code": "FORBIDDEN", "message": "Permission denied"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_environment("env-1").await.unwrap_err();

        match err {
            HciError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Create posts the camelCase body without empty fields
    #[tokio::test]
    async fn test_create_rule_request_body() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("POST"))
            .and(path(RULES_PATH))
            .and(header("MC-Api-Key", API_KEY))
            .and(body_json(json!({
                "ruleNumber": "10",
                "cidr": "10.0.0.0/24",
                "action": "ALLOW",
                "protocol": "TCP",
                "trafficType": "INGRESS",
                "startPort": "80",
                "endPort": "443",
                "networkAclId": "acl-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_rule()))
            .expect(1)
            .mount(&server)
            .await;

        let resources = client(&server)
            .resources_for_environment("env-1")
            .await
            .expect("Environment should resolve");
        let created = resources
            .create(&NetworkAclRule {
                rule_number: "10".to_string(),
                cidr: "10.0.0.0/24".to_string(),
                action: "ALLOW".to_string(),
                protocol: "TCP".to_string(),
                traffic_type: "INGRESS".to_string(),
                start_port: "80".to_string(),
                end_port: "443".to_string(),
                network_acl_id: "acl-1".to_string(),
                ..Default::default()
            })
            .await
            .expect("Create should succeed");

        assert_eq!(created.id, "rule-1");
    }

    /// Delete tolerates an empty 204 body
    #[tokio::test]
    async fn test_delete_empty_response() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/rule-1", RULES_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let resources = client(&server)
            .resources_for_environment("env-1")
            .await
            .expect("Environment should resolve");

        resources.delete("rule-1").await.expect("Delete should succeed");
    }
}

/// Lifecycle tests running the resource against the mocked API
mod resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read_back_lowercase() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("POST"))
            .and(path(RULES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_rule()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/rule-1", RULES_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_rule()))
            .expect(1)
            .mount(&server)
            .await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config();
        resource.create(&mut data).await.expect("Create should succeed");

        assert_eq!(data.id(), "rule-1");
        assert_eq!(data.get("protocol"), "tcp");
        assert_eq!(data.get("action"), "allow");
        assert_eq!(data.get("traffic_type"), "ingress");
        assert_eq!(data.get("environment_id"), "env-1");
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let server = MockServer::start().await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config().with("protocol", "ICMP");
        let err = resource.create(&mut data).await.unwrap_err();

        assert!(err.is_validation());
        let requests = server.received_requests().await.unwrap_or_default();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_read_not_found_clears_state() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("{}/rule-1", RULES_PATH)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config();
        data.set_id("rule-1");

        resource.read(&mut data).await.expect("Read should not fail");

        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_delete_not_found_succeeds() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/rule-1", RULES_PATH)))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config();
        data.set_id("rule-1");

        resource.delete(&mut data).await.expect("Delete should succeed");
    }

    #[tokio::test]
    async fn test_update_sends_put_without_network_acl() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("PUT"))
            .and(path(format!("{}/rule-1", RULES_PATH)))
            .and(body_json(json!({
                "id": "rule-1",
                "ruleNumber": "20",
                "cidr": "10.0.0.0/24",
                "action": "DENY",
                "protocol": "TCP",
                "trafficType": "INGRESS",
                "startPort": "80",
                "endPort": "443"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_rule()))
            .expect(1)
            .mount(&server)
            .await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config().with("rule_number", "20").with("action", "Deny");
        data.set_id("rule-1");

        resource.update(&mut data).await.expect("Update should succeed");

        assert_eq!(data.get("network_acl_id"), "acl-1");
        assert_eq!(data.get("protocol"), "tcp");
        assert_eq!(data.get("rule_number"), "20");
    }

    #[tokio::test]
    async fn test_server_error_is_wrapped_with_rule_number() {
        let server = MockServer::start().await;
        mount_environment(&server).await;

        Mock::given(method("POST"))
            .and(path(RULES_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "errors": [{"code": "INTERNAL", "message": "backend unavailable"}]
            })))
            .mount(&server)
            .await;

        let resource = NetworkAclRuleResource::new(client(&server));
        let mut data = rule_config();
        let err = resource.create(&mut data).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error creating network ACL rule 10: API request failed: 500 - backend unavailable"
        );
        assert_eq!(data.id(), "");
    }
}
