use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GRAPH: &str = "00000003-0000-0000-c000-000000000000";
pub const USER_READ: &str = "e1fe6dd8-ba31-4d61-89e7-88639da4683d";
pub const DIRECTORY_RW: &str = "19dbc75e-c2e2-444c-a770-ec69d8559fc7";

/// Registration with implicit grant and a plain-http redirect URI
pub fn risky_application() -> Value {
    json!({
        "id": "obj-risky",
        "appId": "app-risky",
        "displayName": "Contoso Legacy Portal",
        "web": {
            "redirectUris": ["http://portal.contoso.com/signin"],
            "implicitGrantSettings": {
                "enableAccessTokenIssuance": true,
                "enableIdTokenIssuance": true
            }
        },
        "requiredResourceAccess": [{
            "resourceAppId": GRAPH,
            "resourceAccess": [{ "id": DIRECTORY_RW, "type": "Role" }]
        }]
    })
}

/// Registration with nothing to report
pub fn clean_application() -> Value {
    json!({
        "id": "obj-clean",
        "appId": "app-clean",
        "displayName": "Contoso Billing",
        "web": { "redirectUris": ["https://billing.contoso.com/signin"] },
        "requiredResourceAccess": [{
            "resourceAppId": GRAPH,
            "resourceAccess": [{ "id": USER_READ, "type": "Scope" }]
        }]
    })
}

pub fn graph_service_principal() -> Value {
    json!({
        "id": "sp-graph",
        "appId": GRAPH,
        "displayName": "Microsoft Graph",
        "oauth2PermissionScopes": [{ "id": USER_READ, "value": "User.Read" }],
        "appRoles": [{ "id": DIRECTORY_RW, "value": "Directory.ReadWrite.All" }]
    })
}

/// Serves `applications` from the primary listing and Graph from the
/// service principal lookup; any other service principal is unknown.
pub async fn mount_directory(server: &MockServer, applications: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/v1.0/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": applications })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/servicePrincipals"))
        .and(query_param("$filter", format!("appId eq '{}'", GRAPH)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": [graph_service_principal()] })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/servicePrincipals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(server)
        .await;
}
