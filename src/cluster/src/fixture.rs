pub mod kubeconfig {
    use kube::config::Kubeconfig;

    pub const TEST_KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: kind-b
clusters:
- name: cluster-b
  cluster:
    server: https://b.example:6443
- name: cluster-a
  cluster:
    server: https://a.example:6443
    certificate-authority-data: dGVzdC1jYQ==
    tls-server-name: a.internal
    proxy-url: http://proxy.example:3128
contexts:
- name: kind-b
  context:
    cluster: cluster-b
    user: user-b
- name: kind-a
  context:
    cluster: cluster-a
    user: user-a
- name: dangling
  context:
    cluster: missing
    user: user-a
- name: empty
users:
- name: user-a
  user:
    client-certificate-data: dGVzdC1jZXJ0
    client-key-data: dGVzdC1rZXk=
- name: user-b
  user:
    token: user-b-token
"#;

    /// TLS material given as file paths, plus an unparsable proxy url.
    pub const TEST_KUBECONFIG_FILES: &str = r#"
apiVersion: v1
kind: Config
current-context: kind-c
clusters:
- name: cluster-c
  cluster:
    server: https://c.example:6443
    certificate-authority: /nonexistent/ca.crt
    insecure-skip-tls-verify: true
    proxy-url: "http://bad proxy"
contexts:
- name: kind-c
  context:
    cluster: cluster-c
    user: user-c
users:
- name: user-c
  user:
    client-certificate: /nonexistent/client.crt
    client-key: /nonexistent/client.key
"#;

    pub fn test_kubeconfig() -> Kubeconfig {
        Kubeconfig::from_yaml(TEST_KUBECONFIG).unwrap()
    }
}

pub mod api_server {
    use std::collections::BTreeMap;

    use http::{Request, Response};
    use hyper::Body;
    use k8s_openapi::api::core::v1::ConfigMap;
    use kube::{core::ObjectMeta, Client};

    use crate::endpoint::{CLUSTER_INFO, KUBE_PUBLIC_NAMESPACE};

    pub type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;
    pub struct ApiServerVerifier(pub ApiServerHandle);

    pub enum Scenario {
        Found(ConfigMap),
        NotFound,
    }

    pub fn test_client() -> (Client, ApiServerVerifier) {
        let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let mock_client = Client::new(mock_service, "default");
        (mock_client, ApiServerVerifier(handle))
    }

    pub async fn timeout_after_1s(handle: tokio::task::JoinHandle<()>) {
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("timeout on mock apiserver")
            .expect("scenario succeeded")
    }

    pub fn cluster_info_uri() -> String {
        format!("/api/v1/namespaces/{KUBE_PUBLIC_NAMESPACE}/configmaps/{CLUSTER_INFO}")
    }

    pub fn test_cluster_info(data: Option<BTreeMap<String, String>>) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(CLUSTER_INFO.to_string()),
                namespace: Some(KUBE_PUBLIC_NAMESPACE.to_string()),
                ..Default::default()
            },
            data,
            ..Default::default()
        }
    }

    pub fn test_cluster_info_with_kubeconfig(kubeconfig: &str) -> ConfigMap {
        test_cluster_info(Some(BTreeMap::from([(
            "kubeconfig".to_string(),
            kubeconfig.to_string(),
        )])))
    }

    pub fn api_server_response_not_found() -> String {
        format!(
            r#"{{
  "kind": "Status",
  "apiVersion": "v1",
  "metadata": {{}},
  "status": "Failure",
  "message": "configmaps \"{CLUSTER_INFO}\" not found",
  "reason": "NotFound",
  "details": {{
    "name": "{CLUSTER_INFO}",
    "kind": "configmaps"
  }},
  "code": 404
}}"#
        )
    }

    impl ApiServerVerifier {
        pub fn run(self, scenario: Scenario) -> tokio::task::JoinHandle<()> {
            tokio::spawn(async move {
                match scenario {
                    Scenario::Found(cm) => self.get_cluster_info(&cm).await,
                    Scenario::NotFound => self.get_cluster_info_not_found().await,
                }
            })
        }

        async fn get_cluster_info(mut self, cm: &ConfigMap) {
            let (request, send) = self.0.next_request().await.expect("service not called");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.uri().path(), cluster_info_uri());
            send.send_response(
                Response::builder()
                    .body(Body::from(serde_json::to_vec(cm).unwrap()))
                    .unwrap(),
            );
        }

        async fn get_cluster_info_not_found(mut self) {
            let (request, send) = self.0.next_request().await.expect("service not called");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.uri().path(), cluster_info_uri());
            send.send_response(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::from(api_server_response_not_found()))
                    .unwrap(),
            );
        }
    }
}
