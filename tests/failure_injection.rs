//! End-to-end failure injection: the gateway in front of misbehaving
//! upstreams, driven over real HTTP.

mod common;

use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use clinic_resilience::fallback::FallbackStrategy;

use common::{client, dead_address, start_gateway, start_programmable_backend, test_config, ADMIN_KEY};

fn valid_contact() -> Value {
    json!({
        "name": "Maria Silva",
        "email": "Maria@Example.com",
        "phone": "(33) 99860-1427",
        "message": "Gostaria de agendar uma consulta de rotina.",
        "consent": true
    })
}

#[tokio::test]
async fn test_contact_primary_success_echoes_request_id() {
    let backend = start_programmable_backend(|_| async { (200, r#"{"id":"msg_1"}"#.to_string()) }).await;
    let gateway = start_gateway(test_config(backend)).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .header("x-request-id", "req-123")
        .json(&valid_contact())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-request-id"], "req-123");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["requestId"], "req-123");
    assert_eq!(body["data"]["source"], "primary");
    assert_eq!(body["data"]["data"]["id"], "msg_1");
}

#[tokio::test]
async fn test_email_outage_is_retried_then_queued() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let backend = start_programmable_backend(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        async { (503, "{}".to_string()) }
    })
    .await;
    let gateway = start_gateway(test_config(backend)).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .json(&valid_contact())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["source"], "fallback");
    assert_eq!(body["data"]["fallbackType"], "queued");
    assert_eq!(body["data"]["data"]["queued"], true);
    assert_eq!(body["data"]["data"]["retryAfter"], 300);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unhealthy_email_service_fails_fast() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let backend = start_programmable_backend(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        async { (503, "{}".to_string()) }
    })
    .await;
    let gateway = start_gateway(test_config(backend)).await;
    let http = client();

    for _ in 0..3 {
        let res = http
            .post(gateway.url("/api/contact"))
            .json(&valid_contact())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
    let after_outage = calls.load(Ordering::SeqCst);
    assert!(!gateway
        .state
        .registry
        .health
        .is_healthy(FallbackStrategy::EmailService));

    let res = http
        .post(gateway.url("/api/contact"))
        .json(&valid_contact())
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["fallbackType"], "queued");
    assert_eq!(calls.load(Ordering::SeqCst), after_outage);
}

#[tokio::test]
async fn test_content_served_from_cache_during_outage() {
    let down = Arc::new(AtomicBool::new(false));
    let flag = down.clone();
    let backend = start_programmable_backend(move |_| {
        let down = flag.load(Ordering::SeqCst);
        async move {
            if down {
                (503, "{}".to_string())
            } else {
                (200, r#"{"title":"Bem-vindo"}"#.to_string())
            }
        }
    })
    .await;
    let gateway = start_gateway(test_config(backend)).await;
    let http = client();

    let res = http.get(gateway.url("/api/content/posts/welcome")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["source"], "primary");

    down.store(true, Ordering::SeqCst);
    let res = http.get(gateway.url("/api/content/posts/welcome")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["source"], "fallback");
    assert_eq!(body["data"]["fallbackType"], "cached_content");
    assert_eq!(body["data"]["data"]["title"], "Bem-vindo");
}

#[tokio::test]
async fn test_content_cache_miss_maps_to_bad_gateway() {
    let gateway = start_gateway(test_config(dead_address().await)).await;

    let res = client()
        .get(gateway.url("/api/content/pages/about"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "WORDPRESS_UNAVAILABLE");
    assert_eq!(body["error"]["fallback"]["action"], "cached_content");
    assert!(body["error"]["context"]["operationId"]
        .as_str()
        .unwrap()
        .starts_with("op_"));
}

#[tokio::test]
async fn test_chat_outage_uses_static_emergency_reply() {
    let gateway = start_gateway(test_config(dead_address().await)).await;

    let res = client()
        .post(gateway.url("/api/chat"))
        .json(&json!({ "message": "Estou com dor forte no olho" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["fallbackType"], "static_responses");
    assert_eq!(body["data"]["data"]["isStatic"], true);
    assert!(body["data"]["data"]["response"].as_str().unwrap().starts_with("🚨"));
}

#[tokio::test]
async fn test_invalid_contact_lists_every_field() {
    let gateway = start_gateway(test_config(dead_address().await)).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .json(&json!({ "name": "Al", "email": "not-an-email", "phone": "123", "message": "oi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "name");
    let errors = body["error"]["validationErrors"].as_array().unwrap();
    let fields: Vec<_> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, ["name", "email", "phone", "message", "consent"]);
    assert_eq!(errors[1]["message"], "Email inválido.");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let gateway = start_gateway(test_config(dead_address().await)).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_honeypot_is_spam() {
    let gateway = start_gateway(test_config(dead_address().await)).await;
    let mut form = valid_contact();
    form["honeypot"] = json!("http://spam.example");

    let res = client()
        .post(gateway.url("/api/contact"))
        .json(&form)
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SPAM_DETECTED");
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let gateway = start_gateway(test_config(dead_address().await)).await;
    let http = client();

    let res = http.get(gateway.url("/api/nothing-here")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let res = http.get(gateway.url("/api/contact")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn test_rate_limit_returns_retry_after() {
    let mut config = test_config(dead_address().await);
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst_size = 2;
    let gateway = start_gateway(config).await;
    let http = client();

    for _ in 0..2 {
        let res = http.get(gateway.url("/api/health")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }
    let res = http.get(gateway.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(res.headers()["retry-after"], "300");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(body["error"]["retryAfter"], 300);
}

#[tokio::test]
async fn test_admin_requires_key() {
    let gateway = start_gateway(test_config(dead_address().await)).await;
    let http = client();

    let res = http.get(gateway.url("/admin/status")).send().await.unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let res = http
        .get(gateway.url("/admin/status"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["unhealthyThreshold"], 3);
}

#[tokio::test]
async fn test_admin_marks_resets_and_clears() {
    let gateway = start_gateway(test_config(dead_address().await)).await;
    let http = client();

    for _ in 0..3 {
        let res = http
            .post(gateway.url("/admin/services/sms_service/unhealthy"))
            .bearer_auth(ADMIN_KEY)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
    let res = http.get(gateway.url("/api/health")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["services"]["SMS_SERVICE"]["consecutiveFailures"], 3);

    let res = http
        .post(gateway.url("/admin/services/SMS_SERVICE/reset"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["healthy"], true);
    assert_eq!(body["data"]["consecutiveFailures"], 0);

    let res = http
        .post(gateway.url("/admin/services/podcast/reset"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    gateway
        .state
        .fallback
        .set_cached_content("posts", "welcome", json!({ "title": "x" }));
    let res = http
        .delete(gateway.url("/admin/cache"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["removed"], 1);
    assert!(gateway.state.registry.cache.is_empty());
}

#[tokio::test]
async fn test_content_path_cannot_escape_cms_base() {
    let requests = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = requests.clone();
    let backend = start_programmable_backend(move |line| {
        seen.lock().unwrap().push(line);
        async { (200, r#"{"secret":true}"#.to_string()) }
    })
    .await;
    let gateway = start_gateway(test_config(backend)).await;
    let http = client();

    for path in [
        "/api/content/posts/..%2F..%2F..%2F..%2Fadmin%2Fsecrets",
        "/api/content/..%2F..%2Fadmin/secrets",
        "/api/content/posts/index.php",
    ] {
        let res = http.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 400, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{path}");
    }
    assert!(requests.lock().unwrap().is_empty());

    let res = http.get(gateway.url("/api/content/posts/welcome")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["GET /wp-json/wp/v2/posts/welcome HTTP/1.1"]
    );
}

#[tokio::test]
async fn test_rate_limited_upstream_is_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let backend = start_programmable_backend(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        async { (429, r#"{"error":"rate_limited"}"#.to_string()) }
    })
    .await;
    let gateway = start_gateway(test_config(backend)).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .json(&valid_contact())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["source"], "fallback");
    assert_eq!(body["data"]["fallbackType"], "queued");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_timeout_is_retried_within_deadline() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let backend = start_programmable_backend(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            (200, r#"{"id":"late"}"#.to_string())
        }
    })
    .await;
    let mut config = test_config(backend);
    config.timeouts.upstream_secs = 1;
    config.fallback.operation_timeout_ms = 5_000;
    let gateway = start_gateway(config).await;

    let res = client()
        .post(gateway.url("/api/contact"))
        .json(&valid_contact())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["fallbackType"], "queued");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
