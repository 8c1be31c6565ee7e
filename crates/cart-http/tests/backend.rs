use async_trait::async_trait;
use cart_core::{
    CartBackend, CartError, CartPage, CartResult, CheckoutOrchestrator, CheckoutRequest,
    CheckoutSettings, CheckoutState, PageHost, PaymentWidget, ProductId, ScriptLoader,
    VerificationPayload, WidgetHandle, WidgetOptions, WidgetResponse,
};
use cart_http::{ClientConfig, HttpCartBackend};
use serde_json::json;
use std::cell::RefCell;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpCartBackend {
    HttpCartBackend::new(ClientConfig::new(server.uri())).unwrap()
}

fn snapshot() -> serde_json::Value {
    json!({
        "cart": {
            "products": [
                {
                    "product_id": 11,
                    "name": "Kettle",
                    "description": "1.5L",
                    "image_url": null,
                    "price_per_unit": 1299.0,
                    "quantity": 1,
                    "total_price": 1299.0
                },
                {
                    "product_id": 12,
                    "name": "Filter",
                    "description": "Pack of 3",
                    "image_url": "https://img.example/filter.png",
                    "price_per_unit": "120.00",
                    "quantity": 3,
                    "total_price": "360.00"
                }
            ],
            "overall_total_price": 1659.0
        },
        "username": "ravi"
    })
}

#[tokio::test]
async fn test_fetch_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = backend(&server).fetch_cart().await.unwrap();

    assert_eq!(snapshot.username.as_deref(), Some("ravi"));
    let products = snapshot.cart.unwrap().products.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].line_total.amount, 36_000);
}

#[tokio::test]
async fn test_fetch_cart_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(401).set_body_string("login required"))
        .mount(&server)
        .await;

    let err = backend(&server).fetch_cart().await.unwrap_err();
    assert_eq!(err.response_body(), Some("login required"));
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .and(header("cookie", "authToken=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        HttpCartBackend::new(ClientConfig::new(server.uri()).with_session_cookie("authToken=abc123"))
            .unwrap();
    assert!(backend.fetch_cart().await.is_ok());
}

#[tokio::test]
async fn test_remove_item_needs_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/delete"))
        .and(body_json(json!({ "username": "ravi", "productId": 11 })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/delete"))
        .and(body_json(json!({ "username": "ravi", "productId": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let backend = backend(&server);
    assert!(backend.remove_item("ravi", &ProductId::Numeric(11)).await.is_ok());

    let err = backend
        .remove_item("ravi", &ProductId::Numeric(12))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::Status { status: 200, .. }));
}

#[tokio::test]
async fn test_update_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/update"))
        .and(body_json(json!({ "username": "ravi", "productId": 12, "quantity": 5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend(&server)
        .update_quantity("ravi", &ProductId::Numeric(12), 5)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_create_payment_order_returns_plaintext_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create"))
        .and(body_json(json!({
            "totalAmount": "360.00",
            "cartItems": [{ "productId": 12, "quantity": 3, "price": "120.00" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("order_Nx81"))
        .expect(1)
        .mount(&server)
        .await;

    let request = CheckoutRequest {
        total_amount: cart_core::Price::new(360.0, cart_core::Currency::INR),
        cart_items: vec![cart_core::CheckoutLine {
            product_id: ProductId::Numeric(12),
            quantity: 3,
            price: cart_core::Price::new(120.0, cart_core::Currency::INR),
        }],
    };

    let token = backend(&server).create_payment_order(&request).await.unwrap();
    assert_eq!(token.as_str(), "order_Nx81");
}

#[tokio::test]
async fn test_verify_payment_failure_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .and(body_json(json!({
            "razorpayOrderId": "order_1",
            "razorpayPaymentId": "pay_1",
            "razorpaySignature": "bad"
        })))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid signature"))
        .mount(&server)
        .await;

    let payload = VerificationPayload {
        razorpay_order_id: "order_1".into(),
        razorpay_payment_id: "pay_1".into(),
        razorpay_signature: "bad".into(),
    };
    let err = backend(&server).verify_payment(&payload).await.unwrap_err();
    assert_eq!(err.response_body(), Some("Invalid signature"));
}

#[tokio::test]
async fn test_network_error() {
    let backend = HttpCartBackend::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = backend.fetch_cart().await.unwrap_err();
    assert!(matches!(err, CartError::Network(_)));
}

// =============================================================================
// Whole page over HTTP
// =============================================================================

struct Loaded;

#[async_trait(?Send)]
impl ScriptLoader for Loaded {
    async fn ensure_loaded(&self) -> bool {
        true
    }
}

struct PayingWidget;

impl PaymentWidget for PayingWidget {
    fn open(&self, options: WidgetOptions) -> CartResult<WidgetHandle> {
        let (responder, handle) = WidgetHandle::channel();
        responder.complete(WidgetResponse {
            razorpay_order_id: options.order_id,
            razorpay_payment_id: "pay_77".into(),
            razorpay_signature: "sig_77".into(),
        })?;
        Ok(handle)
    }
}

#[derive(Default)]
struct RecordingHost {
    alerts: RefCell<Vec<String>>,
    routes: RefCell<Vec<String>>,
}

impl PageHost for RecordingHost {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn navigate(&self, route: &str) {
        self.routes.borrow_mut().push(route.to_string());
    }
}

#[tokio::test]
async fn test_page_checkout_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create"))
        .respond_with(ResponseTemplate::new(200).set_body_string("order_77"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .and(body_json(json!({
            "razorpayOrderId": "order_77",
            "razorpayPaymentId": "pay_77",
            "razorpaySignature": "sig_77"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Payment verified"))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = CartPage::new(backend(&server));
    page.load().await;
    assert_eq!(page.totals().subtotal.decimal_string(), "1659.00");

    let mut checkout = CheckoutOrchestrator::new(
        Loaded,
        PayingWidget,
        RecordingHost::default(),
        CheckoutSettings::default().with_key("rzp_test_key"),
    );
    let state = page.checkout(&mut checkout).await;

    assert_eq!(state, CheckoutState::SuccessNavigated);
    assert_eq!(*checkout.host().routes.borrow(), vec!["/customerhome".to_string()]);
}

#[tokio::test]
async fn test_page_checkout_insufficient_stock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insufficient stock"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut page = CartPage::new(backend(&server));
    page.load().await;

    let mut checkout = CheckoutOrchestrator::new(
        Loaded,
        PayingWidget,
        RecordingHost::default(),
        CheckoutSettings::default(),
    );
    let state = page.checkout(&mut checkout).await;

    assert_eq!(state, CheckoutState::FailedIdle);
    assert_eq!(*checkout.host().alerts.borrow(), vec!["insufficient stock".to_string()]);
    assert_eq!(page.cart().len(), 2);
}

#[tokio::test]
async fn test_page_quantity_flow_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/update"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/delete"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut page = CartPage::new(backend(&server));
    page.load().await;

    assert!(page.increment(&ProductId::Numeric(11)).await);
    assert_eq!(page.totals().subtotal.decimal_string(), "2958.00");

    assert!(page.change_quantity(&ProductId::Numeric(12), 0).await);
    assert_eq!(page.cart().len(), 1);
    assert_eq!(page.totals().grand_total.decimal_string(), "2968.00");
}
