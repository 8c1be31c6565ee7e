//! # Checkout Orchestrator
//!
//! Drives one hosted-checkout attempt from start to finish:
//!
//! ```text
//! Idle → ScriptLoading → OrderCreating → WidgetOpen → Verifying
//!                                                     ├─► SuccessNavigated
//!   (any failure) ─────────────────────────────────────┴─► FailedIdle
//! ```
//!
//! Failures are logged and, unlike cart browsing, surfaced to the user with
//! a blocking alert. A failed attempt can simply be run again.

use crate::cart::CartItem;
use crate::checkout::{CheckoutRequest, CheckoutSettings, VerificationPayload, WidgetOptions, WidgetOutcome};
use crate::error::CartError;
use crate::gateway::{CartBackend, PageHost, PaymentWidget, ScriptLoader};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub const SCRIPT_LOAD_FAILED: &str = "Failed to load Razorpay. Please check your internet connection.";
pub const CHECKOUT_FAILED: &str = "Payment failed. Please try again.";
pub const PAYMENT_VERIFIED: &str = "Payment verified successfully!";
pub const VERIFICATION_RETRY: &str = "Payment verification failed. Please try again.";

/// Where a checkout attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    ScriptLoading,
    OrderCreating,
    WidgetOpen,
    Verifying,
    /// Payment verified and the host navigated away
    SuccessNavigated,
    /// Attempt abandoned; checkout may be started again
    FailedIdle,
}

impl CheckoutState {
    /// True for the two states an attempt ends in
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::SuccessNavigated | CheckoutState::FailedIdle)
    }

    /// True when a new attempt may start
    pub fn can_start(&self) -> bool {
        matches!(self, CheckoutState::Idle | CheckoutState::FailedIdle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::ScriptLoading => "script_loading",
            CheckoutState::OrderCreating => "order_creating",
            CheckoutState::WidgetOpen => "widget_open",
            CheckoutState::Verifying => "verifying",
            CheckoutState::SuccessNavigated => "success_navigated",
            CheckoutState::FailedIdle => "failed_idle",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosted-checkout driver with injected script loader, widget and host page
pub struct CheckoutOrchestrator<S, W, H> {
    loader: S,
    widget: W,
    host: H,
    settings: CheckoutSettings,
    state: CheckoutState,
}

impl<S, W, H> CheckoutOrchestrator<S, W, H>
where
    S: ScriptLoader,
    W: PaymentWidget,
    H: PageHost,
{
    pub fn new(loader: S, widget: W, host: H, settings: CheckoutSettings) -> Self {
        Self {
            loader,
            widget,
            host,
            settings,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn transition(&mut self, next: CheckoutState) {
        debug!("Checkout state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, alert: Option<&str>) -> CheckoutState {
        if let Some(message) = alert {
            self.host.alert(message);
        }
        self.transition(CheckoutState::FailedIdle);
        self.state
    }

    /// Run one checkout attempt for the given cart lines.
    ///
    /// Returns the terminal state the attempt ended in.
    pub async fn run<B: CartBackend>(
        &mut self,
        backend: &B,
        username: &str,
        items: &[CartItem],
    ) -> CheckoutState {
        let attempt = Uuid::new_v4();
        self.run_attempt(backend, username, items, attempt).await
    }

    #[instrument(skip(self, backend, username, items), fields(items = items.len()))]
    async fn run_attempt<B: CartBackend>(
        &mut self,
        backend: &B,
        username: &str,
        items: &[CartItem],
        attempt: Uuid,
    ) -> CheckoutState {
        self.transition(CheckoutState::ScriptLoading);
        if !self.loader.ensure_loaded().await {
            error!("Checkout script failed to load: {}", self.settings.script_url);
            return self.fail(Some(SCRIPT_LOAD_FAILED));
        }

        let request = CheckoutRequest::from_items(items);
        self.transition(CheckoutState::OrderCreating);
        let order = match backend.create_payment_order(&request).await {
            Ok(order) => order,
            Err(CartError::Status { status, body }) => {
                error!("Order creation rejected: status={}, body={}", status, body);
                return self.fail(Some(body.as_str()));
            }
            Err(e) => {
                error!("Error during checkout: {}", e);
                return self.fail(Some(CHECKOUT_FAILED));
            }
        };

        info!(
            "Created payment order: id={}, amount={}",
            order,
            request.total_amount.display()
        );

        let options = WidgetOptions::new(&self.settings, &order, request.total_amount, username);
        self.transition(CheckoutState::WidgetOpen);
        let handle = match self.widget.open(options) {
            Ok(handle) => handle,
            Err(e) => {
                error!("Error opening checkout widget: {}", e);
                return self.fail(Some(CHECKOUT_FAILED));
            }
        };

        let response = match handle.outcome().await {
            WidgetOutcome::Completed(response) => response,
            WidgetOutcome::Dismissed => {
                info!("Checkout widget closed without a payment: order={}", order);
                return self.fail(None);
            }
        };

        self.transition(CheckoutState::Verifying);
        let payload = VerificationPayload::from(response);
        match backend.verify_payment(&payload).await {
            Ok(_) => {
                info!("Payment verified: payment={}", payload.razorpay_payment_id);
                self.host.alert(PAYMENT_VERIFIED);
                self.host.navigate(&self.settings.success_route);
                self.transition(CheckoutState::SuccessNavigated);
                self.state
            }
            Err(CartError::Status { status, body }) => {
                error!("Payment verification rejected: status={}, body={}", status, body);
                let message = format!("Payment verification failed: {}", body);
                self.fail(Some(message.as_str()))
            }
            Err(e) => {
                error!("Error verifying payment: {}", e);
                self.fail(Some(VERIFICATION_RETRY))
            }
        }
    }
}
