//! # Terminal Collaborators
//!
//! Script loader, payment widget and host page for running the cart page in
//! a terminal. The widget cannot embed the hosted modal, so it prints the
//! order details and reads the payment result the modal would have handed
//! back.

use async_trait::async_trait;
use cart_core::{
    CartError, CartResult, Currency, PageHost, PaymentWidget, Price, ScriptLoader, WidgetHandle,
    WidgetOptions, WidgetResponse,
};
use reqwest::Client;
use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, StdinLock, Stderr, Write};
use tracing::{error, info, instrument, warn};

fn io_error(e: io::Error) -> CartError {
    CartError::Widget(format!("terminal I/O failed: {}", e))
}

/// Checks once that the hosted checkout script is reachable
pub struct ProbeScriptLoader {
    client: Client,
    url: String,
    loaded: Cell<bool>,
}

impl ProbeScriptLoader {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            loaded: Cell::new(false),
        }
    }
}

#[async_trait(?Send)]
impl ScriptLoader for ProbeScriptLoader {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn ensure_loaded(&self) -> bool {
        if self.loaded.get() {
            return true;
        }

        match self.client.get(&self.url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Checkout script reachable");
                self.loaded.set(true);
                true
            }
            Ok(response) => {
                warn!("Checkout script unavailable: status={}", response.status());
                false
            }
            Err(e) => {
                error!("Error fetching checkout script: {}", e);
                false
            }
        }
    }
}

/// Prompts for the payment result on a terminal
pub struct TerminalWidget<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl TerminalWidget<StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalWidget<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn prompt(&self, label: &str) -> io::Result<String> {
        let mut output = self.output.borrow_mut();
        write!(output, "{}", label)?;
        output.flush()?;

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn describe(&self, options: &WidgetOptions) -> io::Result<()> {
        let amount = match Currency::from_code(&options.currency) {
            Some(currency) => Price::from_minor(options.amount, currency).display(),
            None => format!("{} {}", options.amount, options.currency),
        };

        let mut output = self.output.borrow_mut();
        writeln!(output)?;
        writeln!(output, "{} - {}", options.name, options.description)?;
        writeln!(output, "Order:  {}", options.order_id)?;
        writeln!(output, "Amount: {}", amount)?;
        writeln!(output, "Buyer:  {}", options.prefill.name)?;
        writeln!(
            output,
            "Pay in the hosted checkout, then enter the result (empty payment id cancels)."
        )?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> PaymentWidget for TerminalWidget<R, W> {
    fn open(&self, options: WidgetOptions) -> CartResult<WidgetHandle> {
        let (responder, handle) = WidgetHandle::channel();
        self.describe(&options).map_err(io_error)?;

        let payment_id = self.prompt("razorpay_payment_id: ").map_err(io_error)?;
        if payment_id.is_empty() {
            // responder dropped: the attempt ends as dismissed
            return Ok(handle);
        }
        let signature = self.prompt("razorpay_signature: ").map_err(io_error)?;

        responder.complete(WidgetResponse {
            razorpay_order_id: options.order_id,
            razorpay_payment_id: payment_id,
            razorpay_signature: signature,
        })?;
        Ok(handle)
    }
}

/// Prints alerts and route changes
pub struct TerminalHost<W> {
    output: RefCell<W>,
}

impl TerminalHost<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TerminalHost<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: RefCell::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn print(&self, line: String) {
        if let Err(e) = writeln!(self.output.borrow_mut(), "{}", line) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> PageHost for TerminalHost<W> {
    fn alert(&self, message: &str) {
        self.print(format!("[alert] {}", message));
    }

    fn navigate(&self, route: &str) {
        self.print(format!("-> {}", route));
    }
}
