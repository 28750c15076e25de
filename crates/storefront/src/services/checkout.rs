//! Order submission.
//!
//! [`CheckoutWorkflow`] owns the shipping form and the submission state. An
//! order is written in two steps: the `orders` row first, then every cart line
//! as one batch of `order_items`. The steps are not atomic; when the second
//! one fails the order row stays behind and the failure is reported as
//! [`CheckoutError::PartialSubmission`].
//!
//! ```text
//! Editing ──place_order──▶ Submitting ──ok──▶ Succeeded
//!    ▲                         │
//!    └──────── Failed ◀──err───┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tote_core::shipping::{ShippingErrors, ShippingForm};
use tote_core::{Cart, NewOrder, OrderId, User};
use tracing::{error, info, instrument, warn};

use crate::remote::{RemoteDataService, RemoteError};

/// Shown when a backend failure carries no message of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to place order";

/// Where the workflow is in the submit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutState {
    /// Collecting shipping details.
    #[default]
    Editing,
    /// Backend calls in flight.
    Submitting,
    /// Order and items stored; the cart has been emptied.
    Succeeded { order_id: OrderId },
    /// The last attempt failed. Submitting again is allowed.
    Failed { message: String },
}

/// Errors returned by [`CheckoutWorkflow::place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more shipping fields are blank.
    #[error("invalid shipping details: {0}")]
    Validation(ShippingErrors),

    /// No signed-in user.
    #[error("authentication required")]
    AuthenticationRequired,

    /// A submission is already in flight.
    #[error("an order is already being submitted")]
    AlreadySubmitting,

    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order row could not be created.
    #[error("order insert failed: {0}")]
    Remote(#[from] RemoteError),

    /// The order row exists but its items could not be stored.
    #[error("order {order_id} was created but its items were not stored: {source}")]
    PartialSubmission {
        order_id: OrderId,
        #[source]
        source: RemoteError,
    },
}

impl CheckoutError {
    /// Text shown to the shopper.
    ///
    /// Backend failures pass the backend's message through unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::AuthenticationRequired => "You must be logged in to place an order".to_string(),
            Self::AlreadySubmitting => "Your order is already being placed".to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Remote(source) | Self::PartialSubmission { source, .. } => {
                let message = source.to_string();
                if message.trim().is_empty() {
                    FALLBACK_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }

    /// Whether the error came from the backend (as opposed to local checks).
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::PartialSubmission { .. })
    }
}

/// Everything the presentation layer needs to draw the checkout screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub state: CheckoutState,
    pub form: ShippingForm,
    pub errors: ShippingErrors,
    pub is_submitting: bool,
}

/// The checkout screen's state machine.
pub struct CheckoutWorkflow<S> {
    remote: S,
    form: ShippingForm,
    errors: ShippingErrors,
    state: CheckoutState,
}

impl<S: RemoteDataService> CheckoutWorkflow<S> {
    /// A workflow in `Editing` with a blank form.
    pub fn new(remote: S) -> Self {
        Self {
            remote,
            form: ShippingForm::default(),
            errors: ShippingErrors::new(),
            state: CheckoutState::Editing,
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.form.address = address.into();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.form.city = city.into();
    }

    pub fn set_postal_code(&mut self, postal_code: impl Into<String>) {
        self.form.postal_code = postal_code.into();
    }

    /// Replace the whole form.
    pub fn set_form(&mut self, form: ShippingForm) {
        self.form = form;
    }

    #[must_use]
    pub const fn form(&self) -> &ShippingForm {
        &self.form
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Errors from the last validation, keyed by field.
    #[must_use]
    pub const fn errors(&self) -> &ShippingErrors {
        &self.errors
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> CheckoutView {
        CheckoutView {
            state: self.state.clone(),
            form: self.form.clone(),
            errors: self.errors.clone(),
            is_submitting: self.is_submitting(),
        }
    }

    /// Validate the current form and remember the result.
    ///
    /// Returns `true` when the form can be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = self.form.validate();
        self.errors.is_empty()
    }

    /// Back to a blank `Editing` workflow ("continue shopping").
    ///
    /// Also the way out of a `Submitting` state left behind by a dropped
    /// submission future.
    pub fn reset(&mut self) {
        self.form.clear();
        self.errors.clear();
        self.state = CheckoutState::Editing;
    }

    /// Place an order for the session's user.
    ///
    /// # Errors
    ///
    /// See [`Self::place_order`].
    pub async fn place_order_as_current_user(
        &mut self,
        cart: &mut Cart,
    ) -> Result<OrderId, CheckoutError> {
        let user = self.remote.current_user().await;
        self.place_order(user.as_ref(), cart).await
    }

    /// Submit the cart as an order for `user`.
    ///
    /// On success the cart and the form are cleared and the state becomes
    /// `Succeeded`. Validation failures keep the state at `Editing`; every
    /// other failure moves to `Failed` and leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitting` if a previous submission never finished; checked
    ///   first, so the state and the error map are left as they are
    /// - `Validation` if a shipping field is blank
    /// - `AuthenticationRequired` if `user` is `None`
    /// - `EmptyCart` if there is nothing to order
    /// - `Remote` if the order row could not be created
    /// - `PartialSubmission` if the order row was created but the items were not
    #[instrument(skip_all, fields(items = cart.len(), total = %cart.total()))]
    pub async fn place_order(
        &mut self,
        user: Option<&User>,
        cart: &mut Cart,
    ) -> Result<OrderId, CheckoutError> {
        // Nothing may touch the state while a submission is in flight
        if self.is_submitting() {
            warn!("Order submission already in flight");
            return Err(CheckoutError::AlreadySubmitting);
        }

        if !self.validate() {
            return Err(CheckoutError::Validation(self.errors.clone()));
        }

        let Some(user) = user else {
            return Err(self.fail(CheckoutError::AuthenticationRequired));
        };

        if cart.is_empty() {
            return Err(self.fail(CheckoutError::EmptyCart));
        }

        self.state = CheckoutState::Submitting;

        match self.submit(user, cart).await {
            Ok(order_id) => {
                info!(%order_id, user_id = %user.id, "Order placed");
                cart.clear_cart();
                self.form.clear();
                self.errors.clear();
                self.state = CheckoutState::Succeeded { order_id };
                Ok(order_id)
            }
            Err(err) => {
                if let CheckoutError::PartialSubmission { order_id, source } = &err {
                    let event_id = sentry::capture_error(&err);
                    error!(
                        %order_id,
                        error = %source,
                        sentry_event_id = %event_id,
                        "Order created without items"
                    );
                } else {
                    warn!(error = %err, "Order submission failed");
                }
                Err(self.fail(err))
            }
        }
    }

    async fn submit(&self, user: &User, cart: &Cart) -> Result<OrderId, CheckoutError> {
        let order = self
            .remote
            .insert_order(&NewOrder {
                user_id: user.id,
                total: cart.total(),
                shipping_address: self.form.address_line(),
            })
            .await?;

        let items = cart.to_order_items(order.id);
        self.remote
            .insert_order_items(&items)
            .await
            .map_err(|source| CheckoutError::PartialSubmission {
                order_id: order.id,
                source,
            })?;

        Ok(order.id)
    }

    fn fail(&mut self, err: CheckoutError) -> CheckoutError {
        self.state = CheckoutState::Failed {
            message: err.user_message(),
        };
        err
    }
}
