//! In-memory backend for service tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use tote_core::{
    Email, NewOrder, NewOrderItem, NewProduct, Order, OrderId, Price, Product, ProductId, User,
    UserId,
};

use crate::remote::{AuthProvider, RemoteDataService, RemoteError};

pub const GOOD_PASSWORD: &str = "correct-horse-battery";

#[derive(Default)]
pub struct FakeState {
    pub user: Option<User>,
    pub products: Vec<Product>,
    pub orders: Vec<NewOrder>,
    pub order_items: Vec<NewOrderItem>,
    pub uploads: Vec<(usize, String)>,
    pub order_calls: usize,
    pub fail_order: Option<String>,
    pub fail_items: Option<String>,
    pub fail_sign_out: Option<String>,
    pub hang_orders: bool,
    pub confirm_sign_up: bool,
}

/// Cloneable fake; clones share state so tests can inspect it afterwards.
#[derive(Clone, Default)]
pub struct FakeRemote {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in() -> Self {
        let fake = Self::new();
        fake.state.lock().unwrap().user = Some(test_user());
        fake
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

pub fn test_user() -> User {
    User {
        id: UserId::generate(),
        email: Some(Email::parse("buyer@example.com").unwrap()),
    }
}

pub fn product(name: &str, units: u32) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        price: Price::from_units(units),
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        description: format!("{name} description"),
    }
}

fn api(message: &str) -> RemoteError {
    RemoteError::Api {
        status: 400,
        message: message.to_string(),
    }
}

impl RemoteDataService for FakeRemote {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RemoteError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.order_calls += 1;
            if let Some(message) = &state.fail_order {
                return Err(api(message));
            }
            state.hang_orders
        };
        if hang {
            std::future::pending::<()>().await;
        }

        self.state.lock().unwrap().orders.push(order.clone());
        Ok(Order {
            id: OrderId::generate(),
            user_id: order.user_id,
            total: order.total,
            shipping_address: order.shipping_address.clone(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_items {
            return Err(api(message));
        }
        state.order_items.extend_from_slice(items);
        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        let mut products = self.state.lock().unwrap().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, RemoteError> {
        let created = Product {
            id: ProductId::generate(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        };
        self.state.lock().unwrap().products.push(created.clone());
        Ok(created)
    }

    async fn upload_image(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.uploads.push((bytes.len(), content_type.to_string()));
        Ok(format!(
            "https://project.supabase.co/storage/v1/object/public/product-images/products/{}.jpg",
            state.uploads.len()
        ))
    }
}

impl AuthProvider for FakeRemote {
    async fn sign_up(
        &self,
        email: &Email,
        _password: &SecretString,
    ) -> Result<Option<User>, RemoteError> {
        let mut state = self.state.lock().unwrap();
        if !state.confirm_sign_up {
            return Ok(None);
        }
        let user = User {
            id: UserId::generate(),
            email: Some(email.clone()),
        };
        state.user = Some(user.clone());
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<User, RemoteError> {
        if password.expose_secret() != GOOD_PASSWORD {
            return Err(api("Invalid login credentials"));
        }
        let user = User {
            id: UserId::generate(),
            email: Some(email.clone()),
        };
        self.state.lock().unwrap().user = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_sign_out {
            return Err(api(message));
        }
        state.user = None;
        Ok(())
    }

    async fn session_user(&self) -> Result<Option<User>, RemoteError> {
        Ok(self.state.lock().unwrap().user.clone())
    }
}
