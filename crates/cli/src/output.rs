//! Terminal rendering of the storefront read models.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use serde::Serialize;
use tote_core::{CartSnapshot, Product};
use tote_storefront::services::{AuthState, CheckoutState, CheckoutView};

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
    }
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

pub fn notice(message: &str) {
    eprintln!("{message}");
}

pub fn products(products: &[Product], json: bool) {
    if json {
        print_json(&products);
        return;
    }
    if products.is_empty() {
        println!("No products yet.");
        return;
    }
    for p in products {
        println!("{}  {:>10}  {}", p.id, p.price, p.name);
    }
}

pub fn product(product: &Product, json: bool) {
    if json {
        print_json(product);
    } else {
        println!("Added {} ({}) as {}", product.name, product.price, product.id);
    }
}

pub fn url(url: &str, json: bool) {
    if json {
        print_json(&serde_json::json!({ "url": url }));
    } else {
        println!("{url}");
    }
}

pub fn auth_state(state: &AuthState, json: bool) {
    if json {
        print_json(state);
        return;
    }
    match &state.user {
        Some(user) if state.is_authenticated => {
            println!("Signed in as {} ({})", user.email_or_empty(), user.id);
        }
        _ => println!("Not signed in"),
    }
    if let Some(error) = &state.error {
        println!("Last error: {error}");
    }
}

pub fn cart(snapshot: &CartSnapshot, json: bool) {
    if json {
        print_json(snapshot);
        return;
    }
    for item in &snapshot.items {
        println!(
            "{:>3} x {:<30} {:>10}",
            item.quantity,
            item.product.name,
            item.line_total()
        );
    }
    println!("{} item(s), total {}", snapshot.total_items, snapshot.total);
}

pub fn checkout(view: &CheckoutView, json: bool) {
    if json {
        print_json(view);
        return;
    }
    match &view.state {
        CheckoutState::Succeeded { order_id } => {
            println!("Order placed! Order number: {order_id}");
        }
        CheckoutState::Failed { message } => println!("Order not placed: {message}"),
        CheckoutState::Editing => {
            for (field, message) in view.errors.iter() {
                println!("{}: {message}", tote_core::form::FormField::key(field));
            }
        }
        CheckoutState::Submitting => println!("Order still submitting"),
    }
}
