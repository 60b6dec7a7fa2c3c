//! HTML views
//!
//! Every page is a pure function of the data handed to it. Templates are
//! compiled into the binary and parsed once when [`Views`] is built.

use serde::Serialize;
use tera::{Context, Tera};

use crate::core::catalog::{Catalog, CatalogEntry};
use crate::core::error::ShopError;
use crate::core::flash::Flash;
use crate::core::model::{CartItem, Feedback, Order};
use crate::core::validation::{CheckoutForm, FeedbackForm};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("services.html", include_str!("../../templates/services.html")),
    ("cart.html", include_str!("../../templates/cart.html")),
    ("checkout.html", include_str!("../../templates/checkout.html")),
    ("feedback.html", include_str!("../../templates/feedback.html")),
    ("contact.html", include_str!("../../templates/contact.html")),
    (
        "email_confirmation.html",
        include_str!("../../templates/email_confirmation.html"),
    ),
];

/// Format an amount with two decimals
pub fn format_price(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Debug, Serialize)]
struct EntryView<'a> {
    key: &'a str,
    name: &'a str,
    price: String,
    unit: &'a str,
    description: &'a str,
    features: &'a [String],
}

impl<'a> From<&'a CatalogEntry> for EntryView<'a> {
    fn from(entry: &'a CatalogEntry) -> Self {
        Self {
            key: &entry.key,
            name: &entry.name,
            price: format_price(entry.price),
            unit: entry.unit_label(),
            description: &entry.description,
            features: &entry.features,
        }
    }
}

#[derive(Debug, Serialize)]
struct CartItemView<'a> {
    id: i64,
    name: &'a str,
    price: String,
    description: &'a str,
}

impl<'a> From<&'a CartItem> for CartItemView<'a> {
    fn from(item: &'a CartItem) -> Self {
        Self {
            id: item.id,
            name: &item.service_name,
            price: format_price(item.service_price),
            description: &item.service_description,
        }
    }
}

#[derive(Debug, Serialize)]
struct FeedbackView<'a> {
    name: &'a str,
    rating: i64,
    message: &'a str,
    submitted: String,
}

impl<'a> From<&'a Feedback> for FeedbackView<'a> {
    fn from(feedback: &'a Feedback) -> Self {
        Self {
            name: &feedback.name,
            rating: feedback.rating,
            message: &feedback.message,
            submitted: feedback.date_submitted.format("%B %d, %Y").to_string(),
        }
    }
}

/// Compiled page and email templates
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Parse every template
    pub fn new() -> Result<Self, ShopError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, ShopError> {
        Ok(self.tera.render(template, context)?)
    }

    fn page_context(flashes: &[Flash]) -> Context {
        let mut context = Context::new();
        context.insert("flashes", flashes);
        context
    }

    fn catalog_context(catalog: &Catalog, flashes: &[Flash]) -> Context {
        let packages: Vec<EntryView<'_>> = catalog.packages().values().map(EntryView::from).collect();
        let providers: Vec<EntryView<'_>> =
            catalog.providers().values().map(EntryView::from).collect();

        let mut context = Self::page_context(flashes);
        context.insert("event_packages", &packages);
        context.insert("service_providers", &providers);
        context
    }

    fn cart_context(items: &[CartItem], total: f64, flashes: &[Flash]) -> Context {
        let items: Vec<CartItemView<'_>> = items.iter().map(CartItemView::from).collect();

        let mut context = Self::page_context(flashes);
        context.insert("cart_items", &items);
        context.insert("total", &format_price(total));
        context
    }

    pub fn render_index(&self, catalog: &Catalog, flashes: &[Flash]) -> Result<String, ShopError> {
        self.render("index.html", &Self::catalog_context(catalog, flashes))
    }

    pub fn render_services(&self, catalog: &Catalog, flashes: &[Flash]) -> Result<String, ShopError> {
        self.render("services.html", &Self::catalog_context(catalog, flashes))
    }

    /// Cart page; the checkout link is offered only while `can_checkout`
    pub fn render_cart(
        &self,
        items: &[CartItem],
        total: f64,
        can_checkout: bool,
        flashes: &[Flash],
    ) -> Result<String, ShopError> {
        let mut context = Self::cart_context(items, total, flashes);
        context.insert("can_checkout", &can_checkout);
        self.render("cart.html", &context)
    }

    /// Checkout form, pre-filled with whatever the visitor already typed
    pub fn render_checkout(
        &self,
        items: &[CartItem],
        total: f64,
        form: &CheckoutForm,
        flashes: &[Flash],
    ) -> Result<String, ShopError> {
        let mut context = Self::cart_context(items, total, flashes);
        context.insert("form", form);
        self.render("checkout.html", &context)
    }

    pub fn render_feedback(
        &self,
        feedback: &[Feedback],
        form: &FeedbackForm,
        flashes: &[Flash],
    ) -> Result<String, ShopError> {
        let feedback: Vec<FeedbackView<'_>> = feedback.iter().map(FeedbackView::from).collect();

        let mut context = Self::page_context(flashes);
        context.insert("feedback_list", &feedback);
        context.insert("form", form);
        self.render("feedback.html", &context)
    }

    pub fn render_contact(&self, flashes: &[Flash]) -> Result<String, ShopError> {
        self.render("contact.html", &Self::page_context(flashes))
    }

    /// Body of the order-confirmation email
    pub fn render_confirmation(&self, order: &Order) -> Result<String, ShopError> {
        let services: Vec<_> = order
            .services
            .iter()
            .map(|line| {
                serde_json::json!({
                    "name": line.name,
                    "price": format_price(line.price),
                    "description": line.description,
                })
            })
            .collect();

        let mut context = Context::new();
        context.insert("order_id", &order.id);
        context.insert("customer_name", &order.customer_name);
        context.insert("customer_phone", &order.customer_phone);
        context.insert("event_date", &order.event_date.format("%B %d, %Y").to_string());
        context.insert("order_date", &order.order_date.format("%B %d, %Y").to_string());
        context.insert("total", &format_price(order.total_amount));
        context.insert("services", &services);
        self.render("email_confirmation.html", &context)
    }
}
