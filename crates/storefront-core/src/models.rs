//! Storefront model catalogue.
//!
//! Each model maps to the collection named by lower-casing it:
//! `Product` -> `product`, `DesignRequest` -> `designrequest`.

use storefront_state::{FieldKind, FieldSpec, ModelDefinition, ModelRegistry, SchemaError};

pub const USER: &str = "User";
pub const PRODUCT: &str = "Product";
pub const SERVICE: &str = "Service";
pub const ORDER: &str = "Order";
pub const DESIGN_REQUEST: &str = "DesignRequest";

pub fn user() -> ModelDefinition {
    ModelDefinition::new(USER)
        .field(FieldSpec::required("name", FieldKind::String).describe("Full name"))
        .field(
            FieldSpec::required("email", FieldKind::String)
                .email()
                .describe("Email address"),
        )
        .field(FieldSpec::optional("address", FieldKind::String).describe("Address"))
        .field(
            FieldSpec::optional("age", FieldKind::Integer)
                .minimum(0.0)
                .maximum(120.0)
                .describe("Age in years"),
        )
        .field(
            FieldSpec::required("is_active", FieldKind::Boolean)
                .with_default(true)
                .describe("Whether user is active"),
        )
}

pub fn product() -> ModelDefinition {
    ModelDefinition::new(PRODUCT)
        .field(FieldSpec::required("title", FieldKind::String).describe("Product title"))
        .field(
            FieldSpec::optional("description", FieldKind::String)
                .describe("Product description"),
        )
        .field(
            FieldSpec::required("price", FieldKind::Number)
                .minimum(0.0)
                .describe("Price"),
        )
        .field(FieldSpec::required("category", FieldKind::String).describe("Product category"))
        .field(FieldSpec::optional("image", FieldKind::String).describe("Image URL"))
        .field(
            FieldSpec::required("in_stock", FieldKind::Boolean)
                .with_default(true)
                .describe("Whether product is in stock"),
        )
}

pub fn service() -> ModelDefinition {
    ModelDefinition::new(SERVICE)
        .field(FieldSpec::required("name", FieldKind::String).describe("Service name"))
        .field(FieldSpec::optional("description", FieldKind::String).describe("Service details"))
        .field(
            FieldSpec::required("base_price", FieldKind::Number)
                .minimum(0.0)
                .describe("Starting price"),
        )
        .field(
            FieldSpec::optional("tags", FieldKind::list_of(FieldKind::String))
                .with_empty_default()
                .describe("Tags for filtering"),
        )
}

/// Line of an order; only ever nested inside [`order`].
pub fn order_item() -> ModelDefinition {
    ModelDefinition::new("OrderItem")
        .field(FieldSpec::required("product_id", FieldKind::String).describe("ID of the product"))
        .field(
            FieldSpec::required("title", FieldKind::String)
                .describe("Product title at time of order"),
        )
        .field(
            FieldSpec::required("quantity", FieldKind::Integer)
                .with_default(1)
                .minimum(1.0),
        )
        .field(
            FieldSpec::required("price", FieldKind::Number)
                .minimum(0.0)
                .describe("Unit price at time of order"),
        )
        .field(FieldSpec::required("subtotal", FieldKind::Number).minimum(0.0))
}

pub fn order() -> ModelDefinition {
    ModelDefinition::new(ORDER)
        .field(FieldSpec::required("customer_name", FieldKind::String))
        .field(FieldSpec::required("customer_email", FieldKind::String).email())
        .field(FieldSpec::optional("customer_phone", FieldKind::String))
        .field(FieldSpec::required(
            "items",
            FieldKind::list_of(FieldKind::Object(order_item())),
        ))
        .field(FieldSpec::required("total", FieldKind::Number).minimum(0.0))
        .field(
            FieldSpec::required("status", FieldKind::String)
                .with_default("pending")
                .describe("Order status"),
        )
        .field(FieldSpec::optional("notes", FieldKind::String))
}

pub fn design_request() -> ModelDefinition {
    ModelDefinition::new(DESIGN_REQUEST)
        .field(FieldSpec::required("name", FieldKind::String))
        .field(FieldSpec::required("email", FieldKind::String).email())
        .field(FieldSpec::optional("phone", FieldKind::String))
        .field(FieldSpec::required("service", FieldKind::String).describe("Selected service name"))
        .field(
            FieldSpec::required("brief", FieldKind::String)
                .describe("Project brief / requirements"),
        )
        .field(FieldSpec::optional("budget", FieldKind::Number).minimum(0.0))
        .field(
            FieldSpec::required("status", FieldKind::String)
                .with_default("new")
                .describe("Request status"),
        )
}

/// Registry holding every storefront model.
pub fn storefront_registry() -> Result<ModelRegistry, SchemaError> {
    ModelRegistry::new()
        .with(user())?
        .with(product())?
        .with(service())?
        .with(order())?
        .with(design_request())
}
