//! # Transport Binding
//!
//! Request and response bodies for the ordering endpoints, and handlers that
//! translate them into [`CafeClient`] calls. No server is included; an HTTP or
//! socket layer deserializes a body, calls the matching handler and serializes
//! the result.
//!
//! | Route              | Body                        | Handler          |
//! |--------------------|-----------------------------|------------------|
//! | `GET /orders`      |                             | [`list_orders`]  |
//! | `POST /order`      | [`CreateOrderRequest`]      | [`create_order`] |
//! | `PUT /order/{id}`  | [`UpdateStatusRequest`]     | [`update_order`] |
//!
//! Push updates are [`OrderEvent`]s from [`CafeClient::subscribe`].

mod events;

pub use events::{OrderEvent, OrderFeed};

use crate::clients::CafeClient;
use crate::error::CafeError;
use crate::model::{Cart, MenuItemId, Order, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub id: MenuItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub table_number: u32,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn list_orders(client: &CafeClient) -> Result<Vec<Order>, CafeError> {
    client.orders().await
}

/// Build a cart from the request against the current menu and place it.
///
/// Lines with quantity 0 are skipped. An unknown table number is `NotFound`;
/// an item id missing from the menu, or repeated lines whose quantities do
/// not fit a `u32`, are `InvalidArgument`.
#[instrument(skip(client, request), fields(table = request.table_number))]
pub async fn create_order(
    client: &CafeClient,
    request: CreateOrderRequest,
) -> Result<CreateOrderResponse, CafeError> {
    debug!(?request, "create_order called");
    let snapshot = client.snapshot().await?;
    let table = snapshot
        .table_by_number(request.table_number)
        .ok_or_else(|| CafeError::NotFound(format!("table number {}", request.table_number)))?;

    let mut cart = Cart::new();
    for line in request.items.iter().filter(|line| line.quantity > 0) {
        let item = snapshot
            .menu_items
            .iter()
            .find(|item| item.id == line.id)
            .ok_or_else(|| CafeError::InvalidArgument(format!("unknown menu item {}", line.id)))?;
        let quantity = cart
            .quantity_of(item.id)
            .checked_add(line.quantity)
            .ok_or_else(|| {
                CafeError::InvalidArgument(format!("quantity of {} is too large", line.id))
            })?;
        cart.set_quantity(item, quantity);
    }

    let order_id = client.place_order(table.id, &mut cart).await?;
    Ok(CreateOrderResponse { order_id })
}

/// Parse the status text and apply it to order `id`.
#[instrument(skip(client))]
pub async fn update_order(
    client: &CafeClient,
    id: OrderId,
    request: UpdateStatusRequest,
) -> Result<Order, CafeError> {
    let status: OrderStatus = request.status.parse()?;
    client.update_order_status(id, status).await
}
