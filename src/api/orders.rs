use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::order::{OrderError, OrderIntake, SubmitOrder};

/// Form variant used by the storefront: the order travels as JSON text in `orderData`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDataForm {
    pub order_data: String,
}

pub async fn submit_order(
    intake: web::Data<OrderIntake>,
    body: web::Bytes,
) -> Result<HttpResponse, OrderError> {
    let command = SubmitOrder::parse(&body)?;
    place(&intake, command).await
}

pub async fn process_order(
    intake: web::Data<OrderIntake>,
    form: web::Form<OrderDataForm>,
) -> Result<HttpResponse, OrderError> {
    let command = SubmitOrder::parse(form.order_data.as_bytes())?;
    place(&intake, command).await
}

async fn place(intake: &OrderIntake, command: SubmitOrder) -> Result<HttpResponse, OrderError> {
    tracing::debug!(
        customer_ref = %command.customer,
        vendor = %command.vendor,
        item_count = command.items.len(),
        "Received order"
    );

    let order = intake.submit(command).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Order placed successfully",
        "order": order,
    })))
}

pub async fn list_orders(intake: web::Data<OrderIntake>) -> Result<HttpResponse, OrderError> {
    let orders = intake.list_orders().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Orders fetched successfully",
        "orders": orders,
    })))
}

pub async fn get_order(
    intake: web::Data<OrderIntake>,
    path: web::Path<String>,
) -> Result<HttpResponse, OrderError> {
    let id = Uuid::parse_str(&path).map_err(|_| OrderError::OrderNotFound)?;
    let order = intake.get_order(id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "order": order,
    })))
}
