use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures_util::stream::{self, StreamExt};
use std::convert::Infallible;

use crate::actors::BroadcasterHandle;
use crate::domain::order::OrderEvent;

// ============================================================================
// Live order stream for vendor apps (Server-Sent Events)
// ============================================================================
//
// Each connection holds one broadcaster subscription for as long as the
// client stays connected. When the client goes away the response stream is
// dropped, which drops the subscription and unregisters it.
//
// ============================================================================

pub async fn order_stream(broadcaster: web::Data<BroadcasterHandle>) -> HttpResponse {
    let subscription = match broadcaster.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::error!(error = %e, "Cannot accept vendor connection");
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "success": false,
                "message": "Live order feed unavailable",
            }));
        }
    };

    tracing::info!(subscriber_id = %subscription.id(), "Vendor app connected");

    let greeting = stream::once(async { Ok::<_, Infallible>(web::Bytes::from_static(b": connected\n\n")) });
    let events = stream::unfold(subscription, |mut subscription| async move {
        let notification = subscription.recv().await?;
        Some((Ok(sse_frame(&notification)), subscription))
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(greeting.chain(events))
}

fn sse_frame(event: &OrderEvent) -> web::Bytes {
    match serde_json::to_string(event.order()) {
        Ok(data) => web::Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), data)),
        Err(e) => {
            tracing::warn!(order_id = %event.order_id(), error = %e, "Failed to encode notification");
            web::Bytes::from_static(b": dropped\n\n")
        }
    }
}
