use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::caption::{GenerateRequest, TextBox};
use crate::server::{self, delivery};
use crate::templates::suggest_positions;

pub async fn serve(ctx: Arc<AppContext>, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| ctx.config.server.bind.clone());
    server::serve(ctx, &bind).await
}

/// Same path as `GET /api/memes`, including the request budget.
pub async fn print_feed(ctx: &AppContext, after: Option<String>) -> Result<()> {
    let server = &ctx.config.server;
    let delivery = delivery::deliver(
        ctx.aggregator.clone(),
        after,
        server.request_timeout(),
        &server.cache_directive(),
    )
    .await;

    if delivery.page.is_terminal() {
        eprintln!("No posts available");
    }
    println!("{}", serde_json::to_string_pretty(&delivery.page)?);
    Ok(())
}

pub async fn caption(ctx: &AppContext, template: &str, texts: Vec<String>) -> Result<()> {
    let request = GenerateRequest {
        template_id: Some(template.to_string()),
        text_boxes: Some(
            texts
                .into_iter()
                .enumerate()
                .map(|(id, text)| TextBox {
                    id: id as i64,
                    text: Some(text),
                })
                .collect(),
        ),
        ..Default::default()
    };

    let caption = ctx.captioner.caption(&request).await?;
    println!("{}", caption.url);
    if !caption.page_url.is_empty() {
        println!("Page: {}", caption.page_url);
    }
    Ok(())
}

pub async fn positions(ctx: &AppContext, template_id: &str) -> Result<()> {
    for position in suggest_positions(&ctx.captioner, template_id).await {
        println!(
            "{:>3}% {:>3}%  {:>3}x{:<3}  {:.2}  {}",
            position.x, position.y, position.width, position.height, position.score, position.reason
        );
    }
    Ok(())
}
