//! Folio storefront host binary.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio_storefront::run().await
}
